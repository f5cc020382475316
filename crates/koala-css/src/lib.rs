//! CSS tokenizer, parser, and zml markup parser for the Koala renderer.
//!
//! # Scope
//!
//! This crate implements the front-end pipeline that turns CSS (and the
//! companion zml markup language) source text into an [`ast::Ast`] — a
//! flat, append-only tree of [`ast::Component`]s suitable for a downstream
//! cascade/layout stage to consume:
//!
//! - **Tokenizer** ([§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization))
//!   - All token types: ident, function, at-keyword, hash, string, url,
//!     number, dimension, etc., each carrying a [`source::Location`]
//!     rather than owned text.
//!   - Comment handling, escape sequences, and CSS's codepoint
//!     preprocessing (NUL/surrogate → U+FFFD, CR/CRLF/FF → LF).
//!
//! - **CSS Parser** ([§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing))
//!   - Stylesheets and standalone component-value lists.
//!   - Style rules, at-rules, and declarations, with `!important`
//!     detection and a back-linked declaration list per style block.
//!   - Never fails on malformed CSS: recoverable parse errors are
//!     recovered in place, exactly as CSS Syntax Level 3 specifies.
//!
//! - **zml Parser** ([`zml`]) — a small markup language describing element
//!   trees plus inline style blocks, reusing the CSS tokenizer and the
//!   Ast's zml-specific component tags. Unlike the CSS parser, it fails
//!   fast with a precise source location.
//!
//! # Not in scope
//!
//! Selector matching, cascade resolution, computed styles, layout, and
//! painting are deliberately external to this crate — they consume the
//! [`ast::Ast`] this crate produces but are orthogonal pipeline stages.
//! Media queries, gradients, animations/transitions, and custom-property
//! substitution are not implemented here either.

/// The flat, append-only component store both parsers write into, and the
/// component/tag/extra types it is built from.
pub mod ast;
/// The error taxonomy for the tokenizer, Ast builder, identifier set, CSS
/// parser, and zml parser.
pub mod error;
/// The compile-time prefix-tree matcher used to recognize at-rule names,
/// unit names, and the `url` keyword.
pub mod ident_matcher;
/// A deduplicating interner for identifier-shaped strings, keyed by a
/// codepoint iterator rather than a borrowed `&str`.
pub mod identifier_set;
/// The stack-driven CSS parser: stylesheets, component-value lists, rules,
/// at-rules, and declarations.
pub mod parser;
/// `SourceCode` and `Location`: a validated UTF-8 byte buffer and the
/// opaque byte-offset cursor the tokenizer and parsers operate on.
pub mod source;
/// The `Token` sum type the tokenizer emits.
pub mod token;
/// The pull-model tokenizer: `next(source, location) -> (Token, Location)`.
pub mod tokenizer;
/// The zml markup parser: element trees with features and inline styles.
pub mod zml;

pub use ast::{Ast, Component, Extra, Tag};
pub use error::{AstError, CssParseError, IdentifierSetError, TokenizeError, ZmlErrorCause, ZmlParseError};
pub use identifier_set::IdentifierSet;
pub use parser::{parse_list_of_component_values, parse_stylesheet, Parser};
pub use source::{Location, SourceCode};
pub use token::{Token, TokenKind};
pub use zml::ZmlParser;
