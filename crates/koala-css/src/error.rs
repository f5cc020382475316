//! Error taxonomy for the tokenizer, Ast builder, parser, and zml parser.
//!
//! Kinds, not type names, per the error model this crate must reproduce:
//! CSS syntax "parse errors" are always recoverable and never surface here
//! (the CSS parser's principle is to never fail the parse on malformed CSS).
//! What *does* surface is UTF-8 decode failure, Ast/identifier-set overflow,
//! and zml's fast-fail `{ cause, location }` errors.

use crate::source::Location;
use thiserror::Error;

/// UTF-8 decode failure surfaced while scanning a [`crate::source::SourceCode`].
///
/// The only way tokenization itself can fail (§4.1): CSS parse errors in the
/// spec sense produce recovered tokens instead, never this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenizeError {
    /// The byte sequence ended in the middle of a multi-byte codepoint.
    #[error("unexpected end of input inside a UTF-8 sequence at byte {0}")]
    Utf8Eof(usize),
    /// A byte could not start any valid UTF-8 sequence.
    #[error("invalid UTF-8 start byte at byte {0}")]
    Utf8InvalidStartByte(usize),
    /// A continuation byte did not have the `10xxxxxx` pattern.
    #[error("invalid UTF-8 continuation byte at byte {0}")]
    Utf8InvalidContinuationByte(usize),
    /// The byte sequence encoded a codepoint using more bytes than necessary,
    /// or encoded a surrogate or an out-of-range codepoint.
    #[error("overlong or out-of-range UTF-8 sequence at byte {0}")]
    Utf8Overlong(usize),
}

/// Failure to append to an [`crate::ast::Ast`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AstError {
    /// The Ast already holds `u32::MAX` components; appending one more
    /// would make indices ambiguous with the sentinel used internally.
    #[error("ast component count would exceed u32::MAX")]
    Overflow,
}

/// Failure to insert into an [`crate::identifier_set::IdentifierSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IdentifierSetError {
    /// Insertion would exceed the set's configured `max_size`.
    #[error("identifier set is full")]
    Overflow,
}

/// The only ways `Parser::parse_stylesheet`/`parse_list_of_component_values`
/// can fail. Malformed CSS syntax is never one of them (§4.3.4, §7): it is
/// recovered in place and the parse continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CssParseError {
    /// The underlying source was not valid UTF-8.
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),
    /// The Ast overflowed its `u32` index space.
    #[error(transparent)]
    Ast(#[from] AstError),
}

/// Every fast-fail condition the zml parser can report (§4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ZmlErrorCause {
    /// A `{` appeared with no preceding feature.
    #[error("element has no features")]
    ElementWithNoFeatures,
    /// `*` was combined with any other feature.
    #[error("`*` cannot be combined with other features")]
    EmptyWithOtherFeatures,
    /// More than one type (bare ident) feature appeared on one element.
    #[error("element has more than one type feature")]
    MultipleTypes,
    /// An inline style block appeared before any feature.
    #[error("inline style block appeared before any feature")]
    InlineStyleBlockBeforeFeatures,
    /// More than one `( ... )` inline style block appeared on one element.
    #[error("element has more than one inline style block")]
    MultipleInlineStyleBlocks,
    /// Two features were not separated by whitespace or a comment.
    #[error("missing space between features")]
    MissingSpaceBetweenFeatures,
    /// Element nesting exceeded the configured limit.
    #[error("element nesting depth limit reached")]
    ElementDepthLimitReached,
    /// `{ }`/`( )` nesting exceeded the configured limit.
    #[error("block nesting depth limit reached")]
    BlockDepthLimitReached,
    /// A declaration's value was empty (or only `!important`).
    #[error("declaration value is empty")]
    EmptyDeclarationValue,
    /// An inline style block `( )` had no declarations in it.
    #[error("inline style block is empty")]
    EmptyInlineStyleBlock,
    /// A declaration was missing its `:`.
    #[error("expected `:`")]
    ExpectedColon,
    /// A feature or declaration name was expected but not found.
    #[error("expected an identifier")]
    ExpectedIdentifier,
    /// A `[ ... ]` attribute feature, or other feature syntax, was malformed.
    #[error("invalid feature")]
    InvalidFeature,
    /// A token could not begin any valid zml construct at this position.
    #[error("invalid token")]
    InvalidToken,
    /// Input ended while a construct was still open.
    #[error("unexpected end of input")]
    UnexpectedEof,
    /// The underlying source was not valid UTF-8.
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),
    /// The Ast overflowed its `u32` index space.
    #[error(transparent)]
    Ast(#[from] AstError),
    /// The shared feature-name [`crate::identifier_set::IdentifierSet`] is full.
    #[error(transparent)]
    IdentifierSet(#[from] IdentifierSetError),
}

/// A zml syntax error: fatal, with a precise source [`Location`] (§4.4, §7).
///
/// Unlike CSS syntax errors, zml is authored by hand for this tool, so the
/// zml parser's principle is to fail fast rather than recover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{cause} at {location:?}")]
pub struct ZmlParseError {
    /// What went wrong.
    pub cause: ZmlErrorCause,
    /// Where it went wrong.
    pub location: Location,
}
