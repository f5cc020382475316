//! `Token` — the sum type the tokenizer emits.
//!
//! Each variant documents the CSS Syntax Level 3 railroad-diagram text it
//! corresponds to. Every variant carries the source [`Location`] it started
//! at instead of an owned `String`, and the numeric variants carry nullable
//! payloads instead of silently falling back to zero on overflow.

use crate::ident_matcher::{AtRuleKeyword, UnitKeyword};
use crate::source::Location;

/// A numeric literal's parsed value. `None` means the literal was
/// syntactically well-formed but its value overflowed `f64` to infinity:
/// any IEEE non-normal float (non-zero) yields a null value. Tokenization
/// still succeeds; consumers must treat `None` as "invalid value,
/// tokenization succeeded".
pub type NumberValue = Option<f64>;

/// An integer literal's parsed value. `None` means the literal was
/// syntactically well-formed but its value overflowed `i32`: any integer
/// literal outside `i32` yields a null value.
pub type IntegerValue = Option<i32>;

/// [§ 4.2 Definitions](https://www.w3.org/TR/css-syntax-3/#token-diagrams)
///
/// One token: where it started in the source, and its kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token {
    /// The location of the token's first codepoint.
    pub location: Location,
    /// The token's variant and payload.
    pub kind: TokenKind,
}

/// The variant-specific part of a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenKind {
    /// "<EOF-token>"
    Eof,
    /// "<whitespace-token>" — "represents one or more whitespace code
    /// points". A maximal run of `\n \t ' '` collapses to one token.
    Whitespace,
    /// A maximal run of one or more `/* ... */` comment blocks. Whitespace
    /// between comments is its own, separate `Whitespace` token.
    Comments,
    /// "<CDO-token>" — `<!--`.
    Cdo,
    /// "<CDC-token>" — `-->`.
    Cdc,
    /// "<colon-token>" — `:`.
    Colon,
    /// "<semicolon-token>" — `;`.
    Semicolon,
    /// "<comma-token>" — `,`.
    Comma,
    /// "<(-token>"
    LeftParen,
    /// "<)-token>"
    RightParen,
    /// "<[-token>"
    LeftSquare,
    /// "<]-token>"
    RightSquare,
    /// "<{-token>"
    LeftCurly,
    /// "<}-token>"
    RightCurly,
    /// "<ident-token>". The identifier's text is recovered by re-slicing
    /// the source between this token's `location` and the location of the
    /// next token — re-tokenizing a stored `Location` reproduces the same
    /// token.
    Ident,
    /// "<function-token>" — an ident immediately followed by `(`.
    Function,
    /// "<at-keyword-token>" — `@` followed by an ident.
    AtKeyword {
        /// The at-rule name matched against the fixed keyword set, if any.
        matched: Option<AtRuleKeyword>,
    },
    /// "<hash-token>" with type flag `id`: the hash's value is itself a
    /// valid identifier.
    HashId,
    /// "<hash-token>" with type flag `unrestricted`.
    HashUnrestricted,
    /// "<string-token>"
    String,
    /// "<bad-string-token>" — a string containing an unescaped newline;
    /// the closing quote is not consumed past the newline.
    BadString,
    /// "<url-token>"
    Url,
    /// "<bad-url-token>"
    BadUrl,
    /// "<number-token>" with type flag `number` (has a fractional part
    /// and/or exponent).
    Number(NumberValue),
    /// "<number-token>" with type flag `integer`.
    Integer(IntegerValue),
    /// "<percentage-token>"
    Percentage(NumberValue),
    /// "<dimension-token>". The Ast builder emits this as two components:
    /// a `dimension` node and a child `unit` node.
    Dimension {
        /// The numeric part's value.
        value: NumberValue,
        /// Where the unit's ident sequence starts.
        unit_location: Location,
        /// The unit matched against the fixed keyword set, if any.
        unit: Option<UnitKeyword>,
    },
    /// "<delim-token>" — any other non-whitespace codepoint.
    Delim(char),
}

impl Token {
    /// Whether this is the `<EOF-token>`.
    #[must_use]
    pub fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }
}
