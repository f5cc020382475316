//! Integration tests for the CSS tokenizer.

use koala_css::source::{Location, SourceCode};
use koala_css::token::TokenKind;
use koala_css::tokenizer;

/// Tokenize a whole input and return just the token kinds, including the
/// trailing EOF.
fn tokenize(input: &str) -> Vec<TokenKind> {
    let source = SourceCode::new(input.as_bytes()).unwrap();
    let mut loc = Location::START;
    let mut out = Vec::new();
    loop {
        let (token, next) = tokenizer::next(&source, loc);
        let eof = token.is_eof();
        out.push(token.kind);
        if eof {
            break;
        }
        loc = next;
    }
    out
}

#[test]
fn test_whitespace() {
    let tokens = tokenize("   \t\n  ");
    assert_eq!(tokens, vec![TokenKind::Whitespace, TokenKind::Eof]);
}

#[test]
fn test_ident() {
    assert_eq!(tokenize("color"), vec![TokenKind::Ident, TokenKind::Eof]);
}

#[test]
fn test_ident_with_hyphen() {
    assert_eq!(
        tokenize("background-color"),
        vec![TokenKind::Ident, TokenKind::Eof]
    );
}

#[test]
fn test_ident_with_underscore() {
    assert_eq!(tokenize("_private"), vec![TokenKind::Ident, TokenKind::Eof]);
}

#[test]
fn test_function() {
    assert_eq!(tokenize("rgb("), vec![TokenKind::Function, TokenKind::Eof]);
}

#[test]
fn test_string_with_escaped_quote() {
    assert_eq!(
        tokenize(r#""a\"b""#),
        vec![TokenKind::String, TokenKind::Eof]
    );
}

#[test]
fn test_comment_is_not_whitespace() {
    assert_eq!(
        tokenize("/* comment */a"),
        vec![TokenKind::Comments, TokenKind::Ident, TokenKind::Eof]
    );
}

/// Tokenizer idempotence on re-tokenization: re-tokenizing from any
/// `Location` that appears in a token stream yields the same token at
/// that location.
#[test]
fn retokenizing_from_a_recorded_location_reproduces_the_same_token() {
    let source = SourceCode::new(b"a : 10px 'str' @media").unwrap();
    let mut loc = Location::START;
    let mut recorded = Vec::new();
    loop {
        let (token, next) = tokenizer::next(&source, loc);
        recorded.push((loc, token.kind));
        if token.is_eof() {
            break;
        }
        loc = next;
    }

    for (loc, kind) in recorded {
        let (retokenized, _) = tokenizer::next(&source, loc);
        assert_eq!(retokenized.kind, kind, "mismatch re-tokenizing at {loc:?}");
    }
}

#[test]
fn bad_string_stops_before_the_newline_and_resumes_cleanly() {
    assert_eq!(
        tokenize("\"abc\ndef\""),
        vec![
            TokenKind::BadString,
            TokenKind::Whitespace,
            TokenKind::Ident,
            TokenKind::String,
            TokenKind::Eof
        ]
    );
}
