//! The tokenizer: `next(source, location) -> (Token, new_location)`,
//! turning a `SourceCode` span starting at `Location` into a single CSS
//! token and advancing `Location`.
//!
//! Each production's doc comment quotes the relevant bit of CSS Syntax
//! Level 3 §4.3. This is a pull model: one call in, one token plus the
//! next `Location` out, no persistent tokenizer state between calls.
//! String/URL contents are not materialized into owned `String`s — a
//! [`crate::token::Token`] carries only a [`Location`] (and, where the
//! grammar demands it, a [`crate::ident_matcher::IdentMatcher`] result
//! computed in the same pass that would otherwise have built the
//! `String`).

use crate::ident_matcher::{IdentMatcher, AT_RULE_KEYWORDS, UNIT_KEYWORDS, URL_KEYWORD};
use crate::source::SourceCode;
use crate::source::Location;
use crate::token::{Token, TokenKind};

/// [§ 4.3.1 Consume a token](https://www.w3.org/TR/css-syntax-3/#consume-token)
///
/// Produce the single token starting at `location`, and the location
/// immediately after it. Infallible: `source` having already validated
/// its bytes as UTF-8 means every `Location` this function reaches is a
/// valid decode point.
#[must_use]
pub fn next(source: &SourceCode<'_>, location: Location) -> (Token, Location) {
    let mut scanner = Scanner { source, pos: location };
    let start = location;

    // "Consume comments." A maximal *adjacent* run collapses to one token;
    // whitespace between comment blocks is a separate `Whitespace` token,
    // not swallowed here.
    if scanner.peek() == Some('/') && scanner.peek_at(1) == Some('*') {
        scanner.consume_comments_run();
        return (token(start, TokenKind::Comments), scanner.pos);
    }

    let c = match scanner.consume() {
        Some(c) => c,
        None => return (token(start, TokenKind::Eof), scanner.pos),
    };

    let kind = match c {
        c if is_whitespace(c) => {
            scanner.consume_whitespace();
            TokenKind::Whitespace
        }

        '"' => scanner.consume_string_token('"'),
        '\'' => scanner.consume_string_token('\''),

        '#' => {
            if scanner
                .peek()
                .map(is_ident_code_point)
                .unwrap_or(false)
                || scanner.is_valid_escape(Some('#'), scanner.peek())
            {
                if scanner.would_start_ident_sequence() {
                    scanner.consume_ident_sequence();
                    TokenKind::HashId
                } else {
                    scanner.consume_ident_sequence();
                    TokenKind::HashUnrestricted
                }
            } else {
                TokenKind::Delim('#')
            }
        }

        '(' => TokenKind::LeftParen,
        ')' => TokenKind::RightParen,

        '+' => {
            if scanner.would_start_number() {
                scanner.reconsume(c);
                scanner.consume_numeric_token()
            } else {
                TokenKind::Delim('+')
            }
        }

        ',' => TokenKind::Comma,

        '-' => {
            if scanner.would_start_number() {
                scanner.reconsume(c);
                scanner.consume_numeric_token()
            } else if scanner.peek() == Some('-') && scanner.peek_at(1) == Some('>') {
                let _ = scanner.consume();
                let _ = scanner.consume();
                TokenKind::Cdc
            } else if scanner.would_start_ident_sequence_with(Some('-')) {
                scanner.reconsume(c);
                scanner.consume_ident_like_token()
            } else {
                TokenKind::Delim('-')
            }
        }

        '.' => {
            if scanner.would_start_number() {
                scanner.reconsume(c);
                scanner.consume_numeric_token()
            } else {
                TokenKind::Delim('.')
            }
        }

        ':' => TokenKind::Colon,
        ';' => TokenKind::Semicolon,

        '<' => {
            if scanner.peek() == Some('!')
                && scanner.peek_at(1) == Some('-')
                && scanner.peek_at(2) == Some('-')
            {
                let _ = scanner.consume();
                let _ = scanner.consume();
                let _ = scanner.consume();
                TokenKind::Cdo
            } else {
                TokenKind::Delim('<')
            }
        }

        '@' => {
            if scanner.would_start_ident_sequence() {
                let (_, matched) = scanner.consume_ident_sequence_matching(&AT_RULE_KEYWORDS);
                TokenKind::AtKeyword { matched }
            } else {
                TokenKind::Delim('@')
            }
        }

        '[' => TokenKind::LeftSquare,

        '\\' => {
            if scanner.is_valid_escape(Some('\\'), scanner.peek()) {
                scanner.reconsume(c);
                scanner.consume_ident_like_token()
            } else {
                TokenKind::Delim('\\')
            }
        }

        ']' => TokenKind::RightSquare,
        '{' => TokenKind::LeftCurly,
        '}' => TokenKind::RightCurly,

        c if c.is_ascii_digit() => {
            scanner.reconsume(c);
            scanner.consume_numeric_token()
        }

        c if is_ident_start_code_point(c) => {
            scanner.reconsume(c);
            scanner.consume_ident_like_token()
        }

        c => TokenKind::Delim(c),
    };

    (token(start, kind), scanner.pos)
}

fn token(location: Location, kind: TokenKind) -> Token {
    Token { location, kind }
}

/// Per-call scanning state. Never persisted between [`next`] calls — the
/// only thing that survives a call is the `Location` it returns.
struct Scanner<'a, 'b> {
    source: &'a SourceCode<'b>,
    pos: Location,
}

impl Scanner<'_, '_> {
    fn consume(&mut self) -> Option<char> {
        let decoded = self.source.decode_at(self.pos)?;
        self.pos = decoded.next;
        Some(decoded.codepoint)
    }

    /// Put back a single just-consumed codepoint `c`. The CSS Syntax
    /// algorithms never reconsume more than the immediately previous
    /// codepoint, so recomputing its byte length is enough to step back.
    fn reconsume(&mut self, c: char) {
        self.pos = Location::from_offset(self.pos.offset() - c.len_utf8() as u32);
    }

    fn peek(&self) -> Option<char> {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        let mut pos = self.pos;
        let mut result = None;
        for _ in 0..=offset {
            let decoded = self.source.decode_at(pos)?;
            result = Some(decoded.codepoint);
            pos = decoded.next;
        }
        result
    }

    /// [§ 4.3.2 Consume comments](https://www.w3.org/TR/css-syntax-3/#consume-comment)
    fn consume_comments_run(&mut self) {
        while self.peek() == Some('/') && self.peek_at(1) == Some('*') {
            let _ = self.consume();
            let _ = self.consume();
            loop {
                match self.consume() {
                    Some('*') if self.peek() == Some('/') => {
                        let _ = self.consume();
                        break;
                    }
                    Some(_) => continue,
                    None => break,
                }
            }
        }
    }

    fn consume_whitespace(&mut self) {
        while self.peek().map(is_whitespace).unwrap_or(false) {
            let _ = self.consume();
        }
    }

    /// [§ 4.3.4 Consume a string token](https://www.w3.org/TR/css-syntax-3/#consume-string-token)
    fn consume_string_token(&mut self, ending: char) -> TokenKind {
        loop {
            match self.consume() {
                Some(c) if c == ending => return TokenKind::String,
                None => return TokenKind::String,
                Some('\n') => {
                    self.reconsume('\n');
                    return TokenKind::BadString;
                }
                Some('\\') => match self.peek() {
                    None => {}
                    Some('\n') => {
                        let _ = self.consume();
                    }
                    Some(_) => {
                        let _ = self.consume_escaped_code_point();
                    }
                },
                Some(_) => {}
            }
        }
    }

    /// [§ 4.3.5 Consume a numeric token](https://www.w3.org/TR/css-syntax-3/#consume-numeric-token)
    fn consume_numeric_token(&mut self) -> TokenKind {
        let (value, int_value, is_integer) = self.consume_number();

        if self.would_start_ident_sequence() {
            let unit_location = self.pos;
            let (_, unit) = self.consume_ident_sequence_matching(&UNIT_KEYWORDS);
            TokenKind::Dimension {
                value,
                unit_location,
                unit,
            }
        } else if self.peek() == Some('%') {
            let _ = self.consume();
            TokenKind::Percentage(value)
        } else if is_integer {
            TokenKind::Integer(int_value)
        } else {
            TokenKind::Number(value)
        }
    }

    /// [§ 4.3.6 Consume an ident-like token](https://www.w3.org/TR/css-syntax-3/#consume-ident-like-token)
    fn consume_ident_like_token(&mut self) -> TokenKind {
        let (_, matched_url) = self.consume_ident_sequence_matching(&URL_KEYWORD);
        if matched_url.is_some() && self.peek() == Some('(') {
            let _ = self.consume();
            self.consume_whitespace();
            match self.peek() {
                Some('"') | Some('\'') => TokenKind::Function,
                _ => self.consume_url_token(),
            }
        } else if self.peek() == Some('(') {
            let _ = self.consume();
            TokenKind::Function
        } else {
            TokenKind::Ident
        }
    }

    /// [§ 4.3.7 Consume a url token](https://www.w3.org/TR/css-syntax-3/#consume-url-token)
    fn consume_url_token(&mut self) -> TokenKind {
        self.consume_whitespace();
        loop {
            match self.consume() {
                Some(')') => return TokenKind::Url,
                None => return TokenKind::Url,
                Some(c) if is_whitespace(c) => {
                    self.consume_whitespace();
                    match self.peek() {
                        Some(')') => {
                            let _ = self.consume();
                            return TokenKind::Url;
                        }
                        None => return TokenKind::Url,
                        _ => {
                            self.consume_bad_url_remnants();
                            return TokenKind::BadUrl;
                        }
                    }
                }
                Some('"') | Some('\'') | Some('(') => {
                    self.consume_bad_url_remnants();
                    return TokenKind::BadUrl;
                }
                Some('\\') => {
                    if self.is_valid_escape(Some('\\'), self.peek()) {
                        let _ = self.consume_escaped_code_point();
                    } else {
                        self.consume_bad_url_remnants();
                        return TokenKind::BadUrl;
                    }
                }
                Some(_) => {}
            }
        }
    }

    /// [§ 4.3.14 Consume the remnants of a bad url](https://www.w3.org/TR/css-syntax-3/#consume-remnants-of-bad-url)
    fn consume_bad_url_remnants(&mut self) {
        loop {
            match self.consume() {
                Some(')') | None => return,
                Some('\\') => {
                    if self.is_valid_escape(Some('\\'), self.peek()) {
                        let _ = self.consume_escaped_code_point();
                    }
                }
                _ => continue,
            }
        }
    }

    /// [§ 4.3.11 Consume an ident sequence](https://www.w3.org/TR/css-syntax-3/#consume-name)
    fn consume_ident_sequence(&mut self) -> Location {
        loop {
            match self.peek() {
                Some(c) if is_ident_code_point(c) => {
                    let _ = self.consume();
                }
                Some('\\') if self.is_valid_escape(Some('\\'), self.peek_at(1)) => {
                    let _ = self.consume();
                    let _ = self.consume_escaped_code_point();
                }
                _ => break,
            }
        }
        self.pos
    }

    /// Same consumption as [`Scanner::consume_ident_sequence`], feeding
    /// every decoded codepoint (escapes included) through an
    /// [`IdentMatcher`] over `table` as it goes, feeding the matcher as it
    /// scans.
    fn consume_ident_sequence_matching<T: Copy + 'static, const N: usize>(
        &mut self,
        table: &'static [(&'static str, T); N],
    ) -> (Location, Option<T>) {
        let mut matcher = IdentMatcher::new(table);
        loop {
            match self.peek() {
                Some(c) if is_ident_code_point(c) => {
                    let _ = self.consume();
                    matcher.feed(c);
                }
                Some('\\') if self.is_valid_escape(Some('\\'), self.peek_at(1)) => {
                    let _ = self.consume();
                    if let Some(c) = self.consume_escaped_code_point() {
                        matcher.feed(c);
                    }
                }
                _ => break,
            }
        }
        (self.pos, matcher.finish())
    }

    /// [§ 4.3.12 Consume a number](https://www.w3.org/TR/css-syntax-3/#consume-number)
    ///
    /// Returns `(value, integer_value, is_integer_type)`. `value` is
    /// `None` if the literal's value overflowed to a non-finite `f64`;
    /// `integer_value` (only meaningful for an `integer`-typed literal,
    /// i.e. `is_integer_type`) is `None` if it overflowed `i32`.
    fn consume_number(&mut self) -> (crate::token::NumberValue, crate::token::IntegerValue, bool) {
        let mut is_integer = true;
        let mut repr = String::new();

        if self.peek() == Some('+') || self.peek() == Some('-') {
            repr.push(self.consume().expect("peeked"));
        }
        while self.peek().map(|c| c.is_ascii_digit()).unwrap_or(false) {
            repr.push(self.consume().expect("peeked"));
        }

        if self.peek() == Some('.') && self.peek_at(1).map(|c| c.is_ascii_digit()).unwrap_or(false) {
            repr.push(self.consume().expect("peeked"));
            repr.push(self.consume().expect("peeked"));
            is_integer = false;
            while self.peek().map(|c| c.is_ascii_digit()).unwrap_or(false) {
                repr.push(self.consume().expect("peeked"));
            }
        }

        if self.peek() == Some('e') || self.peek() == Some('E') {
            let next = self.peek_at(1);
            let has_sign = next == Some('+') || next == Some('-');
            let digit_pos = if has_sign { 2 } else { 1 };
            if self.peek_at(digit_pos).map(|c| c.is_ascii_digit()).unwrap_or(false) {
                repr.push(self.consume().expect("peeked"));
                if has_sign {
                    repr.push(self.consume().expect("peeked"));
                }
                repr.push(self.consume().expect("peeked"));
                is_integer = false;
                while self.peek().map(|c| c.is_ascii_digit()).unwrap_or(false) {
                    repr.push(self.consume().expect("peeked"));
                }
            }
        }

        let value = repr.parse::<f64>().ok().filter(|v| v.is_finite());
        let int_value = if is_integer { repr.parse::<i32>().ok() } else { None };

        (value, int_value, is_integer)
    }

    /// [§ 4.3.13 Consume an escaped code point](https://www.w3.org/TR/css-syntax-3/#consume-escaped-code-point)
    fn consume_escaped_code_point(&mut self) -> Option<char> {
        match self.consume() {
            Some(c) if c.is_ascii_hexdigit() => {
                let mut hex = String::new();
                hex.push(c);
                for _ in 0..5 {
                    if self.peek().map(|c| c.is_ascii_hexdigit()).unwrap_or(false) {
                        hex.push(self.consume().expect("peeked"));
                    } else {
                        break;
                    }
                }
                if self.peek().map(is_whitespace).unwrap_or(false) {
                    let _ = self.consume();
                }
                let code_point = u32::from_str_radix(&hex, 16).unwrap_or(0xFFFD);
                if code_point == 0 || (0xD800..=0xDFFF).contains(&code_point) || code_point > 0x10FFFF {
                    Some('\u{FFFD}')
                } else {
                    char::from_u32(code_point)
                }
            }
            None => Some('\u{FFFD}'),
            Some(c) => Some(c),
        }
    }

    /// [§ 4.3.8 Check if two code points are a valid escape](https://www.w3.org/TR/css-syntax-3/#starts-with-a-valid-escape)
    fn is_valid_escape(&self, first: Option<char>, second: Option<char>) -> bool {
        first == Some('\\') && second != Some('\n')
    }

    /// [§ 4.3.9 Check if three code points would start an ident sequence](https://www.w3.org/TR/css-syntax-3/#would-start-an-identifier)
    fn would_start_ident_sequence(&self) -> bool {
        self.would_start_ident_sequence_with(self.peek())
    }

    fn would_start_ident_sequence_with(&self, first: Option<char>) -> bool {
        match first {
            Some('-') => {
                let second = self.peek_at(1);
                second.map(is_ident_start_code_point).unwrap_or(false)
                    || second == Some('-')
                    || self.is_valid_escape(second, self.peek_at(2))
            }
            Some(c) if is_ident_start_code_point(c) => true,
            Some('\\') => self.is_valid_escape(Some('\\'), self.peek_at(1)),
            _ => false,
        }
    }

    /// [§ 4.3.10 Check if three code points would start a number](https://www.w3.org/TR/css-syntax-3/#starts-with-a-number)
    fn would_start_number(&self) -> bool {
        match self.peek() {
            Some('+') | Some('-') => {
                let second = self.peek_at(1);
                if second.map(|c| c.is_ascii_digit()).unwrap_or(false) {
                    return true;
                }
                if second == Some('.') {
                    return self.peek_at(2).map(|c| c.is_ascii_digit()).unwrap_or(false);
                }
                false
            }
            Some('.') => self.peek_at(1).map(|c| c.is_ascii_digit()).unwrap_or(false),
            Some(c) if c.is_ascii_digit() => true,
            _ => false,
        }
    }
}

/// [§ 4.2 Definitions - whitespace](https://www.w3.org/TR/css-syntax-3/#whitespace)
fn is_whitespace(c: char) -> bool {
    matches!(c, '\n' | '\t' | ' ')
}

/// [§ 4.2 Definitions - ident-start code point](https://www.w3.org/TR/css-syntax-3/#ident-start-code-point)
fn is_ident_start_code_point(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

/// [§ 4.2 Definitions - ident code point](https://www.w3.org/TR/css-syntax-3/#ident-code-point)
fn is_ident_code_point(c: char) -> bool {
    is_ident_start_code_point(c) || c.is_ascii_digit() || c == '-'
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ident_matcher::{AtRuleKeyword, UnitKeyword};

    fn tokens(input: &str) -> Vec<TokenKind> {
        let source = SourceCode::new(input.as_bytes()).unwrap();
        let mut loc = Location::START;
        let mut out = Vec::new();
        loop {
            let (token, next) = next(&source, loc);
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
    fn ident_and_function() {
        assert_eq!(tokens("foo"), vec![TokenKind::Ident, TokenKind::Eof]);
        assert_eq!(tokens("foo("), vec![TokenKind::Function, TokenKind::Eof]);
    }

    #[test]
    fn at_keyword_matches_known_rule() {
        assert_eq!(
            tokens("@media"),
            vec![
                TokenKind::AtKeyword {
                    matched: Some(AtRuleKeyword::Media)
                },
                TokenKind::Eof
            ]
        );
        assert_eq!(
            tokens("@frobnicate"),
            vec![TokenKind::AtKeyword { matched: None }, TokenKind::Eof]
        );
    }

    #[test]
    fn whitespace_run_collapses() {
        assert_eq!(tokens("  \t\n "), vec![TokenKind::Whitespace, TokenKind::Eof]);
    }

    #[test]
    fn adjacent_comments_collapse_but_whitespace_between_does_not() {
        assert_eq!(
            tokens("/*a*//*b*/"),
            vec![TokenKind::Comments, TokenKind::Eof]
        );
        assert_eq!(
            tokens("/*a*/ /*b*/"),
            vec![
                TokenKind::Comments,
                TokenKind::Whitespace,
                TokenKind::Comments,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn unterminated_comment_still_yields_comments_token() {
        assert_eq!(tokens("/* oops"), vec![TokenKind::Comments, TokenKind::Eof]);
    }

    #[test]
    fn string_and_bad_string() {
        assert_eq!(tokens("\"abc\""), vec![TokenKind::String, TokenKind::Eof]);
        assert_eq!(
            tokens("\"abc\ndef\""),
            vec![
                TokenKind::BadString,
                TokenKind::Whitespace,
                TokenKind::Ident,
                TokenKind::String,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn integer_and_number_and_percentage() {
        assert_eq!(tokens("42"), vec![TokenKind::Integer(Some(42)), TokenKind::Eof]);
        assert_eq!(tokens("4.2"), vec![TokenKind::Number(Some(4.2)), TokenKind::Eof]);
        assert_eq!(
            tokens("42%"),
            vec![TokenKind::Percentage(Some(42.0)), TokenKind::Eof]
        );
    }

    #[test]
    fn dimension_matches_known_unit() {
        let result = tokens("10px");
        match &result[0] {
            TokenKind::Dimension { value, unit, .. } => {
                assert_eq!(*value, Some(10.0));
                assert_eq!(*unit, Some(UnitKeyword::Px));
            }
            other => panic!("expected dimension, got {other:?}"),
        }
    }

    #[test]
    fn dimension_with_unknown_unit_has_no_match() {
        let result = tokens("10zz");
        match &result[0] {
            TokenKind::Dimension { unit, .. } => assert_eq!(*unit, None),
            other => panic!("expected dimension, got {other:?}"),
        }
    }

    #[test]
    fn huge_integer_overflows_to_null() {
        assert_eq!(
            tokens("99999999999999999999"),
            vec![TokenKind::Integer(None), TokenKind::Eof]
        );
    }

    #[test]
    fn cdo_and_cdc() {
        assert_eq!(tokens("<!--"), vec![TokenKind::Cdo, TokenKind::Eof]);
        assert_eq!(tokens("-->"), vec![TokenKind::Cdc, TokenKind::Eof]);
    }

    #[test]
    fn url_token_vs_quoted_function() {
        assert_eq!(tokens("url(a.png)"), vec![TokenKind::Url, TokenKind::Eof]);
        assert_eq!(
            tokens("url(\"a.png\")"),
            vec![
                TokenKind::Function,
                TokenKind::String,
                TokenKind::RightParen,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn bad_url_recovers_at_next_right_paren() {
        assert_eq!(
            tokens("url(a b)"),
            vec![TokenKind::BadUrl, TokenKind::Eof]
        );
    }

    #[test]
    fn hash_id_vs_unrestricted() {
        assert_eq!(tokens("#foo"), vec![TokenKind::HashId, TokenKind::Eof]);
        assert_eq!(
            tokens("#123"),
            vec![TokenKind::HashUnrestricted, TokenKind::Eof]
        );
    }

    #[test]
    fn delim_for_unmatched_codepoints() {
        assert_eq!(tokens("~"), vec![TokenKind::Delim('~'), TokenKind::Eof]);
    }
}
