//! The zml Parser: consumes the same CSS tokens as [`crate::parser`] but
//! recognizes a simpler grammar — nested elements with features and an
//! optional inline style block — reusing the CSS parser's
//! declaration-scanning machinery and the Ast's zml tags.
//!
//! Grounded directly on this crate's own [`crate::parser`] for the token
//! cursor, the `!important` 3-slot look-behind, and the bracket-matching
//! helpers, and on [`crate::identifier_set`] for the larger dynamic-set
//! interning class names need as the motivating example.
//!
//! Unlike the CSS parser, zml fails fast: the first malformed construct
//! aborts the parse with a precise [`Location`] rather than recovering.
//! Element and block nesting are each bounded (fixed caps of 1000 and 32)
//! so a pathological input cannot blow the real call stack —
//! `parse_element` recurses once per nested `{ }`, checked against the
//! cap before every recursive call; bracket nesting inside a single
//! declaration's value (a local stack, reused here via
//! [`parser::dispatch_component_value`]) counts toward the *same*
//! block-depth budget, since that is the one place a document could nest
//! arbitrarily deep without any corresponding element nesting at all.

use crate::ast::{Ast, Extra, Tag};
use crate::error::ZmlParseError;
use crate::identifier_set::IdentifierSet;
use crate::parser::{self, Closer, TokenCursor};
use crate::source::{Location, SourceCode};
use crate::token::{Token, TokenKind};

/// Element nesting cap: `element_depth_limit_reached`.
const DEFAULT_ELEMENT_DEPTH_LIMIT: u32 = 1000;
/// `{ }`/`( )` nesting cap: `block_depth_limit_reached`.
const DEFAULT_BLOCK_DEPTH_LIMIT: u32 = 32;

/// Parse `bytes` as a zml document, using the default depth limits.
///
/// # Errors
///
/// Returns [`ZmlParseError`] on the first malformed construct, or on
/// invalid UTF-8 / Ast overflow / identifier-set overflow. Unlike the
/// CSS parser, there is no recovery: zml documents are hand-authored and
/// a malformed one should be rejected outright rather than patched up.
pub fn parse(bytes: &[u8]) -> Result<Ast, ZmlParseError> {
    ZmlParser::new().parse(bytes)
}

/// A configured zml parser. The only configuration is the element and
/// block nesting caps, exposed as constructor parameters so embedding
/// code and tests can exercise the limit edge cases without
/// pathologically deep input.
#[derive(Debug, Clone, Copy)]
pub struct ZmlParser {
    element_depth_limit: u32,
    block_depth_limit: u32,
}

impl Default for ZmlParser {
    fn default() -> ZmlParser {
        ZmlParser::new()
    }
}

impl ZmlParser {
    /// A parser using the spec's default caps: 1000 elements deep, 32
    /// brackets deep.
    #[must_use]
    pub fn new() -> ZmlParser {
        ZmlParser {
            element_depth_limit: DEFAULT_ELEMENT_DEPTH_LIMIT,
            block_depth_limit: DEFAULT_BLOCK_DEPTH_LIMIT,
        }
    }

    /// A parser with caller-chosen nesting caps.
    #[must_use]
    pub fn with_limits(element_depth_limit: u32, block_depth_limit: u32) -> ZmlParser {
        ZmlParser {
            element_depth_limit,
            block_depth_limit,
        }
    }

    /// Parse `bytes` as a zml document (`document = element*`).
    ///
    /// # Errors
    ///
    /// See [`parse`].
    pub fn parse(self, bytes: &[u8]) -> Result<Ast, ZmlParseError> {
        let source = SourceCode::new(bytes).map_err(|err| ZmlParseError {
            cause: err.into(),
            location: Location::START,
        })?;
        let mut ast = Ast::new();
        let mut cursor = TokenCursor::new(&source);
        let mut names = IdentifierSet::new(true, u32::MAX);

        let doc_index = complex(&mut ast, Tag::ZmlDocument, Location::START)?;
        loop {
            parser::skip_whitespace_and_comments(&mut cursor);
            if matches!(cursor.peek().kind, TokenKind::Eof) {
                break;
            }
            self.parse_element(&mut ast, &mut cursor, &source, &mut names, 1)?;
        }
        ast.finish_complex(doc_index, Extra::Undef);
        Ok(ast)
    }

    /// `element = features ( "(" inline_styles ")" )? "{" element* "}"`
    fn parse_element(
        self,
        ast: &mut Ast,
        cursor: &mut TokenCursor<'_>,
        source: &SourceCode<'_>,
        names: &mut IdentifierSet,
        element_depth: u32,
    ) -> Result<(), ZmlParseError> {
        let start = cursor.peek().location;
        if element_depth > self.element_depth_limit {
            return Err(ZmlParseError {
                cause: ZmlErrorCause::ElementDepthLimitReached,
                location: start,
            });
        }

        let element_index = complex(ast, Tag::ZmlElement, start)?;
        self.parse_features(ast, cursor, source, names, start)?;

        let mut block_depth = 0;
        self.parse_optional_styles(ast, cursor, source, &mut block_depth)?;
        self.parse_children(ast, cursor, source, names, element_depth, &mut block_depth)?;

        ast.finish_complex(element_index, Extra::Undef);
        Ok(())
    }

    /// `features = "*" | feature (<whitespace> feature)*`
    fn parse_features(
        self,
        ast: &mut Ast,
        cursor: &mut TokenCursor<'_>,
        source: &SourceCode<'_>,
        names: &mut IdentifierSet,
        element_start: Location,
    ) -> Result<(), ZmlParseError> {
        let features_index = complex(ast, Tag::ZmlFeatures, element_start)?;

        let mut saw_any = false;
        let mut saw_empty = false;
        let mut saw_type = false;
        let mut need_separator = false;

        loop {
            let tok = cursor.peek();
            match tok.kind {
                TokenKind::Whitespace | TokenKind::Comments => {
                    let _ = cursor.consume();
                    need_separator = false;
                    continue;
                }
                TokenKind::LeftParen | TokenKind::LeftCurly => break,
                TokenKind::Eof => {
                    return Err(ZmlParseError {
                        cause: ZmlErrorCause::UnexpectedEof,
                        location: tok.location,
                    });
                }
                _ => {}
            }

            if need_separator {
                return Err(ZmlParseError {
                    cause: ZmlErrorCause::MissingSpaceBetweenFeatures,
                    location: tok.location,
                });
            }

            match tok.kind {
                TokenKind::Delim('*') => {
                    let _ = cursor.consume();
                    if saw_any {
                        return Err(ZmlParseError {
                            cause: ZmlErrorCause::EmptyWithOtherFeatures,
                            location: tok.location,
                        });
                    }
                    saw_empty = true;
                    let _ = token_leaf(ast, Tag::ZmlEmpty, tok.location)?;
                }
                TokenKind::Ident => {
                    if saw_empty {
                        return Err(ZmlParseError {
                            cause: ZmlErrorCause::EmptyWithOtherFeatures,
                            location: tok.location,
                        });
                    }
                    if saw_type {
                        return Err(ZmlParseError {
                            cause: ZmlErrorCause::MultipleTypes,
                            location: tok.location,
                        });
                    }
                    saw_type = true;
                    let _ = cursor.consume();
                    let type_index = complex(ast, Tag::ZmlType, tok.location)?;
                    let _ = token_leaf(ast, Tag::Ident, tok.location)?;
                    let interned = intern_token(names, source, tok.location)?;
                    ast.finish_complex(type_index, Extra::Interned(interned));
                }
                TokenKind::Delim('.') => {
                    if saw_empty {
                        return Err(ZmlParseError {
                            cause: ZmlErrorCause::EmptyWithOtherFeatures,
                            location: tok.location,
                        });
                    }
                    let _ = cursor.consume();
                    let name = expect_ident(cursor)?;
                    let class_index = complex(ast, Tag::ZmlClass, tok.location)?;
                    let _ = token_leaf(ast, Tag::Ident, name.location)?;
                    let interned = intern_token(names, source, name.location)?;
                    ast.finish_complex(class_index, Extra::Interned(interned));
                }
                TokenKind::HashId => {
                    if saw_empty {
                        return Err(ZmlParseError {
                            cause: ZmlErrorCause::EmptyWithOtherFeatures,
                            location: tok.location,
                        });
                    }
                    let _ = cursor.consume();
                    let id_index = complex(ast, Tag::ZmlId, tok.location)?;
                    let _ = token_leaf(ast, Tag::HashId, tok.location)?;
                    let interned = intern_token(names, source, tok.location)?;
                    ast.finish_complex(id_index, Extra::Interned(interned));
                }
                TokenKind::HashUnrestricted => {
                    return Err(ZmlParseError {
                        cause: ZmlErrorCause::InvalidFeature,
                        location: tok.location,
                    });
                }
                TokenKind::LeftSquare => {
                    if saw_empty {
                        return Err(ZmlParseError {
                            cause: ZmlErrorCause::EmptyWithOtherFeatures,
                            location: tok.location,
                        });
                    }
                    self.parse_attribute_feature(ast, cursor, source, names)?;
                }
                _ => {
                    return Err(ZmlParseError {
                        cause: ZmlErrorCause::InvalidToken,
                        location: tok.location,
                    });
                }
            }

            saw_any = true;
            need_separator = true;
        }

        if !saw_any {
            let tok = cursor.peek();
            return Err(match tok.kind {
                TokenKind::LeftParen => ZmlParseError {
                    cause: ZmlErrorCause::InlineStyleBlockBeforeFeatures,
                    location: tok.location,
                },
                _ => ZmlParseError {
                    cause: ZmlErrorCause::ElementWithNoFeatures,
                    location: tok.location,
                },
            });
        }

        ast.finish_complex(features_index, Extra::Undef);
        Ok(())
    }

    /// `"[" ident ("=" (ident|string))? "]"`
    fn parse_attribute_feature(
        self,
        ast: &mut Ast,
        cursor: &mut TokenCursor<'_>,
        source: &SourceCode<'_>,
        names: &mut IdentifierSet,
    ) -> Result<(), ZmlParseError> {
        let open = cursor.consume();
        let attr_index = complex(ast, Tag::ZmlAttribute, open.location)?;

        let name = expect_ident(cursor)?;
        let _ = token_leaf(ast, Tag::Ident, name.location)?;
        let interned = intern_token(names, source, name.location)?;

        if matches!(cursor.peek().kind, TokenKind::Delim('=')) {
            let _ = cursor.consume();
            let value = cursor.peek();
            match value.kind {
                TokenKind::Ident => {
                    let _ = cursor.consume();
                    let _ = token_leaf(ast, Tag::Ident, value.location)?;
                }
                TokenKind::String => {
                    let _ = cursor.consume();
                    let _ = token_leaf(ast, Tag::String, value.location)?;
                }
                _ => {
                    return Err(ZmlParseError {
                        cause: ZmlErrorCause::InvalidFeature,
                        location: value.location,
                    });
                }
            }
        }

        let close = cursor.peek();
        if !matches!(close.kind, TokenKind::RightSquare) {
            return Err(ZmlParseError {
                cause: ZmlErrorCause::InvalidFeature,
                location: close.location,
            });
        }
        let _ = cursor.consume();

        ast.finish_complex(attr_index, Extra::Interned(interned));
        Ok(())
    }

    /// `( "(" inline_styles ")" )?`
    fn parse_optional_styles(
        self,
        ast: &mut Ast,
        cursor: &mut TokenCursor<'_>,
        source: &SourceCode<'_>,
        block_depth: &mut u32,
    ) -> Result<(), ZmlParseError> {
        parser::skip_whitespace_and_comments(cursor);
        if !matches!(cursor.peek().kind, TokenKind::LeftParen) {
            return Ok(());
        }

        let open = cursor.consume();
        *block_depth += 1;
        if *block_depth > self.block_depth_limit {
            return Err(ZmlParseError {
                cause: ZmlErrorCause::BlockDepthLimitReached,
                location: open.location,
            });
        }

        let styles_index = complex(ast, Tag::ZmlStyles, open.location)?;
        let mut last_declaration = 0u32;
        let mut count = 0u32;
        loop {
            parser::skip_whitespace_and_comments(cursor);
            let tok = cursor.peek();
            match tok.kind {
                TokenKind::RightParen => {
                    let _ = cursor.consume();
                    break;
                }
                TokenKind::Eof => {
                    return Err(ZmlParseError {
                        cause: ZmlErrorCause::UnexpectedEof,
                        location: tok.location,
                    });
                }
                TokenKind::Semicolon => {
                    let _ = cursor.consume();
                }
                _ => {
                    last_declaration = self.parse_declaration(ast, cursor, source, *block_depth, last_declaration)?;
                    count += 1;
                }
            }
        }
        *block_depth -= 1;

        if count == 0 {
            ast.shrink(styles_index);
            return Err(ZmlParseError {
                cause: ZmlErrorCause::EmptyInlineStyleBlock,
                location: open.location,
            });
        }
        ast.finish_complex(styles_index, Extra::Index(last_declaration));

        parser::skip_whitespace_and_comments(cursor);
        if matches!(cursor.peek().kind, TokenKind::LeftParen) {
            let second = cursor.peek();
            return Err(ZmlParseError {
                cause: ZmlErrorCause::MultipleInlineStyleBlocks,
                location: second.location,
            });
        }
        Ok(())
    }

    /// One `name: value (!important)?` declaration inside `( ... )`.
    ///
    /// Reuses the CSS parser's 3-slot `!important` look-behind and its
    /// back-linked-declaration-list layout, but fails fast on a missing
    /// `:` or an empty value instead of recovering.
    fn parse_declaration(
        self,
        ast: &mut Ast,
        cursor: &mut TokenCursor<'_>,
        source: &SourceCode<'_>,
        block_depth: u32,
        prev_declaration: u32,
    ) -> Result<u32, ZmlParseError> {
        let name = cursor.peek();
        if !matches!(name.kind, TokenKind::Ident) {
            return Err(ZmlParseError {
                cause: ZmlErrorCause::ExpectedIdentifier,
                location: name.location,
            });
        }
        let _ = cursor.consume();
        let decl_index = complex(ast, Tag::DeclarationNormal, name.location)?;

        parser::skip_whitespace_and_comments(cursor);
        let colon = cursor.peek();
        if !matches!(colon.kind, TokenKind::Colon) {
            return Err(ZmlParseError {
                cause: ZmlErrorCause::ExpectedColon,
                location: colon.location,
            });
        }
        let _ = cursor.consume();
        parser::skip_whitespace_and_comments(cursor);

        let (important, value_end) = self.consume_declaration_value(ast, cursor, source, block_depth)?;

        let value_start = decl_index + 1;
        if value_end <= value_start {
            ast.shrink(decl_index);
            return Err(ZmlParseError {
                cause: ZmlErrorCause::EmptyDeclarationValue,
                location: name.location,
            });
        }

        ast.shrink(value_end);
        ast.retag(
            decl_index,
            if important {
                Tag::DeclarationImportant
            } else {
                Tag::DeclarationNormal
            },
        );
        ast.finish_complex(decl_index, Extra::Index(prev_declaration));
        Ok(decl_index)
    }

    /// Scan a declaration's value up to an un-nested `;`/`)`/EOF, tracking
    /// the `!important` 3-slot look-behind the same way
    /// [`parser::consume_declaration_value`] does for the CSS parser,
    /// but enforcing `block_depth_limit` against bracket nesting *inside*
    /// the value (see this module's own doc comment for why that nesting
    /// counts toward the same budget as `{`/`(`).
    fn consume_declaration_value(
        self,
        ast: &mut Ast,
        cursor: &mut TokenCursor<'_>,
        source: &SourceCode<'_>,
        block_depth: u32,
    ) -> Result<(bool, u32), ZmlParseError> {
        let value_start = ast.len() as u32;
        let mut open: Vec<(u32, Closer)> = Vec::new();
        let mut last_three: [Option<u32>; 3] = [None, None, None];
        let mut ends: [u32; 3] = [value_start, value_start, value_start];
        let mut depth = block_depth;

        loop {
            if open.is_empty() {
                let lookahead = cursor.peek();
                if matches!(lookahead.kind, TokenKind::Semicolon | TokenKind::RightParen | TokenKind::Eof) {
                    break;
                }
            }
            let top_level = open.is_empty();
            let start_index = ast.len() as u32;
            let tok = cursor.consume();
            let is_whitespace = matches!(tok.kind, TokenKind::Whitespace | TokenKind::Comments);
            let is_eof = matches!(tok.kind, TokenKind::Eof);

            let opens = matches!(
                tok.kind,
                TokenKind::Function | TokenKind::LeftCurly | TokenKind::LeftSquare | TokenKind::LeftParen
            );
            if opens {
                depth += 1;
                if depth > self.block_depth_limit {
                    return Err(ZmlParseError {
                        cause: ZmlErrorCause::BlockDepthLimitReached,
                        location: tok.location,
                    });
                }
            }
            let closes_innermost = matches!(tok.kind, TokenKind::RightCurly | TokenKind::RightSquare | TokenKind::RightParen)
                && open.last().map(|&(_, c)| c) == Some(Closer::for_right_token(tok.kind));

            parser::dispatch_component_value(ast, &mut open, tok).map_err(|err| ZmlParseError {
                cause: err.into(),
                location: tok.location,
            })?;
            if closes_innermost {
                depth -= 1;
            }

            if top_level && !is_whitespace {
                last_three = [last_three[1], last_three[2], Some(start_index)];
                ends = [ends[1], ends[2], ast.len() as u32];
            }
            if is_eof {
                break;
            }
        }

        let important = last_three[1].zip(last_three[2]).is_some_and(|(bang_index, ident_index)| {
            let bang = ast.get(bang_index);
            let ident = ast.get(ident_index);
            matches!((bang.tag, bang.extra), (Tag::Delim, Extra::Codepoint('!')))
                && ident.tag == Tag::Ident
                && parser::ident_text_at(source, ident.location).eq_ignore_ascii_case("important")
        });
        let value_end = if important { ends[0] } else { ends[2] };
        Ok((important, value_end))
    }

    /// `"{" element* "}"`
    fn parse_children(
        self,
        ast: &mut Ast,
        cursor: &mut TokenCursor<'_>,
        source: &SourceCode<'_>,
        names: &mut IdentifierSet,
        element_depth: u32,
        block_depth: &mut u32,
    ) -> Result<(), ZmlParseError> {
        parser::skip_whitespace_and_comments(cursor);
        let open = cursor.peek();
        match open.kind {
            TokenKind::LeftCurly => {}
            TokenKind::Eof => {
                return Err(ZmlParseError {
                    cause: ZmlErrorCause::UnexpectedEof,
                    location: open.location,
                });
            }
            _ => {
                return Err(ZmlParseError {
                    cause: ZmlErrorCause::InvalidToken,
                    location: open.location,
                });
            }
        }
        let _ = cursor.consume();

        *block_depth += 1;
        if *block_depth > self.block_depth_limit {
            return Err(ZmlParseError {
                cause: ZmlErrorCause::BlockDepthLimitReached,
                location: open.location,
            });
        }

        let children_index = complex(ast, Tag::ZmlChildren, open.location)?;
        loop {
            parser::skip_whitespace_and_comments(cursor);
            let tok = cursor.peek();
            match tok.kind {
                TokenKind::RightCurly => {
                    let _ = cursor.consume();
                    break;
                }
                TokenKind::Eof => {
                    return Err(ZmlParseError {
                        cause: ZmlErrorCause::UnexpectedEof,
                        location: tok.location,
                    });
                }
                _ => self.parse_element(ast, cursor, source, names, element_depth + 1)?,
            }
        }
        *block_depth -= 1;

        ast.finish_complex(children_index, Extra::Undef);
        Ok(())
    }
}

use crate::error::ZmlErrorCause;

fn expect_ident(cursor: &mut TokenCursor<'_>) -> Result<Token, ZmlParseError> {
    let tok = cursor.peek();
    if !matches!(tok.kind, TokenKind::Ident) {
        return Err(ZmlParseError {
            cause: ZmlErrorCause::ExpectedIdentifier,
            location: tok.location,
        });
    }
    let _ = cursor.consume();
    Ok(tok)
}

fn intern_token(names: &mut IdentifierSet, source: &SourceCode<'_>, location: Location) -> Result<u32, ZmlParseError> {
    let text = parser::ident_text_at(source, location);
    names.intern(text.chars()).map_err(|err| ZmlParseError {
        cause: err.into(),
        location,
    })
}

fn complex(ast: &mut Ast, tag: Tag, location: Location) -> Result<u32, ZmlParseError> {
    ast.add_complex(tag, location).map_err(|err| ZmlParseError {
        cause: err.into(),
        location,
    })
}

fn token_leaf(ast: &mut Ast, tag: Tag, location: Location) -> Result<u32, ZmlParseError> {
    ast.add_token(tag, location, Extra::Undef).map_err(|err| ZmlParseError {
        cause: err.into(),
        location,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(ast: &Ast, index: u32) -> Vec<Tag> {
        ast.children(index).map(|i| ast.get(i).tag).collect()
    }

    #[test]
    fn empty_element_with_children() {
        let ast = parse(b"* { }").unwrap();
        assert_eq!(ast.get(0).tag, Tag::ZmlDocument);
        let element = ast.children(0).next().unwrap();
        assert_eq!(ast.get(element).tag, Tag::ZmlElement);

        let parts: Vec<u32> = ast.children(element).collect();
        // features, children (no styles block was present)
        assert_eq!(parts.len(), 2);
        let features = parts[0];
        assert_eq!(ast.get(features).tag, Tag::ZmlFeatures);
        assert_eq!(tags(&ast, features), vec![Tag::ZmlEmpty]);

        let children = parts[1];
        assert_eq!(ast.get(children).tag, Tag::ZmlChildren);
        assert_eq!(ast.children(children).count(), 0);
    }

    #[test]
    fn nested_element_with_inline_important_style() {
        let ast = parse(b"* { p1 (decl: value !important;) {} }").unwrap();
        let outer = ast.children(0).next().unwrap();
        let outer_parts: Vec<u32> = ast.children(outer).collect();
        assert_eq!(outer_parts.len(), 2);
        let outer_children = outer_parts[1];
        assert_eq!(ast.get(outer_children).tag, Tag::ZmlChildren);

        let inner = ast.children(outer_children).next().unwrap();
        let inner_parts: Vec<u32> = ast.children(inner).collect();
        assert_eq!(inner_parts.len(), 3);

        let inner_features = inner_parts[0];
        assert_eq!(tags(&ast, inner_features), vec![Tag::ZmlType]);

        let inner_styles = inner_parts[1];
        assert_eq!(ast.get(inner_styles).tag, Tag::ZmlStyles);
        let decls: Vec<u32> = ast.children(inner_styles).collect();
        assert_eq!(decls.len(), 1);
        assert_eq!(ast.get(decls[0]).tag, Tag::DeclarationImportant);
        assert_eq!(tags(&ast, decls[0]), vec![Tag::Ident]);

        let inner_children = inner_parts[2];
        assert_eq!(ast.get(inner_children).tag, Tag::ZmlChildren);
        assert_eq!(ast.children(inner_children).count(), 0);
    }

    #[test]
    fn class_id_and_attribute_features() {
        // Each feature needs its own separating whitespace (the grammar is
        // `feature (<whitespace> feature)*`); unlike a CSS compound
        // selector, "div.card" glued together is a `MissingSpaceBetweenFeatures`
        // error, not one feature list.
        let ast = parse(b"div .card #main [data-x=\"1\"] { }").unwrap();
        let element = ast.children(0).next().unwrap();
        let features = ast.children(element).next().unwrap();
        assert_eq!(
            tags(&ast, features),
            vec![Tag::ZmlType, Tag::ZmlClass, Tag::ZmlId, Tag::ZmlAttribute]
        );
    }

    #[test]
    fn element_with_no_features_before_curly_errors() {
        let err = parse(b"{ }").unwrap_err();
        assert_eq!(err.cause, ZmlErrorCause::ElementWithNoFeatures);
    }

    #[test]
    fn inline_style_block_before_features_is_distinguished() {
        let err = parse(b"(x: y) { }").unwrap_err();
        assert_eq!(err.cause, ZmlErrorCause::InlineStyleBlockBeforeFeatures);
    }

    #[test]
    fn star_combined_with_other_feature_errors() {
        // Whitespace-separated so the combination check (not the separator
        // check) is what fires.
        let err = parse(b"* .card { }").unwrap_err();
        assert_eq!(err.cause, ZmlErrorCause::EmptyWithOtherFeatures);
    }

    #[test]
    fn multiple_type_features_errors() {
        let err = parse(b"div span { }").unwrap_err();
        assert_eq!(err.cause, ZmlErrorCause::MultipleTypes);
    }

    #[test]
    fn missing_space_between_features_errors() {
        // The `.` arrives immediately after `div` with no whitespace between
        // them, so the separator check fires before any later feature (the
        // glued second `div`) could even be reached.
        let err = parse(b"div.a.b#c[x]div { }").unwrap_err();
        assert_eq!(err.cause, ZmlErrorCause::MissingSpaceBetweenFeatures);
    }

    #[test]
    fn missing_space_between_distinct_type_like_tokens_errors() {
        // Two hash features glued together with no separator.
        let err = parse(b"*#a#b { }").unwrap_err();
        assert_eq!(err.cause, ZmlErrorCause::MissingSpaceBetweenFeatures);
    }

    #[test]
    fn multiple_inline_style_blocks_errors() {
        let err = parse(b"div (a: b) (c: d) { }").unwrap_err();
        assert_eq!(err.cause, ZmlErrorCause::MultipleInlineStyleBlocks);
    }

    #[test]
    fn empty_inline_style_block_errors() {
        let err = parse(b"div () { }").unwrap_err();
        assert_eq!(err.cause, ZmlErrorCause::EmptyInlineStyleBlock);
    }

    #[test]
    fn declaration_missing_colon_errors() {
        let err = parse(b"div (oops) { }").unwrap_err();
        assert_eq!(err.cause, ZmlErrorCause::ExpectedColon);
    }

    #[test]
    fn empty_declaration_value_errors() {
        let err = parse(b"div (a: ) { }").unwrap_err();
        assert_eq!(err.cause, ZmlErrorCause::EmptyDeclarationValue);
    }

    #[test]
    fn unexpected_eof_while_seeking_open_curly() {
        let err = parse(b"div").unwrap_err();
        assert_eq!(err.cause, ZmlErrorCause::UnexpectedEof);
    }

    #[test]
    fn unclosed_element_body_errors() {
        let err = parse(b"div { span { }").unwrap_err();
        assert_eq!(err.cause, ZmlErrorCause::UnexpectedEof);
    }

    #[test]
    fn element_depth_limit_is_enforced() {
        let mut src = String::new();
        for _ in 0..5 {
            src.push_str("a {");
        }
        src.push_str(" }}}}}");
        let err = ZmlParser::with_limits(3, 32).parse(src.as_bytes()).unwrap_err();
        assert_eq!(err.cause, ZmlErrorCause::ElementDepthLimitReached);
    }

    #[test]
    fn block_depth_limit_is_enforced_on_value_brackets() {
        let mut value = String::new();
        for _ in 0..10 {
            value.push('(');
        }
        for _ in 0..10 {
            value.push(')');
        }
        let src = format!("div (a: {value}) {{ }}");
        let err = ZmlParser::with_limits(1000, 4).parse(src.as_bytes()).unwrap_err();
        assert_eq!(err.cause, ZmlErrorCause::BlockDepthLimitReached);
    }

    #[test]
    fn repeated_class_name_shares_one_interned_index() {
        let ast = parse(b"div .card { } div .card { }").unwrap();
        let elements: Vec<u32> = ast.children(0).collect();
        assert_eq!(elements.len(), 2);
        let class_of = |element: u32| {
            let features = ast.children(element).next().unwrap();
            let class = ast.children(features).nth(1).unwrap();
            ast.get(class).extra
        };
        assert_eq!(class_of(elements[0]), class_of(elements[1]));
    }
}
