//! The CSS Parser: a stack-driven recursive-descent consumer of tokens
//! producing an [`Ast`].
//!
//! `list_of_rules`/`qualified_rule`/`style_block`/declaration/
//! component-value consumption mirror the CSS Syntax Level 3 grammar
//! productions of the same name, but instead of mutual recursion over an
//! owned token vector producing owned `Rule`/`Declaration`/`ComponentValue`
//! trees, this parser drives an explicit frame stack over `Ast`-index
//! state and appends directly into the flat, arena-backed [`Ast`].
//!
//! Only `list_of_rules` / `qualified_rule` / `style_block` are frames on
//! the explicit stack: a qualified rule's block is a style block, which
//! can itself contain nested qualified rules (CSS nesting), which is the
//! mutual recursion the stack-driven loop exists to bound. At-rules and
//! declarations are consumed in-line within whichever frame is
//! dispatching them, because neither one can itself contain a nested
//! rule list; bracket nesting inside a single component value is tracked
//! with its own local `Vec`, not a new stack frame per level.

use koala_common::warning::warn_once;

use crate::ast::{Ast, Extra, Tag};
use crate::error::{AstError, CssParseError};
use crate::source::{Location, SourceCode};
use crate::token::{Token, TokenKind};
use crate::tokenizer;

/// Parse `bytes` as a CSS stylesheet, i.e. ["parse a
/// stylesheet"](https://www.w3.org/TR/css-syntax-3/#parse-stylesheet).
///
/// # Errors
///
/// Returns [`CssParseError::Tokenize`] if `bytes` is not valid UTF-8, or
/// [`CssParseError::Ast`] if the stylesheet's Ast would exceed `u32::MAX`
/// components. Malformed CSS syntax never fails this call — it is
/// recovered in place, per the CSS Syntax specification.
pub fn parse_stylesheet(bytes: &[u8]) -> Result<Ast, CssParseError> {
    let source = SourceCode::new(bytes)?;
    Parser::new().parse_stylesheet(&source)
}

/// Parse `bytes` as a standalone list of component values, i.e. ["parse a
/// list of component
/// values"](https://www.w3.org/TR/css-syntax-3/#parse-list-of-component-values).
///
/// # Errors
///
/// See [`parse_stylesheet`].
pub fn parse_list_of_component_values(bytes: &[u8]) -> Result<Ast, CssParseError> {
    let source = SourceCode::new(bytes)?;
    Parser::new().parse_list_of_component_values(&source)
}

/// A configured CSS parser. The only configuration is whether recoverable
/// parse errors are reported through [`koala_common::warning::warn_once`];
/// the parse result itself never depends on it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Parser {
    diagnostics: bool,
}

impl Parser {
    /// A parser that never writes diagnostics to stderr.
    #[must_use]
    pub fn new() -> Parser {
        Parser { diagnostics: false }
    }

    /// A parser that reports recovered parse errors via `warn_once("CSS",
    /// ..)`, deduplicated, the way the rest of the workspace already
    /// reports unsupported-feature warnings.
    #[must_use]
    pub fn with_diagnostics() -> Parser {
        Parser { diagnostics: true }
    }

    /// ["Parse a
    /// stylesheet"](https://www.w3.org/TR/css-syntax-3/#parse-stylesheet)
    /// from an already-validated [`SourceCode`].
    ///
    /// # Errors
    ///
    /// Returns [`CssParseError::Ast`] if the Ast would exceed `u32::MAX`
    /// components.
    pub fn parse_stylesheet(self, source: &SourceCode<'_>) -> Result<Ast, CssParseError> {
        let mut ast = Ast::new();
        let mut cursor = TokenCursor::new(source);
        let list_index = ast.add_complex(Tag::RuleList, Location::START)?;
        let mut stack = vec![Frame::RuleList {
            top_level: true,
            list_index,
        }];
        self.run(&mut ast, &mut cursor, source, &mut stack)?;
        Ok(ast)
    }

    /// ["Parse a list of component
    /// values"](https://www.w3.org/TR/css-syntax-3/#parse-list-of-component-values)
    /// from an already-validated [`SourceCode`].
    ///
    /// # Errors
    ///
    /// Returns [`CssParseError::Ast`] if the Ast would exceed `u32::MAX`
    /// components.
    pub fn parse_list_of_component_values(self, source: &SourceCode<'_>) -> Result<Ast, CssParseError> {
        let mut ast = Ast::new();
        let mut cursor = TokenCursor::new(source);
        let list_index = ast.add_complex(Tag::ComponentList, Location::START)?;
        consume_component_values_until(&mut ast, &mut cursor, |kind| matches!(kind, TokenKind::Eof))?;
        ast.finish_complex(list_index, Extra::Undef);
        Ok(ast)
    }

    /// The main dispatch loop: pop the top [`Frame`], advance it by one
    /// step, and push whatever frame (if any) that step produced. Runs
    /// until the stack empties.
    fn run(
        self,
        ast: &mut Ast,
        cursor: &mut TokenCursor<'_>,
        source: &SourceCode<'_>,
        stack: &mut Vec<Frame>,
    ) -> Result<(), CssParseError> {
        while let Some(frame) = stack.pop() {
            match frame {
                Frame::RuleList { top_level, list_index } => match self.step_rule_list(ast, cursor, top_level)? {
                    RuleListStep::Done => ast.finish_complex(list_index, Extra::Undef),
                    RuleListStep::EnterQualifiedRule(rule_index) => {
                        stack.push(Frame::RuleList { top_level, list_index });
                        stack.push(Frame::QualifiedRule {
                            rule_index,
                            phase: QualifiedRulePhase::Prelude,
                        });
                    }
                },
                Frame::QualifiedRule { rule_index, phase } => match phase {
                    QualifiedRulePhase::Prelude => {
                        consume_component_values_until(ast, cursor, |kind| matches!(kind, TokenKind::LeftCurly))?;
                        if matches!(cursor.peek().kind, TokenKind::LeftCurly) {
                            let brace = cursor.consume();
                            let block_index = ast.add_complex(Tag::StyleBlock, brace.location)?;
                            stack.push(Frame::QualifiedRule {
                                rule_index,
                                phase: QualifiedRulePhase::AwaitingBlock { block_index },
                            });
                            stack.push(Frame::StyleBlock {
                                block_index,
                                last_declaration: 0,
                            });
                        } else {
                            // "EOF before `{`: discard entire rule".
                            if self.diagnostics {
                                warn_once("CSS", "discarded a qualified rule that never reached `{`");
                            }
                            ast.shrink(rule_index);
                        }
                    }
                    QualifiedRulePhase::AwaitingBlock { block_index } => {
                        ast.finish_complex(rule_index, Extra::Index(block_index));
                    }
                },
                Frame::StyleBlock {
                    block_index,
                    last_declaration,
                } => match self.step_style_block(ast, cursor, source, last_declaration)? {
                    StyleBlockStep::Done(last) => ast.finish_complex(block_index, Extra::Index(last)),
                    StyleBlockStep::EnterNestedRule(rule_index, last) => {
                        stack.push(Frame::StyleBlock {
                            block_index,
                            last_declaration: last,
                        });
                        stack.push(Frame::QualifiedRule {
                            rule_index,
                            phase: QualifiedRulePhase::Prelude,
                        });
                    }
                },
            }
        }
        Ok(())
    }

    /// One turn of the `list_of_rules` frame: consumes
    /// whitespace, CDO/CDC, and at-rules in place, and returns control to
    /// [`Parser::run`] only once the list ends or a qualified rule needs
    /// its own frame.
    fn step_rule_list(
        self,
        ast: &mut Ast,
        cursor: &mut TokenCursor<'_>,
        top_level: bool,
    ) -> Result<RuleListStep, CssParseError> {
        loop {
            let tok = cursor.peek();
            match tok.kind {
                TokenKind::Whitespace | TokenKind::Comments => {
                    let _ = cursor.consume();
                }
                TokenKind::Eof => return Ok(RuleListStep::Done),
                TokenKind::Cdo | TokenKind::Cdc if top_level => {
                    let _ = cursor.consume();
                }
                TokenKind::AtKeyword { .. } => self.consume_at_rule_inline(ast, cursor)?,
                _ => {
                    let rule_index = ast.add_complex(Tag::QualifiedRule, tok.location)?;
                    return Ok(RuleListStep::EnterQualifiedRule(rule_index));
                }
            }
        }
    }

    /// One turn of the `style_block` frame: consumes
    /// whitespace/semicolons, at-rules, and declarations in place; returns
    /// control only at the block's end or when a nested qualified rule
    /// needs its own frame.
    fn step_style_block(
        self,
        ast: &mut Ast,
        cursor: &mut TokenCursor<'_>,
        source: &SourceCode<'_>,
        mut last_declaration: u32,
    ) -> Result<StyleBlockStep, CssParseError> {
        loop {
            let tok = cursor.peek();
            match tok.kind {
                TokenKind::Whitespace | TokenKind::Comments | TokenKind::Semicolon => {
                    let _ = cursor.consume();
                }
                TokenKind::RightCurly => {
                    let _ = cursor.consume();
                    return Ok(StyleBlockStep::Done(last_declaration));
                }
                TokenKind::Eof => return Ok(StyleBlockStep::Done(last_declaration)),
                TokenKind::AtKeyword { .. } => self.consume_at_rule_inline(ast, cursor)?,
                TokenKind::Ident => {
                    if let Some(new_last) = self.consume_declaration(ast, cursor, source, last_declaration)? {
                        last_declaration = new_last;
                    }
                }
                _ => {
                    let rule_index = ast.add_complex(Tag::QualifiedRule, tok.location)?;
                    return Ok(StyleBlockStep::EnterNestedRule(rule_index, last_declaration));
                }
            }
        }
    }

    /// [§ 5.4.2 Consume an
    /// at-rule](https://www.w3.org/TR/css-syntax-3/#consume-at-rule),
    /// entirely in-line: an at-rule's own block (if any) is an opaque
    /// [`Tag::SimpleBlockCurly`], never a nested rule list, so this never
    /// needs its own frame.
    fn consume_at_rule_inline(self, ast: &mut Ast, cursor: &mut TokenCursor<'_>) -> Result<(), CssParseError> {
        let keyword = cursor.consume();
        let matched = match keyword.kind {
            TokenKind::AtKeyword { matched } => matched,
            _ => unreachable!("only dispatched on an at-keyword token"),
        };
        let rule_index = ast.add_complex(Tag::AtRule, keyword.location)?;
        consume_component_values_until(ast, cursor, |kind| {
            matches!(kind, TokenKind::Semicolon | TokenKind::LeftCurly)
        })?;
        match cursor.peek().kind {
            TokenKind::Semicolon => {
                let _ = cursor.consume();
            }
            TokenKind::LeftCurly => {
                let brace = cursor.consume();
                let block_index = ast.add_complex(Tag::SimpleBlockCurly, brace.location)?;
                consume_component_values_until(ast, cursor, |kind| matches!(kind, TokenKind::RightCurly))?;
                if matches!(cursor.peek().kind, TokenKind::RightCurly) {
                    let _ = cursor.consume();
                }
                ast.finish_complex(block_index, Extra::Undef);
            }
            _ => {
                if self.diagnostics {
                    warn_once("CSS", "at-rule reached end of input before `;` or `{`");
                }
            }
        }
        ast.finish_complex(rule_index, Extra::AtRule(matched));
        Ok(())
    }

    /// [§ 5.4.6 Consume a
    /// declaration](https://www.w3.org/TR/css-syntax-3/#consume-declaration),
    /// entirely in-line: declarations cannot nest, so no frame is needed
    /// even though the name/value scan spans several tokens.
    ///
    /// Returns the new declaration's Ast index, or `None` if it was
    /// discarded (missing colon, or an empty/`!important`-only value).
    fn consume_declaration(
        self,
        ast: &mut Ast,
        cursor: &mut TokenCursor<'_>,
        source: &SourceCode<'_>,
        prev_declaration: u32,
    ) -> Result<Option<u32>, CssParseError> {
        let name = cursor.consume();
        debug_assert!(matches!(name.kind, TokenKind::Ident), "dispatched on an ident token");

        let decl_index = ast.add_complex(Tag::DeclarationNormal, name.location)?;

        skip_whitespace_and_comments(cursor);
        if !matches!(cursor.peek().kind, TokenKind::Colon) {
            if self.diagnostics {
                warn_once("CSS", "declaration missing `:`");
            }
            ast.shrink(decl_index);
            seek_past_declaration(ast, cursor)?;
            return Ok(None);
        }
        let _ = cursor.consume();
        skip_whitespace_and_comments(cursor);

        let (important, value_end) = consume_declaration_value(ast, cursor, source)?;
        if matches!(cursor.peek().kind, TokenKind::Semicolon) {
            let _ = cursor.consume();
        }

        let value_start = decl_index + 1;
        if value_end <= value_start {
            // "the declaration is considered empty and discarded".
            ast.shrink(decl_index);
            return Ok(None);
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
        Ok(Some(decl_index))
    }
}

pub(crate) fn skip_whitespace_and_comments(cursor: &mut TokenCursor<'_>) {
    while matches!(cursor.peek().kind, TokenKind::Whitespace | TokenKind::Comments) {
        let _ = cursor.consume();
    }
}

/// Consume component values up to (but not including) an un-nested token
/// satisfying `stop`, or end of input — whichever comes first. Bracket
/// nesting inside the scanned span is tracked with a local `Vec`, so an
/// arbitrarily deep `((((...` never grows beyond this one stack frame.
pub(crate) fn consume_component_values_until(
    ast: &mut Ast,
    cursor: &mut TokenCursor<'_>,
    stop: impl Fn(TokenKind) -> bool,
) -> Result<(), CssParseError> {
    let mut open: Vec<(u32, Closer)> = Vec::new();
    loop {
        if open.is_empty() {
            let lookahead = cursor.peek();
            if matches!(lookahead.kind, TokenKind::Eof) || stop(lookahead.kind) {
                return Ok(());
            }
        }
        let tok = cursor.consume();
        let is_eof = matches!(tok.kind, TokenKind::Eof);
        dispatch_component_value(ast, &mut open, tok)?;
        if is_eof {
            return Ok(());
        }
    }
}

/// [§ 5.4.4 Consume a declaration's
/// value](https://www.w3.org/TR/css-syntax-3/#consume-declaration), with
/// the `!important` look-behind: a 3-slot ring buffer of top-level
/// non-whitespace component indices (and
/// the Ast length immediately after each), updated once per top-level
/// component, never by re-scanning the value.
///
/// Returns `(is_important, trimmed_value_end)`: `trimmed_value_end` is the
/// Ast index one past the declaration's last kept value component.
pub(crate) fn consume_declaration_value(
    ast: &mut Ast,
    cursor: &mut TokenCursor<'_>,
    source: &SourceCode<'_>,
) -> Result<(bool, u32), CssParseError> {
    let value_start = ast.len() as u32;
    let mut open: Vec<(u32, Closer)> = Vec::new();
    let mut last_three: [Option<u32>; 3] = [None, None, None];
    let mut ends: [u32; 3] = [value_start, value_start, value_start];

    loop {
        if open.is_empty() {
            let lookahead = cursor.peek();
            if matches!(lookahead.kind, TokenKind::Semicolon | TokenKind::RightCurly | TokenKind::Eof) {
                break;
            }
        }
        let top_level = open.is_empty();
        let start_index = ast.len() as u32;
        let tok = cursor.consume();
        let is_whitespace = matches!(tok.kind, TokenKind::Whitespace | TokenKind::Comments);
        let is_eof = matches!(tok.kind, TokenKind::Eof);
        dispatch_component_value(ast, &mut open, tok)?;
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
            && ident_text_at(source, ident.location).eq_ignore_ascii_case("important")
    });
    let value_end = if important { ends[0] } else { ends[2] };
    Ok((important, value_end))
}

/// Recover from a declaration with no `:`: discard
/// whatever was scanned while seeking, and consume the terminating `;` if
/// one was found (the style block's own loop consumes `}`/EOF itself).
fn seek_past_declaration(ast: &mut Ast, cursor: &mut TokenCursor<'_>) -> Result<(), CssParseError> {
    let mark = ast.len() as u32;
    consume_component_values_until(ast, cursor, |kind| {
        matches!(kind, TokenKind::Semicolon | TokenKind::RightCurly)
    })?;
    ast.shrink(mark);
    if matches!(cursor.peek().kind, TokenKind::Semicolon) {
        let _ = cursor.consume();
    }
    Ok(())
}

/// [§ 5.4.8 Consume a component
/// value](https://www.w3.org/TR/css-syntax-3/#consume-component-value):
/// dispatch a single already-consumed token, opening or closing an entry
/// on the caller's local bracket stack as needed.
///
/// Returns a bare [`AstError`] (never wrapped in [`CssParseError`]) since
/// this never touches the tokenizer; callers in a different error domain
/// (the zml parser's fail-fast [`crate::error::ZmlParseError`]) can map it
/// directly instead of unwrapping a [`CssParseError::Ast`] they know can
/// never be [`CssParseError::Tokenize`].
pub(crate) fn dispatch_component_value(ast: &mut Ast, open: &mut Vec<(u32, Closer)>, tok: Token) -> Result<(), AstError> {
    match tok.kind {
        TokenKind::Eof => {
            // "EOF gracefully closes all unterminated blocks".
            while let Some((index, _)) = open.pop() {
                ast.finish_complex(index, Extra::Undef);
            }
        }
        TokenKind::Function => {
            let index = ast.add_complex(Tag::FunctionBlock, tok.location)?;
            open.push((index, Closer::Paren));
        }
        TokenKind::LeftCurly => {
            let index = ast.add_complex(Tag::SimpleBlockCurly, tok.location)?;
            open.push((index, Closer::Curly));
        }
        TokenKind::LeftSquare => {
            let index = ast.add_complex(Tag::SimpleBlockSquare, tok.location)?;
            open.push((index, Closer::Square));
        }
        TokenKind::LeftParen => {
            let index = ast.add_complex(Tag::SimpleBlockParen, tok.location)?;
            open.push((index, Closer::Paren));
        }
        TokenKind::RightCurly | TokenKind::RightSquare | TokenKind::RightParen => {
            let closer = Closer::for_right_token(tok.kind);
            if open.last().map(|&(_, c)| c) == Some(closer) {
                let (index, _) = open.pop().expect("checked Some above");
                ast.finish_complex(index, Extra::Undef);
            } else {
                // "Matching closers close the innermost block; mismatched closers
                // are ignored": emitted as a bare leaf.
                let _ = add_leaf(ast, tok)?;
            }
        }
        TokenKind::Dimension {
            value,
            unit_location,
            unit,
        } => {
            let _ = ast.add_dimension_token(tok.location, value, unit_location, unit)?;
        }
        _ => {
            let _ = add_leaf(ast, tok)?;
        }
    }
    Ok(())
}

/// Which bracket kind a container was opened with, used to recognize its
/// matching closer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Closer {
    Paren,
    Square,
    Curly,
}

impl Closer {
    pub(crate) fn for_right_token(kind: TokenKind) -> Closer {
        match kind {
            TokenKind::RightParen => Closer::Paren,
            TokenKind::RightSquare => Closer::Square,
            TokenKind::RightCurly => Closer::Curly,
            _ => unreachable!("only called for a right-bracket token"),
        }
    }
}

/// Append a single token as an Ast leaf (every [`TokenKind`] except
/// `Dimension`, which needs [`Ast::add_dimension_token`]'s two-node form).
pub(crate) fn add_leaf(ast: &mut Ast, tok: Token) -> Result<u32, crate::error::AstError> {
    let (tag, extra) = match tok.kind {
        TokenKind::Eof => (Tag::Eof, Extra::Undef),
        TokenKind::Whitespace => (Tag::Whitespace, Extra::Undef),
        TokenKind::Comments => (Tag::Comments, Extra::Undef),
        TokenKind::Cdo => (Tag::Cdo, Extra::Undef),
        TokenKind::Cdc => (Tag::Cdc, Extra::Undef),
        TokenKind::Colon => (Tag::Colon, Extra::Undef),
        TokenKind::Semicolon => (Tag::Semicolon, Extra::Undef),
        TokenKind::Comma => (Tag::Comma, Extra::Undef),
        TokenKind::LeftParen => (Tag::LeftParen, Extra::Undef),
        TokenKind::RightParen => (Tag::RightParen, Extra::Undef),
        TokenKind::LeftSquare => (Tag::LeftSquare, Extra::Undef),
        TokenKind::RightSquare => (Tag::RightSquare, Extra::Undef),
        TokenKind::LeftCurly => (Tag::LeftCurly, Extra::Undef),
        TokenKind::RightCurly => (Tag::RightCurly, Extra::Undef),
        TokenKind::Ident => (Tag::Ident, Extra::Undef),
        TokenKind::Function => (Tag::Function, Extra::Undef),
        TokenKind::AtKeyword { matched } => (Tag::AtKeyword, Extra::AtRule(matched)),
        TokenKind::HashId => (Tag::HashId, Extra::Undef),
        TokenKind::HashUnrestricted => (Tag::HashUnrestricted, Extra::Undef),
        TokenKind::String => (Tag::String, Extra::Undef),
        TokenKind::BadString => (Tag::BadString, Extra::Undef),
        TokenKind::Url => (Tag::Url, Extra::Undef),
        TokenKind::BadUrl => (Tag::BadUrl, Extra::Undef),
        TokenKind::Number(value) => (Tag::Number, Extra::Number(value)),
        TokenKind::Integer(value) => (Tag::Integer, Extra::Integer(value)),
        TokenKind::Percentage(value) => (Tag::Percentage, Extra::Number(value)),
        TokenKind::Delim(c) => (Tag::Delim, Extra::Codepoint(c)),
        TokenKind::Dimension { .. } => unreachable!("dimension tokens use add_dimension_token"),
    };
    ast.add_token(tag, tok.location, extra)
}

/// Recover an ident token's source text by re-tokenizing from its
/// location — re-tokenizing a stored [`Location`] reproduces the same
/// token. No escape decoding is applied — the same convention
/// [`crate::token::TokenKind::Ident`] already documents for ident text in
/// general.
pub(crate) fn ident_text_at<'a>(source: &SourceCode<'a>, location: Location) -> &'a str {
    let (_, end) = tokenizer::next(source, location);
    let bytes = &source.bytes()[location.offset() as usize..end.offset() as usize];
    core::str::from_utf8(bytes).expect("source was validated as UTF-8 by SourceCode::new")
}

/// One level of the explicit parser frame stack. Only
/// container kinds whose contents can mutually nest are frames; at-rules
/// and declarations are consumed in-line (see [`Parser::consume_at_rule_inline`],
/// [`Parser::consume_declaration`]).
enum Frame {
    /// ["Consume a list of
    /// rules"](https://www.w3.org/TR/css-syntax-3/#consume-list-of-rules):
    /// the top of a stylesheet (`top_level: true`), or, in a fuller engine,
    /// the inside of a nested-rule-list at-rule (never constructed here —
    /// an at-rule's block is always an opaque [`Tag::SimpleBlockCurly`],
    /// not a `RuleList`).
    RuleList { top_level: bool, list_index: u32 },
    /// The prelude (and, once reached, the awaited style block) of a
    /// qualified rule.
    QualifiedRule { rule_index: u32, phase: QualifiedRulePhase },
    /// The body of a style rule's `{ ... }`: declarations, nested
    /// qualified rules, and at-rules.
    StyleBlock { block_index: u32, last_declaration: u32 },
}

/// Which half of [`Frame::QualifiedRule`] is in progress.
enum QualifiedRulePhase {
    /// Scanning prelude component values, looking for `{` or EOF.
    Prelude,
    /// The `{` was found and a [`Frame::StyleBlock`] was pushed for its
    /// contents; once that frame finishes, this phase finalizes the
    /// qualified rule's own `extra.index` to the block's index.
    AwaitingBlock { block_index: u32 },
}

/// What [`Parser::step_rule_list`] produced.
enum RuleListStep {
    /// The list ended (EOF).
    Done,
    /// A qualified rule's prelude needs its own frame.
    EnterQualifiedRule(u32),
}

/// What [`Parser::step_style_block`] produced.
enum StyleBlockStep {
    /// The block ended (`}` or EOF), carrying the index of its last
    /// declaration (0 if none) for [`Ast::finish_complex`].
    Done(u32),
    /// A nested qualified rule's prelude needs its own frame; carries the
    /// style block's `last_declaration` so far, to resume with once the
    /// nested rule's frame finishes.
    EnterNestedRule(u32, u32),
}

/// Per-call token lookahead over a [`SourceCode`], built on the pull-model
/// [`tokenizer::next`]. Never persists more than one token of lookahead —
/// every frame handler peeks before deciding how to proceed, then either
/// consumes or leaves the token for its caller.
pub(crate) struct TokenCursor<'a, 'b> {
    source: &'a SourceCode<'b>,
    pos: Location,
    lookahead: Option<(Token, Location)>,
}

impl<'a, 'b> TokenCursor<'a, 'b> {
    pub(crate) fn new(source: &'a SourceCode<'b>) -> TokenCursor<'a, 'b> {
        TokenCursor {
            source,
            pos: Location::START,
            lookahead: None,
        }
    }

    pub(crate) fn fill(&mut self) {
        if self.lookahead.is_none() {
            self.lookahead = Some(tokenizer::next(self.source, self.pos));
        }
    }

    pub(crate) fn peek(&mut self) -> Token {
        self.fill();
        self.lookahead.expect("just filled").0
    }

    pub(crate) fn consume(&mut self) -> Token {
        self.fill();
        let (tok, next) = self.lookahead.take().expect("just filled");
        self.pos = next;
        tok
    }
}
