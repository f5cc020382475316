//! `Ast` — the flat, append-only component store both parsers write into.
//!
//! A single growable array of records indexed by `u32`, with tree shape
//! encoded by a `next_sibling` skip index — arena-and-indices rather than
//! a pointer-heavy tree of `Box<Component>` nodes. This keeps traversal
//! cache-friendly and lets the parser discard a speculative subtree with a
//! single truncation instead of dropping a tree of allocations.

use crate::ident_matcher::{AtRuleKeyword, UnitKeyword};
use crate::source::Location;
use crate::token::{IntegerValue, NumberValue};
use crate::error::AstError;

/// The tag of an [`Ast`] [`Component`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    // --- token leaves: every `Token` variant maps to a same-named tag ---
    /// `<EOF-token>`. Never actually appended to an Ast by either parser;
    /// kept so re-tokenization round-trip tests can name it.
    Eof,
    /// `<whitespace-token>`.
    Whitespace,
    /// A collapsed run of `/* ... */` comments.
    Comments,
    /// `<CDO-token>`.
    Cdo,
    /// `<CDC-token>`.
    Cdc,
    /// `<colon-token>`.
    Colon,
    /// `<semicolon-token>`.
    Semicolon,
    /// `<comma-token>`.
    Comma,
    /// `<(-token>` as a bare, unmatched leaf.
    LeftParen,
    /// `<)-token>` as a bare, unmatched leaf.
    RightParen,
    /// `<[-token>` as a bare, unmatched leaf.
    LeftSquare,
    /// `<]-token>` as a bare, unmatched leaf.
    RightSquare,
    /// `<{-token>` as a bare, unmatched leaf.
    LeftCurly,
    /// `<}-token>` as a bare, unmatched leaf.
    RightCurly,
    /// `<ident-token>`.
    Ident,
    /// `<function-token>` as a bare leaf (only when it is consumed
    /// without its arguments being collected, e.g. `parse a list of
    /// component values` on a lone `foo(` at EOF).
    Function,
    /// `<at-keyword-token>`.
    AtKeyword,
    /// `<hash-token>`, type flag `id`.
    HashId,
    /// `<hash-token>`, type flag `unrestricted`.
    HashUnrestricted,
    /// `<string-token>`.
    String,
    /// `<bad-string-token>`.
    BadString,
    /// `<url-token>`.
    Url,
    /// `<bad-url-token>`.
    BadUrl,
    /// `<number-token>`, type flag `number`.
    Number,
    /// `<number-token>`, type flag `integer`.
    Integer,
    /// `<percentage-token>`.
    Percentage,
    /// `<dimension-token>`'s numeric half; always immediately followed by
    /// a single `Unit` child.
    Dimension,
    /// `<dimension-token>`'s unit half, always a leaf.
    Unit,
    /// `<delim-token>`.
    Delim,

    // --- containers ---
    /// The result of "parse a stylesheet" / "consume a list of rules".
    RuleList,
    /// The result of "parse a list of component values".
    ComponentList,
    /// An at-rule: `@name prelude... (; | { block })`.
    AtRule,
    /// A qualified rule: `prelude... { block }`.
    QualifiedRule,
    /// A style rule's `{ ... }` body: declarations, nested rules, at-rules.
    StyleBlock,
    /// A declaration without `!important`.
    DeclarationNormal,
    /// A declaration with `!important` (stripped from the value).
    DeclarationImportant,
    /// A parsed function component value: `name( ...args )`.
    FunctionBlock,
    /// A parsed `{ ... }` simple block that is not a style rule's body.
    SimpleBlockCurly,
    /// A parsed `[ ... ]` simple block.
    SimpleBlockSquare,
    /// A parsed `( ... )` simple block that is not a function's arguments.
    SimpleBlockParen,

    // --- zml ---
    /// The root of a parsed zml document: zero or more elements.
    ZmlDocument,
    /// One `features (styles)? { children }` element.
    ZmlElement,
    /// An element's feature list.
    ZmlFeatures,
    /// An element's nested children.
    ZmlChildren,
    /// An element's inline `( ... )` style block.
    ZmlStyles,
    /// The `*` (no-features) marker.
    ZmlEmpty,
    /// A bare-ident type feature.
    ZmlType,
    /// A `.class` feature.
    ZmlClass,
    /// A `#id` feature (reuses the CSS hash-id token's text).
    ZmlId,
    /// A `[name]` / `[name=value]` attribute feature.
    ZmlAttribute,
}

/// The variant-specific 32-bit payload of a [`Component`], interpreted
/// according to its `tag`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Extra {
    /// No payload.
    Undef,
    /// An index of another component: a qualified rule's block, a style
    /// block's last declaration, or a declaration's previous sibling.
    Index(u32),
    /// A `delim` token's codepoint.
    Codepoint(char),
    /// An `integer` token's value.
    Integer(IntegerValue),
    /// A `number`/`percentage`/`dimension` token's value.
    Number(NumberValue),
    /// A `unit` component's matched unit, if any.
    Unit(Option<UnitKeyword>),
    /// An `at_rule` component's matched at-rule name, if any.
    AtRule(Option<AtRuleKeyword>),
    /// A zml feature container's (`zml_type`/`zml_class`/`zml_id`/
    /// `zml_attribute`) name, as an [`crate::identifier_set::IdentifierSet`]
    /// index rather than a raw source span — lets two elements sharing a
    /// class/type/attribute name compare in O(1) without re-slicing the
    /// source.
    Interned(u32),
}

impl Extra {
    /// The `index` payload, or `0` if this is not an `Index` — the
    /// convention used for "no previous declaration" / "no declarations
    /// yet".
    #[must_use]
    pub fn index_or_zero(self) -> u32 {
        match self {
            Extra::Index(i) => i,
            _ => 0,
        }
    }
}

/// One record in the [`Ast`]: either a token leaf or a container.
///
/// `next_sibling` encodes tree structure: for a component at index `i`,
/// its children occupy `[i+1, next_sibling)`, and its next sibling (if
/// any) begins at `next_sibling`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Component {
    /// See the type's doc comment.
    pub next_sibling: u32,
    /// This component's kind.
    pub tag: Tag,
    /// Where this component started in the source.
    pub location: Location,
    /// This component's tag-dependent payload.
    pub extra: Extra,
}

/// Ast size is bounded by `2^32 - 1`; exceeding it fails with `Overflow`.
const MAX_LEN: usize = u32::MAX as usize;

/// The flat, append-only component store.
///
/// All memory is owned by this single growable array — there is no
/// per-node allocation, in place of a pointer-heavy tree.
#[derive(Debug, Default)]
pub struct Ast {
    components: Vec<Component>,
}

impl Ast {
    /// An empty Ast.
    #[must_use]
    pub fn new() -> Ast {
        Ast {
            components: Vec::new(),
        }
    }

    /// The number of components currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether no components have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Read a component by index.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[must_use]
    pub fn get(&self, index: u32) -> Component {
        self.components[index as usize]
    }

    /// All components, in pre-order.
    #[must_use]
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Iterate the direct children of the component at `index`.
    #[must_use]
    pub fn children(&self, index: u32) -> Children<'_> {
        let end = self.get(index).next_sibling;
        Children {
            ast: self,
            next: index + 1,
            end,
        }
    }

    fn reserve(&mut self, count: usize) -> Result<u32, AstError> {
        if self.components.len() + count > MAX_LEN {
            return Err(AstError::Overflow);
        }
        Ok(self.components.len() as u32)
    }

    /// `add_token`: append a leaf component.
    ///
    /// # Errors
    ///
    /// Returns [`AstError::Overflow`] if the Ast is already at capacity.
    pub fn add_token(&mut self, tag: Tag, location: Location, extra: Extra) -> Result<u32, AstError> {
        let index = self.reserve(1)?;
        self.components.push(Component {
            next_sibling: index + 1,
            tag,
            location,
            extra,
        });
        Ok(index)
    }

    /// `add_token` specialized for a `dimension` token:
    /// emits the `Dimension` component and its child `Unit` component
    /// together, so the pair's `next_sibling` values are consistent from
    /// the moment either is created.
    ///
    /// # Errors
    ///
    /// Returns [`AstError::Overflow`] if the Ast does not have room for
    /// both components.
    pub fn add_dimension_token(
        &mut self,
        location: Location,
        value: NumberValue,
        unit_location: Location,
        unit: Option<UnitKeyword>,
    ) -> Result<u32, AstError> {
        let index = self.reserve(2)?;
        self.components.push(Component {
            next_sibling: index + 2,
            tag: Tag::Dimension,
            location,
            extra: Extra::Number(value),
        });
        self.components.push(Component {
            next_sibling: index + 2,
            tag: Tag::Unit,
            location: unit_location,
            extra: Extra::Unit(unit),
        });
        Ok(index)
    }

    /// `add_complex`: open a container. Must be paired
    /// with [`Ast::finish_complex`] before the component is readable
    /// (its `next_sibling` is a placeholder until then) — descendants are
    /// appended in between.
    ///
    /// # Errors
    ///
    /// Returns [`AstError::Overflow`] if the Ast is already at capacity.
    pub fn add_complex(&mut self, tag: Tag, location: Location) -> Result<u32, AstError> {
        let index = self.reserve(1)?;
        self.components.push(Component {
            next_sibling: u32::MAX,
            tag,
            location,
            extra: Extra::Undef,
        });
        Ok(index)
    }

    /// `finish_complex`: close a container opened by
    /// [`Ast::add_complex`], setting its `next_sibling` to the current
    /// length (i.e. one past its last descendant) and its final `extra`.
    ///
    /// # Panics
    ///
    /// Panics if `index` was not returned by a still-open `add_complex`
    /// call on this Ast.
    pub fn finish_complex(&mut self, index: u32, extra: Extra) {
        let next_sibling = self.components.len() as u32;
        let component = &mut self.components[index as usize];
        debug_assert_eq!(component.next_sibling, u32::MAX, "component already finished");
        component.next_sibling = next_sibling;
        component.extra = extra;
    }

    /// Change an already-appended component's tag, leaving its location,
    /// extra, and sibling structure untouched. Used by the CSS parser to
    /// classify a declaration as `declaration_normal` vs
    /// `declaration_important` only once its whole value (and therefore
    /// whether a trailing `!important` was present) has been scanned.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn retag(&mut self, index: u32, tag: Tag) {
        self.components[index as usize].tag = tag;
    }

    /// `shrink`: retract the log back to `index`,
    /// discarding `index` and everything appended after it. Used to
    /// discard aborted qualified rules without committing partial state.
    pub fn shrink(&mut self, index: u32) {
        self.components.truncate(index as usize);
    }
}

/// Iterator over the direct children of one [`Ast`] component, returned
/// by [`Ast::children`].
pub struct Children<'a> {
    ast: &'a Ast,
    next: u32,
    end: u32,
}

impl Iterator for Children<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        if self.next >= self.end {
            return None;
        }
        let index = self.next;
        self.next = self.ast.get(index).next_sibling;
        Some(index)
    }
}

#[cfg(test)]
impl Ast {
    /// Render the component at `index` and its descendants as a
    /// parenthesized tree, e.g. `(rule_list (qualified_rule ...))`, for
    /// readable assertion failures. Test-only: not part of the public API.
    pub(crate) fn to_sexpr(&self, index: u32) -> String {
        let mut out = String::new();
        self.write_sexpr(index, &mut out);
        out
    }

    fn write_sexpr(&self, index: u32, out: &mut String) {
        let tag = tag_name(self.get(index).tag);
        let children: Vec<u32> = self.children(index).collect();
        if children.is_empty() {
            out.push_str(tag);
            return;
        }
        out.push('(');
        out.push_str(tag);
        for child in children {
            out.push(' ');
            self.write_sexpr(child, out);
        }
        out.push(')');
    }
}

#[cfg(test)]
fn tag_name(tag: Tag) -> &'static str {
    match tag {
        Tag::Eof => "eof",
        Tag::Whitespace => "whitespace",
        Tag::Comments => "comments",
        Tag::Cdo => "cdo",
        Tag::Cdc => "cdc",
        Tag::Colon => "colon",
        Tag::Semicolon => "semicolon",
        Tag::Comma => "comma",
        Tag::LeftParen => "left_paren",
        Tag::RightParen => "right_paren",
        Tag::LeftSquare => "left_square",
        Tag::RightSquare => "right_square",
        Tag::LeftCurly => "left_curly",
        Tag::RightCurly => "right_curly",
        Tag::Ident => "ident",
        Tag::Function => "function",
        Tag::AtKeyword => "at_keyword",
        Tag::HashId => "hash_id",
        Tag::HashUnrestricted => "hash_unrestricted",
        Tag::String => "string",
        Tag::BadString => "bad_string",
        Tag::Url => "url",
        Tag::BadUrl => "bad_url",
        Tag::Number => "number",
        Tag::Integer => "integer",
        Tag::Percentage => "percentage",
        Tag::Dimension => "dimension",
        Tag::Unit => "unit",
        Tag::Delim => "delim",
        Tag::RuleList => "rule_list",
        Tag::ComponentList => "component_list",
        Tag::AtRule => "at_rule",
        Tag::QualifiedRule => "qualified_rule",
        Tag::StyleBlock => "style_block",
        Tag::DeclarationNormal => "declaration_normal",
        Tag::DeclarationImportant => "declaration_important",
        Tag::FunctionBlock => "function_block",
        Tag::SimpleBlockCurly => "simple_block_curly",
        Tag::SimpleBlockSquare => "simple_block_square",
        Tag::SimpleBlockParen => "simple_block_paren",
        Tag::ZmlDocument => "zml_document",
        Tag::ZmlElement => "zml_element",
        Tag::ZmlFeatures => "zml_features",
        Tag::ZmlChildren => "zml_children",
        Tag::ZmlStyles => "zml_styles",
        Tag::ZmlEmpty => "zml_empty",
        Tag::ZmlType => "zml_type",
        Tag::ZmlClass => "zml_class",
        Tag::ZmlId => "zml_id",
        Tag::ZmlAttribute => "zml_attribute",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(n: u32) -> Location {
        Location::from_offset(n)
    }

    #[test]
    fn leaf_next_sibling_is_index_plus_one() {
        let mut ast = Ast::new();
        let i = ast.add_token(Tag::Ident, loc(0), Extra::Undef).unwrap();
        assert_eq!(ast.get(i).next_sibling, i + 1);
    }

    #[test]
    fn dimension_emits_two_components() {
        let mut ast = Ast::new();
        let i = ast
            .add_dimension_token(loc(0), Some(10.0), loc(1), None)
            .unwrap();
        assert_eq!(i + 2, ast.len() as u32);
        assert_eq!(ast.get(i).tag, Tag::Dimension);
        assert_eq!(ast.get(i + 1).tag, Tag::Unit);
        assert_eq!(ast.get(i).next_sibling, i + 2);
        assert_eq!(ast.get(i + 1).next_sibling, i + 2);
    }

    #[test]
    fn to_sexpr_renders_nested_components_readably() {
        let mut ast = Ast::new();
        let outer = ast.add_complex(Tag::RuleList, loc(0)).unwrap();
        let _inner = ast.add_token(Tag::Ident, loc(1), Extra::Undef).unwrap();
        ast.finish_complex(outer, Extra::Undef);
        assert_eq!(ast.to_sexpr(outer), "(rule_list ident)");
    }

    #[test]
    fn complex_spans_its_descendants() {
        let mut ast = Ast::new();
        let outer = ast.add_complex(Tag::RuleList, loc(0)).unwrap();
        let _inner = ast.add_token(Tag::Ident, loc(1), Extra::Undef).unwrap();
        ast.finish_complex(outer, Extra::Undef);
        assert_eq!(ast.get(outer).next_sibling, ast.len() as u32);
        let children: Vec<u32> = ast.children(outer).collect();
        assert_eq!(children, vec![outer + 1]);
    }

    #[test]
    fn shrink_discards_a_speculative_subtree() {
        let mut ast = Ast::new();
        let mark = ast.len() as u32;
        let rule = ast.add_complex(Tag::QualifiedRule, loc(0)).unwrap();
        let _child = ast.add_token(Tag::Ident, loc(1), Extra::Undef).unwrap();
        let _ = rule;
        ast.shrink(mark);
        assert_eq!(ast.len(), 0);
    }

    #[test]
    fn children_skips_grandchildren() {
        let mut ast = Ast::new();
        let outer = ast.add_complex(Tag::StyleBlock, loc(0)).unwrap();
        let inner = ast.add_complex(Tag::DeclarationNormal, loc(1)).unwrap();
        let _leaf = ast.add_token(Tag::Ident, loc(2), Extra::Undef).unwrap();
        ast.finish_complex(inner, Extra::Index(0));
        let _sibling = ast.add_token(Tag::Semicolon, loc(3), Extra::Undef).unwrap();
        ast.finish_complex(outer, Extra::Index(inner));
        let children: Vec<u32> = ast.children(outer).collect();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0], inner);
    }
}
