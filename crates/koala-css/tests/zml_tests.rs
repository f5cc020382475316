//! Integration tests for the zml markup parser.

use koala_css::ast::Tag;
use koala_css::error::ZmlErrorCause;
use koala_css::zml;

fn tags(ast: &koala_css::ast::Ast, index: u32) -> Vec<Tag> {
    ast.children(index).map(|i| ast.get(i).tag).collect()
}

/// `* { p1 (decl: value !important;) {} }`: a typed element with an
/// inline style block holding an `!important` declaration, nested
/// inside an empty child element.
#[test]
fn test_end_to_end_scenario_six() {
    let ast = zml::parse(b"* { p1 (decl: value !important;) {} }").unwrap();
    assert_eq!(ast.get(0).tag, Tag::ZmlDocument);

    let outer = ast.children(0).next().unwrap();
    assert_eq!(ast.get(outer).tag, Tag::ZmlElement);
    let outer_parts: Vec<u32> = ast.children(outer).collect();
    assert_eq!(tags(&ast, outer_parts[0]), vec![Tag::ZmlEmpty]);

    let outer_children = *outer_parts.last().unwrap();
    assert_eq!(ast.get(outer_children).tag, Tag::ZmlChildren);

    let inner = ast.children(outer_children).next().unwrap();
    let inner_parts: Vec<u32> = ast.children(inner).collect();
    assert_eq!(tags(&ast, inner_parts[0]), vec![Tag::ZmlType]);

    let styles = inner_parts[1];
    assert_eq!(ast.get(styles).tag, Tag::ZmlStyles);
    let decl = ast.children(styles).next().unwrap();
    assert_eq!(ast.get(decl).tag, Tag::DeclarationImportant);
    assert_eq!(tags(&ast, decl), vec![Tag::Ident]);

    let inner_children = inner_parts[2];
    assert_eq!(ast.get(inner_children).tag, Tag::ZmlChildren);
    assert_eq!(ast.children(inner_children).count(), 0);
}

#[test]
fn test_element_with_no_features_fails_fast() {
    let err = zml::parse(b"{ }").unwrap_err();
    assert_eq!(err.cause, ZmlErrorCause::ElementWithNoFeatures);
}

#[test]
fn test_features_require_a_separator() {
    let err = zml::parse(b"div.a#b x { }").unwrap_err();
    assert_eq!(err.cause, ZmlErrorCause::MissingSpaceBetweenFeatures);
}

#[test]
fn test_well_formed_document_with_multiple_siblings() {
    let ast = zml::parse(b"div { } span .x { } #id { }").unwrap();
    assert_eq!(ast.children(0).count(), 3);
}
