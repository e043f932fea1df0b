//! Declaration parsing tests.
//!
//! These tests verify the shapes the parser hands to the declaration
//! layer: top-level types, namespace expansion, reference directives,
//! and recovery from malformed input.

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use rstest::rstest;
use tern_decl::base::FileId;
use tern_decl::decl::{SingleMember, SingleNamespace, TypeKind};
use tern_decl::diagnostics::codes;
use tern_decl::syntax::{ParsedFile, parse_file, parse_many};

use crate::helpers::fixtures::*;

// =============================================================================
// HELPERS
// =============================================================================

fn parse(source: &str) -> ParsedFile {
    parse_file(FileId::new(0), source)
}

/// The (name, kind, arity) triples of the top-level types, in order.
fn top_level_types(parsed: &ParsedFile) -> Vec<(String, TypeKind, usize)> {
    parsed
        .root
        .namespace
        .members
        .iter()
        .filter_map(|member| match member {
            SingleMember::Type(ty) => Some((ty.name.to_string(), ty.kind, ty.arity)),
            SingleMember::Namespace(_) => None,
        })
        .collect()
}

/// Every diagnostic code recorded for the parse, parse-level first.
fn all_codes(parsed: &ParsedFile) -> Vec<String> {
    parsed
        .diagnostics
        .iter()
        .chain(parsed.root.directive_diagnostics.iter())
        .filter_map(|d| d.code.as_ref().map(|c| c.to_string()))
        .collect()
}

fn child_namespace<'a>(ns: &'a SingleNamespace, name: &str) -> &'a SingleNamespace {
    ns.members
        .iter()
        .find_map(|member| match member {
            SingleMember::Namespace(child) if child.name == name => Some(child.as_ref()),
            _ => None,
        })
        .unwrap_or_else(|| panic!("namespace `{name}` not found in `{}`", ns.name))
}

// =============================================================================
// TYPE SHAPES
// =============================================================================

#[rstest]
#[case::class_with_body(SIMPLE_CLASS, "Vehicle", TypeKind::Class, 0)]
#[case::struct_with_semicolon(SIMPLE_STRUCT, "Point", TypeKind::Struct, 0)]
#[case::generic_interface(GENERIC_INTERFACE, "Map", TypeKind::Interface, 2)]
#[case::enum_with_variants("enum Color { Red, Green }", "Color", TypeKind::Enum, 0)]
#[case::single_parameter("class Box<T>;", "Box", TypeKind::Class, 1)]
#[case::three_parameters("interface Fold<A, B, C>;", "Fold", TypeKind::Interface, 3)]
fn test_top_level_type_shapes(
    #[case] source: &str,
    #[case] name: &str,
    #[case] kind: TypeKind,
    #[case] arity: usize,
) {
    let parsed = parse(source);
    assert!(parsed.ok(), "diagnostics: {:?}", parsed.diagnostics);
    assert_eq!(
        top_level_types(&parsed),
        [(name.to_string(), kind, arity)]
    );
}

#[test]
fn test_nested_type_shape() {
    let parsed = parse(FLEET_FILE);
    assert!(parsed.ok());

    let fleet = child_namespace(&parsed.root.namespace, "Fleet");
    assert_eq!(fleet.members.len(), 2);

    let vehicle = match &fleet.members[0] {
        SingleMember::Type(ty) => ty,
        other => panic!("expected a type, got {other:?}"),
    };
    assert_eq!(vehicle.name, "Vehicle");
    assert_eq!(vehicle.nested.len(), 1);
    assert_eq!(vehicle.nested[0].name, "Registration");
}

#[test]
fn test_dotted_namespace_expansion() {
    let parsed = parse(PARTS_FILE);
    assert!(parsed.ok());

    let fleet = child_namespace(&parsed.root.namespace, "Fleet");
    let parts = child_namespace(fleet, "Parts");
    assert_eq!(
        parts
            .members
            .iter()
            .filter(|m| matches!(m, SingleMember::Type(_)))
            .count(),
        2
    );
}

// =============================================================================
// REFERENCE DIRECTIVES
// =============================================================================

#[test]
fn test_directives_recorded_in_source_order() {
    let parsed = parse(UI_FILE);
    assert!(parsed.ok());

    let paths: Vec<_> = parsed
        .root
        .reference_directives
        .iter()
        .map(|d| d.path.as_str())
        .collect();
    assert_eq!(paths, ["render.tern", "layout.tern"]);
}

#[test]
fn test_directive_ranges_point_into_source() {
    let parsed = parse(UI_FILE);
    for directive in parsed.root.reference_directives.iter() {
        let range = directive.range;
        let text = &UI_FILE[usize::from(range.start())..usize::from(range.end())];
        assert!(text.starts_with("#ref"));
        assert!(text.ends_with('"'));
    }
}

// =============================================================================
// ERROR RECOVERY
// =============================================================================

#[rstest]
#[case::missing_name("class { }", codes::EXPECTED_NAME)]
#[case::missing_body("class A class B;", codes::EXPECTED_BODY)]
#[case::unclosed_namespace("namespace A {", codes::UNCLOSED_BRACE)]
#[case::stray_token("class A; 42", codes::UNEXPECTED_TOKEN)]
#[case::late_directive("class A; #ref \"x.tern\"", codes::DIRECTIVE_AFTER_DECLARATION)]
#[case::directive_missing_path("#ref namespace N { }", codes::EXPECTED_REFERENCE_PATH)]
#[case::directive_empty_path("#ref \"\"", codes::EMPTY_REFERENCE_PATH)]
fn test_malformed_input_is_reported(#[case] source: &str, #[case] code: &str) {
    let parsed = parse(source);
    assert!(
        all_codes(&parsed).iter().any(|c| c == code),
        "expected {code} in {:?}",
        all_codes(&parsed)
    );
}

#[rstest]
#[case::empty("")]
#[case::only_braces("}}}{")]
#[case::lone_keyword("class")]
#[case::lone_namespace("namespace")]
#[case::lone_directive("#ref")]
#[case::punctuation_soup("< > ; . , = : ( ) [ ]")]
#[case::unbalanced_nesting("class A { { { }")]
fn test_parser_always_produces_a_root(#[case] source: &str) {
    let parsed = parse(source);
    assert!(parsed.root.namespace.is_root());
    assert_eq!(parsed.root.file, FileId::new(0));
}

#[test]
fn test_recovery_keeps_later_declarations() {
    let parsed = parse("class { broken } struct Good; namespace Ok { }");
    let types = top_level_types(&parsed);
    assert_eq!(types.len(), 1);
    assert_eq!(types[0].0, "Good");
    assert_eq!(parsed.root.namespace.members.len(), 2);
}

// =============================================================================
// BATCH PARSING
// =============================================================================

#[test]
fn test_parse_many_matches_sequential_parsing() {
    let files = [
        (FileId::new(0), FLEET_FILE),
        (FileId::new(1), PARTS_FILE),
        (FileId::new(2), UI_FILE),
    ];
    let batch = parse_many(&files);

    assert_eq!(batch.len(), 3);
    for (result, (file, text)) in batch.iter().zip(&files) {
        let sequential = parse_file(*file, text);
        assert_eq!(result.root, sequential.root);
        assert_eq!(result.diagnostics, sequential.diagnostics);
    }
}
