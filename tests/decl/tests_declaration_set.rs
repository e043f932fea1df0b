//! Declaration set lifecycle tests.
//!
//! These tests drive the set the way an editor session does: files are
//! added one by one, the newest file keeps changing, and reads mix cached
//! old-portion views with the latest root.

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use tern_decl::base::FileId;
use tern_decl::decl::{DeclarationSet, MergedNamespace, merge};

use crate::helpers::fixtures::*;

// =============================================================================
// HELPERS
// =============================================================================

fn fleet_set() -> DeclarationSet {
    DeclarationSet::from_roots([
        root_from(0, FLEET_FILE),
        root_from(1, PARTS_FILE),
        root_from(2, UI_FILE),
    ])
}

fn child<'a>(ns: &'a MergedNamespace, name: &str) -> &'a Arc<MergedNamespace> {
    ns.namespaces
        .iter()
        .find(|child| child.name == name)
        .unwrap_or_else(|| panic!("namespace `{name}` not found in `{}`", ns.name))
}

fn type_names_of(ns: &MergedNamespace) -> Vec<String> {
    ns.types.iter().map(|ty| ty.name.to_string()).collect()
}

// =============================================================================
// CACHE LIFECYCLE
// =============================================================================

#[test]
fn test_first_add_reuses_the_empty_cache() {
    let empty = DeclarationSet::new();
    let one = empty.add_root(root_from(0, FLEET_FILE));

    assert!(Arc::ptr_eq(empty.cache(), one.cache()));
    assert_eq!(one.len(), 1);
}

#[test]
fn test_replacing_the_latest_keeps_the_cache() {
    let set = fleet_set();
    let latest = set.latest().unwrap().clone();

    // Re-parse of the newest file: remove its root, add the replacement.
    let without = set.remove_root(&latest);
    assert!(Arc::ptr_eq(set.cache(), without.cache()));

    let replaced = without.add_root(root_from(2, UI_FILE));
    assert!(Arc::ptr_eq(set.cache(), replaced.cache()));
    assert_eq!(replaced.len(), set.len());
}

#[test]
fn test_promotion_discards_the_cache() {
    let set = fleet_set();
    let grown = set.add_root(root_from(3, SIMPLE_CLASS));

    assert!(!Arc::ptr_eq(set.cache(), grown.cache()));
    assert_eq!(grown.old_declarations().len(), 3);
}

#[test]
fn test_removing_an_old_root_discards_the_cache() {
    let set = fleet_set();
    let old = set.old_declarations().to_vec()[0].clone();

    let shrunk = set.remove_root(&old);
    assert!(!Arc::ptr_eq(set.cache(), shrunk.cache()));
    assert_eq!(shrunk.len(), set.len() - 1);
    assert!(!shrunk.old_declarations().contains(&old));
}

#[test]
fn test_snapshots_are_independent() {
    let base = DeclarationSet::from_roots([root_from(0, FLEET_FILE)]);
    let before = base.merged_root().unwrap();

    let grown = base.add_root(root_from(1, PARTS_FILE));

    // The older snapshot still answers from its own state.
    let after = base.merged_root().unwrap();
    assert_eq!(before, after);
    assert_eq!(after.declarations.len(), 1);
    assert_eq!(grown.merged_root().unwrap().declarations.len(), 2);
}

// =============================================================================
// WHOLE-SET VIEWS
// =============================================================================

#[test]
fn test_merged_view_spans_every_file() {
    let merged = fleet_set().merged_root().unwrap();

    let fleet = child(&merged.namespace, "Fleet");
    assert_eq!(type_names_of(fleet), ["Vehicle", "Truck"]);

    let parts = child(fleet, "Parts");
    assert_eq!(type_names_of(parts), ["Engine", "FuelKind"]);

    let ui = child(&merged.namespace, "Ui");
    assert_eq!(type_names_of(ui), ["Widget"]);
}

#[test]
fn test_per_read_combine_matches_batch_merge() {
    let set = fleet_set();
    let combined = set.merged_root().unwrap();
    let batch = merge(&set.root_declarations()).unwrap();
    assert_eq!(*combined, batch);
}

#[test]
fn test_type_names_span_every_file() {
    let names = fleet_set().type_names().unwrap();

    for name in ["Vehicle", "Registration", "Truck", "Engine", "FuelKind", "Widget"] {
        assert!(names.contains(name), "missing type name `{name}`");
    }
    assert!(!names.contains("Fleet"));
}

#[test]
fn test_namespace_names_span_every_file() {
    let names = fleet_set().namespace_names().unwrap();

    for name in ["Fleet", "Parts", "Ui"] {
        assert!(names.contains(name), "missing namespace name `{name}`");
    }
    // The anonymous file-level namespace is not a name.
    assert!(!names.contains(""));
    assert_eq!(names.len(), 3);
}

#[test]
fn test_directives_come_old_roots_first() {
    let set = DeclarationSet::from_roots([root_from(0, UI_FILE), root_from(1, FLEET_FILE)]);

    let paths: Vec<_> = set
        .reference_directives()
        .unwrap()
        .iter()
        .map(|d| d.path.to_string())
        .collect();
    assert_eq!(paths, ["render.tern", "layout.tern", "core.tern"]);
}

#[test]
fn test_directive_files_match_their_roots() {
    let set = fleet_set();
    for directive in set.reference_directives().unwrap() {
        assert!(
            set.root_declarations()
                .iter()
                .any(|root| root.file == directive.file)
        );
    }
}

#[test]
fn test_removal_drops_the_roots_views() {
    let set = fleet_set();
    let old = set
        .old_declarations()
        .iter()
        .find(|root| root.file == FileId::new(0))
        .unwrap()
        .clone();

    let shrunk = set.remove_root(&old);
    let names = shrunk.type_names().unwrap();
    assert!(!names.contains("Vehicle"));
    assert!(names.contains("Engine"));

    // Only the UI file's directives remain.
    let paths: Vec<_> = shrunk
        .reference_directives()
        .unwrap()
        .iter()
        .map(|d| d.path.to_string())
        .collect();
    assert_eq!(paths, ["render.tern", "layout.tern"]);
}
