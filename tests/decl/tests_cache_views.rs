//! Derived-view cache tests.
//!
//! These tests pin down the cache contract: views compute lazily, at most
//! once per cache, independently of their siblings, and a failed merge
//! stays failed for every dependent view.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use tern_decl::base::{FileId, TextRange};
use tern_decl::decl::{
    DeclarationCache, DeclarationSet, MergeError, OldDeclarations, RootDeclaration, SingleMember,
    SingleNamespace, SingleType, TypeKind, type_names,
};

use crate::helpers::fixtures::*;

// =============================================================================
// HELPERS
// =============================================================================

fn fleet_cache() -> DeclarationCache {
    let olds = OldDeclarations::from_roots([
        root_from(0, FLEET_FILE),
        root_from(1, PARTS_FILE),
        root_from(2, UI_FILE),
    ]);
    DeclarationCache::new(Arc::new(olds))
}

/// A hand-built root declaring one top-level struct.
fn struct_root(file: u32, name: &str) -> Arc<RootDeclaration> {
    let span = TextRange::new(0.into(), 0.into());
    let ty = Arc::new(SingleType::new(name, TypeKind::Struct, 0, span));
    let namespace = Arc::new(SingleNamespace::new(
        "",
        span,
        vec![SingleMember::Type(ty)],
    ));
    Arc::new(RootDeclaration::new(FileId::new(file), namespace))
}

// =============================================================================
// MEMOIZATION
// =============================================================================

#[test]
fn test_each_view_computes_once() {
    let cache = fleet_cache();

    let merged_a = cache.merged_root().unwrap();
    let merged_b = cache.merged_root().unwrap();
    assert!(Arc::ptr_eq(&merged_a, &merged_b));

    let types_a = cache.type_names().unwrap();
    let types_b = cache.type_names().unwrap();
    assert!(Arc::ptr_eq(&types_a, &types_b));

    let directives_a = cache.reference_directives().unwrap();
    let directives_b = cache.reference_directives().unwrap();
    assert!(Arc::ptr_eq(&directives_a, &directives_b));
}

#[test]
fn test_views_compute_lazily_and_independently() {
    let cache = fleet_cache();
    assert!(!cache.merged_root_computed());

    let _ = cache.reference_directives().unwrap();
    assert!(cache.reference_directives_computed());
    assert!(cache.merged_root_computed());
    assert!(!cache.type_names_computed());
    assert!(!cache.namespace_names_computed());
    assert!(!cache.reference_directive_diagnostics_computed());

    let _ = cache.namespace_names().unwrap();
    assert!(cache.namespace_names_computed());
    assert!(!cache.type_names_computed());
}

#[test]
fn test_all_views_describe_the_same_tree() {
    let cache = fleet_cache();

    // Force the name view first; it must not build a second tree.
    let names = cache.type_names().unwrap();
    let merged = cache.merged_root().unwrap();
    assert_eq!(*names, type_names(&merged));

    let directives = cache.reference_directives().unwrap();
    let from_tree: Vec<_> = merged
        .declarations
        .iter()
        .flat_map(|root| root.reference_directives.iter().cloned())
        .collect();
    assert_eq!(directives.as_ref(), from_tree.as_slice());
}

// =============================================================================
// FAILURE BEHAVIOR
// =============================================================================

#[test]
fn test_failed_merge_is_terminal_for_every_view() {
    // Two roots claim the same file id.
    let olds = OldDeclarations::from_roots([class_root(7, "First"), struct_root(7, "Second")]);
    let cache = DeclarationCache::new(Arc::new(olds));

    let expected = MergeError::DuplicateFile { file: FileId::new(7) };
    assert_eq!(cache.merged_root().unwrap_err(), expected);
    assert!(cache.merged_root_computed());

    assert_eq!(cache.type_names().unwrap_err(), expected);
    assert_eq!(cache.namespace_names().unwrap_err(), expected);
    assert_eq!(cache.reference_directives().unwrap_err(), expected);
    assert_eq!(cache.reference_directive_diagnostics().unwrap_err(), expected);
    assert_eq!(cache.merged_root().unwrap_err(), expected);
}

#[test]
fn test_kind_conflict_is_reported_with_both_kinds() {
    let olds = OldDeclarations::from_roots([class_root(0, "Thing"), struct_root(1, "Thing")]);
    let cache = DeclarationCache::new(Arc::new(olds));

    match cache.merged_root().unwrap_err() {
        MergeError::KindConflict { name, first, second, .. } => {
            assert_eq!(name, "Thing");
            assert_eq!(first, TypeKind::Class);
            assert_eq!(second, TypeKind::Struct);
        }
        other => panic!("expected a kind conflict, got {other}"),
    }
}

#[test]
fn test_set_failure_surfaces_through_combine() {
    // The duplicate pair is split across olds and latest, so the cached
    // old tree itself is fine; only the whole-set view fails.
    let set = DeclarationSet::new()
        .add_root(class_root(3, "A"))
        .add_root(struct_root(3, "B"));

    assert!(set.cache().merged_root().is_ok());
    assert_eq!(
        set.merged_root().unwrap_err(),
        MergeError::DuplicateFile { file: FileId::new(3) }
    );

    // Promoting the duplicate into the olds poisons the next cache.
    let grown = set.add_root(class_root(4, "C"));
    assert_eq!(
        grown.cache().merged_root().unwrap_err(),
        MergeError::DuplicateFile { file: FileId::new(3) }
    );
}

// =============================================================================
// SNAPSHOT CAPTURE
// =============================================================================

#[test]
fn test_cache_answers_from_its_own_snapshot() {
    let set = DeclarationSet::from_roots([
        root_from(0, FLEET_FILE),
        root_from(1, PARTS_FILE),
        root_from(2, UI_FILE),
    ]);
    let cache = set.cache().clone();
    let before = cache.merged_root().unwrap();

    // Growing the set pairs the new olds with a new cache; the captured
    // one keeps serving its original snapshot.
    let _grown = set.add_root(root_from(3, SIMPLE_CLASS));
    let after = cache.merged_root().unwrap();

    assert!(Arc::ptr_eq(&before, &after));
    assert_eq!(after.declarations.len(), 2);
}
