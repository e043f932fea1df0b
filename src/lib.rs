//! # tern-decl
//!
//! Declaration analysis core for Tern: parsing, namespace merging, and
//! incremental declaration caching.
//!
//! A [`DeclarationSet`] holds one root declaration per source file and
//! answers whole-program questions about them: the merged namespace tree,
//! the known type and namespace names, and the reference directives. The
//! set is immutable; edits return a new set. Derived views are memoized
//! in a [`DeclarationCache`] that survives the common edit pattern, where
//! only the most recently added file keeps changing.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! syntax      → Logos lexer, declaration-skeleton parser
//!   ↓
//! decl        → Single/merged declaration trees, set, cache
//!   ↓
//! diagnostics → Diagnostic type and error codes
//!   ↓
//! base        → Primitives (FileId, TextRange, Deferred, limits)
//! ```
//!
//! ## Example
//!
//! ```
//! use tern_decl::base::FileId;
//! use tern_decl::decl::DeclarationSet;
//! use tern_decl::syntax::parse_file;
//!
//! let core = parse_file(FileId::new(0), "namespace App { class Engine; }");
//! let ui = parse_file(FileId::new(1), "namespace App { class Panel<T>; }");
//!
//! let set = DeclarationSet::new().add_root(core.root).add_root(ui.root);
//!
//! assert!(set.type_names().unwrap().contains("Engine"));
//! assert!(set.type_names().unwrap().contains("Panel"));
//! assert!(set.namespace_names().unwrap().contains("App"));
//! ```

// ============================================================================
// MODULES (dependency order: base → diagnostics → decl → syntax)
// ============================================================================

/// Foundation types: FileId, TextRange, the Deferred cell, limits
pub mod base;

/// Diagnostic type and error codes
pub mod diagnostics;

/// Declaration model: single/merged trees, the set, the cache
pub mod decl;

/// Syntax: Logos lexer, declaration-skeleton parser
pub mod syntax;

// Re-export foundation types
pub use base::{Deferred, FileId, SmolStr, TextRange, TextSize};

// Re-export the primary API surface
pub use decl::{
    DeclarationCache, DeclarationSet, KnownNames, MergeError, MergedRoot, OldDeclarations,
    ReferenceDirective, RootDeclaration,
};
pub use diagnostics::{Diagnostic, Severity};
pub use syntax::{ParsedFile, parse_file, parse_many};
