//! Declaration model: per-file trees, merging, and the cached set.
//!
//! This module holds the data the rest of the system asks questions of:
//! single-file declaration trees, the merged view across files, and the
//! [`DeclarationSet`] that owns both plus a memoizing cache.
//!
//! ## Key Types
//!
//! - [`RootDeclaration`]: one file's declaration tree plus its directives
//! - [`MergedRoot`]: namespace-merged view over a sequence of roots
//! - [`DeclarationSet`]: old roots + latest root + [`DeclarationCache`]
//! - [`DeclarationCache`]: memoized derived views over one old snapshot
//! - [`KnownNames`]: union name view over cached olds and the latest root
//!
//! ## Data Flow
//!
//! ```text
//! RootDeclaration (per file)
//!     │  add_root / remove_root
//!     ▼
//! DeclarationSet ──── olds ────▶ DeclarationCache
//!     │                              │ merged_root (memoized)
//!     │                              ▼
//!     │                         MergedRoot ──▶ names / directives
//!     ▼
//! whole-set views = cached old view + latest root, composed per read
//! ```

mod cache;
mod directive;
mod merged;
mod names;
mod set;
mod single;

pub use cache::DeclarationCache;
pub use directive::{ReferenceDirective, reference_directive_diagnostics, reference_directives};
pub use merged::{MergeError, MergedNamespace, MergedRoot, MergedType, merge};
pub use names::{NameSet, namespace_names, namespace_names_in, type_names, type_names_in};
pub use set::{DeclarationSet, KnownNames, OldDeclarations};
pub use single::{
    RootDeclaration, SingleMember, SingleNamespace, SingleType, TypeKind,
};
