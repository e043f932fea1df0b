//! The derived-view cache over one old-declaration snapshot.
//!
//! A [`DeclarationCache`] memoizes five views of the stable ("old") portion
//! of a declaration set: the merged tree, the type-name set, the
//! namespace-name set, the reference directives, and the directive
//! diagnostics. Each view computes at most once per cache instance; the
//! four dependent views derive solely from the one memoized merged tree,
//! so every view describes the same snapshot.
//!
//! A cache is paired with exactly one immutable [`OldDeclarations`]
//! snapshot, captured at construction. There is no invalidate operation:
//! when the snapshot is replaced, the owner discards the whole cache and
//! builds a new one.

use std::sync::Arc;

use tracing::trace;

use crate::base::Deferred;
use crate::diagnostics::Diagnostic;

use super::directive::{self, ReferenceDirective};
use super::merged::{self, MergeError, MergedRoot};
use super::names::{self, NameSet};
use super::set::OldDeclarations;

/// Memoized derived views over one old-declaration snapshot.
pub struct DeclarationCache {
    olds: Arc<OldDeclarations>,
    merged_root: Deferred<Arc<MergedRoot>, MergeError>,
    type_names: Deferred<Arc<NameSet>, MergeError>,
    namespace_names: Deferred<Arc<NameSet>, MergeError>,
    reference_directives: Deferred<Arc<[ReferenceDirective]>, MergeError>,
    directive_diagnostics: Deferred<Arc<[Diagnostic]>, MergeError>,
}

impl DeclarationCache {
    /// Capture the snapshot. Nothing is computed until a view is read.
    pub fn new(olds: Arc<OldDeclarations>) -> Self {
        Self {
            olds,
            merged_root: Deferred::new(),
            type_names: Deferred::new(),
            namespace_names: Deferred::new(),
            reference_directives: Deferred::new(),
            directive_diagnostics: Deferred::new(),
        }
    }

    /// The merged tree of the old declarations, in insertion order.
    ///
    /// The first read runs the merge; later reads return the stored tree
    /// (pointer-identical). A failed merge is terminal: every later read
    /// of this view returns the same error.
    pub fn merged_root(&self) -> Result<Arc<MergedRoot>, MergeError> {
        self.merged_root.force(|| {
            trace!(roots = self.olds.len(), "computing merged old tree");
            merged::merge(&self.olds.to_vec()).map(Arc::new)
        })
    }

    /// Distinct type names in the merged old tree.
    pub fn type_names(&self) -> Result<Arc<NameSet>, MergeError> {
        self.type_names.force(|| {
            let root = self.merged_root()?;
            trace!("computing type-name set");
            Ok(Arc::new(names::type_names(&root)))
        })
    }

    /// Distinct namespace names in the merged old tree.
    pub fn namespace_names(&self) -> Result<Arc<NameSet>, MergeError> {
        self.namespace_names.force(|| {
            let root = self.merged_root()?;
            trace!("computing namespace-name set");
            Ok(Arc::new(names::namespace_names(&root)))
        })
    }

    /// Reference directives concatenated across the old roots, in
    /// declaration-list order.
    pub fn reference_directives(&self) -> Result<Arc<[ReferenceDirective]>, MergeError> {
        self.reference_directives.force(|| {
            let root = self.merged_root()?;
            trace!("collecting reference directives");
            Ok(directive::reference_directives(&root).into())
        })
    }

    /// Directive diagnostics concatenated across the old roots, in
    /// declaration-list order.
    pub fn reference_directive_diagnostics(&self) -> Result<Arc<[Diagnostic]>, MergeError> {
        self.directive_diagnostics.force(|| {
            let root = self.merged_root()?;
            trace!("collecting reference-directive diagnostics");
            Ok(directive::reference_directive_diagnostics(&root).into())
        })
    }

    // ========================================================================
    // EVALUATION PROBES
    // ========================================================================

    /// Whether the merged tree has been computed (or faulted).
    pub fn merged_root_computed(&self) -> bool {
        self.merged_root.is_forced()
    }

    /// Whether the type-name set has been computed (or faulted).
    pub fn type_names_computed(&self) -> bool {
        self.type_names.is_forced()
    }

    /// Whether the namespace-name set has been computed (or faulted).
    pub fn namespace_names_computed(&self) -> bool {
        self.namespace_names.is_forced()
    }

    /// Whether the directive list has been computed (or faulted).
    pub fn reference_directives_computed(&self) -> bool {
        self.reference_directives.is_forced()
    }

    /// Whether the directive-diagnostic list has been computed (or faulted).
    pub fn reference_directive_diagnostics_computed(&self) -> bool {
        self.directive_diagnostics.is_forced()
    }
}
