//! Reference directives: external dependencies named in source.
//!
//! A `#ref "path"` directive at the head of a file names an external
//! reference for downstream resolution. Directives are aggregated across a
//! merged tree's constituent files in declaration-list order, never
//! re-sorted.

use crate::base::{FileId, SmolStr, TextRange};
use crate::diagnostics::Diagnostic;

use super::merged::MergedRoot;

/// One `#ref "path"` directive.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ReferenceDirective {
    /// The file the directive appears in.
    pub file: FileId,
    /// The referenced path, as written.
    pub path: SmolStr,
    /// Byte range of the directive.
    pub range: TextRange,
}

impl ReferenceDirective {
    pub fn new(file: FileId, path: impl Into<SmolStr>, range: TextRange) -> Self {
        Self {
            file,
            path: path.into(),
            range,
        }
    }
}

/// Concatenate every constituent root's directives, in the same relative
/// order as the roots appear in the merged declaration list.
pub fn reference_directives(root: &MergedRoot) -> Vec<ReferenceDirective> {
    root.declarations
        .iter()
        .flat_map(|decl| decl.reference_directives.iter().cloned())
        .collect()
}

/// Concatenate every constituent root's directive diagnostics, in
/// declaration-list order.
pub fn reference_directive_diagnostics(root: &MergedRoot) -> Vec<Diagnostic> {
    root.declarations
        .iter()
        .flat_map(|decl| decl.directive_diagnostics.iter().cloned())
        .collect()
}
