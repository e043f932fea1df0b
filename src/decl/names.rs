//! Name-set extraction over declaration trees.
//!
//! Pure, infallible walks collecting the distinct simple names appearing
//! in a tree. All walks are iterative with an explicit stack, so arbitrarily
//! deep hand-built trees cannot overflow.

use rustc_hash::FxHashSet;

use crate::base::SmolStr;

use super::merged::{MergedNamespace, MergedRoot, MergedType};
use super::single::{SingleMember, SingleNamespace, SingleType};

/// Distinct simple names; membership-only semantics, no ordering.
pub type NameSet = FxHashSet<SmolStr>;

/// Simple names of every merged type anywhere in the tree, nested types
/// included.
pub fn type_names(root: &MergedRoot) -> NameSet {
    let mut names = NameSet::default();
    let mut namespaces: Vec<&MergedNamespace> = vec![root.namespace.as_ref()];
    let mut types: Vec<&MergedType> = Vec::new();

    while let Some(ns) = namespaces.pop() {
        namespaces.extend(ns.namespaces.iter().map(|child| child.as_ref()));
        types.extend(ns.types.iter().map(|child| child.as_ref()));
    }
    while let Some(ty) = types.pop() {
        names.insert(ty.name.clone());
        types.extend(ty.nested.iter().map(|child| child.as_ref()));
    }
    names
}

/// Names of every merged namespace in the tree. The anonymous root
/// namespace is not a name and is excluded.
pub fn namespace_names(root: &MergedRoot) -> NameSet {
    let mut names = NameSet::default();
    let mut pending: Vec<&MergedNamespace> = root
        .namespace
        .namespaces
        .iter()
        .map(|child| child.as_ref())
        .collect();

    while let Some(ns) = pending.pop() {
        names.insert(ns.name.clone());
        pending.extend(ns.namespaces.iter().map(|child| child.as_ref()));
    }
    names
}

/// Type names in a single-file tree; used for the combined old+new views.
pub fn type_names_in(root_ns: &SingleNamespace) -> NameSet {
    let mut names = NameSet::default();
    let mut members: Vec<&SingleMember> = root_ns.members.iter().collect();
    let mut types: Vec<&SingleType> = Vec::new();

    while let Some(member) = members.pop() {
        match member {
            SingleMember::Namespace(ns) => members.extend(ns.members.iter()),
            SingleMember::Type(ty) => types.push(ty.as_ref()),
        }
    }
    while let Some(ty) = types.pop() {
        names.insert(ty.name.clone());
        types.extend(ty.nested.iter().map(|child| child.as_ref()));
    }
    names
}

/// Namespace names in a single-file tree, the file-level root excluded.
pub fn namespace_names_in(root_ns: &SingleNamespace) -> NameSet {
    let mut names = NameSet::default();
    let mut members: Vec<&SingleMember> = root_ns.members.iter().collect();

    while let Some(member) = members.pop() {
        if let SingleMember::Namespace(ns) = member {
            names.insert(ns.name.clone());
            members.extend(ns.members.iter());
        }
    }
    names
}
