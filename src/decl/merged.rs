//! Merged declaration trees.
//!
//! [`merge`] combines an ordered sequence of per-file roots into one tree:
//! same-named namespaces merge recursively, and types with the same name
//! and arity in one scope merge partial-style. Insertion order of the
//! input drives every ordered property of the output.
//!
//! [`MergedRoot::combine`] layers one additional root on top of an
//! already-merged tree in O(latest): only the namespace paths the new root
//! actually declares are rebuilt, every untouched subtree is shared.

use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use thiserror::Error;
use tracing::{debug, trace};

use crate::base::{FileId, SmolStr};

use super::single::{RootDeclaration, SingleMember, SingleNamespace, SingleType, TypeKind};

/// A merge rejected its input.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MergeError {
    /// The same file contributed more than one root declaration.
    #[error("{file} appears more than once in the declaration sequence")]
    DuplicateFile { file: FileId },
    /// Two same-named, same-arity types in one scope disagree on kind.
    #[error("`{name}` is declared as both `{first}` and `{second}`")]
    KindConflict {
        name: SmolStr,
        arity: usize,
        first: TypeKind,
        second: TypeKind,
    },
}

/// One merged type per distinct `(name, arity)` within a scope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergedType {
    pub name: SmolStr,
    pub kind: TypeKind,
    pub arity: usize,
    /// Constituent declarations in encounter order.
    pub components: Vec<Arc<SingleType>>,
    /// Merged types nested in this type's constituents.
    pub nested: Vec<Arc<MergedType>>,
}

/// One merged namespace per distinct name within a scope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergedNamespace {
    /// Namespace segment name; empty for the merged root.
    pub name: SmolStr,
    /// Constituent declarations in encounter order.
    pub components: Vec<Arc<SingleNamespace>>,
    /// Merged child namespaces, in first-encounter order.
    pub namespaces: Vec<Arc<MergedNamespace>>,
    /// Merged child types, in first-encounter order.
    pub types: Vec<Arc<MergedType>>,
}

/// The combined declaration tree of an ordered sequence of files.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergedRoot {
    /// Ordered constituent list; drives directive aggregation order.
    pub declarations: Vec<Arc<RootDeclaration>>,
    /// The merged anonymous root namespace.
    pub namespace: Arc<MergedNamespace>,
}

impl MergedRoot {
    /// Whether the tree has no constituents.
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Layer `latest` on top of this tree without re-merging it.
    ///
    /// Only the namespace paths `latest` declares are rebuilt; every
    /// untouched subtree is shared with `self` by reference. The result is
    /// structurally identical to a from-scratch merge with `latest` last.
    pub fn combine(&self, latest: &Arc<RootDeclaration>) -> Result<MergedRoot, MergeError> {
        trace!(file = %latest.file, "combining latest declaration with merged tree");

        if self.declarations.iter().any(|d| d.file == latest.file) {
            return Err(MergeError::DuplicateFile { file: latest.file });
        }

        let mut declarations = self.declarations.clone();
        declarations.push(latest.clone());

        let namespace = combine_namespace(&self.namespace, &latest.namespace)?;
        Ok(MergedRoot {
            declarations,
            namespace,
        })
    }
}

/// Merge an ordered sequence of per-file roots into one combined tree.
///
/// Deterministic and side-effect-free. An empty input yields an empty
/// merged tree.
pub fn merge(roots: &[Arc<RootDeclaration>]) -> Result<MergedRoot, MergeError> {
    debug!(roots = roots.len(), "merging root declarations");

    let mut seen = FxHashSet::default();
    for root in roots {
        if !seen.insert(root.file) {
            return Err(MergeError::DuplicateFile { file: root.file });
        }
    }

    let components: Vec<Arc<SingleNamespace>> =
        roots.iter().map(|root| root.namespace.clone()).collect();
    let namespace = merge_namespaces(SmolStr::default(), components)?;

    Ok(MergedRoot {
        declarations: roots.to_vec(),
        namespace,
    })
}

fn merge_namespaces(
    name: SmolStr,
    components: Vec<Arc<SingleNamespace>>,
) -> Result<Arc<MergedNamespace>, MergeError> {
    // IndexMap grouping preserves first-encounter order across components.
    let mut child_namespaces: IndexMap<SmolStr, Vec<Arc<SingleNamespace>>> = IndexMap::new();
    let mut child_types: IndexMap<(SmolStr, usize), Vec<Arc<SingleType>>> = IndexMap::new();

    for component in &components {
        for member in &component.members {
            match member {
                SingleMember::Namespace(ns) => child_namespaces
                    .entry(ns.name.clone())
                    .or_default()
                    .push(ns.clone()),
                SingleMember::Type(ty) => child_types
                    .entry((ty.name.clone(), ty.arity))
                    .or_default()
                    .push(ty.clone()),
            }
        }
    }

    let namespaces = child_namespaces
        .into_iter()
        .map(|(child_name, group)| merge_namespaces(child_name, group))
        .collect::<Result<Vec<_>, _>>()?;
    let types = child_types
        .into_iter()
        .map(|((child_name, arity), group)| merge_types(child_name, arity, group))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Arc::new(MergedNamespace {
        name,
        components,
        namespaces,
        types,
    }))
}

fn merge_types(
    name: SmolStr,
    arity: usize,
    components: Vec<Arc<SingleType>>,
) -> Result<Arc<MergedType>, MergeError> {
    // Groups are created non-empty.
    let kind = components[0].kind;
    for component in &components[1..] {
        if component.kind != kind {
            return Err(MergeError::KindConflict {
                name,
                arity,
                first: kind,
                second: component.kind,
            });
        }
    }

    let mut nested_groups: IndexMap<(SmolStr, usize), Vec<Arc<SingleType>>> = IndexMap::new();
    for component in &components {
        for nested in &component.nested {
            nested_groups
                .entry((nested.name.clone(), nested.arity))
                .or_default()
                .push(nested.clone());
        }
    }
    let nested = nested_groups
        .into_iter()
        .map(|((nested_name, nested_arity), group)| merge_types(nested_name, nested_arity, group))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Arc::new(MergedType {
        name,
        kind,
        arity,
        components,
        nested,
    }))
}

fn combine_namespace(
    old: &Arc<MergedNamespace>,
    addition: &Arc<SingleNamespace>,
) -> Result<Arc<MergedNamespace>, MergeError> {
    let mut added_namespaces: IndexMap<SmolStr, Vec<Arc<SingleNamespace>>> = IndexMap::new();
    let mut added_types: IndexMap<(SmolStr, usize), Vec<Arc<SingleType>>> = IndexMap::new();

    for member in &addition.members {
        match member {
            SingleMember::Namespace(ns) => added_namespaces
                .entry(ns.name.clone())
                .or_default()
                .push(ns.clone()),
            SingleMember::Type(ty) => added_types
                .entry((ty.name.clone(), ty.arity))
                .or_default()
                .push(ty.clone()),
        }
    }

    let mut components = old.components.clone();
    components.push(addition.clone());

    // Children the addition does not touch are shared, not rebuilt.
    let mut namespaces = Vec::with_capacity(old.namespaces.len() + added_namespaces.len());
    for child in &old.namespaces {
        match added_namespaces.shift_remove(&child.name) {
            None => namespaces.push(child.clone()),
            Some(group) => {
                let mut updated = child.clone();
                for ns in &group {
                    updated = combine_namespace(&updated, ns)?;
                }
                namespaces.push(updated);
            }
        }
    }
    for (child_name, group) in added_namespaces {
        namespaces.push(merge_namespaces(child_name, group)?);
    }

    let mut types = Vec::with_capacity(old.types.len() + added_types.len());
    for child in &old.types {
        match added_types.shift_remove(&(child.name.clone(), child.arity)) {
            None => types.push(child.clone()),
            Some(group) => types.push(combine_type(child, group)?),
        }
    }
    for ((child_name, arity), group) in added_types {
        types.push(merge_types(child_name, arity, group)?);
    }

    Ok(Arc::new(MergedNamespace {
        name: old.name.clone(),
        components,
        namespaces,
        types,
    }))
}

fn combine_type(
    old: &Arc<MergedType>,
    additions: Vec<Arc<SingleType>>,
) -> Result<Arc<MergedType>, MergeError> {
    for addition in &additions {
        if addition.kind != old.kind {
            return Err(MergeError::KindConflict {
                name: old.name.clone(),
                arity: old.arity,
                first: old.kind,
                second: addition.kind,
            });
        }
    }

    let mut components = old.components.clone();
    components.extend(additions.iter().cloned());

    let mut added_nested: IndexMap<(SmolStr, usize), Vec<Arc<SingleType>>> = IndexMap::new();
    for addition in &additions {
        for nested in &addition.nested {
            added_nested
                .entry((nested.name.clone(), nested.arity))
                .or_default()
                .push(nested.clone());
        }
    }

    let mut nested = Vec::with_capacity(old.nested.len() + added_nested.len());
    for child in &old.nested {
        match added_nested.shift_remove(&(child.name.clone(), child.arity)) {
            None => nested.push(child.clone()),
            Some(group) => nested.push(combine_type(child, group)?),
        }
    }
    for ((child_name, arity), group) in added_nested {
        nested.push(merge_types(child_name, arity, group)?);
    }

    Ok(Arc::new(MergedType {
        name: old.name.clone(),
        kind: old.kind,
        arity: old.arity,
        components,
        nested,
    }))
}
