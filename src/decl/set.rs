//! The owning declaration set: old roots, the latest root, and the cache.
//!
//! A [`DeclarationSet`] is an immutable value. It splits its roots into a
//! stable old collection and one volatile latest slot, and pairs the old
//! collection with a [`DeclarationCache`] built over exactly that snapshot.
//! Edits produce a new set:
//!
//! * replacing only the latest root keeps the old collection, and with it
//!   the cache and everything the cache has already computed;
//! * changing the old collection discards the cache and pairs the new
//!   collection with a fresh, empty one.
//!
//! Reads that span the whole set take the cached old-portion view and
//! compose the latest root on top per call; the composition is never
//! stored.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use indexmap::IndexSet;
use tracing::debug;

use crate::base::SmolStr;
use crate::diagnostics::Diagnostic;

use super::cache::DeclarationCache;
use super::directive::ReferenceDirective;
use super::merged::{MergeError, MergedRoot};
use super::names::{self, NameSet};
use super::single::RootDeclaration;

// ============================================================================
// OLD COLLECTION
// ============================================================================

/// Identity handle over a root declaration. Two handles are equal only
/// when they wrap the same allocation.
#[derive(Clone, Debug)]
struct RootHandle(Arc<RootDeclaration>);

impl PartialEq for RootHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for RootHandle {}

impl Hash for RootHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Arc::as_ptr(&self.0), state);
    }
}

/// The stable portion of a declaration set: root declarations keyed by
/// identity, in insertion order.
#[derive(Clone, Debug, Default)]
pub struct OldDeclarations {
    roots: IndexSet<RootHandle>,
}

impl OldDeclarations {
    /// The empty collection.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Collect roots in order. A root that is pointer-identical to an
    /// earlier one keeps its first position.
    pub fn from_roots(roots: impl IntoIterator<Item = Arc<RootDeclaration>>) -> Self {
        Self {
            roots: roots.into_iter().map(RootHandle).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Roots in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<RootDeclaration>> + '_ {
        self.roots.iter().map(|handle| &handle.0)
    }

    /// Identity membership: true only for the exact allocation.
    pub fn contains(&self, root: &Arc<RootDeclaration>) -> bool {
        self.roots.contains(&RootHandle(root.clone()))
    }

    /// The ordered root sequence as a vector.
    pub fn to_vec(&self) -> Vec<Arc<RootDeclaration>> {
        self.iter().cloned().collect()
    }

    fn with_added(&self, root: Arc<RootDeclaration>) -> Self {
        let mut roots = self.roots.clone();
        roots.insert(RootHandle(root));
        Self { roots }
    }

    fn with_removed(&self, root: &Arc<RootDeclaration>) -> Self {
        let mut roots = self.roots.clone();
        roots.shift_remove(&RootHandle(root.clone()));
        Self { roots }
    }
}

// ============================================================================
// DECLARATION SET
// ============================================================================

/// An immutable set of root declarations with a memoizing cache over its
/// stable portion.
///
/// The most recently added root sits in a separate latest slot so that
/// the add-read-replace editing rhythm never invalidates the cache: the
/// cache covers the old collection only, and whole-set reads compose the
/// latest root on top at call time.
///
/// # Example
///
/// ```
/// use tern_decl::decl::DeclarationSet;
/// use tern_decl::syntax::parse_file;
/// use tern_decl::base::FileId;
///
/// let parsed = parse_file(FileId::new(0), "class Vehicle { }");
/// let set = DeclarationSet::new().add_root(parsed.root);
///
/// assert!(set.type_names().unwrap().contains("Vehicle"));
/// ```
#[derive(Clone)]
pub struct DeclarationSet {
    olds: Arc<OldDeclarations>,
    latest: Option<Arc<RootDeclaration>>,
    cache: Arc<DeclarationCache>,
}

impl DeclarationSet {
    /// The empty set, with an empty cache.
    pub fn new() -> Self {
        let olds = Arc::new(OldDeclarations::empty());
        let cache = Arc::new(DeclarationCache::new(olds.clone()));
        Self {
            olds,
            latest: None,
            cache,
        }
    }

    /// Build a set from roots in order. The last root becomes the latest;
    /// the rest form the old collection.
    pub fn from_roots(roots: impl IntoIterator<Item = Arc<RootDeclaration>>) -> Self {
        roots
            .into_iter()
            .fold(Self::new(), |set, root| set.add_root(root))
    }

    /// Add a root declaration.
    ///
    /// When the latest slot is empty the root takes it and the cache is
    /// reused untouched. When it is occupied, the previous latest is
    /// promoted into a new old collection, a fresh cache is paired with
    /// it, and the added root becomes the latest.
    pub fn add_root(&self, root: Arc<RootDeclaration>) -> Self {
        match &self.latest {
            None => Self {
                olds: self.olds.clone(),
                latest: Some(root),
                cache: self.cache.clone(),
            },
            Some(previous) => {
                debug!(file = %previous.file, "promoting latest root into the old collection");
                let olds = Arc::new(self.olds.with_added(previous.clone()));
                let cache = Arc::new(DeclarationCache::new(olds.clone()));
                Self {
                    olds,
                    latest: Some(root),
                    cache,
                }
            }
        }
    }

    /// Remove a root declaration, matched by identity.
    ///
    /// Removing the latest root clears the slot and keeps the cache.
    /// Removing an old root produces a new old collection with a fresh
    /// cache. Removing a root the set does not hold changes nothing.
    pub fn remove_root(&self, root: &Arc<RootDeclaration>) -> Self {
        if let Some(latest) = &self.latest {
            if Arc::ptr_eq(latest, root) {
                return Self {
                    olds: self.olds.clone(),
                    latest: None,
                    cache: self.cache.clone(),
                };
            }
        }
        if !self.olds.contains(root) {
            return self.clone();
        }

        debug!(file = %root.file, "removing root from the old collection");
        let olds = Arc::new(self.olds.with_removed(root));
        let cache = Arc::new(DeclarationCache::new(olds.clone()));
        Self {
            olds,
            latest: self.latest.clone(),
            cache,
        }
    }

    // ========================================================================
    // WHOLE-SET VIEWS
    // ========================================================================

    /// The merged tree over every root in the set.
    ///
    /// Without a latest root this is the cached old tree itself. With one,
    /// the latest root is combined on top of the cached tree per call.
    pub fn merged_root(&self) -> Result<Arc<MergedRoot>, MergeError> {
        let old = self.cache.merged_root()?;
        match &self.latest {
            None => Ok(old),
            Some(latest) => old.combine(latest).map(Arc::new),
        }
    }

    /// Distinct type names across the whole set.
    pub fn type_names(&self) -> Result<KnownNames, MergeError> {
        let base = self.cache.type_names()?;
        let extra = match &self.latest {
            Some(latest) => names::type_names_in(&latest.namespace),
            None => NameSet::default(),
        };
        Ok(KnownNames { base, extra })
    }

    /// Distinct namespace names across the whole set.
    pub fn namespace_names(&self) -> Result<KnownNames, MergeError> {
        let base = self.cache.namespace_names()?;
        let extra = match &self.latest {
            Some(latest) => names::namespace_names_in(&latest.namespace),
            None => NameSet::default(),
        };
        Ok(KnownNames { base, extra })
    }

    /// Reference directives across the whole set, old roots first.
    pub fn reference_directives(&self) -> Result<Vec<ReferenceDirective>, MergeError> {
        let mut directives = self.cache.reference_directives()?.to_vec();
        if let Some(latest) = &self.latest {
            directives.extend(latest.reference_directives.iter().cloned());
        }
        Ok(directives)
    }

    /// Directive diagnostics across the whole set, old roots first.
    pub fn reference_directive_diagnostics(&self) -> Result<Vec<Diagnostic>, MergeError> {
        let mut diagnostics = self.cache.reference_directive_diagnostics()?.to_vec();
        if let Some(latest) = &self.latest {
            diagnostics.extend(latest.directive_diagnostics.iter().cloned());
        }
        Ok(diagnostics)
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    /// The cache paired with the current old collection.
    pub fn cache(&self) -> &Arc<DeclarationCache> {
        &self.cache
    }

    /// The stable old collection.
    pub fn old_declarations(&self) -> &Arc<OldDeclarations> {
        &self.olds
    }

    /// The most recently added root, if any.
    pub fn latest(&self) -> Option<&Arc<RootDeclaration>> {
        self.latest.as_ref()
    }

    /// Every root in the set: old roots in insertion order, then the
    /// latest.
    pub fn root_declarations(&self) -> Vec<Arc<RootDeclaration>> {
        let mut roots = self.olds.to_vec();
        roots.extend(self.latest.iter().cloned());
        roots
    }

    pub fn len(&self) -> usize {
        self.olds.len() + usize::from(self.latest.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.olds.is_empty() && self.latest.is_none()
    }
}

impl Default for DeclarationSet {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// NAME UNION VIEW
// ============================================================================

/// Read-only union of the cached old name set and the latest root's names.
///
/// The old half is shared with the cache, never copied; only the latest
/// root's names are collected per call.
#[derive(Clone, Debug)]
pub struct KnownNames {
    base: Arc<NameSet>,
    extra: NameSet,
}

impl KnownNames {
    pub fn contains(&self, name: &str) -> bool {
        self.base.contains(name) || self.extra.contains(name)
    }

    /// Number of distinct names across both halves.
    pub fn len(&self) -> usize {
        let fresh = self
            .extra
            .iter()
            .filter(|name| !self.base.contains(name.as_str()))
            .count();
        self.base.len() + fresh
    }

    pub fn is_empty(&self) -> bool {
        self.base.is_empty() && self.extra.is_empty()
    }

    /// Distinct names in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &SmolStr> + '_ {
        let fresh = self
            .extra
            .iter()
            .filter(|name| !self.base.contains(name.as_str()));
        self.base.iter().chain(fresh)
    }
}
