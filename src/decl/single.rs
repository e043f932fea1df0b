//! Per-file declaration trees.
//!
//! A [`RootDeclaration`] is the immutable declaration skeleton of one
//! source file: its namespace/type structure, the `#ref` directives at its
//! head, and any diagnostics those directives produced. All nodes are
//! `Arc`-shared so merged trees can reference constituents without cloning.

use std::fmt;
use std::sync::Arc;

use crate::base::{FileId, SmolStr, TextRange};
use crate::diagnostics::Diagnostic;

use super::directive::ReferenceDirective;

/// The kind of a type declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Struct,
    Interface,
    Enum,
}

impl TypeKind {
    /// The source keyword introducing this kind.
    pub fn keyword(&self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Struct => "struct",
            TypeKind::Interface => "interface",
            TypeKind::Enum => "enum",
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A single type declaration within one file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SingleType {
    /// Simple (ungeneric) name.
    pub name: SmolStr,
    /// Declaration kind.
    pub kind: TypeKind,
    /// Number of generic parameters (0 for non-generic types).
    pub arity: usize,
    /// Byte range of the whole declaration.
    pub range: TextRange,
    /// Type declarations nested directly in this type's body.
    pub nested: Vec<Arc<SingleType>>,
}

impl SingleType {
    /// Create a type declaration with no nested types.
    pub fn new(name: impl Into<SmolStr>, kind: TypeKind, arity: usize, range: TextRange) -> Self {
        Self {
            name: name.into(),
            kind,
            arity,
            range,
            nested: Vec::new(),
        }
    }

    /// Attach nested type declarations.
    pub fn with_nested(mut self, nested: Vec<Arc<SingleType>>) -> Self {
        self.nested = nested;
        self
    }
}

/// An ordered member of a namespace: a child namespace or a type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SingleMember {
    Namespace(Arc<SingleNamespace>),
    Type(Arc<SingleType>),
}

/// A namespace declaration within one file.
///
/// The file-level root namespace has the empty name; `namespace A.B { … }`
/// expands to nested single-segment namespaces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SingleNamespace {
    /// Namespace segment name; empty for the file-level root.
    pub name: SmolStr,
    /// Byte range of the whole declaration.
    pub range: TextRange,
    /// Members in source order.
    pub members: Vec<SingleMember>,
}

impl SingleNamespace {
    pub fn new(name: impl Into<SmolStr>, range: TextRange, members: Vec<SingleMember>) -> Self {
        Self {
            name: name.into(),
            range,
            members,
        }
    }

    /// Whether this is the anonymous file-level root namespace.
    pub fn is_root(&self) -> bool {
        self.name.is_empty()
    }
}

/// The declaration skeleton of one source file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RootDeclaration {
    /// The file this declaration was parsed from.
    pub file: FileId,
    /// The anonymous file-level root namespace.
    pub namespace: Arc<SingleNamespace>,
    /// `#ref` directives at the head of the file, in source order.
    pub reference_directives: Arc<[ReferenceDirective]>,
    /// Diagnostics produced while reading the directives.
    pub directive_diagnostics: Arc<[Diagnostic]>,
}

impl RootDeclaration {
    /// Create a root declaration with no reference directives.
    pub fn new(file: FileId, namespace: Arc<SingleNamespace>) -> Self {
        Self {
            file,
            namespace,
            reference_directives: Arc::from([]),
            directive_diagnostics: Arc::from([]),
        }
    }

    /// Attach reference directives and their diagnostics.
    pub fn with_directives(
        mut self,
        directives: Vec<ReferenceDirective>,
        diagnostics: Vec<Diagnostic>,
    ) -> Self {
        self.reference_directives = directives.into();
        self.directive_diagnostics = diagnostics.into();
        self
    }
}
