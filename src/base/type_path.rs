//! Type paths: ordered names from a document root down to a declaration.

use std::fmt;

use super::{DocumentId, Name};

/// Separator used when a type path is written as text (`Dog/Sound`).
pub const PATH_SEPARATOR: char = '/';

/// A sequence of names from a document root to a declaration.
///
/// Type paths are the identity of both graph nodes and parallels: at most one
/// of each exists per path.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypePath {
    document: DocumentId,
    names: Vec<Name>,
}

impl TypePath {
    /// Create a type path. Returns `None` for an empty name list.
    pub fn new(document: DocumentId, names: Vec<Name>) -> Option<Self> {
        if names.is_empty() {
            return None;
        }
        Some(Self { document, names })
    }

    /// Parse `A/B/C` into a type path. Segments are trimmed; empty segments
    /// make the whole path invalid.
    pub fn parse(document: DocumentId, text: &str) -> Option<Self> {
        let names: Vec<Name> = text
            .split(PATH_SEPARATOR)
            .map(|segment| Name::new(segment.trim()))
            .collect();
        if names.iter().any(|n| n.is_empty()) {
            return None;
        }
        Self::new(document, names)
    }

    pub fn document(&self) -> DocumentId {
        self.document
    }

    pub fn names(&self) -> &[Name] {
        &self.names
    }

    /// The first segment: the root-level name this path starts from.
    pub fn surface(&self) -> &Name {
        &self.names[0]
    }

    /// The last segment.
    pub fn tip(&self) -> &Name {
        &self.names[self.names.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True for a path with no segments. Parsed paths always have one.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// True for a single-segment (root-level) path.
    pub fn is_root(&self) -> bool {
        self.names.len() == 1
    }

    /// The first `len` segments. `len` is clamped to `1..=self.len()`.
    pub fn prefix(&self, len: usize) -> TypePath {
        let len = len.clamp(1, self.names.len());
        Self {
            document: self.document,
            names: self.names[..len].to_vec(),
        }
    }

    /// The path of the containing declaration, or `None` at the root.
    pub fn container(&self) -> Option<TypePath> {
        if self.is_root() {
            None
        } else {
            Some(self.prefix(self.names.len() - 1))
        }
    }

    /// This path extended by one segment.
    pub fn child(&self, name: &Name) -> TypePath {
        let mut names = self.names.clone();
        names.push(name.clone());
        Self {
            document: self.document,
            names,
        }
    }

    /// True when `self` equals `other` or lies inside it.
    pub fn starts_with(&self, other: &TypePath) -> bool {
        self.document == other.document && self.names.starts_with(&other.names)
    }
}

impl fmt::Display for TypePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, name) in self.names.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", PATH_SEPARATOR)?;
            }
            write!(f, "{}", name)?;
        }
        Ok(())
    }
}
