//! Identity types for documents and statements.

use std::fmt;

/// Interned document identifier.
///
/// Documents are numbered by the [`Program`](crate::program::Program) that
/// owns them. Ids are never reused within a program.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentId(pub u32);

impl DocumentId {
    /// Create a new DocumentId from a raw index.
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Get the raw index.
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "doc#{}", self.0)
    }
}

/// Stable identity of one statement within a document.
///
/// An updated line gets a fresh id; the old statement is gone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StatementId {
    pub document: DocumentId,
    pub local: u32,
}

impl StatementId {
    pub const fn new(document: DocumentId, local: u32) -> Self {
        Self { document, local }
    }
}

impl fmt::Display for StatementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:s{}", self.document, self.local)
    }
}
