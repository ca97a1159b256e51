//! Error types for program operations.

use thiserror::Error;

use crate::base::DocumentId;
use crate::syntax::EditError;

/// Errors from misusing the [`Program`](super::Program) API.
///
/// Faults in document content are not errors; they are collected by the
/// resolution session.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProgramError {
    /// The document was never added, or has been removed.
    #[error("unknown document: {0}")]
    UnknownDocument(DocumentId),

    /// An edit transaction could not be planned. Nothing was applied.
    #[error("invalid edit: {0}")]
    Edit(#[from] EditError),

    /// A type path string with no names or an empty segment.
    #[error("invalid type path: `{0}`")]
    InvalidPath(String),
}

impl ProgramError {
    pub fn invalid_path(text: impl Into<String>) -> Self {
        Self::InvalidPath(text.into())
    }
}
