//! Foundation types for the Truth toolchain.
//!
//! This module provides fundamental types used throughout the compiler:
//! - [`DocumentId`], [`StatementId`] - Stable identities for documents and statements
//! - [`Name`] - Cheap-to-clone subject strings
//! - [`TypePath`] - Sequence of names from a document root to a declaration
//! - [`TextRange`], [`TextSize`] - Byte offsets within a statement
//!
//! This module has NO dependencies on other truth modules.

mod ids;
mod type_path;

pub use ids::{DocumentId, StatementId};
pub use type_path::TypePath;

/// A declared or annotated name. Cloning is cheap for short names.
pub type Name = smol_str::SmolStr;

// Re-export text-size types for convenience
pub use text_size::{TextRange, TextSize};
