//! # truth-base
//!
//! Core library for the Truth outline language: an incremental declaration
//! graph and the polymorphic type resolution engine that walks it.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! program   → Program host: documents, edit transactions, versioned sessions
//!   ↓
//! hir       → Resolution core: faults, cruft, parallels, contracts, worker
//!   ↓
//! graph     → Declaration graph: nodes, hyperedges, include / exclude
//!   ↓
//! syntax    → Statements, spans, documents, edit transactions
//!   ↓
//! base      → Primitives (DocumentId, StatementId, Name, TypePath)
//! ```

// ============================================================================
// MODULES (dependency order: base → syntax → graph → hir → program)
// ============================================================================

/// Foundation types: ids, names, type paths
pub mod base;

/// Syntax: statements, spans, documents and edits
pub mod syntax;

/// Declaration graph kept in sync with documents
pub mod graph;

/// Resolution: parallels, bases, contracts, faults
pub mod hir;

/// Program host
pub mod program;

// Re-export foundation types
pub use base::{DocumentId, Name, StatementId, TextRange, TextSize, TypePath};

// Re-export the entry points
pub use hir::{ConstructionWorker, Fault, FaultKind, ParallelId, ResolveOptions, Severity};
pub use program::{Program, ProgramError, ProgramOptions};
