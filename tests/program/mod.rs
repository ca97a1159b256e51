//! Program host tests
//!
//! - Incremental edits reach the same state as a fresh load
//! - Edit transactions and API errors

mod tests_edits;
