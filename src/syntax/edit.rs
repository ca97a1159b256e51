//! Edit transactions over a document.
//!
//! A transaction records statement-level edits; planning replays them on a
//! scratch copy to validate indexes and to work out which parent statements
//! have changing descendants. The host then brackets the mutation with
//! invalidate/revalidate notifications for exactly those parents.

use std::sync::Arc;

use indexmap::IndexSet;
use rustc_hash::FxHashSet;
use thiserror::Error;

use super::document::{Document, ancestor_for, parent_in};
use super::statement::Statement;
use crate::base::StatementId;

/// Errors raised while planning an edit. Nothing is applied when planning
/// fails.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    /// An edit addressed a statement position past the end of the document.
    #[error("statement index {index} out of range (document has {len} statements)")]
    OutOfRange { index: usize, len: usize },
}

/// A single recorded edit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditOp {
    Insert { at: usize, text: String },
    Delete { at: usize, count: usize },
    Update { at: usize, text: String },
}

/// Records the edits of one transaction. Edits apply in order, each seeing
/// the positions left by the previous one.
#[derive(Debug, Default)]
pub struct EditTransaction {
    ops: Vec<EditOp>,
}

impl EditTransaction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a line before position `at` (`at == len` appends).
    pub fn insert(&mut self, at: usize, text: impl Into<String>) -> &mut Self {
        self.ops.push(EditOp::Insert {
            at,
            text: text.into(),
        });
        self
    }

    /// Delete `count` lines starting at `at`.
    pub fn delete(&mut self, at: usize, count: usize) -> &mut Self {
        self.ops.push(EditOp::Delete { at, count });
        self
    }

    /// Replace the line at `at`.
    pub fn update(&mut self, at: usize, text: impl Into<String>) -> &mut Self {
        self.ops.push(EditOp::Update {
            at,
            text: text.into(),
        });
        self
    }

    pub fn ops(&self) -> &[EditOp] {
        &self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub(crate) fn into_ops(self) -> Vec<EditOp> {
        self.ops
    }
}

/// Outcome of planning: the statement list after every edit, and the parents
/// whose descendants change (empty meaning the whole document).
#[derive(Debug)]
pub(crate) struct EditPlan {
    pub statements: Vec<Arc<Statement>>,
    pub parents: Vec<StatementId>,
}

/// Collects the parents touched while replaying edits.
#[derive(Default)]
struct Touched {
    parents: IndexSet<StatementId>,
    whole: bool,
}

impl Touched {
    fn note(&mut self, statements: &[Arc<Statement>], parent: Option<usize>) {
        match parent {
            Some(index) => {
                self.parents.insert(statements[index].id);
            }
            None => self.whole = true,
        }
    }
}

impl Document {
    /// Replay `ops` against a scratch copy of this document.
    pub(crate) fn plan(&mut self, ops: Vec<EditOp>) -> Result<EditPlan, EditError> {
        let mut scratch: Vec<Arc<Statement>> = self.statements().to_vec();
        let mut touched = Touched::default();

        for op in ops {
            match op {
                EditOp::Insert { at, text } => {
                    if at > scratch.len() {
                        return Err(EditError::OutOfRange {
                            index: at,
                            len: scratch.len(),
                        });
                    }
                    let statement = self.read_statement(&text);
                    if !statement.is_noop() {
                        touched.note(&scratch, ancestor_for(&scratch, at, statement.indent));
                    }
                    scratch.insert(at, statement);
                }
                EditOp::Delete { at, count } => {
                    let end = at.saturating_add(count);
                    if end > scratch.len() {
                        return Err(EditError::OutOfRange {
                            index: end.saturating_sub(1),
                            len: scratch.len(),
                        });
                    }
                    for index in at..end {
                        if !scratch[index].is_noop() {
                            touched.note(&scratch, parent_in(&scratch, index));
                        }
                    }
                    scratch.drain(at..end);
                }
                EditOp::Update { at, text } => {
                    if at >= scratch.len() {
                        return Err(EditError::OutOfRange {
                            index: at,
                            len: scratch.len(),
                        });
                    }
                    if !scratch[at].is_noop() {
                        touched.note(&scratch, parent_in(&scratch, at));
                    }
                    let statement = self.read_statement(&text);
                    if !statement.is_noop() {
                        touched.note(&scratch, ancestor_for(&scratch, at, statement.indent));
                    }
                    scratch[at] = statement;
                }
            }
        }

        // Parents must exist on both sides of the mutation, otherwise the
        // invalidated and revalidated regions would not line up.
        if !touched.whole {
            let after: FxHashSet<StatementId> = scratch.iter().map(|s| s.id).collect();
            touched.whole = touched
                .parents
                .iter()
                .any(|p| self.position(*p).is_none() || !after.contains(p));
        }

        let parents = if touched.whole {
            Vec::new()
        } else {
            touched.parents.into_iter().collect()
        };

        tracing::trace!(
            document = %self.id(),
            parents = parents.len(),
            "planned edit"
        );

        Ok(EditPlan {
            statements: scratch,
            parents,
        })
    }
}
