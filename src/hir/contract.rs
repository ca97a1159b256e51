//! Contracts: the bases an override must keep.

use indexmap::{IndexMap, IndexSet};

use super::parallel::ParallelId;

/// Conditions an explicit parallel's bases must satisfy, gathered from the
/// base graphs of the parallels it overrides.
///
/// A contract without conditions is open: any resolution satisfies it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Contract {
    /// Condition → satisfied.
    conditions: IndexMap<ParallelId, bool>,
}

impl Contract {
    pub fn new(conditions: impl IntoIterator<Item = ParallelId>) -> Self {
        Self {
            conditions: conditions.into_iter().map(|c| (c, false)).collect(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn conditions(&self) -> impl Iterator<Item = ParallelId> + '_ {
        self.conditions.keys().copied()
    }

    pub fn unsatisfied(&self) -> impl Iterator<Item = ParallelId> + '_ {
        self.conditions
            .iter()
            .filter(|&(_, satisfied)| !satisfied)
            .map(|(c, _)| *c)
    }

    pub fn has_unsatisfied(&self) -> bool {
        self.conditions.values().any(|satisfied| !satisfied)
    }

    /// Satisfy every still-unsatisfied condition found in `lineage` (a
    /// candidate base and everything it overrides or inherits). Returns how
    /// many conditions this call satisfied.
    pub fn try_satisfy_condition(&mut self, lineage: &IndexSet<ParallelId>) -> usize {
        let mut count = 0;
        for (condition, satisfied) in self.conditions.iter_mut() {
            if !*satisfied && lineage.contains(condition) {
                *satisfied = true;
                count += 1;
            }
        }
        count
    }
}
