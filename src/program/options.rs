//! Program configuration.

use crate::hir::ResolveOptions;

/// Options fixed for the lifetime of a [`Program`](super::Program).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgramOptions {
    /// Columns a tab counts for when measuring indentation.
    pub tab_size: usize,
    pub resolve: ResolveOptions,
}

impl Default for ProgramOptions {
    fn default() -> Self {
        Self {
            tab_size: 4,
            resolve: ResolveOptions::default(),
        }
    }
}

impl ProgramOptions {
    pub fn with_tab_size(mut self, tab_size: usize) -> Self {
        self.tab_size = tab_size;
        self
    }

    pub fn with_contracts(mut self, check_contracts: bool) -> Self {
        self.resolve.check_contracts = check_contracts;
        self
    }
}
