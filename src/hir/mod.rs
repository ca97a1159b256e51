//! Resolution core: parallels, bases, contracts and faults.
//!
//! Everything in this module is derived from one version of the
//! declaration graph and lives in a [`ResolutionSession`]. The session is a
//! cache: it is discarded when the graph changes, never patched.
//!
//! ## Key Types
//!
//! - [`ConstructionWorker`]: drills type paths into resolved [`Parallel`]s
//! - [`Parallel`]: one type path as seen by a session, explicit or implicit
//! - [`Contract`]: bases an override must keep from what it overrides
//! - [`Cruft`]: write-once registry of faulty nodes, edges and spans
//! - [`Fault`] / [`FaultCollector`]: located data errors
//!
//! ## Passes
//!
//! ```text
//! prepare                  ← mark statement-level cruft (mixed indents)
//!     │
//!     ▼
//! drill(path)              ← surface, then descend + rake per segment
//!     │
//!     ▼
//! sanitize                 ← cut circular base chains
//! ```

mod contract;
mod cruft;
mod faults;
mod parallel;
mod sanitizer;
mod session;
mod worker;

pub use contract::Contract;
pub use cruft::{Cruft, CruftTarget};
pub use faults::{Fault, FaultCollector, FaultKind, Severity, codes};
pub use parallel::{ExplicitParallel, Parallel, ParallelId, ParallelKind};
pub use session::ResolutionSession;
pub use worker::ConstructionWorker;

/// Options for one resolution session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Enforce contracts on overrides. When off, polymorphic edges resolve
    /// to the nearest drillable candidate and no violations are reported.
    pub check_contracts: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            check_contracts: true,
        }
    }
}
