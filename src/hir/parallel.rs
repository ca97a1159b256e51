//! Parallels: per-session projections of type paths.

use std::fmt;

use indexmap::{IndexMap, IndexSet};

use super::contract::Contract;
use crate::base::TypePath;
use crate::graph::{EdgeId, NodeId};

/// Arena key of a [`Parallel`] within one resolution session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParallelId(pub u32);

impl fmt::Display for ParallelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

/// Resolution state of a parallel backed by a node.
#[derive(Clone, Debug)]
pub struct ExplicitParallel {
    pub(super) node: NodeId,
    /// Outbound edge → resolved base. At most one base per edge.
    pub(super) bases: IndexMap<EdgeId, ParallelId>,
    pub(super) contract: Option<Contract>,
}

impl ExplicitParallel {
    pub(super) fn new(node: NodeId) -> Self {
        Self {
            node,
            bases: IndexMap::new(),
            contract: None,
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn bases(&self) -> impl Iterator<Item = (EdgeId, ParallelId)> + '_ {
        self.bases.iter().map(|(e, p)| (*e, *p))
    }

    pub fn base(&self, edge: EdgeId) -> Option<ParallelId> {
        self.bases.get(&edge).copied()
    }

    /// `None` until raked, and for apexes or when contract checking is off.
    pub fn contract(&self) -> Option<&Contract> {
        self.contract.as_ref()
    }
}

#[derive(Clone, Debug)]
pub enum ParallelKind {
    Explicit(ExplicitParallel),
    /// Placeholder for a path with no node, keeping a multi-branch parallel
    /// graph connected.
    Implicit,
}

/// One type path as seen by a resolution session.
#[derive(Clone, Debug)]
pub struct Parallel {
    pub(super) id: ParallelId,
    pub(super) path: TypePath,
    pub(super) container: Option<ParallelId>,
    /// The same name reached through other ancestor chains (overridden
    /// parallels).
    pub(super) edges: IndexSet<ParallelId>,
    pub(super) kind: ParallelKind,
    pub(super) raked: bool,
}

impl Parallel {
    pub(super) fn new(
        id: ParallelId,
        path: TypePath,
        container: Option<ParallelId>,
        kind: ParallelKind,
    ) -> Self {
        Self {
            id,
            path,
            container,
            edges: IndexSet::new(),
            kind,
            raked: false,
        }
    }

    pub fn id(&self) -> ParallelId {
        self.id
    }

    pub fn path(&self) -> &TypePath {
        &self.path
    }

    pub fn container(&self) -> Option<ParallelId> {
        self.container
    }

    pub fn edges(&self) -> impl Iterator<Item = ParallelId> + '_ {
        self.edges.iter().copied()
    }

    pub fn kind(&self) -> &ParallelKind {
        &self.kind
    }

    pub fn explicit(&self) -> Option<&ExplicitParallel> {
        match &self.kind {
            ParallelKind::Explicit(explicit) => Some(explicit),
            ParallelKind::Implicit => None,
        }
    }

    pub(super) fn explicit_mut(&mut self) -> Option<&mut ExplicitParallel> {
        match &mut self.kind {
            ParallelKind::Explicit(explicit) => Some(explicit),
            ParallelKind::Implicit => None,
        }
    }

    pub fn is_explicit(&self) -> bool {
        self.explicit().is_some()
    }

    pub fn node(&self) -> Option<NodeId> {
        self.explicit().map(|e| e.node)
    }

    /// Resolved bases; always empty for implicit parallels.
    pub fn bases(&self) -> impl Iterator<Item = ParallelId> + '_ {
        self.explicit().into_iter().flat_map(|e| e.bases.values().copied())
    }

    /// Overrides nothing.
    pub fn is_apex(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn is_raked(&self) -> bool {
        self.raked
    }
}
