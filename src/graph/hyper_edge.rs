//! Hyperedges: "who annotates whom".

use indexmap::IndexSet;

use super::NodeId;
use crate::base::Name;
use crate::syntax::SpanId;

/// Arena key of a [`HyperEdge`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId(pub u32);

/// A candidate target of an annotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Successor {
    pub node: NodeId,
    /// Containment levels crossed from the predecessor's container to reach
    /// the candidate. Smaller is closer.
    pub longitude: u32,
}

/// One annotated name on a predecessor node, aggregating every annotation
/// span that asserts it, and every node that name could refer to.
#[derive(Clone, Debug)]
pub struct HyperEdge {
    pub(super) id: EdgeId,
    pub(super) predecessor: NodeId,
    pub(super) subject: Name,
    pub(super) sources: IndexSet<SpanId>,
    pub(super) successors: Vec<Successor>,
}

impl HyperEdge {
    pub(super) fn new(id: EdgeId, predecessor: NodeId, subject: Name) -> Self {
        Self {
            id,
            predecessor,
            subject,
            sources: IndexSet::new(),
            successors: Vec::new(),
        }
    }

    pub fn id(&self) -> EdgeId {
        self.id
    }

    pub fn predecessor(&self) -> NodeId {
        self.predecessor
    }

    pub fn subject(&self) -> &Name {
        &self.subject
    }

    pub fn sources(&self) -> impl Iterator<Item = SpanId> + '_ {
        self.sources.iter().copied()
    }

    /// Candidates, nearest scope first.
    pub fn successors(&self) -> &[Successor] {
        &self.successors
    }

    /// Replace the candidate list. Candidates are kept sorted by ascending
    /// longitude; equal longitudes keep their discovery order.
    pub fn set_successors(&mut self, mut successors: Vec<Successor>) {
        successors.sort_by_key(|s| s.longitude);
        self.successors = successors;
    }
}
