//! Graph vertices: one per uniquely-named declaration path.

use indexmap::{IndexMap, IndexSet};

use super::EdgeId;
use crate::base::{Name, TypePath};
use crate::syntax::SpanId;

/// Arena key of a [`Node`]. Ids stay valid for as long as the node has at
/// least one declaration and are never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

/// One declared name at one scope.
///
/// A node exists while at least one declaration span declares its path.
/// Fragmented declarations of the same path (two `Sound` lines under the
/// same container) share a node.
#[derive(Clone, Debug)]
pub struct Node {
    pub(super) id: NodeId,
    pub(super) subject: Name,
    pub(super) container: Option<NodeId>,
    pub(super) path: TypePath,
    pub(super) declarations: IndexSet<SpanId>,
    /// Annotation subject → the edge aggregating every span that asserts it.
    pub(super) outbounds: IndexMap<Name, EdgeId>,
    /// Edges that list this node as a candidate successor.
    pub(super) inbounds: IndexSet<EdgeId>,
    pub(super) contents: IndexMap<Name, NodeId>,
}

impl Node {
    pub(super) fn new(id: NodeId, path: TypePath, container: Option<NodeId>) -> Self {
        Self {
            id,
            subject: path.tip().clone(),
            container,
            path,
            declarations: IndexSet::new(),
            outbounds: IndexMap::new(),
            inbounds: IndexSet::new(),
            contents: IndexMap::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn subject(&self) -> &Name {
        &self.subject
    }

    pub fn container(&self) -> Option<NodeId> {
        self.container
    }

    pub fn path(&self) -> &TypePath {
        &self.path
    }

    pub fn declarations(&self) -> impl Iterator<Item = SpanId> + '_ {
        self.declarations.iter().copied()
    }

    pub fn outbounds(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.outbounds.values().copied()
    }

    /// The outbound edge for one annotation subject.
    pub fn outbound(&self, subject: &str) -> Option<EdgeId> {
        self.outbounds.get(subject).copied()
    }

    pub fn inbounds(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.inbounds.iter().copied()
    }

    /// A directly contained node by name.
    pub fn content(&self, subject: &str) -> Option<NodeId> {
        self.contents.get(subject).copied()
    }

    pub fn contents(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.contents.values().copied()
    }
}
