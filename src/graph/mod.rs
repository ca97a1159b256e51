//! Declaration graph: incremental [`Node`]s and [`HyperEdge`]s.
//!
//! The graph mirrors every uniquely-named declaration path of every document
//! and every annotation relationship between them. It is kept in sync with
//! documents through paired notifications fired around each edit:
//!
//! ```text
//! invalidate(doc, parents)   ← before mutation: exclude the old region
//!     │
//!     ▼
//! (document mutation)
//!     │
//!     ▼
//! revalidate(doc, parents)   ← after mutation: include the new region,
//!                              then dispose of whatever is still empty
//! ```
//!
//! Disposal is deferred to `revalidate` so that a transaction deleting and
//! re-inserting the same declarations keeps node and edge identities.

mod hyper_edge;
mod node;

use std::cmp::Reverse;

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::base::{DocumentId, Name, StatementId, TypePath};
use crate::syntax::{Document, Span, SpanId};

pub use hyper_edge::{EdgeId, HyperEdge, Successor};
pub use node::{Node, NodeId};

/// The declaration graph of a whole program.
#[derive(Debug, Default)]
pub struct HyperGraph {
    nodes: FxHashMap<NodeId, Node>,
    edges: FxHashMap<EdgeId, HyperEdge>,
    next_node: u32,
    next_edge: u32,
    by_path: FxHashMap<TypePath, NodeId>,
    roots: FxHashMap<DocumentId, IndexMap<Name, NodeId>>,
    /// Edges per annotated name, for re-resolving successors when a node
    /// with that name appears or disappears.
    by_subject: FxHashMap<(DocumentId, Name), IndexSet<EdgeId>>,
    destabilized_nodes: IndexSet<NodeId>,
    destabilized_edges: IndexSet<EdgeId>,
    /// Document with an invalidate awaiting its revalidate.
    pending: Option<DocumentId>,
}

impl HyperGraph {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    /// Root-level node of `document` named `name`.
    pub fn read(&self, document: DocumentId, name: &str) -> Option<&Node> {
        self.roots
            .get(&document)
            .and_then(|roots| roots.get(name))
            .and_then(|id| self.nodes.get(id))
    }

    pub fn node_at(&self, path: &TypePath) -> Option<&Node> {
        self.by_path.get(path).and_then(|id| self.nodes.get(id))
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&HyperEdge> {
        self.edges.get(&id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn edges(&self) -> impl Iterator<Item = &HyperEdge> {
        self.edges.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Root-level nodes of one document, in declaration order.
    pub fn roots(&self, document: DocumentId) -> impl Iterator<Item = &Node> {
        self.roots
            .get(&document)
            .into_iter()
            .flat_map(|roots| roots.values())
            .filter_map(|id| self.nodes.get(id))
    }

    // ========================================================================
    // EDIT NOTIFICATIONS
    // ========================================================================

    /// Called before a document mutation. Excludes the descendants of
    /// `parents` (the whole document when empty).
    ///
    /// # Panics
    ///
    /// When another invalidate is still waiting for its revalidate.
    pub fn invalidate(&mut self, document: &Document, parents: &[StatementId]) {
        if let Some(open) = self.pending {
            panic!(
                "invalidate for {} while the transaction on {open} has not been revalidated",
                document.id()
            );
        }
        self.pending = Some(document.id());
        let region = document.region(parents);
        self.exclude(document, &region);
    }

    /// Called after a document mutation, with the same `parents` given to
    /// [`invalidate`](Self::invalidate). Includes the new region and disposes
    /// of nodes and edges that are still empty.
    ///
    /// # Panics
    ///
    /// When no invalidate for `document` is open.
    pub fn revalidate(&mut self, document: &Document, parents: &[StatementId]) {
        match self.pending.take() {
            Some(open) if open == document.id() => {}
            other => panic!(
                "revalidate for {} does not pair with the open invalidate ({other:?})",
                document.id()
            ),
        }
        let region = document.region(parents);
        self.include(document, &region);
        self.finalize();
    }

    // ========================================================================
    // INCLUDE / EXCLUDE
    // ========================================================================

    /// Attach the declarations of the statements at `region` (indexes into
    /// `document`) to their nodes, creating nodes as needed, then attach their
    /// annotations to outbound edges.
    ///
    /// Statements are processed breadth-first by nesting depth, so a
    /// container node always exists before its contents.
    ///
    /// # Panics
    ///
    /// When a container path has no node, which means the caller handed over
    /// a region whose ancestors were never included.
    pub fn include(&mut self, document: &Document, region: &[usize]) {
        let mut ordered: Vec<(usize, usize)> = region
            .iter()
            .copied()
            .filter(|&i| document.get(i).is_some_and(|s| !s.is_noop()))
            .map(|i| (document.depth(i), i))
            .collect();
        ordered.sort_by_key(|&(depth, _)| depth);

        let mut touched: IndexSet<NodeId> = IndexSet::new();
        for (_, index) in ordered {
            let Some(statement) = document.get(index) else {
                continue;
            };
            for span in &statement.declarations {
                for spine in document.factor(index, span) {
                    let path = spine.path();
                    let id = match self.by_path.get(&path) {
                        Some(&id) => id,
                        None => self.create_node(path),
                    };
                    self.node_mut(id).declarations.insert(span.id);
                    touched.insert(id);
                }
            }
        }

        // Edges resolve against positioned nodes, so they come second.
        for &id in &touched {
            let statements: IndexSet<StatementId> =
                self.node_mut(id).declarations.iter().map(|s| s.statement).collect();
            for statement_id in statements {
                let Some(statement) = document.statement(statement_id) else {
                    continue;
                };
                for annotation in &statement.annotations {
                    self.add_source(id, annotation);
                }
            }
        }

        debug!(
            document = %document.id(),
            statements = region.len(),
            nodes = touched.len(),
            "included region"
        );
    }

    /// Detach the declarations and annotations of the statements at `region`.
    ///
    /// Nodes left without declarations and edges left without sources are
    /// only marked destabilized; they are disposed of by the next
    /// [`revalidate`](Self::revalidate) if nothing re-populates them.
    pub fn exclude(&mut self, document: &Document, region: &[usize]) {
        for &index in region {
            let Some(statement) = document.get(index) else {
                continue;
            };
            if statement.is_noop() {
                continue;
            }
            for span in &statement.declarations {
                for spine in document.factor(index, span) {
                    let Some(&id) = self.by_path.get(&spine.path()) else {
                        continue;
                    };
                    let Some(node) = self.nodes.get_mut(&id) else {
                        continue;
                    };
                    node.declarations.shift_remove(&span.id);
                    for annotation in &statement.annotations {
                        let Some(edge_id) = node.outbounds.get(&annotation.subject).copied()
                        else {
                            continue;
                        };
                        if let Some(edge) = self.edges.get_mut(&edge_id) {
                            edge.sources.shift_remove(&annotation.id);
                            if edge.sources.is_empty() {
                                self.destabilized_edges.insert(edge_id);
                            }
                        }
                    }
                    if node.declarations.is_empty() {
                        self.destabilized_nodes.insert(id);
                    }
                }
            }
        }

        debug!(
            document = %document.id(),
            statements = region.len(),
            destabilized_nodes = self.destabilized_nodes.len(),
            destabilized_edges = self.destabilized_edges.len(),
            "excluded region"
        );
    }

    /// Dispose of destabilized objects that are still empty.
    fn finalize(&mut self) {
        let edges: Vec<EdgeId> = std::mem::take(&mut self.destabilized_edges)
            .into_iter()
            .filter(|id| self.edges.get(id).is_some_and(|e| e.sources.is_empty()))
            .collect();
        for id in edges {
            self.remove_edge(id);
        }

        let mut nodes: Vec<NodeId> = std::mem::take(&mut self.destabilized_nodes)
            .into_iter()
            .filter(|id| self.nodes.get(id).is_some_and(|n| n.declarations.is_empty()))
            .collect();
        // Deepest first, so containers are emptied before they go.
        nodes.sort_by_key(|id| Reverse(self.nodes[id].path.len()));
        for id in nodes {
            self.remove_node(id);
        }
    }

    // ========================================================================
    // NODE / EDGE LIFECYCLE
    // ========================================================================

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        match self.nodes.get_mut(&id) {
            Some(node) => node,
            None => panic!("node {id:?} is not in the graph"),
        }
    }

    fn create_node(&mut self, path: TypePath) -> NodeId {
        let container = match path.container() {
            Some(container_path) => match self.by_path.get(&container_path) {
                Some(&id) => Some(id),
                None => panic!(
                    "container {container_path} of {path} has not been included; \
                     declarations must be included breadth-first"
                ),
            },
            None => None,
        };

        let id = NodeId(self.next_node);
        self.next_node += 1;
        let subject = path.tip().clone();
        let document = path.document();

        match container {
            Some(container) => {
                self.node_mut(container).contents.insert(subject.clone(), id);
            }
            None => {
                self.roots
                    .entry(document)
                    .or_default()
                    .insert(subject.clone(), id);
            }
        }
        self.by_path.insert(path.clone(), id);
        trace!(%path, ?id, "created node");
        let scope = path.container();
        self.nodes.insert(id, Node::new(id, path, container));

        self.refresh_subject(document, &subject, scope.as_ref());
        id
    }

    fn remove_node(&mut self, id: NodeId) {
        let outbounds: Vec<EdgeId> = self.node_mut(id).outbounds.values().copied().collect();
        for edge in outbounds {
            self.remove_edge(edge);
        }

        let Some(node) = self.nodes.remove(&id) else {
            return;
        };
        assert!(
            node.contents.is_empty(),
            "node {} lost its last declaration while still containing {} node(s)",
            node.path,
            node.contents.len()
        );

        let document = node.path.document();
        match node.container {
            Some(container) => {
                if let Some(container) = self.nodes.get_mut(&container) {
                    container.contents.shift_remove(&node.subject);
                }
            }
            None => {
                if let Some(roots) = self.roots.get_mut(&document) {
                    roots.shift_remove(&node.subject);
                    if roots.is_empty() {
                        self.roots.remove(&document);
                    }
                }
            }
        }
        self.by_path.remove(&node.path);
        trace!(path = %node.path, ?id, "removed node");

        self.refresh_subject(document, &node.subject, node.path.container().as_ref());
    }

    fn add_source(&mut self, predecessor: NodeId, annotation: &Span) {
        let existing = self.node_mut(predecessor).outbounds.get(&annotation.subject).copied();
        let edge = match existing {
            Some(edge) => edge,
            None => self.create_edge(predecessor, annotation.subject.clone()),
        };
        if let Some(edge) = self.edges.get_mut(&edge) {
            edge.sources.insert(annotation.id);
        }
    }

    fn create_edge(&mut self, predecessor: NodeId, subject: Name) -> EdgeId {
        let id = EdgeId(self.next_edge);
        self.next_edge += 1;
        let node = self.node_mut(predecessor);
        node.outbounds.insert(subject.clone(), id);
        let document = node.path.document();
        self.by_subject
            .entry((document, subject.clone()))
            .or_default()
            .insert(id);
        self.edges
            .insert(id, HyperEdge::new(id, predecessor, subject));
        self.resolve_successors(id);
        id
    }

    fn remove_edge(&mut self, id: EdgeId) {
        let Some(edge) = self.edges.remove(&id) else {
            return;
        };
        let document = self.node_mut(edge.predecessor).path.document();
        let predecessor = self.node_mut(edge.predecessor);
        if predecessor.outbounds.get(&edge.subject) == Some(&id) {
            predecessor.outbounds.shift_remove(&edge.subject);
        }
        for successor in &edge.successors {
            if let Some(node) = self.nodes.get_mut(&successor.node) {
                node.inbounds.shift_remove(&id);
            }
        }
        let key = (document, edge.subject.clone());
        if let Some(edges) = self.by_subject.get_mut(&key) {
            edges.shift_remove(&id);
            if edges.is_empty() {
                self.by_subject.remove(&key);
            }
        }
    }

    /// Re-resolve every edge named `subject` whose predecessor can see into
    /// `scope` (the container a node named `subject` was added to or removed
    /// from; `None` for the document root).
    fn refresh_subject(&mut self, document: DocumentId, subject: &Name, scope: Option<&TypePath>) {
        let Some(edges) = self.by_subject.get(&(document, subject.clone())) else {
            return;
        };
        let affected: Vec<EdgeId> = edges
            .iter()
            .copied()
            .filter(|id| {
                let Some(edge) = self.edges.get(id) else {
                    return false;
                };
                let Some(predecessor) = self.nodes.get(&edge.predecessor) else {
                    return false;
                };
                scope.is_none_or(|scope| predecessor.path.starts_with(scope))
            })
            .collect();
        for id in affected {
            self.resolve_successors(id);
        }
    }

    /// Walk outward from the predecessor's container to the document root,
    /// collecting each scope's node named like the edge.
    fn resolve_successors(&mut self, id: EdgeId) {
        let Some(edge) = self.edges.get(&id) else {
            return;
        };
        let subject = edge.subject.clone();
        let predecessor = &self.nodes[&edge.predecessor];
        let document = predecessor.path.document();

        let mut successors = Vec::new();
        let mut scope = predecessor.container;
        let mut longitude = 0;
        loop {
            let found = match scope {
                Some(container) => self.nodes[&container].contents.get(&subject).copied(),
                None => self
                    .roots
                    .get(&document)
                    .and_then(|roots| roots.get(&subject))
                    .copied(),
            };
            if let Some(node) = found {
                successors.push(Successor { node, longitude });
            }
            match scope {
                Some(container) => {
                    scope = self.nodes[&container].container;
                    longitude += 1;
                }
                None => break,
            }
        }

        let Some(edge) = self.edges.get_mut(&id) else {
            return;
        };
        let previous = std::mem::take(&mut edge.successors);
        edge.set_successors(successors);
        let current: Vec<NodeId> = edge.successors.iter().map(|s| s.node).collect();

        for successor in previous {
            if let Some(node) = self.nodes.get_mut(&successor.node) {
                node.inbounds.shift_remove(&id);
            }
        }
        for node in current {
            if let Some(node) = self.nodes.get_mut(&node) {
                node.inbounds.insert(id);
            }
        }
    }

    /// Ids of the declaration spans that currently declare `path`.
    pub fn declarations_at(&self, path: &TypePath) -> Vec<SpanId> {
        self.node_at(path)
            .map(|n| n.declarations().collect())
            .unwrap_or_default()
    }
}
