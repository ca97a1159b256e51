//! Cruft: objects found faulty during a resolution pass.

use std::collections::hash_map::Entry;

use rustc_hash::FxHashMap;
use tracing::trace;

use super::faults::{Fault, FaultCollector, FaultKind};
use crate::graph::{EdgeId, HyperGraph, NodeId};
use crate::syntax::{Documents, SpanId};

/// Something that can be marked cruft.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CruftTarget {
    Node(NodeId),
    Edge(EdgeId),
    Span(SpanId),
}

/// Write-once registry of faulty nodes, edges and spans, each paired with
/// the fault that made it cruft.
///
/// Every graph walk consults the registry before following an edge or
/// counting a declaration. Marks live only as long as the session that owns
/// them.
#[derive(Clone, Debug, Default)]
pub struct Cruft {
    marked: FxHashMap<CruftTarget, FaultKind>,
    spans: FxHashMap<SpanId, FaultKind>,
}

impl Cruft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, target: CruftTarget) -> bool {
        self.reason(target).is_some()
    }

    /// The fault `target` was marked with, if it is cruft.
    pub fn reason(&self, target: CruftTarget) -> Option<FaultKind> {
        match target {
            CruftTarget::Span(span) => self.spans.get(&span).copied(),
            other => self.marked.get(&other).copied(),
        }
    }

    pub fn has_node(&self, node: NodeId) -> bool {
        self.has(CruftTarget::Node(node))
    }

    pub fn has_edge(&self, edge: EdgeId) -> bool {
        self.has(CruftTarget::Edge(edge))
    }

    pub fn has_span(&self, span: SpanId) -> bool {
        self.spans.contains_key(&span)
    }

    /// Number of marked nodes and edges.
    pub fn len(&self) -> usize {
        self.marked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marked.is_empty() && self.spans.is_empty()
    }

    /// Mark a span without reporting anything.
    pub(crate) fn mark_span(&mut self, span: SpanId, kind: FaultKind) -> bool {
        match self.spans.entry(span) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(kind);
                true
            }
        }
    }

    fn mark(&mut self, target: CruftTarget, kind: FaultKind) -> bool {
        match self.marked.entry(target) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(kind);
                true
            }
        }
    }

    /// Mark `target` and the spans behind it, reporting `kind` once for each
    /// span that was not already cruft.
    ///
    /// A node stands for its declaration spans, an edge for its source
    /// spans. Returns `false` if `target` was already marked.
    pub fn add(
        &mut self,
        target: CruftTarget,
        kind: FaultKind,
        graph: &HyperGraph,
        documents: &Documents,
        faults: &mut FaultCollector,
    ) -> bool {
        let spans: Vec<SpanId> = match target {
            CruftTarget::Span(span) => {
                if self.spans.contains_key(&span) {
                    return false;
                }
                vec![span]
            }
            CruftTarget::Node(id) => {
                if !self.mark(target, kind) {
                    return false;
                }
                graph
                    .node(id)
                    .map(|n| n.declarations().collect())
                    .unwrap_or_default()
            }
            CruftTarget::Edge(id) => {
                if !self.mark(target, kind) {
                    return false;
                }
                graph
                    .edge(id)
                    .map(|e| e.sources().collect())
                    .unwrap_or_default()
            }
        };
        trace!(?target, ?kind, spans = spans.len(), "marked cruft");

        for span in spans {
            if !self.mark_span(span, kind) {
                continue;
            }
            let fault = documents
                .get(&span.statement.document)
                .and_then(|doc| Fault::at_span(kind, doc, span));
            if let Some(fault) = fault {
                faults.report(fault);
            }
        }
        true
    }
}
