//! Resolution sessions: the per-version cache of parallels, cruft and faults.

use rustc_hash::FxHashMap;
use tracing::debug;

use super::cruft::{Cruft, CruftTarget};
use super::faults::{Fault, FaultCollector, FaultKind};
use super::parallel::{Parallel, ParallelId, ParallelKind};
use crate::base::TypePath;
use crate::graph::HyperGraph;
use crate::syntax::Documents;

/// Everything resolution derives from one version of the declaration graph.
///
/// A session is a disposable cache: when the program's version advances the
/// session is dropped and rebuilt from scratch rather than patched.
#[derive(Debug)]
pub struct ResolutionSession {
    version: u64,
    parallels: Vec<Parallel>,
    by_path: FxHashMap<TypePath, ParallelId>,
    pub(super) cruft: Cruft,
    pub(super) faults: FaultCollector,
    /// Paths being drilled but not yet cached.
    pub(super) in_flight: Vec<TypePath>,
    /// Explicit parallels whose bases are being resolved.
    pub(super) raking: Vec<ParallelId>,
    prepared: bool,
}

impl ResolutionSession {
    pub fn new(version: u64) -> Self {
        Self {
            version,
            parallels: Vec::new(),
            by_path: FxHashMap::default(),
            cruft: Cruft::new(),
            faults: FaultCollector::new(),
            in_flight: Vec::new(),
            raking: Vec::new(),
            prepared: false,
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn parallel(&self, id: ParallelId) -> Option<&Parallel> {
        self.parallels.get(id.0 as usize)
    }

    pub fn parallels(&self) -> impl Iterator<Item = &Parallel> {
        self.parallels.iter()
    }

    pub fn len(&self) -> usize {
        self.parallels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parallels.is_empty()
    }

    /// The cached parallel for `path`, if drilled.
    pub fn lookup(&self, path: &TypePath) -> Option<ParallelId> {
        self.by_path.get(path).copied()
    }

    pub fn faults(&self) -> &FaultCollector {
        &self.faults
    }

    pub fn cruft(&self) -> &Cruft {
        &self.cruft
    }

    pub(super) fn insert(
        &mut self,
        path: TypePath,
        container: Option<ParallelId>,
        kind: ParallelKind,
    ) -> ParallelId {
        assert!(
            !self.by_path.contains_key(&path),
            "parallel for {path} already exists in this session"
        );
        let id = ParallelId(self.parallels.len() as u32);
        self.by_path.insert(path.clone(), id);
        self.parallels.push(Parallel::new(id, path, container, kind));
        id
    }

    pub(super) fn parallel_mut(&mut self, id: ParallelId) -> &mut Parallel {
        match self.parallels.get_mut(id.0 as usize) {
            Some(parallel) => parallel,
            None => panic!("parallel {id} does not belong to this session"),
        }
    }

    pub(super) fn is_prepared(&self) -> bool {
        self.prepared
    }

    /// Mark statement-level cruft before any drilling.
    ///
    /// Statements indented with both tabs and spaces lose all their spans.
    /// Nodes left with only cruft declarations, and edges left with only
    /// cruft sources, become cruft themselves.
    pub(super) fn prepare(&mut self, graph: &HyperGraph, documents: &Documents) {
        if self.prepared {
            return;
        }
        self.prepared = true;

        for document in documents.values() {
            for statement in document.statements() {
                if !statement.mixed_indent || statement.is_noop() {
                    continue;
                }
                let spans = statement.declarations.iter().chain(&statement.annotations);
                for span in spans {
                    self.cruft.mark_span(span.id, FaultKind::TabsAndSpaces);
                }
                if let Some(fault) =
                    Fault::at_statement(FaultKind::TabsAndSpaces, document, statement.id)
                {
                    self.faults.report(fault);
                }
            }
        }

        if self.cruft.is_empty() {
            return;
        }

        let mut nodes: Vec<_> = graph
            .nodes()
            .filter(|n| n.declarations().all(|s| self.cruft.has_span(s)))
            .map(|n| n.id())
            .collect();
        nodes.sort_unstable();
        for id in nodes {
            self.cruft.add(
                CruftTarget::Node(id),
                FaultKind::TabsAndSpaces,
                graph,
                documents,
                &mut self.faults,
            );
        }

        let mut edges: Vec<_> = graph
            .edges()
            .filter(|e| e.sources().all(|s| self.cruft.has_span(s)))
            .map(|e| e.id())
            .collect();
        edges.sort_unstable();
        for id in edges {
            self.cruft.add(
                CruftTarget::Edge(id),
                FaultKind::TabsAndSpaces,
                graph,
                documents,
                &mut self.faults,
            );
        }

        debug!(
            version = self.version,
            cruft = self.cruft.len(),
            "prepared resolution session"
        );
    }
}
