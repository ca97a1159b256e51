//! Construction worker: drill, descend and rake.
//!
//! ```text
//! drill("Dog/Sound")
//!   ├─ surface "Dog"  (cached, or created from graph.read and raked)
//!   └─ for each remaining segment:
//!        descend(zenith, "Sound")   next layer over the parallel+base closure
//!        rake(layer)                resolve bases, overridden parallels first
//! ```
//!
//! Re-entrant drilling of a path that is still in flight, or of a parallel
//! whose bases are still being raked, yields `Drill::Circular`; callers treat
//! that as "try another candidate".

use indexmap::IndexSet;
use rustc_hash::FxHashSet;
use tracing::{debug, trace, warn};

use super::ResolveOptions;
use super::contract::Contract;
use super::cruft::CruftTarget;
use super::faults::{Fault, FaultCollector, FaultKind};
use super::parallel::{ExplicitParallel, Parallel, ParallelId, ParallelKind};
use super::sanitizer::sanitize;
use super::session::ResolutionSession;
use crate::base::{Name, TypePath};
use crate::graph::{EdgeId, HyperGraph, Successor};
use crate::syntax::Documents;

/// Outcome of drilling one path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Drill {
    Resolved(ParallelId),
    /// No explicit content at the path anywhere in its zenith's closure.
    Unpopulated,
    /// The path is already being drilled or raked further up the stack.
    Circular,
}

impl Drill {
    fn resolved(self) -> Option<ParallelId> {
        match self {
            Drill::Resolved(id) => Some(id),
            Drill::Unpopulated | Drill::Circular => None,
        }
    }
}

/// Materializes resolved parallels for type paths against one graph version.
pub struct ConstructionWorker<'a> {
    graph: &'a HyperGraph,
    documents: &'a Documents,
    session: &'a mut ResolutionSession,
    options: ResolveOptions,
}

impl<'a> ConstructionWorker<'a> {
    /// Bind a worker to `session`. The session must have been created for the
    /// current version of `graph`.
    pub fn new(
        graph: &'a HyperGraph,
        documents: &'a Documents,
        session: &'a mut ResolutionSession,
        options: ResolveOptions,
    ) -> Self {
        if !session.is_prepared() {
            session.prepare(graph, documents);
        }
        Self {
            graph,
            documents,
            session,
            options,
        }
    }

    // ========================================================================
    // PUBLIC API
    // ========================================================================

    /// Materialize the parallel chain for `path`.
    ///
    /// Returns `None` when the surface node does not exist or the path is
    /// unpopulated. Drilling the same path twice in a session returns the
    /// same parallel.
    pub fn drill(&mut self, path: &TypePath) -> Option<ParallelId> {
        let result = self.drill_path(path);
        sanitize(self.graph, self.documents, self.session);
        debug!(%path, ?result, "drilled");
        result.resolved()
    }

    pub fn parallel(&self, id: ParallelId) -> Option<&Parallel> {
        self.session.parallel(id)
    }

    pub fn session(&self) -> &ResolutionSession {
        self.session
    }

    pub fn faults(&self) -> &FaultCollector {
        self.session.faults()
    }

    pub fn graph(&self) -> &'a HyperGraph {
        self.graph
    }

    // ========================================================================
    // DRILL
    // ========================================================================

    pub(crate) fn drill_path(&mut self, path: &TypePath) -> Drill {
        if let Some(id) = self.session.lookup(path) {
            if self.session.raking.contains(&id) {
                trace!(%path, "drill into a parallel being raked");
                return Drill::Circular;
            }
            return Drill::Resolved(id);
        }
        if self.session.in_flight.contains(path) {
            trace!(%path, "circular drill");
            return Drill::Circular;
        }
        self.session.in_flight.push(path.clone());
        let result = self.drill_uncached(path);
        self.session.in_flight.pop();
        result
    }

    fn drill_uncached(&mut self, path: &TypePath) -> Drill {
        let cached = (1..path.len())
            .rev()
            .find_map(|len| self.session.lookup(&path.prefix(len)).map(|id| (len, id)));

        let (mut depth, mut zenith) = match cached {
            Some(found) => found,
            None => {
                let graph = self.graph;
                let Some(node) = graph.read(path.document(), path.surface()) else {
                    return Drill::Unpopulated;
                };
                if self.session.cruft.has_node(node.id()) {
                    return Drill::Unpopulated;
                }
                let id = self.session.insert(
                    node.path().clone(),
                    None,
                    ParallelKind::Explicit(ExplicitParallel::new(node.id())),
                );
                self.rake(id);
                (1, id)
            }
        };

        while depth < path.len() {
            let target = &path.names()[depth];
            let Some(next) = self.descend(zenith, target) else {
                return Drill::Unpopulated;
            };
            self.rake(next);
            zenith = next;
            depth += 1;
        }
        Drill::Resolved(zenith)
    }

    // ========================================================================
    // DESCEND
    // ========================================================================

    /// Build the layer below `zenith` for `target`.
    ///
    /// Every parallel in the zenith's parallel+base closure that can reach
    /// explicit content named `target` gets a child parallel; the rest are
    /// pruned. Returns `None` when the zenith itself is pruned.
    fn descend(&mut self, zenith: ParallelId, target: &Name) -> Option<ParallelId> {
        let graph = self.graph;

        let mut closure: IndexSet<ParallelId> = IndexSet::from([zenith]);
        let mut index = 0;
        while let Some(&current) = closure.get_index(index) {
            index += 1;
            let branches = self.branches(current);
            closure.extend(branches);
        }

        let mut reaching: FxHashSet<ParallelId> = closure
            .iter()
            .copied()
            .filter(|&id| self.has_explicit_child(id, target))
            .collect();
        loop {
            let grown: Vec<ParallelId> = closure
                .iter()
                .copied()
                .filter(|id| !reaching.contains(id))
                .filter(|&id| self.branches(id).iter().any(|b| reaching.contains(b)))
                .collect();
            if grown.is_empty() {
                break;
            }
            reaching.extend(grown);
        }

        if !reaching.contains(&zenith) {
            trace!(?zenith, %target, "pruned descent");
            return None;
        }

        let mut created: Vec<(ParallelId, ParallelId)> = Vec::new();
        let mut layer: Vec<(ParallelId, ParallelId)> = Vec::new();
        for &branch in closure.iter().filter(|id| reaching.contains(id)) {
            let path = self.parallel_ref(branch).path.child(target);
            let child = match self.session.lookup(&path) {
                Some(existing) => existing,
                None => {
                    let kind = match graph.node_at(&path) {
                        Some(node) if !self.session.cruft.has_node(node.id()) => {
                            ParallelKind::Explicit(ExplicitParallel::new(node.id()))
                        }
                        _ => ParallelKind::Implicit,
                    };
                    let id = self.session.insert(path, Some(branch), kind);
                    created.push((branch, id));
                    id
                }
            };
            layer.push((branch, child));
        }

        for (branch, child) in created {
            let edges: Vec<ParallelId> = self
                .branches(branch)
                .into_iter()
                .filter(|b| reaching.contains(b))
                .filter_map(|b| layer.iter().find(|(z, _)| *z == b).map(|(_, c)| *c))
                .filter(|&c| c != child)
                .collect();
            self.session.parallel_mut(child).edges.extend(edges);
        }

        layer
            .iter()
            .find(|(branch, _)| *branch == zenith)
            .map(|(_, child)| *child)
    }

    /// A live node sits at `id`'s path extended by `target`.
    fn has_explicit_child(&self, id: ParallelId, target: &Name) -> bool {
        let path = self.parallel_ref(id).path.child(target);
        self.graph
            .node_at(&path)
            .is_some_and(|node| !self.session.cruft.has_node(node.id()))
    }

    /// Overridden parallels and resolved bases of `id`.
    fn branches(&self, id: ParallelId) -> Vec<ParallelId> {
        let parallel = self.parallel_ref(id);
        parallel.edges().chain(parallel.bases()).collect()
    }

    // ========================================================================
    // RAKE
    // ========================================================================

    /// Resolve the base graphs of `root` and everything it overrides,
    /// overridden parallels first.
    fn rake(&mut self, root: ParallelId) {
        let mut stack = vec![(root, false)];
        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                self.rake_explicit(id);
                continue;
            }
            let parallel = self.session.parallel_mut(id);
            if parallel.raked {
                continue;
            }
            parallel.raked = true;
            let edges: Vec<ParallelId> = parallel.edges().collect();
            stack.push((id, true));
            for edge in edges.into_iter().rev() {
                if !self.parallel_ref(edge).raked {
                    stack.push((edge, false));
                }
            }
        }
    }

    fn rake_explicit(&mut self, id: ParallelId) {
        let graph = self.graph;
        let parallel = self.parallel_ref(id);
        let Some(node_id) = parallel.node() else {
            return;
        };
        let apex = parallel.is_apex();
        let Some(node) = graph.node(node_id) else {
            panic!("parallel {} refers to node {node_id:?} which left the graph", parallel.path)
        };

        let mut contract = (self.options.check_contracts && !apex)
            .then(|| Contract::new(self.conditions(id)));

        self.session.raking.push(id);
        for edge_id in node.outbounds() {
            if self.session.cruft.has_edge(edge_id) {
                continue;
            }
            let Some(edge) = graph.edge(edge_id) else {
                continue;
            };
            let candidates: Vec<&Successor> = edge
                .successors()
                .iter()
                .filter(|s| !self.session.cruft.has_node(s.node))
                .collect();
            if candidates.is_empty() {
                self.session.cruft.add(
                    CruftTarget::Edge(edge_id),
                    FaultKind::UnresolvedAnnotation,
                    graph,
                    self.documents,
                    &mut self.session.faults,
                );
                continue;
            }

            let base = if apex || candidates.len() == 1 {
                self.resolve_nearest(&candidates, contract.as_mut())
            } else {
                self.resolve_polymorphic(&candidates, contract.as_mut())
            };
            match base {
                Some(base) => {
                    trace!(path = %node.path(), subject = %edge.subject(), ?base, "resolved base");
                    self.set_base(id, edge_id, base);
                }
                None => trace!(path = %node.path(), subject = %edge.subject(), "no drillable candidate"),
            }
        }
        self.session.raking.pop();

        if let Some(contract) = &contract {
            let unsatisfied: Vec<ParallelId> = contract.unsatisfied().collect();
            if !unsatisfied.is_empty() {
                self.report_contract_violation(id, &unsatisfied);
            }
        }
        if let Some(explicit) = self.session.parallel_mut(id).explicit_mut() {
            explicit.contract = contract;
        }
    }

    fn set_base(&mut self, id: ParallelId, edge: EdgeId, base: ParallelId) {
        if let Some(explicit) = self.session.parallel_mut(id).explicit_mut() {
            explicit.bases.insert(edge, base);
        }
    }

    /// The nearest candidate that drills to a parallel. A circular
    /// candidate is only taken when nothing else drills.
    fn resolve_nearest(
        &mut self,
        candidates: &[&Successor],
        mut contract: Option<&mut Contract>,
    ) -> Option<ParallelId> {
        let mut base = None;
        let mut circular = None;
        for successor in candidates {
            match self.drill_node(successor) {
                Drill::Resolved(id) => {
                    base = Some(id);
                    break;
                }
                Drill::Circular => circular = circular.or_else(|| self.cached(successor)),
                Drill::Unpopulated => {}
            }
        }
        let base = base.or(circular)?;
        if let Some(contract) = contract.as_deref_mut() {
            if !contract.is_open() {
                let lineage = self.lineage(base);
                contract.try_satisfy_condition(&lineage);
            }
        }
        Some(base)
    }

    /// In longitude order, the first candidate that satisfies an open
    /// condition of `contract`, falling back to the nearest drillable one.
    fn resolve_polymorphic(
        &mut self,
        candidates: &[&Successor],
        mut contract: Option<&mut Contract>,
    ) -> Option<ParallelId> {
        let mut fallback = None;
        let mut circular = None;
        for successor in candidates {
            let base = match self.drill_node(successor) {
                Drill::Resolved(base) => base,
                Drill::Circular => {
                    circular = circular.or_else(|| self.cached(successor));
                    continue;
                }
                Drill::Unpopulated => continue,
            };
            fallback.get_or_insert(base);
            let Some(contract) = contract.as_deref_mut() else {
                return Some(base);
            };
            if !contract.has_unsatisfied() {
                return Some(base);
            }
            let lineage = self.lineage(base);
            if contract.try_satisfy_condition(&lineage) > 0 {
                return Some(base);
            }
        }
        fallback.or(circular)
    }

    fn drill_node(&mut self, successor: &Successor) -> Drill {
        let graph = self.graph;
        let Some(node) = graph.node(successor.node) else {
            return Drill::Unpopulated;
        };
        let drilled = self.drill_path(node.path());
        if drilled == Drill::Circular {
            trace!(path = %node.path(), "skipping circular candidate");
        }
        drilled
    }

    /// The parallel already cached for a candidate's node.
    fn cached(&self, successor: &Successor) -> Option<ParallelId> {
        let node = self.graph.node(successor.node)?;
        self.session.lookup(node.path())
    }

    // ========================================================================
    // CONTRACTS
    // ========================================================================

    /// Every base in the base graphs of the parallels `id` overrides.
    /// Implicit parallels pass through to what they override.
    fn conditions(&self, id: ParallelId) -> IndexSet<ParallelId> {
        let mut conditions = IndexSet::new();
        let mut visited: FxHashSet<ParallelId> = FxHashSet::default();
        let mut worklist: Vec<ParallelId> = self.parallel_ref(id).edges().collect();
        while let Some(current) = worklist.pop() {
            if !visited.insert(current) {
                continue;
            }
            let parallel = self.parallel_ref(current);
            if parallel.is_explicit() {
                conditions.extend(self.base_graph(current));
            } else {
                worklist.extend(parallel.edges());
            }
        }
        conditions
    }

    /// Transitive bases of `id`, excluding `id` itself.
    fn base_graph(&self, id: ParallelId) -> IndexSet<ParallelId> {
        let mut bases: IndexSet<ParallelId> = IndexSet::new();
        let mut worklist: Vec<ParallelId> = self.parallel_ref(id).bases().collect();
        while let Some(current) = worklist.pop() {
            if current == id || !bases.insert(current) {
                continue;
            }
            worklist.extend(self.parallel_ref(current).bases());
        }
        bases
    }

    /// `id`, everything it overrides, and everything those inherit.
    fn lineage(&self, id: ParallelId) -> IndexSet<ParallelId> {
        let mut lineage = IndexSet::from([id]);
        let mut index = 0;
        while let Some(&current) = lineage.get_index(index) {
            index += 1;
            lineage.extend(self.branches(current));
        }
        lineage
    }

    fn report_contract_violation(&mut self, id: ParallelId, unsatisfied: &[ParallelId]) {
        let graph = self.graph;
        let parallel = self.parallel_ref(id);
        let Some(node) = parallel.node().and_then(|n| graph.node(n)) else {
            return;
        };
        let required = unsatisfied
            .iter()
            .map(|c| format!("`{}`", self.parallel_ref(*c).path))
            .collect::<Vec<_>>()
            .join(", ");
        warn!(path = %parallel.path, %required, "contract violation");
        let message = format!(
            "`{}` must inherit {required} like the types it overrides",
            parallel.path
        );

        let statements: IndexSet<_> = node.declarations().map(|s| s.statement).collect();
        for statement in statements {
            let fault = self
                .documents
                .get(&statement.document)
                .and_then(|doc| Fault::at_statement(FaultKind::ContractViolation, doc, statement));
            if let Some(fault) = fault {
                self.session.faults.report(fault.with_message(message.as_str()));
            }
        }
    }

    fn parallel_ref(&self, id: ParallelId) -> &Parallel {
        match self.session.parallel(id) {
            Some(parallel) => parallel,
            None => panic!("parallel {id} does not belong to this session"),
        }
    }
}
