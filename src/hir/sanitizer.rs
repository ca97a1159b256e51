//! Sanitizer: finds circular base chains once resolution has settled.

use indexmap::IndexSet;
use rustc_hash::FxHashSet;
use tracing::warn;

use super::cruft::CruftTarget;
use super::faults::FaultKind;
use super::parallel::ParallelId;
use super::session::ResolutionSession;
use crate::graph::{EdgeId, HyperGraph};
use crate::syntax::Documents;

struct Frame {
    parallel: ParallelId,
    bases: Vec<(EdgeId, ParallelId)>,
    next: usize,
}

impl Frame {
    fn new(session: &ResolutionSession, parallel: ParallelId) -> Self {
        let bases = session
            .parallel(parallel)
            .and_then(|p| p.explicit())
            .map(|e| e.bases().collect())
            .unwrap_or_default();
        Self {
            parallel,
            bases,
            next: 0,
        }
    }
}

/// Walk the base graph of every explicit parallel depth-first. Each edge that
/// closes a cycle, together with the edges of the cycle on the current path,
/// is marked cruft with a circular type reference fault. Bases resolved
/// through cruft edges are then dropped from every parallel.
pub(crate) fn sanitize(graph: &HyperGraph, documents: &Documents, session: &mut ResolutionSession) {
    let roots: Vec<ParallelId> = session
        .parallels()
        .filter(|p| p.is_explicit())
        .map(|p| p.id())
        .collect();

    let mut done: FxHashSet<ParallelId> = FxHashSet::default();
    let mut circular: IndexSet<EdgeId> = IndexSet::new();

    for root in roots {
        if done.contains(&root) {
            continue;
        }
        let mut stack = vec![Frame::new(session, root)];
        let mut on_path: IndexSet<ParallelId> = IndexSet::from([root]);
        let mut path_edges: Vec<EdgeId> = Vec::new();

        while let Some(frame) = stack.last_mut() {
            let Some(&(edge, base)) = frame.bases.get(frame.next) else {
                done.insert(frame.parallel);
                stack.pop();
                on_path.pop();
                path_edges.pop();
                continue;
            };
            frame.next += 1;

            if session.cruft.has_edge(edge) || circular.contains(&edge) {
                continue;
            }
            if let Some(start) = on_path.get_index_of(&base) {
                warn!(
                    path = %session.parallel(base).map(|p| p.path().to_string()).unwrap_or_default(),
                    length = path_edges.len() - start + 1,
                    "circular type reference"
                );
                circular.extend(path_edges[start..].iter().copied());
                circular.insert(edge);
                continue;
            }
            if done.contains(&base) {
                continue;
            }
            on_path.insert(base);
            path_edges.push(edge);
            stack.push(Frame::new(session, base));
        }
    }

    if circular.is_empty() {
        return;
    }

    for &edge in &circular {
        session.cruft.add(
            CruftTarget::Edge(edge),
            FaultKind::CircularTypeReference,
            graph,
            documents,
            &mut session.faults,
        );
    }

    let affected: Vec<ParallelId> = session
        .parallels()
        .filter(|p| p.explicit().is_some_and(|e| e.bases().any(|(edge, _)| circular.contains(&edge))))
        .map(|p| p.id())
        .collect();
    for id in affected {
        if let Some(explicit) = session.parallel_mut(id).explicit_mut() {
            explicit.bases.retain(|edge, _| !circular.contains(edge));
        }
    }
}
