//! Is-a hierarchy graph and its transitive closure.
//!
//! The graph is built in two phases enforced by the type system: edges can
//! only be added to a [`ConceptGraph`], and ancestor queries only exist on
//! the [`ClosedGraph`] produced by [`ConceptGraph::close`].

use std::collections::{BTreeSet, HashMap, VecDeque};

use amt_types::SctId;
use tracing::warn;

use crate::report::ValidationReport;
use crate::types::{FlattenError, FlattenResult};

/// Report case name for graph-level problems.
pub const GRAPH_ERROR_CASE: &str = "Graph errors";

static EMPTY_SET: BTreeSet<SctId> = BTreeSet::new();

/// A directed is-a graph under construction.
///
/// Edges point from a concept to its parent.
#[derive(Debug, Default)]
pub struct ConceptGraph {
    vertices: BTreeSet<SctId>,
    parents: HashMap<SctId, BTreeSet<SctId>>,
    edge_count: usize,
}

impl ConceptGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a vertex. Idempotent.
    pub fn add_vertex(&mut self, id: SctId) {
        self.vertices.insert(id);
    }

    /// Adds an is-a edge from `child` to `parent`. Idempotent.
    ///
    /// Endpoints do not have to be vertices yet; unresolved endpoints are
    /// diagnosed as dangling edges at [`close`](Self::close) time.
    pub fn add_edge(&mut self, child: SctId, parent: SctId) {
        if self.parents.entry(child).or_default().insert(parent) {
            self.edge_count += 1;
        }
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of distinct edges.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Computes the transitive closure, consuming the builder.
    ///
    /// Dangling edges (either endpoint not a vertex) abort in strict mode.
    /// In lenient mode each one is recorded in the report and dropped, and
    /// the closure is computed over the surviving edges.
    ///
    /// # Errors
    /// Returns [`FlattenError::DanglingEdge`] in strict mode.
    pub fn close(
        mut self,
        strict: bool,
        report: &mut ValidationReport,
    ) -> FlattenResult<ClosedGraph> {
        self.check_dangling(strict, report)?;

        let mut children: HashMap<SctId, BTreeSet<SctId>> = HashMap::new();
        let mut pending_parents: HashMap<SctId, usize> = HashMap::new();

        for &v in &self.vertices {
            let parent_count = self.parents.get(&v).map_or(0, BTreeSet::len);
            pending_parents.insert(v, parent_count);
            if let Some(ps) = self.parents.get(&v) {
                for &p in ps {
                    children.entry(p).or_default().insert(v);
                }
            }
        }

        // Topological propagation: a vertex's ancestor set is complete once
        // every parent's set is complete.
        let mut ancestors: HashMap<SctId, BTreeSet<SctId>> = HashMap::new();
        let mut queue: VecDeque<SctId> = pending_parents
            .iter()
            .filter(|(_, &n)| n == 0)
            .map(|(&v, _)| v)
            .collect();
        let mut processed = 0usize;

        while let Some(v) = queue.pop_front() {
            processed += 1;

            let mut set = BTreeSet::new();
            if let Some(ps) = self.parents.get(&v) {
                for &p in ps {
                    set.insert(p);
                    if let Some(pa) = ancestors.get(&p) {
                        set.extend(pa.iter().copied());
                    }
                }
            }
            ancestors.insert(v, set);

            if let Some(cs) = children.get(&v) {
                for &c in cs {
                    if let Some(n) = pending_parents.get_mut(&c) {
                        *n -= 1;
                        if *n == 0 {
                            queue.push_back(c);
                        }
                    }
                }
            }
        }

        // Vertices left unprocessed sit on a cycle. Their ancestors are
        // still well defined as reachability, so fall back to a walk that
        // tolerates revisits.
        if processed < self.vertices.len() {
            let leftover: Vec<SctId> = self
                .vertices
                .iter()
                .copied()
                .filter(|v| !ancestors.contains_key(v))
                .collect();
            warn!(
                vertices = leftover.len(),
                "is-a hierarchy contains cycles, falling back to reachability walk"
            );
            for v in leftover {
                ancestors.insert(v, self.reachable_parents(v));
            }
        }

        Ok(ClosedGraph { ancestors })
    }

    fn check_dangling(&mut self, strict: bool, report: &mut ValidationReport) -> FlattenResult<()> {
        let mut dangling: Vec<(SctId, SctId)> = Vec::new();

        for (&child, ps) in &self.parents {
            if !self.vertices.contains(&child) {
                for &p in ps {
                    dangling.push((child, p));
                }
                continue;
            }
            for &p in ps {
                if !self.vertices.contains(&p) {
                    dangling.push((child, p));
                }
            }
        }

        for &(child, parent) in &dangling {
            if strict {
                return Err(FlattenError::DanglingEdge {
                    source_id: child,
                    destination: parent,
                });
            }
            warn!(child, parent, "dropping dangling is-a edge");
            report.add_failure(
                GRAPH_ERROR_CASE,
                "is-a edge references an unknown concept",
                format!("{child} -> {parent}"),
            );
            if let Some(ps) = self.parents.get_mut(&child) {
                ps.remove(&parent);
                self.edge_count -= 1;
            }
        }
        self.parents.retain(|child, ps| {
            self.vertices.contains(child) && !ps.is_empty()
        });

        Ok(())
    }

    /// All vertices reachable from `start` by repeatedly following parent
    /// edges, excluding `start` itself unless it sits on a cycle through
    /// itself.
    fn reachable_parents(&self, start: SctId) -> BTreeSet<SctId> {
        let mut seen = BTreeSet::new();
        let mut queue = VecDeque::new();
        if let Some(ps) = self.parents.get(&start) {
            queue.extend(ps.iter().copied());
        }
        while let Some(v) = queue.pop_front() {
            if seen.insert(v) {
                if let Some(ps) = self.parents.get(&v) {
                    queue.extend(ps.iter().copied());
                }
            }
        }
        seen
    }
}

/// The is-a hierarchy after transitive closure.
#[derive(Debug, Default)]
pub struct ClosedGraph {
    ancestors: HashMap<SctId, BTreeSet<SctId>>,
}

impl ClosedGraph {
    /// All ancestors of `id` (transitive parents, excluding `id` itself
    /// unless it sits on a cycle).
    pub fn ancestors(&self, id: SctId) -> &BTreeSet<SctId> {
        self.ancestors.get(&id).unwrap_or(&EMPTY_SET)
    }

    /// All vertices that have `id` among their ancestors.
    pub fn descendants_of(&self, id: SctId) -> BTreeSet<SctId> {
        self.ancestors
            .iter()
            .filter(|(_, ancestors)| ancestors.contains(&id))
            .map(|(&v, _)| v)
            .collect()
    }

    /// True if `ancestor` is a transitive parent of `id`.
    pub fn is_ancestor_of(&self, ancestor: SctId, id: SctId) -> bool {
        self.ancestors(id).contains(&ancestor)
    }
}
