use super::*;
use log::debug;

/// Dijkstra's algorithm for non-negative edge weights.
///
/// Vertices are settled in order of increasing distance using a binary heap with lazy
/// deletion. The search can be stopped as soon as a target vertex is settled.
///
/// # Examples
/// ```
/// use csrgraphs::{prelude::*, algo::*};
///
/// let graph = CsrMatrix::from_weighted_edges(3, [(0, 1, 2.5), (1, 2, 1.0)]);
/// let view = graph.view();
///
/// let mut dijkstra = Dijkstra::new(&view, view.edge_weights()).stop_at(2);
/// assert_eq!(dijkstra.run(0, &mut ()).unwrap(), SearchStatus::TargetReached);
/// assert_eq!(dijkstra.tree().distance(2), Some(3.5));
/// ```
pub struct Dijkstra<'a, G, W> {
    graph: &'a G,
    weights: W,
    tree: ShortestPathTree,
    settled: NodeBitSet,
    heap: BinaryHeap<MinKeyed>,
    stop_at: Option<Node>,
}

impl<'a, G, W> Dijkstra<'a, G, W>
where
    G: IndexedOutEdges,
    W: ReadPropertyMap<EdgeHandle, Value = f64>,
{
    /// Creates a new instance on `graph` reading edge weights from `weights`
    pub fn new(graph: &'a G, weights: W) -> Self {
        Self {
            graph,
            weights,
            tree: ShortestPathTree::new(graph.len()),
            settled: graph.vertex_bitset_unset(),
            heap: BinaryHeap::new(),
            stop_at: None,
        }
    }

    /// Stops the search once `target` is settled
    pub fn set_stop_at(&mut self, target: Node) {
        self.stop_at = Some(target);
    }

    /// Stops the search once `target` is settled
    pub fn stop_at(mut self, target: Node) -> Self {
        self.set_stop_at(target);
        self
    }

    /// Returns the distances and predecessors computed by the last run
    pub fn tree(&self) -> &ShortestPathTree {
        &self.tree
    }

    /// Runs the search from `source` reporting all events to `visitor`.
    ///
    /// # Errors
    /// - [`GraphError::InvalidInput`] if `source` or the stop vertex is not a vertex,
    /// - [`GraphError::NegativeWeight`] if some weight is negative (checked before the search starts).
    pub fn run<V: DijkstraVisitor>(
        &mut self,
        source: Node,
        visitor: &mut V,
    ) -> Result<SearchStatus> {
        let n = self.graph.len();
        check_vertex(source, n, "source")?;
        if let Some(target) = self.stop_at {
            check_vertex(target, n, "target")?;
        }
        check_non_negative_weights(self.graph, &self.weights)?;

        debug!(
            "Dijkstra from {source} on {n} vertices and {} edges",
            self.graph.number_of_edges()
        );

        self.tree.reset(source);
        self.settled.clear_all();
        self.heap.clear();

        for u in self.graph.vertices() {
            visit!(visitor.initialize_vertex(u));
        }

        visit!(visitor.discover_vertex(source));
        self.heap.push(MinKeyed::new(0.0, source));

        while let Some(MinKeyed { node: u, .. }) = self.heap.pop() {
            // stale entry of an already settled vertex
            if self.settled.get_bit(u) {
                continue;
            }
            self.settled.set_bit(u);
            visit!(visitor.examine_vertex(u));

            for (e, v) in self.graph.out_edges(u) {
                visit!(visitor.examine_edge(e, u, v));

                let undiscovered = self.tree.distance(v).is_none();
                if self.tree.relax(u, v, self.weights.get(e)) {
                    visit!(visitor.edge_relaxed(e, u, v));
                    if undiscovered {
                        visit!(visitor.discover_vertex(v));
                    }
                    self.heap.push(MinKeyed::new(self.tree.distance.get(v), v));
                } else {
                    visit!(visitor.edge_not_relaxed(e, u, v));
                }
            }

            visit!(visitor.finish_vertex(u));

            if self.stop_at == Some(u) {
                return Ok(SearchStatus::TargetReached);
            }
        }

        Ok(SearchStatus::Completed)
    }
}
