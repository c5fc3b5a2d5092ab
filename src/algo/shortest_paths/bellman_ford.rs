use super::*;
use log::{debug, trace};

/// The Bellman-Ford algorithm for arbitrary edge weights.
///
/// Runs at most `n - 1` rounds relaxing every edge in row-major order and exits early once a
/// round changes nothing. A final verification pass checks every edge for the triangle
/// inequality; a violation proves a negative cycle reachable from the source.
pub struct BellmanFord<'a, G, W> {
    graph: &'a G,
    weights: W,
    tree: ShortestPathTree,
}

impl<'a, G, W> BellmanFord<'a, G, W>
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
        }
    }

    /// Returns the distances and predecessors computed by the last run.
    /// Meaningless if the last run reported a negative cycle.
    pub fn tree(&self) -> &ShortestPathTree {
        &self.tree
    }

    /// Runs the algorithm from `source` reporting all events to `visitor`.
    ///
    /// # Errors
    /// - [`GraphError::InvalidInput`] if `source` is not a vertex,
    /// - [`GraphError::NegativeCycle`] if a negative cycle is reachable from `source`.
    pub fn run<V: BellmanFordVisitor>(
        &mut self,
        source: Node,
        visitor: &mut V,
    ) -> Result<SearchStatus> {
        let n = self.graph.len();
        check_vertex(source, n, "source")?;

        debug!(
            "Bellman-Ford from {source} on {n} vertices and {} edges",
            self.graph.number_of_edges()
        );

        self.tree.reset(source);
        for u in self.graph.vertices() {
            visit!(visitor.initialize_vertex(u));
        }

        self.relax_rounds(n - 1, visitor)
    }

    /// Computes vertex potentials: the distances from a virtual source joined to every
    /// vertex by a zero-weight edge. All potentials are finite and non-positive, and
    /// `w(u, v) + h(u) - h(v) >= 0` holds for every edge afterwards.
    ///
    /// # Errors
    /// Returns [`GraphError::NegativeCycle`] if the graph contains any negative cycle.
    pub(super) fn potentials(&mut self) -> Result<Vec<f64>> {
        let n = self.graph.len();
        debug!("Bellman-Ford potentials on {n} vertices");

        self.tree.reset_virtual_source();
        // the virtual source adds one vertex and thus one round
        self.relax_rounds(n, &mut ())?;

        Ok(self.tree.distance.as_slice().to_vec())
    }

    /// Relaxes all edges for at most `rounds` rounds and verifies the result
    fn relax_rounds<V: BellmanFordVisitor>(
        &mut self,
        rounds: usize,
        visitor: &mut V,
    ) -> Result<SearchStatus> {
        for round in 1..=rounds {
            let mut changed = false;

            for (e, v) in self.graph.edges() {
                let u = e.source;
                visit!(visitor.examine_edge(e, u, v));

                if self.tree.relax(u, v, self.weights.get(e)) {
                    changed = true;
                    visit!(visitor.edge_relaxed(e, u, v));
                } else {
                    visit!(visitor.edge_not_relaxed(e, u, v));
                }
            }

            if !changed {
                trace!("Bellman-Ford converged after {round} rounds");
                break;
            }
        }

        for (e, v) in self.graph.edges() {
            let u = e.source;
            let w = self.weights.get(e);

            let dv = self.tree.distance.get(v);
            let violated = self.tree.distance(u).is_some_and(|du| du + w < dv);

            if violated {
                visit!(visitor.edge_not_minimized(e, u, v));
                debug!("Bellman-Ford found a negative cycle through edge {e}");
                return Err(GraphError::NegativeCycle);
            }
            visit!(visitor.edge_minimized(e, u, v));
        }

        Ok(SearchStatus::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::visitor::tests::EventLog;

    #[test]
    fn negative_two_cycle() {
        // 0 -> 1 (-5), 1 -> 0 (1)
        let view = CsrGraph::with_weights(2, &[0, 1, 2], &[1, 0], &[-5.0, 1.0]).unwrap();
        let mut distance = [13.0; 2];

        let result = view.bellman_ford_into(
            view.edge_weights(),
            0,
            PathOutput::default().distance(&mut distance),
        );

        assert_eq!(result, Err(GraphError::NegativeCycle));
        assert_eq!(distance, [13.0; 2]);
    }

    #[test]
    fn negative_weights_without_cycle() {
        let graph = CsrMatrix::from_weighted_edges(
            5,
            [
                (0, 1, 4.0),
                (0, 2, 2.0),
                (2, 1, -3.0),
                (1, 3, 1.0),
                (3, 4, -1.0),
            ],
        );
        let view = graph.view();
        let mut distance = [0.0; 5];
        let mut predecessor = [0; 5];

        view.bellman_ford_into(
            view.edge_weights(),
            0,
            PathOutput::default()
                .distance(&mut distance)
                .predecessor(&mut predecessor),
        )
        .unwrap();

        assert_eq!(distance, [0.0, -1.0, 2.0, 0.0, -1.0]);
        assert_eq!(predecessor, [0, 2, 0, 1, 3]);
    }

    #[test]
    fn unreachable_negative_cycle_is_ignored() {
        let graph = CsrMatrix::from_weighted_edges(4, [(0, 1, 1.0), (2, 3, -2.0), (3, 2, -2.0)]);
        let view = graph.view();
        let mut distance = [0.0; 4];

        let status = view
            .bellman_ford_into(
                view.edge_weights(),
                0,
                PathOutput::default()
                    .distance(&mut distance)
                    .infinity(99.0),
            )
            .unwrap();

        assert_eq!(status, SearchStatus::Completed);
        assert_eq!(distance, [0.0, 1.0, 99.0, 99.0]);
    }

    #[test]
    fn verification_events() {
        let graph = CsrMatrix::from_weighted_edges(3, [(0, 1, 1.0), (1, 2, 1.0)]);
        let view = graph.view();
        let mut log = EventLog::default();

        BellmanFord::new(&view, view.edge_weights())
            .run(0, &mut log)
            .unwrap();

        assert_eq!(log.of("edge_minimized"), vec![(0, 1), (1, 2)]);
        assert!(log.of("edge_not_minimized").is_empty());
        // round 1 relaxes both edges, round 2 detects convergence
        assert_eq!(log.of("edge_relaxed"), vec![(0, 1), (1, 2)]);
        assert_eq!(log.of("examine_edge").len(), 4);

        let cyclic = CsrGraph::with_weights(2, &[0, 1, 2], &[1, 0], &[-5.0, 1.0]).unwrap();
        let mut log = EventLog::default();
        assert_eq!(
            BellmanFord::new(&cyclic, cyclic.edge_weights()).run(0, &mut log),
            Err(GraphError::NegativeCycle)
        );
        assert_eq!(log.of("edge_not_minimized").len(), 1);
    }

    #[test]
    fn visitor_stops_before_verification() {
        // the cycle 3 -> 4 -> 3 is negative and reachable
        let graph = CsrMatrix::from_weighted_edges(
            5,
            [
                (0, 1, 2.0),
                (0, 2, 10.0),
                (1, 2, 3.0),
                (2, 3, 1.0),
                (3, 4, -2.0),
                (4, 3, 1.0),
            ],
        );
        let view = graph.view();

        let mut bellman_ford = BellmanFord::new(&view, view.edge_weights());
        assert_eq!(bellman_ford.run(0, &mut ()), Err(GraphError::NegativeCycle));

        let mut log = EventLog::stopping_on_edge("edge_relaxed", 0, 2);
        assert_eq!(bellman_ford.run(0, &mut log), Ok(SearchStatus::Stopped));

        assert_eq!(log.events.last(), Some(&("edge_relaxed", 0, 2)));
        assert_eq!(log.of("edge_relaxed"), vec![(0, 1), (0, 2)]);
        assert!(log.of("edge_minimized").is_empty());
        assert!(log.of("edge_not_minimized").is_empty());

        let tree = bellman_ford.tree();
        assert_eq!(tree.distance(1), Some(2.0));
        assert_eq!(tree.distance(2), Some(10.0));
        assert_eq!(tree.predecessor(2), Some(0));
        assert_eq!(tree.distance(3), None);
        assert_eq!(tree.distance(4), None);
    }

    #[test]
    fn single_vertex() {
        let view = CsrGraph::new(1, &[0, 0], &[]).unwrap();
        let mut distance = [1.0];
        view.bellman_ford_into(
            ConstantMap(1.0),
            0,
            PathOutput::default().distance(&mut distance),
        )
        .unwrap();
        assert_eq!(distance, [0.0]);
    }
}
