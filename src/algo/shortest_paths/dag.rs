use super::*;
use log::debug;

/// Collects vertices in the order a depth-first search finishes them and breaks on the
/// first back edge
#[derive(Default)]
struct FinishOrder {
    finished: Vec<Node>,
    back_edge: Option<EdgeHandle>,
}

impl DfsVisitor for FinishOrder {
    fn back_edge(&mut self, e: EdgeHandle, _u: Node, _v: Node) -> Control {
        self.back_edge = Some(e);
        ControlFlow::Break(())
    }

    fn finish_vertex(&mut self, u: Node) -> Control {
        self.finished.push(u);
        CONTINUE
    }
}

/// Single-source shortest paths in a directed acyclic graph in `O(n + m)`.
///
/// A depth-first search from the source yields a topological order of all reachable
/// vertices; relaxing their out-edges in that order settles every vertex in a single pass.
/// Weights may be negative. Cycles are only rejected if they are reachable from the source.
///
/// Events are reported through a [`DijkstraVisitor`]: vertices are examined and finished in
/// topological order.
pub struct DagShortestPaths<'a, G, W> {
    graph: &'a G,
    weights: W,
    tree: ShortestPathTree,
    order: Vec<Node>,
}

impl<'a, G, W> DagShortestPaths<'a, G, W>
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
            order: Vec::with_capacity(graph.len()),
        }
    }

    /// Returns the distances and predecessors computed by the last run.
    /// Meaningless if the last run reported a cycle.
    pub fn tree(&self) -> &ShortestPathTree {
        &self.tree
    }

    /// Runs the search from `source` reporting all events to `visitor`.
    ///
    /// # Errors
    /// - [`GraphError::InvalidInput`] if `source` is not a vertex,
    /// - [`GraphError::InvalidGraph`] if a cycle (including a self-loop) is reachable from
    ///   `source`; the visitor sees no event in this case.
    pub fn run<V: DijkstraVisitor>(
        &mut self,
        source: Node,
        visitor: &mut V,
    ) -> Result<SearchStatus> {
        let n = self.graph.len();
        check_vertex(source, n, "source")?;

        debug!(
            "DAG shortest paths from {source} on {n} vertices and {} edges",
            self.graph.number_of_edges()
        );

        let mut order = FinishOrder {
            finished: std::mem::take(&mut self.order),
            back_edge: None,
        };
        order.finished.clear();
        self.graph.depth_first_search(source, false, &mut order)?;
        self.order = order.finished;

        if let Some(e) = order.back_edge {
            return Err(invalid_graph!("edge {e} closes a cycle reachable from {source}"));
        }

        self.tree.reset(source);
        for u in self.graph.vertices() {
            visit!(visitor.initialize_vertex(u));
        }
        visit!(visitor.discover_vertex(source));

        for &u in self.order.iter().rev() {
            visit!(visitor.examine_vertex(u));

            for (e, v) in self.graph.out_edges(u) {
                visit!(visitor.examine_edge(e, u, v));

                let undiscovered = self.tree.distance(v).is_none();
                if self.tree.relax(u, v, self.weights.get(e)) {
                    visit!(visitor.edge_relaxed(e, u, v));
                    if undiscovered {
                        visit!(visitor.discover_vertex(v));
                    }
                } else {
                    visit!(visitor.edge_not_relaxed(e, u, v));
                }
            }

            visit!(visitor.finish_vertex(u));
        }

        Ok(SearchStatus::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::visitor::tests::EventLog;
    use itertools::Itertools;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64Mcg;

    /// Random DAG whose edges point from lower to higher rank of a random permutation
    fn random_dag<R: Rng>(rng: &mut R, n: NumNodes, m: usize) -> CsrMatrix {
        let mut rank = (0..n).collect_vec();
        for i in (1..n as usize).rev() {
            rank.swap(i, rng.random_range(0..=i));
        }

        let edges = (0..m)
            .filter_map(|_| {
                let a = rng.random_range(0..n) as usize;
                let b = rng.random_range(0..n) as usize;
                (a < b).then(|| (rank[a], rank[b], rng.random_range(-5.0..10.0)))
            })
            .collect_vec();
        CsrMatrix::from_weighted_edges(n, edges)
    }

    #[test]
    fn negative_weights_in_topological_order() {
        let graph = CsrMatrix::from_weighted_edges(
            5,
            [
                (0, 1, 5.0),
                (0, 2, 3.0),
                (2, 1, -4.0),
                (1, 3, 1.0),
                (2, 3, 6.0),
            ],
        );
        let view = graph.view();
        let mut distance = [0.0; 5];
        let mut predecessor = [0; 5];

        let status = view
            .dag_shortest_paths_into(
                view.edge_weights(),
                0,
                PathOutput::default()
                    .distance(&mut distance)
                    .predecessor(&mut predecessor)
                    .infinity(99.0),
            )
            .unwrap();

        assert_eq!(status, SearchStatus::Completed);
        assert_eq!(distance, [0.0, -1.0, 3.0, 0.0, 99.0]);
        assert_eq!(predecessor, [0, 2, 0, 1, INVALID_NODE]);
    }

    #[test]
    fn vertices_are_examined_in_topological_order() {
        let graph = CsrMatrix::from_weighted_edges(
            4,
            [(0, 2, 1.0), (0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0)],
        );
        let view = graph.view();
        let mut log = EventLog::default();

        DagShortestPaths::new(&view, view.edge_weights())
            .run(0, &mut log)
            .unwrap();

        let examined = log
            .of("examine_vertex")
            .into_iter()
            .map(|(u, _)| u)
            .collect_vec();
        assert_eq!(examined, vec![0, 1, 2, 3]);
        assert_eq!(log.of("discover_vertex").len(), 4);
    }

    #[test]
    fn reachable_cycles_are_rejected_without_writing() {
        let graph = CsrMatrix::from_weighted_edges(
            4,
            [(0, 1, 1.0), (1, 2, 1.0), (2, 1, 1.0), (3, 3, 1.0)],
        );
        let view = graph.view();
        let mut distance = [7.0; 4];

        assert!(matches!(
            view.dag_shortest_paths_into(
                view.edge_weights(),
                0,
                PathOutput::default().distance(&mut distance)
            ),
            Err(GraphError::InvalidGraph(_))
        ));
        assert_eq!(distance, [7.0; 4]);

        // the self-loop at 3 counts as a cycle, but only when reachable
        let mut log = EventLog::default();
        assert!(matches!(
            DagShortestPaths::new(&view, view.edge_weights()).run(3, &mut log),
            Err(GraphError::InvalidGraph(_))
        ));
        assert!(log.events.is_empty());

        let acyclic = CsrMatrix::from_weighted_edges(3, [(0, 1, 2.0), (2, 2, 1.0)]);
        let view = acyclic.view();
        let mut distance = [7.0; 3];
        view.dag_shortest_paths_into(
            view.edge_weights(),
            0,
            PathOutput::default().distance(&mut distance),
        )
        .unwrap();
        assert_eq!(distance, [0.0, 2.0, f64::INFINITY]);
    }

    #[test]
    fn agrees_with_floyd_warshall() {
        let rng = &mut Pcg64Mcg::seed_from_u64(0xda9);

        for n in [2, 10, 30] {
            for _ in 0..5 {
                let graph = random_dag(rng, n, 3 * n as usize);
                let view = graph.view();

                let mut all_pairs = vec![0.0; (n * n) as usize];
                view.floyd_warshall_into(
                    view.edge_weights(),
                    &mut all_pairs,
                    None,
                    f64::INFINITY,
                )
                .unwrap();

                for source in 0..n {
                    let mut distance = vec![0.0; n as usize];
                    view.dag_shortest_paths_into(
                        view.edge_weights(),
                        source,
                        PathOutput::default().distance(&mut distance),
                    )
                    .unwrap();

                    let row = &all_pairs[(source * n) as usize..((source + 1) * n) as usize];
                    for (a, b) in row.iter().zip(&distance) {
                        assert!(a == b || (a - b).abs() < 1e-9, "{a} vs {b}");
                    }
                }
            }
        }
    }
}
