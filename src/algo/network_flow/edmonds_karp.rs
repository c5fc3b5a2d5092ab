use super::*;
use itertools::Itertools;
use log::trace;
use std::collections::VecDeque;

/// Implementation of the Edmonds-Karp algorithm.
///
/// Each call to [`Iterator::next`] searches a shortest augmenting path via BFS in the
/// residual network, pushes its bottleneck capacity along it and returns the amount pushed.
/// The iterator is exhausted once source and sink are separated.
pub struct EdmondsKarp<'a, G, R> {
    network: ResidualNetwork<'a, G, R>,
    predecessor: Vec<Option<EdgeHandle>>,
    visited: NodeBitSet,
    queue: VecDeque<Node>,
}

impl<'a, G, R, C> EdmondsKarp<'a, G, R>
where
    G: IndexedOutEdges,
    R: PropertyMap<EdgeHandle, Value = C>,
    C: Capacity,
{
    pub fn new(network: ResidualNetwork<'a, G, R>) -> Self {
        let graph = network.graph();
        Self {
            predecessor: vec![None; graph.len()],
            visited: graph.vertex_bitset_unset(),
            queue: VecDeque::with_capacity(graph.len()),
            network,
        }
    }

    /// Augments until no augmenting path is left and returns the total flow pushed
    pub fn max_flow(self) -> C {
        self.fold(C::zero(), |mut total, delta| {
            total += delta;
            total
        })
    }

    /// Performs a BFS from the source along edges with residual capacity.
    /// Returns *true* if the sink was reached.
    fn bfs(&mut self) -> bool {
        let graph = self.network.graph();
        let s = self.network.source();
        let t = self.network.sink();

        self.visited.clear_all();
        self.queue.clear();

        self.visited.set_bit(s);
        self.queue.push_back(s);

        while let Some(u) = self.queue.pop_front() {
            for (e, v) in graph.out_edges(u) {
                if self.visited.get_bit(v) || !self.network.has_residual(e) {
                    continue;
                }

                self.visited.set_bit(v);
                self.predecessor[v as usize] = Some(e);
                if v == t {
                    return true;
                }
                self.queue.push_back(v);
            }
        }

        false
    }

    /// Iterates the edges of the augmenting path found by the last BFS from sink to source
    fn path(&self) -> impl Iterator<Item = EdgeHandle> + '_ {
        let s = self.network.source();
        std::iter::successors(self.predecessor[self.network.sink() as usize], move |e| {
            (e.source != s)
                .then(|| self.predecessor[e.source as usize])
                .flatten()
        })
    }
}

impl<G, R, C> Iterator for EdmondsKarp<'_, G, R>
where
    G: IndexedOutEdges,
    R: PropertyMap<EdgeHandle, Value = C>,
    C: Capacity,
{
    type Item = C;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.bfs() {
            return None;
        }

        let delta = self
            .path()
            .map(|e| self.network.residual(e))
            .reduce(min_capacity)?;

        let path = self.path().collect_vec();
        trace!("Edmonds-Karp augments {delta:?} along {} edges", path.len());
        for e in path {
            self.network.augment(e, delta);
        }

        Some(delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yields_bottlenecks_of_shortest_paths() {
        // 0 -> 3 directly (cap 1) and 0 -> 1 -> 2 -> 3 (cap 4)
        let graph = CsrMatrix::symmetric_from_edges(4, [(0, 3), (0, 1), (1, 2), (2, 3)]);
        let index = graph.reverse_edge_index().unwrap();
        let reverse = ReverseEdges::new(&graph, &index).unwrap();
        let mut residual: Vec<u32> = graph
            .edge_values([(0, 3, 1), (0, 1, 4), (1, 2, 4), (2, 3, 4)])
            .unwrap();

        let network = ResidualNetwork::new(
            &graph,
            reverse,
            SliceMap::for_edges(&mut residual, &graph, "residual").unwrap(),
            0,
            3,
        );
        let deltas = EdmondsKarp::new(network).collect_vec();
        assert_eq!(deltas, vec![1, 4]);

        let expected: Vec<u32> = graph
            .edge_values([(1, 0, 4), (3, 0, 1), (2, 1, 4), (3, 2, 4)])
            .unwrap();
        assert_eq!(residual, expected);
    }
}
