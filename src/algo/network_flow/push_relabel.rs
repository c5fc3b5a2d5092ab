use super::*;
use log::{trace, warn};
use std::collections::VecDeque;

/// FIFO push-relabel algorithm.
///
/// Saturates all residual edges leaving the source and then discharges active vertices
/// (positive excess, neither source nor sink) in FIFO order. Heights start out exact
/// (global relabel: BFS distances to the sink, or `n` plus the distance to the source for
/// vertices that cannot reach the sink) and are recomputed after every `n` relabels.
/// The gap heuristic lifts all vertices above an empty height level below `n` at once.
///
/// The algorithm terminates with a valid flow: excess that cannot reach the sink is
/// returned to the source.
pub struct PushRelabel<'a, G, R, C> {
    network: ResidualNetwork<'a, G, R>,
    excess: Vec<C>,
    height: Vec<usize>,
    count: Vec<usize>,
    current: Vec<EdgeIndex>,
    active: VecDeque<Node>,
    in_queue: NodeBitSet,
    relabels_since_global: usize,
}

impl<'a, G, R, C> PushRelabel<'a, G, R, C>
where
    G: IndexedOutEdges,
    R: PropertyMap<EdgeHandle, Value = C>,
    C: Capacity,
{
    pub fn new(network: ResidualNetwork<'a, G, R>) -> Self {
        let graph = network.graph();
        let n = graph.len();
        Self {
            excess: vec![C::zero(); n],
            height: vec![0; n],
            count: vec![0; 2 * n + 1],
            current: graph
                .vertices()
                .map(|u| graph.edge_range(u).start)
                .collect(),
            active: VecDeque::new(),
            in_queue: graph.vertex_bitset_unset(),
            relabels_since_global: 0,
            network,
        }
    }

    /// Runs the algorithm and returns the flow value pushed into the sink
    pub fn max_flow(mut self) -> C {
        let graph = self.network.graph();
        let s = self.network.source();
        let t = self.network.sink();
        let n = graph.len();

        for (e, v) in graph.out_edges(s) {
            let delta = self.network.residual(e);
            if v == s || delta <= C::zero() {
                continue;
            }
            self.network.augment(e, delta);
            self.excess[v as usize] += delta;
            self.activate(v);
        }

        self.global_relabel();

        while let Some(u) = self.active.pop_front() {
            self.in_queue.clear_bit(u);
            self.discharge(u);

            if self.relabels_since_global >= n {
                self.global_relabel();
            }
        }

        self.excess[t as usize]
    }

    fn activate(&mut self, u: Node) {
        if u != self.network.source() && u != self.network.sink() && !self.in_queue.set_bit(u) {
            self.active.push_back(u);
        }
    }

    /// Pushes excess out of `u` along admissible edges and relabels `u` whenever its
    /// current arc is exhausted, until `u` has no excess left
    fn discharge(&mut self, u: Node) {
        let graph = self.network.graph();
        let range = graph.edge_range(u);
        let limit = 2 * graph.len();

        while self.excess[u as usize] > C::zero() {
            let index = self.current[u as usize];
            if index == range.end {
                self.relabel(u);
                if self.height[u as usize] >= limit {
                    break;
                }
                self.current[u as usize] = range.start;
                continue;
            }

            let e = EdgeHandle::new(u, index);
            let v = graph.edge_target(index);
            let residual = self.network.residual(e);

            if residual > C::zero() && self.height[u as usize] == self.height[v as usize] + 1 {
                let delta = min_capacity(self.excess[u as usize], residual);
                self.network.augment(e, delta);
                self.excess[u as usize] -= delta;
                self.excess[v as usize] += delta;
                self.activate(v);

                // a saturated arc is done, otherwise the excess ran out first
                if delta == residual {
                    self.current[u as usize] += 1;
                }
            } else {
                self.current[u as usize] += 1;
            }
        }
    }

    /// Lifts `u` to one above its lowest residual neighbor and applies the gap heuristic
    fn relabel(&mut self, u: Node) {
        let graph = self.network.graph();
        let n = graph.len();
        let old = self.height[u as usize];

        let lowest = graph
            .out_edges(u)
            .filter(|&(e, v)| v != u && self.network.has_residual(e))
            .map(|(_, v)| self.height[v as usize])
            .min();

        let mut new = match lowest {
            Some(h) => (h + 1).min(2 * n),
            None => {
                warn!("Push-relabel: vertex {u} has excess but no residual out-edge");
                2 * n
            }
        };

        self.relabels_since_global += 1;
        self.count[old] -= 1;

        if self.count[old] == 0 && old < n {
            let mut lifted = 0;
            for v in graph.vertices() {
                let h = self.height[v as usize];
                if v != u && h > old && h < n {
                    self.count[h] -= 1;
                    self.height[v as usize] = n + 1;
                    self.count[n + 1] += 1;
                    lifted += 1;
                }
            }
            new = new.max(n + 1);
            trace!("Push-relabel: gap at height {old} lifted {lifted} vertices");
        }

        self.height[u as usize] = new;
        self.count[new] += 1;
    }

    /// Recomputes exact heights by reverse BFS from the sink and, for vertices that cannot
    /// reach the sink, from the source
    fn global_relabel(&mut self) {
        let graph = self.network.graph();
        let n = graph.len();
        let s = self.network.source();
        let t = self.network.sink();
        let unlabeled = 2 * n;

        self.height.fill(unlabeled);
        self.height[t as usize] = 0;
        self.reverse_bfs(t, Some(s));

        self.height[s as usize] = n;
        self.reverse_bfs(s, None);

        self.count.fill(0);
        for &h in &self.height {
            self.count[h] += 1;
        }
        for u in graph.vertices() {
            self.current[u as usize] = graph.edge_range(u).start;
        }

        self.relabels_since_global = 0;
        trace!("Push-relabel: global relabel");
    }

    /// Labels all unlabeled vertices that reach `root` in the residual network with their
    /// distance to `root` plus the height of `root`
    fn reverse_bfs(&mut self, root: Node, skip: Option<Node>) {
        let graph = self.network.graph();
        let unlabeled = 2 * graph.len();

        let mut queue = VecDeque::from([root]);
        while let Some(v) = queue.pop_front() {
            let h = self.height[v as usize] + 1;
            for (e, w) in graph.out_edges(v) {
                if self.height[w as usize] != unlabeled || Some(w) == skip {
                    continue;
                }
                if self.network.has_residual(self.network.reverse(e)) {
                    self.height[w as usize] = h;
                    queue.push_back(w);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excess_is_returned_to_the_source() {
        // 0 -> 1 (10), 1 -> 2 (3), 1 -> 3 (10), 3 is a dead end
        let graph = CsrMatrix::symmetric_from_edges(4, [(0, 1), (1, 2), (1, 3)]);
        let index = graph.reverse_edge_index().unwrap();
        let reverse = ReverseEdges::new(&graph, &index).unwrap();
        let capacity: Vec<i32> = graph
            .edge_values([(0, 1, 10), (1, 2, 3), (1, 3, 10)])
            .unwrap();
        let mut residual = capacity.clone();

        let flow = PushRelabel::new(ResidualNetwork::new(
            &graph,
            reverse,
            SliceMap::for_edges(&mut residual, &graph, "residual").unwrap(),
            0,
            2,
        ))
        .max_flow();
        assert_eq!(flow, 3);

        // flow on (0, 1) is 3, nothing is stuck at 1 or 3
        let e01 = graph.find_edge(0, 1).unwrap() as usize;
        let e13 = graph.find_edge(1, 3).unwrap() as usize;
        assert_eq!(residual[e01], 7);
        assert_eq!(residual[e13], 10);
    }
}
