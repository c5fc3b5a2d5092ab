use super::*;
use log::trace;
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tree {
    Free,
    Source,
    Sink,
}

/// The Boykov-Kolmogorov algorithm.
///
/// Maintains two search trees of residual edges: one rooted at the source growing along
/// out-edges and one rooted at the sink growing along in-edges. Once the trees touch, the
/// flow is augmented along the joined path. Vertices that lose their tree edge through
/// saturation become orphans and are re-attached (adopted) to their tree if possible,
/// instead of discarding the trees.
///
/// Tree edges are stored in flow direction: the parent edge of a source-tree vertex `v`
/// leads into `v`, the parent edge of a sink-tree vertex `v` leaves `v`.
pub struct BoykovKolmogorov<'a, G, R> {
    network: ResidualNetwork<'a, G, R>,
    tree: Vec<Tree>,
    parent: Vec<Option<EdgeHandle>>,
    active: VecDeque<Node>,
    is_active: NodeBitSet,
    orphans: VecDeque<Node>,
}

impl<'a, G, R, C> BoykovKolmogorov<'a, G, R>
where
    G: IndexedOutEdges,
    R: PropertyMap<EdgeHandle, Value = C>,
    C: Capacity,
{
    pub fn new(network: ResidualNetwork<'a, G, R>) -> Self {
        let graph = network.graph();
        let n = graph.len();
        Self {
            tree: vec![Tree::Free; n],
            parent: vec![None; n],
            active: VecDeque::new(),
            is_active: graph.vertex_bitset_unset(),
            orphans: VecDeque::new(),
            network,
        }
    }

    /// Runs the algorithm and returns the flow value pushed into the sink
    pub fn max_flow(mut self) -> C {
        let s = self.network.source();
        let t = self.network.sink();

        self.tree[s as usize] = Tree::Source;
        self.tree[t as usize] = Tree::Sink;
        self.activate(s);
        self.activate(t);

        let mut total = C::zero();
        let mut augmentations = 0usize;
        while let Some(junction) = self.grow() {
            total += self.augment(junction);
            self.adopt();
            augmentations += 1;
        }

        trace!("Boykov-Kolmogorov finished after {augmentations} augmentations");
        total
    }

    fn activate(&mut self, u: Node) {
        if !self.is_active.set_bit(u) {
            self.active.push_back(u);
        }
    }

    /// The parent vertex of `v` in its tree
    fn parent_vertex(&self, v: Node) -> Option<Node> {
        let e = self.parent[v as usize]?;
        Some(match self.tree[v as usize] {
            Tree::Sink => self.network.graph().edge_target(e.index),
            _ => e.source,
        })
    }

    /// Expands the trees from active vertices until they touch.
    /// Returns the residual edge from the source tree into the sink tree.
    fn grow(&mut self) -> Option<EdgeHandle> {
        let graph = self.network.graph();

        while let Some(&u) = self.active.front() {
            let side = self.tree[u as usize];

            for (e, v) in graph.out_edges(u) {
                match side {
                    Tree::Source if self.network.has_residual(e) => match self.tree[v as usize] {
                        Tree::Free => {
                            self.tree[v as usize] = Tree::Source;
                            self.parent[v as usize] = Some(e);
                            self.activate(v);
                        }
                        Tree::Sink => return Some(e),
                        Tree::Source => {}
                    },
                    Tree::Sink => {
                        let r = self.network.reverse(e);
                        if !self.network.has_residual(r) {
                            continue;
                        }
                        match self.tree[v as usize] {
                            Tree::Free => {
                                self.tree[v as usize] = Tree::Sink;
                                self.parent[v as usize] = Some(r);
                                self.activate(v);
                            }
                            Tree::Source => return Some(r),
                            Tree::Sink => {}
                        }
                    }
                    _ => {}
                }
            }

            self.active.pop_front();
            self.is_active.clear_bit(u);
        }

        None
    }

    /// Pushes the bottleneck capacity along the path through `junction` and turns vertices
    /// whose tree edge got saturated into orphans
    fn augment(&mut self, junction: EdgeHandle) -> C {
        let graph = self.network.graph();
        let mut path = vec![junction];

        let mut u = junction.source;
        while let Some(e) = self.parent[u as usize] {
            path.push(e);
            u = e.source;
        }
        let mut v = graph.edge_target(junction.index);
        while let Some(e) = self.parent[v as usize] {
            path.push(e);
            v = graph.edge_target(e.index);
        }

        let delta = path
            .iter()
            .map(|&e| self.network.residual(e))
            .reduce(min_capacity)
            .expect("path contains the junction");

        for e in path {
            self.network.augment(e, delta);
            if self.network.has_residual(e) {
                continue;
            }

            let u = e.source;
            let v = graph.edge_target(e.index);
            if self.tree[u as usize] == Tree::Source && self.tree[v as usize] == Tree::Source {
                self.make_orphan(v);
            } else if self.tree[u as usize] == Tree::Sink && self.tree[v as usize] == Tree::Sink {
                self.make_orphan(u);
            }
        }

        delta
    }

    fn make_orphan(&mut self, v: Node) {
        self.parent[v as usize] = None;
        self.orphans.push_back(v);
    }

    /// Returns *true* if `v` is connected to the root of its tree along parent edges
    fn is_rooted(&self, mut v: Node) -> bool {
        let root = match self.tree[v as usize] {
            Tree::Source => self.network.source(),
            Tree::Sink => self.network.sink(),
            Tree::Free => return false,
        };

        while v != root {
            match self.parent_vertex(v) {
                Some(p) => v = p,
                None => return false,
            }
        }
        true
    }

    /// Re-attaches orphans to their tree or frees them together with their subtrees
    fn adopt(&mut self) {
        let graph = self.network.graph();

        while let Some(v) = self.orphans.pop_front() {
            let side = self.tree[v as usize];

            let new_parent = graph.out_edges(v).find_map(|(e, w)| {
                if self.tree[w as usize] != side {
                    return None;
                }
                let candidate = match side {
                    Tree::Source => self.network.reverse(e),
                    _ => e,
                };
                (self.network.has_residual(candidate) && self.is_rooted(w)).then_some(candidate)
            });

            if new_parent.is_some() {
                self.parent[v as usize] = new_parent;
                continue;
            }

            for (e, w) in graph.out_edges(v) {
                if self.tree[w as usize] != side {
                    continue;
                }

                // w may grow into the subtree that is freed now
                let towards_v = match side {
                    Tree::Source => self.network.has_residual(self.network.reverse(e)),
                    _ => self.network.has_residual(e),
                };
                if w != v && towards_v {
                    self.activate(w);
                }

                if self.parent_vertex(w) == Some(v) {
                    self.make_orphan(w);
                }
            }

            self.tree[v as usize] = Tree::Free;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trees_are_reused_after_augmentation() {
        // two disjoint paths 0 -> 1 -> 3 and 0 -> 2 -> 3 plus the cross edge 1 -> 2
        let graph = CsrMatrix::symmetric_from_edges(4, [(0, 1), (0, 2), (1, 2), (1, 3), (2, 3)]);
        let index = graph.reverse_edge_index().unwrap();
        let reverse = ReverseEdges::new(&graph, &index).unwrap();
        let capacity: Vec<u64> = graph
            .edge_values([(0, 1, 5), (0, 2, 2), (1, 2, 4), (1, 3, 1), (2, 3, 7)])
            .unwrap();
        let mut residual = capacity.clone();

        let flow = BoykovKolmogorov::new(ResidualNetwork::new(
            &graph,
            reverse,
            SliceMap::for_edges(&mut residual, &graph, "residual").unwrap(),
            0,
            3,
        ))
        .max_flow();

        // the source edges (7) are the bottleneck, the sink edges carry 8
        assert_eq!(flow, 7);
        for p in 0..residual.len() {
            let r = index[p] as usize;
            assert_eq!(residual[p] + residual[r], capacity[p] + capacity[r]);
        }
    }
}
