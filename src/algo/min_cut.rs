/*!
# Global Minimum Cut

Stoer-Wagner algorithm for the minimum cut of an undirected graph with non-negative edge
weights. The graph has to be stored symmetrically, i.e. every edge `{u, v}` appears as both
`(u, v)` and `(v, u)` with the same weight, as produced by
[`CsrMatrix::undirected_from_weighted_edges`].
*/

use super::*;
use itertools::Itertools;
use log::{debug, trace};
use std::collections::BinaryHeap;

/// Stoer-Wagner minimum cut computation.
///
/// Runs `n - 1` phases. Each phase orders the current super-vertices by maximum adjacency;
/// the weight connecting the last vertex to all others is a cut candidate, after which the
/// last two vertices are merged.
pub struct StoerWagner<'a, G, W> {
    graph: &'a G,
    weights: W,
    leader: Vec<Node>,
    members: Vec<Vec<Node>>,
    key: Vec<f64>,
    in_order: NodeBitSet,
    heap: BinaryHeap<MaxKeyed>,
}

impl<'a, G, W> StoerWagner<'a, G, W>
where
    G: IndexedOutEdges,
    W: ReadPropertyMap<EdgeHandle, Value = f64>,
{
    pub fn new(graph: &'a G, weights: W) -> Self {
        let n = graph.len();
        Self {
            graph,
            weights,
            leader: graph.vertices().collect(),
            members: graph.vertices().map(|u| vec![u]).collect(),
            key: vec![0.0; n],
            in_order: graph.vertex_bitset_unset(),
            heap: BinaryHeap::with_capacity(n),
        }
    }

    /// Computes the weight of a minimum cut and one of its sides.
    ///
    /// # Errors
    /// - [`GraphError::InvalidInput`] if the graph has fewer than two vertices,
    /// - [`GraphError::NegativeWeight`] if some edge weight is negative.
    pub fn run(mut self) -> Result<(f64, Vec<Node>)> {
        let n = self.graph.len();
        raise_error_unless!(
            n >= 2,
            invalid_input!("a cut requires at least two vertices, got {n}")
        );
        check_non_negative_weights(self.graph, &self.weights)?;

        debug!(
            "Stoer-Wagner on {n} vertices and {} edges",
            self.graph.number_of_edges()
        );

        let mut best_weight = f64::INFINITY;
        let mut best_side = Vec::new();

        for phase in 1..n {
            let (prev, last, cut) = self.phase();
            trace!("Stoer-Wagner phase {phase}: cut of {last} weighs {cut}");

            if cut < best_weight {
                best_weight = cut;
                best_side = self.members[last as usize].clone();
            }
            self.merge(prev, last);
        }

        debug!("Stoer-Wagner minimum cut weighs {best_weight}");
        Ok((best_weight, best_side))
    }

    /// Orders all super-vertices by maximum adjacency starting at the first one.
    /// Returns the last two vertices of the order and the weight of the cut around the last.
    fn phase(&mut self) -> (Node, Node, f64) {
        let leaders = self
            .graph
            .vertices()
            .filter(|&u| self.leader[u as usize] == u)
            .collect_vec();

        self.in_order.clear_all();
        self.heap.clear();
        for &u in &leaders {
            self.key[u as usize] = 0.0;
            self.heap.push(MaxKeyed::new(0.0, u));
        }

        let mut prev = INVALID_NODE;
        let mut last = INVALID_NODE;
        let mut added = 0;

        while added < leaders.len() {
            let Some(MaxKeyed { key, node: u }) = self.heap.pop() else {
                break;
            };
            if self.in_order.get_bit(u) || key != self.key[u as usize] {
                continue;
            }

            self.in_order.set_bit(u);
            added += 1;
            prev = last;
            last = u;

            for &x in &self.members[u as usize] {
                for (e, y) in self.graph.out_edges(x) {
                    let ly = self.leader[y as usize];
                    if self.in_order.get_bit(ly) {
                        continue;
                    }
                    self.key[ly as usize] += self.weights.get(e);
                    self.heap.push(MaxKeyed::new(self.key[ly as usize], ly));
                }
            }
        }

        (prev, last, self.key[last as usize])
    }

    /// Merges super-vertex `last` into `prev`
    fn merge(&mut self, prev: Node, last: Node) {
        let moved = std::mem::take(&mut self.members[last as usize]);
        for &x in &moved {
            self.leader[x as usize] = prev;
        }
        self.members[prev as usize].extend(moved);
    }
}

/// Trait for global minimum cuts.
/// Implemented for every graph with indexed out-edges.
pub trait MinimumCut: IndexedOutEdges {
    /// Computes a global minimum cut using the Stoer-Wagner algorithm and returns its weight.
    /// `side[u]` is set to *true* for all vertices on one side of the cut.
    ///
    /// # Errors
    /// - [`GraphError::InvalidInput`] if the graph has fewer than two vertices,
    /// - [`GraphError::BufferTooSmall`] if `side` has fewer than `n` entries,
    /// - [`GraphError::NegativeWeight`] if some edge weight is negative.
    ///
    /// `side` is not modified if an error is returned.
    ///
    /// # Examples
    /// ```
    /// use csrgraphs::{prelude::*, algo::*};
    ///
    /// // two triangles joined by a light edge
    /// let graph = CsrMatrix::undirected_from_weighted_edges(6, [
    ///     (0, 1, 3.0), (1, 2, 3.0), (0, 2, 3.0),
    ///     (3, 4, 3.0), (4, 5, 3.0), (3, 5, 3.0),
    ///     (2, 3, 1.0),
    /// ]);
    /// let view = graph.view();
    /// let mut side = [false; 6];
    ///
    /// assert_eq!(view.stoer_wagner_min_cut(view.edge_weights(), &mut side), Ok(1.0));
    /// assert!(side[0] == side[1] && side[1] == side[2]);
    /// assert!(side[3] == side[4] && side[4] == side[5]);
    /// assert_ne!(side[0], side[3]);
    /// ```
    fn stoer_wagner_min_cut<W>(&self, weights: W, side: &mut [bool]) -> Result<f64>
    where
        W: ReadPropertyMap<EdgeHandle, Value = f64>,
    {
        let mut side = SliceMap::for_vertices(side, self, "side")?;
        let (weight, members) = StoerWagner::new(self, weights).run()?;

        side.fill(false);
        for u in members {
            side.set(u, true);
        }
        Ok(weight)
    }
}

impl<G: IndexedOutEdges> MinimumCut for G {}
