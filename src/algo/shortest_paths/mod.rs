/*!
Single-source and all-pairs shortest paths over `f64` edge weights.

- [`Dijkstra`] requires non-negative weights,
- [`BellmanFord`] tolerates negative weights and detects negative cycles,
- [`AStar`] is guided by a heuristic and re-opens closed vertices when it finds a shorter path,
- [`DagShortestPaths`] handles negative weights in linear time if no cycle is reachable,
- [`ShortestPaths::floyd_warshall_into`] and [`ShortestPaths::johnson_into`] compute all-pairs
  distances into a dense matrix; the latter is faster on sparse graphs.

Weights are read through a property map, e.g. [`CsrGraph::edge_weights`] which falls back to unit
weights for unweighted graphs, or [`ConstantMap`].

Conventions of all outputs:
- the caller chooses the value written for unreachable vertices (`infinity`, default `f64::INFINITY`);
  internally `f64::INFINITY` is used, the sentinel only ever appears in outputs,
- the predecessor of the source is the source itself, unreached vertices get [`INVALID_NODE`],
- edges are relaxed only on strict improvement, so among equally short paths the one whose
  last edge was examined first wins.
*/

use super::{visitor::visit, *};
use std::collections::BinaryHeap;

mod astar;
mod bellman_ford;
mod dag;
mod dijkstra;
mod floyd_warshall;
mod johnson;

pub use astar::*;
pub use bellman_ford::*;
pub use dag::*;
pub use dijkstra::*;

/// Buffers receiving the results of a single-source shortest path computation.
/// Every buffer is optional and needs at least one entry per vertex.
#[derive(Debug)]
pub struct PathOutput<'a> {
    pub distance: Option<&'a mut [f64]>,
    pub predecessor: Option<&'a mut [Node]>,
    /// Value written as the distance of unreachable vertices
    pub infinity: f64,
}

impl Default for PathOutput<'_> {
    fn default() -> Self {
        Self {
            distance: None,
            predecessor: None,
            infinity: f64::INFINITY,
        }
    }
}

impl<'a> PathOutput<'a> {
    /// Records distances into `buffer`
    pub fn distance(mut self, buffer: &'a mut [f64]) -> Self {
        self.distance = Some(buffer);
        self
    }

    /// Records the shortest path tree into `buffer`
    pub fn predecessor(mut self, buffer: &'a mut [Node]) -> Self {
        self.predecessor = Some(buffer);
        self
    }

    /// Sets the distance written for unreachable vertices
    pub fn infinity(mut self, infinity: f64) -> Self {
        self.infinity = infinity;
        self
    }

    /// Checks the buffer sizes; nothing is written yet
    fn into_maps<G: GraphNodeOrder>(self, graph: &G) -> Result<PathMaps<'a>> {
        Ok(PathMaps {
            distance: self
                .distance
                .map(|data| SliceMap::for_vertices(data, graph, "distance"))
                .transpose()?,
            predecessor: self
                .predecessor
                .map(|data| SliceMap::for_vertices(data, graph, "predecessor"))
                .transpose()?,
            infinity: self.infinity,
        })
    }
}

/// Size-checked caller buffers of a [`PathOutput`]
struct PathMaps<'a> {
    distance: Option<SliceMap<'a, f64>>,
    predecessor: Option<SliceMap<'a, Node>>,
    infinity: f64,
}

impl PathMaps<'_> {
    fn record(&mut self, tree: &ShortestPathTree) {
        if let Some(distance) = &mut self.distance {
            for u in 0..tree.len() as Node {
                distance.set(u, tree.distance(u).unwrap_or(self.infinity));
            }
        }
        if let Some(predecessor) = &mut self.predecessor {
            for u in 0..tree.len() as Node {
                predecessor.set(u, tree.predecessor.get(u));
            }
        }
    }
}

/// Tentative distances and predecessors of a single-source search
#[derive(Debug, Clone)]
pub struct ShortestPathTree {
    distance: VecMap<f64>,
    predecessor: VecMap<Node>,
}

impl ShortestPathTree {
    fn new(n: usize) -> Self {
        Self {
            distance: VecMap::new(n, f64::INFINITY),
            predecessor: VecMap::new(n, INVALID_NODE),
        }
    }

    fn reset(&mut self, source: Node) {
        self.distance.fill(f64::INFINITY);
        self.predecessor.fill(INVALID_NODE);
        self.distance.set(source, 0.0);
        self.predecessor.set(source, source);
    }

    /// Starts from a virtual source adjacent to every vertex by a zero-weight edge
    fn reset_virtual_source(&mut self) {
        self.distance.fill(0.0);
        for u in 0..self.len() as Node {
            self.predecessor.set(u, u);
        }
    }

    /// Returns the number of vertices
    pub fn len(&self) -> usize {
        self.distance.len()
    }

    /// Returns *true* if the tree spans no vertices
    pub fn is_empty(&self) -> bool {
        self.distance.is_empty()
    }

    /// Returns the distance of `u` or `None` if `u` is unreachable.
    /// ** Panics if `u >= n` **
    pub fn distance(&self, u: Node) -> Option<f64> {
        let d = self.distance.get(u);
        (d != f64::INFINITY).then_some(d)
    }

    /// Returns the predecessor of `u` or `None` if `u` is unreachable.
    /// ** Panics if `u >= n` **
    pub fn predecessor(&self, u: Node) -> Option<Node> {
        let p = self.predecessor.get(u);
        (p != INVALID_NODE).then_some(p)
    }

    /// Returns the vertices of the path from the source to `target` (both inclusive)
    /// or `None` if `target` is unreachable.
    pub fn path_to(&self, target: Node) -> Option<Vec<Node>> {
        let mut path = vec![target];
        let mut u = target;
        loop {
            let p = self.predecessor(u)?;
            if p == u {
                break;
            }
            path.push(p);
            u = p;
        }
        path.reverse();
        Some(path)
    }

    /// Relaxes the edge `(u, v)` of weight `w`; returns *true* if the distance of `v` improved
    #[inline]
    fn relax(&mut self, u: Node, v: Node, w: f64) -> bool {
        let du = self.distance.get(u);
        if du == f64::INFINITY {
            return false;
        }

        let candidate = du + w;
        if candidate < self.distance.get(v) {
            self.distance.set(v, candidate);
            self.predecessor.set(v, u);
            true
        } else {
            false
        }
    }
}

/// Trait for shortest path computations writing into caller buffers.
/// Implemented for every graph with indexed out-edges.
pub trait ShortestPaths: IndexedOutEdges {
    /// Runs Dijkstra's algorithm from `source`, optionally stopping once `target` is settled.
    ///
    /// # Errors
    /// - [`GraphError::InvalidInput`] if `source` or `target` is not a vertex,
    /// - [`GraphError::BufferTooSmall`] if some buffer has fewer than `n` entries,
    /// - [`GraphError::NegativeWeight`] if some edge weight is negative.
    ///
    /// No buffer is modified if an error is returned.
    ///
    /// # Examples
    /// ```
    /// use csrgraphs::{prelude::*, algo::*};
    ///
    /// let graph = CsrMatrix::from_weighted_edges(3, [(0, 1, 4.0), (0, 2, 1.0), (2, 1, 2.0)]);
    /// let view = graph.view();
    /// let mut distance = [0.0; 3];
    /// view.dijkstra_into(view.edge_weights(), 0, None, PathOutput::default().distance(&mut distance)).unwrap();
    /// assert_eq!(distance, [0.0, 3.0, 1.0]);
    /// ```
    fn dijkstra_into<W>(
        &self,
        weights: W,
        source: Node,
        target: Option<Node>,
        output: PathOutput<'_>,
    ) -> Result<SearchStatus>
    where
        W: ReadPropertyMap<EdgeHandle, Value = f64>,
    {
        let mut maps = output.into_maps(self)?;
        let mut dijkstra = Dijkstra::new(self, weights);
        if let Some(target) = target {
            dijkstra.set_stop_at(target);
        }

        let status = dijkstra.run(source, &mut ())?;
        maps.record(dijkstra.tree());
        Ok(status)
    }

    /// Runs the Bellman-Ford algorithm from `source`.
    ///
    /// # Errors
    /// - [`GraphError::InvalidInput`] if `source` is not a vertex,
    /// - [`GraphError::BufferTooSmall`] if some buffer has fewer than `n` entries,
    /// - [`GraphError::NegativeCycle`] if a negative cycle is reachable from `source`.
    ///
    /// No buffer is modified if an error is returned.
    fn bellman_ford_into<W>(
        &self,
        weights: W,
        source: Node,
        output: PathOutput<'_>,
    ) -> Result<SearchStatus>
    where
        W: ReadPropertyMap<EdgeHandle, Value = f64>,
    {
        let mut maps = output.into_maps(self)?;
        let mut bellman_ford = BellmanFord::new(self, weights);

        let status = bellman_ford.run(source, &mut ())?;
        maps.record(bellman_ford.tree());
        Ok(status)
    }

    /// Computes shortest paths from `source` in a graph without cycles reachable from `source`.
    /// Weights may be negative.
    ///
    /// # Errors
    /// - [`GraphError::InvalidInput`] if `source` is not a vertex,
    /// - [`GraphError::BufferTooSmall`] if some buffer has fewer than `n` entries,
    /// - [`GraphError::InvalidGraph`] if a cycle is reachable from `source`.
    ///
    /// No buffer is modified if an error is returned.
    ///
    /// # Examples
    /// ```
    /// use csrgraphs::{prelude::*, algo::*};
    ///
    /// let graph = CsrMatrix::from_weighted_edges(3, [(0, 1, 2.0), (0, 2, 1.0), (1, 2, -3.0)]);
    /// let view = graph.view();
    /// let mut distance = [0.0; 3];
    /// view.dag_shortest_paths_into(view.edge_weights(), 0, PathOutput::default().distance(&mut distance)).unwrap();
    /// assert_eq!(distance, [0.0, 2.0, -1.0]);
    /// ```
    fn dag_shortest_paths_into<W>(
        &self,
        weights: W,
        source: Node,
        output: PathOutput<'_>,
    ) -> Result<SearchStatus>
    where
        W: ReadPropertyMap<EdgeHandle, Value = f64>,
    {
        let mut maps = output.into_maps(self)?;
        let mut dag = DagShortestPaths::new(self, weights);

        let status = dag.run(source, &mut ())?;
        maps.record(dag.tree());
        Ok(status)
    }

    /// Runs an A* search from `source` towards `target` guided by `heuristic`.
    /// If `cost` is given, it receives `f(u) = d(u) + h(u)` for all reached vertices
    /// (`output.infinity` otherwise).
    ///
    /// # Errors
    /// - [`GraphError::InvalidInput`] if `source` or `target` is not a vertex,
    /// - [`GraphError::BufferTooSmall`] if some buffer has fewer than `n` entries,
    /// - [`GraphError::NegativeWeight`] if some edge weight is negative.
    fn astar_into<W, H>(
        &self,
        weights: W,
        heuristic: H,
        source: Node,
        target: Option<Node>,
        output: PathOutput<'_>,
        cost: Option<&mut [f64]>,
    ) -> Result<SearchStatus>
    where
        W: ReadPropertyMap<EdgeHandle, Value = f64>,
        H: ReadPropertyMap<Node, Value = f64>,
    {
        let infinity = output.infinity;
        let mut maps = output.into_maps(self)?;
        let mut cost = cost
            .map(|data| SliceMap::for_vertices(data, self, "cost"))
            .transpose()?;

        let mut astar = AStar::new(self, weights, heuristic);
        if let Some(target) = target {
            astar.set_stop_at(target);
        }

        let status = astar.run(source, &mut ())?;
        maps.record(astar.tree());
        if let Some(cost) = &mut cost {
            for u in self.vertices() {
                cost.set(u, astar.cost(u).unwrap_or(infinity));
            }
        }
        Ok(status)
    }

    /// Computes all-pairs shortest paths into the row-major `n * n` matrix `distance`.
    /// If given, `predecessor[i * n + j]` receives the predecessor of `j` on a shortest
    /// `i`-`j` path (`i` for `i == j`, `INVALID_NODE` if `j` is unreachable from `i`).
    ///
    /// # Errors
    /// - [`GraphError::BufferTooSmall`] if some buffer has fewer than `n * n` entries,
    /// - [`GraphError::NegativeCycle`] if the graph contains a negative cycle.
    ///
    /// No buffer is modified if an error is returned.
    fn floyd_warshall_into<W>(
        &self,
        weights: W,
        distance: &mut [f64],
        predecessor: Option<&mut [Node]>,
        infinity: f64,
    ) -> Result<()>
    where
        W: ReadPropertyMap<EdgeHandle, Value = f64>,
    {
        floyd_warshall::floyd_warshall(self, &weights, distance, predecessor, infinity)
    }

    /// Computes all-pairs shortest paths with Johnson's algorithm. Buffers and outputs follow
    /// [`ShortestPaths::floyd_warshall_into`].
    ///
    /// # Errors
    /// - [`GraphError::BufferTooSmall`] if some buffer has fewer than `n * n` entries,
    /// - [`GraphError::NegativeCycle`] if the graph contains a negative cycle.
    ///
    /// No buffer is modified if an error is returned.
    fn johnson_into<W>(
        &self,
        weights: W,
        distance: &mut [f64],
        predecessor: Option<&mut [Node]>,
        infinity: f64,
    ) -> Result<()>
    where
        W: ReadPropertyMap<EdgeHandle, Value = f64>,
    {
        johnson::johnson(self, &weights, distance, predecessor, infinity)
    }
}

impl<G: IndexedOutEdges> ShortestPaths for G {}
