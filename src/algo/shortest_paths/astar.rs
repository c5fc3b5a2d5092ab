use super::*;
use log::debug;

/// A* search for non-negative edge weights guided by a heuristic `h`.
///
/// Vertices are expanded in order of increasing `f(u) = d(u) + h(u)`. The heuristic need
/// not be consistent: if a closed vertex is reached on a shorter path it is re-opened and
/// [`AStarVisitor::black_target`] is reported. With an admissible heuristic the distance
/// of the target is exact once it is examined.
///
/// # Examples
/// ```
/// use csrgraphs::{prelude::*, algo::*};
///
/// // vertices on a line, the heuristic is the remaining distance to vertex 3
/// let graph = CsrMatrix::from_weighted_edges(4, [(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0), (0, 3, 5.0)]);
/// let view = graph.view();
/// let heuristic = FnMap(|u: Node| 3.0 - u as f64);
///
/// let mut astar = AStar::new(&view, view.edge_weights(), heuristic).stop_at(3);
/// assert_eq!(astar.run(0, &mut ()).unwrap(), SearchStatus::TargetReached);
/// assert_eq!(astar.tree().path_to(3), Some(vec![0, 1, 2, 3]));
/// ```
pub struct AStar<'a, G, W, H> {
    graph: &'a G,
    weights: W,
    heuristic: H,
    tree: ShortestPathTree,
    cost: VecMap<f64>,
    color: Vec<Color>,
    heap: BinaryHeap<MinKeyed>,
    stop_at: Option<Node>,
}

impl<'a, G, W, H> AStar<'a, G, W, H>
where
    G: IndexedOutEdges,
    W: ReadPropertyMap<EdgeHandle, Value = f64>,
    H: ReadPropertyMap<Node, Value = f64>,
{
    /// Creates a new instance on `graph` reading edge weights from `weights`
    pub fn new(graph: &'a G, weights: W, heuristic: H) -> Self {
        Self {
            graph,
            weights,
            heuristic,
            tree: ShortestPathTree::new(graph.len()),
            cost: VecMap::for_vertices(graph, f64::INFINITY),
            color: vec![Color::White; graph.len()],
            heap: BinaryHeap::new(),
            stop_at: None,
        }
    }

    /// Stops the search once `target` is examined
    pub fn set_stop_at(&mut self, target: Node) {
        self.stop_at = Some(target);
    }

    /// Stops the search once `target` is examined
    pub fn stop_at(mut self, target: Node) -> Self {
        self.set_stop_at(target);
        self
    }

    /// Returns the distances and predecessors computed by the last run
    pub fn tree(&self) -> &ShortestPathTree {
        &self.tree
    }

    /// Returns `f(u) = d(u) + h(u)` or `None` if `u` was not reached.
    /// ** Panics if `u >= n` **
    pub fn cost(&self, u: Node) -> Option<f64> {
        let f = self.cost.get(u);
        (f != f64::INFINITY).then_some(f)
    }

    fn open(&mut self, u: Node) {
        let f = self.tree.distance.get(u) + self.heuristic.get(u);
        self.cost.set(u, f);
        self.color[u as usize] = Color::Gray;
        self.heap.push(MinKeyed::new(f, u));
    }

    /// Runs the search from `source` reporting all events to `visitor`.
    ///
    /// # Errors
    /// - [`GraphError::InvalidInput`] if `source` or the stop vertex is not a vertex,
    /// - [`GraphError::NegativeWeight`] if some weight is negative (checked before the search starts).
    pub fn run<V: AStarVisitor>(&mut self, source: Node, visitor: &mut V) -> Result<SearchStatus> {
        let n = self.graph.len();
        check_vertex(source, n, "source")?;
        if let Some(target) = self.stop_at {
            check_vertex(target, n, "target")?;
        }
        check_non_negative_weights(self.graph, &self.weights)?;

        debug!("A* from {source} to {:?} on {n} vertices", self.stop_at);

        self.tree.reset(source);
        self.cost.fill(f64::INFINITY);
        self.color.fill(Color::White);
        self.heap.clear();

        for u in self.graph.vertices() {
            visit!(visitor.initialize_vertex(u));
        }

        self.open(source);
        visit!(visitor.discover_vertex(source));

        while let Some(MinKeyed { key, node: u }) = self.heap.pop() {
            // outdated entry: u was closed or re-opened with a smaller cost
            if self.color[u as usize] != Color::Gray || key > self.cost.get(u) {
                continue;
            }

            visit!(visitor.examine_vertex(u));

            if self.stop_at == Some(u) {
                self.color[u as usize] = Color::Black;
                visit!(visitor.finish_vertex(u));
                return Ok(SearchStatus::TargetReached);
            }

            for (e, v) in self.graph.out_edges(u) {
                visit!(visitor.examine_edge(e, u, v));

                if !self.tree.relax(u, v, self.weights.get(e)) {
                    visit!(visitor.edge_not_relaxed(e, u, v));
                    continue;
                }

                visit!(visitor.edge_relaxed(e, u, v));
                let previous = self.color[v as usize];
                self.open(v);
                match previous {
                    Color::White => visit!(visitor.discover_vertex(v)),
                    Color::Black => visit!(visitor.black_target(e, u, v)),
                    Color::Gray => {}
                }
            }

            self.color[u as usize] = Color::Black;
            visit!(visitor.finish_vertex(u));
        }

        Ok(SearchStatus::Completed)
    }
}
