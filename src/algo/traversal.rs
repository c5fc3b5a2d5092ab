/*!
Breadth-first and depth-first search with visitor hooks.

Both searches color vertices `White -> Gray -> Black` and report every state change and every
examined edge to a visitor (see [`BfsVisitor`], [`DfsVisitor`]). On top of the visitor-driven
engines, [`Traversal::bfs_into`] and [`Traversal::dfs_into`] record the classic outputs
(distances, timestamps, predecessors) into caller-provided buffers.

Conventions of all recorded outputs:
- the predecessor of a root is the root itself,
- unreached vertices keep [`INVALID_NODE`] in every buffer.
*/

use super::{visitor::visit, *};
use std::collections::VecDeque;

/// Buffers receiving the results of [`Traversal::bfs_into`].
/// Every buffer is optional and needs at least one entry per vertex.
#[derive(Debug, Default)]
pub struct BfsOutput<'a> {
    /// Number of edges on a shortest path from the source
    pub distance: Option<&'a mut [NumNodes]>,
    /// Rank of the vertex in discovery order
    pub discover_order: Option<&'a mut [NumNodes]>,
    /// Parent in the BFS tree
    pub predecessor: Option<&'a mut [Node]>,
}

impl<'a> BfsOutput<'a> {
    /// Records hop distances into `buffer`
    pub fn distance(mut self, buffer: &'a mut [NumNodes]) -> Self {
        self.distance = Some(buffer);
        self
    }

    /// Records the discovery rank into `buffer`
    pub fn discover_order(mut self, buffer: &'a mut [NumNodes]) -> Self {
        self.discover_order = Some(buffer);
        self
    }

    /// Records the BFS tree into `buffer`
    pub fn predecessor(mut self, buffer: &'a mut [Node]) -> Self {
        self.predecessor = Some(buffer);
        self
    }
}

/// Buffers receiving the results of [`Traversal::dfs_into`].
/// Every buffer is optional and needs at least one entry per vertex.
///
/// Discover and finish times share one clock: every discovery and every finish advances it by one.
#[derive(Debug, Default)]
pub struct DfsOutput<'a> {
    /// Depth in the DFS forest; roots have depth `0`
    pub depth: Option<&'a mut [NumNodes]>,
    pub discover_time: Option<&'a mut [NumNodes]>,
    pub finish_time: Option<&'a mut [NumNodes]>,
    /// Parent in the DFS forest
    pub predecessor: Option<&'a mut [Node]>,
}

impl<'a> DfsOutput<'a> {
    pub fn depth(mut self, buffer: &'a mut [NumNodes]) -> Self {
        self.depth = Some(buffer);
        self
    }

    pub fn discover_time(mut self, buffer: &'a mut [NumNodes]) -> Self {
        self.discover_time = Some(buffer);
        self
    }

    pub fn finish_time(mut self, buffer: &'a mut [NumNodes]) -> Self {
        self.finish_time = Some(buffer);
        self
    }

    pub fn predecessor(mut self, buffer: &'a mut [Node]) -> Self {
        self.predecessor = Some(buffer);
        self
    }
}

/// Wraps an optional caller buffer into a property map with one entry per vertex
fn vertex_map<'a, G: GraphNodeOrder, V: Copy>(
    graph: &G,
    buffer: Option<&'a mut [V]>,
    what: &'static str,
) -> Result<Option<SliceMap<'a, V>>> {
    buffer
        .map(|data| SliceMap::for_vertices(data, graph, what))
        .transpose()
}

/// Visitor writing the results of a plain BFS into property maps
struct BfsRecorder<'a> {
    distance: Option<SliceMap<'a, NumNodes>>,
    discover_order: Option<SliceMap<'a, NumNodes>>,
    predecessor: Option<SliceMap<'a, Node>>,
    discovered: NumNodes,
    target: Option<Node>,
    target_reached: bool,
}

impl<'a> BfsRecorder<'a> {
    fn new<G: GraphNodeOrder>(
        graph: &G,
        source: Node,
        target: Option<Node>,
        output: BfsOutput<'a>,
    ) -> Result<Self> {
        // all buffers are checked before any of them is written
        let mut distance = vertex_map(graph, output.distance, "distance")?;
        let mut discover_order = vertex_map(graph, output.discover_order, "discover_order")?;
        let mut predecessor = vertex_map(graph, output.predecessor, "predecessor")?;

        if let Some(distance) = &mut distance {
            distance.fill(INVALID_NODE);
            distance.set(source, 0);
        }
        if let Some(order) = &mut discover_order {
            order.fill(INVALID_NODE);
        }
        if let Some(predecessor) = &mut predecessor {
            predecessor.fill(INVALID_NODE);
            predecessor.set(source, source);
        }

        Ok(Self {
            distance,
            discover_order,
            predecessor,
            discovered: 0,
            target,
            target_reached: false,
        })
    }
}

impl BfsVisitor for BfsRecorder<'_> {
    fn discover_vertex(&mut self, u: Node) -> Control {
        if let Some(order) = &mut self.discover_order {
            order.set(u, self.discovered);
        }
        self.discovered += 1;

        // hop distances are final once a vertex is discovered
        if self.target == Some(u) {
            self.target_reached = true;
            return ControlFlow::Break(());
        }
        CONTINUE
    }

    fn tree_edge(&mut self, _e: EdgeHandle, u: Node, v: Node) -> Control {
        if let Some(distance) = &mut self.distance {
            let du = distance.get(u);
            distance.set(v, du + 1);
        }
        if let Some(predecessor) = &mut self.predecessor {
            predecessor.set(v, u);
        }
        CONTINUE
    }
}

/// Visitor writing the results of a plain DFS into property maps
struct DfsRecorder<'a> {
    depth: Option<SliceMap<'a, NumNodes>>,
    discover_time: Option<SliceMap<'a, NumNodes>>,
    finish_time: Option<SliceMap<'a, NumNodes>>,
    predecessor: Option<SliceMap<'a, Node>>,
    time: NumNodes,
    target: Option<Node>,
    target_reached: bool,
}

impl<'a> DfsRecorder<'a> {
    fn new<G: GraphNodeOrder>(
        graph: &G,
        target: Option<Node>,
        output: DfsOutput<'a>,
    ) -> Result<Self> {
        let mut depth = vertex_map(graph, output.depth, "depth")?;
        let mut discover_time = vertex_map(graph, output.discover_time, "discover_time")?;
        let mut finish_time = vertex_map(graph, output.finish_time, "finish_time")?;
        let mut predecessor = vertex_map(graph, output.predecessor, "predecessor")?;

        for map in [
            &mut depth,
            &mut discover_time,
            &mut finish_time,
            &mut predecessor,
        ]
        .into_iter()
        .flatten()
        {
            map.fill(INVALID_NODE);
        }

        Ok(Self {
            depth,
            discover_time,
            finish_time,
            predecessor,
            time: 0,
            target,
            target_reached: false,
        })
    }
}

impl DfsVisitor for DfsRecorder<'_> {
    fn start_vertex(&mut self, u: Node) -> Control {
        if let Some(depth) = &mut self.depth {
            depth.set(u, 0);
        }
        if let Some(predecessor) = &mut self.predecessor {
            predecessor.set(u, u);
        }
        CONTINUE
    }

    fn discover_vertex(&mut self, u: Node) -> Control {
        if let Some(discover_time) = &mut self.discover_time {
            discover_time.set(u, self.time);
        }
        self.time += 1;

        if self.target == Some(u) {
            self.target_reached = true;
            return ControlFlow::Break(());
        }
        CONTINUE
    }

    fn tree_edge(&mut self, _e: EdgeHandle, u: Node, v: Node) -> Control {
        if let Some(depth) = &mut self.depth {
            let du = depth.get(u);
            depth.set(v, du + 1);
        }
        if let Some(predecessor) = &mut self.predecessor {
            predecessor.set(v, u);
        }
        CONTINUE
    }

    fn finish_vertex(&mut self, u: Node) -> Control {
        if let Some(finish_time) = &mut self.finish_time {
            finish_time.set(u, self.time);
        }
        self.time += 1;
        CONTINUE
    }
}

fn reached_status(status: SearchStatus, target_reached: bool) -> SearchStatus {
    if target_reached {
        SearchStatus::TargetReached
    } else {
        status
    }
}

/// Trait for graph traversals.
/// Implemented for every graph with indexed out-edges.
pub trait Traversal: IndexedOutEdges {
    /// Runs a breadth-first search from `source` and reports all events to `visitor`.
    ///
    /// Out-edges are examined in stored order, so the search is deterministic.
    ///
    /// # Errors
    /// Returns [`GraphError::InvalidInput`] if `source` is not a vertex.
    ///
    /// # Examples
    /// ```
    /// use csrgraphs::{prelude::*, algo::*};
    ///
    /// let graph = CsrMatrix::from_edges(4, [(0, 1), (1, 2), (2, 0)]);
    /// let status = graph.breadth_first_search(0, &mut ()).unwrap();
    /// assert_eq!(status, SearchStatus::Completed);
    /// ```
    fn breadth_first_search<V: BfsVisitor>(
        &self,
        source: Node,
        visitor: &mut V,
    ) -> Result<SearchStatus> {
        check_vertex(source, self.len(), "source")?;

        let mut color = vec![Color::White; self.len()];
        for u in self.vertices() {
            visit!(visitor.initialize_vertex(u));
        }

        color[source as usize] = Color::Gray;
        visit!(visitor.discover_vertex(source));

        let mut queue = VecDeque::from([source]);
        while let Some(u) = queue.pop_front() {
            visit!(visitor.examine_vertex(u));

            for (e, v) in self.out_edges(u) {
                visit!(visitor.examine_edge(e, u, v));

                match color[v as usize] {
                    Color::White => {
                        visit!(visitor.tree_edge(e, u, v));
                        color[v as usize] = Color::Gray;
                        visit!(visitor.discover_vertex(v));
                        queue.push_back(v);
                    }
                    Color::Gray => {
                        visit!(visitor.non_tree_edge(e, u, v));
                        visit!(visitor.gray_target(e, u, v));
                    }
                    Color::Black => {
                        visit!(visitor.non_tree_edge(e, u, v));
                        visit!(visitor.black_target(e, u, v));
                    }
                }
            }

            color[u as usize] = Color::Black;
            visit!(visitor.finish_vertex(u));
        }

        Ok(SearchStatus::Completed)
    }

    /// Runs a breadth-first search from `source` and records the requested outputs.
    /// If `target` is given, the search stops as soon as `target` is discovered.
    ///
    /// Unreached vertices keep `INVALID_NODE` in every buffer.
    ///
    /// # Errors
    /// - [`GraphError::InvalidInput`] if `source` or `target` is not a vertex,
    /// - [`GraphError::BufferTooSmall`] if some buffer has fewer than `n` entries;
    ///   no buffer is modified in this case.
    ///
    /// # Examples
    /// ```
    /// use csrgraphs::{prelude::*, algo::*};
    ///
    /// let graph = CsrMatrix::from_edges(3, [(0, 1), (1, 2), (2, 0)]);
    /// let mut distance = [0; 3];
    /// let mut predecessor = [0; 3];
    /// graph.bfs_into(0, None, BfsOutput::default()
    ///     .distance(&mut distance)
    ///     .predecessor(&mut predecessor)).unwrap();
    ///
    /// assert_eq!(distance, [0, 1, 2]);
    /// assert_eq!(predecessor, [0, 0, 1]);
    /// ```
    fn bfs_into(
        &self,
        source: Node,
        target: Option<Node>,
        output: BfsOutput<'_>,
    ) -> Result<SearchStatus> {
        check_vertex(source, self.len(), "source")?;
        if let Some(target) = target {
            check_vertex(target, self.len(), "target")?;
        }

        let mut recorder = BfsRecorder::new(self, source, target, output)?;
        let status = self.breadth_first_search(source, &mut recorder)?;
        Ok(reached_status(status, recorder.target_reached))
    }

    /// Runs a depth-first search from `source` and reports all events to `visitor`.
    /// If `full` is set, the search restarts at every still undiscovered vertex in id order
    /// after the tree of `source` is complete.
    ///
    /// The search uses an explicit stack and therefore does not overflow on deep graphs.
    ///
    /// # Errors
    /// Returns [`GraphError::InvalidInput`] if `source` is not a vertex.
    fn depth_first_search<V: DfsVisitor>(
        &self,
        source: Node,
        full: bool,
        visitor: &mut V,
    ) -> Result<SearchStatus> {
        check_vertex(source, self.len(), "source")?;

        let mut color = vec![Color::White; self.len()];
        for u in self.vertices() {
            visit!(visitor.initialize_vertex(u));
        }

        let restarts = if full { self.vertices() } else { 0..0 };
        let mut stack = Vec::new();

        for root in std::iter::once(source).chain(restarts) {
            if color[root as usize] != Color::White {
                continue;
            }

            visit!(visitor.start_vertex(root));
            color[root as usize] = Color::Gray;
            visit!(visitor.discover_vertex(root));
            stack.push((root, self.edge_range(root)));

            while let Some((u, edges)) = stack.last_mut() {
                let u = *u;
                let Some(index) = edges.next() else {
                    stack.pop();
                    color[u as usize] = Color::Black;
                    visit!(visitor.finish_vertex(u));
                    continue;
                };

                let e = EdgeHandle::new(u, index);
                let v = self.edge_target(index);
                visit!(visitor.examine_edge(e, u, v));

                match color[v as usize] {
                    Color::White => {
                        visit!(visitor.tree_edge(e, u, v));
                        color[v as usize] = Color::Gray;
                        visit!(visitor.discover_vertex(v));
                        stack.push((v, self.edge_range(v)));
                    }
                    Color::Gray => visit!(visitor.back_edge(e, u, v)),
                    Color::Black => visit!(visitor.forward_or_cross_edge(e, u, v)),
                }
            }
        }

        Ok(SearchStatus::Completed)
    }

    /// Runs a depth-first search from `source` (see [`Traversal::depth_first_search`]) and
    /// records the requested outputs. If `target` is given, the search stops as soon as
    /// `target` is discovered.
    ///
    /// Unreached vertices keep `INVALID_NODE` in every buffer.
    ///
    /// # Errors
    /// - [`GraphError::InvalidInput`] if `source` or `target` is not a vertex,
    /// - [`GraphError::BufferTooSmall`] if some buffer has fewer than `n` entries;
    ///   no buffer is modified in this case.
    fn dfs_into(
        &self,
        source: Node,
        full: bool,
        target: Option<Node>,
        output: DfsOutput<'_>,
    ) -> Result<SearchStatus> {
        check_vertex(source, self.len(), "source")?;
        if let Some(target) = target {
            check_vertex(target, self.len(), "target")?;
        }

        let mut recorder = DfsRecorder::new(self, target, output)?;
        let status = self.depth_first_search(source, full, &mut recorder)?;
        Ok(reached_status(status, recorder.target_reached))
    }
}

impl<G: IndexedOutEdges> Traversal for G {}
