use std::ops::Range;

use crate::*;

/// Provides getters pertaining to the node-size of a graph
pub trait GraphNodeOrder {
    /// Returns the number of nodes of the graph
    fn number_of_nodes(&self) -> NumNodes;

    /// Return the number of nodes as usize
    fn len(&self) -> usize {
        self.number_of_nodes() as usize
    }

    /// Returns an iterator over V.
    /// The range does not borrow self and may be used alongside mutable borrows.
    fn vertices(&self) -> Range<Node> {
        0..self.number_of_nodes()
    }

    /// Returns empty bitset with one entry per node
    fn vertex_bitset_unset(&self) -> NodeBitSet {
        NodeBitSet::new(self.number_of_nodes())
    }

    /// Returns *true* if the graph has no nodes (and thus no edges)
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Provides getters pertaining to the edge-size of a graph
pub trait GraphEdgeOrder {
    /// Returns the number of edges (stored non-zeros) of the graph
    fn number_of_edges(&self) -> NumEdges;

    /// Returns *true* if the graph has no edges
    fn is_singleton(&self) -> bool {
        self.number_of_edges() == 0
    }
}

/// Out-edge access by linear edge position.
///
/// Every stored edge has a stable [`EdgeIndex`]: its position in the column-index
/// array. Rows are contiguous, so the out-edges of `u` occupy `edge_range(u)`.
/// All algorithms of this crate are written against this trait.
pub trait IndexedOutEdges: GraphNodeOrder + GraphEdgeOrder + Sized {
    /// Returns the linear positions of all out-edges of `u`.
    /// ** Panics if `u >= n` **
    fn edge_range(&self, u: Node) -> Range<EdgeIndex>;

    /// Returns the target (column) of the edge stored at position `index`.
    /// ** Panics if `index >= m` **
    fn edge_target(&self, index: EdgeIndex) -> Node;

    /// Returns the number of outgoing edges of `u`
    /// ** Panics if `u >= n` **
    fn out_degree(&self, u: Node) -> NumEdges {
        let range = self.edge_range(u);
        range.end - range.start
    }

    /// Returns a fresh iterator over all out-edges of `u` with their targets in stored order.
    /// ** Panics if `u >= n` **
    fn out_edges(&self, u: Node) -> OutEdges<'_, Self> {
        OutEdges {
            graph: self,
            source: u,
            range: self.edge_range(u),
        }
    }

    /// Returns an iterator over all stored edges in row-major order.
    fn edges(&self) -> impl Iterator<Item = (EdgeHandle, Node)> + '_ {
        self.vertices().flat_map(|u| self.out_edges(u))
    }

    /// Returns the position of `e` within the row of its source.
    fn position_in_row(&self, e: EdgeHandle) -> NumEdges {
        e.index - self.edge_range(e.source).start
    }

    /// Returns the handle of the `pos`-th out-edge of `u`.
    /// ** Panics if `u >= n || pos >= out_degree(u)` **
    fn edge_at(&self, u: Node, pos: NumEdges) -> EdgeHandle {
        let range = self.edge_range(u);
        assert!(pos < range.end - range.start);
        EdgeHandle::new(u, range.start + pos)
    }
}

/// Iterator over the out-edges of a single vertex.
/// Yields `(EdgeHandle, target)` pairs in column order.
#[derive(Debug)]
pub struct OutEdges<'a, G> {
    graph: &'a G,
    source: Node,
    range: Range<EdgeIndex>,
}

impl<G> Clone for OutEdges<'_, G> {
    fn clone(&self) -> Self {
        Self {
            graph: self.graph,
            source: self.source,
            range: self.range.clone(),
        }
    }
}

impl<G: IndexedOutEdges> Iterator for OutEdges<'_, G> {
    type Item = (EdgeHandle, Node);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.range.next()?;
        Some((
            EdgeHandle::new(self.source, index),
            self.graph.edge_target(index),
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.range.size_hint()
    }
}

impl<G: IndexedOutEdges> ExactSizeIterator for OutEdges<'_, G> {}
