use std::fmt::{Debug, Display};

use crate::Node;

/// We limit the number of edges (non-zeros) to `2^32 - 1`.
pub type NumEdges = u32;

/// Linear position of an edge inside the column-index array.
pub type EdgeIndex = NumEdges;

/// An edge is defined by two nodes/endpoints.
/// Used by the owned CSR builders; algorithms address edges via [`EdgeHandle`].
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Edge(pub Node, pub Node);

impl Display for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.0, self.1)
    }
}

impl Debug for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        <Self as Display>::fmt(self, f)
    }
}

impl Edge {
    /// Reverses the edge by switching the endpoints
    pub fn reverse(&self) -> Self {
        Edge(self.1, self.0)
    }
}

impl From<(Node, Node)> for Edge {
    fn from(value: (Node, Node)) -> Self {
        Edge(value.0, value.1)
    }
}

impl From<&(Node, Node)> for Edge {
    fn from(value: &(Node, Node)) -> Self {
        Edge(value.0, value.1)
    }
}

impl From<&Edge> for Edge {
    fn from(value: &Edge) -> Self {
        *value
    }
}

/// Address of a stored edge: the row it lives in and its linear position in
/// the column-index array.
///
/// The position within the row is `index - row_start[source]`
/// (see [`IndexedOutEdges::position_in_row`](crate::ops::IndexedOutEdges::position_in_row)).
/// Handles stay valid as long as the underlying arrays are borrowed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeHandle {
    pub source: Node,
    pub index: EdgeIndex,
}

impl EdgeHandle {
    pub const fn new(source: Node, index: EdgeIndex) -> Self {
        Self { source, index }
    }
}

impl Display for EdgeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.source, self.index)
    }
}
