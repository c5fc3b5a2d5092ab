/*!
# Node Representation

We choose `Node = u32` as almost all use-cases involve less than `2^32` vertices.
Vertex ids are exactly the row indices of the CSR arrays, i.e. `0..n`.
*/

use stream_bitset::bitset::BitSetImpl;

/// Nodes can be any unsigned integer from `0` to `Node::MAX - 1`
pub type Node = u32;

/// Node-Value that is considered invalid.
///
/// Used as the predecessor of unreached vertices and as the "never happened"
/// timestamp in traversal outputs.
pub const INVALID_NODE: Node = Node::MAX;

/// There can be at most `2^32 - 1` nodes in a graph!
pub type NumNodes = Node;

/// BitSet for Nodes
pub type NodeBitSet = BitSetImpl<Node>;
