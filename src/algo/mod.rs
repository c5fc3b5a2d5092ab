/*!
# Graph Algorithms

This module provides a suite of **graph algorithms** operating on any graph implementing
[`IndexedOutEdges`], in particular on borrowed CSR arrays.
All algorithms are re-exported at the top level of this module, so you can simply do:
```rust
use csrgraphs::algo::*;
```
and gain access to traversals, shortest paths, maximum flows and minimum cuts.
Search algorithms report their events to visitors (see [`BfsVisitor`] and friends), and the
most common use-cases are available as extension-trait methods writing into caller buffers.
*/

mod min_cut;
mod network_flow;
mod shortest_paths;
mod traversal;
mod visitor;

use crate::{
    error::{check_buffer, check_vertex, invalid_graph, invalid_input, raise_error_unless},
    prelude::*,
    utils::*,
};
use std::ops::ControlFlow;

pub use min_cut::*;
pub use network_flow::*;
pub use shortest_paths::*;
pub use traversal::*;
pub use visitor::{
    AStarVisitor, BellmanFordVisitor, BfsVisitor, CONTINUE, Color, Control, DfsVisitor,
    DijkstraVisitor, SearchStatus,
};
