/*!
`csrgraphs` is a graph algorithms library that works directly on graphs given as
**compressed sparse row (CSR)** arrays owned by the caller. No graph object is built: the
algorithms borrow `row_start`, `column_index` (and optionally one value per edge) for the
duration of a call and write their results into caller-provided buffers.

# Representation

We represent **nodes** as `u32` in the range `0..n` where `n` is the number of rows.
An **edge** is addressed by an [`EdgeHandle`]: its source row and its linear position in
`column_index`. That position is also the index into every per-edge array (weights,
capacities, residuals, reverse-edge indices). Parallel edges are distinguished by position only.

See [`repr`] for the borrowed [`CsrGraph`](crate::repr::CsrGraph) view and the owned
[`CsrMatrix`](crate::repr::CsrMatrix) builder.

# Design

All algorithms are provided as configurable structs that one can alter to their needs using
either the *Builder* / *Setter* pattern before running them on a graph. The most commonly used
functionalities are additionally implemented via extension traits on every graph implementing
[`IndexedOutEdges`](crate::ops::IndexedOutEdges), e.g. `graph.bfs_into(..)` or
`graph.edmonds_karp_max_flow(..)`.

Per-vertex and per-edge values are accessed through [property maps](crate::utils::property_map).
Search algorithms report their events to *visitors* whose hooks may stop the search early.

# Usage

There are *3* core submodules you probably want to interact with:
- [`prelude`] includes definitions for nodes, edges, errors, basic graph operations, representations and property maps,
- [`algo`] includes traversals (BFS, DFS), shortest paths (Dijkstra, Bellman-Ford, A*, Floyd-Warshall),
  maximum flows (Edmonds-Karp, push-relabel, Boykov-Kolmogorov) and the Stoer-Wagner minimum cut,
- [`utils`] includes the property map abstraction.

In most use-cases, `use csrgraphs::{prelude::*, algo::*};` suffices for your needs.

# Validation

Constructors of graph views validate their input. Validation of the reverse-edge index and of
flow inputs is controlled by [`Validation`](crate::algo::Validation): it is enabled in debug
builds and with the cargo feature `checked`, and can be chosen per call.

# Logging

The crate logs through the [`log`] facade (`debug!` on algorithm entry/exit, `trace!` for
per-step details). No logger is installed by the library.
*/

pub mod algo;
pub mod edge;
pub mod error;
pub mod node;
pub mod ops;
pub mod repr;
#[cfg(test)]
pub(crate) mod testing;
pub mod utils;

pub use edge::*;
pub use error::{GraphError, Result};
pub use node::*;

/// `csrgraphs::prelude` includes definitions for nodes and edges, errors, all basic graph operation traits,
/// the implemented representations as well as the property maps.
pub mod prelude {
    pub use super::{
        edge::*,
        error::{GraphError, Result},
        node::*,
        ops::*,
        repr::*,
        utils::property_map::*,
    };
}
