/*!
# Maximum Flows

Three interchangeable maximum-flow engines operating on a graph with a symmetric structure,
i.e. every stored edge `(u, v)` has an antiparallel counterpart `(v, u)` (possibly with zero
capacity). The counterpart is found in O(1) through a caller-provided [`ReverseEdges`] index.

- [`MaxFlowAlgorithm::EdmondsKarp`] repeatedly augments along shortest paths,
- [`MaxFlowAlgorithm::PushRelabel`] is a FIFO push-relabel with global relabeling and the gap heuristic,
- [`MaxFlowAlgorithm::BoykovKolmogorov`] grows search trees from source and sink and adopts orphans
  instead of restarting the search after an augmentation.

All engines read and write the caller's residual capacities in place: pushing `delta` along `e`
performs `residual[e] -= delta; residual[reverse(e)] += delta`. They start from whatever residual
state they are given and return the amount of flow pushed *in this call*. Hence, re-running any
engine on a residual network it already saturated returns zero.

# Examples
```
use csrgraphs::{prelude::*, algo::*};

// 0 -> 1 -> 2 with capacities 3 and 2; reverse edges carry no capacity
let graph = CsrMatrix::symmetric_from_edges(3, [(0, 1), (1, 2)]);
let reverse = graph.reverse_edge_index().unwrap();
let capacity: Vec<u32> = graph.edge_values([(0, 1, 3), (1, 2, 2)]).unwrap();
let mut residual = capacity.clone();

let flow = graph
    .push_relabel_max_flow(0, 2, &capacity, &mut residual, &reverse)
    .unwrap();
assert_eq!(flow, 2);
```
*/

use super::*;
use log::debug;
use num::Zero;
use std::{
    fmt::Debug,
    ops::{AddAssign, Sub, SubAssign},
};

mod boykov_kolmogorov;
mod edmonds_karp;
mod push_relabel;
mod reverse;

pub use boykov_kolmogorov::*;
pub use edmonds_karp::*;
pub use push_relabel::*;
pub use reverse::*;

/// Numeric type of capacities and flow values (all primitive integers and floats).
pub trait Capacity:
    Copy + PartialOrd + Debug + Zero + AddAssign + SubAssign + Sub<Output = Self>
{
}

impl<T> Capacity for T where
    T: Copy + PartialOrd + Debug + Zero + AddAssign + SubAssign + Sub<Output = T>
{
}

/// Returns the smaller of two capacities
#[inline]
fn min_capacity<C: Capacity>(a: C, b: C) -> C {
    if b < a { b } else { a }
}

/// Whether inputs of flow computations are validated beyond the cheap checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    /// Validates the reverse-edge index and the signs of capacities and residuals
    Checked,
    /// Only checks vertex ids and buffer sizes; a broken reverse-edge index yields
    /// unspecified (but memory-safe) results
    Unchecked,
}

impl Default for Validation {
    fn default() -> Self {
        if cfg!(any(debug_assertions, feature = "checked")) {
            Self::Checked
        } else {
            Self::Unchecked
        }
    }
}

/// Maximum-flow engines selectable in [`MaxFlow`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaxFlowAlgorithm {
    #[default]
    EdmondsKarp,
    PushRelabel,
    BoykovKolmogorov,
}

/// Residual network shared by all engines: the graph, its reverse-edge index and the
/// caller's residual capacities.
pub struct ResidualNetwork<'a, G, R> {
    graph: &'a G,
    reverse: ReverseEdges<'a, G>,
    residual: R,
    source: Node,
    sink: Node,
}

impl<'a, G, R, C> ResidualNetwork<'a, G, R>
where
    G: IndexedOutEdges,
    R: PropertyMap<EdgeHandle, Value = C>,
    C: Capacity,
{
    /// Creates a residual network; expects all inputs to be validated already
    pub fn new(
        graph: &'a G,
        reverse: ReverseEdges<'a, G>,
        residual: R,
        source: Node,
        sink: Node,
    ) -> Self {
        Self {
            graph,
            reverse,
            residual,
            source,
            sink,
        }
    }

    /// Returns the underlying graph
    pub fn graph(&self) -> &'a G {
        self.graph
    }

    /// Returns the source vertex
    pub fn source(&self) -> Node {
        self.source
    }

    /// Returns the sink vertex
    pub fn sink(&self) -> Node {
        self.sink
    }

    /// Returns the antiparallel counterpart of `e`
    #[inline]
    pub fn reverse(&self, e: EdgeHandle) -> EdgeHandle {
        self.reverse.reverse(e)
    }

    /// Returns the residual capacity of `e`
    #[inline]
    pub fn residual(&self, e: EdgeHandle) -> C {
        self.residual.get(e)
    }

    /// Returns *true* if `e` can carry more flow
    #[inline]
    pub fn has_residual(&self, e: EdgeHandle) -> bool {
        self.residual.get(e) > C::zero()
    }

    /// Pushes `delta` units along `e` and returns them to the reverse edge
    #[inline]
    pub fn augment(&mut self, e: EdgeHandle, delta: C) {
        let r = self.reverse(e);

        let mut forward = self.residual.get(e);
        forward -= delta;
        self.residual.set(e, forward);

        let mut backward = self.residual.get(r);
        backward += delta;
        self.residual.set(r, backward);
    }
}

/// Configurable maximum-flow computation.
///
/// # Examples
/// ```
/// use csrgraphs::{prelude::*, algo::*};
///
/// let graph = CsrMatrix::symmetric_from_edges(4, [(0, 1), (0, 2), (1, 3), (2, 3)]);
/// let reverse_index = graph.reverse_edge_index().unwrap();
/// let reverse = ReverseEdges::new(&graph, &reverse_index).unwrap();
///
/// let capacity: Vec<f64> = graph
///     .edge_values([(0, 1, 10.0), (0, 2, 10.0), (1, 3, 5.0), (2, 3, 15.0)])
///     .unwrap();
/// let mut residual = capacity.clone();
///
/// let flow = MaxFlow::new(&graph, reverse, 0, 3)
///     .algorithm(MaxFlowAlgorithm::BoykovKolmogorov)
///     .validation(Validation::Checked)
///     .run(&capacity, &mut residual)
///     .unwrap();
/// assert_eq!(flow, 15.0);
/// ```
pub struct MaxFlow<'a, G> {
    graph: &'a G,
    reverse: ReverseEdges<'a, G>,
    source: Node,
    sink: Node,
    algorithm: MaxFlowAlgorithm,
    validation: Validation,
}

impl<'a, G: IndexedOutEdges> MaxFlow<'a, G> {
    /// Creates a new computation from `source` to `sink` using the default algorithm
    /// and the default validation level
    pub fn new(graph: &'a G, reverse: ReverseEdges<'a, G>, source: Node, sink: Node) -> Self {
        Self {
            graph,
            reverse,
            source,
            sink,
            algorithm: MaxFlowAlgorithm::default(),
            validation: Validation::default(),
        }
    }

    /// Sets the algorithm used
    pub fn set_algorithm(&mut self, algorithm: MaxFlowAlgorithm) {
        self.algorithm = algorithm;
    }

    /// Sets the algorithm used
    pub fn algorithm(mut self, algorithm: MaxFlowAlgorithm) -> Self {
        self.set_algorithm(algorithm);
        self
    }

    /// Sets the validation level
    pub fn set_validation(&mut self, validation: Validation) {
        self.validation = validation;
    }

    /// Sets the validation level
    pub fn validation(mut self, validation: Validation) -> Self {
        self.set_validation(validation);
        self
    }

    /// Computes a maximum flow starting from the residual state in `residual` and
    /// returns the flow value pushed by this call. `residual` is updated in place.
    ///
    /// # Errors
    /// - [`GraphError::InvalidInput`] if source or sink are out of range or equal, or (checked mode)
    ///   if some capacity or residual is negative,
    /// - [`GraphError::BufferTooSmall`] if `capacity` or `residual` have fewer than `nnz` entries,
    /// - [`GraphError::InvalidGraph`] (checked mode) if the reverse-edge index is broken.
    ///
    /// `residual` is not modified if an error is returned.
    pub fn run<C: Capacity>(&self, capacity: &[C], residual: &mut [C]) -> Result<C> {
        let n = self.graph.len();
        check_vertex(self.source, n, "source")?;
        check_vertex(self.sink, n, "sink")?;
        raise_error_unless!(
            self.source != self.sink,
            invalid_input!("source and sink must differ, both are {}", self.source)
        );

        let capacity = ReadSliceMap::for_edges(capacity, self.graph, "capacity")?;
        let residual = SliceMap::for_edges(residual, self.graph, "residual")?;

        if self.validation == Validation::Checked {
            self.reverse.validate()?;
            check_non_negative(self.graph, &capacity, "capacity")?;
            check_non_negative(self.graph, &residual, "residual")?;
        }

        debug!(
            "{:?} max-flow from {} to {} on {n} vertices and {} edges",
            self.algorithm,
            self.source,
            self.sink,
            self.graph.number_of_edges()
        );

        let network =
            ResidualNetwork::new(self.graph, self.reverse, residual, self.source, self.sink);

        let flow = match self.algorithm {
            MaxFlowAlgorithm::EdmondsKarp => EdmondsKarp::new(network).max_flow(),
            MaxFlowAlgorithm::PushRelabel => PushRelabel::new(network).max_flow(),
            MaxFlowAlgorithm::BoykovKolmogorov => BoykovKolmogorov::new(network).max_flow(),
        };

        debug!("{:?} max-flow pushed {flow:?}", self.algorithm);
        Ok(flow)
    }
}

/// Returns an error if some edge carries a negative value in `map`
fn check_non_negative<G, M, C>(graph: &G, map: &M, what: &str) -> Result<()>
where
    G: IndexedOutEdges,
    M: ReadPropertyMap<EdgeHandle, Value = C>,
    C: Capacity,
{
    match graph.edges().find(|&(e, _)| map.get(e) < C::zero()) {
        Some((e, _)) => Err(invalid_input!(
            "{what} of edge {e} is negative: {:?}",
            map.get(e)
        )),
        None => Ok(()),
    }
}

/// Computes a maximum flow directly on raw CSR arrays.
/// This validates the arrays, then behaves like [`MaxFlow::run`] with the default validation level.
///
/// # Examples
/// ```
/// use csrgraphs::algo::*;
///
/// // 0 <-> 1 with capacity 4 on (0, 1) and none on (1, 0)
/// let mut residual = [4, 0];
/// let flow = max_flow(2, &[0, 1, 2], &[1, 0], 0, 1, &[4, 0], &mut residual, &[1, 0], MaxFlowAlgorithm::PushRelabel);
/// assert_eq!(flow, Ok(4));
/// assert_eq!(residual, [0, 4]);
/// ```
#[allow(clippy::too_many_arguments)]
pub fn max_flow<C: Capacity>(
    n: NumNodes,
    row_start: &[EdgeIndex],
    column_index: &[Node],
    source: Node,
    sink: Node,
    capacity: &[C],
    residual: &mut [C],
    reverse: &[EdgeIndex],
    algorithm: MaxFlowAlgorithm,
) -> Result<C> {
    let graph = CsrGraph::new(n, row_start, column_index)?;
    let reverse = ReverseEdges::new(&graph, reverse)?;

    MaxFlow::new(&graph, reverse, source, sink)
        .algorithm(algorithm)
        .run(capacity, residual)
}

/// Trait for maximum flows and the associated minimum cuts.
/// Implemented for every graph with indexed out-edges.
///
/// All flow methods take the reverse-edge index as a plain slice and use the default
/// [`Validation`] level; see [`MaxFlow`] for finer control.
pub trait NetworkFlow: IndexedOutEdges {
    /// Computes a maximum `source`-`sink` flow using shortest augmenting paths.
    /// See [`MaxFlow::run`] for errors.
    fn edmonds_karp_max_flow<C: Capacity>(
        &self,
        source: Node,
        sink: Node,
        capacity: &[C],
        residual: &mut [C],
        reverse: &[EdgeIndex],
    ) -> Result<C> {
        MaxFlow::new(self, ReverseEdges::new(self, reverse)?, source, sink)
            .algorithm(MaxFlowAlgorithm::EdmondsKarp)
            .run(capacity, residual)
    }

    /// Computes a maximum `source`-`sink` flow using FIFO push-relabel.
    /// See [`MaxFlow::run`] for errors.
    fn push_relabel_max_flow<C: Capacity>(
        &self,
        source: Node,
        sink: Node,
        capacity: &[C],
        residual: &mut [C],
        reverse: &[EdgeIndex],
    ) -> Result<C> {
        MaxFlow::new(self, ReverseEdges::new(self, reverse)?, source, sink)
            .algorithm(MaxFlowAlgorithm::PushRelabel)
            .run(capacity, residual)
    }

    /// Computes a maximum `source`-`sink` flow using the Boykov-Kolmogorov algorithm.
    /// See [`MaxFlow::run`] for errors.
    fn boykov_kolmogorov_max_flow<C: Capacity>(
        &self,
        source: Node,
        sink: Node,
        capacity: &[C],
        residual: &mut [C],
        reverse: &[EdgeIndex],
    ) -> Result<C> {
        MaxFlow::new(self, ReverseEdges::new(self, reverse)?, source, sink)
            .algorithm(MaxFlowAlgorithm::BoykovKolmogorov)
            .run(capacity, residual)
    }

    /// Marks all vertices reachable from `source` along edges with positive residual capacity
    /// and returns their number. After a maximum flow this is the source side of a minimum cut.
    ///
    /// # Errors
    /// - [`GraphError::InvalidInput`] if `source` is not a vertex,
    /// - [`GraphError::BufferTooSmall`] if `residual` or `side` are too short.
    fn residual_reachable_into<C: Capacity>(
        &self,
        source: Node,
        residual: &[C],
        side: &mut [bool],
    ) -> Result<NumNodes> {
        check_vertex(source, self.len(), "source")?;
        let residual = ReadSliceMap::for_edges(residual, self, "residual")?;
        let mut side = SliceMap::for_vertices(side, self, "side")?;

        side.fill(false);
        side.set(source, true);
        let mut stack = vec![source];
        let mut reached = 1;

        while let Some(u) = stack.pop() {
            for (e, v) in self.out_edges(u) {
                if !side.get(v) && residual.get(e) > C::zero() {
                    side.set(v, true);
                    stack.push(v);
                    reached += 1;
                }
            }
        }

        Ok(reached)
    }

    /// Returns the total capacity of all edges leaving the vertex set marked in `side`.
    ///
    /// # Errors
    /// Returns [`GraphError::BufferTooSmall`] if `side` or `capacity` are too short.
    fn cut_capacity<C: Capacity>(&self, side: &[bool], capacity: &[C]) -> Result<C> {
        let side = ReadSliceMap::for_vertices(side, self, "side")?;
        let capacity = ReadSliceMap::for_edges(capacity, self, "capacity")?;

        let mut total = C::zero();
        for (e, v) in self.edges() {
            if side.get(e.source) && !side.get(v) {
                total += capacity.get(e);
            }
        }
        Ok(total)
    }
}

impl<G: IndexedOutEdges> NetworkFlow for G {}
