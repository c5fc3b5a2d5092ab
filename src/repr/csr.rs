/*!
# Borrowed Compressed Sparse Row (CSR) View

[`CsrGraph`] is a zero-copy view over caller-owned CSR arrays:

- `row_start` of length `n + 1` holds the offset of every row, with `row_start[0] == 0`
  and `row_start[n] == nnz`,
- `column_index` of length `nnz` holds the target of every stored edge,
- an optional `weights` array of length `nnz` holds one value per stored edge.

The out-edges of `u` are exactly the positions `row_start[u]..row_start[u + 1]`. The view
never copies or mutates the arrays and is `Copy`, so it may be shared freely between
algorithm calls. Edges are addressed by [`EdgeHandle`]s, whose `index` is the position in
`column_index` and hence doubles as the key into every per-edge property array.
*/

use super::*;

/// Read-only CSR view over borrowed arrays.
#[derive(Debug, Clone, Copy)]
pub struct CsrGraph<'a> {
    row_start: &'a [NumEdges],
    column_index: &'a [Node],
    weights: Option<&'a [f64]>,
}

impl<'a> CsrGraph<'a> {
    /// Creates a view over `n` rows after validating the arrays in `O(n + nnz)`.
    ///
    /// # Errors
    /// Returns [`GraphError::InvalidGraph`] naming the first violated rule if
    /// - `row_start.len() != n + 1`,
    /// - `row_start[0] != 0` or `row_start` is decreasing somewhere,
    /// - `row_start[n] != column_index.len()`,
    /// - some column index is `>= n`.
    pub fn new(n: NumNodes, row_start: &'a [NumEdges], column_index: &'a [Node]) -> Result<Self> {
        validate_csr_arrays(n, row_start, column_index)?;
        Ok(Self {
            row_start,
            column_index,
            weights: None,
        })
    }

    /// Like [`CsrGraph::new`] but additionally attaches one weight per stored edge.
    ///
    /// # Errors
    /// Additionally fails with [`GraphError::InvalidGraph`] if `weights.len() != nnz`.
    pub fn with_weights(
        n: NumNodes,
        row_start: &'a [NumEdges],
        column_index: &'a [Node],
        weights: &'a [f64],
    ) -> Result<Self> {
        validate_csr_arrays(n, row_start, column_index)?;
        raise_error_unless!(
            weights.len() == column_index.len(),
            invalid_graph!(
                "weight array has length {} but there are {} stored edges",
                weights.len(),
                column_index.len()
            )
        );
        Ok(Self {
            row_start,
            column_index,
            weights: Some(weights),
        })
    }

    /// Creates a view without validating in release builds.
    ///
    /// Malformed arrays may cause panics on slice indexing later on, but never undefined behaviour.
    pub fn new_unchecked(
        row_start: &'a [NumEdges],
        column_index: &'a [Node],
        weights: Option<&'a [f64]>,
    ) -> Self {
        debug_assert!(!row_start.is_empty());
        debug_assert!(
            validate_csr_arrays(
                (row_start.len() - 1) as NumNodes,
                row_start,
                column_index
            )
            .is_ok()
        );
        debug_assert!(weights.is_none_or(|w| w.len() == column_index.len()));
        Self {
            row_start,
            column_index,
            weights,
        }
    }

    /// Returns the row offsets
    pub fn row_start(&self) -> &'a [NumEdges] {
        self.row_start
    }

    /// Returns the column indices (edge targets)
    pub fn column_index(&self) -> &'a [Node] {
        self.column_index
    }

    /// Returns the optional per-edge values
    pub fn weights(&self) -> Option<&'a [f64]> {
        self.weights
    }

    /// Returns the weights as a read-only edge map; unit weights if the view carries none.
    pub fn edge_weights(&self) -> EdgeWeights<'a> {
        EdgeWeights::from(self.weights)
    }

    /// Returns the targets of all out-edges of `u` as a slice.
    /// ** Panics if `u >= n` **
    pub fn out_neighbors_slice(&self, u: Node) -> &'a [Node] {
        let range = self.edge_range(u);
        &self.column_index[range.start as usize..range.end as usize]
    }
}

/// Checks the structural CSR invariants of borrowed arrays.
pub(crate) fn validate_csr_arrays(
    n: NumNodes,
    row_start: &[NumEdges],
    column_index: &[Node],
) -> Result<()> {
    raise_error_unless!(
        row_start.len() == n as usize + 1,
        invalid_graph!(
            "row_start has length {} but must have length n + 1 = {}",
            row_start.len(),
            n as usize + 1
        )
    );
    raise_error_unless!(
        row_start[0] == 0,
        invalid_graph!("row_start[0] is {} but must be 0", row_start[0])
    );

    if let Some(u) = row_start.windows(2).position(|w| w[0] > w[1]) {
        return Err(invalid_graph!(
            "row_start is decreasing between rows {} and {}",
            u,
            u + 1
        ));
    }

    raise_error_unless!(
        row_start[n as usize] as usize == column_index.len(),
        invalid_graph!(
            "row_start[n] is {} but column_index has length {}",
            row_start[n as usize],
            column_index.len()
        )
    );

    if let Some(p) = column_index.iter().position(|&v| v >= n) {
        return Err(invalid_graph!(
            "column index {} at position {} is out of range for {} vertices",
            column_index[p],
            p,
            n
        ));
    }

    Ok(())
}

macro_rules! impl_csr_graph_ops {
    ($struct:ty) => {
        impl GraphNodeOrder for $struct {
            fn number_of_nodes(&self) -> NumNodes {
                (self.row_start.len() - 1) as NumNodes
            }
        }

        impl GraphEdgeOrder for $struct {
            fn number_of_edges(&self) -> NumEdges {
                self.column_index.len() as NumEdges
            }
        }

        impl IndexedOutEdges for $struct {
            #[inline]
            fn edge_range(&self, u: Node) -> Range<EdgeIndex> {
                self.row_start[u as usize]..self.row_start[u as usize + 1]
            }

            #[inline]
            fn edge_target(&self, index: EdgeIndex) -> Node {
                self.column_index[index as usize]
            }
        }
    };
}

pub(super) use impl_csr_graph_ops;

impl_csr_graph_ops!(CsrGraph<'_>);
