use super::*;

/// Maps every edge to its antiparallel counterpart.
///
/// Wraps a caller-provided array `reverse` with one entry per stored edge: the edge at
/// position `p` from `u` to `v` is paired with the edge at position `reverse[p]`, which
/// must be stored in the row of `v` and point back to `u`. Pairing is an involution,
/// i.e. `reverse[reverse[p]] == p`; a self-loop may be its own counterpart.
///
/// Construction only checks the length; see [`ReverseEdges::validate`] for the full check.
/// [`CsrMatrix::reverse_edge_index`] computes a valid index for symmetric structures.
pub struct ReverseEdges<'a, G> {
    graph: &'a G,
    reverse: &'a [EdgeIndex],
}

impl<G> Clone for ReverseEdges<'_, G> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<G> Copy for ReverseEdges<'_, G> {}

impl<'a, G: IndexedOutEdges> ReverseEdges<'a, G> {
    /// Wraps the first `nnz` entries of `reverse`.
    ///
    /// # Errors
    /// Returns [`GraphError::BufferTooSmall`] if `reverse` has fewer than `nnz` entries.
    pub fn new(graph: &'a G, reverse: &'a [EdgeIndex]) -> Result<Self> {
        let m = graph.number_of_edges() as usize;
        check_buffer("reverse", reverse.len(), m)?;
        Ok(Self {
            graph,
            reverse: &reverse[..m],
        })
    }

    /// Returns the raw index
    pub fn as_slice(&self) -> &'a [EdgeIndex] {
        self.reverse
    }

    /// Returns the antiparallel counterpart of `e`.
    /// ** Panics if `e` is not an edge of the graph **
    #[inline]
    pub fn reverse(&self, e: EdgeHandle) -> EdgeHandle {
        EdgeHandle::new(
            self.graph.edge_target(e.index),
            self.reverse[e.index as usize],
        )
    }

    /// Checks that every entry is in range, points into the row of the edge's target,
    /// leads back to the edge's source, and that the pairing is an involution.
    ///
    /// # Errors
    /// Returns [`GraphError::InvalidGraph`] naming the first offending edge.
    pub fn validate(&self) -> Result<()> {
        let m = self.reverse.len();

        for (e, v) in self.graph.edges() {
            let u = e.source;
            let r = self.reverse[e.index as usize];

            raise_error_unless!(
                (r as usize) < m,
                invalid_graph!("reverse of edge {e} is {r}, but there are only {m} edges")
            );
            raise_error_unless!(
                self.graph.edge_range(v).contains(&r),
                invalid_graph!("reverse {r} of edge {e} ({u}, {v}) is not an out-edge of {v}")
            );
            raise_error_unless!(
                self.graph.edge_target(r) == u,
                invalid_graph!(
                    "reverse {r} of edge {e} ({u}, {v}) points to {} instead of {u}",
                    self.graph.edge_target(r)
                )
            );
            raise_error_unless!(
                self.reverse[r as usize] == e.index,
                invalid_graph!(
                    "reverse of edge {e} is {r}, but the reverse of {r} is {}",
                    self.reverse[r as usize]
                )
            );
        }

        Ok(())
    }
}
