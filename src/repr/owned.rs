/*!
# Owned CSR Matrices

[`CsrMatrix`] owns its CSR arrays and is built from edge lists. It is a caller-side
convenience: the algorithms only ever see the borrowed [`CsrGraph`] obtained via
[`CsrMatrix::view`]. All builders produce rows sorted by target, which enables
`O(log d)` edge lookups and the computation of reverse-edge indices.
*/

use super::{csr::impl_csr_graph_ops, *};

/// CSR arrays with ownership of the storage.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CsrMatrix {
    row_start: Vec<NumEdges>,
    column_index: Vec<Node>,
    values: Option<Vec<f64>>,
}

/// Computes row offsets of a list of edges sorted by source.
fn offsets_of_sorted<'a, I>(n: NumNodes, sources: I) -> Vec<NumEdges>
where
    I: IntoIterator<Item = &'a Node>,
{
    let mut offsets: Vec<NumEdges> = Vec::with_capacity(n as usize + 1);
    offsets.push(0);

    let mut curr_node = 0;
    let mut counter = 0;
    for &u in sources {
        assert!(u < n);
        while u > curr_node {
            offsets.push(counter);
            curr_node += 1;
        }
        counter += 1;
    }

    assert!(offsets.len() as NumNodes <= n + 1);
    while offsets.len() as NumNodes <= n {
        offsets.push(counter);
    }

    offsets
}

impl CsrMatrix {
    /// Creates an unweighted matrix with `n` rows; duplicate edges are removed.
    /// ** Panics if some endpoint is `>= n` **
    pub fn from_edges<I, E>(n: NumNodes, edges: I) -> Self
    where
        E: Into<Edge>,
        I: IntoIterator<Item = E>,
    {
        let mut edges: Vec<Edge> = edges.into_iter().map(|e| e.into()).collect();
        edges.sort_unstable();
        edges.dedup();

        Self::from_sorted_edges(n, edges)
    }

    /// Creates an unweighted matrix that contains every edge in both directions.
    /// ** Panics if some endpoint is `>= n` **
    pub fn symmetric_from_edges<I, E>(n: NumNodes, edges: I) -> Self
    where
        E: Into<Edge>,
        I: IntoIterator<Item = E>,
    {
        let mut edges: Vec<Edge> = edges
            .into_iter()
            .flat_map(|e| {
                let e = e.into();
                [e, e.reverse()]
            })
            .collect();
        edges.sort_unstable();
        // Removes doubled self-loops as well
        edges.dedup();

        Self::from_sorted_edges(n, edges)
    }

    fn from_sorted_edges(n: NumNodes, edges: Vec<Edge>) -> Self {
        let row_start = offsets_of_sorted(n, edges.iter().map(|Edge(u, _)| u));
        let column_index = edges
            .into_iter()
            .map(|Edge(_, v)| {
                assert!(v < n);
                v
            })
            .collect();

        Self {
            row_start,
            column_index,
            values: None,
        }
    }

    /// Creates a weighted matrix; parallel edges are kept as separate entries in input order.
    /// ** Panics if some endpoint is `>= n` **
    pub fn from_weighted_edges<I>(n: NumNodes, edges: I) -> Self
    where
        I: IntoIterator<Item = (Node, Node, f64)>,
    {
        let mut edges: Vec<(Node, Node, f64)> = edges.into_iter().collect();
        edges.sort_by_key(|&(u, v, _)| (u, v));

        let row_start = offsets_of_sorted(n, edges.iter().map(|(u, _, _)| u));
        let (column_index, values) = edges
            .into_iter()
            .map(|(_, v, w)| {
                assert!(v < n);
                (v, w)
            })
            .unzip();

        Self {
            row_start,
            column_index,
            values: Some(values),
        }
    }

    /// Creates a weighted matrix of an undirected graph: every edge `{u, v}` is stored as
    /// `(u, v)` and `(v, u)` with the same weight, self-loops are stored once.
    /// ** Panics if some endpoint is `>= n` **
    pub fn undirected_from_weighted_edges<I>(n: NumNodes, edges: I) -> Self
    where
        I: IntoIterator<Item = (Node, Node, f64)>,
    {
        Self::from_weighted_edges(
            n,
            edges.into_iter().flat_map(|(u, v, w)| {
                std::iter::once((u, v, w)).chain((u != v).then_some((v, u, w)))
            }),
        )
    }

    /// Returns a borrowed view of the matrix
    pub fn view(&self) -> CsrGraph<'_> {
        CsrGraph::new_unchecked(&self.row_start, &self.column_index, self.values.as_deref())
    }

    /// Returns the row offsets
    pub fn row_start(&self) -> &[NumEdges] {
        &self.row_start
    }

    /// Returns the column indices (edge targets)
    pub fn column_index(&self) -> &[Node] {
        &self.column_index
    }

    /// Returns the optional per-edge values
    pub fn values(&self) -> Option<&[f64]> {
        self.values.as_deref()
    }

    /// Returns the position of the first stored edge `(u, v)` if it exists.
    /// ** Panics if `u >= n` **
    pub fn find_edge(&self, u: Node, v: Node) -> Option<EdgeIndex> {
        let range = self.edge_range(u);
        let row = &self.column_index[range.start as usize..range.end as usize];
        let pos = row.partition_point(|&w| w < v);
        (pos < row.len() && row[pos] == v).then_some(range.start + pos as EdgeIndex)
    }

    /// Scatters per-edge values into an array aligned with the column indices.
    /// Values of repeated edges are summed up, positions without a value are zero.
    ///
    /// # Errors
    /// Returns [`GraphError::InvalidInput`] if some `(u, v)` is not stored in the matrix.
    pub fn edge_values<T, I>(&self, values: I) -> Result<Vec<T>>
    where
        T: Copy + num::Zero + std::ops::AddAssign,
        I: IntoIterator<Item = (Node, Node, T)>,
    {
        let mut result = vec![T::zero(); self.column_index.len()];
        for (u, v, x) in values {
            check_vertex(u, self.len(), "source")?;
            let index = self
                .find_edge(u, v)
                .ok_or_else(|| invalid_input!("edge ({u},{v}) is not stored in the matrix"))?;
            result[index as usize] += x;
        }
        Ok(result)
    }

    /// Computes the reverse-edge index: for every position `p` storing `(u, v)` the
    /// position of an edge `(v, u)`. Parallel edges are paired up in storage order, so
    /// the result is an involution.
    ///
    /// # Errors
    /// Returns [`GraphError::InvalidGraph`] if some edge has no antiparallel partner,
    /// i.e. the structure is not symmetric.
    pub fn reverse_edge_index(&self) -> Result<Vec<EdgeIndex>> {
        let mut reverse = vec![EdgeIndex::MAX; self.column_index.len()];

        for u in self.vertices() {
            for index in self.edge_range(u) {
                // already paired from the other side
                if reverse[index as usize] != EdgeIndex::MAX {
                    continue;
                }
                let v = self.edge_target(index);

                // k-th copy of (u, v) is paired with the k-th copy of (v, u)
                let copy = (index - self.find_first(u, v)) as usize;
                let partner = self
                    .find_edge(v, u)
                    .map(|first| first + copy as EdgeIndex)
                    .filter(|&q| q < self.edge_range(v).end && self.edge_target(q) == u)
                    .ok_or_else(|| {
                        invalid_graph!("edge ({u},{v}) at position {index} has no reverse edge")
                    })?;

                reverse[index as usize] = partner;
                reverse[partner as usize] = index;
            }
        }

        Ok(reverse)
    }

    /// Position of the first copy of `(u, v)`; assumes the edge is stored
    fn find_first(&self, u: Node, v: Node) -> EdgeIndex {
        let range = self.edge_range(u);
        let row = &self.column_index[range.start as usize..range.end as usize];
        range.start + row.partition_point(|&w| w < v) as EdgeIndex
    }
}

impl_csr_graph_ops!(CsrMatrix);

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    #[test]
    fn from_edges_sorts_and_dedups() {
        let matrix = CsrMatrix::from_edges(4, [(2, 1), (0, 3), (0, 1), (2, 1), (3, 3)]);

        assert_eq!(matrix.row_start(), &[0, 2, 2, 3, 4]);
        assert_eq!(matrix.column_index(), &[1, 3, 1, 3]);
        assert_eq!(matrix.values(), None);
        assert_eq!(matrix.find_edge(0, 3), Some(1));
        assert_eq!(matrix.find_edge(1, 0), None);

        let view = matrix.view();
        assert_eq!(view.number_of_nodes(), 4);
        assert_eq!(view.number_of_edges(), 4);
    }

    #[test]
    fn weighted_edges_keep_parallel_entries() {
        let matrix = CsrMatrix::from_weighted_edges(3, [(1, 2, 3.0), (0, 1, 1.0), (1, 2, 5.0)]);

        assert_eq!(matrix.row_start(), &[0, 1, 3, 3]);
        assert_eq!(matrix.column_index(), &[1, 2, 2]);
        assert_eq!(matrix.values(), Some(&[1.0, 3.0, 5.0][..]));
    }

    #[test]
    fn undirected_stores_both_directions() {
        let matrix = CsrMatrix::undirected_from_weighted_edges(3, [(0, 1, 2.0), (2, 2, 1.0)]);

        assert_eq!(matrix.column_index(), &[1, 0, 2]);
        assert_eq!(matrix.values(), Some(&[2.0, 2.0, 1.0][..]));
    }

    #[test]
    fn reverse_index_is_involution() {
        let matrix = CsrMatrix::symmetric_from_edges(5, [(0, 1), (1, 2), (2, 0), (3, 4), (4, 4)]);
        let reverse = matrix.reverse_edge_index().unwrap();
        let view = matrix.view();

        for (e, v) in view.edges() {
            let q = reverse[e.index as usize];
            assert_eq!(reverse[q as usize], e.index);
            assert!(view.edge_range(v).contains(&q));
            assert_eq!(view.edge_target(q), e.source);
        }
    }

    #[test]
    fn reverse_index_pairs_parallel_edges() {
        let matrix =
            CsrMatrix::from_weighted_edges(2, [(0, 1, 1.0), (0, 1, 2.0), (1, 0, 3.0), (1, 0, 4.0)]);
        let reverse = matrix.reverse_edge_index().unwrap();

        assert_eq!(reverse, vec![2, 3, 0, 1]);
    }

    #[test]
    fn reverse_index_of_undirected_two_cycle() {
        // row_start = [0, 1, 2], column_index = [1, 0]
        let matrix = CsrMatrix::symmetric_from_edges(2, [(0, 1)]);
        assert_eq!(matrix.row_start(), &[0, 1, 2]);
        assert_eq!(matrix.reverse_edge_index().unwrap(), vec![1, 0]);
    }

    #[test]
    fn reverse_index_requires_symmetry() {
        let matrix = CsrMatrix::from_edges(3, [(0, 1), (1, 2), (2, 1)]);
        assert!(matches!(
            matrix.reverse_edge_index(),
            Err(GraphError::InvalidGraph(_))
        ));
    }

    #[test]
    fn edge_values_are_scattered() {
        let matrix = CsrMatrix::symmetric_from_edges(3, [(0, 1), (1, 2)]);
        let capacity = matrix
            .edge_values([(0, 1, 4), (1, 2, 7), (1, 2, 1)])
            .unwrap();

        assert_eq!(
            matrix
                .view()
                .edges()
                .map(|(e, v)| (e.source, v, capacity[e.index as usize]))
                .collect_vec(),
            vec![(0, 1, 4), (1, 0, 0), (1, 2, 8), (2, 1, 0)]
        );

        assert!(matches!(
            matrix.edge_values([(0, 2, 1)]),
            Err(GraphError::InvalidInput(_))
        ));
    }
}
