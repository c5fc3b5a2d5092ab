use super::*;
use log::debug;

/// Sparse all-pairs shortest paths in `O(n m log n)`.
///
/// Bellman-Ford potentials `h` turn every weight into `w(u, v) + h(u) - h(v) >= 0`, after
/// which Dijkstra's algorithm runs from every vertex on the reweighted graph. Distances are
/// translated back before they are written. As with Floyd-Warshall, the results are only
/// copied into the caller buffers once every row is complete.
pub(super) fn johnson<G, W>(
    graph: &G,
    weights: &W,
    distance: &mut [f64],
    predecessor: Option<&mut [Node]>,
    infinity: f64,
) -> Result<()>
where
    G: IndexedOutEdges,
    W: ReadPropertyMap<EdgeHandle, Value = f64>,
{
    let n = graph.len();
    let cells = n * n;
    check_buffer("distance", distance.len(), cells)?;
    if let Some(predecessor) = &predecessor {
        check_buffer("predecessor", predecessor.len(), cells)?;
    }

    debug!(
        "Johnson on {n} vertices and {} edges",
        graph.number_of_edges()
    );

    let potential = BellmanFord::new(graph, weights).potentials()?;

    let mut reweighted = VecMap::for_edges(graph, 0.0);
    for (e, v) in graph.edges() {
        let w = weights.get(e) + potential[e.source as usize] - potential[v as usize];
        // rounding may push tight edges slightly below zero
        reweighted.set(e, w.max(0.0));
    }

    let mut dist = vec![f64::INFINITY; cells];
    let mut pred = vec![INVALID_NODE; cells];

    let mut dijkstra = Dijkstra::new(graph, &reweighted);
    for s in graph.vertices() {
        dijkstra.run(s, &mut ())?;

        let tree = dijkstra.tree();
        let row = s as usize * n;
        for v in graph.vertices() {
            let sv = row + v as usize;
            if let Some(d) = tree.distance(v) {
                dist[sv] = d - potential[s as usize] + potential[v as usize];
            }
            pred[sv] = tree.predecessor.get(v);
        }
    }

    for (out, &d) in distance.iter_mut().zip(&dist) {
        *out = if d == f64::INFINITY { infinity } else { d };
    }
    if let Some(predecessor) = predecessor {
        predecessor[..cells].copy_from_slice(&pred);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::shortest_paths::tests::random_weighted_graph;
    use itertools::Itertools;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64Mcg;

    fn assert_close(a: &[f64], b: &[f64]) {
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b) {
            assert!(x == y || (x - y).abs() < 1e-9, "{x} vs {y}");
        }
    }

    #[test]
    fn negative_edges_without_cycle() {
        // 0 -> 1 (3), 1 -> 2 (-1), 0 -> 2 (5), 2 -> 0 (2), 3 isolated
        let graph = CsrMatrix::from_weighted_edges(
            4,
            [(0, 1, 3.0), (1, 2, -1.0), (0, 2, 5.0), (2, 0, 2.0)],
        );
        let view = graph.view();
        let mut distance = [0.0; 16];
        let mut predecessor = [0; 16];

        view.johnson_into(
            view.edge_weights(),
            &mut distance,
            Some(&mut predecessor),
            -1.0,
        )
        .unwrap();

        #[rustfmt::skip]
        assert_eq!(distance, [
            0.0,  3.0,  2.0, -1.0,
            1.0,  0.0, -1.0, -1.0,
            2.0,  5.0,  0.0, -1.0,
            -1.0, -1.0, -1.0, 0.0,
        ]);

        assert_eq!(predecessor[2], 1);
        assert_eq!(predecessor[4], 2);
        assert_eq!(predecessor[3], INVALID_NODE);
        assert_eq!(predecessor[3 * 4 + 3], 3);
    }

    #[test]
    fn negative_cycle_leaves_buffers_untouched() {
        // the cycle is not reachable from every vertex, it is still reported
        let graph = CsrMatrix::from_weighted_edges(3, [(0, 1, 1.0), (1, 2, -2.0), (2, 1, 1.0)]);
        let view = graph.view();
        let mut distance = [7.0; 9];
        let mut predecessor = [7; 9];

        assert_eq!(
            view.johnson_into(
                view.edge_weights(),
                &mut distance,
                Some(&mut predecessor),
                f64::INFINITY
            ),
            Err(GraphError::NegativeCycle)
        );
        assert_eq!(distance, [7.0; 9]);
        assert_eq!(predecessor, [7; 9]);

        let mut distance = [0.0; 8];
        assert!(matches!(
            view.johnson_into(view.edge_weights(), &mut distance, None, 0.0),
            Err(GraphError::BufferTooSmall {
                required: 9,
                provided: 8,
                ..
            })
        ));
    }

    #[test]
    fn agrees_with_floyd_warshall_on_reweighted_graphs() {
        let rng = &mut Pcg64Mcg::seed_from_u64(0x10a5);

        for n in [2, 10, 30] {
            for _ in 0..5 {
                // shifting non-negative weights by a potential creates negative edges
                // but no negative cycles
                let base = random_weighted_graph(rng, n, 4 * n as usize, 0.0, 10.0);
                let base = base.view();
                let shift = (0..n).map(|_| rng.random_range(-20.0..20.0)).collect_vec();
                let graph = CsrMatrix::from_weighted_edges(
                    n,
                    base.edges()
                        .map(|(e, v)| {
                            let w = base.edge_weights().get(e);
                            (e.source, v, w + shift[e.source as usize] - shift[v as usize])
                        })
                        .collect_vec(),
                );
                let view = graph.view();

                let mut expected = vec![0.0; (n * n) as usize];
                let mut expected_pred = vec![0; (n * n) as usize];
                view.floyd_warshall_into(
                    view.edge_weights(),
                    &mut expected,
                    Some(&mut expected_pred),
                    f64::INFINITY,
                )
                .unwrap();

                let mut distance = vec![0.0; (n * n) as usize];
                let mut predecessor = vec![0; (n * n) as usize];
                view.johnson_into(
                    view.edge_weights(),
                    &mut distance,
                    Some(&mut predecessor),
                    f64::INFINITY,
                )
                .unwrap();

                assert_close(&distance, &expected);
                for (p, q) in predecessor.iter().zip(&expected_pred) {
                    assert_eq!(*p == INVALID_NODE, *q == INVALID_NODE);
                }
                for i in 0..n as usize {
                    assert_eq!(predecessor[i * (n as usize + 1)], i as Node);
                }
            }
        }
    }

    #[test]
    fn agrees_with_floyd_warshall_on_arbitrary_weights() {
        let rng = &mut Pcg64Mcg::seed_from_u64(0x5eed_5);
        let mut cyclic = 0;

        for n in [3, 8, 20] {
            for _ in 0..10 {
                let graph = random_weighted_graph(rng, n, 2 * n as usize, -2.0, 10.0);
                let view = graph.view();

                let mut expected = vec![0.0; (n * n) as usize];
                let mut distance = vec![0.0; (n * n) as usize];
                let fw = view.floyd_warshall_into(view.edge_weights(), &mut expected, None, -1.0);
                let jo = view.johnson_into(view.edge_weights(), &mut distance, None, -1.0);

                match (fw, jo) {
                    (Ok(()), Ok(())) => assert_close(&distance, &expected),
                    (Err(a), Err(b)) => {
                        assert_eq!(a, GraphError::NegativeCycle);
                        assert_eq!(b, GraphError::NegativeCycle);
                        cyclic += 1;
                    }
                    (fw, jo) => panic!("Floyd-Warshall returned {fw:?}, Johnson {jo:?}"),
                }
            }
        }

        // both outcomes are exercised
        assert!(cyclic > 0 && cyclic < 30);
    }
}
