use crate::prelude::*;
use rand::Rng;

/// A flow network on a symmetric structure with its reverse-edge index and integral capacities
pub(crate) struct FlowInstance {
    pub matrix: CsrMatrix,
    pub reverse: Vec<EdgeIndex>,
    pub capacity: Vec<i64>,
}

impl FlowInstance {
    /// Builds the network containing all given edges and their reverses.
    /// Reverse edges that are not listed themselves get zero capacity.
    pub fn new(n: NumNodes, edges: &[(Node, Node, i64)]) -> Self {
        let matrix = CsrMatrix::symmetric_from_edges(n, edges.iter().map(|&(u, v, _)| (u, v)));
        let reverse = matrix.reverse_edge_index().unwrap();
        let capacity = matrix.edge_values(edges.iter().copied()).unwrap();
        Self {
            matrix,
            reverse,
            capacity,
        }
    }

    /// The diamond `0 -> {1, 2} -> 3` with maximum flow 15 from 0 to 3
    pub fn diamond() -> Self {
        Self::new(4, &[(0, 1, 10), (0, 2, 10), (1, 3, 5), (2, 3, 15)])
    }
}

/// Creates a random flow network with (at most) `m` directed edges with capacities in `1..=20`
pub(crate) fn random_flow_network<R: Rng>(rng: &mut R, n: NumNodes, m: NumEdges) -> FlowInstance {
    let edges = (0..m)
        .filter_map(|_| {
            let u = rng.random_range(0..n);
            let v = rng.random_range(0..n);
            (u != v).then(|| (u, v, rng.random_range(1..=20)))
        })
        .collect::<Vec<_>>();

    FlowInstance::new(n, &edges)
}

/// Every max-flow engine has to pass the same battery of tests
macro_rules! test_max_flow_engine {
    ($env:ident, $algo:expr) => {
        mod $env {
            use crate::{algo::*, testing::*};
            use itertools::Itertools;
            use rand::{Rng, SeedableRng};
            use rand_pcg::Pcg64Mcg;

            const ALGORITHM: MaxFlowAlgorithm = $algo;

            fn solve(
                instance: &FlowInstance,
                source: Node,
                sink: Node,
                residual: &mut [i64],
            ) -> Result<i64> {
                let reverse = ReverseEdges::new(&instance.matrix, &instance.reverse)?;
                MaxFlow::new(&instance.matrix, reverse, source, sink)
                    .algorithm(ALGORITHM)
                    .validation(Validation::Checked)
                    .run(&instance.capacity, residual)
            }

            /// Returns the net outflow of every vertex derived from the residual capacities
            fn net_outflow(instance: &FlowInstance, residual: &[i64]) -> Vec<i64> {
                instance
                    .matrix
                    .vertices()
                    .map(|u| {
                        instance
                            .matrix
                            .out_edges(u)
                            .map(|(e, _)| {
                                let p = e.index as usize;
                                instance.capacity[p] - residual[p]
                            })
                            .sum()
                    })
                    .collect_vec()
            }

            #[test]
            fn diamond() {
                let instance = FlowInstance::diamond();
                let mut residual = instance.capacity.clone();

                assert_eq!(solve(&instance, 0, 3, &mut residual), Ok(15));
                assert_eq!(net_outflow(&instance, &residual), vec![15, 0, 0, -15]);
            }

            #[test]
            fn agrees_with_edmonds_karp() {
                let _ = env_logger::builder().is_test(true).try_init();
                let rng = &mut Pcg64Mcg::seed_from_u64(0xf10);

                for n in [2, 5, 10, 30] {
                    for _ in 0..10 {
                        let instance = random_flow_network(rng, n, 4 * n);
                        let s = rng.random_range(0..n);
                        let t = (s + rng.random_range(1..n)) % n;

                        let mut residual = instance.capacity.clone();
                        let expected = instance
                            .matrix
                            .edmonds_karp_max_flow(
                                s,
                                t,
                                &instance.capacity,
                                &mut residual,
                                &instance.reverse,
                            )
                            .unwrap();

                        let mut residual = instance.capacity.clone();
                        assert_eq!(solve(&instance, s, t, &mut residual), Ok(expected));
                    }
                }
            }

            #[test]
            fn conservation_and_bounds() {
                let rng = &mut Pcg64Mcg::seed_from_u64(0xc0);

                for n in [3, 10, 40] {
                    for _ in 0..10 {
                        let instance = random_flow_network(rng, n, 5 * n);
                        let (s, t) = (0, n - 1);

                        let mut residual = instance.capacity.clone();
                        let flow = solve(&instance, s, t, &mut residual).unwrap();

                        let outflow = net_outflow(&instance, &residual);
                        for u in instance.matrix.vertices() {
                            let expected = match u {
                                u if u == s => flow,
                                u if u == t => -flow,
                                _ => 0,
                            };
                            assert_eq!(outflow[u as usize], expected);
                        }

                        for (p, &r) in instance.reverse.iter().enumerate() {
                            let r = r as usize;
                            assert!(residual[p] >= 0);
                            assert_eq!(
                                residual[p] + residual[r],
                                instance.capacity[p] + instance.capacity[r]
                            );
                        }
                    }
                }
            }

            #[test]
            fn max_flow_equals_min_cut() {
                let rng = &mut Pcg64Mcg::seed_from_u64(0xd0a1);

                for n in [4, 15, 40] {
                    for _ in 0..10 {
                        let instance = random_flow_network(rng, n, 4 * n);
                        let (s, t) = (1, n - 2);

                        let mut residual = instance.capacity.clone();
                        let flow = solve(&instance, s, t, &mut residual).unwrap();

                        let mut side = vec![false; n as usize];
                        let reached = instance
                            .matrix
                            .residual_reachable_into(s, &residual, &mut side)
                            .unwrap();

                        assert!(side[s as usize] && !side[t as usize]);
                        assert_eq!(reached as usize, side.iter().filter(|&&x| x).count());
                        assert_eq!(
                            instance.matrix.cut_capacity(&side, &instance.capacity),
                            Ok(flow)
                        );
                    }
                }
            }

            #[test]
            fn resolving_pushes_nothing() {
                let rng = &mut Pcg64Mcg::seed_from_u64(0x1de);

                for n in [5, 20] {
                    let instance = random_flow_network(rng, n, 4 * n);
                    let mut residual = instance.capacity.clone();

                    solve(&instance, 0, 1, &mut residual).unwrap();
                    let solved = residual.clone();

                    assert_eq!(solve(&instance, 0, 1, &mut residual), Ok(0));
                    assert_eq!(
                        net_outflow(&instance, &residual),
                        net_outflow(&instance, &solved)
                    );
                }
            }

            #[test]
            fn unreachable_sink() {
                let instance = FlowInstance::new(4, &[(0, 1, 3), (1, 2, 3), (3, 2, 3)]);
                let mut residual = instance.capacity.clone();

                assert_eq!(solve(&instance, 0, 3, &mut residual), Ok(0));
                assert_eq!(residual, instance.capacity);
            }

            #[test]
            fn rejects_invalid_input_without_writing() {
                let instance = FlowInstance::diamond();
                let mut residual = instance.capacity.clone();

                assert!(matches!(
                    solve(&instance, 2, 2, &mut residual),
                    Err(GraphError::InvalidInput(_))
                ));
                assert!(matches!(
                    solve(&instance, 0, 4, &mut residual),
                    Err(GraphError::InvalidInput(_))
                ));
                assert!(matches!(
                    solve(&instance, 0, 3, &mut residual[..5]),
                    Err(GraphError::BufferTooSmall {
                        what: "residual",
                        ..
                    })
                ));

                let mut broken = FlowInstance::diamond();
                broken.reverse.swap(0, 1);
                assert!(matches!(
                    solve(&broken, 0, 3, &mut residual),
                    Err(GraphError::InvalidGraph(_))
                ));

                assert_eq!(residual, instance.capacity);
            }
        }
    };
}

pub(crate) use test_max_flow_engine;
