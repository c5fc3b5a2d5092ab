use super::*;
use log::debug;

/// Dense all-pairs shortest paths in `O(n^3)`.
///
/// Works on scratch matrices and only copies them into the caller buffers once no negative
/// cycle was found. Parallel edges keep their minimum weight; the predecessor matrix keeps
/// the first path found among equally short ones.
pub(super) fn floyd_warshall<G, W>(
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
        "Floyd-Warshall on {n} vertices and {} edges",
        graph.number_of_edges()
    );

    let mut dist = vec![f64::INFINITY; cells];
    let mut pred = vec![INVALID_NODE; cells];

    for i in graph.vertices() {
        let ii = i as usize * (n + 1);
        dist[ii] = 0.0;
        pred[ii] = i;
    }

    for (e, v) in graph.edges() {
        let u = e.source;
        let uv = u as usize * n + v as usize;
        let w = weights.get(e);
        if w < dist[uv] {
            dist[uv] = w;
            pred[uv] = u;
        }
    }

    for k in 0..n {
        for i in 0..n {
            let dik = dist[i * n + k];
            if dik == f64::INFINITY {
                continue;
            }

            for j in 0..n {
                let dkj = dist[k * n + j];
                if dkj == f64::INFINITY {
                    continue;
                }

                let ij = i * n + j;
                if dik + dkj < dist[ij] {
                    dist[ij] = dik + dkj;
                    pred[ij] = pred[k * n + j];
                }
            }
        }
    }

    if (0..n).any(|i| dist[i * (n + 1)] < 0.0) {
        debug!("Floyd-Warshall found a negative cycle");
        return Err(GraphError::NegativeCycle);
    }

    for (out, &d) in distance.iter_mut().zip(&dist) {
        *out = if d == f64::INFINITY { infinity } else { d };
    }
    if let Some(predecessor) = predecessor {
        predecessor[..cells].copy_from_slice(&pred);
    }

    Ok(())
}
