//! Graph topology analysis algorithms
//!
//! Triangle counting and weighted local clustering.

use super::common::{GraphView, NodeId};
use std::collections::{HashMap, HashSet};

/// Undirected neighbor set of a node, excluding itself
fn neighbor_set(view: &GraphView, u: usize) -> HashSet<usize> {
    view.successors(u)
        .iter()
        .chain(view.predecessors(u).iter())
        .copied()
        .filter(|&v| v != u)
        .collect()
}

/// Triangle Counting
///
/// Returns total number of triangles in the graph.
/// Directed views are treated as undirected. Each triangle is counted once.
pub fn count_triangles(view: &GraphView) -> usize {
    let mut triangle_count = 0;

    // For each edge (u, v), find common neighbors of u and v.
    // To avoid overcounting, we only consider nodes with indices i < j < k.
    for u in 0..view.node_count {
        let u_neighbors = neighbor_set(view, u);

        for &v in &u_neighbors {
            // Order u < v
            if v <= u {
                continue;
            }

            for w in neighbor_set(view, v) {
                // Order v < w
                if w <= v {
                    continue;
                }

                if u_neighbors.contains(&w) {
                    triangle_count += 1;
                }
            }
        }
    }

    triangle_count
}

/// Weighted local clustering coefficient (Onnela et al. 2005).
///
/// Edge weights are scaled by the largest weight in the graph and each
/// triangle contributes the geometric mean of its three scaled weights:
///
/// ```text
/// c_u = 2 / (k_u (k_u - 1)) * Σ_{v<w} (ŵ_uv ŵ_uw ŵ_vw)^(1/3)
/// ```
///
/// Nodes with fewer than two neighbors score 0. Unweighted views reduce to
/// the ordinary triangle-density coefficient.
pub fn clustering_coefficients(view: &GraphView) -> HashMap<NodeId, f64> {
    let max_weight = view
        .weights
        .as_ref()
        .map(|w| w.iter().copied().fold(0.0_f64, f64::max))
        .filter(|&m| m > 0.0)
        .unwrap_or(1.0);

    let scaled: Vec<HashMap<usize, f64>> = (0..view.node_count)
        .map(|u| {
            view.weighted_successors(u)
                .filter(|&(v, _)| v != u)
                .map(|(v, w)| (v, w / max_weight))
                .collect()
        })
        .collect();

    let mut result = HashMap::with_capacity(view.node_count);
    for u in 0..view.node_count {
        let mut neighbors: Vec<usize> = scaled[u].keys().copied().collect();
        neighbors.sort_unstable();
        let k = neighbors.len();

        let coefficient = if k < 2 {
            0.0
        } else {
            let mut sum = 0.0;
            for (i, &v) in neighbors.iter().enumerate() {
                for &w in &neighbors[i + 1..] {
                    if let Some(&w_vw) = scaled[v].get(&w) {
                        sum += (scaled[u][&v] * scaled[u][&w] * w_vw).cbrt();
                    }
                }
            }
            2.0 * sum / (k * (k - 1)) as f64
        };

        result.insert(view.index_to_node[u], coefficient);
    }

    result
}
