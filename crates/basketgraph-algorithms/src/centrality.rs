//! Betweenness centrality
//!
//! Brandes (2001) accumulation over Dijkstra shortest paths. Edge weights are
//! read as distances, so a heavier edge is a longer hop.

use super::common::{GraphView, NodeId};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

/// Relative tolerance when comparing path lengths
const PATH_EPSILON: f64 = 1e-9;

/// Betweenness configuration
#[derive(Debug, Clone, Copy)]
pub struct BetweennessConfig {
    /// Scale scores by 2 / ((n-1)(n-2))
    pub normalized: bool,
}

impl Default for BetweennessConfig {
    fn default() -> Self {
        Self { normalized: true }
    }
}

/// State for Dijkstra priority queue
#[derive(Copy, Clone, PartialEq)]
struct State {
    cost: f64,
    node_idx: usize,
}

impl Eq for State {}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Compare costs reversed for min-heap
        other
            .cost
            .partial_cmp(&self.cost)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.node_idx.cmp(&self.node_idx))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Single-source shortest paths: returns settle order, path counts and
/// shortest-path predecessors.
fn shortest_paths(view: &GraphView, source: usize) -> (Vec<usize>, Vec<f64>, Vec<Vec<usize>>) {
    let n = view.node_count;
    let mut dist = vec![f64::INFINITY; n];
    let mut sigma = vec![0.0; n];
    let mut preds: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut settled = vec![false; n];
    let mut order = Vec::with_capacity(n);
    let mut heap = BinaryHeap::new();

    dist[source] = 0.0;
    sigma[source] = 1.0;
    heap.push(State { cost: 0.0, node_idx: source });

    while let Some(State { cost, node_idx }) = heap.pop() {
        if settled[node_idx] || cost > dist[node_idx] {
            continue;
        }
        settled[node_idx] = true;
        order.push(node_idx);

        for (next_idx, weight) in view.weighted_successors(node_idx) {
            if weight < 0.0 || next_idx == node_idx {
                continue;
            }
            let next_cost = cost + weight;
            let tolerance = PATH_EPSILON * next_cost.abs().max(1.0);

            if next_cost < dist[next_idx] - tolerance {
                dist[next_idx] = next_cost;
                sigma[next_idx] = sigma[node_idx];
                preds[next_idx].clear();
                preds[next_idx].push(node_idx);
                heap.push(State { cost: next_cost, node_idx: next_idx });
            } else if (next_cost - dist[next_idx]).abs() <= tolerance && !settled[next_idx] {
                sigma[next_idx] += sigma[node_idx];
                preds[next_idx].push(node_idx);
            }
        }
    }

    (order, sigma, preds)
}

/// Weighted betweenness centrality for an undirected view
pub fn betweenness_centrality(view: &GraphView, config: BetweennessConfig) -> HashMap<NodeId, f64> {
    let n = view.node_count;
    let mut betweenness = vec![0.0_f64; n];

    for s in 0..n {
        let (order, sigma, preds) = shortest_paths(view, s);

        // Backward pass: accumulate dependencies, farthest first
        let mut delta = vec![0.0_f64; n];
        for &w in order.iter().rev() {
            for &v in &preds[w] {
                delta[v] += sigma[v] / sigma[w] * (1.0 + delta[w]);
            }
            if w != s {
                betweenness[w] += delta[w];
            }
        }
    }

    // Each undirected path is counted from both ends
    for b in &mut betweenness {
        *b /= 2.0;
    }

    if config.normalized && n > 2 {
        let scale = 2.0 / ((n - 1) as f64 * (n - 2) as f64);
        for b in &mut betweenness {
            *b *= scale;
        }
    }

    betweenness
        .into_iter()
        .enumerate()
        .map(|(idx, score)| (view.index_to_node[idx], score))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_middle_node() {
        // 1 - 2 - 3
        let view = GraphView::undirected(vec![1, 2, 3], &[(0, 1, 1.0), (1, 2, 1.0)]);
        let raw = betweenness_centrality(&view, BetweennessConfig { normalized: false });

        assert_eq!(raw[&1], 0.0);
        assert_eq!(raw[&2], 1.0);
        assert_eq!(raw[&3], 0.0);

        let normalized = betweenness_centrality(&view, BetweennessConfig::default());
        assert!((normalized[&2] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_weights_are_distances() {
        // Triangle 1-2-3 where the direct 1-3 edge is long, so 1->3 routes via 2
        let view = GraphView::undirected(
            vec![1, 2, 3],
            &[(0, 1, 1.0), (1, 2, 1.0), (0, 2, 5.0)],
        );
        let raw = betweenness_centrality(&view, BetweennessConfig { normalized: false });
        assert_eq!(raw[&2], 1.0);
        assert_eq!(raw[&1], 0.0);
    }

    #[test]
    fn test_equal_paths_split_credit() {
        // Square 1-2-3-4-1: two shortest paths between opposite corners
        let view = GraphView::undirected(
            vec![1, 2, 3, 4],
            &[(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0), (3, 0, 1.0)],
        );
        let raw = betweenness_centrality(&view, BetweennessConfig { normalized: false });
        for id in 1..=4 {
            assert!((raw[&id] - 0.5).abs() < 1e-12);
        }
    }
}
