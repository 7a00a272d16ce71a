//! Community detection algorithms
//!
//! Connected components via union-find, and weighted Louvain modularity
//! optimisation (Blondel et al. 2008).

use super::common::{GraphView, NodeId};
use std::collections::HashMap;

/// Result of WCC algorithm
pub struct WccResult {
    /// Map of Component ID -> List of NodeIds
    pub components: HashMap<usize, Vec<NodeId>>,
    /// Map of NodeId -> Component ID
    pub node_component: HashMap<NodeId, usize>,
}

impl WccResult {
    /// Members of the largest component, sorted by NodeId.
    ///
    /// Ties between equally sized components go to the one holding the
    /// smallest NodeId, so the choice does not depend on hash order.
    pub fn largest(&self) -> Vec<NodeId> {
        let mut best: Option<Vec<NodeId>> = None;
        for members in self.components.values() {
            let mut members = members.clone();
            members.sort_unstable();
            best = match best {
                Some(current)
                    if current.len() > members.len()
                        || (current.len() == members.len() && current[0] < members[0]) =>
                {
                    Some(current)
                }
                _ => Some(members),
            };
        }
        best.unwrap_or_default()
    }
}

/// Union-Find data structure
pub struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<usize>,
}

impl UnionFind {
    pub fn new(size: usize) -> Self {
        UnionFind {
            parent: (0..size).collect(),
            rank: vec![0; size],
        }
    }

    pub fn find(&mut self, i: usize) -> usize {
        if self.parent[i] != i {
            self.parent[i] = self.find(self.parent[i]); // Path compression
        }
        self.parent[i]
    }

    pub fn union(&mut self, i: usize, j: usize) {
        let root_i = self.find(i);
        let root_j = self.find(j);

        if root_i != root_j {
            if self.rank[root_i] < self.rank[root_j] {
                self.parent[root_i] = root_j;
            } else if self.rank[root_i] > self.rank[root_j] {
                self.parent[root_j] = root_i;
            } else {
                self.parent[root_j] = root_i;
                self.rank[root_i] += 1;
            }
        }
    }
}

/// Weakly Connected Components (WCC)
///
/// Finds all disjoint subgraphs in the graph.
/// Ignores edge direction.
pub fn weakly_connected_components(view: &GraphView) -> WccResult {
    let n = view.node_count;
    let mut uf = UnionFind::new(n);

    // Iterate all edges and Union connected nodes
    for u_idx in 0..n {
        for &v_idx in view.successors(u_idx) {
            uf.union(u_idx, v_idx);
        }
    }

    // Build results
    let mut components = HashMap::new();
    let mut node_component = HashMap::new();

    for i in 0..n {
        let root = uf.find(i);
        let node_id = view.index_to_node[i];

        components.entry(root).or_insert_with(Vec::new).push(node_id);
        node_component.insert(node_id, root);
    }

    WccResult {
        components,
        node_component,
    }
}

/// Louvain configuration
#[derive(Debug, Clone, Copy)]
pub struct LouvainConfig {
    /// Resolution γ (1.0 is standard modularity)
    pub resolution: f64,
    /// Maximum number of aggregation levels
    pub max_passes: usize,
    /// Minimum modularity gain for a node move to be accepted
    pub min_gain: f64,
}

impl Default for LouvainConfig {
    fn default() -> Self {
        Self {
            resolution: 1.0,
            max_passes: 10,
            min_gain: 1e-7,
        }
    }
}

/// Result of Louvain community detection
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LouvainResult {
    /// Communities, each sorted by dense index; ordered by their first member
    pub communities: Vec<Vec<NodeId>>,
    /// Map of NodeId -> position in `communities`
    pub node_community: HashMap<NodeId, usize>,
    /// Weighted modularity of the final partition
    pub modularity: f64,
    /// Number of aggregation levels that moved at least one node
    pub levels: usize,
}

/// One level of the Louvain hierarchy: a weighted graph without self-loops in
/// `adjacency`, with collapsed internal weight kept in `self_loops`.
struct Level {
    adjacency: Vec<Vec<(usize, f64)>>,
    self_loops: Vec<f64>,
}

impl Level {
    fn from_view(view: &GraphView) -> Self {
        let n = view.node_count;
        let mut adjacency = vec![Vec::new(); n];
        let mut self_loops = vec![0.0; n];
        for u in 0..n {
            for (v, w) in view.weighted_successors(u) {
                if u == v {
                    self_loops[u] += w;
                } else {
                    adjacency[u].push((v, w));
                }
            }
        }
        Level { adjacency, self_loops }
    }

    fn len(&self) -> usize {
        self.adjacency.len()
    }

    fn strength(&self, i: usize) -> f64 {
        self.adjacency[i].iter().map(|&(_, w)| w).sum::<f64>() + 2.0 * self.self_loops[i]
    }

    /// Collapse communities into single nodes. `community` must be dense (0..count).
    fn aggregate(&self, community: &[usize], count: usize) -> Level {
        let mut merged: Vec<HashMap<usize, f64>> = vec![HashMap::new(); count];
        let mut self_loops = vec![0.0; count];
        for i in 0..self.len() {
            let ci = community[i];
            self_loops[ci] += self.self_loops[i];
            for &(j, w) in &self.adjacency[i] {
                let cj = community[j];
                if ci == cj {
                    // Each internal edge is seen from both ends
                    self_loops[ci] += w / 2.0;
                } else {
                    *merged[ci].entry(cj).or_insert(0.0) += w;
                }
            }
        }
        let adjacency = merged
            .into_iter()
            .map(|row| {
                let mut row: Vec<(usize, f64)> = row.into_iter().collect();
                row.sort_unstable_by_key(|&(j, _)| j);
                row
            })
            .collect();
        Level { adjacency, self_loops }
    }
}

/// Greedy local moving on one level. Returns dense community labels, the
/// community count and whether any node changed community.
fn local_moving(level: &Level, total: f64, config: &LouvainConfig) -> (Vec<usize>, usize, bool) {
    let n = level.len();
    let strengths: Vec<f64> = (0..n).map(|i| level.strength(i)).collect();
    let mut community: Vec<usize> = (0..n).collect();
    let mut tot = strengths.clone();
    let mut moved_any = false;

    // Sweeps are bounded; each accepted move strictly increases modularity
    for _ in 0..n.max(1) * 10 {
        let mut moved = false;
        for i in 0..n {
            let k_i = strengths[i];
            let current = community[i];
            tot[current] -= k_i;

            let mut links: HashMap<usize, f64> = HashMap::new();
            for &(j, w) in &level.adjacency[i] {
                *links.entry(community[j]).or_insert(0.0) += w;
            }

            let gain = |c: usize, link: f64| link - config.resolution * tot[c] * k_i / total;
            let mut best = current;
            let mut best_gain = gain(current, links.get(&current).copied().unwrap_or(0.0));

            let mut candidates: Vec<(usize, f64)> = links.into_iter().collect();
            candidates.sort_unstable_by_key(|&(c, _)| c);
            for (c, link) in candidates {
                let g = gain(c, link);
                if g > best_gain + config.min_gain {
                    best = c;
                    best_gain = g;
                }
            }

            tot[best] += k_i;
            if best != current {
                community[i] = best;
                moved = true;
                moved_any = true;
            }
        }
        if !moved {
            break;
        }
    }

    // Renumber in order of first appearance
    let mut remap: HashMap<usize, usize> = HashMap::new();
    for c in community.iter_mut() {
        let next = remap.len();
        *c = *remap.entry(*c).or_insert(next);
    }
    (community, remap.len(), moved_any)
}

/// Weighted modularity of a partition (dense labels per node index)
pub fn modularity(view: &GraphView, community: &[usize], resolution: f64) -> f64 {
    let total: f64 = (0..view.node_count).map(|u| view.strength(u)).sum();
    if total <= 0.0 {
        return 0.0;
    }

    let count = community.iter().copied().max().map_or(0, |c| c + 1);
    let mut internal = vec![0.0; count];
    let mut tot = vec![0.0; count];
    for u in 0..view.node_count {
        tot[community[u]] += view.strength(u);
        for (v, w) in view.weighted_successors(u) {
            if community[u] == community[v] {
                internal[community[u]] += w;
            }
        }
    }

    internal
        .iter()
        .zip(&tot)
        .map(|(&l, &t)| l / total - resolution * (t / total).powi(2))
        .sum()
}

/// Louvain community detection on an undirected weighted view.
///
/// Heavier edges pull their endpoints together more strongly. Nodes are
/// visited in index order and ties keep the current community, so the result
/// is deterministic for a given view.
pub fn louvain(view: &GraphView, config: LouvainConfig) -> LouvainResult {
    let n = view.node_count;
    let mut membership: Vec<usize> = (0..n).collect();
    let mut level = Level::from_view(view);
    let total: f64 = (0..level.len()).map(|i| level.strength(i)).sum();
    let mut levels = 0;

    if total > 0.0 {
        for _ in 0..config.max_passes {
            let (community, count, moved) = local_moving(&level, total, &config);
            if !moved {
                break;
            }
            levels += 1;
            for m in membership.iter_mut() {
                *m = community[*m];
            }
            level = level.aggregate(&community, count);
            if count == 1 {
                break;
            }
        }
    }

    // Dense labels in order of first member
    let mut remap: HashMap<usize, usize> = HashMap::new();
    let mut communities: Vec<Vec<NodeId>> = Vec::new();
    let mut labels = vec![0; n];
    let mut node_community = HashMap::with_capacity(n);
    for idx in 0..n {
        let label = *remap.entry(membership[idx]).or_insert_with(|| {
            communities.push(Vec::new());
            communities.len() - 1
        });
        labels[idx] = label;
        let node_id = view.index_to_node[idx];
        communities[label].push(node_id);
        node_community.insert(node_id, label);
    }

    let modularity = modularity(view, &labels, config.resolution);
    tracing::debug!(
        "Louvain finished: {} communities, modularity {:.4}, {} levels",
        communities.len(),
        modularity,
        levels
    );

    LouvainResult {
        communities,
        node_community,
        modularity,
        levels,
    }
}
