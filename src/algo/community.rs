//! Community detection over the product graph
//!
//! Partitioning is weight-aware but type-blind: complement and substitute
//! edges both pull their endpoints together in proportion to their weight.

use super::build_view;
use crate::config::CommunityConfig;
use crate::data::ProductId;
use crate::graph::ProductGraph;
use basketgraph_algorithms::{louvain, LouvainConfig};
use serde::{Deserialize, Serialize};
use tracing::info;

/// A set of products placed together by community detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Community {
    pub id: usize,
    pub members: Vec<ProductId>,
}

impl Community {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Disjoint communities plus the modularity they achieve
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommunityPartition {
    pub communities: Vec<Community>,
    pub modularity: f64,
}

impl CommunityPartition {
    /// Community holding `product`, if any
    pub fn community_of(&self, product: &ProductId) -> Option<&Community> {
        self.communities.iter().find(|c| c.members.contains(product))
    }
}

/// Graph -> partition strategy
pub trait CommunityStrategy: Send + Sync {
    fn detect(&self, graph: &ProductGraph) -> CommunityPartition;
}

/// Weighted Louvain modularity optimisation
#[derive(Debug, Clone, Copy)]
pub struct LouvainDetector {
    config: LouvainConfig,
}

impl LouvainDetector {
    pub fn new(config: &CommunityConfig) -> Self {
        Self {
            config: LouvainConfig {
                resolution: config.resolution,
                max_passes: config.max_passes,
                min_gain: config.min_gain,
            },
        }
    }
}

impl Default for LouvainDetector {
    fn default() -> Self {
        Self::new(&CommunityConfig::default())
    }
}

impl CommunityStrategy for LouvainDetector {
    fn detect(&self, graph: &ProductGraph) -> CommunityPartition {
        if graph.edge_count() == 0 {
            return CommunityPartition::default();
        }

        let view = build_view(graph);
        let result = louvain(&view, self.config);

        let communities: Vec<Community> = result
            .communities
            .into_iter()
            .enumerate()
            .map(|(id, nodes)| Community {
                id,
                members: nodes
                    .into_iter()
                    .map(|node| graph.nodes()[node as usize].clone())
                    .collect(),
            })
            .collect();

        info!(
            "Detected {} communities (modularity {:.4})",
            communities.len(),
            result.modularity
        );
        CommunityPartition {
            communities,
            modularity: result.modularity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{ProductPair, RelationshipType};
    use std::collections::HashSet;

    fn edge(graph: &mut ProductGraph, a: &str, b: &str, w: f64, t: RelationshipType) {
        graph.add_edge(ProductPair::new(a.into(), b.into()), w, t);
    }

    fn two_clusters() -> ProductGraph {
        let mut graph = ProductGraph::new();
        edge(&mut graph, "chips", "salsa", 5.0, RelationshipType::Complement);
        edge(&mut graph, "salsa", "beer", 4.0, RelationshipType::Complement);
        edge(&mut graph, "chips", "beer", 4.5, RelationshipType::Complement);
        edge(&mut graph, "pasta", "sauce", 5.0, RelationshipType::Complement);
        edge(&mut graph, "sauce", "parmesan", 4.0, RelationshipType::Complement);
        edge(&mut graph, "pasta", "parmesan", 4.0, RelationshipType::Complement);
        edge(&mut graph, "beer", "pasta", 0.2, RelationshipType::Substitute);
        graph
    }

    #[test]
    fn test_empty_graph_has_no_communities() {
        let partition = LouvainDetector::default().detect(&ProductGraph::new());
        assert!(partition.communities.is_empty());
        assert_eq!(partition.modularity, 0.0);
    }

    #[test]
    fn test_two_clusters() {
        let graph = two_clusters();
        let partition = LouvainDetector::default().detect(&graph);

        assert_eq!(partition.communities.len(), 2);
        assert!(partition.modularity > 0.3);

        let snacks = partition.community_of(&"chips".into()).unwrap();
        let mut members: Vec<&str> = snacks.members.iter().map(|p| p.as_str()).collect();
        members.sort_unstable();
        assert_eq!(members, vec!["beer", "chips", "salsa"]);
        assert_ne!(
            partition.community_of(&"pasta".into()).unwrap().id,
            snacks.id
        );
    }

    #[test]
    fn test_communities_are_disjoint() {
        let partition = LouvainDetector::default().detect(&two_clusters());
        let mut seen = HashSet::new();
        for community in &partition.communities {
            for member in &community.members {
                assert!(seen.insert(member.clone()), "{} placed twice", member);
            }
        }
        assert_eq!(seen.len(), 6);
    }
}
