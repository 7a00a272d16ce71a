//! Structural role classification
//!
//! Each product is placed in a quadrant by comparing its betweenness
//! centrality and clustering coefficient to the graph-wide means.

use super::build_view;
use crate::data::ProductId;
use crate::graph::ProductGraph;
use basketgraph_algorithms::{betweenness_centrality, clustering_coefficients, BetweennessConfig};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use tracing::debug;

/// Graph -> per-node metric strategy
pub trait NodeMetric: Send + Sync {
    fn name(&self) -> &'static str;
    fn compute(&self, graph: &ProductGraph) -> HashMap<ProductId, f64>;
}

/// Map algorithm node ids (dense product graph indices) back to products
fn by_product(graph: &ProductGraph, scores: HashMap<u64, f64>) -> HashMap<ProductId, f64> {
    scores
        .into_iter()
        .map(|(node, score)| (graph.nodes()[node as usize].clone(), score))
        .collect()
}

/// Normalized weighted betweenness; edge weight is read as distance
#[derive(Debug, Clone, Copy, Default)]
pub struct BetweennessMetric;

impl NodeMetric for BetweennessMetric {
    fn name(&self) -> &'static str {
        "betweenness"
    }

    fn compute(&self, graph: &ProductGraph) -> HashMap<ProductId, f64> {
        let view = build_view(graph);
        by_product(graph, betweenness_centrality(&view, BetweennessConfig { normalized: true }))
    }
}

/// Weighted local clustering coefficient
#[derive(Debug, Clone, Copy, Default)]
pub struct ClusteringMetric;

impl NodeMetric for ClusteringMetric {
    fn name(&self) -> &'static str {
        "clustering"
    }

    fn compute(&self, graph: &ProductGraph) -> HashMap<ProductId, f64> {
        let view = build_view(graph);
        by_product(graph, clustering_coefficients(&view))
    }
}

/// Structural role of a product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Above-mean centrality and clustering
    Hub,
    /// Above-mean centrality, at/below-mean clustering
    Connector,
    /// At/below-mean centrality, above-mean clustering
    Peripheral,
    /// At/below-mean centrality and clustering
    Satellite,
}

impl Role {
    pub fn from_quadrant(above_centrality: bool, above_clustering: bool) -> Self {
        match (above_centrality, above_clustering) {
            (true, true) => Role::Hub,
            (true, false) => Role::Connector,
            (false, true) => Role::Peripheral,
            (false, false) => Role::Satellite,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Hub => "hub",
            Role::Connector => "connector",
            Role::Peripheral => "peripheral",
            Role::Satellite => "satellite",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Role of one product and the metric values behind it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub role: Role,
    pub centrality: f64,
    pub clustering: f64,
}

/// Roles for every product graph node plus the means they were compared against
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoleMap {
    pub assignments: BTreeMap<ProductId, RoleAssignment>,
    pub centrality_mean: f64,
    pub clustering_mean: f64,
}

impl RoleMap {
    pub fn role(&self, product: &ProductId) -> Option<Role> {
        self.assignments.get(product).map(|a| a.role)
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

pub struct RoleClassifier<C: NodeMetric = BetweennessMetric, K: NodeMetric = ClusteringMetric> {
    centrality: C,
    clustering: K,
}

impl RoleClassifier {
    pub fn new() -> Self {
        Self::with_metrics(BetweennessMetric, ClusteringMetric)
    }
}

impl Default for RoleClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: NodeMetric, K: NodeMetric> RoleClassifier<C, K> {
    pub fn with_metrics(centrality: C, clustering: K) -> Self {
        Self { centrality, clustering }
    }

    /// Classify every node. An empty graph yields an empty map.
    pub fn classify(&self, graph: &ProductGraph) -> RoleMap {
        if graph.node_count() == 0 {
            return RoleMap::default();
        }

        let centrality = self.centrality.compute(graph);
        let clustering = self.clustering.compute(graph);
        let value = |scores: &HashMap<ProductId, f64>, product: &ProductId| {
            scores.get(product).copied().unwrap_or(0.0)
        };

        let n = graph.node_count() as f64;
        let centrality_mean = graph.nodes().iter().map(|p| value(&centrality, p)).sum::<f64>() / n;
        let clustering_mean = graph.nodes().iter().map(|p| value(&clustering, p)).sum::<f64>() / n;
        debug!(
            "Role thresholds: mean {} {:.4}, mean {} {:.4}",
            self.centrality.name(),
            centrality_mean,
            self.clustering.name(),
            clustering_mean
        );

        let assignments = graph
            .nodes()
            .iter()
            .map(|product| {
                let c = value(&centrality, product);
                let k = value(&clustering, product);
                let assignment = RoleAssignment {
                    role: Role::from_quadrant(c > centrality_mean, k > clustering_mean),
                    centrality: c,
                    clustering: k,
                };
                (product.clone(), assignment)
            })
            .collect();

        RoleMap {
            assignments,
            centrality_mean,
            clustering_mean,
        }
    }
}
