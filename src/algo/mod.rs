//! Graph algorithms module
//!
//! Algorithms are implemented in the `basketgraph-algorithms` crate.
//! This module provides the integration/adapter layer: it turns a
//! [`ProductGraph`] into a [`GraphView`] and wraps the algorithms as
//! swappable strategies.

pub mod community;
pub mod roles;

pub use community::{Community, CommunityPartition, CommunityStrategy, LouvainDetector};
pub use roles::{
    BetweennessMetric, ClusteringMetric, NodeMetric, Role, RoleAssignment, RoleClassifier, RoleMap,
};

use crate::graph::ProductGraph;
use basketgraph_algorithms::{GraphView, NodeId as AlgoNodeId};

/// Build an undirected weighted GraphView of the product graph.
///
/// Dense index `i` (and algorithm NodeId `i`) is the product graph's node
/// index `i`. Edge weights are the product graph's non-negative weights.
pub fn build_view(graph: &ProductGraph) -> GraphView {
    let index_to_node: Vec<AlgoNodeId> = (0..graph.node_count() as AlgoNodeId).collect();

    let edges: Vec<(usize, usize, f64)> = graph
        .edges()
        .iter()
        .filter_map(|edge| {
            let u = graph.node_index(edge.pair.first())?;
            let v = graph.node_index(edge.pair.second())?;
            Some((u, v, edge.weight))
        })
        .collect();

    GraphView::undirected(index_to_node, &edges)
}
