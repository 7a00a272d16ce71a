//! Mapping generated component nodes back onto real identities

use super::configuration::SampledComponent;
use crate::graph::BipartiteGraph;
use serde::{Deserialize, Serialize};

/// Identity assigned to a generated node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeLabel {
    /// Transaction index in the real graph
    Transaction(usize),
    /// Product index in the real graph
    Product(usize),
}

impl NodeLabel {
    /// Label of a unified index of the real graph
    fn of_unified(graph: &BipartiteGraph, node: usize) -> Self {
        let offset = graph.transaction_count();
        if node < offset {
            NodeLabel::Transaction(node)
        } else {
            NodeLabel::Product(node - offset)
        }
    }
}

/// Assigns a real identity to every position of a sampled component
pub trait ComponentRelabeler: Send + Sync {
    /// One label per component position
    fn relabel(&self, component: &SampledComponent, graph: &BipartiteGraph) -> Vec<NodeLabel>;
}

/// Position `k` of the component takes the `k`-th node of the real graph
/// (transactions first, then products), truncated to the component size.
///
/// This ignores which real node a generated slot was built from. Once the
/// component is smaller than the whole graph, labels shift: a slot built for a
/// product can be read as a transaction and vice versa, and degrees no longer
/// line up with the identities they carry. Kept as the default for
/// comparability with earlier results; [`IdentityRelabeler`] is the
/// degree-faithful alternative.
#[derive(Debug, Clone, Copy, Default)]
pub struct PositionalRelabeler;

impl ComponentRelabeler for PositionalRelabeler {
    fn relabel(&self, component: &SampledComponent, graph: &BipartiteGraph) -> Vec<NodeLabel> {
        (0..component.len().min(graph.node_count()))
            .map(|position| NodeLabel::of_unified(graph, position))
            .collect()
    }
}

/// Each generated slot keeps the identity of the real node whose degree it was built from
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityRelabeler;

impl ComponentRelabeler for IdentityRelabeler {
    fn relabel(&self, component: &SampledComponent, graph: &BipartiteGraph) -> Vec<NodeLabel> {
        component
            .nodes
            .iter()
            .map(|&node| NodeLabel::of_unified(graph, node))
            .collect()
    }
}

/// Relabeling strategy selectable from configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relabeling {
    #[default]
    Positional,
    Identity,
}

impl ComponentRelabeler for Relabeling {
    fn relabel(&self, component: &SampledComponent, graph: &BipartiteGraph) -> Vec<NodeLabel> {
        match self {
            Relabeling::Positional => PositionalRelabeler.relabel(component, graph),
            Relabeling::Identity => IdentityRelabeler.relabel(component, graph),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::TransactionRecord;

    fn graph() -> BipartiteGraph {
        // 2 transactions, 2 products -> unified nodes t0 t1 p0 p1
        BipartiteGraph::build(&[
            TransactionRecord::new(1, "a", 1, 1.0),
            TransactionRecord::new(2, "b", 1, 1.0),
        ])
        .unwrap()
    }

    fn component(nodes: Vec<usize>) -> SampledComponent {
        let neighbors = vec![Vec::new(); nodes.len()];
        SampledComponent { nodes, neighbors }
    }

    #[test]
    fn test_positional_ignores_generated_identity() {
        // Component made of generated t1 and p1
        let labels = PositionalRelabeler.relabel(&component(vec![1, 3]), &graph());
        assert_eq!(labels, vec![NodeLabel::Transaction(0), NodeLabel::Transaction(1)]);
    }

    #[test]
    fn test_positional_is_identity_for_full_component() {
        let full = component(vec![0, 1, 2, 3]);
        assert_eq!(
            PositionalRelabeler.relabel(&full, &graph()),
            IdentityRelabeler.relabel(&full, &graph())
        );
    }

    #[test]
    fn test_identity_keeps_generated_identity() {
        let labels = IdentityRelabeler.relabel(&component(vec![1, 3]), &graph());
        assert_eq!(labels, vec![NodeLabel::Transaction(1), NodeLabel::Product(1)]);
    }
}
