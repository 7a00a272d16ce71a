//! Product-only relationship graph

use super::types::{ProductPair, RelationshipType};
use crate::data::ProductId;
use crate::scoring::RelationshipScore;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A classified relationship between two products
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductEdge {
    pub pair: ProductPair,
    /// `|combined score|`, never negative
    pub weight: f64,
    pub relationship: RelationshipType,
}

impl ProductEdge {
    /// Weight carrying the relationship's sign: negative for substitutes
    pub fn signed_weight(&self) -> f64 {
        match self.relationship {
            RelationshipType::Complement => self.weight,
            RelationshipType::Substitute => -self.weight,
        }
    }
}

/// Undirected, weighted, edge-typed product graph.
///
/// Nodes are the products touched by at least one classified pair; there is
/// at most one edge per pair.
#[derive(Debug, Clone, Default)]
pub struct ProductGraph {
    nodes: IndexSet<ProductId>,
    edges: Vec<ProductEdge>,
    edge_index: HashMap<ProductPair, usize>,
}

impl ProductGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Project classified scores into a product graph. Unclassified pairs are skipped.
    pub fn project<'a>(scores: impl IntoIterator<Item = &'a RelationshipScore>) -> Self {
        let mut graph = ProductGraph::new();
        for score in scores {
            if let Some(relationship) = score.classification {
                graph.add_edge(score.pair.clone(), score.combined.abs(), relationship);
            }
        }
        graph
    }

    /// Insert an edge, replacing any existing edge for the same pair
    pub fn add_edge(&mut self, pair: ProductPair, weight: f64, relationship: RelationshipType) {
        self.nodes.insert(pair.first().clone());
        self.nodes.insert(pair.second().clone());

        let edge = ProductEdge {
            pair: pair.clone(),
            weight: weight.abs(),
            relationship,
        };
        match self.edge_index.get(&pair) {
            Some(&idx) => self.edges[idx] = edge,
            None => {
                self.edge_index.insert(pair, self.edges.len());
                self.edges.push(edge);
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn nodes(&self) -> &IndexSet<ProductId> {
        &self.nodes
    }

    pub fn node_index(&self, product: &ProductId) -> Option<usize> {
        self.nodes.get_index_of(product)
    }

    pub fn edges(&self) -> &[ProductEdge] {
        &self.edges
    }

    pub fn edge(&self, a: &ProductId, b: &ProductId) -> Option<&ProductEdge> {
        let pair = ProductPair::new(a.clone(), b.clone());
        self.edge_index.get(&pair).map(|&idx| &self.edges[idx])
    }

    pub fn edges_of_type(
        &self,
        relationship: RelationshipType,
    ) -> impl Iterator<Item = &ProductEdge> {
        self.edges.iter().filter(move |e| e.relationship == relationship)
    }
}
