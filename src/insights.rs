//! Strongest complement and substitute pairs

use crate::graph::{ProductEdge, ProductGraph, RelationshipType};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Headline relationships of a product graph
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InsightReport {
    /// Complements by descending weight
    pub top_complements: Vec<ProductEdge>,
    /// Substitutes by ascending signed weight (most negative first)
    pub top_substitutes: Vec<ProductEdge>,
}

pub struct InsightExtractor {
    top_k: usize,
}

impl InsightExtractor {
    pub fn new(top_k: usize) -> Self {
        Self { top_k }
    }

    /// At most `top_k` edges of each type; ties keep graph edge order
    pub fn extract(&self, graph: &ProductGraph) -> InsightReport {
        let mut complements: Vec<ProductEdge> =
            graph.edges_of_type(RelationshipType::Complement).cloned().collect();
        complements.sort_by(|a, b| {
            b.signed_weight()
                .partial_cmp(&a.signed_weight())
                .unwrap_or(Ordering::Equal)
        });
        complements.truncate(self.top_k);

        let mut substitutes: Vec<ProductEdge> =
            graph.edges_of_type(RelationshipType::Substitute).cloned().collect();
        substitutes.sort_by(|a, b| {
            a.signed_weight()
                .partial_cmp(&b.signed_weight())
                .unwrap_or(Ordering::Equal)
        });
        substitutes.truncate(self.top_k);

        InsightReport {
            top_complements: complements,
            top_substitutes: substitutes,
        }
    }
}

impl Default for InsightExtractor {
    fn default() -> Self {
        Self::new(5)
    }
}
