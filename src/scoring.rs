//! Relationship scoring
//!
//! For each product pair with a null distribution, the observed
//! co-occurrence is turned into a z-score against the null model and
//! multiplied by a decayed random-walk diffusion score. The sign of the
//! product decides complement versus substitute.

use crate::config::ScoringConfig;
use crate::graph::{BipartiteGraph, ProductPair, RelationshipType};
use crate::null_model::{NullStatistic, NullStatistics};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::info;

/// Scoring outcome for one product pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipScore {
    pub pair: ProductPair,
    /// Transactions containing both products
    pub actual: usize,
    pub null_mean: f64,
    pub null_std: f64,
    pub z_score: f64,
    pub diffusion: f64,
    /// `z_score * diffusion`
    pub combined: f64,
    /// `None` when `|combined|` does not exceed the threshold
    pub classification: Option<RelationshipType>,
}

/// Classify a combined score against threshold τ.
///
/// Only the sign of `combined` separates the two relationship types, so a
/// pair can never be both.
pub fn classify(combined: f64, threshold: f64) -> Option<RelationshipType> {
    if combined > threshold {
        Some(RelationshipType::Complement)
    } else if combined < -threshold {
        Some(RelationshipType::Substitute)
    } else {
        None
    }
}

pub struct RelationshipScorer {
    config: ScoringConfig,
}

impl RelationshipScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Score every pair that has null statistics, in pair order.
    ///
    /// Pairs whose products are missing from `graph` are skipped.
    pub fn score(
        &self,
        graph: &BipartiteGraph,
        statistics: &NullStatistics,
    ) -> Vec<RelationshipScore> {
        let pairs: Vec<(&ProductPair, &NullStatistic)> = statistics.iter().collect();
        let scores: Vec<RelationshipScore> = pairs
            .par_iter()
            .filter_map(|&(pair, stat)| self.score_pair(graph, pair, stat))
            .collect();

        let complements = scores
            .iter()
            .filter(|s| s.classification == Some(RelationshipType::Complement))
            .count();
        let substitutes = scores
            .iter()
            .filter(|s| s.classification == Some(RelationshipType::Substitute))
            .count();
        info!(
            "Scored {} pairs: {} complements, {} substitutes",
            scores.len(),
            complements,
            substitutes
        );
        scores
    }

    /// Score a single pair against its null statistic
    pub fn score_pair(
        &self,
        graph: &BipartiteGraph,
        pair: &ProductPair,
        stat: &NullStatistic,
    ) -> Option<RelationshipScore> {
        let a = graph.product_index(pair.first())?;
        let b = graph.product_index(pair.second())?;

        let actual = graph.common_neighbors(a, b);
        let z_score = (actual as f64 - stat.mean) / (stat.std + self.config.epsilon);
        let diffusion = self.diffusion_score(graph, a, b);
        let combined = z_score * diffusion;

        Some(RelationshipScore {
            pair: pair.clone(),
            actual,
            null_mean: stat.mean,
            null_std: stat.std,
            z_score,
            diffusion,
            combined,
            classification: classify(combined, self.config.threshold),
        })
    }

    /// Decayed overlap between a walk frontier started at product `a` and the
    /// transactions of product `b`.
    ///
    /// The frontier starts at `a`'s transactions. Each step replaces it with
    /// the transactions two hops away (transaction -> product -> transaction),
    /// so it never leaves the transaction side. Step `k` adds
    /// `α(1-α)^k · |frontier ∩ N(b)|`.
    pub fn diffusion_score(&self, graph: &BipartiteGraph, a: usize, b: usize) -> f64 {
        let alpha = self.config.alpha;
        let target: HashSet<usize> = graph.product_neighbors(b).iter().copied().collect();
        let mut frontier: HashSet<usize> = graph.product_neighbors(a).iter().copied().collect();

        let mut score = 0.0;
        for step in 0..self.config.max_steps {
            let overlap = frontier.iter().filter(|t| target.contains(t)).count();
            score += alpha * (1.0 - alpha).powi(step as i32) * overlap as f64;

            if step + 1 < self.config.max_steps {
                frontier = frontier
                    .iter()
                    .flat_map(|&t| graph.transaction_neighbors(t))
                    .flat_map(|&p| graph.product_neighbors(p))
                    .copied()
                    .collect();
            }
        }
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::TransactionRecord;

    fn graph() -> BipartiteGraph {
        // t1: a b, t2: a b, t3: c hub, t4: a hub
        BipartiteGraph::build(&[
            TransactionRecord::new(1, "a", 1, 1.0),
            TransactionRecord::new(1, "b", 1, 1.0),
            TransactionRecord::new(2, "a", 1, 1.0),
            TransactionRecord::new(2, "b", 1, 1.0),
            TransactionRecord::new(3, "c", 1, 1.0),
            TransactionRecord::new(3, "hub", 1, 1.0),
            TransactionRecord::new(4, "a", 1, 1.0),
            TransactionRecord::new(4, "hub", 1, 1.0),
        ])
        .unwrap()
    }

    fn idx(graph: &BipartiteGraph, id: &str) -> usize {
        graph.product_index(&id.into()).unwrap()
    }

    #[test]
    fn test_classify_is_exclusive() {
        for combined in [-5.0, -1.0, -0.5, 0.0, 0.5, 1.0, 5.0] {
            let class = classify(combined, 1.0);
            match class {
                Some(RelationshipType::Complement) => assert!(combined > 1.0),
                Some(RelationshipType::Substitute) => assert!(combined < -1.0),
                None => assert!(combined.abs() <= 1.0),
            }
        }
    }

    #[test]
    fn test_diffusion_direct_overlap() {
        let graph = graph();
        let scorer = RelationshipScorer::new(ScoringConfig {
            max_steps: 1,
            ..ScoringConfig::default()
        });
        // a and b share two transactions
        let score = scorer.diffusion_score(&graph, idx(&graph, "a"), idx(&graph, "b"));
        assert!((score - 0.15 * 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_diffusion_reaches_through_shared_products() {
        let graph = graph();
        let scorer = RelationshipScorer::new(ScoringConfig::default());
        // a and c never co-occur; t4 -> hub -> t3 reaches c at step 1, and the
        // step 2 frontier (every transaction) still holds t3
        let score = scorer.diffusion_score(&graph, idx(&graph, "a"), idx(&graph, "c"));
        let expected = 0.15 * 0.85 + 0.15 * 0.85 * 0.85;
        assert!((score - expected).abs() < 1e-12);
    }

    #[test]
    fn test_every_step_counts() {
        let graph = graph();
        let (a, b) = (idx(&graph, "a"), idx(&graph, "b"));
        let score = |max_steps| {
            RelationshipScorer::new(ScoringConfig { max_steps, ..ScoringConfig::default() })
                .diffusion_score(&graph, a, b)
        };

        // Step 1 frontier {t1, t2, t3, t4} still overlaps b's {t1, t2}
        assert!((score(1) - 0.15 * 2.0).abs() < 1e-12);
        assert!((score(2) - (0.15 * 2.0 + 0.15 * 0.85 * 2.0)).abs() < 1e-12);
        assert!(score(3) > score(2));
    }

    #[test]
    fn test_score_pair_signs() {
        let graph = graph();
        let scorer = RelationshipScorer::new(ScoringConfig::default());

        let ab = ProductPair::new("a".into(), "b".into());
        let high = scorer
            .score_pair(&graph, &ab, &NullStatistic { samples: 10, mean: 0.2, std: 0.4 })
            .unwrap();
        assert_eq!(high.actual, 2);
        assert!(high.z_score > 0.0);
        assert_eq!(high.classification, Some(RelationshipType::Complement));

        let ac = ProductPair::new("a".into(), "c".into());
        let low = scorer
            .score_pair(&graph, &ac, &NullStatistic { samples: 10, mean: 1.5, std: 0.1 })
            .unwrap();
        assert_eq!(low.actual, 0);
        assert!(low.combined < -1.0);
        assert_eq!(low.classification, Some(RelationshipType::Substitute));
    }

    #[test]
    fn test_zero_variance_is_guarded() {
        let graph = graph();
        let scorer = RelationshipScorer::new(ScoringConfig::default());
        let ab = ProductPair::new("a".into(), "b".into());
        let score = scorer
            .score_pair(&graph, &ab, &NullStatistic { samples: 3, mean: 2.0, std: 0.0 })
            .unwrap();
        assert_eq!(score.z_score, 0.0);
        assert!(score.combined.is_finite());
        assert_eq!(score.classification, None);
    }

    #[test]
    fn test_unknown_products_are_skipped() {
        let graph = graph();
        let scorer = RelationshipScorer::new(ScoringConfig::default());
        let mut stats = NullStatistics::new();
        stats.insert(
            ProductPair::new("a".into(), "ghost".into()),
            NullStatistic { samples: 1, mean: 0.0, std: 0.0 },
        );
        stats.insert(
            ProductPair::new("a".into(), "b".into()),
            NullStatistic { samples: 1, mean: 0.0, std: 1.0 },
        );
        let scores = scorer.score(&graph, &stats);
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].pair, ProductPair::new("a".into(), "b".into()));
    }
}
