//! End-to-end basket analysis
//!
//! transactions -> bipartite graph -> null model -> scores -> product graph
//! -> {communities, roles} -> {validation, insights}, with elasticity fitted
//! straight from the transactions alongside.

use crate::algo::{
    build_view, CommunityPartition, CommunityStrategy, LouvainDetector, RoleClassifier, RoleMap,
};
use crate::config::AnalysisConfig;
use crate::data::{CategoryTable, ProductId, TransactionSource};
use crate::elasticity::{ElasticityEstimate, ElasticityEstimator};
use crate::error::BasketResult;
use crate::graph::{BipartiteGraph, ProductGraph, RelationshipType};
use crate::insights::{InsightExtractor, InsightReport};
use crate::null_model::{NullModelSampler, SamplingSummary};
use crate::scoring::{RelationshipScore, RelationshipScorer};
use crate::validation::{ExternalValidator, ValidationRecord};
use basketgraph_algorithms::count_triangles;
use rand::Rng;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

/// Sizes of the graphs built during a run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphSummary {
    pub transactions: usize,
    pub products: usize,
    pub bipartite_edges: usize,
    pub product_nodes: usize,
    pub product_edges: usize,
    pub product_triangles: usize,
}

/// Everything one analysis run produces
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub config: AnalysisConfig,
    pub sampling: SamplingSummary,
    pub graph: GraphSummary,
    pub complements: Vec<RelationshipScore>,
    pub substitutes: Vec<RelationshipScore>,
    pub communities: CommunityPartition,
    pub roles: RoleMap,
    pub validation: Vec<ValidationRecord>,
    pub insights: InsightReport,
    pub elasticities: BTreeMap<ProductId, ElasticityEstimate>,
}

impl AnalysisReport {
    /// Classification recorded for a pair, if any
    pub fn relationship(&self, a: &ProductId, b: &ProductId) -> Option<RelationshipType> {
        let find = |scores: &[RelationshipScore]| {
            scores
                .iter()
                .find(|s| s.pair.contains(a) && s.pair.contains(b) && a != b)
                .and_then(|s| s.classification)
        };
        find(&self.complements).or_else(|| find(&self.substitutes))
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Runs the full analysis with one configuration
pub struct BasketAnalyzer {
    config: AnalysisConfig,
    communities: Box<dyn CommunityStrategy>,
}

impl BasketAnalyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        let communities = Box::new(LouvainDetector::new(&config.community));
        Self { config, communities }
    }

    /// Replace the community detection strategy
    pub fn with_community_strategy(mut self, strategy: Box<dyn CommunityStrategy>) -> Self {
        self.communities = strategy;
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn run<S: TransactionSource + ?Sized>(
        &self,
        source: &S,
        categories: &CategoryTable,
    ) -> BasketResult<AnalysisReport> {
        self.config.validate()?;
        let records = source.transactions();

        let bipartite = BipartiteGraph::build(&records)?;

        let mut config = self.config.clone();
        let seed = *config
            .null_model
            .seed
            .get_or_insert_with(|| rand::thread_rng().gen());
        let sampler = NullModelSampler::with_relabeler(
            config.null_model.trials,
            seed,
            config.null_model.relabeling,
        )
        .min_success_ratio(config.null_model.min_success_ratio);
        let (statistics, sampling) = sampler.sample(&bipartite)?;

        let scores = RelationshipScorer::new(config.scoring.clone()).score(&bipartite, &statistics);
        let product_graph = ProductGraph::project(&scores);

        let communities = self.communities.detect(&product_graph);
        let roles = RoleClassifier::new().classify(&product_graph);
        let validation = ExternalValidator::new(categories).validate(&communities);
        let insights = InsightExtractor::new(config.insights.top_k).extract(&product_graph);
        let elasticities = ElasticityEstimator::new().estimate(&records);

        let graph = GraphSummary {
            transactions: bipartite.transaction_count(),
            products: bipartite.product_count(),
            bipartite_edges: bipartite.edge_count(),
            product_nodes: product_graph.node_count(),
            product_edges: product_graph.edge_count(),
            product_triangles: count_triangles(&build_view(&product_graph)),
        };

        let (complements, substitutes) = split_classified(scores);
        info!(
            "Analysis complete: {} complements, {} substitutes, {} communities",
            complements.len(),
            substitutes.len(),
            communities.communities.len()
        );

        Ok(AnalysisReport {
            config,
            sampling,
            graph,
            complements,
            substitutes,
            communities,
            roles,
            validation,
            insights,
            elasticities,
        })
    }
}

impl Default for BasketAnalyzer {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

fn split_classified(
    scores: Vec<RelationshipScore>,
) -> (Vec<RelationshipScore>, Vec<RelationshipScore>) {
    let mut complements = Vec::new();
    let mut substitutes = Vec::new();
    for score in scores {
        match score.classification {
            Some(RelationshipType::Complement) => complements.push(score),
            Some(RelationshipType::Substitute) => substitutes.push(score),
            None => {}
        }
    }
    (complements, substitutes)
}
