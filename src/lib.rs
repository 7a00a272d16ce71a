//! Basketgraph
//!
//! Infers which products are complements (bought together more than chance)
//! and which are substitutes (bought together less than chance) from market
//! basket transactions.
//!
//! # Pipeline
//!
//! - [`graph::BipartiteGraph`]: transactions on one side, products on the other
//! - [`null_model::NullModelSampler`]: degree-preserving random graphs give a
//!   null distribution of co-occurrence for every product pair
//! - [`scoring::RelationshipScorer`]: z-score against the null times a decayed
//!   diffusion score, thresholded into complement / substitute
//! - [`graph::ProductGraph`]: product-only graph of the classified pairs
//! - [`algo`]: Louvain communities and betweenness/clustering roles
//! - [`validation::ExternalValidator`]: community purity against known categories
//! - [`insights::InsightExtractor`]: strongest pairs of each type
//! - [`elasticity::ElasticityEstimator`]: log-log price elasticity per product
//!
//! [`BasketAnalyzer`] runs all of it and returns one [`AnalysisReport`].

pub mod algo;
pub mod config;
pub mod data;
pub mod elasticity;
pub mod error;
pub mod graph;
pub mod insights;
pub mod null_model;
pub mod pipeline;
pub mod scoring;
pub mod validation;

pub use config::{AnalysisConfig, CommunityConfig, InsightConfig, NullModelConfig, ScoringConfig};
pub use data::{CategoryTable, ProductId, TransactionId, TransactionRecord, TransactionSource};
pub use elasticity::{ElasticityEstimate, ElasticityEstimator, InsufficiencyReason};
pub use error::{BasketError, BasketResult};
pub use graph::{BipartiteGraph, ProductEdge, ProductGraph, ProductPair, RelationshipType};
pub use null_model::{NullModelSampler, NullStatistic, NullStatistics, Relabeling};
pub use pipeline::{AnalysisReport, BasketAnalyzer, GraphSummary};
pub use scoring::{RelationshipScore, RelationshipScorer};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
