//! Run configuration
//!
//! Every section deserializes with defaults for missing fields, so a config
//! file only needs to name what it changes.

use crate::error::{BasketError, BasketResult};
use crate::null_model::Relabeling;
use serde::{Deserialize, Serialize};

/// Null model sampling parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NullModelConfig {
    /// Number of random graphs to draw
    pub trials: usize,
    /// Base seed; trial `i` uses `seed + i`. Drawn at random when absent.
    pub seed: Option<u64>,
    /// Fraction of trials that must succeed for the statistics to be usable
    pub min_success_ratio: f64,
    /// How sampled components are mapped back onto real nodes
    pub relabeling: Relabeling,
}

impl Default for NullModelConfig {
    fn default() -> Self {
        Self {
            trials: 1000,
            seed: None,
            min_success_ratio: 0.5,
            relabeling: Relabeling::Positional,
        }
    }
}

/// Relationship scoring parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Diffusion decay α
    pub alpha: f64,
    /// Number of diffusion steps
    pub max_steps: usize,
    /// Significance threshold τ on the combined score
    pub threshold: f64,
    /// Added to the null standard deviation before dividing
    pub epsilon: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            alpha: 0.15,
            max_steps: 3,
            threshold: 1.0,
            epsilon: 1e-10,
        }
    }
}

/// Community detection parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommunityConfig {
    /// Modularity resolution (1.0 is standard modularity)
    pub resolution: f64,
    /// Maximum Louvain aggregation levels
    pub max_passes: usize,
    /// Minimum modularity gain for a node move
    pub min_gain: f64,
}

impl Default for CommunityConfig {
    fn default() -> Self {
        Self {
            resolution: 1.0,
            max_passes: 10,
            min_gain: 1e-7,
        }
    }
}

/// Insight extraction parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightConfig {
    /// Pairs reported per relationship type
    pub top_k: usize,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self { top_k: 5 }
    }
}

/// Full analysis configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub null_model: NullModelConfig,
    pub scoring: ScoringConfig,
    pub community: CommunityConfig,
    pub insights: InsightConfig,
}

impl AnalysisConfig {
    /// Reject parameter values the pipeline cannot run with
    pub fn validate(&self) -> BasketResult<()> {
        if self.null_model.trials == 0 {
            return Err(BasketError::InvalidConfig("trials must be at least 1".to_string()));
        }
        if !(0.0..=1.0).contains(&self.null_model.min_success_ratio) {
            return Err(BasketError::InvalidConfig(format!(
                "min_success_ratio must lie in [0, 1], got {}",
                self.null_model.min_success_ratio
            )));
        }
        if !(self.scoring.alpha > 0.0 && self.scoring.alpha < 1.0) {
            return Err(BasketError::InvalidConfig(format!(
                "alpha must lie in (0, 1), got {}",
                self.scoring.alpha
            )));
        }
        if !(self.scoring.threshold >= 0.0) {
            return Err(BasketError::InvalidConfig(format!(
                "threshold must be non-negative, got {}",
                self.scoring.threshold
            )));
        }
        if !(self.scoring.epsilon > 0.0) {
            return Err(BasketError::InvalidConfig(format!(
                "epsilon must be positive, got {}",
                self.scoring.epsilon
            )));
        }
        if !(self.community.resolution > 0.0) {
            return Err(BasketError::InvalidConfig(format!(
                "resolution must be positive, got {}",
                self.community.resolution
            )));
        }
        Ok(())
    }
}
