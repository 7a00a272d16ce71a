//! Price elasticity of demand
//!
//! Per product, ordinary least squares of `ln(quantity)` on `ln(price)` with
//! an intercept. The slope is the elasticity estimate.

use crate::data::{ProductId, TransactionRecord};
use ndarray::Array1;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Why a product could not be fitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsufficiencyReason {
    /// Fewer usable observations than the minimum
    TooFewObservations,
    /// Every observation has the same price, so the slope is undefined
    NoPriceVariation,
}

/// Elasticity fit for one product
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ElasticityEstimate {
    Estimated {
        elasticity: f64,
        intercept: f64,
        r_squared: f64,
        observations: usize,
    },
    InsufficientData {
        observations: usize,
        reason: InsufficiencyReason,
    },
}

impl ElasticityEstimate {
    /// The slope, when one could be fitted
    pub fn elasticity(&self) -> Option<f64> {
        match self {
            ElasticityEstimate::Estimated { elasticity, .. } => Some(*elasticity),
            ElasticityEstimate::InsufficientData { .. } => None,
        }
    }

    pub fn is_insufficient(&self) -> bool {
        matches!(self, ElasticityEstimate::InsufficientData { .. })
    }
}

/// Variance of `ln(price)` at or below this is treated as no variation
const MIN_LOG_PRICE_VARIANCE: f64 = 1e-12;

pub struct ElasticityEstimator {
    min_observations: usize,
}

impl ElasticityEstimator {
    pub fn new() -> Self {
        Self { min_observations: 2 }
    }

    /// Estimate every product's elasticity from its own records
    pub fn estimate(
        &self,
        records: &[TransactionRecord],
    ) -> BTreeMap<ProductId, ElasticityEstimate> {
        let mut grouped: BTreeMap<&ProductId, (Vec<f64>, Vec<f64>)> = BTreeMap::new();
        for record in records {
            let (prices, quantities) = grouped.entry(&record.product_id).or_default();
            prices.push(record.price);
            quantities.push(record.quantity as f64);
        }

        let estimates: BTreeMap<ProductId, ElasticityEstimate> = grouped
            .into_par_iter()
            .map(|(product, (prices, quantities))| {
                (product.clone(), self.fit(&prices, &quantities))
            })
            .collect();

        let insufficient = estimates.values().filter(|e| e.is_insufficient()).count();
        if insufficient > 0 {
            warn!(
                "{} of {} products lack data for an elasticity fit",
                insufficient,
                estimates.len()
            );
        }
        info!("Estimated elasticities for {} products", estimates.len() - insufficient);
        estimates
    }

    /// Log-log OLS fit. Observations with a non-positive price or quantity are dropped.
    pub fn fit(&self, prices: &[f64], quantities: &[f64]) -> ElasticityEstimate {
        let (log_prices, log_quantities): (Vec<f64>, Vec<f64>) = prices
            .iter()
            .zip(quantities)
            .filter(|&(&p, &q)| p > 0.0 && q > 0.0 && p.is_finite() && q.is_finite())
            .map(|(&p, &q)| (p.ln(), q.ln()))
            .unzip();

        let observations = log_prices.len();
        if observations < self.min_observations.max(2) {
            return ElasticityEstimate::InsufficientData {
                observations,
                reason: InsufficiencyReason::TooFewObservations,
            };
        }

        let x = Array1::from(log_prices);
        let y = Array1::from(log_quantities);
        let n = observations as f64;
        let x_mean = x.sum() / n;
        let y_mean = y.sum() / n;
        let dx = &x - x_mean;
        let dy = &y - y_mean;

        let sxx = dx.dot(&dx);
        if sxx / n <= MIN_LOG_PRICE_VARIANCE {
            return ElasticityEstimate::InsufficientData {
                observations,
                reason: InsufficiencyReason::NoPriceVariation,
            };
        }

        let slope = dx.dot(&dy) / sxx;
        let intercept = y_mean - slope * x_mean;

        let residuals = &y - &(&x * slope + intercept);
        let ss_res = residuals.dot(&residuals);
        let ss_tot = dy.dot(&dy);
        let r_squared = if ss_tot > 0.0 { 1.0 - ss_res / ss_tot } else { 1.0 };

        ElasticityEstimate::Estimated {
            elasticity: slope,
            intercept,
            r_squared,
            observations,
        }
    }
}

impl Default for ElasticityEstimator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recovers_exact_power_law() {
        // quantity = price^-2
        let prices = [1.0, 0.5, 0.25, 0.1];
        let quantities = [1.0, 4.0, 16.0, 100.0];
        let estimate = ElasticityEstimator::new().fit(&prices, &quantities);

        match estimate {
            ElasticityEstimate::Estimated { elasticity, intercept, r_squared, observations } => {
                assert!((elasticity + 2.0).abs() < 1e-9);
                assert!(intercept.abs() < 1e-9);
                assert!((r_squared - 1.0).abs() < 1e-9);
                assert_eq!(observations, 4);
            }
            other => panic!("expected a fit, got {:?}", other),
        }
    }

    #[test]
    fn test_estimate_from_records() {
        // quantity = price^-1.5 for "tea"; "salt" never changes price
        let records = vec![
            TransactionRecord::new(1, "tea", 1, 1.0),
            TransactionRecord::new(2, "tea", 8, 0.25),
            TransactionRecord::new(3, "tea", 125, 0.04),
            TransactionRecord::new(4, "tea", 1000, 0.01),
            TransactionRecord::new(1, "salt", 1, 0.8),
            TransactionRecord::new(2, "salt", 3, 0.8),
            TransactionRecord::new(5, "pepper", 2, 1.2),
        ];
        let estimates = ElasticityEstimator::new().estimate(&records);

        assert_eq!(estimates.len(), 3);
        let tea = estimates[&ProductId::from("tea")].elasticity().unwrap();
        assert!((tea + 1.5).abs() < 1e-9);

        assert_eq!(
            estimates[&ProductId::from("salt")],
            ElasticityEstimate::InsufficientData {
                observations: 2,
                reason: InsufficiencyReason::NoPriceVariation
            }
        );
        assert_eq!(
            estimates[&ProductId::from("pepper")],
            ElasticityEstimate::InsufficientData {
                observations: 1,
                reason: InsufficiencyReason::TooFewObservations
            }
        );
    }

    #[test]
    fn test_non_positive_observations_are_dropped() {
        let estimate = ElasticityEstimator::new().fit(&[1.0, -2.0, 0.0], &[3.0, 1.0, 4.0]);
        assert_eq!(
            estimate,
            ElasticityEstimate::InsufficientData {
                observations: 1,
                reason: InsufficiencyReason::TooFewObservations
            }
        );
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(ElasticityEstimate::InsufficientData {
            observations: 0,
            reason: InsufficiencyReason::TooFewObservations,
        })
        .unwrap();
        assert_eq!(json["status"], "insufficient_data");
        assert_eq!(json["reason"], "too_few_observations");
    }
}
