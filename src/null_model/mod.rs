//! Degree-preserving null model for product co-occurrence
//!
//! Each trial draws a random bipartite graph with the real degree sequences,
//! keeps its largest connected component, maps the component back onto real
//! identities and records, for every pair of products present, how many
//! nodes neighbor both. Trials are independent and run on the rayon pool,
//! each with its own seeded RNG.

pub mod configuration;
pub mod relabel;

pub use configuration::{ConfigurationModel, SampledComponent};
pub use relabel::{
    ComponentRelabeler, IdentityRelabeler, NodeLabel, PositionalRelabeler, Relabeling,
};

use crate::error::{BasketError, BasketResult};
use crate::graph::{BipartiteGraph, ProductPair};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Null distribution of one pair's co-occurrence count
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NullStatistic {
    /// Number of trials in which both products were present
    pub samples: usize,
    pub mean: f64,
    /// Population standard deviation
    pub std: f64,
}

/// Null statistics keyed by canonical product pair
pub type NullStatistics = BTreeMap<ProductPair, NullStatistic>;

/// Outcome of a sampling run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplingSummary {
    pub requested: usize,
    pub completed: usize,
    pub failed: usize,
    pub seed: u64,
}

/// Integer sample tally. Sums are exact, so merging is associative and the
/// result does not depend on how rayon splits the trials.
#[derive(Debug, Clone, Copy, Default)]
struct SampleTally {
    count: u64,
    sum: u64,
    sum_sq: u64,
}

impl SampleTally {
    fn push(&mut self, value: u64) {
        self.count += 1;
        self.sum += value;
        self.sum_sq += value * value;
    }

    fn merge(&mut self, other: &SampleTally) {
        self.count += other.count;
        self.sum += other.sum;
        self.sum_sq += other.sum_sq;
    }

    fn statistic(&self) -> NullStatistic {
        let n = self.count as f64;
        let mean = self.sum as f64 / n;
        let variance = (self.sum_sq as f64 / n - mean * mean).max(0.0);
        NullStatistic {
            samples: self.count as usize,
            mean,
            std: variance.sqrt(),
        }
    }
}

/// Per-trial samples merged across the pool
#[derive(Debug, Default)]
struct NullAccumulator {
    tallies: FxHashMap<(usize, usize), SampleTally>,
    completed: usize,
    failed: usize,
}

impl NullAccumulator {
    fn record(mut self, samples: Vec<((usize, usize), u64)>) -> Self {
        for (key, value) in samples {
            self.tallies.entry(key).or_default().push(value);
        }
        self.completed += 1;
        self
    }

    fn merge(mut self, other: NullAccumulator) -> Self {
        for (key, tally) in other.tallies {
            self.tallies.entry(key).or_default().merge(&tally);
        }
        self.completed += other.completed;
        self.failed += other.failed;
        self
    }
}

/// Draws degree-preserving random graphs and accumulates per-pair null statistics
pub struct NullModelSampler<R: ComponentRelabeler = Relabeling> {
    trials: usize,
    seed: u64,
    min_success_ratio: f64,
    relabeler: R,
}

impl NullModelSampler<Relabeling> {
    pub fn new(trials: usize, seed: u64) -> Self {
        Self::with_relabeler(trials, seed, Relabeling::default())
    }
}

impl<R: ComponentRelabeler> NullModelSampler<R> {
    pub fn with_relabeler(trials: usize, seed: u64, relabeler: R) -> Self {
        Self {
            trials,
            seed,
            min_success_ratio: 0.5,
            relabeler,
        }
    }

    /// Fraction of trials that must succeed (clamped to [0, 1])
    pub fn min_success_ratio(mut self, ratio: f64) -> Self {
        self.min_success_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    /// Run all trials and reduce them to per-pair statistics
    pub fn sample(
        &self,
        graph: &BipartiteGraph,
    ) -> BasketResult<(NullStatistics, SamplingSummary)> {
        if self.trials == 0 {
            return Err(BasketError::InvalidConfig("trials must be at least 1".to_string()));
        }

        let transaction_degrees = graph.transaction_degrees();
        let product_degrees = graph.product_degrees();
        let transaction_stubs: usize = transaction_degrees.iter().sum();
        let product_stubs: usize = product_degrees.iter().sum();
        if transaction_stubs != product_stubs {
            return Err(BasketError::InvalidDegreeSequence {
                transaction_stubs,
                product_stubs,
            });
        }

        info!(
            "Sampling null model: {} trials over {} stubs (seed {})",
            self.trials, transaction_stubs, self.seed
        );

        let accumulator = (0..self.trials)
            .into_par_iter()
            .fold(NullAccumulator::default, |mut acc, trial| {
                let seed = self.seed.wrapping_add(trial as u64);
                match self.run_trial(graph, &transaction_degrees, &product_degrees, seed) {
                    Ok(samples) => acc.record(samples),
                    Err(e) => {
                        debug!("Null model trial {} skipped: {}", trial, e);
                        acc.failed += 1;
                        acc
                    }
                }
            })
            .reduce(NullAccumulator::default, NullAccumulator::merge);

        let required = ((self.trials as f64 * self.min_success_ratio).ceil() as usize).max(1);
        if accumulator.completed < required {
            warn!(
                "Only {} of {} null model trials succeeded",
                accumulator.completed, self.trials
            );
            return Err(BasketError::InsufficientSamples {
                completed: accumulator.completed,
                requested: self.trials,
            });
        }

        let statistics: NullStatistics = accumulator
            .tallies
            .iter()
            .map(|(&(a, b), tally)| {
                let pair = ProductPair::new(graph.product(a).clone(), graph.product(b).clone());
                (pair, tally.statistic())
            })
            .collect();

        info!(
            "Null model complete: {} trials, {} failed, {} product pairs",
            accumulator.completed,
            accumulator.failed,
            statistics.len()
        );

        let summary = SamplingSummary {
            requested: self.trials,
            completed: accumulator.completed,
            failed: accumulator.failed,
            seed: self.seed,
        };
        Ok((statistics, summary))
    }

    /// One trial: generate, reduce to the largest component, relabel and count.
    ///
    /// A component that carries fewer than two product labels has no pair to
    /// sample and fails the trial.
    fn run_trial(
        &self,
        graph: &BipartiteGraph,
        transaction_degrees: &[usize],
        product_degrees: &[usize],
        seed: u64,
    ) -> BasketResult<Vec<((usize, usize), u64)>> {
        let mut rng = StdRng::seed_from_u64(seed);
        let model = ConfigurationModel::generate(transaction_degrees, product_degrees, &mut rng)?;
        let component = model.largest_component();
        let labels = self.relabeler.relabel(&component, graph);

        let products = labels
            .iter()
            .filter(|label| matches!(label, NodeLabel::Product(_)))
            .count();
        if products < 2 {
            return Err(BasketError::DegenerateTrial { products });
        }
        Ok(co_occurrence_samples(&component, &labels))
    }
}

/// Common-neighbor count for every pair of product-labelled positions.
///
/// Keys are product indices in ascending order. Pairs with no common
/// neighbor still produce a zero sample.
fn co_occurrence_samples(
    component: &SampledComponent,
    labels: &[NodeLabel],
) -> Vec<((usize, usize), u64)> {
    let product_at = |position: usize| match labels.get(position) {
        Some(NodeLabel::Product(p)) => Some(*p),
        _ => None,
    };

    let mut counts: FxHashMap<(usize, usize), u64> = FxHashMap::default();
    for neighbors in &component.neighbors {
        let adjacent: Vec<usize> = neighbors.iter().filter_map(|&pos| product_at(pos)).collect();
        for (i, &a) in adjacent.iter().enumerate() {
            for &b in &adjacent[i + 1..] {
                *counts.entry((a.min(b), a.max(b))).or_insert(0) += 1;
            }
        }
    }

    let mut present: Vec<usize> = (0..labels.len()).filter_map(product_at).collect();
    present.sort_unstable();

    let mut samples = Vec::with_capacity(present.len() * present.len().saturating_sub(1) / 2);
    for (i, &a) in present.iter().enumerate() {
        for &b in &present[i + 1..] {
            samples.push(((a, b), counts.get(&(a, b)).copied().unwrap_or(0)));
        }
    }
    samples
}
