//! Error types for basket analysis

use thiserror::Error;

/// Errors that abort an analysis run.
///
/// Per-pair and per-product shortfalls are not errors: they surface as
/// missing classifications or [`crate::ElasticityEstimate::InsufficientData`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BasketError {
    /// No transaction records were supplied
    #[error("Transaction input is empty")]
    EmptyInput,

    /// A record failed validation
    #[error("Invalid record (transaction {transaction_id}, product {product_id}): {reason}")]
    InvalidRecord {
        transaction_id: u64,
        product_id: String,
        reason: String,
    },

    /// The two sides' stub totals differ, so no bipartite configuration model exists
    #[error("Invalid degree sequences: {transaction_stubs} vs {product_stubs} stubs")]
    InvalidDegreeSequence {
        transaction_stubs: usize,
        product_stubs: usize,
    },

    /// A null-model trial left fewer than two products to compare
    #[error("Degenerate null-model trial: component holds {products} product(s), need at least 2")]
    DegenerateTrial { products: usize },

    /// Too few null-model trials succeeded
    #[error("Insufficient null samples: {completed} of {requested} trials succeeded")]
    InsufficientSamples {
        completed: usize,
        requested: usize,
    },

    /// Configuration rejected by validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type BasketResult<T> = Result<T, BasketError>;
