//! Core type definitions for the product graphs

use crate::data::ProductId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unordered product pair stored in canonical order (`first <= second`).
///
/// Building a pair from `(a, b)` or `(b, a)` yields the same value, so maps
/// keyed by `ProductPair` never hold both orientations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProductPair {
    first: ProductId,
    second: ProductId,
}

impl ProductPair {
    pub fn new(a: ProductId, b: ProductId) -> Self {
        if a <= b {
            ProductPair { first: a, second: b }
        } else {
            ProductPair { first: b, second: a }
        }
    }

    pub fn first(&self) -> &ProductId {
        &self.first
    }

    pub fn second(&self) -> &ProductId {
        &self.second
    }

    pub fn contains(&self, product: &ProductId) -> bool {
        &self.first == product || &self.second == product
    }
}

impl fmt::Display for ProductPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <-> {}", self.first, self.second)
    }
}

/// Relationship inferred between two products
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipType {
    /// Bought together more often than the null model predicts
    Complement,
    /// Bought together less often than the null model predicts
    Substitute,
}

impl RelationshipType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipType::Complement => "complement",
            RelationshipType::Substitute => "substitute",
        }
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
