//! Transaction records

use crate::error::{BasketError, BasketResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Transaction identifier (>= 1)
pub type TransactionId = u64;

/// Product identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    pub fn new(id: impl Into<String>) -> Self {
        ProductId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ProductId {
    fn from(s: &str) -> Self {
        ProductId(s.to_string())
    }
}

impl From<String> for ProductId {
    fn from(s: String) -> Self {
        ProductId(s)
    }
}

/// One line of a transaction: a product bought in some quantity at some price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub transaction_id: TransactionId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub price: f64,
}

impl TransactionRecord {
    pub fn new(
        transaction_id: TransactionId,
        product_id: impl Into<ProductId>,
        quantity: u32,
        price: f64,
    ) -> Self {
        Self {
            transaction_id,
            product_id: product_id.into(),
            quantity,
            price,
        }
    }

    /// Check the record's field ranges
    pub fn validate(&self) -> BasketResult<()> {
        let reason = if self.transaction_id == 0 {
            Some("transaction id must be at least 1")
        } else if self.quantity == 0 {
            Some("quantity must be positive")
        } else if !(self.price.is_finite() && self.price > 0.0) {
            Some("price must be a positive finite number")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(BasketError::InvalidRecord {
                transaction_id: self.transaction_id,
                product_id: self.product_id.to_string(),
                reason: reason.to_string(),
            }),
            None => Ok(()),
        }
    }
}

/// Supplier of transaction records
pub trait TransactionSource {
    fn transactions(&self) -> Vec<TransactionRecord>;
}

impl TransactionSource for Vec<TransactionRecord> {
    fn transactions(&self) -> Vec<TransactionRecord> {
        self.clone()
    }
}

impl TransactionSource for [TransactionRecord] {
    fn transactions(&self) -> Vec<TransactionRecord> {
        self.to_vec()
    }
}
