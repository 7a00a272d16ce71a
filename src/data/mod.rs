//! Input data model
//!
//! Transaction records and the category table are supplied by external
//! collaborators; this module only fixes their shape.

pub mod category;
pub mod transaction;

pub use category::{CategoryRow, CategoryTable};
pub use transaction::{ProductId, TransactionId, TransactionRecord, TransactionSource};
