//! External product category table

use super::transaction::ProductId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One row of the category table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRow {
    pub product_id: ProductId,
    pub category: String,
}

/// Product -> category lookup that remembers row order.
///
/// Row order is the tie-break order when two categories are equally common
/// within a community. A product listed twice keeps its first row position
/// and takes the later category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<CategoryRow>", into = "Vec<CategoryRow>")]
pub struct CategoryTable {
    rows: IndexMap<ProductId, String>,
}

impl CategoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, product: impl Into<ProductId>, category: impl Into<String>) {
        self.rows.insert(product.into(), category.into());
    }

    pub fn category(&self, product: &ProductId) -> Option<&str> {
        self.rows.get(product).map(String::as_str)
    }

    /// Position of the first row carrying `category`
    pub fn category_rank(&self, category: &str) -> Option<usize> {
        self.rows.values().position(|c| c == category)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ProductId, &str)> {
        self.rows.iter().map(|(p, c)| (p, c.as_str()))
    }
}

impl<P: Into<ProductId>, C: Into<String>> FromIterator<(P, C)> for CategoryTable {
    fn from_iter<I: IntoIterator<Item = (P, C)>>(iter: I) -> Self {
        let mut table = CategoryTable::new();
        for (product, category) in iter {
            table.insert(product, category);
        }
        table
    }
}

impl From<Vec<CategoryRow>> for CategoryTable {
    fn from(rows: Vec<CategoryRow>) -> Self {
        rows.into_iter().map(|row| (row.product_id, row.category)).collect()
    }
}

impl From<CategoryTable> for Vec<CategoryRow> {
    fn from(table: CategoryTable) -> Self {
        table
            .rows
            .into_iter()
            .map(|(product_id, category)| CategoryRow { product_id, category })
            .collect()
    }
}
