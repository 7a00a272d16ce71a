//! Transaction <-> product bipartite graph

use super::intersection_size;
use crate::data::{ProductId, TransactionId, TransactionRecord};
use crate::error::{BasketError, BasketResult};
use indexmap::IndexSet;
use tracing::info;

/// Undirected bipartite graph between transactions and products.
///
/// Both sides are indexed densely in first-appearance order. Nodes also have
/// a unified index: transactions occupy `0..T`, products `T..T+P`. Edges
/// only ever join the two sides.
#[derive(Debug, Clone)]
pub struct BipartiteGraph {
    transactions: IndexSet<TransactionId>,
    products: IndexSet<ProductId>,
    /// Sorted product indices per transaction
    transaction_products: Vec<Vec<usize>>,
    /// Sorted transaction indices per product
    product_transactions: Vec<Vec<usize>>,
}

impl BipartiteGraph {
    /// Build the graph from transaction records.
    ///
    /// Repeated (transaction, product) records collapse to one edge.
    pub fn build(records: &[TransactionRecord]) -> BasketResult<Self> {
        if records.is_empty() {
            return Err(BasketError::EmptyInput);
        }

        let mut transactions = IndexSet::new();
        let mut products = IndexSet::new();
        let mut edges = Vec::with_capacity(records.len());

        for record in records {
            record.validate()?;
            let (t_idx, _) = transactions.insert_full(record.transaction_id);
            let p_idx = match products.get_index_of(&record.product_id) {
                Some(idx) => idx,
                None => products.insert_full(record.product_id.clone()).0,
            };
            edges.push((t_idx, p_idx));
        }

        let mut transaction_products = vec![Vec::new(); transactions.len()];
        let mut product_transactions = vec![Vec::new(); products.len()];
        for (t_idx, p_idx) in edges {
            transaction_products[t_idx].push(p_idx);
            product_transactions[p_idx].push(t_idx);
        }
        for list in transaction_products.iter_mut().chain(product_transactions.iter_mut()) {
            list.sort_unstable();
            list.dedup();
        }

        let graph = BipartiteGraph {
            transactions,
            products,
            transaction_products,
            product_transactions,
        };
        info!(
            "Built bipartite graph: {} transactions, {} products, {} edges",
            graph.transaction_count(),
            graph.product_count(),
            graph.edge_count()
        );
        Ok(graph)
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    /// Total nodes on both sides
    pub fn node_count(&self) -> usize {
        self.transaction_count() + self.product_count()
    }

    pub fn edge_count(&self) -> usize {
        self.transaction_products.iter().map(Vec::len).sum()
    }

    /// Distinct transaction ids in first-appearance order
    pub fn transactions(&self) -> &IndexSet<TransactionId> {
        &self.transactions
    }

    /// Distinct product ids in first-appearance order
    pub fn products(&self) -> &IndexSet<ProductId> {
        &self.products
    }

    pub fn product(&self, idx: usize) -> &ProductId {
        &self.products[idx]
    }

    pub fn product_index(&self, product: &ProductId) -> Option<usize> {
        self.products.get_index_of(product)
    }

    /// Transactions (by index) containing a product
    pub fn product_neighbors(&self, product_idx: usize) -> &[usize] {
        &self.product_transactions[product_idx]
    }

    /// Products (by index) in a transaction
    pub fn transaction_neighbors(&self, transaction_idx: usize) -> &[usize] {
        &self.transaction_products[transaction_idx]
    }

    /// Neighbors of a node in unified indexing
    pub fn neighbors(&self, node: usize) -> Vec<usize> {
        let offset = self.transaction_count();
        if node < offset {
            self.transaction_products[node].iter().map(|&p| p + offset).collect()
        } else {
            self.product_transactions[node - offset].clone()
        }
    }

    /// Unified index of a product
    pub fn product_node(&self, product_idx: usize) -> usize {
        self.transaction_count() + product_idx
    }

    /// Degree of every transaction, in transaction index order
    pub fn transaction_degrees(&self) -> Vec<usize> {
        self.transaction_products.iter().map(Vec::len).collect()
    }

    /// Degree of every product, in product index order
    pub fn product_degrees(&self) -> Vec<usize> {
        self.product_transactions.iter().map(Vec::len).collect()
    }

    /// Number of transactions containing both products
    pub fn common_neighbors(&self, a: usize, b: usize) -> usize {
        intersection_size(&self.product_transactions[a], &self.product_transactions[b])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<TransactionRecord> {
        vec![
            TransactionRecord::new(1, "milk", 1, 1.0),
            TransactionRecord::new(1, "bread", 2, 2.0),
            TransactionRecord::new(2, "milk", 1, 1.1),
            TransactionRecord::new(2, "milk", 1, 1.1),
            TransactionRecord::new(3, "bread", 1, 2.1),
            TransactionRecord::new(3, "eggs", 6, 0.3),
        ]
    }

    #[test]
    fn test_build() {
        let graph = BipartiteGraph::build(&records()).unwrap();

        assert_eq!(graph.transaction_count(), 3);
        assert_eq!(graph.product_count(), 3);
        // Duplicate (2, milk) collapses
        assert_eq!(graph.edge_count(), 5);
        assert_eq!(graph.transaction_degrees(), vec![2, 1, 2]);
        assert_eq!(graph.product_degrees(), vec![2, 2, 1]);
        assert_eq!(
            graph.transaction_degrees().iter().sum::<usize>(),
            graph.product_degrees().iter().sum::<usize>()
        );
    }

    #[test]
    fn test_neighbors_stay_bipartite() {
        let graph = BipartiteGraph::build(&records()).unwrap();
        let t = graph.transaction_count();

        for node in 0..graph.node_count() {
            for neighbor in graph.neighbors(node) {
                assert_ne!(node < t, neighbor < t, "edge within one side");
            }
        }
    }

    #[test]
    fn test_common_neighbors() {
        let graph = BipartiteGraph::build(&records()).unwrap();
        let milk = graph.product_index(&"milk".into()).unwrap();
        let bread = graph.product_index(&"bread".into()).unwrap();
        let eggs = graph.product_index(&"eggs".into()).unwrap();

        assert_eq!(graph.common_neighbors(milk, bread), 1);
        assert_eq!(graph.common_neighbors(bread, eggs), 1);
        assert_eq!(graph.common_neighbors(milk, eggs), 0);
    }

    #[test]
    fn test_empty_input_is_rejected() {
        assert_eq!(BipartiteGraph::build(&[]).unwrap_err(), BasketError::EmptyInput);
    }

    #[test]
    fn test_invalid_record_is_rejected() {
        let err = BipartiteGraph::build(&[TransactionRecord::new(1, "milk", 0, 1.0)]).unwrap_err();
        assert!(matches!(err, BasketError::InvalidRecord { .. }));
    }
}
