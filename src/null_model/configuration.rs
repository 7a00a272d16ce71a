//! Bipartite configuration model
//!
//! Every node gets one stub per unit of degree. Transaction stubs are laid out
//! in node order and product stubs are shuffled before being zipped against
//! them, so each side keeps its degree sequence exactly while the pairing is
//! uniformly random.

use crate::error::{BasketError, BasketResult};
use basketgraph_algorithms::{weakly_connected_components, GraphView, NodeId};
use rand::seq::SliceRandom;
use rand::Rng;

/// A random bipartite multigraph.
///
/// Generated nodes use unified indexing: transaction slots `0..T`, product
/// slots `T..T+P`, in the order of the degree sequences they were built from.
#[derive(Debug, Clone)]
pub struct ConfigurationModel {
    transaction_count: usize,
    product_count: usize,
    /// One entry per stub pairing, `(transaction slot, product slot)`; may repeat
    edges: Vec<(usize, usize)>,
}

impl ConfigurationModel {
    /// Draw a multigraph whose per-side degree sequences match the inputs
    pub fn generate<R: Rng + ?Sized>(
        transaction_degrees: &[usize],
        product_degrees: &[usize],
        rng: &mut R,
    ) -> BasketResult<Self> {
        let transaction_stubs: usize = transaction_degrees.iter().sum();
        let product_stubs: usize = product_degrees.iter().sum();
        if transaction_stubs != product_stubs {
            return Err(BasketError::InvalidDegreeSequence {
                transaction_stubs,
                product_stubs,
            });
        }

        let offset = transaction_degrees.len();
        let left = stubs(transaction_degrees, 0);
        let mut right = stubs(product_degrees, offset);
        right.shuffle(rng);

        Ok(ConfigurationModel {
            transaction_count: transaction_degrees.len(),
            product_count: product_degrees.len(),
            edges: left.into_iter().zip(right).collect(),
        })
    }

    pub fn node_count(&self) -> usize {
        self.transaction_count + self.product_count
    }

    /// Multigraph degree of every transaction slot
    pub fn transaction_degrees(&self) -> Vec<usize> {
        let mut degrees = vec![0; self.transaction_count];
        for &(t, _) in &self.edges {
            degrees[t] += 1;
        }
        degrees
    }

    /// Multigraph degree of every product slot
    pub fn product_degrees(&self) -> Vec<usize> {
        let mut degrees = vec![0; self.product_count];
        for &(_, p) in &self.edges {
            degrees[p - self.transaction_count] += 1;
        }
        degrees
    }

    /// Collapse parallel edges and drop self-loops
    pub fn simple_edges(&self) -> Vec<(usize, usize)> {
        let mut edges: Vec<(usize, usize)> = self
            .edges
            .iter()
            .copied()
            .filter(|&(u, v)| u != v)
            .collect();
        edges.sort_unstable();
        edges.dedup();
        edges
    }

    /// Largest connected component of the collapsed simple graph
    pub fn largest_component(&self) -> SampledComponent {
        let edges = self.simple_edges();
        let weighted: Vec<(usize, usize, f64)> = edges.iter().map(|&(u, v)| (u, v, 1.0)).collect();
        let index_to_node: Vec<NodeId> = (0..self.node_count() as NodeId).collect();
        let view = GraphView::undirected(index_to_node, &weighted);

        let nodes: Vec<usize> = weakly_connected_components(&view)
            .largest()
            .into_iter()
            .map(|id| id as usize)
            .collect();
        SampledComponent::induced(nodes, &edges)
    }
}

fn stubs(degrees: &[usize], offset: usize) -> Vec<usize> {
    degrees
        .iter()
        .enumerate()
        .flat_map(|(node, &degree)| std::iter::repeat(node + offset).take(degree))
        .collect()
}

/// A connected component of a generated graph.
///
/// `nodes` holds generated node indices in ascending order; `neighbors[i]`
/// lists positions (not node indices) adjacent to `nodes[i]`, sorted.
#[derive(Debug, Clone, Default)]
pub struct SampledComponent {
    pub nodes: Vec<usize>,
    pub neighbors: Vec<Vec<usize>>,
}

impl SampledComponent {
    fn induced(nodes: Vec<usize>, edges: &[(usize, usize)]) -> Self {
        let position: std::collections::HashMap<usize, usize> =
            nodes.iter().enumerate().map(|(pos, &node)| (node, pos)).collect();

        let mut neighbors = vec![Vec::new(); nodes.len()];
        for (u, v) in edges {
            if let (Some(&pu), Some(&pv)) = (position.get(u), position.get(v)) {
                neighbors[pu].push(pv);
                neighbors[pv].push(pu);
            }
        }
        for list in &mut neighbors {
            list.sort_unstable();
            list.dedup();
        }

        SampledComponent { nodes, neighbors }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_degree_sequences_are_preserved() {
        let transaction_degrees = vec![3, 1, 2, 2, 4, 1];
        let product_degrees = vec![5, 3, 3, 2];

        for seed in 0..25 {
            let mut rng = StdRng::seed_from_u64(seed);
            let model =
                ConfigurationModel::generate(&transaction_degrees, &product_degrees, &mut rng)
                    .unwrap();

            assert_eq!(model.transaction_degrees(), transaction_degrees);
            assert_eq!(model.product_degrees(), product_degrees);
        }
    }

    #[test]
    fn test_mismatched_stub_totals() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = ConfigurationModel::generate(&[2, 1], &[1, 1], &mut rng).unwrap_err();
        assert_eq!(
            err,
            BasketError::InvalidDegreeSequence {
                transaction_stubs: 3,
                product_stubs: 2
            }
        );
    }

    #[test]
    fn test_simple_edges_are_bipartite_and_unique() {
        let mut rng = StdRng::seed_from_u64(9);
        let model = ConfigurationModel::generate(&[4, 4, 4], &[6, 6], &mut rng).unwrap();
        let edges = model.simple_edges();

        // Only 3 x 2 distinct pairs exist, so collapse must remove duplicates
        assert!(edges.len() <= 6);
        for &(t, p) in &edges {
            assert!(t < 3);
            assert!((3..5).contains(&p));
        }
    }

    #[test]
    fn test_largest_component_of_star() {
        // One product touching every transaction is always connected
        let mut rng = StdRng::seed_from_u64(3);
        let model = ConfigurationModel::generate(&[1, 1, 1, 1], &[4], &mut rng).unwrap();
        let component = model.largest_component();

        assert_eq!(component.nodes, vec![0, 1, 2, 3, 4]);
        assert_eq!(component.neighbors[4], vec![0, 1, 2, 3]);
        assert_eq!(component.neighbors[0], vec![4]);
    }
}
