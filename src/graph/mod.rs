//! Graph structures for basket analysis
//!
//! - [`BipartiteGraph`]: transactions on one side, products on the other
//! - [`ProductGraph`]: products only, joined by typed weighted relationships

pub mod bipartite;
pub mod product;
pub mod types;

// Re-export main types
pub use bipartite::BipartiteGraph;
pub use product::{ProductEdge, ProductGraph};
pub use types::{ProductPair, RelationshipType};

/// Size of the intersection of two sorted, deduplicated index lists
pub(crate) fn intersection_size(a: &[usize], b: &[usize]) -> usize {
    let (mut i, mut j, mut count) = (0, 0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                count += 1;
                i += 1;
                j += 1;
            }
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersection_size() {
        assert_eq!(intersection_size(&[1, 3, 5, 7], &[2, 3, 4, 7, 9]), 2);
        assert_eq!(intersection_size(&[], &[1]), 0);
        assert_eq!(intersection_size(&[4], &[4]), 1);
    }
}
