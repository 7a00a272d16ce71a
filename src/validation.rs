//! Community purity against an external category table

use crate::algo::{Community, CommunityPartition};
use crate::data::CategoryTable;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// How well one community lines up with the external categories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationRecord {
    pub community_id: usize,
    /// Members found in the category table
    pub size: usize,
    /// Most common category among those members
    pub dominant_category: String,
    /// Share of `size` carrying `dominant_category`, in [0, 1]
    pub purity: f64,
}

pub struct ExternalValidator<'a> {
    table: &'a CategoryTable,
}

impl<'a> ExternalValidator<'a> {
    pub fn new(table: &'a CategoryTable) -> Self {
        Self { table }
    }

    /// Validate every community; those with no categorised member are omitted
    pub fn validate(&self, partition: &CommunityPartition) -> Vec<ValidationRecord> {
        partition
            .communities
            .iter()
            .filter_map(|community| self.validate_community(community))
            .collect()
    }

    /// Ties between equally common categories go to the one listed first in the table
    pub fn validate_community(&self, community: &Community) -> Option<ValidationRecord> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for member in &community.members {
            if let Some(category) = self.table.category(member) {
                *counts.entry(category).or_insert(0) += 1;
            }
        }

        let size: usize = counts.values().sum();
        if size == 0 {
            debug!("Community {} has no categorised members", community.id);
            return None;
        }

        let (dominant, count) = counts
            .into_iter()
            .min_by_key(|&(category, count)| {
                (
                    std::cmp::Reverse(count),
                    self.table.category_rank(category).unwrap_or(usize::MAX),
                )
            })?;

        Some(ValidationRecord {
            community_id: community.id,
            size,
            dominant_category: dominant.to_string(),
            purity: count as f64 / size as f64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ProductId;

    fn community(id: usize, members: &[&str]) -> Community {
        Community {
            id,
            members: members.iter().map(|&m| ProductId::from(m)).collect(),
        }
    }

    fn table() -> CategoryTable {
        vec![
            ("chips", "snacks"),
            ("salsa", "snacks"),
            ("beer", "drinks"),
            ("wine", "drinks"),
            ("milk", "dairy"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_purity() {
        let table = table();
        let validator = ExternalValidator::new(&table);
        let partition = CommunityPartition {
            communities: vec![community(0, &["chips", "salsa", "beer"])],
            modularity: 0.0,
        };

        let records = validator.validate(&partition);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].dominant_category, "snacks");
        assert_eq!(records[0].size, 3);
        assert!((records[0].purity - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_members_shrink_size() {
        let table = table();
        let validator = ExternalValidator::new(&table);
        let record = validator
            .validate_community(&community(4, &["milk", "mystery", "other"]))
            .unwrap();

        assert_eq!(record.community_id, 4);
        assert_eq!(record.size, 1);
        assert_eq!(record.purity, 1.0);
    }

    #[test]
    fn test_uncategorised_community_is_omitted() {
        let table = table();
        let validator = ExternalValidator::new(&table);
        let partition = CommunityPartition {
            communities: vec![community(0, &["ghost"]), community(1, &["beer"])],
            modularity: 0.0,
        };
        let records = validator.validate(&partition);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].community_id, 1);
    }

    #[test]
    fn test_ties_follow_table_order() {
        let table = table();
        let validator = ExternalValidator::new(&table);
        // One snack, one drink: snacks rows come first
        let record = validator
            .validate_community(&community(0, &["wine", "chips"]))
            .unwrap();
        assert_eq!(record.dominant_category, "snacks");
        assert_eq!(record.purity, 0.5);
    }
}
