//! Sort functionality for match lists.

use super::MatchListItem;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Sort criteria
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum MatchSortKey {
    /// Schedule order: qualification, semifinal, final
    #[default]
    MatchOrder,
    /// Status severity rank
    Status,
    /// Total discrepancy count
    Discrepancies,
    /// Confidence rank; rows without a result rank lowest
    Confidence,
}

impl MatchSortKey {
    pub fn display_name(&self) -> &'static str {
        match self {
            MatchSortKey::MatchOrder => "Match Order",
            MatchSortKey::Status => "Status",
            MatchSortKey::Discrepancies => "Discrepancies",
            MatchSortKey::Confidence => "Confidence",
        }
    }

    pub fn all() -> &'static [MatchSortKey] {
        &[
            MatchSortKey::MatchOrder,
            MatchSortKey::Status,
            MatchSortKey::Discrepancies,
            MatchSortKey::Confidence,
        ]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Ascending comparison of two rows under `key`.
pub fn compare_items(a: &MatchListItem, b: &MatchListItem, key: MatchSortKey) -> Ordering {
    match key {
        MatchSortKey::MatchOrder => a.parsed.sort_order(&b.parsed),
        MatchSortKey::Status => a
            .display_status()
            .severity_rank()
            .cmp(&b.display_status().severity_rank()),
        MatchSortKey::Discrepancies => a.discrepancy_count().cmp(&b.discrepancy_count()),
        // Option orders None first, which puts unvalidated rows below low.
        MatchSortKey::Confidence => a.confidence().cmp(&b.confidence()),
    }
}

/// Stable sort; rows with equal keys keep their input order in either direction.
pub fn sort_items(items: &mut [&MatchListItem], key: MatchSortKey, direction: SortDirection) {
    items.sort_by(|a, b| direction.apply(compare_items(a, b, key)));
}
