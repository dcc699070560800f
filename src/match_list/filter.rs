//! Filter functionality for match lists.

use super::sort::{sort_items, MatchSortKey, SortDirection};
use super::{MatchDisplayStatus, MatchListItem, ScoutingCompleteness};
use crate::match_key::CompLevel;

/// Active filters plus sort settings. `None` filters match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchListFilters {
    pub status: Option<MatchDisplayStatus>,
    pub comp_level: Option<CompLevel>,
    pub scouting: Option<ScoutingCompleteness>,
    /// Case-insensitive substring over the label, the key and team numbers.
    pub search: Option<String>,
    pub sort_by: MatchSortKey,
    pub direction: SortDirection,
}

impl MatchListFilters {
    pub fn matches(&self, item: &MatchListItem) -> bool {
        self.status.map_or(true, |s| item.display_status() == s)
            && self
                .comp_level
                .as_ref()
                .map_or(true, |level| &item.parsed.comp_level == level)
            && self.scouting.map_or(true, |c| item.completeness() == c)
            && self.search.as_deref().map_or(true, |q| matches_search(item, q))
    }

    /// Short descriptions of the active filters.
    pub fn display_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        if let Some(status) = self.status {
            names.push(format!("Status: {}", status));
        }
        if let Some(level) = &self.comp_level {
            names.push(format!("Level: {}", level.display_name()));
        }
        if let Some(scouting) = self.scouting {
            names.push(format!("Scouting: {:?}", scouting));
        }
        if let Some(search) = self.search.as_deref().filter(|q| !q.trim().is_empty()) {
            names.push(format!("Search: {}", search));
        }
        names
    }
}

fn matches_search(item: &MatchListItem, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }
    item.label().to_lowercase().contains(&query)
        || item.match_key.to_lowercase().contains(&query)
        || item.teams().any(|team| team.to_string().contains(&query))
}

/// Apply filters, then sort.
pub fn filter_and_sort<'a>(items: &'a [MatchListItem], filters: &MatchListFilters) -> Vec<&'a MatchListItem> {
    let mut selected: Vec<&MatchListItem> = items.iter().filter(|item| filters.matches(item)).collect();
    sort_items(&mut selected, filters.sort_by, filters.direction);
    selected
}
