//! Keyed storage for validation results.
//!
//! Results are whole values keyed by [`MatchValidationResult::id`]; a
//! re-validation is a single upsert that replaces the previous value.

use crate::errors::Result;
use crate::match_key::compare_match_keys;
use crate::validation::MatchValidationResult;
use dashmap::DashMap;

pub trait ValidationRepository: Send + Sync {
    /// Insert or replace the result stored under `result.id`.
    fn put(&self, result: MatchValidationResult) -> Result<()>;

    fn get(&self, id: &str) -> Result<Option<MatchValidationResult>>;

    /// Every result for an event, in match order.
    fn query_by_event(&self, event_key: &str) -> Result<Vec<MatchValidationResult>>;

    /// Remove an event's results, returning how many were removed.
    fn delete_by_event(&self, event_key: &str) -> Result<usize>;
}

/// Concurrent in-process store.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    results: DashMap<String, MatchValidationResult>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

impl ValidationRepository for InMemoryRepository {
    fn put(&self, result: MatchValidationResult) -> Result<()> {
        self.results.insert(result.id.clone(), result);
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Option<MatchValidationResult>> {
        Ok(self.results.get(id).map(|entry| entry.value().clone()))
    }

    fn query_by_event(&self, event_key: &str) -> Result<Vec<MatchValidationResult>> {
        let mut results: Vec<MatchValidationResult> = self
            .results
            .iter()
            .filter(|entry| entry.value().event_key == event_key)
            .map(|entry| entry.value().clone())
            .collect();
        results.sort_by(|a, b| compare_match_keys(&a.match_key, &b.match_key));
        Ok(results)
    }

    fn delete_by_event(&self, event_key: &str) -> Result<usize> {
        let before = self.results.len();
        self.results.retain(|_, result| result.event_key != event_key);
        Ok(before.saturating_sub(self.results.len()))
    }
}
