//! Match list rows for presentation layers.
//!
//! A [`MatchListItem`] pairs a scheduled match with whatever validation result
//! exists for it. Rows without a result get one of two synthetic states,
//! pending (scouted, not validated) or no-scouting, so lists can be filtered
//! and sorted uniformly.

pub mod filter;
pub mod sort;

pub use filter::{filter_and_sort, MatchListFilters};
pub use sort::{compare_items, sort_items, MatchSortKey, SortDirection};

use crate::data::tba::team_number_from_key;
use crate::match_key::{parse_match_key, ParsedMatchKey};
use crate::validation::{Alliance, Confidence, MatchInput, MatchValidationResult, ValidationStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Teams per match when no roster is known.
const FULL_MATCH_TEAMS: usize = 6;

/// Status shown in a match list, including the two non-validated states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum MatchDisplayStatus {
    Passed,
    Flagged,
    Failed,
    NoTbaData,
    Pending,
    NoScouting,
}

impl MatchDisplayStatus {
    /// Higher is more urgent: failed 5, flagged 4, no-tba-data 3, pending 2,
    /// passed 1, no-scouting 0.
    pub fn severity_rank(&self) -> u8 {
        match self {
            MatchDisplayStatus::Failed => 5,
            MatchDisplayStatus::Flagged => 4,
            MatchDisplayStatus::NoTbaData => 3,
            MatchDisplayStatus::Pending => 2,
            MatchDisplayStatus::Passed => 1,
            MatchDisplayStatus::NoScouting => 0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchDisplayStatus::Passed => "passed",
            MatchDisplayStatus::Flagged => "flagged",
            MatchDisplayStatus::Failed => "failed",
            MatchDisplayStatus::NoTbaData => "no-tba-data",
            MatchDisplayStatus::Pending => "pending",
            MatchDisplayStatus::NoScouting => "no-scouting",
        }
    }

    pub fn all() -> &'static [MatchDisplayStatus] {
        &[
            MatchDisplayStatus::Failed,
            MatchDisplayStatus::Flagged,
            MatchDisplayStatus::NoTbaData,
            MatchDisplayStatus::Pending,
            MatchDisplayStatus::Passed,
            MatchDisplayStatus::NoScouting,
        ]
    }
}

impl fmt::Display for MatchDisplayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How much of a match's roster has scouting data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ScoutingCompleteness {
    Complete,
    Partial,
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchListItem {
    pub match_key: String,
    pub parsed: ParsedMatchKey,
    pub red_teams: Vec<u32>,
    pub blue_teams: Vec<u32>,
    /// Distinct teams with a scouting entry.
    pub scouted_teams: usize,
    pub result: Option<MatchValidationResult>,
}

impl MatchListItem {
    pub fn new(match_key: &str) -> Self {
        Self {
            match_key: match_key.to_string(),
            parsed: parse_match_key(match_key),
            red_teams: Vec::new(),
            blue_teams: Vec::new(),
            scouted_teams: 0,
            result: None,
        }
    }

    /// Row for a batch input, with the roster taken from the official record.
    pub fn from_input(input: &MatchInput, result: Option<MatchValidationResult>) -> Self {
        let roster = |alliance: Alliance| -> Vec<u32> {
            input
                .authoritative
                .as_ref()
                .map(|record| {
                    record
                        .alliance(alliance)
                        .team_keys
                        .iter()
                        .filter_map(|key| team_number_from_key(key))
                        .collect()
                })
                .unwrap_or_default()
        };
        let scouted: BTreeSet<u32> = input.scouted.iter().map(|e| e.team_number).collect();

        Self {
            red_teams: roster(Alliance::Red),
            blue_teams: roster(Alliance::Blue),
            scouted_teams: scouted.len(),
            result,
            ..Self::new(&input.match_key)
        }
    }

    pub fn with_teams(mut self, red: Vec<u32>, blue: Vec<u32>) -> Self {
        self.red_teams = red;
        self.blue_teams = blue;
        self
    }

    pub fn with_scouted_teams(mut self, scouted_teams: usize) -> Self {
        self.scouted_teams = scouted_teams;
        self
    }

    pub fn with_result(mut self, result: MatchValidationResult) -> Self {
        self.result = Some(result);
        self
    }

    pub fn label(&self) -> String {
        self.parsed.label()
    }

    pub fn has_scouting(&self) -> bool {
        self.scouted_teams > 0
    }

    pub fn display_status(&self) -> MatchDisplayStatus {
        match self.result.as_ref().map(|r| r.status) {
            Some(ValidationStatus::Passed) => MatchDisplayStatus::Passed,
            Some(ValidationStatus::Flagged) => MatchDisplayStatus::Flagged,
            Some(ValidationStatus::Failed) => MatchDisplayStatus::Failed,
            Some(ValidationStatus::NoTbaData) => MatchDisplayStatus::NoTbaData,
            Some(ValidationStatus::Pending) => MatchDisplayStatus::Pending,
            None if self.has_scouting() => MatchDisplayStatus::Pending,
            None => MatchDisplayStatus::NoScouting,
        }
    }

    pub fn completeness(&self) -> ScoutingCompleteness {
        let expected = match self.red_teams.len() + self.blue_teams.len() {
            0 => FULL_MATCH_TEAMS,
            n => n,
        };
        match self.scouted_teams {
            0 => ScoutingCompleteness::None,
            n if n >= expected => ScoutingCompleteness::Complete,
            _ => ScoutingCompleteness::Partial,
        }
    }

    pub fn discrepancy_count(&self) -> usize {
        self.result.as_ref().map_or(0, |r| r.total_discrepancies)
    }

    pub fn confidence(&self) -> Option<Confidence> {
        self.result.as_ref().map(|r| r.confidence)
    }

    pub fn teams(&self) -> impl Iterator<Item = u32> + '_ {
        self.red_teams.iter().chain(self.blue_teams.iter()).copied()
    }
}
