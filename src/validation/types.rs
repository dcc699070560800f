//! Value types produced by validation.
//!
//! Every status-like concept is a closed enum so that classification, status
//! derivation and aggregation are checked exhaustively. Results are immutable:
//! re-validation builds a new [`MatchValidationResult`] that replaces the old
//! one by [`MatchValidationResult::id`].

use crate::data::scouted::TeamCorrection;
use crate::match_key::CompLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alliance {
    Red,
    Blue,
}

impl Alliance {
    pub const BOTH: [Alliance; 2] = [Alliance::Red, Alliance::Blue];

    /// Key used by the official feed (`"red"` / `"blue"`).
    pub fn key(&self) -> &'static str {
        match self {
            Alliance::Red => "red",
            Alliance::Blue => "blue",
        }
    }
}

impl fmt::Display for Alliance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Discrepancy severity, ordered `None < Minor < Warning < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    None,
    Minor,
    Warning,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::None => "none",
            Severity::Minor => "minor",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome for one alliance, ordered `Passed < Flagged < Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllianceStatus {
    Passed,
    Flagged,
    Failed,
}

/// Match-level validation state.
///
/// `Pending` is the state before validation runs; the other four are terminal
/// for a given computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationStatus {
    Pending,
    Passed,
    Flagged,
    Failed,
    NoTbaData,
}

impl ValidationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationStatus::Pending => "pending",
            ValidationStatus::Passed => "passed",
            ValidationStatus::Flagged => "flagged",
            ValidationStatus::Failed => "failed",
            ValidationStatus::NoTbaData => "no-tba-data",
        }
    }

    pub fn needs_review(&self) -> bool {
        matches!(self, ValidationStatus::Flagged | ValidationStatus::Failed)
    }
}

impl From<AllianceStatus> for ValidationStatus {
    fn from(status: AllianceStatus) -> Self {
        match status {
            AllianceStatus::Passed => ValidationStatus::Passed,
            AllianceStatus::Flagged => ValidationStatus::Flagged,
            AllianceStatus::Failed => ValidationStatus::Failed,
        }
    }
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trust level, ordered `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    /// Numeric score used for averaging: high=3, medium=2, low=1.
    pub fn score(&self) -> u8 {
        match self {
            Confidence::Low => 1,
            Confidence::Medium => 2,
            Confidence::High => 3,
        }
    }

    /// Fixed status mapping: passed -> high, flagged -> medium, failed -> low.
    pub fn for_status(status: AllianceStatus) -> Self {
        match status {
            AllianceStatus::Passed => Confidence::High,
            AllianceStatus::Flagged => Confidence::Medium,
            AllianceStatus::Failed => Confidence::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single field-level disagreement. Never built for `Severity::None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discrepancy {
    pub category: String,
    pub field: String,
    pub field_label: String,
    pub scouted_value: f64,
    #[serde(rename = "tbaValue")]
    pub tba_value: f64,
    /// `scouted - official`
    pub difference: f64,
    pub percent_diff: f64,
    pub severity: Severity,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllianceValidation {
    pub alliance: Alliance,
    pub status: AllianceStatus,
    pub confidence: Confidence,
    pub discrepancies: Vec<Discrepancy>,
    pub total_scouted_points: f64,
    #[serde(rename = "totalTBAPoints")]
    pub total_tba_points: f64,
    pub score_difference: f64,
    pub score_percent_diff: f64,
}

impl AllianceValidation {
    pub fn count_severity(&self, severity: Severity) -> usize {
        self.discrepancies
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }
}

/// Per-team annotation. Numeric comparisons live at alliance level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamValidation {
    pub team_number: u32,
    pub team_key: String,
    pub alliance: Alliance,
    /// 1-based driver station.
    pub station: u8,
    pub scout_name: Option<String>,
    pub has_scouted_data: bool,
    pub confidence: Confidence,
    pub flag_for_review: bool,
    pub correction: Option<TeamCorrection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchValidationResult {
    pub id: String,
    pub event_key: String,
    pub match_key: String,
    pub match_number: u32,
    pub set_number: u32,
    pub comp_level: CompLevel,
    pub status: ValidationStatus,
    pub confidence: Confidence,
    pub red_alliance: Option<AllianceValidation>,
    pub blue_alliance: Option<AllianceValidation>,
    pub teams: Vec<TeamValidation>,
    pub total_discrepancies: usize,
    pub critical_discrepancies: usize,
    pub warning_discrepancies: usize,
    pub flagged_for_review: bool,
    pub requires_re_scout: bool,
    pub validated_at: DateTime<Utc>,
}

impl MatchValidationResult {
    /// Persistence key: `<eventKey>_<matchKey>`.
    pub fn make_id(event_key: &str, match_key: &str) -> String {
        format!("{}_{}", event_key, match_key)
    }

    pub fn alliance(&self, alliance: Alliance) -> Option<&AllianceValidation> {
        match alliance {
            Alliance::Red => self.red_alliance.as_ref(),
            Alliance::Blue => self.blue_alliance.as_ref(),
        }
    }

    /// All discrepancies across both alliances.
    pub fn discrepancies(&self) -> impl Iterator<Item = &Discrepancy> {
        self.red_alliance
            .iter()
            .chain(self.blue_alliance.iter())
            .flat_map(|a| a.discrepancies.iter())
    }

    /// Saturates at zero for stored results whose counts disagree.
    pub fn minor_discrepancies(&self) -> usize {
        self.total_discrepancies
            .saturating_sub(self.critical_discrepancies)
            .saturating_sub(self.warning_discrepancies)
    }

    pub fn teams_on(&self, alliance: Alliance) -> impl Iterator<Item = &TeamValidation> {
        self.teams.iter().filter(move |t| t.alliance == alliance)
    }
}
