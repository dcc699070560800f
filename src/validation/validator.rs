//! Single-match validation: both alliances, overall status, and per-team rows.

use super::alliance::AllianceComparator;
use super::types::{
    Alliance, AllianceStatus, AllianceValidation, Confidence, MatchValidationResult, Severity,
    TeamValidation, ValidationStatus,
};
use crate::catalog::FieldCatalog;
use crate::config::ValidationConfig;
use crate::data::scouted::{latest_entries, ScoutedAllianceData, ScoutedTeamEntry};
use crate::data::tba::{team_number_from_key, TbaMatch};
use crate::extraction::AuthoritativeAllianceData;
use crate::match_key::parse_match_key;
use chrono::{DateTime, Utc};

/// Everything needed to validate one match. Official data must already be
/// fetched; `None` means no record is available.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchInput {
    pub event_key: String,
    pub match_key: String,
    pub scouted: Vec<ScoutedTeamEntry>,
    pub authoritative: Option<TbaMatch>,
}

impl MatchInput {
    pub fn new(event_key: &str, match_key: &str) -> Self {
        Self {
            event_key: event_key.to_string(),
            match_key: match_key.to_string(),
            scouted: Vec::new(),
            authoritative: None,
        }
    }

    pub fn with_scouted(mut self, scouted: Vec<ScoutedTeamEntry>) -> Self {
        self.scouted = scouted;
        self
    }

    pub fn with_authoritative(mut self, record: TbaMatch) -> Self {
        self.authoritative = Some(record);
        self
    }

    pub fn has_scouting(&self) -> bool {
        !self.scouted.is_empty()
    }
}

/// Validates single matches. Holds no mutable state, so one validator can be
/// shared across worker threads.
#[derive(Debug, Clone)]
pub struct MatchValidator {
    catalog: FieldCatalog,
    config: ValidationConfig,
}

impl MatchValidator {
    pub fn new(catalog: FieldCatalog, config: ValidationConfig) -> Self {
        Self { catalog, config }
    }

    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    pub fn validate(&self, input: &MatchInput) -> MatchValidationResult {
        self.validate_at(input, Utc::now())
    }

    /// Validate with an explicit timestamp.
    pub fn validate_at(&self, input: &MatchInput, validated_at: DateTime<Utc>) -> MatchValidationResult {
        let parsed = parse_match_key(&input.match_key);
        let event_key = if input.event_key.is_empty() {
            parsed.event_key.clone()
        } else {
            input.event_key.clone()
        };

        let shell = MatchValidationResult {
            id: MatchValidationResult::make_id(&event_key, &input.match_key),
            event_key,
            match_key: input.match_key.clone(),
            match_number: parsed.match_number,
            set_number: parsed.set_number,
            comp_level: parsed.comp_level,
            status: ValidationStatus::NoTbaData,
            confidence: Confidence::Low,
            red_alliance: None,
            blue_alliance: None,
            teams: Vec::new(),
            total_discrepancies: 0,
            critical_discrepancies: 0,
            warning_discrepancies: 0,
            flagged_for_review: false,
            requires_re_scout: false,
            validated_at,
        };

        let Some(record) = input.authoritative.as_ref().filter(|r| r.has_result()) else {
            log::debug!("{}: no official result, skipping comparison", input.match_key);
            return shell;
        };

        let comparator = AllianceComparator::new(&self.catalog, &self.config);
        let [red, blue] = Alliance::BOTH.map(|alliance| {
            let scouted = ScoutedAllianceData::from_entries(&self.catalog, alliance, &input.scouted);
            let official = AuthoritativeAllianceData::from_match(record, alliance, &self.catalog);
            comparator.compare(&scouted, &official)
        });

        let worst = red.status.max(blue.status);
        let status = ValidationStatus::from(worst);
        let teams = build_team_validations(record, &latest_entries(&input.scouted), &red, &blue);
        let total_discrepancies = red.discrepancies.len() + blue.discrepancies.len();
        let critical_discrepancies =
            red.count_severity(Severity::Critical) + blue.count_severity(Severity::Critical);
        let warning_discrepancies =
            red.count_severity(Severity::Warning) + blue.count_severity(Severity::Warning);

        let result = MatchValidationResult {
            status,
            confidence: Confidence::for_status(worst),
            total_discrepancies,
            critical_discrepancies,
            warning_discrepancies,
            flagged_for_review: status.needs_review(),
            requires_re_scout: status == ValidationStatus::Failed,
            teams,
            red_alliance: Some(red),
            blue_alliance: Some(blue),
            ..shell
        };

        log::debug!(
            "{}: {} ({} discrepancies, {} critical)",
            result.match_key,
            result.status,
            result.total_discrepancies,
            result.critical_discrepancies
        );
        result
    }
}

/// One entry per roster slot. Missing scouting is reported through
/// `has_scouted_data` and a low team confidence, never through alliance status.
fn build_team_validations(
    record: &TbaMatch,
    scouted: &[&ScoutedTeamEntry],
    red: &AllianceValidation,
    blue: &AllianceValidation,
) -> Vec<TeamValidation> {
    Alliance::BOTH
        .iter()
        .flat_map(|&alliance| {
            let alliance_result = match alliance {
                Alliance::Red => red,
                Alliance::Blue => blue,
            };
            record
                .alliance(alliance)
                .team_keys
                .iter()
                .enumerate()
                .filter_map(move |(slot, team_key)| {
                    let team_number = team_number_from_key(team_key)?;
                    let entry = scouted
                        .iter()
                        .find(|e| e.team_number == team_number && e.alliance == alliance);
                    Some(TeamValidation {
                        team_number,
                        team_key: team_key.clone(),
                        alliance,
                        station: (slot + 1) as u8,
                        scout_name: entry.and_then(|e| e.scout_name.clone()),
                        has_scouted_data: entry.is_some(),
                        confidence: if entry.is_some() {
                            alliance_result.confidence
                        } else {
                            Confidence::Low
                        },
                        flag_for_review: alliance_result.status != AllianceStatus::Passed,
                        correction: entry.and_then(|e| e.correction.clone()),
                    })
                })
        })
        .collect()
}
