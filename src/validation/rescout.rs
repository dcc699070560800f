//! Re-scout worklists built from failed results.

use super::types::{Alliance, AllianceStatus, MatchValidationResult, Severity};
use crate::match_key::compare_match_keys;
use serde::{Deserialize, Serialize};

/// A team whose scouting should be redone for a match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RescoutTarget {
    pub match_key: String,
    pub team_number: u32,
    pub alliance: Alliance,
    /// Labels of the critical discrepancies on the team's alliance.
    pub reasons: Vec<String>,
}

/// Teams on failed alliances, in roster order.
pub fn rescout_targets(result: &MatchValidationResult) -> Vec<RescoutTarget> {
    Alliance::BOTH
        .iter()
        .filter_map(|&alliance| result.alliance(alliance).map(|a| (alliance, a)))
        .filter(|(_, validation)| validation.status == AllianceStatus::Failed)
        .flat_map(|(alliance, validation)| {
            let reasons: Vec<String> = validation
                .discrepancies
                .iter()
                .filter(|d| d.severity == Severity::Critical)
                .map(|d| d.field_label.clone())
                .collect();
            result.teams_on(alliance).map(move |team| RescoutTarget {
                match_key: result.match_key.clone(),
                team_number: team.team_number,
                alliance,
                reasons: reasons.clone(),
            })
        })
        .collect()
}

/// Re-scout targets for a whole event, in match order.
pub fn event_rescout_worklist<'a>(
    results: impl IntoIterator<Item = &'a MatchValidationResult>,
) -> Vec<RescoutTarget> {
    let mut failed: Vec<&MatchValidationResult> =
        results.into_iter().filter(|r| r.requires_re_scout).collect();
    failed.sort_by(|a, b| compare_match_keys(&a.match_key, &b.match_key));
    failed.into_iter().flat_map(rescout_targets).collect()
}
