//! Event-wide reduction over match validation results.
//!
//! [`ValidationSummary`] is a commutative monoid: `default()` is the identity
//! and [`ValidationSummary::merge`] is associative, so partial summaries from
//! parallel workers combine into the same totals as a single pass. The
//! confidence label is always re-derived from the merged integer score sum.

use crate::match_list::MatchListItem;
use crate::validation::{Confidence, MatchValidationResult, ValidationStatus};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSummary {
    pub total_matches: usize,
    pub validated_matches: usize,
    pub passed_matches: usize,
    pub flagged_matches: usize,
    pub failed_matches: usize,
    pub no_tba_data_matches: usize,
    /// Scouted but not yet validated.
    pub pending_matches: usize,
    /// Neither scouted nor validated.
    pub no_scouting_matches: usize,
    pub total_discrepancies: usize,
    pub critical_discrepancies: usize,
    pub warning_discrepancies: usize,
    pub minor_discrepancies: usize,
    pub flagged_for_review: usize,
    pub requires_rescout: usize,
    /// Sum of confidence scores (high=3, medium=2, low=1) over validated matches.
    pub confidence_score_total: u64,
    pub confidence_samples: usize,
    pub average_confidence: Option<Confidence>,
}

impl ValidationSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_results<'a>(results: impl IntoIterator<Item = &'a MatchValidationResult>) -> Self {
        results.into_iter().fold(Self::new(), |mut summary, result| {
            summary.record_result(result);
            summary
        })
    }

    /// Summary over a match list, counting unvalidated rows as pending or
    /// no-scouting depending on whether any team was scouted.
    pub fn from_match_list(items: &[MatchListItem]) -> Self {
        let mut summary = Self::new();
        for item in items {
            match &item.result {
                Some(result) => summary.record_result(result),
                None if item.has_scouting() => summary.record_pending(),
                None => summary.record_no_scouting(),
            }
        }
        summary
    }

    pub fn record_result(&mut self, result: &MatchValidationResult) {
        self.total_matches += 1;
        match result.status {
            ValidationStatus::Pending => {
                self.pending_matches += 1;
                return;
            }
            ValidationStatus::Passed => self.passed_matches += 1,
            ValidationStatus::Flagged => self.flagged_matches += 1,
            ValidationStatus::Failed => self.failed_matches += 1,
            ValidationStatus::NoTbaData => self.no_tba_data_matches += 1,
        }

        self.validated_matches += 1;
        self.total_discrepancies += result.total_discrepancies;
        self.critical_discrepancies += result.critical_discrepancies;
        self.warning_discrepancies += result.warning_discrepancies;
        self.minor_discrepancies += result.minor_discrepancies();
        self.flagged_for_review += usize::from(result.flagged_for_review);
        self.requires_rescout += usize::from(result.requires_re_scout);
        self.confidence_score_total += u64::from(result.confidence.score());
        self.confidence_samples += 1;
        self.refresh_average();
    }

    pub fn record_pending(&mut self) {
        self.total_matches += 1;
        self.pending_matches += 1;
    }

    pub fn record_no_scouting(&mut self) {
        self.total_matches += 1;
        self.no_scouting_matches += 1;
    }

    /// Field-by-field sum of two partial summaries.
    pub fn merge(mut self, other: Self) -> Self {
        self.total_matches += other.total_matches;
        self.validated_matches += other.validated_matches;
        self.passed_matches += other.passed_matches;
        self.flagged_matches += other.flagged_matches;
        self.failed_matches += other.failed_matches;
        self.no_tba_data_matches += other.no_tba_data_matches;
        self.pending_matches += other.pending_matches;
        self.no_scouting_matches += other.no_scouting_matches;
        self.total_discrepancies += other.total_discrepancies;
        self.critical_discrepancies += other.critical_discrepancies;
        self.warning_discrepancies += other.warning_discrepancies;
        self.minor_discrepancies += other.minor_discrepancies;
        self.flagged_for_review += other.flagged_for_review;
        self.requires_rescout += other.requires_rescout;
        self.confidence_score_total += other.confidence_score_total;
        self.confidence_samples += other.confidence_samples;
        self.refresh_average();
        self
    }

    pub fn average_confidence_score(&self) -> Option<f64> {
        (self.confidence_samples > 0)
            .then(|| self.confidence_score_total as f64 / self.confidence_samples as f64)
    }

    fn refresh_average(&mut self) {
        self.average_confidence = confidence_label(self.confidence_score_total, self.confidence_samples);
    }
}

/// `>= 2.5` high, `>= 1.5` medium, else low; in integer arithmetic.
fn confidence_label(total: u64, samples: usize) -> Option<Confidence> {
    if samples == 0 {
        return None;
    }
    let samples = samples as u64;
    Some(if 2 * total >= 5 * samples {
        Confidence::High
    } else if 2 * total >= 3 * samples {
        Confidence::Medium
    } else {
        Confidence::Low
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::match_key::CompLevel;
    use chrono::Utc;
    use proptest::prelude::*;

    fn result(status: ValidationStatus, confidence: Confidence, critical: usize, warning: usize, minor: usize) -> MatchValidationResult {
        MatchValidationResult {
            id: "2025mimil_2025mimil_qm1".to_string(),
            event_key: "2025mimil".to_string(),
            match_key: "2025mimil_qm1".to_string(),
            match_number: 1,
            set_number: 1,
            comp_level: CompLevel::Qualification,
            status,
            confidence,
            red_alliance: None,
            blue_alliance: None,
            teams: Vec::new(),
            total_discrepancies: critical + warning + minor,
            critical_discrepancies: critical,
            warning_discrepancies: warning,
            flagged_for_review: status.needs_review(),
            requires_re_scout: status == ValidationStatus::Failed,
            validated_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_summary_has_no_confidence() {
        let summary = ValidationSummary::from_results(&[]);
        assert_eq!(summary.average_confidence, None);
        assert_eq!(summary.average_confidence_score(), None);
    }

    #[test]
    fn test_counts_by_status() {
        let results = vec![
            result(ValidationStatus::Passed, Confidence::High, 0, 0, 0),
            result(ValidationStatus::Flagged, Confidence::Medium, 0, 1, 2),
            result(ValidationStatus::Failed, Confidence::Low, 2, 0, 1),
            result(ValidationStatus::NoTbaData, Confidence::Low, 0, 0, 0),
        ];
        let summary = ValidationSummary::from_results(&results);

        assert_eq!(summary.total_matches, 4);
        assert_eq!(summary.validated_matches, 4);
        assert_eq!(summary.passed_matches, 1);
        assert_eq!(summary.flagged_matches, 1);
        assert_eq!(summary.failed_matches, 1);
        assert_eq!(summary.no_tba_data_matches, 1);
        assert_eq!(summary.total_discrepancies, 6);
        assert_eq!(summary.critical_discrepancies, 2);
        assert_eq!(summary.warning_discrepancies, 1);
        assert_eq!(summary.minor_discrepancies, 3);
        assert_eq!(summary.flagged_for_review, 2);
        assert_eq!(summary.requires_rescout, 1);
        // (3 + 2 + 1 + 1) / 4 = 1.75
        assert_eq!(summary.average_confidence, Some(Confidence::Medium));
    }

    #[test]
    fn test_inconsistent_stored_counts_do_not_underflow() {
        let mut stored = result(ValidationStatus::Failed, Confidence::Low, 2, 1, 0);
        stored.total_discrepancies = 1;
        assert_eq!(stored.minor_discrepancies(), 0);

        let summary = ValidationSummary::from_results(&[stored]);
        assert_eq!(summary.minor_discrepancies, 0);
        assert_eq!(summary.critical_discrepancies, 2);
    }

    #[test]
    fn test_label_boundaries() {
        assert_eq!(confidence_label(5, 2), Some(Confidence::High));
        assert_eq!(confidence_label(4, 2), Some(Confidence::Medium));
        assert_eq!(confidence_label(3, 2), Some(Confidence::Medium));
        assert_eq!(confidence_label(2, 2), Some(Confidence::Low));
    }

    #[test]
    fn test_pending_and_unscouted_excluded_from_average() {
        let mut summary = ValidationSummary::from_results(&[result(
            ValidationStatus::Passed,
            Confidence::High,
            0,
            0,
            0,
        )]);
        summary.record_pending();
        summary.record_no_scouting();

        assert_eq!(summary.total_matches, 3);
        assert_eq!(summary.pending_matches, 1);
        assert_eq!(summary.no_scouting_matches, 1);
        assert_eq!(summary.confidence_samples, 1);
        assert_eq!(summary.average_confidence, Some(Confidence::High));
    }

    #[test]
    fn test_merge_recomputes_label_from_scores() {
        // high + high + low on one side, low on the other: 8 / 4 = 2.0 -> medium.
        let left = ValidationSummary::from_results(&[
            result(ValidationStatus::Passed, Confidence::High, 0, 0, 0),
            result(ValidationStatus::Passed, Confidence::High, 0, 0, 0),
            result(ValidationStatus::Failed, Confidence::Low, 1, 0, 0),
        ]);
        let right = ValidationSummary::from_results(&[result(
            ValidationStatus::Failed,
            Confidence::Low,
            1,
            0,
            0,
        )]);
        assert_eq!(left.average_confidence, Some(Confidence::Medium));
        assert_eq!(right.average_confidence, Some(Confidence::Low));
        assert_eq!(left.merge(right).average_confidence, Some(Confidence::Medium));
    }

    fn arb_result() -> impl Strategy<Value = MatchValidationResult> {
        (0usize..4, 0usize..3, 0usize..3, 0usize..3).prop_map(|(kind, critical, warning, minor)| {
            match kind {
                0 => result(ValidationStatus::Passed, Confidence::High, 0, 0, 0),
                1 => result(ValidationStatus::Flagged, Confidence::Medium, 0, warning, minor + 1),
                2 => result(ValidationStatus::Failed, Confidence::Low, critical + 1, warning, minor),
                _ => result(ValidationStatus::NoTbaData, Confidence::Low, 0, 0, 0),
            }
        })
    }

    proptest! {
        #[test]
        fn prop_merge_matches_single_pass(
            results in prop::collection::vec(arb_result(), 0..40),
            split in 0usize..40,
        ) {
            let split = split.min(results.len());
            let (left, right) = results.split_at(split);
            let merged = ValidationSummary::from_results(left)
                .merge(ValidationSummary::from_results(right));
            prop_assert_eq!(merged, ValidationSummary::from_results(&results));
        }

        #[test]
        fn prop_merge_commutes(
            a in prop::collection::vec(arb_result(), 0..10),
            b in prop::collection::vec(arb_result(), 0..10),
        ) {
            let sa = ValidationSummary::from_results(&a);
            let sb = ValidationSummary::from_results(&b);
            prop_assert_eq!(sa.clone().merge(sb.clone()), sb.merge(sa));
        }
    }
}
