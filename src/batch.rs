//! Event-wide batch validation.
//!
//! Matches are validated independently on a rayon pool. Progress is reported
//! after each match, and a [`CancellationToken`] is checked before each match
//! starts; a match already in flight always finishes.

use crate::config::ParallelConfig;
use crate::data::scouted::ScoutedTeamEntry;
use crate::data::tba::TbaMatch;
use crate::errors::{Error, Result};
use crate::match_key::{compare_match_keys, parse_match_key};
use crate::progress::{BatchPhase, ProgressSink, ValidationProgress};
use crate::repository::ValidationRepository;
use crate::summary::ValidationSummary;
use crate::validation::{MatchInput, MatchValidationResult, MatchValidator};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Cooperative cancellation flag shared between the caller and the workers.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome {
    /// Completed results in input order.
    pub results: Vec<MatchValidationResult>,
    pub summary: ValidationSummary,
    pub cancelled: bool,
    /// Scouted match keys never started because of cancellation.
    pub skipped: Vec<String>,
}

/// Group official records and scouting entries into one input per match key,
/// in match order. Keys present in either source produce an input.
///
/// A non-empty `event_key` keeps only records and entries from that event.
/// An empty one keeps everything and labels each input with its own event.
pub fn assemble_inputs(
    event_key: &str,
    matches: Vec<TbaMatch>,
    scouted: Vec<ScoutedTeamEntry>,
) -> Vec<MatchInput> {
    let mut inputs: BTreeMap<String, MatchInput> = BTreeMap::new();
    let mut dropped = 0usize;

    for record in matches {
        let event = source_event(&record.event_key, &record.key);
        if !event_key.is_empty() && event != event_key {
            dropped += 1;
            continue;
        }
        let input = MatchInput::new(&event, &record.key);
        let key = record.key.clone();
        inputs.entry(key).or_insert(input).authoritative = Some(record);
    }
    for entry in scouted {
        let event = source_event(&entry.event_key, &entry.match_key);
        if !event_key.is_empty() && event != event_key {
            dropped += 1;
            continue;
        }
        let input = MatchInput::new(&event, &entry.match_key);
        inputs
            .entry(entry.match_key.clone())
            .or_insert(input)
            .scouted
            .push(entry);
    }
    if dropped > 0 {
        log::info!("Ignored {} records from events other than {}", dropped, event_key);
    }

    let mut inputs: Vec<MatchInput> = inputs.into_values().collect();
    inputs.sort_by(|a, b| compare_match_keys(&a.match_key, &b.match_key));
    inputs
}

/// Declared event key, or the event prefix of the match key when none is declared.
fn source_event(declared: &str, match_key: &str) -> String {
    if declared.is_empty() {
        parse_match_key(match_key).event_key
    } else {
        declared.to_string()
    }
}

/// Validate every scouted input, reporting progress after each match.
///
/// Inputs with no scouting entries are never compared; they count toward the
/// summary as not scouted and produce no result.
pub fn validate_event(
    validator: &MatchValidator,
    inputs: &[MatchInput],
    parallel: &ParallelConfig,
    sink: &dyn ProgressSink,
    cancel: &CancellationToken,
) -> Result<BatchOutcome> {
    let (scouted, unscouted): (Vec<&MatchInput>, Vec<&MatchInput>) =
        inputs.iter().partition(|input| input.has_scouting());
    let total = scouted.len();
    let completed = AtomicUsize::new(0);

    for input in inputs.iter().filter(|i| !parse_match_key(&i.match_key).recognized) {
        sink.warn(&format!(
            "Unrecognized match key {}; ordering uses a best-effort parse",
            input.match_key
        ));
    }

    let run_one = |input: &MatchInput| -> Option<MatchValidationResult> {
        if cancel.is_cancelled() {
            return None;
        }
        let result = validator.validate(input);
        let current = completed.fetch_add(1, Ordering::SeqCst) + 1;
        sink.report(&ValidationProgress::new(
            current,
            total,
            &input.match_key,
            BatchPhase::Validating,
        ));
        Some(result)
    };

    let slots: Vec<Option<MatchValidationResult>> = if parallel.enabled && total > 1 {
        let workers = parallel.effective_concurrency();
        log::debug!("Validating {} matches on {} workers", total, workers);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .map_err(|e| Error::configuration(format!("Failed to build worker pool: {}", e)))?;
        pool.install(|| scouted.par_iter().map(|&input| run_one(input)).collect())
    } else {
        log::debug!("Validating {} matches sequentially", total);
        scouted.iter().map(|&input| run_one(input)).collect()
    };

    let mut results = Vec::with_capacity(total);
    let mut skipped = Vec::new();
    let mut summary = ValidationSummary::new();
    for _ in &unscouted {
        summary.record_no_scouting();
    }
    if !unscouted.is_empty() {
        log::info!("{} matches have no scouting data and were not validated", unscouted.len());
    }
    for (input, slot) in scouted.iter().zip(slots) {
        match slot {
            Some(result) => results.push(result),
            None => {
                skipped.push(input.match_key.clone());
                summary.record_pending();
            }
        }
    }

    let summary = results
        .par_iter()
        .fold(ValidationSummary::new, |mut partial, result| {
            partial.record_result(result);
            partial
        })
        .reduce(ValidationSummary::new, ValidationSummary::merge)
        .merge(summary);

    let cancelled = !skipped.is_empty();
    let phase = if cancelled {
        log::info!("Batch cancelled after {} of {} matches", results.len(), total);
        BatchPhase::Cancelled
    } else {
        BatchPhase::Complete
    };
    sink.report(&ValidationProgress::phase(results.len(), total, phase));

    Ok(BatchOutcome {
        results,
        summary,
        cancelled,
        skipped,
    })
}

/// Upsert each result by id, reporting the saving phase. Returns the number
/// of results written.
pub fn persist_results(
    repository: &dyn ValidationRepository,
    results: &[MatchValidationResult],
    sink: &dyn ProgressSink,
) -> Result<usize> {
    let total = results.len();
    for (index, result) in results.iter().enumerate() {
        repository.put(result.clone())?;
        sink.report(&ValidationProgress::new(
            index + 1,
            total,
            &result.match_key,
            BatchPhase::Saving,
        ));
    }
    sink.report(&ValidationProgress::phase(total, total, BatchPhase::Complete));
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{FieldCatalog, FieldMapping};
    use crate::config::ValidationConfig;
    use crate::progress::{RecordingProgressSink, SilentProgressSink};
    use crate::repository::InMemoryRepository;
    use crate::validation::{Alliance, ValidationStatus};
    use serde_json::json;

    fn validator() -> MatchValidator {
        MatchValidator::new(
            FieldCatalog::new(vec![FieldMapping::count("coral", "teleop-scoring", &["coralCount"])]),
            ValidationConfig::default(),
        )
    }

    fn record(number: u32, red_coral: u32) -> TbaMatch {
        serde_json::from_value(json!({
            "key": format!("2025mimil_qm{number}"),
            "event_key": "2025mimil",
            "alliances": {
                "red": { "score": 10, "team_keys": ["frc1", "frc2", "frc3"] },
                "blue": { "score": 10, "team_keys": ["frc4", "frc5", "frc6"] }
            },
            "score_breakdown": {
                "red": { "coralCount": red_coral },
                "blue": { "coralCount": 0 }
            }
        }))
        .unwrap()
    }

    fn entry(number: u32, team: u32, coral: u32) -> ScoutedTeamEntry {
        ScoutedTeamEntry {
            event_key: "2025mimil".to_string(),
            match_key: format!("2025mimil_qm{number}"),
            team_number: team,
            alliance: Alliance::Red,
            scout_name: None,
            fields: serde_json::from_value(json!({ "coral": coral })).unwrap(),
            correction: None,
        }
    }

    fn inputs(count: u32) -> Vec<MatchInput> {
        let matches = (1..=count).map(|n| record(n, 4)).collect();
        // Odd matches agree, even matches are off by 6.
        let scouted = (1..=count)
            .map(|n| entry(n, 1, if n % 2 == 0 { 10 } else { 4 }))
            .collect();
        assemble_inputs("2025mimil", matches, scouted)
    }

    #[test]
    fn test_assemble_inputs_unions_sources_in_match_order() {
        let matches = vec![record(10, 0), record(2, 0)];
        let scouted = vec![entry(3, 1, 0), entry(2, 1, 0)];
        let inputs = assemble_inputs("", matches, scouted);

        let keys: Vec<&str> = inputs.iter().map(|i| i.match_key.as_str()).collect();
        assert_eq!(keys, vec!["2025mimil_qm2", "2025mimil_qm3", "2025mimil_qm10"]);
        assert!(inputs[0].authoritative.is_some() && inputs[0].has_scouting());
        assert!(inputs[1].authoritative.is_none());
        assert!(!inputs[2].has_scouting());
        assert_eq!(inputs[0].event_key, "2025mimil");
    }

    #[test]
    fn test_assemble_inputs_keeps_only_requested_event() {
        let mut other = record(1, 0);
        other.key = "2025miket_qm1".to_string();
        other.event_key = "2025miket".to_string();
        let mut stray = entry(1, 1, 0);
        stray.event_key = String::new();
        stray.match_key = "2025miket_qm1".to_string();

        let matches = vec![record(1, 0), other];
        let scouted = vec![entry(1, 1, 0), stray];
        let inputs = assemble_inputs("2025mimil", matches, scouted);

        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0].match_key, "2025mimil_qm1");
        assert_eq!(inputs[0].scouted.len(), 1);
        assert_eq!(inputs[0].event_key, "2025mimil");
    }

    #[test]
    fn test_assemble_inputs_without_event_uses_match_key_prefix() {
        let mut stray = entry(4, 1, 0);
        stray.event_key = String::new();
        let inputs = assemble_inputs("", Vec::new(), vec![stray]);
        assert_eq!(inputs[0].event_key, "2025mimil");
    }

    #[test]
    fn test_unscouted_played_match_is_not_validated() {
        let inputs = assemble_inputs("2025mimil", vec![record(2, 4)], Vec::new());
        let recorder = RecordingProgressSink::new();

        let outcome = validate_event(
            &validator(),
            &inputs,
            &ParallelConfig::sequential(),
            &recorder,
            &CancellationToken::new(),
        )
        .unwrap();

        assert!(outcome.results.is_empty());
        assert!(!outcome.cancelled);
        assert!(outcome.skipped.is_empty());
        assert_eq!(outcome.summary.total_matches, 1);
        assert_eq!(outcome.summary.no_scouting_matches, 1);
        assert_eq!(outcome.summary.failed_matches, 0);
        assert_eq!(outcome.summary.average_confidence, None);
        assert!(crate::validation::event_rescout_worklist(&outcome.results).is_empty());
        assert!(recorder.in_phase(BatchPhase::Validating).is_empty());
        assert_eq!(recorder.last_phase(), Some(BatchPhase::Complete));
    }

    #[test]
    fn test_partially_scouted_match_is_still_validated() {
        // Only team 1 scouted; teams 2 and 3 add nothing to the red total.
        let matches = vec![record(1, 4), record(2, 4)];
        let inputs = assemble_inputs("2025mimil", matches, vec![entry(1, 1, 4)]);

        let outcome = validate_event(
            &validator(),
            &inputs,
            &ParallelConfig::default(),
            &SilentProgressSink,
            &CancellationToken::new(),
        )
        .unwrap();

        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.results[0].match_key, "2025mimil_qm1");
        assert_eq!(outcome.results[0].status, ValidationStatus::Passed);
        assert_eq!(outcome.summary.total_matches, 2);
        assert_eq!(outcome.summary.passed_matches, 1);
        assert_eq!(outcome.summary.no_scouting_matches, 1);
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let inputs = inputs(12);
        let parallel = validate_event(
            &validator(),
            &inputs,
            &ParallelConfig { enabled: true, max_concurrency: Some(4) },
            &SilentProgressSink,
            &CancellationToken::new(),
        )
        .unwrap();
        let sequential = validate_event(
            &validator(),
            &inputs,
            &ParallelConfig::sequential(),
            &SilentProgressSink,
            &CancellationToken::new(),
        )
        .unwrap();

        assert_eq!(parallel.summary, sequential.summary);
        assert_eq!(parallel.results.len(), 12);
        let keys = |o: &BatchOutcome| o.results.iter().map(|r| r.match_key.clone()).collect::<Vec<_>>();
        assert_eq!(keys(&parallel), keys(&sequential));
        assert_eq!(parallel.summary.passed_matches, 6);
        assert_eq!(parallel.summary.failed_matches, 6);
        assert!(!parallel.cancelled);
    }

    #[test]
    fn test_progress_reports_each_match_then_complete() {
        let recorder = RecordingProgressSink::new();
        validate_event(
            &validator(),
            &inputs(5),
            &ParallelConfig::default(),
            &recorder,
            &CancellationToken::new(),
        )
        .unwrap();

        let validating = recorder.in_phase(BatchPhase::Validating);
        assert_eq!(validating.len(), 5);
        let mut currents: Vec<usize> = validating.iter().map(|p| p.current).collect();
        currents.sort_unstable();
        assert_eq!(currents, vec![1, 2, 3, 4, 5]);
        assert!(validating.iter().all(|p| p.total == 5 && p.current_match.is_some()));
        assert_eq!(recorder.last_phase(), Some(BatchPhase::Complete));
    }

    #[test]
    fn test_unrecognized_keys_are_warned_once() {
        let recorder = RecordingProgressSink::new();
        let inputs = vec![
            MatchInput::new("2025mimil", "2025mimil_qm1"),
            MatchInput::new("2025mimil", "2025mimil_practice3"),
        ];
        validate_event(&validator(), &inputs, &ParallelConfig::sequential(), &recorder, &CancellationToken::new())
            .unwrap();

        assert_eq!(
            recorder.warnings(),
            vec!["Unrecognized match key 2025mimil_practice3; ordering uses a best-effort parse".to_string()]
        );
    }

    #[test]
    fn test_cancelled_before_start_skips_everything() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let recorder = RecordingProgressSink::new();

        let outcome = validate_event(&validator(), &inputs(3), &ParallelConfig::default(), &recorder, &cancel)
            .unwrap();

        assert!(outcome.cancelled);
        assert!(outcome.results.is_empty());
        assert_eq!(outcome.skipped.len(), 3);
        assert_eq!(outcome.summary.pending_matches, 3);
        assert_eq!(outcome.summary.average_confidence, None);
        assert_eq!(recorder.last_phase(), Some(BatchPhase::Cancelled));
    }

    /// Cancels once a fixed number of matches have been reported.
    struct CancelAfter {
        limit: usize,
        token: CancellationToken,
    }

    impl ProgressSink for CancelAfter {
        fn report(&self, progress: &ValidationProgress) {
            if progress.current >= self.limit {
                self.token.cancel();
            }
        }

        fn warn(&self, _message: &str) {}
    }

    #[test]
    fn test_cancel_mid_batch_keeps_finished_results() {
        let token = CancellationToken::new();
        let sink = CancelAfter { limit: 2, token: token.clone() };

        let outcome = validate_event(&validator(), &inputs(6), &ParallelConfig::sequential(), &sink, &token)
            .unwrap();

        assert!(outcome.cancelled);
        assert_eq!(outcome.results.len(), 2);
        assert_eq!(outcome.skipped, vec!["2025mimil_qm3", "2025mimil_qm4", "2025mimil_qm5", "2025mimil_qm6"]);
        assert_eq!(outcome.summary.total_matches, 6);
        assert_eq!(outcome.summary.validated_matches, 2);
    }

    #[test]
    fn test_persist_results_upserts() {
        let outcome = validate_event(
            &validator(),
            &inputs(4),
            &ParallelConfig::sequential(),
            &SilentProgressSink,
            &CancellationToken::new(),
        )
        .unwrap();
        let repo = InMemoryRepository::new();
        let recorder = RecordingProgressSink::new();

        assert_eq!(persist_results(&repo, &outcome.results, &recorder).unwrap(), 4);
        // Re-saving replaces rather than duplicates.
        persist_results(&repo, &outcome.results, &SilentProgressSink).unwrap();

        assert_eq!(repo.len(), 4);
        assert_eq!(recorder.in_phase(BatchPhase::Saving).len(), 4);
        let stored = repo.query_by_event("2025mimil").unwrap();
        assert_eq!(stored[1].status, ValidationStatus::Failed);
    }
}
