//! Progress sink implementations for different output modes.
//!
//! | Use Case | Implementation |
//! |----------|----------------|
//! | Unit tests | [`SilentProgressSink`] or [`RecordingProgressSink`] |
//! | CI/CD | [`SilentProgressSink`] |
//! | CLI tool | [`CliProgressSink`] |

use super::traits::ProgressSink;
use super::{BatchPhase, ProgressConfig, ValidationProgress, TEMPLATE_VALIDATION};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::{Arc, Mutex, MutexGuard};

/// No-op sink.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentProgressSink;

impl ProgressSink for SilentProgressSink {
    #[inline]
    fn report(&self, _progress: &ValidationProgress) {}

    #[inline]
    fn warn(&self, _message: &str) {}
}

/// Terminal progress bar backed by `indicatif`.
///
/// The bar is hidden in quiet mode and when stderr is not a TTY. Warnings are
/// always printed.
#[derive(Clone)]
pub struct CliProgressSink {
    bar: ProgressBar,
}

impl CliProgressSink {
    pub fn new(config: &ProgressConfig) -> Self {
        if !config.should_show_progress() {
            return Self {
                bar: ProgressBar::hidden(),
            };
        }

        let bar = ProgressBar::new(0);
        let style = ProgressStyle::default_bar()
            .template(TEMPLATE_VALIDATION)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓▒░  ");
        bar.set_style(style);
        Self { bar }
    }

    pub fn is_hidden(&self) -> bool {
        self.bar.is_hidden()
    }
}

impl ProgressSink for CliProgressSink {
    fn report(&self, progress: &ValidationProgress) {
        self.bar.set_length(progress.total as u64);
        self.bar.set_position(progress.current as u64);
        self.bar.set_prefix(progress.phase.as_str());
        if let Some(match_key) = &progress.current_match {
            self.bar.set_message(match_key.clone());
        }
        match progress.phase {
            BatchPhase::Complete => self.bar.finish_and_clear(),
            BatchPhase::Cancelled => self.bar.abandon_with_message("cancelled"),
            BatchPhase::Validating | BatchPhase::Saving => {}
        }
    }

    fn warn(&self, message: &str) {
        self.bar.suspend(|| eprintln!("Warning: {}", message));
    }
}

/// Progress event recorded by [`RecordingProgressSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    Report(ValidationProgress),
    Warn { message: String },
}

/// Captures events for tests.
///
/// Event order across threads is not deterministic.
#[derive(Clone, Debug, Default)]
pub struct RecordingProgressSink {
    events: Arc<Mutex<Vec<ProgressEvent>>>,
}

impl RecordingProgressSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ProgressEvent>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn events(&self) -> Vec<ProgressEvent> {
        self.lock().clone()
    }

    pub fn snapshots(&self) -> Vec<ValidationProgress> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ProgressEvent::Report(progress) => Some(progress),
                _ => None,
            })
            .collect()
    }

    /// Snapshots in a given phase.
    pub fn in_phase(&self, phase: BatchPhase) -> Vec<ValidationProgress> {
        self.snapshots()
            .into_iter()
            .filter(|p| p.phase == phase)
            .collect()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ProgressEvent::Warn { message } => Some(message),
                _ => None,
            })
            .collect()
    }

    pub fn last_phase(&self) -> Option<BatchPhase> {
        self.snapshots().last().map(|p| p.phase)
    }
}

impl ProgressSink for RecordingProgressSink {
    fn report(&self, progress: &ValidationProgress) {
        self.lock().push(ProgressEvent::Report(progress.clone()));
    }

    fn warn(&self, message: &str) {
        self.lock().push(ProgressEvent::Warn {
            message: message.to_string(),
        });
    }
}
