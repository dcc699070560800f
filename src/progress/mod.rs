//! Progress feedback for event-wide batch validation.
//!
//! The batch runner publishes a [`ValidationProgress`] snapshot after every
//! match. Snapshots go to a [`ProgressSink`], which decides how (or whether)
//! to display them:
//!
//! - **Quiet Mode**: no bar (respects `SCOUTCHECK_QUIET` and `--quiet`)
//! - **Non-TTY**: the bar is hidden in CI and piped output
//!
//! # Examples
//!
//! ```rust
//! use scoutcheck::progress::{BatchPhase, ProgressSink, RecordingProgressSink, ValidationProgress};
//!
//! let recorder = RecordingProgressSink::new();
//! recorder.report(&ValidationProgress::new(1, 3, "2025mimil_qm1", BatchPhase::Validating));
//! assert_eq!(recorder.snapshots().len(), 1);
//! ```

pub mod implementations;
pub mod traits;

pub use implementations::{CliProgressSink, ProgressEvent, RecordingProgressSink, SilentProgressSink};
pub use traits::ProgressSink;

use serde::{Deserialize, Serialize};
use std::fmt;

pub const TEMPLATE_VALIDATION: &str = "{spinner} {prefix} [{bar:30}] {pos}/{len} {msg}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchPhase {
    Validating,
    Saving,
    Complete,
    Cancelled,
}

impl BatchPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            BatchPhase::Validating => "validating",
            BatchPhase::Saving => "saving",
            BatchPhase::Complete => "complete",
            BatchPhase::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, BatchPhase::Complete | BatchPhase::Cancelled)
    }
}

impl fmt::Display for BatchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `{current, total, currentMatch, phase}` snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationProgress {
    /// Matches finished so far (1-based once work has started).
    pub current: usize,
    pub total: usize,
    pub current_match: Option<String>,
    pub phase: BatchPhase,
}

impl ValidationProgress {
    pub fn new(current: usize, total: usize, current_match: &str, phase: BatchPhase) -> Self {
        Self {
            current,
            total,
            current_match: Some(current_match.to_string()),
            phase,
        }
    }

    /// Snapshot that is not tied to a particular match.
    pub fn phase(current: usize, total: usize, phase: BatchPhase) -> Self {
        Self {
            current,
            total,
            current_match: None,
            phase,
        }
    }
}

/// Configuration for progress display behavior
#[derive(Debug, Clone, Default)]
pub struct ProgressConfig {
    /// Whether to suppress all progress output
    pub quiet_mode: bool,
}

impl ProgressConfig {
    /// Create progress configuration from environment and CLI arguments
    pub fn from_env(quiet: bool) -> Self {
        let env_quiet = std::env::var("SCOUTCHECK_QUIET").is_ok();
        Self {
            quiet_mode: quiet || env_quiet,
        }
    }

    /// Determine if progress bars should be displayed
    pub fn should_show_progress(&self) -> bool {
        if self.quiet_mode {
            return false;
        }

        use std::io::IsTerminal;
        std::io::stderr().is_terminal()
    }
}
