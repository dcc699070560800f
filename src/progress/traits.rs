//! Progress sink trait.
//!
//! Validation itself never reports progress; the batch runner does, after
//! each match, from whichever rayon worker finished it.
//!
//! # Thread Safety
//!
//! All `ProgressSink` implementations must be `Send + Sync`. Snapshots may
//! arrive from several threads at once and are not guaranteed to be in
//! `current` order.
//!
//! # Example
//!
//! ```rust
//! use scoutcheck::progress::{ProgressSink, ValidationProgress};
//!
//! struct LoggingProgressSink;
//!
//! impl ProgressSink for LoggingProgressSink {
//!     fn report(&self, progress: &ValidationProgress) {
//!         log::info!("{}: {}/{}", progress.phase, progress.current, progress.total);
//!     }
//!
//!     fn warn(&self, message: &str) {
//!         log::warn!("{}", message);
//!     }
//! }
//! ```

use super::ValidationProgress;

/// Receives batch progress snapshots.
///
/// # Implementation Requirements
///
/// - All methods must be non-blocking
/// - Methods may be called from multiple threads concurrently
/// - Methods should not panic on odd input (e.g., current > total)
pub trait ProgressSink: Send + Sync {
    fn report(&self, progress: &ValidationProgress);

    /// Report a warning without interrupting progress.
    fn warn(&self, message: &str);
}

impl<T: ProgressSink + ?Sized> ProgressSink for std::sync::Arc<T> {
    fn report(&self, progress: &ValidationProgress) {
        (**self).report(progress)
    }

    fn warn(&self, message: &str) {
        (**self).warn(message)
    }
}
