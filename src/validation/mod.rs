//! Match validation: per-field severity, alliance status and match results.

pub mod alliance;
pub mod classifier;
pub mod rescout;
pub mod types;
pub mod validator;

pub use alliance::{derive_alliance_status, AllianceComparator};
pub use classifier::{check_field, classify, discrepancy_message, percent_difference};
pub use rescout::{event_rescout_worklist, rescout_targets, RescoutTarget};
pub use types::{
    Alliance, AllianceStatus, AllianceValidation, Confidence, Discrepancy, MatchValidationResult,
    Severity, TeamValidation, ValidationStatus,
};
pub use validator::{MatchInput, MatchValidator};
