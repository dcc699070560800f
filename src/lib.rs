//! Validation engine for match scouting data.
//!
//! Scouted per-team counts are rolled up per alliance and compared, field by
//! field, against the official match record. Each difference is classified
//! into a severity, alliances and matches get a status and confidence, and an
//! event-wide summary is reduced from the per-match results.
//!
//! ```rust
//! use scoutcheck::catalog::{FieldCatalog, FieldMapping};
//! use scoutcheck::config::ValidationConfig;
//! use scoutcheck::validation::{MatchInput, MatchValidator, ValidationStatus};
//!
//! let catalog = FieldCatalog::new(vec![FieldMapping::count("coral", "teleop-scoring", &["coralCount"])]);
//! let validator = MatchValidator::new(catalog, ValidationConfig::default());
//!
//! // No official record yet: a first-class outcome, not an error.
//! let result = validator.validate(&MatchInput::new("2025mimil", "2025mimil_qm1"));
//! assert_eq!(result.status, ValidationStatus::NoTbaData);
//! ```

pub mod batch;
pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod data;
pub mod errors;
pub mod extraction;
pub mod io;
pub mod match_key;
pub mod match_list;
pub mod progress;
pub mod repository;
pub mod summary;
pub mod validation;

// Re-export commonly used types
pub use crate::batch::{assemble_inputs, persist_results, validate_event, BatchOutcome, CancellationToken};
pub use crate::catalog::{FieldCatalog, FieldGroup, FieldKind, FieldMapping};
pub use crate::config::{ScoutcheckConfig, ValidationConfig, ValidationThresholds};
pub use crate::data::{ScoutedAllianceData, ScoutedTeamEntry, TbaMatch};
pub use crate::errors::{Error, Result};
pub use crate::match_key::{compare_match_keys, format_match_label, parse_match_key, CompLevel, ParsedMatchKey};
pub use crate::match_list::{filter_and_sort, MatchListFilters, MatchListItem};
pub use crate::repository::{InMemoryRepository, ValidationRepository};
pub use crate::summary::ValidationSummary;
pub use crate::validation::{
    Alliance, AllianceStatus, AllianceValidation, Confidence, Discrepancy, MatchInput,
    MatchValidationResult, MatchValidator, Severity, TeamValidation, ValidationStatus,
};
