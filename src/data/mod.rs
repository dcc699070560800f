//! Input records handed to the validation engine.
//!
//! - [`tba`]: the official match record, fetched elsewhere and passed in.
//! - [`scouted`]: per-team scouting entries and their alliance rollup.

pub mod scouted;
pub mod tba;

pub use scouted::{latest_entries, ScoutedAllianceData, ScoutedTeamEntry, TeamCorrection};
pub use tba::{team_number_from_key, TbaAlliance, TbaAlliances, TbaMatch};
