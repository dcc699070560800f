//! Named threshold presets.
//!
//! | Preset | Percent (crit/warn/minor) | Absolute (crit/warn/minor) |
//! |--------|---------------------------|----------------------------|
//! | strict | 15 / 10 / 3 | 3 / 2 / 1 |
//! | balanced | 25 / 15 / 5 | 5 / 3 / 1 |
//! | lenient | 35 / 25 / 10 | 8 / 5 / 2 |

use super::thresholds::{ValidationConfig, ValidationThresholds};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdPreset {
    /// Tight tolerances for events with experienced scouts
    Strict,
    /// Balanced tolerances (default)
    #[default]
    Balanced,
    /// Loose tolerances for new scouting teams
    Lenient,
}

impl ThresholdPreset {
    pub fn thresholds(&self) -> ValidationThresholds {
        match self {
            ThresholdPreset::Strict => ValidationThresholds {
                critical_percent: 15.0,
                warning_percent: 10.0,
                minor_percent: 3.0,
                critical_absolute: 3.0,
                warning_absolute: 2.0,
                minor_absolute: 1.0,
            },
            ThresholdPreset::Balanced => ValidationThresholds::default(),
            ThresholdPreset::Lenient => ValidationThresholds {
                critical_percent: 35.0,
                warning_percent: 25.0,
                minor_percent: 10.0,
                critical_absolute: 8.0,
                warning_absolute: 5.0,
                minor_absolute: 2.0,
            },
        }
    }
}

/// Replace the default threshold set with a preset, keeping category overrides.
pub fn apply_preset(config: &ValidationConfig, preset: ThresholdPreset) -> ValidationConfig {
    ValidationConfig {
        thresholds: preset.thresholds(),
        categories: config.categories.clone(),
    }
}
