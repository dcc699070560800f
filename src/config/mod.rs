// Sub-modules
mod loader;
mod parallel;
pub mod presets;
mod thresholds;

use serde::{Deserialize, Serialize};

// Re-export threshold types
pub use thresholds::{resolve_thresholds, ValidationConfig, ValidationThresholds};

// Re-export parallel config types
pub use parallel::ParallelConfig;

// Re-export preset types
pub use presets::{apply_preset, ThresholdPreset};

// Re-export loader functions
pub use loader::{
    directory_ancestors, discover_config, load_config, load_config_from_path, parse_config,
    CONFIG_FILE_NAME,
};

/// Contents of `.scoutcheck.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoutcheckConfig {
    #[serde(default)]
    pub validation: ValidationConfig,

    #[serde(default)]
    pub parallel: ParallelConfig,
}

/// Template written by `scoutcheck init`.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# Scoutcheck Configuration

# Default severity thresholds. Absolute differences are checked first;
# percentage thresholds only apply below minor_absolute.
[validation.thresholds]
critical_percent = 25.0
warning_percent = 15.0
minor_percent = 5.0
critical_absolute = 5.0
warning_absolute = 3.0
minor_absolute = 1.0

# Per-category overrides. Category names come from the field catalog.
# [validation.categories.endgame]
# critical_absolute = 2.0
# warning_absolute = 1.0
# minor_absolute = 1.0

[parallel]
enabled = true
# max_concurrency = 4
"#;
