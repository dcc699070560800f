use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Severity cut-offs for one category.
///
/// Absolute thresholds are checked before percentage thresholds, so small
/// counts (where any miss is a 100% difference) are not flagged critical.
///
/// ```toml
/// [validation.thresholds]
/// critical_percent = 25.0
/// warning_percent = 15.0
/// minor_percent = 5.0
/// critical_absolute = 5.0
/// warning_absolute = 3.0
/// minor_absolute = 1.0
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationThresholds {
    #[serde(default = "default_critical_percent")]
    pub critical_percent: f64,

    #[serde(default = "default_warning_percent")]
    pub warning_percent: f64,

    #[serde(default = "default_minor_percent")]
    pub minor_percent: f64,

    #[serde(default = "default_critical_absolute")]
    pub critical_absolute: f64,

    #[serde(default = "default_warning_absolute")]
    pub warning_absolute: f64,

    #[serde(default = "default_minor_absolute")]
    pub minor_absolute: f64,
}

impl Default for ValidationThresholds {
    fn default() -> Self {
        Self {
            critical_percent: default_critical_percent(),
            warning_percent: default_warning_percent(),
            minor_percent: default_minor_percent(),
            critical_absolute: default_critical_absolute(),
            warning_absolute: default_warning_absolute(),
            minor_absolute: default_minor_absolute(),
        }
    }
}

impl ValidationThresholds {
    /// Describe any ordering inversions (e.g. minor above warning).
    ///
    /// The classifier does not reject inverted thresholds; this only lets
    /// callers surface them.
    pub fn inversions(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let ladders = [
            ("percent", self.critical_percent, self.warning_percent, self.minor_percent),
            ("absolute", self.critical_absolute, self.warning_absolute, self.minor_absolute),
        ];

        for (kind, critical, warning, minor) in ladders {
            if critical < warning {
                problems.push(format!(
                    "critical_{kind} ({critical}) is below warning_{kind} ({warning})"
                ));
            }
            if warning < minor {
                problems.push(format!(
                    "warning_{kind} ({warning}) is below minor_{kind} ({minor})"
                ));
            }
            if minor < 0.0 {
                problems.push(format!("minor_{kind} ({minor}) is negative"));
            }
        }

        problems
    }
}

// Default validation threshold values
fn default_critical_percent() -> f64 {
    25.0
}
fn default_warning_percent() -> f64 {
    15.0
}
fn default_minor_percent() -> f64 {
    5.0
}
fn default_critical_absolute() -> f64 {
    5.0
}
fn default_warning_absolute() -> f64 {
    3.0
}
fn default_minor_absolute() -> f64 {
    1.0
}

/// Default thresholds plus per-category overrides.
///
/// Categories come from the field catalog and are not validated here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    #[serde(default)]
    pub thresholds: ValidationThresholds,

    #[serde(default)]
    pub categories: HashMap<String, ValidationThresholds>,
}

impl ValidationConfig {
    pub fn with_thresholds(thresholds: ValidationThresholds) -> Self {
        Self {
            thresholds,
            categories: HashMap::new(),
        }
    }

    pub fn with_category(mut self, category: &str, thresholds: ValidationThresholds) -> Self {
        self.categories.insert(category.to_string(), thresholds);
        self
    }

    /// Inversion warnings for the default set and every override.
    pub fn inversions(&self) -> Vec<String> {
        let defaults = self
            .thresholds
            .inversions()
            .into_iter()
            .map(|p| format!("thresholds: {p}"));
        let overrides = self.categories.iter().flat_map(|(category, t)| {
            t.inversions()
                .into_iter()
                .map(move |p| format!("categories.{category}: {p}"))
        });
        defaults.chain(overrides).collect()
    }
}

/// Category override if present, else the default set.
pub fn resolve_thresholds<'a>(category: &str, config: &'a ValidationConfig) -> &'a ValidationThresholds {
    config.categories.get(category).unwrap_or(&config.thresholds)
}
