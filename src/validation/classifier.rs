//! Two-tier severity classification.
//!
//! Absolute thresholds are evaluated first and win outright; the percentage
//! ladder only runs when the absolute difference is below `minor_absolute`.
//! A zero difference is always `Severity::None`.

use super::types::{Discrepancy, Severity};
use crate::catalog::FieldMapping;
use crate::config::ValidationThresholds;

/// `|s - a| / a * 100`, with 100 for any difference against a zero official value.
pub fn percent_difference(scouted: f64, authoritative: f64) -> f64 {
    let abs_diff = (scouted - authoritative).abs();
    if authoritative > 0.0 {
        abs_diff / authoritative * 100.0
    } else if abs_diff > 0.0 {
        100.0
    } else {
        0.0
    }
}

fn ladder(value: f64, critical: f64, warning: f64, minor: f64) -> Severity {
    if value >= critical {
        Severity::Critical
    } else if value >= warning {
        Severity::Warning
    } else if value >= minor {
        Severity::Minor
    } else {
        Severity::None
    }
}

pub fn classify(scouted: f64, authoritative: f64, thresholds: &ValidationThresholds) -> Severity {
    let abs_diff = (scouted - authoritative).abs();
    if abs_diff == 0.0 {
        return Severity::None;
    }

    match ladder(
        abs_diff,
        thresholds.critical_absolute,
        thresholds.warning_absolute,
        thresholds.minor_absolute,
    ) {
        Severity::None => ladder(
            percent_difference(scouted, authoritative),
            thresholds.critical_percent,
            thresholds.warning_percent,
            thresholds.minor_percent,
        ),
        severity => severity,
    }
}

/// `"<label>: Scouted <s>, Authoritative <a> (<over|under>-counted by <d>)"`
pub fn discrepancy_message(label: &str, scouted: f64, authoritative: f64) -> String {
    let direction = if scouted > authoritative { "over" } else { "under" };
    format!(
        "{}: Scouted {}, Authoritative {} ({}-counted by {})",
        label,
        scouted,
        authoritative,
        direction,
        (scouted - authoritative).abs()
    )
}

/// Build a discrepancy for one field, or `None` when the values agree
/// within thresholds.
pub fn check_field(
    mapping: &FieldMapping,
    scouted: f64,
    authoritative: f64,
    thresholds: &ValidationThresholds,
) -> Option<Discrepancy> {
    let severity = classify(scouted, authoritative, thresholds);
    if severity == Severity::None {
        return None;
    }

    let label = mapping.display_label();
    Some(Discrepancy {
        category: mapping.category.clone(),
        field: mapping.key.clone(),
        field_label: label.to_string(),
        scouted_value: scouted,
        tba_value: authoritative,
        difference: scouted - authoritative,
        percent_diff: percent_difference(scouted, authoritative),
        severity,
        message: discrepancy_message(label, scouted, authoritative),
    })
}
