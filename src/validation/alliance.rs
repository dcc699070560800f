//! Field-by-field comparison of one alliance's scouted totals against the official breakdown.

use super::classifier::{check_field, percent_difference};
use super::types::{AllianceStatus, AllianceValidation, Confidence, Discrepancy, Severity};
use crate::catalog::FieldCatalog;
use crate::config::{resolve_thresholds, ValidationConfig};
use crate::data::scouted::ScoutedAllianceData;
use crate::extraction::AuthoritativeAllianceData;

/// Worst-severity rule: any critical fails, any discrepancy flags.
pub fn derive_alliance_status(discrepancies: &[Discrepancy]) -> AllianceStatus {
    match discrepancies.iter().map(|d| d.severity).max() {
        Some(Severity::Critical) => AllianceStatus::Failed,
        Some(_) => AllianceStatus::Flagged,
        None => AllianceStatus::Passed,
    }
}

/// Compares one alliance's scouted totals against the official values,
/// field by field over the injected catalog.
pub struct AllianceComparator<'a> {
    catalog: &'a FieldCatalog,
    config: &'a ValidationConfig,
}

impl<'a> AllianceComparator<'a> {
    pub fn new(catalog: &'a FieldCatalog, config: &'a ValidationConfig) -> Self {
        Self { catalog, config }
    }

    pub fn compare(
        &self,
        scouted: &ScoutedAllianceData,
        authoritative: &AuthoritativeAllianceData,
    ) -> AllianceValidation {
        let discrepancies: Vec<Discrepancy> = self
            .catalog
            .fields()
            .iter()
            .filter_map(|mapping| {
                let thresholds = resolve_thresholds(&mapping.category, self.config);
                check_field(
                    mapping,
                    scouted.value(&mapping.key),
                    authoritative.value(&mapping.key),
                    thresholds,
                )
            })
            .collect();

        let status = derive_alliance_status(&discrepancies);
        let total_scouted_points = self.scouted_points(scouted);
        let total_tba_points = authoritative.score;

        AllianceValidation {
            alliance: authoritative.alliance,
            status,
            confidence: Confidence::for_status(status),
            discrepancies,
            total_scouted_points,
            total_tba_points,
            score_difference: total_scouted_points - total_tba_points,
            score_percent_diff: percent_difference(total_scouted_points, total_tba_points),
        }
    }

    /// Scouted score estimate from per-field point values.
    fn scouted_points(&self, scouted: &ScoutedAllianceData) -> f64 {
        self.catalog
            .fields()
            .iter()
            .map(|mapping| scouted.value(&mapping.key) * mapping.points)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::FieldMapping;
    use crate::config::ValidationThresholds;
    use crate::extraction::FieldValues;
    use crate::validation::types::Alliance;

    fn catalog() -> FieldCatalog {
        FieldCatalog::new(vec![
            FieldMapping::count("autoCoral", "auto-scoring", &["autoCoralCount"]).with_points(7.0),
            FieldMapping::count("teleopCoral", "teleop-scoring", &["teleopCoralCount"])
                .with_points(3.0),
            FieldMapping::count("algae", "teleop-scoring", &["algaeCount"]).with_points(4.0),
            FieldMapping::count("fouls", "fouls", &["foulCount"]),
        ])
    }

    fn values(pairs: &[(&str, f64)]) -> FieldValues {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn scouted(pairs: &[(&str, f64)]) -> ScoutedAllianceData {
        ScoutedAllianceData {
            alliance: Alliance::Red,
            team_numbers: vec![1, 2, 3],
            totals: values(pairs),
        }
    }

    fn official(score: f64, pairs: &[(&str, f64)]) -> AuthoritativeAllianceData {
        AuthoritativeAllianceData {
            alliance: Alliance::Red,
            score,
            team_numbers: vec![1, 2, 3],
            fields: values(pairs),
        }
    }

    #[test]
    fn test_identical_values_pass() {
        let catalog = catalog();
        let config = ValidationConfig::default();
        let pairs = [("autoCoral", 3.0), ("teleopCoral", 10.0), ("algae", 2.0), ("fouls", 1.0)];

        let result = AllianceComparator::new(&catalog, &config).compare(&scouted(&pairs), &official(59.0, &pairs));

        assert_eq!(result.status, AllianceStatus::Passed);
        assert_eq!(result.confidence, Confidence::High);
        assert!(result.discrepancies.is_empty());
        assert_eq!(result.total_scouted_points, 59.0);
        assert_eq!(result.total_tba_points, 59.0);
        assert_eq!(result.score_difference, 0.0);
    }

    #[test]
    fn test_one_critical_two_minor_fails() {
        let catalog = catalog();
        let config = ValidationConfig::default();
        let result = AllianceComparator::new(&catalog, &config).compare(
            &scouted(&[("autoCoral", 9.0), ("teleopCoral", 11.0), ("algae", 3.0), ("fouls", 0.0)]),
            &official(80.0, &[("autoCoral", 3.0), ("teleopCoral", 10.0), ("algae", 2.0)]),
        );

        assert_eq!(result.discrepancies.len(), 3);
        assert_eq!(result.count_severity(Severity::Critical), 1);
        assert_eq!(result.count_severity(Severity::Minor), 2);
        assert_eq!(result.status, AllianceStatus::Failed);
        assert_eq!(result.confidence, Confidence::Low);
    }

    #[test]
    fn test_minor_only_is_flagged() {
        let catalog = catalog();
        let config = ValidationConfig::default();
        let result = AllianceComparator::new(&catalog, &config)
            .compare(&scouted(&[("fouls", 2.0)]), &official(0.0, &[("fouls", 1.0)]));
        assert_eq!(result.status, AllianceStatus::Flagged);
        assert_eq!(result.confidence, Confidence::Medium);
    }

    #[test]
    fn test_category_override_applies() {
        let catalog = catalog();
        let config = ValidationConfig::default().with_category(
            "fouls",
            ValidationThresholds {
                critical_absolute: 1.0,
                warning_absolute: 1.0,
                minor_absolute: 1.0,
                ..Default::default()
            },
        );
        let result = AllianceComparator::new(&catalog, &config)
            .compare(&scouted(&[("fouls", 2.0)]), &official(0.0, &[("fouls", 1.0)]));
        assert_eq!(result.discrepancies[0].severity, Severity::Critical);
        assert_eq!(result.status, AllianceStatus::Failed);
    }

    #[test]
    fn test_score_uses_official_total_not_field_sum() {
        let catalog = catalog();
        let config = ValidationConfig::default();
        let pairs = [("autoCoral", 2.0)];
        let result = AllianceComparator::new(&catalog, &config)
            .compare(&scouted(&pairs), &official(100.0, &pairs));

        assert_eq!(result.total_scouted_points, 14.0);
        assert_eq!(result.total_tba_points, 100.0);
        assert_eq!(result.score_difference, -86.0);
        assert_eq!(result.score_percent_diff, 86.0);
        assert_eq!(result.status, AllianceStatus::Passed);
    }
}
