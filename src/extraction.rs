//! Flattening of official score breakdowns into `field -> number` maps.
//!
//! Missing paths and wrong-typed values resolve to 0, as does an absent
//! breakdown. Scouted values go through the same rule evaluation.

use crate::catalog::{FieldCatalog, FieldKind, FieldMapping};
use crate::data::tba::{team_number_from_key, TbaMatch};
use crate::validation::types::Alliance;
use serde_json::Value;
use std::collections::BTreeMap;

/// Flat map of catalog key to numeric value.
pub type FieldValues = BTreeMap<String, f64>;

/// Resolve a dotted path. Numeric segments index into arrays.
pub fn lookup_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .filter(|segment| !segment.is_empty())
        .try_fold(root, |node, segment| match node {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
}

/// Numeric reading of a value. Only JSON numbers qualify.
pub fn numeric_value(value: &Value) -> Option<f64> {
    value.as_f64()
}

/// Boolean reading: `true` and `"Yes"` are truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::String(text) => text == "Yes",
        _ => false,
    }
}

/// Equality that treats `1` and `1.0` as the same number.
pub fn values_match(actual: &Value, target: &Value) -> bool {
    match (actual, target) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        _ => actual == target,
    }
}

/// Apply a field's rule to its source values. `None` sources count as absent.
pub fn evaluate_rule<'a>(
    mapping: &FieldMapping,
    sources: impl IntoIterator<Item = Option<&'a Value>>,
) -> f64 {
    let present = sources.into_iter().flatten();
    match mapping.kind {
        FieldKind::Count => present.filter_map(numeric_value).sum(),
        FieldKind::Boolean => present.filter(|v| is_truthy(v)).count() as f64,
        FieldKind::CountMatching => match &mapping.value {
            Some(target) => present.filter(|v| values_match(v, target)).count() as f64,
            None => 0.0,
        },
        FieldKind::CountMatchingAny => present
            .filter(|v| mapping.values.iter().any(|target| values_match(v, target)))
            .count() as f64,
    }
}

/// Extract one field from an alliance breakdown.
pub fn extract_field(breakdown: Option<&Value>, mapping: &FieldMapping) -> f64 {
    evaluate_rule(
        mapping,
        mapping
            .paths
            .iter()
            .map(|path| breakdown.and_then(|root| lookup_path(root, path))),
    )
}

/// Extract every catalog field from an alliance breakdown.
pub fn extract_fields(breakdown: Option<&Value>, catalog: &FieldCatalog) -> FieldValues {
    catalog
        .fields()
        .iter()
        .map(|mapping| (mapping.key.clone(), extract_field(breakdown, mapping)))
        .collect()
}

/// Official data for one alliance, flattened for comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthoritativeAllianceData {
    pub alliance: Alliance,
    pub score: f64,
    pub team_numbers: Vec<u32>,
    pub fields: FieldValues,
}

impl AuthoritativeAllianceData {
    pub fn from_match(record: &TbaMatch, alliance: Alliance, catalog: &FieldCatalog) -> Self {
        let side = record.alliance(alliance);
        let breakdown = record.breakdown_for(alliance);
        if breakdown.is_none() {
            log::warn!(
                "No {} score breakdown for {}; catalog fields default to 0",
                alliance,
                record.key
            );
        }

        Self {
            alliance,
            score: side.score.max(0) as f64,
            team_numbers: side
                .team_keys
                .iter()
                .filter_map(|key| team_number_from_key(key))
                .collect(),
            fields: extract_fields(breakdown, catalog),
        }
    }

    pub fn value(&self, key: &str) -> f64 {
        self.fields.get(key).copied().unwrap_or(0.0)
    }
}
