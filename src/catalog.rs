//! Field catalog: which measurements are comparable and how to read them.
//!
//! The catalog is season-specific data supplied by the caller. It is an owned
//! value injected into the validator, so several catalogs can coexist (for
//! example one per game year) without any global registry.
//!
//! A catalog file is JSON with two lists:
//!
//! ```json
//! {
//!   "actions": [
//!     { "key": "autoCoralL4", "label": "Auto Coral L4", "category": "auto-scoring",
//!       "type": "count", "path": "autoReef.tba_topRowCount", "points": 7 }
//!   ],
//!   "toggles": [
//!     { "key": "deepClimb", "category": "endgame", "type": "countMatching",
//!       "path": ["endGameRobot1", "endGameRobot2", "endGameRobot3"],
//!       "value": "DeepCage", "scoutedKey": "endgame", "points": 12 }
//!   ]
//! }
//! ```

use crate::errors::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

/// Whether a field is a numeric action count or a toggle/enumerated outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldGroup {
    #[default]
    Action,
    Toggle,
}

/// How a field's value is derived from its source values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    /// Numeric value, summed across all paths.
    Count,
    /// `true` or `"Yes"` counts as 1, anything else as 0.
    Boolean,
    /// Number of sources equal to `value`.
    CountMatching,
    /// Number of sources whose value is one of `values`.
    CountMatchingAny,
}

/// One comparable measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMapping {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub category: String,
    #[serde(default)]
    pub group: FieldGroup,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    /// Dotted paths into one alliance's score breakdown.
    #[serde(alias = "path", deserialize_with = "one_or_many")]
    pub paths: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<Value>,
    /// Points awarded per unit, used for the scouted score estimate.
    #[serde(default)]
    pub points: f64,
    /// Key under which scouts record this field, when it differs from `key`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scouted_key: Option<String>,
}

fn one_or_many<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(path) => vec![path],
        OneOrMany::Many(paths) => paths,
    })
}

impl FieldMapping {
    fn new(key: &str, category: &str, kind: FieldKind, paths: &[&str]) -> Self {
        Self {
            key: key.to_string(),
            label: None,
            category: category.to_string(),
            group: FieldGroup::Action,
            kind,
            paths: paths.iter().map(|p| p.to_string()).collect(),
            value: None,
            values: Vec::new(),
            points: 0.0,
            scouted_key: None,
        }
    }

    pub fn count(key: &str, category: &str, paths: &[&str]) -> Self {
        Self::new(key, category, FieldKind::Count, paths)
    }

    pub fn boolean(key: &str, category: &str, path: &str) -> Self {
        Self {
            group: FieldGroup::Toggle,
            ..Self::new(key, category, FieldKind::Boolean, &[path])
        }
    }

    pub fn count_matching(key: &str, category: &str, paths: &[&str], value: Value) -> Self {
        Self {
            group: FieldGroup::Toggle,
            value: Some(value),
            ..Self::new(key, category, FieldKind::CountMatching, paths)
        }
    }

    pub fn count_matching_any(key: &str, category: &str, paths: &[&str], values: Vec<Value>) -> Self {
        Self {
            group: FieldGroup::Toggle,
            values,
            ..Self::new(key, category, FieldKind::CountMatchingAny, paths)
        }
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn with_points(mut self, points: f64) -> Self {
        self.points = points;
        self
    }

    pub fn with_scouted_key(mut self, scouted_key: &str) -> Self {
        self.scouted_key = Some(scouted_key.to_string());
        self
    }

    /// Human-readable label, falling back to the key.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.key)
    }

    pub fn scouted_key(&self) -> &str {
        self.scouted_key.as_deref().unwrap_or(&self.key)
    }
}

#[derive(Debug, Default, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    actions: Vec<FieldMapping>,
    #[serde(default)]
    toggles: Vec<FieldMapping>,
}

/// Ordered, keyed collection of field mappings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldCatalog {
    fields: Vec<FieldMapping>,
    index: HashMap<String, usize>,
}

impl FieldCatalog {
    /// Build a catalog, keeping the first mapping for any duplicated key.
    pub fn new(mappings: impl IntoIterator<Item = FieldMapping>) -> Self {
        let mut fields = Vec::new();
        let mut index = HashMap::new();

        for mapping in mappings {
            if index.contains_key(&mapping.key) {
                log::warn!("Duplicate catalog field '{}' ignored", mapping.key);
                continue;
            }
            index.insert(mapping.key.clone(), fields.len());
            fields.push(mapping);
        }

        Self { fields, index }
    }

    pub fn from_json_str(contents: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(contents)?;
        let actions = file.actions.into_iter().map(|m| FieldMapping {
            group: FieldGroup::Action,
            ..m
        });
        let toggles = file.toggles.into_iter().map(|m| FieldMapping {
            group: FieldGroup::Toggle,
            ..m
        });
        Ok(Self::new(actions.chain(toggles)))
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::file_system("Failed to read field catalog", path, e))?;
        Self::from_json_str(&contents)
    }

    pub fn fields(&self) -> &[FieldMapping] {
        &self.fields
    }

    pub fn get(&self, key: &str) -> Option<&FieldMapping> {
        self.index.get(key).map(|&i| &self.fields[i])
    }

    pub fn label_for<'a>(&'a self, key: &'a str) -> &'a str {
        self.get(key).map(FieldMapping::display_label).unwrap_or(key)
    }

    pub fn actions(&self) -> impl Iterator<Item = &FieldMapping> {
        self.fields.iter().filter(|f| f.group == FieldGroup::Action)
    }

    pub fn toggles(&self) -> impl Iterator<Item = &FieldMapping> {
        self.fields.iter().filter(|f| f.group == FieldGroup::Toggle)
    }

    pub fn categories(&self) -> BTreeSet<&str> {
        self.fields.iter().map(|f| f.category.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use serde_json::json;

    #[test]
    fn test_from_json_assigns_groups_and_accepts_single_path() {
        let catalog = FieldCatalog::from_json_str(indoc! {r#"
            {
              "actions": [
                { "key": "autoCoral", "category": "auto-scoring", "type": "count",
                  "path": "autoCoralCount", "points": 3 }
              ],
              "toggles": [
                { "key": "deepClimb", "category": "endgame", "type": "countMatching",
                  "path": ["endGameRobot1", "endGameRobot2", "endGameRobot3"],
                  "value": "DeepCage", "scoutedKey": "endgame" }
              ]
            }
        "#})
        .unwrap();

        assert_eq!(catalog.len(), 2);
        let auto = catalog.get("autoCoral").unwrap();
        assert_eq!(auto.group, FieldGroup::Action);
        assert_eq!(auto.paths, vec!["autoCoralCount".to_string()]);
        assert_eq!(auto.points, 3.0);

        let climb = catalog.get("deepClimb").unwrap();
        assert_eq!(climb.group, FieldGroup::Toggle);
        assert_eq!(climb.kind, FieldKind::CountMatching);
        assert_eq!(climb.paths.len(), 3);
        assert_eq!(climb.value, Some(json!("DeepCage")));
        assert_eq!(climb.scouted_key(), "endgame");
    }

    #[test]
    fn test_duplicate_keys_keep_first() {
        let catalog = FieldCatalog::new(vec![
            FieldMapping::count("fouls", "fouls", &["foulCount"]),
            FieldMapping::count("fouls", "penalties", &["techFoulCount"]),
        ]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("fouls").unwrap().category, "fouls");
    }

    #[test]
    fn test_label_falls_back_to_key() {
        let catalog = FieldCatalog::new(vec![
            FieldMapping::count("autoCoral", "auto-scoring", &["a"]).with_label("Auto Coral"),
            FieldMapping::boolean("leave", "auto-scoring", "autoLineRobot1"),
        ]);
        assert_eq!(catalog.label_for("autoCoral"), "Auto Coral");
        assert_eq!(catalog.label_for("leave"), "leave");
        assert_eq!(catalog.label_for("missing"), "missing");
    }

    #[test]
    fn test_groups_and_categories() {
        let catalog = FieldCatalog::new(vec![
            FieldMapping::count("autoCoral", "auto-scoring", &["a"]),
            FieldMapping::boolean("leave", "auto-scoring", "b"),
            FieldMapping::count("fouls", "fouls", &["c"]),
        ]);
        assert_eq!(catalog.actions().count(), 2);
        assert_eq!(catalog.toggles().count(), 1);
        assert_eq!(
            catalog.categories().into_iter().collect::<Vec<_>>(),
            vec!["auto-scoring", "fouls"]
        );
    }

    #[test]
    fn test_invalid_type_is_an_error() {
        let result = FieldCatalog::from_json_str(
            r#"{ "actions": [ { "key": "x", "category": "c", "type": "median", "path": "p" } ] }"#,
        );
        assert!(result.is_err());
    }
}
