//! Scouting entries and their per-alliance aggregation.

use crate::catalog::FieldCatalog;
use crate::extraction::{evaluate_rule, FieldValues};
use crate::validation::types::Alliance;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Who corrected a scouting entry, and why.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamCorrection {
    #[serde(default)]
    pub corrected_by: Option<String>,
    #[serde(default)]
    pub corrected_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub correction_count: u32,
}

/// One scout's record of one team in one match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoutedTeamEntry {
    #[serde(default)]
    pub event_key: String,
    pub match_key: String,
    pub team_number: u32,
    pub alliance: Alliance,
    #[serde(default)]
    pub scout_name: Option<String>,
    /// Raw counts and toggles keyed by the catalog's scouted key.
    #[serde(default)]
    pub fields: BTreeMap<String, Value>,
    #[serde(default)]
    pub correction: Option<TeamCorrection>,
}

impl ScoutedTeamEntry {
    /// Precedence among entries for the same team: correction count, then
    /// correction time. Uncorrected entries rank lowest.
    fn revision(&self) -> (u32, Option<DateTime<Utc>>) {
        self.correction
            .as_ref()
            .map_or((0, None), |c| (c.correction_count, c.corrected_at))
    }
}

/// One entry per team and alliance, in order of first appearance.
///
/// When a team was scouted more than once, the entry with the most
/// corrections wins, then the latest correction time, then the one listed last.
pub fn latest_entries<'a>(
    entries: impl IntoIterator<Item = &'a ScoutedTeamEntry>,
) -> Vec<&'a ScoutedTeamEntry> {
    let mut kept: Vec<&ScoutedTeamEntry> = Vec::new();
    let mut replaced = 0usize;
    for entry in entries {
        let existing = kept
            .iter_mut()
            .find(|k| k.team_number == entry.team_number && k.alliance == entry.alliance);
        match existing {
            Some(slot) => {
                replaced += 1;
                if entry.revision() >= slot.revision() {
                    *slot = entry;
                }
            }
            None => kept.push(entry),
        }
    }
    if replaced > 0 {
        log::debug!("Collapsed {} duplicate scouting entries", replaced);
    }
    kept
}

/// Scouted values for one alliance, aggregated from its team entries.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoutedAllianceData {
    pub alliance: Alliance,
    pub team_numbers: Vec<u32>,
    pub totals: FieldValues,
}

impl ScoutedAllianceData {
    /// Aggregate the entries belonging to `alliance` using each catalog
    /// field's rule: counts are summed, toggles count matching teams.
    /// Each team contributes once; see [`latest_entries`].
    pub fn from_entries<'a>(
        catalog: &FieldCatalog,
        alliance: Alliance,
        entries: impl IntoIterator<Item = &'a ScoutedTeamEntry>,
    ) -> Self {
        let entries: Vec<&ScoutedTeamEntry> = latest_entries(entries)
            .into_iter()
            .filter(|entry| entry.alliance == alliance)
            .collect();

        let totals = catalog
            .fields()
            .iter()
            .map(|mapping| {
                let sources = entries
                    .iter()
                    .map(|entry| entry.fields.get(mapping.scouted_key()));
                (mapping.key.clone(), evaluate_rule(mapping, sources))
            })
            .collect();

        Self {
            alliance,
            team_numbers: entries.iter().map(|entry| entry.team_number).collect(),
            totals,
        }
    }

    pub fn value(&self, key: &str) -> f64 {
        self.totals.get(key).copied().unwrap_or(0.0)
    }

    pub fn has_team(&self, team_number: u32) -> bool {
        self.team_numbers.contains(&team_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::FieldMapping;
    use serde_json::json;

    fn entry(team: u32, alliance: Alliance, fields: Value) -> ScoutedTeamEntry {
        ScoutedTeamEntry {
            event_key: "2025mimil".to_string(),
            match_key: "2025mimil_qm1".to_string(),
            team_number: team,
            alliance,
            scout_name: None,
            fields: serde_json::from_value(fields).unwrap(),
            correction: None,
        }
    }

    #[test]
    fn test_aggregates_only_matching_alliance() {
        let catalog = FieldCatalog::new(vec![
            FieldMapping::count("coral", "teleop", &["coralCount"]),
            FieldMapping::boolean("leave", "auto", "autoLineRobot1"),
            FieldMapping::count_matching("deep", "endgame", &["endGameRobot1"], json!("DeepCage"))
                .with_scouted_key("endgame"),
        ]);
        let entries = vec![
            entry(1, Alliance::Red, json!({"coral": 4, "leave": true, "endgame": "DeepCage"})),
            entry(2, Alliance::Red, json!({"coral": 2, "leave": "Yes", "endgame": "Parked"})),
            entry(3, Alliance::Red, json!({"coral": "n/a"})),
            entry(4, Alliance::Blue, json!({"coral": 9, "leave": true})),
        ];

        let red = ScoutedAllianceData::from_entries(&catalog, Alliance::Red, &entries);
        assert_eq!(red.team_numbers, vec![1, 2, 3]);
        assert_eq!(red.value("coral"), 6.0);
        assert_eq!(red.value("leave"), 2.0);
        assert_eq!(red.value("deep"), 1.0);
        assert!(red.has_team(3));
        assert!(!red.has_team(4));
    }

    #[test]
    fn test_deserialize_camel_case_entry() {
        let parsed: ScoutedTeamEntry = serde_json::from_value(json!({
            "eventKey": "2025mimil",
            "matchKey": "2025mimil_qm4",
            "teamNumber": 254,
            "alliance": "blue",
            "scoutName": "Ada",
            "fields": { "coral": 3 },
            "correction": { "correctedBy": "lead", "notes": "recount", "correctionCount": 1 }
        }))
        .unwrap();
        assert_eq!(parsed.alliance, Alliance::Blue);
        assert_eq!(parsed.correction.unwrap().correction_count, 1);
    }

    fn corrected(mut entry: ScoutedTeamEntry, count: u32, at: Option<&str>) -> ScoutedTeamEntry {
        entry.correction = Some(TeamCorrection {
            corrected_by: Some("lead".to_string()),
            corrected_at: at.map(|t| t.parse().unwrap()),
            notes: None,
            correction_count: count,
        });
        entry
    }

    #[test]
    fn test_duplicate_team_counts_once() {
        let catalog = FieldCatalog::new(vec![FieldMapping::count("coral", "teleop", &["coralCount"])]);
        let entries = vec![
            entry(1, Alliance::Red, json!({"coral": 4})),
            entry(2, Alliance::Red, json!({"coral": 2})),
            entry(1, Alliance::Red, json!({"coral": 5})),
        ];

        let red = ScoutedAllianceData::from_entries(&catalog, Alliance::Red, &entries);
        assert_eq!(red.team_numbers, vec![1, 2]);
        // The later uncorrected entry for team 1 replaces the first.
        assert_eq!(red.value("coral"), 7.0);
    }

    #[test]
    fn test_latest_entries_prefers_corrections() {
        let recount = corrected(entry(1, Alliance::Red, json!({"coral": 6})), 2, None);
        let early = corrected(entry(1, Alliance::Red, json!({"coral": 3})), 1, Some("2025-03-01T10:00:00Z"));
        let late = corrected(entry(1, Alliance::Red, json!({"coral": 8})), 1, Some("2025-03-01T12:00:00Z"));
        let plain = entry(1, Alliance::Red, json!({"coral": 1}));

        let entries = [recount.clone(), late.clone(), early.clone(), plain.clone()];
        assert_eq!(latest_entries(&entries), vec![&recount]);

        let entries = [early.clone(), late.clone(), plain.clone()];
        assert_eq!(latest_entries(&entries), vec![&late]);

        let entries = [late.clone(), early];
        assert_eq!(latest_entries(&entries), vec![&late]);
    }

    #[test]
    fn test_same_team_on_both_alliances_is_kept_apart() {
        let entries = [
            entry(7, Alliance::Red, json!({})),
            entry(7, Alliance::Blue, json!({})),
        ];
        assert_eq!(latest_entries(&entries).len(), 2);
    }
}
