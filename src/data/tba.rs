//! Official match records as published by the results source.

use crate::validation::types::Alliance;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Official match record as published by the results feed.
///
/// `score_breakdown` is game-specific and only read through catalog paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TbaMatch {
    pub key: String,
    #[serde(default)]
    pub event_key: String,
    #[serde(default)]
    pub comp_level: Option<String>,
    #[serde(default)]
    pub set_number: Option<u32>,
    #[serde(default)]
    pub match_number: Option<u32>,
    #[serde(default)]
    pub alliances: TbaAlliances,
    #[serde(default)]
    pub score_breakdown: Option<Value>,
    #[serde(default)]
    pub winning_alliance: Option<String>,
    #[serde(default)]
    pub time: Option<i64>,
    #[serde(default)]
    pub actual_time: Option<i64>,
    #[serde(default)]
    pub predicted_time: Option<i64>,
    #[serde(default)]
    pub post_result_time: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TbaAlliances {
    #[serde(default)]
    pub red: TbaAlliance,
    #[serde(default)]
    pub blue: TbaAlliance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TbaAlliance {
    /// `-1` until the match has been played.
    #[serde(default = "unplayed_score")]
    pub score: i32,
    #[serde(default)]
    pub team_keys: Vec<String>,
    #[serde(default)]
    pub dq_team_keys: Vec<String>,
    #[serde(default)]
    pub surrogate_team_keys: Vec<String>,
}

fn unplayed_score() -> i32 {
    -1
}

impl Default for TbaAlliance {
    fn default() -> Self {
        Self {
            score: unplayed_score(),
            team_keys: Vec::new(),
            dq_team_keys: Vec::new(),
            surrogate_team_keys: Vec::new(),
        }
    }
}

impl TbaMatch {
    pub fn alliance(&self, alliance: Alliance) -> &TbaAlliance {
        match alliance {
            Alliance::Red => &self.alliances.red,
            Alliance::Blue => &self.alliances.blue,
        }
    }

    pub fn breakdown_for(&self, alliance: Alliance) -> Option<&Value> {
        self.score_breakdown
            .as_ref()
            .and_then(|breakdown| breakdown.get(alliance.key()))
            .filter(|value| !value.is_null())
    }

    /// A record only counts as a result once at least one alliance has a score.
    pub fn has_result(&self) -> bool {
        self.alliances.red.score >= 0 || self.alliances.blue.score >= 0
    }
}

/// `"frc254"` -> `254`. Bare numbers are accepted as well.
pub fn team_number_from_key(team_key: &str) -> Option<u32> {
    let digits = team_key.strip_prefix("frc").unwrap_or(team_key);
    match digits.parse() {
        Ok(number) => Some(number),
        Err(_) => {
            log::warn!("Skipping unparseable team key '{}'", team_key);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn test_deserialize_partial_record() {
        let record: TbaMatch = serde_json::from_str(indoc! {r#"
            {
              "key": "2025mimil_qm1",
              "event_key": "2025mimil",
              "comp_level": "qm",
              "alliances": {
                "red": { "score": 88, "team_keys": ["frc1", "frc2", "frc3"] },
                "blue": { "score": 92, "team_keys": ["frc4", "frc5", "frc6"] }
              },
              "score_breakdown": { "red": { "foulCount": 1 }, "blue": null },
              "some_future_field": 7
            }
        "#})
        .unwrap();

        assert!(record.has_result());
        assert_eq!(record.alliance(Alliance::Blue).score, 92);
        assert!(record.breakdown_for(Alliance::Red).is_some());
        assert!(record.breakdown_for(Alliance::Blue).is_none());
    }

    #[test]
    fn test_unplayed_match_has_no_result() {
        let record: TbaMatch = serde_json::from_str(r#"{ "key": "2025mimil_qm80" }"#).unwrap();
        assert!(!record.has_result());
        assert!(record.breakdown_for(Alliance::Red).is_none());
    }

    #[test]
    fn test_team_number_from_key() {
        assert_eq!(team_number_from_key("frc254"), Some(254));
        assert_eq!(team_number_from_key("1678"), Some(1678));
        assert_eq!(team_number_from_key("frcB"), None);
    }
}
