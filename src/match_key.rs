//! Match identifier parsing, formatting and ordering.
//!
//! Match keys follow the `<event>_<level><numbers>` convention used by the
//! official results feed:
//!
//! - Qualification: `2025mimil_qm15`
//! - Semifinal: `2025mimil_sf3m1`
//! - Final: `2025mimil_f1m2`
//!
//! Parsing never fails. Keys that match none of the known shapes fall back to
//! a best-effort parse that keeps the leading non-digit prefix as the
//! competition level and pulls the numbers out of the remaining digits, so one
//! corrupt identifier cannot abort a batch.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

static QUALIFICATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^qm(\d+)$").expect("valid qualification pattern"));
static SEMIFINAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^sf(\d+)m(\d+)$").expect("valid semifinal pattern"));
static FINAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^f(\d+)m(\d+)$").expect("valid final pattern"));

/// Competition level of a match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CompLevel {
    Qualification,
    Semifinal,
    Final,
    /// Any level code outside the three recognized shapes (kept verbatim).
    Other(String),
}

impl CompLevel {
    pub fn from_code(code: &str) -> Self {
        match code.to_ascii_lowercase().as_str() {
            "qm" => CompLevel::Qualification,
            "sf" => CompLevel::Semifinal,
            "f" => CompLevel::Final,
            other => CompLevel::Other(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            CompLevel::Qualification => "qm",
            CompLevel::Semifinal => "sf",
            CompLevel::Final => "f",
            CompLevel::Other(code) => code,
        }
    }

    /// Fixed sort rank: `qm < sf < f < unknown`.
    pub fn rank(&self) -> u8 {
        match self {
            CompLevel::Qualification => 0,
            CompLevel::Semifinal => 1,
            CompLevel::Final => 2,
            CompLevel::Other(_) => 3,
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            CompLevel::Qualification => "Qual".to_string(),
            CompLevel::Semifinal => "Semi".to_string(),
            CompLevel::Final => "Final".to_string(),
            CompLevel::Other(code) if code.is_empty() => "Match".to_string(),
            CompLevel::Other(code) => code.to_ascii_uppercase(),
        }
    }
}

impl From<String> for CompLevel {
    fn from(code: String) -> Self {
        CompLevel::from_code(&code)
    }
}

impl From<CompLevel> for String {
    fn from(level: CompLevel) -> Self {
        level.code().to_string()
    }
}

impl fmt::Display for CompLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Canonical `{eventKey, compLevel, setNumber, matchNumber}` tuple.
///
/// `Display` renders the canonical match key, so
/// `parse_match_key(&parsed.to_string()) == parsed` for every recognized shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedMatchKey {
    pub event_key: String,
    pub comp_level: CompLevel,
    pub set_number: u32,
    pub match_number: u32,
    /// Number shown to humans: the match number for quals and finals, the
    /// set number for semifinals.
    pub display_number: u32,
    /// False when the key matched none of the known shapes.
    pub recognized: bool,
}

impl ParsedMatchKey {
    /// Total ordering: comp level rank, then set number, then match number.
    pub fn sort_order(&self, other: &Self) -> Ordering {
        self.comp_level
            .rank()
            .cmp(&other.comp_level.rank())
            .then(self.set_number.cmp(&other.set_number))
            .then(self.match_number.cmp(&other.match_number))
    }

    /// Human label such as `Qual 15`, `Semi 3 Match 1` or `Final 2`.
    pub fn label(&self) -> String {
        match self.comp_level {
            CompLevel::Semifinal => format!("Semi {} Match {}", self.set_number, self.match_number),
            _ => format!("{} {}", self.comp_level.display_name(), self.display_number),
        }
    }

    fn level_segment(&self) -> String {
        match &self.comp_level {
            CompLevel::Qualification => format!("qm{}", self.match_number),
            CompLevel::Semifinal => format!("sf{}m{}", self.set_number, self.match_number),
            CompLevel::Final => format!("f{}m{}", self.set_number, self.match_number),
            CompLevel::Other(code) => format!("{}{}m{}", code, self.set_number, self.match_number),
        }
    }
}

impl fmt::Display for ParsedMatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.event_key.is_empty() {
            f.write_str(&self.level_segment())
        } else {
            write!(f, "{}_{}", self.event_key, self.level_segment())
        }
    }
}

/// Parse a match key. Never fails; see the module docs for the fallback.
pub fn parse_match_key(match_key: &str) -> ParsedMatchKey {
    let trimmed = match_key.trim();
    let (event_key, segment) = match trimmed.split_once('_') {
        Some((event, rest)) => (event.to_string(), rest.to_ascii_lowercase()),
        None => (String::new(), trimmed.to_ascii_lowercase()),
    };

    parse_known_shape(&event_key, &segment).unwrap_or_else(|| {
        log::debug!("Match key '{}' has no known shape, using fallback parse", match_key);
        parse_fallback(event_key, &segment)
    })
}

fn parse_known_shape(event_key: &str, segment: &str) -> Option<ParsedMatchKey> {
    if let Some(caps) = QUALIFICATION.captures(segment) {
        let match_number = caps[1].parse().ok()?;
        return Some(ParsedMatchKey {
            event_key: event_key.to_string(),
            comp_level: CompLevel::Qualification,
            set_number: 1,
            match_number,
            display_number: match_number,
            recognized: true,
        });
    }

    if let Some(caps) = SEMIFINAL.captures(segment) {
        let set_number = caps[1].parse().ok()?;
        let match_number = caps[2].parse().ok()?;
        return Some(ParsedMatchKey {
            event_key: event_key.to_string(),
            comp_level: CompLevel::Semifinal,
            set_number,
            match_number,
            display_number: set_number,
            recognized: true,
        });
    }

    if let Some(caps) = FINAL.captures(segment) {
        let set_number = caps[1].parse().ok()?;
        let match_number = caps[2].parse().ok()?;
        return Some(ParsedMatchKey {
            event_key: event_key.to_string(),
            comp_level: CompLevel::Final,
            set_number,
            match_number,
            display_number: match_number,
            recognized: true,
        });
    }

    None
}

fn parse_fallback(event_key: String, segment: &str) -> ParsedMatchKey {
    let prefix: String = segment.chars().take_while(|c| !c.is_ascii_digit()).collect();
    let digit_runs: Vec<u32> = segment
        .split(|c: char| !c.is_ascii_digit())
        .filter(|run| !run.is_empty())
        .map(|run| run.parse().unwrap_or(0))
        .collect();

    let match_number = digit_runs.last().copied().unwrap_or(0);
    let set_number = if digit_runs.len() >= 2 { digit_runs[0] } else { 1 };

    ParsedMatchKey {
        event_key,
        comp_level: CompLevel::from_code(&prefix),
        set_number,
        match_number,
        display_number: match_number,
        recognized: false,
    }
}

/// Render a human label for a match key.
pub fn format_match_label(match_key: &str) -> String {
    parse_match_key(match_key).label()
}

/// Compare two match keys in canonical match order.
pub fn compare_match_keys(a: &str, b: &str) -> Ordering {
    parse_match_key(a).sort_order(&parse_match_key(b))
}

/// Stable sort of match keys in canonical match order.
pub fn sort_match_keys<S: AsRef<str>>(keys: &mut [S]) {
    keys.sort_by(|a, b| compare_match_keys(a.as_ref(), b.as_ref()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_qualification() {
        let parsed = parse_match_key("2025mimil_qm15");
        assert_eq!(parsed.event_key, "2025mimil");
        assert_eq!(parsed.comp_level, CompLevel::Qualification);
        assert_eq!(parsed.set_number, 1);
        assert_eq!(parsed.match_number, 15);
        assert_eq!(parsed.display_number, 15);
        assert!(parsed.recognized);
    }

    #[test]
    fn test_parse_semifinal() {
        let parsed = parse_match_key("2025mimil_sf3m1");
        assert_eq!(parsed.comp_level, CompLevel::Semifinal);
        assert_eq!(parsed.set_number, 3);
        assert_eq!(parsed.match_number, 1);
        assert_eq!(parsed.display_number, 3);
        assert_eq!(parsed.label(), "Semi 3 Match 1");
    }

    #[test]
    fn test_parse_final_displays_match_number_only() {
        let parsed = parse_match_key("2025mimil_f1m2");
        assert_eq!(parsed.comp_level, CompLevel::Final);
        assert_eq!(parsed.set_number, 1);
        assert_eq!(parsed.match_number, 2);
        assert_eq!(parsed.label(), "Final 2");
    }

    #[test]
    fn test_fallback_keeps_prefix_and_digits() {
        let parsed = parse_match_key("2025mimil_qf2m3");
        assert!(!parsed.recognized);
        assert_eq!(parsed.comp_level, CompLevel::Other("qf".to_string()));
        assert_eq!(parsed.set_number, 2);
        assert_eq!(parsed.match_number, 3);
    }

    #[test]
    fn test_fallback_without_digits_or_event() {
        let parsed = parse_match_key("garbage");
        assert!(!parsed.recognized);
        assert_eq!(parsed.event_key, "");
        assert_eq!(parsed.match_number, 0);
        assert_eq!(parsed.set_number, 1);
    }

    #[test]
    fn test_fallback_bare_number() {
        let parsed = parse_match_key("evt_42");
        assert_eq!(parsed.comp_level, CompLevel::Other(String::new()));
        assert_eq!(parsed.match_number, 42);
        assert_eq!(parsed.label(), "Match 42");
    }

    #[test]
    fn test_round_trip_known_shapes() {
        for key in ["evt_qm15", "evt_sf1m1", "evt_f1m2"] {
            let parsed = parse_match_key(key);
            assert_eq!(parsed.to_string(), key);
            assert_eq!(parse_match_key(&parsed.to_string()), parsed);
        }
    }

    #[test]
    fn test_sort_order() {
        let mut keys = vec!["evt_f1m1", "evt_qm2", "evt_sf1m1", "evt_qm1"];
        sort_match_keys(&mut keys);
        assert_eq!(keys, vec!["evt_qm1", "evt_qm2", "evt_sf1m1", "evt_f1m1"]);
    }

    #[test]
    fn test_numeric_not_lexicographic_order() {
        let mut keys = vec!["evt_qm10", "evt_qm9", "evt_qm100"];
        sort_match_keys(&mut keys);
        assert_eq!(keys, vec!["evt_qm9", "evt_qm10", "evt_qm100"]);
    }

    #[test]
    fn test_unknown_levels_sort_last() {
        assert_eq!(compare_match_keys("evt_f1m3", "evt_xx1"), Ordering::Less);
    }

    #[test]
    fn test_comp_level_serde_as_code() {
        let json = serde_json::to_string(&CompLevel::Semifinal).unwrap();
        assert_eq!(json, "\"sf\"");
        let level: CompLevel = serde_json::from_str("\"ef\"").unwrap();
        assert_eq!(level, CompLevel::Other("ef".to_string()));
    }

    proptest! {
        #[test]
        fn prop_round_trip(event in "[0-9]{4}[a-z]{2,8}", set in 1u32..20, number in 1u32..200, level in 0u8..3) {
            let key = match level {
                0 => format!("{}_qm{}", event, number),
                1 => format!("{}_sf{}m{}", event, set, number),
                _ => format!("{}_f{}m{}", event, set, number),
            };
            let parsed = parse_match_key(&key);
            prop_assert_eq!(parse_match_key(&parsed.to_string()), parsed);
        }

        #[test]
        fn prop_never_panics(key in ".{0,40}") {
            let _ = parse_match_key(&key);
        }
    }
}
