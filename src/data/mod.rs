//! # Data Module
//!
//! Encounter table rows, raid den rows and the immutable container both live in.
//!
//! Rows are deserialized with the PascalCase column names of the flat encounter
//! export (`Pokemon`, `Location`, `MinLevel`, ...). Nothing in this module mutates
//! a table after it is built; the query layer only ever reads from it.

pub mod ingest;
pub mod loader;
pub mod moves;

pub use ingest::*;
pub use loader::*;
pub use moves::*;

use crate::config::{MAX_STAR, MIN_STAR, RAID_METHOD};
use crate::query::RANGE_DASH;
use crate::{RrError, RrResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Time-of-day availability of an encounter.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum TimeOfDay {
    Day,
    Night,
    /// Available regardless of the clock
    #[default]
    All,
}

impl TimeOfDay {
    /// Returns the column value used in the encounter export.
    pub fn as_str(self) -> &'static str {
        match self {
            TimeOfDay::Day => "Day",
            TimeOfDay::Night => "Night",
            TimeOfDay::All => "All",
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeOfDay {
    type Err = RrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(TimeOfDay::Day),
            "night" => Ok(TimeOfDay::Night),
            "all" | "both" | "any" => Ok(TimeOfDay::All),
            other => Err(RrError::InvalidConfig(format!("unknown time of day: {other}"))),
        }
    }
}

/// One row of the flat encounter table.
///
/// Leveled rows carry `MinLevel`/`MaxLevel`; raid rows carry `Star` instead.
/// The `Method` vocabulary is open: unknown methods are kept verbatim.
///
/// # Examples
///
/// ```
/// use rrlocate::{config::FORM_SUFFIXES, EncounterRecord, TimeOfDay};
///
/// let row = EncounterRecord::wild("Vulpix-Alola", "Mt. Moon", "Grass", TimeOfDay::Night, 12, 14);
/// assert_eq!(row.base_pokemon(&FORM_SUFFIXES), "Vulpix");
/// assert_eq!(row.level_range().unwrap(), "12–14");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EncounterRecord {
    /// Display name, possibly with a regional form suffix
    pub pokemon: String,
    pub location: String,
    pub method: String,
    #[serde(default)]
    pub time: TimeOfDay,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_level: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_level: Option<u32>,
    /// Raid tier, only present on raid rows
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub star: Option<u8>,
}

impl EncounterRecord {
    /// Creates a leveled encounter row.
    pub fn wild(
        pokemon: impl Into<String>,
        location: impl Into<String>,
        method: impl Into<String>,
        time: TimeOfDay,
        min_level: u32,
        max_level: u32,
    ) -> Self {
        Self {
            pokemon: pokemon.into(),
            location: location.into(),
            method: method.into(),
            time,
            min_level: Some(min_level),
            max_level: Some(max_level),
            star: None,
        }
    }

    /// Creates a raid row. Raids are time independent.
    pub fn raid(pokemon: impl Into<String>, location: impl Into<String>, star: u8) -> Self {
        Self {
            pokemon: pokemon.into(),
            location: location.into(),
            method: RAID_METHOD.to_string(),
            time: TimeOfDay::All,
            min_level: None,
            max_level: None,
            star: Some(star),
        }
    }

    /// Whether this row is a raid den encounter.
    pub fn is_raid(&self) -> bool {
        self.method == RAID_METHOD
    }

    /// Species name with any of `suffixes` removed.
    pub fn base_pokemon<S: AsRef<str>>(&self, suffixes: &[S]) -> &str {
        strip_form_suffix(&self.pokemon, suffixes)
    }

    /// Short description used in error messages and logs.
    pub fn label(&self) -> String {
        format!("{} @ {} ({})", self.pokemon, self.location, self.method)
    }

    /// Whether the row has every field its method needs to be displayed.
    pub fn is_complete(&self) -> bool {
        if self.is_raid() {
            self.star.is_some()
        } else {
            self.min_level.is_some() && self.max_level.is_some()
        }
    }

    /// Display string for the level bounds: `"N"` or `"N–M"`.
    pub fn level_range(&self) -> RrResult<String> {
        let (min, max) = self.levels()?;
        Ok(if min == max {
            min.to_string()
        } else {
            format!("{min}{RANGE_DASH}{max}")
        })
    }

    /// Level bounds, failing with the row's label when either is absent.
    pub fn levels(&self) -> RrResult<(u32, u32)> {
        let min = self.min_level.ok_or_else(|| RrError::MissingField {
            row: self.label(),
            field: "MinLevel",
        })?;
        let max = self.max_level.ok_or_else(|| RrError::MissingField {
            row: self.label(),
            field: "MaxLevel",
        })?;
        if min > max {
            return Err(RrError::InvalidLevels {
                row: self.label(),
                min,
                max,
            });
        }
        Ok((min, max))
    }

    /// Raid tier, failing when absent or out of range.
    pub fn raid_star(&self) -> RrResult<u8> {
        let star = self.star.ok_or_else(|| RrError::MissingField {
            row: self.label(),
            field: "Star",
        })?;
        validate_star(&self.label(), star)
    }

    /// Checks field consistency without requiring optional fields.
    ///
    /// Rows lacking levels are accepted here (gift and trade rows legitimately
    /// have none); they are dropped before consolidation instead.
    pub fn validate(&self) -> RrResult<()> {
        if self.pokemon.trim().is_empty() {
            return Err(RrError::MissingField {
                row: self.label(),
                field: "Pokemon",
            });
        }
        if self.location.trim().is_empty() {
            return Err(RrError::MissingField {
                row: self.label(),
                field: "Location",
            });
        }
        if self.method.trim().is_empty() {
            return Err(RrError::MissingField {
                row: self.label(),
                field: "Method",
            });
        }
        if self.is_raid() {
            self.raid_star()?;
        }
        match (self.min_level, self.max_level) {
            (Some(_), Some(_)) => self.levels().map(|_| ()),
            (None, None) => Ok(()),
            (Some(_), None) => Err(RrError::MissingField {
                row: self.label(),
                field: "MaxLevel",
            }),
            (None, Some(_)) => Err(RrError::MissingField {
                row: self.label(),
                field: "MinLevel",
            }),
        }
    }
}

/// An item a raid den can drop, with its drop chance in percent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RaidReward {
    pub item: String,
    pub chance: u8,
}

impl RaidReward {
    pub fn new(item: impl Into<String>, chance: u8) -> Self {
        Self {
            item: item.into(),
            chance,
        }
    }
}

impl fmt::Display for RaidReward {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}% {}", self.chance, self.item)
    }
}

/// One row of the raid den table.
///
/// The flat raid export may omit `Rewards`; dens ingested from the dump carry
/// whatever reward lines could be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RaidRecord {
    pub pokemon: String,
    pub location: String,
    pub star: u8,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rewards: Vec<RaidReward>,
}

impl RaidRecord {
    /// Creates a raid den row without rewards.
    pub fn new(pokemon: impl Into<String>, location: impl Into<String>, star: u8) -> Self {
        Self {
            pokemon: pokemon.into(),
            location: location.into(),
            star,
            rewards: Vec::new(),
        }
    }

    pub fn with_rewards(mut self, rewards: Vec<RaidReward>) -> Self {
        self.rewards = rewards;
        self
    }

    /// Species name with any of `suffixes` removed.
    pub fn base_pokemon<S: AsRef<str>>(&self, suffixes: &[S]) -> &str {
        strip_form_suffix(&self.pokemon, suffixes)
    }

    /// Converts the den into an encounter row so both tables consolidate together.
    pub fn to_encounter(&self) -> EncounterRecord {
        EncounterRecord::raid(self.pokemon.clone(), self.location.clone(), self.star)
    }

    /// Checks the tier is within the valid star range.
    pub fn validate(&self) -> RrResult<()> {
        let label = format!("{} @ {} ({})", self.pokemon, self.location, RAID_METHOD);
        validate_star(&label, self.star).map(|_| ())
    }
}

fn validate_star(label: &str, star: u8) -> RrResult<u8> {
    if (MIN_STAR..=MAX_STAR).contains(&star) {
        Ok(star)
    } else {
        Err(RrError::InvalidStar {
            row: label.to_string(),
            star,
        })
    }
}

/// Removes a `-<Suffix>` regional form marker from a creature name.
///
/// # Examples
///
/// ```
/// use rrlocate::strip_form_suffix;
///
/// assert_eq!(strip_form_suffix("Meowth-Galar", &["Alola", "Galar"]), "Meowth");
/// assert_eq!(strip_form_suffix("Mr.-Mime", &["Alola", "Galar"]), "Mr.-Mime");
/// ```
pub fn strip_form_suffix<'a, S: AsRef<str>>(name: &'a str, suffixes: &[S]) -> &'a str {
    for suffix in suffixes {
        let suffix = suffix.as_ref();
        if let Some(base) = name.strip_suffix(suffix) {
            if let Some(base) = base.strip_suffix('-') {
                return base;
            }
        }
    }
    name
}

/// The two source tables, loaded once and shared read-only by every query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterTables {
    pub records: Vec<EncounterRecord>,
    pub raids: Vec<RaidRecord>,
}

impl EncounterTables {
    /// Wraps already validated tables.
    pub fn new(records: Vec<EncounterRecord>, raids: Vec<RaidRecord>) -> Self {
        Self { records, raids }
    }

    /// Validates every row of both tables, failing on the first bad one.
    pub fn validate(&self) -> RrResult<()> {
        for record in &self.records {
            record.validate()?;
        }
        for raid in &self.raids {
            raid.validate()?;
        }
        Ok(())
    }

    /// Distinct methods of the encounter table, sorted.
    pub fn methods(&self) -> Vec<String> {
        distinct(self.records.iter().map(|r| r.method.as_str()))
    }

    /// Distinct locations across both tables, sorted.
    pub fn locations(&self) -> Vec<String> {
        distinct(
            self.records
                .iter()
                .map(|r| r.location.as_str())
                .chain(self.raids.iter().map(|r| r.location.as_str())),
        )
    }

    /// Distinct base species across both tables, sorted.
    pub fn base_creatures<S: AsRef<str>>(&self, suffixes: &[S]) -> Vec<String> {
        distinct(
            self.records
                .iter()
                .map(|r| r.base_pokemon(suffixes))
                .chain(self.raids.iter().map(|r| r.base_pokemon(suffixes))),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty() && self.raids.is_empty()
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FORM_SUFFIXES;

    #[test]
    fn test_strip_form_suffix() {
        assert_eq!(strip_form_suffix("Vulpix-Alola", &FORM_SUFFIXES), "Vulpix");
        assert_eq!(strip_form_suffix("Growlithe-Hisuian", &FORM_SUFFIXES), "Growlithe");
        assert_eq!(strip_form_suffix("Zorua-Hisui", &FORM_SUFFIXES), "Zorua");
        assert_eq!(strip_form_suffix("Pidgey", &FORM_SUFFIXES), "Pidgey");
        // Suffix must be hyphen separated
        assert_eq!(strip_form_suffix("Galar", &FORM_SUFFIXES), "Galar");
        assert_eq!(strip_form_suffix("XGalar", &FORM_SUFFIXES), "XGalar");
    }

    #[test]
    fn test_level_range_formatting() {
        let single = EncounterRecord::wild("Pidgey", "Route 1", "Grass", TimeOfDay::All, 5, 5);
        let span = EncounterRecord::wild("Pidgey", "Route 1", "Grass", TimeOfDay::All, 3, 5);
        assert_eq!(single.level_range().unwrap(), "5");
        assert_eq!(span.level_range().unwrap(), "3–5");
    }

    #[test]
    fn test_missing_levels_are_reported_with_row() {
        let mut row = EncounterRecord::wild("Eevee", "Celadon City", "Gift", TimeOfDay::All, 25, 25);
        row.max_level = None;

        match row.level_range() {
            Err(RrError::MissingField { row, field }) => {
                assert_eq!(field, "MaxLevel");
                assert_eq!(row, "Eevee @ Celadon City (Gift)");
            }
            other => panic!("expected missing field, got {other:?}"),
        }
        assert!(row.validate().is_err());
        assert!(!row.is_complete());
    }

    #[test]
    fn test_inverted_levels_rejected() {
        let row = EncounterRecord::wild("Rattata", "Route 1", "Grass", TimeOfDay::Day, 9, 4);
        assert!(matches!(
            row.validate(),
            Err(RrError::InvalidLevels { min: 9, max: 4, .. })
        ));
    }

    #[test]
    fn test_raid_rows() {
        let raid = RaidRecord::new("Charmander", "Route 3", 3);
        let row = raid.to_encounter();
        assert!(row.is_raid());
        assert!(row.is_complete());
        assert_eq!(row.time, TimeOfDay::All);
        assert_eq!(row.raid_star().unwrap(), 3);

        assert!(RaidRecord::new("Charmander", "Route 3", 7).validate().is_err());
        assert!(RaidRecord::new("Charmander", "Route 3", 0).validate().is_err());
    }

    #[test]
    fn test_gift_without_levels_validates_but_is_incomplete() {
        let row = EncounterRecord {
            pokemon: "Lapras".to_string(),
            location: "Silph Co.".to_string(),
            method: "Gift".to_string(),
            time: TimeOfDay::All,
            min_level: None,
            max_level: None,
            star: None,
        };
        assert!(row.validate().is_ok());
        assert!(!row.is_complete());
    }

    #[test]
    fn test_record_deserializes_from_export_columns() {
        let json = r#"{"Pokemon":"Oddish","Location":"Route 5","Method":"Grass","Time":"Night","MinLevel":13,"MaxLevel":15}"#;
        let row: EncounterRecord = serde_json::from_str(json).unwrap();
        assert_eq!(row.time, TimeOfDay::Night);
        assert_eq!(row.levels().unwrap(), (13, 15));
        assert_eq!(row.star, None);

        // Time defaults to All when the column is absent
        let json = r#"{"Pokemon":"Mew","Location":"Faraway Island","Method":"Raid","Star":6}"#;
        let row: EncounterRecord = serde_json::from_str(json).unwrap();
        assert_eq!(row.time, TimeOfDay::All);
        assert_eq!(row.star, Some(6));
    }

    #[test]
    fn test_table_listings() {
        let tables = EncounterTables::new(
            vec![
                EncounterRecord::wild("Vulpix-Alola", "Mt. Moon", "Grass", TimeOfDay::Night, 12, 14),
                EncounterRecord::wild("Magikarp", "Route 4", "Old Rod", TimeOfDay::All, 5, 5),
                EncounterRecord::wild("Vulpix", "Route 7", "Grass", TimeOfDay::Day, 20, 22),
            ],
            vec![RaidRecord::new("Onix", "Rock Tunnel", 2)],
        );

        assert_eq!(tables.methods(), vec!["Grass", "Old Rod"]);
        assert_eq!(
            tables.locations(),
            vec!["Mt. Moon", "Rock Tunnel", "Route 4", "Route 7"]
        );
        assert_eq!(tables.base_creatures(&FORM_SUFFIXES), vec!["Magikarp", "Onix", "Vulpix"]);
        // Only the given suffixes are stripped
        assert_eq!(
            tables.base_creatures(&["Galar"]),
            vec!["Magikarp", "Onix", "Vulpix", "Vulpix-Alola"]
        );
        assert!(tables.validate().is_ok());
    }

    #[test]
    fn test_raid_rewards_are_optional_in_export() {
        let json = r#"[
            {"Pokemon":"Onix","Location":"Rock Tunnel","Star":2},
            {"Pokemon":"Geodude","Location":"Rock Tunnel","Star":1,"Rewards":[{"Item":"Hard Stone","Chance":50}]}
        ]"#;
        let raids: Vec<RaidRecord> = serde_json::from_str(json).unwrap();
        assert!(raids[0].rewards.is_empty());
        assert_eq!(raids[1].rewards, vec![RaidReward::new("Hard Stone", 50)]);
        assert_eq!(raids[1].rewards[0].to_string(), "50% Hard Stone");

        // Empty reward lists are left out of the serialized row
        let out = serde_json::to_string(&raids[0]).unwrap();
        assert!(!out.contains("Rewards"));
    }

    #[test]
    fn test_time_of_day_parsing() {
        assert_eq!("day".parse::<TimeOfDay>().unwrap(), TimeOfDay::Day);
        assert_eq!(" Night ".parse::<TimeOfDay>().unwrap(), TimeOfDay::Night);
        assert_eq!("All".parse::<TimeOfDay>().unwrap(), TimeOfDay::All);
        assert!("dusk".parse::<TimeOfDay>().is_err());
    }
}
