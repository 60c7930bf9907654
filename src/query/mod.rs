//! # Query Module
//!
//! The per-query pipeline: filter the source tables, then consolidate what is
//! left into per-creature, per-time-bucket entries.
//!
//! - `ranges` merges level ranges into minimal spans
//! - `consolidation` groups rows by location and method, merging Day+Night twins
//! - `filtering` applies the user's criteria to both tables

pub mod consolidation;
pub mod filtering;
pub mod ranges;

pub use consolidation::*;
pub use filtering::*;
pub use ranges::*;

use crate::config::{FORM_SUFFIXES, LAND_METHODS};
use crate::data::EncounterTables;
use crate::{RrError, RrResult};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A named story milestone and the level cap that applies at it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelCapPoint {
    pub point: String,
    /// Highest allowed level; 0 means uncapped
    pub cap: u32,
}

impl LevelCapPoint {
    pub fn new(point: impl Into<String>, cap: u32) -> Self {
        Self {
            point: point.into(),
            cap,
        }
    }
}

/// Configuration for filtering and consolidation.
///
/// Controls which methods count as land methods, which name suffixes mark a
/// regional form, and the level cap milestones offered to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Land methods; Grass, Game Corner and Raid are always included and everything else is water
    pub land_methods: Vec<String>,
    /// Regional form suffixes stripped when matching a creature
    pub form_suffixes: Vec<String>,
    /// Level cap milestones in story order, normally supplied by a config file
    pub level_caps: Vec<LevelCapPoint>,
}

impl QueryConfig {
    /// Creates the default configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use rrlocate::QueryConfig;
    ///
    /// let config = QueryConfig::new();
    /// assert!(config.land_methods.iter().any(|m| m == "Raid"));
    /// assert_eq!(config.level_cap_for("None").unwrap(), 0);
    /// ```
    pub fn new() -> Self {
        Self {
            land_methods: LAND_METHODS.iter().map(|m| m.to_string()).collect(),
            form_suffixes: FORM_SUFFIXES.iter().map(|s| s.to_string()).collect(),
            level_caps: vec![LevelCapPoint::new("None", 0)],
        }
    }

    /// Creates a small configuration for tests with two milestones.
    pub fn for_testing() -> Self {
        Self {
            level_caps: vec![LevelCapPoint::new("None", 0), LevelCapPoint::new("Brock", 14)],
            ..Self::new()
        }
    }

    /// Loads a configuration file; missing keys fall back to the defaults.
    pub fn from_file(path: impl AsRef<Path>) -> RrResult<Self> {
        let path = path.as_ref();
        let config: QueryConfig = serde_json::from_str(&fs::read_to_string(path)?)?;
        config.validate()?;
        debug!("Loaded query configuration from {}", path.display());
        Ok(config)
    }

    /// Checks the configuration for values the filter cannot use.
    pub fn validate(&self) -> RrResult<()> {
        if self.land_methods.iter().any(|m| m.trim().is_empty()) {
            return Err(RrError::InvalidConfig(
                "land_methods contains an empty method".to_string(),
            ));
        }
        if self.form_suffixes.iter().any(|s| s.trim().is_empty()) {
            return Err(RrError::InvalidConfig(
                "form_suffixes contains an empty suffix".to_string(),
            ));
        }
        Ok(())
    }

    /// Looks up the level cap of a milestone by name (case-insensitive).
    pub fn level_cap_for(&self, point: &str) -> RrResult<u32> {
        self.level_caps
            .iter()
            .find(|p| p.point.eq_ignore_ascii_case(point.trim()))
            .map(|p| p.cap)
            .ok_or_else(|| RrError::UnknownLevelCap(point.to_string()))
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs one full query: filter, drop incomplete rows, consolidate per creature.
pub fn run_query(
    tables: &EncounterTables,
    criteria: &Criteria,
    config: &QueryConfig,
) -> RrResult<Vec<CreatureEncounters>> {
    let (filtered, dropped) =
        filter_with(&tables.records, &tables.raids, criteria, config).retain_complete();
    if dropped > 0 {
        warn!("Skipped {} rows without levels", dropped);
    }
    consolidate_all(&filtered.records, &filtered.raids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{EncounterRecord, RaidRecord, TimeOfDay};
    use std::io::Write;

    #[test]
    fn test_query_config_creation() {
        let config = QueryConfig::new();
        assert_eq!(config.land_methods, vec!["Grass", "Game Corner", "Raid"]);
        assert!(config.form_suffixes.iter().any(|s| s == "Alola"));
        assert_eq!(config.level_caps[0].cap, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_level_cap_lookup() {
        let config = QueryConfig::for_testing();
        assert_eq!(config.level_cap_for("brock").unwrap(), 14);
        assert!(matches!(
            config.level_cap_for("Lance"),
            Err(RrError::UnknownLevelCap(name)) if name == "Lance"
        ));
    }

    #[test]
    fn test_config_file_defaults_missing_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"land_methods": ["Grass", "Headbutt"]}}"#).unwrap();

        let config = QueryConfig::from_file(file.path()).unwrap();
        assert_eq!(config.land_methods, vec!["Grass", "Headbutt"]);
        assert_eq!(config.form_suffixes, QueryConfig::new().form_suffixes);
    }

    #[test]
    fn test_config_rejects_empty_method() {
        let config = QueryConfig {
            land_methods: vec![" ".to_string()],
            ..QueryConfig::new()
        };
        assert!(matches!(config.validate(), Err(RrError::InvalidConfig(_))));
    }

    #[test]
    fn test_run_query_skips_incomplete_rows() {
        let mut gift = EncounterRecord::wild("Lapras", "Silph Co.", "Gift", TimeOfDay::All, 25, 25);
        gift.min_level = None;
        gift.max_level = None;
        let tables = EncounterTables::new(
            vec![
                gift,
                EncounterRecord::wild("Lapras", "Route 20", "Surf", TimeOfDay::All, 30, 35),
            ],
            vec![RaidRecord::new("Lapras", "Route 20", 4)],
        );

        let results = run_query(&tables, &Criteria::new(), &QueryConfig::new()).unwrap();
        assert_eq!(results.len(), 1);
        let methods: Vec<&str> = results[0].all.iter().map(|e| e.method.as_str()).collect();
        assert_eq!(methods, vec!["Surf", "Raid"]);
    }
}
