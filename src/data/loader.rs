//! # Table Loading
//!
//! Reads the encounter and raid tables from JSON files.

use crate::data::{ingest_dump, Dump, EncounterRecord, EncounterTables, RaidRecord};
use crate::{RrError, RrResult};
use log::info;
use serde_json::Value;
use std::fs;
use std::path::Path;

impl EncounterTables {
    /// Loads the tables from disk.
    ///
    /// The encounter file may be a flat array of rows or a structured dump
    /// object; the raid file, when given, is a flat array of raid rows. Every row
    /// is validated and the first invalid one fails the load.
    pub fn load(encounters: impl AsRef<Path>, raids: Option<&Path>) -> RrResult<Self> {
        let encounters = encounters.as_ref();
        let encounter_json = fs::read_to_string(encounters)?;
        let raid_json = match raids {
            Some(path) => Some(fs::read_to_string(path)?),
            None => None,
        };

        let tables = Self::from_json_str(&encounter_json, raid_json.as_deref())?;
        info!(
            "Loaded {} encounter rows and {} raid rows from {}",
            tables.records.len(),
            tables.raids.len(),
            encounters.display()
        );
        Ok(tables)
    }

    /// Parses the tables from JSON text.
    pub fn from_json_str(encounters: &str, raids: Option<&str>) -> RrResult<Self> {
        let mut tables = match serde_json::from_str::<Value>(encounters)? {
            value @ Value::Array(_) => {
                let records: Vec<EncounterRecord> = serde_json::from_value(value)?;
                EncounterTables::new(records, Vec::new())
            }
            value @ Value::Object(_) => {
                let dump: Dump = serde_json::from_value(value)?;
                ingest_dump(dump)
            }
            _ => {
                return Err(RrError::InvalidConfig(
                    "encounter data must be a JSON array of rows or a dump object".to_string(),
                ))
            }
        };

        if let Some(raids) = raids {
            let extra: Vec<RaidRecord> = serde_json::from_str(raids)?;
            tables.raids.extend(extra);
        }

        tables.validate()?;
        Ok(tables)
    }
}
