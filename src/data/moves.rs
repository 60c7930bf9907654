//! # Move Tables
//!
//! Where TMs, HMs and move tutors can be found. Each kind comes from its own
//! CSV export (`tms.csv`, `hms.csv`, `tutors.csv`). TM and HM rows carry a
//! `Number`, tutor rows carry a `Cost` instead.

use crate::query::ANY;
use crate::{RrError, RrResult};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

/// Which move table a file holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveSource {
    #[default]
    Tm,
    Hm,
    Tutor,
}

impl MoveSource {
    /// Column headers shown for this table.
    pub fn headers(self) -> [&'static str; 3] {
        match self {
            MoveSource::Tm | MoveSource::Hm => ["TM/HM", "Move", "Location"],
            MoveSource::Tutor => ["Move", "Location", "Cost"],
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            MoveSource::Tm => "TMs",
            MoveSource::Hm => "HMs",
            MoveSource::Tutor => "Tutors",
        }
    }
}

impl fmt::Display for MoveSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for MoveSource {
    type Err = RrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tm" | "tms" => Ok(MoveSource::Tm),
            "hm" | "hms" => Ok(MoveSource::Hm),
            "tutor" | "tutors" => Ok(MoveSource::Tutor),
            other => Err(RrError::InvalidConfig(format!("unknown move table: {other}"))),
        }
    }
}

/// One row of a TM, HM or tutor table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MoveLocation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(rename = "Move")]
    pub move_name: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<String>,
}

impl MoveLocation {
    fn label(&self) -> String {
        format!("{} @ {}", self.move_name, self.location)
    }

    /// The three display cells in header order for `source`.
    pub fn cells(&self, source: MoveSource) -> [String; 3] {
        let optional = |value: &Option<String>| value.clone().unwrap_or_default();
        match source {
            MoveSource::Tm | MoveSource::Hm => [
                optional(&self.number),
                self.move_name.clone(),
                self.location.clone(),
            ],
            MoveSource::Tutor => [
                self.move_name.clone(),
                self.location.clone(),
                optional(&self.cost),
            ],
        }
    }
}

/// A loaded move table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MoveTable {
    pub source: MoveSource,
    pub rows: Vec<MoveLocation>,
}

impl MoveTable {
    pub fn new(source: MoveSource, rows: Vec<MoveLocation>) -> Self {
        Self { source, rows }
    }

    /// Reads a CSV export with a header row.
    pub fn from_csv_reader<R: Read>(source: MoveSource, reader: R) -> RrResult<Self> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let rows = rdr
            .deserialize()
            .collect::<Result<Vec<MoveLocation>, csv::Error>>()?;

        let table = Self::new(source, rows);
        table.validate()?;
        Ok(table)
    }

    pub fn from_csv_str(source: MoveSource, data: &str) -> RrResult<Self> {
        Self::from_csv_reader(source, data.as_bytes())
    }

    /// Loads and validates a CSV export from disk.
    pub fn load(source: MoveSource, path: impl AsRef<Path>) -> RrResult<Self> {
        let path = path.as_ref();
        let table = Self::from_csv_reader(source, File::open(path)?)?;
        info!("Loaded {} {} rows from {}", table.rows.len(), source, path.display());
        Ok(table)
    }

    /// Every row needs a move and a location, plus the number or cost its table shows.
    pub fn validate(&self) -> RrResult<()> {
        for row in &self.rows {
            let missing = |field| RrError::MissingField {
                row: row.label(),
                field,
            };
            if row.move_name.is_empty() {
                return Err(missing("Move"));
            }
            if row.location.is_empty() {
                return Err(missing("Location"));
            }
            match self.source {
                MoveSource::Tm | MoveSource::Hm if row.number.is_none() => {
                    return Err(missing("Number"));
                }
                MoveSource::Tutor if row.cost.is_none() => return Err(missing("Cost")),
                _ => {}
            }
        }
        Ok(())
    }

    /// Distinct move names, sorted.
    pub fn moves(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|r| r.move_name.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Rows for one move; `"All"` or an empty name keeps every row.
    pub fn filter_by_move(&self, wanted: &str) -> MoveTable {
        let wanted = wanted.trim();
        let rows = if wanted.is_empty() || wanted == ANY {
            self.rows.clone()
        } else {
            self.rows
                .iter()
                .filter(|row| row.move_name == wanted)
                .cloned()
                .collect()
        };
        MoveTable::new(self.source, rows)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TMS: &str = "Number,Move,Location\n\
                       TM01,Focus Punch,Silph Co.\n\
                       TM06, Toxic ,Fuchsia City\n\
                       TM06,Toxic,Route 17\n";

    const TUTORS: &str = "Move,Location,Cost\n\
                          Mega Punch,Route 4,Free\n\
                          Softboiled,Celadon City,2000\n";

    #[test]
    fn test_load_tm_table() {
        let table = MoveTable::from_csv_str(MoveSource::Tm, TMS).unwrap();
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[1].move_name, "Toxic");
        assert_eq!(table.rows[1].number.as_deref(), Some("TM06"));
        assert_eq!(table.rows[0].cost, None);
        assert_eq!(table.moves(), vec!["Focus Punch", "Toxic"]);
    }

    #[test]
    fn test_filter_by_move() {
        let table = MoveTable::from_csv_str(MoveSource::Tm, TMS).unwrap();

        let toxic = table.filter_by_move("Toxic");
        assert_eq!(toxic.rows.len(), 2);
        assert!(toxic.rows.iter().all(|r| r.move_name == "Toxic"));

        assert_eq!(table.filter_by_move("All"), table);
        assert_eq!(table.filter_by_move(""), table);
        assert!(table.filter_by_move("Surf").is_empty());
    }

    #[test]
    fn test_tutor_cells_follow_headers() {
        let table = MoveTable::from_csv_str(MoveSource::Tutor, TUTORS).unwrap();
        assert_eq!(MoveSource::Tutor.headers(), ["Move", "Location", "Cost"]);
        assert_eq!(
            table.rows[1].cells(MoveSource::Tutor),
            ["Softboiled".to_string(), "Celadon City".to_string(), "2000".to_string()]
        );
        assert_eq!(
            table.rows[0].cells(MoveSource::Tm)[0],
            "",
            "tutor rows have no number"
        );
    }

    #[test]
    fn test_missing_number_rejected() {
        let csv = "Number,Move,Location\n,Cut,S.S. Anne\n";
        match MoveTable::from_csv_str(MoveSource::Hm, csv) {
            Err(RrError::MissingField { row, field }) => {
                assert_eq!(field, "Number");
                assert_eq!(row, "Cut @ S.S. Anne");
            }
            other => panic!("expected missing number, got {other:?}"),
        }
    }

    #[test]
    fn test_tutor_table_requires_cost_column() {
        let csv = "Move,Location\nMega Punch,Route 4\n";
        assert!(MoveTable::from_csv_str(MoveSource::Tutor, csv).is_err());
    }

    #[test]
    fn test_parse_move_source() {
        assert_eq!("tm".parse::<MoveSource>().unwrap(), MoveSource::Tm);
        assert_eq!("HMs".parse::<MoveSource>().unwrap(), MoveSource::Hm);
        assert_eq!("tutors".parse::<MoveSource>().unwrap(), MoveSource::Tutor);
        assert!("berries".parse::<MoveSource>().is_err());
    }
}
