//! # Query Filter
//!
//! Selects the encounter and raid rows matching a user query. All active criteria
//! must hold. The raid table is only filtered by creature and location, and is
//! left out entirely when browsing water encounters.

use crate::config::LAND_METHODS;
use crate::data::{strip_form_suffix, EncounterRecord, RaidRecord, TimeOfDay};
use crate::query::QueryConfig;
use crate::RrError;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Wildcard accepted wherever a single creature, location or method is chosen.
pub const ANY: &str = "All";

/// Land/water toggle of the browser.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocationType {
    #[default]
    Both,
    Land,
    Water,
}

impl FromStr for LocationType {
    type Err = RrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "both" | "all" => Ok(LocationType::Both),
            "land" => Ok(LocationType::Land),
            "water" => Ok(LocationType::Water),
            other => Err(RrError::InvalidConfig(format!("unknown location type: {other}"))),
        }
    }
}

impl fmt::Display for LocationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LocationType::Both => "Both",
            LocationType::Land => "Land",
            LocationType::Water => "Water",
        })
    }
}

/// Time-of-day selector of the browser.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeChoice {
    #[default]
    All,
    Day,
    Night,
}

impl TimeChoice {
    /// Whether a row with the given availability is visible at this time.
    pub fn admits(self, time: TimeOfDay) -> bool {
        match self {
            TimeChoice::All => true,
            TimeChoice::Day => matches!(time, TimeOfDay::Day | TimeOfDay::All),
            TimeChoice::Night => matches!(time, TimeOfDay::Night | TimeOfDay::All),
        }
    }
}

impl FromStr for TimeChoice {
    type Err = RrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<TimeOfDay>()? {
            TimeOfDay::All => Ok(TimeChoice::All),
            TimeOfDay::Day => Ok(TimeChoice::Day),
            TimeOfDay::Night => Ok(TimeChoice::Night),
        }
    }
}

/// Method class a wildcard method expands to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodClass {
    /// The configured land methods
    Land,
    /// Every method in the data that is not a land method
    Water,
    /// Every method in the data
    All,
}

impl From<LocationType> for MethodClass {
    fn from(location_type: LocationType) -> Self {
        match location_type {
            LocationType::Both => MethodClass::All,
            LocationType::Land => MethodClass::Land,
            LocationType::Water => MethodClass::Water,
        }
    }
}

/// Method class expansions computed from the loaded data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodClasses {
    pub land: Vec<String>,
    pub water: Vec<String>,
    pub all: Vec<String>,
}

impl MethodClasses {
    /// Derives the classes from the distinct methods present in `records`.
    ///
    /// `land_methods` extends the built-in land methods; Grass, Game Corner and
    /// Raid are land methods whatever the configuration says.
    pub fn from_records(records: &[EncounterRecord], land_methods: &[String]) -> Self {
        let all: Vec<String> = records
            .iter()
            .map(|r| r.method.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect();

        let mut land = land_methods.to_vec();
        for method in LAND_METHODS {
            if !land.iter().any(|m| m == method) {
                land.push(method.to_string());
            }
        }
        let water = all
            .iter()
            .filter(|method| !land.contains(method))
            .cloned()
            .collect();

        Self { land, water, all }
    }

    /// Methods belonging to a class.
    pub fn expand(&self, class: MethodClass) -> &[String] {
        match class {
            MethodClass::Land => &self.land,
            MethodClass::Water => &self.water,
            MethodClass::All => &self.all,
        }
    }
}

/// A user query. `None` fields and a zero level cap disable that criterion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria {
    /// Base species; matches every regional form
    pub pokemon: Option<String>,
    pub location: Option<String>,
    pub location_type: LocationType,
    /// Exact method, or `None` to expand the location type's method class
    pub method: Option<String>,
    /// Highest allowed `MaxLevel`; 0 disables the cap
    pub level_cap: u32,
    pub time: TimeChoice,
}

impl Criteria {
    /// Creates a query matching everything.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pokemon(mut self, pokemon: impl Into<String>) -> Self {
        self.pokemon = wildcard(pokemon.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = wildcard(location.into());
        self
    }

    pub fn with_location_type(mut self, location_type: LocationType) -> Self {
        self.location_type = location_type;
        self
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = wildcard(method.into());
        self
    }

    pub fn with_level_cap(mut self, level_cap: u32) -> Self {
        self.level_cap = level_cap;
        self
    }

    pub fn with_time(mut self, time: TimeChoice) -> Self {
        self.time = time;
        self
    }

    /// Time filtering is switched off while browsing water encounters.
    pub fn effective_time(&self) -> TimeChoice {
        match self.location_type {
            LocationType::Water => TimeChoice::All,
            _ => self.time,
        }
    }

    /// Whether raid dens take part in this query.
    pub fn includes_raids(&self) -> bool {
        self.location_type != LocationType::Water
    }
}

fn wildcard(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed == ANY {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Rows of both tables that satisfy a query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterResult {
    pub records: Vec<EncounterRecord>,
    pub raids: Vec<RaidRecord>,
}

impl FilterResult {
    /// Distinct display names across both tables, sorted.
    ///
    /// A creature is listed when it has a matching wild row or a matching raid.
    pub fn creatures(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.pokemon.as_str())
            .chain(self.raids.iter().map(|r| r.pokemon.as_str()))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty() && self.raids.is_empty()
    }

    /// Drops encounter rows that lack the fields needed for display.
    ///
    /// Returns the cleaned result and the number of dropped rows.
    pub fn retain_complete(mut self) -> (Self, usize) {
        let before = self.records.len();
        self.records.retain(EncounterRecord::is_complete);
        let dropped = before - self.records.len();
        (self, dropped)
    }
}

/// Filters both tables with the default configuration.
pub fn filter(
    records: &[EncounterRecord],
    raids: &[RaidRecord],
    criteria: &Criteria,
) -> FilterResult {
    filter_with(records, raids, criteria, &QueryConfig::default())
}

/// Filters both tables using the land methods and form suffixes from `config`.
pub fn filter_with(
    records: &[EncounterRecord],
    raids: &[RaidRecord],
    criteria: &Criteria,
    config: &QueryConfig,
) -> FilterResult {
    let classes = MethodClasses::from_records(records, &config.land_methods);
    let allowed_methods: Option<&[String]> = match criteria.method {
        Some(_) => None,
        None => Some(classes.expand(criteria.location_type.into())),
    };
    let time = criteria.effective_time();
    let suffixes = &config.form_suffixes;

    let matches_place = |pokemon: &str, location: &str| {
        let pokemon_ok = criteria
            .pokemon
            .as_deref()
            .map_or(true, |wanted| strip_form_suffix(pokemon, suffixes) == wanted);
        let location_ok = criteria
            .location
            .as_deref()
            .map_or(true, |wanted| location == wanted);
        pokemon_ok && location_ok
    };

    let filtered_records: Vec<EncounterRecord> = records
        .iter()
        .filter(|row| matches_place(&row.pokemon, &row.location))
        .filter(|row| match (&criteria.method, allowed_methods) {
            (Some(method), _) => &row.method == method,
            (None, Some(allowed)) => allowed.contains(&row.method),
            (None, None) => true,
        })
        .filter(|row| {
            criteria.level_cap == 0
                || row.is_raid()
                || row.max_level.is_some_and(|max| max <= criteria.level_cap)
        })
        .filter(|row| time.admits(row.time))
        .cloned()
        .collect();

    let filtered_raids: Vec<RaidRecord> = if criteria.includes_raids() {
        raids
            .iter()
            .filter(|raid| matches_place(&raid.pokemon, &raid.location))
            .cloned()
            .collect()
    } else {
        Vec::new()
    };

    debug!(
        "Filter kept {}/{} encounter rows and {}/{} raid rows",
        filtered_records.len(),
        records.len(),
        filtered_raids.len(),
        raids.len()
    );

    FilterResult {
        records: filtered_records,
        raids: filtered_raids,
    }
}
