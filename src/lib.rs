//! # RR Locate
//!
//! Answers "where can I find creature X" over the Radical Red encounter tables.
//!
//! ## Architecture Overview
//!
//! The crate is a single batch pipeline run once per query:
//!
//! - **Data**: immutable source tables (wild encounters and raid dens) loaded once
//! - **Filter**: selects rows by creature, location, method class, level cap and time
//! - **Consolidation**: groups the survivors per creature and time bucket, merging
//!   overlapping level ranges and collapsing raid tiers
//! - **Rendering**: thin text/JSON card output for the command line
//!
//! Alongside the encounter pipeline, `data::moves` loads the TM, HM and move
//! tutor location tables and filters them by move.
//!
//! Every query reads the shared tables and produces fresh values, so the tables can
//! be shared between threads without locking.

pub mod data;
pub mod query;
pub mod rendering;

// Core module re-exports
pub use data::*;
pub use query::*;
pub use rendering::*;

/// Core error type for the encounter browser.
#[derive(thiserror::Error, Debug)]
pub enum RrError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// CSV move table could not be read
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A level range string could not be parsed
    #[error("Malformed level range: {input:?}")]
    MalformedRange { input: String },

    /// A row lacks a field its method requires
    #[error("Row {row} is missing required field {field}")]
    MissingField { row: String, field: &'static str },

    /// Raid tier outside the valid star range
    #[error("Row {row} has invalid raid tier {star}")]
    InvalidStar { row: String, star: u8 },

    /// Level bounds are inverted
    #[error("Row {row} has MinLevel {min} above MaxLevel {max}")]
    InvalidLevels { row: String, min: u32, max: u32 },

    /// Named level cap milestone is not configured
    #[error("Unknown level cap: {0}")]
    UnknownLevelCap(String),

    /// Configuration value cannot be interpreted
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type used throughout the crate.
pub type RrResult<T> = Result<T, RrError>;

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Fixed vocabulary shared by the data, query and rendering layers.
pub mod config {
    /// Method name carried by raid den rows
    pub const RAID_METHOD: &str = "Raid";

    /// Synthetic method for encounters available both day and night
    pub const WALK_METHOD: &str = "Walk";

    /// Method assigned to dump sections whose key only names a time of day
    pub const DEFAULT_WILD_METHOD: &str = "Grass";

    /// Methods that make up the land class
    pub const LAND_METHODS: [&str; 3] = ["Grass", "Game Corner", "Raid"];

    /// Regional form suffixes stripped to get the base species
    pub const FORM_SUFFIXES: [&str; 5] = ["Alola", "Galar", "Hisui", "Hisuian", "Paldea"];

    /// Lowest raid tier
    pub const MIN_STAR: u8 = 1;

    /// Highest raid tier
    pub const MAX_STAR: u8 = 6;

    /// Badge color for methods without a dedicated one
    pub const DEFAULT_METHOD_COLOR: &str = "#555555";
}
