//! # RR Locate Command Line Entry Point
//!
//! Loads the encounter tables once, runs the query given on the command line and
//! prints the matching encounter cards.

use clap::Parser;
use log::{debug, info};
use rrlocate::{
    build_cards, filter_with, move_table, raid_reward_table, render_json, render_table_json,
    render_table_text, render_text, run_query, Criteria, EncounterTables, LocationType, MoveSource,
    MoveTable, QueryConfig, RrError, RrResult, TableView, TimeChoice,
};
use std::path::PathBuf;

/// Command line arguments for the encounter browser.
#[derive(Parser, Debug)]
#[command(name = "rrlocate")]
#[command(about = "Find where and at which levels a creature can be encountered")]
#[command(version)]
struct Args {
    /// Encounter table: flat JSON array or structured dump object
    #[arg(short, long, required_unless_present = "moves")]
    encounters: Option<PathBuf>,

    /// Raid den table (flat JSON array)
    #[arg(short, long)]
    raids: Option<PathBuf>,

    /// Query configuration file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Creature to search for; regional forms are included
    #[arg(short, long, default_value = "All")]
    pokemon: String,

    /// Exact location name
    #[arg(short, long, default_value = "All")]
    location: String,

    /// Land or water encounters (both, land, water)
    #[arg(long, default_value = "both")]
    location_type: LocationType,

    /// Exact method, or All to use the location type's methods
    #[arg(short, long, default_value = "All")]
    method: String,

    /// Highest allowed level; 0 disables the cap
    #[arg(long, conflicts_with = "cap_point")]
    level_cap: Option<u32>,

    /// Named level cap milestone from the configuration
    #[arg(long)]
    cap_point: Option<String>,

    /// Time of day (all, day, night)
    #[arg(short, long, default_value = "all")]
    time: TimeChoice,

    /// Output format (text, json)
    #[arg(long, default_value = "text")]
    format: OutputFormat,

    /// List the methods present in the data and exit
    #[arg(long)]
    list_methods: bool,

    /// List the locations present in the data and exit
    #[arg(long)]
    list_locations: bool,

    /// List matching raid dens with their rewards instead of encounter cards
    #[arg(long)]
    raid_rewards: bool,

    /// TM, HM or tutor table (CSV); shows move locations instead of encounters
    #[arg(long)]
    moves: Option<PathBuf>,

    /// Which move table the --moves file holds (tm, hm, tutor)
    #[arg(long, default_value = "tm")]
    move_kind: MoveSource,

    /// Move to look up in the --moves table
    #[arg(long = "move", default_value = "All")]
    move_name: String,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

/// How results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> RrResult<()> {
    let args = Args::parse();

    initialize_logging(&args.log_level)?;

    info!("Starting rrlocate v{}", rrlocate::VERSION);

    if let Some(path) = &args.moves {
        let table = MoveTable::load(args.move_kind, path)?.filter_by_move(&args.move_name);
        if table.is_empty() {
            println!("No move locations found. Try adjusting your search.");
            return Ok(());
        }
        return print_table(&move_table(&table), args.format);
    }

    let config = match &args.config {
        Some(path) => QueryConfig::from_file(path)?,
        None => QueryConfig::default(),
    };
    let encounters = args
        .encounters
        .as_deref()
        .ok_or_else(|| RrError::InvalidConfig("--encounters is required".to_string()))?;
    let tables = EncounterTables::load(encounters, args.raids.as_deref())?;

    if args.list_methods {
        for method in tables.methods() {
            println!("{method}");
        }
        return Ok(());
    }
    if args.list_locations {
        for location in tables.locations() {
            println!("{location}");
        }
        return Ok(());
    }

    let criteria = build_criteria(&args, &config)?;
    debug!("Running query {:?}", criteria);

    if args.raid_rewards {
        let dens = filter_with(&tables.records, &tables.raids, &criteria, &config).raids;
        if dens.is_empty() {
            println!("No raid dens found. Try adjusting your search.");
            return Ok(());
        }
        return print_table(&raid_reward_table(&dens), args.format);
    }

    let results = run_query(&tables, &criteria, &config)?;
    if results.is_empty() {
        println!("No encounters found. Try adjusting your search.");
        return Ok(());
    }

    let cards = build_cards(&results, criteria.effective_time());
    match args.format {
        OutputFormat::Text => print!("{}", render_text(&cards)),
        OutputFormat::Json => println!("{}", render_json(&cards)?),
    }
    Ok(())
}

fn print_table(table: &TableView, format: OutputFormat) -> RrResult<()> {
    match format {
        OutputFormat::Text => print!("{}", render_table_text(table)),
        OutputFormat::Json => println!("{}", render_table_json(table)?),
    }
    Ok(())
}

/// Initializes the logging system based on the specified log level.
///
/// `RUST_LOG`, when set, takes precedence over the flag.
fn initialize_logging(log_level: &str) -> RrResult<()> {
    let level = match log_level.to_lowercase().as_str() {
        "error" => log::LevelFilter::Error,
        "warn" => log::LevelFilter::Warn,
        "info" => log::LevelFilter::Info,
        "debug" => log::LevelFilter::Debug,
        "trace" => log::LevelFilter::Trace,
        other => {
            return Err(RrError::InvalidConfig(format!("unknown log level: {other}")));
        }
    };

    env_logger::Builder::new()
        .filter_level(level)
        .format_target(false)
        .parse_default_env()
        .init();

    Ok(())
}

/// Translates command line selections into query criteria.
fn build_criteria(args: &Args, config: &QueryConfig) -> RrResult<Criteria> {
    let level_cap = match (&args.cap_point, args.level_cap) {
        (Some(point), _) => config.level_cap_for(point)?,
        (None, Some(cap)) => cap,
        (None, None) => 0,
    };

    Ok(Criteria::new()
        .with_pokemon(args.pokemon.as_str())
        .with_location(args.location.as_str())
        .with_location_type(args.location_type)
        .with_method(args.method.as_str())
        .with_level_cap(level_cap)
        .with_time(args.time))
}
