//! # Dump Ingestion
//!
//! Converts the structured encounter dump (`location -> method -> entries`) into
//! the flat encounter and raid tables.
//!
//! Dump entries come in several shapes: parsed wild slots, raid blocks with
//! reward lists, free-text gift/trade lines and lines the extractor could not
//! parse. Each entry is classified once into a [`DumpEntry`] so the rest of the
//! crate never has to inspect raw JSON.

use crate::config::{DEFAULT_WILD_METHOD, MAX_STAR, MIN_STAR, RAID_METHOD};
use crate::data::{EncounterRecord, EncounterTables, RaidRecord, RaidReward, TimeOfDay};
use log::{debug, warn};
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Raw dump shape: location name to method key to entry list.
pub type Dump = BTreeMap<String, BTreeMap<String, Vec<RawDumpEntry>>>;

/// Wild slot line such as `"20% Pidgey 3-5"`. Trailing notes are ignored.
static ENCOUNTER_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d+)%\s+(.+?)\s+(\d+)(?:\s*[-–]\s*(\d+))?")
        .expect("Failed to compile encounter line regex")
});

/// Raid reward line such as `"50% Hard Stone"`.
static REWARD_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d+)%\s+(.+?)\s*$").expect("Failed to compile reward line regex")
});

/// Gift line such as `"Eevee Lv. 25"` or `"Lapras (Lv 25)"`.
static GIFT_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(.+?)\s*\(?\s*lv\.?\s*(\d+)(?:\s*[-–]\s*(\d+))?\s*\)?\s*$")
        .expect("Failed to compile gift line regex")
});

/// An entry exactly as it appears in the dump JSON.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawDumpEntry {
    Slot(StructuredEncounter),
    Raid(RaidBlock),
    Unparsed { raw: String },
    Text(String),
    Other(serde_json::Value),
}

/// A parsed wild slot. The dump's `Rarity` column is not displayed and is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StructuredEncounter {
    pub pokemon: String,
    pub min_level: u32,
    pub max_level: u32,
}

/// A raid den block: the creature plus its reward table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RaidBlock {
    pub pokemon: String,
    #[serde(default)]
    pub rewards: Vec<RawReward>,
}

/// A reward entry as it appears in a raid block.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawReward {
    Parsed(RaidReward),
    Unparsed { raw: String },
    Text(String),
    Other(serde_json::Value),
}

impl RawReward {
    /// Typed reward, or `None` when the entry has no readable chance.
    pub fn into_reward(self) -> Option<RaidReward> {
        match self {
            RawReward::Parsed(reward) => Some(reward),
            RawReward::Text(line) => parse_reward_line(&line),
            RawReward::Unparsed { .. } | RawReward::Other(_) => None,
        }
    }
}

/// A dump entry after classification.
#[derive(Debug, Clone, PartialEq)]
pub enum DumpEntry {
    Structured(StructuredEncounter),
    Raid(RaidBlock),
    Gift(String),
    Raw(String),
}

/// What kind of section a method key introduces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    Wild,
    /// Raid dens; `star` is `None` when the key carries no usable tier
    Raid { star: Option<u8> },
    Gift,
}

/// A method key split into its display method, time and section kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodKey {
    pub method: String,
    pub time: TimeOfDay,
    pub kind: MethodKind,
}

/// Normalizes a dump method key.
///
/// # Examples
///
/// ```
/// use rrlocate::{normalize_method, MethodKind, TimeOfDay};
///
/// let key = normalize_method("Grass (Night)");
/// assert_eq!(key.method, "Grass");
/// assert_eq!(key.time, TimeOfDay::Night);
///
/// let key = normalize_method("Raid ★4");
/// assert_eq!(key.kind, MethodKind::Raid { star: Some(4) });
/// ```
pub fn normalize_method(key: &str) -> MethodKey {
    let lower = key.to_lowercase();

    if lower.contains("raid") {
        let star = key
            .chars()
            .filter_map(|c| c.to_digit(10))
            .map(|d| d as u8)
            .next()
            .filter(|star| (MIN_STAR..=MAX_STAR).contains(star));
        return MethodKey {
            method: RAID_METHOD.to_string(),
            time: TimeOfDay::All,
            kind: MethodKind::Raid { star },
        };
    }

    let mut day = false;
    let mut night = false;
    let cleaned = key.replace(['(', ')'], " ");
    let words: Vec<&str> = cleaned
        .split_whitespace()
        .filter(|word| {
            if word.eq_ignore_ascii_case("day") {
                day = true;
                false
            } else if word.eq_ignore_ascii_case("night") {
                night = true;
                false
            } else {
                true
            }
        })
        .collect();

    let time = match (day, night) {
        (true, false) => TimeOfDay::Day,
        (false, true) => TimeOfDay::Night,
        _ => TimeOfDay::All,
    };
    let method = if words.is_empty() {
        DEFAULT_WILD_METHOD.to_string()
    } else {
        words.join(" ")
    };
    let kind = if lower.contains("gift") || lower.contains("trade") {
        MethodKind::Gift
    } else {
        MethodKind::Wild
    };

    MethodKey { method, time, kind }
}

/// Parses a wild slot line from the text extractor.
pub fn parse_encounter_line(line: &str) -> Option<StructuredEncounter> {
    let caps = ENCOUNTER_LINE_RE.captures(line)?;
    let min_level: u32 = caps[3].parse().ok()?;
    let max_level = match caps.get(4) {
        Some(max) => max.as_str().parse().ok()?,
        None => min_level,
    };
    Some(StructuredEncounter {
        pokemon: caps[2].trim().to_string(),
        min_level,
        max_level,
    })
}

/// Parses a raid reward line.
///
/// # Examples
///
/// ```
/// use rrlocate::{parse_reward_line, RaidReward};
///
/// assert_eq!(parse_reward_line("50% Hard Stone"), Some(RaidReward::new("Hard Stone", 50)));
/// assert_eq!(parse_reward_line("Hard Stone"), None);
/// ```
pub fn parse_reward_line(line: &str) -> Option<RaidReward> {
    let caps = REWARD_LINE_RE.captures(line)?;
    Some(RaidReward::new(caps[2].to_string(), caps[1].parse().ok()?))
}

/// Parses a gift or trade line into a creature name and its level bounds.
pub fn parse_gift_line(line: &str) -> Option<(String, u32, u32)> {
    let caps = GIFT_LINE_RE.captures(line)?;
    let min_level: u32 = caps[2].parse().ok()?;
    let max_level = match caps.get(3) {
        Some(max) => max.as_str().parse().ok()?,
        None => min_level,
    };
    let name = caps[1].trim().trim_end_matches(['(', ',', '-']).trim();
    if name.is_empty() {
        return None;
    }
    Some((name.to_string(), min_level, max_level))
}

impl DumpEntry {
    /// Decides what a raw entry is, given the section it was found in.
    pub fn classify(raw: RawDumpEntry, kind: MethodKind) -> Self {
        match raw {
            RawDumpEntry::Slot(slot) => DumpEntry::Structured(slot),
            RawDumpEntry::Raid(block) => DumpEntry::Raid(block),
            RawDumpEntry::Unparsed { raw } => DumpEntry::Raw(raw),
            RawDumpEntry::Text(text) => match kind {
                MethodKind::Gift => DumpEntry::Gift(text),
                // Raid sections list the creature name on its own
                MethodKind::Raid { .. } => DumpEntry::Raid(RaidBlock {
                    pokemon: text.trim().to_string(),
                    rewards: Vec::new(),
                }),
                MethodKind::Wild => match parse_encounter_line(&text) {
                    Some(slot) => DumpEntry::Structured(slot),
                    None => DumpEntry::Raw(text),
                },
            },
            RawDumpEntry::Other(value) => DumpEntry::Raw(value.to_string()),
        }
    }
}

/// Flattens a dump into encounter and raid tables.
///
/// Entries that cannot become a displayable row are skipped with a warning.
pub fn ingest_dump(dump: Dump) -> EncounterTables {
    let mut records = Vec::new();
    let mut raids = Vec::new();
    let mut skipped = 0usize;

    for (location, sections) in dump {
        for (key, entries) in sections {
            let method_key = normalize_method(&key);

            for raw in entries {
                match DumpEntry::classify(raw, method_key.kind) {
                    DumpEntry::Structured(slot) => {
                        let (min, max) = if slot.min_level <= slot.max_level {
                            (slot.min_level, slot.max_level)
                        } else {
                            (slot.max_level, slot.min_level)
                        };
                        records.push(EncounterRecord::wild(
                            slot.pokemon,
                            location.clone(),
                            method_key.method.clone(),
                            method_key.time,
                            min,
                            max,
                        ));
                    }
                    DumpEntry::Raid(block) => match method_key.kind {
                        MethodKind::Raid { star: Some(star) } => {
                            let total = block.rewards.len();
                            let rewards: Vec<RaidReward> = block
                                .rewards
                                .into_iter()
                                .filter_map(RawReward::into_reward)
                                .collect();
                            if rewards.len() < total {
                                warn!(
                                    "Dropped {} unreadable rewards of raid {} at {}",
                                    total - rewards.len(),
                                    block.pokemon,
                                    location
                                );
                            }
                            raids.push(
                                RaidRecord::new(block.pokemon, location.clone(), star)
                                    .with_rewards(rewards),
                            );
                        }
                        _ => {
                            warn!(
                                "Skipping raid {} at {}: section {:?} has no star tier",
                                block.pokemon, location, key
                            );
                            skipped += 1;
                        }
                    },
                    DumpEntry::Gift(text) => match parse_gift_line(&text) {
                        Some((pokemon, min, max)) => {
                            records.push(EncounterRecord::wild(
                                pokemon,
                                location.clone(),
                                method_key.method.clone(),
                                method_key.time,
                                min.min(max),
                                min.max(max),
                            ));
                        }
                        None => {
                            warn!("Skipping gift entry at {} without a level: {:?}", location, text);
                            skipped += 1;
                        }
                    },
                    DumpEntry::Raw(text) => {
                        warn!("Skipping unparsed entry at {} ({}): {:?}", location, key, text);
                        skipped += 1;
                    }
                }
            }
        }
    }

    debug!(
        "Ingested {} encounter rows and {} raid rows ({} skipped)",
        records.len(),
        raids.len(),
        skipped
    );
    EncounterTables::new(records, raids)
}
