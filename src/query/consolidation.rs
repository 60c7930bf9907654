//! # Encounter Consolidation
//!
//! Turns the filtered rows of one creature into the entries shown on its cards.
//!
//! Rows are first split into time buckets. A Day row and a Night row for the same
//! location, method and level range are replaced by one synthetic `Walk` row in
//! the `All` bucket, since the creature is there at any hour. Inside each bucket
//! rows sharing `(Location, Method)` collapse into one entry: leveled rows merge
//! their ranges, raid rows list their distinct star tiers.
//!
//! Input slices are never modified; every step builds new values.

use crate::config::WALK_METHOD;
use crate::data::{EncounterRecord, RaidRecord, TimeOfDay};
use crate::query::{merge_level_ranges, LevelRange, TimeChoice};
use crate::RrResult;
use log::debug;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// One display entry: where, how, and at which levels or raid tiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsolidatedEncounter {
    pub location: String,
    /// Merged level ranges (`"12–14, 20"`) or raid tiers (`"3, 5"`)
    pub value: String,
    pub method: String,
    /// Number of source rows folded into this entry
    pub source_rows: usize,
}

impl ConsolidatedEncounter {
    pub fn is_raid(&self) -> bool {
        self.method == crate::config::RAID_METHOD
    }
}

/// All consolidated entries of one creature, split by time bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CreatureEncounters {
    /// Display name, form suffix included
    pub pokemon: String,
    pub day: Vec<ConsolidatedEncounter>,
    pub night: Vec<ConsolidatedEncounter>,
    /// Time-independent rows plus merged Day+Night rows
    pub all: Vec<ConsolidatedEncounter>,
}

impl CreatureEncounters {
    /// Entries of a single bucket.
    pub fn bucket(&self, time: TimeOfDay) -> &[ConsolidatedEncounter] {
        match time {
            TimeOfDay::Day => &self.day,
            TimeOfDay::Night => &self.night,
            TimeOfDay::All => &self.all,
        }
    }

    /// Non-empty buckets in the order cards are shown for a time choice.
    ///
    /// `All` shows every bucket (All, Day, Night); a specific time shows its own
    /// bucket followed by the time-independent one.
    pub fn sections(&self, choice: TimeChoice) -> Vec<(TimeOfDay, &[ConsolidatedEncounter])> {
        let order: &[TimeOfDay] = match choice {
            TimeChoice::All => &[TimeOfDay::All, TimeOfDay::Day, TimeOfDay::Night],
            TimeChoice::Day => &[TimeOfDay::Day, TimeOfDay::All],
            TimeChoice::Night => &[TimeOfDay::Night, TimeOfDay::All],
        };
        order
            .iter()
            .map(|&time| (time, self.bucket(time)))
            .filter(|(_, entries)| !entries.is_empty())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.day.is_empty() && self.night.is_empty() && self.all.is_empty()
    }

    /// Total source rows across every bucket.
    pub fn source_rows(&self) -> usize {
        [&self.day, &self.night, &self.all]
            .into_iter()
            .flatten()
            .map(|entry| entry.source_rows)
            .sum()
    }
}

/// Result of pairing Day rows with identical Night rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayNightSplit {
    /// Day rows without a Night twin
    pub day: Vec<EncounterRecord>,
    /// Night rows without a Day twin
    pub night: Vec<EncounterRecord>,
    /// Synthetic `Walk` rows, each standing for one Day row and one Night row
    pub walk: Vec<EncounterRecord>,
}

/// Pairs Day and Night rows that share location, method and level bounds.
///
/// Each pair becomes one time-independent `Walk` row carrying the shared range.
/// Pairing is one-to-one: three identical Day rows and one Night row yield one
/// `Walk` row and two leftover Day rows.
pub fn merge_day_night(day: &[EncounterRecord], night: &[EncounterRecord]) -> DayNightSplit {
    let mut night_used = vec![false; night.len()];
    let mut split = DayNightSplit::default();

    for day_row in day {
        let twin = night.iter().enumerate().position(|(i, night_row)| {
            !night_used[i]
                && night_row.pokemon == day_row.pokemon
                && night_row.location == day_row.location
                && night_row.method == day_row.method
                && night_row.min_level == day_row.min_level
                && night_row.max_level == day_row.max_level
        });

        match twin {
            Some(i) => {
                night_used[i] = true;
                split.walk.push(EncounterRecord {
                    method: WALK_METHOD.to_string(),
                    time: TimeOfDay::All,
                    ..day_row.clone()
                });
            }
            None => split.day.push(day_row.clone()),
        }
    }

    split.night = night
        .iter()
        .zip(night_used)
        .filter(|(_, used)| !used)
        .map(|(row, _)| row.clone())
        .collect();
    split
}

/// Consolidates rows of one bucket, ignoring their `Time` column.
pub fn consolidate_bucket(
    records: &[EncounterRecord],
    raids: &[RaidRecord],
) -> RrResult<Vec<ConsolidatedEncounter>> {
    let raid_rows: Vec<EncounterRecord> = raids.iter().map(RaidRecord::to_encounter).collect();
    consolidate_weighted(records.iter().chain(&raid_rows).map(|row| (row, 1)))
}

/// Builds the time-bucketed entries for one creature.
///
/// `pokemon` is the display name; rows of other creatures in the inputs are
/// ignored. Missing levels on a leveled row, or a missing star on a raid row,
/// fail the call with the offending row named.
pub fn consolidate(
    records: &[EncounterRecord],
    raids: &[RaidRecord],
    pokemon: &str,
) -> RrResult<CreatureEncounters> {
    let mut day = Vec::new();
    let mut night = Vec::new();
    let mut all = Vec::new();

    let raid_rows = raids
        .iter()
        .filter(|raid| raid.pokemon == pokemon)
        .map(RaidRecord::to_encounter);
    let rows = records
        .iter()
        .filter(|row| row.pokemon == pokemon)
        .cloned()
        .chain(raid_rows);

    for row in rows {
        match row.time {
            TimeOfDay::Day => day.push(row),
            TimeOfDay::Night => night.push(row),
            TimeOfDay::All => all.push(row),
        }
    }

    let split = merge_day_night(&day, &night);
    debug!(
        "{}: {} day, {} night, {} walk, {} time-independent rows",
        pokemon,
        split.day.len(),
        split.night.len(),
        split.walk.len(),
        all.len()
    );

    let all_bucket = all
        .iter()
        .map(|row| (row, 1))
        .chain(split.walk.iter().map(|row| (row, 2)));

    Ok(CreatureEncounters {
        pokemon: pokemon.to_string(),
        day: consolidate_weighted(split.day.iter().map(|row| (row, 1)))?,
        night: consolidate_weighted(split.night.iter().map(|row| (row, 1)))?,
        all: consolidate_weighted(all_bucket)?,
    })
}

/// Consolidates every creature present in either table, ordered by name.
pub fn consolidate_all(
    records: &[EncounterRecord],
    raids: &[RaidRecord],
) -> RrResult<Vec<CreatureEncounters>> {
    let creatures: BTreeSet<&str> = records
        .iter()
        .map(|row| row.pokemon.as_str())
        .chain(raids.iter().map(|raid| raid.pokemon.as_str()))
        .collect();

    creatures
        .into_iter()
        .map(|pokemon| consolidate(records, raids, pokemon))
        .collect()
}

/// Accumulated rows of one `(Location, Method)` partition.
#[derive(Default)]
struct Partition {
    levels: Vec<LevelRange>,
    stars: BTreeSet<u8>,
    sources: usize,
}

/// Partitions `(row, weight)` pairs and formats one entry per partition.
///
/// Weight is the number of source rows a row stands for.
fn consolidate_weighted<'a>(
    rows: impl IntoIterator<Item = (&'a EncounterRecord, usize)>,
) -> RrResult<Vec<ConsolidatedEncounter>> {
    let mut partitions: BTreeMap<(&str, &str), Partition> = BTreeMap::new();

    for (row, weight) in rows {
        let partition = partitions
            .entry((row.location.as_str(), row.method.as_str()))
            .or_default();
        if row.is_raid() {
            partition.stars.insert(row.raid_star()?);
        } else {
            let (min, max) = row.levels()?;
            partition.levels.push(LevelRange { start: min, end: max });
        }
        partition.sources += weight;
    }

    let mut entries: Vec<ConsolidatedEncounter> = partitions
        .into_iter()
        .map(|((location, method), partition)| {
            let value = if partition.stars.is_empty() {
                join(merge_level_ranges(partition.levels))
            } else {
                join(partition.stars)
            };
            ConsolidatedEncounter {
                location: location.to_string(),
                value,
                method: method.to_string(),
                source_rows: partition.sources,
            }
        })
        .collect();

    // Partitions arrive ordered by (location, method); raids move to the end
    entries.sort_by_key(ConsolidatedEncounter::is_raid);
    Ok(entries)
}

fn join<T: ToString>(values: impl IntoIterator<Item = T>) -> String {
    values
        .into_iter()
        .map(|value| value.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RrError;

    fn grass(location: &str, time: TimeOfDay, min: u32, max: u32) -> EncounterRecord {
        EncounterRecord::wild("Hoothoot", location, "Grass", time, min, max)
    }

    #[test]
    fn test_identical_day_and_night_become_walk() {
        let records = vec![
            grass("Route 1", TimeOfDay::Day, 3, 5),
            grass("Route 1", TimeOfDay::Night, 3, 5),
        ];
        let result = consolidate(&records, &[], "Hoothoot").unwrap();

        assert!(result.day.is_empty());
        assert!(result.night.is_empty());
        assert_eq!(
            result.all,
            vec![ConsolidatedEncounter {
                location: "Route 1".to_string(),
                value: "3–5".to_string(),
                method: "Walk".to_string(),
                source_rows: 2,
            }]
        );
    }

    #[test]
    fn test_different_day_and_night_ranges_stay_apart() {
        let records = vec![
            grass("Route 1", TimeOfDay::Day, 3, 5),
            grass("Route 1", TimeOfDay::Night, 6, 8),
        ];
        let result = consolidate(&records, &[], "Hoothoot").unwrap();

        assert_eq!(result.day.len(), 1);
        assert_eq!(result.day[0].value, "3–5");
        assert_eq!(result.night.len(), 1);
        assert_eq!(result.night[0].value, "6–8");
        assert!(result.all.iter().all(|entry| entry.method != "Walk"));
    }

    #[test]
    fn test_walk_pairs_one_to_one() {
        let day = vec![
            grass("Route 2", TimeOfDay::Day, 4, 4),
            grass("Route 2", TimeOfDay::Day, 4, 4),
        ];
        let night = vec![grass("Route 2", TimeOfDay::Night, 4, 4)];
        let split = merge_day_night(&day, &night);

        assert_eq!(split.walk.len(), 1);
        assert_eq!(split.day.len(), 1);
        assert!(split.night.is_empty());
        assert_eq!(split.walk[0].time, TimeOfDay::All);
        // Inputs are left untouched
        assert_eq!(day[0].method, "Grass");
    }

    #[test]
    fn test_walk_requires_same_method() {
        let day = vec![grass("Route 12", TimeOfDay::Day, 20, 25)];
        let mut surf = grass("Route 12", TimeOfDay::Night, 20, 25);
        surf.method = "Surf".to_string();

        let split = merge_day_night(&day, &[surf]);
        assert!(split.walk.is_empty());
        assert_eq!(split.day.len(), 1);
        assert_eq!(split.night.len(), 1);
    }

    #[test]
    fn test_ranges_merge_within_partition() {
        let records = vec![
            grass("Viridian Forest", TimeOfDay::All, 3, 4),
            grass("Viridian Forest", TimeOfDay::All, 5, 5),
            grass("Viridian Forest", TimeOfDay::All, 9, 10),
        ];
        let entries = consolidate_bucket(&records, &[]).unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].value, "3–5, 9–10");
        assert_eq!(entries[0].source_rows, 3);
    }

    #[test]
    fn test_raid_stars_deduplicated_and_sorted_last() {
        let records = vec![
            EncounterRecord::raid("Hoothoot", "Route 1", 5),
            grass("Route 9", TimeOfDay::All, 20, 22),
            grass("Cerulean Cave", TimeOfDay::All, 50, 52),
        ];
        let raids = vec![
            RaidRecord::new("Hoothoot", "Route 1", 3),
            RaidRecord::new("Hoothoot", "Route 1", 5),
            RaidRecord::new("Hoothoot", "Abandoned Ship", 2),
        ];
        let entries = consolidate_bucket(&records, &raids).unwrap();

        let order: Vec<(&str, &str)> = entries
            .iter()
            .map(|e| (e.location.as_str(), e.method.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("Cerulean Cave", "Grass"),
                ("Route 9", "Grass"),
                ("Abandoned Ship", "Raid"),
                ("Route 1", "Raid"),
            ]
        );
        assert_eq!(entries[3].value, "3, 5");
        assert_eq!(entries[3].source_rows, 3);
    }

    #[test]
    fn test_no_duplicate_location_method_pairs() {
        let records = vec![
            grass("Route 1", TimeOfDay::All, 2, 3),
            grass("Route 1", TimeOfDay::All, 2, 3),
            EncounterRecord::wild("Hoothoot", "Route 1", "Surf", TimeOfDay::All, 10, 15),
        ];
        let entries = consolidate_bucket(&records, &[]).unwrap();
        let keys: BTreeSet<(&str, &str)> = entries
            .iter()
            .map(|e| (e.location.as_str(), e.method.as_str()))
            .collect();
        assert_eq!(keys.len(), entries.len());
        assert_eq!(entries.iter().map(|e| e.source_rows).sum::<usize>(), 3);
    }

    #[test]
    fn test_time_independent_rows_pool_with_walk() {
        let records = vec![
            grass("Route 1", TimeOfDay::Day, 3, 5),
            grass("Route 1", TimeOfDay::Night, 3, 5),
            EncounterRecord::wild("Hoothoot", "Celadon City", "Gift", TimeOfDay::All, 25, 25),
            grass("Route 2", TimeOfDay::Night, 6, 7),
        ];
        let raids = vec![RaidRecord::new("Hoothoot", "Route 2", 1)];
        let result = consolidate(&records, &raids, "Hoothoot").unwrap();

        let methods: Vec<&str> = result.all.iter().map(|e| e.method.as_str()).collect();
        assert_eq!(methods, vec!["Gift", "Walk", "Raid"]);
        assert_eq!(result.night.len(), 1);
        assert_eq!(result.source_rows(), records.len() + raids.len());
    }

    #[test]
    fn test_other_creatures_ignored() {
        let records = vec![
            grass("Route 1", TimeOfDay::All, 3, 5),
            EncounterRecord::wild("Pidgey", "Route 1", "Grass", TimeOfDay::All, 2, 4),
        ];
        let result = consolidate(&records, &[], "Pidgey").unwrap();
        assert_eq!(result.pokemon, "Pidgey");
        assert_eq!(result.all.len(), 1);
        assert_eq!(result.all[0].value, "2–4");
    }

    #[test]
    fn test_missing_levels_fail_fast() {
        let mut row = grass("Route 1", TimeOfDay::All, 3, 5);
        row.min_level = None;

        match consolidate(&[row], &[], "Hoothoot") {
            Err(RrError::MissingField { row, field }) => {
                assert_eq!(field, "MinLevel");
                assert!(row.contains("Route 1"));
            }
            other => panic!("expected missing field, got {other:?}"),
        }
    }

    #[test]
    fn test_sections_follow_time_choice() {
        let records = vec![
            grass("Route 1", TimeOfDay::Day, 3, 5),
            grass("Route 2", TimeOfDay::Night, 3, 5),
            grass("Route 3", TimeOfDay::All, 3, 5),
        ];
        let result = consolidate(&records, &[], "Hoothoot").unwrap();

        let times = |choice| -> Vec<TimeOfDay> {
            result.sections(choice).into_iter().map(|(t, _)| t).collect()
        };
        assert_eq!(
            times(TimeChoice::All),
            vec![TimeOfDay::All, TimeOfDay::Day, TimeOfDay::Night]
        );
        assert_eq!(times(TimeChoice::Day), vec![TimeOfDay::Day, TimeOfDay::All]);
        assert_eq!(times(TimeChoice::Night), vec![TimeOfDay::Night, TimeOfDay::All]);
    }

    #[test]
    fn test_consolidate_all_unions_tables() {
        let records = vec![grass("Route 1", TimeOfDay::All, 3, 5)];
        let raids = vec![RaidRecord::new("Eevee", "Route 4", 2)];
        let creatures = consolidate_all(&records, &raids).unwrap();

        let names: Vec<&str> = creatures.iter().map(|c| c.pokemon.as_str()).collect();
        assert_eq!(names, vec!["Eevee", "Hoothoot"]);
        assert_eq!(creatures[0].all[0].value, "2");
    }
}
