//! # Encounter Cards
//!
//! One card per creature and time bucket, rendered as plain text or JSON.

use crate::data::TimeOfDay;
use crate::query::{CreatureEncounters, TimeChoice};
use crate::rendering::{method_color, range_label, time_icon};
use crate::RrResult;
use serde::Serialize;
use std::fmt::Write;

/// One line of a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardRow {
    pub location: String,
    pub method: String,
    pub color: &'static str,
    pub label: String,
}

/// A creature's entries for one time bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardView {
    pub pokemon: String,
    pub time: TimeOfDay,
    pub icon: &'static str,
    pub rows: Vec<CardRow>,
}

/// Builds the cards for a query result in display order.
pub fn build_cards(creatures: &[CreatureEncounters], choice: TimeChoice) -> Vec<CardView> {
    creatures
        .iter()
        .flat_map(|creature| {
            creature
                .sections(choice)
                .into_iter()
                .map(move |(time, entries)| CardView {
                    pokemon: creature.pokemon.clone(),
                    time,
                    icon: time_icon(time),
                    rows: entries
                        .iter()
                        .map(|entry| CardRow {
                            location: entry.location.clone(),
                            method: entry.method.clone(),
                            color: method_color(&entry.method),
                            label: range_label(&entry.method, &entry.value),
                        })
                        .collect(),
                })
        })
        .collect()
}

/// Renders cards as aligned plain text.
pub fn render_text(cards: &[CardView]) -> String {
    let mut out = String::new();
    for card in cards {
        let location_width = card.rows.iter().map(|r| r.location.chars().count()).max().unwrap_or(0);
        let method_width = card.rows.iter().map(|r| r.method.chars().count()).max().unwrap_or(0);

        let _ = writeln!(out, "{} {} ({})", card.icon, card.pokemon, card.time);
        for row in &card.rows {
            let _ = writeln!(
                out,
                "  {:<lw$}  {:<mw$}  {}",
                row.location,
                row.method,
                row.label,
                lw = location_width,
                mw = method_width
            );
        }
        out.push('\n');
    }
    out
}

/// Renders cards as a pretty-printed JSON array.
pub fn render_json(cards: &[CardView]) -> RrResult<String> {
    Ok(serde_json::to_string_pretty(cards)?)
}
