//! # Plain Tables
//!
//! Column tables for the raid reward listing and the TM/HM/tutor browser.

use crate::data::{MoveTable, RaidRecord};
use crate::RrResult;
use serde::Serialize;
use std::fmt::Write;

/// A titled table of string cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableView {
    pub title: String,
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
}

/// Raid dens with their drop tables, one row per den.
pub fn raid_reward_table(raids: &[RaidRecord]) -> TableView {
    TableView {
        title: "Raid Rewards".to_string(),
        headers: vec!["Pokemon", "Location", "Star", "Rewards"],
        rows: raids
            .iter()
            .map(|raid| {
                let rewards = if raid.rewards.is_empty() {
                    "-".to_string()
                } else {
                    raid.rewards
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(", ")
                };
                vec![
                    raid.pokemon.clone(),
                    raid.location.clone(),
                    format!("{}★", raid.star),
                    rewards,
                ]
            })
            .collect(),
    }
}

pub fn move_table(table: &MoveTable) -> TableView {
    TableView {
        title: table.source.title().to_string(),
        headers: table.source.headers().to_vec(),
        rows: table
            .rows
            .iter()
            .map(|row| row.cells(table.source).to_vec())
            .collect(),
    }
}

/// Renders a table with left-aligned columns.
pub fn render_table_text(table: &TableView) -> String {
    let mut widths: Vec<usize> = table.headers.iter().map(|h| h.chars().count()).collect();
    for row in &table.rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let _ = writeln!(out, "{}", table.title);
    let _ = writeln!(out, "  {}", pad_cells(table.headers.iter().copied(), &widths));
    for row in &table.rows {
        let _ = writeln!(out, "  {}", pad_cells(row.iter().map(String::as_str), &widths));
    }
    out
}

fn pad_cells<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

pub fn render_table_json(table: &TableView) -> RrResult<String> {
    Ok(serde_json::to_string_pretty(table)?)
}
