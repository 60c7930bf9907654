//! # Rendering Module
//!
//! Badge helpers, card output and plain tables for the command line.

pub mod cards;
pub mod tables;

pub use cards::*;
pub use tables::*;

use crate::config::{DEFAULT_METHOD_COLOR, RAID_METHOD};
use crate::data::TimeOfDay;

/// Badge color for a method. Unknown methods get the default color.
///
/// # Examples
///
/// ```
/// use rrlocate::method_color;
///
/// assert_eq!(method_color("Surf"), "#6390F0");
/// assert_eq!(method_color("Headbutt"), "#555555");
/// ```
pub fn method_color(method: &str) -> &'static str {
    match method {
        "Grass" | "Walk" => "#3e7a38",
        "Surf" => "#6390F0",
        "Old Rod" => "#B8A038",
        "Good Rod" => "#A040A0",
        "Super Rod" => "#705898",
        "Raid" => "#9e2828",
        "Game Corner" => "#c95b94",
        _ => DEFAULT_METHOD_COLOR,
    }
}

/// Icon shown in the card header for a time bucket.
pub fn time_icon(time: TimeOfDay) -> &'static str {
    match time {
        TimeOfDay::Day => "☀️",
        TimeOfDay::Night => "🌙",
        TimeOfDay::All => "🌓",
    }
}

/// Text of the level/tier badge: `"Level 3–5"` or `"3, 5★ Raid"`.
pub fn range_label(method: &str, value: &str) -> String {
    let value = if value.is_empty() { "?" } else { value };
    if method == RAID_METHOD {
        format!("{value}★ Raid")
    } else {
        format!("Level {value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_color_is_total() {
        assert_eq!(method_color("Grass"), "#3e7a38");
        assert_eq!(method_color("Raid"), "#9e2828");
        assert_eq!(method_color(""), DEFAULT_METHOD_COLOR);
        assert_eq!(method_color("grass"), DEFAULT_METHOD_COLOR);
    }

    #[test]
    fn test_range_label() {
        assert_eq!(range_label("Grass", "3–5, 9"), "Level 3–5, 9");
        assert_eq!(range_label("Raid", "3, 5"), "3, 5★ Raid");
        assert_eq!(range_label("Surf", ""), "Level ?");
    }

    #[test]
    fn test_time_icons_distinct() {
        assert_ne!(time_icon(TimeOfDay::Day), time_icon(TimeOfDay::Night));
        assert_ne!(time_icon(TimeOfDay::Day), time_icon(TimeOfDay::All));
    }
}
