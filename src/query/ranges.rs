//! # Level Range Merging
//!
//! Collapses level ranges for the same creature/location/method into the minimal
//! list of disjoint spans. Adjacent ranges (`5` and `6–8`) count as contiguous.

use crate::{RrError, RrResult};
use std::fmt;
use std::str::FromStr;

/// Dash used when formatting ranges for display.
pub const RANGE_DASH: char = '–';

/// Inclusive level interval with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LevelRange {
    pub start: u32,
    pub end: u32,
}

impl LevelRange {
    /// Creates a range, returning `None` when the bounds are inverted.
    pub fn new(start: u32, end: u32) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// A single-level range.
    pub fn single(level: u32) -> Self {
        Self {
            start: level,
            end: level,
        }
    }

    pub fn is_single(&self) -> bool {
        self.start == self.end
    }

    /// Whether `next` overlaps or directly follows this range.
    pub fn touches(&self, next: &LevelRange) -> bool {
        next.start <= self.end.saturating_add(1)
    }
}

impl fmt::Display for LevelRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single() {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}{}{}", self.start, RANGE_DASH, self.end)
        }
    }
}

impl FromStr for LevelRange {
    type Err = RrError;

    /// Accepts `"N"`, `"N-M"` and `"N–M"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || RrError::MalformedRange {
            input: s.to_string(),
        };
        let parse = |part: &str| part.trim().parse::<u32>().map_err(|_| malformed());

        let parts: Vec<&str> = s.split(['-', RANGE_DASH]).collect();
        match parts.as_slice() {
            [single] => Ok(LevelRange::single(parse(*single)?)),
            [start, end] => LevelRange::new(parse(*start)?, parse(*end)?).ok_or_else(malformed),
            _ => Err(malformed()),
        }
    }
}

/// Parses one range string.
pub fn parse_range(range: &str) -> RrResult<LevelRange> {
    range.parse()
}

/// Merges parsed ranges into disjoint, non-adjacent spans ordered by start.
pub fn merge_level_ranges(ranges: impl IntoIterator<Item = LevelRange>) -> Vec<LevelRange> {
    let mut sorted: Vec<LevelRange> = ranges.into_iter().collect();
    sorted.sort_unstable();

    let mut merged: Vec<LevelRange> = Vec::with_capacity(sorted.len());
    for range in sorted {
        match merged.last_mut() {
            Some(last) if last.touches(&range) => last.end = last.end.max(range.end),
            _ => merged.push(range),
        }
    }
    merged
}

/// Merges range strings and formats the result for display.
///
/// Any malformed input fails the whole call with [`RrError::MalformedRange`].
///
/// # Examples
///
/// ```
/// use rrlocate::merge_ranges;
///
/// assert_eq!(merge_ranges(&["5", "6-8"]).unwrap(), vec!["5–8"]);
/// assert_eq!(merge_ranges(&["1-3", "10-12"]).unwrap(), vec!["1–3", "10–12"]);
/// ```
pub fn merge_ranges<S: AsRef<str>>(ranges: &[S]) -> RrResult<Vec<String>> {
    let parsed = ranges
        .iter()
        .map(|range| parse_range(range.as_ref()))
        .collect::<RrResult<Vec<_>>>()?;

    Ok(merge_level_ranges(parsed)
        .into_iter()
        .map(|range| range.to_string())
        .collect())
}
