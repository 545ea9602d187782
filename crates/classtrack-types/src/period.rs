//! School-week period keys and marking periods.
//!
//! A [`PeriodKey`] is the ordinal label for one school week ("Week12"),
//! counted from a fixed school-year epoch. Period keys index the sparse
//! time-series logs on a student record; on the wire they are the string
//! map keys the store schema has always used, so serde round-trips them as
//! strings while the in-memory form keeps the ordinal for cheap sorting.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum::{Display, EnumString};
use thiserror::Error;

/// First Monday of the school year, as Unix seconds (2025-08-25T00:00:00Z).
/// Week 1 starts here; every 7 days after it begins the next week.
pub const SCHOOL_EPOCH_UNIX: i64 = 1_756_080_000;

/// Number of school weeks enumerated for selection and reporting.
pub const WEEKS_PER_YEAR: u32 = 40;

const SECONDS_PER_WEEK: i64 = 7 * 24 * 60 * 60;

/// Errors parsing a period key from its wire form.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PeriodKeyError {
    /// The key did not start with the literal "Week" prefix.
    #[error("period key missing 'Week' prefix: {0:?}")]
    MissingPrefix(String),
    /// The ordinal suffix was not a positive integer.
    #[error("period key has invalid ordinal: {0:?}")]
    InvalidOrdinal(String),
}

/// Ordinal label for one school week.
///
/// Ordering follows the embedded ordinal, so a `BTreeMap` keyed by
/// `PeriodKey` iterates weeks in chronological order regardless of
/// insertion order.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct PeriodKey(u32);

impl PeriodKey {
    /// The key for week `n` (1-based).
    pub fn week(n: u32) -> Self {
        Self(n)
    }

    /// The embedded week ordinal.
    pub fn ordinal(&self) -> u32 {
        self.0
    }

    /// The week containing `now`, or `None` before the school epoch.
    ///
    /// The source system produced non-positive ordinals for dates before
    /// the epoch; those are unrepresentable as keys, so callers get `None`
    /// and should skip log updates until the year starts.
    pub fn current(now: DateTime<Utc>) -> Option<Self> {
        let ordinal = week_ordinal(now);
        u32::try_from(ordinal).ok().filter(|n| *n >= 1).map(Self)
    }

    /// Whether this key falls in the enumerated school year.
    pub fn in_range(&self) -> bool {
        (1..=WEEKS_PER_YEAR).contains(&self.0)
    }

    /// All selectable weeks, Week1 through Week40.
    pub fn all() -> impl Iterator<Item = PeriodKey> {
        (1..=WEEKS_PER_YEAR).map(PeriodKey)
    }
}

/// Raw week ordinal for `now` relative to the school epoch.
///
/// Floor division, so dates before the epoch yield ordinals ≤ 0 — the same
/// arithmetic the source system used.
pub fn week_ordinal(now: DateTime<Utc>) -> i64 {
    (now.timestamp() - SCHOOL_EPOCH_UNIX).div_euclid(SECONDS_PER_WEEK) + 1
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Week{}", self.0)
    }
}

impl fmt::Debug for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PeriodKey(Week{})", self.0)
    }
}

impl FromStr for PeriodKey {
    type Err = PeriodKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let suffix = s
            .strip_prefix("Week")
            .ok_or_else(|| PeriodKeyError::MissingPrefix(s.to_string()))?;
        let ordinal: u32 = suffix
            .parse()
            .map_err(|_| PeriodKeyError::InvalidOrdinal(s.to_string()))?;
        if ordinal == 0 {
            return Err(PeriodKeyError::InvalidOrdinal(s.to_string()));
        }
        Ok(Self(ordinal))
    }
}

// Wire form is the string label, so period keys work as JSON map keys.
impl Serialize for PeriodKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PeriodKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

/// Marking periods for goal progress check-ins (quarterly).
#[derive(
    Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Debug,
    Display, EnumString, Serialize, Deserialize,
)]
pub enum MarkingPeriod {
    MP1,
    MP2,
    MP3,
    MP4,
}

// ============================================================================
// Tests
// ============================================================================
