//! The canonical student record and its reading logs.
//!
//! [`StudentRecord`] is the full editable document: goals, scores, the live
//! [`ReadingTracker`], and the sparse period-keyed logs. Exactly one tracker
//! is live (the current week); everything in the reading log is frozen
//! history. The record serializes with camelCase field names — the document
//! layout the store schema has always used — so a deserialized document from
//! any namespace is the same shape as the in-memory record.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::checkin::{GoalCategory, GoalCheckIn, GoalProgressLog, Subject, WeeklyCheckIn, WeeklyGradeLog};
use crate::period::{MarkingPeriod, PeriodKey};

/// Days a reading period qualifies toward the streak.
pub const READING_STREAK_MIN_DAYS: usize = 4;

/// The five school weekdays tracked by the reading tracker.
#[derive(
    Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Debug,
    Display, EnumString, Serialize, Deserialize,
)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Weekday {
    /// All five school days, Monday first.
    pub const ALL: [Weekday; 5] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];
}

/// Per-weekday "read today" flags for one school week.
///
/// Only the current period's tracker is mutable; past weeks live as frozen
/// copies inside the [`ReadingLog`]. Structural equality is what the
/// snapshot reconciler uses for echo suppression, so the derive matters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ReadingTracker {
    pub monday: bool,
    pub tuesday: bool,
    pub wednesday: bool,
    pub thursday: bool,
    pub friday: bool,
}

impl ReadingTracker {
    /// Read flag for one day.
    pub fn get(&self, day: Weekday) -> bool {
        match day {
            Weekday::Monday => self.monday,
            Weekday::Tuesday => self.tuesday,
            Weekday::Wednesday => self.wednesday,
            Weekday::Thursday => self.thursday,
            Weekday::Friday => self.friday,
        }
    }

    /// Set one day's flag.
    pub fn set(&mut self, day: Weekday, read: bool) {
        match day {
            Weekday::Monday => self.monday = read,
            Weekday::Tuesday => self.tuesday = read,
            Weekday::Wednesday => self.wednesday = read,
            Weekday::Thursday => self.thursday = read,
            Weekday::Friday => self.friday = read,
        }
    }

    /// Flip one day's flag.
    pub fn toggle(&mut self, day: Weekday) {
        self.set(day, !self.get(day));
    }

    /// How many of the five days are marked read.
    pub fn days_read(&self) -> usize {
        Weekday::ALL.iter().filter(|d| self.get(**d)).count()
    }

    /// Whether this week counts toward the reading streak.
    pub fn qualifies(&self) -> bool {
        self.days_read() >= READING_STREAK_MIN_DAYS
    }
}

/// Frozen reading history: period key → that week's tracker.
pub type ReadingLog = BTreeMap<PeriodKey, ReadingTracker>;

/// Longest run of consecutive qualifying periods in a reading log.
///
/// Periods are visited in ordinal order (the map's key order); a period
/// qualifies with [`READING_STREAK_MIN_DAYS`] or more days read. The streak
/// resets on a non-qualifying period and the result is the maximum run
/// observed, not the trailing one. Weeks absent from the log are simply not
/// visited — a gap in the stored keys neither extends nor breaks a run.
pub fn reading_streak(log: &ReadingLog) -> u32 {
    let mut best = 0;
    let mut current = 0;
    for tracker in log.values() {
        if tracker.qualifies() {
            current += 1;
            best = best.max(current);
        } else {
            current = 0;
        }
    }
    best
}

/// Selector for the standalone numeric score fields.
///
/// Weekly unit-test grades live inside [`WeeklyCheckIn`]s instead; these are
/// the once-a-year standardized and benchmark entries.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Debug, Display, EnumString)]
pub enum ScoreField {
    NjslaLanguage,
    NjslaMath,
    BenchmarkA,
    BenchmarkB,
    BenchmarkC,
}

/// The canonical per-student document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudentRecord {
    pub name: String,
    pub email: String,

    // Free-text goals, one per category.
    pub language_goal: String,
    pub math_goal: String,
    pub personal_goal: String,

    // Standardized and benchmark scores, stored as entered.
    pub njsla_lang_score: Option<f64>,
    pub njsla_math_score: Option<f64>,
    pub benchmark_a: Option<f64>,
    pub benchmark_b: Option<f64>,
    pub benchmark_c: Option<f64>,

    pub current_book: String,

    /// The live tracker for the current period.
    pub reading_tracker: ReadingTracker,
    /// Frozen trackers for past periods (plus the current period's slot,
    /// rewritten on every persist).
    pub reading_logs: ReadingLog,

    pub weekly_grades: WeeklyGradeLog,
    pub goal_progress: GoalProgressLog,

    /// Set by the sync client at persist time; never edited directly.
    pub last_updated: Option<DateTime<Utc>>,
}

impl StudentRecord {
    /// A blank record carrying only identity fields.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            ..Default::default()
        }
    }

    /// Goal text for one category.
    pub fn goal(&self, category: GoalCategory) -> &str {
        match category {
            GoalCategory::Language => &self.language_goal,
            GoalCategory::Math => &self.math_goal,
            GoalCategory::Personal => &self.personal_goal,
        }
    }

    /// Replace one category's goal text.
    pub fn set_goal(&mut self, category: GoalCategory, text: impl Into<String>) {
        let slot = match category {
            GoalCategory::Language => &mut self.language_goal,
            GoalCategory::Math => &mut self.math_goal,
            GoalCategory::Personal => &mut self.personal_goal,
        };
        *slot = text.into();
    }

    /// One standalone score field.
    pub fn score(&self, field: ScoreField) -> Option<f64> {
        match field {
            ScoreField::NjslaLanguage => self.njsla_lang_score,
            ScoreField::NjslaMath => self.njsla_math_score,
            ScoreField::BenchmarkA => self.benchmark_a,
            ScoreField::BenchmarkB => self.benchmark_b,
            ScoreField::BenchmarkC => self.benchmark_c,
        }
    }

    /// Replace one standalone score field, stored as entered.
    pub fn set_score(&mut self, field: ScoreField, value: Option<f64>) {
        let slot = match field {
            ScoreField::NjslaLanguage => &mut self.njsla_lang_score,
            ScoreField::NjslaMath => &mut self.njsla_math_score,
            ScoreField::BenchmarkA => &mut self.benchmark_a,
            ScoreField::BenchmarkB => &mut self.benchmark_b,
            ScoreField::BenchmarkC => &mut self.benchmark_c,
        };
        *slot = value;
    }

    /// Flip one weekday on the live tracker.
    pub fn toggle_reading_day(&mut self, day: Weekday) {
        self.reading_tracker.toggle(day);
    }

    /// File a weekly check-in for one subject, clamping its grade.
    pub fn set_weekly_grade(&mut self, period: PeriodKey, subject: Subject, check_in: WeeklyCheckIn) {
        self.weekly_grades
            .entry(period)
            .or_default()
            .insert(subject, check_in.clamped());
    }

    /// File a goal reflection for one marking period.
    pub fn set_goal_progress(
        &mut self,
        category: GoalCategory,
        period: MarkingPeriod,
        check_in: GoalCheckIn,
    ) {
        self.goal_progress
            .entry(category)
            .or_default()
            .insert(period, check_in);
    }
}

// ============================================================================
// Tests
// ============================================================================
