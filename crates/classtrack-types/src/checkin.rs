//! Weekly check-ins and goal progress entries.
//!
//! A [`WeeklyCheckIn`] is the per-subject record a student files once per
//! school week: an optional unit-test grade, how the week felt, what help
//! they need, and a free-text note. A [`GoalCheckIn`] is the lighter
//! per-marking-period reflection against one of the three goal categories.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::period::{MarkingPeriod, PeriodKey};

/// Subjects that carry a weekly grade.
#[derive(
    Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Debug,
    Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Subject {
    Language,
    Math,
}

/// Categories a student sets a goal in.
#[derive(
    Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Debug,
    Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GoalCategory {
    Language,
    Math,
    Personal,
}

/// Self-reported mood for a check-in.
#[derive(
    Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Debug, Default,
    Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Mood {
    Great,
    Good,
    #[default]
    Okay,
    Struggling,
}

/// Support flags a student can raise on a weekly check-in.
#[derive(
    Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Debug,
    Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum NeedFlag {
    ExtraPractice,
    TeacherHelp,
    MoreTime,
    Materials,
}

/// One subject's check-in for one school week.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeeklyCheckIn {
    /// Unit-test grade for the week, if one was entered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<f64>,
    pub mood: Mood,
    pub needs: BTreeSet<NeedFlag>,
    pub note: String,
}

impl WeeklyCheckIn {
    /// The same check-in with its grade clamped to [0, 100].
    ///
    /// Other score fields are stored as entered; weekly grades are the one
    /// place the UI contract clamps.
    pub fn clamped(mut self) -> Self {
        self.grade = self.grade.map(|g| g.clamp(0.0, 100.0));
        self
    }
}

/// One goal category's reflection for one marking period.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoalCheckIn {
    pub mood: Mood,
    pub note: String,
}

/// Period key → per-subject weekly check-ins.
pub type WeeklyGradeLog = BTreeMap<PeriodKey, BTreeMap<Subject, WeeklyCheckIn>>;

/// Goal category → marking period → reflection.
pub type GoalProgressLog = BTreeMap<GoalCategory, BTreeMap<MarkingPeriod, GoalCheckIn>>;

// ============================================================================
// Tests
// ============================================================================
