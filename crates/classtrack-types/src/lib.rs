//! Shared data model for classtrack.
//!
//! This crate is the relational foundation: typed IDs, school-week period
//! keys, the student record with its sparse time-indexed logs, roster
//! projections, and the session context. It has **no internal classtrack
//! dependencies** — a pure leaf crate that the store and sync crates build on.
//!
//! # Entity-Relationship Overview
//!
//! ```text
//! StudentRecord (keyed by StudentId) ← the canonical record
//!     └── ReadingTracker (live, current period only)
//!     └── ReadingLog (PeriodKey → frozen ReadingTracker)
//!     └── WeeklyGradeLog (PeriodKey → Subject → WeeklyCheckIn)
//!     └── GoalProgressLog (GoalCategory → MarkingPeriod → GoalCheckIn)
//!
//! TeacherRosterEntry (TeacherId × StudentId) ← denormalized projection
//!     └── updated only as a side effect of the student's persist
//!     └── relocated to the archived namespace on archive
//!
//! SessionContext ← explicit per-session identity + role
//!     └── constructed at login, dropped at logout
//! ```
//!
//! # Key Types
//!
//! | Type                  | Purpose                                        |
//! |-----------------------|------------------------------------------------|
//! | [`StudentId`]         | Which student (provider-issued uid)            |
//! | [`TeacherId`]         | Which teacher's namespace                      |
//! | [`PeriodKey`]         | Which school week ("Week12")                   |
//! | [`StudentRecord`]     | The full editable record                       |
//! | [`ReadingTracker`]    | Five weekday flags for the live period         |
//! | [`TeacherRosterEntry`]| Roster projection of a record                  |
//! | [`SessionContext`]    | Identity + role for one login session          |

pub mod checkin;
pub mod ids;
pub mod period;
pub mod record;
pub mod roster;
pub mod session;

// Re-export primary types at crate root for convenience.
pub use checkin::{
    GoalCategory, GoalCheckIn, GoalProgressLog, Mood, NeedFlag, Subject, WeeklyCheckIn,
    WeeklyGradeLog,
};
pub use ids::{StudentId, TeacherId};
pub use period::{MarkingPeriod, PeriodKey, PeriodKeyError, SCHOOL_EPOCH_UNIX, WEEKS_PER_YEAR};
pub use record::{
    reading_streak, ReadingLog, ReadingTracker, ScoreField, StudentRecord, Weekday,
    READING_STREAK_MIN_DAYS,
};
pub use roster::{ArchivedEntry, TeacherRosterEntry};
pub use session::{Identity, Role, SessionContext};
