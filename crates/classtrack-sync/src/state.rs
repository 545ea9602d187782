//! Local editing state: the student's working copy plus sync flags.
//!
//! The engine task owns one `LocalState` exclusively; every mutation and
//! every remote snapshot lands here before anything else happens. Edits are
//! visible to callers immediately — persistence is deferred, confirmation
//! (`saved`) arrives later.

use classtrack_types::{Identity, StudentRecord};

/// Persist-cycle flags surfaced to the caller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SyncState {
    /// A persist is in flight right now.
    pub saving: bool,
    /// The last persist succeeded; cleared after [`crate::SAVED_FLASH`].
    pub saved: bool,
}

/// What applying a remote snapshot did to the working copy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SnapshotOutcome {
    /// A persist-triggering field actually changed. Echoes of our own
    /// writes come back with all triggering fields equal, so this stays
    /// false for them and the debounce timer is left alone.
    pub triggering_change: bool,
    /// The live reading tracker was structurally different and got
    /// replaced.
    pub tracker_replaced: bool,
}

/// The student's working copy and its sync flags.
#[derive(Debug)]
pub struct LocalState {
    record: StudentRecord,
    sync: SyncState,
}

impl LocalState {
    /// Fresh state seeded from the session identity. Remote data, if any,
    /// arrives through the first watch snapshot.
    pub fn new(identity: &Identity) -> Self {
        Self {
            record: StudentRecord::new(identity.display_name.clone(), identity.email.clone()),
            sync: SyncState::default(),
        }
    }

    pub fn record(&self) -> &StudentRecord {
        &self.record
    }

    /// Mutable access for local edits. The engine touches the debounce
    /// timer after every call that goes through here.
    pub fn record_mut(&mut self) -> &mut StudentRecord {
        &mut self.record
    }

    pub fn sync(&self) -> SyncState {
        self.sync
    }

    pub fn set_saving(&mut self, saving: bool) {
        self.sync.saving = saving;
    }

    pub fn set_saved(&mut self, saved: bool) {
        self.sync.saved = saved;
    }

    /// Adopt a remote snapshot (last-writer-wins, remote is authority) and
    /// report what changed.
    ///
    /// The triggering set mirrors the autosave inputs: goals, standalone
    /// scores, the current book, the live tracker, weekly grades, and goal
    /// progress. Name, email, `last_updated`, and the frozen reading log
    /// are adopted silently — the persist path rewrites `last_updated` and
    /// the log on every save, so counting them as changes would make each
    /// persist schedule the next one forever.
    pub fn apply_remote(&mut self, remote: StudentRecord) -> SnapshotOutcome {
        let local = &self.record;
        let tracker_replaced = remote.reading_tracker != local.reading_tracker;
        let triggering_change = tracker_replaced
            || remote.language_goal != local.language_goal
            || remote.math_goal != local.math_goal
            || remote.personal_goal != local.personal_goal
            || remote.njsla_lang_score != local.njsla_lang_score
            || remote.njsla_math_score != local.njsla_math_score
            || remote.benchmark_a != local.benchmark_a
            || remote.benchmark_b != local.benchmark_b
            || remote.benchmark_c != local.benchmark_c
            || remote.current_book != local.current_book
            || remote.weekly_grades != local.weekly_grades
            || remote.goal_progress != local.goal_progress;

        self.record = remote;
        SnapshotOutcome { triggering_change, tracker_replaced }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use classtrack_types::{GoalCategory, Weekday};
    use chrono::Utc;

    fn state() -> LocalState {
        LocalState::new(&Identity::new("s-1", "Ada", "ada@example.edu"))
    }

    #[test]
    fn test_new_state_carries_identity() {
        let s = state();
        assert_eq!(s.record().name, "Ada");
        assert_eq!(s.record().email, "ada@example.edu");
        assert_eq!(s.sync(), SyncState::default());
    }

    #[test]
    fn test_echo_snapshot_is_not_triggering() {
        let mut s = state();
        s.record_mut().set_goal(GoalCategory::Math, "Master fractions");

        // What comes back from our own persist: same triggering fields,
        // fresh timestamp and rewritten log.
        let mut echo = s.record().clone();
        echo.last_updated = Some(Utc::now());
        echo.reading_logs
            .insert(classtrack_types::PeriodKey::week(3), echo.reading_tracker.clone());

        let outcome = s.apply_remote(echo);
        assert!(!outcome.triggering_change);
        assert!(!outcome.tracker_replaced);
        // The silent fields were still adopted.
        assert!(s.record().last_updated.is_some());
        assert!(!s.record().reading_logs.is_empty());
    }

    #[test]
    fn test_goal_change_is_triggering() {
        let mut s = state();
        let mut remote = s.record().clone();
        remote.set_goal(GoalCategory::Language, "Read two novels");

        let outcome = s.apply_remote(remote);
        assert!(outcome.triggering_change);
        assert!(!outcome.tracker_replaced);
        assert_eq!(s.record().goal(GoalCategory::Language), "Read two novels");
    }

    #[test]
    fn test_tracker_change_is_triggering_and_replaces() {
        let mut s = state();
        let mut remote = s.record().clone();
        remote.toggle_reading_day(Weekday::Tuesday);

        let outcome = s.apply_remote(remote);
        assert!(outcome.triggering_change);
        assert!(outcome.tracker_replaced);
        assert!(s.record().reading_tracker.get(Weekday::Tuesday));
    }

    #[test]
    fn test_name_change_adopted_silently() {
        let mut s = state();
        let mut remote = s.record().clone();
        remote.name = "Ada L.".into();

        let outcome = s.apply_remote(remote);
        assert!(!outcome.triggering_change);
        assert_eq!(s.record().name, "Ada L.");
    }
}
