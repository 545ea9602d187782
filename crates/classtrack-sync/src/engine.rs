//! The student session engine: one task owning the working copy.
//!
//! Every edit, timer, and remote snapshot for a student funnels through a
//! single spawned task, so the working copy needs no locks and updates
//! apply in arrival order. Callers hold a [`StudentHandle`] and speak over
//! a command channel; dropping the last handle closes the channel, which
//! stops the task, drops the watch subscription, and discards any pending
//! debounce without firing it.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use classtrack_store::{DocEvent, DocPath, DocStore, DocSubscription, Document};
use classtrack_types::{
    reading_streak, GoalCategory, GoalCheckIn, MarkingPeriod, PeriodKey, Role, ScoreField,
    SessionContext, StudentRecord, Subject, Weekday, WeeklyCheckIn,
};

use crate::client::SyncClient;
use crate::constants::{DEBOUNCE_WINDOW, SAVED_FLASH};
use crate::debounce::{deadline_elapsed, Debouncer};
use crate::error::{SyncError, SyncResult};
use crate::reconcile;
use crate::state::{LocalState, SyncState};

// ============================================================================
// Commands
// ============================================================================

enum StudentCommand {
    SetGoal { category: GoalCategory, text: String },
    SetScore { field: ScoreField, value: Option<f64> },
    SetCurrentBook { title: String },
    ToggleReadingDay { day: Weekday },
    SetWeeklyGrade { period: PeriodKey, subject: Subject, check_in: WeeklyCheckIn },
    SetGoalProgress { category: GoalCategory, period: MarkingPeriod, check_in: GoalCheckIn },
    Snapshot { reply: oneshot::Sender<StudentRecord> },
    SyncStatus { reply: oneshot::Sender<SyncState> },
    Flush { reply: oneshot::Sender<SyncResult<()>> },
}

// ============================================================================
// Handle
// ============================================================================

/// Caller-side handle to a spawned student engine.
///
/// Mutations return as soon as the command is queued; the edit is applied
/// (and the debounce restarted) by the engine task in order. Queries round-
/// trip through the task so they always see every prior command.
#[derive(Clone, Debug)]
pub struct StudentHandle {
    tx: mpsc::UnboundedSender<StudentCommand>,
}

impl StudentHandle {
    fn send(&self, command: StudentCommand) -> SyncResult<()> {
        self.tx.send(command).map_err(|_| SyncError::Shutdown)
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> StudentCommand,
    ) -> SyncResult<T> {
        let (reply, rx) = oneshot::channel();
        self.send(make(reply))?;
        rx.await.map_err(|_| SyncError::Shutdown)
    }

    /// Replace one goal's text.
    pub fn set_goal(&self, category: GoalCategory, text: impl Into<String>) -> SyncResult<()> {
        self.send(StudentCommand::SetGoal { category, text: text.into() })
    }

    /// Replace one standalone score field.
    pub fn set_score(&self, field: ScoreField, value: Option<f64>) -> SyncResult<()> {
        self.send(StudentCommand::SetScore { field, value })
    }

    /// Replace the current-book title.
    pub fn set_current_book(&self, title: impl Into<String>) -> SyncResult<()> {
        self.send(StudentCommand::SetCurrentBook { title: title.into() })
    }

    /// Flip one weekday on the live reading tracker.
    pub fn toggle_reading_day(&self, day: Weekday) -> SyncResult<()> {
        self.send(StudentCommand::ToggleReadingDay { day })
    }

    /// File a weekly check-in for one subject and period.
    pub fn set_weekly_grade(
        &self,
        period: PeriodKey,
        subject: Subject,
        check_in: WeeklyCheckIn,
    ) -> SyncResult<()> {
        self.send(StudentCommand::SetWeeklyGrade { period, subject, check_in })
    }

    /// File a goal reflection for one marking period.
    pub fn set_goal_progress(
        &self,
        category: GoalCategory,
        period: MarkingPeriod,
        check_in: GoalCheckIn,
    ) -> SyncResult<()> {
        self.send(StudentCommand::SetGoalProgress { category, period, check_in })
    }

    /// Current working copy.
    pub async fn snapshot(&self) -> SyncResult<StudentRecord> {
        self.request(|reply| StudentCommand::Snapshot { reply }).await
    }

    /// Current persist-cycle flags.
    pub async fn sync_status(&self) -> SyncResult<SyncState> {
        self.request(|reply| StudentCommand::SyncStatus { reply }).await
    }

    /// Persist immediately, skipping any pending debounce window.
    pub async fn flush(&self) -> SyncResult<()> {
        self.request(|reply| StudentCommand::Flush { reply }).await?
    }

    /// Reading streak over the persisted log of the working copy.
    pub async fn reading_streak(&self) -> SyncResult<u32> {
        Ok(reading_streak(&self.snapshot().await?.reading_logs))
    }
}

// ============================================================================
// Engine task
// ============================================================================

/// Spawn the engine for a student session.
///
/// Subscribes to the canonical document before the task starts, so a
/// record persisted by an earlier session is delivered as the first event
/// and seeds the working copy.
pub fn spawn_student_engine<S>(store: Arc<S>, session: SessionContext) -> SyncResult<StudentHandle>
where
    S: DocStore + 'static,
{
    if session.role != Role::Student {
        return Err(SyncError::WrongRole { required: Role::Student, actual: session.role });
    }
    let subscription = store.watch_doc(&DocPath::Student(session.student_id()));
    let (tx, rx) = mpsc::unbounded_channel();
    let engine = StudentEngine {
        state: LocalState::new(&session.identity),
        client: SyncClient::new(store),
        debounce: Debouncer::new(DEBOUNCE_WINDOW),
        saved_until: None,
        subscription: Some(subscription),
        session,
        rx,
    };
    tokio::spawn(engine.run());
    Ok(StudentHandle { tx })
}

struct StudentEngine<S> {
    session: SessionContext,
    state: LocalState,
    client: SyncClient<S>,
    debounce: Debouncer,
    /// When to clear the `saved` flag, if it is up.
    saved_until: Option<Instant>,
    subscription: Option<DocSubscription>,
    rx: mpsc::UnboundedReceiver<StudentCommand>,
}

impl<S: DocStore> StudentEngine<S> {
    async fn run(mut self) {
        let student = self.session.student_id();
        info!(%student, "student engine started");
        loop {
            tokio::select! {
                command = self.rx.recv() => match command {
                    Some(command) => self.handle_command(command).await,
                    // Last handle dropped: stop without firing a pending
                    // debounce — an abandoned session does not persist.
                    None => break,
                },
                () = deadline_elapsed(self.debounce.deadline()), if self.debounce.is_armed() => {
                    self.debounce.cancel();
                    // Failure is logged in persist_now; the edits stay
                    // local and ride along with the next persist.
                    let _ = self.persist_now().await;
                },
                () = deadline_elapsed(self.saved_until), if self.saved_until.is_some() => {
                    self.saved_until = None;
                    self.state.set_saved(false);
                },
                event = next_event(&mut self.subscription) => match event {
                    Some(DocEvent::Snapshot(doc)) => self.adopt_snapshot(doc),
                    Some(DocEvent::Removed) => {
                        // Archived out from under us. Keep the working copy;
                        // nothing more syncs until the teacher restores.
                        info!(%student, "canonical record removed remotely");
                    }
                    None => self.subscription = None,
                },
            }
        }
        info!(%student, "student engine stopped");
    }

    async fn handle_command(&mut self, command: StudentCommand) {
        match command {
            StudentCommand::SetGoal { category, text } => {
                self.state.record_mut().set_goal(category, text);
                self.debounce.touch();
            }
            StudentCommand::SetScore { field, value } => {
                self.state.record_mut().set_score(field, value);
                self.debounce.touch();
            }
            StudentCommand::SetCurrentBook { title } => {
                self.state.record_mut().current_book = title;
                self.debounce.touch();
            }
            StudentCommand::ToggleReadingDay { day } => {
                self.state.record_mut().toggle_reading_day(day);
                self.debounce.touch();
            }
            StudentCommand::SetWeeklyGrade { period, subject, check_in } => {
                self.state.record_mut().set_weekly_grade(period, subject, check_in);
                self.debounce.touch();
            }
            StudentCommand::SetGoalProgress { category, period, check_in } => {
                self.state.record_mut().set_goal_progress(category, period, check_in);
                self.debounce.touch();
            }
            StudentCommand::Snapshot { reply } => {
                let _ = reply.send(self.state.record().clone());
            }
            StudentCommand::SyncStatus { reply } => {
                let _ = reply.send(self.state.sync());
            }
            StudentCommand::Flush { reply } => {
                self.debounce.cancel();
                let _ = reply.send(self.persist_now().await);
            }
        }
    }

    async fn persist_now(&mut self) -> SyncResult<()> {
        self.state.set_saving(true);
        self.state.set_saved(false);
        let result = self
            .client
            .persist(&self.session, self.state.record(), Utc::now())
            .await;
        self.state.set_saving(false);
        match &result {
            Ok(()) => {
                self.state.set_saved(true);
                self.saved_until = Some(Instant::now() + SAVED_FLASH);
            }
            Err(error) => {
                warn!(student = %self.session.student_id(), %error, "persist failed");
            }
        }
        result
    }

    fn adopt_snapshot(&mut self, doc: Document) {
        match reconcile::apply_snapshot(&mut self.state, &doc) {
            Ok(outcome) => {
                if outcome.tracker_replaced {
                    debug!("live tracker replaced by remote snapshot");
                }
                // A genuine remote change re-arms the persist pipeline so
                // the merged result propagates; an echo of our own write
                // does not, which is what breaks the write→snapshot→write
                // cycle.
                if outcome.triggering_change {
                    self.debounce.touch();
                }
            }
            Err(error) => warn!(%error, "ignoring undecodable snapshot"),
        }
    }
}

/// Next watch event, or never if the subscription is gone.
async fn next_event(subscription: &mut Option<DocSubscription>) -> Option<DocEvent> {
    match subscription {
        Some(sub) => sub.recv().await,
        None => std::future::pending().await,
    }
}

// ============================================================================
// Tests
// ============================================================================
