//! The teacher session engine: live roster projections plus the archive
//! lifecycle.
//!
//! One spawned task watches both of the teacher's collections (active and
//! archived) and republishes every list change as a typed
//! [`RosterSnapshot`] on a `tokio::sync::watch` channel — late subscribers
//! always see the latest snapshot. Archive and restore requests are
//! serialized through the same task, so a move is never interleaved with
//! itself. The view is read-only with respect to student records: nothing
//! here edits a record, and roster documents change only through student
//! persists and archive moves.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};
use tracing::info;

use classtrack_store::{CollectionEvent, CollectionPath, CollectionSubscription, DocStore};
use classtrack_types::{ArchivedEntry, Role, SessionContext, StudentId, TeacherRosterEntry};

use crate::archive::ArchiveManager;
use crate::error::{SyncError, SyncResult};
use crate::reconcile::parse_roster;

/// Both of a teacher's rosters at one moment, in member-id order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RosterSnapshot {
    pub active: Vec<TeacherRosterEntry>,
    pub archived: Vec<ArchivedEntry>,
}

enum TeacherCommand {
    Archive { student: StudentId, reply: oneshot::Sender<SyncResult<()>> },
    Restore { student: StudentId, reply: oneshot::Sender<SyncResult<()>> },
}

/// Caller-side handle to a spawned roster view.
#[derive(Clone, Debug)]
pub struct TeacherHandle {
    tx: mpsc::UnboundedSender<TeacherCommand>,
    snapshots: watch::Receiver<RosterSnapshot>,
}

impl TeacherHandle {
    async fn request(
        &self,
        make: impl FnOnce(oneshot::Sender<SyncResult<()>>) -> TeacherCommand,
    ) -> SyncResult<()> {
        let (reply, rx) = oneshot::channel();
        self.tx.send(make(reply)).map_err(|_| SyncError::Shutdown)?;
        rx.await.map_err(|_| SyncError::Shutdown)?
    }

    /// Archive one student off the active roster. The caller is expected
    /// to have confirmed the action with the user first.
    pub async fn archive(&self, student: StudentId) -> SyncResult<()> {
        self.request(|reply| TeacherCommand::Archive { student, reply }).await
    }

    /// Restore one archived student to the active roster.
    pub async fn restore(&self, student: StudentId) -> SyncResult<()> {
        self.request(|reply| TeacherCommand::Restore { student, reply }).await
    }

    /// Subscribe to roster snapshots. The receiver immediately holds the
    /// latest snapshot; `changed().await` wakes on every update.
    pub fn subscribe(&self) -> watch::Receiver<RosterSnapshot> {
        self.snapshots.clone()
    }

    /// The latest snapshot, without subscribing.
    pub fn current(&self) -> RosterSnapshot {
        self.snapshots.borrow().clone()
    }
}

/// Spawn the roster view for a teacher session.
///
/// Both collection subscriptions are taken before the task starts, so the
/// initial member lists are the first thing published.
pub fn spawn_roster_view<S>(store: Arc<S>, session: SessionContext) -> SyncResult<TeacherHandle>
where
    S: DocStore + 'static,
{
    if session.role != Role::Teacher {
        return Err(SyncError::WrongRole { required: Role::Teacher, actual: session.role });
    }
    // Teacher contexts always carry their own namespace.
    let Some(teacher) = session.teacher.clone() else {
        return Err(SyncError::WrongRole { required: Role::Teacher, actual: session.role });
    };

    let active_sub = store.watch_collection(&CollectionPath::Roster(teacher.clone()));
    let archived_sub = store.watch_collection(&CollectionPath::ArchivedRoster(teacher.clone()));
    let (tx, rx) = mpsc::unbounded_channel();
    let (publish, snapshots) = watch::channel(RosterSnapshot::default());

    let view = RosterView {
        archive: ArchiveManager::new(store, teacher),
        active_sub: Some(active_sub),
        archived_sub: Some(archived_sub),
        snapshot: RosterSnapshot::default(),
        publish,
        rx,
    };
    tokio::spawn(view.run());
    Ok(TeacherHandle { tx, snapshots })
}

struct RosterView<S> {
    archive: ArchiveManager<S>,
    active_sub: Option<CollectionSubscription>,
    archived_sub: Option<CollectionSubscription>,
    snapshot: RosterSnapshot,
    publish: watch::Sender<RosterSnapshot>,
    rx: mpsc::UnboundedReceiver<TeacherCommand>,
}

impl<S: DocStore> RosterView<S> {
    async fn run(mut self) {
        info!("roster view started");
        loop {
            tokio::select! {
                command = self.rx.recv() => match command {
                    Some(TeacherCommand::Archive { student, reply }) => {
                        let _ = reply.send(self.archive.archive(&student).await);
                    }
                    Some(TeacherCommand::Restore { student, reply }) => {
                        let _ = reply.send(self.archive.restore(&student).await);
                    }
                    None => break,
                },
                event = next_list(&mut self.active_sub) => match event {
                    Some(event) => {
                        self.snapshot.active = parse_roster(&event);
                        self.publish.send_replace(self.snapshot.clone());
                    }
                    None => self.active_sub = None,
                },
                event = next_list(&mut self.archived_sub) => match event {
                    Some(event) => {
                        self.snapshot.archived = parse_roster(&event);
                        self.publish.send_replace(self.snapshot.clone());
                    }
                    None => self.archived_sub = None,
                },
            }
        }
        info!("roster view stopped");
    }
}

/// Next member-list event, or never if the subscription is gone.
async fn next_list(
    subscription: &mut Option<CollectionSubscription>,
) -> Option<CollectionEvent> {
    match subscription {
        Some(sub) => sub.recv().await,
        None => std::future::pending().await,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use classtrack_store::MemoryStore;
    use classtrack_types::Identity;

    #[tokio::test]
    async fn test_student_session_cannot_spawn_roster_view() {
        let store = Arc::new(MemoryStore::new());
        let session =
            SessionContext::student(Identity::new("s-1", "Ada", "ada@example.edu"), None);
        let err = spawn_roster_view(store, session).unwrap_err();
        assert!(matches!(
            err,
            SyncError::WrongRole { required: Role::Teacher, .. }
        ));
    }

    #[tokio::test]
    async fn test_initial_snapshot_is_published() {
        let store = Arc::new(MemoryStore::new());
        let session = SessionContext::teacher(Identity::new("t-1", "Ms. R", "r@example.edu"));
        let handle = spawn_roster_view(store, session).unwrap();

        let mut rx = handle.subscribe();
        // The empty initial lists arrive as the first published snapshot.
        rx.changed().await.unwrap();
        let snapshot = rx.borrow().clone();
        assert!(snapshot.active.is_empty());
        assert!(snapshot.archived.is_empty());
    }

    #[tokio::test]
    async fn test_archive_unknown_student_reports_not_found() {
        let store = Arc::new(MemoryStore::new());
        let session = SessionContext::teacher(Identity::new("t-1", "Ms. R", "r@example.edu"));
        let handle = spawn_roster_view(store, session).unwrap();

        let err = handle.archive(StudentId::new("ghost")).await.unwrap_err();
        assert!(matches!(err, SyncError::NotFound(_)));
    }
}
