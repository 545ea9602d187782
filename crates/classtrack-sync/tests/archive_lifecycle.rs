//! Teacher roster view and archive/restore flows against the in-memory
//! store, with a live student session on the other side.

use std::sync::Arc;
use std::time::Duration;

use classtrack_store::{DocPath, MemoryStore};
use classtrack_sync::{spawn_roster_view, spawn_student_engine, RosterSnapshot, SyncError};
use classtrack_types::{Identity, SessionContext, StudentId, TeacherId, Weekday};
use tokio::sync::watch;
use tokio::time::sleep;

fn store() -> Arc<MemoryStore> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
    Arc::new(MemoryStore::new())
}

fn teacher_session() -> SessionContext {
    SessionContext::teacher(Identity::new("t-1", "Ms. Rivera", "rivera@example.edu"))
}

fn student_session(uid: &str, name: &str) -> SessionContext {
    SessionContext::student(
        Identity::new(uid, name, format!("{uid}@example.edu")),
        Some(TeacherId::new("t-1")),
    )
}

/// Wait until the published snapshot satisfies `predicate`.
async fn wait_for(
    rx: &mut watch::Receiver<RosterSnapshot>,
    predicate: impl Fn(&RosterSnapshot) -> bool,
) -> RosterSnapshot {
    loop {
        {
            let snapshot = rx.borrow();
            if predicate(&snapshot) {
                return snapshot.clone();
            }
        }
        rx.changed().await.expect("roster view gone");
    }
}

#[tokio::test(start_paused = true)]
async fn test_roster_tracks_student_persists() {
    let store = store();
    let teacher = spawn_roster_view(store.clone(), teacher_session()).unwrap();
    let mut rx = teacher.subscribe();

    let student = spawn_student_engine(store.clone(), student_session("s-1", "Ada")).unwrap();
    student.set_current_book("Dune").unwrap();
    student.flush().await.unwrap();

    let snapshot = wait_for(&mut rx, |s| !s.active.is_empty()).await;
    assert_eq!(snapshot.active.len(), 1);
    assert_eq!(snapshot.active[0].student_id, StudentId::new("s-1"));
    assert_eq!(snapshot.active[0].record.current_book, "Dune");
    assert!(snapshot.archived.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_archive_moves_student_and_deletes_canonical() {
    let store = store();
    let teacher = spawn_roster_view(store.clone(), teacher_session()).unwrap();
    let mut rx = teacher.subscribe();

    let student = spawn_student_engine(store.clone(), student_session("s-1", "Ada")).unwrap();
    student.toggle_reading_day(Weekday::Monday).unwrap();
    student.flush().await.unwrap();
    wait_for(&mut rx, |s| !s.active.is_empty()).await;

    teacher.archive(StudentId::new("s-1")).await.unwrap();

    let snapshot = wait_for(&mut rx, |s| s.active.is_empty() && !s.archived.is_empty()).await;
    assert_eq!(snapshot.archived.len(), 1);
    assert_eq!(snapshot.archived[0].record.name, "Ada");
    assert!(!store.contains(&DocPath::Student(StudentId::new("s-1"))));

    // The student's session keeps its working copy and stays responsive.
    sleep(Duration::from_millis(10)).await;
    let record = student.snapshot().await.unwrap();
    assert!(record.reading_tracker.get(Weekday::Monday));
}

#[tokio::test(start_paused = true)]
async fn test_restore_returns_student_with_fields_intact() {
    let store = store();
    let teacher = spawn_roster_view(store.clone(), teacher_session()).unwrap();
    let mut rx = teacher.subscribe();

    let student = spawn_student_engine(store.clone(), student_session("s-1", "Ada")).unwrap();
    student.set_current_book("Dune").unwrap();
    student.flush().await.unwrap();
    let before = wait_for(&mut rx, |s| !s.active.is_empty()).await;

    teacher.archive(StudentId::new("s-1")).await.unwrap();
    wait_for(&mut rx, |s| s.active.is_empty()).await;
    teacher.restore(StudentId::new("s-1")).await.unwrap();

    let after = wait_for(&mut rx, |s| !s.active.is_empty() && s.archived.is_empty()).await;
    assert_eq!(after.active, before.active);
}

#[tokio::test(start_paused = true)]
async fn test_roster_orders_by_student_id() {
    let store = store();
    let teacher = spawn_roster_view(store.clone(), teacher_session()).unwrap();
    let mut rx = teacher.subscribe();

    // Persist in reverse id order.
    for (uid, name) in [("s-2", "Grace"), ("s-1", "Ada")] {
        let engine = spawn_student_engine(store.clone(), student_session(uid, name)).unwrap();
        engine.flush().await.unwrap();
    }

    let snapshot = wait_for(&mut rx, |s| s.active.len() == 2).await;
    assert_eq!(snapshot.active[0].student_id, StudentId::new("s-1"));
    assert_eq!(snapshot.active[1].student_id, StudentId::new("s-2"));
}

#[tokio::test(start_paused = true)]
async fn test_archive_twice_reports_not_found() {
    let store = store();
    let teacher = spawn_roster_view(store.clone(), teacher_session()).unwrap();
    let mut rx = teacher.subscribe();

    let student = spawn_student_engine(store.clone(), student_session("s-1", "Ada")).unwrap();
    student.flush().await.unwrap();
    wait_for(&mut rx, |s| !s.active.is_empty()).await;

    teacher.archive(StudentId::new("s-1")).await.unwrap();
    let err = teacher.archive(StudentId::new("s-1")).await.unwrap_err();
    assert!(matches!(err, SyncError::NotFound(_)));
}

#[tokio::test(start_paused = true)]
async fn test_dropping_teacher_handle_stops_view() {
    let store = store();
    let teacher = spawn_roster_view(store.clone(), teacher_session()).unwrap();
    let mut rx = teacher.subscribe();
    drop(teacher);

    // The view task ends once the last command handle is gone; the watch
    // channel closes with it. Drain any already-published snapshots until
    // the closed channel reports the shutdown.
    tokio::time::timeout(Duration::from_secs(5), async {
        while rx.changed().await.is_ok() {}
    })
    .await
    .expect("roster view did not shut down");
}
