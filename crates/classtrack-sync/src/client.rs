//! Dual-write persist path.
//!
//! One persist writes the canonical record, then mirrors the same fields to
//! the teacher's roster document. The frozen reading log is read-modified-
//! written: the store merges top level fields shallowly, so the outbound
//! document must carry the union of the remote log and the live tracker's
//! slot or a stale client would clobber weeks it never saw.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, warn};

use classtrack_store::{DocPath, DocStore, Document, Fields};
use classtrack_types::{PeriodKey, ReadingLog, Role, SessionContext, StudentRecord};

use crate::error::{SyncError, SyncResult};

/// Writes the working copy out to the store.
pub struct SyncClient<S> {
    store: Arc<S>,
}

impl<S> Clone for SyncClient<S> {
    fn clone(&self) -> Self {
        Self { store: Arc::clone(&self.store) }
    }
}

impl<S: DocStore> SyncClient<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Persist `record` for the session's student: canonical document
    /// first, then the roster mirror under the associated teacher.
    ///
    /// Not atomic — a failure between the two writes leaves the roster one
    /// persist behind, which the next successful persist repairs. Only
    /// student sessions persist; the teacher's view is written as a side
    /// effect of this call, never directly.
    pub async fn persist(
        &self,
        session: &SessionContext,
        record: &StudentRecord,
        now: DateTime<Utc>,
    ) -> SyncResult<()> {
        if session.role != Role::Student {
            return Err(SyncError::WrongRole {
                required: Role::Student,
                actual: session.role,
            });
        }
        let student = session.student_id();
        let canonical = DocPath::Student(student.clone());

        let prior = self.store.get(&canonical).await?;
        let mut outbound = record.clone();
        outbound.reading_logs = prior_reading_log(prior.as_ref());
        match PeriodKey::current(now) {
            Some(week) => {
                outbound.reading_logs.insert(week, record.reading_tracker.clone());
            }
            // Before the school epoch there is no week to file under; the
            // live tracker stays local-only until the year starts.
            None => warn!(student = %student, "before school epoch, reading log slot skipped"),
        }
        outbound.last_updated = Some(now);

        let fields = to_fields(&outbound)?;
        self.store.upsert_merge(&canonical, fields.clone()).await?;

        if let Some(teacher) = &session.teacher {
            let roster = DocPath::Roster { teacher: teacher.clone(), student: student.clone() };
            self.store.upsert_merge(&roster, fields).await?;
            debug!(student = %student, teacher = %teacher, "persisted canonical and roster");
        } else {
            debug!(student = %student, "persisted canonical only, no teacher association");
        }
        Ok(())
    }
}

/// The remote document's frozen reading log, or empty when the document is
/// absent or the field is malformed. A malformed log is logged and treated
/// as empty rather than failing the persist.
fn prior_reading_log(prior: Option<&Document>) -> ReadingLog {
    let Some(value) = prior.and_then(|doc| doc.get("readingLogs")) else {
        return ReadingLog::new();
    };
    match serde_json::from_value(value.clone()) {
        Ok(log) => log,
        Err(error) => {
            warn!(%error, "remote reading log malformed, treating as empty");
            ReadingLog::new()
        }
    }
}

/// Encode a record as store fields.
fn to_fields(record: &StudentRecord) -> SyncResult<Fields> {
    match serde_json::to_value(record)? {
        Value::Object(fields) => Ok(fields),
        _ => Err(SyncError::NotAnObject),
    }
}

// ============================================================================
// Tests
// ============================================================================
