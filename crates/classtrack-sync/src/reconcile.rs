//! Decoding remote snapshots into typed state.
//!
//! Two entry points: [`apply_snapshot`] folds a watched canonical document
//! into the student's [`LocalState`] (last-writer-wins, echo detection via
//! structural comparison), and [`parse_roster`] turns a collection event
//! into typed roster entries, skipping members that fail to decode instead
//! of dropping the whole list.

use serde_json::Value;
use tracing::warn;

use classtrack_store::{CollectionEvent, Document};
use classtrack_types::{StudentRecord, TeacherRosterEntry};

use crate::error::SyncResult;
use crate::state::{LocalState, SnapshotOutcome};

/// Decode a canonical-document snapshot and fold it into `state`.
///
/// The remote value wins wholesale; the outcome reports whether anything
/// in the persist-triggering field set actually differed, which is what
/// keeps our own write echoes from rescheduling a persist.
pub fn apply_snapshot(state: &mut LocalState, doc: &Document) -> SyncResult<SnapshotOutcome> {
    let remote: StudentRecord = serde_json::from_value(Value::Object(doc.clone()))?;
    Ok(state.apply_remote(remote))
}

/// Decode a roster collection event into typed entries.
///
/// Entries arrive in the event's order (member id order). A member that
/// fails to decode is logged and skipped — one corrupt document must not
/// blank the teacher's whole roster.
pub fn parse_roster(event: &CollectionEvent) -> Vec<TeacherRosterEntry> {
    event
        .docs
        .iter()
        .filter_map(|(student_id, doc)| {
            match serde_json::from_value::<StudentRecord>(Value::Object(doc.clone())) {
                Ok(record) => Some(TeacherRosterEntry::new(student_id.clone(), record)),
                Err(error) => {
                    warn!(student = %student_id, %error, "skipping undecodable roster member");
                    None
                }
            }
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
