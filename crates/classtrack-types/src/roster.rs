//! Teacher-side roster projections.
//!
//! A roster entry is a denormalized copy of a student's canonical record,
//! written under the teacher's namespace as a side effect of the student's
//! persist — never edited independently. Archiving relocates the same shape
//! to the archived namespace, so both views share one type.

use serde::{Deserialize, Serialize};

use crate::ids::StudentId;
use crate::record::StudentRecord;

/// One row of a teacher's roster: the student id plus their record fields.
///
/// The record is flattened so the stored document is field-for-field the
/// same shape as the canonical record, with the id carried alongside it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TeacherRosterEntry {
    #[serde(rename = "id")]
    pub student_id: StudentId,
    #[serde(flatten)]
    pub record: StudentRecord,
}

impl TeacherRosterEntry {
    pub fn new(student_id: StudentId, record: StudentRecord) -> Self {
        Self { student_id, record }
    }
}

/// A roster entry relocated to the archived namespace.
///
/// Same shape — the location is what distinguishes archived from active.
pub type ArchivedEntry = TeacherRosterEntry;

// ============================================================================
// Tests
// ============================================================================
