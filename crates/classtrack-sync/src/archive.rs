//! Archive lifecycle: move roster entries between the active and archived
//! namespaces.
//!
//! Archiving is copy-then-delete, not an in-place flag: the entry's fields
//! are copied to the other namespace first, then the source document (and,
//! for archive, the canonical record) is deleted. The steps are sequential
//! and not transactional; a failure mid-sequence leaves the copy in place
//! and the source untouched past the failed step, so retrying the operation
//! converges. Watchers on both collections see the move as one removal and
//! one insertion.

use std::sync::Arc;

use tracing::info;

use classtrack_store::{DocPath, DocStore};
use classtrack_types::{StudentId, TeacherId};

use crate::error::{SyncError, SyncResult};

/// Moves students between a teacher's active and archived rosters.
pub struct ArchiveManager<S> {
    store: Arc<S>,
    teacher: TeacherId,
}

impl<S: DocStore> ArchiveManager<S> {
    pub fn new(store: Arc<S>, teacher: TeacherId) -> Self {
        Self { store, teacher }
    }

    /// Archive one student: copy the roster entry to the archived
    /// namespace, remove it from the active roster, and delete the
    /// canonical record. The student stops receiving roster mirrors (their
    /// canonical document is gone) until restored.
    pub async fn archive(&self, student: &StudentId) -> SyncResult<()> {
        let source = self.roster_path(student);
        let entry = self
            .store
            .get(&source)
            .await?
            .ok_or_else(|| SyncError::NotFound(student.clone()))?;

        self.store.upsert_merge(&self.archived_path(student), entry).await?;
        self.store.delete(&source).await?;
        self.store.delete(&DocPath::Student(student.clone())).await?;
        info!(student = %student, teacher = %self.teacher, "archived");
        Ok(())
    }

    /// Restore one student: copy the archived entry back to the active
    /// roster and remove it from the archived namespace. The canonical
    /// record is not recreated here; it reappears on the student's next
    /// persist, since their own session still holds the working copy.
    pub async fn restore(&self, student: &StudentId) -> SyncResult<()> {
        let source = self.archived_path(student);
        let entry = self
            .store
            .get(&source)
            .await?
            .ok_or_else(|| SyncError::NotFound(student.clone()))?;

        self.store.upsert_merge(&self.roster_path(student), entry).await?;
        self.store.delete(&source).await?;
        info!(student = %student, teacher = %self.teacher, "restored");
        Ok(())
    }

    fn roster_path(&self, student: &StudentId) -> DocPath {
        DocPath::Roster { teacher: self.teacher.clone(), student: student.clone() }
    }

    fn archived_path(&self, student: &StudentId) -> DocPath {
        DocPath::Archived { teacher: self.teacher.clone(), student: student.clone() }
    }
}

// ============================================================================
// Tests
// ============================================================================
