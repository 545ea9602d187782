//! Typed document and collection addresses.
//!
//! Three namespaces exist: the canonical per-student records, each
//! teacher's active roster, and each teacher's archived roster. Typed
//! variants keep the namespaces from being mixed up; `Display` renders the
//! slash-separated path the backing store uses.

use std::fmt;

use classtrack_types::{StudentId, TeacherId};

/// Address of one document.
#[derive(Clone, Hash, Eq, PartialEq, Debug)]
pub enum DocPath {
    /// `students/{studentId}` — the canonical record.
    Student(StudentId),
    /// `teachers/{teacherId}/students/{studentId}` — roster projection.
    Roster { teacher: TeacherId, student: StudentId },
    /// `teachers/{teacherId}/archived/{studentId}` — archived projection.
    Archived { teacher: TeacherId, student: StudentId },
}

impl DocPath {
    /// The student this document belongs to, regardless of namespace.
    pub fn student_id(&self) -> &StudentId {
        match self {
            DocPath::Student(s) => s,
            DocPath::Roster { student, .. } => student,
            DocPath::Archived { student, .. } => student,
        }
    }

    /// The collection this document sits in, if it is a collection member.
    /// Canonical records are keyed directly and have no watched collection.
    pub fn collection(&self) -> Option<CollectionPath> {
        match self {
            DocPath::Student(_) => None,
            DocPath::Roster { teacher, .. } => Some(CollectionPath::Roster(teacher.clone())),
            DocPath::Archived { teacher, .. } => {
                Some(CollectionPath::ArchivedRoster(teacher.clone()))
            }
        }
    }
}

impl fmt::Display for DocPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocPath::Student(s) => write!(f, "students/{s}"),
            DocPath::Roster { teacher, student } => {
                write!(f, "teachers/{teacher}/students/{student}")
            }
            DocPath::Archived { teacher, student } => {
                write!(f, "teachers/{teacher}/archived/{student}")
            }
        }
    }
}

/// Address of one watchable collection.
#[derive(Clone, Hash, Eq, PartialEq, Debug)]
pub enum CollectionPath {
    /// `teachers/{teacherId}/students` — the active roster.
    Roster(TeacherId),
    /// `teachers/{teacherId}/archived` — the archived roster.
    ArchivedRoster(TeacherId),
}

impl CollectionPath {
    /// The member document path for `student` within this collection.
    pub fn doc(&self, student: StudentId) -> DocPath {
        match self {
            CollectionPath::Roster(teacher) => DocPath::Roster {
                teacher: teacher.clone(),
                student,
            },
            CollectionPath::ArchivedRoster(teacher) => DocPath::Archived {
                teacher: teacher.clone(),
                student,
            },
        }
    }

    /// Whether `doc` is a member of this collection.
    pub fn contains(&self, doc: &DocPath) -> bool {
        doc.collection().as_ref() == Some(self)
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionPath::Roster(t) => write!(f, "teachers/{t}/students"),
            CollectionPath::ArchivedRoster(t) => write!(f, "teachers/{t}/archived"),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
