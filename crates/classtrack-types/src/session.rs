//! Session context: who is logged in and in which role.
//!
//! The surrounding shell owns the authentication handshake and the persisted
//! role selection; this crate consumes the result as an explicit value.
//! A `SessionContext` is constructed once at login (after the role is
//! chosen) and handed to every component that needs it — there is no
//! ambient global. Dropping the engines that hold it is the teardown rule.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::ids::{StudentId, TeacherId};

/// Authenticated identity, as handed over by the login collaborator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Provider-issued uid; doubles as the canonical document key.
    pub uid: String,
    pub display_name: String,
    pub email: String,
}

impl Identity {
    pub fn new(
        uid: impl Into<String>,
        display_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            uid: uid.into(),
            display_name: display_name.into(),
            email: email.into(),
        }
    }
}

/// The selected role for this session.
#[derive(
    Clone, Copy, Hash, Eq, PartialEq, Debug, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
}

/// Everything role-scoped components need about the current session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionContext {
    pub identity: Identity,
    pub role: Role,
    /// The teacher whose roster mirrors this student's record. `None` means
    /// no association is known yet and persists skip the roster write.
    pub teacher: Option<TeacherId>,
}

impl SessionContext {
    /// Context for a student session.
    pub fn student(identity: Identity, teacher: Option<TeacherId>) -> Self {
        Self { identity, role: Role::Student, teacher }
    }

    /// Context for a teacher session. The teacher's own uid names the
    /// roster namespace.
    pub fn teacher(identity: Identity) -> Self {
        let teacher = TeacherId::new(identity.uid.clone());
        Self { identity, role: Role::Teacher, teacher: Some(teacher) }
    }

    /// The student id for this session (the identity's uid).
    pub fn student_id(&self) -> StudentId {
        StudentId::new(self.identity.uid.clone())
    }
}

// ============================================================================
// Tests
// ============================================================================
