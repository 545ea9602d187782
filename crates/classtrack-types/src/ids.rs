//! Typed identifiers for students and teachers.
//!
//! IDs are opaque strings issued by the authentication provider (the login
//! collaborator is out of scope — we consume whatever uid it hands us).
//! Wrapping them in distinct newtypes keeps a roster path from ever being
//! built with the arguments swapped. The `random()` constructor mints a
//! UUIDv7 hex string for local development and tests, where no provider
//! exists.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A student identifier (provider uid, opaque).
#[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(String);

/// A teacher identifier (provider uid, opaque).
#[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeacherId(String);

macro_rules! impl_uid {
    ($T:ident) => {
        impl $T {
            /// Wrap a provider-issued uid.
            pub fn new(uid: impl Into<String>) -> Self {
                Self(uid.into())
            }

            /// Mint a fresh time-ordered id (UUIDv7 hex) for tests and
            /// local development.
            pub fn random() -> Self {
                Self(uuid::Uuid::now_v7().as_simple().to_string())
            }

            /// The raw uid string.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// First 8 characters — for human display only, not lookup.
            pub fn short(&self) -> &str {
                &self.0[..self.0.len().min(8)]
            }
        }

        impl fmt::Display for $T {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl fmt::Debug for $T {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($T), "({})"), self.0)
            }
        }

        impl From<&str> for $T {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $T {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

impl_uid!(StudentId);
impl_uid!(TeacherId);

// ============================================================================
// Tests
// ============================================================================
