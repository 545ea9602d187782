//! Engine error type.

use classtrack_store::StoreError;
use classtrack_types::{Role, StudentId};
use thiserror::Error;

/// Everything a sync operation can fail with.
#[derive(Error, Debug)]
pub enum SyncError {
    /// The backing document store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A document could not be encoded or decoded.
    #[error("document codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// A record did not serialize to a top-level object. Unreachable for
    /// the struct types this crate persists, but kept explicit instead of
    /// panicking in the write path.
    #[error("record did not encode to a document object")]
    NotAnObject,

    /// The named student has no document where the operation expected one.
    #[error("no record for student {0}")]
    NotFound(StudentId),

    /// The session's role does not permit this operation.
    #[error("operation requires {required} role, session is {actual}")]
    WrongRole { required: Role, actual: Role },

    /// The engine task behind a handle has shut down.
    #[error("engine has shut down")]
    Shutdown,
}

pub type SyncResult<T> = Result<T, SyncError>;
