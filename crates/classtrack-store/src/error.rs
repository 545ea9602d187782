//! Error types for store operations.

use thiserror::Error;

/// Errors surfaced by a [`DocStore`](crate::DocStore) implementation.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store rejected or failed the operation (network, permission,
    /// backend fault). Message is backend-specific.
    #[error("store backend error: {0}")]
    Backend(String),

    /// The store connection or handle is closed.
    #[error("store is closed")]
    Closed,
}

impl StoreError {
    pub fn backend(msg: impl Into<String>) -> Self {
        StoreError::Backend(msg.into())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
