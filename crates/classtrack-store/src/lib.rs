//! Abstract document store for classtrack.
//!
//! The sync engine talks to its remote document store through the
//! [`DocStore`] trait: one-shot reads, shallow merge-upserts, deletes, and
//! continuous watch subscriptions on single documents or whole collections.
//! The real network transport is a collaborator outside this workspace;
//! [`MemoryStore`] is the in-process implementation used by every test and
//! by local development.
//!
//! Watches follow the store's push model: the subscriber receives an
//! initial snapshot, then one event per change, in arrival order, until the
//! subscription is dropped — dropping unregisters the watcher.

pub mod error;
pub mod memory;
pub mod ops;
pub mod path;
pub mod watch;

pub use error::{StoreError, StoreResult};
pub use memory::{MemoryStore, OpCounts};
pub use ops::{DocStore, Document, Fields};
pub use path::{CollectionPath, DocPath};
pub use watch::{CollectionEvent, CollectionSubscription, DocEvent, DocSubscription, Subscription};
