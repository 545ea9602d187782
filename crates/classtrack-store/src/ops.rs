//! The `DocStore` trait: what the sync engine needs from a document store.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StoreResult;
use crate::path::{CollectionPath, DocPath};
use crate::watch::{CollectionSubscription, DocSubscription};

/// A stored document: top-level field name → value.
pub type Document = serde_json::Map<String, Value>;

/// Fields for a merge-upsert. Same shape as a document; only the named
/// top-level fields are touched.
pub type Fields = Document;

/// Abstract document store.
///
/// Semantics the engine relies on:
/// - `get` is a one-shot read; absent documents are `Ok(None)`.
/// - `upsert_merge` shallow-merges the given top-level fields into the
///   document, creating it if absent. Nested values are replaced whole —
///   callers that need deep merges (the reading log) read-modify-write.
/// - `delete` of an absent document succeeds.
/// - `watch_doc` delivers the current snapshot (if the document exists)
///   and then one event per change, in arrival order.
/// - `watch_collection` delivers the full member list immediately and
///   again after every member change; lists replace, never merge.
/// - Dropping a subscription unregisters the watcher.
///
/// No call carries a timeout; a hung backend stalls that logical operation.
#[async_trait]
pub trait DocStore: Send + Sync {
    /// One-shot fetch of a document.
    async fn get(&self, path: &DocPath) -> StoreResult<Option<Document>>;

    /// Merge the given fields into the document at `path`, creating it if
    /// absent.
    async fn upsert_merge(&self, path: &DocPath, fields: Fields) -> StoreResult<()>;

    /// Delete the document at `path`.
    async fn delete(&self, path: &DocPath) -> StoreResult<()>;

    /// Subscribe to change notifications for one document.
    fn watch_doc(&self, path: &DocPath) -> DocSubscription;

    /// Subscribe to change notifications for a whole collection.
    fn watch_collection(&self, collection: &CollectionPath) -> CollectionSubscription;
}

/// Shallow-merge `fields` into `doc` (top-level replace per field).
pub(crate) fn merge_fields(doc: &mut Document, fields: Fields) {
    for (key, value) in fields {
        doc.insert(key, value);
    }
}
