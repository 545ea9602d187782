//! In-memory document store.
//!
//! Used by tests and local development. All data is ephemeral. Watcher
//! fan-out is synchronous with the mutation: by the time `upsert_merge`
//! returns, every live subscription has the new snapshot queued. Operation
//! counters let capacity tests compare observed traffic against the quota
//! estimator's model.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::trace;

use crate::error::StoreResult;
use crate::ops::{merge_fields, DocStore, Document, Fields};
use crate::path::{CollectionPath, DocPath};
use crate::watch::{CollectionEvent, CollectionSubscription, DocEvent, DocSubscription, Subscription};

/// Snapshot of operation counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OpCounts {
    pub reads: u64,
    pub writes: u64,
    pub deletes: u64,
}

#[derive(Default)]
struct Counters {
    reads: AtomicU64,
    writes: AtomicU64,
    deletes: AtomicU64,
}

struct Watcher<T> {
    id: u64,
    tx: mpsc::UnboundedSender<T>,
}

#[derive(Default)]
struct Inner {
    docs: HashMap<DocPath, Document>,
    doc_watchers: HashMap<DocPath, Vec<Watcher<DocEvent>>>,
    collection_watchers: HashMap<CollectionPath, Vec<Watcher<CollectionEvent>>>,
    next_watcher_id: u64,
}

impl Inner {
    /// Full member list of a collection, ordered by student id.
    fn collection_docs(&self, collection: &CollectionPath) -> CollectionEvent {
        let mut docs: Vec<_> = self
            .docs
            .iter()
            .filter(|(path, _)| collection.contains(path))
            .map(|(path, doc)| (path.student_id().clone(), doc.clone()))
            .collect();
        docs.sort_by(|a, b| a.0.cmp(&b.0));
        CollectionEvent { docs }
    }

    /// Push a document event to that document's watchers.
    fn notify_doc(&mut self, path: &DocPath, event: DocEvent) {
        if let Some(watchers) = self.doc_watchers.get_mut(path) {
            watchers.retain(|w| w.tx.send(event.clone()).is_ok());
        }
    }

    /// Push the refreshed member list to watchers of the containing
    /// collection, if the document sits in one.
    fn notify_collection(&mut self, path: &DocPath) {
        let Some(collection) = path.collection() else {
            return;
        };
        if self
            .collection_watchers
            .get(&collection)
            .map_or(true, |w| w.is_empty())
        {
            return;
        }
        let event = self.collection_docs(&collection);
        if let Some(watchers) = self.collection_watchers.get_mut(&collection) {
            watchers.retain(|w| w.tx.send(event.clone()).is_ok());
        }
    }
}

/// In-memory [`DocStore`] with watcher fan-out.
///
/// Cheap to clone; clones share the same documents and watchers.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
    counters: Arc<Counters>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observed operation totals since construction.
    pub fn op_counts(&self) -> OpCounts {
        OpCounts {
            reads: self.counters.reads.load(Ordering::Relaxed),
            writes: self.counters.writes.load(Ordering::Relaxed),
            deletes: self.counters.deletes.load(Ordering::Relaxed),
        }
    }

    /// Whether a document currently exists (test convenience; not counted
    /// as a read).
    pub fn contains(&self, path: &DocPath) -> bool {
        self.inner.lock().docs.contains_key(path)
    }
}

#[async_trait]
impl DocStore for MemoryStore {
    async fn get(&self, path: &DocPath) -> StoreResult<Option<Document>> {
        self.counters.reads.fetch_add(1, Ordering::Relaxed);
        Ok(self.inner.lock().docs.get(path).cloned())
    }

    async fn upsert_merge(&self, path: &DocPath, fields: Fields) -> StoreResult<()> {
        self.counters.writes.fetch_add(1, Ordering::Relaxed);
        let mut inner = self.inner.lock();
        let doc = inner.docs.entry(path.clone()).or_default();
        merge_fields(doc, fields);
        let snapshot = doc.clone();
        trace!(path = %path, "upsert_merge");
        inner.notify_doc(path, DocEvent::Snapshot(snapshot));
        inner.notify_collection(path);
        Ok(())
    }

    async fn delete(&self, path: &DocPath) -> StoreResult<()> {
        self.counters.deletes.fetch_add(1, Ordering::Relaxed);
        let mut inner = self.inner.lock();
        if inner.docs.remove(path).is_some() {
            trace!(path = %path, "delete");
            inner.notify_doc(path, DocEvent::Removed);
            inner.notify_collection(path);
        }
        Ok(())
    }

    fn watch_doc(&self, path: &DocPath) -> DocSubscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = self.inner.lock();
        let id = inner.next_watcher_id;
        inner.next_watcher_id += 1;

        // Initial snapshot, only if the document exists — a watch on an
        // absent document stays silent until the first write.
        if let Some(doc) = inner.docs.get(path) {
            let _ = tx.send(DocEvent::Snapshot(doc.clone()));
        }
        inner
            .doc_watchers
            .entry(path.clone())
            .or_default()
            .push(Watcher { id, tx });

        let registry = Arc::clone(&self.inner);
        let watched = path.clone();
        Subscription::new(rx, move || {
            let mut inner = registry.lock();
            if let Some(watchers) = inner.doc_watchers.get_mut(&watched) {
                watchers.retain(|w| w.id != id);
            }
        })
    }

    fn watch_collection(&self, collection: &CollectionPath) -> CollectionSubscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = self.inner.lock();
        let id = inner.next_watcher_id;
        inner.next_watcher_id += 1;

        // Collections always deliver an initial list, even an empty one.
        let _ = tx.send(inner.collection_docs(collection));
        inner
            .collection_watchers
            .entry(collection.clone())
            .or_default()
            .push(Watcher { id, tx });

        let registry = Arc::clone(&self.inner);
        let watched = collection.clone();
        Subscription::new(rx, move || {
            let mut inner = registry.lock();
            if let Some(watchers) = inner.collection_watchers.get_mut(&watched) {
                watchers.retain(|w| w.id != id);
            }
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
