//! Watch subscriptions: a cancellable event feed per watcher.
//!
//! A subscription pairs an unbounded receiver with an unsubscribe guard.
//! Events flow from the store's notification fan-out into the subscriber's
//! single-threaded update loop; dropping the subscription runs the guard,
//! which unregisters the watcher at the store. This is the whole
//! cancellation story — no watcher outlives its subscription.

use classtrack_types::StudentId;
use tokio::sync::mpsc;

use crate::ops::Document;

/// Change notification for a single watched document.
#[derive(Clone, Debug)]
pub enum DocEvent {
    /// The document's full current state (initial delivery and every change).
    Snapshot(Document),
    /// The document was deleted.
    Removed,
}

/// Change notification for a watched collection: the full member list.
///
/// Lists replace the previous view wholesale; there is no partial merge.
#[derive(Clone, Debug, Default)]
pub struct CollectionEvent {
    pub docs: Vec<(StudentId, Document)>,
}

/// An active watch: an event receiver plus drop-to-unsubscribe.
pub struct Subscription<T> {
    rx: mpsc::UnboundedReceiver<T>,
    _guard: Unsubscriber,
}

pub type DocSubscription = Subscription<DocEvent>;
pub type CollectionSubscription = Subscription<CollectionEvent>;

impl<T> Subscription<T> {
    /// Build a subscription from a receiver and the store-side cleanup to
    /// run when it is dropped.
    pub fn new(
        rx: mpsc::UnboundedReceiver<T>,
        unsubscribe: impl FnOnce() + Send + 'static,
    ) -> Self {
        Self {
            rx,
            _guard: Unsubscriber(Some(Box::new(unsubscribe))),
        }
    }

    /// Next event, in arrival order. `None` once the store side is gone.
    pub async fn recv(&mut self) -> Option<T> {
        self.rx.recv().await
    }

    /// Non-blocking poll, for tests and draining.
    pub fn try_recv(&mut self) -> Option<T> {
        self.rx.try_recv().ok()
    }
}

/// Runs the unsubscribe closure exactly once, on drop.
struct Unsubscriber(Option<Box<dyn FnOnce() + Send>>);

impl Drop for Unsubscriber {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.0.take() {
            unsubscribe();
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_events_arrive_in_order() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut sub: Subscription<u32> = Subscription::new(rx, || {});
        tx.send(1).unwrap();
        tx.send(2).unwrap();
        assert_eq!(sub.recv().await, Some(1));
        assert_eq!(sub.recv().await, Some(2));
    }

    #[tokio::test]
    async fn test_drop_runs_unsubscribe_once() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();
        let (_tx, rx) = mpsc::unbounded_channel::<u32>();
        let sub = Subscription::new(rx, move || {
            assert!(!flag.swap(true, Ordering::SeqCst), "guard ran twice");
        });
        drop(sub);
        assert!(fired.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_recv_none_after_sender_gone() {
        let (tx, rx) = mpsc::unbounded_channel::<u32>();
        let mut sub = Subscription::new(rx, || {});
        drop(tx);
        assert_eq!(sub.recv().await, None);
    }
}
