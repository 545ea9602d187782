//! Trailing-edge debounce for the persist pipeline.
//!
//! The debouncer holds a deadline, not a closure: when the deadline fires
//! the engine reads whatever the working copy holds *then*, so a timer
//! scheduled before edit N still persists edit N's data. Each touch inside
//! the window pushes the deadline out; cancel clears it without firing.

use std::future::pending;
use std::time::Duration;

use tokio::time::{sleep_until, Instant};

/// Deadline holder for trailing-edge debounce.
#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self { window, deadline: None }
    }

    /// Record an edit: (re)arm the deadline one full window from now.
    pub fn touch(&mut self) {
        self.deadline = Some(Instant::now() + self.window);
    }

    /// Disarm without firing.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Current deadline, for the engine's select loop.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}

/// Resolve when `deadline` passes; never resolve if there is none.
///
/// Shaped for `select!` arms that watch an optional timer without
/// rebuilding a sleep future on every loop iteration path.
pub async fn deadline_elapsed(deadline: Option<Instant>) {
    match deadline {
        Some(at) => sleep_until(at).await,
        None => pending().await,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{advance, timeout};

    const WINDOW: Duration = Duration::from_millis(2000);

    #[tokio::test(start_paused = true)]
    async fn test_unarmed_never_fires() {
        let d = Debouncer::new(WINDOW);
        assert!(!d.is_armed());
        let fired = timeout(Duration::from_secs(60), deadline_elapsed(d.deadline())).await;
        assert!(fired.is_err(), "unarmed debouncer fired");
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_full_window() {
        let mut d = Debouncer::new(WINDOW);
        d.touch();
        timeout(WINDOW + Duration::from_millis(1), deadline_elapsed(d.deadline()))
            .await
            .unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_touch_restarts_window() {
        let mut d = Debouncer::new(WINDOW);
        d.touch();
        advance(Duration::from_millis(1500)).await;
        d.touch();

        // Not yet: only 500ms remained on the old deadline.
        let early = timeout(Duration::from_millis(600), deadline_elapsed(d.deadline())).await;
        assert!(early.is_err(), "old deadline survived the touch");

        // The fresh window (measured from the second touch) does elapse.
        timeout(WINDOW, deadline_elapsed(d.deadline())).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_disarms() {
        let mut d = Debouncer::new(WINDOW);
        d.touch();
        d.cancel();
        assert!(!d.is_armed());
        let fired = timeout(Duration::from_secs(60), deadline_elapsed(d.deadline())).await;
        assert!(fired.is_err(), "cancelled debouncer fired");
    }
}
