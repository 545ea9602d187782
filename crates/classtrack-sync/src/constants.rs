//! Engine timing constants.

use std::time::Duration;

/// Quiet window after the last local edit before a persist fires. Every
/// further edit inside the window restarts it.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(2000);

/// How long the `saved` confirmation flag stays up after a successful
/// persist before clearing on its own.
pub const SAVED_FLASH: Duration = Duration::from_millis(2000);
