//! Progress synchronization engine.
//!
//! The client-side data-consistency core of the classroom tracker: local
//! edits are coalesced by a debounce window into dual-write persists (the
//! canonical record plus the teacher's roster projection), remote snapshots
//! flow back through a reconciler that suppresses echoes of our own writes,
//! and teachers drive an archive/restore lifecycle over the roster.
//!
//! ```text
//!   UI mutations ──▶ LocalState ──▶ Debouncer ──▶ SyncClient ──▶ DocStore
//!                        ▲                                          │
//!                        └────────── reconciler ◀── watch_doc ──────┘
//!
//!   DocStore ── watch_collection ──▶ RosterView ──▶ RosterSnapshot (watch)
//!                                        │
//!                                 ArchiveManager (copy → delete)
//! ```
//!
//! Each role gets one spawned engine task that owns its state and
//! subscriptions (single-writer, no locks): [`spawn_student_engine`] for
//! the editing path, [`spawn_roster_view`] for the teacher's read-only
//! projections. Dropping a handle tears the task down, releasing every
//! subscription and any pending debounce timer.
//!
//! The pure transforms — [`quota::estimate`] and
//! [`classtrack_types::reading_streak`] — sit outside the write path and
//! are invoked on demand from currently-held data.

pub mod archive;
pub mod client;
pub mod constants;
pub mod debounce;
pub mod engine;
pub mod error;
pub mod quota;
pub mod reconcile;
pub mod roster;
pub mod state;

pub use archive::ArchiveManager;
pub use client::SyncClient;
pub use constants::{DEBOUNCE_WINDOW, SAVED_FLASH};
pub use debounce::Debouncer;
pub use engine::{spawn_student_engine, StudentHandle};
pub use error::{SyncError, SyncResult};
pub use quota::{QuotaEstimate, QuotaParams, RiskLevel};
pub use reconcile::{apply_snapshot, parse_roster};
pub use roster::{spawn_roster_view, RosterSnapshot, TeacherHandle};
pub use state::{LocalState, SnapshotOutcome, SyncState};
