//! Sync coordinator.
//!
//! One task owns the `Store`. User commands, request completions and push
//! deliveries all arrive on a single queue and are applied in arrival order,
//! so the store has exactly one writer. Snapshots go out on a `watch`
//! channel, user-facing notices on a `broadcast` channel.

pub mod command;
pub mod coordinator;
pub mod handle;
pub mod notice;

pub use command::{Command, Completion, Event};
pub use coordinator::{SyncCoordinator, SyncOptions};
pub use handle::{SyncError, SyncHandle};
pub use notice::{Notice, NoticeLevel, Stamped};
