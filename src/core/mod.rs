//! Core watch types: snapshots, loop state and the loop itself.

mod snapshot;
mod state;
mod validation;
mod watcher;

pub use snapshot::Snapshot;
pub use state::{Change, CycleReport, NotificationOutcome, WatchState};
pub use validation::Validate;
pub use watcher::{WatchOptions, Watcher};
