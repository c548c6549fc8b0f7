//! # padel-watch
//!
//! Watches padel court availability pages and sends a Telegram message when
//! they change.
//!
//! ## Overview
//!
//! Every cycle the [`Watcher`](core::Watcher) fetches each configured target,
//! reduces the body to a [`Snapshot`](core::Snapshot) and compares it with the
//! one stored for that target:
//! - first successful fetch: the snapshot becomes the baseline, no message;
//! - same snapshot: nothing happens;
//! - different snapshot: one notification for the cycle, snapshot replaced.
//!
//! Fetch and notification failures are logged and never end the loop.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use padel_watch::prelude::*;
//!
//! # async fn example() -> padel_watch::error::Result<()> {
//! let config = WatchConfig::from_env()?;
//!
//! let fetcher = HttpFetcher::builder()
//!     .with_timeout(config.request_timeout())
//!     .build()?;
//! let notifier = TelegramNotifier::new(
//!     &config.telegram_bot_token,
//!     &config.telegram_chat_id,
//!     config.request_timeout(),
//! )?;
//!
//! let watcher = Watcher::new(Box::new(fetcher), Box::new(notifier), config.watch_options()?);
//! watcher.run().await;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs, rust_2024_compatibility)]
#![deny(unsafe_code)]

pub mod core;
pub mod error;
pub mod notify;
pub mod settings;
pub mod sources;
pub mod telemetry;

/// Convenient re-exports for common usage patterns.
pub mod prelude {
    pub use crate::core::{
        Change, CycleReport, NotificationOutcome, Snapshot, Validate, WatchOptions, WatchState,
        Watcher,
    };
    pub use crate::error::{Result, ValidationError, WatchError};
    pub use crate::notify::{Notifier, TelegramNotifier};
    pub use crate::settings::WatchConfig;
    pub use crate::sources::{Fetcher, HttpFetcher, Target, TargetSpec};
}
