//! Notification collaborator trait.

use crate::error::Result;
use async_trait::async_trait;

/// Delivers a text message to the configured destination.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send `text`.
    ///
    /// # Errors
    ///
    /// Returns an error if the message could not be delivered.
    async fn send(&self, text: &str) -> Result<()>;

    /// Get a human-readable name for this notifier (for logging).
    fn name(&self) -> String;
}
