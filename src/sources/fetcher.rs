//! Fetch collaborator trait.

use super::Target;
use crate::error::Result;
use async_trait::async_trait;

/// Something that can retrieve the current content of a target.
///
/// The watch loop only sees this trait, so tests can script responses and
/// alternative transports can be dropped in without touching the loop.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch the body of `target` as text.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success response.
    async fn fetch(&self, target: &Target) -> Result<String>;

    /// Get a human-readable name for this fetcher (for logging).
    fn name(&self) -> String;
}
