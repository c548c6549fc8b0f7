//! Logging setup for the binary.

use tracing_subscriber::EnvFilter;

/// Used when `RUST_LOG` is unset. HTTP internals are noisy at info.
pub const DEFAULT_FILTER: &str = "padel_watch=info,reqwest=warn,hyper=warn,hyper_util=warn";

/// Filter from `RUST_LOG`, falling back to [`DEFAULT_FILTER`].
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global `fmt` subscriber.
///
/// # Errors
///
/// Returns an error if a global subscriber is already set.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt().with_env_filter(env_filter()).try_init()
}
