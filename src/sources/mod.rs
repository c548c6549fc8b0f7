//! Fetching the watched resources.

mod fetcher;
mod http;
mod target;

pub use fetcher::Fetcher;
pub use http::{HttpFetcher, HttpFetcherBuilder};
pub use target::{DATE_PLACEHOLDER, Target, TargetSpec, expand_all, window};
