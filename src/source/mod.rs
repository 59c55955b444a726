//! Feed-fetch collaborator.
//!
//! This module defines the [`FeedFetcher`] trait and the [`RawEntry`] record
//! it yields.  [`HttpFetcher`] is the real implementation; tests swap in a
//! fake that serves canned entries per URL.
//!
//! ## Adding a new kind of fetcher
//!
//! 1. Create a new file in this directory.
//! 2. Implement [`FeedFetcher`] for your struct.
//! 3. Re-export it below and construct it in `main.rs`.
//!
//! The aggregator, the morning report and the UI worker only see the trait.

mod http;
mod raw_entry;

pub use http::{entries_from_feed, HttpFetcher};
pub use raw_entry::{truncate_chars, RawEntry};

use crate::error::FetchError;

/// Anything that can turn a feed URL into its entries.
///
/// The UI worker calls [`fetch()`](FeedFetcher::fetch) on a background
/// thread, so implementations must be [`Send`].
pub trait FeedFetcher: Send {
    /// Fetch and parse the feed at `url`, returning entries in feed order.
    fn fetch(&self, url: &str) -> Result<Vec<RawEntry>, FetchError>;
}
