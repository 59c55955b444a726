//! Error types for the collaborators the briefings talk to.
//!
//! Each external service gets its own enum so callers can decide how much of
//! a failure to surface.  The aggregator swallows [`FetchError`] after
//! logging it, the LLM tools turn [`LlmError`] into text, and the market
//! report drops a ticker on [`QuoteError`].

use std::path::PathBuf;

/// A feed could not be fetched or parsed.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("feed parse error: {0}")]
    Parse(#[from] feed_rs::parser::ParseFeedError),
}

/// A text-completion call failed.
///
/// The `Display` output is what ends up in the rendered report, so the
/// messages are written for a human reader.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("{backend} is not reachable at {endpoint}. Is it running?")]
    Unreachable { backend: &'static str, endpoint: String },

    #[error("{backend} request timed out after {secs}s")]
    Timeout { backend: &'static str, secs: u64 },

    #[error("missing credential: set {0}")]
    MissingCredential(&'static str),

    #[error("{backend} returned HTTP {status}")]
    Status { backend: &'static str, status: u16 },

    #[error("malformed response from {backend}: {detail}")]
    Malformed { backend: &'static str, detail: String },

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// A price history lookup failed.
#[derive(Debug, thiserror::Error)]
pub enum QuoteError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} for {ticker}")]
    Status { status: u16, ticker: String },

    #[error("invalid quote URL for {0}")]
    InvalidUrl(String),

    #[error("no data for {0}")]
    NoData(String),
}

/// The configuration file could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
