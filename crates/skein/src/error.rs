//! Error types for skein CLI operations.

use thiserror::Error;

/// The error type for skein operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The URL does not name an issue any known host can handle.
    #[error("cannot handle issue URL: {0}")]
    InvalidUrl(String),

    /// The URL belongs to a tracking service skein has no client for.
    #[error("unsupported host in URL: {0}")]
    UnsupportedHost(String),

    /// HTTP transport or status error from a tracker API.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal crawl protocol violation; indicates a bug, not bad data.
    #[error(transparent)]
    Graph(#[from] skein_graph::Error),
}

/// A specialized Result type for skein operations.
pub type Result<T> = std::result::Result<T, Error>;
