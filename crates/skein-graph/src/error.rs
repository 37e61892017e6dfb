//! Error types for the crawling core.

use crate::identity::IssueKey;
use thiserror::Error;

/// The error type for crawl operations.
///
/// Per-issue fetch failures are not errors — they are recorded as node
/// state and reported through round results. The only thing that surfaces
/// here is a violation of the frontier/merge protocol, which indicates a
/// bug in the caller rather than bad data, and is not recoverable.
#[derive(Debug, Error)]
pub enum Error {
    /// A resolution outcome was delivered for an identity that has no node
    /// in the graph.
    #[error("issue {0} is not part of the graph")]
    UnknownIssue(IssueKey),
}

/// A specialized Result type for crawl operations.
pub type Result<T> = std::result::Result<T, Error>;
