//! The collaborator contract between the crawler and host clients.

use crate::identity::IssueKey;
use crate::node::IssueData;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One unit of relationship evidence: a referenced issue plus whether the
/// reference is a dependency or a plain co-mention.
///
/// Dependency evidence is directional and reads "the referenced issue
/// blocks the issue being resolved".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// The referenced issue
    pub key: IssueKey,

    /// True when the resolving issue depends on `key`
    pub is_dependency: bool,
}

impl Reference {
    /// Dependency evidence: `key` blocks the resolving issue.
    pub fn dependency(key: IssueKey) -> Self {
        Self {
            key,
            is_dependency: true,
        }
    }

    /// Plain co-mention evidence.
    pub fn mention(key: IssueKey) -> Self {
        Self {
            key,
            is_dependency: false,
        }
    }
}

/// Result of resolving a single issue.
///
/// Failure is a value, not an error: a broken link, a 404 or an auth
/// failure is recorded on the node and must never abort sibling
/// resolutions. Partial success is the normal state of a round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The issue exists; payload plus relationship evidence.
    Fetched {
        /// Opaque issue metadata
        data: IssueData,

        /// Referenced issues. Must arrive deduplicated by key, with
        /// dependency evidence taking precedence over a plain mention of
        /// the same issue — resolving that conflict is the collaborator's
        /// job, not the crawler's.
        references: Vec<Reference>,
    },

    /// The issue could not be resolved.
    Failed {
        /// Why: network error, not found, auth failure, unsupported host
        reason: String,
    },
}

impl FetchOutcome {
    /// Shorthand for a failed resolution.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }
}

/// A collaborator that resolves issue identities into payload and
/// relationship evidence.
///
/// Implementations own all transport, credential and text-mining concerns;
/// the crawler only ever sees [`FetchOutcome`] values and never retries —
/// whatever the resolver returns is final for that identity.
#[async_trait]
pub trait Resolver: Send + Sync {
    /// Resolve one issue.
    async fn resolve(&self, key: &IssueKey) -> FetchOutcome;
}
