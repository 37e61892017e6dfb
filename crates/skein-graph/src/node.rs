//! Node model: one issue position and its fetch lifecycle.

use crate::identity::IssueKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque issue metadata supplied by a resolver.
///
/// The crawler stores this verbatim and never interprets it beyond
/// existence; what to display is a rendering concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueData {
    /// Issue title
    pub title: String,

    /// Whether the issue is still open
    pub open: bool,

    /// Last update reported by the host, if any
    pub updated_at: Option<DateTime<Utc>>,
}

/// Fetch lifecycle of a node.
///
/// A node starts `Unfetched` and transitions at most once, to `Fetched` or
/// `FetchFailed`. Both of those are terminal: a node never regresses and is
/// never fetched again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NodeState {
    /// Known only by reference; not yet resolved
    Unfetched,

    /// Resolved successfully
    Fetched {
        /// Metadata returned by the resolver
        data: IssueData,
    },

    /// Resolution failed permanently (broken link, network or auth error)
    FetchFailed {
        /// Human-readable failure reason
        reason: String,
    },
}

/// One issue position in the graph.
///
/// The key is immutable for the node's whole life; only the state moves,
/// and only forward. State transitions go through the crawler's merge step,
/// which is why the fields are not public.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    key: IssueKey,
    state: NodeState,
}

impl Node {
    /// Create a fresh node for an identity that has only been referenced.
    pub(crate) fn unfetched(key: IssueKey) -> Self {
        Self {
            key,
            state: NodeState::Unfetched,
        }
    }

    /// The identity this node represents.
    pub fn key(&self) -> &IssueKey {
        &self.key
    }

    /// Current fetch state.
    pub fn state(&self) -> &NodeState {
        &self.state
    }

    /// Whether the node reached a terminal state (`Fetched` or `FetchFailed`).
    ///
    /// Terminal nodes are permanently excluded from future frontiers.
    pub fn is_terminal(&self) -> bool {
        !matches!(self.state, NodeState::Unfetched)
    }

    /// Payload, present only for fetched nodes.
    pub fn data(&self) -> Option<&IssueData> {
        match &self.state {
            NodeState::Fetched { data } => Some(data),
            _ => None,
        }
    }

    /// Transition to `Fetched`. Caller must have checked `!is_terminal()`.
    pub(crate) fn mark_fetched(&mut self, data: IssueData) {
        debug_assert!(!self.is_terminal(), "node {} resolved twice", self.key);
        self.state = NodeState::Fetched { data };
    }

    /// Transition to `FetchFailed`. Caller must have checked `!is_terminal()`.
    pub(crate) fn mark_failed(&mut self, reason: String) {
        debug_assert!(!self.is_terminal(), "node {} resolved twice", self.key);
        self.state = NodeState::FetchFailed { reason };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> IssueKey {
        IssueKey::new("github", "o", "r", 1)
    }

    #[test]
    fn fresh_nodes_are_not_terminal() {
        let node = Node::unfetched(key());
        assert!(!node.is_terminal());
        assert_eq!(node.data(), None);
    }

    #[test]
    fn both_resolutions_are_terminal() {
        let mut fetched = Node::unfetched(key());
        fetched.mark_fetched(IssueData {
            title: "t".to_string(),
            open: true,
            updated_at: None,
        });
        assert!(fetched.is_terminal());
        assert!(fetched.data().is_some());

        let mut failed = Node::unfetched(key());
        failed.mark_failed("404".to_string());
        assert!(failed.is_terminal());
        assert_eq!(failed.data(), None);
    }
}
