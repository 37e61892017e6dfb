//! Arena-backed storage for nodes and edges.

use crate::edge::Edge;
use crate::identity::IssueKey;
use crate::node::Node;
use serde::Serialize;
use std::collections::HashMap;

/// Append-only graph of issue nodes and typed edges.
///
/// Nodes live in a growable arena and are addressed by position; edges
/// store plain index pairs. Nodes are appended while the crawl runs and are
/// never removed or reordered, so positions referenced by edges stay stable
/// across rounds. All mutation goes through the crawler's merge step: the
/// concurrent fetch phase of a round only ever reads the graph.
#[derive(Debug, Default, Serialize)]
pub struct IssueGraph {
    /// Node arena; insertion order is first-encounter order.
    pub(crate) nodes: Vec<Node>,

    /// At most one edge per unordered pair of node positions.
    pub(crate) edges: Vec<Edge>,

    /// Key -> arena position, kept in lockstep with `nodes`.
    #[serde(skip)]
    pub(crate) index: HashMap<IssueKey, usize>,
}

impl IssueGraph {
    /// Graph containing the given identities as unfetched seed nodes.
    ///
    /// Duplicate keys keep their first-encounter position.
    pub fn seed<I>(keys: I) -> Self
    where
        I: IntoIterator<Item = IssueKey>,
    {
        let mut graph = Self::default();
        for key in keys {
            graph.intern(&key);
        }
        graph
    }

    /// All nodes, in first-encounter order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All edges, in creation order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Arena position of the node with the given key, if present.
    pub fn position(&self, key: &IssueKey) -> Option<usize> {
        self.index.get(key).copied()
    }

    /// Node at the given arena position.
    pub fn node(&self, position: usize) -> Option<&Node> {
        self.nodes.get(position)
    }

    /// The edge connecting the given unordered pair, if one exists.
    pub fn edge_between(&self, a: usize, b: usize) -> Option<&Edge> {
        self.edges.iter().find(|edge| edge.connects(a, b))
    }

    /// The want list: identities that still need fetching.
    ///
    /// Every non-terminal node's key, ordered by first encounter. Referenced
    /// identities are interned as `Unfetched` nodes when evidence is merged,
    /// so after any merge this covers both "present but unfetched" and
    /// "referenced but absent". Read-only and idempotent: two calls on an
    /// unchanged graph return identical lists.
    pub fn frontier(&self) -> Vec<IssueKey> {
        self.nodes
            .iter()
            .filter(|node| !node.is_terminal())
            .map(|node| node.key().clone())
            .collect()
    }

    /// Position of the node for `key`, appending a fresh `Unfetched` node
    /// if the identity has not been seen before.
    pub(crate) fn intern(&mut self, key: &IssueKey) -> usize {
        if let Some(&position) = self.index.get(key) {
            return position;
        }
        let position = self.nodes.len();
        self.nodes.push(Node::unfetched(key.clone()));
        self.index.insert(key.clone(), position);
        position
    }
}
