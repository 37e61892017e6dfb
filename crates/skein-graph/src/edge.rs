//! Typed edges between node positions.

use serde::{Deserialize, Serialize};

/// Relationship strength between two issues.
///
/// Variants are ordered weakest to strongest; new evidence only ever moves
/// an edge up this order, never down. `Ord` reflects exactly that upgrade
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeKind {
    /// Co-mention or cross-reference; carries no direction
    RelatesTo,

    /// Hard dependency: `from` must complete before `to`
    DependsOn,

    /// Both dependency directions asserted; a detected two-cycle
    CircularDependency,
}

/// A typed connection between two node positions.
///
/// Positions index into the graph's node arena, which is append-only, so
/// they stay valid forever. The endpoint pair is ordered: for `DependsOn`,
/// `from` is the blocker and `to` the dependent. For the other kinds the
/// order carries no meaning.
///
/// At most one edge exists per unordered pair of nodes; new evidence
/// mutates it in place rather than adding a parallel edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Edge {
    from: usize,
    to: usize,
    kind: EdgeKind,
}

impl Edge {
    /// Fresh dependency edge, oriented blocker -> dependent.
    pub(crate) fn depends_on(blocker: usize, dependent: usize) -> Self {
        Self {
            from: blocker,
            to: dependent,
            kind: EdgeKind::DependsOn,
        }
    }

    /// Fresh undirected relation edge.
    pub(crate) fn relates_to(a: usize, b: usize) -> Self {
        Self {
            from: a,
            to: b,
            kind: EdgeKind::RelatesTo,
        }
    }

    /// First endpoint: the blocker for `DependsOn` edges.
    pub fn from(&self) -> usize {
        self.from
    }

    /// Second endpoint: the dependent for `DependsOn` edges.
    pub fn to(&self) -> usize {
        self.to
    }

    /// Relationship kind currently recorded on this edge.
    pub fn kind(&self) -> EdgeKind {
        self.kind
    }

    /// Whether this edge connects the given unordered pair of positions.
    pub fn connects(&self, a: usize, b: usize) -> bool {
        (self.from == a && self.to == b) || (self.from == b && self.to == a)
    }

    /// Fold dependency evidence oriented `blocker -> dependent` into this
    /// edge, upgrading it in place.
    ///
    /// A plain relation becomes a dependency with the new orientation. A
    /// dependency already known in the opposite direction means both
    /// directions hold, so the edge becomes circular. Same-direction
    /// reaffirmation and already-circular edges are left untouched.
    pub(crate) fn upgrade_dependency(&mut self, blocker: usize, dependent: usize) {
        debug_assert!(self.connects(blocker, dependent));
        match self.kind {
            EdgeKind::RelatesTo => {
                self.from = blocker;
                self.to = dependent;
                self.kind = EdgeKind::DependsOn;
            }
            EdgeKind::DependsOn if self.from == dependent && self.to == blocker => {
                self.kind = EdgeKind::CircularDependency;
            }
            EdgeKind::DependsOn | EdgeKind::CircularDependency => {}
        }
    }
}
