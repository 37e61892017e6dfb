//! Evidence folding: turning resolution results into node state and edges.
//!
//! Everything here runs strictly single-threaded, after a round's fetches
//! have all settled. Edge classification is monotonic: for any node pair
//! the recorded kind only ever moves up the order
//! `RelatesTo < DependsOn < CircularDependency`, so re-applying evidence is
//! a no-op and the merge order across distinct targets does not matter.

use crate::edge::Edge;
use crate::error::{Error, Result};
use crate::graph::IssueGraph;
use crate::identity::IssueKey;
use crate::resolve::{FetchOutcome, Reference};

/// Fold one identity's resolution outcome into the graph.
///
/// Atomic per identity: the node's state transition and all of its evidence
/// merge happen before any other identity's outcome is touched. Outcomes
/// delivered for already-terminal nodes are ignored, which keeps repeated
/// rounds idempotent.
///
/// # Errors
///
/// [`Error::UnknownIssue`] if `key` has no node in the graph. That means
/// the frontier/merge protocol was violated by the caller; it is a bug,
/// not a data problem.
pub(crate) fn apply_outcome(
    graph: &mut IssueGraph,
    key: &IssueKey,
    outcome: FetchOutcome,
) -> Result<()> {
    let position = graph
        .position(key)
        .ok_or_else(|| Error::UnknownIssue(key.clone()))?;

    if graph.nodes[position].is_terminal() {
        tracing::debug!(%key, "outcome for already-resolved issue ignored");
        return Ok(());
    }

    match outcome {
        FetchOutcome::Failed { reason } => {
            tracing::debug!(%key, %reason, "marking broken link");
            graph.nodes[position].mark_failed(reason);
        }
        FetchOutcome::Fetched { data, references } => {
            graph.nodes[position].mark_fetched(data);
            for reference in &references {
                merge_reference(graph, position, reference);
            }
        }
    }

    Ok(())
}

/// Merge a single `(target, is_dependency)` pair for the node at
/// `dependent`.
///
/// Direction reminder: dependency evidence means "target blocks the
/// resolving issue", so a fresh dependency edge points target -> dependent.
fn merge_reference(graph: &mut IssueGraph, dependent: usize, reference: &Reference) {
    if graph.nodes[dependent].key() == &reference.key {
        // Issues routinely mention their own number; never a self-edge.
        return;
    }

    let target = graph.intern(&reference.key);

    match graph
        .edges
        .iter()
        .position(|edge| edge.connects(dependent, target))
    {
        None => {
            let edge = if reference.is_dependency {
                Edge::depends_on(target, dependent)
            } else {
                Edge::relates_to(dependent, target)
            };
            graph.edges.push(edge);
        }
        Some(existing) => {
            if reference.is_dependency {
                graph.edges[existing].upgrade_dependency(target, dependent);
            }
            // A plain mention never downgrades an existing edge.
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::EdgeKind;
    use crate::node::IssueData;

    fn key(number: u64) -> IssueKey {
        IssueKey::new("github", "o", "r", number)
    }

    fn data(title: &str) -> IssueData {
        IssueData {
            title: title.to_string(),
            open: true,
            updated_at: None,
        }
    }

    fn fetched(refs: Vec<Reference>) -> FetchOutcome {
        FetchOutcome::Fetched {
            data: data("t"),
            references: refs,
        }
    }

    #[test]
    fn evidence_creates_nodes_and_typed_edges() {
        let mut graph = IssueGraph::seed([key(1)]);
        apply_outcome(
            &mut graph,
            &key(1),
            fetched(vec![
                Reference::dependency(key(2)),
                Reference::mention(key(3)),
            ]),
        )
        .unwrap();

        assert_eq!(graph.nodes().len(), 3);
        let dep = graph.edge_between(0, 1).unwrap();
        assert_eq!(dep.kind(), EdgeKind::DependsOn);
        // #2 blocks #1.
        assert_eq!((dep.from(), dep.to()), (1, 0));
        assert_eq!(graph.edge_between(0, 2).unwrap().kind(), EdgeKind::RelatesTo);
    }

    #[test]
    fn self_references_are_dropped() {
        let mut graph = IssueGraph::seed([key(1)]);
        apply_outcome(
            &mut graph,
            &key(1),
            fetched(vec![
                Reference::mention(key(1)),
                Reference::dependency(key(1)),
            ]),
        )
        .unwrap();

        assert_eq!(graph.nodes().len(), 1);
        assert!(graph.edges().is_empty());
    }

    #[test]
    fn unknown_key_is_a_protocol_violation() {
        let mut graph = IssueGraph::seed([key(1)]);
        let err = apply_outcome(&mut graph, &key(99), fetched(vec![])).unwrap_err();
        assert!(matches!(err, Error::UnknownIssue(ref k) if k.number == 99));
    }

    #[test]
    fn terminal_nodes_ignore_late_outcomes() {
        let mut graph = IssueGraph::seed([key(1)]);
        apply_outcome(&mut graph, &key(1), fetched(vec![])).unwrap();
        apply_outcome(
            &mut graph,
            &key(1),
            FetchOutcome::Failed {
                reason: "late".to_string(),
            },
        )
        .unwrap();

        assert!(graph.nodes()[0].data().is_some());
    }

    #[test]
    fn mention_never_downgrades_a_dependency() {
        let mut graph = IssueGraph::seed([key(1), key(2)]);
        apply_outcome(
            &mut graph,
            &key(1),
            fetched(vec![Reference::dependency(key(2))]),
        )
        .unwrap();
        apply_outcome(&mut graph, &key(2), fetched(vec![Reference::mention(key(1))])).unwrap();

        let edge = graph.edge_between(0, 1).unwrap();
        assert_eq!(edge.kind(), EdgeKind::DependsOn);
        assert_eq!((edge.from(), edge.to()), (1, 0));
    }
}
