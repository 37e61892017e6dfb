//! Concurrent resolution rounds and the crawl driver.

use crate::error::Result;
use crate::graph::IssueGraph;
use crate::identity::IssueKey;
use crate::merge::apply_outcome;
use crate::resolve::{FetchOutcome, Resolver};
use serde::Serialize;
use std::time::Duration;

/// Default round budget when the caller does not supply one.
pub const DEFAULT_MAX_ROUNDS: usize = 10;

/// Budget and deadline knobs for a crawl.
#[derive(Debug, Clone, Copy)]
pub struct CrawlConfig {
    /// Maximum number of fetch-and-merge rounds before expansion stops
    pub max_rounds: usize,

    /// Optional per-fetch deadline. A fetch that exceeds it is treated
    /// exactly like a failed fetch; siblings are unaffected.
    pub fetch_timeout: Option<Duration>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_rounds: DEFAULT_MAX_ROUNDS,
            fetch_timeout: None,
        }
    }
}

/// What a finished crawl looked like.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrawlOutcome {
    /// Rounds actually run
    pub rounds: usize,

    /// True when the frontier emptied before the round budget ran out.
    /// False means references may still dangle — reported, never fatal.
    pub converged: bool,

    /// Identities that failed to resolve, across all rounds
    pub failed: Vec<IssueKey>,
}

/// Run one fetch-and-merge round over the current frontier.
///
/// Every frontier identity is dispatched concurrently; the fan-out phase
/// never touches the graph, so in-flight fetches share nothing. Only after
/// all of them settle (success or failure) are the results merged, strictly
/// sequentially and atomically per identity. Identities whose resolution
/// failed come back in the return value, already recorded as broken links
/// in the graph.
///
/// Safe to call repeatedly: terminal nodes are filtered out by the
/// frontier, so an extra round on a converged graph is a no-op.
///
/// # Errors
///
/// Only on internal protocol violations ([`crate::Error::UnknownIssue`]);
/// per-identity fetch failures are data, not errors.
pub async fn run_round(
    graph: &mut IssueGraph,
    resolver: &dyn Resolver,
    fetch_timeout: Option<Duration>,
) -> Result<Vec<IssueKey>> {
    let want = graph.frontier();
    if want.is_empty() {
        return Ok(Vec::new());
    }
    tracing::debug!(count = want.len(), "dispatching resolution round");

    let fetches = want.iter().map(|key| async move {
        let outcome = resolve_with_deadline(resolver, key, fetch_timeout).await;
        (key.clone(), outcome)
    });
    let settled = futures::future::join_all(fetches).await;

    let mut failed = Vec::new();
    for (key, outcome) in settled {
        if let FetchOutcome::Failed { reason } = &outcome {
            tracing::debug!(%key, %reason, "resolution failed");
            failed.push(key.clone());
        }
        apply_outcome(graph, &key, outcome)?;
    }
    Ok(failed)
}

/// Resolve one identity, demoting a blown deadline to a plain failure.
async fn resolve_with_deadline(
    resolver: &dyn Resolver,
    key: &IssueKey,
    fetch_timeout: Option<Duration>,
) -> FetchOutcome {
    match fetch_timeout {
        None => resolver.resolve(key).await,
        Some(limit) => match tokio::time::timeout(limit, resolver.resolve(key)).await {
            Ok(outcome) => outcome,
            Err(_) => FetchOutcome::failed(format!("timed out after {limit:?}")),
        },
    }
}

/// Crawl until the frontier is exhausted or the round budget runs out.
///
/// Each iteration recomputes the frontier and runs one resolution round
/// over it. Convergence (an empty frontier) and budget exhaustion are both
/// ordinary terminal states; exhaustion keeps all merged progress and is
/// reported through [`CrawlOutcome::converged`]. A node that reached a
/// terminal state is never fetched again.
///
/// # Errors
///
/// Only on internal protocol violations, as with [`run_round`].
pub async fn crawl(
    graph: &mut IssueGraph,
    resolver: &dyn Resolver,
    config: CrawlConfig,
) -> Result<CrawlOutcome> {
    let mut failed = Vec::new();
    let mut rounds = 0;

    let converged = loop {
        if graph.frontier().is_empty() {
            break true;
        }
        if rounds == config.max_rounds {
            break false;
        }
        rounds += 1;

        let round_failed = run_round(graph, resolver, config.fetch_timeout).await?;
        tracing::debug!(
            round = rounds,
            nodes = graph.nodes().len(),
            edges = graph.edges().len(),
            failures = round_failed.len(),
            "round merged"
        );
        failed.extend(round_failed);
    };

    if converged {
        tracing::debug!(rounds, "crawl converged");
    } else {
        tracing::warn!(
            max_rounds = config.max_rounds,
            "round budget exhausted before the graph converged"
        );
    }

    Ok(CrawlOutcome {
        rounds,
        converged,
        failed,
    })
}
