//! Incremental crawling and edge classification for issue dependency graphs.
//!
//! Starting from one or more seed issues, the crawler expands outward by
//! following the references each resolved issue reports, until the reachable
//! set is exhausted or a round budget runs out. Each round fans out one
//! concurrent fetch per frontier identity, waits for all of them to settle,
//! and then merges the results into the graph sequentially.
//!
//! The crate deliberately knows nothing about tracking services. Callers
//! supply a [`Resolver`] that turns an [`IssueKey`] into a payload plus a
//! list of referenced issues; how that data is obtained (REST calls, comment
//! mining, fixtures) is entirely the resolver's business.
//!
//! # Example
//!
//! ```no_run
//! use skein_graph::{crawl, CrawlConfig, IssueGraph, IssueKey, Resolver};
//!
//! async fn run(resolver: &dyn Resolver) -> skein_graph::Result<()> {
//!     let seed = IssueKey::new("github", "octocat", "Hello-World", 3094);
//!     let mut graph = IssueGraph::seed([seed]);
//!     let outcome = crawl(&mut graph, resolver, CrawlConfig::default()).await?;
//!     println!(
//!         "{} issues, {} edges, converged: {}",
//!         graph.nodes().len(),
//!         graph.edges().len(),
//!         outcome.converged
//!     );
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod crawl;
pub mod edge;
pub mod error;
pub mod graph;
pub mod identity;
mod merge;
pub mod node;
pub mod resolve;

pub use crawl::{crawl, run_round, CrawlConfig, CrawlOutcome, DEFAULT_MAX_ROUNDS};
pub use edge::{Edge, EdgeKind};
pub use error::{Error, Result};
pub use graph::IssueGraph;
pub use identity::{IssueKey, GITHUB_HOST, GITLAB_HOST};
pub use node::{IssueData, Node, NodeState};
pub use resolve::{FetchOutcome, Reference, Resolver};
