//! Host collaborators: issue URL parsing and per-host resolvers.
//!
//! Each tracking service gets its own client implementing the core's
//! [`Resolver`] contract; [`HostResolver`] bundles them and dispatches per
//! identity. Hosts nobody has a client for resolve as broken links, so an
//! exotic URL in somebody's comment degrades to a `FetchFailed` node
//! instead of aborting the crawl.

pub mod github;
pub mod gitlab;

use crate::config::Tokens;
use crate::error::{Error, Result};
use async_trait::async_trait;
use skein_graph::{FetchOutcome, IssueKey, Reference, Resolver, GITHUB_HOST, GITLAB_HOST};
use std::collections::HashMap;

pub use github::GithubResolver;
pub use gitlab::GitlabResolver;

/// Parse a browser issue URL into an issue key.
///
/// Dispatches on the hostname: `github.com` and `gitlab.com` issue URLs
/// are understood, anything else is an unsupported host.
///
/// # Errors
///
/// [`Error::UnsupportedHost`] for unknown hosts, [`Error::InvalidUrl`]
/// when a known host's URL does not point at an issue.
pub fn parse_issue_url(url: &str) -> Result<IssueKey> {
    if url.contains("gitlab") {
        gitlab::parse_url(url)
    } else if url.contains("github") {
        github::parse_url(url)
    } else {
        Err(Error::UnsupportedHost(url.to_string()))
    }
}

/// The resolver handed to the crawler: one client per known host.
pub struct HostResolver {
    github: GithubResolver,
    gitlab: GitlabResolver,
}

impl HostResolver {
    /// Build a resolver using the given access tokens.
    pub fn new(tokens: &Tokens) -> Self {
        Self {
            github: GithubResolver::new(tokens.github.clone()),
            gitlab: GitlabResolver::new(tokens.gitlab.clone()),
        }
    }
}

#[async_trait]
impl Resolver for HostResolver {
    async fn resolve(&self, key: &IssueKey) -> FetchOutcome {
        match key.host.as_str() {
            GITHUB_HOST => self.github.resolve(key).await,
            GITLAB_HOST => self.gitlab.resolve(key).await,
            other => FetchOutcome::failed(format!("no handler for host {other:?}")),
        }
    }
}

/// Accumulates references under the rule the crawler expects from
/// collaborators: one entry per identity, first-encounter order, and
/// dependency evidence beating a plain mention of the same issue.
#[derive(Debug, Default)]
pub(crate) struct EvidenceSet {
    references: Vec<Reference>,
    index: HashMap<IssueKey, usize>,
}

impl EvidenceSet {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Record dependency evidence: `key` blocks the resolving issue.
    pub(crate) fn dependency(&mut self, key: IssueKey) {
        self.push(key, true);
    }

    /// Record a plain co-mention.
    pub(crate) fn mention(&mut self, key: IssueKey) {
        self.push(key, false);
    }

    fn push(&mut self, key: IssueKey, is_dependency: bool) {
        match self.index.get(&key) {
            Some(&existing) => {
                self.references[existing].is_dependency |= is_dependency;
            }
            None => {
                self.index.insert(key.clone(), self.references.len());
                self.references.push(Reference {
                    key,
                    is_dependency,
                });
            }
        }
    }

    pub(crate) fn into_references(self) -> Vec<Reference> {
        self.references
    }
}
