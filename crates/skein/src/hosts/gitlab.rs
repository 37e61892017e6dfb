//! GitLab REST collaborator.
//!
//! Resolution is two requests: the issue by URL-encoded project path, then
//! its links. GitLab models relations explicitly, so no text mining is
//! needed: `is_blocked_by` links are dependency evidence, `relates_to`
//! links are mentions. A `blocks` link is also recorded as a mention —
//! links are symmetric, so the blocked issue's own `is_blocked_by` link
//! carries the direction and upgrades the edge when that side resolves.

use super::EvidenceSet;
use crate::error::{Error, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Deserialize;
use skein_graph::{FetchOutcome, IssueData, IssueKey, Reference, Resolver, GITLAB_HOST};
use std::sync::OnceLock;

const GITLAB_API: &str = "https://gitlab.com/api/v4";

fn issue_url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"gitlab\.com/(?P<path>[^\s?]+?)/-/issues/(?P<number>\d+)")
            .expect("gitlab issue url regex must compile")
    })
}

/// Resolver for issues hosted on gitlab.com.
#[derive(Debug, Clone)]
pub struct GitlabResolver {
    client: reqwest::Client,
    token: Option<String>,
}

impl GitlabResolver {
    /// Build a client, optionally authenticating with a bearer token.
    pub fn new(token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            token,
        }
    }

    fn get(&self, url: String) -> reqwest::RequestBuilder {
        let mut request = self.client.get(url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        request
    }

    async fn fetch(&self, key: &IssueKey) -> Result<(IssueData, Vec<Reference>)> {
        let encoded = project_path(key).replace('/', "%2F");

        let issue: Issue = self
            .get(format!(
                "{GITLAB_API}/projects/{encoded}/issues/{}",
                key.number
            ))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        // Links are listed under the numeric project id and internal iid
        // the issue lookup reported, not the path we were given.
        let links: Vec<Link> = self
            .get(format!(
                "{GITLAB_API}/projects/{}/issues/{}/links",
                issue.project_id, issue.iid
            ))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let mut evidence = EvidenceSet::new();
        for link in links {
            let Some(target) = parse_url(&link.web_url).ok() else {
                tracing::debug!(url = %link.web_url, "unparseable link target skipped");
                continue;
            };
            match link.link_type.as_str() {
                "is_blocked_by" => evidence.dependency(target),
                _ => evidence.mention(target),
            }
        }

        let data = IssueData {
            title: issue.title,
            open: issue.state == "opened",
            updated_at: issue.updated_at,
        };
        Ok((data, evidence.into_references()))
    }
}

#[async_trait]
impl Resolver for GitlabResolver {
    async fn resolve(&self, key: &IssueKey) -> FetchOutcome {
        match self.fetch(key).await {
            Ok((data, references)) => FetchOutcome::Fetched { data, references },
            Err(err) => {
                tracing::debug!(%key, error = %err, "gitlab resolution failed");
                FetchOutcome::failed(err.to_string())
            }
        }
    }
}

/// Parse a gitlab.com issue URL into a key.
///
/// The project path before `/-/issues/` may be arbitrarily nested
/// (`group/subgroup/project`); the last segment becomes the repo and the
/// rest the owner.
pub(crate) fn parse_url(url: &str) -> Result<IssueKey> {
    let caps = issue_url_re()
        .captures(url)
        .ok_or_else(|| Error::InvalidUrl(url.to_string()))?;

    let path = &caps["path"];
    let number = caps["number"]
        .parse()
        .map_err(|_| Error::InvalidUrl(url.to_string()))?;

    let (owner, repo) = match path.rsplit_once('/') {
        Some((owner, repo)) => (owner, repo),
        None => return Err(Error::InvalidUrl(url.to_string())),
    };
    Ok(IssueKey::new(GITLAB_HOST, owner, repo, number))
}

fn project_path(key: &IssueKey) -> String {
    format!("{}/{}", key.owner, key.repo)
}

// ========== API response shapes ==========

#[derive(Debug, Deserialize)]
struct Issue {
    title: String,
    state: String,
    project_id: u64,
    iid: u64,
    updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct Link {
    web_url: String,
    link_type: String,
}
