//! GitHub REST collaborator.
//!
//! Resolution of one issue is three requests: the issue itself, its
//! comments, and its timeline. Dependency evidence comes out of "depends
//! on" lines in the issue body and comments; everything else mined from
//! the text, plus `cross-referenced` timeline events, counts as a plain
//! mention. Bare `#123` tags resolve against the issue's own repository;
//! cross-repo references need full URLs.

use super::EvidenceSet;
use crate::error::{Error, Result};
use crate::mining::{extract_dependency_lines, extract_issue_numbers, extract_issue_urls};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use skein_graph::{FetchOutcome, IssueData, IssueKey, Reference, Resolver, GITHUB_HOST};

const GITHUB_API: &str = "https://api.github.com";

/// Comments and timeline pages are capped at the API maximum.
const PER_PAGE: u32 = 100;

/// Resolver for issues hosted on github.com.
///
/// Works anonymously for public repositories (with GitHub's unauthenticated
/// rate limit); a bearer token lifts the limit and opens private repos.
#[derive(Debug, Clone)]
pub struct GithubResolver {
    client: reqwest::Client,
    token: Option<String>,
}

impl GithubResolver {
    /// Build a client, optionally authenticating with a bearer token.
    pub fn new(token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            token,
        }
    }

    fn get(&self, url: String) -> reqwest::RequestBuilder {
        // GitHub rejects requests without a User-Agent.
        let mut request = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, "skein")
            .header(reqwest::header::ACCEPT, "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        request
    }

    async fn fetch(&self, key: &IssueKey) -> Result<(IssueData, Vec<Reference>)> {
        let base = format!(
            "{GITHUB_API}/repos/{}/{}/issues/{}",
            key.owner, key.repo, key.number
        );

        let issue: Issue = self
            .get(base.clone())
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let comments: Vec<Comment> = self
            .get(format!("{base}/comments?per_page={PER_PAGE}"))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let timeline: Vec<TimelineEvent> = self
            .get(format!("{base}/timeline?per_page={PER_PAGE}"))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let mut evidence = EvidenceSet::new();
        for body in std::iter::once(issue.body.as_deref())
            .chain(comments.iter().map(|c| c.body.as_deref()))
            .flatten()
        {
            mine_text(&mut evidence, key, body);
        }
        for event in timeline {
            if let Some(referenced) = event.cross_referenced_issue() {
                evidence.mention(referenced);
            }
        }

        let data = IssueData {
            title: issue.title,
            open: issue.state == "open",
            updated_at: issue.updated_at,
        };
        Ok((data, evidence.into_references()))
    }
}

#[async_trait]
impl Resolver for GithubResolver {
    async fn resolve(&self, key: &IssueKey) -> FetchOutcome {
        match self.fetch(key).await {
            Ok((data, references)) => FetchOutcome::Fetched { data, references },
            Err(err) => {
                tracing::debug!(%key, error = %err, "github resolution failed");
                FetchOutcome::failed(err.to_string())
            }
        }
    }
}

/// Parse a github.com issue URL into a key.
pub(crate) fn parse_url(url: &str) -> Result<IssueKey> {
    extract_issue_urls(url)
        .into_iter()
        .next()
        .ok_or_else(|| Error::InvalidUrl(url.to_string()))
}

/// Mine one body of text into the evidence set.
///
/// Dependency lines are mined first so that an issue referenced both ways
/// keeps its dependency flag; bare tags resolve against the resolving
/// issue's own owner/repo.
fn mine_text(evidence: &mut EvidenceSet, key: &IssueKey, text: &str) {
    for line in extract_dependency_lines(text) {
        for number in extract_issue_numbers(&line) {
            evidence.dependency(IssueKey::new(GITHUB_HOST, &key.owner, &key.repo, number));
        }
        for target in extract_issue_urls(&line) {
            evidence.dependency(target);
        }
    }
    for number in extract_issue_numbers(text) {
        evidence.mention(IssueKey::new(GITHUB_HOST, &key.owner, &key.repo, number));
    }
    for target in extract_issue_urls(text) {
        evidence.mention(target);
    }
}

// ========== API response shapes ==========

#[derive(Debug, Deserialize)]
struct Issue {
    title: String,
    state: String,
    body: Option<String>,
    updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct Comment {
    body: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TimelineEvent {
    event: String,
    source: Option<CrossRefSource>,
}

impl TimelineEvent {
    /// The issue on the other side of a `cross-referenced` event, if this
    /// event is one and carries enough repository detail to name it.
    fn cross_referenced_issue(&self) -> Option<IssueKey> {
        if self.event != "cross-referenced" {
            return None;
        }
        let source = self.source.as_ref()?;
        if source.kind.as_deref() != Some("issue") {
            tracing::debug!(kind = ?source.kind, "unknown cross reference type");
            return None;
        }
        let issue = source.issue.as_ref()?;
        let repository = issue.repository.as_ref()?;
        Some(IssueKey::new(
            GITHUB_HOST,
            &repository.owner.login,
            &repository.name,
            issue.number,
        ))
    }
}

#[derive(Debug, Deserialize)]
struct CrossRefSource {
    #[serde(rename = "type")]
    kind: Option<String>,
    issue: Option<ReferencedIssue>,
}

#[derive(Debug, Deserialize)]
struct ReferencedIssue {
    number: u64,
    repository: Option<Repository>,
}

#[derive(Debug, Deserialize)]
struct Repository {
    name: String,
    owner: Account,
}

#[derive(Debug, Deserialize)]
struct Account {
    login: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> IssueKey {
        IssueKey::new("github", "octocat", "Hello-World", 3094)
    }

    #[test]
    fn dependency_lines_outrank_plain_mentions() {
        let mut evidence = EvidenceSet::new();
        mine_text(
            &mut evidence,
            &key(),
            "Related: #3095.\ndepends on #3095 and #3089",
        );

        let references = evidence.into_references();
        assert_eq!(references.len(), 2);
        assert!(references.iter().all(|r| r.is_dependency));
    }

    #[test]
    fn bare_tags_resolve_against_the_issues_own_repo() {
        let mut evidence = EvidenceSet::new();
        mine_text(&mut evidence, &key(), "depends on #3043");

        let references = evidence.into_references();
        assert_eq!(
            references[0].key,
            IssueKey::new("github", "octocat", "Hello-World", 3043)
        );
    }

    #[test]
    fn url_references_cross_repository_boundaries() {
        let mut evidence = EvidenceSet::new();
        mine_text(
            &mut evidence,
            &key(),
            "depends on https://github.com/octocat/Spoon-Knife/issues/33081",
        );

        let references = evidence.into_references();
        assert_eq!(
            references[0].key,
            IssueKey::new("github", "octocat", "Spoon-Knife", 33081)
        );
        assert!(references[0].is_dependency);
    }

    #[test]
    fn timeline_cross_references_become_mentions() {
        let raw = r#"{
            "event": "cross-referenced",
            "source": {
                "type": "issue",
                "issue": {
                    "number": 3130,
                    "repository": {
                        "name": "Hello-World",
                        "owner": { "login": "octocat" }
                    }
                }
            }
        }"#;
        let event: TimelineEvent = serde_json::from_str(raw).unwrap();
        assert_eq!(
            event.cross_referenced_issue(),
            Some(IssueKey::new("github", "octocat", "Hello-World", 3130))
        );
    }

    #[test]
    fn non_issue_cross_references_are_skipped() {
        let raw = r#"{
            "event": "cross-referenced",
            "source": { "type": "commit" }
        }"#;
        let event: TimelineEvent = serde_json::from_str(raw).unwrap();
        assert_eq!(event.cross_referenced_issue(), None);

        let labeled: TimelineEvent =
            serde_json::from_str(r#"{ "event": "labeled" }"#).unwrap();
        assert_eq!(labeled.cross_referenced_issue(), None);
    }

    #[test]
    fn issue_payload_deserializes() {
        let raw = r#"{
            "title": "Add frobnicator",
            "state": "open",
            "body": "depends on #1",
            "updated_at": "2024-06-01T12:00:00Z",
            "number": 3094,
            "labels": []
        }"#;
        let issue: Issue = serde_json::from_str(raw).unwrap();
        assert_eq!(issue.title, "Add frobnicator");
        assert_eq!(issue.state, "open");
        assert!(issue.updated_at.is_some());
    }

    #[test]
    fn parse_url_accepts_issue_urls_only() {
        let parsed = parse_url("https://github.com/octocat/Hello-World/issues/3094").unwrap();
        assert_eq!(parsed, key());

        assert!(parse_url("https://github.com/octocat/Hello-World/pull/99").is_err());
    }
}
