//! Issue identity across hosting services.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Host tag for issues tracked on GitHub.
pub const GITHUB_HOST: &str = "github";

/// Host tag for issues tracked on GitLab.
pub const GITLAB_HOST: &str = "gitlab";

/// Unique key naming one issue on a hosting service.
///
/// A key exists independently of whether the issue has been fetched, and is
/// the only valid cross-reference between nodes. Two keys are equal iff all
/// four components compare equal; string comparison is case-sensitive.
/// Identities are never unified across hosts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IssueKey {
    /// Hosting service tag (e.g. "github", "gitlab")
    pub host: String,

    /// Repository owner, or the leading project path on GitLab
    pub owner: String,

    /// Repository or project name
    pub repo: String,

    /// Issue number within the repository
    pub number: u64,
}

impl IssueKey {
    /// Create a new issue key.
    pub fn new(
        host: impl Into<String>,
        owner: impl Into<String>,
        repo: impl Into<String>,
        number: u64,
    ) -> Self {
        Self {
            host: host.into(),
            owner: owner.into(),
            repo: repo.into(),
            number,
        }
    }

    /// Browser URL for the issue, for hosts the system knows how to render.
    ///
    /// Returns `None` for unrecognized hosts; the key is still a valid
    /// identity, it just has no canonical web address.
    pub fn web_url(&self) -> Option<String> {
        match self.host.as_str() {
            GITHUB_HOST => Some(format!(
                "https://github.com/{}/{}/issues/{}",
                self.owner, self.repo, self.number
            )),
            GITLAB_HOST => Some(format!(
                "https://gitlab.com/{}/{}/-/issues/{}",
                self.owner, self.repo, self.number
            )),
            _ => None,
        }
    }
}

impl fmt::Display for IssueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_component_wise() {
        let a = IssueKey::new("github", "octocat", "Hello-World", 3094);
        let b = IssueKey::new("github", "octocat", "Hello-World", 3094);
        assert_eq!(a, b);

        assert_ne!(a, IssueKey::new("github", "octocat", "Hello-World", 3095));
        assert_ne!(a, IssueKey::new("github", "octocat", "Spoon-Knife", 3094));
        assert_ne!(a, IssueKey::new("gitlab", "octocat", "Hello-World", 3094));
        // Case-sensitive on every string component.
        assert_ne!(a, IssueKey::new("github", "Octocat", "Hello-World", 3094));
    }

    #[test]
    fn web_url_per_host() {
        let github = IssueKey::new("github", "octocat", "Hello-World", 3094);
        assert_eq!(
            github.web_url().as_deref(),
            Some("https://github.com/octocat/Hello-World/issues/3094")
        );

        let gitlab = IssueKey::new("gitlab", "group/sub", "proj", 17);
        assert_eq!(
            gitlab.web_url().as_deref(),
            Some("https://gitlab.com/group/sub/proj/-/issues/17")
        );

        let other = IssueKey::new("bugzilla", "o", "r", 1);
        assert_eq!(other.web_url(), None);
    }

    #[test]
    fn display_is_compact() {
        let key = IssueKey::new("github", "octocat", "Hello-World", 3094);
        assert_eq!(key.to_string(), "octocat/Hello-World#3094");
    }
}
