//! Access-token configuration for the host APIs.
//!
//! Tokens come from an optional YAML file with environment variables
//! taking precedence. They are threaded into the host clients at
//! construction time and never reach the crawling core.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "skein.yaml";

/// Environment variable overriding the GitHub token.
pub const GITHUB_TOKEN_VAR: &str = "SKEIN_GITHUB_TOKEN";

/// Environment variable overriding the GitLab token.
pub const GITLAB_TOKEN_VAR: &str = "SKEIN_GITLAB_TOKEN";

/// Per-host API access tokens.
///
/// Both are optional: anonymous access works for public GitHub issues
/// (with a much lower rate limit), and for public GitLab projects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tokens {
    /// GitHub bearer token
    pub github: Option<String>,

    /// GitLab bearer token
    pub gitlab: Option<String>,
}

impl Tokens {
    /// Load tokens: the given file (or `skein.yaml` if present), then
    /// environment overrides on top.
    ///
    /// # Errors
    ///
    /// An explicitly named file that is missing or malformed is an error;
    /// a missing default file just means empty tokens.
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let mut tokens = match path {
            Some(path) => Self::from_file(path).await?,
            None => {
                let default = Path::new(CONFIG_FILE_NAME);
                if default.exists() {
                    Self::from_file(default).await?
                } else {
                    Self::default()
                }
            }
        };

        if let Some(token) = non_empty_env(GITHUB_TOKEN_VAR) {
            tokens.github = Some(token);
        }
        if let Some(token) = non_empty_env(GITLAB_TOKEN_VAR) {
            tokens.gitlab = Some(token);
        }
        Ok(tokens)
    }

    async fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        serde_yaml::from_str(&content).map_err(|e| Error::Config(e.to_string()))
    }
}

fn non_empty_env(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}
