//! Reference mining: turning issue text into referenced identities.
//!
//! Three extractors cover how people link issues in comment bodies:
//! bare `#123` tags, full GitHub issue URLs, and "depends on ..." lines
//! whose remainder is mined again for tags and URLs. The host clients
//! combine them; see [`crate::hosts::github`].

use regex::Regex;
use skein_graph::{IssueKey, GITHUB_HOST};
use std::sync::OnceLock;

fn issue_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"#(\d+)").expect("issue tag regex must compile"))
}

fn issue_url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"github\.com/(?P<owner>.+?)/(?P<repo>.+?)/issues/(?P<number>\d+)")
            .expect("issue url regex must compile")
    })
}

fn dependency_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)depends on (?P<line>.*)").expect("dependency line regex must compile")
    })
}

/// Issue numbers referenced as `#123` tags.
///
/// URLs never match: the `#` is what makes a tag a tag.
pub fn extract_issue_numbers(text: &str) -> Vec<u64> {
    issue_tag_re()
        .captures_iter(text)
        .filter_map(|caps| caps[1].parse().ok())
        .collect()
}

/// Identities referenced by full GitHub issue URLs anywhere in the text.
pub fn extract_issue_urls(text: &str) -> Vec<IssueKey> {
    issue_url_re()
        .captures_iter(text)
        .filter_map(|caps| {
            let number = caps["number"].parse().ok()?;
            Some(IssueKey::new(
                GITHUB_HOST,
                &caps["owner"],
                &caps["repo"],
                number,
            ))
        })
        .collect()
}

/// The remainder of every line containing a case-insensitive "depends on".
///
/// Callers mine the returned fragments again with the tag and URL
/// extractors; whatever they find there is dependency evidence rather than
/// a plain mention.
pub fn extract_dependency_lines(text: &str) -> Vec<String> {
    dependency_line_re()
        .captures_iter(text)
        .map(|caps| caps["line"].to_string())
        .collect()
}
