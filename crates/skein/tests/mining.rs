//! Table-driven tests for the reference miner.
//!
//! These pin the exact extraction semantics: which shapes of text count as
//! a tag, a URL, or a dependency line, and which deliberately do not.

use rstest::rstest;
use skein::mining::{extract_dependency_lines, extract_issue_numbers, extract_issue_urls};
use skein_graph::IssueKey;

fn hello_world(number: u64) -> IssueKey {
    IssueKey::new("github", "octocat", "Hello-World", number)
}

// ========== Issue tags ==========

#[rstest]
#[case::default("#3095", vec![3095])]
#[case::multiple("#3095,#59, #3093 and #3094", vec![3095, 59, 3093, 3094])]
#[case::mixed_with_url(
    "#3095, #5464 https://github.com/octocat/Hello-World/issues/3095",
    vec![3095, 5464]
)]
#[case::only_url("https://github.com/octocat/Hello-World/issues/3095", vec![])]
fn issue_tags(#[case] text: &str, #[case] expected: Vec<u64>) {
    assert_eq!(extract_issue_numbers(text), expected);
}

// ========== Issue URLs ==========

#[rstest]
#[case::default(
    "https://github.com/octocat/Hello-World/issues/3095",
    vec![3095]
)]
#[case::multiple(
    "https://github.com/octocat/Hello-World/issues/3095 https://github.com/octocat/Hello-World/issues/3093",
    vec![3095, 3093]
)]
#[case::markdown_link(
    "[.sesef tju7 ++ #..](https://github.com/octocat/Hello-World/issues/3095)",
    vec![3095]
)]
#[case::not_a_url("#3095", vec![])]
fn issue_urls_same_repo(#[case] text: &str, #[case] expected: Vec<u64>) {
    let expected: Vec<IssueKey> = expected.into_iter().map(hello_world).collect();
    assert_eq!(extract_issue_urls(text), expected);
}

#[test]
fn issue_urls_carry_their_own_repo() {
    assert_eq!(
        extract_issue_urls("https://github.com/octocat/Spoon-Knife/issues/33081"),
        vec![IssueKey::new("github", "octocat", "Spoon-Knife", 33081)]
    );
}

// ========== Dependency lines ==========

#[rstest]
#[case::default("depends on #3095", vec!["#3095"])]
#[case::case_insensitive("Depends on #3095", vec!["#3095"])]
#[case::multiple("depends on #3095 and #3094", vec!["#3095 and #3094"])]
#[case::multiline("depends on #3095 ;\nalso depends on #3094", vec!["#3095 ;", "#3094"])]
#[case::with_preamble(
    "Some issue: #3094. It depends on #3095 and https://github.com/octocat/Hello-World/issues/3095",
    vec!["#3095 and https://github.com/octocat/Hello-World/issues/3095"]
)]
#[case::without("some text without dependencies", vec![])]
fn dependency_lines(#[case] text: &str, #[case] expected: Vec<&str>) {
    assert_eq!(extract_dependency_lines(text), expected);
}

// ========== Mining composes ==========

#[test]
fn dependency_lines_feed_back_into_the_extractors() {
    let text = "This tracks the rollout.\ndepends on #3095 and https://github.com/octocat/Spoon-Knife/issues/33081\ncc #3130";

    let lines = extract_dependency_lines(text);
    assert_eq!(lines.len(), 1);
    assert_eq!(extract_issue_numbers(&lines[0]), vec![3095]);
    assert_eq!(
        extract_issue_urls(&lines[0]),
        vec![IssueKey::new("github", "octocat", "Spoon-Knife", 33081)]
    );

    // The whole text still yields every tag as a plain mention candidate.
    assert_eq!(extract_issue_numbers(text), vec![3095, 3130]);
}
