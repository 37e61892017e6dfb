//! CLI argument parsing and command dispatch.
//!
//! This module provides the command-line interface for skein using clap's
//! derive API.
//!
//! # Commands
//!
//! - `crawl`: Crawl the reference graph around seed issue URLs
//! - `mine`: Extract issue references from text on stdin
//!
//! # Example
//!
//! ```bash
//! skein crawl https://github.com/octocat/Hello-World/issues/3094
//! skein crawl --rounds 3 --format dot https://gitlab.com/acme/widgets/-/issues/7
//! git log -1 --format=%B | skein mine --repo octocat/Hello-World
//! ```

use crate::config::Tokens;
use crate::hosts::{parse_issue_url, HostResolver};
use crate::mining::{extract_dependency_lines, extract_issue_numbers, extract_issue_urls};
use crate::output;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use skein_graph::{crawl, CrawlConfig, IssueGraph, DEFAULT_MAX_ROUNDS};
use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

/// Skein - issue dependency graph crawler
///
/// Starting from one or more seed issues, skein follows cross-references
/// and "depends on" annotations outward across GitHub and GitLab and
/// renders the resulting dependency graph.
#[derive(Parser, Debug)]
#[command(name = "skein")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Crawl the reference graph starting from seed issue URLs
    ///
    /// Repeatedly fetches every unresolved issue the graph references,
    /// classifying discovered relationships as plain relations, directed
    /// dependencies, or detected circular dependencies.
    Crawl(CrawlArgs),

    /// Extract issue references from text on stdin
    ///
    /// Debug surface for the reference miner: prints the dependency lines,
    /// issue tags, and issue URLs found in the input.
    Mine(MineArgs),
}

/// Output format for crawl results
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table plus edge listing
    Table,
    /// Graphviz dot for rendering with `dot -Tsvg`
    Dot,
    /// JSON dump of the graph and crawl outcome
    Json,
}

/// Arguments for the crawl command
#[derive(clap::Args, Debug, Clone)]
pub struct CrawlArgs {
    /// Seed issue URLs (e.g. https://github.com/octocat/Hello-World/issues/3094)
    #[arg(required = true)]
    pub urls: Vec<String>,

    /// Maximum number of fetch rounds before expansion stops
    #[arg(long, default_value_t = DEFAULT_MAX_ROUNDS)]
    pub rounds: usize,

    /// Per-fetch timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Path to a YAML file with API access tokens
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Arguments for the mine command
#[derive(clap::Args, Debug, Clone)]
pub struct MineArgs {
    /// Repository that bare `#123` tags resolve against, as `owner/repo`
    #[arg(long)]
    pub repo: Option<String>,
}

impl Cli {
    /// Parse CLI arguments from the environment.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Execute the parsed command.
    ///
    /// # Errors
    ///
    /// Invalid seed URLs, unreadable configuration, or an internal crawl
    /// protocol violation.
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Crawl(args) => execute_crawl(args).await,
            Commands::Mine(args) => execute_mine(&args),
        }
    }
}

async fn execute_crawl(args: CrawlArgs) -> Result<()> {
    let seeds = args
        .urls
        .iter()
        .map(|url| parse_issue_url(url).with_context(|| format!("bad seed URL {url}")))
        .collect::<Result<Vec<_>>>()?;

    let tokens = Tokens::load(args.config.as_deref())
        .await
        .context("loading access tokens")?;
    let resolver = HostResolver::new(&tokens);

    let mut graph = IssueGraph::seed(seeds);
    let config = CrawlConfig {
        max_rounds: args.rounds,
        fetch_timeout: args.timeout.map(Duration::from_secs),
    };
    let outcome = crawl(&mut graph, &resolver, config).await?;

    match args.format {
        OutputFormat::Table => output::print_table(&graph, &outcome)?,
        OutputFormat::Dot => output::print_dot(&graph)?,
        OutputFormat::Json => output::print_json(&graph, &outcome)?,
    }
    Ok(())
}

fn execute_mine(args: &MineArgs) -> Result<()> {
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .context("reading stdin")?;

    let dependency_lines = extract_dependency_lines(&text);
    if !dependency_lines.is_empty() {
        println!("dependency lines:");
        for line in &dependency_lines {
            println!("  {line}");
        }
    }

    let numbers = extract_issue_numbers(&text);
    if !numbers.is_empty() {
        println!("issue tags:");
        for number in numbers {
            match &args.repo {
                Some(repo) => println!("  {repo}#{number}"),
                None => println!("  #{number}"),
            }
        }
    }

    let urls = extract_issue_urls(&text);
    if !urls.is_empty() {
        println!("issue urls:");
        for key in urls {
            println!("  {key}");
        }
    }
    Ok(())
}
