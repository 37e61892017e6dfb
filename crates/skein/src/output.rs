//! Output formatting for crawl results.
//!
//! Three surfaces: a human-readable table with an edge listing and unblock
//! order, Graphviz dot for actual visualization, and JSON for programmatic
//! use. Broken links render differently from merely unfetched issues so a
//! half-finished crawl is readable at a glance.

use colored::Colorize;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;
use skein_graph::{CrawlOutcome, EdgeKind, IssueGraph, Node, NodeState};
use std::io::{self, Write};

// ============================================================================
// Terminal Width Detection
// ============================================================================

const DEFAULT_TERMINAL_WIDTH: u16 = 80;

/// Get the current terminal width, falling back to default if detection fails.
fn get_terminal_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(DEFAULT_TERMINAL_WIDTH as usize)
}

// ============================================================================
// Color Helpers
// ============================================================================

/// Status word for a node: broken links must read differently from issues
/// that simply have not been fetched yet.
fn state_text(state: &NodeState) -> &'static str {
    match state {
        NodeState::Unfetched => "unfetched",
        NodeState::Fetched { data } if data.open => "open",
        NodeState::Fetched { .. } => "closed",
        NodeState::FetchFailed { .. } => "broken",
    }
}

/// Apply the status color to already-padded text, so ANSI escapes do not
/// throw off column alignment.
fn colorize_state(state: &NodeState, text: &str) -> String {
    match state {
        NodeState::Unfetched => text.dimmed().to_string(),
        NodeState::Fetched { data } if data.open => text.yellow().to_string(),
        NodeState::Fetched { .. } => text.green().to_string(),
        NodeState::FetchFailed { .. } => text.red().bold().to_string(),
    }
}

/// Colorize a node label (cyan, like an issue id).
fn colorize_label(node: &Node) -> String {
    node.key().to_string().cyan().to_string()
}

fn edge_verb(kind: EdgeKind) -> String {
    match kind {
        EdgeKind::RelatesTo => "relates to".dimmed().to_string(),
        EdgeKind::DependsOn => "blocks".yellow().to_string(),
        EdgeKind::CircularDependency => "circular with".red().bold().to_string(),
    }
}

// ============================================================================
// Public Entry Points
// ============================================================================

/// Print the crawl result as a table plus edge listing and unblock order.
pub fn print_table(graph: &IssueGraph, outcome: &CrawlOutcome) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    print_table_to(&mut handle, graph, outcome)
}

/// Print the crawled graph in Graphviz dot format.
pub fn print_dot(graph: &IssueGraph) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    print_dot_to(&mut handle, graph)
}

/// Print the crawl result as pretty JSON.
pub fn print_json(graph: &IssueGraph, outcome: &CrawlOutcome) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    #[derive(Serialize)]
    struct Report<'a> {
        graph: &'a IssueGraph,
        outcome: &'a CrawlOutcome,
    }

    let json = serde_json::to_string_pretty(&Report { graph, outcome })
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(handle, "{}", json)
}

// ============================================================================
// Text Formatting
// ============================================================================

fn print_table_to<W: Write>(w: &mut W, graph: &IssueGraph, outcome: &CrawlOutcome) -> io::Result<()> {
    writeln!(
        w,
        "{} issue(s), {} edge(s), {} round(s)",
        graph.nodes().len(),
        graph.edges().len(),
        outcome.rounds
    )?;
    if !outcome.converged {
        writeln!(
            w,
            "{}",
            "round budget exhausted; some references may still dangle".yellow()
        )?;
    }
    writeln!(w)?;

    let label_width = graph
        .nodes()
        .iter()
        .map(|node| node.key().to_string().len())
        .max()
        .unwrap_or(0);
    let title_width = get_terminal_width().saturating_sub(label_width + 13).max(20);

    for node in graph.nodes() {
        let title = match node.state() {
            NodeState::Fetched { data } => {
                textwrap::fill(&data.title, title_width).replace('\n', " ")
            }
            NodeState::FetchFailed { reason } => reason.clone(),
            NodeState::Unfetched => String::new(),
        };
        let label = format!("{:label_width$}", node.key().to_string());
        let status = format!("{:9}", state_text(node.state()));
        writeln!(
            w,
            "{}  {}  {}",
            label.cyan(),
            colorize_state(node.state(), &status),
            title
        )?;
    }

    if !graph.edges().is_empty() {
        writeln!(w)?;
        for edge in graph.edges() {
            let from = &graph.nodes()[edge.from()];
            let to = &graph.nodes()[edge.to()];
            writeln!(
                w,
                "{} {} {}",
                colorize_label(from),
                edge_verb(edge.kind()),
                colorize_label(to)
            )?;
        }
    }

    print_unblock_order(w, graph)?;
    Ok(())
}

/// Dependency-respecting work order, or the cycle that prevents one.
///
/// Only `DependsOn` edges participate: detected circulars are reported
/// separately and relations carry no ordering at all. The core graph stays
/// arena-based; this projection into petgraph is purely presentational.
fn print_unblock_order<W: Write>(w: &mut W, graph: &IssueGraph) -> io::Result<()> {
    let mut ordering: DiGraph<usize, ()> = DiGraph::new();
    let indices: Vec<NodeIndex> = (0..graph.nodes().len())
        .map(|position| ordering.add_node(position))
        .collect();
    let mut interesting = vec![false; graph.nodes().len()];

    for edge in graph.edges() {
        if edge.kind() == EdgeKind::DependsOn {
            ordering.add_edge(indices[edge.from()], indices[edge.to()], ());
            interesting[edge.from()] = true;
            interesting[edge.to()] = true;
        }
    }

    if !interesting.iter().any(|&flag| flag) {
        return Ok(());
    }

    writeln!(w)?;
    match toposort(&ordering, None) {
        Ok(sorted) => {
            let order: Vec<String> = sorted
                .into_iter()
                .map(|ix| ordering[ix])
                .filter(|&position| interesting[position])
                .map(|position| graph.nodes()[position].key().to_string())
                .collect();
            writeln!(w, "{} {}", "unblock order:".dimmed(), order.join(" -> "))?;
        }
        Err(cycle) => {
            let culprit = graph.nodes()[ordering[cycle.node_id()]].key();
            writeln!(
                w,
                "{} dependency cycle through {}",
                "no unblock order:".red(),
                culprit
            )?;
        }
    }
    Ok(())
}

// ============================================================================
// Dot Formatting
// ============================================================================

fn print_dot_to<W: Write>(w: &mut W, graph: &IssueGraph) -> io::Result<()> {
    writeln!(w, "digraph skein {{")?;
    writeln!(w, "  rankdir=BT;")?;
    writeln!(w, "  node [shape=box, fontname=\"monospace\"];")?;

    for (position, node) in graph.nodes().iter().enumerate() {
        let label = dot_escape(&node.key().to_string());
        let attrs = match node.state() {
            NodeState::Unfetched => ", style=dashed",
            NodeState::Fetched { .. } => "",
            NodeState::FetchFailed { .. } => ", color=red",
        };
        writeln!(w, "  n{position} [label=\"{label}\"{attrs}];")?;
    }

    for edge in graph.edges() {
        let attrs = match edge.kind() {
            EdgeKind::RelatesTo => " [dir=none, style=dashed]",
            EdgeKind::DependsOn => "",
            EdgeKind::CircularDependency => " [dir=both, color=red]",
        };
        writeln!(w, "  n{} -> n{}{attrs};", edge.from(), edge.to())?;
    }

    writeln!(w, "}}")
}

fn dot_escape(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use skein_graph::{
        crawl, CrawlConfig, FetchOutcome, IssueData, IssueKey, Reference, Resolver,
    };

    struct Fixed;

    #[async_trait]
    impl Resolver for Fixed {
        async fn resolve(&self, key: &IssueKey) -> FetchOutcome {
            match key.number {
                1 => FetchOutcome::Fetched {
                    data: IssueData {
                        title: "root".to_string(),
                        open: true,
                        updated_at: None,
                    },
                    references: vec![
                        Reference::dependency(IssueKey::new("github", "o", "r", 2)),
                        Reference::mention(IssueKey::new("github", "o", "r", 3)),
                    ],
                },
                2 => FetchOutcome::Fetched {
                    data: IssueData {
                        title: "blocker".to_string(),
                        open: false,
                        updated_at: None,
                    },
                    references: Vec::new(),
                },
                _ => FetchOutcome::failed("no such issue"),
            }
        }
    }

    async fn crawled() -> (IssueGraph, CrawlOutcome) {
        let mut graph = IssueGraph::seed([IssueKey::new("github", "o", "r", 1)]);
        let outcome = crawl(&mut graph, &Fixed, CrawlConfig::default())
            .await
            .unwrap();
        (graph, outcome)
    }

    #[tokio::test]
    async fn table_lists_every_node_and_edge() {
        colored::control::set_override(false);
        let (graph, outcome) = crawled().await;

        let mut buffer = Vec::new();
        print_table_to(&mut buffer, &graph, &outcome).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert!(text.contains("3 issue(s), 2 edge(s)"));
        assert!(text.contains("o/r#1"));
        assert!(text.contains("broken"));
        assert!(text.contains("blocks"));
        assert!(text.contains("unblock order:"));
        // The blocker sorts before the issue it blocks.
        let blocker = text.find("unblock order: o/r#2").is_some();
        assert!(blocker, "unexpected order in: {text}");
    }

    #[tokio::test]
    async fn dot_output_is_structurally_sound() {
        colored::control::set_override(false);
        let (graph, _) = crawled().await;

        let mut buffer = Vec::new();
        print_dot_to(&mut buffer, &graph).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert!(text.starts_with("digraph skein {"));
        assert!(text.trim_end().ends_with('}'));
        assert!(text.contains("n0 [label=\"o/r#1\"]"));
        // Dependency edge points blocker -> dependent.
        assert!(text.contains("n1 -> n0;"));
        assert!(text.contains("[dir=none, style=dashed]"));
        assert!(text.contains("color=red"));
    }

    #[test]
    fn dot_labels_escape_quotes() {
        assert_eq!(dot_escape(r#"a"b"#), r#"a\"b"#);
    }
}
