//! Skein CLI binary.

use anyhow::Result;
use skein::cli::Cli;
use tracing_subscriber::EnvFilter;

/// Main entry point for the skein CLI.
///
/// Uses tokio's current_thread runtime; the fetch fan-out is IO-bound and
/// needs concurrency, not parallelism.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    // Can be controlled via RUST_LOG environment variable
    // Example: RUST_LOG=skein=debug,skein_graph=trace cargo run
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("skein=info,skein_graph=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse_args();
    cli.execute().await
}
