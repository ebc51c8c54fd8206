//! Lineage CLI binary.

use anyhow::Result;
use lineage::cli::Cli;
use tracing_subscriber::EnvFilter;

/// Main entry point for the lineage CLI.
///
/// Uses tokio's current_thread runtime; every command is a single load
/// followed by in-memory work.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Logs go to stderr so `--json` output on stdout stays parseable.
    // Example: RUST_LOG=lineage=debug lineage path 3 -a 3-2
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lineage=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Starting lineage CLI");

    let cli = Cli::parse_args();
    cli.execute().await?;

    tracing::debug!("Lineage CLI completed successfully");
    Ok(())
}
