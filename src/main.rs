// ABOUTME: CLI entry point for mdb2sqlite
// ABOUTME: Opens the source dump and the destination file, then runs the export

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use mdb2sqlite::{Exporter, JsonDatabase};

#[derive(Parser)]
#[command(name = "mdb2sqlite")]
#[command(about = "Convert a Microsoft Access database dump to an SQLite file", long_about = None)]
struct Cli {
    /// Source database dump (JSON, as produced by mdb-json)
    source: PathBuf,
    /// Destination SQLite file (created if missing, expected empty)
    destination: PathBuf,
}

fn main() -> anyhow::Result<()> {
    // Initialize logging - default to INFO level if RUST_LOG not set
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let source = JsonDatabase::open(&cli.source)?;
    let mut dest = rusqlite::Connection::open(&cli.destination).with_context(|| {
        format!(
            "Failed to open destination database '{}'",
            cli.destination.display()
        )
    })?;

    Exporter::new(source).export(&mut dest)?;

    tracing::info!("Export complete: {}", cli.destination.display());
    Ok(())
}
