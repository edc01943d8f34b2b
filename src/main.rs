//! ninjadb CLI entry point

use clap::Parser;
use ninjadb::cli::{Cli, Commands};
use ninjadb::core::error::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Skipped targets and unparsable executor output are always reported
const DEFAULT_LOG_FILTER: &str = "warn";

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_env("NINJADB_LOG")
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Extract(args) => ninjadb::cli::extract::run(args),
        Commands::Classify(args) => ninjadb::cli::classify::run(args),
        Commands::Resolve(args) => ninjadb::cli::resolve::run(args),
    }
}
