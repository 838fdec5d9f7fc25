//! Schemer CLI - schema inference for delimited data.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Analyze {
            source,
            database,
            analyses,
            output,
            config,
        } => commands::analyze::run(source, database, analyses, output, config, cli.verbose),

        Commands::Apply {
            source,
            analyses,
            database,
            output,
            config,
        } => commands::apply::run(source, analyses, database, output, config, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
