//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Schemer: relational schema inference for delimited data
#[derive(Parser)]
#[command(name = "schemer")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Infer a schema from a directory of CSV files
    Analyze {
        /// Directory containing the source files
        #[arg(value_name = "DIR")]
        source: PathBuf,

        /// Name of the resulting database
        #[arg(short, long, default_value = "schemer")]
        database: String,

        /// Where to save the analysis record (default: analyses.json)
        #[arg(short, long)]
        analyses: Option<PathBuf>,

        /// Where to write the SQL script (default: <database>.sql)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Path to a JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Replay a saved analysis record against freshly loaded data
    Apply {
        /// Directory containing the source files
        #[arg(value_name = "DIR")]
        source: PathBuf,

        /// Path to the analysis record to replay
        #[arg(short, long, default_value = "analyses.json")]
        analyses: PathBuf,

        /// Name of the resulting database
        #[arg(short, long, default_value = "schemer")]
        database: String,

        /// Where to write the SQL script (default: <database>.sql)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Path to a JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}
