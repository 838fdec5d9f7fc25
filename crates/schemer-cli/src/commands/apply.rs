//! Apply command - replay a saved analysis record.

use std::path::PathBuf;

use colored::Colorize;
use schemer::{AnalysisRecord, Engine};

use super::{emit_sql, load_config, print_schema};

pub fn run(
    source: PathBuf,
    analyses: PathBuf,
    database_name: String,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !source.exists() {
        return Err(format!("Directory not found: {}", source.display()).into());
    }

    println!(
        "{} {} {}",
        "Replaying".cyan().bold(),
        analyses.display().to_string().white(),
        format!("against {}", source.display()).dimmed()
    );

    let config = load_config(config)?;
    let record = AnalysisRecord::load(&analyses)?;
    let (mut database, _sources) = schemer::ingest::load_directory(&source, &database_name)?;

    let mut engine = Engine::new(config);
    engine.replay(&record, &mut database)?;

    println!(
        "{} analyses replayed",
        engine.analyses().len().to_string().white().bold()
    );
    if verbose {
        println!();
        print_schema(&database);
        println!();
    }

    emit_sql(&database, output)
}
