//! Analyze command - infer a schema and save the analysis record.

use std::path::PathBuf;

use colored::Colorize;
use schemer::Engine;

use super::{emit_sql, load_config, print_schema};

pub fn run(
    source: PathBuf,
    database_name: String,
    analyses: Option<PathBuf>,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !source.exists() {
        return Err(format!("Directory not found: {}", source.display()).into());
    }

    println!(
        "{} {}",
        "Analyzing".cyan().bold(),
        source.display().to_string().white()
    );

    let config = load_config(config)?;
    let (mut database, sources) = schemer::ingest::load_directory(&source, &database_name)?;
    println!(
        "Loaded {} tables from {} files",
        database.len().to_string().white().bold(),
        sources.len()
    );

    let mut engine = Engine::new(config);
    engine.analyze(&mut database)?;

    println!(
        "{} analyses fired",
        engine.analyses().len().to_string().white().bold()
    );
    if verbose {
        println!();
        print_schema(&database);
        println!();
    }

    let analyses_path = analyses.unwrap_or_else(|| PathBuf::from("analyses.json"));
    engine.record().save(&analyses_path)?;
    println!(
        "{} {}",
        "Analyses saved to".green().bold(),
        analyses_path.display().to_string().white()
    );

    emit_sql(&database, output)
}
