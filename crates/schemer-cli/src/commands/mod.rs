//! CLI command implementations.

pub mod analyze;
pub mod apply;

use std::path::{Path, PathBuf};

use colored::Colorize;
use schemer::{Database, InferenceConfig};

/// Load the configuration file, or fall back to defaults.
pub fn load_config(path: Option<PathBuf>) -> Result<InferenceConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(InferenceConfig::load(path)?),
        None => Ok(InferenceConfig::default()),
    }
}

/// Print the final model: tables, column types, constraints.
pub fn print_schema(database: &Database) {
    for (table_name, table) in database.tables() {
        println!(
            "{} {}",
            "Table".yellow().bold(),
            table_name.white().bold()
        );
        for (column_name, column) in table.columns() {
            println!(
                "  {:24} {}",
                column_name,
                format!("{:?}", column.column_type()).dimmed()
            );
        }
        for constraint in table.constraints() {
            match constraint {
                schemer::Constraint::Unique { column } => {
                    println!("  {} ({})", "unique".green(), column);
                }
                schemer::Constraint::Reference {
                    referencing_column,
                    referenced_table,
                    referenced_column,
                } => {
                    println!(
                        "  {} {} -> {}.{}",
                        "reference".green(),
                        referencing_column,
                        referenced_table,
                        referenced_column
                    );
                }
            }
        }
    }
}

/// Write the SQL script and report where it went.
pub fn emit_sql(
    database: &Database,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let output = output.unwrap_or_else(|| Path::new(database.name()).with_extension("sql"));
    schemer::sql::write_script(database, &output)?;
    println!(
        "{} {}",
        "SQL written to".green().bold(),
        output.display().to_string().white()
    );
    Ok(())
}
