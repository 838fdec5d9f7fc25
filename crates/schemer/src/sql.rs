//! SQL script generation for the finished model.
//!
//! Renders the typed, constrained database as a PostgreSQL script:
//! table DDL and batched inserts first, primary keys as each table is
//! emitted, and foreign keys at the end once every table exists.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::data::{Constraint, Database, Table, Value};
use crate::error::{Result, SchemerError};

/// Rows per INSERT statement.
const INSERT_BATCH_SIZE: usize = 500;

/// Render the whole database as one SQL script.
pub fn render_script(database: &Database) -> Result<String> {
    let mut script = String::new();
    for (_, table) in database.tables() {
        script.push_str(&create_table_statement(table));
        script.push('\n');
        for statement in insert_statements(table)? {
            script.push_str(&statement);
            script.push('\n');
        }
        if let Some(statement) = primary_key_statement(table) {
            script.push_str(&statement);
            script.push('\n');
        }
        script.push('\n');
    }
    for (_, table) in database.tables() {
        for statement in foreign_key_statements(table) {
            script.push_str(&statement);
            script.push('\n');
        }
    }
    Ok(script)
}

/// Render the script and write it to a file.
pub fn write_script(database: &Database, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let script = render_script(database)?;
    fs::write(path, script).map_err(|e| SchemerError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

fn create_table_statement(table: &Table) -> String {
    let columns: Vec<String> = table
        .columns()
        .map(|(name, column)| {
            format!(
                "{} {} NOT NULL",
                quote_identifier(name),
                column.column_type().sql_name()
            )
        })
        .collect();
    format!(
        "CREATE TABLE IF NOT EXISTS {} ({});",
        quote_identifier(table.name()),
        columns.join(", ")
    )
}

fn primary_key_statement(table: &Table) -> Option<String> {
    table.unique_column_name().map(|column| {
        format!(
            "ALTER TABLE ONLY {} ADD CONSTRAINT {} PRIMARY KEY ({});",
            quote_identifier(table.name()),
            quote_identifier(&format!("{}_pkey", table.name())),
            quote_identifier(column)
        )
    })
}

fn foreign_key_statements(table: &Table) -> Vec<String> {
    table
        .constraints()
        .iter()
        .filter_map(|constraint| match constraint {
            Constraint::Reference {
                referencing_column,
                referenced_table,
                referenced_column,
            } => Some(format!(
                "ALTER TABLE ONLY {} ADD CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({});",
                quote_identifier(table.name()),
                quote_identifier(&format!("{}_{}_fkey", table.name(), referencing_column)),
                quote_identifier(referencing_column),
                quote_identifier(referenced_table),
                quote_identifier(referenced_column)
            )),
            Constraint::Unique { .. } => None,
        })
        .collect()
}

fn insert_statements(table: &Table) -> Result<Vec<String>> {
    let Some(first_column) = table.first_column() else {
        return Ok(Vec::new());
    };
    let ids = first_column.ids();
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let column_list: Vec<String> = table
        .column_names()
        .map(quote_identifier)
        .collect();
    let header = format!(
        "INSERT INTO {} ({}) VALUES",
        quote_identifier(table.name()),
        column_list.join(", ")
    );

    let mut statements = Vec::new();
    for batch in ids.chunks(INSERT_BATCH_SIZE) {
        let mut statement = header.clone();
        for (position, id) in batch.iter().enumerate() {
            let mut row = Vec::with_capacity(table.len());
            for (column_name, column) in table.columns() {
                let value =
                    column
                        .value(*id)
                        .ok_or_else(|| SchemerError::MissingColumn {
                            table: table.name().to_string(),
                            column: column_name.to_string(),
                        })?;
                row.push(literal(&value));
            }
            if position > 0 {
                statement.push(',');
            }
            let _ = write!(statement, " ({})", row.join(", "));
        }
        statement.push(';');
        statements.push(statement);
    }
    Ok(statements)
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn literal(value: &Value) -> String {
    match value {
        Value::Int(v) => v.to_string(),
        Value::Real(v) => v.to_string(),
        Value::Str(v) => format!("'{}'", v.replace('\'', "''")),
    }
}
