//! Ingestion: read delimited files into all-string tables.
//!
//! One table per `*.csv` file, discovered recursively and loaded in
//! sorted path order. No header interpretation happens here; the header
//! row, when present, is detected later by the column-name rule. Tables
//! and columns get generated `table_N` / `column_N` names, and columns
//! whose first-row cell is empty are dropped entirely.

use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::data::{Column, ColumnData, Database, Table};
use crate::error::{Result, SchemerError};

const SOURCE_EXTENSION: &str = "csv";
const TABLE_PREFIX: &str = "table_";
const COLUMN_PREFIX: &str = "column_";

/// Metadata about one ingested source file.
#[derive(Debug, Clone)]
pub struct SourceMetadata {
    pub path: PathBuf,
    /// SHA-256 of the file contents.
    pub hash: String,
    pub size_bytes: u64,
    pub row_count: usize,
    pub column_count: usize,
}

/// Load every CSV file under `root` into a new database.
pub fn load_directory(
    root: impl AsRef<Path>,
    database_name: &str,
) -> Result<(Database, Vec<SourceMetadata>)> {
    let root = root.as_ref();
    let mut files = Vec::new();
    collect_sources(root, &mut files)?;
    files.sort();

    let mut database = Database::new(database_name);
    let mut sources = Vec::new();
    for path in files {
        let table_number = database.len() + 1;
        if let Some((table, metadata)) = read_table(&path, table_number)? {
            debug!(
                file = %path.display(),
                rows = metadata.row_count,
                columns = metadata.column_count,
                "loaded source file"
            );
            database.insert(table)?;
            sources.push(metadata);
        }
    }
    if database.is_empty() {
        return Err(SchemerError::EmptyData(format!(
            "no usable {} files under '{}'",
            SOURCE_EXTENSION,
            root.display()
        )));
    }
    Ok((database, sources))
}

fn collect_sources(path: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    if path.is_dir() {
        let entries = fs::read_dir(path).map_err(|e| SchemerError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        for entry in entries {
            let entry = entry.map_err(|e| SchemerError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;
            collect_sources(&entry.path(), files)?;
        }
    } else if path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(SOURCE_EXTENSION))
    {
        files.push(path.to_path_buf());
    }
    Ok(())
}

/// Read one file into an all-string table. Returns `None` for files with
/// no records.
fn read_table(path: &Path, table_number: usize) -> Result<Option<(Table, SourceMetadata)>> {
    let contents = fs::read(path).map_err(|e| SchemerError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut hasher = Sha256::new();
    hasher.update(&contents);
    let hash = format!("sha256:{:x}", hasher.finalize());

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(contents.as_slice());

    let mut records = reader.records();
    let Some(first) = records.next() else {
        return Ok(None);
    };
    let first = first?;

    // Columns whose first-row cell is empty carry no data worth keeping.
    let kept: Vec<usize> = first
        .iter()
        .enumerate()
        .filter(|(_, cell)| !cell.is_empty())
        .map(|(i, _)| i)
        .collect();
    if kept.is_empty() {
        return Ok(None);
    }

    let mut table = Table::new(format!("{}{}", TABLE_PREFIX, table_number));
    table.add_source(path);
    let mut columns: Vec<Column<String>> = kept
        .iter()
        .enumerate()
        .map(|(i, _)| Column::new(format!("{}{}", COLUMN_PREFIX, i + 1)))
        .collect();

    let mut row_count = 0usize;
    let append = |record: &csv::StringRecord, columns: &mut Vec<Column<String>>| {
        for (column, source_index) in columns.iter_mut().zip(&kept) {
            column.push(record.get(*source_index).unwrap_or_default().to_string());
        }
    };
    append(&first, &mut columns);
    row_count += 1;
    for record in records {
        append(&record?, &mut columns);
        row_count += 1;
    }

    for column in columns {
        table.add_column(ColumnData::Str(column));
    }
    let metadata = SourceMetadata {
        path: path.to_path_buf(),
        hash,
        size_bytes: contents.len() as u64,
        row_count,
        column_count: kept.len(),
    };
    Ok(Some((table, metadata)))
}
