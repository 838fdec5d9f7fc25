//! Materializing many-to-many relationships found inside multi-valued
//! text columns as junction tables.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::InferenceConfig;
use crate::data::{Column, ColumnData, Constraint, Database, Table};
use crate::error::{Result, SchemerError};
use crate::validate::{MultiValueReferenceValidator, TypeValidator};

use super::column_type::parse_string_column;

/// The recorded shape of one junction table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiValueTarget {
    /// Separator the multi-valued cells split on.
    pub separator: String,
    pub referenced_table: String,
    pub referenced_column: String,
    /// Name of the junction table to create.
    pub junction_table: String,
    /// Name of the junction table's generated id column.
    pub id_column: String,
    /// Junction column carrying the source table's unique-key value.
    pub key_column: String,
    /// Junction column carrying the exploded referenced values.
    pub value_column: String,
}

/// Recorded multi-value references: source table -> multi-valued column
/// -> junction description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultiValueReferenceAnalysis {
    pub multi_refs: BTreeMap<String, BTreeMap<String, MultiValueTarget>>,
}

impl MultiValueReferenceAnalysis {
    /// Build each junction table, attach its constraints, and remove the
    /// multi-valued source column.
    pub fn transform(&self, database: &mut Database, config: &InferenceConfig) -> Result<()> {
        for (table_name, columns) in &self.multi_refs {
            for (column_name, target) in columns {
                let junction = build_junction(database, config, table_name, column_name, target)?;
                let table =
                    database
                        .get_mut(table_name)
                        .ok_or_else(|| SchemerError::MissingTable {
                            table: table_name.clone(),
                        })?;
                table.remove_column(column_name);
                database.insert(junction)?;
            }
        }
        Ok(())
    }
}

fn build_junction(
    database: &Database,
    config: &InferenceConfig,
    table_name: &str,
    column_name: &str,
    target: &MultiValueTarget,
) -> Result<Table> {
    let table = database
        .get(table_name)
        .ok_or_else(|| SchemerError::MissingTable {
            table: table_name.to_string(),
        })?;
    let unique_name = table
        .unique_column_name()
        .ok_or_else(|| SchemerError::MissingUnique {
            table: table_name.to_string(),
        })?
        .to_string();
    let unique_column = table
        .column(&unique_name)
        .ok_or_else(|| SchemerError::MissingColumn {
            table: table_name.to_string(),
            column: unique_name.clone(),
        })?;
    let source = table
        .column(column_name)
        .ok_or_else(|| SchemerError::MissingColumn {
            table: table_name.to_string(),
            column: column_name.to_string(),
        })?
        .as_str()
        .ok_or_else(|| SchemerError::ColumnTypeMismatch {
            table: table_name.to_string(),
            column: column_name.to_string(),
        })?;
    let referenced_table =
        database
            .get(&target.referenced_table)
            .ok_or_else(|| SchemerError::MissingTable {
                table: target.referenced_table.clone(),
            })?;
    let referenced =
        referenced_table
            .column(&target.referenced_column)
            .ok_or_else(|| SchemerError::MissingColumn {
                table: target.referenced_table.clone(),
                column: target.referenced_column.clone(),
            })?;
    let referenced_type = referenced.column_type();

    // One junction row per split piece, keeping the source row's key.
    let mut id_column = Column::<i64>::new(&target.id_column);
    let mut key_column = unique_column.empty_like(&target.key_column);
    let mut value_column = Column::<String>::new(&target.value_column);
    for (row_id, cell) in source.iter() {
        let pieces = split_parts(cell, &target.separator);
        if pieces.is_empty() {
            continue;
        }
        let key = unique_column
            .value(row_id)
            .ok_or_else(|| SchemerError::MissingColumn {
                table: table_name.to_string(),
                column: unique_name.clone(),
            })?;
        for piece in pieces {
            id_column.push(id_column.len() as i64);
            key_column
                .push_value(key.clone())
                .ok_or_else(|| SchemerError::ColumnTypeMismatch {
                    table: target.junction_table.clone(),
                    column: target.key_column.clone(),
                })?;
            value_column.push(piece);
        }
    }

    // Coerce the exploded values to the referenced column's type, then
    // drop pieces it does not contain.
    let type_validator = TypeValidator::new(&value_column, referenced_type.clone());

    let mut junction = Table::new(&target.junction_table);
    junction.add_column(ColumnData::Int(id_column));
    junction.add_column(key_column);
    junction.add_column(ColumnData::Str(value_column));
    config.type_policy.apply(&mut junction, &type_validator);

    let missing_value_column = || SchemerError::MissingColumn {
        table: target.junction_table.clone(),
        column: target.value_column.clone(),
    };
    let parsed = {
        let value = junction
            .column(&target.value_column)
            .and_then(|c| c.as_str())
            .ok_or_else(missing_value_column)?;
        parse_string_column(value, &referenced_type, &target.junction_table)?
    };
    if let Some(parsed) = parsed {
        junction.replace_column(parsed);
    }

    let validator = MultiValueReferenceValidator::new(
        junction
            .column(&target.value_column)
            .ok_or_else(missing_value_column)?,
        referenced,
    );
    config
        .multi_value_reference_policy
        .apply(&mut junction, &validator);

    junction.add_constraint(Constraint::Unique {
        column: target.id_column.clone(),
    });
    junction.add_constraint(Constraint::Reference {
        referencing_column: target.key_column.clone(),
        referenced_table: table_name.to_string(),
        referenced_column: unique_name,
    });
    junction.add_constraint(Constraint::Reference {
        referencing_column: target.value_column.clone(),
        referenced_table: target.referenced_table.clone(),
        referenced_column: target.referenced_column.clone(),
    });
    Ok(junction)
}

/// Split a cell on a literal separator.
///
/// Trailing empty pieces are discarded; a cell without the separator is
/// a single piece, so an empty cell yields one empty piece while a cell
/// of nothing but separators yields none.
pub(crate) fn split_parts(cell: &str, separator: &str) -> Vec<String> {
    if !cell.contains(separator) {
        return vec![cell.to_string()];
    }
    let mut parts: Vec<String> = cell.split(separator).map(String::from).collect();
    while parts.last().is_some_and(|p| p.is_empty()) {
        parts.pop();
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ColumnType;

    #[test]
    fn test_split_parts() {
        assert_eq!(split_parts("a|b|c", "|"), vec!["a", "b", "c"]);
        assert_eq!(split_parts("plain", "|"), vec!["plain"]);
        assert_eq!(split_parts("", "|"), vec![""]);
        assert_eq!(split_parts("a||", "|"), vec!["a"]);
        assert!(split_parts("|", "|").is_empty());
        assert_eq!(split_parts("|a", "|"), vec!["", "a"]);
    }

    fn database() -> Database {
        // films(id, actors) where actors is "1|2"-style references into
        // people(id).
        let mut films = Table::new("films");
        let mut id = Column::<i64>::new("id");
        id.push(10);
        id.push(11);
        let mut actors = Column::<String>::new("actors");
        actors.push("1|2".to_string());
        actors.push("2|3".to_string());
        films.add_column(ColumnData::Int(id));
        films.add_column(ColumnData::Str(actors));
        films.add_constraint(Constraint::Unique {
            column: "id".to_string(),
        });

        let mut people = Table::new("people");
        let mut pid = Column::<i64>::new("id");
        pid.push(1);
        pid.push(2);
        pid.push(3);
        people.add_column(ColumnData::Int(pid));
        people.add_constraint(Constraint::Unique {
            column: "id".to_string(),
        });

        let mut db = Database::new("test");
        db.insert(films).unwrap();
        db.insert(people).unwrap();
        db
    }

    fn analysis() -> MultiValueReferenceAnalysis {
        MultiValueReferenceAnalysis {
            multi_refs: [(
                "films".to_string(),
                [(
                    "actors".to_string(),
                    MultiValueTarget {
                        separator: "|".to_string(),
                        referenced_table: "people".to_string(),
                        referenced_column: "id".to_string(),
                        junction_table: "films_to_people".to_string(),
                        id_column: "id".to_string(),
                        key_column: "films_id".to_string(),
                        value_column: "people_id".to_string(),
                    },
                )]
                .into(),
            )]
            .into(),
        }
    }

    #[test]
    fn test_transform_builds_junction_table() {
        let mut db = database();
        analysis()
            .transform(&mut db, &InferenceConfig::default())
            .unwrap();

        // The multi-valued column is gone from the source table.
        assert!(!db.get("films").unwrap().contains_column("actors"));

        let junction = db.get("films_to_people").unwrap();
        let names: Vec<&str> = junction.column_names().collect();
        assert_eq!(names, vec!["id", "films_id", "people_id"]);
        assert_eq!(junction.column("id").unwrap().len(), 4);
        assert_eq!(
            junction.column("people_id").unwrap().column_type(),
            ColumnType::Integer
        );

        assert_eq!(junction.unique_column_name(), Some("id"));
        let references: Vec<&Constraint> = junction
            .constraints()
            .iter()
            .filter(|c| matches!(c, Constraint::Reference { .. }))
            .collect();
        assert_eq!(references.len(), 2);
    }

    #[test]
    fn test_transform_keeps_row_association() {
        let mut db = database();
        analysis()
            .transform(&mut db, &InferenceConfig::default())
            .unwrap();

        let junction = db.get("films_to_people").unwrap();
        let keys: Vec<_> = junction.column("films_id").unwrap().entries();
        let values: Vec<_> = junction.column("people_id").unwrap().entries();
        use crate::data::Value;
        assert_eq!(
            keys.iter().map(|(_, v)| v.clone()).collect::<Vec<_>>(),
            vec![
                Value::Int(10),
                Value::Int(10),
                Value::Int(11),
                Value::Int(11)
            ]
        );
        assert_eq!(
            values.iter().map(|(_, v)| v.clone()).collect::<Vec<_>>(),
            vec![Value::Int(1), Value::Int(2), Value::Int(2), Value::Int(3)]
        );
    }

    #[test]
    fn test_transform_without_unique_column_is_fatal() {
        let mut db = database();
        // Strip the unique constraint from films.
        let films = db.remove("films").unwrap();
        let mut fresh = Table::new("films");
        for (_, column) in films.columns() {
            fresh.add_column(column.clone());
        }
        db.insert(fresh).unwrap();

        assert!(analysis()
            .transform(&mut db, &InferenceConfig::default())
            .is_err());
    }
}
