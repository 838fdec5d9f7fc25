//! Table renames derived from source file names.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::data::Database;
use crate::error::Result;

/// Recorded table renames.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableNameAnalysis {
    /// source table name -> new table name
    pub renames: BTreeMap<String, String>,
}

impl TableNameAnalysis {
    pub fn transform(&self, database: &mut Database) -> Result<()> {
        for (source, new_name) in &self.renames {
            database.rename_table(source, new_name)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Table;

    #[test]
    fn test_transform_renames_table() {
        let mut db = Database::new("test");
        db.insert(Table::new("table_1")).unwrap();

        let analysis = TableNameAnalysis {
            renames: [("table_1".to_string(), "users".to_string())].into(),
        };
        analysis.transform(&mut db).unwrap();

        assert!(db.contains("users"));
        assert!(!db.contains("table_1"));
    }

    #[test]
    fn test_transform_missing_table_is_fatal() {
        let mut db = Database::new("test");
        let analysis = TableNameAnalysis {
            renames: [("ghost".to_string(), "users".to_string())].into(),
        };
        assert!(analysis.transform(&mut db).is_err());
    }

    #[test]
    fn test_transform_name_collision_is_fatal() {
        let mut db = Database::new("test");
        db.insert(Table::new("table_1")).unwrap();
        db.insert(Table::new("users")).unwrap();

        let analysis = TableNameAnalysis {
            renames: [("table_1".to_string(), "users".to_string())].into(),
        };
        assert!(analysis.transform(&mut db).is_err());
    }
}
