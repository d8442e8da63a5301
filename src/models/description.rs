//! Root description model

use super::table::Table;
use serde::{Deserialize, Serialize};

/// A named, described entity (the database or the schema)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Basic {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl Basic {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Documentable structure of one database schema
///
/// The field order here is the key order of the structured output and the
/// `tables` order is kept by every writer.
///
/// # Example
///
/// ```rust
/// use schema_docgen::models::{Basic, Column, Description, Table};
///
/// let description = Description::new(
///     Basic::new("postgres", "default database"),
///     Basic::new("public", "default schema"),
///     vec![Table::new("users", "").with_columns(vec![Column::new("id", "integer")])],
/// );
/// assert_eq!(description.column_count(), 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Description {
    pub database: Basic,
    pub schema: Basic,
    #[serde(default)]
    pub tables: Vec<Table>,
}

impl Description {
    pub fn new(database: Basic, schema: Basic, tables: Vec<Table>) -> Self {
        Self {
            database,
            schema,
            tables,
        }
    }

    /// Total number of columns across all tables
    pub fn column_count(&self) -> usize {
        self.tables.iter().map(|t| t.columns.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Column;

    #[test]
    fn test_missing_tables_deserialize_to_empty() {
        let json = r#"{
            "database": {"name": "postgres"},
            "schema": {"name": "public", "description": "default"}
        }"#;
        let description: Description = serde_json::from_str(json).unwrap();

        assert_eq!(description.database.description, "");
        assert_eq!(description.schema.description, "default");
        assert!(description.tables.is_empty());
    }

    #[test]
    fn test_column_count() {
        let description = Description::new(
            Basic::new("db", ""),
            Basic::new("public", ""),
            vec![
                Table::new("a", "").with_columns(vec![Column::new("x", "int")]),
                Table::new("b", "").with_columns(vec![
                    Column::new("y", "text"),
                    Column::new("z", "text"),
                ]),
                Table::new("c", ""),
            ],
        );
        assert_eq!(description.column_count(), 3);
    }
}
