//! Column model

use serde::{Deserialize, Serialize};

/// A single column of a documented table
///
/// The column name serializes under the key `column`, not `name`. Downstream
/// tooling reads that key, so it must stay as it is.
///
/// # Example
///
/// ```rust
/// use schema_docgen::models::Column;
///
/// let column = Column::new("id", "integer").with_allow("NOT NULL");
/// assert_eq!(column.allow, "NOT NULL");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Column {
    /// Column name
    #[serde(rename = "column")]
    pub name: String,
    /// Type name as reported by the source database
    #[serde(rename = "type")]
    pub data_type: String,
    /// Nullability/constraint marker; empty when nothing is noted
    #[serde(default)]
    pub allow: String,
    /// Column comment
    #[serde(default)]
    pub comment: String,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            allow: String::new(),
            comment: String::new(),
        }
    }

    pub fn with_allow(mut self, allow: impl Into<String>) -> Self {
        self.allow = allow.into();
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }
}
