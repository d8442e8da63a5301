//! Description loading
//!
//! Reads a [`Description`] produced by an introspection tool from disk. JSON
//! and YAML are accepted; the JSON writer's own output is valid input.

use crate::models::Description;
use std::path::{Path, PathBuf};
use tracing::info;

/// Error reading a description file
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid JSON description in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid YAML description in {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Source encoding of a description file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Json,
    Yaml,
}

impl SourceFormat {
    /// Pick the encoding from the file extension; anything unknown is JSON
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .as_deref()
        {
            Some("yaml" | "yml") => SourceFormat::Yaml,
            _ => SourceFormat::Json,
        }
    }
}

/// Parse a description from text; `origin` is only used in errors
pub fn parse_description(
    content: &str,
    format: SourceFormat,
    origin: &Path,
) -> Result<Description, LoadError> {
    match format {
        SourceFormat::Json => serde_json::from_str(content).map_err(|source| LoadError::Json {
            path: origin.to_path_buf(),
            source,
        }),
        SourceFormat::Yaml => serde_yaml::from_str(content).map_err(|source| LoadError::Yaml {
            path: origin.to_path_buf(),
            source,
        }),
    }
}

/// Load a description from a `.json`, `.yaml` or `.yml` file
pub fn load_description(path: &Path) -> Result<Description, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let description = parse_description(&content, SourceFormat::from_path(path), path)?;
    info!(
        "Loaded description of {}.{} with {} table(s) from {}",
        description.database.name,
        description.schema.name,
        description.tables.len(),
        path.display()
    );
    Ok(description)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_format_from_path() {
        assert_eq!(SourceFormat::from_path(Path::new("a.yaml")), SourceFormat::Yaml);
        assert_eq!(SourceFormat::from_path(Path::new("a.YML")), SourceFormat::Yaml);
        assert_eq!(SourceFormat::from_path(Path::new("a.json")), SourceFormat::Json);
        assert_eq!(SourceFormat::from_path(Path::new("a")), SourceFormat::Json);
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
database:
  name: postgres
  description: default database
schema:
  name: public
tables:
  - name: users
    columns:
      - column: id
        type: integer
        allow: NOT NULL
"#;
        let description =
            parse_description(yaml, SourceFormat::Yaml, Path::new("d.yaml")).unwrap();
        assert_eq!(description.database.name, "postgres");
        assert_eq!(description.schema.description, "");
        assert_eq!(description.tables[0].columns[0].name, "id");
        assert_eq!(description.tables[0].columns[0].allow, "NOT NULL");
    }

    #[test]
    fn test_parse_invalid_json_reports_path() {
        let err = parse_description("{", SourceFormat::Json, Path::new("broken.json")).unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }
}
