//! Render configuration
//!
//! Settings are usually read from a TOML file:
//!
//! ```toml
//! format = "pdf"
//! output = "docs/"
//! language = "pt-BR"
//!
//! [pdf]
//! page_size = "letter"
//! font_size = 11
//! footer = "Internal use only"
//! ```
//!
//! Every key is optional; missing keys fall back to [`DocgenConfig::default`].

use crate::models::Description;
use crate::translate::{Language, Translator};
use crate::writer::{DocumentWriter, PdfLayout, WriterFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Error loading or applying configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },
    #[error("Failed to serialize config: {0}")]
    Serialize(String),
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),
}

/// Configuration for one documentation run
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DocgenConfig {
    /// Output format
    #[serde(default)]
    pub format: WriterFormat,

    /// Output file, or a directory to place a generated file name in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,

    /// Language of the labels in sequential documents
    #[serde(default)]
    pub language: Language,

    /// Layout used when the format is PDF
    #[serde(default)]
    pub pdf: PdfLayout,
}

impl DocgenConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for custom configuration
    pub fn builder() -> DocgenConfigBuilder {
        DocgenConfigBuilder::default()
    }

    /// Parse configuration from TOML text; `origin` is only used in errors
    pub fn from_toml_str(content: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content, path)?;
        debug!("Loaded config from {}: format={}", path.display(), config.format);
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Override the format by name (e.g. from a command-line flag)
    pub fn with_format_name(mut self, name: &str) -> Result<Self, ConfigError> {
        self.format = name
            .parse()
            .map_err(|_| ConfigError::UnsupportedFormat(name.to_string()))?;
        Ok(self)
    }

    /// Override the language by tag (e.g. from a command-line flag)
    pub fn with_language_tag(mut self, tag: &str) -> Result<Self, ConfigError> {
        self.language = tag
            .parse()
            .map_err(|_| ConfigError::UnsupportedLanguage(tag.to_string()))?;
        Ok(self)
    }

    pub fn translator(&self) -> Translator {
        Translator::new(self.language)
    }

    /// Build a writer for the configured format
    pub fn create_writer(&self) -> Box<dyn DocumentWriter> {
        self.format.create_writer(self.translator(), &self.pdf)
    }

    /// Work out where the document for `description` goes
    ///
    /// - no output configured: `<database>_<schema>.<ext>` in the working directory
    /// - output is an existing directory (or ends with a separator): that file
    ///   name inside it
    /// - otherwise: the output path as given
    pub fn resolve_output_path(&self, description: &Description) -> PathBuf {
        let file_name = format!(
            "{}_{}.{}",
            sanitize_filename(&description.database.name),
            sanitize_filename(&description.schema.name),
            self.format.extension()
        );

        match &self.output {
            None => PathBuf::from(file_name),
            Some(output) if output.is_dir() || ends_with_separator(output) => {
                output.join(file_name)
            }
            Some(output) => output.clone(),
        }
    }
}

/// Builder for DocgenConfig
#[derive(Debug, Default)]
pub struct DocgenConfigBuilder {
    config: DocgenConfig,
}

impl DocgenConfigBuilder {
    pub fn format(mut self, format: WriterFormat) -> Self {
        self.config.format = format;
        self
    }

    pub fn output(mut self, output: impl Into<PathBuf>) -> Self {
        self.config.output = Some(output.into());
        self
    }

    pub fn language(mut self, language: Language) -> Self {
        self.config.language = language;
        self
    }

    pub fn pdf_layout(mut self, layout: PdfLayout) -> Self {
        self.config.pdf = layout;
        self
    }

    /// Build the configuration
    pub fn build(self) -> DocgenConfig {
        self.config
    }
}

fn ends_with_separator(path: &Path) -> bool {
    path.as_os_str()
        .to_string_lossy()
        .ends_with(std::path::MAIN_SEPARATOR)
        || path.as_os_str().to_string_lossy().ends_with('/')
}

/// Sanitize a filename by removing invalid characters
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | ' ' => '_',
            _ => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Basic;
    use crate::writer::PageSize;

    fn description() -> Description {
        Description::new(Basic::new("sales db", ""), Basic::new("public", ""), vec![])
    }

    #[test]
    fn test_defaults() {
        let config = DocgenConfig::default();
        assert_eq!(config.format, WriterFormat::Json);
        assert_eq!(config.language, Language::English);
        assert!(config.output.is_none());
        assert_eq!(config.pdf, PdfLayout::default());
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            format = "markdown"
            output = "out/docs.md"
            language = "pt-BR"

            [pdf]
            page_size = "letter"
            font_size = 12
            footer = "Internal"
        "#;
        let config = DocgenConfig::from_toml_str(toml, Path::new("docgen.toml")).unwrap();

        assert_eq!(config.format, WriterFormat::Markdown);
        assert_eq!(config.output, Some(PathBuf::from("out/docs.md")));
        assert_eq!(config.language, Language::BrazilianPortuguese);
        assert_eq!(config.pdf.page_size, PageSize::Letter);
        assert_eq!(config.pdf.font_size, 12);
        assert_eq!(config.pdf.footer.as_deref(), Some("Internal"));
        assert!(config.pdf.show_page_numbers);
    }

    #[test]
    fn test_unknown_format_is_a_parse_error() {
        let err = DocgenConfig::from_toml_str("format = \"docx\"", Path::new("c.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = DocgenConfig::builder()
            .format(WriterFormat::Pdf)
            .output("docs")
            .language(Language::Spanish)
            .build();
        let toml = config.to_toml_string().unwrap();
        let parsed = DocgenConfig::from_toml_str(&toml, Path::new("c.toml")).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_overrides() {
        let config = DocgenConfig::new()
            .with_format_name("html")
            .unwrap()
            .with_language_tag("es")
            .unwrap();
        assert_eq!(config.format, WriterFormat::Html);
        assert_eq!(config.language, Language::Spanish);

        assert!(matches!(
            DocgenConfig::new().with_format_name("docx"),
            Err(ConfigError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            DocgenConfig::new().with_language_tag("klingon"),
            Err(ConfigError::UnsupportedLanguage(_))
        ));
    }

    #[test]
    fn test_resolve_output_path() {
        let description = description();

        let config = DocgenConfig::builder().format(WriterFormat::Markdown).build();
        assert_eq!(
            config.resolve_output_path(&description),
            PathBuf::from("sales_db_public.md")
        );

        let config = DocgenConfig::builder()
            .format(WriterFormat::Pdf)
            .output("out/")
            .build();
        assert_eq!(
            config.resolve_output_path(&description),
            PathBuf::from("out/").join("sales_db_public.pdf")
        );

        let config = DocgenConfig::builder().output("report.json").build();
        assert_eq!(
            config.resolve_output_path(&description),
            PathBuf::from("report.json")
        );
    }

    #[test]
    fn test_resolve_output_path_existing_directory() {
        let temp = tempfile::TempDir::new().unwrap();
        let config = DocgenConfig::builder()
            .format(WriterFormat::Html)
            .output(temp.path())
            .build();
        assert_eq!(
            config.resolve_output_path(&description()),
            temp.path().join("sales_db_public.html")
        );
    }
}
