//! Render command implementation

use crate::cli::error::CliError;
use crate::cli::output::format_render_summary;
use crate::config::DocgenConfig;
use crate::loader::{LoadError, SourceFormat, load_description, parse_description};
use crate::models::Description;
use crate::render::render_to_path;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Arguments for the `render` command
pub struct RenderArgs {
    /// Description file (JSON or YAML), or `-` for JSON on stdin
    pub input: String,
    /// Optional TOML config file
    pub config: Option<PathBuf>,
    /// Output format override
    pub format: Option<String>,
    /// Output path override (file or directory)
    pub output: Option<PathBuf>,
    /// Label language override
    pub language: Option<String>,
}

/// Load the description from a file or stdin
fn load_input(input: &str) -> Result<Description, CliError> {
    if input == "-" {
        read_description(std::io::stdin().lock(), Path::new(STDIN_LABEL))
    } else {
        Ok(load_description(Path::new(input))?)
    }
}

const STDIN_LABEL: &str = "<stdin>";

/// Read a JSON description from an open stream
fn read_description(mut reader: impl Read, origin: &Path) -> Result<Description, CliError> {
    let mut content = String::new();
    reader
        .read_to_string(&mut content)
        .map_err(|source| LoadError::Read {
            path: origin.to_path_buf(),
            source,
        })?;
    Ok(parse_description(&content, SourceFormat::Json, origin)?)
}

/// Merge the config file with command-line overrides
pub fn build_config(args: &RenderArgs) -> Result<DocgenConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => DocgenConfig::load(path)?,
        None => DocgenConfig::default(),
    };

    // Bad flag values are usage errors, unlike a bad value in the config file
    if let Some(format) = &args.format {
        config = config
            .with_format_name(format)
            .map_err(|e| CliError::InvalidArgument(e.to_string()))?;
    }
    if let Some(language) = &args.language {
        config = config
            .with_language_tag(language)
            .map_err(|e| CliError::InvalidArgument(e.to_string()))?;
    }
    if let Some(output) = &args.output {
        config.output = Some(output.clone());
    }

    debug!(
        "Effective config: format={}, language={}",
        config.format, config.language
    );
    Ok(config)
}

/// Handle the render command
pub fn handle_render(args: &RenderArgs) -> Result<(), CliError> {
    let config = build_config(args)?;
    let description = load_input(&args.input)?;
    let path = config.resolve_output_path(&description);

    let mut writer = config.create_writer();
    render_to_path(writer.as_mut(), &description, &path)?;

    println!(
        "{}",
        format_render_summary(config.format, description.tables.len(), &path)
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translate::Language;
    use crate::writer::WriterFormat;

    fn args() -> RenderArgs {
        RenderArgs {
            input: "description.json".to_string(),
            config: None,
            format: None,
            output: None,
            language: None,
        }
    }

    #[test]
    fn test_build_config_applies_overrides() {
        let args = RenderArgs {
            format: Some("md".to_string()),
            language: Some("pt-BR".to_string()),
            output: Some(PathBuf::from("docs/")),
            ..args()
        };
        let config = build_config(&args).unwrap();

        assert_eq!(config.format, WriterFormat::Markdown);
        assert_eq!(config.language, Language::BrazilianPortuguese);
        assert_eq!(config.output, Some(PathBuf::from("docs/")));
    }

    #[test]
    fn test_build_config_rejects_unknown_format() {
        let args = RenderArgs {
            format: Some("docx".to_string()),
            ..args()
        };
        let err = build_config(&args).unwrap_err();
        assert!(matches!(err, CliError::InvalidArgument(_)));
        assert!(err.to_string().contains("docx"));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_missing_input_file() {
        let err = load_input("/nonexistent/description.json").unwrap_err();
        assert!(matches!(err, CliError::Load(LoadError::Read { .. })));
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("/nonexistent/description.json"));
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    #[test]
    fn test_stream_read_failure_is_a_load_error() {
        let err = read_description(FailingReader, Path::new(STDIN_LABEL)).unwrap_err();
        assert!(matches!(err, CliError::Load(LoadError::Read { .. })));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_stream_description() {
        let json = br#"{"database": {"name": "db"}, "schema": {"name": "public"}}"#;
        let description = read_description(&json[..], Path::new(STDIN_LABEL)).unwrap();
        assert_eq!(description.database.name, "db");
        assert!(description.tables.is_empty());
    }
}
