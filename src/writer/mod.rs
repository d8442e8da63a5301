//! Document writers
//!
//! Every output format implements [`DocumentWriter`]. Callers always issue the
//! same call sequence regardless of format:
//!
//! 1. `configure_output` (or `configure_sink`)
//! 2. `begin`
//! 3. any number of presentation calls (`title`, `subtitle`, `sub_subtitle`,
//!    `line_break`, `body`, `columns`, `table`)
//! 4. `finalize`, exactly once
//!
//! Structured writers (JSON) ignore the presentation calls and serialize the
//! whole description in `finalize`. Sequential writers (Markdown, HTML, PDF)
//! build their document from the presentation calls.
//!
//! The presentation methods have no-op default bodies. The defaults still
//! enforce the writer lifecycle, so a call on an unconfigured or finalized
//! writer fails with [`WriterError::InvalidState`] for every format.

pub mod html;
pub mod json;
pub mod markdown;
pub mod pdf;
pub mod sink;

pub use html::HtmlWriter;
pub use json::JsonWriter;
pub use markdown::MarkdownWriter;
pub use pdf::{PageSize, PdfLayout, PdfWriter};
pub use sink::Sink;

use crate::models::{Column, Description, Table};
use crate::translate::Translator;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Error raised by a document writer
#[derive(Debug, thiserror::Error)]
pub enum WriterError {
    /// The sink could not be opened, written, flushed or closed
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// An operation was called out of sequence
    #[error("Invalid writer state: cannot {operation} while {state}")]
    InvalidState {
        operation: &'static str,
        state: WriterState,
    },
    /// A value cannot be represented in the target format
    #[error("Serialization error at {path}: {message}")]
    Serialization { path: String, message: String },
}

/// Lifecycle state of a writer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterState {
    Uninitialized,
    Configured,
    Rendering,
    Finalized,
}

impl fmt::Display for WriterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WriterState::Uninitialized => "uninitialized",
            WriterState::Configured => "configured",
            WriterState::Rendering => "rendering",
            WriterState::Finalized => "finalized",
        };
        f.write_str(name)
    }
}

/// State machine and sink ownership shared by all writers
#[derive(Debug)]
pub struct Lifecycle {
    state: WriterState,
    sink: Option<Sink>,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            state: WriterState::Uninitialized,
            sink: None,
        }
    }

    pub fn state(&self) -> WriterState {
        self.state
    }

    fn invalid(&self, operation: &'static str) -> WriterError {
        WriterError::InvalidState {
            operation,
            state: self.state,
        }
    }

    /// Take ownership of the sink; only valid once, on a fresh writer
    pub fn configure(&mut self, sink: Sink) -> Result<(), WriterError> {
        if self.state != WriterState::Uninitialized {
            return Err(self.invalid("configure output"));
        }
        self.sink = Some(sink);
        self.state = WriterState::Configured;
        Ok(())
    }

    pub fn begin(&mut self) -> Result<(), WriterError> {
        if self.state != WriterState::Configured {
            return Err(self.invalid("begin"));
        }
        self.state = WriterState::Rendering;
        Ok(())
    }

    /// Check that presentation calls are allowed
    pub fn ensure_open(&self, operation: &'static str) -> Result<(), WriterError> {
        match self.state {
            WriterState::Configured | WriterState::Rendering => Ok(()),
            WriterState::Uninitialized | WriterState::Finalized => Err(self.invalid(operation)),
        }
    }

    /// Sink access for writers that stream output as they go
    pub fn sink_mut(&mut self, operation: &'static str) -> Result<&mut Sink, WriterError> {
        self.ensure_open(operation)?;
        let state = self.state;
        self.sink.as_mut().ok_or(WriterError::InvalidState { operation, state })
    }

    /// Move to `Finalized` and hand the sink back for the final write.
    ///
    /// The state changes even if the caller's final write later fails; a
    /// second call is always rejected and never sees the sink.
    pub fn finish(&mut self) -> Result<Sink, WriterError> {
        self.ensure_open("finalize")?;
        self.state = WriterState::Finalized;
        self.sink.take().ok_or(WriterError::InvalidState {
            operation: "finalize",
            state: WriterState::Finalized,
        })
    }
}

/// Polymorphic document writer contract
///
/// Implementors provide [`format`](Self::format), the lifecycle accessors and
/// [`finalize`](Self::finalize); everything else defaults to a state-checked
/// no-op.
pub trait DocumentWriter: Send {
    /// Output format produced by this writer
    fn format(&self) -> WriterFormat;

    fn lifecycle(&self) -> &Lifecycle;

    fn lifecycle_mut(&mut self) -> &mut Lifecycle;

    fn state(&self) -> WriterState {
        self.lifecycle().state()
    }

    /// Label translator the writer was built with; structured writers have none
    fn translator(&self) -> Option<Translator> {
        None
    }

    /// Attach an already opened sink
    fn configure_sink(&mut self, sink: Sink) -> Result<(), WriterError> {
        self.lifecycle_mut().configure(sink)
    }

    /// Create the output file at `path` and attach it as the sink
    ///
    /// # Errors
    ///
    /// [`WriterError::Io`] if the file cannot be created and
    /// [`WriterError::InvalidState`] if the writer is already configured. In the
    /// latter case the file is not touched.
    fn configure_output(&mut self, path: &Path) -> Result<(), WriterError> {
        if self.state() != WriterState::Uninitialized {
            return Err(WriterError::InvalidState {
                operation: "configure output",
                state: self.state(),
            });
        }
        let sink = Sink::create(path)?;
        self.configure_sink(sink)
    }

    /// Setup hook called once before any presentation call
    fn begin(&mut self, _description: &Description) -> Result<(), WriterError> {
        self.lifecycle_mut().begin()
    }

    fn title(&mut self, _text: &str) -> Result<(), WriterError> {
        self.lifecycle().ensure_open("render title")
    }

    fn subtitle(&mut self, _text: &str) -> Result<(), WriterError> {
        self.lifecycle().ensure_open("render subtitle")
    }

    fn sub_subtitle(&mut self, _text: &str) -> Result<(), WriterError> {
        self.lifecycle().ensure_open("render sub-subtitle")
    }

    fn line_break(&mut self) -> Result<(), WriterError> {
        self.lifecycle().ensure_open("render line break")
    }

    fn body(&mut self, _text: &str) -> Result<(), WriterError> {
        self.lifecycle().ensure_open("render body")
    }

    fn columns(&mut self, _columns: &[Column]) -> Result<(), WriterError> {
        self.lifecycle().ensure_open("render columns")
    }

    fn table(&mut self, _table: &Table) -> Result<(), WriterError> {
        self.lifecycle().ensure_open("render table")
    }

    /// Terminal call: write whatever remains, then flush and close the sink
    ///
    /// # Errors
    ///
    /// [`WriterError::InvalidState`] when called before configuration or a
    /// second time. Any other error means the output must not be trusted.
    fn finalize(&mut self, description: &Description) -> Result<(), WriterError>;
}

/// Supported output formats
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum WriterFormat {
    #[default]
    Json,
    Markdown,
    Html,
    Pdf,
}

impl WriterFormat {
    pub const ALL: [WriterFormat; 4] = [
        WriterFormat::Json,
        WriterFormat::Markdown,
        WriterFormat::Html,
        WriterFormat::Pdf,
    ];

    /// File extension conventionally used for this format
    pub fn extension(&self) -> &'static str {
        match self {
            WriterFormat::Json => "json",
            WriterFormat::Markdown => "md",
            WriterFormat::Html => "html",
            WriterFormat::Pdf => "pdf",
        }
    }

    /// Whether the format serializes data rather than a readable document
    pub fn is_structured(&self) -> bool {
        matches!(self, WriterFormat::Json)
    }

    /// Build a fresh writer for this format
    ///
    /// The translator and layout are only used by the formats that need them.
    pub fn create_writer(
        &self,
        translator: Translator,
        layout: &PdfLayout,
    ) -> Box<dyn DocumentWriter> {
        match self {
            WriterFormat::Json => Box::new(JsonWriter::new()),
            WriterFormat::Markdown => Box::new(MarkdownWriter::new(translator)),
            WriterFormat::Html => Box::new(HtmlWriter::new(translator)),
            WriterFormat::Pdf => Box::new(PdfWriter::with_layout(translator, layout.clone())),
        }
    }
}

impl fmt::Display for WriterFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WriterFormat::Json => "json",
            WriterFormat::Markdown => "markdown",
            WriterFormat::Html => "html",
            WriterFormat::Pdf => "pdf",
        };
        f.write_str(name)
    }
}

/// Error returned when a format name is not recognised
#[derive(Debug, Clone, thiserror::Error)]
#[error("Unknown output format: {0}")]
pub struct UnknownFormat(pub String);

impl FromStr for WriterFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(WriterFormat::Json),
            "markdown" | "md" => Ok(WriterFormat::Markdown),
            "html" | "htm" => Ok(WriterFormat::Html),
            "pdf" => Ok(WriterFormat::Pdf),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_lifecycle_transitions() {
        let mut lifecycle = Lifecycle::new();
        assert_eq!(lifecycle.state(), WriterState::Uninitialized);
        assert!(lifecycle.ensure_open("render title").is_err());

        lifecycle
            .configure(Sink::from_writer("memory", io::sink()))
            .unwrap();
        assert_eq!(lifecycle.state(), WriterState::Configured);
        lifecycle.ensure_open("render title").unwrap();

        lifecycle.begin().unwrap();
        assert_eq!(lifecycle.state(), WriterState::Rendering);
        assert!(lifecycle.begin().is_err());

        let sink = lifecycle.finish().unwrap();
        sink.finish().unwrap();
        assert_eq!(lifecycle.state(), WriterState::Finalized);
        assert!(matches!(
            lifecycle.finish(),
            Err(WriterError::InvalidState {
                operation: "finalize",
                state: WriterState::Finalized
            })
        ));
    }

    #[test]
    fn test_configure_twice_is_rejected() {
        let mut lifecycle = Lifecycle::new();
        lifecycle
            .configure(Sink::from_writer("a", io::sink()))
            .unwrap();
        let err = lifecycle
            .configure(Sink::from_writer("b", io::sink()))
            .unwrap_err();
        assert!(matches!(err, WriterError::InvalidState { .. }));
    }

    #[test]
    fn test_format_from_str_and_display() {
        assert_eq!("JSON".parse::<WriterFormat>().unwrap(), WriterFormat::Json);
        assert_eq!("md".parse::<WriterFormat>().unwrap(), WriterFormat::Markdown);
        assert_eq!("htm".parse::<WriterFormat>().unwrap(), WriterFormat::Html);
        assert!("docx".parse::<WriterFormat>().is_err());

        for format in WriterFormat::ALL {
            assert_eq!(format.to_string().parse::<WriterFormat>().unwrap(), format);
        }
    }

    #[test]
    fn test_only_json_is_structured() {
        let structured: Vec<_> = WriterFormat::ALL
            .iter()
            .filter(|f| f.is_structured())
            .collect();
        assert_eq!(structured, vec![&WriterFormat::Json]);
    }

    #[test]
    fn test_create_writer_matches_format() {
        let layout = PdfLayout::default();
        for format in WriterFormat::ALL {
            let writer = format.create_writer(Translator::default(), &layout);
            assert_eq!(writer.format(), format);
            assert_eq!(writer.state(), WriterState::Uninitialized);
        }
    }

    #[test]
    fn test_error_messages() {
        let err = WriterError::InvalidState {
            operation: "finalize",
            state: WriterState::Finalized,
        };
        assert_eq!(
            err.to_string(),
            "Invalid writer state: cannot finalize while finalized"
        );

        let err = WriterError::Serialization {
            path: "tables[0].name".to_string(),
            message: "bad".to_string(),
        };
        assert_eq!(err.to_string(), "Serialization error at tables[0].name: bad");
    }
}
