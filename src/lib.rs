//! Schema docgen - render database schema descriptions as documents
//!
//! Provides:
//! - The description model (database, schema, tables, columns)
//! - Document writers for JSON, Markdown, HTML and PDF
//! - A render driver that issues the canonical call sequence
//! - Label translation for human-readable formats
//! - Configuration and description loading

pub mod config;
pub mod loader;
pub mod models;
pub mod render;
pub mod translate;
pub mod writer;

#[cfg(feature = "cli")]
pub mod cli;

// Re-export commonly used types
pub use config::{ConfigError, DocgenConfig};
pub use loader::{LoadError, load_description};
pub use models::{Basic, Column, Description, Table};
pub use render::{render_description, render_to_path};
pub use translate::{Language, Translator};
pub use writer::{
    DocumentWriter, HtmlWriter, JsonWriter, MarkdownWriter, PdfLayout, PdfWriter, WriterError,
    WriterFormat, WriterState,
};
