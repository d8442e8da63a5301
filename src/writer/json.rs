//! JSON writer
//!
//! Structured writer: every presentation call is a no-op and the whole
//! description is serialized in `finalize`. The key names and the four-space
//! indentation are a compatibility contract for downstream tooling.

use super::{DocumentWriter, Lifecycle, WriterError, WriterFormat};
use crate::models::Description;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tracing::info;

const INDENT: &[u8] = b"    ";

/// Writer that dumps the description as indented JSON
#[derive(Debug, Default)]
pub struct JsonWriter {
    lifecycle: Lifecycle,
}

impl JsonWriter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentWriter for JsonWriter {
    fn format(&self) -> WriterFormat {
        WriterFormat::Json
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    fn finalize(&mut self, description: &Description) -> Result<(), WriterError> {
        let mut sink = self.lifecycle.finish()?;
        let json = to_json_string(description)?;
        sink.write_str(&json)?;
        let path = sink.path().to_path_buf();
        sink.finish()?;

        info!(
            "Wrote JSON description of {} table(s) to {}",
            description.tables.len(),
            path.display()
        );
        Ok(())
    }
}

/// Serialize a description exactly as [`JsonWriter`] writes it
///
/// The output uses four-space indentation and has no trailing newline.
pub fn to_json_string(description: &Description) -> Result<String, WriterError> {
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    description
        .serialize(&mut serializer)
        .map_err(|e| WriterError::Serialization {
            path: "description".to_string(),
            message: e.to_string(),
        })?;

    String::from_utf8(buf).map_err(|e| WriterError::Serialization {
        path: "description".to_string(),
        message: format!("JSON output is not valid UTF-8: {}", e),
    })
}
