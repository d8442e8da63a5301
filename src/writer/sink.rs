//! Output sink owned by a writer
//!
//! A sink is acquired when a writer is configured and released (flushed, then
//! dropped) by the writer's `finalize`. Dropping a sink without finishing it
//! closes any file handle but skips the explicit flush.

use super::WriterError;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Exclusive output destination for one render
pub struct Sink {
    path: PathBuf,
    inner: Box<dyn Write + Send>,
}

impl Sink {
    /// Create (or truncate) the file at `path`
    pub fn create(path: impl AsRef<Path>) -> Result<Self, WriterError> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path).map_err(|source| WriterError::Io {
            path: path.clone(),
            source,
        })?;
        debug!("Opened output sink {}", path.display());
        Ok(Self {
            path,
            inner: Box::new(BufWriter::new(file)),
        })
    }

    /// Wrap an arbitrary destination; `label` is used in error messages
    pub fn from_writer(label: impl Into<PathBuf>, writer: impl Write + Send + 'static) -> Self {
        Self {
            path: label.into(),
            inner: Box::new(writer),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write_all(&mut self, bytes: &[u8]) -> Result<(), WriterError> {
        self.inner.write_all(bytes).map_err(|source| WriterError::Io {
            path: self.path.clone(),
            source,
        })
    }

    pub fn write_str(&mut self, text: &str) -> Result<(), WriterError> {
        self.write_all(text.as_bytes())
    }

    /// Flush and release the sink
    pub fn finish(mut self) -> Result<(), WriterError> {
        self.inner.flush().map_err(|source| WriterError::Io {
            path: self.path.clone(),
            source,
        })?;
        debug!("Closed output sink {}", self.path.display());
        Ok(())
    }
}

impl std::fmt::Debug for Sink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sink").field("path", &self.path).finish()
    }
}
