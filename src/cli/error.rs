//! CLI error type

use crate::config::ConfigError;
use crate::loader::LoadError;
use crate::writer::WriterError;

/// Error surfaced by a CLI command
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("Render failed: {0}")]
    Render(#[from] WriterError),
}

impl CliError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::InvalidArgument(_) => 2,
            _ => 1,
        }
    }
}
