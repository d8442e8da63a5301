//! CLI module for the schema-docgen binary

pub mod commands;
pub mod error;
pub mod output;

pub use error::CliError;
