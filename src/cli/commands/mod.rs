//! CLI command implementations

pub mod formats;
pub mod render;
