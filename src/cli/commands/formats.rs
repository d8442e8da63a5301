//! Formats command implementation

use crate::cli::error::CliError;
use crate::cli::output::format_capabilities;

/// Handle the formats command
pub fn handle_formats() -> Result<(), CliError> {
    print!("{}", format_capabilities());
    Ok(())
}
