//! Render driver
//!
//! Issues the canonical call sequence against any [`DocumentWriter`] and makes
//! sure `finalize` runs on every exit path, so the sink is always released.

use crate::models::Description;
use crate::translate::{Label, Translator};
use crate::writer::{DocumentWriter, WriterError};
use std::path::Path;
use tracing::{debug, info, warn};

/// Drive a configured writer through a complete render of `description`
///
/// Labels come from the writer's own translator (English for writers without
/// one), so headings and column headers always share a language.
///
/// The sequence is: `begin`, database title and description, schema subtitle
/// and description, a line break, the tables subtitle, then one `table` call
/// and one line break per table in description order, and finally
/// `finalize`.
///
/// # Errors
///
/// Returns the first error raised. If that error came before `finalize`, the
/// writer is still finalized; a failure of that cleanup is logged and the
/// original error is returned.
pub fn render_description(
    writer: &mut dyn DocumentWriter,
    description: &Description,
) -> Result<(), WriterError> {
    let translator = writer.translator().unwrap_or_default();
    info!(
        "Rendering {}.{} ({} table(s)) as {}",
        description.database.name,
        description.schema.name,
        description.tables.len(),
        writer.format()
    );

    if let Err(err) = render_body(writer, description, &translator) {
        warn!("Render failed, finalizing writer: {}", err);
        if let Err(cleanup) = writer.finalize(description) {
            warn!("Finalize after failed render also failed: {}", cleanup);
        }
        return Err(err);
    }

    writer.finalize(description)?;
    info!("Finished rendering {}", description.database.name);
    Ok(())
}

/// Open `path` as the writer's sink and render `description` into it
///
/// # Errors
///
/// See [`render_description`]; additionally fails with
/// [`WriterError::Io`] when the output file cannot be created.
pub fn render_to_path(
    writer: &mut dyn DocumentWriter,
    description: &Description,
    path: &Path,
) -> Result<(), WriterError> {
    writer.configure_output(path)?;
    render_description(writer, description)
}

fn render_body(
    writer: &mut dyn DocumentWriter,
    description: &Description,
    translator: &Translator,
) -> Result<(), WriterError> {
    writer.begin(description)?;

    writer.title(&translator.labelled(Label::Database, &description.database.name))?;
    if !description.database.description.is_empty() {
        writer.body(&description.database.description)?;
    }

    writer.subtitle(&translator.labelled(Label::Schema, &description.schema.name))?;
    if !description.schema.description.is_empty() {
        writer.body(&description.schema.description)?;
    }
    writer.line_break()?;

    writer.subtitle(translator.label(Label::Tables))?;
    for table in &description.tables {
        debug!(
            "Rendering table {} ({} column(s))",
            table.name,
            table.columns.len()
        );
        writer.table(table)?;
        writer.line_break()?;
    }

    Ok(())
}
