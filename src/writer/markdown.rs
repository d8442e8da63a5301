//! Markdown writer
//!
//! Sequential writer. Content is buffered in memory and written to the sink in
//! one go during `finalize`.

use super::{DocumentWriter, Lifecycle, WriterError, WriterFormat};
use crate::models::{Column, Description, Table};
use crate::translate::{Label, Translator};
use tracing::info;

/// Writer producing a Markdown document
#[derive(Debug, Default)]
pub struct MarkdownWriter {
    lifecycle: Lifecycle,
    translator: Translator,
    md: String,
}

impl MarkdownWriter {
    pub fn new(translator: Translator) -> Self {
        Self {
            lifecycle: Lifecycle::new(),
            translator,
            md: String::new(),
        }
    }

    fn heading(
        &mut self,
        operation: &'static str,
        level: usize,
        text: &str,
    ) -> Result<(), WriterError> {
        self.lifecycle.ensure_open(operation)?;
        self.md.push_str(&"#".repeat(level));
        self.md.push(' ');
        self.md.push_str(&single_line(text));
        self.md.push_str("\n\n");
        Ok(())
    }
}

impl DocumentWriter for MarkdownWriter {
    fn format(&self) -> WriterFormat {
        WriterFormat::Markdown
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    fn translator(&self) -> Option<Translator> {
        Some(self.translator)
    }

    fn title(&mut self, text: &str) -> Result<(), WriterError> {
        self.heading("render title", 1, text)
    }

    fn subtitle(&mut self, text: &str) -> Result<(), WriterError> {
        self.heading("render subtitle", 2, text)
    }

    fn sub_subtitle(&mut self, text: &str) -> Result<(), WriterError> {
        self.heading("render sub-subtitle", 3, text)
    }

    fn line_break(&mut self) -> Result<(), WriterError> {
        self.lifecycle.ensure_open("render line break")?;
        self.md.push_str("---\n\n");
        Ok(())
    }

    fn body(&mut self, text: &str) -> Result<(), WriterError> {
        self.lifecycle.ensure_open("render body")?;
        self.md.push_str(text.trim_end());
        self.md.push_str("\n\n");
        Ok(())
    }

    fn columns(&mut self, columns: &[Column]) -> Result<(), WriterError> {
        self.lifecycle.ensure_open("render columns")?;

        if columns.is_empty() {
            self.md.push_str(&format!("*{}*\n\n", self.translator.label(Label::NoColumns)));
            return Ok(());
        }

        let headers = self.translator.column_headers();
        self.md.push_str(&format!("| {} |\n", headers.join(" | ")));
        self.md.push_str("| --- | --- | --- | --- |\n");
        for column in columns {
            self.md.push_str(&format!(
                "| {} | `{}` | {} | {} |\n",
                escape_cell(&column.name),
                escape_cell(&column.data_type.replace('`', "'")),
                escape_cell(&column.allow),
                escape_cell(&column.comment)
            ));
        }
        self.md.push('\n');
        Ok(())
    }

    fn table(&mut self, table: &Table) -> Result<(), WriterError> {
        self.sub_subtitle(&table.name)?;
        if !table.description.is_empty() {
            self.body(&table.description)?;
        }
        self.columns(&table.columns)
    }

    fn finalize(&mut self, description: &Description) -> Result<(), WriterError> {
        let mut sink = self.lifecycle.finish()?;
        let md = std::mem::take(&mut self.md);
        sink.write_str(&md)?;
        let path = sink.path().to_path_buf();
        sink.finish()?;

        info!(
            "Wrote Markdown document for {}.{} to {}",
            description.database.name,
            description.schema.name,
            path.display()
        );
        Ok(())
    }
}

/// Collapse line breaks so a heading stays on one line
fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Escape a value for use inside a pipe table cell
fn escape_cell(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('|', "\\|")
        .replace("\r\n", "<br>")
        .replace('\n', "<br>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_cell() {
        assert_eq!(escape_cell("a|b"), "a\\|b");
        assert_eq!(escape_cell("line1\nline2"), "line1<br>line2");
        assert_eq!(escape_cell("plain"), "plain");
    }

    #[test]
    fn test_type_cell_keeps_table_shape() {
        let mut writer = MarkdownWriter::new(Translator::default());
        writer
            .lifecycle
            .configure(crate::writer::Sink::from_writer("memory", std::io::sink()))
            .unwrap();
        writer
            .columns(&[Column::new("status", "enum('a'|'b')\n`x`")])
            .unwrap();

        let row = writer.md.lines().nth(2).unwrap();
        assert_eq!(row, "| status | `enum('a'\\|'b')<br>'x'` |  |  |");
    }

    #[test]
    fn test_single_line() {
        assert_eq!(single_line("users\n  table"), "users table");
    }
}
