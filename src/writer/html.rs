//! HTML writer
//!
//! Sequential writer that streams fragments to the sink as they are rendered.
//! `begin` writes the document preamble and `finalize` closes the document.

use super::{DocumentWriter, Lifecycle, WriterError, WriterFormat, WriterState};
use crate::models::{Column, Description, Table};
use crate::translate::{Label, Translator};
use chrono::Utc;
use tracing::info;

const STYLE: &str = "body{font-family:sans-serif;max-width:60em;margin:2em auto;}\
table{border-collapse:collapse;width:100%;}\
th,td{border:1px solid #ccc;padding:4px 8px;text-align:left;}\
th{background:#0066CC;color:#fff;}";

/// Writer producing a standalone HTML page
#[derive(Debug, Default)]
pub struct HtmlWriter {
    lifecycle: Lifecycle,
    translator: Translator,
}

impl HtmlWriter {
    pub fn new(translator: Translator) -> Self {
        Self {
            lifecycle: Lifecycle::new(),
            translator,
        }
    }

    fn emit(&mut self, operation: &'static str, html: &str) -> Result<(), WriterError> {
        self.lifecycle.sink_mut(operation)?.write_str(html)
    }
}

impl DocumentWriter for HtmlWriter {
    fn format(&self) -> WriterFormat {
        WriterFormat::Html
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

    fn begin(&mut self, description: &Description) -> Result<(), WriterError> {
        self.lifecycle.begin()?;

        let title = format!("{}.{}", description.database.name, description.schema.name);
        let preamble = format!(
            "<!DOCTYPE html>\n<html lang=\"{}\">\n<head>\n<meta charset=\"utf-8\">\n\
             <meta name=\"generator\" content=\"schema-docgen {}\">\n\
             <meta name=\"generated\" content=\"{}\">\n\
             <title>{}</title>\n<style>{}</style>\n</head>\n<body>\n",
            self.translator.language().tag(),
            env!("CARGO_PKG_VERSION"),
            Utc::now().to_rfc3339(),
            escape_html(&title),
            STYLE
        );
        self.emit("begin", &preamble)
    }

    fn title(&mut self, text: &str) -> Result<(), WriterError> {
        self.emit("render title", &format!("<h1>{}</h1>\n", escape_html(text)))
    }

    fn subtitle(&mut self, text: &str) -> Result<(), WriterError> {
        self.emit("render subtitle", &format!("<h2>{}</h2>\n", escape_html(text)))
    }

    fn sub_subtitle(&mut self, text: &str) -> Result<(), WriterError> {
        self.emit(
            "render sub-subtitle",
            &format!("<h3>{}</h3>\n", escape_html(text)),
        )
    }

    fn line_break(&mut self) -> Result<(), WriterError> {
        self.emit("render line break", "<hr>\n")
    }

    fn body(&mut self, text: &str) -> Result<(), WriterError> {
        let paragraph = escape_html(text.trim_end()).replace('\n', "<br>\n");
        self.emit("render body", &format!("<p>{}</p>\n", paragraph))
    }

    fn columns(&mut self, columns: &[Column]) -> Result<(), WriterError> {
        if columns.is_empty() {
            let note = format!(
                "<p><em>{}</em></p>\n",
                escape_html(self.translator.label(Label::NoColumns))
            );
            return self.emit("render columns", &note);
        }

        let mut html = String::from("<table>\n<thead>\n<tr>");
        for header in self.translator.column_headers() {
            html.push_str(&format!("<th>{}</th>", escape_html(header)));
        }
        html.push_str("</tr>\n</thead>\n<tbody>\n");
        for column in columns {
            html.push_str(&format!(
                "<tr><td>{}</td><td><code>{}</code></td><td>{}</td><td>{}</td></tr>\n",
                escape_html(&column.name),
                escape_html(&column.data_type),
                escape_html(&column.allow),
                escape_html(&column.comment)
            ));
        }
        html.push_str("</tbody>\n</table>\n");
        self.emit("render columns", &html)
    }

    fn table(&mut self, table: &Table) -> Result<(), WriterError> {
        self.sub_subtitle(&table.name)?;
        if !table.description.is_empty() {
            self.body(&table.description)?;
        }
        self.columns(&table.columns)
    }

    fn finalize(&mut self, description: &Description) -> Result<(), WriterError> {
        let begun = self.lifecycle.state() == WriterState::Rendering;
        let mut sink = self.lifecycle.finish()?;
        if begun {
            sink.write_str("</body>\n</html>\n")?;
        }
        let path = sink.path().to_path_buf();
        sink.finish()?;

        info!(
            "Wrote HTML document for {}.{} to {}",
            description.database.name,
            description.schema.name,
            path.display()
        );
        Ok(())
    }
}

/// Escape text for HTML element content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<b>\"a\" & 'b'</b>"),
            "&lt;b&gt;&quot;a&quot; &amp; &#39;b&#39;&lt;/b&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }
}
