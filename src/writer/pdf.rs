//! PDF writer
//!
//! Sequential writer that lays out the rendered calls onto pages and emits a
//! self-contained PDF 1.4 document during `finalize`.
//!
//! ## Text encoding
//!
//! Only the standard Helvetica fonts are used, so text must fit WinAnsi
//! encoding (printable Latin-1). Anything else is rejected with
//! [`WriterError::Serialization`] naming the field it came from.
//!
//! ## Layout
//!
//! - Headings, paragraphs and column rows are word-wrapped to the page width
//! - Content flows onto as many pages as needed
//! - Optional header and footer text on every page
//! - Optional page numbers and creation timestamp

use super::{DocumentWriter, Lifecycle, WriterError, WriterFormat};
use crate::models::{Column, Description, Table};
use crate::translate::{Label, Translator};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

const MM_TO_PT: f64 = 2.83465;
const MARGIN: f64 = 50.0;
const HEADER_FOOTER_SIZE: f64 = 9.0;
/// Relative x offsets of the four column cells within the text width
const CELL_OFFSETS: [f64; 4] = [0.0, 0.26, 0.46, 0.62];

/// Page and typography settings for PDF output
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PdfLayout {
    #[serde(default)]
    pub page_size: PageSize,

    /// Font size for body text (in points)
    #[serde(default = "default_font_size")]
    pub font_size: u8,

    /// Header text (appears at top of each page)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,

    /// Footer text (appears at bottom of each page)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,

    /// Author recorded in the document information dictionary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    #[serde(default = "default_true")]
    pub show_page_numbers: bool,

    /// Record the generation time as the document creation date
    #[serde(default = "default_true")]
    pub show_timestamp: bool,
}

fn default_true() -> bool {
    true
}

fn default_font_size() -> u8 {
    10
}

impl Default for PdfLayout {
    fn default() -> Self {
        Self {
            page_size: PageSize::default(),
            font_size: default_font_size(),
            header: None,
            footer: None,
            author: None,
            show_page_numbers: default_true(),
            show_timestamp: default_true(),
        }
    }
}

/// Page size options
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    /// A4 paper size (210 x 297 mm)
    #[default]
    A4,
    /// US Letter size (8.5 x 11 inches)
    Letter,
}

impl PageSize {
    /// Get page dimensions in millimeters (width, height)
    pub fn dimensions_mm(&self) -> (f64, f64) {
        match self {
            PageSize::A4 => (210.0, 297.0),
            PageSize::Letter => (215.9, 279.4),
        }
    }

    /// Get page dimensions in points (width, height)
    pub fn dimensions_pt(&self) -> (f64, f64) {
        let (w, h) = self.dimensions_mm();
        (w * MM_TO_PT, h * MM_TO_PT)
    }
}

/// A rendered call waiting for layout
#[derive(Debug, Clone, PartialEq)]
enum Block {
    Heading { level: u8, text: String },
    Paragraph(String),
    Note(String),
    Rule,
    Row { cells: [String; 4], header: bool },
}

/// Positioned drawing operation on a page
#[derive(Debug, Clone, PartialEq)]
enum Mark {
    Text {
        x: f64,
        y: f64,
        size: f64,
        bold: bool,
        text: String,
    },
    Rule {
        x1: f64,
        x2: f64,
        y: f64,
    },
}

/// Writer producing a PDF document
#[derive(Debug, Default)]
pub struct PdfWriter {
    lifecycle: Lifecycle,
    translator: Translator,
    layout: PdfLayout,
    blocks: Vec<Block>,
    /// Number of `table` calls so far; only names tables rendered without `begin`
    tables_seen: usize,
}

impl PdfWriter {
    /// Create a PDF writer with the default layout
    pub fn new(translator: Translator) -> Self {
        Self::with_layout(translator, PdfLayout::default())
    }

    pub fn with_layout(translator: Translator, layout: PdfLayout) -> Self {
        Self {
            lifecycle: Lifecycle::new(),
            translator,
            layout,
            blocks: Vec::new(),
            tables_seen: 0,
        }
    }

    pub fn layout(&self) -> &PdfLayout {
        &self.layout
    }

    fn heading(
        &mut self,
        operation: &'static str,
        level: u8,
        text: &str,
    ) -> Result<(), WriterError> {
        self.lifecycle.ensure_open(operation)?;
        check_encodable(operation_path(operation), text)?;
        self.blocks.push(Block::Heading {
            level,
            text: text.to_string(),
        });
        Ok(())
    }

    fn push_columns(&mut self, columns: &[Column], prefix: &str) -> Result<(), WriterError> {
        if columns.is_empty() {
            self.blocks
                .push(Block::Note(self.translator.label(Label::NoColumns).to_string()));
            return Ok(());
        }

        check_columns(columns, prefix)?;

        let headers = self.translator.column_headers().map(str::to_string);
        self.blocks.push(Block::Row {
            cells: headers,
            header: true,
        });
        for column in columns {
            self.blocks.push(Block::Row {
                cells: [
                    column.name.clone(),
                    column.data_type.clone(),
                    column.allow.clone(),
                    column.comment.clone(),
                ],
                header: false,
            });
        }
        Ok(())
    }

    /// Lay the buffered blocks out onto pages
    fn layout_pages(&self) -> Vec<Vec<Mark>> {
        let (width, height) = self.layout.page_size.dimensions_pt();
        let font_size = f64::from(self.layout.font_size.max(6));
        let line_height = font_size * 1.3;
        let text_width = width - 2.0 * MARGIN;
        let top = height - MARGIN - if self.layout.header.is_some() { line_height } else { 0.0 };
        let bottom = MARGIN + line_height;

        let mut pages: Vec<Vec<Mark>> = vec![Vec::new()];
        let mut y = top;

        // Starts a new page when `needed` points do not fit on the current one
        let reserve = |pages: &mut Vec<Vec<Mark>>, y: &mut f64, needed: f64| {
            if *y - needed < bottom && *y < top {
                pages.push(Vec::new());
                *y = top;
            }
        };

        for block in &self.blocks {
            match block {
                Block::Heading { level, text } => {
                    let size = font_size
                        * match *level {
                            1 => 1.8,
                            2 => 1.4,
                            _ => 1.2,
                        };
                    let lines = word_wrap(text, max_chars(text_width, size));
                    let needed = size * 0.6 + lines.len() as f64 * size * 1.3;
                    reserve(&mut pages, &mut y, needed);
                    y -= size * 0.6;
                    for line in lines {
                        y -= size * 1.3;
                        push_mark(&mut pages, Mark::Text {
                            x: MARGIN,
                            y,
                            size,
                            bold: true,
                            text: line,
                        });
                    }
                    y -= size * 0.3;
                }
                Block::Paragraph(text) | Block::Note(text) => {
                    let limit = max_chars(text_width, font_size);
                    for source_line in text.lines() {
                        for line in word_wrap(source_line, limit) {
                            reserve(&mut pages, &mut y, line_height);
                            y -= line_height;
                            push_mark(&mut pages, Mark::Text {
                                x: MARGIN,
                                y,
                                size: font_size,
                                bold: false,
                                text: line,
                            });
                        }
                    }
                    y -= line_height * 0.5;
                }
                Block::Rule => {
                    reserve(&mut pages, &mut y, line_height);
                    y -= line_height * 0.5;
                    push_mark(&mut pages, Mark::Rule {
                        x1: MARGIN,
                        x2: width - MARGIN,
                        y,
                    });
                    y -= line_height * 0.5;
                }
                Block::Row { cells, header } => {
                    let wrapped: Vec<Vec<String>> = cells
                        .iter()
                        .enumerate()
                        .map(|(i, cell)| {
                            let available = cell_width(i, text_width);
                            word_wrap(cell, max_chars(available, font_size))
                        })
                        .collect();
                    let row_lines = wrapped.iter().map(Vec::len).max().unwrap_or(1);
                    reserve(&mut pages, &mut y, row_lines as f64 * line_height);
                    for (i, lines) in wrapped.into_iter().enumerate() {
                        let x = MARGIN + CELL_OFFSETS[i] * text_width;
                        for (k, line) in lines.into_iter().enumerate() {
                            if line.is_empty() {
                                continue;
                            }
                            push_mark(&mut pages, Mark::Text {
                                x,
                                y: y - (k + 1) as f64 * line_height,
                                size: font_size,
                                bold: *header,
                                text: line,
                            });
                        }
                    }
                    y -= row_lines as f64 * line_height;
                    if *header {
                        push_mark(&mut pages, Mark::Rule {
                            x1: MARGIN,
                            x2: width - MARGIN,
                            y: y - 2.0,
                        });
                        y -= 4.0;
                    }
                }
            }
        }

        pages
    }

    /// Decorations repeated on every page: header, footer and page number
    fn page_decorations(&self, page: usize, page_count: usize) -> Vec<Mark> {
        let (width, height) = self.layout.page_size.dimensions_pt();
        let mut marks = Vec::new();

        if let Some(header) = &self.layout.header {
            marks.push(Mark::Text {
                x: MARGIN,
                y: height - MARGIN + HEADER_FOOTER_SIZE,
                size: HEADER_FOOTER_SIZE,
                bold: false,
                text: header.clone(),
            });
        }

        if let Some(footer) = &self.layout.footer {
            marks.push(Mark::Text {
                x: MARGIN,
                y: MARGIN - 2.0 * HEADER_FOOTER_SIZE,
                size: HEADER_FOOTER_SIZE,
                bold: false,
                text: footer.clone(),
            });
        }

        if self.layout.show_page_numbers {
            let text = format!(
                "{} {} / {}",
                self.translator.label(Label::Page),
                page + 1,
                page_count
            );
            // Helvetica averages roughly half an em per character
            let text_width = text.chars().count() as f64 * HEADER_FOOTER_SIZE * 0.5;
            marks.push(Mark::Text {
                x: width - MARGIN - text_width,
                y: MARGIN - 2.0 * HEADER_FOOTER_SIZE,
                size: HEADER_FOOTER_SIZE,
                bold: false,
                text,
            });
        }

        marks
    }

    /// Create the complete PDF document
    fn create_pdf_document(&self, description: &Description) -> Result<Vec<u8>, WriterError> {
        if let Some(header) = &self.layout.header {
            check_encodable("layout.header", header)?;
        }
        if let Some(footer) = &self.layout.footer {
            check_encodable("layout.footer", footer)?;
        }
        if let Some(author) = &self.layout.author {
            check_encodable("layout.author", author)?;
        }
        let title = format!("{}.{}", description.database.name, description.schema.name);
        check_encodable("database.name", &description.database.name)?;
        check_encodable("schema.name", &description.schema.name)?;

        let pages = self.layout_pages();
        let page_count = pages.len();
        debug!("Laid out PDF document on {} page(s)", page_count);

        let (width, height) = self.layout.page_size.dimensions_pt();
        let mut pdf = Vec::new();
        let mut xref_positions: Vec<usize> = Vec::new();

        // PDF Header
        pdf.extend_from_slice(b"%PDF-1.4\n");
        pdf.extend_from_slice(b"%\xE2\xE3\xCF\xD3\n"); // Binary marker

        // Objects 1-5 are fixed; each page adds a page object and a content stream
        let page_object = |i: usize| 6 + 2 * i;

        // Object 1: Catalog
        xref_positions.push(pdf.len());
        pdf.extend_from_slice(b"1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n");

        // Object 2: Pages
        xref_positions.push(pdf.len());
        let kids: Vec<String> = (0..page_count)
            .map(|i| format!("{} 0 R", page_object(i)))
            .collect();
        pdf.extend_from_slice(
            format!(
                "2 0 obj\n<< /Type /Pages /Kids [{}] /Count {} >>\nendobj\n",
                kids.join(" "),
                page_count
            )
            .as_bytes(),
        );

        // Objects 3 and 4: Fonts
        xref_positions.push(pdf.len());
        pdf.extend_from_slice(
            b"3 0 obj\n<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>\nendobj\n",
        );
        xref_positions.push(pdf.len());
        pdf.extend_from_slice(
            b"4 0 obj\n<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>\nendobj\n",
        );

        // Object 5: Info dictionary
        xref_positions.push(pdf.len());
        let mut info_obj = format!(
            "5 0 obj\n<< /Title ({}) /Producer (schema-docgen {}) /Creator ({} schema-docgen)",
            escape_pdf_string(&title),
            env!("CARGO_PKG_VERSION"),
            escape_pdf_string(self.translator.label(Label::GeneratedBy)),
        );
        if let Some(author) = &self.layout.author {
            info_obj.push_str(&format!(" /Author ({})", escape_pdf_string(author)));
        }
        if self.layout.show_timestamp {
            info_obj.push_str(&format!(
                " /CreationDate ({})",
                Utc::now().format("D:%Y%m%d%H%M%SZ")
            ));
        }
        info_obj.push_str(" >>\nendobj\n");
        pdf.extend_from_slice(info_obj.as_bytes());

        for (i, marks) in pages.iter().enumerate() {
            let number = page_object(i);

            xref_positions.push(pdf.len());
            pdf.extend_from_slice(
                format!(
                    "{} 0 obj\n<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] /Contents {} 0 R /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> >>\nendobj\n",
                    number,
                    width,
                    height,
                    number + 1
                )
                .as_bytes(),
            );

            let mut stream = create_content_stream(marks);
            stream.push_str(&create_content_stream(&self.page_decorations(i, page_count)));
            xref_positions.push(pdf.len());
            pdf.extend_from_slice(
                format!(
                    "{} 0 obj\n<< /Length {} >>\nstream\n{}endstream\nendobj\n",
                    number + 1,
                    stream.len(),
                    stream
                )
                .as_bytes(),
            );
        }

        // Cross-reference table
        let xref_start = pdf.len();
        pdf.extend_from_slice(b"xref\n");
        pdf.extend_from_slice(format!("0 {}\n", xref_positions.len() + 1).as_bytes());
        pdf.extend_from_slice(b"0000000000 65535 f \n");
        for pos in &xref_positions {
            pdf.extend_from_slice(format!("{:010} 00000 n \n", pos).as_bytes());
        }

        // Trailer
        pdf.extend_from_slice(b"trailer\n");
        pdf.extend_from_slice(
            format!(
                "<< /Size {} /Root 1 0 R /Info 5 0 R >>\n",
                xref_positions.len() + 1
            )
            .as_bytes(),
        );
        pdf.extend_from_slice(b"startxref\n");
        pdf.extend_from_slice(format!("{}\n", xref_start).as_bytes());
        pdf.extend_from_slice(b"%%EOF\n");

        Ok(pdf)
    }
}

impl DocumentWriter for PdfWriter {
    fn format(&self) -> WriterFormat {
        WriterFormat::Pdf
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

    /// Checks every field of the description up front so an unencodable value
    /// is reported by its field path rather than by the call that renders it
    fn begin(&mut self, description: &Description) -> Result<(), WriterError> {
        self.lifecycle.begin()?;
        check_description(description)
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
        self.blocks.push(Block::Rule);
        Ok(())
    }

    fn body(&mut self, text: &str) -> Result<(), WriterError> {
        self.lifecycle.ensure_open("render body")?;
        check_encodable("body", text)?;
        self.blocks.push(Block::Paragraph(text.to_string()));
        Ok(())
    }

    fn columns(&mut self, columns: &[Column]) -> Result<(), WriterError> {
        self.lifecycle.ensure_open("render columns")?;
        self.push_columns(columns, "")
    }

    fn table(&mut self, table: &Table) -> Result<(), WriterError> {
        self.lifecycle.ensure_open("render table")?;
        let index = self.tables_seen;
        self.tables_seen += 1;
        let prefix = format!("tables[{}].", index);

        check_encodable(&format!("{}name", prefix), &table.name)?;
        check_encodable(&format!("{}description", prefix), &table.description)?;
        self.blocks.push(Block::Heading {
            level: 3,
            text: table.name.clone(),
        });
        if !table.description.is_empty() {
            self.blocks.push(Block::Paragraph(table.description.clone()));
        }
        self.push_columns(&table.columns, &prefix)
    }

    fn finalize(&mut self, description: &Description) -> Result<(), WriterError> {
        let mut sink = self.lifecycle.finish()?;
        let pdf = self.create_pdf_document(description)?;
        self.blocks.clear();
        sink.write_all(&pdf)?;
        let path = sink.path().to_path_buf();
        sink.finish()?;

        info!(
            "Wrote PDF document ({} bytes) for {} to {}",
            pdf.len(),
            description.database.name,
            path.display()
        );
        Ok(())
    }
}

fn check_description(description: &Description) -> Result<(), WriterError> {
    check_encodable("database.name", &description.database.name)?;
    check_encodable("database.description", &description.database.description)?;
    check_encodable("schema.name", &description.schema.name)?;
    check_encodable("schema.description", &description.schema.description)?;

    for (i, table) in description.tables.iter().enumerate() {
        let prefix = format!("tables[{}].", i);
        check_encodable(&format!("{}name", prefix), &table.name)?;
        check_encodable(&format!("{}description", prefix), &table.description)?;
        check_columns(&table.columns, &prefix)?;
    }
    Ok(())
}

fn check_columns(columns: &[Column], prefix: &str) -> Result<(), WriterError> {
    for (j, column) in columns.iter().enumerate() {
        check_encodable(&format!("{}columns[{}].column", prefix, j), &column.name)?;
        check_encodable(&format!("{}columns[{}].type", prefix, j), &column.data_type)?;
        check_encodable(&format!("{}columns[{}].allow", prefix, j), &column.allow)?;
        check_encodable(&format!("{}columns[{}].comment", prefix, j), &column.comment)?;
    }
    Ok(())
}

fn operation_path(operation: &'static str) -> &'static str {
    match operation {
        "render title" => "title",
        "render subtitle" => "subtitle",
        "render sub-subtitle" => "sub_subtitle",
        _ => "text",
    }
}

fn is_encodable(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\t' | ' '..='~' | '\u{a0}'..='\u{ff}')
}

/// Reject text that WinAnsi Helvetica cannot show
fn check_encodable(path: &str, text: &str) -> Result<(), WriterError> {
    match text.chars().find(|c| !is_encodable(*c)) {
        Some(c) => Err(WriterError::Serialization {
            path: path.to_string(),
            message: format!(
                "character {:?} (U+{:04X}) cannot be encoded in a PDF standard font",
                c, c as u32
            ),
        }),
        None => Ok(()),
    }
}

/// Escape special characters for PDF literal strings
///
/// Latin-1 characters above ASCII become octal escapes so the content stream
/// stays 7-bit.
fn escape_pdf_string(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '(' => escaped.push_str("\\("),
            ')' => escaped.push_str("\\)"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c if (c as u32) > 0x7e => escaped.push_str(&format!("\\{:03o}", c as u32)),
            c => escaped.push(c),
        }
    }
    escaped
}

fn create_content_stream(marks: &[Mark]) -> String {
    let mut stream = String::new();
    for mark in marks {
        match mark {
            Mark::Text {
                x,
                y,
                size,
                bold,
                text,
            } => {
                let font = if *bold { "F2" } else { "F1" };
                stream.push_str("BT\n");
                stream.push_str(&format!("/{} {:.1} Tf\n", font, size));
                stream.push_str(&format!("{:.2} {:.2} Td\n", x, y));
                stream.push_str(&format!("({}) Tj\n", escape_pdf_string(text)));
                stream.push_str("ET\n");
            }
            Mark::Rule { x1, x2, y } => {
                stream.push_str(&format!("0.5 w\n{:.2} {:.2} m\n{:.2} {:.2} l\nS\n", x1, y, x2, y));
            }
        }
    }
    stream
}

fn push_mark(pages: &mut [Vec<Mark>], mark: Mark) {
    if let Some(page) = pages.last_mut() {
        page.push(mark);
    }
}

fn cell_width(index: usize, text_width: f64) -> f64 {
    let start = CELL_OFFSETS[index];
    let end = CELL_OFFSETS.get(index + 1).copied().unwrap_or(1.0);
    (end - start) * text_width - 6.0
}

fn max_chars(width: f64, font_size: f64) -> usize {
    ((width / (font_size * 0.5)) as usize).max(1)
}

/// Word wrap text to fit within max characters per line
fn word_wrap(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current_line = String::new();

    for word in text.split_whitespace() {
        if current_line.is_empty() {
            current_line = word.to_string();
        } else if current_line.chars().count() + 1 + word.chars().count() <= max_chars {
            current_line.push(' ');
            current_line.push_str(word);
        } else {
            lines.push(current_line);
            current_line = word.to_string();
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}
