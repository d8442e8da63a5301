//! Output formatting for CLI

use crate::translate::Language;
use crate::writer::WriterFormat;
use std::path::Path;

/// Format the list of supported output formats and languages
pub fn format_capabilities() -> String {
    let mut output = String::new();

    output.push_str("Output formats:\n");
    for format in WriterFormat::ALL {
        let kind = if format.is_structured() {
            "structured"
        } else {
            "document"
        };
        output.push_str(&format!(
            "  - {:<9} .{:<5} {}\n",
            format.to_string(),
            format.extension(),
            kind
        ));
    }

    output.push_str("\nLabel languages:\n");
    for language in Language::ALL {
        output.push_str(&format!("  - {}\n", language.tag()));
    }

    output
}

/// One-line summary printed after a successful render
pub fn format_render_summary(format: WriterFormat, tables: usize, path: &Path) -> String {
    format!(
        "Rendered {} table(s) as {} to {}",
        tables,
        format,
        path.display()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capabilities_list_every_format() {
        let output = format_capabilities();
        for format in WriterFormat::ALL {
            assert!(output.contains(&format!(".{}", format.extension())));
        }
        assert!(output.contains("pt-BR"));
    }

    #[test]
    fn test_render_summary() {
        assert_eq!(
            format_render_summary(WriterFormat::Pdf, 3, Path::new("out/db.pdf")),
            "Rendered 3 table(s) as pdf to out/db.pdf"
        );
    }
}
