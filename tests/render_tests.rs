//! End-to-end rendering tests against real files

use schema_docgen::{
    Basic, Column, Description, DocgenConfig, Language, Table, WriterError, WriterFormat,
    WriterState, load_description, render_to_path,
};
use std::fs;
use tempfile::TempDir;

fn description() -> Description {
    Description::new(
        Basic::new("inventory", "warehouse stock"),
        Basic::new("public", ""),
        vec![
            Table::new("items", "things on shelves").with_columns(vec![
                Column::new("sku", "varchar(32)").with_allow("NOT NULL"),
                Column::new("qty", "integer").with_comment("units in stock"),
            ]),
            Table::new("locations", "").with_columns(vec![Column::new("code", "text")]),
        ],
    )
}

fn render_with(config: &DocgenConfig, description: &Description) -> std::path::PathBuf {
    let path = config.resolve_output_path(description);
    let mut writer = config.create_writer();
    render_to_path(writer.as_mut(), description, &path).unwrap();
    assert_eq!(writer.state(), WriterState::Finalized);
    path
}

mod render_to_file_tests {
    use super::*;

    #[test]
    fn test_every_format_writes_a_file() {
        let temp = TempDir::new().unwrap();
        let description = description();

        for format in WriterFormat::ALL {
            let config = DocgenConfig::builder()
                .format(format)
                .output(temp.path())
                .build();
            let path = render_with(&config, &description);

            assert_eq!(
                path,
                temp.path().join(format!("inventory_public.{}", format.extension()))
            );
            let bytes = fs::read(&path).unwrap();
            assert!(!bytes.is_empty(), "{} output is empty", format);
        }
    }

    #[test]
    fn test_json_file_loads_back() {
        let temp = TempDir::new().unwrap();
        let description = description();
        let config = DocgenConfig::builder()
            .format(WriterFormat::Json)
            .output(temp.path().join("dump.json"))
            .build();

        let path = render_with(&config, &description);
        let loaded = load_description(&path).unwrap();

        assert_eq!(loaded, description);
        assert!(!fs::read_to_string(&path).unwrap().ends_with('\n'));
    }

    #[test]
    fn test_markdown_file_follows_table_order() {
        let temp = TempDir::new().unwrap();
        let config = DocgenConfig::builder()
            .format(WriterFormat::Markdown)
            .output(temp.path())
            .language(Language::Spanish)
            .build();

        let path = render_with(&config, &description());
        let md = fs::read_to_string(path).unwrap();

        assert!(md.starts_with("# Base de datos: inventory\n\nwarehouse stock\n\n"));
        let items = md.find("### items").unwrap();
        let locations = md.find("### locations").unwrap();
        assert!(items < locations);
        assert!(md.contains("| qty | `integer` |  | units in stock |"));
    }

    #[test]
    fn test_html_file_is_complete() {
        let temp = TempDir::new().unwrap();
        let config = DocgenConfig::builder()
            .format(WriterFormat::Html)
            .output(temp.path())
            .build();

        let path = render_with(&config, &description());
        let html = fs::read_to_string(path).unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<h3>items</h3>\n<p>things on shelves</p>\n<table>"));
        assert!(html.ends_with("</html>\n"));
    }

    #[test]
    fn test_pdf_file_is_complete() {
        let temp = TempDir::new().unwrap();
        let config = DocgenConfig::builder()
            .format(WriterFormat::Pdf)
            .output(temp.path())
            .build();

        let path = render_with(&config, &description());
        let bytes = fs::read(path).unwrap();
        let text = String::from_utf8_lossy(&bytes);

        assert!(text.starts_with("%PDF-1.4"));
        assert!(text.contains("/Title (inventory.public)"));
        assert!(text.contains("(items) Tj"));
        assert!(text.ends_with("%%EOF\n"));
    }

    #[test]
    fn test_unwritable_output_is_an_io_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("no-such-dir").join("out.md");
        let config = DocgenConfig::builder()
            .format(WriterFormat::Markdown)
            .build();
        let mut writer = config.create_writer();

        let err = render_to_path(writer.as_mut(), &description(), &path).unwrap_err();

        assert!(matches!(err, WriterError::Io { .. }));
        assert_eq!(writer.state(), WriterState::Uninitialized);
        assert!(!path.exists());
    }
}

mod config_and_loader_tests {
    use super::*;

    #[test]
    fn test_config_file_drives_render() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("docgen.toml");
        let output = temp.path().join("docs.md");
        fs::write(
            &config_path,
            format!(
                "format = \"markdown\"\noutput = {:?}\nlanguage = \"pt-BR\"\n",
                output.to_string_lossy()
            ),
        )
        .unwrap();

        let config = DocgenConfig::load(&config_path).unwrap();
        let path = render_with(&config, &description());

        assert_eq!(path, output);
        let md = fs::read_to_string(path).unwrap();
        assert!(md.contains("## Tabelas"));
    }

    #[test]
    fn test_missing_config_file() {
        let temp = TempDir::new().unwrap();
        let err = DocgenConfig::load(&temp.path().join("absent.toml")).unwrap_err();
        assert!(err.to_string().contains("absent.toml"));
    }

    #[test]
    fn test_load_yaml_description() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("inventory.yml");
        fs::write(
            &path,
            "database:\n  name: inventory\nschema:\n  name: public\ntables:\n  - name: items\n",
        )
        .unwrap();

        let loaded = load_description(&path).unwrap();
        assert_eq!(loaded.database.name, "inventory");
        assert_eq!(loaded.tables.len(), 1);
        assert!(loaded.tables[0].columns.is_empty());
    }

    #[test]
    fn test_load_missing_description() {
        let temp = TempDir::new().unwrap();
        let err = load_description(&temp.path().join("absent.json")).unwrap_err();
        assert!(err.to_string().contains("absent.json"));
    }
}
