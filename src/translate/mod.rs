//! Label translation for sequential writers
//!
//! Sequential writers receive a [`Translator`] at construction time and look up
//! every fixed label through it. There is no process-wide language setting; two
//! writers in the same process may render in different languages.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported label languages
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "pt-BR")]
    BrazilianPortuguese,
    #[serde(rename = "es")]
    Spanish,
}

impl Language {
    pub const ALL: [Language; 3] = [
        Language::English,
        Language::BrazilianPortuguese,
        Language::Spanish,
    ];

    /// BCP 47 tag for this language
    pub fn tag(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::BrazilianPortuguese => "pt-BR",
            Language::Spanish => "es",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Error returned when a language tag is not recognised
#[derive(Debug, Clone, thiserror::Error)]
#[error("Unsupported language: {0}")]
pub struct UnsupportedLanguage(pub String);

impl FromStr for Language {
    type Err = UnsupportedLanguage;

    /// Accepts tags case-insensitively with either `-` or `_` as separator.
    /// A bare `pt` resolves to Brazilian Portuguese.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "en" | "en-us" | "en-gb" => Ok(Language::English),
            "pt" | "pt-br" => Ok(Language::BrazilianPortuguese),
            "es" | "es-es" => Ok(Language::Spanish),
            _ => Err(UnsupportedLanguage(s.to_string())),
        }
    }
}

/// Fixed labels used in rendered documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    Database,
    Schema,
    Tables,
    Column,
    Type,
    Allow,
    Comment,
    NoColumns,
    GeneratedBy,
    Page,
}

/// Label lookup bound to one language
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Translator {
    language: Language,
}

impl Translator {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Look up the text for a label
    pub fn label(&self, label: Label) -> &'static str {
        use Label::*;
        match self.language {
            Language::English => match label {
                Database => "Database",
                Schema => "Schema",
                Tables => "Tables",
                Column => "Column",
                Type => "Type",
                Allow => "Allow",
                Comment => "Comment",
                NoColumns => "This table has no columns.",
                GeneratedBy => "Generated by",
                Page => "Page",
            },
            Language::BrazilianPortuguese => match label {
                Database => "Banco de dados",
                Schema => "Esquema",
                Tables => "Tabelas",
                Column => "Coluna",
                Type => "Tipo",
                Allow => "Permite",
                Comment => "Comentário",
                NoColumns => "Esta tabela não possui colunas.",
                GeneratedBy => "Gerado por",
                Page => "Página",
            },
            Language::Spanish => match label {
                Database => "Base de datos",
                Schema => "Esquema",
                Tables => "Tablas",
                Column => "Columna",
                Type => "Tipo",
                Allow => "Permite",
                Comment => "Comentario",
                NoColumns => "Esta tabla no tiene columnas.",
                GeneratedBy => "Generado por",
                Page => "Página",
            },
        }
    }

    /// `"<label>: <value>"`, used for the database and schema headings
    pub fn labelled(&self, label: Label, value: &str) -> String {
        format!("{}: {}", self.label(label), value)
    }

    /// Column listing headers in rendering order
    pub fn column_headers(&self) -> [&'static str; 4] {
        [
            self.label(Label::Column),
            self.label(Label::Type),
            self.label(Label::Allow),
            self.label(Label::Comment),
        ]
    }
}
