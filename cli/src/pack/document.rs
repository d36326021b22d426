//! # ppdpack Document Parsing (`pack::document`)
//!
//! File: cli/src/pack/document.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! The indexer treats document parsing as a capability: given the raw bytes of
//! one file, produce the canonical key and a description string, or reject the
//! content. `DocumentParser` is that seam. Any `Fn(&[u8]) -> Result<ParsedDocument,
//! ParseError>` closure implements it, which keeps test stubs short.
//!
//! `PpdParser` is the default implementation for Adobe PostScript Printer
//! Description files. It reads a handful of main keywords and formats the
//! description as a CUPS driver-list line:
//!
//! ```text
//! "<model name>" <language> "<manufacturer>" "<nickname>" "<1284 device id>"
//! ```
//!
use thiserror::Error;

/// Key and description extracted from one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDocument {
    pub key: String,
    pub description: String,
}

/// Why a document was rejected by a parser.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ParseError(pub String);

/// Extracts a key and description from a document's raw bytes.
pub trait DocumentParser {
    fn parse(&self, content: &[u8]) -> Result<ParsedDocument, ParseError>;
}

impl<F> DocumentParser for F
where
    F: Fn(&[u8]) -> Result<ParsedDocument, ParseError>,
{
    fn parse(&self, content: &[u8]) -> Result<ParsedDocument, ParseError> {
        self(content)
    }
}

/// Parser for Adobe PPD files.
#[derive(Debug, Clone, Copy, Default)]
pub struct PpdParser;

const PPD_MAGIC: &str = "*PPD-Adobe:";

impl DocumentParser for PpdParser {
    fn parse(&self, content: &[u8]) -> Result<ParsedDocument, ParseError> {
        let text = decode_text(content);
        let text = text.trim_start_matches('\u{feff}');
        if !text.starts_with(PPD_MAGIC) {
            return Err(ParseError(format!("missing '{}' header", PPD_MAGIC)));
        }

        let nickname = main_keyword_value(text, "NickName");
        let key = main_keyword_value(text, "ModelName")
            .filter(|k| !k.is_empty())
            .or_else(|| nickname.clone().filter(|k| !k.is_empty()))
            .ok_or_else(|| ParseError("no *ModelName or *NickName".to_string()))?;
        let nickname = nickname.unwrap_or_else(|| key.clone());
        let manufacturer = main_keyword_value(text, "Manufacturer")
            .or_else(|| nickname.split_whitespace().next().map(str::to_string))
            .unwrap_or_default();
        let language = main_keyword_value(text, "LanguageVersion")
            .map(|l| language_code(&l))
            .unwrap_or("en");
        let device_id = main_keyword_value(text, "1284DeviceID").unwrap_or_default();

        let description = format!(
            "\"{}\" {} \"{}\" \"{}\" \"{}\"",
            key, language, manufacturer, nickname, device_id
        );
        Ok(ParsedDocument { key, description })
    }
}

/// PPDs are nominally ISO-8859-1; many modern ones are UTF-8.
fn decode_text(content: &[u8]) -> String {
    match std::str::from_utf8(content) {
        Ok(s) => s.to_string(),
        Err(_) => content.iter().map(|&b| b as char).collect(),
    }
}

/// Value of the first `*Keyword: value` line, unquoted.
///
/// Quoted values may span lines; the closing quote ends them.
fn main_keyword_value(text: &str, keyword: &str) -> Option<String> {
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();

        let Some(rest) = line
            .strip_prefix('*')
            .and_then(|l| l.strip_prefix(keyword))
            .and_then(|l| l.strip_prefix(':'))
        else {
            continue;
        };
        let value = rest.trim_start_matches([' ', '\t']);
        if let Some(quoted) = value.strip_prefix('"') {
            let quoted_start = line_start + (line.len() - quoted.len());
            let tail = &text[quoted_start..];
            return tail.find('"').map(|end| tail[..end].trim().to_string());
        }
        return Some(value.trim_end().to_string());
    }
    None
}

fn language_code(language_version: &str) -> &'static str {
    match language_version.trim().to_ascii_lowercase().as_str() {
        "english" => "en",
        "french" => "fr",
        "german" => "de",
        "spanish" => "es",
        "italian" => "it",
        "portuguese" => "pt",
        "dutch" => "nl",
        "swedish" => "sv",
        "danish" => "da",
        "finnish" => "fi",
        "norwegian" => "no",
        "polish" => "pl",
        "czech" => "cs",
        "hungarian" => "hu",
        "russian" => "ru",
        "japanese" => "ja",
        "chinese" | "simplified chinese" => "zh_CN",
        "traditional chinese" => "zh_TW",
        "korean" => "ko",
        _ => "en",
    }
}
