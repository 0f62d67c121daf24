//! PDF: per-page text extraction plus the Info dictionary.
//!
//! ```text
//! # <title>
//!
//! ## Page 1
//!
//! <normalised page text>
//! ```
//!
//! Pages that yield no text, or whose extraction fails on its own, are
//! skipped. A document that does not load at all is a hard error: there is
//! nothing partial worth returning.

use crate::config::ConversionConfig;
use crate::error::ConvertError;
use crate::output::{ConversionResult, Metadata};
use crate::pipeline::input::SourceFile;
use crate::pipeline::normalize::normalize_text;
use lopdf::{Dictionary, Document, Object};
use tracing::{debug, warn};

const CONTENT_TYPE: &str = "application/pdf";

/// Info-dictionary keys copied into metadata, with their metadata names.
const INFO_FIELDS: [(&[u8], &str); 4] = [
    (b"Title", "title"),
    (b"Author", "author"),
    (b"Subject", "subject"),
    (b"Creator", "creator"),
];

pub fn convert(file: &SourceFile, _config: &ConversionConfig) -> Result<ConversionResult, ConvertError> {
    let doc = Document::load_mem(&file.bytes).map_err(|e| ConvertError::conversion("PDF", e))?;

    let pages = doc.get_pages();
    let page_count = pages.len();
    debug!("PDF '{}': {} pages", file.filename, page_count);

    let mut metadata = Metadata::basic(&file.filename, CONTENT_TYPE, file.size());
    metadata.insert("page_count", page_count);
    metadata.insert("title", file.filename.as_str());
    if let Some(info) = info_dictionary(&doc) {
        for (key, name) in INFO_FIELDS {
            if let Some(value) = info_string(&doc, info, key) {
                metadata.insert(name, value);
            }
        }
    }

    let mut sections = Vec::new();
    for (index, page_num) in pages.keys().enumerate() {
        match doc.extract_text(&[*page_num]) {
            Ok(text) if !text.trim().is_empty() => {
                sections.push(format!("## Page {}\n\n{}", index + 1, text));
            }
            Ok(_) => debug!("PDF page {} has no text", index + 1),
            Err(e) => warn!("Skipping PDF page {} of '{}': {}", index + 1, file.filename, e),
        }
    }

    let title = metadata
        .get("title")
        .and_then(|v| v.as_str())
        .unwrap_or(file.filename.as_str())
        .to_string();

    let body = if sections.is_empty() {
        format!("*No extractable text found in {page_count} pages.*")
    } else {
        sections.join("\n\n")
    };

    let markdown = normalize_text(&format!("# {title}\n\n{body}"));
    Ok(ConversionResult::new(markdown, metadata, CONTENT_TYPE))
}

fn info_dictionary(doc: &Document) -> Option<&Dictionary> {
    match doc.trailer.get(b"Info").ok()? {
        Object::Reference(id) => doc.get_object(*id).ok()?.as_dict().ok(),
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    }
}

/// A non-blank text string from the Info dictionary, following references.
fn info_string(doc: &Document, info: &Dictionary, key: &[u8]) -> Option<String> {
    let object = match info.get(key).ok()? {
        Object::Reference(id) => doc.get_object(*id).ok()?,
        other => other,
    };
    let Object::String(bytes, _) = object else {
        return None;
    };
    let text = decode_text_string(bytes);
    let text = text.trim_matches(|c: char| c.is_whitespace() || c == '\0');
    (!text.is_empty()).then(|| text.to_string())
}

/// PDF text strings are UTF-16BE when they start with a BOM, otherwise
/// single-byte (read as Latin-1).
fn decode_text_string(bytes: &[u8]) -> String {
    match bytes.strip_prefix(&[0xFE, 0xFF]) {
        Some(utf16) => {
            let units: Vec<u16> = utf16
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        None => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}
