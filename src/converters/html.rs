//! HTML via `html2md`; the `<title>` element names the document.

use crate::config::ConversionConfig;
use crate::error::ConvertError;
use crate::output::{ConversionResult, Metadata};
use crate::pipeline::input::SourceFile;
use once_cell::sync::Lazy;
use regex::Regex;

const CONTENT_TYPE: &str = "text/html";

static TITLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").unwrap());
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());

pub fn convert(file: &SourceFile, _config: &ConversionConfig) -> Result<ConversionResult, ConvertError> {
    let html = file.text_lossy();
    let title = extract_title(&html).unwrap_or_else(|| file.filename.clone());

    let markdown = html2md::parse_html(&html);
    let metadata = Metadata::basic(&file.filename, CONTENT_TYPE, file.size()).with("title", title);

    Ok(ConversionResult::new(markdown.trim().to_string(), metadata, CONTENT_TYPE))
}

/// Text of the first non-empty `<title>`, tags stripped and whitespace folded.
fn extract_title(html: &str) -> Option<String> {
    let raw = TITLE_RE.captures(html)?.get(1)?.as_str();
    let text = TAG_RE.replace_all(raw, "");
    let title = text.split_whitespace().collect::<Vec<_>>().join(" ");
    (!title.is_empty()).then_some(title)
}
