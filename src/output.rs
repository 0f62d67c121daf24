//! Conversion result types.
//!
//! A [`ConversionResult`] is produced once per request and is immutable
//! afterwards: fields are private and exposed through accessors.

use serde::Serialize;
use std::collections::BTreeMap;

/// Body used when a converter produced nothing but whitespace.
pub const EMPTY_FALLBACK: &str = "*No content could be extracted from this file.*";

/// Per-sheet summary reported by the spreadsheet converter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetSummary {
    pub name: String,
    /// Non-empty rows, including those beyond the emitted row cap.
    pub rows: usize,
    pub columns: usize,
}

/// One metadata value. The schema is format-dependent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetaValue {
    Text(String),
    Integer(u64),
    List(Vec<String>),
    Sheets(Vec<SheetSummary>),
}

impl MetaValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetaValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            MetaValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            MetaValue::List(v) => Some(v),
            _ => None,
        }
    }
}

impl From<String> for MetaValue {
    fn from(v: String) -> Self {
        MetaValue::Text(v)
    }
}

impl From<&str> for MetaValue {
    fn from(v: &str) -> Self {
        MetaValue::Text(v.to_string())
    }
}

impl From<u64> for MetaValue {
    fn from(v: u64) -> Self {
        MetaValue::Integer(v)
    }
}

impl From<usize> for MetaValue {
    fn from(v: usize) -> Self {
        MetaValue::Integer(v as u64)
    }
}

impl From<u32> for MetaValue {
    fn from(v: u32) -> Self {
        MetaValue::Integer(u64::from(v))
    }
}

impl From<Vec<String>> for MetaValue {
    fn from(v: Vec<String>) -> Self {
        MetaValue::List(v)
    }
}

impl From<Vec<SheetSummary>> for MetaValue {
    fn from(v: Vec<SheetSummary>) -> Self {
        MetaValue::Sheets(v)
    }
}

/// Format-dependent metadata, serialised as a flat JSON object with keys
/// in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Metadata(BTreeMap<String, MetaValue>);

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// The `filename` / `content_type` / `size` triple every converter reports.
    pub fn basic(filename: &str, content_type: &str, size: usize) -> Self {
        let mut m = Self::new();
        m.insert("filename", filename);
        m.insert("content_type", content_type);
        m.insert("size", size);
        m
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<MetaValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Builder-style [`Metadata::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<MetaValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &MetaValue)> {
        self.0.iter()
    }
}

/// The uniform output of every converter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionResult {
    markdown: String,
    metadata: Metadata,
    content_type: String,
    preview: Option<String>,
}

impl ConversionResult {
    /// Create a result, substituting [`EMPTY_FALLBACK`] for a blank body.
    pub fn new(markdown: String, metadata: Metadata, content_type: impl Into<String>) -> Self {
        let markdown = if markdown.trim().is_empty() {
            EMPTY_FALLBACK.to_string()
        } else {
            markdown
        };
        Self {
            markdown,
            metadata,
            content_type: content_type.into(),
            preview: None,
        }
    }

    /// Attach a renderable preview (data-URI).
    pub fn with_preview(mut self, preview: String) -> Self {
        self.preview = Some(preview);
        self
    }

    pub fn markdown(&self) -> &str {
        &self.markdown
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn preview(&self) -> Option<&str> {
        self.preview.as_deref()
    }

    /// The recoverable problem recorded by a converter that degraded
    /// instead of failing (`metadata.error`), if any.
    pub fn diagnostic(&self) -> Option<&str> {
        self.metadata.get("error").and_then(MetaValue::as_str)
    }

    /// Split into owned parts for the response envelope.
    pub fn into_parts(self) -> (String, Metadata, String, Option<String>) {
        (self.markdown, self.metadata, self.content_type, self.preview)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_markdown_gets_fallback() {
        let r = ConversionResult::new("  \n\t".into(), Metadata::new(), "text/plain");
        assert_eq!(r.markdown(), EMPTY_FALLBACK);
    }

    #[test]
    fn diagnostic_reads_error_key() {
        let meta = Metadata::new().with("error", "expected value at line 1 column 7");
        let r = ConversionResult::new("# x".into(), meta, "application/json");
        assert_eq!(r.diagnostic(), Some("expected value at line 1 column 7"));

        let clean = ConversionResult::new("# x".into(), Metadata::new(), "application/json");
        assert!(clean.diagnostic().is_none());
    }

    #[test]
    fn metadata_serialises_flat() {
        let meta = Metadata::basic("a.csv", "text/csv", 12)
            .with("keys", vec!["a".to_string(), "b".to_string()])
            .with(
                "sheets",
                vec![SheetSummary {
                    name: "Data".into(),
                    rows: 3,
                    columns: 2,
                }],
            );
        let v = serde_json::to_value(&meta).unwrap();
        assert_eq!(v["filename"], "a.csv");
        assert_eq!(v["size"], 12);
        assert_eq!(v["keys"][1], "b");
        assert_eq!(v["sheets"][0]["name"], "Data");
        assert_eq!(v["sheets"][0]["columns"], 2);
    }

    #[test]
    fn metadata_keys_serialise_sorted() {
        let meta = Metadata::basic("a.csv", "text/csv", 12).with("columns", 2usize);
        let json = serde_json::to_string(&meta).unwrap();
        let keys: Vec<&str> = meta.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["columns", "content_type", "filename", "size"]);
        assert!(json.starts_with(r#"{"columns":2,"content_type":"text/csv""#));
    }
}
