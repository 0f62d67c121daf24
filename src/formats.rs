//! Supported-format registry and MIME classifier.
//!
//! The registry is a `static` slice: built into the binary, never mutated,
//! safe to read from any number of concurrent requests without locking.
//! Classification is an exact string match against it; anything unlisted
//! falls through to [`FormatKind::Unknown`], whose converter sniffs the
//! bytes itself.

use serde::Serialize;
use std::fmt;

/// The closed set of converters a declared content type can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatKind {
    Pdf,
    WordDocument,
    PlainText,
    Html,
    Csv,
    Json,
    Spreadsheet,
    Image,
    Xml,
    /// No exact MIME match; the converter sniffs text vs. binary.
    Unknown,
}

impl FormatKind {
    /// Resolve a declared MIME type to its converter.
    ///
    /// Absent, empty, or unlisted types map to [`FormatKind::Unknown`].
    pub fn classify(content_type: Option<&str>) -> FormatKind {
        content_type
            .and_then(lookup)
            .map(|entry| entry.kind)
            .unwrap_or(FormatKind::Unknown)
    }

    /// Human label used in error messages (`Error converting <label>: …`).
    pub fn label(self) -> &'static str {
        match self {
            FormatKind::Pdf => "PDF",
            FormatKind::WordDocument => "DOCX",
            FormatKind::PlainText => "text file",
            FormatKind::Html => "HTML",
            FormatKind::Csv => "CSV",
            FormatKind::Json => "JSON",
            FormatKind::Spreadsheet => "Excel file",
            FormatKind::Image => "image",
            FormatKind::Xml => "XML",
            FormatKind::Unknown => "unknown file",
        }
    }
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of the supported-format table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatEntry {
    pub mime: &'static str,
    /// Short extension tag reported as `sourceFormat`.
    pub extension: &'static str,
    pub kind: FormatKind,
}

pub const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Every content type the service advertises, in discovery order.
pub static SUPPORTED_FORMATS: &[FormatEntry] = &[
    // Documents
    FormatEntry { mime: "application/pdf", extension: "pdf", kind: FormatKind::Pdf },
    FormatEntry { mime: DOCX_MIME, extension: "docx", kind: FormatKind::WordDocument },
    FormatEntry { mime: "application/msword", extension: "doc", kind: FormatKind::WordDocument },
    FormatEntry { mime: "text/plain", extension: "txt", kind: FormatKind::PlainText },
    FormatEntry { mime: "text/markdown", extension: "md", kind: FormatKind::Unknown },
    FormatEntry { mime: "text/html", extension: "html", kind: FormatKind::Html },
    FormatEntry { mime: "text/xml", extension: "xml", kind: FormatKind::Xml },
    FormatEntry { mime: "application/json", extension: "json", kind: FormatKind::Json },
    FormatEntry { mime: "text/csv", extension: "csv", kind: FormatKind::Csv },
    FormatEntry { mime: XLSX_MIME, extension: "xlsx", kind: FormatKind::Spreadsheet },
    // Images
    FormatEntry { mime: "image/jpeg", extension: "jpg", kind: FormatKind::Image },
    FormatEntry { mime: "image/png", extension: "png", kind: FormatKind::Image },
    FormatEntry { mime: "image/gif", extension: "gif", kind: FormatKind::Image },
    FormatEntry { mime: "image/svg+xml", extension: "svg", kind: FormatKind::Image },
    // Other
    FormatEntry { mime: "application/rtf", extension: "rtf", kind: FormatKind::Unknown },
];

/// Find the registry entry for an exact MIME string.
pub fn lookup(mime: &str) -> Option<&'static FormatEntry> {
    SUPPORTED_FORMATS.iter().find(|e| e.mime == mime)
}

/// The `sourceFormat` tag for a content type, `"unknown"` when unlisted.
pub fn source_format(content_type: Option<&str>) -> &'static str {
    content_type
        .and_then(lookup)
        .map(|e| e.extension)
        .unwrap_or("unknown")
}
