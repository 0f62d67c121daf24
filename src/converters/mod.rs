//! Per-format converters and the dispatch seam that selects one.
//!
//! Every converter has the same shape:
//!
//! ```text
//! fn convert(&SourceFile, &ConversionConfig) -> Result<ConversionResult, ConvertError>
//! ```
//!
//! Damaged content degrades into a successful result that records the
//! problem in `metadata.error` or `metadata.messages`; only content that
//! cannot be opened at all (PDF load, DOCX container, XLSX workbook) fails.

pub mod csv;
pub mod docx;
pub mod html;
pub mod image;
pub mod json;
pub mod pdf;
pub mod spreadsheet;
pub mod table;
pub mod text;
pub mod unknown;
pub mod xml;

use crate::config::ConversionConfig;
use crate::error::ConvertError;
use crate::formats::FormatKind;
use crate::output::ConversionResult;
use crate::pipeline::input::SourceFile;

/// Selects and runs the converter for a classified upload.
///
/// The orchestrator only talks to this trait, so hosts (and tests) can
/// substitute their own routing, e.g. to count or veto dispatches.
pub trait Dispatch: Send + Sync {
    /// Map a declared content type to a format.
    fn classify(&self, content_type: Option<&str>) -> FormatKind {
        FormatKind::classify(content_type)
    }

    /// Run exactly one converter for `kind`.
    fn dispatch(
        &self,
        kind: FormatKind,
        file: &SourceFile,
        config: &ConversionConfig,
    ) -> Result<ConversionResult, ConvertError>;
}

/// The built-in converter table.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatDispatcher;

impl Dispatch for FormatDispatcher {
    fn dispatch(
        &self,
        kind: FormatKind,
        file: &SourceFile,
        config: &ConversionConfig,
    ) -> Result<ConversionResult, ConvertError> {
        match kind {
            FormatKind::Pdf => pdf::convert(file, config),
            FormatKind::WordDocument => docx::convert(file, config),
            FormatKind::PlainText => text::convert(file, config),
            FormatKind::Html => html::convert(file, config),
            FormatKind::Csv => csv::convert(file, config),
            FormatKind::Json => json::convert(file, config),
            FormatKind::Spreadsheet => spreadsheet::convert(file, config),
            FormatKind::Image => image::convert(file, config),
            FormatKind::Xml => xml::convert(file, config),
            FormatKind::Unknown => unknown::convert(file, config),
        }
    }
}
