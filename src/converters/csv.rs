//! CSV: first row as header, rendered as a GFM table.

use crate::config::ConversionConfig;
use crate::converters::table::render_table;
use crate::error::ConvertError;
use crate::output::{ConversionResult, Metadata};
use crate::pipeline::input::SourceFile;
use tracing::debug;

const CONTENT_TYPE: &str = "text/csv";

pub fn convert(file: &SourceFile, _config: &ConversionConfig) -> Result<ConversionResult, ConvertError> {
    let text = file.text_lossy();
    let rows = parse_rows(&text)?;
    let mut metadata = Metadata::basic(&file.filename, CONTENT_TYPE, file.size());

    let Some((header, body)) = rows.split_first() else {
        return Ok(ConversionResult::new(
            "*Empty CSV file*".to_string(),
            metadata,
            CONTENT_TYPE,
        ));
    };
    debug!("CSV '{}': {} rows × {} columns", file.filename, rows.len(), header.len());

    let table = render_table(header, body);
    metadata.insert("rows", rows.len());
    metadata.insert("columns", header.len());

    Ok(ConversionResult::new(
        format!("# {}\n\n{}", file.filename, table),
        metadata,
        CONTENT_TYPE,
    ))
}

/// Comma-delimited records of any length; quoting per RFC 4180.
fn parse_rows(text: &str) -> Result<Vec<Vec<String>>, ConvertError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    reader
        .records()
        .map(|record| {
            record
                .map(|r| r.iter().map(str::to_string).collect())
                .map_err(|e| ConvertError::conversion("CSV", e))
        })
        .collect()
}
