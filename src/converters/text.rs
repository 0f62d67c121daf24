//! Plain text: embedded verbatim under a heading.
//!
//! No normalisation here: a `.txt` upload is already what the user wants to
//! read, and collapsing its whitespace would destroy ASCII tables and
//! indentation.

use crate::config::ConversionConfig;
use crate::error::ConvertError;
use crate::output::{ConversionResult, Metadata};
use crate::pipeline::input::SourceFile;

const CONTENT_TYPE: &str = "text/plain";

pub fn convert(file: &SourceFile, _config: &ConversionConfig) -> Result<ConversionResult, ConvertError> {
    let text = file.text_lossy();

    let title = text
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or(file.filename.as_str());

    let markdown = format!("# {title}\n\n{text}");
    let metadata = Metadata::basic(&file.filename, CONTENT_TYPE, file.size());

    Ok(ConversionResult::new(markdown, metadata, CONTENT_TYPE))
}
