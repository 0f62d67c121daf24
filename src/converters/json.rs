//! JSON: pretty-printed inside a fence. Malformed input degrades, never fails.

use crate::config::ConversionConfig;
use crate::error::ConvertError;
use crate::output::{ConversionResult, Metadata};
use crate::pipeline::input::SourceFile;
use serde_json::Value;
use tracing::{debug, warn};

const CONTENT_TYPE: &str = "application/json";

pub fn convert(file: &SourceFile, config: &ConversionConfig) -> Result<ConversionResult, ConvertError> {
    let text = file.text_lossy();
    let mut metadata = Metadata::basic(&file.filename, CONTENT_TYPE, file.size());

    let value: Value = match serde_json::from_str(&text) {
        Ok(v) => v,
        Err(e) => {
            warn!("JSON '{}' did not parse, echoing raw text: {}", file.filename, e);
            let message = e.to_string();
            let markdown = format!(
                "# {}\n\n**Error parsing JSON:**\n\n{}\n\n```\n{}\n```",
                file.filename,
                message,
                excerpt(&text, config.json_excerpt_chars)
            );
            metadata.insert("error", message);
            return Ok(ConversionResult::new(markdown, metadata, CONTENT_TYPE));
        }
    };

    match &value {
        Value::Object(map) => {
            debug!("JSON object with {} keys", map.len());
            metadata.insert("keys", map.keys().cloned().collect::<Vec<_>>());
        }
        Value::Array(items) => {
            debug!("JSON array with {} items", items.len());
            metadata.insert("items", items.len());
        }
        _ => {}
    }

    let pretty = serde_json::to_string_pretty(&value)
        .map_err(|e| ConvertError::conversion("JSON", e))?;

    Ok(ConversionResult::new(
        format!("# {}\n\n```json\n{}\n```", file.filename, pretty),
        metadata,
        CONTENT_TYPE,
    ))
}

/// First `limit` characters, with `...` appended when anything was cut.
fn excerpt(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
