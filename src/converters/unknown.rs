//! Fallback for unlisted types: sniff text vs. binary and summarise.

use crate::config::ConversionConfig;
use crate::error::ConvertError;
use crate::output::{ConversionResult, Metadata};
use crate::pipeline::input::{format_mib, SourceFile};
use tracing::debug;

pub fn convert(file: &SourceFile, config: &ConversionConfig) -> Result<ConversionResult, ConvertError> {
    Ok(summarize(file, config))
}

/// Infallible summary of arbitrary bytes.
///
/// Also used by the Word converter for legacy binaries it cannot parse.
pub fn summarize(file: &SourceFile, config: &ConversionConfig) -> ConversionResult {
    let declared = file.content_type_or_default();
    let mut metadata = Metadata::basic(&file.filename, declared, file.size());

    let markdown = match sniff_text(&file.bytes, config.binary_control_ratio) {
        Some(text) => {
            debug!("'{}' sniffed as text ({} bytes)", file.filename, file.size());
            metadata.insert("binary", "false");
            text_summary(&file.filename, text, config.unknown_text_chars)
        }
        None => {
            debug!("'{}' sniffed as binary ({} bytes)", file.filename, file.size());
            metadata.insert("binary", "true");
            format!(
                "# Binary File: {}\n\n- **Size**: {} bytes ({} MiB)\n- **Type**: {}\n\n\
                 *This file appears to be binary and cannot be displayed as text.*",
                file.filename,
                file.size(),
                format_mib(file.size()),
                file.content_type.as_deref().unwrap_or("Unknown"),
            )
        }
    };

    ConversionResult::new(markdown, metadata, declared)
}

/// Strict UTF-8 decode, rejected when control characters exceed `max_ratio`.
fn sniff_text(bytes: &[u8], max_ratio: f64) -> Option<&str> {
    let text = std::str::from_utf8(bytes).ok()?;
    let total = text.chars().count();
    if total == 0 {
        return Some(text);
    }
    let control = text
        .chars()
        .filter(|c| (*c as u32) < 0x20 && !matches!(c, '\n' | '\r' | '\t'))
        .count();
    (control as f64 / total as f64 <= max_ratio).then_some(text)
}

fn text_summary(filename: &str, text: &str, limit: usize) -> String {
    let shown = match text.char_indices().nth(limit) {
        Some((cut, _)) => &text[..cut],
        None => text,
    };
    let mut out = format!("# File: {filename}\n\n```\n{shown}\n```");
    if shown.len() < text.len() {
        out.push_str(&format!(
            "\n\n*Note: File truncated, showing first {} characters*",
            group_thousands(limit)
        ));
    }
    out
}

/// `10000` → `10,000`.
fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
