//! XML: strict well-formedness check, then a 2-space pretty print.
//!
//! Anything that is not exactly one balanced root element (with optional
//! prolog, comments and processing instructions around it) is embedded
//! verbatim and the parse error is recorded in `metadata.error`.

use crate::config::ConversionConfig;
use crate::error::ConvertError;
use crate::output::{ConversionResult, Metadata};
use crate::pipeline::input::SourceFile;
use quick_xml::events::Event;
use quick_xml::{Reader, Writer};
use std::io::Cursor;
use tracing::{debug, warn};

const CONTENT_TYPE: &str = "text/xml";

pub fn convert(file: &SourceFile, _config: &ConversionConfig) -> Result<ConversionResult, ConvertError> {
    let text = file.text_lossy();
    let mut metadata = Metadata::basic(&file.filename, CONTENT_TYPE, file.size());

    let body = match pretty_print(&text) {
        Ok((pretty, root)) => {
            debug!("XML '{}' parsed, root <{}>", file.filename, root);
            metadata.insert("root", root);
            pretty
        }
        Err(e) => {
            warn!("XML '{}' is not well-formed, embedding raw text: {}", file.filename, e);
            metadata.insert("error", e);
            text.trim_end().to_string()
        }
    };

    Ok(ConversionResult::new(
        format!("# {}\n\n```xml\n{}\n```", file.filename, body),
        metadata,
        CONTENT_TYPE,
    ))
}

/// Re-serialize `text` with indentation; returns the output and root name.
fn pretty_print(text: &str) -> Result<(String, String), String> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    let mut depth = 0usize;
    let mut root: Option<String> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| format!("{} at position {}", e, reader.error_position()))?;

        match &event {
            Event::Start(e) | Event::Empty(e) => {
                if depth == 0 {
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    if let Some(first) = &root {
                        return Err(format!("multiple root elements: <{first}> and <{name}>"));
                    }
                    root = Some(name);
                }
                if matches!(event, Event::Start(_)) {
                    depth += 1;
                }
            }
            Event::End(e) => {
                if depth == 0 {
                    return Err(format!(
                        "unexpected closing tag </{}>",
                        String::from_utf8_lossy(e.name().as_ref())
                    ));
                }
                depth -= 1;
            }
            Event::Text(t) if depth == 0 => {
                if t.iter().any(|b| !b.is_ascii_whitespace()) {
                    return Err("text outside the root element".to_string());
                }
            }
            Event::CData(_) if depth == 0 => {
                return Err("CDATA outside the root element".to_string());
            }
            Event::Eof => break,
            _ => {}
        }

        writer.write_event(event).map_err(|e| e.to_string())?;
    }

    if depth > 0 {
        return Err(format!("unexpected end of input: {depth} unclosed element(s)"));
    }
    let root = root.ok_or_else(|| "no root element".to_string())?;
    let pretty = String::from_utf8(writer.into_inner().into_inner()).map_err(|e| e.to_string())?;
    Ok((pretty, root))
}
