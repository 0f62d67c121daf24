//! JSON response envelopes at the service boundary.
//!
//! Key names are camelCase on the wire. The HTTP-equivalent status travels
//! with the envelope for hosts that need it but is never serialised.

use crate::config::ConversionConfig;
use crate::error::{ConvertError, ErrorTier};
use crate::formats::SUPPORTED_FORMATS;
use crate::output::{ConversionResult, Metadata};
use serde::Serialize;

pub const SUCCESS_MESSAGE: &str = "File converted successfully";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessEnvelope {
    pub success: bool,
    pub message: String,
    /// The markdown wrapped in a ```` ```markdown ```` fence for display.
    pub markdown_content: String,
    pub raw_markdown: String,
    pub metadata: Metadata,
    pub preview: Option<String>,
    pub source_format: String,
}

impl SuccessEnvelope {
    pub fn new(result: ConversionResult, source_format: &str) -> Self {
        let (markdown, metadata, _, preview) = result.into_parts();
        Self {
            success: true,
            message: SUCCESS_MESSAGE.to_string(),
            markdown_content: format!("```markdown\n{markdown}\n```"),
            raw_markdown: markdown,
            metadata,
            preview,
            source_format: source_format.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub error: String,
    #[serde(skip)]
    pub status: u16,
}

impl From<&ConvertError> for ErrorEnvelope {
    /// Client-tier messages pass through; converter failures are prefixed.
    fn from(err: &ConvertError) -> Self {
        let error = match err.tier() {
            ErrorTier::Client => err.to_string(),
            ErrorTier::Server => format!("Failed to convert file: {err}"),
        };
        Self {
            success: false,
            error,
            status: err.status_code(),
        }
    }
}

/// Outcome of one conversion request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Envelope {
    Success(Box<SuccessEnvelope>),
    Error(ErrorEnvelope),
}

impl Envelope {
    pub fn is_success(&self) -> bool {
        matches!(self, Envelope::Success(_))
    }

    /// 200 on success, else the error's 400/500.
    pub fn status_code(&self) -> u16 {
        match self {
            Envelope::Success(_) => 200,
            Envelope::Error(e) => e.status,
        }
    }

    pub fn to_json(&self) -> Result<String, ConvertError> {
        serde_json::to_string_pretty(self).map_err(|e| ConvertError::Internal(e.to_string()))
    }
}

impl From<ConvertError> for Envelope {
    fn from(err: ConvertError) -> Self {
        Envelope::Error(ErrorEnvelope::from(&err))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormatDescriptor {
    pub mime: &'static str,
    pub extension: &'static str,
    pub description: String,
}

/// Discovery response listing every advertised content type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatsEnvelope {
    pub success: bool,
    pub formats: Vec<FormatDescriptor>,
    pub max_file_size: u64,
    #[serde(rename = "maxFileSizeMB")]
    pub max_file_size_mb: f64,
}

pub fn supported_formats(config: &ConversionConfig) -> FormatsEnvelope {
    let formats = SUPPORTED_FORMATS
        .iter()
        .map(|entry| FormatDescriptor {
            mime: entry.mime,
            extension: entry.extension,
            description: format!("{} files", entry.extension.to_uppercase()),
        })
        .collect();

    FormatsEnvelope {
        success: true,
        formats,
        max_file_size: config.max_file_size,
        max_file_size_mb: config.max_file_size_mib(),
    }
}
