//! Error types for the edgequake-doc2md library.
//!
//! Only **fatal** failures are errors. A [`ConvertError`] means no
//! [`crate::output::ConversionResult`] could be produced at all. There are two
//! tiers:
//!
//! * **Client** — the request itself is unacceptable (no file, file too
//!   large). Detected before any converter runs; never retried.
//!
//! * **Server** — a converter's underlying library could not read the file at
//!   all (corrupt PDF, not a zip container, unreadable workbook). Conversion
//!   is deterministic, so retrying the same bytes cannot succeed.
//!
//! Recoverable damage inside the content (invalid JSON syntax, broken XML,
//! odd Word sub-elements) is *not* an error: the converter returns a normal
//! result and records the problem in `metadata.error` or `metadata.messages`.

use std::path::PathBuf;
use thiserror::Error;

/// Which side of the boundary a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorTier {
    /// Bad input from the caller (HTTP 400 equivalent).
    Client,
    /// The conversion itself failed (HTTP 500 equivalent).
    Server,
}

/// All fatal errors returned by the edgequake-doc2md library.
#[derive(Debug, Error)]
pub enum ConvertError {
    // ── Validation errors ─────────────────────────────────────────────────
    /// The request carried no file part.
    #[error("No file uploaded")]
    MissingFile,

    /// The upload exceeds the configured ceiling.
    #[error("File size exceeds {limit_mib} MiB")]
    FileTooLarge { size: u64, limit: u64, limit_mib: f64 },

    // ── Conversion errors ─────────────────────────────────────────────────
    /// A format-specific library could not parse the file at all.
    #[error("Error converting {format}: {detail}")]
    Conversion { format: &'static str, detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Reading the upload stream or an input file failed.
    #[error("Failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not create or write the output Markdown file.
    #[error("Failed to write output file '{}': {source}", path.display())]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ConvertError {
    /// Shorthand for a converter failure with the library's message attached.
    pub fn conversion(format: &'static str, detail: impl ToString) -> Self {
        ConvertError::Conversion {
            format,
            detail: detail.to_string(),
        }
    }

    /// Build a [`ConvertError::FileTooLarge`] for the given size and ceiling.
    pub fn too_large(size: u64, limit: u64) -> Self {
        ConvertError::FileTooLarge {
            size,
            limit,
            limit_mib: limit as f64 / 1024.0 / 1024.0,
        }
    }

    /// Classify the error into the client/server tier.
    pub fn tier(&self) -> ErrorTier {
        match self {
            ConvertError::MissingFile
            | ConvertError::FileTooLarge { .. }
            | ConvertError::InvalidConfig(_) => ErrorTier::Client,
            ConvertError::Conversion { .. }
            | ConvertError::Io { .. }
            | ConvertError::OutputWriteFailed { .. }
            | ConvertError::Internal(_) => ErrorTier::Server,
        }
    }

    /// HTTP-equivalent status code for the envelope.
    pub fn status_code(&self) -> u16 {
        match self.tier() {
            ErrorTier::Client => 400,
            ErrorTier::Server => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_large_message_carries_ceiling() {
        let e = ConvertError::too_large(25 * 1024 * 1024, 20 * 1024 * 1024);
        let msg = e.to_string();
        assert!(msg.contains("20"), "got: {msg}");
        assert_eq!(e.status_code(), 400);
    }

    #[test]
    fn missing_file_is_client_tier() {
        assert_eq!(ConvertError::MissingFile.tier(), ErrorTier::Client);
        assert_eq!(ConvertError::MissingFile.to_string(), "No file uploaded");
    }

    #[test]
    fn conversion_display_and_tier() {
        let e = ConvertError::conversion("PDF", "invalid file header");
        assert_eq!(e.to_string(), "Error converting PDF: invalid file header");
        assert_eq!(e.tier(), ErrorTier::Server);
        assert_eq!(e.status_code(), 500);
    }

    #[test]
    fn io_display_includes_path() {
        let e = ConvertError::Io {
            path: PathBuf::from("/tmp/missing.pdf"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        let msg = e.to_string();
        assert!(msg.contains("/tmp/missing.pdf"));
        assert!(msg.contains("gone"));
    }
}
