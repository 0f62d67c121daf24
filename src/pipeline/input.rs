//! Input handling: the rewindable upload stream.
//!
//! ## Why `Read + Seek` rather than a byte slice or a one-shot reader?
//!
//! The orchestrator probes the size (seek to end, read the offset) before it
//! decides whether to convert at all, and the chosen converter then reads the
//! whole stream. Both inspections must leave the stream at offset 0 so a host
//! can hand the same upload to something else afterwards (storage, a second
//! converter, an AI summary). Bounding `R: Read + Seek` makes that contract
//! part of the type instead of a convention.

use std::borrow::Cow;
use std::io::{self, Cursor, Read, Seek, SeekFrom};
use std::path::Path;
use tracing::debug;

/// Content type reported when the client declared none.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// An uploaded artifact: a rewindable stream plus what the client declared.
#[derive(Debug)]
pub struct Upload<R = Cursor<Vec<u8>>> {
    filename: String,
    content_type: Option<String>,
    reader: R,
}

impl Upload<Cursor<Vec<u8>>> {
    /// Wrap an in-memory buffer.
    pub fn from_bytes(
        bytes: impl Into<Vec<u8>>,
        content_type: Option<&str>,
        filename: impl Into<String>,
    ) -> Self {
        Upload::new(Cursor::new(bytes.into()), content_type, filename)
    }
}

impl<R: Read + Seek> Upload<R> {
    /// Wrap any seekable reader. An empty declared type counts as absent.
    pub fn new(reader: R, content_type: Option<&str>, filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type
                .map(str::trim)
                .filter(|ct| !ct.is_empty())
                .map(str::to_string),
            reader,
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Size in bytes via an end-of-stream probe; the stream is rewound after.
    pub fn probe_size(&mut self) -> io::Result<u64> {
        let size = self.reader.seek(SeekFrom::End(0))?;
        self.reader.rewind()?;
        debug!("Probed upload '{}': {} bytes", self.filename, size);
        Ok(size)
    }

    /// Read the full content from the start; the stream is rewound after.
    pub fn read_source(&mut self) -> io::Result<SourceFile> {
        self.reader.rewind()?;
        let mut bytes = Vec::new();
        self.reader.read_to_end(&mut bytes)?;
        self.reader.rewind()?;
        Ok(SourceFile {
            filename: self.filename.clone(),
            content_type: self.content_type.clone(),
            bytes,
        })
    }

    /// Current stream offset (0 after any inspection).
    pub fn position(&mut self) -> io::Result<u64> {
        self.reader.stream_position()
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

/// The fully read upload handed to a converter.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl SourceFile {
    pub fn new(bytes: Vec<u8>, content_type: Option<&str>, filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.map(str::to_string),
            bytes,
        }
    }

    /// Exact byte length of the content read; what `metadata.size` reports.
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Declared type, or `application/octet-stream` when none was given.
    pub fn content_type_or_default(&self) -> &str {
        self.content_type.as_deref().unwrap_or(OCTET_STREAM)
    }

    /// UTF-8 decode, replacing invalid sequences with U+FFFD.
    pub fn text_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }
}

/// Guess a content type from a file path's extension.
pub fn guess_content_type(path: &Path) -> Option<String> {
    mime_guess::from_path(path).first().map(|m| m.essence_str().to_string())
}

/// Size in MiB with two decimals, the unit used by every size notice.
pub fn format_mib(bytes: usize) -> String {
    format!("{:.2}", bytes as f64 / 1024.0 / 1024.0)
}
