//! Conversion entry points and the per-request orchestrator.
//!
//! ```text
//! received ──▶ validated ──▶ classified ──▶ converted ──▶ formatted
//!     │            │                            │
//!     └────────────┴──────────── failed ◀───────┘
//! ```
//!
//! Validation (missing file, size ceiling) happens before classification,
//! so an oversized upload never reaches a converter.

use crate::config::ConversionConfig;
use crate::converters::{Dispatch, FormatDispatcher};
use crate::envelope::{Envelope, SuccessEnvelope};
use crate::error::ConvertError;
use crate::formats::source_format;
use crate::output::ConversionResult;
use crate::pipeline::input::{guess_content_type, Upload};
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Validates, classifies and converts uploads with a fixed configuration.
///
/// Holds no per-request state: one instance can serve any number of
/// concurrent requests.
#[derive(Debug, Clone)]
pub struct Orchestrator<D = FormatDispatcher> {
    config: ConversionConfig,
    dispatcher: D,
}

impl Orchestrator<FormatDispatcher> {
    pub fn new(config: ConversionConfig) -> Self {
        Self::with_dispatcher(config, FormatDispatcher)
    }
}

impl Default for Orchestrator<FormatDispatcher> {
    fn default() -> Self {
        Self::new(ConversionConfig::default())
    }
}

impl<D: Dispatch> Orchestrator<D> {
    /// Use a custom [`Dispatch`] implementation instead of the built-in table.
    pub fn with_dispatcher(config: ConversionConfig, dispatcher: D) -> Self {
        Self { config, dispatcher }
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    /// Convert one upload. The stream is left at offset 0 on every path.
    ///
    /// # Errors
    /// * [`ConvertError::FileTooLarge`] before any classification or dispatch.
    /// * [`ConvertError::Io`] when the stream cannot be sized or read.
    /// * Whatever fatal error the selected converter returns.
    pub fn convert<R: Read + Seek>(&self, upload: &mut Upload<R>) -> Result<ConversionResult, ConvertError> {
        let start = Instant::now();
        let filename = upload.filename().to_string();
        let io_error = |source: std::io::Error| ConvertError::Io {
            path: PathBuf::from(&filename),
            source,
        };

        // ── Step 1: Validate ─────────────────────────────────────────────────
        let size = upload.probe_size().map_err(io_error)?;
        info!(
            "Converting '{}' ({}, {} bytes)",
            upload.filename(),
            upload.content_type().unwrap_or("no content type"),
            size
        );
        if size > self.config.max_file_size {
            warn!(
                "Rejecting '{}': {} bytes exceeds the {} byte ceiling",
                upload.filename(),
                size,
                self.config.max_file_size
            );
            return Err(ConvertError::too_large(size, self.config.max_file_size));
        }

        // ── Step 2: Classify ─────────────────────────────────────────────────
        let kind = self.dispatcher.classify(upload.content_type());
        debug!("Classified '{}' as {:?}", upload.filename(), kind);

        // ── Step 3: Convert ──────────────────────────────────────────────────
        let source = upload.read_source().map_err(io_error)?;
        let result = self.dispatcher.dispatch(kind, &source, &self.config)?;

        if let Some(problem) = result.diagnostic() {
            warn!("'{}' converted with problems: {}", source.filename, problem);
        }
        info!(
            "Converted '{}' as {} → {} chars of markdown in {}ms",
            source.filename,
            kind,
            result.markdown().len(),
            start.elapsed().as_millis()
        );
        Ok(result)
    }

    /// Convert and wrap the outcome in the boundary envelope.
    ///
    /// `None` models a request without a file part.
    pub fn respond<R: Read + Seek>(&self, upload: Option<&mut Upload<R>>) -> Envelope {
        let Some(upload) = upload else {
            warn!("Request carried no file");
            return Envelope::from(ConvertError::MissingFile);
        };

        match self.convert(upload) {
            Ok(result) => {
                let format = source_format(upload.content_type());
                Envelope::Success(Box::new(SuccessEnvelope::new(result, format)))
            }
            Err(e) => {
                error!("Conversion of '{}' failed: {}", upload.filename(), e);
                Envelope::from(e)
            }
        }
    }
}

/// Convert an upload on the blocking thread pool.
///
/// Converters are CPU-bound; this keeps them off the async executor.
pub async fn convert<R>(upload: Upload<R>, config: &ConversionConfig) -> Result<ConversionResult, ConvertError>
where
    R: Read + Seek + Send + 'static,
{
    let orchestrator = Orchestrator::new(config.clone());
    tokio::task::spawn_blocking(move || {
        let mut upload = upload;
        orchestrator.convert(&mut upload)
    })
    .await
    .map_err(|e| ConvertError::Internal(format!("Conversion task failed: {e}")))?
}

/// Synchronous conversion on the calling thread.
pub fn convert_sync<R: Read + Seek>(
    upload: &mut Upload<R>,
    config: &ConversionConfig,
) -> Result<ConversionResult, ConvertError> {
    Orchestrator::new(config.clone()).convert(upload)
}

/// Convert an in-memory buffer.
pub fn convert_bytes(
    bytes: impl Into<Vec<u8>>,
    content_type: Option<&str>,
    filename: &str,
    config: &ConversionConfig,
) -> Result<ConversionResult, ConvertError> {
    let mut upload = Upload::from_bytes(bytes, content_type, filename);
    convert_sync(&mut upload, config)
}

/// Convert a file on disk.
///
/// Without an explicit `content_type` the type is guessed from the file
/// extension; unguessable files go to the fallback converter. The file is
/// streamed through the size probe, so an oversized input is rejected
/// without being read.
pub async fn convert_file(
    path: impl AsRef<Path>,
    content_type: Option<&str>,
    config: &ConversionConfig,
) -> Result<ConversionResult, ConvertError> {
    let path = path.as_ref();
    let io_error = |source: std::io::Error| ConvertError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = tokio::fs::File::open(path).await.map_err(io_error)?.into_std().await;

    let content_type = content_type
        .map(str::to_string)
        .or_else(|| guess_content_type(path));
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    debug!("Opened {}", path.display());

    convert(Upload::new(file, content_type.as_deref(), filename), config).await
}

/// Convert a file and write its markdown to `output_path`.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn convert_to_file(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    content_type: Option<&str>,
    config: &ConversionConfig,
) -> Result<ConversionResult, ConvertError> {
    let result = convert_file(input_path, content_type, config).await?;
    let path = output_path.as_ref();
    let write_error = |source: std::io::Error| ConvertError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_error)?;
    }

    let tmp_path = path.with_extension("md.tmp");
    tokio::fs::write(&tmp_path, result.markdown())
        .await
        .map_err(write_error)?;
    tokio::fs::rename(&tmp_path, path).await.map_err(write_error)?;

    info!("Wrote {}", path.display());
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::FormatKind;
    use crate::pipeline::input::SourceFile;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Refusing {
        calls: AtomicUsize,
    }

    impl Dispatch for Refusing {
        fn dispatch(
            &self,
            _kind: FormatKind,
            _file: &SourceFile,
            _config: &ConversionConfig,
        ) -> Result<ConversionResult, ConvertError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(ConvertError::conversion("PDF", "corrupt xref table"))
        }
    }

    #[test]
    fn stream_is_rewound_after_conversion() {
        let mut up = Upload::from_bytes(b"hello".to_vec(), Some("text/plain"), "a.txt");
        let r = Orchestrator::default().convert(&mut up).unwrap();
        assert_eq!(up.position().unwrap(), 0);
        assert_eq!(r.metadata().get("size").and_then(|v| v.as_u64()), Some(5));
    }

    #[test]
    fn converter_error_becomes_server_envelope() {
        let orch = Orchestrator::with_dispatcher(ConversionConfig::default(), Refusing::default());
        let mut up = Upload::from_bytes(b"%PDF-".to_vec(), Some("application/pdf"), "x.pdf");
        let env = orch.respond(Some(&mut up));
        assert_eq!(env.status_code(), 500);
        assert_eq!(orch.dispatcher().calls.load(Ordering::SeqCst), 1);
        assert_eq!(up.position().unwrap(), 0);
    }

    #[test]
    fn missing_upload_is_client_error() {
        let env = Orchestrator::default().respond::<std::io::Cursor<Vec<u8>>>(None);
        assert_eq!(env.status_code(), 400);
    }

    #[test]
    fn size_at_ceiling_is_accepted() {
        let config = ConversionConfig::builder()
            .max_file_size(8)
            .image_preview_limit(4)
            .build()
            .unwrap();
        assert!(convert_bytes(b"12345678".to_vec(), Some("text/plain"), "a.txt", &config).is_ok());
        let err = convert_bytes(b"123456789".to_vec(), Some("text/plain"), "a.txt", &config).unwrap_err();
        assert!(matches!(err, ConvertError::FileTooLarge { size: 9, limit: 8, .. }));
    }

    #[tokio::test]
    async fn oversized_file_on_disk_is_rejected_unread() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("huge.txt");
        let file = std::fs::File::create(&path).unwrap();
        file.set_len(64 * 1024 * 1024).unwrap();

        let err = convert_file(&path, None, &ConversionConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ConvertError::FileTooLarge { size, limit, .. }
                if size == 64 * 1024 * 1024 && limit == 20 * 1024 * 1024
        ));
    }

    #[tokio::test]
    async fn async_convert_runs_on_blocking_pool() {
        let up = Upload::from_bytes(br#"{"k": 1}"#.to_vec(), Some("application/json"), "k.json");
        let r = convert(up, &ConversionConfig::default()).await.unwrap();
        assert!(r.markdown().contains("```json"));
    }
}
