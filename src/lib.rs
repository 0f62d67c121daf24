//! # edgequake-doc2md
//!
//! Convert uploaded documents to Markdown: PDF, Word, Excel, HTML, CSV,
//! JSON, XML, images and plain text, with a text/binary fallback for
//! anything else.
//!
//! ## Pipeline Overview
//!
//! ```text
//! Upload (Read + Seek)
//!  │
//!  ├─ 1. Validate  size probe against max_file_size, stream rewound
//!  ├─ 2. Classify  exact MIME match against the static format table
//!  ├─ 3. Convert   exactly one format converter (blocking pool when async)
//!  └─ 4. Respond   ConversionResult, or a camelCase JSON envelope
//! ```
//!
//! Damaged content degrades instead of failing: malformed JSON or XML, odd
//! Word markup and undecodable images still produce a result, with the
//! problem recorded in `metadata.error` / `metadata.messages`
//! (see [`ConversionResult::diagnostic`]).
//!
//! ## Quick Start
//!
//! ```rust
//! use edgequake_doc2md::{convert_bytes, ConversionConfig};
//!
//! let config = ConversionConfig::default();
//! let result = convert_bytes(
//!     b"name,qty\npen,3\n".to_vec(),
//!     Some("text/csv"),
//!     "stock.csv",
//!     &config,
//! )
//! .unwrap();
//! assert!(result.markdown().contains("| name | qty |"));
//! ```
//!
//! Async hosts use [`convert`], which runs the converter on tokio's blocking
//! pool:
//!
//! ```rust,no_run
//! use edgequake_doc2md::{convert_file, ConversionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let result = convert_file("report.pdf", None, &ConversionConfig::default()).await?;
//!     println!("{}", result.markdown());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `doc2md` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! edgequake-doc2md = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod converters;
pub mod envelope;
pub mod error;
pub mod formats;
pub mod output;
pub mod pipeline;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder};
pub use convert::{convert, convert_bytes, convert_file, convert_sync, convert_to_file, Orchestrator};
pub use converters::{Dispatch, FormatDispatcher};
pub use envelope::{supported_formats, Envelope, ErrorEnvelope, FormatsEnvelope, SuccessEnvelope};
pub use error::{ConvertError, ErrorTier};
pub use formats::{FormatKind, SUPPORTED_FORMATS};
pub use output::{ConversionResult, MetaValue, Metadata, SheetSummary};
pub use pipeline::input::{SourceFile, Upload};
