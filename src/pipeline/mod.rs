//! Shared pipeline stages used around the per-format converters.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ classify ──▶ converter ──▶ normalize ──▶ envelope
//! (Upload)  (formats)    (converters)  (text only)   (envelope)
//! ```
//!
//! 1. [`input`]     — the rewindable upload: size probe and full read, both
//!    leaving the stream at offset 0
//! 2. [`normalize`] — deterministic whitespace / control-character cleanup
//!    for converters that extract raw text (PDF)
//! 3. [`encode`]    — base64 data-URIs for image previews

pub mod encode;
pub mod input;
pub mod normalize;
