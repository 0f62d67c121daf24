//! Configuration types for document-to-Markdown conversion.
//!
//! Every threshold the converters apply lives in [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. The numbers (size ceilings, row caps,
//! excerpt lengths) are policy, not law: hosts with tighter response budgets
//! can lower them without touching converter code.

use crate::error::ConvertError;
use serde::{Deserialize, Serialize};

/// One mebibyte, the unit every size limit is expressed in.
pub const MIB: u64 = 1024 * 1024;

/// Configuration for a single conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use edgequake_doc2md::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .max_file_size(5 * 1024 * 1024)
///     .sheet_row_limit(50)
///     .build()
///     .unwrap();
/// assert_eq!(config.sheet_row_limit, 50);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// Upload ceiling in bytes. Default: 20 MiB.
    ///
    /// Checked before any converter runs; larger uploads are rejected with
    /// [`ConvertError::FileTooLarge`].
    pub max_file_size: u64,

    /// Images strictly smaller than this are embedded as a data-URI. Default: 1 MiB.
    ///
    /// Larger images only get a size notice so response payloads stay bounded.
    pub image_preview_limit: u64,

    /// Maximum table body rows emitted per worksheet. Default: 100.
    ///
    /// Full row counts are still reported in `metadata.sheets`.
    pub sheet_row_limit: usize,

    /// Characters of raw text echoed back when JSON fails to parse. Default: 1000.
    pub json_excerpt_chars: usize,

    /// Characters of a sniffed-as-text unknown file shown in the body. Default: 10 000.
    pub unknown_text_chars: usize,

    /// Fraction of control characters above which decodable text is still
    /// treated as binary. Default: 0.1.
    pub binary_control_ratio: f64,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            max_file_size: 20 * MIB,
            image_preview_limit: MIB,
            sheet_row_limit: 100,
            json_excerpt_chars: 1000,
            unknown_text_chars: 10_000,
            binary_control_ratio: 0.1,
        }
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }

    /// The upload ceiling in MiB, as reported by the discovery envelope.
    pub fn max_file_size_mib(&self) -> f64 {
        self.max_file_size as f64 / MIB as f64
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn max_file_size(mut self, bytes: u64) -> Self {
        self.config.max_file_size = bytes;
        self
    }

    pub fn image_preview_limit(mut self, bytes: u64) -> Self {
        self.config.image_preview_limit = bytes;
        self
    }

    pub fn sheet_row_limit(mut self, rows: usize) -> Self {
        self.config.sheet_row_limit = rows.max(1);
        self
    }

    pub fn json_excerpt_chars(mut self, chars: usize) -> Self {
        self.config.json_excerpt_chars = chars;
        self
    }

    pub fn unknown_text_chars(mut self, chars: usize) -> Self {
        self.config.unknown_text_chars = chars.max(1);
        self
    }

    pub fn binary_control_ratio(mut self, ratio: f64) -> Self {
        self.config.binary_control_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, ConvertError> {
        let c = &self.config;
        if c.max_file_size == 0 {
            return Err(ConvertError::InvalidConfig(
                "max_file_size must be > 0".into(),
            ));
        }
        if c.image_preview_limit > c.max_file_size {
            return Err(ConvertError::InvalidConfig(format!(
                "image_preview_limit ({}) cannot exceed max_file_size ({})",
                c.image_preview_limit, c.max_file_size
            )));
        }
        if !c.binary_control_ratio.is_finite() {
            return Err(ConvertError::InvalidConfig(
                "binary_control_ratio must be a finite number".into(),
            ));
        }
        Ok(self.config)
    }
}
