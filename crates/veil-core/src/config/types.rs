//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::codec::KeyDerivation;

/// Processing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Number of images transformed concurrently
    pub parallel_workers: usize,

    /// Input extensions picked up by directory discovery
    pub supported_formats: Vec<String>,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            parallel_workers: 4,
            supported_formats: vec![
                "png".to_string(),
                "jpg".to_string(),
                "jpeg".to_string(),
                "webp".to_string(),
                "bmp".to_string(),
                "gif".to_string(),
                "tiff".to_string(),
                "tif".to_string(),
            ],
        }
    }
}

/// Resource limits to protect against problematic inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum file size in megabytes
    pub max_file_size_mb: u64,

    /// Maximum image dimension (width or height)
    pub max_image_dimension: u32,

    /// Decode timeout in milliseconds
    pub decode_timeout_ms: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 100,
            max_image_dimension: 20000,
            decode_timeout_ms: 10000,
        }
    }
}

/// Codec settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// How the password becomes the codec key ("raw" or "sha256")
    pub key_derivation: KeyDerivation,

    /// Convert 16-bit and float images to 8-bit instead of rejecting them
    pub convert_high_bit_depth: bool,
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for transformed images. Empty means next to the input.
    pub dir: PathBuf,

    /// Suffix appended to the file stem when encoding
    pub encode_suffix: String,

    /// Suffix appended to the file stem when decoding
    pub decode_suffix: String,

    /// Replace existing output files
    pub overwrite: bool,

    /// Report format ("json" or "jsonl")
    pub format: String,

    /// Pretty-print JSON reports
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::new(),
            encode_suffix: ".veiled".to_string(),
            decode_suffix: ".unveiled".to_string(),
            overwrite: false,
            format: "json".to_string(),
            pretty: false,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
