//! Error types for the Veil codec and processing pipeline.
//!
//! Errors are organized by layer: the pure codec reports shape problems,
//! the pipeline reports per-file failures with the offending path attached.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for Veil operations.
#[derive(Error, Debug)]
pub enum VeilError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Codec errors raised outside of a file context
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// Pipeline processing errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Errors from the pixel-permutation codec.
///
/// All of these are detected before any pixel is moved.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Width or height is zero
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Channel layout the codec does not handle
    #[error("Unsupported pixel format: {0}")]
    UnsupportedPixelFormat(String),

    /// Rows of differing length were supplied
    #[error("Non-rectangular pixel grid: row {row} has {found} pixels, expected {expected}")]
    NonRectangular {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Raw buffer length does not match width * height * channels
    #[error("Pixel buffer has {found} bytes, expected {expected}")]
    BufferSizeMismatch { expected: usize, found: usize },
}

/// Pipeline processing errors, organized by stage.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Image decoding failed
    #[error("Decode error for {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// PNG encoding failed
    #[error("Encode error for {path}: {message}")]
    Encode { path: PathBuf, message: String },

    /// The codec rejected the decoded image
    #[error("Codec error for {path}: {source}")]
    Codec {
        path: PathBuf,
        #[source]
        source: CodecError,
    },

    /// Operation timed out
    #[error("Timeout in {stage} stage for {path} after {timeout_ms}ms")]
    Timeout {
        path: PathBuf,
        stage: String,
        timeout_ms: u64,
    },

    /// File exceeds size limit
    #[error("File too large: {path} ({size_mb}MB > {max_mb}MB)")]
    FileTooLarge {
        path: PathBuf,
        size_mb: u64,
        max_mb: u64,
    },

    /// Image dimensions exceed limit
    #[error("Image too large: {path} ({width}x{height} > {max_dim})")]
    ImageTooLarge {
        path: PathBuf,
        width: u32,
        height: u32,
        max_dim: u32,
    },

    /// Unsupported image format
    #[error("Unsupported format for {path}: {format}")]
    UnsupportedFormat { path: PathBuf, format: String },

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Output file exists and overwriting is disabled
    #[error("Output already exists: {0} (enable output.overwrite to replace it)")]
    OutputExists(PathBuf),

    /// Writing the output file failed
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience type alias for Veil results.
pub type Result<T> = std::result::Result<T, VeilError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

/// Convenience type alias for codec results.
pub type CodecResult<T> = std::result::Result<T, CodecError>;
