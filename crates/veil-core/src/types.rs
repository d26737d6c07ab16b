//! Core data types for the Veil processing pipeline.
//!
//! These types describe the outcome of running a file through the codec and
//! are what the CLI serializes into JSON/JSONL reports.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::codec::{Direction, PixelFormat};

/// The result of transforming one image file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformRecord {
    // === File Identification ===
    /// Path of the source file
    pub input_path: PathBuf,

    /// Path the transformed PNG was written to
    pub output_path: PathBuf,

    /// Just the filename portion of the input
    pub file_name: String,

    // === Transform ===
    /// Whether the image was encoded or decoded
    pub direction: Direction,

    /// Image width in pixels
    pub width: u32,

    /// Image height in pixels
    pub height: u32,

    /// Channel layout the codec operated on
    pub pixel_format: PixelFormat,

    /// Detected format of the source file ("jpeg", "png", ...)
    pub source_format: String,

    /// Whether a high bit-depth source was converted to 8-bit first
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub converted: bool,

    // === Output ===
    /// Size of the written PNG in bytes
    pub output_size: u64,

    /// BLAKE3 hash of the written PNG
    pub content_hash: String,

    /// Wall-clock time spent on this file
    pub elapsed_ms: u64,
}

/// A file the pipeline could not transform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedFile {
    /// Path of the source file
    pub input_path: PathBuf,

    /// Human-readable failure reason
    pub error: String,
}

/// One line of a batch report.
/// Internally tagged: `{"status":"ok",...}` or `{"status":"failed",...}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum OutputRecord {
    Ok(Box<TransformRecord>),
    Failed(FailedFile),
}

/// Processing statistics for a batch run.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProcessingStats {
    /// Total images transformed successfully
    pub succeeded: usize,

    /// Total images that failed
    pub failed: usize,

    /// Total bytes written
    pub bytes_written: u64,

    /// Processing rate in images per second
    pub images_per_second: f64,

    /// Total processing time in seconds
    pub total_seconds: f64,
}
