//! Input validation before decoding.

use std::io::Read;
use std::path::Path;

use crate::config::LimitsConfig;
use crate::error::PipelineError;

/// Number of leading bytes inspected for a format signature.
const HEADER_LEN: usize = 12;

/// Validates files before they are decoded.
pub struct Validator {
    limits: LimitsConfig,
}

impl Validator {
    /// Create a new validator with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Quick checks before a full decode.
    ///
    /// Returns the container name sniffed from the file header.
    pub fn validate(&self, path: &Path) -> Result<&'static str, PipelineError> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PipelineError::FileNotFound(path.to_path_buf())
            } else {
                PipelineError::Decode {
                    path: path.to_path_buf(),
                    message: format!("Cannot read metadata: {}", e),
                }
            }
        })?;

        let max_bytes = self.limits.max_file_size_mb * 1024 * 1024;
        if metadata.len() > max_bytes {
            return Err(PipelineError::FileTooLarge {
                path: path.to_path_buf(),
                size_mb: metadata.len() / (1024 * 1024),
                max_mb: self.limits.max_file_size_mb,
            });
        }

        self.read_signature(path)
    }

    fn read_signature(&self, path: &Path) -> Result<&'static str, PipelineError> {
        let mut file = std::fs::File::open(path).map_err(|e| PipelineError::Decode {
            path: path.to_path_buf(),
            message: format!("Cannot open file: {}", e),
        })?;

        let mut header = [0u8; HEADER_LEN];
        let bytes_read = file.read(&mut header).unwrap_or(0);

        if bytes_read < 4 {
            return Err(PipelineError::Decode {
                path: path.to_path_buf(),
                message: "File too small to be a valid image".to_string(),
            });
        }

        sniff_container(&header[..bytes_read]).ok_or_else(|| PipelineError::Decode {
            path: path.to_path_buf(),
            message: "Unrecognized image format (invalid magic bytes)".to_string(),
        })
    }
}

/// Name the container format from its leading bytes.
pub fn sniff_container(header: &[u8]) -> Option<&'static str> {
    match header {
        [0xFF, 0xD8, 0xFF, ..] => Some("jpeg"),
        [0x89, b'P', b'N', b'G', ..] => Some("png"),
        [b'G', b'I', b'F', b'8', ..] => Some("gif"),
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some("webp"),
        // Truncated RIFF header; let the decoder decide
        [b'R', b'I', b'F', b'F', rest @ ..] if rest.len() < 8 => Some("webp"),
        [b'B', b'M', ..] => Some("bmp"),
        [b'I', b'I', 0x2A, 0x00, ..] | [b'M', b'M', 0x00, 0x2A, ..] => Some("tiff"),
        [_, _, _, _, b'f', b't', b'y', b'p', ..] => Some("avif"),
        _ => None,
    }
}
