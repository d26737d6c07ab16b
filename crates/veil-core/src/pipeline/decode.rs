//! Reading and decoding input images off the async runtime.

use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader};
use std::io::{self, Cursor};
use std::path::Path;
use std::time::Duration;
use tokio::time::timeout;

use crate::config::LimitsConfig;
use crate::error::PipelineError;

/// Decodes image files within the configured limits.
pub struct ImageDecoder {
    limits: LimitsConfig,
}

/// A decoded input image.
pub struct DecodedImage {
    pub image: DynamicImage,
    pub width: u32,
    pub height: u32,
    /// Size of the encoded file in bytes
    pub file_size: u64,
}

impl ImageDecoder {
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Read `path` and decode it on the blocking pool.
    ///
    /// The format is taken from the content, so a misnamed file still
    /// decodes. Fails with `Timeout` after `limits.decode_timeout_ms` and with
    /// `ImageTooLarge` when either side exceeds `limits.max_image_dimension`.
    pub async fn decode(&self, path: &Path) -> Result<DecodedImage, PipelineError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| read_error(path, e))?;
        let file_size = bytes.len() as u64;

        let owned = path.to_path_buf();
        let task = tokio::task::spawn_blocking(move || decode_blocking(bytes, &owned));
        let budget = Duration::from_millis(self.limits.decode_timeout_ms);

        let image = match timeout(budget, task).await {
            Ok(Ok(decoded)) => decoded?,
            Ok(Err(join)) => {
                return Err(PipelineError::Decode {
                    path: path.to_path_buf(),
                    message: format!("Task join error: {}", join),
                })
            }
            Err(_) => {
                return Err(PipelineError::Timeout {
                    path: path.to_path_buf(),
                    stage: "decode".to_string(),
                    timeout_ms: self.limits.decode_timeout_ms,
                })
            }
        };

        let (width, height) = image.dimensions();
        let max_dim = self.limits.max_image_dimension;
        if width > max_dim || height > max_dim {
            return Err(PipelineError::ImageTooLarge {
                path: path.to_path_buf(),
                width,
                height,
                max_dim,
            });
        }

        Ok(DecodedImage {
            image,
            width,
            height,
            file_size,
        })
    }
}

fn read_error(path: &Path, e: io::Error) -> PipelineError {
    match e.kind() {
        io::ErrorKind::NotFound => PipelineError::FileNotFound(path.to_path_buf()),
        _ => PipelineError::Decode {
            path: path.to_path_buf(),
            message: format!("Cannot read file: {}", e),
        },
    }
}

/// Sniff and decode in-memory bytes, falling back to the extension when the
/// content has no recognizable signature.
fn decode_blocking(bytes: Vec<u8>, path: &Path) -> Result<DynamicImage, PipelineError> {
    let decode_err = |message: String| PipelineError::Decode {
        path: path.to_path_buf(),
        message,
    };

    let mut reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| decode_err(format!("Cannot detect image format: {}", e)))?;

    if reader.format().is_none() {
        let format = ImageFormat::from_path(path).map_err(|_| PipelineError::UnsupportedFormat {
            path: path.to_path_buf(),
            format: path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("unknown")
                .to_string(),
        })?;
        reader.set_format(format);
    }

    reader.decode().map_err(|e| decode_err(e.to_string()))
}
