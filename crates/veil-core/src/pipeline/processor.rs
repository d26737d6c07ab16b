//! Pipeline orchestration - wires together all processing stages.

use image::DynamicImage;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::codec::grid::{is_eight_bit, to_eight_bit};
use crate::codec::{Direction, KeyedPermutationCodec, PasswordKey, PixelFormat};
use crate::config::Config;
use crate::error::{CodecError, PipelineError, PipelineResult};
use crate::types::TransformRecord;

use super::decode::ImageDecoder;
use super::discovery::{DiscoveredFile, FileDiscovery};
use super::encode::{encode_png, OutputPlanner};
use super::hash::Hasher;
use super::validate::Validator;

/// Runs single files through validate → decode → codec → PNG → write.
///
/// Cheap to share behind an `Arc`; all stages are stateless apart from
/// configuration.
pub struct ImageTransformer {
    codec: Arc<KeyedPermutationCodec>,
    decoder: ImageDecoder,
    validator: Validator,
    planner: OutputPlanner,
    config: Config,
}

impl ImageTransformer {
    /// Create a transformer keyed by `password`, derived per `codec.key_derivation`.
    pub fn new(config: &Config, password: &str) -> Self {
        let key = PasswordKey::derive(password, config.codec.key_derivation);
        Self::with_codec(config, KeyedPermutationCodec::new(key))
    }

    /// Create a transformer around an existing codec.
    pub fn with_codec(config: &Config, codec: KeyedPermutationCodec) -> Self {
        Self {
            codec: Arc::new(codec),
            decoder: ImageDecoder::new(config.limits.clone()),
            validator: Validator::new(config.limits.clone()),
            planner: OutputPlanner::from_config(config),
            config: config.clone(),
        }
    }

    /// Output suffix for a direction.
    pub fn suffix(&self, direction: Direction) -> &str {
        match direction {
            Direction::Encode => &self.config.output.encode_suffix,
            Direction::Decode => &self.config.output.decode_suffix,
        }
    }

    /// Where the output for `input` would be written.
    pub fn output_path(&self, input: &Path, direction: Direction) -> PathBuf {
        self.planner.output_path(input, self.suffix(direction))
    }

    /// Discover inputs at a path, skipping earlier outputs of `direction`.
    pub fn discover(&self, path: &Path, direction: Direction) -> Vec<DiscoveredFile> {
        FileDiscovery::new(self.config.processing.clone())
            .skip_suffix(self.suffix(direction))
            .discover(path)
    }

    /// Transform one image file and write the PNG result.
    pub async fn transform(
        &self,
        path: &Path,
        direction: Direction,
    ) -> PipelineResult<TransformRecord> {
        let start = Instant::now();
        tracing::debug!("{} {:?}", direction, path);

        let output_path = self.output_path(path, direction);
        self.planner.check_target(&output_path)?;

        let container = self.validator.validate(path)?;
        tracing::trace!("  Validate: {:?} ({})", start.elapsed(), container);

        let decode_start = Instant::now();
        let decoded = self.decoder.decode(path).await?;
        tracing::trace!(
            "  Decode: {:?} ({} bytes)",
            decode_start.elapsed(),
            decoded.file_size
        );

        let (image, converted) = self.prepare(decoded.image, path)?;

        let codec_start = Instant::now();
        let codec = self.codec.clone();
        let task_path = path.to_path_buf();
        let (png, pixel_format) = tokio::task::spawn_blocking(move || {
            transform_to_png(&codec, &image, direction, &task_path)
        })
        .await
        .map_err(|e| PipelineError::Encode {
            path: path.to_path_buf(),
            message: format!("Task join error: {}", e),
        })??;
        tracing::trace!("  Codec + PNG: {:?}", codec_start.elapsed());

        self.planner.write(&output_path, &png).await?;
        let content_hash = Hasher::content_hash_from_bytes(&png);

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();

        let elapsed = start.elapsed();
        tracing::debug!(
            "{} {:?} -> {:?} in {:?} ({}x{})",
            direction,
            file_name,
            output_path,
            elapsed,
            decoded.width,
            decoded.height
        );

        Ok(TransformRecord {
            input_path: path.to_path_buf(),
            output_path,
            file_name,
            direction,
            width: decoded.width,
            height: decoded.height,
            pixel_format,
            source_format: container.to_string(),
            converted,
            output_size: png.len() as u64,
            content_hash,
            elapsed_ms: elapsed.as_millis() as u64,
        })
    }

    /// Bring a decoded image into an 8-bit layout the codec accepts.
    fn prepare(&self, image: DynamicImage, path: &Path) -> PipelineResult<(DynamicImage, bool)> {
        if is_eight_bit(&image) {
            return Ok((image, false));
        }
        if !self.config.codec.convert_high_bit_depth {
            return Err(PipelineError::Codec {
                path: path.to_path_buf(),
                source: CodecError::UnsupportedPixelFormat(format!("{:?}", image.color())),
            });
        }
        tracing::debug!("Converting {:?} from {:?} to 8-bit", path, image.color());
        Ok((to_eight_bit(&image), true))
    }
}

fn transform_to_png(
    codec: &KeyedPermutationCodec,
    image: &DynamicImage,
    direction: Direction,
    path: &Path,
) -> PipelineResult<(Vec<u8>, PixelFormat)> {
    let codec_err = |source| PipelineError::Codec {
        path: path.to_path_buf(),
        source,
    };
    let transformed = codec.apply_dynamic(image, direction).map_err(codec_err)?;
    let format = PixelFormat::from_channels(transformed.color().channel_count() as usize)
        .map_err(codec_err)?;
    let png = encode_png(&transformed, path)?;
    Ok((png, format))
}
