//! Row-major 8-bit pixel grids and conversion to and from `image` buffers.

use image::{DynamicImage, GrayAlphaImage, GrayImage, RgbImage, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::error::{CodecError, CodecResult};

/// Channel layout of a [`PixelGrid`]. All layouts are 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixelFormat {
    Luma8,
    LumaA8,
    Rgb8,
    Rgba8,
}

impl PixelFormat {
    /// Bytes per pixel.
    pub fn channels(self) -> usize {
        match self {
            PixelFormat::Luma8 => 1,
            PixelFormat::LumaA8 => 2,
            PixelFormat::Rgb8 => 3,
            PixelFormat::Rgba8 => 4,
        }
    }

    /// Layout for a channel count.
    pub fn from_channels(channels: usize) -> CodecResult<Self> {
        match channels {
            1 => Ok(PixelFormat::Luma8),
            2 => Ok(PixelFormat::LumaA8),
            3 => Ok(PixelFormat::Rgb8),
            4 => Ok(PixelFormat::Rgba8),
            n => Err(CodecError::UnsupportedPixelFormat(format!(
                "{n} channels per pixel"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PixelFormat::Luma8 => "luma8",
            PixelFormat::LumaA8 => "lumaa8",
            PixelFormat::Rgb8 => "rgb8",
            PixelFormat::Rgba8 => "rgba8",
        }
    }
}

impl std::fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rectangular grid of pixels stored row-major, one byte per channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    width: u32,
    height: u32,
    format: PixelFormat,
    data: Vec<u8>,
}

impl PixelGrid {
    /// Wrap a raw buffer. `data.len()` must equal `width * height * channels`.
    ///
    /// Zero-sized grids are accepted here; the codec rejects them.
    pub fn new(width: u32, height: u32, format: PixelFormat, data: Vec<u8>) -> CodecResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(format.channels()))
            .ok_or(CodecError::InvalidDimensions { width, height })?;
        if data.len() != expected {
            return Err(CodecError::BufferSizeMismatch {
                expected,
                found: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            format,
            data,
        })
    }

    /// Build a grid from rows of `N`-channel pixels.
    ///
    /// Every row must hold the same number of pixels as the first.
    pub fn from_pixel_rows<const N: usize>(rows: &[Vec<[u8; N]>]) -> CodecResult<Self> {
        let format = PixelFormat::from_channels(N)?;
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if let Some((row, found)) = rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.len() != width)
            .map(|(i, r)| (i, r.len()))
        {
            return Err(CodecError::NonRectangular {
                row,
                expected: width,
                found,
            });
        }
        let too_large = CodecError::InvalidDimensions {
            width: u32::MAX,
            height: u32::MAX,
        };
        let width = u32::try_from(width).map_err(|_| too_large.clone())?;
        let height = u32::try_from(rows.len()).map_err(|_| too_large)?;
        let data = rows.iter().flatten().flatten().copied().collect();
        Self::new(width, height, format, data)
    }

    /// A grid filled with zeros.
    pub fn blank(width: u32, height: u32, format: PixelFormat) -> CodecResult<Self> {
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(format.channels()))
            .ok_or(CodecError::InvalidDimensions { width, height })?;
        Self::new(width, height, format, vec![0; len])
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Bytes per pixel.
    pub fn channels(&self) -> usize {
        self.format.channels()
    }

    /// Bytes per row.
    pub fn row_len(&self) -> usize {
        self.width as usize * self.channels()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Channel bytes of the pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let px = self.channels();
        let start = y as usize * self.row_len() + x as usize * px;
        Some(&self.data[start..start + px])
    }

    /// Bytes of row `y`.
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let len = self.row_len();
        let start = y as usize * len;
        Some(&self.data[start..start + len])
    }

    /// Copy an 8-bit `image` buffer into a grid.
    ///
    /// 16-bit and floating point images are rejected; convert them first.
    pub fn from_dynamic(image: &DynamicImage) -> CodecResult<Self> {
        let format = match image {
            DynamicImage::ImageLuma8(_) => PixelFormat::Luma8,
            DynamicImage::ImageLumaA8(_) => PixelFormat::LumaA8,
            DynamicImage::ImageRgb8(_) => PixelFormat::Rgb8,
            DynamicImage::ImageRgba8(_) => PixelFormat::Rgba8,
            other => {
                return Err(CodecError::UnsupportedPixelFormat(format!(
                    "{:?}",
                    other.color()
                )))
            }
        };
        Self::new(image.width(), image.height(), format, image.as_bytes().to_vec())
    }

    /// Convert into the matching 8-bit `DynamicImage` variant.
    pub fn into_dynamic(self) -> CodecResult<DynamicImage> {
        let Self {
            width,
            height,
            format,
            data,
        } = self;
        let expected = width as usize * height as usize * format.channels();
        let found = data.len();
        let mismatch = || CodecError::BufferSizeMismatch { expected, found };
        let image = match format {
            PixelFormat::Luma8 => DynamicImage::ImageLuma8(
                GrayImage::from_raw(width, height, data).ok_or_else(mismatch)?,
            ),
            PixelFormat::LumaA8 => DynamicImage::ImageLumaA8(
                GrayAlphaImage::from_raw(width, height, data).ok_or_else(mismatch)?,
            ),
            PixelFormat::Rgb8 => DynamicImage::ImageRgb8(
                RgbImage::from_raw(width, height, data).ok_or_else(mismatch)?,
            ),
            PixelFormat::Rgba8 => DynamicImage::ImageRgba8(
                RgbaImage::from_raw(width, height, data).ok_or_else(mismatch)?,
            ),
        };
        Ok(image)
    }
}

/// Whether an `image` buffer can be wrapped without conversion.
pub fn is_eight_bit(image: &DynamicImage) -> bool {
    matches!(
        image,
        DynamicImage::ImageLuma8(_)
            | DynamicImage::ImageLumaA8(_)
            | DynamicImage::ImageRgb8(_)
            | DynamicImage::ImageRgba8(_)
    )
}

/// Convert a high bit-depth image to the closest 8-bit layout, keeping alpha.
pub fn to_eight_bit(image: &DynamicImage) -> DynamicImage {
    if is_eight_bit(image) {
        return image.clone();
    }
    if image.color().has_alpha() {
        DynamicImage::ImageRgba8(image.to_rgba8())
    } else {
        DynamicImage::ImageRgb8(image.to_rgb8())
    }
}
