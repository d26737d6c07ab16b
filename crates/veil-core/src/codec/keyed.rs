//! The keyed permutation codec: encode and decode whole pixel grids.

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use super::grid::PixelGrid;
use super::key::{AxisTables, PasswordKey};
use super::permutation::SwapOrder;
use crate::error::{CodecError, CodecResult};

/// Which way a transform runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Scramble pixel positions
    Encode,
    /// Restore pixel positions scrambled by `Encode` with the same key
    Decode,
}

impl Direction {
    fn swap_order(self) -> SwapOrder {
        match self {
            Direction::Encode => SwapOrder::Descending,
            Direction::Decode => SwapOrder::Ascending,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Encode => "encode",
            Direction::Decode => "decode",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Permutes the columns and rows of a pixel grid under a password.
///
/// Encoding replays the column swaps `x <-> columns[x]` for `x` from
/// `width-1` down to `0`, then the row swaps `y <-> rows[y]` for `y` from
/// `height-1` down to `0`. Decoding replays the same swaps in ascending
/// order. The descending replay is not an involution in general, so the
/// ascending path is what makes decode exact.
///
/// Channel values are never modified and dimensions never change.
#[derive(Debug, Clone)]
pub struct KeyedPermutationCodec {
    key: PasswordKey,
}

impl KeyedPermutationCodec {
    pub fn new(key: PasswordKey) -> Self {
        Self { key }
    }

    /// Codec keyed by the raw password text.
    pub fn from_password(password: &str) -> Self {
        Self::new(PasswordKey::new(password))
    }

    pub fn key(&self) -> &PasswordKey {
        &self.key
    }

    /// The column and row tables for an image of this size.
    pub fn tables(&self, width: u32, height: u32) -> AxisTables {
        self.key.axis_tables(width as usize, height as usize)
    }

    /// Scramble `grid` into a new grid.
    pub fn encode(&self, grid: &PixelGrid) -> CodecResult<PixelGrid> {
        self.apply(grid, Direction::Encode)
    }

    /// Restore a grid produced by [`encode`](Self::encode) with the same key.
    pub fn decode(&self, grid: &PixelGrid) -> CodecResult<PixelGrid> {
        self.apply(grid, Direction::Decode)
    }

    pub fn encode_in_place(&self, grid: &mut PixelGrid) -> CodecResult<()> {
        self.apply_in_place(grid, Direction::Encode)
    }

    pub fn decode_in_place(&self, grid: &mut PixelGrid) -> CodecResult<()> {
        self.apply_in_place(grid, Direction::Decode)
    }

    /// Run the transform into a freshly allocated grid.
    ///
    /// Rather than swapping, each output pixel is gathered from its source
    /// position using the arrangement the swap sequence produces.
    pub fn apply(&self, grid: &PixelGrid, direction: Direction) -> CodecResult<PixelGrid> {
        check_dimensions(grid)?;
        tracing::trace!(
            width = grid.width(),
            height = grid.height(),
            %direction,
            "Applying keyed permutation"
        );

        let tables = self.tables(grid.width(), grid.height());
        let order = direction.swap_order();
        let columns = tables.columns.arrangement(order);
        let rows = tables.rows.arrangement(order);

        let px = grid.channels();
        let row_len = grid.row_len();
        let src = grid.as_bytes();
        let mut out = Vec::with_capacity(src.len());
        for &src_row in &rows {
            let row = &src[src_row * row_len..(src_row + 1) * row_len];
            for &src_col in &columns {
                out.extend_from_slice(&row[src_col * px..(src_col + 1) * px]);
            }
        }
        PixelGrid::new(grid.width(), grid.height(), grid.format(), out)
    }

    /// Run the transform by swapping columns and rows of `grid` in place.
    ///
    /// Nothing is moved if the grid is rejected.
    pub fn apply_in_place(&self, grid: &mut PixelGrid, direction: Direction) -> CodecResult<()> {
        check_dimensions(grid)?;

        let tables = self.tables(grid.width(), grid.height());
        let order = direction.swap_order();
        let px = grid.channels();
        let row_len = grid.row_len();
        let data = grid.data_mut();

        for row in data.chunks_exact_mut(row_len) {
            tables
                .columns
                .replay_swaps(order, |a, b| swap_pixels(row, a, b, px));
        }
        tables
            .rows
            .replay_swaps(order, |a, b| swap_rows(data, a, b, row_len));
        Ok(())
    }

    /// Transform an 8-bit `image` buffer.
    pub fn apply_dynamic(
        &self,
        image: &DynamicImage,
        direction: Direction,
    ) -> CodecResult<DynamicImage> {
        let mut grid = PixelGrid::from_dynamic(image)?;
        self.apply_in_place(&mut grid, direction)?;
        grid.into_dynamic()
    }
}

fn check_dimensions(grid: &PixelGrid) -> CodecResult<()> {
    if grid.width() == 0 || grid.height() == 0 {
        return Err(CodecError::InvalidDimensions {
            width: grid.width(),
            height: grid.height(),
        });
    }
    Ok(())
}

fn swap_pixels(row: &mut [u8], a: usize, b: usize, px: usize) {
    for c in 0..px {
        row.swap(a * px + c, b * px + c);
    }
}

fn swap_rows(data: &mut [u8], a: usize, b: usize, row_len: usize) {
    let (lo, hi) = if a < b { (a, b) } else { (b, a) };
    let (head, tail) = data.split_at_mut(hi * row_len);
    head[lo * row_len..(lo + 1) * row_len].swap_with_slice(&mut tail[..row_len]);
}
