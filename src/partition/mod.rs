//! Tile partitioning and average-color computation.
//!
//! Splits a pixel buffer into a row-major grid of fixed-size tiles, computing
//! each tile's average RGB and deterministic color key. This stage is
//! synchronous and side-effect free; no network or resource acquisition
//! happens here.

use crate::color::{ColorKey, Rgb};
use crate::raster::{PixelBuffer, BYTES_PER_PIXEL};
use tracing::debug;

/// Tile dimensions used to derive the mosaic grid.
///
/// Zero dimensions clamp to 1 at construction so grid derivation never
/// divides by zero and averaging always has at least one sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGeometry {
    tile_width: u32,
    tile_height: u32,
}

impl TileGeometry {
    /// Creates a tile geometry, clamping zero dimensions to 1.
    pub fn new(tile_width: u32, tile_height: u32) -> Self {
        Self {
            tile_width: tile_width.max(1),
            tile_height: tile_height.max(1),
        }
    }

    /// Tile width in pixels.
    pub fn tile_width(&self) -> u32 {
        self.tile_width
    }

    /// Tile height in pixels.
    pub fn tile_height(&self) -> u32 {
        self.tile_height
    }

    /// Derives the grid shape for an image of the given dimensions.
    ///
    /// Width maps to columns and height to rows. Remainder pixels at the
    /// right and bottom edges fall outside the grid; no partial tile is
    /// ever produced.
    pub fn grid_shape(&self, image_width: u32, image_height: u32) -> GridShape {
        GridShape {
            columns: image_width / self.tile_width,
            rows: image_height / self.tile_height,
        }
    }
}

/// Derived mosaic grid dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridShape {
    /// Number of tile rows (`floor(H / tile_height)`)
    pub rows: u32,
    /// Number of tile columns (`floor(W / tile_width)`)
    pub columns: u32,
}

impl GridShape {
    /// Total number of tiles in the grid.
    pub fn tile_count(&self) -> usize {
        self.rows as usize * self.columns as usize
    }

    /// True when the image is smaller than a single tile in either axis.
    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.columns == 0
    }
}

/// A fixed-size sub-region of the source image with its computed average
/// color and lookup key.
///
/// `index` is the tile's position in row-major flattening
/// (`index = row * columns + column`). It is the stable identity the
/// reassembler keys on and is never reassigned after partitioning.
#[derive(Debug, Clone)]
pub struct Tile {
    /// Position in row-major flattening
    pub index: usize,
    /// Grid row
    pub row: u32,
    /// Grid column
    pub column: u32,
    /// Left edge in source-image pixels (`column * tile_width`)
    pub x: u32,
    /// Top edge in source-image pixels (`row * tile_height`)
    pub y: u32,
    /// Floored per-channel mean over the tile's pixels
    pub avg_color: Rgb,
    /// Lookup key derived from `avg_color`
    pub color_key: ColorKey,
}

/// Splits the buffer into a row-major grid of fixed-size tiles.
///
/// Every pixel of each tile contributes to the average (dense sampling) and
/// the per-channel mean is floored to an integer, so the result is
/// deterministic for a given buffer and geometry. Iteration is row-major
/// with the tile index increasing monotonically from zero - the exact order
/// the reassembler later inverts.
pub fn partition(buffer: &PixelBuffer, geometry: TileGeometry) -> Vec<Tile> {
    let shape = geometry.grid_shape(buffer.width(), buffer.height());
    let mut tiles = Vec::with_capacity(shape.tile_count());
    let mut index = 0usize;

    for row in 0..shape.rows {
        for column in 0..shape.columns {
            let x = column * geometry.tile_width();
            let y = row * geometry.tile_height();
            let avg_color = average_color(buffer, x, y, geometry);
            tiles.push(Tile {
                index,
                row,
                column,
                x,
                y,
                color_key: avg_color.color_key(),
                avg_color,
            });
            index += 1;
        }
    }

    debug!(
        rows = shape.rows,
        columns = shape.columns,
        tiles = tiles.len(),
        "Partitioned buffer into tile grid"
    );

    tiles
}

/// Computes the floored per-channel mean over one tile's pixel block.
fn average_color(buffer: &PixelBuffer, x: u32, y: u32, geometry: TileGeometry) -> Rgb {
    let data = buffer.as_bytes();
    let stride = buffer.width() as usize * BYTES_PER_PIXEL;
    let (mut r, mut g, mut b) = (0u64, 0u64, 0u64);

    for py in y..y + geometry.tile_height() {
        let row_start = py as usize * stride;
        for px in x..x + geometry.tile_width() {
            let offset = row_start + px as usize * BYTES_PER_PIXEL;
            r += data[offset] as u64;
            g += data[offset + 1] as u64;
            b += data[offset + 2] as u64;
        }
    }

    let count = geometry.tile_width() as u64 * geometry.tile_height() as u64;
    Rgb::new((r / count) as u8, (g / count) as u8, (b / count) as u8)
}
