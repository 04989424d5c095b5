//! Source raster buffer.
//!
//! [`PixelBuffer`] is the immutable input to the mosaic core: a width×height
//! RGBA8 raster, row-major and channel-interleaved. The UI layer that decoded
//! the source image owns it for the duration of a pipeline run; the
//! partitioner only borrows it read-only.

use image::RgbaImage;
use thiserror::Error;

/// Bytes per pixel (RGBA8, channel-interleaved).
pub const BYTES_PER_PIXEL: usize = 4;

/// Errors that can occur constructing a pixel buffer.
#[derive(Debug, Error)]
pub enum RasterError {
    /// Pixel data length does not match the declared dimensions.
    #[error(
        "pixel data length {actual} does not match {width}x{height} RGBA dimensions (expected {expected})"
    )]
    DimensionMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

/// Immutable RGBA8 raster, row-major, channel-interleaved.
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Creates a buffer from raw RGBA bytes.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::DimensionMismatch`] if `data.len()` is not
    /// `width * height * 4`.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, RasterError> {
        let expected = width as usize * height as usize * BYTES_PER_PIXEL;
        if data.len() != expected {
            return Err(RasterError::DimensionMismatch {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Creates a buffer by copying a decoded image.
    pub fn from_image(image: &RgbaImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            data: image.as_raw().clone(),
        }
    }

    /// Buffer width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Buffer height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The RGBA channel at `(x, y)`, or `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL;
        self.data
            .get(offset..offset + BYTES_PER_PIXEL)
            .map(|px| [px[0], px[1], px[2], px[3]])
    }

    /// Raw interleaved channel data.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

impl From<RgbaImage> for PixelBuffer {
    fn from(image: RgbaImage) -> Self {
        let width = image.width();
        let height = image.height();
        Self {
            width,
            height,
            data: image.into_raw(),
        }
    }
}
