//! # Capacity
//!
//! How many bytes a cypher image can carry is a pure function of its size.
//!
//! Each payload pixel holds 3 bytes (one per R, G, B channel). The trailing
//! pixels of the image, in row-major order, are reserved for metadata:
//!
//! ```text
//! meta_pixels = ceil(max(W - 1, H - 1) / 255) + 1
//! max_bytes   = (W * H - meta_pixels) * 3
//! ```
//!
//! One meta pixel stores up to 255 of each coordinate, so `meta_pixels - 1`
//! pixels are enough to spell out any in-bounds `(x, y)`. The extra pixel
//! holds the length of the final payload group.
//!
//! Example: a 2x2 image needs 1 meta pixel and stores 9 bytes.

use std::fmt;

/// Bytes hidden per payload pixel (R, G, B).
pub const BYTES_PER_PIXEL: usize = 3;

/// Largest coordinate component a single meta pixel channel can hold.
pub const META_COMPONENT_MAX: u32 = 255;

/// Width and height of an image in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Total number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Row-major offset of `(x, y)`.
    pub fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Inverse of [`Dimensions::offset`].
    pub fn coords(&self, offset: usize) -> (u32, u32) {
        let width = self.width as usize;
        ((offset % width) as u32, (offset / width) as u32)
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Number of trailing pixels reserved for metadata.
///
/// Must be computed from the image's own dimensions on both the encode and
/// decode side; it is the only source for where the meta region begins.
pub fn meta_pixel_count(dims: Dimensions) -> usize {
    let max_bound = dims.width.max(dims.height).saturating_sub(1);
    max_bound.div_ceil(META_COMPONENT_MAX) as usize + 1
}

/// Precomputed capacity figures for one set of dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capacity {
    pub dimensions: Dimensions,
    /// Trailing pixels reserved for metadata
    pub meta_pixels: usize,
    /// Pixels available to the payload, starting at (0, 0)
    pub max_pixels: usize,
    /// Largest payload that fits
    pub max_bytes: usize,
}

impl Capacity {
    pub fn of(dims: Dimensions) -> Self {
        let meta_pixels = meta_pixel_count(dims);
        let max_pixels = dims.pixel_count().saturating_sub(meta_pixels);

        Self {
            dimensions: dims,
            meta_pixels,
            max_pixels,
            max_bytes: max_pixels * BYTES_PER_PIXEL,
        }
    }

    /// Row-major offset of the first meta pixel.
    pub fn meta_start(&self) -> usize {
        self.max_pixels
    }
}

/// Largest payload, in bytes, that an image of these dimensions can carry.
pub fn max_bytes(dims: Dimensions) -> usize {
    Capacity::of(dims).max_bytes
}
