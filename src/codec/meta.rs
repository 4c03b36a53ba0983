//! # Metadata Layout
//!
//! The end of the payload is recorded in the trailing meta pixels of the
//! coded image:
//!
//! ```text
//! ... | axis pixel n-1 | ... | axis pixel 1 | axis pixel 0 | final pixel |
//!      <-------------------- walked backward -------------------
//! ```
//!
//! - **Final pixel** `(W-1, H-1)`: R holds the number of bytes in the last
//!   payload group (0..=3).
//! - **Axis pixels**: the `meta_pixels - 1` pixels before it, visited right to
//!   left and then up a row. Each holds the next base-255 component of the
//!   final X coordinate in R and of the final Y coordinate in G.
//!
//! Meta pixels are written with absolute values and full opacity; B keeps
//! the cypher's value. The writer and the reader walk the same
//! [`MetaPixels`] sequence.

use log::debug;

use super::capacity::{Capacity, Dimensions, BYTES_PER_PIXEL, META_COMPONENT_MAX};
use super::error::{CodecError, Result};
use super::pixels::{Canvas, ALPHA};

/// Channel of an axis pixel holding the X component.
const X_CHANNEL: usize = 0;
/// Channel of an axis pixel holding the Y component.
const Y_CHANNEL: usize = 1;
/// Channel of the final pixel holding the last group length.
const GROUP_LEN_CHANNEL: usize = 0;

/// Where the payload ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metadata {
    /// Column of the last pixel holding payload bytes
    pub final_x: u32,
    /// Row of the last pixel holding payload bytes
    pub final_y: u32,
    /// Payload bytes stored in that pixel (0 only for an empty payload)
    pub last_group_len: u8,
}

impl Metadata {
    /// Total payload length implied by this metadata.
    pub fn payload_len(&self, dims: Dimensions) -> usize {
        dims.offset(self.final_x, self.final_y) * BYTES_PER_PIXEL + self.last_group_len as usize
    }
}

/// Coordinates of the axis meta pixels, in the order they are written and
/// read.
///
/// Starts one pixel before the bottom-right corner and walks backward in
/// row-major order for `meta_pixels - 1` pixels.
#[derive(Debug, Clone)]
pub struct MetaPixels {
    dims: Dimensions,
    /// One past the offset yielded next
    cursor: usize,
    remaining: usize,
}

impl MetaPixels {
    pub fn new(dims: Dimensions) -> Self {
        let capacity = Capacity::of(dims);
        let last = dims.pixel_count().saturating_sub(1);

        Self {
            dims,
            cursor: last,
            remaining: capacity.meta_pixels.saturating_sub(1).min(last),
        }
    }
}

impl Iterator for MetaPixels {
    type Item = (u32, u32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        self.cursor -= 1;
        Some(self.dims.coords(self.cursor))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for MetaPixels {}

/// Take the next greedy base-255 component off `value`.
fn next_component(value: &mut u32) -> u8 {
    let component = (*value).min(META_COMPONENT_MAX);
    *value -= component;
    component as u8
}

/// Store `meta` in the meta pixels of `canvas`.
///
/// # Errors
/// [`CodecError::InvalidMetadata`] if the coordinate lies outside the image
/// or the group length exceeds 3; neither can come out of the embedder.
pub fn write_metadata<C: Canvas>(canvas: &mut C, meta: &Metadata) -> Result<()> {
    let dims = canvas.dimensions();
    validate(dims, meta)?;

    let (mut x, mut y) = (meta.final_x, meta.final_y);
    for (mx, my) in MetaPixels::new(dims) {
        let pixel = canvas.pixel_at_mut(mx, my);
        pixel[X_CHANNEL] = next_component(&mut x);
        pixel[Y_CHANNEL] = next_component(&mut y);
        pixel[ALPHA] = u8::MAX;
    }

    if x > 0 || y > 0 {
        return Err(CodecError::invalid_metadata(format!(
            "coordinate ({}, {}) does not fit the meta pixels of a {} image",
            meta.final_x, meta.final_y, dims
        )));
    }

    let final_pixel = canvas.pixel_at_mut(dims.width - 1, dims.height - 1);
    final_pixel[GROUP_LEN_CHANNEL] = meta.last_group_len;
    final_pixel[ALPHA] = u8::MAX;

    debug!("Wrote metadata {:?} into {} image", meta, dims);
    Ok(())
}

/// Recover the metadata stored by [`write_metadata`].
///
/// # Errors
/// [`CodecError::InvalidMetadata`] if the stored group length exceeds 3, the
/// coordinate falls outside the image, or the implied payload is larger than
/// the image can hold. This is what a non-matching cypher or a tampered
/// image usually looks like.
pub fn read_metadata<C: Canvas>(canvas: &C) -> Result<Metadata> {
    let dims = canvas.dimensions();

    let last_group_len = canvas.pixel_at(dims.width - 1, dims.height - 1)[GROUP_LEN_CHANNEL];

    let (mut final_x, mut final_y) = (0u32, 0u32);
    for (mx, my) in MetaPixels::new(dims) {
        let pixel = canvas.pixel_at(mx, my);
        final_x += pixel[X_CHANNEL] as u32;
        final_y += pixel[Y_CHANNEL] as u32;
    }

    let meta = Metadata {
        final_x,
        final_y,
        last_group_len,
    };
    validate(dims, &meta)?;

    debug!("Read metadata {:?} from {} image", meta, dims);
    Ok(meta)
}

fn validate(dims: Dimensions, meta: &Metadata) -> Result<()> {
    if meta.last_group_len as usize > BYTES_PER_PIXEL {
        return Err(CodecError::invalid_metadata(format!(
            "last group holds {} bytes, at most {} allowed",
            meta.last_group_len, BYTES_PER_PIXEL
        )));
    }

    if meta.final_x >= dims.width || meta.final_y >= dims.height {
        return Err(CodecError::invalid_metadata(format!(
            "final pixel ({}, {}) lies outside the {} image",
            meta.final_x, meta.final_y, dims
        )));
    }

    let max_bytes = Capacity::of(dims).max_bytes;
    let len = meta.payload_len(dims);
    if len > max_bytes {
        return Err(CodecError::invalid_metadata(format!(
            "payload of {} bytes exceeds the {} byte capacity of a {} image",
            len, max_bytes, dims
        )));
    }

    Ok(())
}
