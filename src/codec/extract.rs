//! # Extractor
//!
//! Recovers payload bytes by subtracting the cypher's channel values from the
//! coded image's, pixel by pixel in the same row-major order the embedder
//! used. Subtraction wraps, which makes it the exact inverse of the
//! embedder's wrapping addition.

use std::io::{BufWriter, Write};

use log::debug;

use super::capacity::BYTES_PER_PIXEL;
use super::error::{CodecError, Result, Stage};
use super::meta::Metadata;
use super::pixels::Canvas;

/// Write the payload described by `meta` to `out`.
///
/// Bytes are written as they are recovered rather than collected first, so
/// if `out` fails partway through, whatever was already written stays
/// written. Callers that need all-or-nothing output must stage it
/// themselves.
///
/// Returns the number of bytes written.
///
/// # Errors
/// - [`CodecError::DimensionMismatch`] if the two images differ in size
/// - [`CodecError::StreamIo`] if writing to `out` fails
pub fn extract<A, B, W>(coded: &A, cypher: &B, meta: &Metadata, out: W) -> Result<usize>
where
    A: Canvas,
    B: Canvas,
    W: Write,
{
    let dims = coded.dimensions();
    if dims != cypher.dimensions() {
        return Err(CodecError::DimensionMismatch {
            coded: dims,
            cypher: cypher.dimensions(),
        });
    }

    let total = meta.payload_len(dims);
    let mut remaining = total;
    let mut out = BufWriter::new(out);
    let mut group = [0u8; BYTES_PER_PIXEL];

    let mut offset = 0;
    while remaining > 0 {
        let len = remaining.min(BYTES_PER_PIXEL);
        let coded_px = coded.pixel(offset);
        let cypher_px = cypher.pixel(offset);

        for (i, byte) in group[..len].iter_mut().enumerate() {
            *byte = coded_px[i].wrapping_sub(cypher_px[i]);
        }
        out.write_all(&group[..len])
            .map_err(|e| CodecError::io(Stage::Extract, e))?;

        remaining -= len;
        offset += 1;
    }

    out.flush().map_err(|e| CodecError::io(Stage::Extract, e))?;

    debug!("Extracted {} bytes from {} image", total, dims);
    Ok(total)
}
