//! # Image Codec
//!
//! Hides a byte stream in the pixels of a cypher image and gets it back out.
//!
//! ## Encoding
//! 1. Decode the cypher into a [`PixelBuffer`]
//! 2. Add the payload onto the leading pixels, 3 bytes per pixel
//!    ([`embed`](embed::embed))
//! 3. Record where the payload ends in the trailing meta pixels
//!    ([`write_metadata`](meta::write_metadata))
//! 4. Re-encode the buffer and write it out
//!
//! ## Decoding
//! 1. Decode the coded image and the cypher, and check they are the same size
//! 2. Read the payload length back from the meta pixels
//! 3. Subtract cypher from coded values and stream the bytes out
//!    ([`extract`](extract::extract))
//!
//! The scheme offers no secrecy: anyone holding the cypher image can decode.
//! Coded images must travel in a lossless format; any re-compression destroys
//! the payload.

pub mod capacity;
pub mod config;
pub mod embed;
pub mod error;
pub mod extract;
pub mod meta;
pub mod pixels;

use std::io::{Read, Write};

use log::{debug, info};

pub use capacity::{Capacity, Dimensions};
pub use config::{CodecConfig, OutputFormat};
pub use error::{CodecError, Result, Stage};
pub use meta::Metadata;
pub use pixels::{Canvas, PixelBuffer};

/// Hide `payload` in `cypher` and write the coded image to `out`.
///
/// Nothing is written to `out` unless the whole payload fits.
///
/// # Errors
/// - [`CodecError::UnsupportedImage`] if the cypher cannot be decoded, or the
///   coded image cannot be encoded in the requested format
/// - [`CodecError::CapacityExceeded`] if the payload is too long for the
///   cypher
/// - [`CodecError::StreamIo`] on any read or write failure
///
/// # Example
/// ```ignore
/// let payload = std::fs::File::open("secret.bin")?;
/// let cypher = std::fs::File::open("cat.png")?;
/// let out = std::fs::File::create("coded.png")?;
/// imcode::codec::encode(&CodecConfig::default(), payload, cypher, out)?;
/// ```
pub fn encode<P, C, W>(config: &CodecConfig, payload: P, cypher: C, out: W) -> Result<()>
where
    P: Read,
    C: Read,
    W: Write,
{
    let mut buffer = PixelBuffer::read_from(cypher)?;
    let capacity = Capacity::of(buffer.dimensions());
    debug!(
        "Cypher is {} with {} meta pixels, room for {} bytes",
        capacity.dimensions, capacity.meta_pixels, capacity.max_bytes
    );

    let meta = embed::embed(&mut buffer, payload)?;
    meta::write_metadata(&mut buffer, &meta)?;
    buffer.write_to(config.output_format, out)?;

    info!(
        "Encoded {} of {} bytes into {} image",
        meta.payload_len(capacity.dimensions),
        capacity.max_bytes,
        capacity.dimensions
    );
    Ok(())
}

/// Recover the payload hidden in `coded` using the original `cypher`, and
/// write it to `out`.
///
/// Returns the number of payload bytes written.
///
/// Extracted bytes are written to `out` as they are recovered. If `out`
/// fails partway through, the bytes already written are not rolled back and
/// the output is left truncated.
///
/// # Errors
/// - [`CodecError::UnsupportedImage`] if either image cannot be decoded
/// - [`CodecError::DimensionMismatch`] if the images differ in size; nothing
///   is written
/// - [`CodecError::InvalidMetadata`] if the meta pixels are corrupt or the
///   cypher is not the one used to encode; nothing is written
/// - [`CodecError::StreamIo`] on any read or write failure
pub fn decode<D, C, W>(config: &CodecConfig, coded: D, cypher: C, out: W) -> Result<usize>
where
    D: Read,
    C: Read,
    W: Write,
{
    debug!("Decoding with {:?}", config);

    let coded = PixelBuffer::read_from(coded)?;
    let cypher = PixelBuffer::read_from(cypher)?;

    if coded.dimensions() != cypher.dimensions() {
        return Err(CodecError::DimensionMismatch {
            coded: coded.dimensions(),
            cypher: cypher.dimensions(),
        });
    }

    let meta = meta::read_metadata(&coded)?;
    let written = extract::extract(&coded, &cypher, &meta, out)?;

    info!(
        "Decoded {} bytes from {} image",
        written,
        coded.dimensions()
    );
    Ok(written)
}

/// Capacity of the cypher image read from `cypher`.
pub fn capacity_of<C: Read>(cypher: C) -> Result<Capacity> {
    let buffer = PixelBuffer::read_from(cypher)?;
    Ok(Capacity::of(buffer.dimensions()))
}
