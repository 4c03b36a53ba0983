//! # Embedder
//!
//! Adds payload bytes onto the cypher's channel values, one 3-byte group per
//! pixel, starting at (0, 0) in row-major order:
//!
//! ```text
//! coded[R] = cypher[R] + payload[3i]      (mod 256)
//! coded[G] = cypher[G] + payload[3i + 1]  (mod 256)
//! coded[B] = cypher[B] + payload[3i + 2]  (mod 256)
//! coded[A] = 255
//! ```
//!
//! A short final group only touches the channels it has bytes for.

use std::io::{self, BufReader, Read};

use log::debug;

use super::capacity::{Capacity, BYTES_PER_PIXEL};
use super::error::{CodecError, Result, Stage};
use super::meta::Metadata;
use super::pixels::{Canvas, ALPHA};

/// Fill `buf` from `reader`, stopping early only at end of stream.
///
/// Returns the number of bytes read. A short count means the stream is
/// exhausted, regardless of how the underlying reader splits its data.
fn read_group<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Embed the whole of `payload` into `canvas`.
///
/// Returns the metadata describing where the payload ends; storing it is up
/// to the caller. Stops reading as soon as the payload is known not to fit,
/// without draining the rest of the stream.
///
/// # Errors
/// - [`CodecError::CapacityExceeded`] if the payload is longer than the
///   capacity of the canvas. The canvas is left partially written and must
///   be discarded.
/// - [`CodecError::StreamIo`] if reading the payload fails
pub fn embed<R: Read, C: Canvas>(canvas: &mut C, payload: R) -> Result<Metadata> {
    let dims = canvas.dimensions();
    let capacity = Capacity::of(dims);
    let mut payload = BufReader::new(payload);

    let mut group = [0u8; BYTES_PER_PIXEL];
    let mut last: Option<(usize, usize)> = None;
    let mut exhausted = false;

    for offset in 0..capacity.max_pixels {
        let read = read_group(&mut payload, &mut group)
            .map_err(|e| CodecError::io(Stage::ProcessPixels, e))?;
        if read == 0 {
            exhausted = true;
            break;
        }

        let pixel = canvas.pixel_mut(offset);
        for (channel, byte) in pixel.iter_mut().zip(&group[..read]) {
            *channel = channel.wrapping_add(*byte);
        }
        pixel[ALPHA] = u8::MAX;
        last = Some((offset, read));

        if read < BYTES_PER_PIXEL {
            exhausted = true;
            break;
        }
    }

    if !exhausted {
        let mut probe = [0u8; 1];
        let extra = read_group(&mut payload, &mut probe)
            .map_err(|e| CodecError::io(Stage::ProcessPixels, e))?;
        if extra > 0 {
            return Err(CodecError::CapacityExceeded {
                max_bytes: capacity.max_bytes,
                width: dims.width,
                height: dims.height,
            });
        }
    }

    let meta = match last {
        Some((offset, read)) => {
            let (final_x, final_y) = dims.coords(offset);
            Metadata {
                final_x,
                final_y,
                last_group_len: read as u8,
            }
        }
        None => Metadata {
            final_x: 0,
            final_y: 0,
            last_group_len: 0,
        },
    };

    debug!(
        "Embedded {} bytes into {} image",
        meta.payload_len(dims),
        dims
    );
    Ok(meta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::capacity::Dimensions;
    use crate::codec::pixels::PixelBuffer;
    use image::{DynamicImage, Rgba, RgbaImage};

    fn canvas(width: u32, height: u32, fill: [u8; 4]) -> PixelBuffer {
        let img = RgbaImage::from_pixel(width, height, Rgba(fill));
        PixelBuffer::try_from(DynamicImage::ImageRgba8(img)).unwrap()
    }

    /// Hands out one byte per read call.
    struct Trickle<'a>(&'a [u8]);

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.0.split_first() {
                Some((first, rest)) if !buf.is_empty() => {
                    buf[0] = *first;
                    self.0 = rest;
                    Ok(1)
                }
                _ => Ok(0),
            }
        }
    }

    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk on fire"))
        }
    }

    #[test]
    fn test_bytes_added_with_wraparound() {
        let mut buffer = canvas(4, 4, [250, 10, 0, 128]);
        let meta = embed(&mut buffer, &[10u8, 20, 30, 1][..]).unwrap();

        assert_eq!(buffer.pixel(0), &[4, 30, 30, 255]);
        // short group: only R changes, but the pixel is still made opaque
        assert_eq!(buffer.pixel(1), &[251, 10, 0, 255]);
        assert_eq!(buffer.pixel(2), &[250, 10, 0, 128]);
        assert_eq!(
            meta,
            Metadata {
                final_x: 1,
                final_y: 0,
                last_group_len: 1
            }
        );
    }

    #[test]
    fn test_full_final_group_points_at_last_pixel() {
        let mut buffer = canvas(3, 3, [0, 0, 0, 255]);
        let meta = embed(&mut buffer, &[1u8; 12][..]).unwrap();

        assert_eq!((meta.final_x, meta.final_y, meta.last_group_len), (0, 1, 3));
        assert_eq!(meta.payload_len(Dimensions::new(3, 3)), 12);
    }

    #[test]
    fn test_empty_payload() {
        let mut buffer = canvas(3, 3, [5, 5, 5, 5]);
        let before = buffer.clone();
        let meta = embed(&mut buffer, io::empty()).unwrap();

        assert_eq!(meta.payload_len(Dimensions::new(3, 3)), 0);
        assert_eq!(buffer, before);
    }

    #[test]
    fn test_exact_capacity_fits() {
        let mut buffer = canvas(2, 2, [0, 0, 0, 255]);
        let max = Capacity::of(buffer.dimensions()).max_bytes;
        let meta = embed(&mut buffer, &vec![7u8; max][..]).unwrap();

        assert_eq!(meta.payload_len(buffer.dimensions()), max);
    }

    #[test]
    fn test_one_byte_over_capacity() {
        let mut buffer = canvas(2, 2, [0, 0, 0, 255]);
        let max = Capacity::of(buffer.dimensions()).max_bytes;
        let err = embed(&mut buffer, &vec![7u8; max + 1][..]).unwrap_err();

        match err {
            CodecError::CapacityExceeded {
                max_bytes,
                width,
                height,
            } => {
                assert_eq!(max_bytes, max);
                assert_eq!((width, height), (2, 2));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_short_reads_do_not_split_groups() {
        let payload = [1u8, 2, 3, 4, 5, 6, 7];
        let mut chunked = canvas(4, 4, [0, 0, 0, 255]);
        let mut trickled = chunked.clone();

        let a = embed(&mut chunked, &payload[..]).unwrap();
        let b = embed(&mut trickled, Trickle(&payload)).unwrap();

        assert_eq!(a, b);
        assert_eq!(chunked, trickled);
        assert_eq!(trickled.pixel(1), &[4, 5, 6, 255]);
    }

    #[test]
    fn test_read_failure_is_stream_error() {
        let mut buffer = canvas(2, 2, [0, 0, 0, 255]);
        let err = embed(&mut buffer, Broken).unwrap_err();

        assert!(matches!(
            err,
            CodecError::StreamIo {
                stage: Stage::ProcessPixels,
                ..
            }
        ));
    }
}
