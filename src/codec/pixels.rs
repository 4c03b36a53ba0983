//! # Pixel Buffer
//!
//! Decoded images live in a flat, row-major arena of RGBA8 pixels. Every
//! encode or decode call owns its buffers outright; nothing is shared
//! between calls.
//!
//! Whatever the source color type or bit depth, pixels are normalised to
//! RGBA8 on load. Both the encode and the decode side go through the same
//! conversion, so channel baselines agree. Images without alpha read as
//! fully opaque and are written back without an alpha channel.

use std::io::{Cursor, Read, Write};

use image::{
    DynamicImage, GenericImageView, ImageError, ImageFormat, ImageOutputFormat, RgbaImage,
};
use log::{debug, warn};

use super::capacity::Dimensions;
use super::config::OutputFormat;
use super::error::{CodecError, Result, Stage};

/// Channels stored per pixel (R, G, B, A).
pub const CHANNELS: usize = 4;

/// Index of the alpha channel within a pixel.
pub const ALPHA: usize = 3;

/// Mutable per-pixel access by row-major offset.
///
/// This is the capability the embedder and metadata writer need from an
/// image. Obtaining one from a decoded image is checked once, at load time.
pub trait Canvas {
    fn dimensions(&self) -> Dimensions;

    /// Channels of the pixel at `offset`.
    fn pixel(&self, offset: usize) -> &[u8; CHANNELS];

    fn pixel_mut(&mut self, offset: usize) -> &mut [u8; CHANNELS];

    fn pixel_at(&self, x: u32, y: u32) -> &[u8; CHANNELS] {
        let offset = self.dimensions().offset(x, y);
        self.pixel(offset)
    }

    fn pixel_at_mut(&mut self, x: u32, y: u32) -> &mut [u8; CHANNELS] {
        let offset = self.dimensions().offset(x, y);
        self.pixel_mut(offset)
    }
}

/// Decoded image held as `W * H` RGBA8 pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    dims: Dimensions,
    pixels: Vec<[u8; CHANNELS]>,
    has_alpha: bool,
    format: Option<ImageFormat>,
}

impl PixelBuffer {
    /// Read a whole image stream and decode it.
    ///
    /// # Errors
    /// - [`CodecError::StreamIo`] if the stream cannot be read
    /// - [`CodecError::UnsupportedImage`] if the bytes are not a decodable
    ///   image or the image has no pixels
    pub fn read_from<R: Read>(mut reader: R) -> Result<Self> {
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(|e| CodecError::io(Stage::ValidateInputs, e))?;
        Self::from_bytes(&bytes)
    }

    /// Decode an in-memory image, guessing its format from the content.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let reader = image::io::Reader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| CodecError::io(Stage::ValidateInputs, e))?;
        let format = reader.format();

        let img = reader.decode().map_err(|e| match e {
            ImageError::IoError(e) => CodecError::io(Stage::ValidateInputs, e),
            other => CodecError::unsupported(format!("could not decode image: {}", other)),
        })?;

        let mut buffer = Self::try_from(img)?;
        buffer.format = format;
        debug!(
            "Decoded {} image ({:?}, alpha: {})",
            buffer.dims, buffer.format, buffer.has_alpha
        );
        Ok(buffer)
    }

    /// Format the image was decoded from, when known.
    pub fn format(&self) -> Option<ImageFormat> {
        self.format
    }

    pub fn has_alpha(&self) -> bool {
        self.has_alpha
    }

    /// All pixels, row-major.
    pub fn pixels(&self) -> &[[u8; CHANNELS]] {
        &self.pixels
    }

    /// Encode the buffer and write it to `out`.
    ///
    /// The image is encoded into memory first, because several encoders need
    /// a seekable sink, and then written and flushed in one go.
    ///
    /// # Errors
    /// - [`CodecError::UnsupportedImage`] if the chosen format cannot encode
    ///   the image
    /// - [`CodecError::StreamIo`] on any write failure
    pub fn write_to<W: Write>(self, format: OutputFormat, mut out: W) -> Result<()> {
        let target = self.output_format(format);
        let has_alpha = self.has_alpha;
        let dims = self.dims;

        let raw: Vec<u8> = self.pixels.into_iter().flatten().collect();
        let rgba = RgbaImage::from_raw(dims.width, dims.height, raw)
            .ok_or_else(|| CodecError::unsupported("pixel buffer does not match its dimensions"))?;
        let img = if has_alpha {
            DynamicImage::ImageRgba8(rgba)
        } else {
            DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(rgba).to_rgb8())
        };

        let mut encoded = Vec::new();
        img.write_to(&mut Cursor::new(&mut encoded), ImageOutputFormat::from(target))
            .map_err(|e| match e {
                ImageError::IoError(e) => CodecError::io(Stage::Serialize, e),
                other => CodecError::unsupported(format!("could not encode image: {}", other)),
            })?;

        debug!("Encoded {} image as {:?} ({} bytes)", dims, target, encoded.len());

        out.write_all(&encoded)
            .and_then(|_| out.flush())
            .map_err(|e| CodecError::io(Stage::Serialize, e))
    }

    /// Pick the concrete format for [`PixelBuffer::write_to`].
    fn output_format(&self, format: OutputFormat) -> ImageFormat {
        if let Some(explicit) = format.image_format() {
            return explicit;
        }

        match self.format {
            Some(source) if OutputFormat::is_lossless(source) => source,
            Some(source) => {
                warn!(
                    "{:?} cannot carry the payload losslessly, writing PNG instead",
                    source
                );
                ImageFormat::Png
            }
            None => ImageFormat::Png,
        }
    }
}

impl TryFrom<DynamicImage> for PixelBuffer {
    type Error = CodecError;

    fn try_from(img: DynamicImage) -> Result<Self> {
        let (width, height) = img.dimensions();
        let dims = Dimensions::new(width, height);
        if dims.pixel_count() == 0 {
            return Err(CodecError::unsupported(format!("image {} has no pixels", dims)));
        }

        let has_alpha = img.color().has_alpha();
        let pixels = img
            .into_rgba8()
            .into_raw()
            .chunks_exact(CHANNELS)
            .map(|c| [c[0], c[1], c[2], c[3]])
            .collect();

        Ok(Self {
            dims,
            pixels,
            has_alpha,
            format: None,
        })
    }
}

impl Canvas for PixelBuffer {
    fn dimensions(&self) -> Dimensions {
        self.dims
    }

    fn pixel(&self, offset: usize) -> &[u8; CHANNELS] {
        &self.pixels[offset]
    }

    fn pixel_mut(&mut self, offset: usize) -> &mut [u8; CHANNELS] {
        &mut self.pixels[offset]
    }
}
