//! # Codec Configuration
//!
//! The only knob the codec itself exposes is the output image format. The
//! value is built once by the caller and passed by reference into every
//! entry point.

use clap::ValueEnum;
use image::ImageFormat;
use serde::{Deserialize, Serialize};

/// Format of the coded image produced by an encode call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Same format as the cypher, falling back to PNG for lossy formats
    #[default]
    Same,
    Png,
    Bmp,
    Tiff,
    Qoi,
}

impl OutputFormat {
    /// Concrete format, or `None` for [`OutputFormat::Same`].
    pub fn image_format(self) -> Option<ImageFormat> {
        match self {
            OutputFormat::Same => None,
            OutputFormat::Png => Some(ImageFormat::Png),
            OutputFormat::Bmp => Some(ImageFormat::Bmp),
            OutputFormat::Tiff => Some(ImageFormat::Tiff),
            OutputFormat::Qoi => Some(ImageFormat::Qoi),
        }
    }

    /// Whether `format` can be written back without altering pixel values.
    pub fn is_lossless(format: ImageFormat) -> bool {
        matches!(
            format,
            ImageFormat::Png
                | ImageFormat::Bmp
                | ImageFormat::Tiff
                | ImageFormat::Qoi
        )
    }
}

/// Settings handed to [`encode`](super::encode) and [`decode`](super::decode).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecConfig {
    #[serde(default)]
    pub output_format: OutputFormat,
}

impl CodecConfig {
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_has_no_concrete_format() {
        assert_eq!(OutputFormat::Same.image_format(), None);
        assert_eq!(OutputFormat::Qoi.image_format(), Some(ImageFormat::Qoi));
    }

    #[test]
    fn test_lossy_formats_rejected() {
        assert!(OutputFormat::is_lossless(ImageFormat::Png));
        assert!(!OutputFormat::is_lossless(ImageFormat::Jpeg));
        assert!(!OutputFormat::is_lossless(ImageFormat::Gif));
    }
}
