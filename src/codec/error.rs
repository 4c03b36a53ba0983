//! # Codec Errors
//!
//! Every way an encode or decode call can fail. None of these are retried;
//! each one ends the call and is handed straight back to the caller.

use std::fmt;
use std::io;

use thiserror::Error;

use super::capacity::Dimensions;

/// Phase of an encode or decode call, attached to I/O failures so the caller
/// can tell which stream broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Reading and decoding the cypher or coded image
    ValidateInputs,
    /// Reading payload bytes into the pixel buffer
    ProcessPixels,
    /// Writing the re-encoded image
    Serialize,
    /// Writing recovered payload bytes
    Extract,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::ValidateInputs => "reading input image",
            Stage::ProcessPixels => "reading payload",
            Stage::Serialize => "writing coded image",
            Stage::Extract => "writing extracted payload",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while hiding or recovering a payload.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("unsupported image: {reason}")]
    UnsupportedImage { reason: String },

    #[error("only {max_bytes} bytes can be stored using a {width}x{height} cypher")]
    CapacityExceeded {
        max_bytes: usize,
        width: u32,
        height: u32,
    },

    #[error("coded image is {coded} but cypher image is {cypher}")]
    DimensionMismatch {
        coded: Dimensions,
        cypher: Dimensions,
    },

    #[error("invalid metadata: {reason}")]
    InvalidMetadata { reason: String },

    #[error("I/O error while {stage}: {source}")]
    StreamIo {
        stage: Stage,
        #[source]
        source: io::Error,
    },
}

impl CodecError {
    pub(crate) fn unsupported(reason: impl Into<String>) -> Self {
        CodecError::UnsupportedImage {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_metadata(reason: impl Into<String>) -> Self {
        CodecError::InvalidMetadata {
            reason: reason.into(),
        }
    }

    pub(crate) fn io(stage: Stage, source: io::Error) -> Self {
        CodecError::StreamIo { stage, source }
    }
}

pub type Result<T> = std::result::Result<T, CodecError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_context() {
        let err = CodecError::CapacityExceeded {
            max_bytes: 9,
            width: 2,
            height: 2,
        };
        assert_eq!(
            err.to_string(),
            "only 9 bytes can be stored using a 2x2 cypher"
        );

        let err = CodecError::DimensionMismatch {
            coded: Dimensions::new(4, 3),
            cypher: Dimensions::new(3, 4),
        };
        assert_eq!(err.to_string(), "coded image is 4x3 but cypher image is 3x4");

        let err = CodecError::io(
            Stage::Extract,
            io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"),
        );
        assert_eq!(
            err.to_string(),
            "I/O error while writing extracted payload: pipe closed"
        );
    }
}
