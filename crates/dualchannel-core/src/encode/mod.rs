//! Encoding of composed frames for transport.
//!
//! This module provides functionality for:
//! - Encoding the black-background composite to JPEG with configurable or adaptive quality
//! - Encoding to PNG when lossless output is needed
//!
//! # Architecture
//!
//! The encoding step runs in the same worker as composition, after
//! [`compose_frame`](crate::compose::compose_frame). All operations are
//! synchronous and single-threaded.
//!
//! # Examples
//!
//! ```ignore
//! use dualchannel_core::encode::encode_composite;
//!
//! let composed = compose_frame(&frame, &options)?;
//! let bytes = encode_composite(&composed, &options)?;
//! ```

mod jpeg;
mod png;

pub use jpeg::encode_jpeg;
pub use png::encode_png;

use crate::compose::DualChannelFrame;
use crate::ComposeOptions;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The underlying encoder failed
    #[error("{format} encoding failed: {message}")]
    EncodingFailed {
        format: OutputFormat,
        message: String,
    },
}

/// Container format for encoded composites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Lossy JPEG (smallest output).
    #[default]
    Jpeg,
    /// Lossless PNG.
    Png,
}

impl OutputFormat {
    /// MIME type for Blob construction on the JS side.
    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Jpeg => f.write_str("JPEG"),
            OutputFormat::Png => f.write_str("PNG"),
        }
    }
}

/// Pick a JPEG quality from the output size.
///
/// Small outputs keep more detail; very large ones trade quality for size.
///
/// | Output pixels       | Quality |
/// |---------------------|---------|
/// | < 500 000           | 70      |
/// | 500 000 - 2 000 000 | 60      |
/// | > 2 000 000         | 50      |
pub fn adaptive_jpeg_quality(width: u32, height: u32) -> u8 {
    let total_pixels = width as u64 * height as u64;
    if total_pixels < 500_000 {
        70
    } else if total_pixels > 2_000_000 {
        50
    } else {
        60
    }
}

/// Encode the black-background composite of a frame in the configured format.
///
/// JPEG quality is `options.quality` if set, otherwise [`adaptive_jpeg_quality`].
pub fn encode_composite(
    frame: &DualChannelFrame,
    options: &ComposeOptions,
) -> Result<Vec<u8>, EncodeError> {
    match options.format {
        OutputFormat::Jpeg => {
            let quality = options.jpeg_quality(frame.width, frame.height);
            encode_jpeg(&frame.black_bg, frame.width, frame.height, quality)
        }
        OutputFormat::Png => encode_png(&frame.black_bg, frame.width, frame.height),
    }
}

/// Validate an RGBA buffer against its dimensions.
fn validate_rgba(pixels: &[u8], width: u32, height: u32) -> Result<(), EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected = (width as usize) * (height as usize) * 4;
    if pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: pixels.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::{compose_frame, SourceFrame};

    fn composed(width: u32, height: u32) -> DualChannelFrame {
        let pixels: Vec<u8> = (0..width * height)
            .flat_map(|i| {
                let a = (i % 256) as u8;
                [a / 2, a / 3, a / 4, a]
            })
            .collect();
        let frame = SourceFrame::new(&pixels, width, height).unwrap();
        compose_frame(&frame, &ComposeOptions::default()).unwrap()
    }

    #[test]
    fn test_adaptive_quality_thresholds() {
        assert_eq!(adaptive_jpeg_quality(640, 480), 70);
        assert_eq!(adaptive_jpeg_quality(1000, 500), 60);
        assert_eq!(adaptive_jpeg_quality(2000, 1000), 60);
        assert_eq!(adaptive_jpeg_quality(2000, 1001), 50);
        assert_eq!(adaptive_jpeg_quality(3840, 1080), 50);
    }

    #[test]
    fn test_output_format_default_and_mime() {
        assert_eq!(OutputFormat::default(), OutputFormat::Jpeg);
        assert_eq!(OutputFormat::Jpeg.mime_type(), "image/jpeg");
        assert_eq!(OutputFormat::Png.mime_type(), "image/png");
    }

    #[test]
    fn test_encode_composite_jpeg() {
        let frame = composed(16, 8);
        let bytes = encode_composite(&frame, &ComposeOptions::default()).unwrap();
        assert_eq!(&bytes[0..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_encode_composite_png() {
        let frame = composed(16, 8);
        let mut options = ComposeOptions::default();
        options.format = OutputFormat::Png;

        let bytes = encode_composite(&frame, &options).unwrap();
        assert_eq!(&bytes[0..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }

    #[test]
    fn test_encode_composite_png_roundtrips_black_bg() {
        let frame = composed(9, 4);
        let mut options = ComposeOptions::default();
        options.format = OutputFormat::Png;

        let bytes = encode_composite(&frame, &options).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (18, 4));
        assert_eq!(decoded.into_raw(), frame.black_bg);
    }

    #[test]
    fn test_validate_rgba() {
        assert!(validate_rgba(&[0u8; 16], 2, 2).is_ok());
        assert!(matches!(
            validate_rgba(&[0u8; 12], 2, 2),
            Err(EncodeError::InvalidPixelData {
                expected: 16,
                actual: 12
            })
        ));
        assert!(matches!(
            validate_rgba(&[], 0, 2),
            Err(EncodeError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_encode_error_display() {
        let err = EncodeError::EncodingFailed {
            format: OutputFormat::Png,
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "PNG encoding failed: boom");
    }
}
