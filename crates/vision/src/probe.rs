//! Native image dimension probing.
//!
//! Crop rectangles arrive normalized and must be converted against the
//! image's native pixel dimensions. Only the header is decoded; pixel data
//! is never materialized.

use std::io::Cursor;

use image::ImageReader;

use crate::client::VisionError;

/// Read `(width, height)` from an encoded image's header bytes.
pub fn native_dimensions(bytes: &[u8]) -> Result<(u32, u32), VisionError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| VisionError::ImageProbe(format!("unreadable image bytes: {e}")))?;
    reader
        .into_dimensions()
        .map_err(|e| VisionError::ImageProbe(format!("could not read image dimensions: {e}")))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // Smallest valid 1x1 PNG (8-bit grayscale).
    const TINY_PNG: &[u8] = &[
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x00, 0x00, 0x00, 0x00, 0x3A,
        0x7E, 0x9B, 0x55, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x62,
        0x00, 0x00, 0x00, 0x06, 0x00, 0x03, 0x36, 0x37, 0x7C, 0xA8, 0x00, 0x00, 0x00, 0x00, 0x49,
        0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
    ];

    #[test]
    fn reads_png_dimensions_from_header() {
        assert_eq!(native_dimensions(TINY_PNG).unwrap(), (1, 1));
    }

    #[test]
    fn garbage_bytes_rejected() {
        let err = native_dimensions(b"not an image").unwrap_err();
        assert!(matches!(err, VisionError::ImageProbe(_)));
    }
}
