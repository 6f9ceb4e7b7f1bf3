//! Crop rectangle handling for scoped attribute extraction.
//!
//! Clients send crop rectangles in normalized 0–1 coordinates. The vision
//! model is never shown normalized coordinates, so the extractor converts
//! to absolute pixel bounds against the image's native dimensions first.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A crop rectangle in normalized coordinates (each component in `[0, 1]`,
/// relative to the original image's native pixel dimensions).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A crop rectangle in absolute pixels against a specific image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    /// Validate that the rectangle is non-empty and fits inside the unit
    /// square.
    pub fn validate(&self) -> Result<(), CoreError> {
        for (name, value) in [("x", self.x), ("y", self.y)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(CoreError::Validation(format!(
                    "crop {name} must be between 0.0 and 1.0, got {value}"
                )));
            }
        }
        for (name, value) in [("width", self.width), ("height", self.height)] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(CoreError::Validation(format!(
                    "crop {name} must be in (0.0, 1.0], got {value}"
                )));
            }
        }
        if self.x + self.width > 1.0 + f64::EPSILON {
            return Err(CoreError::Validation(
                "crop extends past the right edge (x + width > 1.0)".to_string(),
            ));
        }
        if self.y + self.height > 1.0 + f64::EPSILON {
            return Err(CoreError::Validation(
                "crop extends past the bottom edge (y + height > 1.0)".to_string(),
            ));
        }
        Ok(())
    }

    /// Convert to absolute pixel bounds as `round(normalized * native)`.
    ///
    /// Rounding can nudge the rectangle past the image edge or collapse a
    /// very thin crop to zero; the result is clamped back inside the image
    /// and kept at least one pixel wide and tall.
    pub fn to_pixel_bounds(&self, native_width: u32, native_height: u32) -> PixelRect {
        let round = |normalized: f64, native: u32| (normalized * native as f64).round() as u32;

        let x = round(self.x, native_width).min(native_width.saturating_sub(1));
        let y = round(self.y, native_height).min(native_height.saturating_sub(1));
        let width = round(self.width, native_width).clamp(1, native_width - x);
        let height = round(self.height, native_height).clamp(1, native_height - y);

        PixelRect {
            x,
            y,
            width,
            height,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_image_crop() {
        let crop = CropRect {
            x: 0.0,
            y: 0.0,
            width: 1.0,
            height: 1.0,
        };
        assert!(crop.validate().is_ok());
        assert_eq!(
            crop.to_pixel_bounds(800, 600),
            PixelRect {
                x: 0,
                y: 0,
                width: 800,
                height: 600
            }
        );
    }

    #[test]
    fn pixel_bounds_are_rounded() {
        let crop = CropRect {
            x: 0.25,
            y: 0.1,
            width: 0.5,
            height: 0.333,
        };
        let px = crop.to_pixel_bounds(1001, 997);
        // round(0.25 * 1001) = 250, round(0.5 * 1001) = 501 (round, not trunc)
        assert_eq!(px.x, 250);
        assert_eq!(px.width, 501);
        assert_eq!(px.y, 100);
        assert_eq!(px.height, 332);
    }

    #[test]
    fn thin_crop_keeps_one_pixel() {
        let crop = CropRect {
            x: 0.5,
            y: 0.5,
            width: 0.0001,
            height: 0.0001,
        };
        let px = crop.to_pixel_bounds(100, 100);
        assert_eq!(px.width, 1);
        assert_eq!(px.height, 1);
    }

    #[test]
    fn rounding_never_escapes_the_image() {
        let crop = CropRect {
            x: 0.996,
            y: 0.996,
            width: 0.004,
            height: 0.004,
        };
        let px = crop.to_pixel_bounds(250, 250);
        assert!(px.x + px.width <= 250);
        assert!(px.y + px.height <= 250);
    }

    #[test]
    fn out_of_range_rejected() {
        let bad = CropRect {
            x: -0.1,
            y: 0.0,
            width: 0.5,
            height: 0.5,
        };
        assert!(bad.validate().is_err());

        let overflow = CropRect {
            x: 0.8,
            y: 0.0,
            width: 0.5,
            height: 0.5,
        };
        assert!(overflow.validate().is_err());
    }

    #[test]
    fn zero_area_rejected() {
        let empty = CropRect {
            x: 0.2,
            y: 0.2,
            width: 0.0,
            height: 0.5,
        };
        assert!(empty.validate().is_err());
    }
}
