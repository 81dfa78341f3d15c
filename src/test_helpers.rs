//! Shared test utilities for the lensbake test suite.
//!
//! Fixture builders for in-memory rasters and encoded photos, plus edit
//! state shortcuts used by the bake and save-flow tests.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let source = SourceImage::new("fixture", gradient(6, 4));
//! let state = adjustments(&[(Adjustment::Brightness, 20)]);
//! ```

use std::path::Path;

use image::{ExtendedColorType, ImageEncoder, Rgb, RgbImage, Rgba, RgbaImage};

use crate::adjust::{Adjustment, AdjustmentState};

// =========================================================================
// Rasters
// =========================================================================

/// Single-colour RGBA raster.
pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba(rgba))
}

/// Opaque raster whose pixels differ by position, so rotations and flips
/// are observable.
pub fn gradient(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([
            (x * 7 % 256) as u8,
            (y * 13 % 256) as u8,
            ((x + y) * 3 % 256) as u8,
            255,
        ])
    })
}

// =========================================================================
// Encoded photos
// =========================================================================

/// Encode a small synthetic JPEG in memory.
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut out = std::io::Cursor::new(Vec::new());
    image::codecs::jpeg::JpegEncoder::new(&mut out)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
    out.into_inner()
}

/// Create a small valid JPEG file with the given dimensions.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    std::fs::write(path, jpeg_bytes(width, height)).unwrap();
}

// =========================================================================
// Edit state
// =========================================================================

/// Unfiltered state with the given slider values.
pub fn adjustments(values: &[(Adjustment, i32)]) -> AdjustmentState {
    let mut state = AdjustmentState::new();
    for &(adjustment, value) in values {
        state.try_set(adjustment, value).unwrap();
    }
    state
}
