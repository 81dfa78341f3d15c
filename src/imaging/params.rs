//! Parameter types for bake and export.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the high-level [`operations`](super::operations) module
//! (which decides what to bake and how to export it) and the
//! [`codec`](super::codec) (which does the encoding work). This separation
//! allows swapping codecs (e.g. for testing with a mock) without changing
//! operation logic.
//!
//! ## Types
//!
//! - [`Quality`]: Lossy encoding quality (1–100, default 90). Clamped on construction.
//! - [`Sharpening`]: Laplacian sharpen strength derived from the sharpness slider.
//! - [`ExportFormat`]: Output container (JPEG by default, PNG for lossless).
//! - [`BakeOptions`]: Switches that change what the bake produces.
//! - [`ExportParams`]: Format + quality + bake options for one save.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    /// Quality from a `0.0..=1.0` fraction, as canvas export APIs take it.
    pub fn from_fraction(fraction: f32) -> Self {
        Self::new((fraction.clamp(0.0, 1.0) * 100.0).round() as u32)
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Strength of the 4-neighbour Laplacian sharpen pass.
///
/// - `strength`: weight of the Laplacian added back to each sample, in `(0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sharpening {
    pub strength: f64,
}

impl Sharpening {
    /// Sharpening for a slider value: `sharpness / 50`.
    ///
    /// Only positive values sharpen. Zero and negative values return `None`.
    pub fn from_slider(sharpness: i32) -> Option<Self> {
        (sharpness > 0).then(|| Self {
            strength: f64::from(sharpness) / 50.0,
        })
    }
}

/// Encoded output container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Jpeg,
    Png,
}

impl ExportFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Jpeg => f.write_str("JPEG"),
            Self::Png => f.write_str("PNG"),
        }
    }
}

/// Switches that change what the bake produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BakeOptions {
    /// Crop the baked canvas to the zoomed/panned preview window.
    /// Off by default: exports are full frame.
    pub crop_to_viewport: bool,
}

/// Full specification of one export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportParams {
    pub format: ExportFormat,
    pub quality: Quality,
    pub bake: BakeOptions,
}
