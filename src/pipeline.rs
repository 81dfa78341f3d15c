//! Adjustment compositor: editing state → declarative preview descriptors.
//!
//! Two builders, both total and deterministic:
//!
//! - [`build_color_pipeline`] turns the selected filter and sliders into an
//!   ordered [`ColorPipeline`]. Order matters: colour operations do not
//!   commute.
//! - [`build_transform`] turns rotation and flip into an ordered
//!   [`Transform`].
//!
//! The display layer consumes these as CSS (`to_css`) or JSON. The same
//! pipeline drives the raster bake in [`crate::imaging::bake()`], so the live
//! preview and the exported image agree on colour.
//!
//! ```text
//! brightness=10, contrast=-10, temperature=20, filter=warm
//!   → sepia(0.3) saturate(1.4) brightness(1.1) contrast(0.9) sepia(0.2)
//! ```

use crate::adjust::{AdjustmentState, CropState};
use crate::filters::FilterCatalog;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single parametrized colour operation, CSS Filter Effects semantics.
///
/// Amounts are multipliers (`1.0` = unchanged) for brightness, contrast and
/// saturate; proportions in `0..=1` for grayscale, sepia, invert and
/// opacity; degrees for hue-rotate; pixels for blur.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "amount", rename_all = "kebab-case")]
pub enum ColorOp {
    Brightness(f64),
    Contrast(f64),
    Saturate(f64),
    Sepia(f64),
    Grayscale(f64),
    Invert(f64),
    Opacity(f64),
    HueRotate(f64),
    Blur(f64),
}

impl fmt::Display for ColorOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Brightness(v) => write!(f, "brightness({v})"),
            Self::Contrast(v) => write!(f, "contrast({v})"),
            Self::Saturate(v) => write!(f, "saturate({v})"),
            Self::Sepia(v) => write!(f, "sepia({v})"),
            Self::Grayscale(v) => write!(f, "grayscale({v})"),
            Self::Invert(v) => write!(f, "invert({v})"),
            Self::Opacity(v) => write!(f, "opacity({v})"),
            Self::HueRotate(deg) => write!(f, "hue-rotate({deg}deg)"),
            Self::Blur(px) => write!(f, "blur({px}px)"),
        }
    }
}

/// A geometric operation applied around the image centre.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "degrees", rename_all = "kebab-case")]
pub enum SpatialOp {
    Rotate(i32),
    FlipHorizontal,
}

impl fmt::Display for SpatialOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rotate(deg) => write!(f, "rotate({deg}deg)"),
            Self::FlipHorizontal => f.write_str("scaleX(-1)"),
        }
    }
}

/// Ordered colour operations. Empty means identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorPipeline(Vec<ColorOp>);

impl ColorPipeline {
    pub fn new(ops: Vec<ColorOp>) -> Self {
        Self(ops)
    }

    pub fn ops(&self) -> &[ColorOp] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// CSS `filter` value; empty string for the identity pipeline.
    pub fn to_css(&self) -> String {
        join_css(&self.0)
    }
}

/// Ordered spatial operations. Empty means identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transform(Vec<SpatialOp>);

impl Transform {
    pub fn ops(&self) -> &[SpatialOp] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// CSS `transform` value; empty string for the identity transform.
    pub fn to_css(&self) -> String {
        join_css(&self.0)
    }
}

fn join_css<T: fmt::Display>(ops: &[T]) -> String {
    ops.iter()
        .map(|op| op.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Build the colour pipeline for an adjustment state.
///
/// The selected filter's operations come first, in catalog order, then one
/// operation per non-zero slider: brightness, contrast, saturation,
/// temperature. Positive temperature warms with sepia, negative cools with
/// a hue rotation. Sharpness never appears here; the bake handles it with a
/// convolution pass.
pub fn build_color_pipeline(state: &AdjustmentState, catalog: &FilterCatalog) -> ColorPipeline {
    let mut ops = state
        .effective_filter()
        .and_then(|name| catalog.color_ops(name))
        .unwrap_or_default();

    if state.brightness() != 0 {
        ops.push(ColorOp::Brightness(slider_factor(state.brightness())));
    }
    if state.contrast() != 0 {
        ops.push(ColorOp::Contrast(slider_factor(state.contrast())));
    }
    if state.saturation() != 0 {
        ops.push(ColorOp::Saturate(slider_factor(state.saturation())));
    }
    let temperature = state.temperature();
    if temperature > 0 {
        ops.push(ColorOp::Sepia(f64::from(temperature) / 100.0));
    } else if temperature < 0 {
        ops.push(ColorOp::HueRotate(f64::from(temperature)));
    }

    ColorPipeline(ops)
}

/// `1 + value / 100`: maps a slider in `-50..=50` to a `0.5..=1.5` multiplier.
fn slider_factor(value: i32) -> f64 {
    1.0 + f64::from(value) / 100.0
}

/// Build the spatial transform: rotation first, then horizontal flip.
///
/// Zoom and pan are left to the preview viewport.
pub fn build_transform(crop: &CropState) -> Transform {
    let mut ops = Vec::new();
    if crop.rotation() != 0 {
        ops.push(SpatialOp::Rotate(crop.rotation()));
    }
    if crop.flip_x() {
        ops.push(SpatialOp::FlipHorizontal);
    }
    Transform(ops)
}

/// Zoomed/panned window shown by the preview.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub zoom: f32,
    pub pan_x: f32,
    pub pan_y: f32,
}

impl Viewport {
    /// The viewport of a crop state, or `None` at 1× or below.
    pub fn of(crop: &CropState) -> Option<Self> {
        (crop.zoom() > 1.0).then(|| {
            let (pan_x, pan_y) = crop.pan();
            Self {
                zoom: crop.zoom(),
                pan_x,
                pan_y,
            }
        })
    }
}

/// Everything the live preview needs to render one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preview {
    pub color: ColorPipeline,
    pub transform: Transform,
    /// Cheap stand-in for the sharpen pass. Never used by the bake.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sharpness_proxy: Option<ColorOp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewport: Option<Viewport>,
    /// Scale of the zoomed-out preview; 1.0 once zoom reaches 1× or more.
    pub scale: f32,
}

impl Preview {
    /// CSS `filter` value including the sharpness proxy.
    pub fn filter_css(&self) -> String {
        let mut ops = self.color.ops().to_vec();
        ops.extend(self.sharpness_proxy);
        join_css(&ops)
    }

    pub fn transform_css(&self) -> String {
        self.transform.to_css()
    }
}

/// Approximate sharpening for the live preview: a mild contrast boost for
/// positive values, a gaussian blur for negative ones.
pub fn sharpness_proxy(sharpness: i32) -> Option<ColorOp> {
    match sharpness {
        0 => None,
        s if s > 0 => Some(ColorOp::Contrast(1.0 + f64::from(s) / 200.0)),
        s => Some(ColorOp::Blur(f64::from(-s) / 25.0)),
    }
}

/// Build the full preview descriptor for the current editing state.
pub fn build_preview(
    state: &AdjustmentState,
    crop: &CropState,
    catalog: &FilterCatalog,
) -> Preview {
    Preview {
        color: build_color_pipeline(state, catalog),
        transform: build_transform(crop),
        sharpness_proxy: sharpness_proxy(state.sharpness()),
        viewport: Viewport::of(crop),
        scale: crop.zoom().min(1.0),
    }
}
