//! The raster bake: source pixels plus edit state in, final canvas out.
//!
//! Passes run in a fixed order:
//!
//! 1. **Canvas** sized to the bounding box of the rotated source, checked
//!    against the drawable surface limits.
//! 2. **Geometry**: rotation and horizontal flip ([`geometry`](super::geometry)).
//! 3. **Colour**: the same [`ColorPipeline`](crate::pipeline::ColorPipeline)
//!    the live preview shows ([`color`](super::color)).
//! 4. **Sharpen**: 4-neighbour Laplacian, positive sharpness only
//!    ([`sharpen`](super::sharpen)).
//! 5. **Viewport crop**, only when [`BakeOptions::crop_to_viewport`] is set.
//!
//! The result depends on nothing but the arguments.

use super::calculations::{fits_surface, rotated_bounds, viewport_rect};
use super::codec::{BakeError, SourceImage};
use super::color::apply_color_pipeline;
use super::geometry::render_transformed;
use super::params::{BakeOptions, Sharpening};
use super::sharpen::sharpen;
use crate::adjust::{AdjustmentState, CropState};
use crate::filters::FilterCatalog;
use crate::pipeline::build_color_pipeline;
use image::{RgbaImage, imageops};
use tracing::debug;

/// Render the final edited raster.
pub fn bake(
    source: &SourceImage,
    adjustments: &AdjustmentState,
    crop: &CropState,
    catalog: &FilterCatalog,
    options: &BakeOptions,
) -> Result<RgbaImage, BakeError> {
    let span = tracing::debug_span!("bake", origin = source.origin());
    let _enter = span.enter();

    let (width, height) = rotated_bounds(source.width(), source.height(), crop.rotation());
    if !fits_surface(width, height) {
        return Err(BakeError::Surface { width, height });
    }
    debug!(
        src_width = source.width(),
        src_height = source.height(),
        width,
        height,
        rotation = crop.rotation(),
        flip_x = crop.flip_x(),
        "canvas sized"
    );

    let mut canvas = render_transformed(
        source.pixels(),
        crop.rotation(),
        crop.flip_x(),
        (width, height),
    );

    let pipeline = build_color_pipeline(adjustments, catalog);
    if !pipeline.is_empty() {
        debug!(filter = %pipeline.to_css(), "colour pass");
        apply_color_pipeline(&mut canvas, &pipeline);
    }

    if let Some(sharpening) = Sharpening::from_slider(adjustments.sharpness()) {
        debug!(strength = sharpening.strength, "sharpen pass");
        canvas = sharpen(&canvas, sharpening);
    }

    if options.crop_to_viewport {
        let rect = viewport_rect(canvas.dimensions(), crop.zoom(), crop.pan());
        if (rect.width, rect.height) != canvas.dimensions() {
            debug!(?rect, "viewport crop");
            canvas = imageops::crop_imm(&canvas, rect.x, rect.y, rect.width, rect.height)
                .to_image();
        }
    }

    Ok(canvas)
}
