//! Colour pass: applies a [`ColorPipeline`] to RGBA pixels.
//!
//! Formulas follow the CSS Filter Effects definitions, evaluated in sRGB on
//! straight (non-premultiplied) alpha:
//!
//! | Op | Effect on `[r, g, b]` in `0..=1` |
//! |---|---|
//! | brightness(a) | `c · a` |
//! | contrast(a) | `(c - 0.5) · a + 0.5` |
//! | invert(a) | `a · (1 - c) + (1 - a) · c` |
//! | saturate, sepia, grayscale, hue-rotate | 3×3 colour matrix |
//! | opacity(a) | alpha `· a` |
//! | blur(px) | gaussian blur, σ = px |
//!
//! Every op clamps its result to `0..=1` before the next one runs. Runs of
//! per-pixel ops are evaluated in floating point and quantized once; blur
//! works on the quantized buffer between runs.
//!
//! Fully transparent pixels always read back as `[0, 0, 0, 0]`, the way a
//! premultiplied canvas stores them. Ops never lift colour into the empty
//! corners of a rotated canvas.

use crate::pipeline::{ColorOp, ColorPipeline};
use image::RgbaImage;
use rayon::prelude::*;

/// Per-pixel form of a colour op.
#[derive(Debug, Clone, Copy, PartialEq)]
enum PixelOp {
    /// `rgb' = m · [r, g, b, 1]`
    Affine([[f32; 4]; 3]),
    Opacity(f32),
}

fn diagonal(scale: f32, offset: f32) -> PixelOp {
    PixelOp::Affine([
        [scale, 0.0, 0.0, offset],
        [0.0, scale, 0.0, offset],
        [0.0, 0.0, scale, offset],
    ])
}

fn matrix(m: [[f32; 3]; 3]) -> PixelOp {
    PixelOp::Affine([
        [m[0][0], m[0][1], m[0][2], 0.0],
        [m[1][0], m[1][1], m[1][2], 0.0],
        [m[2][0], m[2][1], m[2][2], 0.0],
    ])
}

fn saturate_matrix(s: f32) -> PixelOp {
    matrix([
        [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
    ])
}

fn sepia_matrix(amount: f32) -> PixelOp {
    let a = 1.0 - amount;
    matrix([
        [0.393 + 0.607 * a, 0.769 - 0.769 * a, 0.189 - 0.189 * a],
        [0.349 - 0.349 * a, 0.686 + 0.314 * a, 0.168 - 0.168 * a],
        [0.272 - 0.272 * a, 0.534 - 0.534 * a, 0.131 + 0.869 * a],
    ])
}

fn grayscale_matrix(amount: f32) -> PixelOp {
    let a = 1.0 - amount;
    matrix([
        [0.2126 + 0.7874 * a, 0.7152 - 0.7152 * a, 0.0722 - 0.0722 * a],
        [0.2126 - 0.2126 * a, 0.7152 + 0.2848 * a, 0.0722 - 0.0722 * a],
        [0.2126 - 0.2126 * a, 0.7152 - 0.7152 * a, 0.0722 + 0.9278 * a],
    ])
}

fn hue_rotate_matrix(degrees: f32) -> PixelOp {
    let (sin, cos) = degrees.to_radians().sin_cos();
    matrix([
        [
            0.213 + cos * 0.787 - sin * 0.213,
            0.715 - cos * 0.715 - sin * 0.715,
            0.072 - cos * 0.072 + sin * 0.928,
        ],
        [
            0.213 - cos * 0.213 + sin * 0.143,
            0.715 + cos * 0.285 + sin * 0.140,
            0.072 - cos * 0.072 - sin * 0.283,
        ],
        [
            0.213 - cos * 0.213 - sin * 0.787,
            0.715 - cos * 0.715 + sin * 0.715,
            0.072 + cos * 0.928 + sin * 0.072,
        ],
    ])
}

/// Per-pixel form of `op`, or `None` for neighbourhood ops (blur).
fn pixel_op(op: &ColorOp) -> Option<PixelOp> {
    let op = match *op {
        ColorOp::Brightness(a) => diagonal(a as f32, 0.0),
        ColorOp::Contrast(a) => diagonal(a as f32, 0.5 - 0.5 * a as f32),
        ColorOp::Invert(a) => diagonal(1.0 - 2.0 * a as f32, a as f32),
        ColorOp::Saturate(s) => saturate_matrix(s as f32),
        ColorOp::Sepia(a) => sepia_matrix(a.min(1.0) as f32),
        ColorOp::Grayscale(a) => grayscale_matrix(a.min(1.0) as f32),
        ColorOp::HueRotate(deg) => hue_rotate_matrix(deg as f32),
        ColorOp::Opacity(a) => PixelOp::Opacity(a.clamp(0.0, 1.0) as f32),
        ColorOp::Blur(_) => return None,
    };
    Some(op)
}

/// One stage of the colour pass.
#[derive(Debug, Clone, PartialEq)]
enum Stage {
    Pixels(Vec<PixelOp>),
    Blur(f32),
}

fn plan_stages(pipeline: &ColorPipeline) -> Vec<Stage> {
    let mut stages: Vec<Stage> = Vec::new();
    for op in pipeline.ops() {
        match (pixel_op(op), op) {
            (Some(p), _) => match stages.last_mut() {
                Some(Stage::Pixels(run)) => run.push(p),
                _ => stages.push(Stage::Pixels(vec![p])),
            },
            (None, ColorOp::Blur(px)) if *px > 0.0 => stages.push(Stage::Blur(*px as f32)),
            (None, _) => {}
        }
    }
    stages
}

#[inline]
fn apply_pixel_ops(px: &mut [u8], ops: &[PixelOp]) {
    if px[3] == 0 {
        px.fill(0);
        return;
    }
    let mut rgb = [
        f32::from(px[0]) / 255.0,
        f32::from(px[1]) / 255.0,
        f32::from(px[2]) / 255.0,
    ];
    let mut alpha = f32::from(px[3]) / 255.0;

    for op in ops {
        match op {
            PixelOp::Affine(m) => {
                let [r, g, b] = rgb;
                rgb = [0, 1, 2].map(|row| {
                    (m[row][0] * r + m[row][1] * g + m[row][2] * b + m[row][3]).clamp(0.0, 1.0)
                });
            }
            PixelOp::Opacity(a) => alpha *= a,
        }
    }

    for (dst, v) in px.iter_mut().zip([rgb[0], rgb[1], rgb[2], alpha]) {
        *dst = (v * 255.0).round().clamp(0.0, 255.0) as u8;
    }
    if px[3] == 0 {
        px.fill(0);
    }
}

fn clear_transparent(image: &mut RgbaImage) {
    let buf: &mut [u8] = &mut *image;
    buf.par_chunks_mut(4).for_each(|px| {
        if px[3] == 0 {
            px.fill(0);
        }
    });
}

/// Apply every op of `pipeline` to `image`, in order.
///
/// An empty pipeline leaves the buffer untouched.
pub fn apply_color_pipeline(image: &mut RgbaImage, pipeline: &ColorPipeline) {
    if pipeline.is_empty() {
        return;
    }
    for stage in plan_stages(pipeline) {
        match stage {
            Stage::Pixels(ops) => {
                let buf: &mut [u8] = &mut *image;
                buf.par_chunks_mut(4)
                    .for_each(|px| apply_pixel_ops(px, &ops));
            }
            Stage::Blur(sigma) => {
                *image = image::imageops::blur(&*image, sigma);
                clear_transparent(image);
            }
        }
    }
}
