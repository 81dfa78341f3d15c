//! Geometric pass: draws the source onto a rotated/flipped canvas.
//!
//! The drawing model is the canvas one: translate to the output centre,
//! rotate by θ (clockwise on screen), mirror X when flipping, then draw the
//! source centred on the origin. A source point `s` (relative to the source
//! centre) lands at `centre_out + R(θ) · F · s`.
//!
//! Right angles take an exact path built from lossless `image::imageops`
//! rotations, so quarter and half turns never resample. Any other angle is
//! inverse-mapped with bilinear sampling; canvas area not covered by the
//! source stays transparent.

use super::calculations::quarter_turns;
use image::{Rgba, RgbaImage, imageops};
use rayon::prelude::*;

/// Render `src` rotated by `degrees` and optionally mirrored onto a canvas
/// of `canvas` size.
pub fn render_transformed(
    src: &RgbaImage,
    degrees: i32,
    flip_x: bool,
    canvas: (u32, u32),
) -> RgbaImage {
    match quarter_turns(degrees) {
        Some(turns) if exact_fits(src, turns, canvas) => render_quarter_turns(src, turns, flip_x),
        _ => render_resampled(src, degrees, flip_x, canvas),
    }
}

fn exact_fits(src: &RgbaImage, turns: u8, canvas: (u32, u32)) -> bool {
    let (w, h) = src.dimensions();
    if turns % 2 == 0 {
        canvas == (w, h)
    } else {
        canvas == (h, w)
    }
}

/// Lossless path: mirror first, then rotate clockwise.
fn render_quarter_turns(src: &RgbaImage, turns: u8, flip_x: bool) -> RgbaImage {
    let flipped;
    let base = if flip_x {
        flipped = imageops::flip_horizontal(src);
        &flipped
    } else {
        src
    };
    match turns {
        1 => imageops::rotate90(base),
        2 => imageops::rotate180(base),
        3 => imageops::rotate270(base),
        _ => base.clone(),
    }
}

/// General path: inverse-map every output pixel centre into the source.
fn render_resampled(src: &RgbaImage, degrees: i32, flip_x: bool, canvas: (u32, u32)) -> RgbaImage {
    let (out_w, out_h) = canvas;
    let mut out = RgbaImage::new(out_w, out_h);
    if out_w == 0 || out_h == 0 {
        return out;
    }

    let (sin, cos) = f64::from(degrees).to_radians().sin_cos();
    let half_out = (f64::from(out_w) / 2.0, f64::from(out_h) / 2.0);
    let half_src = (
        f64::from(src.width()) / 2.0,
        f64::from(src.height()) / 2.0,
    );
    let mirror = if flip_x { -1.0 } else { 1.0 };

    let stride = out_w as usize * 4;
    let buf: &mut [u8] = &mut out;
    buf.par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row)| {
            let dy = y as f64 + 0.5 - half_out.1;
            for x in 0..out_w as usize {
                let dx = x as f64 + 0.5 - half_out.0;
                // R(-θ) undoes the rotation, then the mirror undoes the flip
                let rx = (dx * cos + dy * sin) * mirror;
                let ry = -dx * sin + dy * cos;
                let px = sample_bilinear(src, rx + half_src.0 - 0.5, ry + half_src.1 - 0.5);
                row[x * 4..x * 4 + 4].copy_from_slice(&px.0);
            }
        });
    out
}

/// Bilinear sample at continuous pixel-index coordinates.
///
/// Texels outside the source count as transparent. Interpolation is done on
/// premultiplied values so transparent neighbours do not darken edges.
fn sample_bilinear(src: &RgbaImage, x: f64, y: f64) -> Rgba<u8> {
    let (w, h) = (i64::from(src.width()), i64::from(src.height()));
    let (x0, y0) = (x.floor(), y.floor());
    let (fx, fy) = (x - x0, y - y0);
    let (x0, y0) = (x0 as i64, y0 as i64);

    let taps = [
        (x0, y0, (1.0 - fx) * (1.0 - fy)),
        (x0 + 1, y0, fx * (1.0 - fy)),
        (x0, y0 + 1, (1.0 - fx) * fy),
        (x0 + 1, y0 + 1, fx * fy),
    ];

    let mut acc = [0.0f64; 4];
    for (tx, ty, weight) in taps {
        if weight <= 0.0 || tx < 0 || ty < 0 || tx >= w || ty >= h {
            continue;
        }
        let p = src.get_pixel(tx as u32, ty as u32).0;
        let a = f64::from(p[3]) * weight;
        acc[0] += f64::from(p[0]) * a;
        acc[1] += f64::from(p[1]) * a;
        acc[2] += f64::from(p[2]) * a;
        acc[3] += a;
    }

    if acc[3] <= f64::EPSILON {
        return Rgba([0, 0, 0, 0]);
    }
    let channel = |v: f64| v.round().clamp(0.0, 255.0) as u8;
    Rgba([
        channel(acc[0] / acc[3]),
        channel(acc[1] / acc[3]),
        channel(acc[2] / acc[3]),
        channel(acc[3]),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::calculations::rotated_bounds;

    /// 3×2 image with a distinct colour per pixel.
    fn labelled() -> RgbaImage {
        RgbaImage::from_fn(3, 2, |x, y| Rgba([(x * 50) as u8, (y * 100) as u8, 7, 255]))
    }

    fn render(src: &RgbaImage, degrees: i32, flip: bool) -> RgbaImage {
        let (w, h) = src.dimensions();
        render_transformed(src, degrees, flip, rotated_bounds(w, h, degrees))
    }

    #[test]
    fn zero_rotation_is_exact_copy() {
        let src = labelled();
        assert_eq!(render(&src, 0, false), src);
    }

    #[test]
    fn quarter_turn_is_clockwise() {
        let src = labelled();
        let out = render(&src, 90, false);
        assert_eq!(out.dimensions(), (2, 3));
        // top-left of the output is the source's bottom-left
        assert_eq!(out.get_pixel(0, 0), src.get_pixel(0, 1));
        assert_eq!(out.get_pixel(1, 0), src.get_pixel(0, 0));
    }

    #[test]
    fn negative_quarter_turn_matches_three_quarters() {
        let src = labelled();
        assert_eq!(render(&src, -90, false), render(&src, 270, false));
    }

    #[test]
    fn half_turn_reverses_pixels() {
        let src = labelled();
        let out = render(&src, 180, false);
        assert_eq!(out.dimensions(), (3, 2));
        assert_eq!(out.get_pixel(0, 0), src.get_pixel(2, 1));
        assert_eq!(out.get_pixel(2, 1), src.get_pixel(0, 0));
    }

    #[test]
    fn flip_mirrors_columns() {
        let src = labelled();
        let out = render(&src, 0, true);
        assert_eq!(out.get_pixel(0, 0), src.get_pixel(2, 0));
        assert_eq!(out.get_pixel(2, 1), src.get_pixel(0, 1));
    }

    #[test]
    fn flip_applies_before_rotation() {
        let src = labelled();
        let out = render(&src, 90, true);
        // mirrored source's bottom-left is the original bottom-right
        assert_eq!(out.get_pixel(0, 0), src.get_pixel(2, 1));
    }

    #[test]
    fn resampled_path_matches_exact_path_at_right_angles() {
        let src = labelled();
        let exact = render(&src, 90, false);
        let resampled = render_resampled(&src, 90, false, (2, 3));
        assert_eq!(exact, resampled);
    }

    #[test]
    fn flipped_resampled_path_matches_exact_path_at_right_angles() {
        let src = labelled();
        for degrees in [90, 180, 270] {
            let exact = render(&src, degrees, true);
            let resampled = render_resampled(&src, degrees, true, exact.dimensions());
            assert_eq!(exact, resampled, "{degrees}°");
        }
    }

    #[test]
    fn flip_at_arbitrary_angle_mirrors_the_opposite_rotation() {
        // F then R(θ), seen in a mirror, is R(-θ)
        let src = RgbaImage::from_fn(24, 12, |x, y| {
            Rgba([(x * 10) as u8, (y * 20) as u8, if x < 12 { 0 } else { 255 }, 255])
        });
        let flipped = render(&src, 30, true);
        let mirrored = imageops::flip_horizontal(&render(&src, -30, false));
        assert_eq!(flipped, mirrored);
        assert_ne!(flipped, render(&src, 30, false));
    }

    #[test]
    fn flip_at_arbitrary_angle_moves_right_half_left() {
        let src = RgbaImage::from_fn(20, 20, |x, _| {
            if x < 10 { Rgba([255, 0, 0, 255]) } else { Rgba([0, 0, 255, 255]) }
        });
        let out = render(&src, 10, true);
        let (w, h) = out.dimensions();
        // the centre row's left side now shows the source's right half
        assert_eq!(out.get_pixel(w / 2 - 5, h / 2).0, [0, 0, 255, 255]);
        assert_eq!(out.get_pixel(w / 2 + 5, h / 2).0, [255, 0, 0, 255]);
    }

    #[test]
    fn arbitrary_angle_leaves_corners_transparent() {
        let src = RgbaImage::from_pixel(20, 20, Rgba([200, 10, 10, 255]));
        let out = render(&src, 45, false);
        assert_eq!(out.dimensions(), (28, 28));
        assert_eq!(out.get_pixel(0, 0).0[3], 0);
        assert_eq!(out.get_pixel(27, 27).0[3], 0);
        assert_eq!(out.get_pixel(14, 14).0, [200, 10, 10, 255]);
    }

    #[test]
    fn edge_blending_keeps_colour() {
        let src = RgbaImage::from_pixel(20, 20, Rgba([30, 60, 90, 255]));
        let out = render(&src, 30, false);
        for px in out.pixels().filter(|p| p.0[3] > 0) {
            assert_eq!(&px.0[..3], &[30, 60, 90]);
        }
    }
}
