//! Laplacian sharpen pass.
//!
//! For every interior pixel and each of R, G, B:
//!
//! ```text
//! v = c + s · (4c − (up + down + left + right))
//! ```
//!
//! rounded and clamped to `0..=255`. Neighbours are always read from the
//! unsharpened input, so the result does not depend on traversal order.
//! Border rows and columns, and the alpha channel, are copied unchanged.

use super::params::Sharpening;
use image::RgbaImage;
use rayon::prelude::*;

/// Sharpen `src` into a new buffer.
pub fn sharpen(src: &RgbaImage, sharpening: Sharpening) -> RgbaImage {
    let (w, h) = src.dimensions();
    let mut out = src.clone();
    if w < 3 || h < 3 || sharpening.strength == 0.0 {
        return out;
    }

    let s = sharpening.strength;
    let stride = w as usize * 4;
    let input: &[u8] = src;
    let buf: &mut [u8] = &mut out;

    buf.par_chunks_mut(stride)
        .enumerate()
        .skip(1)
        .take(h as usize - 2)
        .for_each(|(y, row)| {
            let up = &input[(y - 1) * stride..y * stride];
            let mid = &input[y * stride..(y + 1) * stride];
            let down = &input[(y + 1) * stride..(y + 2) * stride];
            for x in 1..w as usize - 1 {
                for c in 0..3 {
                    let i = x * 4 + c;
                    let centre = f64::from(mid[i]);
                    let neighbours = f64::from(up[i])
                        + f64::from(down[i])
                        + f64::from(mid[i - 4])
                        + f64::from(mid[i + 4]);
                    let v = centre + s * (4.0 * centre - neighbours);
                    row[i] = v.round_ties_even().clamp(0.0, 255.0) as u8;
                }
            }
        });
    out
}
