//! Pure calculation functions for bake geometry.
//!
//! All functions here are pure and testable without any pixels or I/O.

/// Largest side a drawing surface may have, in pixels.
pub const MAX_SURFACE_DIMENSION: u32 = 32_767;
/// Largest total area a drawing surface may have, in pixels.
pub const MAX_SURFACE_AREA: u64 = 268_435_456;

/// Trig results this close to 0 or 1 are snapped so right angles give
/// exact integer bounds.
const TRIG_EPSILON: f64 = 1e-9;

fn snap_unit(v: f64) -> f64 {
    if v < TRIG_EPSILON {
        0.0
    } else if 1.0 - v < TRIG_EPSILON {
        1.0
    } else {
        v
    }
}

/// Axis-aligned bounding box of a `width`×`height` image rotated by
/// `degrees` about its centre.
///
/// # Examples
/// ```
/// # use lensbake::imaging::rotated_bounds;
/// assert_eq!(rotated_bounds(100, 50, 90), (50, 100));
/// assert_eq!(rotated_bounds(100, 50, 45), (106, 106));
/// ```
pub fn rotated_bounds(width: u32, height: u32, degrees: i32) -> (u32, u32) {
    let theta = f64::from(degrees).to_radians();
    let sin = snap_unit(theta.sin().abs());
    let cos = snap_unit(theta.cos().abs());
    let (w, h) = (f64::from(width), f64::from(height));

    let out_w = (cos * w + sin * h).round() as u32;
    let out_h = (sin * w + cos * h).round() as u32;
    (out_w, out_h)
}

/// Quarter turns (clockwise) when `degrees` is a multiple of 90.
///
/// ```
/// # use lensbake::imaging::quarter_turns;
/// assert_eq!(quarter_turns(-90), Some(3));
/// assert_eq!(quarter_turns(45), None);
/// ```
pub fn quarter_turns(degrees: i32) -> Option<u8> {
    (degrees % 90 == 0).then(|| (degrees.rem_euclid(360) / 90) as u8)
}

/// Whether a surface of this size can be allocated.
pub fn fits_surface(width: u32, height: u32) -> bool {
    width > 0
        && height > 0
        && width <= MAX_SURFACE_DIMENSION
        && height <= MAX_SURFACE_DIMENSION
        && u64::from(width) * u64::from(height) <= MAX_SURFACE_AREA
}

/// A pixel rectangle inside a canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Window of a `canvas` seen at `zoom`, shifted by `pan`.
///
/// The window is `canvas / zoom` in size, centred on the canvas, then moved
/// opposite to the pan (panning the image right reveals its left part).
/// The window is kept inside the canvas. At 1× or below the whole canvas is
/// returned.
pub fn viewport_rect(canvas: (u32, u32), zoom: f32, pan: (f32, f32)) -> CropRect {
    let (cw, ch) = canvas;
    if zoom <= 1.0 {
        return CropRect {
            x: 0,
            y: 0,
            width: cw,
            height: ch,
        };
    }

    let zoom = f64::from(zoom);
    let width = ((f64::from(cw) / zoom).round() as u32).clamp(1, cw.max(1));
    let height = ((f64::from(ch) / zoom).round() as u32).clamp(1, ch.max(1));

    let place = |extent: u32, window: u32, pan: f32| -> u32 {
        let start = f64::from(extent) / 2.0 - f64::from(pan) - f64::from(window) / 2.0;
        let max_start = f64::from(extent.saturating_sub(window));
        start.round().clamp(0.0, max_start) as u32
    };

    CropRect {
        x: place(cw, width, pan.0),
        y: place(ch, height, pan.1),
        width,
        height,
    }
}
