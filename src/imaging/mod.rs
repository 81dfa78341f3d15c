//! Raster compositing in pure Rust, built on the `image` crate.
//!
//! | Pass | Module | Crate / function |
//! |---|---|---|
//! | **Canvas sizing** | [`calculations`] | rotated bounding box, surface limits |
//! | **Geometry** | `geometry` | `imageops::rotate90/180/270`, `flip_horizontal`; bilinear inverse mapping otherwise |
//! | **Colour** | `color` | CSS Filter Effects matrices, `imageops::blur` |
//! | **Sharpen** | `sharpen` | 4-neighbour Laplacian |
//! | **Decode / encode** | [`rust_codec`] | `load_from_memory`, `JpegEncoder`, `PngEncoder` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for canvas math (unit testable)
//! - **Parameters**: Data structures describing bake and export settings
//! - **Passes**: geometry, colour and sharpen, each a pure function of pixels
//! - **Codec**: [`ImageCodec`] trait + [`RustCodec`]
//! - **Operations**: Save flow combining codec and bake

mod bake;
pub mod calculations;
pub mod codec;
mod color;
mod geometry;
pub mod operations;
mod params;
pub mod rust_codec;
mod sharpen;

pub use bake::bake;
pub use calculations::{CropRect, fits_surface, quarter_turns, rotated_bounds, viewport_rect};
pub use codec::{BakeError, ImageCodec, SourceImage};
pub use color::apply_color_pipeline;
pub use geometry::render_transformed;
pub use operations::{BatchSource, save_batch, save_edit};
pub use params::{BakeOptions, ExportFormat, ExportParams, Quality, Sharpening};
pub use rust_codec::{RustCodec, encode_jpeg, encode_png, supported_input_extensions};
pub use sharpen::sharpen;
