//! # lensbake
//!
//! Adjustment compositor and raster bake engine for a mobile photo editor.
//! A user picks a base filter, moves five sliders, rotates and flips the
//! photo; lensbake turns that editing state into (a) declarative descriptors
//! a live preview can render cheaply and (b) a full-resolution raster with
//! every edit burned in.
//!
//! # Architecture: Two Compositors, One Pipeline
//!
//! ```text
//!                 ┌──────────────────────────┐
//! AdjustmentState │  Adjustment Compositor   │  ColorPipeline ──► CSS filter (preview)
//! CropState     ──►  (pipeline)              ├─ Transform     ──► CSS transform (preview)
//! FilterCatalog   └────────────┬─────────────┘
//!                              │ same ColorPipeline
//!                 ┌────────────▼─────────────┐
//! SourceImage   ──►  Raster Compositor       ├─► RgbaImage ──► JPEG / PNG + EditRecord
//!                 │  (imaging::bake)         │
//!                 └──────────────────────────┘
//! ```
//!
//! The bake consumes the very [`pipeline::ColorPipeline`] the preview shows,
//! so colour never drifts between the two. Only sharpness differs on
//! purpose: the preview uses a cheap contrast/blur stand-in, the bake runs a
//! real Laplacian sharpen.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`adjust`] | Slider and crop state, always within range |
//! | [`filters`] | Filter catalog and the CSS `filter` expression parser |
//! | [`pipeline`] | Adjustment compositor: colour pipeline, transform, preview descriptor |
//! | [`imaging`] | Raster compositor: geometry, colour, sharpen passes; codec; save flow |
//! | [`session`] | Caller-owned editing session for one photo |
//! | [`export`] | Edit-history records, data URLs, digests |
//! | [`config`] | `lensbake.toml` loading, validation and merging |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Pure Functions of Their Arguments
//!
//! Both compositors read their inputs and return new values. There is no
//! global store: the caller owns an [`session::EditSession`] and hands a
//! snapshot to the bake. Two bakes of the same snapshot are bit-identical.
//!
//! ## Full-Frame Exports
//!
//! Zoom and pan drive the preview only. Exports are the full rotated frame
//! unless `crop_to_viewport` is switched on in the config or on the command
//! line.

pub mod adjust;
pub mod config;
pub mod export;
pub mod filters;
pub mod imaging;
pub mod output;
pub mod pipeline;
pub mod session;

#[cfg(test)]
pub(crate) mod test_helpers;
