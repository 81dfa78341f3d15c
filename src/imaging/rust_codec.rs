//! Pure Rust codec built on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, WebP) | `image::load_from_memory` |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` (alpha flattened onto black) |
//! | Encode → PNG | `image::codecs::png::PngEncoder` (RGBA kept) |

use super::codec::{BakeError, ImageCodec, SourceImage};
use super::params::{ExportFormat, Quality};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageFormat, RgbaImage};
use std::io::Cursor;
use std::sync::LazyLock;

const PHOTO_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("webp", ImageFormat::WebP),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    PHOTO_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Returns the set of image file extensions that have working decoders compiled in.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

/// Codec using the `image` crate's pure Rust decoders and encoders.
pub struct RustCodec;

impl RustCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustCodec {
    fn default() -> Self {
        Self::new()
    }
}

/// Drop alpha the way a canvas JPEG export does: composite onto black.
fn flatten_onto_black(image: &RgbaImage) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(image.width() as usize * image.height() as usize * 3);
    for px in image.pixels() {
        let [r, g, b, a] = px.0;
        let a = u16::from(a);
        rgb.extend(
            [r, g, b].map(|c| ((u16::from(c) * a + 127) / 255) as u8),
        );
    }
    rgb
}

/// Encode as baseline JPEG, alpha flattened onto black.
pub fn encode_jpeg(image: &RgbaImage, quality: Quality) -> Result<Vec<u8>, BakeError> {
    let rgb = flatten_onto_black(image);
    let mut out = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut out, quality.value() as u8)
        .write_image(&rgb, image.width(), image.height(), ExtendedColorType::Rgb8)
        .map_err(|e| BakeError::Encode {
            format: ExportFormat::Jpeg,
            reason: e.to_string(),
        })?;
    Ok(out.into_inner())
}

/// Encode as RGBA PNG.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, BakeError> {
    let mut out = Cursor::new(Vec::new());
    PngEncoder::new(&mut out)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| BakeError::Encode {
            format: ExportFormat::Png,
            reason: e.to_string(),
        })?;
    Ok(out.into_inner())
}

impl ImageCodec for RustCodec {
    fn decode(&self, bytes: &[u8], origin: &str) -> Result<SourceImage, BakeError> {
        let image = image::load_from_memory(bytes).map_err(|e| BakeError::Decode {
            origin: origin.to_string(),
            reason: e.to_string(),
        })?;
        Ok(SourceImage::from_dynamic(origin, image))
    }

    fn encode(
        &self,
        image: &RgbaImage,
        format: ExportFormat,
        quality: Quality,
    ) -> Result<Vec<u8>, BakeError> {
        match format {
            ExportFormat::Jpeg => encode_jpeg(image, quality),
            ExportFormat::Png => encode_png(image),
        }
    }
}
