//! Codec trait, decoded source type and the bake error.
//!
//! The [`ImageCodec`] trait covers the two byte-level operations around a
//! bake: decoding the original photo into RGBA pixels and encoding the baked
//! canvas. Everything in between is a pure function of pixels.
//!
//! The production implementation is
//! [`RustCodec`](super::rust_codec::RustCodec), built on the `image` crate.

use super::params::{ExportFormat, Quality};
use crate::adjust::ValidationError;
use image::{DynamicImage, RgbaImage};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BakeError {
    #[error("Failed to decode {origin}: {reason}")]
    Decode { origin: String, reason: String },
    #[error("Canvas of {width}x{height} exceeds the drawable surface")]
    Surface { width: u32, height: u32 },
    #[error("Invalid edit state: {0}")]
    Validation(#[from] ValidationError),
    #[error("{format} encode failed: {reason}")]
    Encode { format: ExportFormat, reason: String },
}

/// An immutable decoded photo and where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceImage {
    origin: String,
    pixels: RgbaImage,
}

impl SourceImage {
    pub fn new(origin: impl Into<String>, pixels: RgbaImage) -> Self {
        Self {
            origin: origin.into(),
            pixels,
        }
    }

    pub fn from_dynamic(origin: impl Into<String>, image: DynamicImage) -> Self {
        Self::new(origin, image.into_rgba8())
    }

    /// Wrap raw RGBA8 bytes, row-major without padding.
    pub fn from_rgba(
        origin: impl Into<String>,
        width: u32,
        height: u32,
        bytes: Vec<u8>,
    ) -> Result<Self, BakeError> {
        let origin = origin.into();
        let len = bytes.len();
        match RgbaImage::from_raw(width, height, bytes) {
            Some(pixels) => Ok(Self { origin, pixels }),
            None => Err(BakeError::Decode {
                reason: format!("{len} bytes is not a {width}x{height} RGBA buffer"),
                origin,
            }),
        }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

/// Byte-level decode and encode around the pure bake.
pub trait ImageCodec: Sync {
    /// Decode a photo into RGBA pixels.
    fn decode(&self, bytes: &[u8], origin: &str) -> Result<SourceImage, BakeError>;

    /// Encode a baked canvas.
    fn encode(
        &self,
        image: &RgbaImage,
        format: ExportFormat,
        quality: Quality,
    ) -> Result<Vec<u8>, BakeError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use image::Rgba;
    use std::sync::Mutex;

    /// Mock codec that records operations and never touches real encoders.
    /// Uses Mutex (not RefCell) so it is Sync and works with rayon's par_iter.
    #[derive(Default)]
    pub struct MockCodec {
        pub sources: Mutex<Vec<RgbaImage>>,
        pub operations: Mutex<Vec<RecordedOp>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Decode(String),
        Encode {
            width: u32,
            height: u32,
            format: ExportFormat,
            quality: u32,
        },
    }

    impl MockCodec {
        pub fn new() -> Self {
            Self::default()
        }

        /// Mock whose decodes pop from `sources` (last first).
        pub fn with_sources(sources: Vec<RgbaImage>) -> Self {
            Self {
                sources: Mutex::new(sources),
                operations: Mutex::new(Vec::new()),
            }
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }
    }

    impl ImageCodec for MockCodec {
        fn decode(&self, _bytes: &[u8], origin: &str) -> Result<SourceImage, BakeError> {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::Decode(origin.to_string()));

            self.sources
                .lock()
                .unwrap()
                .pop()
                .map(|pixels| SourceImage::new(origin, pixels))
                .ok_or_else(|| BakeError::Decode {
                    origin: origin.to_string(),
                    reason: "No mock source".to_string(),
                })
        }

        fn encode(
            &self,
            image: &RgbaImage,
            format: ExportFormat,
            quality: Quality,
        ) -> Result<Vec<u8>, BakeError> {
            self.operations.lock().unwrap().push(RecordedOp::Encode {
                width: image.width(),
                height: image.height(),
                format,
                quality: quality.value(),
            });
            Ok(image.as_raw().clone())
        }
    }

    #[test]
    fn mock_records_decode() {
        let codec = MockCodec::with_sources(vec![RgbaImage::new(8, 6)]);

        let source = codec.decode(b"ignored", "photo://1").unwrap();
        assert_eq!((source.width(), source.height()), (8, 6));
        assert_eq!(source.origin(), "photo://1");

        let ops = codec.get_operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(&ops[0], RecordedOp::Decode(o) if o == "photo://1"));
    }

    #[test]
    fn mock_decode_without_source_errors() {
        let codec = MockCodec::new();
        let err = codec.decode(b"", "missing").unwrap_err();
        assert!(matches!(err, BakeError::Decode { origin, .. } if origin == "missing"));
    }

    #[test]
    fn mock_records_encode() {
        let codec = MockCodec::new();
        codec
            .encode(&RgbaImage::new(4, 2), ExportFormat::Png, Quality::new(75))
            .unwrap();

        assert_eq!(
            codec.get_operations(),
            vec![RecordedOp::Encode {
                width: 4,
                height: 2,
                format: ExportFormat::Png,
                quality: 75,
            }]
        );
    }

    #[test]
    fn source_from_rgba_checks_length() {
        let ok = SourceImage::from_rgba("raw", 2, 2, vec![0; 16]).unwrap();
        assert_eq!(ok.pixels().get_pixel(1, 1), &Rgba([0, 0, 0, 0]));

        let err = SourceImage::from_rgba("raw", 2, 2, vec![0; 15]).unwrap_err();
        assert!(err.to_string().contains("15 bytes"));
    }

    #[test]
    fn validation_error_converts() {
        let err: BakeError = ValidationError::NonFiniteZoom(f32::NAN).into();
        assert!(matches!(err, BakeError::Validation(_)));
    }
}
