//! Saved-edit records and encoded output helpers.
//!
//! An [`EditRecord`] is the edit-history payload stored next to a baked
//! photo. Its JSON shape is fixed:
//!
//! ```json
//! {
//!   "filter_name": "vintage",
//!   "adjustments": { "brightness": 10, "contrast": 0, "saturation": 0,
//!                    "temperature": -20, "sharpness": 5 },
//!   "crop_data": { "rotation": 90, "flipX": false }
//! }
//! ```

use crate::adjust::{AdjustmentState, Adjustments, CropData, CropState, ValidationError};
use crate::imaging::ExportFormat;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::path::Path;

/// Edit parameters exactly as they were baked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditRecord {
    pub filter_name: Option<String>,
    pub adjustments: Adjustments,
    pub crop_data: CropData,
}

impl EditRecord {
    pub fn new(adjustments: &AdjustmentState, crop: &CropState) -> Self {
        Self {
            filter_name: adjustments.selected_filter().map(str::to_string),
            adjustments: adjustments.values(),
            crop_data: crop.crop_data(),
        }
    }

    /// Rebuild the editing state from a stored record.
    ///
    /// Out-of-range slider values are rejected rather than clamped, so a
    /// corrupted record never bakes silently.
    pub fn to_state(&self) -> Result<(AdjustmentState, CropState), ValidationError> {
        let adjustments = AdjustmentState::try_from_record(self.filter_name.clone(), self.adjustments)?;
        Ok((adjustments, CropState::from(self.crop_data)))
    }
}

/// Result of one save: the encoded photo plus its edit record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavedEdit {
    pub origin: String,
    pub width: u32,
    pub height: u32,
    pub format: ExportFormat,
    #[serde(skip)]
    pub bytes: Vec<u8>,
    pub record: EditRecord,
    /// SHA-256 of `bytes`, lowercase hex.
    pub digest: String,
}

impl SavedEdit {
    pub fn data_url(&self) -> String {
        to_data_url(self.format, &self.bytes)
    }
}

/// `data:<mime>;base64,<payload>`, as a canvas `toDataURL` returns it.
pub fn to_data_url(format: ExportFormat, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", format.mime_type(), STANDARD.encode(bytes))
}

/// Lowercase hex SHA-256 of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Output file stems for a batch, one per source, in order.
///
/// Each stem is the source's file stem plus `-edited`. Sources that share a
/// file stem (same name in different directories) get `-2`, `-3`, ... so no
/// two outputs land on the same path.
pub fn edited_stems<P: AsRef<Path>>(sources: &[P]) -> Vec<String> {
    let mut taken = HashSet::new();
    sources
        .iter()
        .map(|source| {
            let base = source
                .as_ref()
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "photo".to_string());
            let mut stem = format!("{base}-edited");
            let mut n = 2;
            while !taken.insert(stem.clone()) {
                stem = format!("{base}-{n}-edited");
                n += 1;
            }
            stem
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adjust::Adjustment;

    #[test]
    fn distinct_sources_keep_their_stems() {
        assert_eq!(
            edited_stems(&["a/beach.jpg", "b/city.png"]),
            vec!["beach-edited", "city-edited"]
        );
    }

    #[test]
    fn same_stem_in_different_directories_is_numbered() {
        assert_eq!(
            edited_stems(&["2023/img.jpg", "2024/img.jpg", "raw/img.png"]),
            vec!["img-edited", "img-2-edited", "img-3-edited"]
        );
    }

    #[test]
    fn numbered_stem_skips_names_already_used() {
        assert_eq!(
            edited_stems(&["x/img-2.jpg", "y/img.jpg", "z/img.jpg"]),
            vec!["img-2-edited", "img-edited", "img-3-edited"]
        );
    }

    #[test]
    fn record_serializes_with_history_field_names() {
        let mut adjustments = AdjustmentState::new();
        adjustments.select_filter(Some("vintage".into()));
        adjustments.set(Adjustment::Temperature, -20);
        let crop = CropState::new(90, true);

        let json = serde_json::to_value(EditRecord::new(&adjustments, &crop)).unwrap();
        assert_eq!(json["filter_name"], "vintage");
        assert_eq!(json["adjustments"]["temperature"], -20);
        assert_eq!(json["adjustments"]["sharpness"], 0);
        assert_eq!(json["crop_data"]["rotation"], 90);
        assert_eq!(json["crop_data"]["flipX"], true);
    }

    #[test]
    fn record_without_filter_is_null() {
        let record = EditRecord::new(&AdjustmentState::new(), &CropState::default());
        let json = serde_json::to_value(&record).unwrap();
        assert!(json["filter_name"].is_null());
    }

    #[test]
    fn record_round_trips_to_state() {
        let json = r#"{
            "filter_name": "warm",
            "adjustments": {"brightness": 10, "contrast": -5, "saturation": 0, "temperature": 0, "sharpness": 50},
            "crop_data": {"rotation": -90, "flipX": false}
        }"#;
        let record: EditRecord = serde_json::from_str(json).unwrap();
        let (adjustments, crop) = record.to_state().unwrap();
        assert_eq!(adjustments.selected_filter(), Some("warm"));
        assert_eq!(adjustments.sharpness(), 50);
        assert_eq!(crop.rotation(), -90);
    }

    #[test]
    fn record_out_of_range_is_rejected() {
        let json = r#"{
            "filter_name": null,
            "adjustments": {"brightness": 200, "contrast": 0, "saturation": 0, "temperature": 0, "sharpness": 0},
            "crop_data": {"rotation": 0, "flipX": false}
        }"#;
        let record: EditRecord = serde_json::from_str(json).unwrap();
        assert!(matches!(
            record.to_state(),
            Err(ValidationError::OutOfRange {
                adjustment: Adjustment::Brightness,
                value: 200
            })
        ));
    }

    #[test]
    fn data_url_prefix() {
        assert_eq!(to_data_url(ExportFormat::Jpeg, b"abc"), "data:image/jpeg;base64,YWJj");
        assert!(to_data_url(ExportFormat::Png, &[]).starts_with("data:image/png;base64,"));
    }

    #[test]
    fn digest_is_hex_sha256() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
