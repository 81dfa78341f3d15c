//! Numeric editing model: the five adjustment sliders and the crop state.
//!
//! Both types keep their fields private so the documented ranges hold for
//! every value that exists:
//!
//! | Field | Range | Write policy |
//! |---|---|---|
//! | brightness, contrast, saturation, temperature, sharpness | `-50..=50` | [`AdjustmentState::set`] clamps, [`AdjustmentState::try_set`] rejects |
//! | rotation | `-359..=359` degrees | `% 360`, sign kept |
//! | zoom | `0.5..=5.0` | clamped; non-finite rejected |
//! | pan | any finite `(x, y)` | only while zoom > 1, reset when zoom drops back |
//!
//! The plain [`Adjustments`] record is the serialized shape (edit history,
//! CLI input). Converting a record into a state is where out-of-range values
//! are caught.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Lowest value any adjustment slider can hold.
pub const ADJUSTMENT_MIN: i32 = -50;
/// Highest value any adjustment slider can hold.
pub const ADJUSTMENT_MAX: i32 = 50;

pub const ZOOM_MIN: f32 = 0.5;
pub const ZOOM_MAX: f32 = 5.0;

/// Filter name that means "no base treatment".
pub const NORMAL_FILTER: &str = "normal";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{adjustment} must be within -50..=50, got {value}")]
    OutOfRange { adjustment: Adjustment, value: i32 },
    #[error("unknown adjustment: {0}")]
    UnknownAdjustment(String),
    #[error("zoom must be a finite number, got {0}")]
    NonFiniteZoom(f32),
    #[error("pan offsets must be finite, got ({0}, {1})")]
    NonFinitePan(f32, f32),
}

/// One of the five adjustment sliders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Adjustment {
    Brightness,
    Contrast,
    Saturation,
    Temperature,
    Sharpness,
}

impl Adjustment {
    /// Slider order as shown in the editor.
    pub const ALL: [Adjustment; 5] = [
        Adjustment::Brightness,
        Adjustment::Contrast,
        Adjustment::Saturation,
        Adjustment::Temperature,
        Adjustment::Sharpness,
    ];

    /// Stable key used in serialized records.
    pub fn key(self) -> &'static str {
        match self {
            Self::Brightness => "brightness",
            Self::Contrast => "contrast",
            Self::Saturation => "saturation",
            Self::Temperature => "temperature",
            Self::Sharpness => "sharpness",
        }
    }

    /// Human-readable slider label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Brightness => "Brightness",
            Self::Contrast => "Contrast",
            Self::Saturation => "Saturation",
            Self::Temperature => "Temperature",
            Self::Sharpness => "Sharpness",
        }
    }
}

impl fmt::Display for Adjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Adjustment {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| ValidationError::UnknownAdjustment(s.to_string()))
    }
}

/// Serialized slider values, exactly as stored in an edit-history record.
///
/// No range guarantee: this is what arrives from the outside. Turn it into
/// an [`AdjustmentState`] before handing it to the compositors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Adjustments {
    pub brightness: i32,
    pub contrast: i32,
    pub saturation: i32,
    pub temperature: i32,
    pub sharpness: i32,
}

impl Adjustments {
    pub fn get(&self, adjustment: Adjustment) -> i32 {
        match adjustment {
            Adjustment::Brightness => self.brightness,
            Adjustment::Contrast => self.contrast,
            Adjustment::Saturation => self.saturation,
            Adjustment::Temperature => self.temperature,
            Adjustment::Sharpness => self.sharpness,
        }
    }

    fn slot(&mut self, adjustment: Adjustment) -> &mut i32 {
        match adjustment {
            Adjustment::Brightness => &mut self.brightness,
            Adjustment::Contrast => &mut self.contrast,
            Adjustment::Saturation => &mut self.saturation,
            Adjustment::Temperature => &mut self.temperature,
            Adjustment::Sharpness => &mut self.sharpness,
        }
    }
}

/// Selected base filter plus the five sliders, always in range.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdjustmentState {
    selected_filter: Option<String>,
    values: Adjustments,
}

impl AdjustmentState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a state from an external record, rejecting any value outside
    /// `-50..=50`.
    pub fn try_from_record(
        selected_filter: Option<String>,
        record: Adjustments,
    ) -> Result<Self, ValidationError> {
        let mut state = Self {
            selected_filter,
            values: Adjustments::default(),
        };
        for adjustment in Adjustment::ALL {
            state.try_set(adjustment, record.get(adjustment))?;
        }
        Ok(state)
    }

    /// Build a state from an external record, clamping every value.
    pub fn from_record_clamped(selected_filter: Option<String>, record: Adjustments) -> Self {
        let mut state = Self {
            selected_filter,
            values: Adjustments::default(),
        };
        for adjustment in Adjustment::ALL {
            state.set(adjustment, record.get(adjustment));
        }
        state
    }

    pub fn selected_filter(&self) -> Option<&str> {
        self.selected_filter.as_deref()
    }

    /// The selected filter, or `None` when it is unset or `"normal"`.
    pub fn effective_filter(&self) -> Option<&str> {
        self.selected_filter
            .as_deref()
            .filter(|name| !name.is_empty() && *name != NORMAL_FILTER)
    }

    pub fn select_filter(&mut self, name: Option<String>) {
        self.selected_filter = name;
    }

    pub fn get(&self, adjustment: Adjustment) -> i32 {
        self.values.get(adjustment)
    }

    /// Write a slider value, clamped into `-50..=50`.
    pub fn set(&mut self, adjustment: Adjustment, value: i32) {
        *self.values.slot(adjustment) = value.clamp(ADJUSTMENT_MIN, ADJUSTMENT_MAX);
    }

    /// Write a slider value, rejecting it if it is out of range.
    pub fn try_set(&mut self, adjustment: Adjustment, value: i32) -> Result<(), ValidationError> {
        if !(ADJUSTMENT_MIN..=ADJUSTMENT_MAX).contains(&value) {
            return Err(ValidationError::OutOfRange { adjustment, value });
        }
        *self.values.slot(adjustment) = value;
        Ok(())
    }

    pub fn brightness(&self) -> i32 {
        self.values.brightness
    }

    pub fn contrast(&self) -> i32 {
        self.values.contrast
    }

    pub fn saturation(&self) -> i32 {
        self.values.saturation
    }

    pub fn temperature(&self) -> i32 {
        self.values.temperature
    }

    pub fn sharpness(&self) -> i32 {
        self.values.sharpness
    }

    /// Slider values as a serializable record.
    pub fn values(&self) -> Adjustments {
        self.values
    }

    /// True when no filter is selected and every slider is zero.
    pub fn is_identity(&self) -> bool {
        self.effective_filter().is_none() && self.values == Adjustments::default()
    }
}

/// Geometric edit state. Rotation and flip are baked; zoom and pan only
/// drive the live preview unless viewport cropping is enabled at export.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropState {
    rotation: i32,
    flip_x: bool,
    zoom: f32,
    pan: (f32, f32),
}

impl Default for CropState {
    fn default() -> Self {
        Self {
            rotation: 0,
            flip_x: false,
            zoom: 1.0,
            pan: (0.0, 0.0),
        }
    }
}

/// Reduce degrees modulo 360, keeping the sign of the input.
///
/// Both editor interactions land on the same stored value: three "+90°"
/// steps give 270, the slider at -90 gives -90, and both describe the same
/// orientation once baked.
pub fn normalize_rotation(degrees: i32) -> i32 {
    degrees % 360
}

impl CropState {
    pub fn new(rotation: i32, flip_x: bool) -> Self {
        Self {
            rotation: normalize_rotation(rotation),
            flip_x,
            ..Self::default()
        }
    }

    pub fn rotation(&self) -> i32 {
        self.rotation
    }

    pub fn flip_x(&self) -> bool {
        self.flip_x
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn pan(&self) -> (f32, f32) {
        self.pan
    }

    pub fn set_rotation(&mut self, degrees: i32) {
        self.rotation = normalize_rotation(degrees);
    }

    /// The "+90°" button.
    pub fn rotate_90(&mut self) {
        self.set_rotation(self.rotation + 90);
    }

    pub fn set_flip_x(&mut self, flip: bool) {
        self.flip_x = flip;
    }

    pub fn toggle_flip(&mut self) {
        self.flip_x = !self.flip_x;
    }

    /// Set zoom, clamped into `0.5..=5.0`. Dropping back to 1× or below
    /// recentres the pan.
    pub fn set_zoom(&mut self, zoom: f32) -> Result<(), ValidationError> {
        if !zoom.is_finite() {
            return Err(ValidationError::NonFiniteZoom(zoom));
        }
        self.zoom = zoom.clamp(ZOOM_MIN, ZOOM_MAX);
        if self.zoom <= 1.0 {
            self.pan = (0.0, 0.0);
        }
        Ok(())
    }

    /// Set pan offsets in source pixels. Ignored while not zoomed in.
    pub fn set_pan(&mut self, x: f32, y: f32) -> Result<(), ValidationError> {
        if !x.is_finite() || !y.is_finite() {
            return Err(ValidationError::NonFinitePan(x, y));
        }
        if self.zoom > 1.0 {
            self.pan = (x, y);
        }
        Ok(())
    }

    /// Rotation and flip as stored in an edit-history record.
    pub fn crop_data(&self) -> CropData {
        CropData {
            rotation: self.rotation,
            flip_x: self.flip_x,
        }
    }
}

/// Serialized crop parameters of an edit-history record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropData {
    pub rotation: i32,
    #[serde(rename = "flipX")]
    pub flip_x: bool,
}

impl From<CropData> for CropState {
    fn from(data: CropData) -> Self {
        CropState::new(data.rotation, data.flip_x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_zero_and_unfiltered() {
        let state = AdjustmentState::new();
        for adjustment in Adjustment::ALL {
            assert_eq!(state.get(adjustment), 0);
        }
        assert_eq!(state.selected_filter(), None);
        assert!(state.is_identity());
    }

    #[test]
    fn set_clamps_out_of_range_values() {
        let mut state = AdjustmentState::new();
        state.set(Adjustment::Brightness, 200);
        state.set(Adjustment::Contrast, -75);
        assert_eq!(state.brightness(), 50);
        assert_eq!(state.contrast(), -50);
    }

    #[test]
    fn try_set_rejects_out_of_range_values() {
        let mut state = AdjustmentState::new();
        let err = state.try_set(Adjustment::Brightness, 200).unwrap_err();
        assert_eq!(
            err,
            ValidationError::OutOfRange {
                adjustment: Adjustment::Brightness,
                value: 200
            }
        );
        // rejected writes leave the previous value in place
        assert_eq!(state.brightness(), 0);
    }

    #[test]
    fn try_set_accepts_bounds() {
        let mut state = AdjustmentState::new();
        state.try_set(Adjustment::Sharpness, 50).unwrap();
        state.try_set(Adjustment::Temperature, -50).unwrap();
        assert_eq!(state.sharpness(), 50);
        assert_eq!(state.temperature(), -50);
    }

    #[test]
    fn record_conversion_validates_every_field() {
        let record = Adjustments {
            saturation: 51,
            ..Adjustments::default()
        };
        assert!(AdjustmentState::try_from_record(None, record).is_err());

        let clamped = AdjustmentState::from_record_clamped(None, record);
        assert_eq!(clamped.saturation(), 50);
    }

    #[test]
    fn normal_filter_is_not_effective() {
        let mut state = AdjustmentState::new();
        state.select_filter(Some("normal".into()));
        assert_eq!(state.effective_filter(), None);
        assert!(state.is_identity());

        state.select_filter(Some("warm".into()));
        assert_eq!(state.effective_filter(), Some("warm"));
        assert!(!state.is_identity());
    }

    #[test]
    fn adjustment_parses_from_key() {
        assert_eq!("Sharpness".parse::<Adjustment>().unwrap(), Adjustment::Sharpness);
        assert!("exposure".parse::<Adjustment>().is_err());
    }

    #[test]
    fn adjustments_deserialize_with_missing_fields() {
        let record: Adjustments = serde_json::from_str(r#"{"brightness": 10}"#).unwrap();
        assert_eq!(record.brightness, 10);
        assert_eq!(record.sharpness, 0);
    }

    #[test]
    fn rotation_normalizes_modulo_360() {
        let mut crop = CropState::default();
        crop.set_rotation(450);
        assert_eq!(crop.rotation(), 90);
        crop.set_rotation(-90);
        assert_eq!(crop.rotation(), -90);
        crop.set_rotation(360);
        assert_eq!(crop.rotation(), 0);
    }

    #[test]
    fn rotate_90_steps_wrap_around() {
        let mut crop = CropState::default();
        for _ in 0..3 {
            crop.rotate_90();
        }
        assert_eq!(crop.rotation(), 270);
        crop.rotate_90();
        assert_eq!(crop.rotation(), 0);
    }

    #[test]
    fn zoom_clamps_and_resets_pan() {
        let mut crop = CropState::default();
        crop.set_zoom(8.0).unwrap();
        assert_eq!(crop.zoom(), ZOOM_MAX);

        crop.set_pan(12.0, -4.0).unwrap();
        assert_eq!(crop.pan(), (12.0, -4.0));

        crop.set_zoom(1.0).unwrap();
        assert_eq!(crop.pan(), (0.0, 0.0));

        crop.set_zoom(0.1).unwrap();
        assert_eq!(crop.zoom(), ZOOM_MIN);
    }

    #[test]
    fn pan_ignored_when_not_zoomed() {
        let mut crop = CropState::default();
        crop.set_pan(30.0, 30.0).unwrap();
        assert_eq!(crop.pan(), (0.0, 0.0));
    }

    #[test]
    fn non_finite_zoom_and_pan_rejected() {
        let mut crop = CropState::default();
        assert!(crop.set_zoom(f32::NAN).is_err());
        assert_eq!(crop.zoom(), 1.0);
        crop.set_zoom(2.0).unwrap();
        assert!(crop.set_pan(f32::INFINITY, 0.0).is_err());
    }

    #[test]
    fn crop_data_uses_flip_x_camel_case() {
        let crop = CropState::new(90, true);
        let json = serde_json::to_string(&crop.crop_data()).unwrap();
        assert_eq!(json, r#"{"rotation":90,"flipX":true}"#);
    }
}
