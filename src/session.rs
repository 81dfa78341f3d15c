//! Editor session: the state of one photo being edited.
//!
//! The session is owned by the caller. Every preview and bake reads from it
//! by reference or through an [`EditSnapshot`], so there is no shared
//! mutable store.

use crate::adjust::{Adjustment, AdjustmentState, CropState, ValidationError};
use crate::filters::FilterCatalog;
use crate::pipeline::{Preview, build_preview};
use serde::{Deserialize, Serialize};

/// The editor panel currently shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorTab {
    #[default]
    Filter,
    Adjustment,
    Crop,
}

/// Immutable copy of the baked parts of a session.
#[derive(Debug, Clone, PartialEq)]
pub struct EditSnapshot {
    pub adjustments: AdjustmentState,
    pub crop: CropState,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    photo_id: String,
    original_url: String,
    adjustments: AdjustmentState,
    crop: CropState,
    active_tab: EditorTab,
}

impl EditSession {
    pub fn new(photo_id: impl Into<String>, original_url: impl Into<String>) -> Self {
        Self {
            photo_id: photo_id.into(),
            original_url: original_url.into(),
            adjustments: AdjustmentState::new(),
            crop: CropState::default(),
            active_tab: EditorTab::default(),
        }
    }

    pub fn photo_id(&self) -> &str {
        &self.photo_id
    }

    pub fn original_url(&self) -> &str {
        &self.original_url
    }

    pub fn adjustments(&self) -> &AdjustmentState {
        &self.adjustments
    }

    pub fn crop(&self) -> &CropState {
        &self.crop
    }

    pub fn active_tab(&self) -> EditorTab {
        self.active_tab
    }

    pub fn set_active_tab(&mut self, tab: EditorTab) {
        self.active_tab = tab;
    }

    pub fn select_filter(&mut self, name: Option<String>) {
        self.adjustments.select_filter(name);
    }

    /// Set a slider, clamped into range.
    pub fn set_adjustment(&mut self, adjustment: Adjustment, value: i32) {
        self.adjustments.set(adjustment, value);
    }

    pub fn set_rotation(&mut self, degrees: i32) {
        self.crop.set_rotation(degrees);
    }

    pub fn rotate_90(&mut self) {
        self.crop.rotate_90();
    }

    pub fn toggle_flip(&mut self) {
        self.crop.toggle_flip();
    }

    pub fn set_zoom(&mut self, zoom: f32) -> Result<(), ValidationError> {
        self.crop.set_zoom(zoom)
    }

    pub fn set_pan(&mut self, x: f32, y: f32) -> Result<(), ValidationError> {
        self.crop.set_pan(x, y)
    }

    /// Back to an unedited photo. Called after a successful save.
    pub fn reset(&mut self) {
        self.adjustments = AdjustmentState::new();
        self.crop = CropState::default();
        self.active_tab = EditorTab::default();
    }

    pub fn preview(&self, catalog: &FilterCatalog) -> Preview {
        build_preview(&self.adjustments, &self.crop, catalog)
    }

    pub fn snapshot(&self) -> EditSnapshot {
        EditSnapshot {
            adjustments: self.adjustments.clone(),
            crop: self.crop,
        }
    }
}
