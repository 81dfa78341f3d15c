//! Filter catalog and CSS filter expression parsing.
//!
//! A filter is a named, ordered list of colour operations written as a CSS
//! `filter` value, e.g. `sepia(30%) saturate(140%)`. The catalog is supplied
//! by the caller (remote catalog service or a local JSON file); when nothing
//! else is available the editor falls back to [`FilterCatalog::default`].
//!
//! ## Accepted functions
//!
//! | Function | Argument | Default |
//! |---|---|---|
//! | `brightness`, `contrast`, `saturate` | number or percentage, `>= 0` | 1 |
//! | `grayscale`, `sepia`, `invert`, `opacity` | number or percentage, clamped to `0..=1` | 1 |
//! | `hue-rotate` | angle (`deg`, `rad`, `grad`, `turn`) or `0` | 0 |
//! | `blur` | length in `px` or `0` | 0 |
//!
//! `none` and the empty string parse to an empty list.

use crate::pipeline::ColorOp;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterParseError {
    #[error("unknown filter function '{0}'")]
    UnknownFunction(String),
    #[error("expected '(' after '{0}'")]
    MissingOpenParen(String),
    #[error("unterminated argument list for '{0}'")]
    Unterminated(String),
    #[error("invalid argument '{argument}' for '{function}'")]
    InvalidArgument { function: String, argument: String },
    #[error("unexpected character '{0}' in filter expression")]
    UnexpectedChar(char),
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("filter '{name}' has an invalid expression: {source}")]
    InvalidExpression {
        name: String,
        source: FilterParseError,
    },
    #[error("duplicate filter name '{0}'")]
    DuplicateName(String),
}

/// A catalog entry as served by the filter catalog service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterDefinition {
    pub id: i64,
    pub name: String,
    pub label: String,
    /// Colour pipeline expression in CSS `filter` syntax.
    pub css_filter: String,
    #[serde(default)]
    pub preview_url: Option<String>,
}

impl FilterDefinition {
    pub fn new(id: i64, name: &str, label: &str, css_filter: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            label: label.to_string(),
            css_filter: css_filter.to_string(),
            preview_url: None,
        }
    }

    /// Parse this entry's expression into colour operations.
    pub fn color_ops(&self) -> Result<Vec<ColorOp>, FilterParseError> {
        parse_filter_expression(&self.css_filter)
    }
}

/// Immutable list of filters available during an editing session.
///
/// Deserializing goes through [`FilterCatalog::new`], so duplicate names and
/// unparsable expressions are rejected however the catalog is read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "Vec<FilterDefinition>",
    into = "Vec<FilterDefinition>"
)]
pub struct FilterCatalog {
    filters: Vec<FilterDefinition>,
}

impl Default for FilterCatalog {
    /// The built-in list the editor shows when the catalog service is
    /// unreachable.
    fn default() -> Self {
        Self {
            filters: vec![
                FilterDefinition::new(1, "normal", "Original", "none"),
                FilterDefinition::new(2, "grayscale", "Mono", "grayscale(100%)"),
                FilterDefinition::new(3, "sepia", "Sepia", "sepia(80%)"),
                FilterDefinition::new(4, "warm", "Warm", "sepia(30%) saturate(140%)"),
                FilterDefinition::new(5, "cool", "Cool", "hue-rotate(180deg) saturate(80%)"),
                FilterDefinition::new(6, "bright", "Bright", "brightness(130%) contrast(110%)"),
                FilterDefinition::new(7, "vivid", "Vivid", "saturate(180%) contrast(120%)"),
                FilterDefinition::new(
                    8,
                    "soft",
                    "Soft",
                    "brightness(110%) contrast(90%) saturate(90%)",
                ),
                FilterDefinition::new(
                    9,
                    "vintage",
                    "Vintage",
                    "sepia(50%) contrast(90%) brightness(90%)",
                ),
                FilterDefinition::new(
                    10,
                    "dramatic",
                    "Dramatic",
                    "contrast(150%) brightness(90%) saturate(120%)",
                ),
            ],
        }
    }
}

impl TryFrom<Vec<FilterDefinition>> for FilterCatalog {
    type Error = CatalogError;

    fn try_from(filters: Vec<FilterDefinition>) -> Result<Self, Self::Error> {
        Self::new(filters)
    }
}

impl From<FilterCatalog> for Vec<FilterDefinition> {
    fn from(catalog: FilterCatalog) -> Self {
        catalog.filters
    }
}

impl FilterCatalog {
    /// Build a catalog, rejecting duplicate names and unparsable expressions.
    pub fn new(filters: Vec<FilterDefinition>) -> Result<Self, CatalogError> {
        let mut seen = std::collections::HashSet::new();
        for filter in &filters {
            if !seen.insert(filter.name.as_str()) {
                return Err(CatalogError::DuplicateName(filter.name.clone()));
            }
            filter
                .color_ops()
                .map_err(|source| CatalogError::InvalidExpression {
                    name: filter.name.clone(),
                    source,
                })?;
        }
        Ok(Self { filters })
    }

    /// Parse a catalog from the service's JSON array.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let filters: Vec<FilterDefinition> = serde_json::from_str(json)?;
        Self::new(filters)
    }

    /// Load a catalog JSON file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn filters(&self) -> &[FilterDefinition] {
        &self.filters
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<&FilterDefinition> {
        self.filters.iter().find(|f| f.name == name)
    }

    /// Colour operations for a named filter.
    ///
    /// Returns `None` for unknown names and for entries whose expression is
    /// trivial (`none`) or cannot be parsed.
    pub fn color_ops(&self, name: &str) -> Option<Vec<ColorOp>> {
        let filter = self.find(name)?;
        match filter.color_ops() {
            Ok(ops) if !ops.is_empty() => Some(ops),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(filter = %name, error = %e, "ignoring unparsable filter expression");
                None
            }
        }
    }
}

/// Parse a CSS `filter` value into an ordered list of colour operations.
pub fn parse_filter_expression(expr: &str) -> Result<Vec<ColorOp>, FilterParseError> {
    let trimmed = expr.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
        return Ok(Vec::new());
    }

    let mut ops = Vec::new();
    let mut rest = trimmed;
    while !rest.is_empty() {
        let name_len = rest
            .find(|c: char| !(c.is_ascii_alphabetic() || c == '-'))
            .unwrap_or(rest.len());
        if name_len == 0 {
            let c = rest.chars().next().unwrap_or_default();
            return Err(FilterParseError::UnexpectedChar(c));
        }
        let name = rest[..name_len].to_ascii_lowercase();
        let after_name = rest[name_len..].trim_start();
        let Some(args_start) = after_name.strip_prefix('(') else {
            return Err(FilterParseError::MissingOpenParen(name));
        };
        let Some(close) = args_start.find(')') else {
            return Err(FilterParseError::Unterminated(name));
        };
        let argument = args_start[..close].trim();
        ops.push(parse_function(&name, argument)?);
        rest = args_start[close + 1..].trim_start();
    }
    Ok(ops)
}

fn parse_function(name: &str, argument: &str) -> Result<ColorOp, FilterParseError> {
    let invalid = || FilterParseError::InvalidArgument {
        function: name.to_string(),
        argument: argument.to_string(),
    };
    let op = match name {
        "brightness" => ColorOp::Brightness(parse_amount(argument).ok_or_else(invalid)?),
        "contrast" => ColorOp::Contrast(parse_amount(argument).ok_or_else(invalid)?),
        "saturate" => ColorOp::Saturate(parse_amount(argument).ok_or_else(invalid)?),
        "grayscale" => ColorOp::Grayscale(parse_amount(argument).ok_or_else(invalid)?.min(1.0)),
        "sepia" => ColorOp::Sepia(parse_amount(argument).ok_or_else(invalid)?.min(1.0)),
        "invert" => ColorOp::Invert(parse_amount(argument).ok_or_else(invalid)?.min(1.0)),
        "opacity" => ColorOp::Opacity(parse_amount(argument).ok_or_else(invalid)?.min(1.0)),
        "hue-rotate" => ColorOp::HueRotate(parse_angle(argument).ok_or_else(invalid)?),
        "blur" => ColorOp::Blur(parse_length(argument).ok_or_else(invalid)?),
        other => return Err(FilterParseError::UnknownFunction(other.to_string())),
    };
    Ok(op)
}

/// `<number> | <percentage>`, non-negative. Empty means 1.
fn parse_amount(arg: &str) -> Option<f64> {
    if arg.is_empty() {
        return Some(1.0);
    }
    let value = match arg.strip_suffix('%') {
        Some(pct) => pct.trim().parse::<f64>().ok()? / 100.0,
        None => arg.parse::<f64>().ok()?,
    };
    (value.is_finite() && value >= 0.0).then_some(value)
}

/// `<angle>` in degrees. A bare number is only accepted when it is zero.
fn parse_angle(arg: &str) -> Option<f64> {
    if arg.is_empty() {
        return Some(0.0);
    }
    let (number, factor) = if let Some(n) = arg.strip_suffix("deg") {
        (n, 1.0)
    } else if let Some(n) = arg.strip_suffix("grad") {
        (n, 0.9)
    } else if let Some(n) = arg.strip_suffix("rad") {
        (n, 180.0 / std::f64::consts::PI)
    } else if let Some(n) = arg.strip_suffix("turn") {
        (n, 360.0)
    } else {
        let bare = arg.parse::<f64>().ok()?;
        return (bare == 0.0).then_some(0.0);
    };
    let value = number.trim().parse::<f64>().ok()? * factor;
    value.is_finite().then_some(value)
}

/// `<length>` in pixels, non-negative. A bare number is only accepted when
/// it is zero.
fn parse_length(arg: &str) -> Option<f64> {
    if arg.is_empty() {
        return Some(0.0);
    }
    let value = match arg.strip_suffix("px") {
        Some(n) => n.trim().parse::<f64>().ok()?,
        None => {
            let bare = arg.parse::<f64>().ok()?;
            return (bare == 0.0).then_some(0.0);
        }
    };
    (value.is_finite() && value >= 0.0).then_some(value)
}
