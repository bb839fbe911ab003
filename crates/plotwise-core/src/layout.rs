//! Layout document: site dimensions, measurement unit and the ordered area list.

use crate::geometry::TextMeasure;
use crate::shapes::{AreaId, Shape};
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Layout loading errors.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("No layout data available")]
    Missing,
    #[error("Layout data is not an object")]
    NotAnObject,
    #[error("Layout areas are not properly formatted")]
    AreasNotArray,
    #[error("Layout dimensions must not be negative ({width} x {height})")]
    InvalidDimensions { width: f64, height: f64 },
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Measurement unit of a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Meters,
    Centimeters,
}

impl Unit {
    /// Number of scale-bar segments.
    pub const SCALE_BAR_SEGMENTS: usize = 5;

    /// Logical units per one unit of measure.
    pub fn pixels_per_unit(self) -> f64 {
        match self {
            Unit::Meters => 100.0,
            Unit::Centimeters => 1.0,
        }
    }

    /// Spacing of background grid lines, in logical units.
    pub fn grid_spacing(self) -> f64 {
        match self {
            Unit::Meters => 100.0,
            Unit::Centimeters => 10.0,
        }
    }

    /// Length of the scale bar, in logical units.
    pub fn scale_bar_length(self) -> f64 {
        match self {
            Unit::Meters => 100.0,
            Unit::Centimeters => 1000.0,
        }
    }

    /// Label of tick `index` on the scale bar.
    pub fn scale_bar_label(self, index: usize) -> String {
        let step = match self {
            Unit::Meters => 1,
            Unit::Centimeters => 20,
        };
        (index * step).to_string()
    }

    pub fn name(self) -> &'static str {
        match self {
            Unit::Meters => "meters",
            Unit::Centimeters => "centimeters",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A site layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Width in `unit`.
    #[serde(default)]
    pub width: f64,
    /// Height in `unit`.
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub unit: Unit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
    /// Areas in z-order (back to front).
    #[serde(default)]
    pub areas: Vec<Shape>,
    /// Entries dropped by lenient loading.
    #[serde(skip)]
    pub skipped_areas: usize,
}

impl Layout {
    /// Dimension used when a layout declares zero width or height.
    pub const FALLBACK_DIMENSION: f64 = 10.0;

    pub fn new(name: impl Into<String>, width: f64, height: f64, unit: Unit) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            width,
            height,
            unit,
            user_id: None,
            last_modified: None,
            areas: Vec::new(),
            skipped_areas: 0,
        }
    }

    /// Logical canvas size: dimensions in unit times the unit's pixel density.
    pub fn canvas_size(&self) -> Size {
        let ppu = self.unit.pixels_per_unit();
        let dim = |v: f64| {
            if v.is_finite() && v > 0.0 {
                v
            } else {
                Self::FALLBACK_DIMENSION
            }
        };
        Size::new(dim(self.width) * ppu, dim(self.height) * ppu)
    }

    pub fn get_area(&self, id: AreaId) -> Option<&Shape> {
        self.areas.iter().find(|s| s.id() == id)
    }

    /// Replace the area with the same id. Returns false if it is not present.
    pub fn replace_area(&mut self, shape: Shape) -> bool {
        match self.areas.iter_mut().find(|s| s.id() == shape.id()) {
            Some(slot) => {
                *slot = shape;
                true
            }
            None => false,
        }
    }

    pub fn remove_area(&mut self, id: AreaId) -> Option<Shape> {
        let index = self.areas.iter().position(|s| s.id() == id)?;
        Some(self.areas.remove(index))
    }

    /// Topmost area under `point`. Later areas are drawn on top, so the list
    /// is searched back to front.
    pub fn hit_test(&self, point: Point, measure: &dyn TextMeasure) -> Option<&Shape> {
        self.areas
            .iter()
            .rev()
            .find(|s| s.hit_test(point, measure))
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    /// Serialize the layout to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse a layout from JSON text, leniently (see [`Layout::from_value`]).
    pub fn from_json(json: &str) -> Result<Self, LayoutError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }

    /// Lenient decode of layout data.
    ///
    /// Header fields fall back to defaults. The `areas` field must be an array;
    /// entries that fail to decode are skipped with a warning and counted.
    pub fn from_value(value: &Value) -> Result<Self, LayoutError> {
        if value.is_null() {
            return Err(LayoutError::Missing);
        }
        let obj = value.as_object().ok_or(LayoutError::NotAnObject)?;
        let areas = obj
            .get("areas")
            .and_then(|a| a.as_array())
            .ok_or(LayoutError::AreasNotArray)?;

        let text = |key: &str| obj.get(key).and_then(|v| v.as_str()).map(str::to_string);
        let number = |key: &str| obj.get(key).and_then(|v| v.as_f64()).unwrap_or(0.0);
        let unit = obj
            .get("unit")
            .and_then(|v| serde_json::from_value::<Unit>(v.clone()).ok())
            .unwrap_or_default();

        let (width, height) = (number("width"), number("height"));
        if width < 0.0 || height < 0.0 {
            return Err(LayoutError::InvalidDimensions { width, height });
        }

        let mut layout = Self::new(text("name").unwrap_or_default(), width, height, unit);
        layout.id = text("id").unwrap_or_default();
        layout.user_id = text("userId");
        layout.last_modified = text("lastModified");

        let mut seen = HashSet::new();
        for (index, entry) in areas.iter().enumerate() {
            match serde_json::from_value::<Shape>(entry.clone()) {
                Ok(mut shape) => {
                    // Lookups go by id, so every loaded area needs its own.
                    if shape.id().is_nil() || !seen.insert(shape.id()) {
                        let id = Uuid::new_v4();
                        log::debug!("Area {index} has a missing or repeated id, assigning {id}");
                        shape.set_id(id);
                        seen.insert(id);
                    }
                    layout.areas.push(shape);
                }
                Err(e) => {
                    log::warn!("Skipping area {index}: {e}");
                    layout.skipped_areas += 1;
                }
            }
        }

        log::debug!(
            "Loaded layout '{}' with {} areas ({} skipped)",
            layout.name,
            layout.areas.len(),
            layout.skipped_areas
        );
        Ok(layout)
    }
}
