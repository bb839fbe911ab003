//! Text label area.

use super::{AreaId, AreaMeta, ShapeError, ShapeTrait, check_finite, check_size};
use crate::geometry::{TextMeasure, point_in_text_box, text_box};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Horizontal alignment of a text label relative to its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    /// Cycle to the next alignment.
    pub fn next(self) -> Self {
        match self {
            TextAlign::Left => TextAlign::Center,
            TextAlign::Center => TextAlign::Right,
            TextAlign::Right => TextAlign::Left,
        }
    }

    /// Left edge of a box of `width` anchored at `anchor_x`.
    pub fn box_left(self, anchor_x: f64, width: f64) -> f64 {
        match self {
            TextAlign::Left => anchor_x,
            TextAlign::Center => anchor_x - width / 2.0,
            TextAlign::Right => anchor_x - width,
        }
    }
}

/// A text label. `position` is the anchor on the text baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Text {
    #[serde(default)]
    pub(crate) id: AreaId,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub position: Point,
    pub content: String,
    pub font_size: f64,
    #[serde(default)]
    pub text_align: TextAlign,
    #[serde(flatten)]
    pub meta: AreaMeta,
}

impl Text {
    /// Font size given to new labels.
    pub const DEFAULT_FONT_SIZE: f64 = 16.0;

    pub fn new(position: Point, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::nil(),
            name: String::new(),
            position,
            content: content.into(),
            font_size: Self::DEFAULT_FONT_SIZE,
            text_align: TextAlign::default(),
            meta: AreaMeta::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_align(mut self, align: TextAlign) -> Self {
        self.text_align = align;
        self
    }
}

impl ShapeTrait for Text {
    fn id(&self) -> AreaId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn origin(&self) -> Point {
        self.position
    }

    fn bounds(&self, measure: &dyn TextMeasure) -> Rect {
        text_box(self, measure)
    }

    fn hit_test(&self, point: Point, measure: &dyn TextMeasure) -> bool {
        point_in_text_box(point, self, measure)
    }

    fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    fn validate(&self) -> Result<(), ShapeError> {
        check_finite("x", self.position.x)?;
        check_finite("y", self.position.y)?;
        check_size("fontSize", self.font_size)
    }

    fn is_degenerate(&self) -> bool {
        self.content.trim().is_empty() || self.font_size <= 0.0
    }
}
