//! Line area.

use super::{AreaId, AreaMeta, ShapeError, ShapeTrait, check_finite};
use crate::geometry::{TextMeasure, point_near_line};
use kurbo::{Line as KurboLine, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A straight line segment from `position` to (`end_x`, `end_y`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    #[serde(default)]
    pub(crate) id: AreaId,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub position: Point,
    pub end_x: f64,
    pub end_y: f64,
    #[serde(flatten)]
    pub meta: AreaMeta,
}

impl Line {
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            id: Uuid::nil(),
            name: String::new(),
            position: start,
            end_x: end.x,
            end_y: end.y,
            meta: AreaMeta::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn start(&self) -> Point {
        self.position
    }

    pub fn end(&self) -> Point {
        Point::new(self.end_x, self.end_y)
    }

    pub fn length(&self) -> f64 {
        self.start().distance(self.end())
    }

    pub fn as_kurbo(&self) -> KurboLine {
        KurboLine::new(self.start(), self.end())
    }
}

impl ShapeTrait for Line {
    fn id(&self) -> AreaId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn origin(&self) -> Point {
        self.position
    }

    fn bounds(&self, _measure: &dyn TextMeasure) -> Rect {
        Rect::from_points(self.start(), self.end())
    }

    fn hit_test(&self, point: Point, _measure: &dyn TextMeasure) -> bool {
        point_near_line(point, self)
    }

    fn translate(&mut self, delta: Vec2) {
        self.position += delta;
        self.end_x += delta.x;
        self.end_y += delta.y;
    }

    fn validate(&self) -> Result<(), ShapeError> {
        check_finite("x", self.position.x)?;
        check_finite("y", self.position.y)?;
        check_finite("endX", self.end_x)?;
        check_finite("endY", self.end_y)
    }

    fn is_degenerate(&self) -> bool {
        self.length() <= f64::EPSILON
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_moves_both_ends() {
        let mut line = Line::new(Point::new(0.0, 0.0), Point::new(10.0, 5.0));
        line.translate(Vec2::new(2.0, 3.0));
        assert_eq!(line.start(), Point::new(2.0, 3.0));
        assert_eq!(line.end(), Point::new(12.0, 8.0));
    }

    #[test]
    fn test_zero_length_is_degenerate() {
        let line = Line::new(Point::new(4.0, 4.0), Point::new(4.0, 4.0));
        assert!(line.validate().is_ok());
        assert!(line.is_degenerate());
    }
}
