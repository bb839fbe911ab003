//! Rectangle area.

use super::{AreaId, AreaMeta, ShapeError, ShapeTrait, check_finite, check_size};
use crate::geometry::{TextMeasure, point_in_rectangle};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An axis-aligned rectangle. `position` is the top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rectangle {
    #[serde(default)]
    pub(crate) id: AreaId,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub position: Point,
    pub width: f64,
    pub height: f64,
    #[serde(flatten)]
    pub meta: AreaMeta,
}

impl Rectangle {
    /// Create a new rectangle. The id stays nil until a store accepts it.
    pub fn new(position: Point, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::nil(),
            name: String::new(),
            position,
            width,
            height,
            meta: AreaMeta::default(),
        }
    }

    /// Create a rectangle from two corner points.
    pub fn from_corners(p1: Point, p2: Point) -> Self {
        let min_x = p1.x.min(p2.x);
        let min_y = p1.y.min(p2.y);
        let width = (p2.x - p1.x).abs();
        let height = (p2.y - p1.y).abs();

        Self::new(Point::new(min_x, min_y), width, height)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Get the rectangle as a kurbo Rect.
    pub fn as_rect(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + self.width,
            self.position.y + self.height,
        )
    }

    /// Corner points in nw, ne, sw, se order.
    pub fn corners(&self) -> [Point; 4] {
        let Point { x, y } = self.position;
        [
            Point::new(x, y),
            Point::new(x + self.width, y),
            Point::new(x, y + self.height),
            Point::new(x + self.width, y + self.height),
        ]
    }
}

impl ShapeTrait for Rectangle {
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
        self.as_rect()
    }

    fn hit_test(&self, point: Point, _measure: &dyn TextMeasure) -> bool {
        point_in_rectangle(point, self)
    }

    fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    fn validate(&self) -> Result<(), ShapeError> {
        check_finite("x", self.position.x)?;
        check_finite("y", self.position.y)?;
        check_size("width", self.width)?;
        check_size("height", self.height)
    }

    fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::ApproxTextMeasure;

    #[test]
    fn test_rectangle_creation() {
        let rect = Rectangle::new(Point::new(10.0, 20.0), 100.0, 50.0);
        assert!((rect.position.x - 10.0).abs() < f64::EPSILON);
        assert!((rect.position.y - 20.0).abs() < f64::EPSILON);
        assert!((rect.width - 100.0).abs() < f64::EPSILON);
        assert!((rect.height - 50.0).abs() < f64::EPSILON);
        assert!(rect.id().is_nil());
    }

    #[test]
    fn test_rectangle_from_corners() {
        let rect = Rectangle::from_corners(Point::new(100.0, 100.0), Point::new(50.0, 50.0));
        assert!((rect.position.x - 50.0).abs() < f64::EPSILON);
        assert!((rect.position.y - 50.0).abs() < f64::EPSILON);
        assert!((rect.width - 50.0).abs() < f64::EPSILON);
        assert!((rect.height - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_bounds() {
        let rect = Rectangle::new(Point::new(10.0, 20.0), 100.0, 50.0);
        let bounds = rect.bounds(&ApproxTextMeasure);
        assert!((bounds.x0 - 10.0).abs() < f64::EPSILON);
        assert!((bounds.y0 - 20.0).abs() < f64::EPSILON);
        assert!((bounds.x1 - 110.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 70.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_validate() {
        let mut rect = Rectangle::new(Point::new(0.0, 0.0), 10.0, 10.0);
        assert!(rect.validate().is_ok());
        rect.height = -1.0;
        assert_eq!(rect.validate(), Err(ShapeError::Negative { field: "height" }));
        rect.height = f64::NAN;
        assert_eq!(rect.validate(), Err(ShapeError::NonFinite { field: "height" }));
    }

    #[test]
    fn test_zero_width_is_degenerate() {
        let rect = Rectangle::new(Point::new(0.0, 0.0), 0.0, 10.0);
        assert!(rect.validate().is_ok());
        assert!(rect.is_degenerate());
    }
}
