//! Area shapes placed on a layout.

mod circle;
mod line;
mod polygon;
mod rectangle;
mod text;

pub use circle::Circle;
pub use line::Line;
pub use polygon::Polygon;
pub use rectangle::Rectangle;
pub use text::{Text, TextAlign};

use crate::geometry::TextMeasure;
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for areas. Assigned by the layout store.
pub type AreaId = Uuid;

/// Shape validation errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShapeError {
    #[error("Field `{field}` is not a finite number")]
    NonFinite { field: &'static str },
    #[error("Field `{field}` must not be negative")]
    Negative { field: &'static str },
    #[error("Polygon needs at least 3 vertices, found {count}")]
    TooFewVertices { count: usize },
}

/// Optional planting metadata attached to an area.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planted_date: Option<String>,
}

/// Discriminant of a [`Shape`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Line,
    Polygon,
    Text,
}

impl ShapeKind {
    /// Human-readable label, used for generated area names.
    pub fn label(self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "Rectangle",
            ShapeKind::Circle => "Circle",
            ShapeKind::Line => "Line",
            ShapeKind::Polygon => "Polygon",
            ShapeKind::Text => "Text",
        }
    }

    /// Generated display name for the next area of this kind.
    pub fn default_name(self, existing: usize) -> String {
        format!("{} {}", self.label(), existing + 1)
    }
}

/// Check that a numeric field is finite.
pub(crate) fn check_finite(field: &'static str, value: f64) -> Result<(), ShapeError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ShapeError::NonFinite { field })
    }
}

/// Check that a numeric field is finite and not negative.
pub(crate) fn check_size(field: &'static str, value: f64) -> Result<(), ShapeError> {
    check_finite(field, value)?;
    if value < 0.0 {
        return Err(ShapeError::Negative { field });
    }
    Ok(())
}

/// Common trait for all area shapes.
pub trait ShapeTrait {
    /// Get the unique identifier.
    fn id(&self) -> AreaId;

    /// Get the display name.
    fn name(&self) -> &str;

    /// Origin point (top-left, center, start point or anchor depending on kind).
    fn origin(&self) -> Point;

    /// Bounding box in logical coordinates.
    fn bounds(&self, measure: &dyn TextMeasure) -> Rect;

    /// Check if a point (in logical coordinates) hits this shape.
    fn hit_test(&self, point: Point, measure: &dyn TextMeasure) -> bool;

    /// Move the shape rigidly by a delta.
    fn translate(&mut self, delta: Vec2);

    /// Reject shapes whose numeric fields cannot be drawn.
    fn validate(&self) -> Result<(), ShapeError>;

    /// Whether the shape is valid but has nothing to draw.
    fn is_degenerate(&self) -> bool;
}

/// An area on the layout. Later entries in a layout are drawn on top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    Rectangle(Rectangle),
    Circle(Circle),
    Line(Line),
    Polygon(Polygon),
    Text(Text),
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Rectangle(_) => ShapeKind::Rectangle,
            Shape::Circle(_) => ShapeKind::Circle,
            Shape::Line(_) => ShapeKind::Line,
            Shape::Polygon(_) => ShapeKind::Polygon,
            Shape::Text(_) => ShapeKind::Text,
        }
    }

    pub fn id(&self) -> AreaId {
        match self {
            Shape::Rectangle(s) => s.id(),
            Shape::Circle(s) => s.id(),
            Shape::Line(s) => s.id(),
            Shape::Polygon(s) => s.id(),
            Shape::Text(s) => s.id(),
        }
    }

    /// Replace the identifier. Used by stores when accepting a new area.
    pub fn set_id(&mut self, id: AreaId) {
        match self {
            Shape::Rectangle(s) => s.id = id,
            Shape::Circle(s) => s.id = id,
            Shape::Line(s) => s.id = id,
            Shape::Polygon(s) => s.id = id,
            Shape::Text(s) => s.id = id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Shape::Rectangle(s) => s.name(),
            Shape::Circle(s) => s.name(),
            Shape::Line(s) => s.name(),
            Shape::Polygon(s) => s.name(),
            Shape::Text(s) => s.name(),
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        match self {
            Shape::Rectangle(s) => s.name = name,
            Shape::Circle(s) => s.name = name,
            Shape::Line(s) => s.name = name,
            Shape::Polygon(s) => s.name = name,
            Shape::Text(s) => s.name = name,
        }
    }

    pub fn meta(&self) -> &AreaMeta {
        match self {
            Shape::Rectangle(s) => &s.meta,
            Shape::Circle(s) => &s.meta,
            Shape::Line(s) => &s.meta,
            Shape::Polygon(s) => &s.meta,
            Shape::Text(s) => &s.meta,
        }
    }

    pub fn origin(&self) -> Point {
        match self {
            Shape::Rectangle(s) => s.origin(),
            Shape::Circle(s) => s.origin(),
            Shape::Line(s) => s.origin(),
            Shape::Polygon(s) => s.origin(),
            Shape::Text(s) => s.origin(),
        }
    }

    pub fn bounds(&self, measure: &dyn TextMeasure) -> Rect {
        match self {
            Shape::Rectangle(s) => s.bounds(measure),
            Shape::Circle(s) => s.bounds(measure),
            Shape::Line(s) => s.bounds(measure),
            Shape::Polygon(s) => s.bounds(measure),
            Shape::Text(s) => s.bounds(measure),
        }
    }

    pub fn hit_test(&self, point: Point, measure: &dyn TextMeasure) -> bool {
        match self {
            Shape::Rectangle(s) => s.hit_test(point, measure),
            Shape::Circle(s) => s.hit_test(point, measure),
            Shape::Line(s) => s.hit_test(point, measure),
            Shape::Polygon(s) => s.hit_test(point, measure),
            Shape::Text(s) => s.hit_test(point, measure),
        }
    }

    pub fn translate(&mut self, delta: Vec2) {
        match self {
            Shape::Rectangle(s) => s.translate(delta),
            Shape::Circle(s) => s.translate(delta),
            Shape::Line(s) => s.translate(delta),
            Shape::Polygon(s) => s.translate(delta),
            Shape::Text(s) => s.translate(delta),
        }
    }

    /// Move the shape so its origin lands on `origin`.
    pub fn move_origin_to(&mut self, origin: Point) {
        let delta = origin - self.origin();
        self.translate(delta);
    }

    pub fn validate(&self) -> Result<(), ShapeError> {
        match self {
            Shape::Rectangle(s) => s.validate(),
            Shape::Circle(s) => s.validate(),
            Shape::Line(s) => s.validate(),
            Shape::Polygon(s) => s.validate(),
            Shape::Text(s) => s.validate(),
        }
    }

    pub fn is_degenerate(&self) -> bool {
        match self {
            Shape::Rectangle(s) => s.is_degenerate(),
            Shape::Circle(s) => s.is_degenerate(),
            Shape::Line(s) => s.is_degenerate(),
            Shape::Polygon(s) => s.is_degenerate(),
            Shape::Text(s) => s.is_degenerate(),
        }
    }

    /// Whether the generic name label is drawn for this shape.
    pub fn shows_name_label(&self) -> bool {
        !matches!(self, Shape::Line(_) | Shape::Text(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::ApproxTextMeasure;
    use serde_json::json;

    #[test]
    fn test_default_name() {
        assert_eq!(ShapeKind::Rectangle.default_name(0), "Rectangle 1");
        assert_eq!(ShapeKind::Polygon.default_name(4), "Polygon 5");
    }

    #[test]
    fn test_deserialize_wire_format() {
        let value = json!({
            "id": "6f1c1a0e-0000-4000-8000-000000000001",
            "type": "line",
            "name": "Path",
            "x": 1,
            "y": 2.5,
            "endX": 10,
            "endY": 20,
            "quantity": 3
        });
        let shape: Shape = serde_json::from_value(value).unwrap();
        let Shape::Line(line) = &shape else {
            panic!("expected a line");
        };
        assert!((line.position.y - 2.5).abs() < f64::EPSILON);
        assert!((line.end_x - 10.0).abs() < f64::EPSILON);
        assert_eq!(shape.meta().quantity, Some(3));
        assert_eq!(shape.kind(), ShapeKind::Line);
    }

    #[test]
    fn test_serialize_omits_empty_meta() {
        let shape = Shape::Circle(Circle::new(Point::new(5.0, 5.0), 3.0));
        let value = serde_json::to_value(&shape).unwrap();
        assert_eq!(value["type"], "circle");
        assert_eq!(value["radius"], 3.0);
        assert!(value.get("quantity").is_none());
        assert!(value.get("plantedDate").is_none());
    }

    #[test]
    fn test_missing_numeric_field_fails() {
        let value = json!({ "type": "rectangle", "name": "Bed", "x": 0, "y": 0, "width": 10 });
        assert!(serde_json::from_value::<Shape>(value).is_err());
    }

    #[test]
    fn test_move_origin_to_translates_polygon() {
        let mut shape = Shape::Polygon(Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
        ]));
        shape.move_origin_to(Point::new(5.0, 7.0));
        let Shape::Polygon(polygon) = &shape else {
            panic!("expected a polygon");
        };
        assert_eq!(polygon.points[2], Point::new(15.0, 17.0));
        assert_eq!(polygon.position, polygon.points[0]);
    }

    #[test]
    fn test_name_label_visibility() {
        let rect = Shape::Rectangle(Rectangle::new(Point::ZERO, 10.0, 10.0));
        let line = Shape::Line(Line::new(Point::ZERO, Point::new(5.0, 5.0)));
        assert!(rect.shows_name_label());
        assert!(!line.shows_name_label());
    }

    #[test]
    fn test_hit_test_dispatch() {
        let measure = ApproxTextMeasure;
        let shape = Shape::Rectangle(Rectangle::new(Point::new(10.0, 10.0), 20.0, 20.0));
        assert!(shape.hit_test(Point::new(15.0, 15.0), &measure));
        assert!(!shape.hit_test(Point::new(5.0, 15.0), &measure));
    }
}
