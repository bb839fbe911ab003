//! Circle area.

use super::{AreaId, AreaMeta, ShapeError, ShapeTrait, check_finite, check_size};
use crate::geometry::{TextMeasure, point_in_circle};
use kurbo::{Circle as KurboCircle, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A circle. `position` is the center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Circle {
    #[serde(default)]
    pub(crate) id: AreaId,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub position: Point,
    pub radius: f64,
    #[serde(flatten)]
    pub meta: AreaMeta,
}

impl Circle {
    pub fn new(center: Point, radius: f64) -> Self {
        Self {
            id: Uuid::nil(),
            name: String::new(),
            position: center,
            radius,
            meta: AreaMeta::default(),
        }
    }

    /// Circle centered on `center` passing through `edge`.
    pub fn from_center_and_edge(center: Point, edge: Point) -> Self {
        Self::new(center, center.distance(edge))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn center(&self) -> Point {
        self.position
    }

    pub fn as_kurbo(&self) -> KurboCircle {
        KurboCircle::new(self.position, self.radius)
    }

    /// Point on the circumference at `degrees` (clockwise from +x in screen space).
    pub fn point_at_angle(&self, degrees: f64) -> Point {
        let radians = degrees.to_radians();
        Point::new(
            self.position.x + self.radius * radians.cos(),
            self.position.y + self.radius * radians.sin(),
        )
    }
}

impl ShapeTrait for Circle {
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
        Rect::new(
            self.position.x - self.radius,
            self.position.y - self.radius,
            self.position.x + self.radius,
            self.position.y + self.radius,
        )
    }

    fn hit_test(&self, point: Point, _measure: &dyn TextMeasure) -> bool {
        point_in_circle(point, self)
    }

    fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    fn validate(&self) -> Result<(), ShapeError> {
        check_finite("x", self.position.x)?;
        check_finite("y", self.position.y)?;
        check_size("radius", self.radius)
    }

    fn is_degenerate(&self) -> bool {
        self.radius <= 0.0
    }
}
