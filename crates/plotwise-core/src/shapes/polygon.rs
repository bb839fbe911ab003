//! Polygon area.

use super::{AreaId, AreaMeta, ShapeError, ShapeTrait, check_finite};
use crate::geometry::{TextMeasure, point_in_polygon};
use kurbo::{BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A closed polygon.
///
/// `position` is the anchor and always equals the first vertex; every mutation
/// that moves vertex 0 moves the anchor with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Polygon {
    #[serde(default)]
    pub(crate) id: AreaId,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub position: Point,
    pub points: Vec<Point>,
    #[serde(flatten)]
    pub meta: AreaMeta,
}

impl Polygon {
    /// Minimum number of vertices of a committed polygon.
    pub const MIN_VERTICES: usize = 3;

    pub fn new(points: Vec<Point>) -> Self {
        let position = points.first().copied().unwrap_or(Point::ZERO);
        Self {
            id: Uuid::nil(),
            name: String::new(),
            position,
            points,
            meta: AreaMeta::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Replace one vertex. Moving vertex 0 also moves the anchor.
    /// Returns false when the index is out of range.
    pub fn move_vertex(&mut self, index: usize, position: Point) -> bool {
        let Some(vertex) = self.points.get_mut(index) else {
            return false;
        };
        *vertex = position;
        if index == 0 {
            self.position = position;
        }
        true
    }

    /// Closed outline path through all vertices.
    pub fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let mut iter = self.points.iter();
        if let Some(&first) = iter.next() {
            path.move_to(first);
            for &p in iter {
                path.line_to(p);
            }
            path.close_path();
        }
        path
    }
}

impl ShapeTrait for Polygon {
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
        let mut iter = self.points.iter();
        let Some(&first) = iter.next() else {
            return Rect::from_origin_size(self.position, (0.0, 0.0));
        };
        iter.fold(Rect::from_points(first, first), |acc, &p| acc.union_pt(p))
    }

    fn hit_test(&self, point: Point, _measure: &dyn TextMeasure) -> bool {
        point_in_polygon(point, &self.points)
    }

    fn translate(&mut self, delta: Vec2) {
        self.position += delta;
        for p in &mut self.points {
            *p += delta;
        }
    }

    fn validate(&self) -> Result<(), ShapeError> {
        check_finite("x", self.position.x)?;
        check_finite("y", self.position.y)?;
        for p in &self.points {
            check_finite("points", p.x)?;
            check_finite("points", p.y)?;
        }
        let count = self.points.len();
        if count > 0 && count < Self::MIN_VERTICES {
            return Err(ShapeError::TooFewVertices { count });
        }
        Ok(())
    }

    fn is_degenerate(&self) -> bool {
        self.points.is_empty()
    }
}
