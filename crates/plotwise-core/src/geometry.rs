//! Geometry kernel: containment and proximity predicates.
//!
//! Every threshold here is in logical (unscaled) units. Callers convert device
//! coordinates with [`crate::camera::Camera::to_logical`] first.

use crate::shapes::{Circle, Line, Rectangle, Text};
use kurbo::{Point, Rect};

/// Slack allowed by [`point_near_line`].
pub const LINE_TOLERANCE: f64 = 5.0;
/// Half the side of the square hotspot around a handle.
pub const HANDLE_TOLERANCE: f64 = 5.0;
/// A polygon closes when a click lands this close to its first vertex.
pub const POLYGON_CLOSE_DISTANCE: f64 = 20.0;
/// Smallest width/height a rectangle resize may produce.
pub const MIN_RECT_SIZE: f64 = 10.0;
/// Smallest radius a circle resize may produce.
pub const MIN_CIRCLE_RADIUS: f64 = 5.0;
/// A draw gesture must span more than this in width or height to commit.
pub const MIN_DRAW_EXTENT: f64 = 10.0;

/// Measures rendered text width, so hit testing does not depend on a live surface.
pub trait TextMeasure {
    /// Width of `content` rendered at `font_size`, in logical units.
    fn measure(&self, content: &str, font_size: f64) -> f64;
}

/// Fixed-advance estimate used when no font stack is available.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproxTextMeasure;

impl ApproxTextMeasure {
    /// Average glyph advance as a fraction of the font size.
    pub const ADVANCE: f64 = 0.6;
}

impl TextMeasure for ApproxTextMeasure {
    fn measure(&self, content: &str, font_size: f64) -> f64 {
        content.chars().count() as f64 * font_size * Self::ADVANCE
    }
}

/// Bounds test that includes all four edges (kurbo's `contains` excludes the far edges).
pub fn rect_contains_inclusive(rect: Rect, point: Point) -> bool {
    point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1
}

pub fn point_in_rectangle(point: Point, rect: &Rectangle) -> bool {
    rect_contains_inclusive(rect.as_rect(), point)
}

pub fn point_in_circle(point: Point, circle: &Circle) -> bool {
    point.distance(circle.position) <= circle.radius
}

/// Segment proximity via the degenerate-ellipse test: the detour through
/// `point` may be at most [`LINE_TOLERANCE`] longer than the segment itself.
pub fn point_near_line(point: Point, line: &Line) -> bool {
    let d1 = point.distance(line.start());
    let d2 = point.distance(line.end());
    (d1 + d2 - line.length()).abs() < LINE_TOLERANCE
}

/// Even-odd ray casting over the closed edge list.
pub fn point_in_polygon(point: Point, vertices: &[Point]) -> bool {
    let n = vertices.len();
    let mut inside = false;
    for i in 0..n {
        let a = vertices[i];
        let b = vertices[(i + n - 1) % n];
        if (a.y > point.y) != (b.y > point.y)
            && point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x
        {
            inside = !inside;
        }
    }
    inside
}

/// Box occupied by a text label: aligned horizontally around the anchor and
/// extending one font size above the baseline.
pub fn text_box(text: &Text, measure: &dyn TextMeasure) -> Rect {
    let width = measure.measure(&text.content, text.font_size);
    let x0 = text.text_align.box_left(text.position.x, width);
    Rect::new(
        x0,
        text.position.y - text.font_size,
        x0 + width,
        text.position.y,
    )
}

pub fn point_in_text_box(point: Point, text: &Text, measure: &dyn TextMeasure) -> bool {
    rect_contains_inclusive(text_box(text, measure), point)
}

/// Whether `point` lies in the square hotspot centered on `target`.
pub fn point_near(point: Point, target: Point, tolerance: f64) -> bool {
    (point.x - target.x).abs() <= tolerance && (point.y - target.y).abs() <= tolerance
}
