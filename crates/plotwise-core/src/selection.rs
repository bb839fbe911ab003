//! Selection handles and the manipulation math behind them.

use crate::geometry::{HANDLE_TOLERANCE, MIN_CIRCLE_RADIUS, MIN_RECT_SIZE, point_near};
use crate::shapes::{Circle, Polygon, Rectangle, Shape};
use kurbo::{Point, Size, Vec2};

/// Drawn size of a rectangle/circle resize handle.
pub const RESIZE_HANDLE_SIZE: f64 = 8.0;
/// Drawn size of a polygon vertex handle.
pub const VERTEX_HANDLE_SIZE: f64 = 6.0;

/// Corner positions. Circles map them onto the circumference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    /// Angle in degrees of the matching circle handle (y grows downward).
    pub fn circle_angle(self) -> f64 {
        match self {
            Corner::BottomRight => 45.0,
            Corner::BottomLeft => 135.0,
            Corner::TopLeft => 225.0,
            Corner::TopRight => 315.0,
        }
    }
}

/// Type of selection handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    /// Resize handle of a rectangle or circle.
    Corner(Corner),
    /// Vertex of a polygon (index into its points).
    Vertex(usize),
}

/// A selection handle with its position and type.
#[derive(Debug, Clone, Copy)]
pub struct Handle {
    /// Position in logical coordinates.
    pub position: Point,
    pub kind: HandleKind,
}

impl Handle {
    pub fn new(position: Point, kind: HandleKind) -> Self {
        Self { position, kind }
    }

    /// Check if a point falls in this handle's hotspot.
    pub fn hit_test(&self, point: Point) -> bool {
        point_near(point, self.position, HANDLE_TOLERANCE)
    }

    /// Drawn size of the handle square.
    pub fn size(&self) -> f64 {
        match self.kind {
            HandleKind::Corner(_) => RESIZE_HANDLE_SIZE,
            HandleKind::Vertex(_) => VERTEX_HANDLE_SIZE,
        }
    }
}

/// Resize handles: rectangle corners or four points on a circle.
/// Other shape kinds cannot be resized.
pub fn resize_handles(shape: &Shape) -> Vec<Handle> {
    match shape {
        Shape::Rectangle(rect) => rect
            .corners()
            .into_iter()
            .zip(Corner::ALL)
            .map(|(p, corner)| Handle::new(p, HandleKind::Corner(corner)))
            .collect(),
        Shape::Circle(circle) => Corner::ALL
            .into_iter()
            .map(|corner| {
                Handle::new(
                    circle.point_at_angle(corner.circle_angle()),
                    HandleKind::Corner(corner),
                )
            })
            .collect(),
        Shape::Line(_) | Shape::Polygon(_) | Shape::Text(_) => Vec::new(),
    }
}

/// One handle per polygon vertex.
pub fn vertex_handles(polygon: &Polygon) -> Vec<Handle> {
    polygon
        .points
        .iter()
        .enumerate()
        .map(|(i, &p)| Handle::new(p, HandleKind::Vertex(i)))
        .collect()
}

/// All handles drawn for a selected shape.
pub fn get_handles(shape: &Shape) -> Vec<Handle> {
    match shape {
        Shape::Polygon(polygon) => vertex_handles(polygon),
        _ => resize_handles(shape),
    }
}

/// The resize handle of `shape` under `point`, if any.
pub fn hit_test_resize_handle(shape: &Shape, point: Point) -> Option<Corner> {
    resize_handles(shape)
        .into_iter()
        .find(|h| h.hit_test(point))
        .and_then(|h| match h.kind {
            HandleKind::Corner(corner) => Some(corner),
            HandleKind::Vertex(_) => None,
        })
}

/// Index of the first polygon vertex whose hotspot contains `point`.
pub fn hit_test_vertex(polygon: &Polygon, point: Point) -> Option<usize> {
    polygon
        .points
        .iter()
        .position(|&p| point_near(point, p, HANDLE_TOLERANCE))
}

/// Resize a rectangle by dragging `corner` to `pointer`, keeping the opposite
/// corner fixed. Returns `None` when the result would be smaller than
/// [`MIN_RECT_SIZE`] in either dimension.
pub fn resize_rectangle(rect: &Rectangle, corner: Corner, pointer: Point) -> Option<Rectangle> {
    let Point { x, y } = rect.position;
    let right = x + rect.width;
    let bottom = y + rect.height;

    let (new_x, new_y, width, height) = match corner {
        Corner::TopLeft => {
            let nx = pointer.x.min(right);
            let ny = pointer.y.min(bottom);
            (nx, ny, right - nx, bottom - ny)
        }
        Corner::TopRight => {
            let ny = pointer.y.min(bottom);
            (x, ny, pointer.x - x, bottom - ny)
        }
        Corner::BottomLeft => {
            let nx = pointer.x.min(right);
            (nx, y, right - nx, pointer.y - y)
        }
        Corner::BottomRight => (x, y, pointer.x - x, pointer.y - y),
    };

    if width < MIN_RECT_SIZE || height < MIN_RECT_SIZE {
        return None;
    }

    let mut resized = rect.clone();
    resized.position = Point::new(new_x, new_y);
    resized.width = width;
    resized.height = height;
    Some(resized)
}

/// Resize a circle so its edge passes through `pointer`.
/// Returns `None` below [`MIN_CIRCLE_RADIUS`].
pub fn resize_circle(circle: &Circle, pointer: Point) -> Option<Circle> {
    let radius = circle.position.distance(pointer);
    if radius < MIN_CIRCLE_RADIUS {
        return None;
    }
    let mut resized = circle.clone();
    resized.radius = radius;
    Some(resized)
}

/// Apply a resize gesture to any shape. Kinds without resize handles yield `None`.
pub fn apply_resize(shape: &Shape, corner: Corner, pointer: Point) -> Option<Shape> {
    match shape {
        Shape::Rectangle(rect) => resize_rectangle(rect, corner, pointer).map(Shape::Rectangle),
        Shape::Circle(circle) => resize_circle(circle, pointer).map(Shape::Circle),
        Shape::Line(_) | Shape::Polygon(_) | Shape::Text(_) => None,
    }
}

/// Move a shape so its origin follows `pointer - grab_offset`, with the origin
/// clamped to the canvas.
pub fn apply_drag(shape: &Shape, pointer: Point, grab_offset: Vec2, canvas: Size) -> Shape {
    let target = pointer - grab_offset;
    let origin = Point::new(
        target.x.clamp(0.0, canvas.width.max(0.0)),
        target.y.clamp(0.0, canvas.height.max(0.0)),
    );
    let mut moved = shape.clone();
    moved.move_origin_to(origin);
    moved
}
