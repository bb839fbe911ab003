//! Drawing tools.

use crate::shapes::{Circle, Line, Rectangle, Shape, ShapeKind};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Available tools. Each creates one kind of area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Rectangle,
    Circle,
    Line,
    Polygon,
    Text,
}

impl ToolKind {
    /// Kind of area this tool produces.
    pub fn shape_kind(self) -> ShapeKind {
        match self {
            ToolKind::Rectangle => ShapeKind::Rectangle,
            ToolKind::Circle => ShapeKind::Circle,
            ToolKind::Line => ShapeKind::Line,
            ToolKind::Polygon => ShapeKind::Polygon,
            ToolKind::Text => ShapeKind::Text,
        }
    }

    /// Whether the tool draws with a press-drag-release gesture.
    pub fn is_drag_tool(self) -> bool {
        matches!(self, ToolKind::Rectangle | ToolKind::Circle | ToolKind::Line)
    }

    /// Selecting this tool drops the current selection.
    pub fn clears_selection(self) -> bool {
        matches!(self, ToolKind::Polygon | ToolKind::Text)
    }

    /// Shape spanned by a drag from `start` to `current`, or `None` for tools
    /// that do not draw by dragging.
    pub fn preview_shape(self, start: Point, current: Point) -> Option<Shape> {
        match self {
            ToolKind::Rectangle => Some(Shape::Rectangle(Rectangle::from_corners(start, current))),
            ToolKind::Circle => Some(Shape::Circle(Circle::from_center_and_edge(start, current))),
            ToolKind::Line => Some(Shape::Line(Line::new(start, current))),
            ToolKind::Polygon | ToolKind::Text => None,
        }
    }
}
