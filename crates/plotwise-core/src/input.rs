//! Host-independent input events.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Pointer event in device pixels. Hosts translate their native events into these.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Point },
    Up { position: Point },
    Move { position: Point },
    /// The pointer left the surface. Ends gestures like a release.
    Leave,
}

/// Keys the editor reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditorKey {
    Escape,
    Enter,
    Backspace,
    Tab,
    Character(char),
}

/// Cursor the host should show for the pointer's current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorHint {
    #[default]
    Crosshair,
    /// Over a shape that can be moved.
    Move,
    /// A shape is being dragged.
    Grabbing,
    /// Over a resize handle, by compass corner.
    Resize(crate::selection::Corner),
    /// Over a polygon vertex handle.
    Pointer,
    /// A click here closes the polygon under construction.
    ClosePolygon,
}
