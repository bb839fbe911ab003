//! Plotwise Core Library
//!
//! Platform-agnostic data structures and editing logic for the Plotwise
//! garden and nursery layout editor.

pub mod camera;
pub mod geometry;
pub mod input;
pub mod interaction;
pub mod layout;
pub mod selection;
pub mod shapes;
pub mod store;
pub mod surface;
pub mod tools;

pub use camera::Camera;
pub use geometry::{ApproxTextMeasure, TextMeasure};
pub use input::{CursorHint, EditorKey, PointerEvent};
pub use interaction::{AreaState, Editor, Effect, InteractionState, TextTarget};
pub use layout::{Layout, LayoutError, Unit};
pub use selection::{Corner, Handle, HandleKind};
pub use shapes::{AreaId, AreaMeta, Shape, ShapeError, ShapeKind, ShapeTrait};
pub use store::{FileLayoutStore, LayoutStore, MemoryLayoutStore, StoreError};
pub use surface::{LayoutSurface, SurfaceConfig, SurfaceStatus};
pub use tools::ToolKind;
