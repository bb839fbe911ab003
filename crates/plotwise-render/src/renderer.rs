//! Renderer trait abstraction.

use kurbo::Size;
use peniko::Color;
use plotwise_core::{AreaState, Editor, Layout, LayoutStore, LayoutSurface, SurfaceStatus};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Initialization failed: {0}")]
    InitFailed(String),
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("Surface error: {0}")]
    Surface(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Grid display style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridStyle {
    /// No grid.
    None,
    /// Full grid lines.
    #[default]
    Lines,
    /// Only dots at intersections.
    Dots,
}

impl GridStyle {
    /// Cycle to the next grid style.
    pub fn next(self) -> Self {
        match self {
            GridStyle::None => GridStyle::Lines,
            GridStyle::Lines => GridStyle::Dots,
            GridStyle::Dots => GridStyle::None,
        }
    }

    /// Get display name for this grid style.
    pub fn name(self) -> &'static str {
        match self {
            GridStyle::None => "None",
            GridStyle::Lines => "Lines",
            GridStyle::Dots => "Dots",
        }
    }
}

/// Stroke and fill for one area display state.
#[derive(Debug, Clone, Copy)]
pub struct AreaStyle {
    pub stroke: Color,
    pub fill: Color,
    pub stroke_width: f64,
}

/// Colors used to draw a layout.
#[derive(Debug, Clone)]
pub struct Palette {
    pub selected: AreaStyle,
    pub hovered: AreaStyle,
    pub normal: AreaStyle,
    pub grid: Color,
    /// Dashed previews and the polygon under construction.
    pub in_progress: Color,
    /// Name labels, text areas and the scale bar legend.
    pub label: Color,
    pub scale_bar: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            selected: AreaStyle {
                stroke: Color::from_rgba8(59, 130, 246, 255),
                fill: Color::from_rgba8(59, 130, 246, 51),
                stroke_width: 2.5,
            },
            hovered: AreaStyle {
                stroke: Color::from_rgba8(16, 185, 129, 255),
                fill: Color::from_rgba8(16, 185, 129, 51),
                stroke_width: 2.5,
            },
            normal: AreaStyle {
                stroke: Color::from_rgba8(74, 120, 86, 255),
                fill: Color::from_rgba8(74, 120, 86, 51),
                stroke_width: 2.0,
            },
            grid: Color::from_rgba8(229, 229, 229, 255),
            in_progress: Color::from_rgba8(45, 95, 53, 255),
            label: Color::from_rgba8(0, 0, 0, 204),
            scale_bar: Color::BLACK,
        }
    }
}

impl Palette {
    pub fn area(&self, state: AreaState) -> AreaStyle {
        match state {
            AreaState::Selected => self.selected,
            AreaState::Hovered => self.hovered,
            AreaState::Normal => self.normal,
        }
    }
}

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// Layout to draw, if one is loaded.
    pub layout: Option<&'a Layout>,
    /// Selection, hover and in-progress gesture.
    pub editor: &'a Editor,
    pub status: &'a SurfaceStatus,
    /// Zoom applied to every logical coordinate.
    pub zoom: f64,
    /// Viewport size in physical pixels.
    pub viewport_size: Size,
    /// Background color.
    pub background_color: Color,
    /// Grid display style.
    pub grid_style: GridStyle,
    pub palette: Palette,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(
        layout: Option<&'a Layout>,
        editor: &'a Editor,
        status: &'a SurfaceStatus,
        viewport_size: Size,
    ) -> Self {
        Self {
            layout,
            editor,
            status,
            zoom: 1.0,
            viewport_size,
            background_color: Color::from_rgba8(250, 250, 250, 255),
            grid_style: GridStyle::Lines,
            palette: Palette::default(),
        }
    }

    /// Context for everything a layout surface currently shows.
    pub fn from_surface<S: LayoutStore>(surface: &'a LayoutSurface<S>, viewport_size: Size) -> Self {
        Self::new(surface.layout(), surface.editor(), surface.status(), viewport_size)
            .with_zoom(surface.camera().zoom)
    }

    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom = zoom;
        self
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Set the grid style.
    pub fn with_grid(mut self, style: GridStyle) -> Self {
        self.grid_style = style;
        self
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }
}

/// Trait for rendering backends.
///
/// Implementations can use Vello, wgpu directly, or other rendering engines.
pub trait Renderer {
    /// Build the scene/command buffer for a frame.
    ///
    /// Every frame is redrawn from scratch.
    fn build_scene(&mut self, ctx: &RenderContext);

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.background_color
    }
}
