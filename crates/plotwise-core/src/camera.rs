//! Coordinate transform between device pixels and logical layout units.

use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};

/// Camera holds the zoom applied to the layout surface.
///
/// Unlike a free-panning canvas the surface is anchored at its own origin, so
/// the only inputs are the zoom scale and where the surface sits in device space.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    /// Current zoom scale.
    pub zoom: f64,
    /// Minimum allowed zoom level
    pub min_zoom: f64,
    /// Maximum allowed zoom level
    pub max_zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            min_zoom: 0.1,
            max_zoom: 3.0,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a camera at `zoom`, clamped to the allowed range.
    pub fn with_zoom(zoom: f64) -> Self {
        let mut camera = Self::default();
        camera.set_zoom(zoom);
        camera
    }

    /// Convert a device position to logical units:
    /// `round((device - surface_origin) / zoom)`.
    pub fn to_logical(&self, device: Point, surface_origin: Point) -> Point {
        Point::new(
            ((device.x - surface_origin.x) / self.zoom).round(),
            ((device.y - surface_origin.y) / self.zoom).round(),
        )
    }

    /// Set the zoom, clamped to `[min_zoom, max_zoom]`.
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        }
    }

    /// Change the zoom by a signed step.
    pub fn zoom_by(&mut self, step: f64) {
        self.set_zoom(self.zoom + step);
    }

    /// On-screen size of a logical canvas at the current zoom.
    pub fn scaled_size(&self, logical: Size) -> Size {
        Size::new(logical.width * self.zoom, logical.height * self.zoom)
    }
}
