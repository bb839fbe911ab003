//! Layout surface: the editor bound to a store, a camera and a text measure.
//!
//! Hosts feed device-pixel input here. The surface converts it to logical
//! units, runs the state machine against its local snapshot of the layout and
//! applies the resulting effects optimistically, forwarding each one to the
//! store as it happens.

use crate::camera::Camera;
use crate::geometry::{ApproxTextMeasure, TextMeasure};
use crate::input::{CursorHint, EditorKey, PointerEvent};
use crate::interaction::{Editor, Effect};
use crate::layout::{Layout, LayoutError};
use crate::shapes::{AreaId, TextAlign};
use crate::store::LayoutStore;
use crate::tools::ToolKind;
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Surface settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    /// Disable every mutation. Hover and click selection still work.
    pub read_only: bool,
    /// Zoom change per zoom-in/zoom-out command.
    pub zoom_step: f64,
    pub initial_zoom: f64,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            read_only: false,
            zoom_step: 0.1,
            initial_zoom: 1.0,
        }
    }
}

/// Whether the surface has a usable layout.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SurfaceStatus {
    #[default]
    Ready,
    /// Layout data could not be used. `raw` is the offending data, pretty-printed.
    Error { message: String, raw: String },
}

type SelectionCallback = Box<dyn FnMut(Option<AreaId>)>;

/// Layout available for editing, or `None` while in the error state.
fn active_layout<'a>(status: &SurfaceStatus, layout: &'a Option<Layout>) -> Option<&'a Layout> {
    match status {
        SurfaceStatus::Ready => layout.as_ref(),
        SurfaceStatus::Error { .. } => None,
    }
}

pub struct LayoutSurface<S: LayoutStore> {
    store: S,
    layout: Option<Layout>,
    editor: Editor,
    camera: Camera,
    measure: Box<dyn TextMeasure>,
    on_selection_changed: Option<SelectionCallback>,
    status: SurfaceStatus,
    zoom_step: f64,
}

impl<S: LayoutStore> LayoutSurface<S> {
    pub fn new(store: S, config: &SurfaceConfig) -> Self {
        let mut editor = Editor::new();
        editor.set_read_only(config.read_only);
        Self {
            store,
            layout: None,
            editor,
            camera: Camera::with_zoom(config.initial_zoom),
            measure: Box::new(ApproxTextMeasure),
            on_selection_changed: None,
            status: SurfaceStatus::Ready,
            zoom_step: config.zoom_step,
        }
    }

    /// Use `measure` for text hit testing and bounds.
    pub fn with_text_measure(mut self, measure: Box<dyn TextMeasure>) -> Self {
        self.measure = measure;
        self
    }

    /// Register the host callback for selection changes.
    pub fn on_selection_changed(&mut self, callback: impl FnMut(Option<AreaId>) + 'static) {
        self.on_selection_changed = Some(Box::new(callback));
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Local snapshot of the layout, if one is loaded.
    pub fn layout(&self) -> Option<&Layout> {
        self.layout.as_ref()
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn text_measure(&self) -> &dyn TextMeasure {
        self.measure.as_ref()
    }

    pub fn status(&self) -> &SurfaceStatus {
        &self.status
    }

    /// Most recent store failure, for hosts that surface them.
    pub fn store_error(&self) -> Option<String> {
        self.store.last_error()
    }

    /// Load raw layout data. On failure the surface enters the error state and
    /// keeps the previous snapshot out of reach until a load succeeds.
    pub fn load_value(&mut self, value: Option<&Value>) -> Result<(), LayoutError> {
        let result = match value {
            Some(value) => Layout::from_value(value),
            None => Err(LayoutError::Missing),
        };
        match result {
            Ok(layout) => {
                self.accept_layout(layout);
                Ok(())
            }
            Err(e) => {
                let raw = value
                    .and_then(|v| serde_json::to_string_pretty(v).ok())
                    .unwrap_or_else(|| "null".to_string());
                self.enter_error(e.to_string(), raw);
                Err(e)
            }
        }
    }

    /// Re-read the layout from the store.
    pub fn refresh(&mut self) {
        match self.store.layout() {
            Some(layout) => self.accept_layout(layout),
            None => {
                let message = self
                    .store
                    .last_error()
                    .unwrap_or_else(|| LayoutError::Missing.to_string());
                self.enter_error(message, "null".to_string());
            }
        }
    }

    fn accept_layout(&mut self, layout: Layout) {
        if matches!(self.status, SurfaceStatus::Error { .. }) {
            log::info!("Layout '{}' loaded, leaving error state", layout.name);
        }
        self.status = SurfaceStatus::Ready;
        let effects = self.editor.sync_with_layout(&layout);
        self.layout = Some(layout);
        self.apply(effects);
    }

    fn enter_error(&mut self, message: String, raw: String) {
        log::info!("Layout surface entering error state: {message}");
        self.status = SurfaceStatus::Error { message, raw };
        self.editor.cancel();
    }

    /// Dispatch a device-pixel pointer event. `surface_origin` is the device
    /// position of the surface's top-left corner.
    pub fn pointer(&mut self, event: PointerEvent, surface_origin: Point) {
        let Some(layout) = active_layout(&self.status, &self.layout) else {
            return;
        };
        let measure = self.measure.as_ref();
        let effects = match event {
            PointerEvent::Down { position } => {
                let point = self.camera.to_logical(position, surface_origin);
                self.editor.pointer_down(layout, point, measure)
            }
            PointerEvent::Move { position } => {
                let point = self.camera.to_logical(position, surface_origin);
                self.editor.pointer_move(layout, point, measure)
            }
            PointerEvent::Up { .. } => self.editor.pointer_up(layout),
            PointerEvent::Leave => self.editor.pointer_leave(layout),
        };
        self.apply(effects);
    }

    pub fn key(&mut self, key: EditorKey) {
        let Some(layout) = active_layout(&self.status, &self.layout) else {
            return;
        };
        let effects = self.editor.key(layout, key);
        self.apply(effects);
    }

    pub fn set_tool(&mut self, tool: ToolKind) {
        let effects = self.editor.set_tool(tool);
        self.apply(effects);
    }

    pub fn select(&mut self, id: Option<AreaId>) {
        if active_layout(&self.status, &self.layout).is_none() {
            return;
        }
        let effects = self.editor.select(id);
        self.apply(effects);
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.editor.set_read_only(read_only);
    }

    pub fn begin_text_edit(&mut self) -> bool {
        match active_layout(&self.status, &self.layout) {
            Some(layout) => self.editor.begin_text_edit(layout),
            None => false,
        }
    }

    pub fn set_text_align(&mut self, align: TextAlign) {
        self.editor.set_text_align(align);
    }

    pub fn confirm_text(&mut self) {
        let Some(layout) = active_layout(&self.status, &self.layout) else {
            return;
        };
        let effects = self.editor.confirm_text(layout);
        self.apply(effects);
    }

    pub fn cancel(&mut self) {
        self.editor.cancel();
    }

    /// Delete the selected area once `confirm` approves.
    pub fn delete_selected(&mut self, confirm: impl FnOnce(&str) -> bool) {
        let Some(layout) = active_layout(&self.status, &self.layout) else {
            return;
        };
        let effects = self.editor.delete_selected(layout, confirm);
        self.apply(effects);
    }

    /// Remove every area once `confirm` approves.
    pub fn clear_all(&mut self, confirm: impl FnOnce(&str) -> bool) {
        let Some(layout) = active_layout(&self.status, &self.layout) else {
            return;
        };
        let effects = self.editor.clear_all(layout, confirm);
        self.apply(effects);
    }

    pub fn zoom_in(&mut self) {
        self.camera.zoom_by(self.zoom_step);
    }

    pub fn zoom_out(&mut self) {
        self.camera.zoom_by(-self.zoom_step);
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.camera.set_zoom(zoom);
    }

    /// On-screen size of the drawing surface: logical canvas size times zoom.
    pub fn surface_size(&self) -> Size {
        let logical = self
            .layout
            .as_ref()
            .map(Layout::canvas_size)
            .unwrap_or_else(|| Size::new(Layout::FALLBACK_DIMENSION, Layout::FALLBACK_DIMENSION));
        self.camera.scaled_size(logical)
    }

    pub fn cursor_hint(&self, device: Point, surface_origin: Point) -> CursorHint {
        match active_layout(&self.status, &self.layout) {
            Some(layout) => {
                let point = self.camera.to_logical(device, surface_origin);
                self.editor.cursor_hint(layout, point, self.measure.as_ref())
            }
            None => CursorHint::default(),
        }
    }

    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Add(mut shape) => {
                    if shape.id().is_nil() {
                        shape.set_id(Uuid::new_v4());
                    }
                    log::debug!("Add {:?} '{}'", shape.kind(), shape.name());
                    if let Some(layout) = self.layout.as_mut() {
                        layout.areas.push(shape.clone());
                    }
                    self.store.add_area(shape);
                }
                Effect::Update(shape) => {
                    if let Some(layout) = self.layout.as_mut() {
                        layout.replace_area(shape.clone());
                    }
                    self.store.update_area(shape);
                }
                Effect::Delete(id) => {
                    log::debug!("Delete area {id}");
                    if let Some(layout) = self.layout.as_mut() {
                        layout.remove_area(id);
                    }
                    self.store.delete_area(id);
                }
                Effect::Clear => {
                    if let Some(layout) = self.layout.as_mut() {
                        layout.areas.clear();
                    }
                    self.store.clear_areas();
                }
                Effect::SelectionChanged(id) => {
                    if let Some(callback) = self.on_selection_changed.as_mut() {
                        callback(id);
                    }
                }
            }
        }
    }
}
