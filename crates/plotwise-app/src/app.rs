//! Core application state and lifecycle.

use crate::config::AppConfig;
use crate::event_handler::{Command, EventHandler, cursor_icon};
use crate::shortcuts::ShortcutRegistry;
use kurbo::{Point, Size};
use plotwise_core::{
    EditorKey, FileLayoutStore, Layout, LayoutStore, LayoutSurface, MemoryLayoutStore,
    PointerEvent, Unit,
};
use plotwise_render::{ParleyTextMeasure, RenderContext, Renderer, RendererError, VelloRenderer};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use vello::util::RenderSurface;
use vello::wgpu::PresentMode;
use vello::{AaConfig, RenderParams, RendererOptions};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowId};

/// Surface over whichever store the configuration selects.
type EditorSurface = LayoutSurface<Box<dyn LayoutStore>>;

/// The drawing surface sits at the window's top-left corner.
const SURFACE_ORIGIN: Point = Point::ZERO;

/// Runtime state that exists once the window is up.
struct AppState {
    // Windowing
    window: Arc<Window>,
    surface: RenderSurface<'static>,

    // Rendering
    vello_renderer: vello::Renderer,
    shape_renderer: VelloRenderer,
    /// Texture blitter for RGBA->surface format conversion
    texture_blitter: vello::wgpu::util::TextureBlitter,

    event_handler: EventHandler,
    /// Last cursor position in window pixels.
    cursor: Point,
}

/// Main application struct.
pub struct App {
    config: AppConfig,
    layout_surface: EditorSurface,
    state: Option<AppState>,
    render_cx: Option<vello::util::RenderContext>,
    /// Store error already reported to the log.
    reported_store_error: Option<String>,
}

impl App {
    /// Create an application from the discovered configuration.
    pub fn new() -> Self {
        Self::with_config(AppConfig::discover())
    }

    /// Create a new application with custom configuration.
    pub fn with_config(config: AppConfig) -> Self {
        let layout_surface = open_surface(&config);
        Self {
            config,
            layout_surface,
            state: None,
            render_cx: None,
            reported_store_error: None,
        }
    }

    /// Run the application.
    pub async fn run() {
        let event_loop = EventLoop::new().expect("Failed to create event loop");
        let mut app = App::new();
        event_loop.run_app(&mut app).expect("Event loop error");
    }

    /// Finish initialization after surface is created.
    fn finish_init(
        &mut self,
        window: Arc<Window>,
        surface: RenderSurface<'static>,
    ) -> Result<(), RendererError> {
        let render_cx = self
            .render_cx
            .as_ref()
            .ok_or_else(|| RendererError::InitFailed("RenderContext not initialized".to_string()))?;
        let device = &render_cx.devices[surface.dev_id].device;

        let vello_renderer = vello::Renderer::new(device, RendererOptions::default())
            .map_err(|e| RendererError::InitFailed(format!("{e:?}")))?;

        // Vello renders to Rgba8Unorm; the surface format may differ.
        let texture_blitter = vello::wgpu::util::TextureBlitter::new(device, surface.config.format);

        log::info!("Plotwise initialized - {}x{}", surface.config.width, surface.config.height);
        ShortcutRegistry::log_all();

        self.state = Some(AppState {
            window: window.clone(),
            surface,
            vello_renderer,
            shape_renderer: VelloRenderer::new(),
            texture_blitter,
            event_handler: EventHandler::new(),
            cursor: Point::ZERO,
        });

        window.request_redraw();
        Ok(())
    }

    fn create_surface(&mut self, window: Arc<Window>) -> Result<RenderSurface<'static>, RendererError> {
        let size = window.inner_size();
        let (width, height) = if size.width == 0 || size.height == 0 {
            (self.config.width, self.config.height)
        } else {
            (size.width, size.height)
        };
        log::info!("Surface size: {}x{}", width, height);

        let render_cx = self.render_cx.get_or_insert_with(vello::util::RenderContext::new);
        pollster::block_on(render_cx.create_surface(window, width, height, PresentMode::AutoVsync))
            .map_err(|e| RendererError::Surface(format!("{e:?}")))
    }

    fn handle_command(&mut self, command: Command) {
        let Some(state) = &mut self.state else {
            return;
        };
        if !matches!(command, Command::DeleteSelected | Command::ClearAll) {
            state.event_handler.confirm.reset();
        }

        let surface = &mut self.layout_surface;
        match command {
            Command::Tool(tool) => {
                surface.set_tool(tool);
                log::debug!("Tool: {:?}", tool);
            }
            Command::ZoomIn => {
                surface.zoom_in();
                log::debug!("Zoom: {:.1}", surface.camera().zoom);
            }
            Command::ZoomOut => {
                surface.zoom_out();
                log::debug!("Zoom: {:.1}", surface.camera().zoom);
            }
            Command::CycleGrid => {
                self.config.grid_style = self.config.grid_style.next();
                log::info!("Grid: {}", self.config.grid_style.name());
            }
            Command::DeleteSelected => {
                let gate = &mut state.event_handler.confirm;
                surface.delete_selected(|prompt| gate.confirm(prompt));
            }
            Command::ClearAll => {
                let gate = &mut state.event_handler.confirm;
                surface.clear_all(|prompt| gate.confirm(prompt));
            }
            Command::EditText => {
                if !surface.begin_text_edit() {
                    log::debug!("No text area selected");
                }
            }
            Command::Editor(key) => surface.key(key),
            Command::Type(text) => {
                for c in text.chars() {
                    surface.key(EditorKey::Character(c));
                }
            }
        }

        if let Some(message) = newly_failed(&mut self.reported_store_error, surface.store_error()) {
            log::warn!("Layout store: {message}");
        }
        state.window.request_redraw();
    }

    fn render(&mut self) {
        let Some(state) = &mut self.state else {
            return;
        };
        let Some(render_cx) = self.render_cx.as_ref() else {
            return;
        };

        let device_handle = &render_cx.devices[state.surface.dev_id];
        let device = &device_handle.device;
        let queue = &device_handle.queue;

        let surface_texture = match state.surface.surface.get_current_texture() {
            Ok(t) => t,
            Err(e) => {
                log::warn!("Failed to get surface texture: {:?}", e);
                return;
            }
        };

        let width = state.surface.config.width;
        let height = state.surface.config.height;

        let ctx = RenderContext::from_surface(&self.layout_surface, Size::new(width as f64, height as f64))
            .with_background(self.config.background_color())
            .with_grid(self.config.grid_style);
        state.shape_renderer.build_scene(&ctx);

        let params = RenderParams {
            base_color: state.shape_renderer.background_color(&ctx),
            width,
            height,
            antialiasing_method: AaConfig::Area,
        };

        // Vello's compute shaders need a StorageBinding Rgba8Unorm target.
        let render_texture = device.create_texture(&vello::wgpu::TextureDescriptor {
            label: Some("vello render texture"),
            size: vello::wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: vello::wgpu::TextureDimension::D2,
            format: vello::wgpu::TextureFormat::Rgba8Unorm,
            usage: vello::wgpu::TextureUsages::STORAGE_BINDING
                | vello::wgpu::TextureUsages::COPY_SRC
                | vello::wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let render_texture_view =
            render_texture.create_view(&vello::wgpu::TextureViewDescriptor::default());

        if let Err(e) = state.vello_renderer.render_to_texture(
            device,
            queue,
            state.shape_renderer.scene(),
            &render_texture_view,
            &params,
        ) {
            log::error!("Failed to render: {:?}", e);
            return;
        }

        let surface_view = surface_texture
            .texture
            .create_view(&vello::wgpu::TextureViewDescriptor::default());

        let mut blit_encoder = device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
            label: Some("blit encoder"),
        });
        state
            .texture_blitter
            .copy(device, &mut blit_encoder, &render_texture_view, &surface_view);
        queue.submit(std::iter::once(blit_encoder.finish()));

        surface_texture.present();
    }

    fn pointer(&mut self, event: PointerEvent) {
        let Some(state) = &mut self.state else {
            return;
        };
        if matches!(event, PointerEvent::Down { .. }) {
            state.event_handler.confirm.reset();
        }
        self.layout_surface.pointer(event, SURFACE_ORIGIN);

        let hint = self.layout_surface.cursor_hint(state.cursor, SURFACE_ORIGIN);
        state.window.set_cursor(cursor_icon(hint));
        state.window.request_redraw();
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        log::info!("Creating window...");

        let window_attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .expect("Failed to create window"),
        );

        log::info!("Window created, initializing renderer...");

        let result = self
            .create_surface(window.clone())
            .and_then(|surface| self.finish_init(window, surface));
        if let Err(e) = result {
            log::error!("{e}");
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(state) = &mut self.state else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if size.width == 0 || size.height == 0 {
                    return;
                }
                if let Some(render_cx) = self.render_cx.as_mut() {
                    render_cx.resize_surface(&mut state.surface, size.width, size.height);
                }
                state.window.request_redraw();
            }

            WindowEvent::RedrawRequested => self.render(),

            WindowEvent::CursorMoved { position, .. } => {
                let position = Point::new(position.x, position.y);
                state.cursor = position;
                self.pointer(PointerEvent::Move { position });
            }

            WindowEvent::CursorLeft { .. } => self.pointer(PointerEvent::Leave),

            WindowEvent::MouseInput {
                state: btn_state,
                button: MouseButton::Left,
                ..
            } => {
                let position = state.cursor;
                match btn_state {
                    ElementState::Pressed => self.pointer(PointerEvent::Down { position }),
                    ElementState::Released => self.pointer(PointerEvent::Up { position }),
                }
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                state.event_handler.set_shift(modifiers.state().shift_key());
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed {
                    return;
                }
                let editing_text = self.layout_surface.editor().text_edit().is_some();
                if let Some(command) = state.event_handler.command(&event.logical_key, editing_text) {
                    self.handle_command(command);
                }
            }

            _ => {}
        }
    }
}

/// Build the layout surface for the configured store.
///
/// With a `layout_path` the file is loaded leniently and edits are written back
/// to it; a file that does not exist yet starts from a blank layout. Without
/// one, a blank layout is edited in memory.
fn open_surface(config: &AppConfig) -> EditorSurface {
    let Some(path) = &config.layout_path else {
        let store = MemoryLayoutStore::with_layout(blank_layout());
        return build_surface(Box::new(store), config, None);
    };

    if !path.exists() {
        log::info!("{} does not exist yet, starting a new layout", path.display());
        let store = FileLayoutStore::new(path, Some(blank_layout()));
        return build_surface(Box::new(store), config, None);
    }

    let raw = read_layout_value(path);
    let layout = raw.as_ref().and_then(|value| Layout::from_value(value).ok());
    let store = FileLayoutStore::new(path, layout);
    build_surface(Box::new(store), config, Some(raw))
}

fn build_surface(store: Box<dyn LayoutStore>, config: &AppConfig, raw: Option<Option<Value>>) -> EditorSurface {
    let mut surface =
        LayoutSurface::new(store, &config.surface).with_text_measure(Box::new(ParleyTextMeasure::new()));
    surface.on_selection_changed(|id| log::debug!("Selection changed: {:?}", id));

    match raw {
        Some(raw) => {
            if let Err(e) = surface.load_value(raw.as_ref()) {
                log::error!("Failed to load layout: {e}");
            }
        }
        None => surface.refresh(),
    }
    if let Some(layout) = surface.layout() {
        log::info!("Editing layout '{}' with {} areas", layout.name, layout.len());
    }
    surface
}

/// Read a layout file as JSON. Text that is not JSON is kept as a string so
/// the error panel can show it.
fn read_layout_value(path: &Path) -> Option<Value> {
    match std::fs::read_to_string(path) {
        Ok(text) => Some(serde_json::from_str(&text).unwrap_or(Value::String(text))),
        Err(e) => {
            log::error!("Failed to read {}: {e}", path.display());
            None
        }
    }
}

/// `current` if it differs from the error last reported, remembering it.
fn newly_failed(reported: &mut Option<String>, current: Option<String>) -> Option<String> {
    if *reported == current {
        return None;
    }
    *reported = current.clone();
    current
}

fn blank_layout() -> Layout {
    Layout::new("Untitled layout", 10.0, 10.0, Unit::Meters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use plotwise_core::SurfaceStatus;

    fn config_with_path(path: &Path) -> AppConfig {
        AppConfig {
            layout_path: Some(path.to_path_buf()),
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_store_error_reported_once() {
        let mut reported = None;
        assert_eq!(newly_failed(&mut reported, None), None);
        assert_eq!(newly_failed(&mut reported, Some("disk full".to_string())).as_deref(), Some("disk full"));
        assert_eq!(newly_failed(&mut reported, Some("disk full".to_string())), None);
        assert_eq!(newly_failed(&mut reported, None), None);
        assert_eq!(newly_failed(&mut reported, Some("disk full".to_string())).as_deref(), Some("disk full"));
    }

    #[test]
    fn test_memory_surface_by_default() {
        let surface = open_surface(&AppConfig::default());
        assert_eq!(surface.status(), &SurfaceStatus::Ready);
        assert_eq!(surface.layout().map(Layout::len), Some(0));
    }

    #[test]
    fn test_file_surface_loads_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garden.json");
        std::fs::write(
            &path,
            r#"{ "name": "Garden", "width": 5, "height": 4, "unit": "meters",
                 "areas": [{ "type": "circle", "id": "6f1c1d2e-5b1a-4c55-9d7e-2f0e3a4b5c6d",
                             "name": "Pond", "x": 100, "y": 100, "radius": 40 }] }"#,
        )
        .unwrap();

        let surface = open_surface(&config_with_path(&path));
        assert_eq!(surface.status(), &SurfaceStatus::Ready);
        let layout = surface.layout().unwrap();
        assert_eq!(layout.name, "Garden");
        assert_eq!(layout.len(), 1);
    }

    #[test]
    fn test_file_surface_shows_bad_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garden.json");
        std::fs::write(&path, "not a layout").unwrap();

        let surface = open_surface(&config_with_path(&path));
        match surface.status() {
            SurfaceStatus::Error { raw, .. } => assert!(raw.contains("not a layout")),
            SurfaceStatus::Ready => panic!("expected error state"),
        }
    }

    #[test]
    fn test_missing_file_starts_blank() {
        let dir = tempfile::tempdir().unwrap();
        let surface = open_surface(&config_with_path(&dir.path().join("new.json")));
        assert_eq!(surface.status(), &SurfaceStatus::Ready);
        assert_eq!(surface.layout().map(|l| l.name.as_str()), Some("Untitled layout"));
    }
}
