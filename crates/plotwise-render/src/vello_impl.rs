//! Vello-based renderer implementation.

use crate::renderer::{GridStyle, Palette, RenderContext, Renderer};
use kurbo::{Affine, BezPath, Point, Rect, Shape as KurboShape, Size, Stroke, Vec2};
use parley::layout::PositionedLayoutItem;
use parley::{FontContext, LayoutContext, StyleProperty};
use peniko::{Brush, Color, Fill};
use plotwise_core::geometry::{ApproxTextMeasure, TextMeasure};
use plotwise_core::interaction::{InteractionState, TextTarget};
use plotwise_core::selection::{Handle, get_handles};
use plotwise_core::shapes::{Shape, Text, TextAlign};
use plotwise_core::{AreaState, Layout, SurfaceStatus};
use vello::Scene;

/// Font size of the name label drawn on areas.
const LABEL_FONT_SIZE: f64 = 12.0;
/// Name labels sit this far from the area origin.
const LABEL_OFFSET: Vec2 = Vec2::new(5.0, 15.0);
/// Dash pattern for previews and the polygon under construction.
const PREVIEW_DASH: [f64; 2] = [5.0, 3.0];
const PREVIEW_STROKE_WIDTH: f64 = 2.0;
const VERTEX_MARKER_RADIUS: f64 = 4.0;
const HANDLE_STROKE_WIDTH: f64 = 1.5;
const TEXT_OUTLINE_PADDING: f64 = 2.0;

const SCALE_BAR_LEFT: f64 = 20.0;
/// Distance of the scale bar from the bottom of the canvas.
const SCALE_BAR_BOTTOM: f64 = 30.0;
const SCALE_BAR_TICK: f64 = 10.0;
const SCALE_BAR_LABEL_DY: f64 = 25.0;
const SCALE_BAR_UNIT_DX: f64 = 30.0;

/// Vello-based renderer for GPU-accelerated 2D graphics.
pub struct VelloRenderer {
    /// The Vello scene being built.
    scene: Scene,
    palette: Palette,
    /// Font context for text rendering.
    font_cx: FontContext,
    /// Layout context for text rendering.
    layout_cx: LayoutContext<Brush>,
}

impl Default for VelloRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl VelloRenderer {
    /// Create a new Vello renderer using the system font collection.
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            palette: Palette::default(),
            font_cx: FontContext::new(),
            layout_cx: LayoutContext::new(),
        }
    }

    /// Get the built scene for rendering.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Draw `content` with its baseline at `anchor.y`, placed horizontally per
    /// `align`. Returns the drawn width.
    fn draw_text(
        &mut self,
        content: &str,
        anchor: Point,
        font_size: f64,
        align: TextAlign,
        color: Color,
        transform: Affine,
    ) -> f64 {
        let brush = Brush::Solid(color);

        let mut builder = self.layout_cx.ranged_builder(&mut self.font_cx, content, 1.0, false);
        builder.push_default(StyleProperty::FontSize(font_size as f32));
        builder.push_default(StyleProperty::Brush(brush.clone()));
        let mut layout = builder.build(content);
        layout.break_all_lines(None);
        layout.align(None, parley::Alignment::Start, parley::AlignmentOptions::default());

        let width = layout.width() as f64;
        let baseline = layout
            .lines()
            .next()
            .map(|line| line.metrics().baseline as f64)
            .unwrap_or(font_size * 0.8);
        let left = align.box_left(anchor.x, width);
        let text_transform = transform * Affine::translate((left, anchor.y - baseline));

        let mut glyph_count = 0;
        for line in layout.lines() {
            for item in line.items() {
                let PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                    continue;
                };
                let mut x = glyph_run.offset();
                let y = glyph_run.baseline();
                let run = glyph_run.run();
                let font = run.font();
                let run_font_size = run.font_size();
                let synthesis = run.synthesis();
                let glyph_xform = synthesis
                    .skew()
                    .map(|angle| Affine::skew(angle.to_radians().tan() as f64, 0.0));

                let glyphs: Vec<vello::Glyph> = glyph_run
                    .glyphs()
                    .map(|glyph| {
                        let gx = x + glyph.x;
                        let gy = y - glyph.y;
                        x += glyph.advance;
                        glyph_count += 1;
                        vello::Glyph {
                            id: glyph.id,
                            x: gx,
                            y: gy,
                        }
                    })
                    .collect();

                if !glyphs.is_empty() {
                    self.scene
                        .draw_glyphs(font)
                        .brush(&brush)
                        .hint(true)
                        .transform(text_transform)
                        .glyph_transform(glyph_xform)
                        .font_size(run_font_size)
                        .normalized_coords(run.normalized_coords())
                        .draw(Fill::NonZero, glyphs.into_iter());
                }
            }
        }

        if glyph_count > 0 {
            return width;
        }

        // No usable font: block out the text's footprint instead.
        let width = ApproxTextMeasure.measure(content, font_size);
        let left = align.box_left(anchor.x, width);
        let rect = Rect::new(left, anchor.y - font_size, left + width, anchor.y);
        self.scene
            .fill(Fill::NonZero, transform, Color::from_rgba8(0, 0, 0, 40), None, &rect);
        width
    }

    /// Grid over the canvas at the unit's spacing.
    fn render_grid(&mut self, canvas: Size, spacing: f64, style: GridStyle, transform: Affine) {
        if spacing <= 0.0 {
            return;
        }
        match style {
            GridStyle::None => {}
            GridStyle::Lines => {
                let stroke = Stroke::new(0.5);
                let grid_color = self.palette.grid;

                let mut x = 0.0;
                while x < canvas.width {
                    let mut path = BezPath::new();
                    path.move_to(Point::new(x, 0.0));
                    path.line_to(Point::new(x, canvas.height));
                    self.scene.stroke(&stroke, transform, grid_color, None, &path);
                    x += spacing;
                }

                let mut y = 0.0;
                while y < canvas.height {
                    let mut path = BezPath::new();
                    path.move_to(Point::new(0.0, y));
                    path.line_to(Point::new(canvas.width, y));
                    self.scene.stroke(&stroke, transform, grid_color, None, &path);
                    y += spacing;
                }
            }
            GridStyle::Dots => {
                let dot_size = 1.5;
                // Batch all dots into a single path
                let mut path = BezPath::new();
                let mut x = 0.0;
                while x < canvas.width {
                    let mut y = 0.0;
                    while y < canvas.height {
                        let rect = Rect::new(x - dot_size, y - dot_size, x + dot_size, y + dot_size);
                        path.extend(rect.path_elements(0.1));
                        y += spacing;
                    }
                    x += spacing;
                }
                self.scene
                    .fill(Fill::NonZero, transform, self.palette.grid, None, &path);
            }
        }
    }

    /// Scale bar in the bottom-left corner of the canvas.
    fn render_scale_bar(&mut self, layout: &Layout, transform: Affine) {
        let unit = layout.unit;
        let length = unit.scale_bar_length();
        let segments = plotwise_core::Unit::SCALE_BAR_SEGMENTS;
        let segment = length / segments as f64;
        let start = Point::new(SCALE_BAR_LEFT, layout.canvas_size().height - SCALE_BAR_BOTTOM);
        let color = self.palette.scale_bar;
        let stroke = Stroke::new(1.0);

        let mut ticks = BezPath::new();
        for i in 0..=segments {
            let x = start.x + i as f64 * segment;
            ticks.move_to(Point::new(x, start.y));
            ticks.line_to(Point::new(x, start.y + SCALE_BAR_TICK));
        }
        ticks.move_to(Point::new(start.x, start.y + SCALE_BAR_TICK / 2.0));
        ticks.line_to(Point::new(start.x + length, start.y + SCALE_BAR_TICK / 2.0));
        self.scene.stroke(&stroke, transform, color, None, &ticks);

        for i in 0..=segments {
            let x = start.x + i as f64 * segment;
            self.draw_text(
                &unit.scale_bar_label(i),
                Point::new(x, start.y + SCALE_BAR_LABEL_DY),
                LABEL_FONT_SIZE,
                TextAlign::Center,
                color,
                transform,
            );
        }
        self.draw_text(
            unit.name(),
            Point::new(start.x + length + SCALE_BAR_UNIT_DX, start.y + SCALE_BAR_LABEL_DY),
            LABEL_FONT_SIZE,
            TextAlign::Center,
            color,
            transform,
        );
    }

    /// Draw one committed area in its display state.
    fn render_area(&mut self, shape: &Shape, state: AreaState, transform: Affine) {
        let style = self.palette.area(state);
        let stroke = Stroke::new(style.stroke_width);

        match shape {
            Shape::Rectangle(rect) => {
                let r = rect.as_rect();
                self.scene.fill(Fill::NonZero, transform, style.fill, None, &r);
                self.scene.stroke(&stroke, transform, style.stroke, None, &r);
            }
            Shape::Circle(circle) => {
                let c = circle.as_kurbo();
                self.scene.fill(Fill::NonZero, transform, style.fill, None, &c);
                self.scene.stroke(&stroke, transform, style.stroke, None, &c);
            }
            Shape::Line(line) => {
                self.scene
                    .stroke(&stroke, transform, style.stroke, None, &line.as_kurbo());
            }
            Shape::Polygon(polygon) => {
                let path = polygon.to_path();
                self.scene.fill(Fill::NonZero, transform, style.fill, None, &path);
                self.scene.stroke(&stroke, transform, style.stroke, None, &path);
            }
            Shape::Text(text) => self.render_text_area(text, state, transform),
        }

        if shape.shows_name_label() {
            self.draw_text(
                shape.name(),
                shape.origin() + LABEL_OFFSET,
                LABEL_FONT_SIZE,
                TextAlign::Left,
                self.palette.label,
                transform,
            );
        }
    }

    fn render_text_area(&mut self, text: &Text, state: AreaState, transform: Affine) {
        let width = self.draw_text(
            &text.content,
            text.position,
            text.font_size,
            text.text_align,
            self.palette.label,
            transform,
        );
        if state == AreaState::Normal {
            return;
        }

        let style = self.palette.area(state);
        let left = text.text_align.box_left(text.position.x, width);
        let outline = Rect::new(
            left,
            text.position.y - text.font_size,
            left + width,
            text.position.y,
        )
        .inflate(TEXT_OUTLINE_PADDING, TEXT_OUTLINE_PADDING);
        self.scene
            .stroke(&Stroke::new(style.stroke_width), transform, style.stroke, None, &outline);
    }

    /// Resize handles, or vertex handles for polygons.
    fn render_handles(&mut self, shape: &Shape, transform: Affine) {
        for handle in get_handles(shape) {
            self.render_handle(&handle, transform);
        }
    }

    /// Render a single handle: white square with a selection-colored border.
    fn render_handle(&mut self, handle: &Handle, transform: Affine) {
        let half = handle.size() / 2.0;
        let pos = handle.position;
        let rect = Rect::new(pos.x - half, pos.y - half, pos.x + half, pos.y + half);

        self.scene.fill(Fill::NonZero, transform, Color::WHITE, None, &rect);
        self.scene.stroke(
            &Stroke::new(HANDLE_STROKE_WIDTH),
            transform,
            self.palette.selected.stroke,
            None,
            &rect,
        );
    }

    /// Dashed outline through the placed vertices, a rubber band to the
    /// pointer and a marker on every vertex.
    fn render_polygon_builder(&mut self, vertices: &[Point], current: Option<Point>, transform: Affine) {
        let Some((&first, rest)) = vertices.split_first() else {
            return;
        };
        let color = self.palette.in_progress;
        let stroke = Stroke::new(PREVIEW_STROKE_WIDTH).with_dashes(0.0, PREVIEW_DASH);

        let mut path = BezPath::new();
        path.move_to(first);
        for &p in rest {
            path.line_to(p);
        }
        if let Some(pointer) = current {
            path.line_to(pointer);
        }
        self.scene.stroke(&stroke, transform, color, None, &path);

        for &vertex in vertices {
            let marker = kurbo::Circle::new(vertex, VERTEX_MARKER_RADIUS);
            self.scene.fill(Fill::NonZero, transform, Color::WHITE, None, &marker);
            self.scene
                .stroke(&Stroke::new(1.0), transform, color, None, &marker);
        }
    }

    /// Dashed outline of the area a drag gesture would create.
    fn render_preview(&mut self, shape: &Shape, transform: Affine) {
        let stroke = Stroke::new(PREVIEW_STROKE_WIDTH).with_dashes(0.0, PREVIEW_DASH);
        let color = self.palette.in_progress;
        match shape {
            Shape::Rectangle(rect) => self.scene.stroke(&stroke, transform, color, None, &rect.as_rect()),
            Shape::Circle(circle) => self.scene.stroke(&stroke, transform, color, None, &circle.as_kurbo()),
            Shape::Line(line) => self.scene.stroke(&stroke, transform, color, None, &line.as_kurbo()),
            Shape::Polygon(_) | Shape::Text(_) => {}
        }
    }

    /// Text being typed, with a caret after the last character.
    fn render_pending_text(&mut self, anchor: Point, buffer: &str, font_size: f64, align: TextAlign, transform: Affine) {
        let color = self.palette.in_progress;
        let width = if buffer.is_empty() {
            0.0
        } else {
            self.draw_text(buffer, anchor, font_size, align, color, transform)
        };
        let caret_x = align.box_left(anchor.x, width) + width;
        let caret = kurbo::Line::new(
            Point::new(caret_x, anchor.y - font_size),
            Point::new(caret_x, anchor.y),
        );
        self.scene.stroke(&Stroke::new(1.5), transform, color, None, &caret);
    }

    /// Full-frame panel shown when the layout could not be loaded.
    fn render_error_panel(&mut self, message: &str, raw: &str, viewport: Size) {
        let panel = Rect::new(16.0, 16.0, viewport.width - 16.0, viewport.height - 16.0);
        if panel.width() <= 0.0 || panel.height() <= 0.0 {
            return;
        }
        let border = Color::from_rgba8(220, 38, 38, 255);
        self.scene.fill(
            Fill::NonZero,
            Affine::IDENTITY,
            Color::from_rgba8(254, 242, 242, 255),
            None,
            &panel.to_rounded_rect(6.0),
        );
        self.scene.stroke(
            &Stroke::new(1.0),
            Affine::IDENTITY,
            border,
            None,
            &panel.to_rounded_rect(6.0),
        );

        let left = panel.x0 + 16.0;
        self.draw_text(
            "Error loading layout",
            Point::new(left, panel.y0 + 32.0),
            18.0,
            TextAlign::Left,
            border,
            Affine::IDENTITY,
        );
        self.draw_text(
            message,
            Point::new(left, panel.y0 + 58.0),
            14.0,
            TextAlign::Left,
            Color::from_rgba8(127, 29, 29, 255),
            Affine::IDENTITY,
        );

        let line_height = 16.0;
        let mut y = panel.y0 + 90.0;
        for line in raw.lines() {
            if y > panel.y1 - 8.0 {
                break;
            }
            self.draw_text(
                line,
                Point::new(left, y),
                12.0,
                TextAlign::Left,
                Color::from_rgba8(55, 65, 81, 255),
                Affine::IDENTITY,
            );
            y += line_height;
        }
    }
}

impl Renderer for VelloRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) {
        // Clear the scene
        self.scene.reset();
        self.palette = ctx.palette.clone();

        if let SurfaceStatus::Error { message, raw } = ctx.status {
            self.render_error_panel(message, raw, ctx.viewport_size);
            return;
        }
        let Some(layout) = ctx.layout else {
            return;
        };

        let transform = Affine::scale(ctx.zoom);
        let canvas = layout.canvas_size();
        self.scene
            .fill(Fill::NonZero, transform, Color::WHITE, None, &canvas.to_rect());
        self.render_grid(canvas, layout.unit.grid_spacing(), ctx.grid_style, transform);
        self.render_scale_bar(layout, transform);

        let editor = ctx.editor;
        // The text being edited is drawn from the edit buffer instead.
        let editing = match editor.state() {
            InteractionState::EditingText {
                target: TextTarget::Existing(id),
                ..
            } => Some(*id),
            _ => None,
        };

        for shape in &layout.areas {
            if editing == Some(shape.id()) {
                continue;
            }
            if let Err(e) = shape.validate() {
                log::warn!("Skipping area '{}' ({}): {e}", shape.name(), shape.id());
                continue;
            }
            if shape.is_degenerate() {
                continue;
            }
            let state = editor.area_state(shape.id());
            self.render_area(shape, state, transform);
            if state == AreaState::Selected {
                self.render_handles(shape, transform);
            }
        }

        match editor.state() {
            InteractionState::BuildingPolygon { vertices, current } => {
                self.render_polygon_builder(vertices, *current, transform);
            }
            InteractionState::Drawing { tool, start, current } => {
                if let Some(preview) = tool.preview_shape(*start, *current) {
                    self.render_preview(&preview, transform);
                }
            }
            InteractionState::EditingText { target, buffer, align } => {
                let anchor = match target {
                    TextTarget::New(point) => Some((*point, Text::DEFAULT_FONT_SIZE)),
                    TextTarget::Existing(id) => match layout.get_area(*id) {
                        Some(Shape::Text(text)) => Some((text.position, text.font_size)),
                        _ => None,
                    },
                };
                if let Some((point, font_size)) = anchor {
                    self.render_pending_text(point, buffer, font_size, *align, transform);
                }
            }
            InteractionState::Idle
            | InteractionState::Dragging { .. }
            | InteractionState::Resizing { .. }
            | InteractionState::DraggingVertex { .. } => {}
        }
    }
}
