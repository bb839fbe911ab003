//! Interaction state machine.
//!
//! [`Editor`] consumes pointer and keyboard input expressed in logical units
//! and answers with [`Effect`]s: committed mutations for the layout store and
//! selection changes for the host. It never touches the layout itself, so every
//! transition can be exercised without a drawing surface.

use crate::geometry::{MIN_DRAW_EXTENT, POLYGON_CLOSE_DISTANCE, TextMeasure};
use crate::input::{CursorHint, EditorKey};
use crate::layout::Layout;
use crate::selection::{Corner, apply_drag, apply_resize, hit_test_resize_handle, hit_test_vertex};
use crate::shapes::{AreaId, Polygon, Shape, ShapeKind, Text, TextAlign};
use crate::tools::ToolKind;
use kurbo::{Point, Vec2};

/// Where a text edit will land once confirmed.
#[derive(Debug, Clone, PartialEq)]
pub enum TextTarget {
    /// A new label anchored at this point.
    New(Point),
    /// An existing text area.
    Existing(AreaId),
}

/// The single active gesture, if any.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    /// Press-drag-release with a rectangle, circle or line tool.
    Drawing {
        tool: ToolKind,
        start: Point,
        current: Point,
    },
    /// Moving a whole area. `grab_offset` is pointer minus area origin at press.
    Dragging { id: AreaId, grab_offset: Vec2 },
    Resizing { id: AreaId, corner: Corner },
    DraggingVertex { id: AreaId, index: usize },
    /// Collecting polygon vertices. `current` tracks the pointer for the rubber band.
    BuildingPolygon {
        vertices: Vec<Point>,
        current: Option<Point>,
    },
    EditingText {
        target: TextTarget,
        buffer: String,
        align: TextAlign,
    },
}

/// Output of a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Create an area. Its id is nil until the store assigns one.
    Add(Shape),
    Update(Shape),
    Delete(AreaId),
    Clear,
    SelectionChanged(Option<AreaId>),
}

/// Display state of one area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AreaState {
    #[default]
    Normal,
    Hovered,
    Selected,
}

/// Editing session: current tool, selection, hover and the active gesture.
#[derive(Debug, Clone, Default)]
pub struct Editor {
    state: InteractionState,
    tool: ToolKind,
    selected: Option<AreaId>,
    hovered: Option<AreaId>,
    read_only: bool,
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn selected(&self) -> Option<AreaId> {
        self.selected
    }

    pub fn hovered(&self) -> Option<AreaId> {
        self.hovered
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Toggle read-only mode. Entering it abandons any gesture in progress.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
        if read_only {
            self.state = InteractionState::Idle;
        }
    }

    pub fn area_state(&self, id: AreaId) -> AreaState {
        if self.selected == Some(id) {
            AreaState::Selected
        } else if self.hovered == Some(id) {
            AreaState::Hovered
        } else {
            AreaState::Normal
        }
    }

    /// Current text buffer and alignment while editing text.
    pub fn text_edit(&self) -> Option<(&str, TextAlign)> {
        match &self.state {
            InteractionState::EditingText { buffer, align, .. } => Some((buffer.as_str(), *align)),
            _ => None,
        }
    }

    /// Set the selection directly (e.g. from a list outside the canvas).
    pub fn select(&mut self, id: Option<AreaId>) -> Vec<Effect> {
        self.set_selected(id).into_iter().collect()
    }

    fn set_selected(&mut self, id: Option<AreaId>) -> Option<Effect> {
        if self.selected == id {
            return None;
        }
        self.selected = id;
        Some(Effect::SelectionChanged(id))
    }

    /// Switch tools. Any drawing, polygon or text gesture is abandoned.
    pub fn set_tool(&mut self, tool: ToolKind) -> Vec<Effect> {
        if matches!(
            self.state,
            InteractionState::Drawing { .. }
                | InteractionState::BuildingPolygon { .. }
                | InteractionState::EditingText { .. }
        ) {
            log::debug!("Tool change cancels {:?}", self.state);
            self.state = InteractionState::Idle;
        }
        self.tool = tool;

        let mut effects = Vec::new();
        if tool.clears_selection() {
            effects.extend(self.set_selected(None));
        }
        effects
    }

    pub fn pointer_down(&mut self, layout: &Layout, point: Point, measure: &dyn TextMeasure) -> Vec<Effect> {
        match &mut self.state {
            InteractionState::BuildingPolygon { vertices, current } => {
                let closes = vertices.len() >= Polygon::MIN_VERTICES
                    && point.distance(vertices[0]) < POLYGON_CLOSE_DISTANCE;
                if !closes {
                    vertices.push(point);
                    *current = Some(point);
                    return Vec::new();
                }
                let vertices = std::mem::take(vertices);
                self.state = InteractionState::Idle;
                log::debug!("Polygon closed with {} vertices", vertices.len());
                let mut shape = Shape::Polygon(Polygon::new(vertices));
                shape.set_name(ShapeKind::Polygon.default_name(layout.len()));
                return vec![Effect::Add(shape)];
            }
            InteractionState::EditingText { .. } => {
                // Clicking away abandons the pending label; the text tool re-anchors it below.
                self.state = InteractionState::Idle;
            }
            InteractionState::Idle => {}
            _ => {
                // A release was lost; treat this press as a fresh gesture.
                self.state = InteractionState::Idle;
            }
        }

        if self.read_only {
            let hit = layout.hit_test(point, measure).map(Shape::id);
            return self.set_selected(hit).into_iter().collect();
        }

        match self.tool {
            ToolKind::Polygon => {
                self.state = InteractionState::BuildingPolygon {
                    vertices: vec![point],
                    current: Some(point),
                };
                return Vec::new();
            }
            ToolKind::Text => {
                self.state = InteractionState::EditingText {
                    target: TextTarget::New(point),
                    buffer: String::new(),
                    align: TextAlign::default(),
                };
                return self.set_selected(None).into_iter().collect();
            }
            _ => {}
        }

        if let Some(selected) = self.selected.and_then(|id| layout.get_area(id)) {
            if let Some(corner) = hit_test_resize_handle(selected, point) {
                self.state = InteractionState::Resizing {
                    id: selected.id(),
                    corner,
                };
                return Vec::new();
            }
            if let Shape::Polygon(polygon) = selected {
                if let Some(index) = hit_test_vertex(polygon, point) {
                    self.state = InteractionState::DraggingVertex {
                        id: polygon.id,
                        index,
                    };
                    return Vec::new();
                }
            }
        }

        if let Some(shape) = layout.hit_test(point, measure) {
            let id = shape.id();
            self.state = InteractionState::Dragging {
                id,
                grab_offset: point - shape.origin(),
            };
            return self.set_selected(Some(id)).into_iter().collect();
        }

        let effects = self.set_selected(None).into_iter().collect();
        if self.tool.is_drag_tool() {
            self.state = InteractionState::Drawing {
                tool: self.tool,
                start: point,
                current: point,
            };
        }
        effects
    }

    pub fn pointer_move(&mut self, layout: &Layout, point: Point, measure: &dyn TextMeasure) -> Vec<Effect> {
        match &mut self.state {
            InteractionState::Idle => {
                self.hovered = layout.hit_test(point, measure).map(Shape::id);
                Vec::new()
            }
            InteractionState::Drawing { current, .. } => {
                *current = point;
                Vec::new()
            }
            InteractionState::BuildingPolygon { current, .. } => {
                *current = Some(point);
                Vec::new()
            }
            InteractionState::EditingText { .. } => Vec::new(),
            InteractionState::Dragging { id, grab_offset } => {
                let Some(shape) = layout.get_area(*id) else {
                    self.state = InteractionState::Idle;
                    return Vec::new();
                };
                let moved = apply_drag(shape, point, *grab_offset, layout.canvas_size());
                if &moved == shape {
                    Vec::new()
                } else {
                    vec![Effect::Update(moved)]
                }
            }
            InteractionState::DraggingVertex { id, index } => {
                let Some(Shape::Polygon(polygon)) = layout.get_area(*id) else {
                    self.state = InteractionState::Idle;
                    return Vec::new();
                };
                let mut polygon = polygon.clone();
                if polygon.move_vertex(*index, point) {
                    vec![Effect::Update(Shape::Polygon(polygon))]
                } else {
                    Vec::new()
                }
            }
            InteractionState::Resizing { id, corner } => {
                let Some(shape) = layout.get_area(*id) else {
                    self.state = InteractionState::Idle;
                    return Vec::new();
                };
                match apply_resize(shape, *corner, point) {
                    Some(resized) => vec![Effect::Update(resized)],
                    None => {
                        log::debug!("Resize to {point:?} rejected below minimum size");
                        Vec::new()
                    }
                }
            }
        }
    }

    /// Release ends drawing, dragging, resizing and vertex dragging.
    /// Polygon building and text editing ignore it.
    pub fn pointer_up(&mut self, layout: &Layout) -> Vec<Effect> {
        match std::mem::take(&mut self.state) {
            InteractionState::Drawing { tool, start, current } => {
                let width = (current.x - start.x).abs();
                let height = (current.y - start.y).abs();
                if width <= MIN_DRAW_EXTENT && height <= MIN_DRAW_EXTENT {
                    log::debug!("Discarding {width}x{height} draw gesture");
                    return Vec::new();
                }
                let Some(mut shape) = tool.preview_shape(start, current) else {
                    return Vec::new();
                };
                shape.set_name(tool.shape_kind().default_name(layout.len()));
                vec![Effect::Add(shape)]
            }
            InteractionState::Dragging { .. }
            | InteractionState::Resizing { .. }
            | InteractionState::DraggingVertex { .. }
            | InteractionState::Idle => Vec::new(),
            state @ (InteractionState::BuildingPolygon { .. } | InteractionState::EditingText { .. }) => {
                self.state = state;
                Vec::new()
            }
        }
    }

    /// Pointer leaving the surface ends gestures like a release.
    pub fn pointer_leave(&mut self, layout: &Layout) -> Vec<Effect> {
        self.hovered = None;
        self.pointer_up(layout)
    }

    pub fn key(&mut self, layout: &Layout, key: EditorKey) -> Vec<Effect> {
        if key == EditorKey::Escape {
            self.cancel();
            return Vec::new();
        }
        let InteractionState::EditingText { buffer, align, .. } = &mut self.state else {
            return Vec::new();
        };
        match key {
            EditorKey::Character(c) if !c.is_control() => buffer.push(c),
            EditorKey::Backspace => {
                buffer.pop();
            }
            EditorKey::Tab => *align = align.next(),
            EditorKey::Enter => return self.confirm_text(layout),
            _ => {}
        }
        Vec::new()
    }

    /// Abandon polygon building, drawing or text editing.
    pub fn cancel(&mut self) {
        if matches!(
            self.state,
            InteractionState::BuildingPolygon { .. }
                | InteractionState::Drawing { .. }
                | InteractionState::EditingText { .. }
        ) {
            log::debug!("Cancelled {:?}", self.state);
            self.state = InteractionState::Idle;
        }
    }

    /// Start editing the selected text area. Returns false when nothing editable is selected.
    pub fn begin_text_edit(&mut self, layout: &Layout) -> bool {
        if self.read_only {
            return false;
        }
        let Some(Shape::Text(text)) = self.selected.and_then(|id| layout.get_area(id)) else {
            return false;
        };
        self.state = InteractionState::EditingText {
            target: TextTarget::Existing(text.id),
            buffer: text.content.clone(),
            align: text.text_align,
        };
        true
    }

    pub fn set_text_align(&mut self, new_align: TextAlign) {
        if let InteractionState::EditingText { align, .. } = &mut self.state {
            *align = new_align;
        }
    }

    pub fn set_text_buffer(&mut self, text: impl Into<String>) {
        if let InteractionState::EditingText { buffer, .. } = &mut self.state {
            *buffer = text.into();
        }
    }

    /// Commit the pending text. Blank input is ignored and editing continues.
    pub fn confirm_text(&mut self, layout: &Layout) -> Vec<Effect> {
        let InteractionState::EditingText { target, buffer, align } = &self.state else {
            return Vec::new();
        };
        if buffer.trim().is_empty() {
            return Vec::new();
        }
        let effect = match target {
            TextTarget::New(anchor) => {
                let text = Text::new(*anchor, buffer.clone())
                    .with_align(*align)
                    .with_name(ShapeKind::Text.default_name(layout.len()));
                Some(Effect::Add(Shape::Text(text)))
            }
            TextTarget::Existing(id) => match layout.get_area(*id) {
                Some(Shape::Text(existing)) => {
                    let mut text = existing.clone();
                    text.content = buffer.clone();
                    text.text_align = *align;
                    Some(Effect::Update(Shape::Text(text)))
                }
                _ => None,
            },
        };
        self.state = InteractionState::Idle;
        effect.into_iter().collect()
    }

    /// Delete the selected area after `confirm` approves the prompt.
    pub fn delete_selected(&mut self, layout: &Layout, confirm: impl FnOnce(&str) -> bool) -> Vec<Effect> {
        if self.read_only {
            return Vec::new();
        }
        let Some(shape) = self.selected.and_then(|id| layout.get_area(id)) else {
            return Vec::new();
        };
        let id = shape.id();
        if !confirm(&format!("Delete \"{}\"?", shape.name())) {
            return Vec::new();
        }
        self.forget(id);
        vec![Effect::Delete(id), Effect::SelectionChanged(None)]
    }

    /// Remove every area after `confirm` approves the prompt.
    pub fn clear_all(&mut self, layout: &Layout, confirm: impl FnOnce(&str) -> bool) -> Vec<Effect> {
        if self.read_only || layout.is_empty() {
            return Vec::new();
        }
        if !confirm(&format!("Remove all {} areas?", layout.len())) {
            return Vec::new();
        }
        self.selected = None;
        self.hovered = None;
        if !matches!(
            self.state,
            InteractionState::BuildingPolygon { .. } | InteractionState::EditingText { target: TextTarget::New(_), .. }
        ) {
            self.state = InteractionState::Idle;
        }
        vec![Effect::Clear, Effect::SelectionChanged(None)]
    }

    /// Drop references to areas that are gone after a layout refresh.
    pub fn sync_with_layout(&mut self, layout: &Layout) -> Vec<Effect> {
        if self.hovered.is_some_and(|id| layout.get_area(id).is_none()) {
            self.hovered = None;
        }
        let target = match &self.state {
            InteractionState::Dragging { id, .. }
            | InteractionState::Resizing { id, .. }
            | InteractionState::DraggingVertex { id, .. }
            | InteractionState::EditingText { target: TextTarget::Existing(id), .. } => Some(*id),
            _ => None,
        };
        if target.is_some_and(|id| layout.get_area(id).is_none()) {
            self.state = InteractionState::Idle;
        }
        match self.selected {
            Some(id) if layout.get_area(id).is_none() => self.set_selected(None).into_iter().collect(),
            _ => Vec::new(),
        }
    }

    fn forget(&mut self, id: AreaId) {
        if self.selected == Some(id) {
            self.selected = None;
        }
        if self.hovered == Some(id) {
            self.hovered = None;
        }
        let busy_with = match &self.state {
            InteractionState::Dragging { id, .. }
            | InteractionState::Resizing { id, .. }
            | InteractionState::DraggingVertex { id, .. }
            | InteractionState::EditingText { target: TextTarget::Existing(id), .. } => Some(*id),
            _ => None,
        };
        if busy_with == Some(id) {
            self.state = InteractionState::Idle;
        }
    }

    /// Cursor to show with the pointer at `point`.
    pub fn cursor_hint(&self, layout: &Layout, point: Point, measure: &dyn TextMeasure) -> CursorHint {
        match &self.state {
            InteractionState::Dragging { .. } => return CursorHint::Grabbing,
            InteractionState::Resizing { corner, .. } => return CursorHint::Resize(*corner),
            InteractionState::DraggingVertex { .. } => return CursorHint::Pointer,
            InteractionState::BuildingPolygon { vertices, .. } => {
                let closes = vertices.len() >= Polygon::MIN_VERTICES
                    && point.distance(vertices[0]) < POLYGON_CLOSE_DISTANCE;
                return if closes {
                    CursorHint::ClosePolygon
                } else {
                    CursorHint::Crosshair
                };
            }
            _ => {}
        }

        if !self.read_only {
            if let Some(selected) = self.selected.and_then(|id| layout.get_area(id)) {
                if let Some(corner) = hit_test_resize_handle(selected, point) {
                    return CursorHint::Resize(corner);
                }
                if let Shape::Polygon(polygon) = selected {
                    if hit_test_vertex(polygon, point).is_some() {
                        return CursorHint::Pointer;
                    }
                }
            }
        }

        if layout.hit_test(point, measure).is_some() {
            if self.read_only {
                CursorHint::Pointer
            } else {
                CursorHint::Move
            }
        } else {
            CursorHint::Crosshair
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::ApproxTextMeasure;
    use crate::layout::Unit;
    use crate::shapes::{Circle, Rectangle};
    use uuid::Uuid;

    const M: ApproxTextMeasure = ApproxTextMeasure;

    fn layout_with(shapes: Vec<Shape>) -> Layout {
        let mut layout = Layout::new("Nursery", 10.0, 10.0, Unit::Meters);
        for mut shape in shapes {
            shape.set_id(Uuid::new_v4());
            layout.areas.push(shape);
        }
        layout
    }

    fn apply(layout: &mut Layout, effects: &[Effect]) {
        for effect in effects {
            match effect {
                Effect::Add(shape) => {
                    let mut shape = shape.clone();
                    shape.set_id(Uuid::new_v4());
                    layout.areas.push(shape);
                }
                Effect::Update(shape) => {
                    layout.replace_area(shape.clone());
                }
                Effect::Delete(id) => {
                    layout.remove_area(*id);
                }
                Effect::Clear => layout.areas.clear(),
                Effect::SelectionChanged(_) => {}
            }
        }
    }

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn test_draw_rectangle_scenario() {
        let layout = layout_with(Vec::new());
        let mut editor = Editor::new();
        editor.set_tool(ToolKind::Rectangle);

        assert!(editor.pointer_down(&layout, p(10.0, 10.0), &M).is_empty());
        editor.pointer_move(&layout, p(110.0, 60.0), &M);
        let effects = editor.pointer_up(&layout);

        assert_eq!(effects.len(), 1);
        let Effect::Add(Shape::Rectangle(rect)) = &effects[0] else {
            panic!("expected a rectangle, got {effects:?}");
        };
        assert_eq!(rect.position, p(10.0, 10.0));
        assert!((rect.width - 100.0).abs() < f64::EPSILON);
        assert!((rect.height - 50.0).abs() < f64::EPSILON);
        assert_eq!(rect.name, "Rectangle 1");
        assert_eq!(editor.state(), &InteractionState::Idle);
    }

    #[test]
    fn test_small_draw_is_discarded() {
        let layout = layout_with(Vec::new());
        let mut editor = Editor::new();
        editor.set_tool(ToolKind::Circle);
        editor.pointer_down(&layout, p(10.0, 10.0), &M);
        editor.pointer_move(&layout, p(20.0, 20.0), &M);
        assert!(editor.pointer_up(&layout).is_empty());
        assert_eq!(editor.state(), &InteractionState::Idle);
    }

    #[test]
    fn test_draw_line_named_after_count() {
        let layout = layout_with(vec![Shape::Rectangle(Rectangle::new(p(500.0, 500.0), 20.0, 20.0))]);
        let mut editor = Editor::new();
        editor.set_tool(ToolKind::Line);
        editor.pointer_down(&layout, p(0.0, 0.0), &M);
        editor.pointer_move(&layout, p(0.0, 40.0), &M);
        let effects = editor.pointer_up(&layout);
        let [Effect::Add(Shape::Line(line))] = effects.as_slice() else {
            panic!("expected a line, got {effects:?}");
        };
        assert_eq!(line.name, "Line 2");
        assert_eq!(line.end(), p(0.0, 40.0));
    }

    #[test]
    fn test_polygon_close_scenario() {
        let layout = layout_with(Vec::new());
        let mut editor = Editor::new();
        editor.set_tool(ToolKind::Polygon);

        for point in [p(0.0, 0.0), p(50.0, 0.0), p(50.0, 50.0)] {
            assert!(editor.pointer_down(&layout, point, &M).is_empty());
            editor.pointer_up(&layout);
        }
        let effects = editor.pointer_down(&layout, p(5.0, 5.0), &M);

        let [Effect::Add(Shape::Polygon(polygon))] = effects.as_slice() else {
            panic!("expected a polygon, got {effects:?}");
        };
        assert_eq!(polygon.points, vec![p(0.0, 0.0), p(50.0, 0.0), p(50.0, 50.0)]);
        assert_eq!(polygon.position, p(0.0, 0.0));
        assert_eq!(polygon.name, "Polygon 1");
        assert_eq!(editor.state(), &InteractionState::Idle);
    }

    #[test]
    fn test_polygon_close_with_four_vertices() {
        let layout = layout_with(Vec::new());
        let mut editor = Editor::new();
        editor.set_tool(ToolKind::Polygon);
        for point in [p(0.0, 0.0), p(100.0, 0.0), p(100.0, 100.0)] {
            editor.pointer_down(&layout, point, &M);
        }

        // 21 units from the first vertex: appended, still building.
        assert!(editor.pointer_down(&layout, p(0.0, 21.0), &M).is_empty());
        let InteractionState::BuildingPolygon { vertices, .. } = editor.state() else {
            panic!("expected polygon building");
        };
        assert_eq!(vertices.len(), 4);

        let effects = editor.pointer_down(&layout, p(3.0, 3.0), &M);
        let [Effect::Add(Shape::Polygon(polygon))] = effects.as_slice() else {
            panic!("expected a polygon, got {effects:?}");
        };
        assert_eq!(polygon.points.len(), 4);
    }

    #[test]
    fn test_polygon_needs_three_points_to_close() {
        let layout = layout_with(Vec::new());
        let mut editor = Editor::new();
        editor.set_tool(ToolKind::Polygon);
        editor.pointer_down(&layout, p(0.0, 0.0), &M);
        editor.pointer_down(&layout, p(50.0, 0.0), &M);
        assert!(editor.pointer_down(&layout, p(2.0, 2.0), &M).is_empty());
        let InteractionState::BuildingPolygon { vertices, .. } = editor.state() else {
            panic!("expected polygon building");
        };
        assert_eq!(vertices.len(), 3);
    }

    #[test]
    fn test_escape_discards_polygon() {
        let layout = layout_with(Vec::new());
        let mut editor = Editor::new();
        editor.set_tool(ToolKind::Polygon);
        editor.pointer_down(&layout, p(0.0, 0.0), &M);
        editor.pointer_down(&layout, p(50.0, 0.0), &M);
        editor.key(&layout, EditorKey::Escape);
        assert_eq!(editor.state(), &InteractionState::Idle);
    }

    #[test]
    fn test_tool_change_cancels_gesture() {
        let layout = layout_with(Vec::new());
        let mut editor = Editor::new();
        editor.set_tool(ToolKind::Polygon);
        editor.pointer_down(&layout, p(0.0, 0.0), &M);
        editor.set_tool(ToolKind::Rectangle);
        assert_eq!(editor.state(), &InteractionState::Idle);

        editor.pointer_down(&layout, p(0.0, 0.0), &M);
        assert!(matches!(editor.state(), InteractionState::Drawing { .. }));
        editor.set_tool(ToolKind::Circle);
        assert_eq!(editor.state(), &InteractionState::Idle);
    }

    #[test]
    fn test_click_selects_topmost_and_starts_drag() {
        let layout = layout_with(vec![
            Shape::Rectangle(Rectangle::new(p(0.0, 0.0), 100.0, 100.0)),
            Shape::Circle(Circle::new(p(50.0, 50.0), 20.0)),
        ]);
        let top = layout.areas[1].id();
        let mut editor = Editor::new();

        let effects = editor.pointer_down(&layout, p(55.0, 50.0), &M);
        assert_eq!(effects, vec![Effect::SelectionChanged(Some(top))]);
        assert_eq!(
            editor.state(),
            &InteractionState::Dragging {
                id: top,
                grab_offset: Vec2::new(5.0, 0.0)
            }
        );
        assert_eq!(editor.area_state(top), AreaState::Selected);
    }

    #[test]
    fn test_drag_pushes_update_every_move() {
        let mut layout = layout_with(vec![Shape::Rectangle(Rectangle::new(p(100.0, 100.0), 50.0, 50.0))]);
        let id = layout.areas[0].id();
        let mut editor = Editor::new();
        editor.pointer_down(&layout, p(110.0, 110.0), &M);

        let effects = editor.pointer_move(&layout, p(120.0, 130.0), &M);
        assert_eq!(effects.len(), 1);
        apply(&mut layout, &effects);
        let effects = editor.pointer_move(&layout, p(140.0, 150.0), &M);
        assert_eq!(effects.len(), 1);
        apply(&mut layout, &effects);

        assert_eq!(layout.get_area(id).map(Shape::origin), Some(p(130.0, 140.0)));
        editor.pointer_up(&layout);
        assert_eq!(editor.state(), &InteractionState::Idle);
    }

    #[test]
    fn test_drag_polygon_translates_vertices() {
        let mut layout = layout_with(vec![Shape::Polygon(Polygon::new(vec![
            p(100.0, 100.0),
            p(200.0, 100.0),
            p(150.0, 200.0),
        ]))]);
        let id = layout.areas[0].id();
        let mut editor = Editor::new();
        editor.pointer_down(&layout, p(150.0, 150.0), &M);
        let effects = editor.pointer_move(&layout, p(170.0, 140.0), &M);
        apply(&mut layout, &effects);

        let Some(Shape::Polygon(polygon)) = layout.get_area(id) else {
            panic!("polygon missing");
        };
        assert_eq!(polygon.points, vec![p(120.0, 90.0), p(220.0, 90.0), p(170.0, 190.0)]);
        assert_eq!(polygon.position, polygon.points[0]);
    }

    #[test]
    fn test_resize_se_handle() {
        let mut layout = layout_with(vec![Shape::Rectangle(Rectangle::new(p(100.0, 100.0), 50.0, 50.0))]);
        let id = layout.areas[0].id();
        let mut editor = Editor::new();
        editor.select(Some(id));

        editor.pointer_down(&layout, p(151.0, 149.0), &M);
        assert_eq!(
            editor.state(),
            &InteractionState::Resizing {
                id,
                corner: Corner::BottomRight
            }
        );

        let effects = editor.pointer_move(&layout, p(230.0, 180.0), &M);
        apply(&mut layout, &effects);
        let Some(Shape::Rectangle(rect)) = layout.get_area(id) else {
            panic!("rectangle missing");
        };
        assert!((rect.width - 130.0).abs() < f64::EPSILON);
        assert!((rect.height - 80.0).abs() < f64::EPSILON);

        // Too small: rejected, shape unchanged.
        assert!(editor.pointer_move(&layout, p(105.0, 180.0), &M).is_empty());
    }

    #[test]
    fn test_vertex_drag_moves_anchor() {
        let mut layout = layout_with(vec![Shape::Polygon(Polygon::new(vec![
            p(0.0, 0.0),
            p(100.0, 0.0),
            p(100.0, 100.0),
        ]))]);
        let id = layout.areas[0].id();
        let mut editor = Editor::new();
        editor.select(Some(id));
        editor.pointer_down(&layout, p(2.0, 1.0), &M);
        assert_eq!(editor.state(), &InteractionState::DraggingVertex { id, index: 0 });

        let effects = editor.pointer_move(&layout, p(-20.0, 10.0), &M);
        apply(&mut layout, &effects);
        let Some(Shape::Polygon(polygon)) = layout.get_area(id) else {
            panic!("polygon missing");
        };
        assert_eq!(polygon.points[0], p(-20.0, 10.0));
        assert_eq!(polygon.position, p(-20.0, 10.0));
        editor.pointer_leave(&layout);
        assert_eq!(editor.state(), &InteractionState::Idle);
    }

    #[test]
    fn test_empty_click_clears_selection() {
        let layout = layout_with(vec![Shape::Rectangle(Rectangle::new(p(0.0, 0.0), 50.0, 50.0))]);
        let id = layout.areas[0].id();
        let mut editor = Editor::new();
        editor.select(Some(id));
        editor.set_tool(ToolKind::Line);
        let effects = editor.pointer_down(&layout, p(300.0, 300.0), &M);
        assert_eq!(effects, vec![Effect::SelectionChanged(None)]);
        assert!(matches!(editor.state(), InteractionState::Drawing { tool: ToolKind::Line, .. }));
    }

    #[test]
    fn test_hover_tracks_topmost() {
        let layout = layout_with(vec![
            Shape::Rectangle(Rectangle::new(p(0.0, 0.0), 100.0, 100.0)),
            Shape::Rectangle(Rectangle::new(p(50.0, 50.0), 100.0, 100.0)),
        ]);
        let top = layout.areas[1].id();
        let mut editor = Editor::new();
        editor.pointer_move(&layout, p(75.0, 75.0), &M);
        assert_eq!(editor.hovered(), Some(top));
        assert_eq!(editor.area_state(top), AreaState::Hovered);
        editor.pointer_move(&layout, p(500.0, 500.0), &M);
        assert_eq!(editor.hovered(), None);
    }

    #[test]
    fn test_read_only_selects_but_never_mutates() {
        let layout = layout_with(vec![Shape::Rectangle(Rectangle::new(p(0.0, 0.0), 100.0, 100.0))]);
        let id = layout.areas[0].id();
        let mut editor = Editor::new();
        editor.set_read_only(true);

        let effects = editor.pointer_down(&layout, p(10.0, 10.0), &M);
        assert_eq!(effects, vec![Effect::SelectionChanged(Some(id))]);
        assert_eq!(editor.state(), &InteractionState::Idle);
        assert!(editor.pointer_move(&layout, p(40.0, 40.0), &M).is_empty());
        assert_eq!(editor.hovered(), Some(id));

        editor.pointer_down(&layout, p(500.0, 500.0), &M);
        assert_eq!(editor.state(), &InteractionState::Idle);
        assert!(editor.delete_selected(&layout, |_| true).is_empty());

        editor.set_tool(ToolKind::Polygon);
        editor.pointer_down(&layout, p(500.0, 500.0), &M);
        assert_eq!(editor.state(), &InteractionState::Idle);
    }

    #[test]
    fn test_text_tool_confirm() {
        let layout = layout_with(Vec::new());
        let mut editor = Editor::new();
        editor.set_tool(ToolKind::Text);
        editor.pointer_down(&layout, p(40.0, 60.0), &M);
        assert!(editor.text_edit().is_some());

        // Blank input keeps the prompt open.
        editor.key(&layout, EditorKey::Character(' '));
        assert!(editor.key(&layout, EditorKey::Enter).is_empty());
        assert!(editor.text_edit().is_some());

        editor.set_text_buffer("Roses");
        editor.key(&layout, EditorKey::Tab);
        let effects = editor.key(&layout, EditorKey::Enter);
        let [Effect::Add(Shape::Text(text))] = effects.as_slice() else {
            panic!("expected a text, got {effects:?}");
        };
        assert_eq!(text.content, "Roses");
        assert_eq!(text.text_align, TextAlign::Center);
        assert_eq!(text.position, p(40.0, 60.0));
        assert!((text.font_size - 16.0).abs() < f64::EPSILON);
        assert_eq!(text.name, "Text 1");
        assert_eq!(editor.state(), &InteractionState::Idle);
    }

    #[test]
    fn test_text_cancel() {
        let layout = layout_with(Vec::new());
        let mut editor = Editor::new();
        editor.set_tool(ToolKind::Text);
        editor.pointer_down(&layout, p(40.0, 60.0), &M);
        editor.key(&layout, EditorKey::Character('a'));
        editor.key(&layout, EditorKey::Escape);
        assert_eq!(editor.state(), &InteractionState::Idle);
    }

    #[test]
    fn test_edit_existing_text() {
        let layout = layout_with(vec![Shape::Text(Text::new(p(10.0, 30.0), "Herbs"))]);
        let id = layout.areas[0].id();
        let mut editor = Editor::new();
        editor.select(Some(id));
        assert!(editor.begin_text_edit(&layout));
        assert_eq!(editor.text_edit(), Some(("Herbs", TextAlign::Left)));

        editor.key(&layout, EditorKey::Backspace);
        editor.key(&layout, EditorKey::Character('!'));
        editor.set_text_align(TextAlign::Right);
        let effects = editor.confirm_text(&layout);
        let [Effect::Update(Shape::Text(text))] = effects.as_slice() else {
            panic!("expected an update, got {effects:?}");
        };
        assert_eq!(text.id, id);
        assert_eq!(text.content, "Herb!");
        assert_eq!(text.text_align, TextAlign::Right);
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let layout = layout_with(vec![Shape::Rectangle(Rectangle::new(p(0.0, 0.0), 50.0, 50.0).with_name("Bed"))]);
        let id = layout.areas[0].id();
        let mut editor = Editor::new();
        assert!(editor.delete_selected(&layout, |_| true).is_empty());

        editor.select(Some(id));
        let mut prompt = String::new();
        assert!(editor
            .delete_selected(&layout, |msg| {
                prompt = msg.to_string();
                false
            })
            .is_empty());
        assert!(prompt.contains("Bed"));
        assert_eq!(editor.selected(), Some(id));

        let effects = editor.delete_selected(&layout, |_| true);
        assert_eq!(effects, vec![Effect::Delete(id), Effect::SelectionChanged(None)]);
        assert_eq!(editor.selected(), None);
    }

    #[test]
    fn test_clear_all() {
        let empty = layout_with(Vec::new());
        let mut editor = Editor::new();
        assert!(editor.clear_all(&empty, |_| true).is_empty());

        let layout = layout_with(vec![Shape::Circle(Circle::new(p(50.0, 50.0), 10.0))]);
        assert!(editor.clear_all(&layout, |_| false).is_empty());
        assert_eq!(
            editor.clear_all(&layout, |_| true),
            vec![Effect::Clear, Effect::SelectionChanged(None)]
        );
    }

    #[test]
    fn test_polygon_tool_clears_selection() {
        let layout = layout_with(vec![Shape::Circle(Circle::new(p(50.0, 50.0), 10.0))]);
        let id = layout.areas[0].id();
        let mut editor = Editor::new();
        editor.select(Some(id));
        assert_eq!(editor.set_tool(ToolKind::Polygon), vec![Effect::SelectionChanged(None)]);
        editor.select(Some(id));
        assert!(editor.set_tool(ToolKind::Line).is_empty());
        assert_eq!(editor.selected(), Some(id));
    }

    #[test]
    fn test_sync_with_layout_drops_missing_selection() {
        let layout = layout_with(vec![Shape::Circle(Circle::new(p(50.0, 50.0), 10.0))]);
        let id = layout.areas[0].id();
        let mut editor = Editor::new();
        editor.pointer_down(&layout, p(50.0, 50.0), &M);
        assert_eq!(editor.selected(), Some(id));

        let empty = layout_with(Vec::new());
        assert_eq!(editor.sync_with_layout(&empty), vec![Effect::SelectionChanged(None)]);
        assert_eq!(editor.state(), &InteractionState::Idle);
    }

    #[test]
    fn test_cursor_hints() {
        let layout = layout_with(vec![Shape::Rectangle(Rectangle::new(p(100.0, 100.0), 50.0, 50.0))]);
        let id = layout.areas[0].id();
        let mut editor = Editor::new();
        assert_eq!(editor.cursor_hint(&layout, p(10.0, 10.0), &M), CursorHint::Crosshair);
        assert_eq!(editor.cursor_hint(&layout, p(120.0, 120.0), &M), CursorHint::Move);

        editor.select(Some(id));
        assert_eq!(
            editor.cursor_hint(&layout, p(100.0, 100.0), &M),
            CursorHint::Resize(Corner::TopLeft)
        );

        editor.pointer_down(&layout, p(120.0, 120.0), &M);
        assert_eq!(editor.cursor_hint(&layout, p(120.0, 120.0), &M), CursorHint::Grabbing);
        editor.pointer_up(&layout);

        editor.set_tool(ToolKind::Polygon);
        for point in [p(300.0, 300.0), p(400.0, 300.0), p(400.0, 400.0)] {
            editor.pointer_down(&layout, point, &M);
        }
        assert_eq!(editor.cursor_hint(&layout, p(305.0, 305.0), &M), CursorHint::ClosePolygon);
        assert_eq!(editor.cursor_hint(&layout, p(350.0, 390.0), &M), CursorHint::Crosshair);
    }
}
