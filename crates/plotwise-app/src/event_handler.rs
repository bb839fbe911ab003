//! Translates window input into editor commands.

use plotwise_core::{CursorHint, Corner, EditorKey, ToolKind};
use winit::keyboard::{Key, NamedKey};
use winit::window::CursorIcon;

/// What a key press asks the application to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Tool(ToolKind),
    ZoomIn,
    ZoomOut,
    /// Switch to the next grid style.
    CycleGrid,
    DeleteSelected,
    ClearAll,
    EditText,
    /// Key handled by the editor itself (cancel and text editing).
    Editor(EditorKey),
    /// Typed text while editing a text area.
    Type(String),
}

/// Two-press confirmation for destructive commands.
///
/// The first request with a given prompt arms the gate and is refused; the
/// same prompt again confirms. Any other input should call [`reset`](Self::reset).
#[derive(Debug, Default)]
pub struct ConfirmGate {
    armed: Option<String>,
}

impl ConfirmGate {
    pub fn confirm(&mut self, prompt: &str) -> bool {
        if self.armed.as_deref() == Some(prompt) {
            self.armed = None;
            return true;
        }
        log::warn!("{prompt} Press again to confirm.");
        self.armed = Some(prompt.to_string());
        false
    }

    pub fn reset(&mut self) {
        self.armed = None;
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }
}

/// Keyboard state and the confirmation gate.
#[derive(Debug, Default)]
pub struct EventHandler {
    shift: bool,
    pub confirm: ConfirmGate,
}

impl EventHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_shift(&mut self, shift: bool) {
        self.shift = shift;
    }

    /// Map a pressed key to a command. `editing_text` routes printable keys to
    /// the text buffer instead of the tool shortcuts.
    pub fn command(&self, key: &Key, editing_text: bool) -> Option<Command> {
        if let Key::Named(NamedKey::Escape) = key {
            return Some(Command::Editor(EditorKey::Escape));
        }

        if editing_text {
            return match key {
                Key::Named(NamedKey::Enter) => Some(Command::Editor(EditorKey::Enter)),
                Key::Named(NamedKey::Backspace) => Some(Command::Editor(EditorKey::Backspace)),
                Key::Named(NamedKey::Tab) => Some(Command::Editor(EditorKey::Tab)),
                Key::Named(NamedKey::Space) => Some(Command::Type(" ".to_string())),
                Key::Character(text) => Some(Command::Type(text.to_string())),
                _ => None,
            };
        }

        match key {
            Key::Named(NamedKey::Delete) if self.shift => Some(Command::ClearAll),
            Key::Named(NamedKey::Delete | NamedKey::Backspace) => Some(Command::DeleteSelected),
            Key::Character(c) => match c.to_lowercase().as_str() {
                "r" => Some(Command::Tool(ToolKind::Rectangle)),
                "c" => Some(Command::Tool(ToolKind::Circle)),
                "l" => Some(Command::Tool(ToolKind::Line)),
                "p" => Some(Command::Tool(ToolKind::Polygon)),
                "t" => Some(Command::Tool(ToolKind::Text)),
                "e" => Some(Command::EditText),
                "g" => Some(Command::CycleGrid),
                "=" | "+" => Some(Command::ZoomIn),
                "-" => Some(Command::ZoomOut),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Window cursor for an editor cursor hint.
pub fn cursor_icon(hint: CursorHint) -> CursorIcon {
    match hint {
        CursorHint::Crosshair | CursorHint::ClosePolygon => CursorIcon::Crosshair,
        CursorHint::Move => CursorIcon::Move,
        CursorHint::Grabbing => CursorIcon::Grabbing,
        CursorHint::Pointer => CursorIcon::Pointer,
        CursorHint::Resize(Corner::TopLeft) => CursorIcon::NwResize,
        CursorHint::Resize(Corner::TopRight) => CursorIcon::NeResize,
        CursorHint::Resize(Corner::BottomLeft) => CursorIcon::SwResize,
        CursorHint::Resize(Corner::BottomRight) => CursorIcon::SeResize,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn char_key(s: &str) -> Key {
        Key::Character(s.into())
    }

    #[test]
    fn test_tool_shortcuts() {
        let handler = EventHandler::new();
        assert_eq!(handler.command(&char_key("r"), false), Some(Command::Tool(ToolKind::Rectangle)));
        assert_eq!(handler.command(&char_key("C"), false), Some(Command::Tool(ToolKind::Circle)));
        assert_eq!(handler.command(&char_key("p"), false), Some(Command::Tool(ToolKind::Polygon)));
        assert_eq!(handler.command(&char_key("+"), false), Some(Command::ZoomIn));
        assert_eq!(handler.command(&char_key("-"), false), Some(Command::ZoomOut));
        assert_eq!(handler.command(&char_key("g"), false), Some(Command::CycleGrid));
        assert_eq!(handler.command(&char_key("x"), false), None);
    }

    #[test]
    fn test_delete_and_clear() {
        let mut handler = EventHandler::new();
        let delete = Key::Named(NamedKey::Delete);
        assert_eq!(handler.command(&delete, false), Some(Command::DeleteSelected));
        assert_eq!(
            handler.command(&Key::Named(NamedKey::Backspace), false),
            Some(Command::DeleteSelected)
        );

        handler.set_shift(true);
        assert_eq!(handler.command(&delete, false), Some(Command::ClearAll));
    }

    #[test]
    fn test_text_editing_keys() {
        let handler = EventHandler::new();
        assert_eq!(handler.command(&char_key("r"), true), Some(Command::Type("r".to_string())));
        assert_eq!(handler.command(&Key::Named(NamedKey::Space), true), Some(Command::Type(" ".to_string())));
        assert_eq!(
            handler.command(&Key::Named(NamedKey::Backspace), true),
            Some(Command::Editor(EditorKey::Backspace))
        );
        assert_eq!(handler.command(&Key::Named(NamedKey::Tab), true), Some(Command::Editor(EditorKey::Tab)));
        assert_eq!(
            handler.command(&Key::Named(NamedKey::Escape), true),
            Some(Command::Editor(EditorKey::Escape))
        );
    }

    #[test]
    fn test_confirm_gate_needs_two_presses() {
        let mut gate = ConfirmGate::default();
        assert!(!gate.confirm("Delete \"Bed\"?"));
        assert!(gate.is_armed());
        assert!(gate.confirm("Delete \"Bed\"?"));
        assert!(!gate.is_armed());
    }

    #[test]
    fn test_confirm_gate_other_prompt_rearms() {
        let mut gate = ConfirmGate::default();
        assert!(!gate.confirm("Delete \"Bed\"?"));
        assert!(!gate.confirm("Remove all 3 areas?"));
        gate.reset();
        assert!(!gate.confirm("Remove all 3 areas?"));
    }

    #[test]
    fn test_cursor_icons() {
        assert_eq!(cursor_icon(CursorHint::Move), CursorIcon::Move);
        assert_eq!(cursor_icon(CursorHint::Resize(Corner::TopRight)), CursorIcon::NeResize);
        assert_eq!(cursor_icon(CursorHint::ClosePolygon), CursorIcon::Crosshair);
    }
}
