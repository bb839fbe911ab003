//! Keyboard shortcut registry and documentation.

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub shift: bool,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(key: &'static str, shift: bool, description: &'static str) -> Self {
        Self {
            key,
            shift,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Shift+Delete").
    pub fn format(&self) -> String {
        if self.shift {
            format!("Shift+{}", self.key)
        } else {
            self.key.to_string()
        }
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("R", false, "Rectangle tool"),
            Shortcut::new("C", false, "Circle tool"),
            Shortcut::new("L", false, "Line tool"),
            Shortcut::new("P", false, "Polygon tool"),
            Shortcut::new("T", false, "Text tool"),
            Shortcut::new("E", false, "Edit selected text"),
            Shortcut::new("+", false, "Zoom in"),
            Shortcut::new("-", false, "Zoom out"),
            Shortcut::new("G", false, "Cycle grid style"),
            Shortcut::new("Delete", false, "Delete selected area (press twice)"),
            Shortcut::new("Backspace", false, "Delete selected area (press twice)"),
            Shortcut::new("Delete", true, "Remove all areas (press twice)"),
            Shortcut::new("Escape", false, "Cancel current action"),
            Shortcut::new("Tab", false, "Cycle text alignment while editing"),
            Shortcut::new("Enter", false, "Confirm text while editing"),
        ]
    }

    /// Log all shortcuts.
    pub fn log_all() {
        log::info!("Keyboard shortcuts:");
        for shortcut in Self::all() {
            log::info!("  {:14} {}", shortcut.format(), shortcut.description);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format() {
        assert_eq!(Shortcut::new("Delete", true, "").format(), "Shift+Delete");
        assert_eq!(Shortcut::new("R", false, "").format(), "R");
    }

    #[test]
    fn test_every_tool_has_a_shortcut() {
        let all = ShortcutRegistry::all();
        for key in ["R", "C", "L", "P", "T"] {
            assert!(all.iter().any(|s| s.key == key && !s.shift), "missing {key}");
        }
    }
}
