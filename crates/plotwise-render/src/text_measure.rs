//! Text measurement backed by the same font stack the renderer draws with.

use parley::{FontContext, LayoutContext, StyleProperty};
use peniko::Brush;
use plotwise_core::geometry::{ApproxTextMeasure, TextMeasure};
use std::cell::RefCell;

struct Contexts {
    font_cx: FontContext,
    layout_cx: LayoutContext<Brush>,
}

/// Measures text with parley so hit testing matches what is drawn.
/// Falls back to [`ApproxTextMeasure`] when no font produces glyphs.
pub struct ParleyTextMeasure {
    contexts: RefCell<Contexts>,
}

impl Default for ParleyTextMeasure {
    fn default() -> Self {
        Self::new()
    }
}

impl ParleyTextMeasure {
    pub fn new() -> Self {
        Self {
            contexts: RefCell::new(Contexts {
                font_cx: FontContext::new(),
                layout_cx: LayoutContext::new(),
            }),
        }
    }
}

impl TextMeasure for ParleyTextMeasure {
    fn measure(&self, content: &str, font_size: f64) -> f64 {
        if content.is_empty() {
            return 0.0;
        }
        let Ok(mut contexts) = self.contexts.try_borrow_mut() else {
            return ApproxTextMeasure.measure(content, font_size);
        };
        let Contexts { font_cx, layout_cx } = &mut *contexts;

        let mut builder = layout_cx.ranged_builder(font_cx, content, 1.0, false);
        builder.push_default(StyleProperty::FontSize(font_size as f32));
        let mut layout = builder.build(content);
        layout.break_all_lines(None);

        let width = layout.width() as f64;
        if width > 0.0 {
            width
        } else {
            ApproxTextMeasure.measure(content, font_size)
        }
    }
}
