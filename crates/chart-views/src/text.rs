//! Text measurement used by chart layout

use egui::{Color32, Context, FontId, Vec2};

/// Measures the extent of a single line of text
pub trait TextMeasure {
    fn measure(&self, text: &str, size: f32) -> Vec2;
}

/// Measures with the fonts loaded into an egui context
pub struct EguiTextMeasure<'a> {
    ctx: &'a Context,
}

impl<'a> EguiTextMeasure<'a> {
    pub fn new(ctx: &'a Context) -> Self {
        Self { ctx }
    }
}

impl TextMeasure for EguiTextMeasure<'_> {
    fn measure(&self, text: &str, size: f32) -> Vec2 {
        self.ctx.fonts(|fonts| {
            fonts
                .layout_no_wrap(text.to_owned(), FontId::proportional(size), Color32::WHITE)
                .size()
        })
    }
}

/// Fixed per-character advance; `width = chars * size * advance`, `height = size`
#[derive(Debug, Clone, Copy)]
pub struct AdvanceMeasure {
    pub advance: f32,
}

impl Default for AdvanceMeasure {
    fn default() -> Self {
        Self { advance: 0.5 }
    }
}

impl TextMeasure for AdvanceMeasure {
    fn measure(&self, text: &str, size: f32) -> Vec2 {
        Vec2::new(text.chars().count() as f32 * size * self.advance, size)
    }
}
