use egui::{Color32, Context, FontFamily, FontId, Rounding, Stroke, Style, TextStyle, Visuals};
use std::collections::BTreeMap;

/// Theme configuration
pub struct Theme {
    pub name: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "Dashboard Light".to_string(),
        }
    }
}

/// Outer window background behind the chart panels
pub fn background_color() -> Color32 {
    Color32::from_rgb(230, 230, 235)
}

/// Fill of title bars, footer and chart cards
pub fn card_color() -> Color32 {
    Color32::WHITE
}

/// Dashboard title text
pub fn title_color() -> Color32 {
    Color32::from_rgb(40, 40, 50)
}

/// Panel heading text
pub fn heading_color() -> Color32 {
    Color32::from_rgb(60, 60, 70)
}

/// Footer and hint text
pub fn hint_color() -> Color32 {
    Color32::from_rgb(100, 100, 110)
}

/// Apply the dashboard theme
pub fn apply_theme(ctx: &Context, theme: &Theme) {
    let mut style = Style::default();
    let mut visuals = Visuals::light();

    let widget_bg = Color32::from_rgb(240, 240, 244);
    let accent_color = Color32::from_rgb(100, 150, 250);

    visuals.window_fill = card_color();
    visuals.panel_fill = background_color();
    visuals.extreme_bg_color = card_color();
    visuals.faint_bg_color = widget_bg;

    visuals.widgets.noninteractive.bg_fill = widget_bg;
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, heading_color());
    visuals.widgets.noninteractive.rounding = Rounding::same(4.0);

    visuals.selection.bg_fill = accent_color.linear_multiply(0.3);
    visuals.selection.stroke = Stroke::new(1.0, accent_color);
    visuals.hyperlink_color = accent_color;

    style.spacing.item_spacing = egui::vec2(8.0, 4.0);
    style.spacing.button_padding = egui::vec2(8.0, 4.0);

    // Font sizes
    let mut font_sizes = BTreeMap::new();
    font_sizes.insert(TextStyle::Small, FontId::new(12.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Body, FontId::new(14.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Button, FontId::new(14.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Heading, FontId::new(32.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Monospace, FontId::new(12.0, FontFamily::Monospace));
    style.text_styles = font_sizes;

    tracing::debug!("Applying theme '{}'", theme.name);
    ctx.set_style(style);
    ctx.set_visuals(visuals);
}
