//! Bar chart implementation

use chart_core::{bar_max, layout_axis, ratio, resolve_colors, BarDataPoint, ColorMode, Rgba, Sizing};
use chart_render::{DrawList, EguiRenderer};
use egui::{pos2, vec2, Align2, Pos2, Rect, Sense, Ui, Vec2};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::text::{EguiTextMeasure, TextMeasure};
use crate::{ChartFrame, ChartId, ChartView};

/// Height of a bar whose value equals the scaling maximum
pub const REFERENCE_MAX_HEIGHT: f32 = 350.0;

const CHART_PADDING: f32 = 16.0;
const CHART_ROUNDING: f32 = 8.0;
const BAR_ROUNDING: f32 = 4.0;
// Vertical bars and the spacers between them grow 4:1
const BAR_GROW: f32 = 4.0;
const GAP_GROW: f32 = 1.0;
const LABEL_BOX_WIDTH: f32 = 80.0;
const ROW_CHILD_GAP: f32 = 8.0;
const ROW_INSET: f32 = 8.0;
const TEXT_GAP: f32 = 4.0;
const GRID_DIVISIONS: usize = 4;

/// Direction bars extend in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

/// Bar chart configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarChartConfig {
    pub orientation: Orientation,

    /// Bar thickness of horizontal charts
    pub bar_width: f32,

    /// Spacing between rows of horizontal charts
    pub bar_gap: f32,

    /// Scaling maximum; 0 derives it from the data
    pub max_value: f32,

    pub background_color: Rgba,
    pub grid_color: Rgba,
    pub label_text_color: Rgba,
    pub label_font_size: f32,

    pub show_grid: bool,
    pub show_labels: bool,
    pub show_values: bool,

    pub color_mode: ColorMode,
}

impl Default for BarChartConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::Vertical,
            bar_width: 60.0,
            bar_gap: 8.0,
            max_value: 0.0,
            background_color: Rgba::opaque(245, 245, 245),
            grid_color: Rgba::opaque(200, 200, 200),
            label_text_color: Rgba::opaque(60, 60, 60),
            label_font_size: 16.0,
            show_grid: false,
            show_labels: true,
            show_values: true,
            color_mode: ColorMode::PerItem,
        }
    }
}

impl BarChartConfig {
    /// Replace unset (zero) sizes with defaults and pin a time-based seed
    pub fn normalized(mut self) -> Self {
        let defaults = Self::default();
        if self.label_font_size <= 0.0 {
            self.label_font_size = defaults.label_font_size;
        }
        if self.bar_width <= 0.0 {
            self.bar_width = defaults.bar_width;
        }
        if self.bar_gap <= 0.0 {
            self.bar_gap = defaults.bar_gap;
        }
        self.color_mode = self.color_mode.with_resolved_seed();
        self
    }

    fn label_height(&self) -> f32 {
        if self.show_labels {
            self.label_font_size + 4.0
        } else {
            0.0
        }
    }

    fn value_height(&self) -> f32 {
        if self.show_values {
            self.label_font_size + TEXT_GAP
        } else {
            0.0
        }
    }

    /// Size the chart asks its parent for
    pub fn desired_size(&self, count: usize, available_width: f32) -> Vec2 {
        let height = match self.orientation {
            Orientation::Vertical => REFERENCE_MAX_HEIGHT + self.label_height() + self.value_height(),
            Orientation::Horizontal => {
                let rows = count as f32;
                rows * self.bar_width + (rows - 1.0).max(0.0) * self.bar_gap
            }
        };
        vec2(available_width, height + 2.0 * CHART_PADDING)
    }
}

/// Geometry of one bar and its adornments
#[derive(Debug, Clone, PartialEq)]
pub struct BarSlot {
    pub index: usize,
    pub bar: Rect,
    pub color: Rgba,
    pub value_text: Option<(String, Pos2, Align2)>,
    pub label: Option<(Pos2, Align2)>,
}

/// Shared measurements of one chart render
struct Metrics {
    content: Rect,
    max: f32,
    /// Vertical: bottom edge of the bars
    baseline: f32,
    /// Horizontal: left edge of the bars and the width of a bar at `max`
    bar_left: f32,
    available: f32,
    value_width: f32,
}

fn format_value(value: f32) -> String {
    format!("{:.1}", value)
}

fn metrics(config: &BarChartConfig, data: &[BarDataPoint], rect: Rect, measure: &dyn TextMeasure) -> Metrics {
    let content = rect.shrink(CHART_PADDING);
    let max = bar_max(data, config.max_value);
    let baseline = content.bottom() - config.label_height();

    let value_width = if config.show_values && config.orientation == Orientation::Horizontal {
        data.iter()
            .map(|p| measure.measure(&format_value(p.value), config.label_font_size).x)
            .fold(0.0, f32::max)
    } else {
        0.0
    };
    let label_width = if config.show_labels { LABEL_BOX_WIDTH + ROW_CHILD_GAP } else { 0.0 };
    let value_reserve = if config.show_values { value_width + ROW_CHILD_GAP } else { 0.0 };

    Metrics {
        content,
        max,
        baseline,
        bar_left: content.left() + label_width,
        available: (content.width() - label_width - value_reserve).max(0.0),
        value_width,
    }
}

/// Compute bar rectangles, colors and text anchors
pub fn bar_slots(config: &BarChartConfig, data: &[BarDataPoint], rect: Rect, measure: &dyn TextMeasure) -> Vec<BarSlot> {
    if data.is_empty() {
        return Vec::new();
    }
    let m = metrics(config, data, rect, measure);
    let colors = resolve_colors(&config.color_mode, data.iter().map(|p| p.color));
    match config.orientation {
        Orientation::Vertical => vertical_slots(config, data, &m, &colors),
        Orientation::Horizontal => horizontal_slots(config, data, &m, &colors),
    }
}

fn vertical_slots(config: &BarChartConfig, data: &[BarDataPoint], m: &Metrics, colors: &[Rgba]) -> Vec<BarSlot> {
    let n = data.len();
    let mut items = Vec::with_capacity(n * 2);
    for i in 0..n {
        items.push(Sizing::Grow(BAR_GROW));
        if i + 1 < n {
            items.push(Sizing::Grow(GAP_GROW));
        }
    }
    let spans = layout_axis(m.content.width(), 0.0, &items);

    data.iter()
        .enumerate()
        .map(|(i, point)| {
            let span = spans[i * 2];
            let height = ratio(point.value, m.max).max(0.0) * REFERENCE_MAX_HEIGHT;
            let left = m.content.left() + span.offset;
            let bar = Rect::from_min_max(pos2(left, m.baseline - height), pos2(left + span.size, m.baseline));
            let value_text = config.show_values.then(|| {
                (
                    format_value(point.value),
                    pos2(bar.center().x, bar.top() - TEXT_GAP),
                    Align2::CENTER_BOTTOM,
                )
            });
            let label = (config.show_labels && !point.label.is_empty())
                .then(|| (pos2(bar.center().x, m.baseline + 2.0), Align2::CENTER_TOP));
            BarSlot {
                index: i,
                bar,
                color: colors[i],
                value_text,
                label,
            }
        })
        .collect()
}

fn horizontal_slots(config: &BarChartConfig, data: &[BarDataPoint], m: &Metrics, colors: &[Rgba]) -> Vec<BarSlot> {
    let rows = layout_axis(
        m.content.height(),
        config.bar_gap,
        &vec![Sizing::Fixed(config.bar_width); data.len()],
    );
    let thickness = (config.bar_width - ROW_INSET).max(1.0);

    data.iter()
        .zip(rows)
        .enumerate()
        .map(|(i, (point, row))| {
            let row_center = m.content.top() + row.center();
            let width = ratio(point.value, m.max).max(0.0) * m.available;
            let bar = Rect::from_min_size(pos2(m.bar_left, row_center - thickness / 2.0), vec2(width, thickness));

            let mut items = vec![Sizing::Fixed(width)];
            if config.show_values {
                items.push(Sizing::Fit(m.value_width));
            }
            let spans = layout_axis(m.content.right() - m.bar_left, ROW_CHILD_GAP, &items);
            let value_text = spans.get(1).map(|span| {
                (
                    format_value(point.value),
                    pos2(m.bar_left + span.offset, row_center),
                    Align2::LEFT_CENTER,
                )
            });
            let label = (config.show_labels && !point.label.is_empty())
                .then(|| (pos2(m.content.left(), row_center), Align2::LEFT_CENTER));
            BarSlot {
                index: i,
                bar,
                color: colors[i],
                value_text,
                label,
            }
        })
        .collect()
}

/// Draw directives for a whole bar chart inside `rect`.
///
/// Empty data produces an empty list.
pub fn build_bar_chart(config: &BarChartConfig, data: &[BarDataPoint], rect: Rect, measure: &dyn TextMeasure) -> DrawList {
    let mut list = DrawList::new();
    if data.is_empty() {
        return list;
    }

    list.rect(rect, config.background_color, CHART_ROUNDING);

    if config.show_grid {
        let m = metrics(config, data, rect, measure);
        for k in 1..=GRID_DIVISIONS {
            let frac = k as f32 / GRID_DIVISIONS as f32;
            let (from, to) = match config.orientation {
                Orientation::Vertical => {
                    let y = m.baseline - REFERENCE_MAX_HEIGHT * frac;
                    (pos2(m.content.left(), y), pos2(m.content.right(), y))
                }
                Orientation::Horizontal => {
                    let x = m.bar_left + m.available * frac;
                    (pos2(x, m.content.top()), pos2(x, m.content.bottom()))
                }
            };
            list.line(from, to, config.grid_color, 1.0);
        }
    }

    for slot in bar_slots(config, data, rect, measure) {
        list.rect(slot.bar, slot.color, BAR_ROUNDING);
        if let Some((text, pos, anchor)) = slot.value_text {
            list.text(text, pos, anchor, config.label_text_color, config.label_font_size);
        }
        if let Some((pos, anchor)) = slot.label {
            list.text(
                data[slot.index].label.clone(),
                pos,
                anchor,
                config.label_text_color,
                config.label_font_size,
            );
        }
    }
    list
}

/// Bar chart view
pub struct BarChartView {
    id: ChartId,
    title: String,
    config: BarChartConfig,
}

impl BarChartView {
    /// Create a new bar chart view
    pub fn new(id: ChartId, title: String) -> Self {
        Self {
            id,
            title,
            config: BarChartConfig::default().normalized(),
        }
    }

    pub fn with_config(mut self, config: BarChartConfig) -> Self {
        self.set_config(config);
        self
    }

    pub fn config(&self) -> &BarChartConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: BarChartConfig) {
        self.config = config.normalized();
    }
}

impl ChartView for BarChartView {
    type Point = BarDataPoint;

    fn id(&self) -> ChartId {
        self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn ui(&mut self, ui: &mut Ui, frame: &mut ChartFrame, data: &[BarDataPoint]) {
        if data.is_empty() {
            return;
        }

        let size = self.config.desired_size(data.len(), ui.available_width());
        let (rect, _response) = ui.allocate_exact_size(size, Sense::hover());
        frame.record(self.id, rect);

        if !ui.is_rect_visible(rect) {
            return;
        }

        let measure = EguiTextMeasure::new(ui.ctx());
        let list = build_bar_chart(&self.config, data, rect, &measure);
        list.replay(&mut EguiRenderer::new(ui.painter()));
    }

    fn save_config(&self) -> Value {
        serde_json::to_value(&self.config).unwrap_or_else(|e| {
            tracing::error!("Failed to serialize bar chart config: {}", e);
            Value::Null
        })
    }

    fn load_config(&mut self, config: Value) {
        match serde_json::from_value::<BarChartConfig>(config) {
            Ok(config) => self.set_config(config),
            Err(e) => tracing::warn!("Ignoring invalid bar chart config for '{}': {}", self.title, e),
        }
    }
}
