//! Pie and donut chart implementation
//!
//! Rendering is split in two passes. [`ChartView::ui`] lays out the container,
//! records the pie area bounds and draws the legend. [`PieChartView::paint`]
//! runs after layout, looks the pie area up by id and paints the cached
//! offscreen texture into it.

use chart_core::{
    layout_axis, pie_total, resolve_colors, Align, ColorMode, PieDataPoint, Rgba, Sizing,
};
use chart_render::{DrawList, EguiRenderer, RasterRenderer, Sector, TextureStore};
use egui::{pos2, vec2, Align2, ColorImage, Painter, Pos2, Rect, Sense, Ui, Vec2};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::pie_cache::PieCacheTable;
use crate::text::{EguiTextMeasure, TextMeasure};
use crate::{ChartFrame, ChartId, ChartView};

const CONTAINER_PADDING: f32 = 16.0;
const CONTAINER_ROUNDING: f32 = 8.0;
const CONTAINER_GAP: f32 = 24.0;
const LEGEND_PADDING: f32 = 16.0;
const LEGEND_ROW_GAP: f32 = 8.0;
const LEGEND_ROUNDING: f32 = 8.0;
const SWATCH_SIZE: f32 = 16.0;
const SWATCH_ROUNDING: f32 = 2.0;
const ROW_CHILD_GAP: f32 = 8.0;
const PERCENT_COLOR: Rgba = Rgba::opaque(120, 120, 120);

/// Pie chart configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PieChartConfig {
    pub radius: f32,

    /// Inner radius; 0 draws solid slices
    pub donut_hole_radius: f32,

    /// How far exploded segments move outward
    pub explode_distance: f32,

    pub show_labels: bool,
    pub show_values: bool,
    pub show_percentages: bool,
    pub show_legend: bool,
    pub show_sector_lines: bool,

    pub background_color: Rgba,
    pub label_text_color: Rgba,
    pub sector_line_color: Rgba,
    pub sector_line_width: f32,
    pub label_font_size: f32,

    /// Angle of the first segment's leading edge, in degrees (-90 is 12 o'clock)
    pub start_angle: f32,

    pub color_mode: ColorMode,

    /// Container size
    pub width: f32,
    pub height: f32,
}

impl Default for PieChartConfig {
    fn default() -> Self {
        Self {
            radius: 120.0,
            donut_hole_radius: 0.0,
            explode_distance: 10.0,
            show_labels: false,
            show_values: false,
            show_percentages: true,
            show_legend: true,
            show_sector_lines: true,
            background_color: Rgba::WHITE,
            label_text_color: Rgba::opaque(60, 60, 60),
            sector_line_color: Rgba::new(255, 255, 255, 200),
            sector_line_width: 2.0,
            label_font_size: 14.0,
            start_angle: -90.0,
            color_mode: ColorMode::PerItem,
            width: 600.0,
            height: 450.0,
        }
    }
}

impl PieChartConfig {
    /// Replace unset (zero) sizes with defaults and pin a time-based seed
    pub fn normalized(mut self) -> Self {
        let defaults = Self::default();
        if self.radius <= 0.0 {
            self.radius = defaults.radius;
        }
        if self.label_font_size <= 0.0 {
            self.label_font_size = defaults.label_font_size;
        }
        if self.sector_line_width <= 0.0 {
            self.sector_line_width = defaults.sector_line_width;
        }
        if self.width <= 0.0 {
            self.width = defaults.width;
        }
        if self.height <= 0.0 {
            self.height = defaults.height;
        }
        self.donut_hole_radius = self.donut_hole_radius.max(0.0);
        self.explode_distance = self.explode_distance.max(0.0);
        self.color_mode = self.color_mode.with_resolved_seed();
        self
    }

    /// Copy with every geometric length multiplied by `factor`
    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            radius: self.radius * factor,
            donut_hole_radius: self.donut_hole_radius * factor,
            explode_distance: self.explode_distance * factor,
            sector_line_width: self.sector_line_width * factor,
            ..self.clone()
        }
    }

    /// Side of the square area that holds the pie and its exploded segments
    pub fn pie_side(&self) -> f32 {
        2.0 * self.radius + 2.0 * self.explode_distance
    }

    fn shows_slice_text(&self) -> bool {
        !self.show_legend && (self.show_labels || self.show_values || self.show_percentages)
    }
}

/// Angular placement of one pie segment
#[derive(Debug, Clone, PartialEq)]
pub struct PieSegment {
    pub index: usize,
    pub start_deg: f32,
    pub sweep_deg: f32,
    pub exploded: bool,
    pub color: Rgba,
    /// Displacement of the segment from the pie center
    pub offset: Vec2,
}

impl PieSegment {
    pub fn end_deg(&self) -> f32 {
        self.start_deg + self.sweep_deg
    }

    pub fn mid_deg(&self) -> f32 {
        self.start_deg + self.sweep_deg / 2.0
    }
}

fn polar(deg: f32, radius: f32) -> Vec2 {
    let rad = deg.to_radians();
    vec2(rad.cos() * radius, rad.sin() * radius)
}

fn format_percent(value: f32, total: f32) -> String {
    format!("{:.1}%", value / total * 100.0)
}

/// Allocate 360° across `data` in input order.
///
/// Returns nothing when `data` is empty or its total is not positive.
pub fn pie_segments(config: &PieChartConfig, data: &[PieDataPoint], colors: &[Rgba]) -> Vec<PieSegment> {
    let total = pie_total(data);
    if data.is_empty() || total <= 0.0 {
        return Vec::new();
    }

    let mut angle = config.start_angle;
    data.iter()
        .enumerate()
        .map(|(i, point)| {
            let sweep = point.value / total * 360.0;
            let mut segment = PieSegment {
                index: i,
                start_deg: angle,
                sweep_deg: sweep,
                exploded: point.exploded,
                color: colors.get(i).copied().unwrap_or(point.color),
                offset: Vec2::ZERO,
            };
            if point.exploded {
                segment.offset = polar(segment.mid_deg(), config.explode_distance);
            }
            angle += sweep;
            segment
        })
        .collect()
}

/// Sectors followed by divider lines, centered on `center`
pub fn segment_commands(config: &PieChartConfig, segments: &[PieSegment], center: Pos2) -> DrawList {
    let mut list = DrawList::new();
    for segment in segments {
        list.sector(Sector {
            center: center + segment.offset,
            inner_radius: config.donut_hole_radius,
            outer_radius: config.radius,
            start_deg: segment.start_deg,
            end_deg: segment.end_deg(),
            color: segment.color,
        });
    }

    if config.show_sector_lines && segments.len() > 1 {
        for segment in &segments[..segments.len() - 1] {
            let c = center + segment.offset;
            let end = segment.end_deg();
            list.line(
                c + polar(end, config.donut_hole_radius),
                c + polar(end, config.radius),
                config.sector_line_color,
                config.sector_line_width,
            );
        }
    }
    list
}

/// Render the pie into a transparent image of `size` pixels.
///
/// Geometry is scaled so the pie area fills the image.
pub fn rasterize_pie(config: &PieChartConfig, data: &[PieDataPoint], colors: &[Rgba], size: [usize; 2]) -> ColorImage {
    let mut raster = RasterRenderer::new(size);
    let side = config.pie_side();
    if side > 0.0 {
        let [w, h] = size;
        let factor = (w as f32 / side).min(h as f32 / side);
        let scaled = config.scaled(factor);
        let segments = pie_segments(&scaled, data, colors);
        let center = pos2(w as f32 / 2.0, h as f32 / 2.0);
        segment_commands(&scaled, &segments, center).replay(&mut raster);
    }
    raster.into_image()
}

/// Placement of the container, pie area and legend
#[derive(Debug, Clone, PartialEq)]
pub struct PieLayout {
    pub container: Rect,
    pub pie_area: Rect,
    pub legend: Option<Rect>,
}

struct LegendMetrics {
    label_width: f32,
    percent_width: f32,
    row_height: f32,
}

impl LegendMetrics {
    fn measure(config: &PieChartConfig, data: &[PieDataPoint], measure: &dyn TextMeasure) -> Self {
        let total = pie_total(data);
        let label_width = data
            .iter()
            .map(|p| measure.measure(&p.label, config.label_font_size).x)
            .fold(0.0, f32::max);
        let percent_width = data
            .iter()
            .map(|p| measure.measure(&format!("({})", format_percent(p.value, total)), percent_font(config)).x)
            .fold(0.0, f32::max);
        Self {
            label_width,
            percent_width,
            row_height: SWATCH_SIZE.max(config.label_font_size),
        }
    }

    fn size(&self, rows: usize) -> Vec2 {
        let width = 2.0 * LEGEND_PADDING + SWATCH_SIZE + ROW_CHILD_GAP + self.label_width + ROW_CHILD_GAP + self.percent_width;
        let n = rows as f32;
        let height = 2.0 * LEGEND_PADDING + n * self.row_height + (n - 1.0).max(0.0) * LEGEND_ROW_GAP;
        vec2(width, height)
    }
}

fn percent_font(config: &PieChartConfig) -> f32 {
    (config.label_font_size - 2.0).max(1.0)
}

/// Position the pie area, and the legend when shown, centered in `container`
pub fn layout_pie(config: &PieChartConfig, data: &[PieDataPoint], container: Rect, measure: &dyn TextMeasure) -> PieLayout {
    let content = container.shrink(CONTAINER_PADDING);
    let side = config.pie_side();

    if !config.show_legend {
        let pie_area = chart_core::align_rect(content, Vec2::splat(side), Align::Center, Align::Center);
        return PieLayout {
            container,
            pie_area,
            legend: None,
        };
    }

    let legend_size = LegendMetrics::measure(config, data, measure).size(data.len());
    let spans = layout_axis(
        content.width(),
        CONTAINER_GAP,
        &[Sizing::Fixed(side), Sizing::Fit(legend_size.x)],
    );
    let used = chart_core::used_extent(&spans);
    let left = content.left() + Align::Center.offset(content.width(), used);
    let y_for = |h: f32| content.top() + Align::Center.offset(content.height(), h);

    PieLayout {
        container,
        pie_area: Rect::from_min_size(pos2(left + spans[0].offset, y_for(side)), Vec2::splat(side)),
        legend: Some(Rect::from_min_size(
            pos2(left + spans[1].offset, y_for(legend_size.y)),
            legend_size,
        )),
    }
}

/// Legend background and one row per data point
pub fn legend_commands(
    config: &PieChartConfig,
    data: &[PieDataPoint],
    colors: &[Rgba],
    legend: Rect,
    measure: &dyn TextMeasure,
) -> DrawList {
    let mut list = DrawList::new();
    let total = pie_total(data);
    if data.is_empty() || total <= 0.0 {
        return list;
    }

    let metrics = LegendMetrics::measure(config, data, measure);
    list.rect(legend, config.background_color, LEGEND_ROUNDING);

    let rows = layout_axis(
        legend.height() - 2.0 * LEGEND_PADDING,
        LEGEND_ROW_GAP,
        &vec![Sizing::Fixed(metrics.row_height); data.len()],
    );
    let swatch_left = legend.left() + LEGEND_PADDING;
    let label_left = swatch_left + SWATCH_SIZE + ROW_CHILD_GAP;
    let percent_left = label_left + metrics.label_width + ROW_CHILD_GAP;

    for (i, (point, row)) in data.iter().zip(rows).enumerate() {
        let y = legend.top() + LEGEND_PADDING + row.center();
        let color = colors.get(i).copied().unwrap_or(point.color);
        list.rect(
            Rect::from_min_size(pos2(swatch_left, y - SWATCH_SIZE / 2.0), Vec2::splat(SWATCH_SIZE)),
            color,
            SWATCH_ROUNDING,
        );
        list.text(
            point.label.clone(),
            pos2(label_left, y),
            Align2::LEFT_CENTER,
            config.label_text_color,
            config.label_font_size,
        );
        list.text(
            format!("({})", format_percent(point.value, total)),
            pos2(percent_left, y),
            Align2::LEFT_CENTER,
            PERCENT_COLOR,
            percent_font(config),
        );
    }
    list
}

/// On-slice text, drawn only when the legend is hidden
pub fn slice_text_commands(config: &PieChartConfig, data: &[PieDataPoint], colors: &[Rgba], pie_area: Rect) -> DrawList {
    let mut list = DrawList::new();
    if !config.shows_slice_text() {
        return list;
    }
    let total = pie_total(data);
    let center = pie_area.center();
    let text_radius = (config.donut_hole_radius + config.radius) / 2.0;

    for segment in pie_segments(config, data, colors) {
        let point = &data[segment.index];
        let mut parts = Vec::with_capacity(3);
        if config.show_labels && !point.label.is_empty() {
            parts.push(point.label.clone());
        }
        if config.show_values {
            parts.push(format!("{:.1}", point.value));
        }
        if config.show_percentages {
            parts.push(format_percent(point.value, total));
        }
        if parts.is_empty() {
            continue;
        }
        list.text(
            parts.join(" "),
            center + segment.offset + polar(segment.mid_deg(), text_radius),
            Align2::CENTER_CENTER,
            config.label_text_color,
            config.label_font_size,
        );
    }
    list
}

/// Pie chart view
pub struct PieChartView {
    id: ChartId,
    area_id: ChartId,
    title: String,
    config: PieChartConfig,
}

impl PieChartView {
    /// Create a new pie chart view
    pub fn new(id: ChartId, title: String) -> Self {
        let area_id = id.with("PieArea");
        Self {
            id,
            area_id,
            title,
            config: PieChartConfig::default().normalized(),
        }
    }

    pub fn with_config(mut self, config: PieChartConfig) -> Self {
        self.set_config(config);
        self
    }

    pub fn config(&self) -> &PieChartConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: PieChartConfig) {
        self.config = config.normalized();
    }

    /// Switch color mode without touching the rest of the configuration.
    ///
    /// A time-based random seed keeps the seed already pinned when the chart
    /// is in random mode.
    pub fn set_color_mode(&mut self, mode: ColorMode) {
        let keeps_seed = matches!(
            (&mode, &self.config.color_mode),
            (ColorMode::Random { seed: 0 }, ColorMode::Random { .. })
        );
        if !keeps_seed && self.config.color_mode != mode {
            tracing::info!("Pie chart '{}' color mode: {}", self.title, mode.name());
            self.config.color_mode = mode.with_resolved_seed();
        }
    }

    /// Id under which the pie area bounds are recorded
    pub fn area_id(&self) -> ChartId {
        self.area_id
    }

    fn colors(&self, data: &[PieDataPoint]) -> Vec<Rgba> {
        resolve_colors(&self.config.color_mode, data.iter().map(|p| p.color))
    }

    /// Draw-pass directives: the cached pie texture and any on-slice text
    pub fn draw_commands<S: TextureStore>(
        &self,
        frame: &ChartFrame,
        cache: &mut PieCacheTable<S::Handle>,
        store: &mut S,
        data: &[PieDataPoint],
    ) -> DrawList {
        let mut list = DrawList::new();
        if data.is_empty() || pie_total(data) <= 0.0 {
            return list;
        }

        let Some(area) = frame.lookup(self.area_id) else {
            tracing::warn!("No bounds recorded for pie area of '{}' ({:?}), skipping", self.title, self.area_id);
            return list;
        };

        match cache.prepare(self.id, &self.config, data, area, store) {
            Ok(entry) => {
                if let Some(handle) = entry.handle() {
                    list.image(store.texture_id(handle), area);
                }
            }
            Err(e) => {
                tracing::error!("Skipping pie chart '{}' this frame: {}", self.title, e);
                return list;
            }
        }

        list.extend(slice_text_commands(&self.config, data, &self.colors(data), area));
        list
    }

    /// Second pass: paint the pie into the area recorded by [`ChartView::ui`]
    pub fn paint<S: TextureStore>(
        &self,
        painter: &Painter,
        frame: &ChartFrame,
        cache: &mut PieCacheTable<S::Handle>,
        store: &mut S,
        data: &[PieDataPoint],
    ) {
        let list = self.draw_commands(frame, cache, store, data);
        list.replay(&mut EguiRenderer::new(painter));
    }
}

impl ChartView for PieChartView {
    type Point = PieDataPoint;

    fn id(&self) -> ChartId {
        self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn ui(&mut self, ui: &mut Ui, frame: &mut ChartFrame, data: &[PieDataPoint]) {
        if data.is_empty() || pie_total(data) <= 0.0 {
            return;
        }

        let (rect, _response) = ui.allocate_exact_size(vec2(self.config.width, self.config.height), Sense::hover());
        let measure = EguiTextMeasure::new(ui.ctx());
        let layout = layout_pie(&self.config, data, rect, &measure);
        frame.record(self.id, layout.container);
        frame.record(self.area_id, layout.pie_area);

        let mut list = DrawList::new();
        list.rect(layout.container, self.config.background_color, CONTAINER_ROUNDING);
        if let Some(legend) = layout.legend {
            list.extend(legend_commands(&self.config, data, &self.colors(data), legend, &measure));
        }
        list.replay(&mut EguiRenderer::new(ui.painter()));
    }

    fn save_config(&self) -> Value {
        serde_json::to_value(&self.config).unwrap_or_else(|e| {
            tracing::error!("Failed to serialize pie chart config: {}", e);
            Value::Null
        })
    }

    fn load_config(&mut self, config: Value) {
        match serde_json::from_value::<PieChartConfig>(config) {
            Ok(config) => self.set_config(config),
            Err(e) => tracing::warn!("Ignoring invalid pie chart config for '{}': {}", self.title, e),
        }
    }
}
