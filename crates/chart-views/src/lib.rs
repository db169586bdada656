//! Chart widgets for the dashboard
//!
//! Each chart is a [`ChartView`]: it lays itself out inside an egui `Ui`,
//! records its bounds in the per-frame [`ChartFrame`] and emits draw
//! directives. The pie chart additionally paints a cached offscreen texture
//! in a second pass, after layout, looked up by chart id.

pub mod bar;
pub mod frame;
pub mod pie;
pub mod pie_cache;
pub mod text;

pub use bar::{build_bar_chart, BarChartConfig, BarChartView, BarSlot, Orientation};
pub use frame::{ChartFrame, ChartId};
pub use pie::{pie_segments, rasterize_pie, PieChartConfig, PieChartView, PieLayout, PieSegment};
pub use pie_cache::{content_hash, texture_size, CacheEntry, PieCacheTable};
pub use text::{AdvanceMeasure, EguiTextMeasure, TextMeasure};

use egui::Ui;
use serde_json::Value;

/// Base trait for chart widgets
pub trait ChartView {
    /// Data point type this chart reads
    type Point;

    /// Get the unique ID of this view
    fn id(&self) -> ChartId;

    /// Get the title of this view
    fn title(&self) -> &str;

    /// Lay out and draw the chart for this frame
    fn ui(&mut self, ui: &mut Ui, frame: &mut ChartFrame, data: &[Self::Point]);

    /// Save configuration
    fn save_config(&self) -> Value;

    /// Load configuration
    fn load_config(&mut self, config: Value);
}
