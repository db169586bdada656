//! Main application entry point

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chart_core::ColorMode;
use chart_render::EguiTextureStore;
use chart_ui::{apply_theme, background_color, card_color, heading_color, hint_color, title_color, Theme};
use chart_views::{BarChartView, ChartFrame, ChartId, ChartView, PieCacheTable, PieChartView};
use eframe::egui::{self, Context, RichText, TextureHandle, Ui};
use parking_lot::RwLock;
use tracing::{debug, info};

mod config;
mod demo;
mod shortcuts;

use config::{DashboardConfig, CONFIG_ENV};
use demo::SalesData;
use shortcuts::ShortcutHandler;

const OUTER_PADDING: f32 = 32.0;
const SECTION_GAP: f32 = 32.0;
const PANEL_GAP: f32 = 16.0;
const CARD_ROUNDING: f32 = 8.0;

const HINT: &str = "Press 1-4 to change pie chart colors: (1) Per-segment (2) Palette (3) Gradient (4) Random";

/// Main application state
struct DashboardApp {
    /// Monthly sales shown by both charts
    sales: SalesData,

    bar_chart: BarChartView,
    pie_chart: PieChartView,

    /// Pie color mode, written by the keyboard shortcuts
    pie_mode: Arc<RwLock<ColorMode>>,
    shortcuts: ShortcutHandler,

    /// Chart bounds of the current frame
    frame: ChartFrame,

    /// Offscreen pie textures
    pie_cache: PieCacheTable<TextureHandle>,

    /// Egui context, kept for releasing textures on exit
    egui_ctx: Context,
}

impl DashboardApp {
    fn new(cc: &eframe::CreationContext<'_>, config: DashboardConfig) -> Self {
        apply_theme(&cc.egui_ctx, &Theme::default());

        let now = cc.egui_ctx.input(|i| i.time);
        let bar_chart = BarChartView::new(ChartId::new("SalesChart"), "Monthly Sales (Thousands)".to_string())
            .with_config(config.bar_chart);
        let pie_chart = PieChartView::new(ChartId::new("SalesPieChart"), "Sales Distribution".to_string())
            .with_config(config.pie_chart);
        // Shared mode starts from the pinned seed, not the configured 0
        let pie_mode = Arc::new(RwLock::new(pie_chart.config().color_mode.clone()));

        Self {
            sales: SalesData::new(now, config.tick_interval_secs),
            bar_chart,
            pie_chart,
            shortcuts: ShortcutHandler::new(pie_mode.clone()),
            pie_mode,
            frame: ChartFrame::new(),
            pie_cache: PieCacheTable::new(),
            egui_ctx: cc.egui_ctx.clone(),
        }
    }

    fn show_title(ui: &mut Ui) {
        ui.label(
            RichText::new("Dashboard - Bar Chart & Pie Chart")
                .size(32.0)
                .color(title_color()),
        );
    }

    fn show_panel_heading(ui: &mut Ui, text: &str) {
        egui::Frame::none()
            .fill(card_color())
            .rounding(CARD_ROUNDING)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(RichText::new(text).size(20.0).color(heading_color()));
            });
    }

    fn show_footer(ui: &mut Ui) {
        egui::Frame::none()
            .fill(card_color())
            .rounding(CARD_ROUNDING)
            .inner_margin(16.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(RichText::new(HINT).size(14.0).color(hint_color()));
            });
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let now = ctx.input(|i| i.time);

        // Handle keyboard shortcuts
        if self.shortcuts.handle(ctx) {
            self.pie_chart.set_color_mode(self.pie_mode.read().clone());
        }

        if self.sales.tick(now, &mut rand::thread_rng()) {
            debug!("Sales data updated at {:.1}s", now);
        }

        self.frame.begin();

        let panel_frame = egui::Frame::none()
            .fill(background_color())
            .inner_margin(OUTER_PADDING);

        egui::CentralPanel::default().frame(panel_frame).show(ctx, |ui| {
            ui.spacing_mut().item_spacing.y = SECTION_GAP;
            Self::show_title(ui);

            let charts_height = (ui.available_height() - 80.0).max(0.0);
            ui.allocate_ui(egui::vec2(ui.available_width(), charts_height), |ui| {
                ui.spacing_mut().item_spacing = egui::vec2(PANEL_GAP, PANEL_GAP);
                ui.columns(2, |columns| {
                    Self::show_panel_heading(&mut columns[0], self.bar_chart.title());
                    self.bar_chart.ui(&mut columns[0], &mut self.frame, self.sales.bars());

                    Self::show_panel_heading(&mut columns[1], self.pie_chart.title());
                    columns[1].vertical_centered(|ui| {
                        // Layout pass, then the textured pie on top
                        self.pie_chart.ui(ui, &mut self.frame, self.sales.pie());
                        let mut store = EguiTextureStore::new(ui.ctx());
                        self.pie_chart
                            .paint(ui.painter(), &self.frame, &mut self.pie_cache, &mut store, self.sales.pie());
                    });
                });
            });

            Self::show_footer(ui);
        });

        self.pie_cache.end_frame(&mut EguiTextureStore::new(ctx));

        ctx.request_repaint_after(Duration::from_secs_f64(self.sales.time_until_next_tick(now)));
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Shutting down dashboard");
        self.pie_cache.clear(&mut EguiTextureStore::new(&self.egui_ctx));
    }
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let config_path = config::config_path(std::env::args().skip(1), std::env::var(CONFIG_ENV).ok());
    let config = config::load(config_path.as_deref())?;

    info!("Starting dashboard");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width, config.window_height])
            .with_min_inner_size([800.0, 600.0]),
        default_theme: eframe::Theme::Light,
        persist_window: false,
        ..Default::default()
    };

    eframe::run_native(
        "Dashboard - Bar Chart & Pie Chart",
        options,
        Box::new(move |cc| Box::new(DashboardApp::new(cc, config))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run app: {}", e))?;

    Ok(())
}
