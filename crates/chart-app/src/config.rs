//! Dashboard configuration
//!
//! Everything has a default, so the file is optional and may set any subset
//! of fields.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chart_core::{named, ColorMode, Rgba};
use chart_views::{BarChartConfig, PieChartConfig};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Environment variable consulted when no path is given on the command line
pub const CONFIG_ENV: &str = "DASHBOARD_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub window_width: f32,
    pub window_height: f32,

    /// Seconds between data updates
    pub tick_interval_secs: f64,

    pub bar_chart: BarChartConfig,
    pub pie_chart: PieChartConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            window_width: 1400.0,
            window_height: 900.0,
            tick_interval_secs: 1.0,
            bar_chart: BarChartConfig {
                bar_gap: 12.0,
                background_color: Rgba::WHITE,
                color_mode: ColorMode::Gradient {
                    start: named::BLUE,
                    end: named::GREEN,
                },
                ..Default::default()
            },
            pie_chart: PieChartConfig {
                donut_hole_radius: 50.0,
                explode_distance: 8.0,
                color_mode: ColorMode::Gradient {
                    start: named::BLUE,
                    end: named::ORANGE,
                },
                ..Default::default()
            },
        }
    }
}

/// First command line argument, falling back to the environment
pub fn config_path(mut args: impl Iterator<Item = String>, env: Option<String>) -> Option<PathBuf> {
    args.next()
        .or(env)
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
}

/// Load the configuration at `path`, or the defaults when there is none
pub fn load(path: Option<&Path>) -> Result<DashboardConfig> {
    match path {
        Some(path) => {
            let config: DashboardConfig = chart_core::load_json(path)
                .with_context(|| format!("Failed to load dashboard config {}", path.display()))?;
            Ok(config)
        }
        None => {
            info!("No dashboard config given, using defaults");
            Ok(DashboardConfig::default())
        }
    }
}
