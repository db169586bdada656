//! Core chart types for the dashboard
//!
//! This crate holds the backend-independent pieces of the chart pipeline:
//! data points, color resolution, value scaling, growth-box layout and the
//! content hash used by the pie texture cache.

pub mod color;
pub mod color_mode;
pub mod config;
pub mod data;
pub mod hash;
pub mod layout;
pub mod scale;

// Re-export commonly used types
pub use color::{named, Rgba};
pub use color_mode::{resolve_colors, ColorMode, ColorResolver, ColorRng};
pub use config::{load_json, ConfigError};
pub use data::{BarDataPoint, PieDataPoint};
pub use hash::ContentHasher;
pub use layout::{align_rect, layout_axis, used_extent, Align, Sizing, Span};
pub use scale::{bar_max, pie_total, ratio};
