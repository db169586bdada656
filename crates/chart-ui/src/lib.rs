//! User interface helpers for the dashboard
//!
//! Dashboard theme and the panel colors used by the demo application.

pub mod theme;

pub use theme::{apply_theme, background_color, card_color, heading_color, hint_color, title_color, Theme};
