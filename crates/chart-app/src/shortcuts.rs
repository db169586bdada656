//! Keyboard shortcuts

use std::sync::Arc;

use chart_core::{named, ColorMode};
use eframe::egui::{self, Key};
use parking_lot::RwLock;
use tracing::info;

/// Seed of the random color mode selected from the keyboard
pub const SHORTCUT_RANDOM_SEED: u32 = 12345;

/// Pie color mode selected by a number key
pub fn color_mode_for_key(key: Key) -> Option<ColorMode> {
    match key {
        Key::Num1 => Some(ColorMode::PerItem),
        Key::Num2 => Some(ColorMode::Palette {
            colors: vec![
                named::BLUE,
                named::GREEN,
                named::ORANGE,
                named::RED,
                named::PURPLE,
                named::TEAL,
            ],
        }),
        Key::Num3 => Some(ColorMode::Gradient {
            start: named::BLUE,
            end: named::ORANGE,
        }),
        Key::Num4 => Some(ColorMode::Random {
            seed: SHORTCUT_RANDOM_SEED,
        }),
        _ => None,
    }
}

/// State a shortcut changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    PieColorMode,
    DebugOnHover,
}

/// Applies shortcut keys to shared dashboard state
pub struct ShortcutHandler {
    pie_mode: Arc<RwLock<ColorMode>>,
    debug_on_hover: bool,
}

impl ShortcutHandler {
    pub fn new(pie_mode: Arc<RwLock<ColorMode>>) -> Self {
        Self {
            pie_mode,
            debug_on_hover: false,
        }
    }

    /// Apply the first pressed shortcut of this frame.
    ///
    /// Returns true when the shared pie color mode was replaced.
    pub fn handle(&mut self, ctx: &egui::Context) -> bool {
        let pressed = ctx.input(|i| {
            [Key::Num1, Key::Num2, Key::Num3, Key::Num4, Key::D]
                .into_iter()
                .find(|key| i.key_pressed(*key))
        });
        match pressed.and_then(|key| self.apply(key)) {
            Some(ShortcutAction::PieColorMode) => true,
            Some(ShortcutAction::DebugOnHover) => {
                ctx.set_debug_on_hover(self.debug_on_hover);
                false
            }
            None => false,
        }
    }

    fn apply(&mut self, key: Key) -> Option<ShortcutAction> {
        if let Some(mode) = color_mode_for_key(key) {
            info!("Pie chart color mode set to {}", mode.name());
            *self.pie_mode.write() = mode;
            return Some(ShortcutAction::PieColorMode);
        }
        if key == Key::D {
            self.debug_on_hover = !self.debug_on_hover;
            info!("Debug on hover: {}", self.debug_on_hover);
            return Some(ShortcutAction::DebugOnHover);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_keys_select_modes() {
        assert_eq!(color_mode_for_key(Key::Num1), Some(ColorMode::PerItem));
        assert!(matches!(color_mode_for_key(Key::Num2), Some(ColorMode::Palette { colors }) if colors.len() == 6));
        assert!(matches!(color_mode_for_key(Key::Num3), Some(ColorMode::Gradient { .. })));
        assert_eq!(color_mode_for_key(Key::Num4), Some(ColorMode::Random { seed: 12345 }));
        assert_eq!(color_mode_for_key(Key::Num5), None);
    }

    #[test]
    fn test_apply_updates_shared_mode() {
        let mode = Arc::new(RwLock::new(ColorMode::PerItem));
        let mut handler = ShortcutHandler::new(mode.clone());
        assert_eq!(handler.apply(Key::Num4), Some(ShortcutAction::PieColorMode));
        assert_eq!(*mode.read(), ColorMode::Random { seed: 12345 });
    }

    #[test]
    fn test_debug_toggle() {
        let mut handler = ShortcutHandler::new(Arc::new(RwLock::new(ColorMode::PerItem)));
        assert_eq!(handler.apply(Key::D), Some(ShortcutAction::DebugOnHover));
        assert!(handler.debug_on_hover);
        assert_eq!(handler.apply(Key::D), Some(ShortcutAction::DebugOnHover));
        assert!(!handler.debug_on_hover);
    }

    #[test]
    fn test_unbound_key_changes_nothing() {
        let mode = Arc::new(RwLock::new(ColorMode::PerItem));
        let mut handler = ShortcutHandler::new(mode.clone());
        assert_eq!(handler.apply(Key::X), None);
        assert_eq!(*mode.read(), ColorMode::PerItem);
        assert!(!handler.debug_on_hover);
    }
}
