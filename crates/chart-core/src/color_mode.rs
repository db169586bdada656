//! Color assignment for chart items

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::color::Rgba;

/// How a chart picks the color of each item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ColorMode {
    /// Each item keeps the color stored on its data point
    PerItem,
    /// Cycle through a palette
    Palette { colors: Vec<Rgba> },
    /// Interpolate from `start` (first item) to `end` (last item)
    Gradient { start: Rgba, end: Rgba },
    /// Pseudo-random colors; `seed == 0` asks for a time-based seed
    Random { seed: u32 },
}

impl Default for ColorMode {
    fn default() -> Self {
        ColorMode::PerItem
    }
}

impl ColorMode {
    /// Stable discriminant folded into content hashes
    pub fn tag(&self) -> u8 {
        match self {
            ColorMode::PerItem => 0,
            ColorMode::Palette { .. } => 1,
            ColorMode::Gradient { .. } => 2,
            ColorMode::Random { .. } => 3,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ColorMode::PerItem => "per-item",
            ColorMode::Palette { .. } => "palette",
            ColorMode::Gradient { .. } => "gradient",
            ColorMode::Random { .. } => "random",
        }
    }

    /// Replace a time-based random seed with a concrete one.
    ///
    /// Charts call this once when they adopt a configuration so that every
    /// later frame draws the same random sequence.
    pub fn with_resolved_seed(self) -> Self {
        match self {
            ColorMode::Random { seed: 0 } => {
                let secs = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map(|d| d.as_secs() as u32)
                    .unwrap_or(1);
                tracing::debug!("Resolved time-based color seed {}", secs.max(1));
                ColorMode::Random { seed: secs.max(1) }
            }
            other => other,
        }
    }
}

/// Linear-congruential generator used by [`ColorMode::Random`]
#[derive(Debug, Clone)]
pub struct ColorRng {
    state: u32,
}

impl ColorRng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// `state = (state * 1103515245 + 12345) mod 2^31`
    pub fn next_u32(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(1_103_515_245)
            .wrapping_add(12_345)
            & 0x7fff_ffff;
        self.state
    }

    /// Next color with every channel in `100..=255` and full alpha
    pub fn next_color(&mut self) -> Rgba {
        let rnd = self.next_u32();
        Rgba {
            r: (100 + rnd % 156) as u8,
            g: (100 + (rnd >> 8) % 156) as u8,
            b: (100 + (rnd >> 16) % 156) as u8,
            a: 255,
        }
    }
}

/// Resolves item colors for one render of one chart.
///
/// In random mode the resolver owns its generator; colors advance on every
/// call, so items must be resolved in index order.
pub struct ColorResolver<'a> {
    mode: &'a ColorMode,
    count: usize,
    rng: Option<ColorRng>,
}

impl<'a> ColorResolver<'a> {
    pub fn new(mode: &'a ColorMode, count: usize) -> Self {
        let rng = match mode {
            ColorMode::Random { seed } => Some(ColorRng::new(*seed)),
            _ => None,
        };
        Self { mode, count, rng }
    }

    pub fn resolve(&mut self, index: usize, item_color: Rgba) -> Rgba {
        match self.mode {
            ColorMode::PerItem => item_color,
            ColorMode::Palette { colors } => {
                if colors.is_empty() {
                    item_color
                } else {
                    colors[index % colors.len()]
                }
            }
            ColorMode::Gradient { start, end } => {
                let t = if self.count > 1 {
                    index as f32 / (self.count - 1) as f32
                } else {
                    0.0
                };
                start.lerp(*end, t)
            }
            ColorMode::Random { .. } => match self.rng.as_mut() {
                Some(rng) => rng.next_color(),
                None => item_color,
            },
        }
    }
}

/// Resolve every item color in order
pub fn resolve_colors<I>(mode: &ColorMode, item_colors: I) -> Vec<Rgba>
where
    I: ExactSizeIterator<Item = Rgba>,
{
    let mut resolver = ColorResolver::new(mode, item_colors.len());
    item_colors
        .enumerate()
        .map(|(i, c)| resolver.resolve(i, c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::named;

    #[test]
    fn test_per_item_passthrough() {
        let items = [named::RED, named::BLUE];
        let colors = resolve_colors(&ColorMode::PerItem, items.iter().copied());
        assert_eq!(colors, items);
    }

    #[test]
    fn test_palette_cycles_with_palette_period() {
        let palette = vec![named::RED, named::GREEN, named::BLUE];
        let mode = ColorMode::Palette { colors: palette.clone() };
        let colors = resolve_colors(&mode, std::iter::repeat(Rgba::BLACK).take(7));
        for (i, c) in colors.iter().enumerate() {
            assert_eq!(*c, palette[i % 3]);
        }
        assert_eq!(colors[0], colors[3]);
        assert_eq!(colors[3], colors[6]);
    }

    #[test]
    fn test_empty_palette_falls_back_to_item_color() {
        let mode = ColorMode::Palette { colors: Vec::new() };
        let colors = resolve_colors(&mode, [named::PINK].into_iter());
        assert_eq!(colors, vec![named::PINK]);
    }

    #[test]
    fn test_gradient_endpoints() {
        let mode = ColorMode::Gradient { start: named::BLUE, end: named::ORANGE };
        let colors = resolve_colors(&mode, std::iter::repeat(Rgba::BLACK).take(12));
        assert_eq!(colors[0], named::BLUE);
        assert_eq!(colors[11], named::ORANGE);
    }

    #[test]
    fn test_gradient_single_item_uses_start() {
        let mode = ColorMode::Gradient { start: named::BLUE, end: named::ORANGE };
        let colors = resolve_colors(&mode, [Rgba::BLACK].into_iter());
        assert_eq!(colors, vec![named::BLUE]);
    }

    #[test]
    fn test_lcg_sequence() {
        let mut rng = ColorRng::new(12345);
        let expected = (12345u32.wrapping_mul(1_103_515_245).wrapping_add(12_345)) & 0x7fff_ffff;
        assert_eq!(rng.next_u32(), expected);
    }

    #[test]
    fn test_random_colors_are_bright_and_opaque() {
        let mut rng = ColorRng::new(42);
        for _ in 0..100 {
            let c = rng.next_color();
            assert!(c.r >= 100 && c.g >= 100 && c.b >= 100);
            assert_eq!(c.a, 255);
        }
    }

    #[test]
    fn test_random_mode_reproducible_per_render() {
        let mode = ColorMode::Random { seed: 12345 };
        let first = resolve_colors(&mode, std::iter::repeat(Rgba::BLACK).take(5));
        let second = resolve_colors(&mode, std::iter::repeat(Rgba::BLACK).take(5));
        assert_eq!(first, second);
    }

    #[test]
    fn test_resolved_seed_is_nonzero() {
        match (ColorMode::Random { seed: 0 }).with_resolved_seed() {
            ColorMode::Random { seed } => assert_ne!(seed, 0),
            other => panic!("unexpected mode {:?}", other),
        }
        let kept = (ColorMode::Random { seed: 7 }).with_resolved_seed();
        assert_eq!(kept, ColorMode::Random { seed: 7 });
    }

    #[test]
    fn test_color_mode_json_shape() {
        let mode: ColorMode =
            serde_json::from_str(r#"{"mode":"random","seed":9}"#).unwrap();
        assert_eq!(mode, ColorMode::Random { seed: 9 });
        let json = serde_json::to_value(ColorMode::PerItem).unwrap();
        assert_eq!(json["mode"], "per_item");
    }
}
