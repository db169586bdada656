//! Unmultiplied 8-bit colors used by chart configurations

use egui::Color32;
use serde::{Deserialize, Serialize};

/// RGBA color with straight (unmultiplied) alpha
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Linear interpolation of each channel independently in 0-255 space.
    ///
    /// `t` is clamped to `0.0..=1.0`, so `t == 0` returns `self` and `t == 1`
    /// returns `other` exactly.
    pub fn lerp(self, other: Rgba, t: f32) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        let channel = |a: u8, b: u8| -> u8 {
            let a = a as f32;
            let b = b as f32;
            (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
        };
        Rgba {
            r: channel(self.r, other.r),
            g: channel(self.g, other.g),
            b: channel(self.b, other.b),
            a: channel(self.a, other.a),
        }
    }

    /// Packed `0xRRGGBBAA` value, used when folding colors into hashes
    pub fn to_u32(self) -> u32 {
        u32::from_be_bytes([self.r, self.g, self.b, self.a])
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Rgba::BLACK
    }
}

impl From<Rgba> for Color32 {
    fn from(c: Rgba) -> Self {
        Color32::from_rgba_unmultiplied(c.r, c.g, c.b, c.a)
    }
}

impl From<[u8; 4]> for Rgba {
    fn from(c: [u8; 4]) -> Self {
        Rgba::new(c[0], c[1], c[2], c[3])
    }
}

/// Named colors shared by the dashboard demo
pub mod named {
    use super::Rgba;

    pub const BLUE: Rgba = Rgba::opaque(100, 150, 250);
    pub const GREEN: Rgba = Rgba::opaque(120, 200, 120);
    pub const ORANGE: Rgba = Rgba::opaque(250, 180, 100);
    pub const RED: Rgba = Rgba::opaque(250, 100, 100);
    pub const PURPLE: Rgba = Rgba::opaque(180, 120, 250);
    pub const TEAL: Rgba = Rgba::opaque(100, 200, 200);
    pub const YELLOW: Rgba = Rgba::opaque(250, 250, 100);
    pub const PINK: Rgba = Rgba::opaque(250, 100, 250);
    pub const BROWN: Rgba = Rgba::opaque(150, 100, 50);
    pub const GRAY: Rgba = Rgba::opaque(150, 150, 150);
    pub const CYAN: Rgba = Rgba::opaque(100, 250, 250);
    pub const LIME: Rgba = Rgba::opaque(150, 250, 100);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints_are_exact() {
        let start = Rgba::new(100, 150, 250, 255);
        let end = Rgba::new(250, 180, 100, 128);
        assert_eq!(start.lerp(end, 0.0), start);
        assert_eq!(start.lerp(end, 1.0), end);
    }

    #[test]
    fn test_lerp_is_per_channel() {
        let mid = Rgba::new(0, 100, 200, 0).lerp(Rgba::new(200, 100, 0, 255), 0.5);
        assert_eq!(mid, Rgba::new(100, 100, 100, 128));
    }

    #[test]
    fn test_to_u32_packs_rgba() {
        assert_eq!(Rgba::new(0x12, 0x34, 0x56, 0x78).to_u32(), 0x1234_5678);
    }
}
