//! CPU raster target for offscreen chart textures
//!
//! Coverage is tested at pixel centers with no anti-aliasing; textures are
//! rendered at twice the on-screen size and filtered when sampled.

use chart_core::Rgba;
use egui::{Align2, Color32, ColorImage, Pos2, Rect, TextureId};

use crate::{Renderer, Sector};

/// Rasterizes draw commands into a [`ColorImage`]
pub struct RasterRenderer {
    image: ColorImage,
}

impl RasterRenderer {
    /// New fully transparent target of `size` pixels (`[width, height]`)
    pub fn new(size: [usize; 2]) -> Self {
        Self {
            image: ColorImage::new(size, Color32::TRANSPARENT),
        }
    }

    pub fn size(&self) -> [usize; 2] {
        self.image.size
    }

    pub fn pixel(&self, x: usize, y: usize) -> Color32 {
        self.image.pixels[y * self.image.size[0] + x]
    }

    pub fn into_image(self) -> ColorImage {
        self.image
    }

    /// Pixel-center bounds clipped to the image, as `(x0, y0, x1, y1)` exclusive
    fn clip(&self, min: Pos2, max: Pos2) -> Option<(usize, usize, usize, usize)> {
        let [w, h] = self.image.size;
        let x0 = min.x.floor().max(0.0) as usize;
        let y0 = min.y.floor().max(0.0) as usize;
        let x1 = (max.x.ceil().max(0.0) as usize).min(w);
        let y1 = (max.y.ceil().max(0.0) as usize).min(h);
        if x0 >= x1 || y0 >= y1 {
            None
        } else {
            Some((x0, y0, x1, y1))
        }
    }

    fn blend(&mut self, x: usize, y: usize, src: Color32) {
        let idx = y * self.image.size[0] + x;
        let dst = self.image.pixels[idx];
        self.image.pixels[idx] = over(src, dst);
    }
}

/// Premultiplied source-over compositing
fn over(src: Color32, dst: Color32) -> Color32 {
    let inv = 255 - src.a() as u32;
    let mix = |s: u8, d: u8| -> u8 { (s as u32 + (d as u32 * inv + 127) / 255).min(255) as u8 };
    Color32::from_rgba_premultiplied(
        mix(src.r(), dst.r()),
        mix(src.g(), dst.g()),
        mix(src.b(), dst.b()),
        mix(src.a(), dst.a()),
    )
}

/// Whether `deg` falls in the sweep that starts at `start_deg`
fn angle_in_sweep(deg: f32, start_deg: f32, sweep_deg: f32) -> bool {
    if sweep_deg >= 360.0 {
        return true;
    }
    let rel = (deg - start_deg).rem_euclid(360.0);
    rel <= sweep_deg
}

fn distance_to_segment(p: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_sq();
    if len_sq <= f32::EPSILON {
        return (p - a).length();
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).length()
}

impl Renderer for RasterRenderer {
    fn draw_rect(&mut self, rect: Rect, color: Rgba, _rounding: f32) {
        let src = Color32::from(color);
        if let Some((x0, y0, x1, y1)) = self.clip(rect.min, rect.max) {
            for y in y0..y1 {
                for x in x0..x1 {
                    let p = Pos2::new(x as f32 + 0.5, y as f32 + 0.5);
                    if rect.contains(p) {
                        self.blend(x, y, src);
                    }
                }
            }
        }
    }

    fn draw_line(&mut self, from: Pos2, to: Pos2, color: Rgba, width: f32) {
        let src = Color32::from(color);
        let half = (width / 2.0).max(0.5);
        let min = Pos2::new(from.x.min(to.x) - half, from.y.min(to.y) - half);
        let max = Pos2::new(from.x.max(to.x) + half, from.y.max(to.y) + half);
        if let Some((x0, y0, x1, y1)) = self.clip(min, max) {
            for y in y0..y1 {
                for x in x0..x1 {
                    let p = Pos2::new(x as f32 + 0.5, y as f32 + 0.5);
                    if distance_to_segment(p, from, to) <= half {
                        self.blend(x, y, src);
                    }
                }
            }
        }
    }

    fn draw_sector(&mut self, sector: &Sector) {
        let sweep = sector.sweep_deg();
        if sweep <= 0.0 || sector.outer_radius <= 0.0 {
            return;
        }
        let src = Color32::from(sector.color);
        let r = sector.outer_radius;
        let c = sector.center;
        let min = Pos2::new(c.x - r, c.y - r);
        let max = Pos2::new(c.x + r, c.y + r);
        let inner_sq = sector.inner_radius.max(0.0).powi(2);
        let outer_sq = r * r;

        if let Some((x0, y0, x1, y1)) = self.clip(min, max) {
            for y in y0..y1 {
                for x in x0..x1 {
                    let dx = x as f32 + 0.5 - c.x;
                    let dy = y as f32 + 0.5 - c.y;
                    let dist_sq = dx * dx + dy * dy;
                    if dist_sq > outer_sq || dist_sq < inner_sq {
                        continue;
                    }
                    let deg = dy.atan2(dx).to_degrees();
                    if angle_in_sweep(deg, sector.start_deg, sweep) {
                        self.blend(x, y, src);
                    }
                }
            }
        }
    }

    fn draw_text(&mut self, text: &str, _position: Pos2, _anchor: Align2, _color: Rgba, _size: f32) {
        tracing::trace!("Raster target skips text {:?}", text);
    }

    fn draw_image(&mut self, texture: TextureId, _rect: Rect) {
        tracing::trace!("Raster target skips image {:?}", texture);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba = Rgba::opaque(255, 0, 0);

    fn quarter(inner: f32) -> Sector {
        // Top-right quarter: from 12 o'clock to 3 o'clock
        Sector {
            center: Pos2::new(50.0, 50.0),
            inner_radius: inner,
            outer_radius: 40.0,
            start_deg: -90.0,
            end_deg: 0.0,
            color: RED,
        }
    }

    #[test]
    fn test_sector_covers_only_its_quadrant() {
        let mut raster = RasterRenderer::new([100, 100]);
        raster.draw_sector(&quarter(0.0));
        assert_eq!(raster.pixel(70, 30), Color32::from_rgb(255, 0, 0));
        assert_eq!(raster.pixel(30, 30), Color32::TRANSPARENT);
        assert_eq!(raster.pixel(70, 70), Color32::TRANSPARENT);
        // Outside the radius
        assert_eq!(raster.pixel(95, 5), Color32::TRANSPARENT);
    }

    #[test]
    fn test_ring_leaves_hole() {
        let mut raster = RasterRenderer::new([100, 100]);
        raster.draw_sector(&quarter(20.0));
        assert_eq!(raster.pixel(55, 45), Color32::TRANSPARENT);
        assert_eq!(raster.pixel(70, 30), Color32::from_rgb(255, 0, 0));
    }

    #[test]
    fn test_full_circle() {
        let mut raster = RasterRenderer::new([20, 20]);
        raster.draw_sector(&Sector {
            center: Pos2::new(10.0, 10.0),
            inner_radius: 0.0,
            outer_radius: 9.0,
            start_deg: -90.0,
            end_deg: 270.0,
            color: RED,
        });
        assert_eq!(raster.pixel(10, 10), Color32::from_rgb(255, 0, 0));
        assert_eq!(raster.pixel(3, 10), Color32::from_rgb(255, 0, 0));
    }

    #[test]
    fn test_line_and_translucent_blend() {
        let mut raster = RasterRenderer::new([10, 10]);
        raster.draw_rect(Rect::from_min_max(Pos2::ZERO, Pos2::new(10.0, 10.0)), Rgba::BLACK, 0.0);
        raster.draw_line(Pos2::new(0.0, 5.0), Pos2::new(10.0, 5.0), Rgba::new(255, 255, 255, 128), 2.0);
        let p = raster.pixel(5, 5);
        assert!(p.r() > 100 && p.r() < 255);
        assert_eq!(p.a(), 255);
        assert_eq!(raster.pixel(5, 0), Color32::BLACK);
    }

    #[test]
    fn test_clipping_outside_image() {
        let mut raster = RasterRenderer::new([10, 10]);
        raster.draw_rect(Rect::from_min_max(Pos2::new(-20.0, -20.0), Pos2::new(-5.0, -5.0)), RED, 0.0);
        assert!(raster.into_image().pixels.iter().all(|p| *p == Color32::TRANSPARENT));
    }

    #[test]
    fn test_angle_wraparound() {
        assert!(angle_in_sweep(-170.0, 170.0, 30.0));
        assert!(!angle_in_sweep(0.0, 170.0, 30.0));
    }
}
