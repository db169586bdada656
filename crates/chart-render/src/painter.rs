//! On-screen renderer backed by an egui painter

use chart_core::Rgba;
use egui::epaint::Mesh;
use egui::{pos2, Align2, Color32, FontId, Painter, Pos2, Rect, Rounding, Shape, Stroke, TextureId};

use crate::{arc_points, arc_steps, Renderer, Sector};

/// Paints draw commands into the current egui frame
pub struct EguiRenderer<'a> {
    painter: &'a Painter,
}

impl<'a> EguiRenderer<'a> {
    pub fn new(painter: &'a Painter) -> Self {
        Self { painter }
    }
}

impl Renderer for EguiRenderer<'_> {
    fn draw_rect(&mut self, rect: Rect, color: Rgba, rounding: f32) {
        self.painter
            .rect_filled(rect, Rounding::same(rounding), Color32::from(color));
    }

    fn draw_line(&mut self, from: Pos2, to: Pos2, color: Rgba, width: f32) {
        self.painter
            .line_segment([from, to], Stroke::new(width, Color32::from(color)));
    }

    fn draw_sector(&mut self, sector: &Sector) {
        let mesh = sector_mesh(sector);
        if !mesh.is_empty() {
            self.painter.add(Shape::mesh(mesh));
        }
    }

    fn draw_text(&mut self, text: &str, position: Pos2, anchor: Align2, color: Rgba, size: f32) {
        self.painter.text(
            position,
            anchor,
            text,
            FontId::proportional(size),
            Color32::from(color),
        );
    }

    fn draw_image(&mut self, texture: TextureId, rect: Rect) {
        let uv = Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));
        self.painter.image(texture, rect, uv, Color32::WHITE);
    }
}

/// Triangulate a sector: a fan for solid slices, a strip for rings
pub fn sector_mesh(sector: &Sector) -> Mesh {
    let mut mesh = Mesh::default();
    if sector.sweep_deg() <= 0.0 || sector.outer_radius <= 0.0 {
        return mesh;
    }

    let color = Color32::from(sector.color);
    let steps = arc_steps(sector.sweep_deg());
    let outer = arc_points(sector.center, sector.outer_radius, sector.start_deg, sector.end_deg, steps);

    if sector.inner_radius > 0.0 {
        let inner = arc_points(sector.center, sector.inner_radius, sector.start_deg, sector.end_deg, steps);
        for (o, i) in outer.iter().zip(inner.iter()) {
            mesh.colored_vertex(*o, color);
            mesh.colored_vertex(*i, color);
        }
        for k in 0..steps as u32 {
            let base = k * 2;
            mesh.add_triangle(base, base + 1, base + 2);
            mesh.add_triangle(base + 1, base + 3, base + 2);
        }
    } else {
        mesh.colored_vertex(sector.center, color);
        for p in &outer {
            mesh.colored_vertex(*p, color);
        }
        for k in 1..=steps as u32 {
            mesh.add_triangle(0, k, k + 1);
        }
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sector(inner: f32, start: f32, end: f32) -> Sector {
        Sector {
            center: Pos2::new(50.0, 50.0),
            inner_radius: inner,
            outer_radius: 40.0,
            start_deg: start,
            end_deg: end,
            color: Rgba::WHITE,
        }
    }

    #[test]
    fn test_pie_fan_mesh() {
        let mesh = sector_mesh(&sector(0.0, -90.0, 0.0));
        let steps = arc_steps(90.0);
        assert_eq!(mesh.vertices.len(), steps + 2);
        assert_eq!(mesh.indices.len(), steps * 3);
    }

    #[test]
    fn test_ring_strip_mesh() {
        let mesh = sector_mesh(&sector(20.0, 0.0, 180.0));
        let steps = arc_steps(180.0);
        assert_eq!(mesh.vertices.len(), (steps + 1) * 2);
        assert_eq!(mesh.indices.len(), steps * 6);
    }

    #[test]
    fn test_empty_sweep_has_no_mesh() {
        assert!(sector_mesh(&sector(0.0, 10.0, 10.0)).is_empty());
    }
}
