//! Rendering abstraction layer
//!
//! Charts emit a [`DrawList`] of backend-neutral [`DrawCommand`]s. A list is
//! replayed on any [`Renderer`]: the egui painter adapter for on-screen
//! drawing, or the CPU raster target used for offscreen pie textures.

pub mod painter;
pub mod raster;
pub mod texture;

use chart_core::Rgba;
use egui::{Align2, Pos2, Rect, TextureId};

pub use painter::EguiRenderer;
pub use raster::RasterRenderer;
pub use texture::{check_texture_size, EguiTextureStore, RasterError, TextureStore, MIN_TEXTURE_SIDE};

/// Filled circle sector, or ring sector when `inner_radius > 0`.
///
/// Angles are in degrees, clockwise on screen (y down), 0° pointing right.
#[derive(Debug, Clone, PartialEq)]
pub struct Sector {
    pub center: Pos2,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub start_deg: f32,
    pub end_deg: f32,
    pub color: Rgba,
}

impl Sector {
    pub fn sweep_deg(&self) -> f32 {
        self.end_deg - self.start_deg
    }
}

/// A single draw directive
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Rect {
        rect: Rect,
        color: Rgba,
        rounding: f32,
    },
    Line {
        from: Pos2,
        to: Pos2,
        color: Rgba,
        width: f32,
    },
    Sector(Sector),
    Text {
        text: String,
        position: Pos2,
        anchor: Align2,
        color: Rgba,
        size: f32,
    },
    Image {
        texture: TextureId,
        rect: Rect,
    },
}

/// Trait for renderers
pub trait Renderer {
    /// Draw a filled, optionally rounded rectangle
    fn draw_rect(&mut self, rect: Rect, color: Rgba, rounding: f32);

    /// Draw a line
    fn draw_line(&mut self, from: Pos2, to: Pos2, color: Rgba, width: f32);

    /// Draw a circle or ring sector
    fn draw_sector(&mut self, sector: &Sector);

    /// Draw text
    fn draw_text(&mut self, text: &str, position: Pos2, anchor: Align2, color: Rgba, size: f32);

    /// Draw a previously uploaded texture
    fn draw_image(&mut self, texture: TextureId, rect: Rect);
}

/// Ordered list of draw directives for one chart and one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn rect(&mut self, rect: Rect, color: Rgba, rounding: f32) {
        self.push(DrawCommand::Rect { rect, color, rounding });
    }

    pub fn line(&mut self, from: Pos2, to: Pos2, color: Rgba, width: f32) {
        self.push(DrawCommand::Line { from, to, color, width });
    }

    pub fn sector(&mut self, sector: Sector) {
        self.push(DrawCommand::Sector(sector));
    }

    pub fn text(&mut self, text: impl Into<String>, position: Pos2, anchor: Align2, color: Rgba, size: f32) {
        self.push(DrawCommand::Text {
            text: text.into(),
            position,
            anchor,
            color,
            size,
        });
    }

    pub fn image(&mut self, texture: TextureId, rect: Rect) {
        self.push(DrawCommand::Image { texture, rect });
    }

    pub fn extend(&mut self, other: DrawList) {
        self.commands.extend(other.commands);
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter()
    }

    /// Execute every command in order on `renderer`
    pub fn replay(&self, renderer: &mut dyn Renderer) {
        for command in &self.commands {
            match command {
                DrawCommand::Rect { rect, color, rounding } => renderer.draw_rect(*rect, *color, *rounding),
                DrawCommand::Line { from, to, color, width } => renderer.draw_line(*from, *to, *color, *width),
                DrawCommand::Sector(sector) => renderer.draw_sector(sector),
                DrawCommand::Text {
                    text,
                    position,
                    anchor,
                    color,
                    size,
                } => renderer.draw_text(text, *position, *anchor, *color, *size),
                DrawCommand::Image { texture, rect } => renderer.draw_image(*texture, *rect),
            }
        }
    }
}

/// Points along an arc, `steps + 1` of them, from `start_deg` to `end_deg`
pub fn arc_points(center: Pos2, radius: f32, start_deg: f32, end_deg: f32, steps: usize) -> Vec<Pos2> {
    let steps = steps.max(1);
    (0..=steps)
        .map(|i| {
            let deg = start_deg + (end_deg - start_deg) * (i as f32 / steps as f32);
            let rad = deg.to_radians();
            Pos2::new(center.x + radius * rad.cos(), center.y + radius * rad.sin())
        })
        .collect()
}

/// Tessellation steps for an arc: one per 3°, at least 2
pub fn arc_steps(sweep_deg: f32) -> usize {
    ((sweep_deg.abs() / 3.0).ceil() as usize).max(2)
}
