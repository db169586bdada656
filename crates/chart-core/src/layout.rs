//! Growth-box layout along a single axis
//!
//! Items in a row (or column) are either sized on their own (fixed, fit to
//! content, percent of the container) or share whatever space is left in
//! proportion to a grow weight. This is the subset of a flex model the
//! charts need to place bars, gap spacers and legend rows.

use egui::{Pos2, Rect, Vec2};

/// Main-axis sizing rule of one box
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sizing {
    /// Exactly this many pixels
    Fixed(f32),
    /// Size of the content, as measured by the caller
    Fit(f32),
    /// Fraction (`0.0..=1.0`) of the available extent
    Percent(f32),
    /// Share of the remaining extent, proportional to the weight
    Grow(f32),
}

/// Position of a box along the axis, relative to the container start
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Span {
    pub offset: f32,
    pub size: f32,
}

impl Span {
    pub fn end(&self) -> f32 {
        self.offset + self.size
    }

    pub fn center(&self) -> f32 {
        self.offset + self.size / 2.0
    }
}

/// Child alignment inside a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Start,
    Center,
    End,
}

impl Align {
    /// Offset that places `used` pixels inside `container` pixels
    pub fn offset(self, container: f32, used: f32) -> f32 {
        let free = (container - used).max(0.0);
        match self {
            Align::Start => 0.0,
            Align::Center => free / 2.0,
            Align::End => free,
        }
    }
}

/// Lay out `items` along an axis of length `available` with `gap` between
/// consecutive items.
pub fn layout_axis(available: f32, gap: f32, items: &[Sizing]) -> Vec<Span> {
    if items.is_empty() {
        return Vec::new();
    }

    let gaps = gap * (items.len() - 1) as f32;
    let mut claimed = 0.0;
    let mut total_weight = 0.0;
    for item in items {
        match *item {
            Sizing::Fixed(px) | Sizing::Fit(px) => claimed += px.max(0.0),
            Sizing::Percent(f) => claimed += (f * available).max(0.0),
            Sizing::Grow(w) => total_weight += grow_weight(w),
        }
    }
    let remainder = (available - claimed - gaps).max(0.0);

    let mut spans = Vec::with_capacity(items.len());
    let mut cursor = 0.0;
    for item in items {
        let size = match *item {
            Sizing::Fixed(px) | Sizing::Fit(px) => px.max(0.0),
            Sizing::Percent(f) => (f * available).max(0.0),
            Sizing::Grow(w) => {
                if total_weight > 0.0 {
                    remainder * grow_weight(w) / total_weight
                } else {
                    0.0
                }
            }
        };
        spans.push(Span { offset: cursor, size });
        cursor += size + gap;
    }
    spans
}

/// Extent covered by a packed run of spans
pub fn used_extent(spans: &[Span]) -> f32 {
    spans.last().map(|s| s.end()).unwrap_or(0.0)
}

fn grow_weight(w: f32) -> f32 {
    if w > 0.0 {
        w
    } else {
        1.0
    }
}

/// Rectangle of `size` placed inside `container` with the given alignment
pub fn align_rect(container: Rect, size: Vec2, x: Align, y: Align) -> Rect {
    let min = Pos2::new(
        container.min.x + x.offset(container.width(), size.x),
        container.min.y + y.offset(container.height(), size.y),
    );
    Rect::from_min_size(min, size)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_grow_boxes_share_by_weight() {
        let spans = layout_axis(900.0, 0.0, &[Sizing::Grow(4.0), Sizing::Grow(1.0), Sizing::Grow(4.0)]);
        assert!(close(spans[0].size, 400.0));
        assert!(close(spans[1].size, 100.0));
        assert!(close(spans[2].size, 400.0));
        assert!(close(spans[2].offset, 500.0));
    }

    #[test]
    fn test_fixed_and_grow_mix() {
        let spans = layout_axis(300.0, 10.0, &[Sizing::Fixed(80.0), Sizing::Grow(1.0), Sizing::Fit(50.0)]);
        assert!(close(spans[0].size, 80.0));
        // 300 - 80 - 50 - 2 * 10
        assert!(close(spans[1].size, 150.0));
        assert!(close(spans[1].offset, 90.0));
        assert!(close(spans[2].offset, 250.0));
        assert!(close(used_extent(&spans), 300.0));
    }

    #[test]
    fn test_percent_of_available() {
        let spans = layout_axis(200.0, 0.0, &[Sizing::Percent(0.5), Sizing::Percent(0.25)]);
        assert!(close(spans[0].size, 100.0));
        assert!(close(spans[1].size, 50.0));
    }

    #[test]
    fn test_overflow_clamps_grow_to_zero() {
        let spans = layout_axis(50.0, 0.0, &[Sizing::Fixed(80.0), Sizing::Grow(1.0)]);
        assert_eq!(spans[1].size, 0.0);
    }

    #[test]
    fn test_zero_weight_counts_as_one() {
        let spans = layout_axis(100.0, 0.0, &[Sizing::Grow(0.0), Sizing::Grow(1.0)]);
        assert!(close(spans[0].size, 50.0));
    }

    #[test]
    fn test_align_rect_center() {
        let container = Rect::from_min_size(Pos2::ZERO, Vec2::new(100.0, 50.0));
        let r = align_rect(container, Vec2::new(20.0, 10.0), Align::Center, Align::End);
        assert_eq!(r.min, Pos2::new(40.0, 40.0));
    }
}
