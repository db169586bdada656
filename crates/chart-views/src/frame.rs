//! Per-frame registry of chart element bounds

use ahash::AHashMap;
use egui::{Id, Rect};

/// Opaque identifier of a chart or one of its elements
pub type ChartId = Id;

/// Bounds recorded during layout, looked up during the draw pass
#[derive(Debug, Default)]
pub struct ChartFrame {
    bounds: AHashMap<ChartId, Rect>,
}

impl ChartFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget last frame's bounds
    pub fn begin(&mut self) {
        self.bounds.clear();
    }

    pub fn record(&mut self, id: ChartId, rect: Rect) {
        self.bounds.insert(id, rect);
    }

    pub fn lookup(&self, id: ChartId) -> Option<Rect> {
        self.bounds.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, vec2};

    #[test]
    fn test_record_and_lookup() {
        let mut frame = ChartFrame::new();
        let id = Id::new("SalesPieChart");
        let rect = Rect::from_min_size(pos2(10.0, 20.0), vec2(600.0, 450.0));
        frame.record(id, rect);
        assert_eq!(frame.lookup(id), Some(rect));
        assert_eq!(frame.lookup(Id::new("Missing")), None);
    }

    #[test]
    fn test_begin_clears_bounds() {
        let mut frame = ChartFrame::new();
        frame.record(Id::new("a"), Rect::NOTHING);
        frame.begin();
        assert!(frame.is_empty());
    }
}
