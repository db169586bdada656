//! Offscreen texture cache for pie charts
//!
//! Rasterizing a pie is far more work than painting a textured quad, so each
//! chart keeps its last texture together with a hash of everything that went
//! into it. The texture is rebuilt only when that hash or the target size
//! changes.

use ahash::AHashMap;
use chart_core::{resolve_colors, ContentHasher, PieDataPoint, Rgba};
use chart_render::{RasterError, TextureStore, MIN_TEXTURE_SIDE};
use egui::Rect;

use crate::pie::{rasterize_pie, PieChartConfig};
use crate::ChartId;

/// Texture size for a pie area: twice its bounds, at least [`MIN_TEXTURE_SIDE`] per side
pub fn texture_size(pie_area: Rect) -> [usize; 2] {
    let side = |extent: f32| ((extent * 2.0).round().max(0.0) as usize).max(MIN_TEXTURE_SIDE);
    [side(pie_area.width()), side(pie_area.height())]
}

/// Hash of every input that shapes the rasterized pie.
///
/// Labels and legend or text toggles are drawn on screen and do not take part.
pub fn content_hash(config: &PieChartConfig, data: &[PieDataPoint], colors: &[Rgba]) -> u32 {
    let mut hasher = ContentHasher::new();
    for point in data {
        hasher.write_f32(point.value).write_bool(point.exploded);
    }
    hasher
        .write_f32(config.radius)
        .write_f32(config.donut_hole_radius)
        .write_u8(config.color_mode.tag())
        .write_bool(config.show_sector_lines)
        .write_f32(config.explode_distance)
        .write_f32(config.start_angle)
        .write_u32(config.sector_line_color.to_u32())
        .write_f32(config.sector_line_width);
    for color in colors {
        hasher.write_u32(color.to_u32());
    }
    hasher.finish()
}

/// Cached texture of one chart
#[derive(Debug)]
pub struct CacheEntry<H> {
    content_hash: u32,
    handle: Option<H>,
    size: [usize; 2],
    used: bool,
}

impl<H> CacheEntry<H> {
    fn empty() -> Self {
        Self {
            content_hash: 0,
            handle: None,
            size: [0, 0],
            used: false,
        }
    }

    pub fn content_hash(&self) -> u32 {
        self.content_hash
    }

    /// Texture handle; `None` until an upload succeeds
    pub fn handle(&self) -> Option<&H> {
        self.handle.as_ref()
    }

    pub fn size(&self) -> [usize; 2] {
        self.size
    }

    pub fn is_valid(&self) -> bool {
        self.handle.is_some()
    }

    fn is_fresh(&self, hash: u32, size: [usize; 2]) -> bool {
        self.handle.is_some() && self.content_hash == hash && self.size == size
    }
}

/// Pie textures keyed by chart id, owned by the host application
#[derive(Debug)]
pub struct PieCacheTable<H> {
    entries: AHashMap<ChartId, CacheEntry<H>>,
}

impl<H> Default for PieCacheTable<H> {
    fn default() -> Self {
        Self {
            entries: AHashMap::new(),
        }
    }
}

impl<H> PieCacheTable<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure the texture for `id` matches the current inputs.
    ///
    /// Cheap when nothing changed. On allocation failure the entry is left
    /// without a texture and the next call tries again.
    pub fn prepare<S>(
        &mut self,
        id: ChartId,
        config: &PieChartConfig,
        data: &[PieDataPoint],
        pie_area: Rect,
        store: &mut S,
    ) -> Result<&CacheEntry<H>, RasterError>
    where
        S: TextureStore<Handle = H>,
    {
        let size = texture_size(pie_area);
        let colors = resolve_colors(&config.color_mode, data.iter().map(|p| p.color));
        let hash = content_hash(config, data, &colors);

        let entry = self.entries.entry(id).or_insert_with(CacheEntry::empty);
        entry.used = true;
        if entry.is_fresh(hash, size) {
            return Ok(entry);
        }

        tracing::debug!(
            "Regenerating pie texture {:?}: hash {:#010x} -> {:#010x}, size {:?} -> {:?}",
            id,
            entry.content_hash,
            hash,
            entry.size,
            size
        );
        if let Some(old) = entry.handle.take() {
            store.release(old);
        }

        let image = rasterize_pie(config, data, &colors, size);
        let handle = store.allocate(&format!("pie_chart_{:?}", id), image)?;
        entry.handle = Some(handle);
        entry.content_hash = hash;
        entry.size = size;
        Ok(entry)
    }

    /// Release textures of charts that were not prepared since the last call
    pub fn end_frame<S>(&mut self, store: &mut S)
    where
        S: TextureStore<Handle = H>,
    {
        let stale: Vec<ChartId> = self
            .entries
            .iter()
            .filter(|(_, entry)| !entry.used)
            .map(|(id, _)| *id)
            .collect();
        for id in stale {
            tracing::debug!("Evicting unused pie texture {:?}", id);
            self.remove(id, store);
        }
        for entry in self.entries.values_mut() {
            entry.used = false;
        }
    }

    /// Drop one chart's entry and release its texture
    pub fn remove<S>(&mut self, id: ChartId, store: &mut S)
    where
        S: TextureStore<Handle = H>,
    {
        if let Some(handle) = self.entries.remove(&id).and_then(|entry| entry.handle) {
            store.release(handle);
        }
    }

    /// Release every texture
    pub fn clear<S>(&mut self, store: &mut S)
    where
        S: TextureStore<Handle = H>,
    {
        if !self.entries.is_empty() {
            tracing::info!("Releasing {} cached pie textures", self.entries.len());
        }
        for (_, entry) in self.entries.drain() {
            if let Some(handle) = entry.handle {
                store.release(handle);
            }
        }
    }

    pub fn get(&self, id: ChartId) -> Option<&CacheEntry<H>> {
        self.entries.get(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chart_core::{named, ColorMode};
    use chart_render::check_texture_size;
    use egui::{pos2, vec2, ColorImage, TextureId};

    /// Stand-in texture store that counts uploads and releases
    #[derive(Default)]
    struct CountingStore {
        next: u64,
        allocated: usize,
        released: Vec<u64>,
        max_side: Option<usize>,
    }

    impl TextureStore for CountingStore {
        type Handle = u64;

        fn allocate(&mut self, _name: &str, image: ColorImage) -> Result<u64, RasterError> {
            if let Some(max) = self.max_side {
                check_texture_size(image.size, max)?;
            }
            self.next += 1;
            self.allocated += 1;
            Ok(self.next)
        }

        fn release(&mut self, handle: u64) {
            self.released.push(handle);
        }

        fn texture_id(&self, handle: &u64) -> TextureId {
            TextureId::User(*handle)
        }
    }

    fn data() -> Vec<PieDataPoint> {
        vec![
            PieDataPoint::new(30.0, "A", named::BLUE),
            PieDataPoint::new(50.0, "B", named::GREEN),
            PieDataPoint::new(20.0, "C", named::ORANGE),
        ]
    }

    fn colors(data: &[PieDataPoint]) -> Vec<Rgba> {
        data.iter().map(|p| p.color).collect()
    }

    fn area() -> Rect {
        Rect::from_min_size(pos2(20.0, 20.0), vec2(260.0, 260.0))
    }

    #[test]
    fn test_texture_size_doubles_with_minimum() {
        assert_eq!(texture_size(area()), [520, 520]);
        assert_eq!(texture_size(Rect::from_min_size(pos2(0.0, 0.0), vec2(10.0, 100.0))), [128, 200]);
        assert_eq!(texture_size(Rect::NOTHING), [128, 128]);
    }

    #[test]
    fn test_unchanged_inputs_allocate_once() {
        let mut cache = PieCacheTable::new();
        let mut store = CountingStore::default();
        let id = ChartId::new("pie");
        let config = PieChartConfig::default();

        let first = cache.prepare(id, &config, &data(), area(), &mut store).unwrap().content_hash();
        let second = cache.prepare(id, &config, &data(), area(), &mut store).unwrap().content_hash();
        assert_eq!(first, second);
        assert_eq!(store.allocated, 1);
        assert!(store.released.is_empty());
    }

    #[test]
    fn test_value_change_regenerates() {
        let mut cache = PieCacheTable::new();
        let mut store = CountingStore::default();
        let id = ChartId::new("pie");
        let config = PieChartConfig::default();
        let mut points = data();

        cache.prepare(id, &config, &points, area(), &mut store).unwrap();
        points[1].value = 55.0;
        let entry = cache.prepare(id, &config, &points, area(), &mut store).unwrap();
        assert_eq!(entry.handle(), Some(&2));
        assert_eq!(store.allocated, 2);
        assert_eq!(store.released, vec![1]);
    }

    #[test]
    fn test_label_change_keeps_texture() {
        let mut cache = PieCacheTable::new();
        let mut store = CountingStore::default();
        let id = ChartId::new("pie");
        let config = PieChartConfig::default();
        let mut points = data();

        cache.prepare(id, &config, &points, area(), &mut store).unwrap();
        points[0].label = "Renamed".to_string();
        cache.prepare(id, &config, &points, area(), &mut store).unwrap();
        assert_eq!(store.allocated, 1);
    }

    #[test]
    fn test_size_change_regenerates() {
        let mut cache = PieCacheTable::new();
        let mut store = CountingStore::default();
        let id = ChartId::new("pie");
        let config = PieChartConfig::default();

        cache.prepare(id, &config, &data(), area(), &mut store).unwrap();
        let bigger = Rect::from_min_size(pos2(20.0, 20.0), vec2(300.0, 300.0));
        let entry = cache.prepare(id, &config, &data(), bigger, &mut store).unwrap();
        assert_eq!(entry.size(), [600, 600]);
        assert_eq!(store.allocated, 2);
    }

    #[test]
    fn test_allocation_failure_recovers() {
        let mut cache = PieCacheTable::new();
        let mut store = CountingStore {
            max_side: Some(256),
            ..Default::default()
        };
        let id = ChartId::new("pie");
        let config = PieChartConfig::default();

        let err = cache.prepare(id, &config, &data(), area(), &mut store).unwrap_err();
        assert!(matches!(err, RasterError::TooLarge { max: 256, .. }));
        assert!(!cache.get(id).unwrap().is_valid());

        store.max_side = None;
        let entry = cache.prepare(id, &config, &data(), area(), &mut store).unwrap();
        assert!(entry.is_valid());
        assert_eq!(store.allocated, 1);
    }

    #[test]
    fn test_end_frame_evicts_unused_entries() {
        let mut cache = PieCacheTable::new();
        let mut store = CountingStore::default();
        let config = PieChartConfig::default();
        let kept = ChartId::new("kept");
        let dropped = ChartId::new("dropped");

        cache.prepare(kept, &config, &data(), area(), &mut store).unwrap();
        cache.prepare(dropped, &config, &data(), area(), &mut store).unwrap();
        cache.end_frame(&mut store);
        assert_eq!(cache.len(), 2);

        cache.prepare(kept, &config, &data(), area(), &mut store).unwrap();
        cache.end_frame(&mut store);
        assert_eq!(cache.len(), 1);
        assert!(cache.get(kept).is_some());
        assert_eq!(store.released.len(), 1);
    }

    #[test]
    fn test_clear_releases_everything() {
        let mut cache = PieCacheTable::new();
        let mut store = CountingStore::default();
        let config = PieChartConfig::default();
        cache.prepare(ChartId::new("a"), &config, &data(), area(), &mut store).unwrap();
        cache.prepare(ChartId::new("b"), &config, &data(), area(), &mut store).unwrap();
        cache.clear(&mut store);
        assert!(cache.is_empty());
        assert_eq!(store.released.len(), 2);
    }

    #[test]
    fn test_hash_is_pure() {
        let config = PieChartConfig::default();
        let points = data();
        assert_eq!(
            content_hash(&config, &points, &colors(&points)),
            content_hash(&config, &points, &colors(&points))
        );
    }

    #[test]
    fn test_hash_sensitivity() {
        let base_config = PieChartConfig::default();
        let points = data();
        let base = content_hash(&base_config, &points, &colors(&points));

        let mut exploded = data();
        exploded[2].exploded = true;
        assert_ne!(base, content_hash(&base_config, &exploded, &colors(&exploded)));

        let variants = [
            PieChartConfig {
                radius: 100.0,
                ..Default::default()
            },
            PieChartConfig {
                donut_hole_radius: 50.0,
                ..Default::default()
            },
            PieChartConfig {
                show_sector_lines: false,
                ..Default::default()
            },
            PieChartConfig {
                start_angle: 0.0,
                ..Default::default()
            },
            PieChartConfig {
                color_mode: ColorMode::Gradient {
                    start: named::BLUE,
                    end: named::ORANGE,
                },
                ..Default::default()
            },
        ];
        for config in &variants {
            assert_ne!(base, content_hash(config, &points, &colors(&points)));
        }

        let recolored = vec![named::RED, named::GREEN, named::ORANGE];
        assert_ne!(base, content_hash(&base_config, &points, &recolored));

        let legend_off = PieChartConfig {
            show_legend: false,
            show_labels: true,
            ..Default::default()
        };
        assert_eq!(base, content_hash(&legend_off, &points, &colors(&points)));
    }

    #[test]
    fn test_view_draw_pass_uses_recorded_area() {
        use crate::{ChartFrame, PieChartView};
        use chart_render::DrawCommand;

        let view = PieChartView::new(ChartId::new("SalesPieChart"), "Sales Distribution".to_string());
        let mut cache = PieCacheTable::new();
        let mut store = CountingStore::default();
        let mut frame = ChartFrame::new();

        // Nothing recorded yet: skipped without touching the cache
        assert!(view.draw_commands(&frame, &mut cache, &mut store, &data()).is_empty());
        assert!(cache.is_empty());

        frame.record(view.area_id(), area());
        let list = view.draw_commands(&frame, &mut cache, &mut store, &data());
        assert_eq!(
            list.iter().next(),
            Some(&DrawCommand::Image {
                texture: TextureId::User(1),
                rect: area(),
            })
        );

        // Empty data is a no-op
        assert!(view.draw_commands(&frame, &mut cache, &mut store, &[]).is_empty());
        assert_eq!(store.allocated, 1);
    }
}
