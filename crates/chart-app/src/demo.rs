//! Demo sales data
//! Twelve months of values that scroll left once per tick

use chart_core::{named, BarDataPoint, PieDataPoint, Rgba};
use rand::Rng;

pub const MONTH_COUNT: usize = 12;

const MONTH_NAMES: [&str; MONTH_COUNT] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const BASE_VALUES: [f32; MONTH_COUNT] = [
    125.5, 142.0, 138.3, 165.7, 158.2, 175.9, 168.4, 182.1, 171.5, 195.2, 188.7, 203.4,
];

// Color of the bar at each position once the data starts moving
const POSITION_COLORS: [Rgba; MONTH_COUNT] = [
    named::BLUE,
    named::GREEN,
    named::ORANGE,
    named::RED,
    named::PURPLE,
    named::TEAL,
    named::YELLOW,
    named::PINK,
    named::BROWN,
    named::GRAY,
    named::CYAN,
    named::LIME,
];

/// Range of newly generated monthly values
const NEW_VALUE_MIN: u32 = 100;
const NEW_VALUE_MAX: u32 = 250;

/// Sales figures shared by the bar and pie charts
pub struct SalesData {
    bars: Vec<BarDataPoint>,
    pie: Vec<PieDataPoint>,
    month_index: usize,
    last_update: f64,
    interval: f64,
}

impl SalesData {
    /// Base values with alternating colors; `now` and `interval` are in seconds
    pub fn new(now: f64, interval: f64) -> Self {
        let bars: Vec<BarDataPoint> = BASE_VALUES
            .iter()
            .zip(MONTH_NAMES)
            .enumerate()
            .map(|(i, (value, month))| {
                let color = if i % 2 == 1 { named::BLUE } else { named::GREEN };
                BarDataPoint::new(*value, month, color)
            })
            .collect();
        let pie = bars.iter().map(PieDataPoint::from).collect();
        Self {
            bars,
            pie,
            month_index: 0,
            last_update: now,
            interval: interval.max(f64::EPSILON),
        }
    }

    pub fn bars(&self) -> &[BarDataPoint] {
        &self.bars
    }

    pub fn pie(&self) -> &[PieDataPoint] {
        &self.pie
    }

    /// Advance the data when a full interval has passed. Returns whether it changed.
    pub fn tick(&mut self, now: f64, rng: &mut impl Rng) -> bool {
        if now - self.last_update < self.interval {
            return false;
        }
        let value = rng.gen_range(NEW_VALUE_MIN..=NEW_VALUE_MAX) as f32;
        self.advance(value);
        self.last_update = now;
        true
    }

    /// Seconds until the next tick is due
    pub fn time_until_next_tick(&self, now: f64) -> f64 {
        (self.last_update + self.interval - now).max(0.0)
    }

    fn advance(&mut self, new_value: f32) {
        self.bars.rotate_left(1);
        if let Some(last) = self.bars.last_mut() {
            last.value = new_value;
        }

        self.month_index = (self.month_index + 1) % MONTH_COUNT;
        for (i, bar) in self.bars.iter_mut().enumerate() {
            bar.label = MONTH_NAMES[(self.month_index + i) % MONTH_COUNT].to_string();
            bar.color = POSITION_COLORS[i % MONTH_COUNT];
        }

        for (slice, bar) in self.pie.iter_mut().zip(&self.bars) {
            slice.value = bar.value;
            slice.label.clone_from(&bar.label);
            slice.color = bar.color;
        }
        tracing::trace!("Sales data advanced to month {}", self.month_index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_initial_data() {
        let data = SalesData::new(0.0, 1.0);
        assert_eq!(data.bars().len(), MONTH_COUNT);
        assert_eq!(data.bars()[0].value, 125.5);
        assert_eq!(data.bars()[0].label, "Jan");
        assert_eq!(data.bars()[0].color, named::GREEN);
        assert_eq!(data.bars()[1].color, named::BLUE);
        assert_eq!(data.pie()[11].value, 203.4);
        assert!(data.pie().iter().all(|p| !p.exploded));
    }

    #[test]
    fn test_tick_waits_for_interval() {
        let mut data = SalesData::new(10.0, 1.0);
        let mut rng = StdRng::seed_from_u64(7);
        assert!(!data.tick(10.5, &mut rng));
        assert_eq!(data.bars()[0].value, 125.5);
        assert!((data.time_until_next_tick(10.5) - 0.5).abs() < 1e-9);
        assert!(data.tick(11.0, &mut rng));
        assert!(!data.tick(11.2, &mut rng));
    }

    #[test]
    fn test_tick_shifts_and_appends() {
        let mut data = SalesData::new(0.0, 1.0);
        let mut rng = StdRng::seed_from_u64(42);
        assert!(data.tick(1.0, &mut rng));

        assert_eq!(data.bars()[0].value, 142.0);
        assert_eq!(data.bars()[10].value, 203.4);
        let appended = data.bars()[11].value;
        assert!((100.0..=250.0).contains(&appended));
        assert_eq!(appended.fract(), 0.0);

        assert_eq!(data.bars()[0].label, "Feb");
        assert_eq!(data.bars()[11].label, "Jan");
        assert_eq!(data.bars()[0].color, named::BLUE);
        assert_eq!(data.bars()[11].color, named::LIME);
    }

    #[test]
    fn test_pie_mirrors_bars() {
        let mut data = SalesData::new(0.0, 1.0);
        let mut rng = StdRng::seed_from_u64(1);
        for t in 1..=15 {
            data.tick(t as f64, &mut rng);
        }
        for (bar, slice) in data.bars().iter().zip(data.pie()) {
            assert_eq!(bar.value, slice.value);
            assert_eq!(bar.label, slice.label);
            assert_eq!(bar.color, slice.color);
        }
        // 15 ticks wrap the month rotation back to April
        assert_eq!(data.bars()[0].label, "Apr");
    }
}
