//! Normalization of chart values

use crate::data::{BarDataPoint, PieDataPoint};

/// Display margin above the tallest bar
pub const AUTO_MAX_HEADROOM: f32 = 1.1;

/// Maximum used to scale bars.
///
/// An explicit `max_value > 0` wins; otherwise the largest value plus 10%.
pub fn bar_max(data: &[BarDataPoint], max_value: f32) -> f32 {
    if max_value > 0.0 {
        return max_value;
    }
    let max = data.iter().map(|p| p.value).fold(0.0f32, f32::max);
    max * AUTO_MAX_HEADROOM
}

/// Sum of all pie values; callers skip rendering when this is `<= 0`
pub fn pie_total(data: &[PieDataPoint]) -> f32 {
    data.iter().map(|p| p.value).sum()
}

/// Fraction `value / max`, or 0 for a non-positive max
pub fn ratio(value: f32, max: f32) -> f32 {
    if max > 0.0 {
        value / max
    } else {
        0.0
    }
}
