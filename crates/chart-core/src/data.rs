//! Data points supplied by the host application

use serde::{Deserialize, Serialize};

use crate::color::Rgba;

/// One bar of a bar chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarDataPoint {
    pub value: f32,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub color: Rgba,
}

impl BarDataPoint {
    pub fn new(value: f32, label: impl Into<String>, color: Rgba) -> Self {
        Self {
            value,
            label: label.into(),
            color,
        }
    }
}

/// One segment of a pie chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieDataPoint {
    pub value: f32,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub color: Rgba,
    /// Whether this segment is pushed away from the center
    #[serde(default)]
    pub exploded: bool,
}

impl PieDataPoint {
    pub fn new(value: f32, label: impl Into<String>, color: Rgba) -> Self {
        Self {
            value,
            label: label.into(),
            color,
            exploded: false,
        }
    }

    pub fn exploded(mut self, exploded: bool) -> Self {
        self.exploded = exploded;
        self
    }
}

impl From<&BarDataPoint> for PieDataPoint {
    fn from(p: &BarDataPoint) -> Self {
        PieDataPoint::new(p.value, p.label.clone(), p.color)
    }
}
