use serde::{Deserialize, Serialize};

use super::DateTimeOptions;

/// Kind-specific behavior composed into an [`super::Axis`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum AxisKind {
    #[default]
    Linear,
    Logarithmic(LogarithmicOptions),
    Category(CategoryOptions),
    /// Values are days since 1899-12-30 UTC.
    DateTime(DateTimeOptions),
    /// Values are seconds.
    TimeSpan,
    Angle(AngleOptions),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogarithmicOptions {
    pub base: f64,
    /// Extends automatic ranges outwards to whole powers of `base`.
    #[serde(default)]
    pub power_padding: bool,
}

impl Default for LogarithmicOptions {
    fn default() -> Self {
        Self {
            base: 10.0,
            power_padding: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryOptions {
    pub labels: Vec<String>,
    /// Major ticks sit on the categories instead of between them.
    #[serde(default)]
    pub is_tick_centered: bool,
    /// Gap between bars relative to the bar width.
    #[serde(default = "default_gap_width")]
    pub gap_width: f64,
}

impl CategoryOptions {
    #[must_use]
    pub fn new(labels: Vec<String>) -> Self {
        Self {
            labels,
            is_tick_centered: false,
            gap_width: default_gap_width(),
        }
    }
}

fn default_gap_width() -> f64 {
    1.0
}

/// Screen angles, in degrees counter-clockwise from the positive x-axis, that
/// the angle axis range maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngleOptions {
    pub start_angle: f64,
    pub end_angle: f64,
}

impl AngleOptions {
    #[must_use]
    pub fn is_full_circle(&self) -> bool {
        ((self.end_angle - self.start_angle).abs() - 360.0).abs() < 1e-9
    }
}

impl Default for AngleOptions {
    fn default() -> Self {
        Self {
            start_angle: 0.0,
            end_angle: 360.0,
        }
    }
}
