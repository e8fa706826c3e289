use crate::core::ticks::{DEFAULT_MAX_TICKS, TickValues};

use super::{Axis, AxisKind, CategoryOptions, is_explicit_step};

/// Upper bound on the category count derived from series data.
pub const MAX_CATEGORIES: usize = 1_000_000;

impl Axis {
    /// Labels of a category axis; empty for other kinds.
    #[must_use]
    pub fn category_labels(&self) -> &[String] {
        match &self.kind {
            AxisKind::Category(options) => &options.labels,
            _ => &[],
        }
    }

    /// Number of categories: the larger of the label count and the highest
    /// category index reported by series, the latter capped at
    /// [`MAX_CATEGORIES`].
    #[must_use]
    pub fn category_count(&self) -> usize {
        let from_labels = self.category_labels().len();
        let from_data = if self.data_maximum().is_finite() && self.data_maximum() >= 0.0 {
            (self.data_maximum().floor() as usize).min(MAX_CATEGORIES - 1) + 1
        } else {
            0
        };
        from_labels.max(from_data)
    }

    /// Width of one bar in category units, derived from the gap width.
    #[must_use]
    pub fn category_bar_width(&self) -> f64 {
        match &self.kind {
            AxisKind::Category(options) => 1.0 / (1.0 + options.gap_width.max(0.0)),
            _ => 1.0,
        }
    }

    pub(super) fn category_auto_range(&self) -> (f64, f64) {
        let count = self.category_count().max(1);
        (-0.5, count as f64 - 0.5)
    }

    pub(super) fn category_intervals(&self, length: f64) -> (f64, f64) {
        let major = if is_explicit_step(self.major_step) {
            self.major_step.round().max(1.0)
        } else {
            let range = self.actual_maximum() - self.actual_minimum();
            let spacing = self.interval_length * 0.5;
            if length > 0.0 && spacing > 0.0 {
                (range / (length / spacing)).ceil().max(1.0)
            } else {
                1.0
            }
        };
        (major.max(self.minimum_major_step), 1.0)
    }

    pub(super) fn category_tick_values(&self, options: &CategoryOptions) -> TickValues {
        let minimum = self.actual_minimum();
        let maximum = self.actual_maximum();
        let step = self.actual_major_step().max(1.0) as usize;

        let first = minimum.ceil().max(0.0) as usize;
        let last = maximum.floor();
        let mut labels = Vec::new();
        if last >= 0.0 {
            let last = last as usize;
            labels.extend(
                (first..=last)
                    .step_by(step)
                    .take(DEFAULT_MAX_TICKS)
                    .map(|index| index as f64),
            );
        }

        let major_ticks = if options.is_tick_centered {
            labels.clone()
        } else {
            let mut ticks = Vec::new();
            let mut boundary = (minimum - 0.5 - 1e-9).ceil() + 0.5;
            while boundary <= maximum + 1e-9 && ticks.len() < DEFAULT_MAX_TICKS {
                ticks.push(boundary);
                boundary += step as f64;
            }
            ticks
        };

        TickValues {
            major_labels: labels,
            major_ticks,
            minor_ticks: Vec::new(),
        }
    }

    pub(super) fn category_label(&self, options: &CategoryOptions, value: f64) -> String {
        if !value.is_finite() {
            return String::new();
        }
        let index = value.round();
        if index >= 0.0 {
            if let Some(label) = options.labels.get(index as usize) {
                return label.clone();
            }
        }
        format!("{index}")
    }
}
