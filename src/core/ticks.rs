//! Tick and interval calculation shared by all axis kinds.

use tracing::debug;

use crate::core::numeric::{remove_noise, round_to_decimals};
use crate::error::{PlotError, PlotResult};

/// Hard cap on generated tick values per call.
pub const DEFAULT_MAX_TICKS: usize = 1000;

/// Upper bound on halving iterations in [`calculate_actual_interval`].
const MAX_INTERVAL_ITERATIONS: usize = 1000;

/// Tick positions produced for one render pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickValues {
    /// Values that receive a label.
    pub major_labels: Vec<f64>,
    /// Values where a major tick/gridline is drawn.
    pub major_ticks: Vec<f64>,
    /// Values where a minor tick/gridline is drawn.
    pub minor_ticks: Vec<f64>,
}

/// Creates tick values from `from` to `to` separated by `step`.
///
/// The sign of `step` is ignored: when `to < from` iteration walks downwards.
/// The first value is the multiple of `step` at or before `from`, iteration
/// stops once a value passes `to` by more than `step * 1e-3`, and at most
/// `max_ticks` values are produced. Each value is re-rounded on the step grid
/// so accumulated binary noise never reaches the labels.
pub fn create_tick_values(from: f64, to: f64, step: f64, max_ticks: usize) -> PlotResult<Vec<f64>> {
    if !step.is_finite() || step <= 0.0 {
        return Err(PlotError::InvalidArgument(format!(
            "tick step must be finite and > 0, got {step}"
        )));
    }
    if !from.is_finite() || !to.is_finite() {
        return Err(PlotError::InvalidArgument(
            "tick range must be finite".to_owned(),
        ));
    }

    let step = if to < from { -step } else { step };
    let epsilon = step.abs() * 1e-3;

    let quotient = from / step;
    let nearest = quotient.round();
    let start_index = if (quotient - nearest).abs() <= 1e-9 {
        nearest
    } else {
        quotient.floor()
    };
    let start_value = start_index * step;

    let mut values = Vec::new();
    for k in 0..max_ticks {
        let value = start_value + step * k as f64;
        let past_end = if step > 0.0 {
            value > to + epsilon
        } else {
            value < to - epsilon
        };
        if past_end {
            return Ok(values);
        }
        values.push(remove_noise(round_to_decimals(value / step, 14) * step));
    }

    debug!(from, to, step, max_ticks, "tick generation truncated at cap");
    Ok(values)
}

/// Chooses a "nice" interval (1, 2 or 5 times a power of ten) so that
/// `range / interval` does not exceed `available_size / max_interval_size`.
#[must_use]
pub fn calculate_actual_interval(available_size: f64, max_interval_size: f64, range: f64) -> f64 {
    let range = range.abs();
    if !range.is_finite() || range <= 0.0 {
        return 1.0;
    }
    if !available_size.is_finite() || available_size <= 0.0 {
        return range;
    }
    if !max_interval_size.is_finite() || max_interval_size <= 0.0 {
        return range;
    }

    let exponent = |x: f64| x.log10().ceil();
    let mantissa = |x: f64| x / 10_f64.powf(exponent(x) - 1.0);

    let max_interval_count = available_size / max_interval_size;
    let mut interval = 10_f64.powf(exponent(range));
    let mut candidate = interval;

    for _ in 0..MAX_INTERVAL_ITERATIONS {
        let leading = remove_noise(mantissa(candidate)) as i64;
        candidate = if leading == 5 {
            remove_noise(candidate / 2.5)
        } else {
            remove_noise(candidate / 2.0)
        };

        if !candidate.is_finite() || candidate <= 0.0 {
            break;
        }
        if range / candidate > max_interval_count {
            break;
        }
        interval = candidate;
    }

    interval
}

/// Chooses a minor interval that subdivides `major_interval` evenly.
#[must_use]
pub fn calculate_minor_interval(major_interval: f64) -> f64 {
    if !major_interval.is_finite() || major_interval <= 0.0 {
        return major_interval;
    }
    let exponent = major_interval.log10().ceil();
    let leading = remove_noise(major_interval / 10_f64.powf(exponent - 1.0)).round() as i64;
    match leading {
        2 => major_interval / 4.0,
        _ => major_interval / 5.0,
    }
}

/// Keeps the values within `[min, max]`, tolerating relative float noise.
#[must_use]
pub fn filter_to_range(values: Vec<f64>, min: f64, max: f64) -> Vec<f64> {
    let (low, high) = if min <= max { (min, max) } else { (max, min) };
    let tolerance = (high - low).abs() * 1e-9;
    values
        .into_iter()
        .filter(|value| *value >= low - tolerance && *value <= high + tolerance)
        .collect()
}
