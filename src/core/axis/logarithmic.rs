use crate::core::numeric::remove_noise;
use crate::core::ticks::{
    DEFAULT_MAX_TICKS, TickValues, calculate_actual_interval, calculate_minor_interval,
    create_tick_values, filter_to_range,
};
use crate::error::PlotResult;

use super::{Axis, LogarithmicOptions, is_explicit_step};

/// Exponent steps tried, in order, for automatic major intervals.
const EXPONENT_STEPS: [f64; 6] = [1.0, 2.0, 3.0, 5.0, 10.0, 20.0];

impl Axis {
    /// Major step in exponent units; minor step of one exponent.
    pub(super) fn logarithmic_intervals(&self, options: LogarithmicOptions, length: f64) -> (f64, f64) {
        if is_explicit_step(self.major_step) {
            let minor = if is_explicit_step(self.minor_step) {
                self.minor_step
            } else {
                1.0
            };
            return (self.major_step.max(self.minimum_major_step), minor);
        }

        let (exponent_minimum, exponent_maximum) = self.exponent_range(options.base);
        let span = exponent_maximum - exponent_minimum;
        if whole_powers_in(exponent_minimum, exponent_maximum) < 2 {
            // Narrow ranges fall back to linear spacing in raw values.
            let major = calculate_actual_interval(
                length,
                self.interval_length,
                self.actual_maximum() - self.actual_minimum(),
            )
            .max(self.minimum_major_step);
            return (major, calculate_minor_interval(major));
        }

        let max_count = if self.interval_length > 0.0 && length > 0.0 {
            (length / self.interval_length).max(1.0)
        } else {
            1.0
        };
        let step = EXPONENT_STEPS
            .iter()
            .copied()
            .find(|step| span / step <= max_count)
            .unwrap_or_else(|| (span / max_count).ceil());
        (step.max(self.minimum_major_step), 1.0)
    }

    pub(super) fn logarithmic_tick_values(&self, options: LogarithmicOptions) -> PlotResult<TickValues> {
        let base = options.base;
        let minimum = self.actual_minimum();
        let maximum = self.actual_maximum();
        let (exponent_minimum, exponent_maximum) = self.exponent_range(base);

        if whole_powers_in(exponent_minimum, exponent_maximum) < 2 && !is_explicit_step(self.major_step) {
            return self.linear_tick_values(minimum, maximum);
        }

        let step = self.actual_major_step().max(1.0).round();
        let exponents = filter_to_range(
            create_tick_values(exponent_minimum, exponent_maximum, step, DEFAULT_MAX_TICKS)?,
            exponent_minimum,
            exponent_maximum,
        );
        let major: Vec<f64> = exponents
            .iter()
            .map(|exponent| remove_noise(base.powf(*exponent)))
            .collect();

        let mut minor = Vec::new();
        let first = exponent_minimum.floor() as i64;
        let last = exponent_maximum.ceil() as i64;
        for exponent in first..=last {
            let power = base.powf(exponent as f64);
            if step > 1.0 {
                let value = remove_noise(power);
                if in_range(value, minimum, maximum) && !major.iter().any(|m| close(*m, value)) {
                    minor.push(value);
                }
                continue;
            }
            let mut multiplier = 2.0;
            while multiplier < base - 1e-9 && minor.len() < DEFAULT_MAX_TICKS {
                let value = remove_noise(multiplier * power);
                if in_range(value, minimum, maximum) {
                    minor.push(value);
                }
                multiplier += 1.0;
            }
        }

        Ok(TickValues {
            major_labels: major.clone(),
            major_ticks: major,
            minor_ticks: minor,
        })
    }

    fn exponent_range(&self, base: f64) -> (f64, f64) {
        let log = |value: f64| value.ln() / base.ln();
        (log(self.actual_minimum()), log(self.actual_maximum()))
    }
}

/// Expands `[minimum, maximum]` outwards to whole powers of `base`.
pub(super) fn snap_to_powers(base: f64, minimum: f64, maximum: f64) -> (f64, f64) {
    let log = |value: f64| value.ln() / base.ln();
    let snapped_minimum = if minimum > 0.0 {
        base.powf(log(minimum).floor())
    } else {
        minimum
    };
    let snapped_maximum = if maximum > 0.0 {
        base.powf(log(maximum).ceil())
    } else {
        maximum
    };
    (remove_noise(snapped_minimum), remove_noise(snapped_maximum))
}

fn whole_powers_in(exponent_minimum: f64, exponent_maximum: f64) -> usize {
    let tolerance = 1e-9;
    let first = (exponent_minimum - tolerance).ceil();
    let last = (exponent_maximum + tolerance).floor();
    if last < first {
        0
    } else {
        (last - first) as usize + 1
    }
}

fn in_range(value: f64, minimum: f64, maximum: f64) -> bool {
    let tolerance = (maximum - minimum).abs() * 1e-12;
    value >= minimum - tolerance && value <= maximum + tolerance
}

fn close(lhs: f64, rhs: f64) -> bool {
    (lhs - rhs).abs() <= lhs.abs().max(rhs.abs()) * 1e-12
}
