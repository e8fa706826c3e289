//! Vector generation, extents and floating-point noise helpers.

use tracing::debug;

use crate::error::{PlotError, PlotResult};

/// Hard cap on values produced by [`create_vector_by_step`].
pub const MAX_VECTOR_LENGTH: usize = 1_000_000;

/// Creates `count` evenly spaced values from `start` to `end` (both inclusive).
#[must_use]
pub fn create_vector(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let denominator = (count - 1) as f64;
            (0..count)
                .map(|index| start + (end - start) * (index as f64) / denominator)
                .collect()
        }
    }
}

/// Creates values from `start` towards `end` separated by `step`.
///
/// The last value never overshoots `end` by more than floating-point noise.
/// At most [`MAX_VECTOR_LENGTH`] values are produced.
pub fn create_vector_by_step(start: f64, end: f64, step: f64) -> PlotResult<Vec<f64>> {
    if !step.is_finite() || step <= 0.0 {
        return Err(PlotError::InvalidArgument(
            "vector step must be finite and > 0".to_owned(),
        ));
    }
    if !start.is_finite() || !end.is_finite() {
        return Err(PlotError::InvalidArgument(
            "vector bounds must be finite".to_owned(),
        ));
    }

    let span_steps = ((end - start).abs() / step + 1e-9).floor();
    let count = if span_steps < MAX_VECTOR_LENGTH as f64 {
        span_steps as usize + 1
    } else {
        debug!(start, end, step, "step vector truncated at cap");
        MAX_VECTOR_LENGTH
    };
    let signed_step = if end >= start { step } else { -step };
    Ok((0..count)
        .map(|index| start + signed_step * index as f64)
        .collect())
}

/// Returns `(min, max)` of the finite values, or `None` if there are none.
#[must_use]
pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let mut extent: Option<(f64, f64)> = None;
    for &value in values.iter().filter(|value| value.is_finite()) {
        extent = Some(match extent {
            Some((min, max)) => (min.min(value), max.max(value)),
            None => (value, value),
        });
    }
    extent
}

/// Returns `(min, max)` over all finite values of a row-major grid.
#[must_use]
pub fn min_max_2d(rows: &[Vec<f64>]) -> Option<(f64, f64)> {
    rows.iter()
        .filter_map(|row| min_max(row))
        .reduce(|(min_a, max_a), (min_b, max_b)| (min_a.min(min_b), max_a.max(max_b)))
}

/// Rounds to a fixed number of decimal places.
///
/// Magnitudes beyond `1e15` carry no fractional digits and are returned unchanged.
#[must_use]
pub fn round_to_decimals(value: f64, decimals: i32) -> f64 {
    if !value.is_finite() || value.abs() >= 1e15 {
        return value;
    }
    let factor = 10_f64.powi(decimals);
    if !factor.is_finite() {
        return value;
    }
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}

/// Rounds to 15 significant digits, discarding accumulated binary noise.
#[must_use]
pub fn remove_noise(value: f64) -> f64 {
    if !value.is_finite() || value == 0.0 {
        return value;
    }
    format!("{value:.14e}").parse().unwrap_or(value)
}

/// Base-10 exponent of `value` (`floor(log10(|value|))`).
#[must_use]
pub fn exponent(value: f64) -> f64 {
    if value == 0.0 || !value.is_finite() {
        return 0.0;
    }
    let exponent = value.abs().log10().floor();
    // log10 may land just below an exact power (e.g. 1e15).
    if 10_f64.powf(exponent + 1.0) <= value.abs() {
        exponent + 1.0
    } else {
        exponent
    }
}

/// Mantissa of `value` so that `value == mantissa * 10^exponent(value)`.
#[must_use]
pub fn mantissa(value: f64) -> f64 {
    if value == 0.0 || !value.is_finite() {
        return value;
    }
    remove_noise(value / 10_f64.powf(exponent(value)))
}

/// Equality within a relative tolerance of 1e-12 (absolute below magnitude 1).
#[must_use]
pub fn approx_equal(lhs: f64, rhs: f64) -> bool {
    let scale = lhs.abs().max(rhs.abs()).max(1.0);
    (lhs - rhs).abs() <= scale * 1e-12
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_vector_is_inclusive() {
        assert_eq!(create_vector(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(create_vector(3.0, 9.0, 1), vec![3.0]);
        assert!(create_vector(3.0, 9.0, 0).is_empty());
    }

    #[test]
    fn create_vector_by_step_rejects_zero_step() {
        assert!(create_vector_by_step(0.0, 1.0, 0.0).is_err());
        assert_eq!(
            create_vector_by_step(0.0, 1.0, 0.5).expect("vector"),
            vec![0.0, 0.5, 1.0]
        );
    }

    #[test]
    fn create_vector_by_step_is_capped() {
        let values = create_vector_by_step(0.0, 1.0, 1e-300).expect("vector");
        assert_eq!(values.len(), MAX_VECTOR_LENGTH);
        assert_eq!(values[1], 1e-300);
    }

    #[test]
    fn approx_equal_is_relative_above_one() {
        assert!(approx_equal(1e15, 1e15 + 0.5));
        assert!(!approx_equal(1.0, 1.0 + 1e-9));
        assert!(approx_equal(0.0, 1e-13));
    }

    #[test]
    fn min_max_skips_undefined_values() {
        assert_eq!(min_max(&[3.0, f64::NAN, -1.0, f64::INFINITY]), Some((-1.0, 3.0)));
        assert_eq!(min_max(&[f64::NAN]), None);
    }

    #[test]
    fn remove_noise_collapses_float_accumulation() {
        assert_eq!(remove_noise(0.1 + 0.2), 0.3);
        assert_eq!(round_to_decimals(3.000_000_000_000_000_4, 14), 3.0);
    }

    #[test]
    fn exponent_and_mantissa_decompose_value() {
        assert_eq!(exponent(1234.0), 3.0);
        assert_eq!(mantissa(1234.0), 1.234);
        assert_eq!(exponent(0.05), -2.0);
        assert_eq!(exponent(1e15), 15.0);
    }
}
