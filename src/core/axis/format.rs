use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::numeric::{exponent, mantissa};

/// Built-in label formats for numeric axes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LabelFormat {
    /// Decimals follow the major step; very large or small values switch to
    /// scientific notation.
    #[default]
    Auto,
    /// Fixed number of decimals.
    Fixed(u8),
    /// Scientific notation with the given mantissa decimals.
    Scientific(u8),
    /// Value times 100 with a percent sign.
    Percent(u8),
    /// `m×10^e` notation.
    SuperExponential,
    /// Numeric axes: `{}` is replaced by the auto-formatted value.
    /// Date/time axes: a `chrono` strftime pattern.
    /// Time-span axes: `{d}`, `{h}`, `{hh}`, `{mm}`, `{ss}`, `{fff}` tokens.
    Pattern(String),
}

/// User supplied label formatter.
#[derive(Clone)]
pub struct LabelFormatter(Arc<dyn Fn(f64) -> String + Send + Sync>);

impl LabelFormatter {
    pub fn new(formatter: impl Fn(f64) -> String + Send + Sync + 'static) -> Self {
        Self(Arc::new(formatter))
    }

    #[must_use]
    pub fn format(&self, value: f64) -> String {
        (self.0)(value)
    }
}

impl fmt::Debug for LabelFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LabelFormatter(<fn>)")
    }
}

/// Formats a numeric tick value.
pub(crate) fn format_number(
    value: f64,
    format: &LabelFormat,
    use_super_exponential: bool,
    step: f64,
) -> String {
    if !value.is_finite() {
        return String::new();
    }
    let label = match format {
        LabelFormat::Auto if use_super_exponential && needs_exponent(value) => {
            super_exponential(value)
        }
        LabelFormat::Auto => auto_format(value, step),
        LabelFormat::Fixed(decimals) => format!("{value:.*}", usize::from(*decimals)),
        LabelFormat::Scientific(decimals) => format!("{value:.*e}", usize::from(*decimals)),
        LabelFormat::Percent(decimals) => {
            format!("{:.*}%", usize::from(*decimals), value * 100.0)
        }
        LabelFormat::SuperExponential => super_exponential(value),
        LabelFormat::Pattern(pattern) => pattern.replace("{}", &auto_format(value, step)),
    };
    normalize_negative_zero(label)
}

fn needs_exponent(value: f64) -> bool {
    value != 0.0 && (value.abs() >= 1e5 || value.abs() < 1e-4)
}

fn auto_format(value: f64, step: f64) -> String {
    if value == 0.0 {
        return "0".to_owned();
    }
    if value.abs() >= 1e15 || value.abs() < 1e-5 {
        return trim_scientific(&format!("{value:e}"));
    }
    format!("{value:.*}", step_decimals(step))
}

/// Smallest number of decimals that represents `step` exactly.
fn step_decimals(step: f64) -> usize {
    if !step.is_finite() || step <= 0.0 {
        return 0;
    }
    for decimals in 0..=15_i32 {
        let scaled = step * 10_f64.powi(decimals);
        if (scaled - scaled.round()).abs() <= scaled.abs() * 1e-9 {
            return decimals as usize;
        }
    }
    15
}

fn super_exponential(value: f64) -> String {
    if value == 0.0 {
        return "0".to_owned();
    }
    let power = exponent(value);
    let coefficient = mantissa(value);
    if (coefficient.abs() - 1.0).abs() < 1e-12 {
        let sign = if coefficient < 0.0 { "-" } else { "" };
        format!("{sign}10^{power}")
    } else {
        format!("{}×10^{power}", trim_decimal(format!("{coefficient:.3}")))
    }
}

fn trim_scientific(label: &str) -> String {
    match label.split_once('e') {
        Some((coefficient, power)) => format!("{}e{power}", trim_decimal(coefficient.to_owned())),
        None => label.to_owned(),
    }
}

fn trim_decimal(label: String) -> String {
    if label.contains('.') {
        label.trim_end_matches('0').trim_end_matches('.').to_owned()
    } else {
        label
    }
}

fn normalize_negative_zero(label: String) -> String {
    match label.strip_prefix('-') {
        Some(rest) if rest.chars().all(|c| matches!(c, '0' | '.' | '%')) => rest.to_owned(),
        _ => label,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_format_follows_step_decimals() {
        assert_eq!(format_number(0.25, &LabelFormat::Auto, false, 0.25), "0.25");
        assert_eq!(format_number(0.5, &LabelFormat::Auto, false, 0.25), "0.50");
        assert_eq!(format_number(20.0, &LabelFormat::Auto, false, 10.0), "20");
    }

    #[test]
    fn negative_zero_prints_as_zero() {
        assert_eq!(format_number(-0.0, &LabelFormat::Auto, false, 1.0), "0");
        assert_eq!(format_number(-0.0001, &LabelFormat::Fixed(2), false, 1.0), "0.00");
    }

    #[test]
    fn super_exponential_labels() {
        assert_eq!(format_number(1e6, &LabelFormat::SuperExponential, false, 1.0), "10^6");
        assert_eq!(
            format_number(2.5e-7, &LabelFormat::SuperExponential, false, 1.0),
            "2.5×10^-7"
        );
        assert_eq!(format_number(3e5, &LabelFormat::Auto, true, 1e5), "3×10^5");
    }

    #[test]
    fn pattern_and_percent_formats() {
        assert_eq!(
            format_number(12.0, &LabelFormat::Pattern("{} ms".to_owned()), false, 1.0),
            "12 ms"
        );
        assert_eq!(format_number(0.125, &LabelFormat::Percent(1), false, 1.0), "12.5%");
    }
}
