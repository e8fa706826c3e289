use std::fmt::Write as _;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::core::primitives::{date_origin, days_to_datetime};
use crate::core::ticks::{
    DEFAULT_MAX_TICKS, TickValues, calculate_actual_interval, create_tick_values, filter_to_range,
};
use crate::error::PlotResult;

use super::{Axis, LabelFormat, is_explicit_step};

const SECOND: f64 = 1.0 / 86_400.0;
const MINUTE: f64 = 1.0 / 1_440.0;
const HOUR: f64 = 1.0 / 24.0;
const DAY: f64 = 1.0;
const WEEK: f64 = 7.0;
const MONTH: f64 = 30.5;
const YEAR: f64 = 365.25;

/// Candidate date/time intervals in days, smallest first.
const DATE_INTERVALS: [f64; 25] = [
    SECOND,
    2.0 * SECOND,
    5.0 * SECOND,
    10.0 * SECOND,
    30.0 * SECOND,
    MINUTE,
    2.0 * MINUTE,
    5.0 * MINUTE,
    10.0 * MINUTE,
    30.0 * MINUTE,
    HOUR,
    4.0 * HOUR,
    8.0 * HOUR,
    12.0 * HOUR,
    DAY,
    2.0 * DAY,
    5.0 * DAY,
    WEEK,
    2.0 * WEEK,
    MONTH,
    2.0 * MONTH,
    3.0 * MONTH,
    4.0 * MONTH,
    6.0 * MONTH,
    YEAR,
];

/// Candidate duration intervals in seconds, smallest first.
const TIME_SPAN_INTERVALS: [f64; 18] = [
    1.0, 2.0, 5.0, 10.0, 15.0, 30.0, 60.0, 120.0, 300.0, 600.0, 900.0, 1_800.0, 3_600.0, 7_200.0,
    14_400.0, 21_600.0, 43_200.0, 86_400.0,
];

/// Calendar unit used for date/time tick stepping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DateTimeIntervalType {
    #[default]
    Auto,
    /// Steps are taken literally in days.
    Manual,
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
    Weeks,
    Months,
    Years,
}

impl DateTimeIntervalType {
    fn from_interval(days: f64) -> Self {
        if days < SECOND - 1e-12 {
            Self::Milliseconds
        } else if days < MINUTE - 1e-12 {
            Self::Seconds
        } else if days < HOUR - 1e-12 {
            Self::Minutes
        } else if days < DAY - 1e-9 {
            Self::Hours
        } else if days < WEEK - 1e-9 {
            Self::Days
        } else if days < MONTH - 1e-9 {
            Self::Weeks
        } else if days < YEAR - 1e-9 {
            Self::Months
        } else {
            Self::Years
        }
    }

    /// Length of one unit in days.
    fn unit_days(self) -> f64 {
        match self {
            Self::Auto | Self::Manual | Self::Days => DAY,
            Self::Milliseconds => SECOND / 1_000.0,
            Self::Seconds => SECOND,
            Self::Minutes => MINUTE,
            Self::Hours => HOUR,
            Self::Weeks => WEEK,
            Self::Months => MONTH,
            Self::Years => YEAR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateTimeOptions {
    /// Unit of the major step; `Auto` picks one from the visible range.
    #[serde(default)]
    pub interval_type: DateTimeIntervalType,
    #[serde(default)]
    pub minor_interval_type: DateTimeIntervalType,
}

impl Axis {
    pub(super) fn date_time_intervals(&mut self, options: DateTimeOptions, length: f64) -> (f64, f64) {
        let range = self.actual_maximum() - self.actual_minimum();
        let (major, major_type) = match options.interval_type {
            DateTimeIntervalType::Auto => {
                let major = if is_explicit_step(self.major_step) {
                    self.major_step
                } else {
                    auto_interval(&DATE_INTERVALS, length, self.interval_length, range, YEAR)
                };
                (major, DateTimeIntervalType::from_interval(major))
            }
            DateTimeIntervalType::Manual => (
                if is_explicit_step(self.major_step) {
                    self.major_step
                } else {
                    auto_interval(&DATE_INTERVALS, length, self.interval_length, range, YEAR)
                },
                DateTimeIntervalType::Manual,
            ),
            unit => {
                let count = if is_explicit_step(self.major_step) {
                    self.major_step
                } else {
                    1.0
                };
                (count * unit.unit_days(), unit)
            }
        };
        let major = major.max(self.minimum_major_step);

        let (minor, minor_type) = match options.minor_interval_type {
            DateTimeIntervalType::Auto | DateTimeIntervalType::Manual => {
                let minor = if is_explicit_step(self.minor_step) {
                    self.minor_step
                } else {
                    subdivide(&DATE_INTERVALS, major)
                };
                (minor, DateTimeIntervalType::from_interval(minor))
            }
            unit => {
                let count = if is_explicit_step(self.minor_step) {
                    self.minor_step
                } else {
                    1.0
                };
                (count * unit.unit_days(), unit)
            }
        };

        self.state.actual_interval_type = major_type;
        self.state.actual_minor_interval_type = minor_type;
        (major, minor.max(self.minimum_minor_step))
    }

    pub(super) fn time_span_intervals(&self, length: f64) -> (f64, f64) {
        let range = self.actual_maximum() - self.actual_minimum();
        let major = if is_explicit_step(self.major_step) {
            self.major_step
        } else {
            auto_interval(&TIME_SPAN_INTERVALS, length, self.interval_length, range, 86_400.0)
        }
        .max(self.minimum_major_step);
        let minor = if is_explicit_step(self.minor_step) {
            self.minor_step
        } else {
            subdivide(&TIME_SPAN_INTERVALS, major)
        };
        (major, minor.max(self.minimum_minor_step))
    }

    pub(super) fn date_time_tick_values(&self) -> PlotResult<TickValues> {
        let minimum = self.actual_minimum();
        let maximum = self.actual_maximum();
        let major = date_ticks(
            minimum,
            maximum,
            self.actual_major_step(),
            self.state.actual_interval_type,
        )?;
        let minor_step = self.actual_minor_step();
        let minor = if is_explicit_step(minor_step) {
            date_ticks(
                minimum,
                maximum,
                minor_step,
                self.state.actual_minor_interval_type,
            )?
            .into_iter()
            .filter(|value| {
                !major
                    .iter()
                    .any(|major| (major - value).abs() <= minor_step * 1e-6)
            })
            .collect()
        } else {
            Vec::new()
        };
        Ok(TickValues {
            major_labels: major.clone(),
            major_ticks: major,
            minor_ticks: minor,
        })
    }

    pub(super) fn format_date_time(&self, value: f64) -> String {
        let Some(time) = days_to_datetime(value) else {
            return String::new();
        };
        let pattern = match &self.label_format {
            LabelFormat::Pattern(pattern) => pattern.as_str(),
            _ => match self.state.actual_interval_type {
                DateTimeIntervalType::Years => "%Y",
                DateTimeIntervalType::Months => "%b %Y",
                DateTimeIntervalType::Weeks
                | DateTimeIntervalType::Days
                | DateTimeIntervalType::Auto
                | DateTimeIntervalType::Manual => "%Y-%m-%d",
                DateTimeIntervalType::Hours | DateTimeIntervalType::Minutes => "%H:%M",
                DateTimeIntervalType::Seconds => "%H:%M:%S",
                DateTimeIntervalType::Milliseconds => "%H:%M:%S%.3f",
            },
        };
        let mut label = String::new();
        if write!(label, "{}", time.format(pattern)).is_err() {
            return time.format("%Y-%m-%d %H:%M:%S").to_string();
        }
        label
    }

    pub(super) fn format_time_span(&self, seconds: f64) -> String {
        if !seconds.is_finite() {
            return String::new();
        }
        let pattern = match &self.label_format {
            LabelFormat::Pattern(pattern) => pattern.clone(),
            _ => {
                let step = self.actual_major_step();
                if step.is_finite() && step < 1.0 {
                    "{h}:{mm}:{ss}.{fff}".to_owned()
                } else if step.is_finite() && step >= 60.0 && (step % 60.0).abs() < 1e-9 {
                    "{h}:{mm}".to_owned()
                } else {
                    "{h}:{mm}:{ss}".to_owned()
                }
            }
        };
        format_time_span_pattern(seconds, &pattern)
    }
}

/// Expands `{d}`, `{h}`, `{hh}`, `{mm}`, `{ss}` and `{fff}` in `pattern`.
///
/// `{h}` counts whole hours of the day when `{d}` is present and total hours
/// otherwise.
pub fn format_time_span_pattern(seconds: f64, pattern: &str) -> String {
    let sign = if seconds < 0.0 { "-" } else { "" };
    let total_millis = (seconds.abs() * 1_000.0).round() as u64;
    let millis = total_millis % 1_000;
    let total_seconds = total_millis / 1_000;
    let secs = total_seconds % 60;
    let minutes = (total_seconds / 60) % 60;
    let total_hours = total_seconds / 3_600;
    let days = total_hours / 24;
    let hours = if pattern.contains("{d}") {
        total_hours % 24
    } else {
        total_hours
    };

    let body = pattern
        .replace("{d}", &days.to_string())
        .replace("{hh}", &format!("{hours:02}"))
        .replace("{h}", &hours.to_string())
        .replace("{mm}", &format!("{minutes:02}"))
        .replace("{ss}", &format!("{secs:02}"))
        .replace("{fff}", &format!("{millis:03}"));
    format!("{sign}{body}")
}

/// Picks the smallest candidate interval that keeps the tick count within
/// the available space, continuing with nice multiples of `large_unit`.
fn auto_interval(
    candidates: &[f64],
    available_size: f64,
    max_interval_size: f64,
    range: f64,
    large_unit: f64,
) -> f64 {
    let range = range.abs();
    if !range.is_finite() || range <= 0.0 {
        return candidates[0];
    }
    let max_count = if available_size > 0.0 && max_interval_size > 0.0 {
        (available_size / max_interval_size).max(2.0)
    } else {
        2.0
    };
    candidates
        .iter()
        .copied()
        .find(|interval| range / interval <= max_count)
        .unwrap_or_else(|| {
            calculate_actual_interval(available_size, max_interval_size, range / large_unit)
                .ceil()
                .max(1.0)
                * large_unit
        })
}

/// Largest candidate that splits `major` into at least three parts.
fn subdivide(candidates: &[f64], major: f64) -> f64 {
    candidates
        .iter()
        .rev()
        .copied()
        .find(|candidate| *candidate < major && major / candidate >= 3.0 - 1e-9)
        .unwrap_or(major / 5.0)
}

/// Calendar-aware tick generation for a date/time axis.
fn date_ticks(
    minimum: f64,
    maximum: f64,
    step: f64,
    interval_type: DateTimeIntervalType,
) -> PlotResult<Vec<f64>> {
    if !is_explicit_step(step) {
        return Ok(Vec::new());
    }
    match interval_type {
        DateTimeIntervalType::Months => {
            let months = (step / MONTH).round().max(1.0) as u32;
            Ok(calendar_ticks(minimum, maximum, months, false))
        }
        DateTimeIntervalType::Years => {
            let years = (step / YEAR).round().max(1.0) as u32;
            Ok(calendar_ticks(minimum, maximum, years * 12, true))
        }
        _ => Ok(filter_to_range(
            create_tick_values(minimum, maximum, step, DEFAULT_MAX_TICKS)?,
            minimum,
            maximum,
        )),
    }
}

/// Ticks on the first day of every `months`-th month (aligned to years when
/// `align_to_years`).
fn calendar_ticks(minimum: f64, maximum: f64, months: u32, align_to_years: bool) -> Vec<f64> {
    let (Some(start), Some(_)) = (days_to_datetime(minimum), days_to_datetime(maximum)) else {
        return Vec::new();
    };
    let origin = date_origin().date_naive();
    let start = start.date_naive();
    let first = if align_to_years {
        let years = (months / 12).max(1) as i32;
        let year = start.year().div_euclid(years) * years;
        NaiveDate::from_ymd_opt(year, 1, 1)
    } else {
        let month_index = start.month0() - start.month0() % months.min(12);
        NaiveDate::from_ymd_opt(start.year(), month_index + 1, 1)
    };
    let Some(mut date) = first else {
        return Vec::new();
    };

    let mut ticks = Vec::new();
    while ticks.len() < DEFAULT_MAX_TICKS {
        let value = (date - origin).num_days() as f64;
        if value > maximum + 1e-9 {
            break;
        }
        if value >= minimum - 1e-9 {
            ticks.push(value);
        }
        match date.checked_add_months(Months::new(months)) {
            Some(next) => date = next,
            None => break,
        }
    }
    ticks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_span_pattern_expands_tokens() {
        assert_eq!(format_time_span_pattern(3_723.5, "{h}:{mm}:{ss}.{fff}"), "1:02:03.500");
        assert_eq!(format_time_span_pattern(90_000.0, "{d}d {hh}h"), "1d 01h");
        assert_eq!(format_time_span_pattern(-60.0, "{h}:{mm}"), "-0:01");
    }

    #[test]
    fn interval_type_classification() {
        assert_eq!(DateTimeIntervalType::from_interval(HOUR), DateTimeIntervalType::Hours);
        assert_eq!(DateTimeIntervalType::from_interval(2.0), DateTimeIntervalType::Days);
        assert_eq!(DateTimeIntervalType::from_interval(MONTH), DateTimeIntervalType::Months);
        assert_eq!(DateTimeIntervalType::from_interval(YEAR), DateTimeIntervalType::Years);
    }

    #[test]
    fn month_ticks_land_on_first_of_month() {
        // 2024-01-15 .. 2024-04-15
        let origin = date_origin().date_naive();
        let day = |y, m, d| {
            (NaiveDate::from_ymd_opt(y, m, d).expect("date") - origin).num_days() as f64
        };
        let ticks = calendar_ticks(day(2024, 1, 15), day(2024, 4, 15), 1, false);
        assert_eq!(ticks, vec![day(2024, 2, 1), day(2024, 3, 1), day(2024, 4, 1)]);
    }
}
