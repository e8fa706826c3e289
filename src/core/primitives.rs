use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::{PlotError, PlotResult};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Largest day count that still maps to a representable `DateTime<Utc>`.
const MAX_DAYS_MAGNITUDE: f64 = 2_900_000.0;

pub fn decimal_to_f64(value: Decimal, field_name: &str) -> PlotResult<f64> {
    value.to_f64().ok_or_else(|| {
        PlotError::InvalidData(format!("{field_name} cannot be represented as f64"))
    })
}

/// Origin of the date axis value space: day `0.0` is 1899-12-30T00:00:00Z.
#[must_use]
pub fn date_origin() -> DateTime<Utc> {
    let date = NaiveDate::from_ymd_opt(1899, 12, 30).unwrap_or_default();
    Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap_or_default())
}

/// Converts a UTC timestamp to fractional days since [`date_origin`].
#[must_use]
pub fn datetime_to_days(time: DateTime<Utc>) -> f64 {
    let delta = time - date_origin();
    delta.num_milliseconds() as f64 / (SECONDS_PER_DAY * 1_000.0)
}

/// Converts fractional days since [`date_origin`] back to a UTC timestamp.
///
/// Returns `None` for non-finite values or values outside the calendar range.
#[must_use]
pub fn days_to_datetime(days: f64) -> Option<DateTime<Utc>> {
    if !days.is_finite() || days.abs() > MAX_DAYS_MAGNITUDE {
        return None;
    }
    let millis = (days * SECONDS_PER_DAY * 1_000.0).round() as i64;
    date_origin().checked_add_signed(Duration::milliseconds(millis))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unix_epoch_maps_to_known_day_number() {
        let epoch = DateTime::<Utc>::from_timestamp(0, 0).expect("epoch");
        assert_eq!(datetime_to_days(epoch), 25_569.0);
    }

    #[test]
    fn days_round_trip_through_datetime() {
        let time = DateTime::<Utc>::from_timestamp(1_700_000_123, 0).expect("time");
        let days = datetime_to_days(time);
        assert_eq!(days_to_datetime(days), Some(time));
    }

    #[test]
    fn non_finite_days_have_no_datetime() {
        assert_eq!(days_to_datetime(f64::NAN), None);
        assert_eq!(days_to_datetime(1e12), None);
    }
}
