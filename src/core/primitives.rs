use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::{ChartError, ChartResult};

pub fn decimal_to_f64(value: Decimal, field_name: &str) -> ChartResult<f64> {
    value.to_f64().ok_or_else(|| {
        ChartError::InvalidData(format!("{field_name} cannot be represented as f64"))
    })
}

#[must_use]
pub fn datetime_to_unix_seconds(time: DateTime<Utc>) -> f64 {
    time.timestamp_millis() as f64 / 1000.0
}

/// Converts unix seconds back into a UTC timestamp.
///
/// Returns `None` for non-finite or out-of-range input.
#[must_use]
pub fn unix_seconds_to_datetime(seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() {
        return None;
    }
    let millis = (seconds * 1000.0).round();
    if millis > i64::MAX as f64 || millis < i64::MIN as f64 {
        return None;
    }
    DateTime::<Utc>::from_timestamp_millis(millis as i64)
}

/// Logarithm of `value` in `base`.
#[must_use]
pub fn log_base(value: f64, base: f64) -> f64 {
    value.ln() / base.ln()
}

#[must_use]
pub fn approx_equal(lhs: f64, rhs: f64) -> bool {
    let scale = lhs.abs().max(rhs.abs()).max(1.0);
    (lhs - rhs).abs() <= scale * 1e-12
}

/// Number of fractional digits needed to print `value` without noise.
///
/// Capped at 10 so binary float artifacts (`0.1 + 0.2`) do not leak into labels.
#[must_use]
pub fn fractional_digits(value: f64) -> usize {
    if !value.is_finite() {
        return 0;
    }
    let mut scaled = value.abs();
    for digits in 0..10 {
        if (scaled - scaled.round()).abs() <= 1e-9 * scaled.max(1.0) {
            return digits;
        }
        scaled *= 10.0;
    }
    10
}

#[cfg(test)]
mod tests {
    use super::{fractional_digits, log_base, unix_seconds_to_datetime};

    #[test]
    fn fractional_digits_ignores_float_noise() {
        assert_eq!(fractional_digits(2.0), 0);
        assert_eq!(fractional_digits(2.5), 1);
        assert_eq!(fractional_digits(0.25), 2);
        assert_eq!(fractional_digits(0.1 + 0.2), 1);
    }

    #[test]
    fn log_base_uses_requested_base() {
        assert!((log_base(1000.0, 10.0) - 3.0).abs() <= 1e-12);
        assert!((log_base(8.0, 2.0) - 3.0).abs() <= 1e-12);
    }

    #[test]
    fn non_finite_seconds_have_no_datetime() {
        assert!(unix_seconds_to_datetime(f64::NAN).is_none());
        assert!(unix_seconds_to_datetime(0.0).is_some());
    }
}
