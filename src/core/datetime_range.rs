//! Calendar-aware interval resolution for datetime axes.
//!
//! Datetime values are unix seconds. Year and month steps go through chrono
//! so month lengths and leap years are respected; shorter units are fixed
//! second counts.

use chrono::{DateTime, Datelike, Months, NaiveDate, TimeZone, Timelike, Utc};

use crate::core::axis::{AxisConfig, DateTimeIntervalType, RangePadding};
use crate::core::double_range::AxisRange;
use crate::core::numeric_range::numeric_interval;
use crate::core::primitives::{datetime_to_unix_seconds, unix_seconds_to_datetime};
use crate::core::types::Size;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Picks the interval and its unit for a datetime span.
///
/// `Auto` walks from years down to seconds and keeps the first unit whose
/// nice interval is at least one whole unit.
#[must_use]
pub fn datetime_interval(
    config: &AxisConfig,
    start: f64,
    end: f64,
    size: Size,
) -> (f64, DateTimeIntervalType) {
    let total_days = ((end - start) / SECONDS_PER_DAY).abs();
    let interval_for = |unit: DateTimeIntervalType| -> f64 {
        numeric_interval(config, total_days * units_per_day(unit), size)
    };

    match config.interval_type {
        DateTimeIntervalType::Auto => {
            for unit in [
                DateTimeIntervalType::Years,
                DateTimeIntervalType::Months,
                DateTimeIntervalType::Days,
                DateTimeIntervalType::Hours,
                DateTimeIntervalType::Minutes,
            ] {
                let interval = interval_for(unit);
                if interval >= 1.0 {
                    return (interval, unit);
                }
            }
            (
                interval_for(DateTimeIntervalType::Seconds),
                DateTimeIntervalType::Seconds,
            )
        }
        unit => (interval_for(unit), unit),
    }
}

fn units_per_day(unit: DateTimeIntervalType) -> f64 {
    match unit {
        DateTimeIntervalType::Years => 1.0 / 365.0,
        DateTimeIntervalType::Months => 1.0 / 30.0,
        DateTimeIntervalType::Auto | DateTimeIntervalType::Days => 1.0,
        DateTimeIntervalType::Hours => 24.0,
        DateTimeIntervalType::Minutes => 24.0 * 60.0,
        DateTimeIntervalType::Seconds => SECONDS_PER_DAY,
    }
}

fn unit_seconds(unit: DateTimeIntervalType) -> f64 {
    SECONDS_PER_DAY / units_per_day(unit)
}

/// Advances `value` by `interval` units of `unit`.
///
/// Calendar units are rounded to at least one whole month/year. Values that
/// chrono cannot represent fall back to fixed-length arithmetic.
#[must_use]
pub fn increase_datetime(value: f64, interval: f64, unit: DateTimeIntervalType) -> f64 {
    if let Some(months) = calendar_months(interval, unit) {
        if let Some(next) = unix_seconds_to_datetime(value)
            .and_then(|time| time.checked_add_months(Months::new(months)))
        {
            return datetime_to_unix_seconds(next);
        }
    }
    value + interval * unit_seconds(unit)
}

/// Floors `value` to the start of its `unit` (Jan 1st, 1st of month, midnight...).
#[must_use]
pub fn floor_datetime(value: f64, unit: DateTimeIntervalType) -> f64 {
    let Some(time) = unix_seconds_to_datetime(value) else {
        return value;
    };
    let floored = match unit {
        DateTimeIntervalType::Years => start_of_day(time.year(), 1, 1),
        DateTimeIntervalType::Months => start_of_day(time.year(), time.month(), 1),
        DateTimeIntervalType::Auto | DateTimeIntervalType::Days => {
            start_of_day(time.year(), time.month(), time.day())
        }
        DateTimeIntervalType::Hours => time
            .with_minute(0)
            .and_then(|t| t.with_second(0))
            .and_then(|t| t.with_nanosecond(0)),
        DateTimeIntervalType::Minutes => time.with_second(0).and_then(|t| t.with_nanosecond(0)),
        DateTimeIntervalType::Seconds => time.with_nanosecond(0),
    };
    floored.map(datetime_to_unix_seconds).unwrap_or(value)
}

fn calendar_months(interval: f64, unit: DateTimeIntervalType) -> Option<u32> {
    let whole = interval.abs().round().max(1.0).min(f64::from(u32::MAX / 12)) as u32;
    match unit {
        DateTimeIntervalType::Years => Some(whole * 12),
        DateTimeIntervalType::Months => Some(whole),
        _ => None,
    }
}

fn start_of_day(year: i32, month: u32, day: u32) -> Option<DateTime<Utc>> {
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?))
}

/// Applies `Round`/`Additional` padding in whole calendar units.
///
/// `Normal` has no calendar meaning and leaves the range unchanged, as does
/// `None`.
#[must_use]
pub fn pad_datetime_range(
    padding: RangePadding,
    start: f64,
    end: f64,
    interval: f64,
    unit: DateTimeIntervalType,
) -> AxisRange {
    match padding {
        RangePadding::Round | RangePadding::Additional => {
            let mut min = floor_datetime(start, unit);
            let floored_end = floor_datetime(end, unit);
            let mut max = if floored_end < end {
                increase_datetime(floored_end, 1.0, unit)
            } else {
                floored_end
            };
            if padding == RangePadding::Additional {
                min = decrease_datetime(min, interval, unit);
                max = increase_datetime(max, interval, unit);
            }
            AxisRange::new(min, max, interval)
        }
        RangePadding::Auto | RangePadding::None | RangePadding::Normal => {
            AxisRange::new(start, end, interval)
        }
    }
}

fn decrease_datetime(value: f64, interval: f64, unit: DateTimeIntervalType) -> f64 {
    if let Some(months) = calendar_months(interval, unit) {
        if let Some(previous) = unix_seconds_to_datetime(value)
            .and_then(|time| time.checked_sub_months(Months::new(months)))
        {
            return datetime_to_unix_seconds(previous);
        }
    }
    value - interval * unit_seconds(unit)
}

/// Default chrono pattern for labels of the given unit.
#[must_use]
pub fn default_datetime_pattern(unit: DateTimeIntervalType) -> &'static str {
    match unit {
        DateTimeIntervalType::Years => "%Y",
        DateTimeIntervalType::Months => "%b %Y",
        DateTimeIntervalType::Auto | DateTimeIntervalType::Days => "%b %d",
        DateTimeIntervalType::Hours | DateTimeIntervalType::Minutes => "%H:%M",
        DateTimeIntervalType::Seconds => "%H:%M:%S",
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::{floor_datetime, increase_datetime, pad_datetime_range};
    use crate::core::axis::{DateTimeIntervalType, RangePadding};
    use crate::core::primitives::datetime_to_unix_seconds;

    fn seconds(year: i32, month: u32, day: u32, hour: u32) -> f64 {
        datetime_to_unix_seconds(Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap())
    }

    #[test]
    fn month_steps_follow_calendar_lengths() {
        let jan = seconds(2024, 1, 31, 0);
        let next = increase_datetime(jan, 1.0, DateTimeIntervalType::Months);
        assert_eq!(next, seconds(2024, 2, 29, 0));
    }

    #[test]
    fn floor_to_year_lands_on_january_first() {
        let value = seconds(2023, 7, 14, 13);
        assert_eq!(
            floor_datetime(value, DateTimeIntervalType::Years),
            seconds(2023, 1, 1, 0)
        );
    }

    #[test]
    fn round_padding_covers_whole_days() {
        let range = pad_datetime_range(
            RangePadding::Round,
            seconds(2024, 3, 1, 6),
            seconds(2024, 3, 4, 18),
            1.0,
            DateTimeIntervalType::Days,
        );
        assert_eq!(range.min, seconds(2024, 3, 1, 0));
        assert_eq!(range.max, seconds(2024, 3, 5, 0));
    }

    #[test]
    fn additional_padding_adds_one_interval_each_side() {
        let range = pad_datetime_range(
            RangePadding::Additional,
            seconds(2024, 3, 1, 6),
            seconds(2024, 3, 4, 18),
            1.0,
            DateTimeIntervalType::Days,
        );
        assert_eq!(range.min, seconds(2024, 2, 29, 0));
        assert_eq!(range.max, seconds(2024, 3, 6, 0));
    }
}
