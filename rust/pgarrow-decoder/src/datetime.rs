//! Epoch and unit conversions for the server's temporal types.
//!
//! The server counts dates and timestamps from 2000-01-01, Arrow from
//! 1970-01-01. Dates and timestamps saturate instead of overflowing so that the
//! server's `infinity`/`-infinity` sentinels stay at the ends of the range.

use crate::value::Interval;

/// Days between 1970-01-01 and 2000-01-01.
pub const PG_EPOCH_DAYS: i32 = 10_957;

/// Microseconds between 1970-01-01T00:00:00Z and 2000-01-01T00:00:00Z.
pub const PG_EPOCH_MICROS: i64 = 946_684_800_000_000;

pub const MICROS_PER_SECOND: i64 = 1_000_000;

pub const MICROS_PER_DAY: i64 = 86_400_000_000;

pub const NANOS_PER_MICRO: i64 = 1_000;

#[inline]
pub fn pg_days_to_unix_days(days: i32) -> i32 {
    days.saturating_add(PG_EPOCH_DAYS)
}

#[inline]
pub fn pg_micros_to_unix_micros(micros: i64) -> i64 {
    micros.saturating_add(PG_EPOCH_MICROS)
}

/// Folds a `timetz` zone offset (seconds) into its microsecond-of-day value.
#[inline]
pub fn timetz_to_micros(micros: i64, zone_seconds: i32) -> i64 {
    micros.saturating_add(i64::from(zone_seconds) * MICROS_PER_SECOND)
}

/// Intervals saturate like timestamps, keeping the `infinity`/`-infinity`
/// intervals (`i64::MAX`/`i64::MIN` microseconds) at the ends of the range.
pub fn interval_to_month_day_nano(micros: i64, days: i32, months: i32) -> Interval {
    Interval {
        months,
        days,
        nanoseconds: micros.saturating_mul(NANOS_PER_MICRO),
    }
}

/// Legacy flattening of an interval into microseconds; months are dropped.
pub fn interval_to_duration_micros(micros: i64, days: i32) -> i64 {
    i64::from(days).saturating_mul(MICROS_PER_DAY).saturating_add(micros)
}
