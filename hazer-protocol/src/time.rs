//! Time conversions: NMEA UTC-of-day/date fields, and the Garmin-epoch
//! arithmetic CPO-PVT needs to reach a POSIX-based nanosecond timestamp.
//! Calendar arithmetic is delegated to `chrono`, matching the teacher's own
//! use of `chrono::NaiveDate`/`NaiveDateTime` for UBX time fields.

use chrono::{Duration, NaiveDate, NaiveDateTime};

/// Sentinel for an unset UTC-of-day or D/M/Y nanosecond field (spec's
/// "all-ones" sentinel).
pub const UNSET_NANOSECONDS: u64 = u64::MAX;

const NANOS_PER_SECOND: u64 = 1_000_000_000;

const POSIX_EPOCH_YMD: (i32, u32, u32) = (1970, 1, 1);

fn posix_epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(POSIX_EPOCH_YMD.0, POSIX_EPOCH_YMD.1, POSIX_EPOCH_YMD.2)
        .expect("1970-01-01 is a valid date")
        .and_hms_opt(0, 0, 0)
        .expect("midnight is a valid time")
}

/// Parses an NMEA `hhmmss[.ss]` field into nanoseconds since midnight UTC.
pub fn parse_utc_of_day(field: &str) -> Option<u64> {
    if field.len() < 6 {
        return None;
    }
    let hh: u64 = field[0..2].parse().ok()?;
    let mm: u64 = field[2..4].parse().ok()?;
    let whole_seconds: u64 = field[4..6].parse().ok()?;
    let fraction_nanos: u64 = if field.len() > 6 {
        let digits = field[6..].trim_start_matches('.');
        let value: u64 = digits.parse().ok()?;
        let scale = 10u64.checked_pow(9u32.saturating_sub(digits.len() as u32))?;
        value * scale
    } else {
        0
    };
    Some(((hh * 3600 + mm * 60 + whole_seconds) * NANOS_PER_SECOND) + fraction_nanos)
}

/// Parses an NMEA `DDMMYY` date field, paired with a UTC-of-day nanosecond
/// value, into nanoseconds since the POSIX epoch. Years are interpreted as
/// 2000-2099, matching the device's own two-digit convention.
pub fn parse_date_time(date: &str, utc_of_day_ns: u64) -> Option<u64> {
    if date.len() != 6 {
        return None;
    }
    let dd: u32 = date[0..2].parse().ok()?;
    let mon: u32 = date[2..4].parse().ok()?;
    let yy: i32 = date[4..6].parse().ok()?;
    let year = 2000 + yy;
    let naive_date = NaiveDate::from_ymd_opt(year, mon, dd)?;
    let midnight = NaiveDateTime::new(naive_date, chrono::NaiveTime::MIN);
    let delta = midnight.signed_duration_since(posix_epoch());
    let seconds = delta.num_seconds();
    if seconds < 0 {
        return None;
    }
    Some(seconds as u64 * NANOS_PER_SECOND + utc_of_day_ns)
}

/// Parses a ZDA-style `(day, month, 4-digit year)` triple plus a UTC-of-day
/// nanosecond value into nanoseconds since the POSIX epoch. Unlike RMC's
/// two-digit `DDMMYY` field, ZDA carries day/month/year as three separate
/// fields with a full four-digit year.
pub fn parse_zda_date_time(day: &str, month: &str, year: &str, utc_of_day_ns: u64) -> Option<u64> {
    let dd: u32 = day.parse().ok()?;
    let mon: u32 = month.parse().ok()?;
    let yyyy: i32 = year.parse().ok()?;
    let naive_date = NaiveDate::from_ymd_opt(yyyy, mon, dd)?;
    let midnight = NaiveDateTime::new(naive_date, chrono::NaiveTime::MIN);
    let delta = midnight.signed_duration_since(posix_epoch());
    let seconds = delta.num_seconds();
    if seconds < 0 {
        return None;
    }
    Some(seconds as u64 * NANOS_PER_SECOND + utc_of_day_ns)
}

/// Timezone offset from a ZDA `(local_zone_hours, local_zone_minutes)`
/// pair. The minutes field carries no sign of its own; NMEA 0183 4.11
/// §3.1.1 combines it with the sign of the hours field so e.g. Chatham
/// Islands' `-12,45` reads as a single `-12h45m` offset, not `-12h+45m`.
pub fn parse_zone_offset(hours_field: &str, minutes_field: &str) -> Option<i64> {
    let hours: i64 = hours_field.parse().ok()?;
    let minutes: i64 = minutes_field.parse().ok()?;
    let sign = if hours_field.trim_start().starts_with('-') { -1 } else { 1 };
    let total_seconds = hours * 3600 + sign * minutes * 60;
    Some(total_seconds * NANOS_PER_SECOND as i64)
}

/// POSIX epoch offset of the Garmin epoch (1989-12-31), per the CPO-PVT
/// design note.
pub const GARMIN_EPOCH_OFFSET_SECONDS: i64 = 631_065_600;

/// Leap seconds inserted between the GPS epoch (1980-01-06) and the Garmin
/// epoch (1989-12-31); subtracted once so the two aren't double-counted.
pub const LEAP_SECONDS_GPS_TO_GARMIN: i64 = 5;

/// Empirical correction Hazer's CPO-PVT conversion applies, documented by
/// the original author as matching comparisons against an external
/// reference clock and not fully understood. Replicated verbatim per the
/// design notes' explicit instruction not to silently change it.
pub const CPO_PVT_EMPIRICAL_CORRECTION_SECONDS: i64 = -31;

/// Converts a CPO-PVT `(days_since_garmin_epoch, seconds_of_week, leap_seconds)`
/// triple into nanoseconds since the POSIX epoch.
pub fn cpo_pvt_to_posix_nanos(days_since_garmin_epoch: u32, seconds_of_week: f64, leap_seconds: i32) -> i64 {
    let garmin_epoch = posix_epoch() + Duration::seconds(GARMIN_EPOCH_OFFSET_SECONDS - LEAP_SECONDS_GPS_TO_GARMIN);
    let whole_seconds = seconds_of_week.trunc() as i64;
    let fraction_nanos = (seconds_of_week.fract() * NANOS_PER_SECOND as f64) as i64;
    let moment = garmin_epoch
        + Duration::days(days_since_garmin_epoch as i64)
        + Duration::seconds(whole_seconds + leap_seconds as i64 + CPO_PVT_EMPIRICAL_CORRECTION_SECONDS)
        + Duration::nanoseconds(fraction_nanos);
    let delta = moment.signed_duration_since(posix_epoch());
    delta.num_nanoseconds().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_utc_with_fractional_seconds() {
        let ns = parse_utc_of_day("135627.00").unwrap();
        assert_eq!(ns, (13 * 3600 + 56 * 60 + 27) * NANOS_PER_SECOND);
    }

    #[test]
    fn parses_zda_date_and_time_into_posix_epoch() {
        let utc = parse_utc_of_day("171305.00").unwrap();
        let ns = parse_date_time("120523", utc).unwrap();
        // 2023-05-12 is well past day 19,000 since the POSIX epoch.
        assert!(ns / 86_400_000_000_000 > 19_000);
    }

    #[test]
    fn empirical_correction_constant_is_the_documented_value() {
        assert_eq!(CPO_PVT_EMPIRICAL_CORRECTION_SECONDS, -31);
    }
}
