//! Integer time arithmetic for hand-authored timetables.
//!
//! Stored timetable times are plain integers in a handful of encodings:
//!
//! - HHMM: `830` is 08:30
//! - HHMMSS: `83015` is 08:30:15
//! - MMSS: `905` is 9 minutes 5 seconds
//! - plain minutes or seconds since midnight
//!
//! A timetable day starts at 04:00 and runs past midnight, so the hours 0-3
//! of the following calendar day are written as 24-27 (see [`timetable_hour`]).
//! All inputs are expected to be non-negative.

use chrono::{NaiveTime, Timelike};

/// Seconds in one day, the modulus for wraparound subtraction.
pub const SECONDS_PER_DAY: i32 = 86_400;

/// The HHMM value meaning "no further departures today" (27:00).
pub const END_OF_SERVICE: i32 = 2700;

/// Rendered in place of [`END_OF_SERVICE`].
pub const NO_MORE_DEPARTURES: &str = "--:--";

/// Format a clock component with a leading zero below ten.
///
/// # Examples
///
/// ```
/// use timetable_core::domain::add_zero_time;
///
/// assert_eq!(add_zero_time(5), "05");
/// assert_eq!(add_zero_time(0), "00");
/// assert_eq!(add_zero_time(42), "42");
/// ```
pub fn add_zero_time(value: i32) -> String {
    if (0..10).contains(&value) {
        format!("0{value}")
    } else {
        value.to_string()
    }
}

/// HHMM to minutes since midnight.
pub fn hhmm_to_minutes(hhmm: i32) -> i32 {
    (hhmm / 100) * 60 + hhmm % 100
}

/// Minutes since midnight to HHMM.
///
/// Does not wrap at 24:00, so late-night timetable times stay contiguous
/// (`1530` minutes is `2530`).
pub fn minutes_to_hhmm(minutes: i32) -> i32 {
    (minutes / 60) * 100 + minutes % 60
}

/// HHMMSS to seconds since midnight.
pub fn hhmmss_to_seconds(hhmmss: i32) -> i32 {
    (hhmmss / 10_000) * 3600 + (hhmmss / 100 % 100) * 60 + hhmmss % 100
}

/// Seconds to HHMMSS, wrapped into a single day.
pub fn seconds_to_hhmmss(seconds: i32) -> i32 {
    let s = seconds.rem_euclid(SECONDS_PER_DAY);
    (s / 3600) * 10_000 + (s / 60 % 60) * 100 + s % 60
}

/// MMSS to seconds.
pub fn mmss_to_seconds(mmss: i32) -> i32 {
    (mmss / 100) * 60 + mmss % 100
}

/// Seconds to MMSS. Minutes are not capped at 59.
pub fn seconds_to_mmss(seconds: i32) -> i32 {
    (seconds / 60) * 100 + seconds % 60
}

/// HHMM widened to HHMMSS with zero seconds.
pub fn hhmm_to_hhmmss(hhmm: i32) -> i32 {
    hhmm * 100
}

/// Seconds from `b` until the next occurrence of `a`, both HHMMSS.
///
/// When `a` is earlier in the day than `b` the difference wraps through
/// midnight, so the result is always in `[0, 86400)`.
///
/// # Examples
///
/// ```
/// use timetable_core::domain::wraparound_subtract;
///
/// // 08:10:00 - 08:00:00
/// assert_eq!(wraparound_subtract(81000, 80000), 600);
/// // 00:05:00 is five minutes after 23:55:00 the day before
/// assert_eq!(wraparound_subtract(500, 235500), 600);
/// ```
pub fn wraparound_subtract(a: i32, b: i32) -> i32 {
    (hhmmss_to_seconds(a) - hhmmss_to_seconds(b)).rem_euclid(SECONDS_PER_DAY)
}

/// Map a clock hour onto the timetable day: 0-3 become 24-27.
///
/// # Examples
///
/// ```
/// use timetable_core::domain::timetable_hour;
///
/// assert_eq!(timetable_hour(0), 24);
/// assert_eq!(timetable_hour(3), 27);
/// assert_eq!(timetable_hour(4), 4);
/// assert_eq!(timetable_hour(23), 23);
/// ```
pub fn timetable_hour(hour: u32) -> u32 {
    if hour < 4 { hour + 24 } else { hour }
}

/// Clamp a computed HHMM to [`END_OF_SERVICE`].
///
/// If `before_time` is already end of service the result is end of service
/// regardless of `time`, so a value that wrapped past midnight cannot come
/// back as a small early-morning time.
pub fn over_time(time: i32, before_time: i32) -> i32 {
    if before_time == END_OF_SERVICE {
        END_OF_SERVICE
    } else {
        time.min(END_OF_SERVICE)
    }
}

/// Add minutes to an HHMM time, clamped to end of service.
pub fn add_minutes(hhmm: i32, minutes: i32) -> i32 {
    over_time(minutes_to_hhmm(hhmm_to_minutes(hhmm) + minutes), hhmm)
}

/// Render an HHMM value as `HH:MM`, or the end-of-service placeholder.
///
/// # Examples
///
/// ```
/// use timetable_core::domain::{format_hhmm, NO_MORE_DEPARTURES};
///
/// assert_eq!(format_hhmm(805), "08:05");
/// assert_eq!(format_hhmm(2530), "25:30");
/// assert_eq!(format_hhmm(2700), NO_MORE_DEPARTURES);
/// ```
pub fn format_hhmm(hhmm: i32) -> String {
    if hhmm >= END_OF_SERVICE {
        return NO_MORE_DEPARTURES.to_string();
    }
    format!("{}:{}", add_zero_time(hhmm / 100), add_zero_time(hhmm % 100))
}

/// A wall-clock time as a timetable HHMM (00:30 becomes `2430`).
pub fn timetable_hhmm(time: NaiveTime) -> i32 {
    (timetable_hour(time.hour()) * 100 + time.minute()) as i32
}

/// A wall-clock time as HHMMSS on the plain 24-hour clock.
pub fn clock_hhmmss(time: NaiveTime) -> i32 {
    (time.hour() * 10_000 + time.minute() * 100 + time.second()) as i32
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    prop_compose! {
        fn valid_hhmmss()(h in 0i32..24, m in 0i32..60, s in 0i32..60) -> i32 {
            h * 10_000 + m * 100 + s
        }
    }

    proptest! {
        /// Wraparound subtraction always lands within one day
        #[test]
        fn wraparound_in_range(a in valid_hhmmss(), b in valid_hhmmss()) {
            let d = wraparound_subtract(a, b);
            prop_assert!((0..SECONDS_PER_DAY).contains(&d));
        }

        /// A time is zero seconds from itself
        #[test]
        fn wraparound_self_is_zero(a in valid_hhmmss()) {
            prop_assert_eq!(wraparound_subtract(a, a), 0);
        }

        /// Going from b to a and back covers exactly one day (or nothing)
        #[test]
        fn wraparound_complements(a in valid_hhmmss(), b in valid_hhmmss()) {
            let there = wraparound_subtract(a, b);
            let back = wraparound_subtract(b, a);
            if a == b {
                prop_assert_eq!(there + back, 0);
            } else {
                prop_assert_eq!(there + back, SECONDS_PER_DAY);
            }
        }

        /// Timetable hours keep 4.. and lift 0-3 by a day
        #[test]
        fn timetable_hour_mapping(h in 0u32..28) {
            let mapped = timetable_hour(h);
            if h < 4 {
                prop_assert_eq!(mapped, h + 24);
            } else {
                prop_assert_eq!(mapped, h);
            }
            prop_assert!((4..28).contains(&mapped));
        }

        /// HHMM survives a trip through minutes
        #[test]
        fn hhmm_minutes_roundtrip(h in 0i32..28, m in 0i32..60) {
            let hhmm = h * 100 + m;
            prop_assert_eq!(minutes_to_hhmm(hhmm_to_minutes(hhmm)), hhmm);
        }

        /// Clamped times never exceed end of service
        #[test]
        fn over_time_bounded(time in 0i32..5000, before in 0i32..2800) {
            prop_assert!(over_time(time, before) <= END_OF_SERVICE);
        }
    }
}
