//! Time remaining until a departure.

use std::fmt;

use chrono::NaiveTime;

use crate::domain::{
    add_zero_time, clock_hhmmss, hhmm_to_hhmmss, seconds_to_mmss, wraparound_subtract,
};

/// How urgently a countdown should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CountdownTier {
    /// Ten minutes or more.
    Normal,
    /// Five to ten minutes.
    Warning,
    /// Under five minutes.
    Urgent,
}

impl CountdownTier {
    /// Tier for a countdown in MMSS.
    pub fn for_mmss(mmss: i32) -> Self {
        if mmss >= 1000 {
            CountdownTier::Normal
        } else if mmss >= 500 {
            CountdownTier::Warning
        } else {
            CountdownTier::Urgent
        }
    }
}

/// A countdown to the next departure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    /// Seconds left, in `[0, 86400)`.
    pub remaining_secs: i32,
    /// The same duration as MMSS; minutes are not capped.
    pub mmss: i32,
    pub tier: CountdownTier,
    /// Set on odd MMSS values. Displays toggle on it to blink once a second;
    /// it has nothing to do with the tier.
    pub alternate: bool,
}

impl Countdown {
    pub fn from_seconds(remaining_secs: i32) -> Self {
        let mmss = seconds_to_mmss(remaining_secs);
        Self {
            remaining_secs,
            mmss,
            tier: CountdownTier::for_mmss(mmss),
            alternate: mmss % 2 == 1,
        }
    }

    /// `MM:SS`, both zero-padded.
    pub fn display(&self) -> String {
        format!(
            "{}:{}",
            add_zero_time(self.mmss / 100),
            add_zero_time(self.mmss % 100)
        )
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// Countdown from `current_hhmmss` to `departure_hhmm`.
///
/// A departure earlier in the day than the current time is taken to be
/// the next day's, and timetable hours past 24 are reduced modulo a day.
///
/// # Examples
///
/// ```
/// use timetable_core::countdown::{seconds_until, CountdownTier};
///
/// let c = seconds_until(80000, 812);
/// assert_eq!(c.remaining_secs, 720);
/// assert_eq!(c.display(), "12:00");
/// assert_eq!(c.tier, CountdownTier::Normal);
/// ```
pub fn seconds_until(current_hhmmss: i32, departure_hhmm: i32) -> Countdown {
    Countdown::from_seconds(wraparound_subtract(
        hhmm_to_hhmmss(departure_hhmm),
        current_hhmmss,
    ))
}

/// Countdown from a wall-clock time to a timetable departure.
pub fn countdown_at(now: NaiveTime, departure_hhmm: i32) -> Countdown {
    seconds_until(clock_hhmmss(now), departure_hhmm)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Remaining time is always within a day and displays as MM:SS
        #[test]
        fn remaining_in_range(
            h in 0i32..24,
            m in 0i32..60,
            s in 0i32..60,
            dep_h in 4i32..28,
            dep_m in 0i32..60,
        ) {
            let c = seconds_until(h * 10_000 + m * 100 + s, dep_h * 100 + dep_m);
            prop_assert!((0..86_400).contains(&c.remaining_secs));
            prop_assert_eq!(c.alternate, c.mmss % 2 == 1);
            let shown = c.display();
            let (mm, ss) = shown.split_once(':').unwrap();
            prop_assert!(mm.len() >= 2);
            prop_assert_eq!(ss.len(), 2);
        }
    }
}
