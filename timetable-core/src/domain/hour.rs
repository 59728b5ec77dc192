//! Timetable hour type.

use std::fmt;

use super::error::DomainError;
use super::time::timetable_hour;

/// An hour of the timetable day, 4 through 25.
///
/// The timetable day starts at 04:00; 00:00-01:59 of the next calendar day
/// are hours 24 and 25 so the whole day sorts contiguously.
///
/// # Examples
///
/// ```
/// use timetable_core::domain::Hour;
///
/// assert_eq!(Hour::new(8).unwrap().value(), 8);
/// assert_eq!(Hour::from_clock(0).unwrap().value(), 24);
/// assert!(Hour::new(3).is_err());
/// assert!(Hour::from_clock(2).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Hour(u8);

impl Hour {
    pub const FIRST: Hour = Hour(4);
    pub const LAST: Hour = Hour(25);

    pub fn new(hour: u32) -> Result<Self, DomainError> {
        if !(4..=25).contains(&hour) {
            return Err(DomainError::Hour(hour));
        }
        Ok(Hour(hour as u8))
    }

    /// An hour from the 24-hour wall clock.
    pub fn from_clock(hour: u32) -> Result<Self, DomainError> {
        Self::new(timetable_hour(hour))
    }

    pub fn value(&self) -> u32 {
        self.0 as u32
    }

    /// The previous hour, if still inside the day.
    pub fn prev(&self) -> Option<Self> {
        Self::new(self.value().checked_sub(1)?).ok()
    }

    /// The next hour, if still inside the day.
    pub fn next(&self) -> Option<Self> {
        Self::new(self.value() + 1).ok()
    }

    /// Every hour of the day in order.
    pub fn all() -> impl DoubleEndedIterator<Item = Hour> {
        (4u8..=25).map(Hour)
    }

    /// This hour with a minute, as HHMM.
    pub fn hhmm(&self, minute: u32) -> i32 {
        (self.value() * 100 + minute) as i32
    }
}

impl fmt::Debug for Hour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hour({})", self.0)
    }
}

impl fmt::Display for Hour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}
