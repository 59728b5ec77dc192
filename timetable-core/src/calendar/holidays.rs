//! Public holiday lookup.

use std::collections::HashSet;
use std::path::Path;

use chrono::NaiveDate;

/// Errors loading a holiday list.
#[derive(Debug, thiserror::Error)]
pub enum HolidayError {
    #[error("failed to read holiday file: {0}")]
    Io(#[from] std::io::Error),

    #[error("holiday file is not a JSON array of YYYY-MM-DD dates: {0}")]
    Json(#[from] serde_json::Error),
}

/// Source of public holidays for calendar resolution.
pub trait HolidayCalendar {
    fn is_holiday(&self, date: NaiveDate) -> bool;
}

/// A calendar with no public holidays.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHolidays;

impl HolidayCalendar for NoHolidays {
    fn is_holiday(&self, _date: NaiveDate) -> bool {
        false
    }
}

/// An explicit set of holiday dates.
///
/// # Examples
///
/// ```
/// use timetable_core::calendar::{HolidayCalendar, HolidaySet};
/// use chrono::NaiveDate;
///
/// let set = HolidaySet::from_json(r#"["2026-01-01", "2026-05-05"]"#).unwrap();
/// assert!(set.is_holiday(NaiveDate::from_ymd_opt(2026, 5, 5).unwrap()));
/// assert!(!set.is_holiday(NaiveDate::from_ymd_opt(2026, 5, 6).unwrap()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct HolidaySet {
    dates: HashSet<NaiveDate>,
}

impl HolidaySet {
    pub fn new(dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            dates: dates.into_iter().collect(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, HolidayError> {
        let dates: Vec<NaiveDate> = serde_json::from_str(json)?;
        Ok(Self::new(dates))
    }

    /// Load a JSON array of dates from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, HolidayError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

impl HolidayCalendar for HolidaySet {
    fn is_holiday(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }
}

impl<H: HolidayCalendar + ?Sized> HolidayCalendar for &H {
    fn is_holiday(&self, date: NaiveDate) -> bool {
        (**self).is_holiday(date)
    }
}
