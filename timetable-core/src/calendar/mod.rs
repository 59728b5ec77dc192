//! Calendar categories for timetables.
//!
//! A timetable is stored per calendar: a standard day type (weekday, a
//! single day name, Saturday, Sunday, holiday, or the weekend union) or an
//! agency-specific day. Specific days are canonicalized once, from the
//! suffix of their identifier, into the standard category they display as.

mod category;
mod holidays;
mod resolve;

pub use category::{Calendar, DayType, SpecificDay, canonicalize};
pub use holidays::{HolidayCalendar, HolidayError, HolidaySet, NoHolidays};
pub use resolve::resolve_for_date;
