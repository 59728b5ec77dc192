//! Domain types for hand-authored timetables.
//!
//! Identifiers handed in by a caller (routes, slots, hours, minutes) are
//! validated at construction, so code that receives these types can trust
//! their ranges. Time values themselves stay plain integers in the HHMM,
//! HHMMSS and MMSS encodings used by stored data.

mod decoded;
mod entry;
mod error;
mod hour;
mod route;
mod time;

pub use decoded::Decoded;
pub use entry::{HourBucket, NO_TRAIN_TYPE, TimetableEntry, normalize_train_type};
pub use error::DomainError;
pub use hour::Hour;
pub use route::{LineKind, LineSlot, RouteDirection, TransferSlot};
pub use time::{
    END_OF_SERVICE, NO_MORE_DEPARTURES, SECONDS_PER_DAY, add_minutes, add_zero_time,
    clock_hhmmss, format_hhmm, hhmm_to_hhmmss, hhmm_to_minutes, hhmmss_to_seconds,
    minutes_to_hhmm, mmss_to_seconds, over_time, seconds_to_hhmmss, seconds_to_mmss,
    timetable_hhmm, timetable_hour, wraparound_subtract,
};
