//! Timetables stored in a flat key-value store.
//!
//! [`TimetableStore`] owns an injected [`KeyValueStore`](crate::store::KeyValueStore)
//! and does every read and write of timetable data: per-hour departures,
//! the train type list, copying between buckets, line settings and the
//! next-departure lookup.

mod blob;
mod error;
mod line;
mod store;

pub use blob::{EncodedBucket, RawBucket, decode_bucket, encode_bucket, split_tokens};
pub use error::TimetableError;
pub use line::{LineConfig, MAX_EXTRA_LINES};
pub use store::{HourRange, NextDeparture, TimetableStore};
