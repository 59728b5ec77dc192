//! The stored form of an hour bucket.
//!
//! A bucket is stored as three parallel blobs of space-separated tokens:
//! departure minutes, ride minutes and train types. Index `i` of each blob
//! belongs to the same departure. Blobs written by older versions can be
//! misaligned or hold junk tokens, so decoding repairs instead of failing.

use tracing::{debug, warn};

use crate::domain::{
    Decoded, HourBucket, LineKind, NO_TRAIN_TYPE, TimetableEntry, add_zero_time,
};

/// The three blobs of one bucket as read from the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawBucket {
    pub times: Option<String>,
    pub ride_times: Option<String>,
    pub train_types: Option<String>,
}

/// The three blobs of one bucket, ready to write.
///
/// `train_types` is `None` for bus lines, which never store one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBucket {
    pub times: String,
    pub ride_times: String,
    pub train_types: Option<String>,
}

/// Split a blob into tokens, skipping empty ones.
pub fn split_tokens(blob: &str) -> impl Iterator<Item = &str> {
    blob.split(' ').filter(|t| !t.is_empty())
}

/// Decode one departure token into a minute.
fn decode_minute(token: &str) -> Decoded<i32> {
    match Decoded::parse_int(token) {
        Decoded::Value(m) if !(0..=59).contains(&m) => Decoded::Malformed(0),
        other => other,
    }
}

/// Decode a stored bucket.
///
/// Departure tokens that are not a minute 0-59 are dropped. A missing or
/// unreadable ride token takes `default_ride`, and a missing train type
/// token (or the `-` placeholder) reads as no train type. Bus lines ignore
/// any train types blob.
///
/// # Examples
///
/// ```
/// use timetable_core::domain::LineKind;
/// use timetable_core::timetable::{RawBucket, decode_bucket};
///
/// let raw = RawBucket {
///     times: Some("05 30".to_string()),
///     ride_times: Some("12".to_string()),
///     train_types: None,
/// };
/// let bucket = decode_bucket(&raw, 20, LineKind::Rail);
/// assert_eq!(bucket.entries()[0].ride_minutes, 12);
/// assert_eq!(bucket.entries()[1].ride_minutes, 20);
/// ```
pub fn decode_bucket(raw: &RawBucket, default_ride: u32, kind: LineKind) -> HourBucket {
    let Some(times) = raw.times.as_deref() else {
        return HourBucket::new();
    };
    let rides: Vec<&str> = raw
        .ride_times
        .as_deref()
        .map(|b| split_tokens(b).collect())
        .unwrap_or_default();
    let types: Vec<&str> = match kind {
        LineKind::Rail => raw
            .train_types
            .as_deref()
            .map(|b| split_tokens(b).collect())
            .unwrap_or_default(),
        LineKind::Bus => Vec::new(),
    };

    let mut entries = Vec::new();
    let mut padded = 0;
    for (i, token) in split_tokens(times).enumerate() {
        let Some(minute) = decode_minute(token).ok() else {
            warn!(token, index = i, "dropping malformed departure token");
            continue;
        };
        let minute = minute as u32;

        let ride = match rides.get(i) {
            Some(tok) => Decoded::parse_int(tok),
            None => Decoded::Absent(0),
        };
        let ride = match ride {
            Decoded::Value(r) if r >= 0 => r as u32,
            Decoded::Value(_) | Decoded::Malformed(_) => {
                let token = rides.get(i).copied().unwrap_or_default();
                warn!(token, index = i, "malformed ride time, using default");
                default_ride
            }
            Decoded::Absent(_) => {
                padded += 1;
                default_ride
            }
        };

        let train_type = match (kind, types.get(i)) {
            (LineKind::Bus, _) => None,
            (LineKind::Rail, Some(t)) if *t == NO_TRAIN_TYPE => None,
            (LineKind::Rail, Some(t)) => Some((*t).to_string()),
            (LineKind::Rail, None) => {
                if raw.train_types.is_some() {
                    padded += 1;
                }
                None
            }
        };

        entries.push(TimetableEntry {
            minute,
            ride_minutes: ride,
            train_type,
        });
    }

    if padded > 0 {
        debug!(padded, "padded misaligned bucket blobs");
    }
    HourBucket::from_stored(entries)
}

/// Encode a bucket into its three blobs.
///
/// Minutes are written zero-padded.
pub fn encode_bucket(bucket: &HourBucket, kind: LineKind) -> EncodedBucket {
    let mut times = Vec::with_capacity(bucket.len());
    let mut rides = Vec::with_capacity(bucket.len());
    let mut types = Vec::with_capacity(bucket.len());
    for entry in bucket.entries() {
        times.push(add_zero_time(entry.minute as i32));
        rides.push(entry.ride_minutes.to_string());
        types.push(entry.train_type.as_deref().unwrap_or(NO_TRAIN_TYPE));
    }

    EncodedBucket {
        times: times.join(" "),
        ride_times: rides.join(" "),
        train_types: kind.is_rail().then(|| types.join(" ")),
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_entry() -> impl Strategy<Value = TimetableEntry> {
        (0u32..60, 0u32..180, prop::option::of("[A-Za-z]{1,12}")).prop_map(
            |(minute, ride_minutes, train_type)| TimetableEntry {
                minute,
                ride_minutes,
                train_type,
            },
        )
    }

    proptest! {
        /// Whatever a bucket holds, it reads back the same
        #[test]
        fn rail_bucket_survives_storage(entries in prop::collection::vec(arb_entry(), 0..20)) {
            let bucket = HourBucket::from_entries(entries);
            let encoded = encode_bucket(&bucket, LineKind::Rail);
            let raw = RawBucket {
                times: Some(encoded.times),
                ride_times: Some(encoded.ride_times),
                train_types: encoded.train_types,
            };
            prop_assert_eq!(decode_bucket(&raw, 0, LineKind::Rail), bucket);
        }

        /// Decoding arbitrary text never panics and stays sorted
        #[test]
        fn decode_any_text(times in ".{0,40}", rides in ".{0,40}") {
            let raw = RawBucket {
                times: Some(times),
                ride_times: Some(rides),
                train_types: None,
            };
            let bucket = decode_bucket(&raw, 3, LineKind::Rail);
            let minutes: Vec<u32> = bucket.entries().iter().map(|e| e.minute).collect();
            prop_assert!(minutes.windows(2).all(|w| w[0] <= w[1]));
            prop_assert!(minutes.iter().all(|m| *m < 60));
        }
    }
}
