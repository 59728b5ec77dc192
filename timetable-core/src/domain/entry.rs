//! Timetable entries and per-hour buckets.

use super::error::DomainError;
use super::hour::Hour;
use super::time::add_minutes;

/// Written in place of a missing train type so blob indexes stay aligned.
pub const NO_TRAIN_TYPE: &str = "-";

/// Check a train type before it is stored.
///
/// Train types are single tokens in a space-separated blob, so whitespace
/// inside one is an error. Surrounding whitespace is trimmed, and an empty
/// type or the [`NO_TRAIN_TYPE`] placeholder means none.
///
/// # Examples
///
/// ```
/// use timetable_core::domain::normalize_train_type;
///
/// assert_eq!(normalize_train_type(Some(" Rapid ")).unwrap().as_deref(), Some("Rapid"));
/// assert_eq!(normalize_train_type(Some("")).unwrap(), None);
/// assert!(normalize_train_type(Some("Limited Express")).is_err());
/// ```
pub fn normalize_train_type(train_type: Option<&str>) -> Result<Option<String>, DomainError> {
    let Some(raw) = train_type else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == NO_TRAIN_TYPE {
        return Ok(None);
    }
    if trimmed.contains(char::is_whitespace) {
        return Err(DomainError::TrainType(raw.to_string()));
    }
    Ok(Some(trimmed.to_string()))
}

/// One departure within an hour.
///
/// The departure is the minute within the bucket's hour; the full time is
/// recovered with [`TimetableEntry::departure_hhmm`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TimetableEntry {
    /// Minute within the hour, 0-59.
    pub minute: u32,
    /// Minutes from boarding to alighting.
    pub ride_minutes: u32,
    /// Raw train type identifier; always `None` on bus lines.
    pub train_type: Option<String>,
}

impl TimetableEntry {
    /// Create an entry, validating the minute and the train type.
    ///
    /// The train type is normalized with [`normalize_train_type`].
    ///
    /// # Examples
    ///
    /// ```
    /// use timetable_core::domain::TimetableEntry;
    ///
    /// let e = TimetableEntry::new(15, 20, Some("Local")).unwrap();
    /// assert_eq!(e.minute, 15);
    /// assert!(TimetableEntry::new(60, 20, None::<&str>).is_err());
    /// assert!(TimetableEntry::new(15, 20, Some("Limited Express")).is_err());
    /// ```
    pub fn new(
        minute: u32,
        ride_minutes: u32,
        train_type: Option<impl Into<String>>,
    ) -> Result<Self, DomainError> {
        if minute > 59 {
            return Err(DomainError::Minute(minute));
        }
        let train_type: Option<String> = train_type.map(Into::into);
        Ok(Self {
            minute,
            ride_minutes,
            train_type: normalize_train_type(train_type.as_deref())?,
        })
    }

    /// Check an entry built field by field, as [`TimetableEntry::new`] does.
    pub fn normalized(self) -> Result<Self, DomainError> {
        Self::new(self.minute, self.ride_minutes, self.train_type)
    }

    /// Departure as HHMM within the given hour.
    pub fn departure_hhmm(&self, hour: Hour) -> i32 {
        hour.hhmm(self.minute)
    }

    /// Arrival as HHMM (departure plus ride time), clamped to end of service.
    pub fn arrival_hhmm(&self, hour: Hour) -> i32 {
        add_minutes(self.departure_hhmm(hour), self.ride_minutes as i32)
    }
}

/// The ordered departures of one (route, line, calendar, hour) bucket.
///
/// Entries are kept sorted by numeric minute and unique per minute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HourBucket {
    entries: Vec<TimetableEntry>,
}

impl HourBucket {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a bucket from entries in any order.
    ///
    /// Later entries win when two share a minute.
    pub fn from_entries(entries: impl IntoIterator<Item = TimetableEntry>) -> Self {
        let mut bucket = Self::new();
        for entry in entries {
            bucket.upsert(entry);
        }
        bucket
    }

    /// Wrap entries exactly as read, keeping any duplicate minutes.
    ///
    /// Stored data may contain the same minute twice (padded and unpadded
    /// tokens from different writers); they are resolved on the next upsert.
    pub(crate) fn from_stored(mut entries: Vec<TimetableEntry>) -> Self {
        entries.sort_by_key(|e| e.minute);
        Self { entries }
    }

    /// Insert or overwrite the entry for `entry.minute`.
    ///
    /// Returns `true` if an existing entry was replaced.
    pub fn upsert(&mut self, entry: TimetableEntry) -> bool {
        let minute = entry.minute;
        let replaced = match self.entries.iter().position(|e| e.minute == minute) {
            Some(idx) => {
                self.entries[idx] = entry;
                let mut seen = false;
                self.entries.retain(|e| {
                    if e.minute != minute {
                        return true;
                    }
                    let keep = !seen;
                    seen = true;
                    keep
                });
                true
            }
            None => {
                self.entries.push(entry);
                false
            }
        };
        self.entries.sort_by_key(|e| e.minute);
        replaced
    }

    /// Remove every entry at `minute`. Returns `true` if anything was removed.
    pub fn remove(&mut self, minute: u32) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.minute != minute);
        self.entries.len() != before
    }

    pub fn get(&self, minute: u32) -> Option<&TimetableEntry> {
        self.entries.iter().find(|e| e.minute == minute)
    }

    pub fn entries(&self) -> &[TimetableEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<TimetableEntry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Train types used in this bucket, in entry order.
    pub fn train_types(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(|e| e.train_type.as_deref())
    }
}
