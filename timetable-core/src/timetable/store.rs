//! Timetable CRUD over an injected key-value store.

use chrono::{NaiveTime, Timelike};
use tracing::{debug, trace, warn};

use super::blob::{RawBucket, decode_bucket, encode_bucket, split_tokens};
use super::error::TimetableError;
use crate::calendar::Calendar;
use crate::countdown::{Countdown, countdown_at};
use crate::domain::{
    Hour, HourBucket, LineKind, LineSlot, RouteDirection, TimetableEntry, add_minutes,
    timetable_hhmm,
};
use crate::keys::{self, BucketAddress, CopySource};
use crate::store::{KeyValueStore, StoreError, WriteBatch};
use crate::train_type::sort_train_types;

/// The span of hours a calendar has departures in, inclusive.
///
/// Hours inside the span may be empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourRange {
    pub first: Hour,
    pub last: Hour,
}

impl HourRange {
    pub fn contains(&self, hour: Hour) -> bool {
        self.first <= hour && hour <= self.last
    }

    /// Every hour in the span, in order.
    pub fn hours(&self) -> impl Iterator<Item = Hour> + use<> {
        let (first, last) = (self.first, self.last);
        Hour::all().filter(move |h| first <= *h && *h <= last)
    }
}

/// The next departure found for a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextDeparture {
    pub hour: Hour,
    pub entry: TimetableEntry,
}

impl NextDeparture {
    pub fn departure_hhmm(&self) -> i32 {
        self.entry.departure_hhmm(self.hour)
    }

    pub fn arrival_hhmm(&self) -> i32 {
        self.entry.arrival_hhmm(self.hour)
    }
}

/// Hand-authored timetables kept in a flat key-value store.
///
/// Every read repairs what it finds (see [`decode_bucket`]) and every
/// mutation of a bucket is committed as one [`WriteBatch`], so the three
/// parallel blobs are written together.
pub struct TimetableStore<S> {
    store: S,
}

impl<S: KeyValueStore> TimetableStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Whether a line is rail or bus. Unset lines are rail.
    pub fn line_kind(&self, route: RouteDirection, line: LineSlot) -> LineKind {
        let Some(raw) = self.store.get_string(&keys::line_kind(route, line)) else {
            return LineKind::default();
        };
        LineKind::parse(&raw).unwrap_or_else(|_| {
            warn!(%route, %line, kind = %raw, "unknown line kind, treating as rail");
            LineKind::default()
        })
    }

    /// The ride time used for departures without their own. Unset is 0.
    pub fn default_ride_time(&self, route: RouteDirection, line: LineSlot) -> u32 {
        match self.store.get_int(&keys::ride_time(route, line)) {
            Some(minutes) => u32::try_from(minutes).unwrap_or_else(|_| {
                warn!(%route, %line, minutes, "invalid default ride time, using 0");
                0
            }),
            None => 0,
        }
    }

    fn read_raw(&self, addr: &BucketAddress) -> RawBucket {
        let keys = addr.keys();
        RawBucket {
            times: self.store.get_string(&keys.times),
            ride_times: self.store.get_string(&keys.ride_times),
            train_types: self.store.get_string(&keys.train_types),
        }
    }

    /// Load the bucket at `addr`. A bucket never written is empty.
    pub fn load_bucket(&self, addr: &BucketAddress) -> HourBucket {
        let kind = self.line_kind(addr.route, addr.line);
        let default_ride = self.default_ride_time(addr.route, addr.line);
        let bucket = decode_bucket(&self.read_raw(addr), default_ride, kind);
        trace!(?addr, entries = bucket.len(), "loaded bucket");
        bucket
    }

    /// Load the departures at `addr`, ordered by minute.
    pub fn load_entries(&self, addr: &BucketAddress) -> Vec<TimetableEntry> {
        self.load_bucket(addr).into_entries()
    }

    /// Add the three blob writes for `bucket` to `batch`.
    ///
    /// An empty bucket removes its keys.
    fn stage_bucket(
        batch: &mut WriteBatch,
        addr: &BucketAddress,
        bucket: &HourBucket,
        kind: LineKind,
    ) {
        let keys = addr.keys();
        let encoded = encode_bucket(bucket, kind);
        batch.set_or_remove(keys.times, &encoded.times);
        batch.set_or_remove(keys.ride_times, &encoded.ride_times);
        match encoded.train_types {
            Some(types) => batch.set_or_remove(keys.train_types, &types),
            None => batch.remove(keys.train_types),
        };
    }

    /// Add or overwrite the departure at `entry.minute`.
    ///
    /// A stored departure written as `5` or `05` is matched alike. The
    /// entry's train type is added to the calendar's train type list in the
    /// same batch. Bus lines drop the train type. An entry that fails
    /// [`TimetableEntry::normalized`] is rejected before anything is written.
    pub fn upsert_entry(
        &mut self,
        addr: &BucketAddress,
        entry: TimetableEntry,
    ) -> Result<(), TimetableError> {
        let mut entry = entry.normalized()?;
        let kind = self.line_kind(addr.route, addr.line);
        if !kind.is_rail() {
            entry.train_type = None;
        }
        let train_type = entry.train_type.clone();

        let mut bucket = self.load_bucket(addr);
        let replaced = bucket.upsert(entry);

        let mut batch = WriteBatch::new();
        Self::stage_bucket(&mut batch, addr, &bucket, kind);

        if let Some(train_type) = train_type {
            let list_key = addr.train_type_list_key();
            let mut list = self.stored_train_types(&list_key);
            if list.is_empty() {
                list = self.scan_train_types(addr, Some(&bucket));
            } else if !list.contains(&train_type) {
                list.push(train_type);
                sort_train_types(&mut list);
            }
            batch.set_or_remove(list_key, &list.join(" "));
        }

        self.store.apply(batch)?;
        debug!(?addr, replaced, entries = bucket.len(), "upserted departure");
        Ok(())
    }

    /// Delete the departure at `minute`.
    ///
    /// Returns `false`, writing nothing, if there was none. The train type
    /// list is left as is; it may list types no longer used.
    pub fn delete_entry(&mut self, addr: &BucketAddress, minute: u32) -> Result<bool, StoreError> {
        let mut bucket = self.load_bucket(addr);
        if !bucket.remove(minute) {
            debug!(?addr, minute, "no departure to delete");
            return Ok(false);
        }

        let kind = self.line_kind(addr.route, addr.line);
        let mut batch = WriteBatch::new();
        Self::stage_bucket(&mut batch, addr, &bucket, kind);
        self.store.apply(batch)?;
        debug!(?addr, minute, entries = bucket.len(), "deleted departure");
        Ok(true)
    }

    /// Replace a bucket wholesale, clearing whatever was stored before.
    ///
    /// Used for bulk imports, where a shorter new bucket must not leave
    /// stale indexes behind in the old blobs. Every entry is normalized
    /// first; one bad entry rejects the whole bucket.
    pub fn replace_bucket(
        &mut self,
        addr: &BucketAddress,
        bucket: &HourBucket,
    ) -> Result<(), TimetableError> {
        let entries = bucket
            .entries()
            .iter()
            .cloned()
            .map(TimetableEntry::normalized)
            .collect::<Result<Vec<_>, _>>()?;
        let bucket = &HourBucket::from_entries(entries);
        let kind = self.line_kind(addr.route, addr.line);
        let keys = addr.keys();

        let mut batch = WriteBatch::new();
        batch
            .remove(keys.times)
            .remove(keys.ride_times)
            .remove(keys.train_types);
        Self::stage_bucket(&mut batch, addr, bucket, kind);

        let list_key = addr.train_type_list_key();
        if kind.is_rail() && bucket.train_types().next().is_some() {
            let mut list = self.stored_train_types(&list_key);
            list.extend(bucket.train_types().map(str::to_string));
            sort_train_types(&mut list);
            batch.set_or_remove(list_key, &list.join(" "));
        }

        self.store.apply(batch)?;
        debug!(?addr, entries = bucket.len(), "replaced bucket");
        Ok(())
    }

    /// The inclusive span from the first to the last hour with a departure.
    ///
    /// Returns `None` when the calendar has no departures at all.
    pub fn valid_hour_range(
        &self,
        route: RouteDirection,
        line: LineSlot,
        calendar: &Calendar,
    ) -> Option<HourRange> {
        let occupied = |hour: &Hour| {
            let addr = BucketAddress::new(route, line, calendar.clone(), *hour);
            !self.load_bucket(&addr).is_empty()
        };
        let first = Hour::all().find(occupied)?;
        let last = Hour::all().rev().find(occupied)?;
        Some(HourRange { first, last })
    }

    /// Every hour of the valid range with its departures, empty hours included.
    pub fn load_day(
        &self,
        route: RouteDirection,
        line: LineSlot,
        calendar: &Calendar,
    ) -> Vec<(Hour, HourBucket)> {
        let Some(range) = self.valid_hour_range(route, line, calendar) else {
            return Vec::new();
        };
        range
            .hours()
            .map(|hour| {
                let addr = BucketAddress::new(route, line, calendar.clone(), hour);
                (hour, self.load_bucket(&addr))
            })
            .collect()
    }

    /// Overwrite the departure times at `target` with those of a copy source.
    ///
    /// Only the departure-times blob is copied. The target's ride time and
    /// train type blobs keep whatever they held, so reload the bucket
    /// afterwards to see the repaired result. An empty source clears the
    /// target's departure times. Returns `false` if the source does not
    /// exist (the hour before 4 or after 25).
    pub fn copy_into(
        &mut self,
        target: &BucketAddress,
        source: CopySource,
    ) -> Result<bool, StoreError> {
        let Some(from) = source.address(target) else {
            debug!(?target, ?source, "copy source does not exist");
            return Ok(false);
        };

        let target_key = target.keys().times;
        let mut batch = WriteBatch::new();
        match self.store.get_string(&from.keys().times) {
            Some(times) => batch.set_or_remove(target_key, &times),
            None => batch.remove(target_key),
        };
        self.store.apply(batch)?;
        debug!(?target, ?from, "copied departure times");
        Ok(true)
    }

    fn stored_train_types(&self, list_key: &str) -> Vec<String> {
        self.store
            .get_string(list_key)
            .map(|blob| split_tokens(&blob).map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Collect and sort every train type used by the calendar of `addr`.
    ///
    /// `pending` stands in for the stored bucket at `addr.hour`.
    fn scan_train_types(&self, addr: &BucketAddress, pending: Option<&HourBucket>) -> Vec<String> {
        let mut types = Vec::new();
        for hour in Hour::all() {
            let here = addr.at_hour(hour);
            match pending {
                Some(bucket) if hour == addr.hour => {
                    types.extend(bucket.train_types().map(str::to_string));
                }
                _ => {
                    let bucket = self.load_bucket(&here);
                    types.extend(bucket.train_types().map(str::to_string));
                }
            }
        }
        sort_train_types(&mut types);
        types
    }

    /// The train types used by a calendar, sorted for display.
    ///
    /// Reads the stored list, or scans every hour if there is none, without
    /// writing anything.
    pub fn train_types(
        &self,
        route: RouteDirection,
        line: LineSlot,
        calendar: &Calendar,
    ) -> Vec<String> {
        let addr = BucketAddress::new(route, line, calendar.clone(), Hour::FIRST);
        let stored = self.stored_train_types(&addr.train_type_list_key());
        if !stored.is_empty() {
            return stored;
        }
        self.scan_train_types(&addr, None)
    }

    /// Rebuild the stored train type list if it is empty.
    ///
    /// A non-empty list is returned as stored. Calling this repeatedly is
    /// safe.
    pub fn rebuild_train_type_cache(
        &mut self,
        route: RouteDirection,
        line: LineSlot,
        calendar: &Calendar,
    ) -> Result<Vec<String>, StoreError> {
        let addr = BucketAddress::new(route, line, calendar.clone(), Hour::FIRST);
        let list_key = addr.train_type_list_key();
        let stored = self.stored_train_types(&list_key);
        if !stored.is_empty() {
            trace!(key = %list_key, count = stored.len(), "train type list present");
            return Ok(stored);
        }

        let types = self.scan_train_types(&addr, None);
        if !types.is_empty() {
            self.store.set_string(&list_key, &types.join(" "))?;
        }
        debug!(key = %list_key, count = types.len(), "rebuilt train type list");
        Ok(types)
    }

    /// Remove every bucket and the train type list of one calendar.
    ///
    /// Returns the number of hours that held departures.
    pub fn clear_calendar(
        &mut self,
        route: RouteDirection,
        line: LineSlot,
        calendar: &Calendar,
    ) -> Result<usize, StoreError> {
        let mut batch = WriteBatch::new();
        let mut cleared = 0;
        for hour in Hour::all() {
            let blobs = BucketAddress::new(route, line, calendar.clone(), hour).keys();
            if self.store.contains(&blobs.times) {
                cleared += 1;
            }
            batch
                .remove(blobs.times)
                .remove(blobs.ride_times)
                .remove(blobs.train_types);
        }
        batch.remove(keys::train_type_list(route, line, calendar));
        self.store.apply(batch)?;
        debug!(%route, %line, %calendar, cleared, "cleared calendar");
        Ok(cleared)
    }

    /// The first departure at or after `now_hhmm` (timetable HHMM).
    ///
    /// A time past the last hour (26:00-27:59, that is 02:00-03:59) has no
    /// service left, so the search starts over at the first hour of the
    /// next service day, on the same calendar.
    pub fn next_departure(
        &self,
        route: RouteDirection,
        line: LineSlot,
        calendar: &Calendar,
        now_hhmm: i32,
    ) -> Option<NextDeparture> {
        let mut now_hour = u32::try_from(now_hhmm / 100).ok()?;
        let mut now_hhmm = now_hhmm;
        if now_hour > Hour::LAST.value() {
            trace!(now_hhmm, "past the last hour, searching the next service day");
            now_hour = Hour::FIRST.value();
            now_hhmm = Hour::FIRST.hhmm(0);
        }
        Hour::all()
            .filter(|h| h.value() >= now_hour)
            .find_map(|hour| {
                let addr = BucketAddress::new(route, line, calendar.clone(), hour);
                self.load_bucket(&addr)
                    .into_entries()
                    .into_iter()
                    .find(|e| e.departure_hhmm(hour) >= now_hhmm)
                    .map(|entry| NextDeparture { hour, entry })
            })
    }

    /// Countdown from the wall-clock `now` to the next departure.
    ///
    /// A departure in the current minute counts as gone once its first
    /// second has passed. Between 02:00 and 03:59 the countdown runs to the
    /// first departure of the coming service day.
    pub fn countdown_to(
        &self,
        route: RouteDirection,
        line: LineSlot,
        calendar: &Calendar,
        now: NaiveTime,
    ) -> Option<(NextDeparture, Countdown)> {
        let search = match Hour::from_clock(now.hour()) {
            Ok(_) if now.second() > 0 => add_minutes(timetable_hhmm(now), 1),
            Ok(_) => timetable_hhmm(now),
            Err(_) => Hour::FIRST.hhmm(0),
        };
        let next = self.next_departure(route, line, calendar, search)?;
        let countdown = countdown_at(now, next.departure_hhmm());
        Some((next, countdown))
    }
}
