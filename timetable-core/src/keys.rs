//! Storage key construction.
//!
//! Every stored fact lives under a string key built by concatenating the
//! route prefix, a field word, the 1-based line number and, for timetable
//! blobs, the calendar tag and the two-digit hour. These strings are the
//! on-disk contract: existing data is only readable if they stay
//! bit-for-bit the same.
//!
//! | fact | key |
//! |---|---|
//! | line name | `{route}linename{n}` |
//! | operator name | `{route}operatorname{n}` |
//! | line color | `{route}linecolor{n}` |
//! | line code | `{route}linecode{n}` |
//! | line kind | `{route}linekind{n}` |
//! | default ride time | `{route}ridetime{n}` |
//! | home-side label | `{route}departure{n}` |
//! | away-side label | `{route}arrival{n}` |
//! | transfer 0 / 1-3 | `{route}transfere` / `{route}transfer{k}` |
//! | extra line count | `{route}changeline` |
//! | departure times | `{route}line{n}{tag}{hh}` |
//! | ride times | `{route}line{n}ridetime{tag}{hh}` |
//! | train types | `{route}line{n}traintype{tag}{hh}` |
//! | train type list | `{route}line{n}traintypelist{tag}` |

use crate::calendar::Calendar;
use crate::domain::{DomainError, Hour, LineSlot, RouteDirection, TransferSlot};

/// The address of one timetable bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BucketAddress {
    pub route: RouteDirection,
    pub line: LineSlot,
    pub calendar: Calendar,
    pub hour: Hour,
}

impl BucketAddress {
    pub fn new(route: RouteDirection, line: LineSlot, calendar: Calendar, hour: Hour) -> Self {
        Self {
            route,
            line,
            calendar,
            hour,
        }
    }

    /// The same route, line and calendar at another hour.
    pub fn at_hour(&self, hour: Hour) -> Self {
        Self {
            hour,
            ..self.clone()
        }
    }

    /// The three blob keys of this bucket.
    pub fn keys(&self) -> BucketKeys {
        BucketKeys {
            times: departure_times(self.route, self.line, &self.calendar, self.hour),
            ride_times: ride_times(self.route, self.line, &self.calendar, self.hour),
            train_types: train_types(self.route, self.line, &self.calendar, self.hour),
        }
    }

    /// Key of the train type list shared by every hour of this calendar.
    pub fn train_type_list_key(&self) -> String {
        train_type_list(self.route, self.line, &self.calendar)
    }
}

/// The parallel blob keys of one bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketKeys {
    pub times: String,
    pub ride_times: String,
    pub train_types: String,
}

fn line_field(route: RouteDirection, field: &str, line: LineSlot) -> String {
    format!("{route}{field}{}", line.number())
}

pub fn line_name(route: RouteDirection, line: LineSlot) -> String {
    line_field(route, "linename", line)
}

pub fn operator_name(route: RouteDirection, line: LineSlot) -> String {
    line_field(route, "operatorname", line)
}

pub fn line_color(route: RouteDirection, line: LineSlot) -> String {
    line_field(route, "linecolor", line)
}

pub fn line_code(route: RouteDirection, line: LineSlot) -> String {
    line_field(route, "linecode", line)
}

pub fn line_kind(route: RouteDirection, line: LineSlot) -> String {
    line_field(route, "linekind", line)
}

pub fn ride_time(route: RouteDirection, line: LineSlot) -> String {
    line_field(route, "ridetime", line)
}

/// Label of the home-side endpoint of a line.
pub fn home_label(route: RouteDirection, line: LineSlot) -> String {
    line_field(route, "departure", line)
}

/// Label of the away-side endpoint of a line.
pub fn away_label(route: RouteDirection, line: LineSlot) -> String {
    line_field(route, "arrival", line)
}

/// Key of the label shown as the departure point.
///
/// Return routes leave from the away side.
pub fn departure_point(route: RouteDirection, line: LineSlot) -> String {
    if route.is_return() {
        away_label(route, line)
    } else {
        home_label(route, line)
    }
}

/// Key of the label shown as the destination.
pub fn destination(route: RouteDirection, line: LineSlot) -> String {
    if route.is_return() {
        home_label(route, line)
    } else {
        away_label(route, line)
    }
}

/// Key of a transfer time; slot 0 uses the `e` suffix.
///
/// # Examples
///
/// ```
/// use timetable_core::domain::{RouteDirection, TransferSlot};
/// use timetable_core::keys;
///
/// let go1 = RouteDirection::Go1;
/// assert_eq!(keys::transfer(go1, TransferSlot::new(0).unwrap()), "go1transfere");
/// assert_eq!(keys::transfer(go1, TransferSlot::new(2).unwrap()), "go1transfer2");
/// ```
pub fn transfer(route: RouteDirection, slot: TransferSlot) -> String {
    match slot.index() {
        0 => format!("{route}transfere"),
        k => format!("{route}transfer{k}"),
    }
}

pub fn line_count(route: RouteDirection) -> String {
    format!("{route}changeline")
}

fn line_prefix(route: RouteDirection, line: LineSlot) -> String {
    format!("{route}line{}", line.number())
}

/// # Examples
///
/// ```
/// use timetable_core::calendar::Calendar;
/// use timetable_core::domain::{Hour, LineSlot, RouteDirection};
/// use timetable_core::keys;
///
/// let key = keys::departure_times(
///     RouteDirection::Go1,
///     LineSlot::new(0).unwrap(),
///     &Calendar::weekday(),
///     Hour::new(8).unwrap(),
/// );
/// assert_eq!(key, "go1line1weekday08");
/// ```
pub fn departure_times(
    route: RouteDirection,
    line: LineSlot,
    calendar: &Calendar,
    hour: Hour,
) -> String {
    format!(
        "{}{}{hour}",
        line_prefix(route, line),
        calendar.storage_tag()
    )
}

pub fn ride_times(route: RouteDirection, line: LineSlot, calendar: &Calendar, hour: Hour) -> String {
    format!(
        "{}ridetime{}{hour}",
        line_prefix(route, line),
        calendar.storage_tag()
    )
}

pub fn train_types(
    route: RouteDirection,
    line: LineSlot,
    calendar: &Calendar,
    hour: Hour,
) -> String {
    format!(
        "{}traintype{}{hour}",
        line_prefix(route, line),
        calendar.storage_tag()
    )
}

pub fn train_type_list(route: RouteDirection, line: LineSlot, calendar: &Calendar) -> String {
    format!(
        "{}traintypelist{}",
        line_prefix(route, line),
        calendar.storage_tag()
    )
}

/// Where a bucket's departures can be copied from.
///
/// The order is fixed; a picker built on these indexes must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CopySource {
    /// The hour before, same route, line and calendar.
    PreviousHour,
    /// The hour after, same route, line and calendar.
    NextHour,
    /// Same hour on the other side of the weekday/holiday split.
    OppositeCalendar,
    /// Same hour and calendar on a line of the opposite route.
    OppositeRoute(LineSlot),
}

impl CopySource {
    pub const ALL: [CopySource; 6] = [
        CopySource::PreviousHour,
        CopySource::NextHour,
        CopySource::OppositeCalendar,
        CopySource::OppositeRoute(LineSlot::ALL[0]),
        CopySource::OppositeRoute(LineSlot::ALL[1]),
        CopySource::OppositeRoute(LineSlot::ALL[2]),
    ];

    pub fn from_index(index: usize) -> Result<Self, DomainError> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(DomainError::CopySource(index))
    }

    pub fn index(&self) -> usize {
        match self {
            CopySource::PreviousHour => 0,
            CopySource::NextHour => 1,
            CopySource::OppositeCalendar => 2,
            CopySource::OppositeRoute(line) => 3 + line.index() as usize,
        }
    }

    /// The bucket this source reads from, if it exists.
    ///
    /// Hour 4 has no previous hour and hour 25 no next hour.
    pub fn address(&self, target: &BucketAddress) -> Option<BucketAddress> {
        match self {
            CopySource::PreviousHour => target.hour.prev().map(|h| target.at_hour(h)),
            CopySource::NextHour => target.hour.next().map(|h| target.at_hour(h)),
            CopySource::OppositeCalendar => Some(BucketAddress {
                calendar: target.calendar.opposite(),
                ..target.clone()
            }),
            CopySource::OppositeRoute(line) => Some(BucketAddress {
                route: target.route.opposite(),
                line: *line,
                ..target.clone()
            }),
        }
    }
}

/// The departure-times keys of all six copy sources, in picker order.
pub fn copy_sources(target: &BucketAddress) -> [Option<String>; 6] {
    CopySource::ALL.map(|source| source.address(target).map(|addr| addr.keys().times))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{DayType, SpecificDay};
    use std::collections::HashSet;

    fn slot(i: u8) -> LineSlot {
        LineSlot::new(i).unwrap()
    }

    fn hour(h: u32) -> Hour {
        Hour::new(h).unwrap()
    }

    #[test]
    fn line_keys() {
        let r = RouteDirection::Go2;
        let l = slot(1);
        assert_eq!(line_name(r, l), "go2linename2");
        assert_eq!(operator_name(r, l), "go2operatorname2");
        assert_eq!(line_color(r, l), "go2linecolor2");
        assert_eq!(line_code(r, l), "go2linecode2");
        assert_eq!(line_kind(r, l), "go2linekind2");
        assert_eq!(ride_time(r, l), "go2ridetime2");
        assert_eq!(line_count(r), "go2changeline");
    }

    #[test]
    fn endpoint_labels_flip_on_return() {
        let l = slot(0);
        assert_eq!(departure_point(RouteDirection::Go1, l), "go1departure1");
        assert_eq!(destination(RouteDirection::Go1, l), "go1arrival1");
        assert_eq!(departure_point(RouteDirection::Back1, l), "back1arrival1");
        assert_eq!(destination(RouteDirection::Back1, l), "back1departure1");
    }

    #[test]
    fn bucket_keys() {
        let addr = BucketAddress::new(
            RouteDirection::Back1,
            slot(2),
            Calendar::Standard(DayType::Holiday),
            hour(24),
        );
        let keys = addr.keys();
        assert_eq!(keys.times, "back1line3holiday24");
        assert_eq!(keys.ride_times, "back1line3ridetimeholiday24");
        assert_eq!(keys.train_types, "back1line3traintypeholiday24");
        assert_eq!(addr.train_type_list_key(), "back1line3traintypelistholiday");
    }

    #[test]
    fn hours_below_ten_are_padded() {
        let key = departure_times(RouteDirection::Go1, slot(0), &Calendar::weekday(), hour(5));
        assert_eq!(key, "go1line1weekday05");
    }

    #[test]
    fn specific_day_keys_use_their_tag() {
        let cal = Calendar::Specific(SpecificDay::new("odpt.Calendar:Specific.Toei.Day-160"));
        let key = departure_times(RouteDirection::Go1, slot(0), &cal, hour(9));
        assert_eq!(key, "go1line1day-16009");
    }

    #[test]
    fn no_collisions_across_the_key_space() {
        let calendars: Vec<Calendar> = DayType::ALL
            .into_iter()
            .map(Calendar::Standard)
            .chain(
                [
                    "odpt.Calendar:Specific.X.Weekday",
                    "odpt.Calendar:Specific.X.Day-100",
                    "odpt.Calendar:Specific.X.List08",
                    "odpt.Calendar:Specific.X.TrainTypeA",
                    "odpt.Calendar:Specific.X.A",
                ]
                .into_iter()
                .map(|raw| Calendar::Specific(SpecificDay::new(raw))),
            )
            .collect();

        let mut all = HashSet::new();
        let mut count = 0;
        let mut insert = |key: String| {
            count += 1;
            assert!(all.insert(key.clone()), "duplicate key {key}");
        };

        for route in RouteDirection::ALL {
            insert(line_count(route));
            for t in TransferSlot::ALL {
                insert(transfer(route, t));
            }
            for line in LineSlot::ALL {
                insert(line_name(route, line));
                insert(operator_name(route, line));
                insert(line_color(route, line));
                insert(line_code(route, line));
                insert(line_kind(route, line));
                insert(ride_time(route, line));
                insert(home_label(route, line));
                insert(away_label(route, line));
                for cal in &calendars {
                    insert(train_type_list(route, line, cal));
                    for h in Hour::all() {
                        let keys = BucketAddress::new(route, line, cal.clone(), h).keys();
                        insert(keys.times);
                        insert(keys.ride_times);
                        insert(keys.train_types);
                    }
                }
            }
        }
        assert!(count > 1000);
    }

    #[test]
    fn copy_source_indexes() {
        for (i, source) in CopySource::ALL.iter().enumerate() {
            assert_eq!(source.index(), i);
            assert_eq!(CopySource::from_index(i).unwrap(), *source);
        }
        assert_eq!(CopySource::from_index(6), Err(DomainError::CopySource(6)));
    }

    #[test]
    fn copy_sources_for_a_middle_hour() {
        let target = BucketAddress::new(RouteDirection::Go1, slot(0), Calendar::weekday(), hour(8));
        let sources = copy_sources(&target);
        assert_eq!(
            sources,
            [
                Some("go1line1weekday07".to_string()),
                Some("go1line1weekday09".to_string()),
                Some("go1line1holiday08".to_string()),
                Some("back1line1weekday08".to_string()),
                Some("back1line2weekday08".to_string()),
                Some("back1line3weekday08".to_string()),
            ]
        );
    }

    #[test]
    fn last_hour_has_no_next() {
        let target = BucketAddress::new(
            RouteDirection::Back2,
            slot(1),
            Calendar::Standard(DayType::Holiday),
            Hour::LAST,
        );
        let sources = copy_sources(&target);
        assert_eq!(sources[0].as_deref(), Some("back2line2holiday24"));
        assert_eq!(sources[1], None);
        assert_eq!(sources[2].as_deref(), Some("back2line2weekday25"));
        assert_eq!(sources[3].as_deref(), Some("go2line1holiday25"));
    }

    #[test]
    fn first_hour_has_no_previous() {
        let target = BucketAddress::new(RouteDirection::Go1, slot(0), Calendar::weekday(), Hour::FIRST);
        assert_eq!(copy_sources(&target)[0], None);
    }
}
