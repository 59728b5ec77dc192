//! Calendar categories and their storage tags.

use std::fmt;

use chrono::Weekday;
use tracing::warn;

use crate::domain::Decoded;

/// Prefix of ODPT calendar identifiers.
const ODPT_PREFIX: &str = "odpt.Calendar:";

/// Words that start other blob keys after the line prefix (or after
/// `traintype`); a tag beginning with one of them could alias another field.
const RESERVED_TAG_PREFIXES: [&str; 3] = ["ridetime", "traintype", "list"];

/// A canonical day type a timetable applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DayType {
    Weekday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
    Holiday,
    /// Saturdays, Sundays and holidays together.
    Weekend,
}

impl DayType {
    pub const ALL: [DayType; 10] = [
        DayType::Weekday,
        DayType::Monday,
        DayType::Tuesday,
        DayType::Wednesday,
        DayType::Thursday,
        DayType::Friday,
        DayType::Saturday,
        DayType::Sunday,
        DayType::Holiday,
        DayType::Weekend,
    ];

    /// The tag used in storage keys.
    pub fn storage_tag(&self) -> &'static str {
        match self {
            DayType::Weekday => "weekday",
            DayType::Monday => "monday",
            DayType::Tuesday => "tuesday",
            DayType::Wednesday => "wednesday",
            DayType::Thursday => "thursday",
            DayType::Friday => "friday",
            DayType::Saturday => "saturday",
            DayType::Sunday => "sunday",
            DayType::Holiday => "holiday",
            DayType::Weekend => "weekend",
        }
    }

    /// The name used in ODPT calendar identifiers.
    pub fn odpt_name(&self) -> &'static str {
        match self {
            DayType::Weekday => "Weekday",
            DayType::Monday => "Monday",
            DayType::Tuesday => "Tuesday",
            DayType::Wednesday => "Wednesday",
            DayType::Thursday => "Thursday",
            DayType::Friday => "Friday",
            DayType::Saturday => "Saturday",
            DayType::Sunday => "Sunday",
            DayType::Holiday => "Holiday",
            DayType::Weekend => "SaturdayHoliday",
        }
    }

    /// Match a bare name, case-insensitively.
    ///
    /// Both the storage tag and the ODPT name are accepted.
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        if lower == "saturdayholiday" {
            return Some(DayType::Weekend);
        }
        DayType::ALL
            .into_iter()
            .find(|d| d.storage_tag() == lower)
    }

    /// The single-day type for a day of the week.
    pub fn from_weekday(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => DayType::Monday,
            Weekday::Tue => DayType::Tuesday,
            Weekday::Wed => DayType::Wednesday,
            Weekday::Thu => DayType::Thursday,
            Weekday::Fri => DayType::Friday,
            Weekday::Sat => DayType::Saturday,
            Weekday::Sun => DayType::Sunday,
        }
    }

    /// Weekday or one of Monday-Friday.
    pub fn is_weekday_family(&self) -> bool {
        matches!(
            self,
            DayType::Weekday
                | DayType::Monday
                | DayType::Tuesday
                | DayType::Wednesday
                | DayType::Thursday
                | DayType::Friday
        )
    }

    /// The category on the other side of the weekday/holiday split.
    pub fn opposite(&self) -> Self {
        if self.is_weekday_family() {
            DayType::Holiday
        } else {
            DayType::Weekday
        }
    }
}

impl fmt::Display for DayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.storage_tag())
    }
}

/// An agency-specific calendar, canonicalized once when it is read.
///
/// The raw identifier is kept for matching against external data; the
/// storage tag keeps its timetables apart from standard-category data.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpecificDay {
    raw: String,
    category: DayType,
    tag: String,
}

impl SpecificDay {
    /// Canonicalize a specific-day identifier.
    ///
    /// # Examples
    ///
    /// ```
    /// use timetable_core::calendar::{DayType, SpecificDay};
    ///
    /// let day = SpecificDay::new("odpt.Calendar:Specific.Toei.Day-160");
    /// assert_eq!(day.category(), DayType::Saturday);
    /// assert_eq!(day.storage_tag(), "day-160");
    /// assert_eq!(day.raw(), "odpt.Calendar:Specific.Toei.Day-160");
    /// ```
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let last = last_component(&raw);
        let category = specific_category(last);
        let tag = specific_tag(last);
        Self { raw, category, tag }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The standard category this day displays as.
    pub fn category(&self) -> DayType {
        self.category
    }

    pub fn storage_tag(&self) -> &str {
        &self.tag
    }
}

/// A calendar a timetable is stored under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Calendar {
    Standard(DayType),
    Specific(SpecificDay),
}

impl Calendar {
    pub fn weekday() -> Self {
        Calendar::Standard(DayType::Weekday)
    }

    /// Decode a raw calendar identifier, reporting substituted defaults.
    ///
    /// Identifiers containing `Specific` become [`Calendar::Specific`].
    /// Other identifiers must name a standard day type, with or without
    /// the `odpt.Calendar:` prefix; anything else falls back to weekday.
    pub fn decode(raw: &str) -> Decoded<Calendar> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Decoded::Absent(Calendar::weekday());
        }
        if raw.contains("Specific") {
            return Decoded::Value(Calendar::Specific(SpecificDay::new(raw)));
        }
        let name = raw.strip_prefix(ODPT_PREFIX).unwrap_or(raw);
        match DayType::from_name(name) {
            Some(day) => Decoded::Value(Calendar::Standard(day)),
            None => Decoded::Malformed(Calendar::weekday()),
        }
    }

    /// The canonical display category.
    pub fn category(&self) -> DayType {
        match self {
            Calendar::Standard(day) => *day,
            Calendar::Specific(day) => day.category(),
        }
    }

    /// The tag used in storage keys.
    pub fn storage_tag(&self) -> &str {
        match self {
            Calendar::Standard(day) => day.storage_tag(),
            Calendar::Specific(day) => day.storage_tag(),
        }
    }

    /// The identifier to match against external data.
    pub fn odpt_id(&self) -> String {
        match self {
            Calendar::Standard(day) => format!("{ODPT_PREFIX}{}", day.odpt_name()),
            Calendar::Specific(day) => day.raw().to_string(),
        }
    }

    /// The standard calendar across the weekday/holiday split.
    pub fn opposite(&self) -> Calendar {
        Calendar::Standard(self.category().opposite())
    }
}

impl From<DayType> for Calendar {
    fn from(day: DayType) -> Self {
        Calendar::Standard(day)
    }
}

impl fmt::Display for Calendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.storage_tag())
    }
}

/// Canonicalize a raw calendar identifier.
///
/// Unknown identifiers resolve to weekday and are logged.
///
/// # Examples
///
/// ```
/// use timetable_core::calendar::{canonicalize, Calendar, DayType};
///
/// assert_eq!(canonicalize("odpt.Calendar:SaturdayHoliday"), Calendar::Standard(DayType::Weekend));
/// assert_eq!(canonicalize("holiday"), Calendar::Standard(DayType::Holiday));
/// assert_eq!(canonicalize("odpt.Calendar:Specific.X.Holiday").category(), DayType::Holiday);
/// assert_eq!(canonicalize("mystery"), Calendar::weekday());
/// ```
pub fn canonicalize(raw: &str) -> Calendar {
    let decoded = Calendar::decode(raw);
    if decoded.is_malformed() {
        warn!(calendar = raw, "unknown calendar identifier, using weekday");
    }
    decoded.value()
}

fn last_component(raw: &str) -> &str {
    raw.rsplit('.').next().unwrap_or(raw)
}

fn specific_category(last: &str) -> DayType {
    match last {
        "Weekday" => return DayType::Weekday,
        "Saturday" => return DayType::Saturday,
        "Holiday" => return DayType::Holiday,
        _ => {}
    }

    let parts: Vec<&str> = if last.split('-').count() > 1 {
        last.split('-').collect()
    } else {
        last.split('_').collect()
    };

    match parts.last().copied() {
        Some("100") | Some("109") => DayType::Holiday,
        Some("160") => DayType::Saturday,
        Some("170") | Some("179") => DayType::Weekday,
        _ => DayType::Weekday,
    }
}

fn specific_tag(last: &str) -> String {
    let tag = last.to_lowercase();
    let collides = DayType::ALL.iter().any(|d| d.storage_tag() == tag)
        || tag == "saturdayholiday"
        || RESERVED_TAG_PREFIXES.iter().any(|p| tag.starts_with(p));
    if collides { format!("sp{tag}") } else { tag }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_names_map_one_to_one() {
        for day in DayType::ALL {
            assert_eq!(canonicalize(day.storage_tag()), Calendar::Standard(day));
            let odpt = format!("odpt.Calendar:{}", day.odpt_name());
            assert_eq!(canonicalize(&odpt), Calendar::Standard(day));
        }
    }

    #[test]
    fn specific_literal_names() {
        let day = SpecificDay::new("odpt.Calendar:Specific.JR-East.Saturday");
        assert_eq!(day.category(), DayType::Saturday);
        let day = SpecificDay::new("odpt.Calendar:Specific.JR-East.Holiday");
        assert_eq!(day.category(), DayType::Holiday);
    }

    #[test]
    fn specific_numeric_suffixes() {
        let cases = [
            ("odpt.Calendar:Specific.Toei.A-100", DayType::Holiday),
            ("odpt.Calendar:Specific.Toei.A-109", DayType::Holiday),
            ("odpt.Calendar:Specific.Toei.A-160", DayType::Saturday),
            ("odpt.Calendar:Specific.Toei.A-170", DayType::Weekday),
            ("odpt.Calendar:Specific.Toei.A-179", DayType::Weekday),
            ("odpt.Calendar:Specific.Toei.A_160", DayType::Saturday),
            ("odpt.Calendar:Specific.Toei.A_B_109", DayType::Holiday),
        ];
        for (raw, expected) in cases {
            assert_eq!(SpecificDay::new(raw).category(), expected, "{raw}");
        }
    }

    #[test]
    fn specific_unknown_suffix_is_weekday() {
        assert_eq!(
            SpecificDay::new("odpt.Calendar:Specific.Toei.A-999").category(),
            DayType::Weekday
        );
        assert_eq!(
            SpecificDay::new("odpt.Calendar:Specific.Toei.Plain").category(),
            DayType::Weekday
        );
    }

    #[test]
    fn hyphen_split_wins_over_underscore() {
        // "-" yields more than one part, so "_" is never consulted
        let day = SpecificDay::new("odpt.Calendar:Specific.X.A_160-100");
        assert_eq!(day.category(), DayType::Holiday);
    }

    #[test]
    fn specific_tag_is_lowercase_last_component() {
        let day = SpecificDay::new("odpt.Calendar:Specific.Toei.Day-160");
        assert_eq!(day.storage_tag(), "day-160");
    }

    #[test]
    fn specific_tag_never_aliases_standard_data() {
        let day = SpecificDay::new("odpt.Calendar:Specific.JR-East.Weekday");
        assert_eq!(day.category(), DayType::Weekday);
        assert_eq!(day.storage_tag(), "spweekday");
        assert_ne!(
            Calendar::Specific(day).storage_tag(),
            Calendar::weekday().storage_tag()
        );
    }

    #[test]
    fn specific_tag_avoids_reserved_words() {
        let day = SpecificDay::new("odpt.Calendar:Specific.X.RideTimeDay");
        assert_eq!(day.storage_tag(), "spridetimeday");
    }

    #[test]
    fn specific_tag_avoids_list_prefix() {
        let day = SpecificDay::new("odpt.Calendar:Specific.X.List08");
        assert_eq!(day.storage_tag(), "splist08");
    }

    #[test]
    fn canonicalization_is_stable() {
        let raw = "odpt.Calendar:Specific.Keio.Day_109";
        assert_eq!(SpecificDay::new(raw), SpecificDay::new(raw));
    }

    #[test]
    fn decode_reports_provenance() {
        assert!(matches!(Calendar::decode(""), Decoded::Absent(_)));
        assert!(matches!(Calendar::decode("nonsense"), Decoded::Malformed(_)));
        assert!(matches!(Calendar::decode("weekend"), Decoded::Value(_)));
    }

    #[test]
    fn opposite_splits_weekday_and_holiday() {
        assert_eq!(
            Calendar::weekday().opposite(),
            Calendar::Standard(DayType::Holiday)
        );
        assert_eq!(
            Calendar::Standard(DayType::Thursday).opposite(),
            Calendar::Standard(DayType::Holiday)
        );
        assert_eq!(
            Calendar::Standard(DayType::Weekend).opposite(),
            Calendar::weekday()
        );
        let specific = Calendar::Specific(SpecificDay::new("odpt.Calendar:Specific.X.A-100"));
        assert_eq!(specific.opposite(), Calendar::weekday());
    }

    #[test]
    fn odpt_ids() {
        assert_eq!(
            Calendar::Standard(DayType::Weekend).odpt_id(),
            "odpt.Calendar:SaturdayHoliday"
        );
        let raw = "odpt.Calendar:Specific.X.A-100";
        assert_eq!(Calendar::Specific(SpecificDay::new(raw)).odpt_id(), raw);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Specific tags never equal a standard tag
        #[test]
        fn specific_tags_disjoint_from_standard(last in "[A-Za-z][A-Za-z0-9_-]{0,12}") {
            let day = SpecificDay::new(format!("odpt.Calendar:Specific.Op.{last}"));
            prop_assert!(DayType::ALL.iter().all(|d| d.storage_tag() != day.storage_tag()));
        }

        /// Specific days only display as weekday, Saturday or holiday
        #[test]
        fn specific_categories_limited(last in "[A-Za-z0-9_-]{1,12}") {
            let day = SpecificDay::new(format!("odpt.Calendar:Specific.Op.{last}"));
            prop_assert!(matches!(
                day.category(),
                DayType::Weekday | DayType::Saturday | DayType::Holiday
            ));
        }
    }
}
