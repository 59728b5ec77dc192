//! Picking the calendar that applies on a given date.

use chrono::{Datelike, NaiveDate, Weekday};
use tracing::trace;

use super::category::{Calendar, DayType};
use super::holidays::HolidayCalendar;

/// The day types to try for `date`, most specific first.
fn preference_chain(date: NaiveDate, holidays: &impl HolidayCalendar) -> Vec<DayType> {
    let weekday = date.weekday();

    match weekday {
        Weekday::Sat | Weekday::Sun => vec![DayType::from_weekday(weekday), DayType::Weekend],
        _ if holidays.is_holiday(date) => vec![DayType::Weekend],
        _ => vec![DayType::from_weekday(weekday), DayType::Weekday],
    }
}

/// Choose which of the available calendars applies on `date`.
///
/// On a working weekday an exact day-name timetable wins over the general
/// weekday one. On Saturdays and Sundays an exact day name wins over the
/// weekend union; a holiday on a working weekday goes straight to the
/// weekend union. If nothing matches, the first available calendar is used,
/// or weekday when none are available. A `holiday` calendar is only ever
/// picked by that last fallback.
///
/// Specific-day calendars match through their canonical category.
///
/// # Examples
///
/// ```
/// use timetable_core::calendar::{resolve_for_date, Calendar, DayType, NoHolidays};
/// use chrono::NaiveDate;
///
/// let available = [Calendar::weekday(), Calendar::Standard(DayType::Weekend)];
/// let wednesday = NaiveDate::from_ymd_opt(2026, 10, 14).unwrap();
/// let sunday = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
///
/// assert_eq!(resolve_for_date(wednesday, &available, &NoHolidays), Calendar::weekday());
/// assert_eq!(
///     resolve_for_date(sunday, &available, &NoHolidays),
///     Calendar::Standard(DayType::Weekend)
/// );
/// ```
pub fn resolve_for_date(
    date: NaiveDate,
    available: &[Calendar],
    holidays: &impl HolidayCalendar,
) -> Calendar {
    for wanted in preference_chain(date, holidays) {
        if let Some(found) = available.iter().find(|c| c.category() == wanted) {
            trace!(%date, calendar = %found, "resolved calendar");
            return found.clone();
        }
    }

    let fallback = available.first().cloned().unwrap_or_else(Calendar::weekday);
    trace!(%date, calendar = %fallback, "no calendar matched, using fallback");
    fallback
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{HolidaySet, NoHolidays, SpecificDay};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // 2026-10-12 is a Monday
    fn monday() -> NaiveDate {
        date(2026, 10, 12)
    }
    fn wednesday() -> NaiveDate {
        date(2026, 10, 14)
    }
    fn saturday() -> NaiveDate {
        date(2026, 10, 17)
    }
    fn sunday() -> NaiveDate {
        date(2026, 10, 18)
    }

    fn cal(day: DayType) -> Calendar {
        Calendar::Standard(day)
    }

    #[test]
    fn weekday_and_weekend_set() {
        let available = [cal(DayType::Weekday), cal(DayType::Weekend)];
        assert_eq!(
            resolve_for_date(wednesday(), &available, &NoHolidays),
            cal(DayType::Weekday)
        );
        assert_eq!(
            resolve_for_date(sunday(), &available, &NoHolidays),
            cal(DayType::Weekend)
        );
        assert_eq!(
            resolve_for_date(saturday(), &available, &NoHolidays),
            cal(DayType::Weekend)
        );
    }

    #[test]
    fn exact_day_name_wins() {
        let available = [
            cal(DayType::Weekday),
            cal(DayType::Wednesday),
            cal(DayType::Saturday),
            cal(DayType::Weekend),
        ];
        assert_eq!(
            resolve_for_date(wednesday(), &available, &NoHolidays),
            cal(DayType::Wednesday)
        );
        assert_eq!(
            resolve_for_date(monday(), &available, &NoHolidays),
            cal(DayType::Weekday)
        );
        assert_eq!(
            resolve_for_date(saturday(), &available, &NoHolidays),
            cal(DayType::Saturday)
        );
        assert_eq!(
            resolve_for_date(sunday(), &available, &NoHolidays),
            cal(DayType::Weekend)
        );
    }

    #[test]
    fn holiday_on_a_weekday() {
        let holidays = HolidaySet::new([monday()]);
        let available = [
            cal(DayType::Weekday),
            cal(DayType::Monday),
            cal(DayType::Holiday),
            cal(DayType::Weekend),
        ];
        assert_eq!(
            resolve_for_date(monday(), &available, &holidays),
            cal(DayType::Weekend)
        );

        // No weekend union: neither the day name nor holiday is tried
        let available = [cal(DayType::Monday), cal(DayType::Holiday)];
        assert_eq!(
            resolve_for_date(monday(), &available, &holidays),
            cal(DayType::Monday)
        );
        let available = [cal(DayType::Holiday), cal(DayType::Monday)];
        assert_eq!(
            resolve_for_date(monday(), &available, &holidays),
            cal(DayType::Holiday)
        );
    }

    #[test]
    fn sunday_uses_weekend_before_holiday() {
        let available = [cal(DayType::Holiday), cal(DayType::Weekend)];
        assert_eq!(
            resolve_for_date(sunday(), &available, &NoHolidays),
            cal(DayType::Weekend)
        );

        let available = [cal(DayType::Holiday), cal(DayType::Weekend), cal(DayType::Sunday)];
        assert_eq!(
            resolve_for_date(sunday(), &available, &NoHolidays),
            cal(DayType::Sunday)
        );
    }

    #[test]
    fn saturday_holiday_follows_saturday_chain() {
        let holidays = HolidaySet::new([saturday()]);
        let available = [cal(DayType::Holiday), cal(DayType::Saturday), cal(DayType::Weekend)];
        assert_eq!(
            resolve_for_date(saturday(), &available, &holidays),
            cal(DayType::Saturday)
        );
    }

    #[test]
    fn fallback_is_first_available() {
        let available = [cal(DayType::Saturday), cal(DayType::Holiday)];
        assert_eq!(
            resolve_for_date(wednesday(), &available, &NoHolidays),
            cal(DayType::Saturday)
        );
    }

    #[test]
    fn empty_set_is_weekday() {
        assert_eq!(
            resolve_for_date(sunday(), &[], &NoHolidays),
            cal(DayType::Weekday)
        );
    }

    #[test]
    fn specific_days_match_by_category() {
        let specific = Calendar::Specific(SpecificDay::new("odpt.Calendar:Specific.Toei.A-160"));
        let available = [cal(DayType::Weekday), specific.clone()];
        assert_eq!(resolve_for_date(saturday(), &available, &NoHolidays), specific);

        // A holiday-category specific day is not part of the Sunday chain
        let holiday = Calendar::Specific(SpecificDay::new("odpt.Calendar:Specific.Toei.A-100"));
        let available = [cal(DayType::Weekday), holiday];
        assert_eq!(
            resolve_for_date(sunday(), &available, &NoHolidays),
            cal(DayType::Weekday)
        );
    }
}
