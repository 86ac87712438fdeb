//! Expansion of GTFS calendars into concrete service dates.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use hashbrown::HashMap;

use super::feed::{CalendarAvailability, CalendarException, FeedCalendar, FeedCalendarDate};
use crate::model::Service;
use crate::Error;

/// Expands weekly calendars and their exceptions into [`Service`]s holding
/// concrete dates, bounded by an optional inclusive `[from_date, to_date]`
/// window.
///
/// Exceptions are applied in source order after the weekly rows; exceptions
/// outside the window are ignored. A `Removed` exception for a date that is
/// not present is a feed error, as is a duplicate calendar row.
pub fn expand_services(
    calendars: &[FeedCalendar],
    calendar_dates: &[FeedCalendarDate],
    from_date: Option<NaiveDate>,
    to_date: Option<NaiveDate>,
) -> Result<HashMap<String, Service>, Error> {
    let limit_start = from_date.unwrap_or(NaiveDate::MIN);
    let limit_end = to_date.unwrap_or(NaiveDate::MAX);

    let mut services: HashMap<String, Service> = HashMap::with_capacity(calendars.len());

    for calendar in calendars {
        let calendar_start = calendar.start_date.ok_or_else(|| {
            Error::InconsistentFeed(format!(
                "calendar for service '{}' has no start date",
                calendar.service_id
            ))
        })?;
        let calendar_end = calendar.end_date.ok_or_else(|| {
            Error::InconsistentFeed(format!(
                "calendar for service '{}' has no end date",
                calendar.service_id
            ))
        })?;

        // The window and the calendar's own period both bound the expansion.
        let start = calendar_start.max(limit_start);
        let end = calendar_end.min(limit_end);

        let mut dates = Vec::new();
        for weekday in active_weekdays(calendar) {
            dates.extend(weekdays_in_period(start, end, weekday));
        }

        if services.contains_key(&calendar.service_id) {
            return Err(Error::InconsistentFeed(format!(
                "duplicate service ID '{}' in calendar",
                calendar.service_id
            )));
        }
        services.insert(
            calendar.service_id.clone(),
            Service::new(calendar.service_id.clone(), dates),
        );
    }

    for exception in calendar_dates {
        let date = exception.date.ok_or_else(|| {
            Error::InconsistentFeed(format!(
                "calendar exception for service '{}' has no date",
                exception.service_id
            ))
        })?;
        if date < limit_start || date > limit_end {
            continue;
        }
        let service = services.get_mut(&exception.service_id).ok_or_else(|| {
            Error::InconsistentFeed(format!(
                "unknown service ID '{}' in calendar exceptions",
                exception.service_id
            ))
        })?;
        let active_days = service.active_days_mut();
        match exception.exception_type {
            CalendarException::Added => active_days.push(date),
            CalendarException::Removed => {
                let position = active_days.iter().position(|&d| d == date).ok_or_else(|| {
                    Error::InconsistentFeed(format!(
                        "cannot remove date {date} from service '{}': not scheduled",
                        exception.service_id
                    ))
                })?;
                active_days.remove(position);
            }
        }
    }

    Ok(services)
}

fn active_weekdays(calendar: &FeedCalendar) -> Vec<Weekday> {
    let flags = [
        (Weekday::Mon, calendar.monday),
        (Weekday::Tue, calendar.tuesday),
        (Weekday::Wed, calendar.wednesday),
        (Weekday::Thu, calendar.thursday),
        (Weekday::Fri, calendar.friday),
        (Weekday::Sat, calendar.saturday),
        (Weekday::Sun, calendar.sunday),
    ];
    flags
        .into_iter()
        .filter(|(_, availability)| *availability == CalendarAvailability::Available)
        .map(|(weekday, _)| weekday)
        .collect()
}

/// All occurrences of `weekday` in the inclusive period `[start, end]`.
fn weekdays_in_period(start: NaiveDate, end: NaiveDate, weekday: Weekday) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    if end < start {
        return dates;
    }
    let days_until = (7 + weekday.num_days_from_monday() - start.weekday().num_days_from_monday()) % 7;
    let mut current = match start.checked_add_days(Days::new(u64::from(days_until))) {
        Some(date) => date,
        None => return dates,
    };
    while current <= end {
        dates.push(current);
        match current.checked_add_days(Days::new(7)) {
            Some(next) => current = next,
            None => break,
        }
    }
    dates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn weekday_calendar(service_id: &str, weekdays: &[Weekday], start: NaiveDate, end: NaiveDate) -> FeedCalendar {
        let availability = |w: Weekday| {
            if weekdays.contains(&w) {
                CalendarAvailability::Available
            } else {
                CalendarAvailability::NotAvailable
            }
        };
        FeedCalendar {
            service_id: service_id.into(),
            monday: availability(Weekday::Mon),
            tuesday: availability(Weekday::Tue),
            wednesday: availability(Weekday::Wed),
            thursday: availability(Weekday::Thu),
            friday: availability(Weekday::Fri),
            saturday: availability(Weekday::Sat),
            sunday: availability(Weekday::Sun),
            start_date: Some(start),
            end_date: Some(end),
        }
    }

    #[test]
    fn enumerates_weekday_occurrences() {
        // 2024-04-01 is a Monday.
        let calendar = weekday_calendar(
            "s1",
            &[Weekday::Mon, Weekday::Wed],
            date(2024, 4, 1),
            date(2024, 4, 14),
        );
        let services = expand_services(&[calendar], &[], None, None).unwrap();
        let mut days = services["s1"].active_days().to_vec();
        days.sort();
        assert_eq!(
            days,
            vec![
                date(2024, 4, 1),
                date(2024, 4, 3),
                date(2024, 4, 8),
                date(2024, 4, 10),
            ]
        );
    }

    #[test]
    fn window_intersects_the_calendar_period() {
        let calendar = weekday_calendar("s1", &[Weekday::Mon], date(2024, 4, 1), date(2024, 4, 30));
        let services = expand_services(
            &[calendar],
            &[],
            Some(date(2024, 4, 8)),
            Some(date(2024, 4, 21)),
        )
        .unwrap();
        assert_eq!(
            services["s1"].active_days(),
            &[date(2024, 4, 8), date(2024, 4, 15)]
        );
    }

    #[test]
    fn duplicate_service_id_is_an_error() {
        let calendar1 = weekday_calendar("s1", &[Weekday::Mon], date(2024, 4, 1), date(2024, 4, 7));
        let calendar2 = weekday_calendar("s1", &[Weekday::Tue], date(2024, 4, 1), date(2024, 4, 7));
        let result = expand_services(&[calendar1, calendar2], &[], None, None);
        assert!(matches!(result, Err(Error::InconsistentFeed(_))));
    }

    #[test]
    fn added_exception_joins_even_on_inactive_weekday() {
        let calendar = weekday_calendar("s1", &[Weekday::Mon], date(2024, 4, 1), date(2024, 4, 7));
        let exception = FeedCalendarDate {
            service_id: "s1".into(),
            // A Saturday, not covered by the weekly pattern.
            date: Some(date(2024, 4, 6)),
            exception_type: CalendarException::Added,
        };
        let services = expand_services(&[calendar], &[exception], None, None).unwrap();
        assert!(services["s1"].active_days().contains(&date(2024, 4, 6)));
    }

    #[test]
    fn removed_exception_deletes_the_date() {
        let calendar = weekday_calendar("s1", &[Weekday::Mon], date(2024, 4, 1), date(2024, 4, 14));
        let exception = FeedCalendarDate {
            service_id: "s1".into(),
            date: Some(date(2024, 4, 8)),
            exception_type: CalendarException::Removed,
        };
        let services = expand_services(&[calendar], &[exception], None, None).unwrap();
        assert_eq!(services["s1"].active_days(), &[date(2024, 4, 1)]);
    }

    #[test]
    fn removing_an_unscheduled_date_is_an_error() {
        let calendar = weekday_calendar("s1", &[Weekday::Mon], date(2024, 4, 1), date(2024, 4, 7));
        let exception = FeedCalendarDate {
            service_id: "s1".into(),
            date: Some(date(2024, 4, 2)),
            exception_type: CalendarException::Removed,
        };
        let result = expand_services(&[calendar], &[exception], None, None);
        assert!(matches!(result, Err(Error::InconsistentFeed(_))));
    }

    #[test]
    fn unknown_service_in_exceptions_is_an_error() {
        let exception = FeedCalendarDate {
            service_id: "ghost".into(),
            date: Some(date(2024, 4, 2)),
            exception_type: CalendarException::Added,
        };
        let result = expand_services(&[], &[exception], None, None);
        assert!(matches!(result, Err(Error::InconsistentFeed(_))));
    }

    #[test]
    fn exceptions_outside_the_window_are_ignored() {
        let calendar = weekday_calendar("s1", &[Weekday::Mon], date(2024, 4, 1), date(2024, 4, 7));
        // Would be an error if it were applied: the date is not scheduled.
        let exception = FeedCalendarDate {
            service_id: "s1".into(),
            date: Some(date(2024, 5, 7)),
            exception_type: CalendarException::Removed,
        };
        let services = expand_services(
            &[calendar],
            &[exception],
            Some(date(2024, 4, 1)),
            Some(date(2024, 4, 30)),
        )
        .unwrap();
        assert_eq!(services["s1"].active_days(), &[date(2024, 4, 1)]);
    }

    #[test]
    fn expansion_matches_membership_rule() {
        // For every date in the period: present iff its weekday is active
        // and it was not removed by an exception.
        let calendar = weekday_calendar(
            "s1",
            &[Weekday::Tue, Weekday::Thu],
            date(2024, 4, 1),
            date(2024, 4, 30),
        );
        let removed = date(2024, 4, 16);
        let exception = FeedCalendarDate {
            service_id: "s1".into(),
            date: Some(removed),
            exception_type: CalendarException::Removed,
        };
        let services = expand_services(&[calendar], &[exception], None, None).unwrap();
        let days = services["s1"].active_days();

        let mut current = date(2024, 4, 1);
        while current <= date(2024, 4, 30) {
            let weekday_active =
                current.weekday() == Weekday::Tue || current.weekday() == Weekday::Thu;
            let expected = weekday_active && current != removed;
            assert_eq!(days.contains(&current), expected, "date {current}");
            current = current.succ_opt().unwrap();
        }
    }
}
