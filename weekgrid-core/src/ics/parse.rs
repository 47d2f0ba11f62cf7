//! Feed parsing using the icalendar crate's parser.

use chrono::{Days, Duration, NaiveDate, NaiveDateTime};
use icalendar::{
    DatePerhapsTime,
    parser::{Component, Property, read_calendar, unfold},
};
use tracing::debug;

use crate::error::{GridError, GridResult};
use crate::event::{EventStatus, EventTime, FeedEvent, Recurrence, Transparency};

/// Parse a whole iCalendar feed into its events.
///
/// Content that is not a VCALENDAR, or a VEVENT without a usable DTSTART,
/// fails the whole feed so callers never mistake a broken feed for an empty
/// week.
pub fn parse_feed(content: &str) -> GridResult<Vec<FeedEvent>> {
    if !content.trim_start().to_ascii_uppercase().starts_with("BEGIN:VCALENDAR") {
        return Err(GridError::Parse("content is not an iCalendar feed".into()));
    }

    let unfolded = unfold(content);
    let calendar = read_calendar(&unfolded)
        .map_err(|e| GridError::Parse(format!("malformed iCalendar: {}", e)))?;

    let mut vevents = Vec::new();
    for component in &calendar.components {
        collect_vevents(component, &mut vevents);
    }

    let events = vevents
        .into_iter()
        .enumerate()
        .map(|(index, vevent)| parse_vevent(vevent, index))
        .collect::<GridResult<Vec<_>>>()?;

    debug!(count = events.len(), "Parsed feed events");
    Ok(events)
}

/// VEVENTs may sit at the top level or inside a VCALENDAR wrapper.
fn collect_vevents<'a>(component: &'a Component<'a>, out: &mut Vec<&'a Component<'a>>) {
    if component.name == "VEVENT" {
        out.push(component);
    } else if component.name == "VCALENDAR" {
        for child in &component.components {
            collect_vevents(child, out);
        }
    }
}

fn parse_vevent(vevent: &Component, index: usize) -> GridResult<FeedEvent> {
    let uid = vevent
        .find_prop("UID")
        .map(|p| p.val.to_string())
        .unwrap_or_else(|| format!("event-{}", index + 1));
    let summary = vevent
        .find_prop("SUMMARY")
        .map(|p| p.val.to_string())
        .unwrap_or_else(|| "(No title)".to_string());

    let start = vevent
        .find_prop("DTSTART")
        .and_then(|p| DatePerhapsTime::try_from(p).ok())
        .map(to_event_time)
        .ok_or_else(|| GridError::Parse(format!("event '{}' has no valid DTSTART", uid)))?;

    let end = match vevent.find_prop("DTEND") {
        Some(prop) => DatePerhapsTime::try_from(prop)
            .map(to_event_time)
            .map_err(|_| GridError::Parse(format!("event '{}' has an invalid DTEND", uid)))?,
        None => implied_end(&start, vevent.find_prop("DURATION")).ok_or_else(|| {
            GridError::Parse(format!("event '{}' has an out-of-range DURATION", uid))
        })?,
    };

    let status = vevent
        .find_prop("STATUS")
        .map(|p| match p.val.as_ref() {
            "TENTATIVE" => EventStatus::Tentative,
            "CANCELLED" => EventStatus::Cancelled,
            _ => EventStatus::Confirmed,
        })
        .unwrap_or(EventStatus::Confirmed);

    let transparency = vevent
        .find_prop("TRANSP")
        .map(|p| {
            if p.val == "TRANSPARENT" {
                Transparency::Transparent
            } else {
                Transparency::Opaque
            }
        })
        .unwrap_or(Transparency::Opaque);

    // Recurrence (RRULE, EXDATE)
    let rrule = vevent.find_prop("RRULE").map(|p| p.val.to_string());
    let exdates: Vec<EventTime> = vevent
        .properties
        .iter()
        .filter(|p| p.name == "EXDATE")
        .flat_map(parse_exdate_property)
        .collect();
    let recurrence = rrule.map(|rrule| Recurrence { rrule, exdates });

    let recurrence_id = vevent
        .find_prop("RECURRENCE-ID")
        .and_then(|p| DatePerhapsTime::try_from(p).ok())
        .map(to_event_time);

    Ok(FeedEvent {
        uid,
        summary,
        start,
        end,
        status,
        transparency,
        recurrence,
        recurrence_id,
    })
}

/// End of an event without DTEND: start + DURATION, otherwise one day for
/// all-day events and zero length for timed ones (RFC 5545 3.6.1).
///
/// `None` when the end falls outside the representable date range.
fn implied_end(start: &EventTime, duration: Option<&Property>) -> Option<EventTime> {
    let duration = duration.and_then(|p| parse_duration(p.val.as_ref()));

    let end = match (start, duration) {
        (EventTime::Date(d), Some(dur)) => {
            EventTime::Date(d.checked_add_days(Days::new(dur.num_days().unsigned_abs()))?)
        }
        (EventTime::Date(d), None) => EventTime::Date(d.checked_add_days(Days::new(1))?),
        (_, None) => start.clone(),
        (EventTime::DateTimeUtc(dt), Some(dur)) => {
            EventTime::DateTimeUtc(dt.checked_add_signed(dur)?)
        }
        (EventTime::DateTimeFloating(dt), Some(dur)) => {
            EventTime::DateTimeFloating(dt.checked_add_signed(dur)?)
        }
        (EventTime::DateTimeZoned { datetime, tzid }, Some(dur)) => EventTime::DateTimeZoned {
            datetime: datetime.checked_add_signed(dur)?,
            tzid: tzid.clone(),
        },
    };
    Some(end)
}

/// DURATION value (PT1H30M, P1D, ...); negative durations are ignored.
fn parse_duration(value: &str) -> Option<Duration> {
    let value = value.trim().trim_start_matches('+');
    if value.starts_with('-') {
        return None;
    }
    let duration = iso8601::duration(value).ok()?;
    let std_duration: std::time::Duration = duration.into();
    Duration::from_std(std_duration).ok()
}

/// Convert icalendar's DatePerhapsTime to our EventTime, preserving timezone info
fn to_event_time(dpt: DatePerhapsTime) -> EventTime {
    match dpt {
        DatePerhapsTime::Date(d) => EventTime::Date(d),
        DatePerhapsTime::DateTime(cal_dt) => match cal_dt {
            icalendar::CalendarDateTime::Utc(dt) => EventTime::DateTimeUtc(dt),
            icalendar::CalendarDateTime::Floating(naive) => EventTime::DateTimeFloating(naive),
            icalendar::CalendarDateTime::WithTimezone { date_time, tzid } => {
                EventTime::DateTimeZoned {
                    datetime: date_time,
                    tzid,
                }
            }
        },
    }
}

/// Parse an EXDATE property into a list of EventTime values.
///
/// Handles TZID and VALUE=DATE parameters, UTC and floating values, and
/// comma-separated lists: `EXDATE;TZID=America/New_York:20240108T100000,20240115T100000`
fn parse_exdate_property(prop: &Property) -> Vec<EventTime> {
    let tzid = prop
        .params
        .iter()
        .find(|p| p.key == "TZID")
        .and_then(|p| p.val.as_ref().map(|v| v.to_string()));

    let is_date = prop
        .params
        .iter()
        .any(|p| p.key == "VALUE" && p.val.as_ref().map(|v| v.as_ref()) == Some("DATE"));

    prop.val
        .as_ref()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| {
            if is_date {
                return NaiveDate::parse_from_str(s, "%Y%m%d").ok().map(EventTime::Date);
            }
            let (naive, is_utc) = match s.strip_suffix('Z') {
                Some(rest) => (rest, true),
                None => (s, false),
            };
            let dt = NaiveDateTime::parse_from_str(naive, "%Y%m%dT%H%M%S").ok()?;
            Some(match (&tzid, is_utc) {
                (_, true) => EventTime::DateTimeUtc(dt.and_utc()),
                (Some(tz), false) => EventTime::DateTimeZoned {
                    datetime: dt,
                    tzid: tz.clone(),
                },
                (None, false) => EventTime::DateTimeFloating(dt),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn feed(events: &str) -> String {
        format!(
            "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:TEST\r\n{}END:VCALENDAR\r\n",
            events
        )
    }

    #[test]
    fn test_parse_feed_reads_every_event_in_order() {
        let ics = feed(
            "BEGIN:VEVENT\r\nUID:one\r\nSUMMARY:Standup\r\nDTSTART:20260119T090000Z\r\nDTEND:20260119T093000Z\r\nEND:VEVENT\r\n\
             BEGIN:VEVENT\r\nUID:two\r\nSUMMARY:Lunch\r\nDTSTART:20260120T120000Z\r\nDTEND:20260120T130000Z\r\nEND:VEVENT\r\n",
        );

        let events = parse_feed(&ics).expect("Should parse");
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].uid, "one");
        assert_eq!(events[1].summary, "Lunch");
        assert_eq!(
            events[0].start,
            EventTime::DateTimeUtc(Utc.with_ymd_and_hms(2026, 1, 19, 9, 0, 0).unwrap())
        );
        assert!(events[0].is_busy());
    }

    #[test]
    fn test_parse_feed_empty_calendar_is_not_an_error() {
        let events = parse_feed(&feed("")).expect("Should parse");
        assert!(events.is_empty());
    }

    #[test]
    fn test_parse_feed_rejects_non_calendar_content() {
        let result = parse_feed("<html><body>Not found</body></html>");
        assert!(matches!(result, Err(GridError::Parse(_))));
    }

    #[test]
    fn test_parse_feed_rejects_event_without_start() {
        let ics = feed("BEGIN:VEVENT\r\nUID:broken\r\nDTEND:20260119T093000Z\r\nEND:VEVENT\r\n");
        let err = parse_feed(&ics).unwrap_err();
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn test_missing_dtend_uses_duration() {
        let ics = feed(
            "BEGIN:VEVENT\r\nUID:d\r\nDTSTART:20260119T090000Z\r\nDURATION:PT1H30M\r\nEND:VEVENT\r\n",
        );
        let events = parse_feed(&ics).unwrap();
        assert_eq!(
            events[0].end,
            EventTime::DateTimeUtc(Utc.with_ymd_and_hms(2026, 1, 19, 10, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_out_of_range_duration_is_parse_error() {
        for event in [
            "BEGIN:VEVENT\r\nUID:forever\r\nDTSTART:20260119T090000Z\r\nDURATION:P99999999D\r\nEND:VEVENT\r\n",
            "BEGIN:VEVENT\r\nUID:forever\r\nDTSTART;VALUE=DATE:20260119\r\nDURATION:P99999999D\r\nEND:VEVENT\r\n",
        ] {
            let err = parse_feed(&feed(event)).unwrap_err();
            assert!(matches!(err, GridError::Parse(_)));
            assert!(err.to_string().contains("forever"));
        }
    }

    #[test]
    fn test_missing_dtend_on_all_day_event_spans_one_day() {
        let ics = feed("BEGIN:VEVENT\r\nUID:d\r\nDTSTART;VALUE=DATE:20260119\r\nEND:VEVENT\r\n");
        let events = parse_feed(&ics).unwrap();
        assert_eq!(
            events[0].end,
            EventTime::Date(NaiveDate::from_ymd_opt(2026, 1, 20).unwrap())
        );
    }

    #[test]
    fn test_status_and_transparency_mark_event_free() {
        let ics = feed(
            "BEGIN:VEVENT\r\nUID:a\r\nDTSTART:20260119T090000Z\r\nDTEND:20260119T100000Z\r\nSTATUS:CANCELLED\r\nEND:VEVENT\r\n\
             BEGIN:VEVENT\r\nUID:b\r\nDTSTART:20260119T090000Z\r\nDTEND:20260119T100000Z\r\nTRANSP:TRANSPARENT\r\nEND:VEVENT\r\n",
        );
        let events = parse_feed(&ics).unwrap();
        assert_eq!(events[0].status, EventStatus::Cancelled);
        assert_eq!(events[1].transparency, Transparency::Transparent);
        assert!(events.iter().all(|e| !e.is_busy()));
    }

    #[test]
    fn test_parse_exdate_preserves_tzid_parameter() {
        let ics = feed(
            "BEGIN:VEVENT\r\nUID:test-123\r\nDTSTART;TZID=America/New_York:20240101T100000\r\nDTEND;TZID=America/New_York:20240101T110000\r\n\
             RRULE:FREQ=WEEKLY;BYDAY=MO\r\nEXDATE;TZID=America/New_York:20240108T100000,20240115T100000\r\nEND:VEVENT\r\n",
        );

        let events = parse_feed(&ics).expect("Should parse");
        let recurrence = events[0].recurrence.clone().expect("Should have recurrence");
        assert_eq!(recurrence.rrule, "FREQ=WEEKLY;BYDAY=MO");
        assert_eq!(recurrence.exdates.len(), 2);
        for exdate in &recurrence.exdates {
            match exdate {
                EventTime::DateTimeZoned { tzid, .. } => assert_eq!(tzid, "America/New_York"),
                other => panic!("Expected DateTimeZoned, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_recurrence_id_is_read() {
        let ics = feed(
            "BEGIN:VEVENT\r\nUID:r\r\nRECURRENCE-ID:20260119T090000Z\r\nDTSTART:20260119T140000Z\r\nDTEND:20260119T150000Z\r\nEND:VEVENT\r\n",
        );
        let events = parse_feed(&ics).unwrap();
        assert_eq!(
            events[0].recurrence_id,
            Some(EventTime::DateTimeUtc(Utc.with_ymd_and_hms(2026, 1, 19, 9, 0, 0).unwrap()))
        );
    }
}
