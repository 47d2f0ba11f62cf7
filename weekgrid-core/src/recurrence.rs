//! RRULE expansion for recurring events.
//!
//! Expands a master recurring event into the occurrence start times that fall
//! within a bounded range (the selected week), respecting EXDATEs.

use chrono::{DateTime, Duration, Utc};
use rrule::RRuleSet;

use crate::constants::MAX_WEEKLY_OCCURRENCES;
use crate::error::{GridError, GridResult};
use crate::event::{EventTime, FeedEvent, Recurrence};

fn format_rrule_time(prefix: &str, time: &EventTime) -> String {
    match time {
        // The rrule crate needs a datetime, so all-day dates become midnight UTC
        EventTime::Date(d) => format!("{}:{}T000000Z", prefix, d.format("%Y%m%d")),
        EventTime::DateTimeUtc(dt) => format!("{}:{}", prefix, dt.format("%Y%m%dT%H%M%SZ")),
        EventTime::DateTimeFloating(dt) => {
            format!("{}:{}Z", prefix, dt.format("%Y%m%dT%H%M%S"))
        }
        EventTime::DateTimeZoned { datetime, tzid } => format!(
            "{};TZID={}:{}",
            prefix,
            tzid,
            datetime.format("%Y%m%dT%H%M%S")
        ),
    }
}

/// Build an iCalendar-format rule set string for the rrule crate parser.
fn build_rrule_string(start: &EventTime, recurrence: &Recurrence) -> String {
    let mut lines = vec![
        format_rrule_time("DTSTART", start),
        format!("RRULE:{}", recurrence.rrule),
    ];
    lines.extend(
        recurrence
            .exdates
            .iter()
            .map(|exdate| format_rrule_time("EXDATE", exdate)),
    );
    lines.join("\n")
}

/// Convert an rrule occurrence back to an EventTime matching the master's variant.
fn occurrence_to_event_time(dt: &DateTime<rrule::Tz>, master_start: &EventTime) -> EventTime {
    match master_start {
        EventTime::Date(_) => EventTime::Date(dt.date_naive()),
        EventTime::DateTimeUtc(_) => EventTime::DateTimeUtc(dt.with_timezone(&Utc)),
        EventTime::DateTimeFloating(_) => EventTime::DateTimeFloating(dt.naive_utc()),
        EventTime::DateTimeZoned { tzid, .. } => EventTime::DateTimeZoned {
            datetime: dt.naive_local(),
            tzid: tzid.clone(),
        },
    }
}

/// Start times of every occurrence of `master` within `[range_start, range_end]`.
///
/// Floating and all-day rules are expanded as if they were UTC, so callers
/// should pad the range by a day and filter the converted results. Returns an
/// empty list for non-recurring events.
pub fn occurrences_between(
    master: &FeedEvent,
    range_start: DateTime<Utc>,
    range_end: DateTime<Utc>,
) -> GridResult<Vec<EventTime>> {
    let Some(recurrence) = &master.recurrence else {
        return Ok(Vec::new());
    };

    let rrule_str = build_rrule_string(&master.start, recurrence);
    let rrule_set: RRuleSet = rrule_str.parse().map_err(|e| {
        GridError::Parse(format!(
            "Failed to parse RRULE for event '{}': {}",
            master.uid, e
        ))
    })?;

    // after/before are exclusive, widen by a second to make the range inclusive.
    let tz: rrule::Tz = Utc.into();
    let after = (range_start - Duration::seconds(1)).with_timezone(&tz);
    let before = (range_end + Duration::seconds(1)).with_timezone(&tz);

    let result = rrule_set
        .after(after)
        .before(before)
        .all(MAX_WEEKLY_OCCURRENCES);

    Ok(result
        .dates
        .iter()
        .map(|dt| occurrence_to_event_time(dt, &master.start))
        .collect())
}
