//! Events read from an iCalendar feed.
//!
//! Only what decides whether a person is busy is kept: when the event
//! happens, whether it repeats, and whether it blocks time at all.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use chrono_tz::Tz;
use tracing::warn;

/// A VEVENT from a feed
#[derive(Debug, Clone, PartialEq)]
pub struct FeedEvent {
    pub uid: String,
    pub summary: String,
    pub start: EventTime,
    pub end: EventTime,
    pub status: EventStatus,
    /// Whether event blocks time (OPAQUE) or is free (TRANSPARENT)
    pub transparency: Transparency,
    pub recurrence: Option<Recurrence>,
    /// Set on instance overrides of a recurring event (RECURRENCE-ID)
    pub recurrence_id: Option<EventTime>,
}

impl FeedEvent {
    /// Cancelled and transparent events leave the slot free.
    pub fn is_busy(&self) -> bool {
        self.status != EventStatus::Cancelled && self.transparency == Transparency::Opaque
    }
}

/// RRULE plus the occurrences it excludes
#[derive(Debug, Clone, PartialEq)]
pub struct Recurrence {
    pub rrule: String,
    pub exdates: Vec<EventTime>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventTime {
    /// All-day
    Date(NaiveDate),
    DateTimeUtc(chrono::DateTime<chrono::Utc>),
    /// No timezone: the wall-clock time wherever the grid is
    DateTimeFloating(NaiveDateTime),
    DateTimeZoned {
        datetime: NaiveDateTime,
        tzid: String,
    },
}

impl EventTime {
    pub fn is_all_day(&self) -> bool {
        matches!(self, EventTime::Date(_))
    }

    /// Wall-clock time of this instant in the grid timezone.
    ///
    /// All-day dates start at midnight. A TZID chrono-tz does not know is
    /// read as floating time.
    pub fn to_local(&self, grid_tz: Tz) -> NaiveDateTime {
        match self {
            EventTime::Date(d) => d.and_time(NaiveTime::MIN),
            EventTime::DateTimeUtc(dt) => dt.with_timezone(&grid_tz).naive_local(),
            EventTime::DateTimeFloating(dt) => *dt,
            EventTime::DateTimeZoned { datetime, tzid } => match tzid.parse::<Tz>() {
                Ok(source_tz) => source_tz
                    .from_local_datetime(datetime)
                    .earliest()
                    .map(|dt| dt.with_timezone(&grid_tz).naive_local())
                    // Inside a DST gap: keep the wall-clock reading
                    .unwrap_or(*datetime),
                Err(_) => {
                    warn!(tzid = %tzid, "Unknown timezone, treating time as floating");
                    *datetime
                }
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventStatus {
    Confirmed,
    Tentative,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transparency {
    Opaque,
    Transparent,
}
