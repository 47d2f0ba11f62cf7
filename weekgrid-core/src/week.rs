//! Week selection for feed events.
//!
//! A week starts on the configured first day (Sunday by default) at 00:00
//! wall-clock time in the grid timezone and covers `[start, start + 7 days)`.

use std::collections::HashSet;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc, Weekday};
use chrono_tz::Tz;
use tracing::{debug, warn};

use crate::constants::DAYS_PER_WEEK;
use crate::event::FeedEvent;
use crate::recurrence::occurrences_between;

/// A busy time range as wall-clock times in the grid timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Interval {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Interval { start, end }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Week {
    start: NaiveDateTime,
}

impl Week {
    /// The week that contains `date`.
    pub fn containing(date: NaiveDate, first_day: Weekday) -> Self {
        let days_back = (7 + date.weekday().num_days_from_monday()
            - first_day.num_days_from_monday())
            % 7;
        let first = date - Duration::days(days_back as i64);
        Week {
            start: first.and_time(NaiveTime::MIN),
        }
    }

    /// The week containing today in `tz`.
    pub fn current(tz: Tz, first_day: Weekday) -> Self {
        Self::containing(Utc::now().with_timezone(&tz).date_naive(), first_day)
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    /// First instant of the following week (exclusive bound).
    pub fn end(&self) -> NaiveDateTime {
        self.start + Duration::days(DAYS_PER_WEEK as i64)
    }

    pub fn first_date(&self) -> NaiveDate {
        self.start.date()
    }

    /// Column of `date` in the week grid, if it belongs to this week.
    pub fn day_offset(&self, date: NaiveDate) -> Option<u8> {
        let offset = (date - self.first_date()).num_days();
        (0..DAYS_PER_WEEK as i64).contains(&offset).then_some(offset as u8)
    }

    /// Whether `interval` belongs to this week.
    ///
    /// Starting exactly at the lower bound or ending exactly at the upper bound
    /// counts as inside; starting at the next week's first instant does not.
    pub fn overlaps(&self, interval: &Interval) -> bool {
        interval.start < self.end() && (interval.end > self.start || interval.start >= self.start)
    }

    /// UTC bounds padded by a day on both sides, for recurrence expansion.
    fn padded_utc_bounds(&self, tz: Tz) -> (DateTime<Utc>, DateTime<Utc>) {
        let to_utc = |local: NaiveDateTime| {
            tz.from_local_datetime(&local)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|| local.and_utc())
        };
        (
            to_utc(self.start) - Duration::days(1),
            to_utc(self.end()) + Duration::days(1),
        )
    }
}

/// Busy intervals of `events` that fall in the current week.
pub fn select_current_week(events: &[FeedEvent], tz: Tz, first_day: Weekday) -> Vec<Interval> {
    select_week(events, &Week::current(tz, first_day), tz)
}

/// Busy intervals of `events` that fall in `week`, in source order.
///
/// Free (cancelled or transparent) events are skipped, recurring events
/// contribute each occurrence inside the week, and occurrences replaced by a
/// RECURRENCE-ID override are left to the override event.
pub fn select_week(events: &[FeedEvent], week: &Week, tz: Tz) -> Vec<Interval> {
    let overridden: HashSet<(&str, NaiveDateTime)> = events
        .iter()
        .filter_map(|e| {
            e.recurrence_id
                .as_ref()
                .map(|rid| (e.uid.as_str(), rid.to_local(tz)))
        })
        .collect();

    let (range_start, range_end) = week.padded_utc_bounds(tz);
    let mut intervals = Vec::new();

    for event in events {
        if !event.is_busy() {
            debug!(uid = %event.uid, summary = %event.summary, "Skipping free event");
            continue;
        }

        let start = event.start.to_local(tz);
        let end = event.end.to_local(tz);
        let duration = end - start;

        if event.recurrence.is_none() {
            let interval = Interval::new(start, end);
            if week.overlaps(&interval) {
                intervals.push(interval);
            }
            continue;
        }

        let occurrences = match occurrences_between(event, range_start, range_end) {
            Ok(occurrences) => occurrences,
            Err(e) => {
                warn!(
                    uid = %event.uid,
                    summary = %event.summary,
                    error = %e,
                    "Using first occurrence only"
                );
                vec![event.start.clone()]
            }
        };

        intervals.extend(
            occurrences
                .iter()
                .map(|occ| occ.to_local(tz))
                .filter(|occ_start| !overridden.contains(&(event.uid.as_str(), *occ_start)))
                .map(|occ_start| {
                    // Durations reaching past the calendar's range run to its end
                    let occ_end = occ_start
                        .checked_add_signed(duration)
                        .unwrap_or(NaiveDateTime::MAX);
                    Interval::new(occ_start, occ_end)
                })
                .filter(|interval| week.overlaps(interval)),
        );
    }

    debug!(
        events = events.len(),
        intervals = intervals.len(),
        week_start = %week.start,
        "Selected week"
    );
    intervals
}
