//! Conversion of busy time into grid documents.

use std::collections::HashSet;

use chrono::{Duration, NaiveDateTime, NaiveTime, Timelike};
use serde_json::json;

use crate::cell::Cell;
use crate::document::CalendarDocument;
use crate::error::GridResult;
use crate::grid::{SlotGrid, SlotId};
use crate::week::{Interval, Week};

/// Minutes since midnight, rounding partial minutes up when `ceil` is set.
fn minute_of_day(t: NaiveDateTime, ceil: bool) -> u32 {
    let partial = t.second() > 0 || t.nanosecond() > 0;
    t.hour() * 60 + t.minute() + u32::from(ceil && partial)
}

/// Map busy intervals onto the grid, one single-owner cell per touched slot.
///
/// Intervals are clipped to `week` and to the grid's day window. A slot hit by
/// several intervals is emitted once, at its first hit. Zero-width, inverted
/// and out-of-window intervals contribute nothing.
pub fn to_grid(
    intervals: &[Interval],
    owner: &str,
    week: &Week,
    grid: &SlotGrid,
) -> CalendarDocument {
    let mut seen: HashSet<SlotId> = HashSet::new();
    let mut cells = Vec::new();

    for interval in intervals {
        let start = interval.start.max(week.start());
        let end = interval.end.min(week.end());
        if start >= end {
            continue;
        }

        let mut date = start.date();
        while date.and_time(NaiveTime::MIN) < end {
            let Some(day) = week.day_offset(date) else {
                break;
            };
            let from = if date == start.date() { minute_of_day(start, false) } else { 0 };
            let to = if date == end.date() { minute_of_day(end, true) } else { 24 * 60 };

            for slot in grid.slots_overlapping(from, to) {
                let id = SlotId::new(day, slot);
                if seen.insert(id) {
                    cells.push(Cell::occupied(id.to_string(), owner));
                }
            }
            date = date + Duration::days(1);
        }
    }

    CalendarDocument::from_unique_cells(cells)
}

/// Wrap manually selected slot ids into a single-owner document.
///
/// Every id must belong to `grid`; each cell goes through the schema
/// validator like any other incoming record.
pub fn from_selection<I, S>(ids: I, owner: &str, grid: &SlotGrid) -> GridResult<CalendarDocument>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let cells = ids
        .into_iter()
        .map(|id| {
            let id = grid.parse_id(id.as_ref())?;
            Cell::validate(&json!({
                "id": id.to_string(),
                "users": [owner],
                "numPeople": 1,
            }))
        })
        .collect::<GridResult<Vec<_>>>()?;

    CalendarDocument::from_cells(cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GridError;
    use chrono::{NaiveDate, Weekday};

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn interval(start: &str, end: &str) -> Interval {
        Interval::new(dt(start), dt(end))
    }

    /// Sunday 2026-01-18
    fn week() -> Week {
        Week::containing(NaiveDate::from_ymd_opt(2026, 1, 18).unwrap(), Weekday::Sun)
    }

    fn ids(doc: &CalendarDocument) -> Vec<&str> {
        doc.cells().iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn test_interval_maps_to_overlapped_slots() {
        // Monday 09:00-10:30 on the half-hour grid: slots 19-21 of day B
        let doc = to_grid(
            &[interval("2026-01-19 09:00:00", "2026-01-19 10:30:00")],
            "alice",
            &week(),
            &SlotGrid::default(),
        );

        assert_eq!(ids(&doc), vec!["B19", "B20", "B21"]);
        assert!(doc.cells().iter().all(|c| c.users == ["alice"] && c.num_people == 1));
    }

    #[test]
    fn test_partial_slot_and_seconds_round_outward() {
        let doc = to_grid(
            &[interval("2026-01-18 00:29:59", "2026-01-18 00:30:01")],
            "a",
            &week(),
            &SlotGrid::default(),
        );
        assert_eq!(ids(&doc), vec!["A1", "A2"]);
    }

    #[test]
    fn test_overlapping_intervals_emit_each_slot_once() {
        let doc = to_grid(
            &[
                interval("2026-01-20 09:00:00", "2026-01-20 10:00:00"),
                interval("2026-01-20 09:30:00", "2026-01-20 10:30:00"),
            ],
            "bob",
            &week(),
            &SlotGrid::default(),
        );
        assert_eq!(ids(&doc), vec!["C19", "C20", "C21"]);
    }

    #[test]
    fn test_multi_day_interval_spans_columns() {
        let doc = to_grid(
            &[interval("2026-01-23 23:00:00", "2026-01-24 01:00:00")],
            "a",
            &week(),
            &SlotGrid::default(),
        );
        assert_eq!(ids(&doc), vec!["F47", "F48", "G1", "G2"]);
    }

    #[test]
    fn test_interval_is_clipped_to_week() {
        let doc = to_grid(
            &[
                interval("2026-01-17 23:00:00", "2026-01-18 00:30:00"),
                interval("2026-01-24 23:30:00", "2026-01-25 06:00:00"),
            ],
            "a",
            &week(),
            &SlotGrid::default(),
        );
        assert_eq!(ids(&doc), vec!["A1", "G48"]);
    }

    #[test]
    fn test_zero_width_and_out_of_window_intervals_produce_nothing() {
        let grid = SlotGrid::new(60, 8, 18).unwrap();
        let doc = to_grid(
            &[
                interval("2026-01-19 09:00:00", "2026-01-19 09:00:00"),
                interval("2026-01-19 10:00:00", "2026-01-19 09:00:00"),
                interval("2026-01-19 19:00:00", "2026-01-19 21:00:00"),
            ],
            "a",
            &week(),
            &grid,
        );
        assert!(doc.is_empty());
    }

    #[test]
    fn test_all_day_interval_fills_day_window() {
        let grid = SlotGrid::new(60, 8, 18).unwrap();
        let doc = to_grid(
            &[interval("2026-01-21 00:00:00", "2026-01-22 00:00:00")],
            "a",
            &week(),
            &grid,
        );
        assert_eq!(doc.len(), 10);
        assert_eq!(doc.cells()[0].id, "D1");
        assert_eq!(doc.cells()[9].id, "D10");
    }

    #[test]
    fn test_from_selection_wraps_ids() {
        let doc = from_selection(["A1", "C7"], "dana", &SlotGrid::default()).unwrap();
        assert_eq!(ids(&doc), vec!["A1", "C7"]);
        assert_eq!(doc.cells()[1], Cell::occupied("C7", "dana"));
    }

    #[test]
    fn test_from_selection_rejects_ids_outside_grid() {
        let result = from_selection(["A1", "A49"], "dana", &SlotGrid::default());
        assert!(matches!(result, Err(GridError::Schema(_))));

        let result = from_selection(["not-a-slot"], "dana", &SlotGrid::default());
        assert!(matches!(result, Err(GridError::Schema(_))));
    }
}
