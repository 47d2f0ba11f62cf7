//! The weekly slot grid.
//!
//! Every calendar source produces cell ids from this one identifier space:
//! the iCalendar converter maps intervals onto it and the manual entry path
//! validates selected ids against it.

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DAYS_PER_WEEK, DEFAULT_DAY_END_HOUR, DEFAULT_DAY_START_HOUR, DEFAULT_SLOT_MINUTES,
};
use crate::error::{GridError, GridResult};

const MINUTES_PER_DAY: u32 = 24 * 60;

/// A position in the weekly grid.
///
/// `day` counts from the first day of the week (0..7), `slot` from the first
/// slot of the day window. The textual form is the day letter followed by the
/// 1-based slot number: `A1`, `C14`, `G48`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotId {
    pub day: u8,
    pub slot: u16,
}

impl SlotId {
    pub fn new(day: u8, slot: u16) -> Self {
        SlotId { day, slot }
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", (b'A' + self.day) as char, self.slot + 1)
    }
}

impl FromStr for SlotId {
    type Err = GridError;

    /// Structural parse only; use [`SlotGrid::parse_id`] to also check bounds.
    fn from_str(s: &str) -> GridResult<Self> {
        let invalid = || GridError::Schema(format!("'{}' is not a grid slot id", s));

        let mut chars = s.chars();
        let letter = chars.next().ok_or_else(invalid)?;
        if !letter.is_ascii_uppercase() {
            return Err(invalid());
        }
        let number: u16 = chars.as_str().parse().map_err(|_| invalid())?;
        if number == 0 {
            return Err(invalid());
        }

        Ok(SlotId {
            day: letter as u8 - b'A',
            slot: number - 1,
        })
    }
}

/// Resolution and daily window of the weekly grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotGrid {
    slot_minutes: u32,
    day_start_hour: u32,
    day_end_hour: u32,
}

impl Default for SlotGrid {
    fn default() -> Self {
        SlotGrid {
            slot_minutes: DEFAULT_SLOT_MINUTES,
            day_start_hour: DEFAULT_DAY_START_HOUR,
            day_end_hour: DEFAULT_DAY_END_HOUR,
        }
    }
}

impl SlotGrid {
    pub fn new(slot_minutes: u32, day_start_hour: u32, day_end_hour: u32) -> GridResult<Self> {
        if day_start_hour >= day_end_hour || day_end_hour > 24 {
            return Err(GridError::Config(format!(
                "Day window {}:00-{}:00 is empty or exceeds one day",
                day_start_hour, day_end_hour
            )));
        }
        let window = (day_end_hour - day_start_hour) * 60;
        if slot_minutes == 0 || window % slot_minutes != 0 {
            return Err(GridError::Config(format!(
                "Slot size of {} minutes does not evenly divide the {} minute day window",
                slot_minutes, window
            )));
        }

        Ok(SlotGrid {
            slot_minutes,
            day_start_hour,
            day_end_hour,
        })
    }

    pub fn slot_minutes(&self) -> u32 {
        self.slot_minutes
    }

    pub fn slots_per_day(&self) -> u16 {
        ((self.day_end_hour - self.day_start_hour) * 60 / self.slot_minutes) as u16
    }

    pub fn contains(&self, id: SlotId) -> bool {
        id.day < DAYS_PER_WEEK && id.slot < self.slots_per_day()
    }

    /// Parse a slot id and check it lies inside this grid.
    pub fn parse_id(&self, s: &str) -> GridResult<SlotId> {
        let id: SlotId = s.parse()?;
        if !self.contains(id) {
            return Err(GridError::Schema(format!(
                "Slot '{}' is outside the {}x{} grid",
                s,
                DAYS_PER_WEEK,
                self.slots_per_day()
            )));
        }
        Ok(id)
    }

    /// All slot ids, day by day.
    pub fn ids(&self) -> impl Iterator<Item = SlotId> + '_ {
        (0..DAYS_PER_WEEK)
            .flat_map(move |day| (0..self.slots_per_day()).map(move |slot| SlotId::new(day, slot)))
    }

    /// Minutes since midnight covered by `slot`, as `[start, end)`.
    pub fn slot_window(&self, slot: u16) -> Range<u32> {
        let start = self.day_start_hour * 60 + slot as u32 * self.slot_minutes;
        start..start + self.slot_minutes
    }

    /// "HH:MM" label for the start of `slot`.
    pub fn slot_label(&self, slot: u16) -> String {
        let start = self.slot_window(slot).start;
        format!("{:02}:{:02}", start / 60, start % 60)
    }

    /// Slots overlapped by the minutes-since-midnight range `[from, to)`.
    ///
    /// The range is clipped to the day window first; an empty result means the
    /// range misses the grid entirely.
    pub fn slots_overlapping(&self, from: u32, to: u32) -> Range<u16> {
        let window_start = self.day_start_hour * 60;
        let window_end = (self.day_end_hour * 60).min(MINUTES_PER_DAY);

        let from = from.max(window_start);
        let to = to.min(window_end);
        if from >= to {
            return 0..0;
        }

        let first = (from - window_start) / self.slot_minutes;
        let last = (to - window_start).div_ceil(self.slot_minutes);
        first as u16..last as u16
    }
}
