//! Terminal rendering of availability grids using owo_colors.

use std::collections::HashMap;

use chrono::Weekday;
use owo_colors::OwoColorize;
use weekgrid_core::config::GridSettings;
use weekgrid_core::constants::DAYS_PER_WEEK;
use weekgrid_core::document::CalendarDocument;
use weekgrid_core::grid::{SlotGrid, SlotId};

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

/// How many of the selected calendars are busy in one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occupancy {
    pub busy: usize,
    pub sources: usize,
}

impl Render for Occupancy {
    fn render(&self) -> String {
        let text = format!("{:>4}", self.busy);
        if self.busy == 0 {
            format!("{:>4}", "·").dimmed().to_string()
        } else if self.busy >= self.sources {
            text.red().to_string()
        } else if self.busy * 2 >= self.sources {
            text.yellow().to_string()
        } else {
            text.green().to_string()
        }
    }
}

/// Short day names starting from `first_day`.
pub fn day_names(first_day: Weekday) -> Vec<String> {
    let mut day = first_day;
    (0..DAYS_PER_WEEK)
        .map(|_| {
            let name = day.to_string();
            day = day.succ();
            name
        })
        .collect()
}

/// A slot-by-day table of busy counts.
pub struct HeatMap {
    grid: SlotGrid,
    first_day: Weekday,
    counts: HashMap<SlotId, usize>,
    sources: usize,
}

impl HeatMap {
    /// Cells whose ids are not grid slots are left out.
    pub fn new(document: &CalendarDocument, sources: usize, settings: &GridSettings) -> Self {
        let counts = document
            .cells()
            .iter()
            .filter_map(|cell| {
                let id = settings.grid.parse_id(&cell.id).ok()?;
                Some((id, cell.num_people))
            })
            .collect();

        HeatMap {
            grid: settings.grid,
            first_day: settings.first_day,
            counts,
            sources,
        }
    }

    pub fn occupancy(&self, id: SlotId) -> Occupancy {
        Occupancy {
            busy: self.counts.get(&id).copied().unwrap_or(0),
            sources: self.sources,
        }
    }

    pub fn lines(&self) -> Vec<String> {
        let header: String = day_names(self.first_day)
            .iter()
            .map(|name| format!("{:>4}", name))
            .collect();
        let mut lines = vec![format!("{:5}{}", "", header.bold())];

        for slot in 0..self.grid.slots_per_day() {
            let row: String = (0..DAYS_PER_WEEK)
                .map(|day| self.occupancy(SlotId::new(day, slot)).render())
                .collect();
            lines.push(format!("{}{}", self.grid.slot_label(slot).dimmed(), row));
        }

        lines
    }
}
