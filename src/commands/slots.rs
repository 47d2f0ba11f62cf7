use anyhow::Result;
use owo_colors::OwoColorize;
use weekgrid_core::config::GridSettings;
use weekgrid_core::grid::SlotId;

use crate::render::day_names;

pub fn run(settings: &GridSettings) -> Result<()> {
    let grid = &settings.grid;
    let days = day_names(settings.first_day);

    for (day, name) in days.iter().enumerate() {
        let first = SlotId::new(day as u8, 0);
        let last = SlotId::new(day as u8, grid.slots_per_day() - 1);
        println!("{} {}-{}", format!("{:<4}", name).bold(), first, last);
    }

    println!();
    for slot in 0..grid.slots_per_day() {
        println!("  {:>3}  {}", slot + 1, grid.slot_label(slot).dimmed());
    }

    Ok(())
}
