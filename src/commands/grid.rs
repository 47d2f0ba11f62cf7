use std::path::Path;

use anyhow::Result;
use owo_colors::OwoColorize;
use weekgrid_core::config::GridSettings;

use crate::render::HeatMap;
use crate::session::Session;

pub async fn run(session_path: &Path, settings: &GridSettings) -> Result<()> {
    let store = Session::load(session_path)?.into_store(settings).await?;

    if store.is_empty() {
        println!("{}", "No calendar selected".dimmed());
        return Ok(());
    }

    let combined = store.combined();
    let heat_map = HeatMap::new(&combined, store.len(), settings);
    for line in heat_map.lines() {
        println!("{}", line);
    }

    let names: Vec<&str> = store.records().map(|r| r.user.as_str()).collect();
    println!();
    println!("{} {}", "Calendars:".dimmed(), names.join(", "));
    Ok(())
}
