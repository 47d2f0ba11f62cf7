use std::path::Path;

use anyhow::Result;
use weekgrid_core::config::GridSettings;

use crate::session::Session;

pub async fn run(session_path: &Path, user: &str, settings: &GridSettings) -> Result<()> {
    let store = Session::load(session_path)?.into_store(settings).await?;
    let view = store.individual_view(user)?;

    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}
