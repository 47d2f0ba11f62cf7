//! Session files: the calendars one CLI run should load.
//!
//! ```toml
//! [[calendar]]
//! user = "alice"
//! ical_url = "https://example.com/alice.ics"
//!
//! [[calendar]]
//! user = "bob"
//! cells = ["B19", "B20"]
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use weekgrid_core::config::GridSettings;
use weekgrid_core::fetch::FeedClient;
use weekgrid_core::manual::ManualSelection;
use weekgrid_core::setup::{setup_ical, setup_manual};
use weekgrid_core::store::CalendarStore;

#[derive(Debug, Deserialize)]
pub struct Session {
    #[serde(default, rename = "calendar")]
    pub calendars: Vec<SessionCalendar>,
}

#[derive(Debug, Deserialize)]
pub struct SessionCalendar {
    pub user: String,
    pub ical_url: Option<String>,
    pub cells: Option<Vec<String>>,
}

impl Session {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read session file at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("Failed to parse session file at {}", path.display()))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Register every calendar in a fresh store, in file order.
    pub async fn into_store(self, settings: &GridSettings) -> Result<CalendarStore> {
        let mut store = CalendarStore::new();
        let client = FeedClient::new(settings.fetch_timeout);

        for calendar in self.calendars {
            match (&calendar.ical_url, &calendar.cells) {
                (Some(url), None) => {
                    setup_ical(&mut store, &client, settings, &calendar.user, url)
                        .await
                        .with_context(|| format!("Failed to add calendar for '{}'", calendar.user))?;
                }
                (None, Some(cells)) => {
                    let mut selection = ManualSelection::new(settings.grid);
                    for id in cells {
                        if !selection.is_selected(id) {
                            selection.toggle(id).with_context(|| {
                                format!("Invalid cell for '{}'", calendar.user)
                            })?;
                        }
                    }
                    setup_manual(&mut store, &mut selection, &calendar.user)
                        .with_context(|| format!("Failed to add calendar for '{}'", calendar.user))?;
                }
                _ => anyhow::bail!(
                    "Calendar for '{}' needs exactly one of `ical_url` or `cells`",
                    calendar.user
                ),
            }
        }

        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_session_file() {
        let session = Session::parse(
            r#"
[[calendar]]
user = "alice"
ical_url = "https://example.com/alice.ics"

[[calendar]]
user = "bob"
cells = ["B19", "B20"]
"#,
        )
        .unwrap();

        assert_eq!(session.calendars.len(), 2);
        assert_eq!(session.calendars[0].ical_url.as_deref(), Some("https://example.com/alice.ics"));
        assert_eq!(session.calendars[1].cells.as_ref().map(Vec::len), Some(2));
    }

    #[test]
    fn test_load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Session::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read session file"));
    }

    #[tokio::test]
    async fn test_manual_calendars_build_store() {
        let session = Session::parse(
            r#"
[[calendar]]
user = "bob"
cells = ["A1", "A2", "A1"]

[[calendar]]
user = "carol"
cells = ["A2"]
"#,
        )
        .unwrap();

        let store = session.into_store(&GridSettings::default()).await.unwrap();
        let combined = store.combined();

        assert_eq!(store.len(), 2);
        assert_eq!(combined.cell("A1").map(|c| c.num_people), Some(1));
        assert_eq!(combined.cell("A2").map(|c| c.users.clone()), Some(vec!["bob".to_string(), "carol".to_string()]));
    }

    #[tokio::test]
    async fn test_calendar_needs_one_source() {
        let session = Session::parse("[[calendar]]\nuser = \"dana\"\n").unwrap();
        assert!(session.into_store(&GridSettings::default()).await.is_err());
    }
}
