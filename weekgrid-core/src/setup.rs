//! Registering a new calendar from a feed URL or a manual selection.
//!
//! Both flows end in the same place: a canonical document serialized into a
//! [`CalendarRecord`] and appended to the session's [`CalendarStore`]. A flow
//! that fails adds nothing.

use tracing::{debug, instrument};

use crate::config::GridSettings;
use crate::convert::{from_selection, to_grid};
use crate::document::CalendarDocument;
use crate::error::{GridError, GridResult};
use crate::event::FeedEvent;
use crate::fetch::FeedClient;
use crate::manual::ManualSelection;
use crate::store::{CalendarRecord, CalendarStore};
use crate::week::{Week, select_week};

fn display_name(user: &str) -> GridResult<&str> {
    let name = user.trim();
    if name.is_empty() {
        return Err(GridError::Validation("a calendar needs a display name".into()));
    }
    Ok(name)
}

/// Normalize parsed feed events into `user`'s document for `week`.
pub fn calendar_from_feed(
    events: &[FeedEvent],
    user: &str,
    week: &Week,
    settings: &GridSettings,
) -> CalendarDocument {
    let intervals = select_week(events, week, settings.timezone);
    to_grid(&intervals, user, week, &settings.grid)
}

/// Fetch `ical_url` and register the current week of it for `user`.
pub async fn setup_ical(
    store: &mut CalendarStore,
    client: &FeedClient,
    settings: &GridSettings,
    user: &str,
    ical_url: &str,
) -> GridResult<CalendarRecord> {
    let week = Week::current(settings.timezone, settings.first_day);
    setup_ical_for_week(store, client, settings, &week, user, ical_url).await
}

#[instrument(skip(store, client, settings, week), level = "info")]
pub async fn setup_ical_for_week(
    store: &mut CalendarStore,
    client: &FeedClient,
    settings: &GridSettings,
    week: &Week,
    user: &str,
    ical_url: &str,
) -> GridResult<CalendarRecord> {
    let user = display_name(user)?;
    let events = client.fetch_feed(ical_url).await?;
    let document = calendar_from_feed(&events, user, week, settings);
    debug!(events = events.len(), cells = document.len(), "Converted feed");

    let record = CalendarRecord {
        user: user.to_string(),
        ical_url: ical_url.trim().to_string(),
        calendar_json: document.to_json()?,
    };
    store.add_calendar(record.clone())?;
    Ok(record)
}

/// Register the slots in `selection` as `user`'s calendar.
///
/// The selection is cleared once the record is stored and kept intact if
/// anything fails.
#[instrument(skip(store, selection), fields(slots = selection.len()), level = "info")]
pub fn setup_manual(
    store: &mut CalendarStore,
    selection: &mut ManualSelection,
    user: &str,
) -> GridResult<CalendarRecord> {
    let user = display_name(user)?;
    let document = from_selection(selection.ids(), user, selection.grid())?;

    let record = CalendarRecord {
        user: user.to_string(),
        ical_url: String::new(),
        calendar_json: document.to_json()?,
    };
    store.add_calendar(record.clone())?;
    selection.clear();
    Ok(record)
}
