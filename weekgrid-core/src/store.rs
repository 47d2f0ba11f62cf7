//! The session's registry of selected calendars.
//!
//! A `CalendarStore` is created by the application for one session and passed
//! to the setup flows and views that need it. Records can only be appended.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::combine::combine_all;
use crate::document::CalendarDocument;
use crate::error::{GridError, GridResult};

/// One registered calendar source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarRecord {
    pub user: String,
    /// Feed URL, empty for manually entered calendars
    pub ical_url: String,
    /// Canonical `{"cells":[...]}` document
    pub calendar_json: String,
}

impl CalendarRecord {
    pub fn is_manual(&self) -> bool {
        self.ical_url.is_empty()
    }
}

/// What the presentation layer receives: a document to draw and the number
/// of calendars folded into it, which scales the grid's colouring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridView {
    pub calendar_json: String,
    pub source_count: usize,
}

impl GridView {
    fn of(document: &CalendarDocument, source_count: usize) -> GridResult<Self> {
        Ok(GridView {
            calendar_json: document.to_json()?,
            source_count,
        })
    }
}

#[derive(Debug, Clone)]
struct StoredCalendar {
    record: CalendarRecord,
    document: CalendarDocument,
}

#[derive(Debug, Clone, Default)]
pub struct CalendarStore {
    calendars: Vec<StoredCalendar>,
}

impl CalendarStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record after checking its document parses.
    ///
    /// On failure the store is left unchanged. Adding the same user twice
    /// creates two independent records.
    pub fn add_calendar(&mut self, record: CalendarRecord) -> GridResult<()> {
        let document = CalendarDocument::from_json(&record.calendar_json).map_err(|e| {
            GridError::Validation(format!("calendar for '{}' is invalid: {}", record.user, e))
        })?;

        info!(
            user = %record.user,
            cells = document.len(),
            manual = record.is_manual(),
            "Added calendar"
        );
        self.calendars.push(StoredCalendar { record, document });
        Ok(())
    }

    /// The selected calendars in the order they were added.
    pub fn records(&self) -> impl ExactSizeIterator<Item = &CalendarRecord> {
        self.calendars.iter().map(|c| &c.record)
    }

    pub fn len(&self) -> usize {
        self.calendars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calendars.is_empty()
    }

    /// Document of the first calendar registered for `user`.
    pub fn document_for(&self, user: &str) -> Option<&CalendarDocument> {
        self.calendars
            .iter()
            .find(|c| c.record.user == user)
            .map(|c| &c.document)
    }

    /// All selected documents folded in selection order.
    pub fn combined(&self) -> CalendarDocument {
        combine_all(self.calendars.iter().map(|c| &c.document))
    }

    pub fn combined_view(&self) -> GridResult<GridView> {
        let combined = self.combined();
        debug!(
            sources = self.len(),
            cells = combined.len(),
            "Combined calendars"
        );
        GridView::of(&combined, self.len())
    }

    pub fn individual_view(&self, user: &str) -> GridResult<GridView> {
        let document = self
            .document_for(user)
            .ok_or_else(|| GridError::UnknownUser(user.to_string()))?;
        GridView::of(document, 1)
    }

    /// The view shown when no calendar is selected.
    pub fn empty_view() -> GridResult<GridView> {
        GridView::of(&CalendarDocument::empty(), 0)
    }
}
