//! Calendar normalization and combination engine.
//!
//! Turns heterogeneous calendar inputs (iCalendar feeds, manual grid
//! selections) into canonical weekly-cell documents and merges any number of
//! them into one availability grid:
//! - `grid` defines the slot identifier space shared by every input path
//! - `cell` and `document` hold the canonical form and its JSON interchange shape
//! - `fetch`, `ics`, `week`, `recurrence` and `convert` make up the iCalendar path
//! - `combine` merges documents, `store` keeps the session's selected calendars

pub mod cell;
pub mod combine;
pub mod config;
pub mod constants;
pub mod convert;
pub mod document;
pub mod error;
pub mod event;
pub mod fetch;
pub mod grid;
pub mod ics;
pub mod manual;
pub mod recurrence;
pub mod setup;
pub mod store;
pub mod week;

pub use cell::Cell;
pub use document::CalendarDocument;
pub use error::{GridError, GridResult};
pub use grid::{SlotGrid, SlotId};
pub use store::{CalendarRecord, CalendarStore, GridView};
