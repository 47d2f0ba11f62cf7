//! iCalendar feed parsing.
//!
//! This module reads RFC 5545 feeds into [`crate::event::FeedEvent`]s.

mod parse;

pub use parse::parse_feed;
