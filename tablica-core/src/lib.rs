//! Core of the tablica school notice board.
//!
//! - `ics` parses the public calendar feed into [`CalendarEvent`]s
//! - `date` normalizes the feed's date tokens
//! - `tags` classifies events by their bracketed markers
//! - `store` keeps events added through the board itself
//! - `agenda` merges both sources into one chronological list

pub mod agenda;
pub mod config;
pub mod date;
pub mod display;
pub mod error;
pub mod event;
pub mod feed;
pub mod ics;
pub mod store;
pub mod tags;

pub use agenda::{Agenda, filter_by_tag, merge_events, upcoming};
pub use date::{EventDate, normalize};
pub use error::{TablicaError, TablicaResult};
pub use event::CalendarEvent;
pub use ics::{parse_ics, parse_ics_with_limit};
pub use tags::{EventTag, TagSet};
