//! Terminal rendering for tablica types.
//!
//! Extension traits that add colored output to tablica-core types using
//! owo_colors. Tag badges use the same palette as the web board.

use chrono::NaiveDate;
use owo_colors::OwoColorize;
use tablica_core::display::{days_until_label, format_date, format_time};
use tablica_core::store::StoredEvent;
use tablica_core::{CalendarEvent, EventTag, TagSet, normalize};

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for EventTag {
    fn render(&self) -> String {
        let badge = format!("[{}]", self.label());
        match hex_rgb(EventTag::color(*self).hex) {
            Some((r, g, b)) => badge.truecolor(r, g, b).bold().to_string(),
            None => badge,
        }
    }
}

impl Render for TagSet {
    fn render(&self) -> String {
        self.active()
            .map(|tag| tag.render())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Render for StoredEvent {
    fn render(&self) -> String {
        let start = normalize(&self.start);
        let when = match (format_date(&start), format_time(&start)) {
            (Some(date), Some(time)) => format!("{} {}", date, time),
            _ => self.start.clone(),
        };

        format!("{} {} {}", self.id.dimmed(), self.title.bold(), when.dimmed())
    }
}

/// Agenda line for an event, relative to `today`.
pub trait AgendaRender {
    fn render_agenda(&self, today: NaiveDate) -> String;
}

impl AgendaRender for CalendarEvent {
    fn render_agenda(&self, today: NaiveDate) -> String {
        let start = self.start_date();

        let date = format_date(&start).unwrap_or_default();
        let when = match format_time(&start).filter(|_| !self.is_all_day()) {
            Some(time) => format!("{} {}", date, time),
            None => date,
        };

        let countdown = days_until_label(&start, today).unwrap_or_default();
        let tags = self.tags().render();

        let mut line = format!("{:<24} {:<12} {}", when, countdown.cyan(), self.title.bold());
        if !tags.is_empty() {
            line = format!("{} {}", line, tags);
        }
        if !self.location.is_empty() {
            line = format!("{}\n{:<37} {}", line, "", self.location.dimmed());
        }
        line
    }
}

/// `#rrggbb` to its components.
fn hex_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }

    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}
