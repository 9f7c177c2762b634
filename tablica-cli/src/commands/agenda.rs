use anyhow::Result;
use chrono::Utc;
use owo_colors::OwoColorize;
use tablica_core::agenda::{filter_by_tag, upcoming};
use tablica_core::config::TablicaConfig;
use tablica_core::display;
use tablica_core::{CalendarEvent, EventTag};

use crate::render::AgendaRender;

pub async fn run(config: &TablicaConfig, tag: Option<&str>, all: bool) -> Result<()> {
    let tag = tag.map(str::parse::<EventTag>).transpose()?;

    let events = config.agenda()?.events().await;
    let events = select(events, tag, all);

    if events.is_empty() {
        println!("{}", "No events".dimmed());
        return Ok(());
    }

    let today = display::today();
    for event in &events {
        println!("{}", event.render_agenda(today));
    }

    Ok(())
}

fn select(events: Vec<CalendarEvent>, tag: Option<EventTag>, all: bool) -> Vec<CalendarEvent> {
    let events = if all {
        events
    } else {
        upcoming(events, Utc::now())
    };

    match tag {
        Some(tag) => filter_by_tag(events, tag),
        None => events,
    }
}
