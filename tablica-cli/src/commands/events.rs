//! Managing the internal event list directly, without the HTTP API.

use anyhow::Result;
use owo_colors::OwoColorize;
use tablica_core::config::TablicaConfig;
use tablica_core::store::NewEvent;

use crate::render::Render;

pub fn add(
    config: &TablicaConfig,
    title: String,
    start: String,
    end: Option<String>,
    description: Option<String>,
    location: Option<String>,
) -> Result<()> {
    let event = config.open_store().create(NewEvent {
        title,
        start,
        end,
        description,
        location,
    })?;

    println!("{}", format!("  Created: {}", event.title).green());
    println!("  {}", event.render());

    Ok(())
}

pub fn list(config: &TablicaConfig) -> Result<()> {
    let events = config.open_store().list()?;

    if events.is_empty() {
        println!("{}", "No events".dimmed());
        return Ok(());
    }

    for event in &events {
        println!("{}", event.render());
    }

    Ok(())
}

pub fn remove(config: &TablicaConfig, id: &str) -> Result<()> {
    if !config.open_store().delete(id)? {
        anyhow::bail!("Event '{}' not found", id);
    }

    println!("{}", format!("  Removed: {}", id).red());
    Ok(())
}
