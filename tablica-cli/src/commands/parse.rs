use std::path::Path;

use anyhow::{Context, Result};
use tablica_core::{CalendarEvent, parse_ics_with_limit};

pub fn run(file: &Path, limit: usize) -> Result<()> {
    let events = parse_file(file, limit)?;
    println!("{}", serde_json::to_string_pretty(&events)?);
    Ok(())
}

fn parse_file(file: &Path, limit: usize) -> Result<Vec<CalendarEvent>> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Could not read {}", file.display()))?;

    Ok(parse_ics_with_limit(&text, limit))
}
