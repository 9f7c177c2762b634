mod commands;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tablica_core::config::TablicaConfig;
use tablica_core::ics::MAX_FEED_EVENTS;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tablica")]
#[command(about = "School notice board calendar: upcoming events and the admin event list")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show upcoming events from the feed and the event list
    Agenda {
        /// Only events with this tag (RR, P, 1-3, 4-6, 7-8 or none)
        #[arg(short, long)]
        tag: Option<String>,

        /// Include past events
        #[arg(long)]
        all: bool,
    },
    /// Parse a local .ics file and print its events as JSON
    Parse {
        file: PathBuf,

        /// Maximum number of events to read
        #[arg(short, long, default_value_t = MAX_FEED_EVENTS)]
        limit: usize,
    },
    /// Add an event to the event list
    Add {
        title: String,

        /// Start date or date/time (e.g. "2025-03-20" or "2025-03-20T15:00")
        #[arg(short, long)]
        start: String,

        /// End date or date/time, defaults to the start
        #[arg(short, long)]
        end: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(short, long)]
        location: Option<String>,
    },
    /// List events added to the event list
    List,
    /// Remove an event from the event list
    Remove { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Agenda { tag, all } => {
            let config = TablicaConfig::load()?;
            commands::agenda::run(&config, tag.as_deref(), all).await
        }
        Commands::Parse { file, limit } => commands::parse::run(&file, limit),
        Commands::Add {
            title,
            start,
            end,
            description,
            location,
        } => {
            let config = TablicaConfig::load()?;
            commands::events::add(&config, title, start, end, description, location)
        }
        Commands::List => commands::events::list(&TablicaConfig::load()?),
        Commands::Remove { id } => commands::events::remove(&TablicaConfig::load()?, &id),
    }
}
