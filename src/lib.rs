#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]

pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod interact;
pub mod models;
pub mod output;
pub mod store;

use anyhow::{Context, Result, anyhow};
use jiff::civil::Date;
use std::path::PathBuf;

use cli::{Cli, Commands, FeedbackCommands};
use client::ChatClient;
use config::Config;
use interact::Interact;
use models::FeedbackStatus;
use output::Output;
use store::Store;

pub const DAYPLAN_DIR: &str = ".dayplan";
pub const CONFIG_FILE: &str = "config.toml";
pub const DATA_DIR: &str = "data";

/// Finds the `.dayplan/` directory by walking up from the current
/// directory. Returns `None` if no `.dayplan/` directory is found.
pub fn find_dayplan_dir() -> Option<PathBuf> {
    let current_dir = std::env::current_dir().ok()?;
    let mut dir = current_dir.as_path();

    loop {
        let dayplan_path = dir.join(DAYPLAN_DIR);
        if dayplan_path.is_dir() {
            return Some(dayplan_path);
        }

        dir = dir.parent()?;
    }
}

fn ensure_initialized() -> Result<(Config, Store)> {
    let dayplan_dir = find_dayplan_dir()
        .ok_or_else(|| anyhow!("Dayplan not initialized. Run 'dp init' first."))?;

    let config = Config::load(&dayplan_dir.join(CONFIG_FILE))?;
    let store = Store::open(dayplan_dir.join(DATA_DIR)).context("Failed to open data directory")?;
    Ok((config, store))
}

fn build_client(config: &Config) -> Result<ChatClient> {
    let api_key = Config::api_key()?;
    ChatClient::new(&config.ai, api_key).context("Failed to build AI client")
}

pub fn today() -> Date {
    jiff::Zoned::now().date()
}

fn parse_date(input: &str) -> Result<Date> {
    input
        .parse::<Date>()
        .with_context(|| format!("Invalid date '{input}', expected YYYY-MM-DD"))
}

fn parse_date_or_today(input: Option<String>) -> Result<Date> {
    input.as_deref().map_or_else(|| Ok(today()), parse_date)
}

pub fn run(cli: Cli) -> Result<()> {
    let output = Output::new();
    let interact = Interact::new();

    match cli.command {
        Commands::Init => commands::init::run(),
        Commands::Plan { force } => {
            let (config, store) = ensure_initialized()?;
            let client = build_client(&config)?;
            commands::plan::run(&config, &store, &client, &interact, &output, today(), force)
        }
        Commands::Check { date } => {
            let (_config, store) = ensure_initialized()?;
            let date = date.as_deref().map(parse_date).transpose()?;
            commands::check::run(&store, &interact, &output, date)
        }
        Commands::Summarize { date } => {
            let (config, store) = ensure_initialized()?;
            let client = build_client(&config)?;
            let date = parse_date_or_today(date)?;
            commands::summarize::run(&store, &client, &interact, &output, date)
        }
        Commands::Status { date } => {
            let (_config, store) = ensure_initialized()?;
            let date = parse_date_or_today(date)?;
            commands::status::run(&store, &output, date)
        }
        Commands::Feedback(feedback_cmd) => {
            let (config, store) = ensure_initialized()?;
            run_feedback(feedback_cmd, &config, &store, &interact, &output)
        }
    }
}

fn run_feedback(
    feedback_cmd: FeedbackCommands,
    config: &Config,
    store: &Store,
    interact: &Interact,
    output: &Output,
) -> Result<()> {
    match feedback_cmd {
        FeedbackCommands::Add { text, no_ai } => {
            // Feedback must never be lost to a missing API key.
            let client = if no_ai {
                None
            } else {
                match build_client(config) {
                    Ok(client) => Some(client),
                    Err(err) => {
                        output.warn(&format!("{err:#}"))?;
                        output.warn("Saving feedback without AI confirmation.")?;
                        None
                    }
                }
            };
            commands::feedback::add(store, client.as_ref(), interact, output, text)
        }
        FeedbackCommands::List => commands::feedback::list(store, output),
        FeedbackCommands::Show { id } => commands::feedback::show(store, output, &id),
        FeedbackCommands::SetStatus { id, status } => {
            let status: FeedbackStatus = status
                .parse()
                .map_err(|_| anyhow!("Unknown status '{status}', expected pending, implemented, or dismissed"))?;
            commands::feedback::set_status(store, output, &id, status)
        }
    }
}
