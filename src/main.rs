mod cli;
mod config;
mod models;
mod prayer_times;
mod provider;
mod tui;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;

use cli::args::{Cli, Commands};
use cli::handlers;
use config::AppConfig;
use provider::AladhanClient;
use utils::clock::{Clock, FixedClock};

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = AppConfig::load().context("Loading config")?;

    // Config inspection must work even when the provider cannot be built
    if let Some(Commands::Config { init }) = cli.command {
        return handlers::handle_config(&config, init);
    }

    let provider = AladhanClient::new(&config.provider, &config.location)?;
    let clock = config.clock()?;
    log::debug!(
        "Location {} ({}), zone {}",
        config.location.name,
        config.location.country,
        clock.timezone()
    );

    match cli.command {
        Some(Commands::Times { at }) => {
            let clock: Box<dyn Clock> = match at {
                Some(at) => Box::new(FixedClock(at)),
                None => Box::new(clock),
            };
            handlers::handle_times(&config, &provider, clock.as_ref())?;
        }
        Some(Commands::Calendar { year, month }) => {
            handlers::handle_calendar(&config, &provider, &clock, year, month)?;
        }
        Some(Commands::Countdown { ticks }) => {
            handlers::handle_countdown(&config, &provider, Box::new(clock), ticks)?;
        }
        Some(Commands::Config { .. }) => unreachable!(),

        // No subcommand → launch TUI
        None => {
            tui::app::run(config, Arc::new(provider))?;
        }
    }

    Ok(())
}
