use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "miqat", version, author, about = "Live next-prayer countdown and monthly prayer calendar")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show today's prayer times and the countdown to the next prayer
    Times {
        /// Evaluate at this local time instead of now (YYYY-MM-DDTHH:MM:SS)
        #[arg(long, value_parser = parse_local_datetime)]
        at: Option<NaiveDateTime>,
    },
    /// Print the prayer calendar for a month
    Calendar {
        /// Year (defaults to the current year in the configured zone)
        #[arg(long)]
        year: Option<i32>,
        /// Month 1-12 (defaults to the current month)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,
    },
    /// Print a live countdown line every second
    Countdown {
        /// Stop after this many updates
        #[arg(long)]
        ticks: Option<u64>,
    },
    /// Show or create the configuration file
    Config {
        /// Write the default configuration file
        #[arg(long)]
        init: bool,
    },
}

fn parse_local_datetime(s: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
        .map_err(|e| format!("expected YYYY-MM-DDTHH:MM[:SS]: {}", e))
}
