//! Configuration and CLI argument handling

use std::time::Duration;

use clap::Parser;

use crate::state::Mode;

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "dual-timer")]
#[command(about = "Terminal stopwatch and countdown timer")]
#[command(version)]
pub struct Config {
    /// Which timer to open
    #[arg(value_enum, default_value = "stopwatch")]
    pub mode: Mode,

    /// Display refresh period in milliseconds
    #[arg(long, default_value = "50", value_parser = clap::value_parser!(u64).range(1..=1000))]
    pub tick_ms: u64,

    /// Countdown digits to type before starting (HHMMSS, shifted in from the right)
    #[arg(short, long)]
    pub digits: Option<String>,

    /// Print every timer event as a JSON line
    #[arg(long)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}
