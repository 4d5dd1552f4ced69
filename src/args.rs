use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// CLI arguments for skycast
#[derive(Debug, Parser)]
#[command(
    name = "skycast",
    version,
    about = "Current weather, 5-day forecast and air quality in your terminal"
)]
pub struct CliArgs {
    /// Config file (default: <config dir>/skycast/config.toml)
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Share a summary of the result (falls back to copying it)
    #[arg(long, global = true)]
    pub share: bool,

    /// Skip the daily forecast
    #[arg(long = "no-forecast", global = true)]
    pub no_forecast: bool,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Look up a city by name
    City {
        /// City name (e.g. Hanoi, "Ho Chi Minh City")
        name: Vec<String>,
    },

    /// Look up a latitude/longitude pair
    Coords {
        #[arg(allow_hyphen_values = true)]
        lat: f64,
        #[arg(allow_hyphen_values = true)]
        lon: f64,
    },

    /// Look up the configured current location
    Locate,

    /// Show recent searches
    History {
        /// Forget all recent searches
        #[arg(long)]
        clear: bool,
    },

    /// Show or change display preferences
    Prefs {
        #[arg(long, value_enum)]
        unit: Option<UnitArg>,

        #[arg(long, value_enum)]
        theme: Option<ThemeArg>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum UnitArg {
    Celsius,
    Fahrenheit,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ThemeArg {
    Light,
    Dark,
}
