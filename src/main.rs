//! skycast: weather lookup in the terminal
//!
//! Usage examples
//! --------------
//!
//! - Current weather and forecast for a city
//!   $ skycast city Hanoi
//!
//! - By coordinates, sharing the summary
//!   $ skycast --share coords 35.68 139.69
//!
//! - The location configured under `[location]`
//!   $ skycast locate
//!
//! - Recent searches and display preferences
//!   $ skycast history
//!   $ skycast prefs --unit fahrenheit --theme dark
//!
//! The provider API key is read from `SKYCAST_API_KEY` /
//! `OPENWEATHER_API_KEY` or `provider.api_key` in the config file.
mod args;

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use skycast_core::{
    AppError, Config, FileStore, HistoryStore, KeyValueStore, PreferencesStore, TemperatureUnit,
    Theme,
};
use skycast_ui::{
    location_error, render_view, share_text, ConfiguredLocation, Locale, SearchBar,
    SearchRequest, ShareController, ShareOutcome, StdoutShare, WeatherApp, WeatherCard,
};
use skycast_weather::{Coordinates, WeatherClient, WeatherQueries};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::args::{CliArgs, Commands, ThemeArg, UnitArg};

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    skycast_core::init_with_default_filter(if args.verbose { "debug" } else { "warn" })?;

    let loaded = match &args.config {
        Some(path) => Config::load_validated_from(path),
        None => Config::load_validated(),
    };
    let (config, _validation) = loaded.unwrap_or_else(|e| fail(&AppError::from(e)));
    tracing::info!("Config directory: {}", config.config_dir.display());

    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(config.storage_path()));
    let history = HistoryStore::new(store.clone());
    let preferences = PreferencesStore::load(store);
    let locale = Locale::from_language(&config.provider.language);

    let request = match &args.command {
        Commands::History { clear } => {
            if *clear {
                history.clear_history();
            }
            print_history(&history, locale);
            return Ok(());
        }
        Commands::Prefs { unit, theme } => {
            if let Some(unit) = unit {
                preferences.set_unit(match unit {
                    UnitArg::Celsius => TemperatureUnit::Celsius,
                    UnitArg::Fahrenheit => TemperatureUnit::Fahrenheit,
                });
            }
            if let Some(theme) = theme {
                preferences.set_theme(match theme {
                    ThemeArg::Light => Theme::Light,
                    ThemeArg::Dark => Theme::Dark,
                });
            }
            let current = preferences.get();
            println!("unit:  {}", current.unit.as_str());
            println!("theme: {}", if current.theme.is_dark() { "dark" } else { "light" });
            return Ok(());
        }
        Commands::City { name } => {
            let mut bar = SearchBar::new();
            bar.set_input(&name.join(" "));
            bar.submit(&history)
        }
        Commands::Coords { lat, lon } => {
            let coords = Coordinates::new(*lat, *lon);
            if !coords.is_valid() {
                fail(&AppError::Location(locale.location_unavailable().to_string()));
            }
            Some(SearchRequest::Coords(coords))
        }
        Commands::Locate => {
            let mut bar = SearchBar::new();
            let geolocator = ConfiguredLocation::from_config(&config.location);
            match bar.locate(&geolocator).await {
                Ok(request) => Some(request),
                Err(e) => fail(&location_error(&e, locale)),
            }
        }
    };

    let client = WeatherClient::from_config(&config.provider).map_err(AppError::from)?;
    let app = WeatherApp::new(WeatherQueries::new(client, &config.query));
    if let Some(request) = request {
        app.select(request);
    }

    let prefs = preferences.get();
    let show_forecast = !args.no_forecast;
    let mut view = app.refresh().await;
    print!("{}", render_view(&view, &prefs, locale, Utc::now(), show_forecast));

    while view.error.is_some() && ask_retry(locale).await {
        view = app.retry().await;
        print!("{}", render_view(&view, &prefs, locale, Utc::now(), show_forecast));
    }

    if args.share {
        if let Some(snapshot) = &view.weather {
            let card = WeatherCard::build(snapshot, &prefs, view.aqi, locale, Utc::now());
            let text = share_text(&card, locale);
            let mut controller = ShareController::new();
            let outcome = controller
                .share(
                    locale.share_title(),
                    &text,
                    Some(&StdoutShare),
                    &StdoutShare,
                    Instant::now(),
                )
                .await;
            if outcome == ShareOutcome::Copied {
                println!("{}", locale.copied());
            }
        }
    }

    if view.error.is_some() {
        std::process::exit(1);
    }
    Ok(())
}

fn print_history(history: &HistoryStore, locale: Locale) {
    let entries = history.get_history();
    if entries.is_empty() {
        println!("{}", locale.history_empty());
        return;
    }
    println!("{}", locale.history_title());
    for entry in entries {
        println!("  {}", entry);
    }
}

/// Offer the inline retry action; EOF or anything but `r` declines.
async fn ask_retry(locale: Locale) -> bool {
    println!("[r] {}", locale.retry());
    let mut line = String::new();
    match BufReader::new(tokio::io::stdin()).read_line(&mut line).await {
        Ok(0) => false,
        Ok(_) => line.trim().eq_ignore_ascii_case("r"),
        Err(e) => {
            tracing::debug!("Could not read retry answer: {}", e);
            false
        }
    }
}

fn fail(error: &AppError) -> ! {
    eprintln!("❌ {}", error.user_message());
    std::process::exit(1);
}
