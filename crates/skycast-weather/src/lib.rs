//! Weather data for Skycast
//!
//! OpenWeatherMap client, keyed query cache with retry, and the derived
//! views (units, daily forecast, air quality) built on top of it.

pub mod aqi;
pub mod client;
pub mod error;
pub mod forecast;
pub mod hooks;
pub mod query;
pub mod retry;
pub mod types;
pub mod units;

pub use aqi::AirQualityIndex;
pub use client::{ClientConfig, WeatherClient};
pub use error::WeatherError;
pub use forecast::daily_forecast;
pub use hooks::WeatherQueries;
pub use query::{Endpoint, FetchMode, QueryCache, QueryKey, QueryParams, QueryState, QueryStatus};
pub use retry::{with_retry, RetryPolicy};
pub use types::*;
pub use units::{convert_temperature, convert_wind_speed, format_visibility, temperature_symbol};
