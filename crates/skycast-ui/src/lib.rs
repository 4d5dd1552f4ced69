//! Skycast view layer
//!
//! Search input, query orchestration, and the display models rendered by
//! the terminal front end. Platform capabilities (geolocation, sharing,
//! clipboard) are injected through the traits in `capabilities`.

pub mod app;
pub mod capabilities;
pub mod display;
pub mod error_mapping;
pub mod locale;
pub mod search;
pub mod share;

pub use app::{ActiveQuery, ViewState, WeatherApp};
pub use capabilities::{
    Clipboard, ConfiguredLocation, Geolocator, LocationError, PositionOptions, ShareError,
    Sharer, StdoutShare, LOCATE_TIMEOUT,
};
pub use display::{
    render_card, render_forecast, render_view, share_text, ForecastDay, ForecastView,
    WeatherCard,
};
pub use error_mapping::location_error;
pub use locale::{DetailLabel, Locale};
pub use search::{SearchBar, SearchRequest};
pub use share::{ShareController, ShareOutcome, COPIED_ACK};
