//! OpenWeatherMap response schema.
//!
//! Only the fields the app renders are modelled; everything else in the
//! provider payload is ignored by serde.

use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

pub const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

/// Weather condition categories mapped from OpenWeatherMap condition ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    #[default]
    Clear,
    PartlyCloudy,
    Cloudy,
    Fog,
    Drizzle,
    Rain,
    HeavyRain,
    Snow,
    Sleet,
    Thunderstorm,
}

impl WeatherCondition {
    /// Convert an OpenWeatherMap condition id to a category
    /// See: https://openweathermap.org/weather-conditions
    pub fn from_condition_id(id: i32) -> Self {
        match id {
            200..=299 => Self::Thunderstorm,
            300..=399 => Self::Drizzle,
            502..=504 | 522 | 531 => Self::HeavyRain,
            511 => Self::Sleet, // Freezing rain
            500..=599 => Self::Rain,
            611..=616 => Self::Sleet,
            600..=699 => Self::Snow,
            700..=799 => Self::Fog,
            800 => Self::Clear,
            801 | 802 => Self::PartlyCloudy,
            803 | 804 => Self::Cloudy,
            _ => Self::Clear, // Unknown ids default to clear
        }
    }

    /// Single-glyph symbol for terminal output
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Clear => "☀",
            Self::PartlyCloudy => "⛅",
            Self::Cloudy => "☁",
            Self::Fog => "🌫",
            Self::Drizzle | Self::Rain | Self::HeavyRain => "🌧",
            Self::Snow | Self::Sleet => "🌨",
            Self::Thunderstorm => "⛈",
        }
    }
}

/// Latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Finite and inside the usual latitude/longitude ranges.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Condition {
    pub id: i32,
    pub main: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MainReadings {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub pressure: f64,
    pub humidity: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Wind {
    /// Metres per second with `units=metric`
    pub speed: f64,
    pub deg: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SunInfo {
    pub country: String,
    pub sunrise: i64,
    pub sunset: i64,
}

/// `/weather` response: conditions at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub name: String,
    #[serde(default)]
    pub coord: Option<Coordinates>,
    #[serde(default)]
    pub weather: Vec<Condition>,
    pub main: MainReadings,
    #[serde(default)]
    pub wind: Wind,
    #[serde(default)]
    pub sys: SunInfo,
    /// Metres; absent for some stations
    #[serde(default)]
    pub visibility: Option<u32>,
    #[serde(default)]
    pub dt: i64,
    /// Seconds east of UTC
    #[serde(default)]
    pub timezone: i32,
}

impl WeatherSnapshot {
    pub fn primary_condition(&self) -> Option<&Condition> {
        self.weather.first()
    }

    pub fn condition(&self) -> WeatherCondition {
        self.primary_condition()
            .map(|c| WeatherCondition::from_condition_id(c.id))
            .unwrap_or_default()
    }

    pub fn description(&self) -> &str {
        self.primary_condition()
            .map(|c| c.description.as_str())
            .unwrap_or_default()
    }

    pub fn icon(&self) -> &str {
        self.primary_condition()
            .map(|c| c.icon.as_str())
            .unwrap_or_default()
    }

    pub fn icon_url(&self) -> String {
        icon_url(self.icon())
    }

    pub fn utc_offset(&self) -> FixedOffset {
        utc_offset(self.timezone)
    }

    pub fn sunrise(&self) -> Option<DateTime<FixedOffset>> {
        local_time(self.sys.sunrise, self.timezone)
    }

    pub fn sunset(&self) -> Option<DateTime<FixedOffset>> {
        local_time(self.sys.sunset, self.timezone)
    }
}

/// One 3-hour sample of a `/forecast` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    pub dt: i64,
    pub main: MainReadings,
    #[serde(default)]
    pub weather: Vec<Condition>,
    #[serde(default)]
    pub wind: Wind,
    /// Probability of precipitation, 0..=1
    #[serde(default)]
    pub pop: Option<f64>,
    #[serde(default)]
    pub dt_txt: Option<String>,
}

impl ForecastSample {
    pub fn description(&self) -> &str {
        self.weather
            .first()
            .map(|c| c.description.as_str())
            .unwrap_or_default()
    }

    pub fn icon(&self) -> &str {
        self.weather
            .first()
            .map(|c| c.icon.as_str())
            .unwrap_or_default()
    }

    pub fn condition(&self) -> WeatherCondition {
        self.weather
            .first()
            .map(|c| WeatherCondition::from_condition_id(c.id))
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastCity {
    pub name: String,
    pub country: String,
    pub coord: Option<Coordinates>,
    /// Seconds east of UTC
    pub timezone: i32,
    pub sunrise: i64,
    pub sunset: i64,
}

/// `/forecast` response: samples every 3 hours over 5 days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSeries {
    #[serde(default)]
    pub list: Vec<ForecastSample>,
    #[serde(default)]
    pub city: ForecastCity,
}

impl ForecastSeries {
    pub fn utc_offset(&self) -> FixedOffset {
        utc_offset(self.city.timezone)
    }
}

/// `/air_pollution` response, deliberately loose so shape checks happen in
/// the client rather than in serde.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AirPollutionResponse {
    #[serde(default)]
    pub list: Option<Vec<AirPollutionSample>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AirPollutionSample {
    #[serde(default)]
    pub main: Option<AirPollutionMain>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AirPollutionMain {
    #[serde(default)]
    pub aqi: Option<i64>,
}

impl AirPollutionResponse {
    /// `list[0].main.aqi`, if the payload has that shape.
    pub fn first_aqi(&self) -> Option<i64> {
        self.list.as_ref()?.first()?.main.as_ref()?.aqi
    }
}

pub fn icon_url(icon: &str) -> String {
    format!("{}/{}@2x.png", ICON_BASE_URL, icon)
}

pub fn utc_offset(seconds: i32) -> FixedOffset {
    FixedOffset::east_opt(seconds).unwrap_or_else(|| Utc.fix())
}

/// Unix timestamp rendered in a provider-supplied UTC offset.
pub fn local_time(timestamp: i64, offset_seconds: i32) -> Option<DateTime<FixedOffset>> {
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .map(|utc| utc.with_timezone(&utc_offset(offset_seconds)))
}
