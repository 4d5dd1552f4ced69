//! Display models for the weather card and forecast list, and their
//! plain-text rendering for the terminal.

use chrono::{DateTime, Utc};
use skycast_core::{DisplayPreferences, TemperatureUnit};
use skycast_weather::{
    convert_temperature, convert_wind_speed, daily_forecast, format_visibility, local_time,
    temperature_symbol, AirQualityIndex, ForecastSeries, WeatherSnapshot,
};

use crate::app::ViewState;
use crate::locale::{format_time, DetailLabel, Locale};

#[derive(Debug, Clone, PartialEq)]
pub struct DetailRow {
    pub label: DetailLabel,
    pub value: String,
}

/// Everything the weather card shows, already converted and formatted.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherCard {
    pub name: String,
    pub country: String,
    /// Formatted "now" in the location's UTC offset
    pub datetime: String,
    pub icon_url: String,
    pub glyph: &'static str,
    pub temperature: i64,
    pub unit_symbol: &'static str,
    pub description: String,
    pub humidity: u8,
    pub wind_kmh: i64,
    pub details: Vec<DetailRow>,
}

impl WeatherCard {
    pub fn build(
        snapshot: &WeatherSnapshot,
        prefs: &DisplayPreferences,
        aqi: Option<i64>,
        locale: Locale,
        now: DateTime<Utc>,
    ) -> Self {
        let unit = prefs.unit;
        let symbol = temperature_symbol(unit);
        let wind_kmh = convert_wind_speed(snapshot.wind.speed);

        let mut details = vec![
            DetailRow {
                label: DetailLabel::FeelsLike,
                value: format!("{}{}", convert_temperature(snapshot.main.feels_like, unit), symbol),
            },
            DetailRow {
                label: DetailLabel::Humidity,
                value: format!("{}%", snapshot.main.humidity),
            },
            DetailRow {
                label: DetailLabel::Pressure,
                value: format!("{:.0} mb", snapshot.main.pressure),
            },
            DetailRow {
                label: DetailLabel::WindSpeed,
                value: format!("{} km/h", wind_kmh),
            },
        ];
        if let Some(meters) = snapshot.visibility {
            details.push(DetailRow {
                label: DetailLabel::Visibility,
                value: format_visibility(meters),
            });
        }
        if let Some(sunrise) = snapshot.sunrise() {
            details.push(DetailRow {
                label: DetailLabel::Sunrise,
                value: format_time(sunrise),
            });
        }
        if let Some(sunset) = snapshot.sunset() {
            details.push(DetailRow {
                label: DetailLabel::Sunset,
                value: format_time(sunset),
            });
        }
        // Unknown readings get no row at all
        if let Some(index) = aqi.and_then(AirQualityIndex::from_value) {
            details.push(DetailRow {
                label: DetailLabel::AirQuality,
                value: format!("{} ({})", locale.aqi_label(Some(index)), index.value()),
            });
        }

        Self {
            name: snapshot.name.clone(),
            country: snapshot.sys.country.clone(),
            datetime: locale.format_datetime(now.with_timezone(&snapshot.utc_offset())),
            icon_url: snapshot.icon_url(),
            glyph: snapshot.condition().glyph(),
            temperature: convert_temperature(snapshot.main.temp, unit),
            unit_symbol: symbol,
            description: snapshot.description().to_string(),
            humidity: snapshot.main.humidity,
            wind_kmh,
            details,
        }
    }

    /// "Hanoi, VN", or just the name when the country is missing.
    pub fn title(&self) -> String {
        if self.country.is_empty() {
            self.name.clone()
        } else {
            format!("{}, {}", self.name, self.country)
        }
    }

    pub fn temperature_text(&self) -> String {
        format!("{}{}", self.temperature, self.unit_symbol)
    }

    pub fn detail(&self, label: DetailLabel) -> Option<&str> {
        self.details
            .iter()
            .find(|row| row.label == label)
            .map(|row| row.value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastDay {
    pub label: String,
    pub icon_url: String,
    pub glyph: &'static str,
    pub high: i64,
    pub low: i64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastView {
    pub header: String,
    pub days: Vec<ForecastDay>,
}

impl ForecastView {
    /// `None` when the series has no samples.
    pub fn build(series: &ForecastSeries, unit: TemperatureUnit, locale: Locale) -> Option<Self> {
        let daily = daily_forecast(series);
        if daily.is_empty() {
            return None;
        }

        let days: Vec<ForecastDay> = daily
            .into_iter()
            .map(|sample| ForecastDay {
                label: local_time(sample.dt, series.city.timezone)
                    .map(|at| locale.format_day(at))
                    .unwrap_or_default(),
                icon_url: skycast_weather::icon_url(sample.icon()),
                glyph: sample.condition().glyph(),
                high: convert_temperature(sample.main.temp_max, unit),
                low: convert_temperature(sample.main.temp_min, unit),
                description: sample.description().to_string(),
            })
            .collect();

        Some(Self {
            header: locale.forecast_header(days.len()),
            days,
        })
    }
}

/// Fixed-format summary used by the share action.
pub fn share_text(card: &WeatherCard, locale: Locale) -> String {
    match locale {
        Locale::Vi => format!(
            "🌤️ Thời tiết tại {}, {}:\n🌡️ Nhiệt độ: {}\n💧 Độ ẩm: {}%\n💨 Gió: {} km/h\n📍 {}",
            card.name,
            card.country,
            card.temperature_text(),
            card.humidity,
            card.wind_kmh,
            card.description
        ),
        Locale::En => format!(
            "🌤️ Weather in {}, {}:\n🌡️ Temperature: {}\n💧 Humidity: {}%\n💨 Wind: {} km/h\n📍 {}",
            card.name,
            card.country,
            card.temperature_text(),
            card.humidity,
            card.wind_kmh,
            card.description
        ),
    }
}

pub fn render_card(card: &WeatherCard, locale: Locale) -> String {
    let mut out = String::new();
    push_line(&mut out, &card.title());
    push_line(&mut out, &card.datetime);
    out.push('\n');
    push_line(&mut out, &format!("  {}  {}", card.glyph, card.temperature_text()));
    push_line(&mut out, &format!("  {}", card.description));
    out.push('\n');
    for row in &card.details {
        push_line(&mut out, &format!("  {}: {}", locale.detail_label(row.label), row.value));
    }
    out
}

pub fn render_forecast(view: &ForecastView) -> String {
    let mut out = String::new();
    push_line(&mut out, &view.header);
    for day in &view.days {
        push_line(
            &mut out,
            &format!(
                "  {:<16} {}  {:>4}° / {:>4}°  {}",
                day.label, day.glyph, day.high, day.low, day.description
            ),
        );
    }
    out
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

/// The whole screen for one view state: loading, error, card, or welcome.
pub fn render_view(
    view: &ViewState,
    prefs: &DisplayPreferences,
    locale: Locale,
    now: DateTime<Utc>,
    show_forecast: bool,
) -> String {
    let mut out = String::new();
    push_line(&mut out, locale.app_title());
    push_line(&mut out, locale.subtitle());
    out.push('\n');

    if view.loading {
        push_line(&mut out, locale.loading());
    }
    if let Some(error) = &view.error {
        push_line(&mut out, &format!("❌ {}", error.user_message()));
    }
    if view.shows_weather() {
        if let Some(snapshot) = &view.weather {
            let card = WeatherCard::build(snapshot, prefs, view.aqi, locale, now);
            out.push_str(&render_card(&card, locale));
        }
        if show_forecast {
            if let Some(forecast) = view
                .forecast
                .as_ref()
                .and_then(|series| ForecastView::build(series, prefs.unit, locale))
            {
                out.push('\n');
                out.push_str(&render_forecast(&forecast));
            }
        }
    }
    if view.shows_welcome() {
        push_line(&mut out, locale.welcome());
    }
    out
}
