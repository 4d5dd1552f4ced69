//! Metric-to-display conversions. The provider is always queried with
//! `units=metric`, so inputs are °C and m/s.

use skycast_core::TemperatureUnit;

/// Round `celsius` to a whole degree in the requested unit.
pub fn convert_temperature(celsius: f64, unit: TemperatureUnit) -> i64 {
    let value = match unit {
        TemperatureUnit::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
        TemperatureUnit::Celsius => celsius,
    };
    round_half_up(value)
}

/// Metres per second to whole km/h.
pub fn convert_wind_speed(meters_per_second: f64) -> i64 {
    round_half_up(meters_per_second * 3.6)
}

pub fn temperature_symbol(unit: TemperatureUnit) -> &'static str {
    match unit {
        TemperatureUnit::Celsius => "°C",
        TemperatureUnit::Fahrenheit => "°F",
    }
}

/// Visibility in metres as kilometres with one decimal, e.g. `"10.0 km"`.
pub fn format_visibility(meters: u32) -> String {
    format!("{:.1} km", f64::from(meters) / 1000.0)
}

// Halves round toward +inf (-2.5 -> -2), unlike f64::round which rounds away from zero.
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}
