//! Daily view over the 3-hourly forecast series.

use chrono::{DateTime, NaiveDate, Utc};

use crate::types::{ForecastSample, ForecastSeries};

/// Samples per day at a 3-hour interval.
pub const SAMPLES_PER_DAY: usize = 8;
/// Days shown in the daily view.
pub const MAX_DAILY_ENTRIES: usize = 5;

/// One sample per calendar day, skipping the first day, at most five.
///
/// Days are taken in the city's UTC offset and each day is represented by
/// its earliest sample. A series shorter than one day, or one that never
/// reaches a second calendar day, falls back to its first five raw samples.
pub fn daily_forecast(series: &ForecastSeries) -> Vec<&ForecastSample> {
    let samples = &series.list;
    if samples.len() < SAMPLES_PER_DAY {
        return fallback(samples);
    }

    let offset = series.utc_offset();
    let mut daily: Vec<&ForecastSample> = Vec::with_capacity(MAX_DAILY_ENTRIES);
    let mut first_day: Option<NaiveDate> = None;
    let mut last_day: Option<NaiveDate> = None;

    for sample in samples {
        let Some(day) = DateTime::<Utc>::from_timestamp(sample.dt, 0)
            .map(|utc| utc.with_timezone(&offset).date_naive())
        else {
            tracing::debug!("Skipping forecast sample with bad timestamp {}", sample.dt);
            continue;
        };

        if first_day.is_none() {
            first_day = Some(day);
        }
        if Some(day) == first_day || Some(day) == last_day {
            continue;
        }

        last_day = Some(day);
        daily.push(sample);
        if daily.len() == MAX_DAILY_ENTRIES {
            break;
        }
    }

    if daily.is_empty() {
        return fallback(samples);
    }
    daily
}

fn fallback(samples: &[ForecastSample]) -> Vec<&ForecastSample> {
    samples.iter().take(MAX_DAILY_ENTRIES).collect()
}
