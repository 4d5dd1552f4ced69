//! Which query is active, and the merged state the screen is drawn from.
//!
//! Requests for an abandoned query are never cancelled; their results land
//! in the cache under their own key. `view()` only reads the keys of the
//! query selected *now*, so a late response for an earlier search can
//! never replace the current one.

use std::sync::Arc;

use parking_lot::RwLock;
use skycast_weather::{
    Coordinates, ForecastSeries, QueryState, WeatherError, WeatherQueries, WeatherSnapshot,
};

use crate::search::SearchRequest;

/// At most one of `city` and `coords` is set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActiveQuery {
    city: Option<String>,
    coords: Option<Coordinates>,
}

impl ActiveQuery {
    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    pub fn coords(&self) -> Option<Coordinates> {
        self.coords
    }

    pub fn is_empty(&self) -> bool {
        self.city.is_none() && self.coords.is_none()
    }

    /// Set one side and clear the other.
    pub fn select(&mut self, request: SearchRequest) {
        match request {
            SearchRequest::City(city) => {
                self.city = Some(city);
                self.coords = None;
            }
            SearchRequest::Coords(coords) => {
                self.coords = Some(coords);
                self.city = None;
            }
        }
    }
}

/// Merged state of the active query's lookups.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub loading: bool,
    /// First error in priority order: city, coords, forecast, air quality
    pub error: Option<WeatherError>,
    pub weather: Option<WeatherSnapshot>,
    pub forecast: Option<ForecastSeries>,
    /// Raw AQI for the displayed location
    pub aqi: Option<i64>,
}

impl ViewState {
    /// Weather card is drawn once data is in and nothing is loading.
    pub fn shows_weather(&self) -> bool {
        self.weather.is_some() && !self.loading
    }

    /// Nothing searched yet (or nothing found) and nothing to report.
    pub fn shows_welcome(&self) -> bool {
        self.weather.is_none() && !self.loading && self.error.is_none()
    }
}

struct AppInner {
    queries: WeatherQueries,
    active: RwLock<ActiveQuery>,
}

/// Shared handle to the running app; clones see the same state.
#[derive(Clone)]
pub struct WeatherApp {
    inner: Arc<AppInner>,
}

impl WeatherApp {
    pub fn new(queries: WeatherQueries) -> Self {
        Self {
            inner: Arc::new(AppInner {
                queries,
                active: RwLock::new(ActiveQuery::default()),
            }),
        }
    }

    pub fn queries(&self) -> &WeatherQueries {
        &self.inner.queries
    }

    pub fn active(&self) -> ActiveQuery {
        self.inner.active.read().clone()
    }

    pub fn select(&self, request: SearchRequest) {
        tracing::debug!("Selecting {:?}", request);
        self.inner.active.write().select(request);
    }

    /// Resolve every lookup for the query selected at call time.
    pub async fn refresh(&self) -> ViewState {
        self.run(false).await
    }

    /// Re-request the current keys regardless of cache state.
    pub async fn retry(&self) -> ViewState {
        self.run(true).await
    }

    /// Merged state for the query selected right now.
    pub fn view(&self) -> ViewState {
        let active = self.active();
        let queries = &self.inner.queries;

        let by_city = queries.current_by_city_state(active.city());
        let by_coords = queries.current_by_coords_state(active.coords());
        let forecast_by_city = queries.forecast_by_city_state(active.city());
        let forecast_by_coords = queries.forecast_by_coords_state(active.coords());

        let weather = by_city.data.clone().or_else(|| by_coords.data.clone());
        let air_quality =
            queries.air_quality_by_coords_state(weather.as_ref().and_then(|w| w.coord));

        let loading = by_city.is_loading()
            || by_coords.is_loading()
            || forecast_by_city.is_loading()
            || forecast_by_coords.is_loading()
            || air_quality.is_loading();

        let error = first_error(&[
            by_city.error.as_ref(),
            by_coords.error.as_ref(),
            forecast_by_city.error.as_ref(),
            forecast_by_coords.error.as_ref(),
            air_quality.error.as_ref(),
        ]);

        ViewState {
            loading,
            error,
            weather,
            forecast: forecast_by_city.data.or(forecast_by_coords.data),
            aqi: air_quality.data,
        }
    }

    async fn run(&self, force: bool) -> ViewState {
        let active = self.active();
        let queries = &self.inner.queries;
        let city = active.city();
        let coords = active.coords();

        let (by_city, by_coords, _, _) = if force {
            tokio::join!(
                queries.refetch_current_by_city(city),
                queries.refetch_current_by_coords(coords),
                queries.refetch_forecast_by_city(city),
                queries.refetch_forecast_by_coords(coords),
            )
        } else {
            tokio::join!(
                queries.current_by_city(city),
                queries.current_by_coords(coords),
                queries.forecast_by_city(city),
                queries.forecast_by_coords(coords),
            )
        };

        if let Some(location) = displayed_coords(&by_city, &by_coords) {
            if force {
                queries.refetch_air_quality_by_coords(Some(location)).await;
            } else {
                queries.air_quality_by_coords(Some(location)).await;
            }
        }

        self.view()
    }
}

fn displayed_coords(
    by_city: &QueryState<WeatherSnapshot>,
    by_coords: &QueryState<WeatherSnapshot>,
) -> Option<Coordinates> {
    by_city
        .data
        .as_ref()
        .or(by_coords.data.as_ref())
        .and_then(|w| w.coord)
}

fn first_error(errors: &[Option<&WeatherError>]) -> Option<WeatherError> {
    errors.iter().flatten().next().map(|e| (*e).clone())
}
