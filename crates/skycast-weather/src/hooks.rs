//! Cached lookups per endpoint.
//!
//! Each operation resolves to a `QueryState`: `Idle` when its parameters are
//! missing, otherwise the cached or freshly fetched outcome for that exact
//! key. `*_state` peeks without requesting; `refetch_*` always requests.

use std::time::Duration;

use skycast_core::QueryConfig;

use crate::client::WeatherClient;
use crate::query::{Endpoint, FetchMode, QueryCache, QueryKey, QueryState};
use crate::retry::RetryPolicy;
use crate::types::{Coordinates, ForecastSeries, WeatherSnapshot};

pub struct WeatherQueries {
    client: WeatherClient,
    current: QueryCache<WeatherSnapshot>,
    forecast: QueryCache<ForecastSeries>,
    air_quality: QueryCache<i64>,
    standard: RetryPolicy,
    air_quality_policy: RetryPolicy,
}

impl WeatherQueries {
    pub fn new(client: WeatherClient, config: &QueryConfig) -> Self {
        Self::with_policies(
            client,
            config.stale_after(),
            RetryPolicy::standard().with_delays_from(config),
            RetryPolicy::air_quality().with_delays_from(config),
        )
    }

    pub fn with_policies(
        client: WeatherClient,
        stale_after: Duration,
        standard: RetryPolicy,
        air_quality_policy: RetryPolicy,
    ) -> Self {
        Self {
            client,
            current: QueryCache::new(stale_after),
            forecast: QueryCache::new(stale_after),
            air_quality: QueryCache::new(stale_after),
            standard,
            air_quality_policy,
        }
    }

    pub fn client(&self) -> &WeatherClient {
        &self.client
    }

    // Current conditions

    pub async fn current_by_city(&self, city: Option<&str>) -> QueryState<WeatherSnapshot> {
        self.fetch_current_by_city(city, FetchMode::IfStale).await
    }

    pub async fn refetch_current_by_city(
        &self,
        city: Option<&str>,
    ) -> QueryState<WeatherSnapshot> {
        self.fetch_current_by_city(city, FetchMode::Force).await
    }

    pub fn current_by_city_state(&self, city: Option<&str>) -> QueryState<WeatherSnapshot> {
        self.current
            .peek(QueryKey::city(Endpoint::CurrentWeather, city).as_ref())
    }

    pub async fn current_by_coords(
        &self,
        coords: Option<Coordinates>,
    ) -> QueryState<WeatherSnapshot> {
        self.fetch_current_by_coords(coords, FetchMode::IfStale).await
    }

    pub async fn refetch_current_by_coords(
        &self,
        coords: Option<Coordinates>,
    ) -> QueryState<WeatherSnapshot> {
        self.fetch_current_by_coords(coords, FetchMode::Force).await
    }

    pub fn current_by_coords_state(
        &self,
        coords: Option<Coordinates>,
    ) -> QueryState<WeatherSnapshot> {
        self.current
            .peek(QueryKey::coords(Endpoint::CurrentWeather, coords).as_ref())
    }

    // Forecast

    pub async fn forecast_by_city(&self, city: Option<&str>) -> QueryState<ForecastSeries> {
        self.fetch_forecast_by_city(city, FetchMode::IfStale).await
    }

    pub async fn refetch_forecast_by_city(
        &self,
        city: Option<&str>,
    ) -> QueryState<ForecastSeries> {
        self.fetch_forecast_by_city(city, FetchMode::Force).await
    }

    pub fn forecast_by_city_state(&self, city: Option<&str>) -> QueryState<ForecastSeries> {
        self.forecast
            .peek(QueryKey::city(Endpoint::Forecast, city).as_ref())
    }

    pub async fn forecast_by_coords(
        &self,
        coords: Option<Coordinates>,
    ) -> QueryState<ForecastSeries> {
        self.fetch_forecast_by_coords(coords, FetchMode::IfStale).await
    }

    pub async fn refetch_forecast_by_coords(
        &self,
        coords: Option<Coordinates>,
    ) -> QueryState<ForecastSeries> {
        self.fetch_forecast_by_coords(coords, FetchMode::Force).await
    }

    pub fn forecast_by_coords_state(
        &self,
        coords: Option<Coordinates>,
    ) -> QueryState<ForecastSeries> {
        self.forecast
            .peek(QueryKey::coords(Endpoint::Forecast, coords).as_ref())
    }

    // Air quality

    pub async fn air_quality_by_coords(&self, coords: Option<Coordinates>) -> QueryState<i64> {
        self.fetch_air_quality(coords, FetchMode::IfStale).await
    }

    pub async fn refetch_air_quality_by_coords(
        &self,
        coords: Option<Coordinates>,
    ) -> QueryState<i64> {
        self.fetch_air_quality(coords, FetchMode::Force).await
    }

    pub fn air_quality_by_coords_state(&self, coords: Option<Coordinates>) -> QueryState<i64> {
        self.air_quality
            .peek(QueryKey::coords(Endpoint::AirQuality, coords).as_ref())
    }

    /// Mark every cached value stale.
    pub fn invalidate_all(&self) {
        self.current.invalidate_all();
        self.forecast.invalidate_all();
        self.air_quality.invalidate_all();
    }

    async fn fetch_current_by_city(
        &self,
        city: Option<&str>,
        mode: FetchMode,
    ) -> QueryState<WeatherSnapshot> {
        let (Some(key), Some(city)) = (QueryKey::city(Endpoint::CurrentWeather, city), city) else {
            return QueryState::idle();
        };
        let city = city.trim();
        let client = &self.client;
        self.current
            .fetch(&key, &self.standard, mode, move || client.current_by_city(city))
            .await
    }

    async fn fetch_current_by_coords(
        &self,
        coords: Option<Coordinates>,
        mode: FetchMode,
    ) -> QueryState<WeatherSnapshot> {
        let (Some(key), Some(coords)) = (QueryKey::coords(Endpoint::CurrentWeather, coords), coords) else {
            return QueryState::idle();
        };
        let client = &self.client;
        self.current
            .fetch(&key, &self.standard, mode, move || client.current_by_coords(coords))
            .await
    }

    async fn fetch_forecast_by_city(
        &self,
        city: Option<&str>,
        mode: FetchMode,
    ) -> QueryState<ForecastSeries> {
        let (Some(key), Some(city)) = (QueryKey::city(Endpoint::Forecast, city), city) else {
            return QueryState::idle();
        };
        let city = city.trim();
        let client = &self.client;
        self.forecast
            .fetch(&key, &self.standard, mode, move || client.forecast_by_city(city))
            .await
    }

    async fn fetch_forecast_by_coords(
        &self,
        coords: Option<Coordinates>,
        mode: FetchMode,
    ) -> QueryState<ForecastSeries> {
        let (Some(key), Some(coords)) = (QueryKey::coords(Endpoint::Forecast, coords), coords) else {
            return QueryState::idle();
        };
        let client = &self.client;
        self.forecast
            .fetch(&key, &self.standard, mode, move || client.forecast_by_coords(coords))
            .await
    }

    async fn fetch_air_quality(
        &self,
        coords: Option<Coordinates>,
        mode: FetchMode,
    ) -> QueryState<i64> {
        let (Some(key), Some(coords)) = (QueryKey::coords(Endpoint::AirQuality, coords), coords) else {
            return QueryState::idle();
        };
        let client = &self.client;
        self.air_quality
            .fetch(&key, &self.air_quality_policy, mode, move || {
                client.air_quality_by_coords(coords)
            })
            .await
    }
}
