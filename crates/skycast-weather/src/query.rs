//! Keyed query cache.
//!
//! Each cache maps a `QueryKey` (endpoint + normalized parameters) to the
//! last outcome of that request. Readers get a `QueryState` snapshot;
//! writers go through `fetch`, which serves fresh values from the cache,
//! joins a request already in flight for the same key, or runs the fetcher
//! under a `RetryPolicy`.
//!
//! Staleness: a successful value is fresh for `stale_after` from the moment
//! it was stored. `invalidate` marks it stale early. Stale or failed
//! entries keep their last value for display until a refetch replaces it.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::time::Instant;

use crate::error::WeatherError;
use crate::retry::{with_retry, RetryPolicy};
use crate::types::Coordinates;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    CurrentWeather,
    Forecast,
    AirQuality,
}

/// Normalized request parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryParams {
    /// Trimmed, lower-cased city name
    City(String),
    /// Microdegrees
    Coords { lat_e6: i64, lon_e6: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub endpoint: Endpoint,
    pub params: QueryParams,
}

impl QueryKey {
    /// `None` when the city is absent or blank.
    pub fn city(endpoint: Endpoint, city: Option<&str>) -> Option<Self> {
        let city = city.map(str::trim).filter(|c| !c.is_empty())?;
        Some(Self {
            endpoint,
            params: QueryParams::City(city.to_lowercase()),
        })
    }

    /// `None` when the coordinates are absent or out of range.
    pub fn coords(endpoint: Endpoint, coords: Option<Coordinates>) -> Option<Self> {
        let coords = coords.filter(Coordinates::is_valid)?;
        Some(Self {
            endpoint,
            params: QueryParams::Coords {
                lat_e6: (coords.lat * 1e6).round() as i64,
                lon_e6: (coords.lon * 1e6).round() as i64,
            },
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryStatus {
    /// Parameters missing; nothing requested
    #[default]
    Idle,
    /// Request in flight (first load or refetch)
    Loading,
    Success,
    /// Last request failed after exhausting retries
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Serve a fresh cached value without a request
    IfStale,
    /// Always request (manual retry)
    Force,
}

#[derive(Debug, Clone)]
pub struct QueryState<V> {
    pub status: QueryStatus,
    /// Last successful value, kept through refetches and failures
    pub data: Option<V>,
    pub error: Option<WeatherError>,
    /// A request for this key is in flight
    pub is_fetching: bool,
    pub last_fetched: Option<Instant>,
}

impl<V> Default for QueryState<V> {
    fn default() -> Self {
        Self::idle()
    }
}

impl<V> QueryState<V> {
    pub fn idle() -> Self {
        Self {
            status: QueryStatus::Idle,
            data: None,
            error: None,
            is_fetching: false,
            last_fetched: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status == QueryStatus::Loading
    }

    pub fn is_idle(&self) -> bool {
        self.status == QueryStatus::Idle
    }

    pub fn is_success(&self) -> bool {
        self.status == QueryStatus::Success
    }
}

struct Entry<V> {
    value: Option<V>,
    error: Option<WeatherError>,
    last_fetched: Option<Instant>,
    invalidated: bool,
    in_flight: Option<watch::Receiver<()>>,
    /// Run that owns `in_flight`
    run: u64,
}

impl<V> Default for Entry<V> {
    fn default() -> Self {
        Self {
            value: None,
            error: None,
            last_fetched: None,
            invalidated: false,
            in_flight: None,
            run: 0,
        }
    }
}

impl<V: Clone> Entry<V> {
    fn status(&self) -> QueryStatus {
        if self.in_flight.is_some() {
            QueryStatus::Loading
        } else if self.error.is_some() {
            QueryStatus::Error
        } else if self.value.is_some() {
            QueryStatus::Success
        } else {
            QueryStatus::Idle
        }
    }

    fn is_fresh(&self, stale_after: Duration) -> bool {
        self.value.is_some()
            && self.error.is_none()
            && !self.invalidated
            && self
                .last_fetched
                .is_some_and(|fetched| fetched.elapsed() < stale_after)
    }

    fn snapshot(&self) -> QueryState<V> {
        QueryState {
            status: self.status(),
            data: self.value.clone(),
            error: self.error.clone(),
            is_fetching: self.in_flight.is_some(),
            last_fetched: self.last_fetched,
        }
    }
}

enum Plan<V> {
    Cached(QueryState<V>),
    Join(watch::Receiver<()>),
    Run(watch::Sender<()>, u64),
}

/// Clears the in-flight marker if the fetch is dropped before it settles.
/// Only the run that installed the marker may clear it. The sender drops
/// after the marker is cleared, which wakes any joiners.
struct InFlight<'a, V: Clone> {
    cache: &'a QueryCache<V>,
    key: &'a QueryKey,
    run: u64,
    _done: watch::Sender<()>,
}

impl<V: Clone> Drop for InFlight<'_, V> {
    fn drop(&mut self) {
        if let Some(entry) = self.cache.entries.lock().get_mut(self.key) {
            if entry.run == self.run {
                entry.in_flight = None;
            }
        }
    }
}

pub struct QueryCache<V> {
    entries: Mutex<HashMap<QueryKey, Entry<V>>>,
    runs: AtomicU64,
    stale_after: Duration,
}

impl<V: Clone> QueryCache<V> {
    pub fn new(stale_after: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            runs: AtomicU64::new(0),
            stale_after,
        }
    }

    pub fn stale_after(&self) -> Duration {
        self.stale_after
    }

    /// Current state for `key`; `Idle` for unknown keys.
    pub fn state(&self, key: &QueryKey) -> QueryState<V> {
        self.entries
            .lock()
            .get(key)
            .map(Entry::snapshot)
            .unwrap_or_default()
    }

    /// Like `state`, with `None` (missing parameters) reading as `Idle`.
    pub fn peek(&self, key: Option<&QueryKey>) -> QueryState<V> {
        key.map(|k| self.state(k)).unwrap_or_default()
    }

    /// Resolve `key`, requesting it through `fetcher` when needed.
    ///
    /// At most one request per key is in flight; a second caller waits for
    /// the first and returns its outcome.
    pub async fn fetch<F, Fut>(
        &self,
        key: &QueryKey,
        policy: &RetryPolicy,
        mode: FetchMode,
        fetcher: F,
    ) -> QueryState<V>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<V, WeatherError>>,
    {
        let plan = {
            let mut entries = self.entries.lock();
            let entry = entries.entry(key.clone()).or_default();
            if let Some(rx) = entry.in_flight.clone() {
                Plan::Join(rx)
            } else if mode == FetchMode::IfStale && entry.is_fresh(self.stale_after) {
                Plan::Cached(entry.snapshot())
            } else {
                let (tx, rx) = watch::channel(());
                entry.in_flight = Some(rx);
                entry.run = self.runs.fetch_add(1, Ordering::Relaxed) + 1;
                Plan::Run(tx, entry.run)
            }
        };

        match plan {
            Plan::Cached(state) => {
                tracing::debug!("Serving {:?} from cache", key);
                state
            }
            Plan::Join(mut rx) => {
                tracing::debug!("Joining in-flight request for {:?}", key);
                // Resolves once the sender is dropped
                let _ = rx.changed().await;
                self.state(key)
            }
            Plan::Run(tx, run) => {
                let guard = InFlight {
                    cache: self,
                    key,
                    run,
                    _done: tx,
                };
                let result = with_retry(policy, fetcher).await;
                let state = self.settle(key, run, result);
                drop(guard);
                state
            }
        }
    }

    /// Store the outcome of `run` and clear its marker under one lock.
    fn settle(&self, key: &QueryKey, run: u64, result: Result<V, WeatherError>) -> QueryState<V> {
        let mut entries = self.entries.lock();
        let entry = entries.entry(key.clone()).or_default();
        if entry.run == run {
            entry.in_flight = None;
        }
        match result {
            Ok(value) => {
                entry.value = Some(value);
                entry.error = None;
                entry.last_fetched = Some(Instant::now());
                entry.invalidated = false;
            }
            Err(e) => {
                tracing::warn!("Query {:?} failed: {}", key, e);
                entry.error = Some(e);
            }
        }
        entry.snapshot()
    }

    /// Mark `key` stale so the next `fetch` requests it again.
    pub fn invalidate(&self, key: &QueryKey) {
        if let Some(entry) = self.entries.lock().get_mut(key) {
            entry.invalidated = true;
        }
    }

    pub fn invalidate_all(&self) {
        for entry in self.entries.lock().values_mut() {
            entry.invalidated = true;
        }
    }

    /// Drop every settled entry.
    pub fn clear(&self) {
        self.entries
            .lock()
            .retain(|_, entry| entry.in_flight.is_some());
    }
}
