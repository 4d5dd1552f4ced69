//! Search input: city text, history suggestions, and device location.

use skycast_core::HistoryStore;
use skycast_weather::Coordinates;

use crate::capabilities::{Geolocator, LocationError, PositionOptions};

/// What the user asked to look up.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchRequest {
    City(String),
    Coords(Coordinates),
}

#[derive(Debug, Clone, Default)]
pub struct SearchBar {
    input: String,
    show_history: bool,
    locating: bool,
}

impl SearchBar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: &str) {
        self.input = text.to_string();
    }

    pub fn show_history(&self) -> bool {
        self.show_history
    }

    pub fn is_locating(&self) -> bool {
        self.locating
    }

    pub fn focus(&mut self) {
        self.show_history = true;
    }

    pub fn blur(&mut self) {
        self.show_history = false;
    }

    /// Submit the current text. Blank input does nothing.
    pub fn submit(&mut self, history: &HistoryStore) -> Option<SearchRequest> {
        let city = self.input.trim();
        if city.is_empty() {
            return None;
        }
        let city = city.to_string();
        history.add_to_history(&city);
        self.show_history = false;
        Some(SearchRequest::City(city))
    }

    /// Pick a history entry; it is not re-added to history.
    pub fn select_history(&mut self, entry: &str) -> SearchRequest {
        self.input = entry.to_string();
        self.show_history = false;
        SearchRequest::City(entry.to_string())
    }

    /// One-shot position request with a 10 second limit.
    pub async fn locate<G>(&mut self, geolocator: &G) -> Result<SearchRequest, LocationError>
    where
        G: Geolocator + ?Sized,
    {
        let options = PositionOptions::default();
        self.locating = true;
        let result =
            tokio::time::timeout(options.timeout, geolocator.current_position(options)).await;
        self.locating = false;

        match result {
            Ok(Ok(coords)) if coords.is_valid() => {
                tracing::info!("Got location: {}, {}", coords.lat, coords.lon);
                Ok(SearchRequest::Coords(coords))
            }
            Ok(Ok(coords)) => {
                tracing::warn!("Geolocator returned invalid position {:?}", coords);
                Err(LocationError::PositionUnavailable)
            }
            Ok(Err(e)) => {
                tracing::warn!("Location request failed: {}", e);
                Err(e)
            }
            Err(_) => {
                tracing::warn!("Location request timed out after {:?}", options.timeout);
                Err(LocationError::Timeout)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use crate::capabilities::testing::MockGeolocator;
    use skycast_core::MemoryStore;
    use std::sync::Arc;
    use std::time::Duration;

    fn history() -> HistoryStore {
        HistoryStore::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_submit_trims_and_records_history() {
        let history = history();
        let mut bar = SearchBar::new();
        bar.focus();
        bar.set_input("  Hanoi ");

        let request = bar.submit(&history);

        assert_eq!(request, Some(SearchRequest::City("Hanoi".into())));
        assert!(!bar.show_history());
        assert_eq!(history.get_history(), vec!["Hanoi".to_string()]);
    }

    #[test]
    fn test_blank_submit_is_ignored() {
        let history = history();
        let mut bar = SearchBar::new();
        bar.focus();
        bar.set_input("   ");

        assert_eq!(bar.submit(&history), None);
        assert!(bar.show_history());
        assert!(history.get_history().is_empty());
    }

    #[test]
    fn test_select_history_does_not_resubmit() {
        let history = history();
        history.add_to_history("Hanoi");
        history.add_to_history("Tokyo");
        let mut bar = SearchBar::new();
        bar.focus();

        let request = bar.select_history("Hanoi");

        assert_eq!(request, SearchRequest::City("Hanoi".into()));
        assert_eq!(bar.input(), "Hanoi");
        assert!(!bar.show_history());
        assert_eq!(history.get_history(), vec!["Tokyo", "Hanoi"]);
    }

    #[tokio::test]
    async fn test_locate_uses_fixed_options() {
        let geo = MockGeolocator::returning(Ok(Coordinates::new(21.0, 105.8)));
        let mut bar = SearchBar::new();

        let request = bar.locate(&geo).await.unwrap();

        assert_eq!(request, SearchRequest::Coords(Coordinates::new(21.0, 105.8)));
        assert!(!bar.is_locating());
        let seen = geo.seen.lock().unwrap();
        assert_eq!(seen.timeout, Duration::from_secs(10));
        assert!(seen.enable_high_accuracy);
    }

    #[tokio::test]
    async fn test_locate_passes_through_errors() {
        let geo = MockGeolocator::returning(Err(LocationError::PermissionDenied));
        let mut bar = SearchBar::new();

        assert_eq!(bar.locate(&geo).await, Err(LocationError::PermissionDenied));
        assert!(!bar.is_locating());
    }

    #[tokio::test(start_paused = true)]
    async fn test_locate_times_out() {
        let mut geo = MockGeolocator::returning(Ok(Coordinates::new(0.0, 0.0)));
        geo.delay = Duration::from_secs(30);
        let mut bar = SearchBar::new();

        assert_eq!(bar.locate(&geo).await, Err(LocationError::Timeout));
    }

    #[tokio::test]
    async fn test_origin_is_a_valid_position() {
        let geo = MockGeolocator::returning(Ok(Coordinates::new(0.0, 0.0)));
        let mut bar = SearchBar::new();

        assert_eq!(
            bar.locate(&geo).await,
            Ok(SearchRequest::Coords(Coordinates::new(0.0, 0.0)))
        );
    }
}
