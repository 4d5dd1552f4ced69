//! Search history: newest first, case-insensitively unique, at most ten entries.
//!
//! Storage problems never reach the caller. A missing or unreadable list
//! reads as empty and a failed write is logged and dropped.

use std::sync::Arc;

use crate::storage::KeyValueStore;

pub const SEARCH_HISTORY_KEY: &str = "weatherSearchHistory";
pub const MAX_HISTORY_ITEMS: usize = 10;

#[derive(Clone)]
pub struct HistoryStore {
    store: Arc<dyn KeyValueStore>,
}

impl HistoryStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Read the persisted list, or an empty one if it is missing or corrupt.
    pub fn get_history(&self) -> Vec<String> {
        let raw = match self.store.get(SEARCH_HISTORY_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::error!("Failed to read search history: {}", e);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(history) => history,
            Err(e) => {
                tracing::error!("Failed to parse search history: {}", e);
                Vec::new()
            }
        }
    }

    /// Move `city` to the front, dropping any case-insensitive duplicate.
    pub fn add_to_history(&self, city: &str) {
        let city = city.trim();
        if city.is_empty() {
            return;
        }

        let needle = city.to_lowercase();
        let mut history = self.get_history();
        history.retain(|item| item.to_lowercase() != needle);
        history.insert(0, city.to_string());
        history.truncate(MAX_HISTORY_ITEMS);

        let json = match serde_json::to_string(&history) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Failed to serialize search history: {}", e);
                return;
            }
        };

        if let Err(e) = self.store.set(SEARCH_HISTORY_KEY, &json) {
            tracing::error!("Failed to save search history: {}", e);
        }
    }

    pub fn clear_history(&self) {
        if let Err(e) = self.store.remove(SEARCH_HISTORY_KEY) {
            tracing::error!("Failed to clear search history: {}", e);
        }
    }
}
