//! Recent search queries

use super::store::KeyValueStore;

/// Storage key of the history list
pub const HISTORY_KEY: &str = "blog_search_history";

/// Most-recent-first list of search queries.
///
/// Storage problems never reach the caller: reads fall back to an empty
/// history and writes become no-ops, each with a warning.
pub struct SearchHistory {
    store: Box<dyn KeyValueStore>,
    max_items: usize,
}

impl SearchHistory {
    pub fn new(store: Box<dyn KeyValueStore>, max_items: usize) -> Self {
        Self { store, max_items }
    }

    /// Record a query, moving it to the front if already present
    pub fn save(&self, query: &str) {
        let query = query.trim();
        if query.is_empty() || self.max_items == 0 {
            return;
        }

        let mut history = self.get();
        history.retain(|item| item != query);
        history.insert(0, query.to_string());
        history.truncate(self.max_items);

        let encoded = match serde_json::to_string(&history) {
            Ok(encoded) => encoded,
            Err(e) => {
                tracing::warn!("Failed to encode search history: {}", e);
                return;
            }
        };
        if let Err(e) = self.store.set(HISTORY_KEY, &encoded) {
            tracing::warn!("Failed to save search history: {}", e);
        }
    }

    pub fn get(&self) -> Vec<String> {
        match self.store.get(HISTORY_KEY) {
            Ok(Some(encoded)) => serde_json::from_str(&encoded).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable search history: {}", e);
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to load search history: {}", e);
                Vec::new()
            }
        }
    }

    pub fn clear(&self) {
        if let Err(e) = self.store.remove(HISTORY_KEY) {
            tracing::warn!("Failed to clear search history: {}", e);
        }
    }
}
