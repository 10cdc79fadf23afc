//! Search module - tag filtering, query matching and search history

mod engine;
mod history;
pub mod store;

pub use engine::{FilterCommand, FilterEngine, SearchStats, TagCount, TagFilter, ALL_TAGS};
pub use history::{SearchHistory, HISTORY_KEY};
pub use store::{DisabledStore, FileStore, KeyValueStore, MemoryStore, StoreError};
