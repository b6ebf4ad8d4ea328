//! Persisted filter selection, restored when the country list reopens.

use std::sync::Arc;

use tracing::warn;

use crate::error::StorageError;
use crate::filter::{Criteria, LanguageFilter, RegionFilter};
use crate::storage::KeyValueStore;

const SEARCH_KEY: &str = "filters.search";
const REGION_KEY: &str = "filters.region";
const LANGUAGE_KEY: &str = "filters.language";

/// The last search, region and language chosen, one key each.
#[derive(Debug)]
pub struct FilterPreferences<S: ?Sized> {
    store: Arc<S>,
}

impl<S: KeyValueStore + ?Sized> FilterPreferences<S> {
    /// Wraps a shared store.
    #[must_use]
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// The saved criteria. Each value falls back to "no filter" on its own
    /// when missing or unreadable.
    #[must_use]
    pub fn load(&self) -> Criteria {
        Criteria {
            search: self.read(SEARCH_KEY).unwrap_or_default(),
            region: self
                .read(REGION_KEY)
                .map_or(RegionFilter::All, |value| RegionFilter::parse(&value)),
            language: self
                .read(LANGUAGE_KEY)
                .map_or(LanguageFilter::All, |value| LanguageFilter::parse(&value)),
        }
    }

    /// Saves the search text.
    pub fn save_search(&self, search: &str) -> Result<(), StorageError> {
        self.store.set(SEARCH_KEY, search)
    }

    /// Saves the region selection.
    pub fn save_region(&self, region: RegionFilter) -> Result<(), StorageError> {
        self.store.set(REGION_KEY, region.as_str())
    }

    /// Saves the language selection.
    pub fn save_language(&self, language: &LanguageFilter) -> Result<(), StorageError> {
        self.store.set(LANGUAGE_KEY, language.as_str())
    }

    fn read(&self, key: &str) -> Option<String> {
        self.store.get(key).unwrap_or_else(|error| {
            warn!(key, %error, "filter preference unreadable");
            None
        })
    }
}
