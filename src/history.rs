//! Bounded history of generated URLs
//!
//! The list is newest-first, never longer than [`HISTORY_LIMIT`], and written
//! back to storage as one JSON blob after every mutation. Storage problems are
//! logged and otherwise ignored; the in-memory list stays authoritative for
//! the rest of the session.

use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, warn};
use url::Url;

use crate::error::StorageError;
use crate::model::{HistoryEntry, UtmFields};
use crate::storage::KeyValueStore;

/// Storage key for the persisted list
pub const HISTORY_KEY: &str = "utmHistory";

/// Maximum number of retained entries
pub const HISTORY_LIMIT: usize = 10;

/// Shown in place of a tracking value the URL does not carry
pub const PLACEHOLDER: &str = "-";

pub struct HistoryStore {
    store: Arc<dyn KeyValueStore>,
    entries: Vec<HistoryEntry>,
}

impl HistoryStore {
    /// Creates a store over `store` and rehydrates it from the persisted list
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let entries = read_entries(store.as_ref());
        Self { store, entries }
    }

    /// Newest-first snapshot
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Prepends `url`, evicting whatever falls past the limit
    ///
    /// Empty or unparsable URLs are ignored.
    pub fn record(&mut self, url: &str) -> Option<&HistoryEntry> {
        if url.is_empty() {
            return None;
        }

        let parsed = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(url, error = %e, "not recording unparsable URL");
                return None;
            }
        };

        let entry = HistoryEntry {
            url: url.to_string(),
            domain: parsed.host_str().unwrap_or_default().to_string(),
            source: query_value(&parsed, "utm_source").unwrap_or_else(|| PLACEHOLDER.to_string()),
            medium: query_value(&parsed, "utm_medium").unwrap_or_else(|| PLACEHOLDER.to_string()),
            campaign: query_value(&parsed, "utm_campaign")
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
            timestamp: self.next_timestamp(),
        };

        info!(url, timestamp = entry.timestamp, "recording URL in history");

        self.entries.insert(0, entry);
        self.entries.truncate(HISTORY_LIMIT);
        self.persist();

        self.entries.first()
    }

    /// Removes the entry at `index` (0 = newest); out of range does nothing
    pub fn remove_at(&mut self, index: usize) {
        if index >= self.entries.len() {
            return;
        }

        let removed = self.entries.remove(index);
        info!(index, timestamp = removed.timestamp, "removed history entry");
        self.persist();
    }

    /// Drops every entry and deletes the persisted list
    pub fn clear(&mut self) {
        self.entries.clear();
        if let Err(e) = self.store.remove_item(HISTORY_KEY) {
            error!(error = %e, "failed to clear persisted history");
        }
        info!("history cleared");
    }

    // Unix milliseconds, bumped past the newest entry so keys stay unique
    fn next_timestamp(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        match self.entries.first() {
            Some(newest) if newest.timestamp >= now => newest.timestamp + 1,
            _ => now,
        }
    }

    fn persist(&self) {
        if let Err(e) = write_entries(self.store.as_ref(), &self.entries) {
            error!(error = %e, "failed to persist history");
        }
    }
}

/// Recovers the composer inputs that produced `entry`
///
/// Re-parses the stored URL rather than trusting the display fields, so
/// `utm_content` and `utm_term` come back too. The base address is rebuilt
/// from scheme, host and path only.
pub fn apply_to_composer(entry: &HistoryEntry) -> Option<UtmFields> {
    let url = match Url::parse(&entry.url) {
        Ok(url) => url,
        Err(e) => {
            warn!(url = %entry.url, error = %e, "cannot restore fields from history entry");
            return None;
        }
    };

    let lookup = |key: &str| query_value(&url, key).unwrap_or_default();

    Some(UtmFields {
        website_url: format!(
            "{}://{}{}",
            url.scheme(),
            url.host_str().unwrap_or_default(),
            url.path()
        ),
        utm_source: lookup("utm_source"),
        utm_medium: lookup("utm_medium"),
        utm_campaign: lookup("utm_campaign"),
        utm_content: lookup("utm_content"),
        utm_term: lookup("utm_term"),
    })
}

// First non-empty decoded value for `key`
fn query_value(url: &Url, key: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty())
}

fn read_entries(store: &dyn KeyValueStore) -> Vec<HistoryEntry> {
    let raw = match store.get_item(HISTORY_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!(error = %e, "failed to read persisted history, starting empty");
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<HistoryEntry>>(&raw) {
        Ok(mut entries) => {
            entries.truncate(HISTORY_LIMIT);
            entries
        }
        Err(e) => {
            warn!(error = %e, "discarding corrupt persisted history");
            Vec::new()
        }
    }
}

fn write_entries(store: &dyn KeyValueStore, entries: &[HistoryEntry]) -> Result<(), StorageError> {
    let json = serde_json::to_string(entries)?;
    store.set_item(HISTORY_KEY, &json)
}
