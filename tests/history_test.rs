//! Integration tests for the persisted history
//!
//! These run the history store against a real redb file to cover:
//! - Eviction and ordering
//! - Rehydration and corruption recovery
//! - Restoring composer fields from an entry

use std::collections::BTreeSet;
use std::sync::Arc;
use tempfile::NamedTempFile;
use url::Url;

use utm_builder::composer::compose;
use utm_builder::error::StorageError;
use utm_builder::history::{apply_to_composer, HistoryStore, HISTORY_KEY, HISTORY_LIMIT};
use utm_builder::model::{HistoryEntry, UtmFields};
use utm_builder::storage::{init_store, KeyValueStore, RedbStore};

/// Helper function to create a store backed by a temporary database file
fn setup_store() -> (Arc<RedbStore>, NamedTempFile) {
    let temp_db = NamedTempFile::new().expect("Failed to create temp file");
    let store = init_store(temp_db.path().to_str().unwrap())
        .expect("Failed to initialize test storage");
    (Arc::new(store), temp_db)
}

/// Store whose writes always fail, reads see nothing
struct BrokenStore;

impl KeyValueStore for BrokenStore {
    fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    fn set_item(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(serde_json::from_str::<()>("!").unwrap_err().into())
    }

    fn remove_item(&self, _key: &str) -> Result<(), StorageError> {
        Err(serde_json::from_str::<()>("!").unwrap_err().into())
    }
}

fn query_set(url: &str) -> BTreeSet<(String, String)> {
    Url::parse(url)
        .unwrap()
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

#[test]
fn test_starts_empty_without_persisted_state() {
    let (store, _temp_db) = setup_store();
    let history = HistoryStore::load(store);
    assert!(history.is_empty());
}

#[test]
fn test_record_decomposes_url() {
    let (store, _temp_db) = setup_store();
    let mut history = HistoryStore::load(store);

    let entry = history
        .record("https://shop.example.com:8443/sale?utm_source=google&utm_medium=cpc+ads")
        .cloned()
        .unwrap();

    assert_eq!(entry.domain, "shop.example.com");
    assert_eq!(entry.source, "google");
    assert_eq!(entry.medium, "cpc ads");
    assert_eq!(entry.campaign, "-");
    assert!(entry.timestamp > 0);
}

#[test]
fn test_empty_value_uses_placeholder() {
    let (store, _temp_db) = setup_store();
    let mut history = HistoryStore::load(store);

    let entry = history
        .record("https://example.com/?utm_source=&utm_campaign=x")
        .cloned()
        .unwrap();
    assert_eq!(entry.source, "-");
    assert_eq!(entry.medium, "-");
    assert_eq!(entry.campaign, "x");
}

#[test]
fn test_record_ignores_empty_and_unparsable() {
    let (store, _temp_db) = setup_store();
    let mut history = HistoryStore::load(store.clone());

    assert!(history.record("").is_none());
    assert!(history.record("not a url").is_none());
    assert!(history.is_empty());
    assert_eq!(store.get_item(HISTORY_KEY).unwrap(), None);
}

#[test]
fn test_keeps_ten_newest_first() {
    let (store, _temp_db) = setup_store();
    let mut history = HistoryStore::load(store.clone());

    for i in 0..11 {
        history.record(&format!("https://example.com/{}?utm_source=s{}", i, i));
    }

    assert_eq!(history.len(), HISTORY_LIMIT);
    let sources: Vec<&str> = history.entries().iter().map(|e| e.source.as_str()).collect();
    assert_eq!(
        sources,
        vec!["s10", "s9", "s8", "s7", "s6", "s5", "s4", "s3", "s2", "s1"]
    );

    // Timestamps are unique keys, newest first
    for pair in history.entries().windows(2) {
        assert!(pair[0].timestamp > pair[1].timestamp);
    }

    let persisted: Vec<HistoryEntry> =
        serde_json::from_str(&store.get_item(HISTORY_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(persisted, history.entries());
}

#[test]
fn test_reload_from_same_database() {
    let (store, _temp_db) = setup_store();
    {
        let mut history = HistoryStore::load(store.clone());
        history.record("https://example.com/a?utm_source=first");
        history.record("https://example.com/b?utm_source=second");
    }

    let reloaded = HistoryStore::load(store);
    assert_eq!(reloaded.len(), 2);
    assert_eq!(reloaded.entries()[0].source, "second");
    assert_eq!(reloaded.entries()[1].source, "first");
}

#[test]
fn test_reload_after_reopening_file() {
    let temp_db = NamedTempFile::new().unwrap();
    let path = temp_db.path().to_str().unwrap().to_string();

    {
        let store = Arc::new(init_store(&path).unwrap());
        let mut history = HistoryStore::load(store);
        history.record("https://example.com/?utm_campaign=persisted");
    }

    let store = Arc::new(init_store(&path).unwrap());
    let history = HistoryStore::load(store);
    assert_eq!(history.len(), 1);
    assert_eq!(history.entries()[0].campaign, "persisted");
}

#[test]
fn test_persisted_layout_uses_expected_keys() {
    let (store, _temp_db) = setup_store();
    let mut history = HistoryStore::load(store.clone());
    history.record("https://example.com/?utm_source=google");

    let raw: serde_json::Value =
        serde_json::from_str(&store.get_item(HISTORY_KEY).unwrap().unwrap()).unwrap();
    let entry = &raw[0];
    for key in ["url", "domain", "source", "medium", "campaign", "timestamp"] {
        assert!(entry.get(key).is_some(), "missing key {}", key);
    }
    assert!(entry["timestamp"].is_i64());
}

#[test]
fn test_corrupt_state_starts_empty() {
    let (store, _temp_db) = setup_store();
    store.set_item(HISTORY_KEY, "{not json").unwrap();

    let mut history = HistoryStore::load(store.clone());
    assert!(history.is_empty());

    // The next mutation overwrites the corrupt blob
    history.record("https://example.com/");
    assert_eq!(HistoryStore::load(store).len(), 1);
}

#[test]
fn test_overlong_persisted_list_is_truncated() {
    let (store, _temp_db) = setup_store();
    let entries: Vec<HistoryEntry> = (0..15)
        .map(|i| HistoryEntry {
            url: format!("https://example.com/{}", i),
            domain: "example.com".to_string(),
            source: "-".to_string(),
            medium: "-".to_string(),
            campaign: "-".to_string(),
            timestamp: 1_000 - i,
        })
        .collect();
    store
        .set_item(HISTORY_KEY, &serde_json::to_string(&entries).unwrap())
        .unwrap();

    let history = HistoryStore::load(store);
    assert_eq!(history.len(), HISTORY_LIMIT);
    assert_eq!(history.entries()[0].url, "https://example.com/0");
}

#[test]
fn test_remove_at() {
    let (store, _temp_db) = setup_store();
    let mut history = HistoryStore::load(store.clone());

    // Empty list and out of range are no-ops
    history.remove_at(0);
    history.record("https://example.com/?utm_source=a");
    history.record("https://example.com/?utm_source=b");
    history.record("https://example.com/?utm_source=c");
    history.remove_at(3);
    history.remove_at(usize::MAX);
    assert_eq!(history.len(), 3);

    history.remove_at(1);
    let sources: Vec<&str> = history.entries().iter().map(|e| e.source.as_str()).collect();
    assert_eq!(sources, vec!["c", "a"]);

    assert_eq!(HistoryStore::load(store).entries(), history.entries());
}

#[test]
fn test_clear_then_load_is_empty() {
    let (store, _temp_db) = setup_store();
    let mut history = HistoryStore::load(store.clone());
    history.record("https://example.com/?utm_source=a");

    history.clear();
    assert!(history.is_empty());
    assert_eq!(store.get_item(HISTORY_KEY).unwrap(), None);
    assert!(HistoryStore::load(store).is_empty());
}

#[test]
fn test_theme_key_is_left_alone() {
    let (store, _temp_db) = setup_store();
    store.set_item("theme", "dark").unwrap();

    let mut history = HistoryStore::load(store.clone());
    history.record("https://example.com/?utm_source=a");
    history.clear();

    assert_eq!(store.get_item("theme").unwrap().as_deref(), Some("dark"));
}

#[test]
fn test_storage_failures_are_not_fatal() {
    let mut history = HistoryStore::load(Arc::new(BrokenStore));

    history.record("https://example.com/?utm_source=a");
    history.record("https://example.com/?utm_source=b");
    assert_eq!(history.len(), 2);

    history.remove_at(0);
    assert_eq!(history.len(), 1);

    history.clear();
    assert!(history.is_empty());
}

#[test]
fn test_apply_to_composer_recovers_every_field() {
    let (store, _temp_db) = setup_store();
    let mut history = HistoryStore::load(store);

    let original = UtmFields {
        website_url: "https://example.com/landing/page".to_string(),
        utm_source: "instagram-feed".to_string(),
        utm_medium: "social".to_string(),
        utm_campaign: "launch_2024".to_string(),
        utm_content: "hero-banner".to_string(),
        utm_term: "running shoes".to_string(),
    };
    let url = compose(&original);
    let entry = history.record(&url).cloned().unwrap();

    let restored = apply_to_composer(&entry).unwrap();
    assert_eq!(restored, original);
}

#[test]
fn test_apply_to_composer_round_trip_is_equivalent() {
    let entry = HistoryEntry {
        url: "https://example.com/path/?ref=x&utm_source=google&utm_term=a%20b".to_string(),
        domain: "example.com".to_string(),
        source: "google".to_string(),
        medium: "-".to_string(),
        campaign: "-".to_string(),
        timestamp: 1,
    };

    let restored = apply_to_composer(&entry).unwrap();
    assert_eq!(restored.website_url, "https://example.com/path/");
    assert_eq!(restored.utm_source, "google");
    assert_eq!(restored.utm_medium, "");
    assert_eq!(restored.utm_term, "a b");

    let recomposed = compose(&restored);
    let recomposed_url = Url::parse(&recomposed).unwrap();
    let original_url = Url::parse(&entry.url).unwrap();
    assert_eq!(recomposed_url.host_str(), original_url.host_str());
    assert_eq!(recomposed_url.path(), original_url.path());

    // Non-tracking parameters are stripped with the query string
    let mut expected = query_set(&entry.url);
    expected.remove(&("ref".to_string(), "x".to_string()));
    assert_eq!(query_set(&recomposed), expected);
}

#[test]
fn test_apply_to_composer_unparsable_entry() {
    let entry = HistoryEntry {
        url: "garbage".to_string(),
        domain: String::new(),
        source: "-".to_string(),
        medium: "-".to_string(),
        campaign: "-".to_string(),
        timestamp: 1,
    };
    assert!(apply_to_composer(&entry).is_none());
}
