//! Persistent key-value substrate
//!
//! The history is kept the way a browser keeps `localStorage`: string keys
//! mapping to string values. Here the substrate is an embedded redb database
//! with a single table, so every write is one committed transaction and a
//! reader never sees a half-written value.

use redb::backends::InMemoryBackend;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use std::sync::Arc;

use crate::error::StorageError;

/// Table holding every persisted key
///
/// Key: storage key (e.g. "utmHistory")
/// Value: raw string value, JSON for structured data
///
/// Example:
/// - Key: "utmHistory"
/// - Value: '[{"url":"https://example.com/?utm_source=google",...}]'
pub const TABLE_STORAGE: TableDefinition<&str, &str> = TableDefinition::new("local_storage_v1");

/// Path value that selects a non-persistent, in-memory database
pub const IN_MEMORY: &str = ":memory:";

/// String-valued key-value store
///
/// Implementations must make each `set_item` / `remove_item` atomic.
pub trait KeyValueStore: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// redb-backed [`KeyValueStore`]
#[derive(Clone)]
pub struct RedbStore {
    db: Arc<Database>,
}

impl RedbStore {
    pub fn new(db: Database) -> Self {
        Self { db: Arc::new(db) }
    }
}

impl KeyValueStore for RedbStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let read = || -> Result<Option<String>, redb::Error> {
            let read_txn = self.db.begin_read()?;
            let table = read_txn.open_table(TABLE_STORAGE)?;
            let value = table.get(key)?.map(|guard| guard.value().to_string());
            Ok(value)
        };
        Ok(read()?)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let write = || -> Result<(), redb::Error> {
            let write_txn = self.db.begin_write()?;
            {
                let mut table = write_txn.open_table(TABLE_STORAGE)?;
                table.insert(key, value)?;
            }
            write_txn.commit()?;
            Ok(())
        };
        Ok(write()?)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let remove = || -> Result<(), redb::Error> {
            let write_txn = self.db.begin_write()?;
            {
                let mut table = write_txn.open_table(TABLE_STORAGE)?;
                table.remove(key)?;
            }
            write_txn.commit()?;
            Ok(())
        };
        Ok(remove()?)
    }
}

/// Opens (or creates) the database and makes sure the storage table exists
///
/// Passing [`IN_MEMORY`] as the path gives a database that lives only as long
/// as the returned store.
///
/// # Example
///
/// ```no_run
/// # use utm_builder::storage::init_store;
/// let store = init_store("utm.db").expect("Failed to initialize storage");
/// ```
pub fn init_store(db_path: &str) -> Result<RedbStore, StorageError> {
    let db = if db_path == IN_MEMORY {
        Database::builder()
            .create_with_backend(InMemoryBackend::new())
            .map_err(redb::Error::from)?
    } else {
        Database::create(db_path).map_err(redb::Error::from)?
    };

    let create_table = || -> Result<(), redb::Error> {
        let write_txn = db.begin_write()?;
        write_txn.open_table(TABLE_STORAGE)?;
        write_txn.commit()?;
        Ok(())
    };
    create_table()?;

    Ok(RedbStore::new(db))
}
