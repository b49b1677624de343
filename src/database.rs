//! Key-value storage for link records
//!
//! The request handlers only rely on the [`KvStore`] contract: string keys
//! (slugs) mapped to opaque string values (JSON-encoded records). The
//! production backend is an embedded redb database.

use std::sync::Arc;

use async_trait::async_trait;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};

use crate::config::Config;
use crate::error::StoreError;
use crate::render::Pages;

/// Table holding every link
///
/// Key: slug as string
/// Value: JSON-serialized LinkRecord as string
///
/// Example:
/// - Key: "docs"
/// - Value: '{"url":"https://example.com","interstitial":false,"visits":3,"updatedAt":1705501234567}'
pub const TABLE_LINKS: TableDefinition<&str, &str> = TableDefinition::new("links_v1");

/// Minimal key-value contract required by the router
#[async_trait]
pub trait KvStore: Send + Sync + 'static {
    /// Returns the stored value, or `None` if the key does not exist
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Inserts or replaces the value stored under `key`
    async fn put(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removes `key`. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// Returns every stored key
    async fn list(&self) -> Result<Vec<String>, StoreError>;
}

/// [`KvStore`] backed by an embedded redb file
pub struct RedbStore {
    db: Database,
}

impl RedbStore {
    pub fn new(db: Database) -> Self {
        RedbStore { db }
    }

    fn read(&self, key: &str) -> Result<Option<String>, redb::Error> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TABLE_LINKS)?;
        let value = table.get(key)?.map(|guard| guard.value().to_string());
        Ok(value)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), redb::Error> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(TABLE_LINKS)?;
            table.insert(key, value)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), redb::Error> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(TABLE_LINKS)?;
            table.remove(key)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, redb::Error> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TABLE_LINKS)?;

        let mut keys = Vec::new();
        for entry in table.iter()? {
            let (key, _) = entry?;
            keys.push(key.value().to_string());
        }
        Ok(keys)
    }
}

#[async_trait]
impl KvStore for RedbStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read(key)?)
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        Ok(self.write(key, value)?)
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        Ok(self.remove(key)?)
    }

    async fn list(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.keys()?)
    }
}

/// Application state shared across all request handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn KvStore>,
    pub config: Arc<Config>,
    pub pages: Arc<Pages>,
}

impl AppState {
    /// Bundles the store and configuration with freshly compiled page templates
    pub fn new(store: Arc<dyn KvStore>, config: Config) -> Result<Self, handlebars::TemplateError> {
        Ok(AppState {
            store,
            config: Arc::new(config),
            pages: Arc::new(Pages::new()?),
        })
    }
}

/// Initializes the embedded database and creates the links table
///
/// # Arguments
///
/// * `db_path` - File path where the database should be stored (e.g., "data.db")
///
/// # Example
///
/// ```no_run
/// # use edgelink::database::init_db;
/// let db = init_db("data.db").expect("Failed to initialize database");
/// ```
pub fn init_db(db_path: &str) -> Result<Database, redb::Error> {
    let db = Database::create(db_path)?;

    // Opening the table inside a write transaction creates it on first run
    let write_txn = db.begin_write()?;
    {
        write_txn.open_table(TABLE_LINKS)?;
    }
    write_txn.commit()?;

    Ok(db)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn temp_store() -> (RedbStore, NamedTempFile) {
        let temp_db = NamedTempFile::new().expect("Failed to create temp file");
        let db = init_db(temp_db.path().to_str().unwrap()).expect("Failed to init db");
        (RedbStore::new(db), temp_db)
    }

    #[tokio::test]
    async fn put_get_delete() {
        let (store, _temp_db) = temp_store();

        assert!(store.get("abc").await.unwrap().is_none());

        store.put("abc", "{\"url\":\"https://a.com\"}").await.unwrap();
        assert_eq!(
            store.get("abc").await.unwrap().as_deref(),
            Some("{\"url\":\"https://a.com\"}")
        );

        store.delete("abc").await.unwrap();
        assert!(store.get("abc").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_missing_key_is_ok() {
        let (store, _temp_db) = temp_store();
        assert!(store.delete("never-created").await.is_ok());
    }

    #[tokio::test]
    async fn list_returns_keys_in_order() {
        let (store, _temp_db) = temp_store();
        store.put("b", "1").await.unwrap();
        store.put("a", "2").await.unwrap();
        store.put("c", "3").await.unwrap();

        assert_eq!(store.list().await.unwrap(), vec!["a", "b", "c"]);
    }
}
