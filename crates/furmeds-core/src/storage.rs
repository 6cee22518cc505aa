//! Persistent key-value storage using redb.
//!
//! Holds the small amount of device-local state the app keeps between
//! runs: the signed-in session, the language and the theme.

use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;
use redb::{Database, TableDefinition};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::FurMedsError;

/// Settings table (key: setting name, value: JSON)
const SETTINGS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("settings");

/// Storage layer using redb for ACID-compliant persistence
#[derive(Clone)]
pub struct Storage {
    db: Arc<RwLock<Database>>,
}

impl Storage {
    /// Create a new storage instance at the given path.
    ///
    /// Creates the parent directory and the settings table if needed.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, FurMedsError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::create(path)?;

        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(SETTINGS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self {
            db: Arc::new(RwLock::new(db)),
        })
    }

    /// Store `value` under `key`, overwriting any previous value.
    pub fn put<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), FurMedsError> {
        let data =
            serde_json::to_vec(value).map_err(|e| FurMedsError::Serialization(e.to_string()))?;

        let db = self.db.read();
        let write_txn = db.begin_write()?;
        {
            let mut table = write_txn.open_table(SETTINGS_TABLE)?;
            table.insert(key, data.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Load the value stored under `key`.
    ///
    /// Returns `None` if nothing was stored.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, FurMedsError> {
        let db = self.db.read();
        let read_txn = db.begin_read()?;
        let table = read_txn.open_table(SETTINGS_TABLE)?;

        match table.get(key)? {
            Some(v) => {
                let value = serde_json::from_slice(v.value())
                    .map_err(|e| FurMedsError::Serialization(e.to_string()))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Remove `key`. Returns `Ok(())` even if it was never stored.
    pub fn remove(&self, key: &str) -> Result<(), FurMedsError> {
        let db = self.db.read();
        let write_txn = db.begin_write()?;
        {
            let mut table = write_txn.open_table(SETTINGS_TABLE)?;
            table.remove(key)?;
        }
        write_txn.commit()?;
        Ok(())
    }
}
