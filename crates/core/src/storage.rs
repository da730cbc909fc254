//! Persistent key-value storage seam.
//!
//! The durable medium (browser localStorage, a file, an OS keyring) is
//! deliberately out of scope; the console only needs string values under
//! fixed keys that survive process restarts.

use crate::error::StorageError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

/// Durable string storage keyed by fixed names.
///
/// `set_many` / `remove_many` take the whole batch so an implementation can
/// make the group visible together; the session layer relies on the three
/// session keys never being observed half-written.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn set_many(&self, entries: &[(&'static str, String)]) -> Result<(), StorageError>;

    async fn remove_many(&self, keys: &[&'static str]) -> Result<(), StorageError>;
}

/// Process-local store. Default backing for embedding and tests.
#[derive(Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let values = self
            .values
            .read()
            .map_err(|_| StorageError::io("storage lock poisoned"))?;
        Ok(values.get(key).cloned())
    }

    async fn set_many(&self, entries: &[(&'static str, String)]) -> Result<(), StorageError> {
        let mut values = self
            .values
            .write()
            .map_err(|_| StorageError::io("storage lock poisoned"))?;
        for (key, value) in entries {
            values.insert((*key).to_string(), value.clone());
        }
        Ok(())
    }

    async fn remove_many(&self, keys: &[&'static str]) -> Result<(), StorageError> {
        let mut values = self
            .values
            .write()
            .map_err(|_| StorageError::io("storage lock poisoned"))?;
        for key in keys {
            values.remove(*key);
        }
        Ok(())
    }
}
