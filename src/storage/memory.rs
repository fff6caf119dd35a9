use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, MutexGuard},
};

use chrono::{DateTime, Utc};

use super::{LocalStorage, StorageError, StoredItem};

/// Tab-private store. Nothing survives the last clone being dropped.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<BTreeMap<String, (String, DateTime<Utc>)>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, (String, DateTime<Utc>)>> {
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl LocalStorage for MemoryStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock().get(key).map(|(value, _)| value.clone()))
    }

    async fn set_item(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.lock().insert(key.to_string(), (value, Utc::now()));
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.lock().remove(key);
        Ok(())
    }

    async fn items(&self) -> Result<Vec<StoredItem>, StorageError> {
        Ok(self
            .lock()
            .iter()
            .map(|(key, (value, updated_at))| StoredItem {
                key: key.clone(),
                size_bytes: value.len(),
                updated_at: *updated_at,
            })
            .collect())
    }
}
