use std::path::Path;

use anyhow::{bail, Result};
use log::info;

use crate::db::Database;

use super::{LocalStorage, StorageError, StoredItem};

/// Durable store for one profile, kept at `<data_dir>/<profile>.sqlite3`.
#[derive(Clone)]
pub struct SqliteStorage {
    db: Database,
}

impl SqliteStorage {
    pub fn open(data_dir: &Path, profile: &str) -> Result<Self> {
        if profile.is_empty()
            || !profile
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            bail!("invalid profile name '{profile}' (use letters, digits, '-' or '_')");
        }

        let path = data_dir.join(format!("{profile}.sqlite3"));
        let db = Database::new(path)?;
        info!("Opened storage profile '{profile}' at {}", db.path().display());
        Ok(Self { db })
    }

    pub fn from_database(db: Database) -> Self {
        Self { db }
    }
}

impl LocalStorage for SqliteStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.db.get_item(key).await?)
    }

    async fn set_item(&self, key: &str, value: String) -> Result<(), StorageError> {
        Ok(self.db.set_item(key, value).await?)
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        Ok(self.db.remove_item(key).await?)
    }

    async fn items(&self) -> Result<Vec<StoredItem>, StorageError> {
        Ok(self.db.list_items().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{read_json, write_json, BOOKINGS_KEY};

    #[tokio::test]
    async fn json_documents_survive_the_sqlite_store() {
        let storage = SqliteStorage::from_database(Database::in_memory().unwrap());
        write_json(&storage, BOOKINGS_KEY, &vec!["BK1".to_string()])
            .await
            .unwrap();

        let ids: Vec<String> = read_json(&storage, BOOKINGS_KEY).await.unwrap();
        assert_eq!(ids, vec!["BK1".to_string()]);
    }

    #[test]
    fn profile_names_are_restricted() {
        let dir = std::env::temp_dir();
        assert!(SqliteStorage::open(&dir, "../escape").is_err());
        assert!(SqliteStorage::open(&dir, "").is_err());
    }
}
