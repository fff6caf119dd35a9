//! Key/value storage the booking desk reads and writes.
//!
//! Every store behaves like a browser's local storage for one origin: string
//! keys, string values, atomic per key and nothing more. The booking list and
//! room records are JSON documents kept under well-known keys.

use std::future::Future;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

mod memory;
mod sqlite;

pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

pub use crate::db::StoredItem;

pub const ADMIN_FLAG_KEY: &str = "adminLoggedIn";
pub const BOOKINGS_KEY: &str = "bookings";
pub const ROOM_KEY_PREFIX: &str = "room_";

pub fn room_key(room_label: &str) -> String {
    format!("{ROOM_KEY_PREFIX}{room_label}")
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("nothing stored under '{key}'")]
    NotFound { key: String },
    #[error("value stored under '{key}' is not valid JSON: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

pub trait LocalStorage: Clone + Send + Sync + 'static {
    fn get_item(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<String>, StorageError>> + Send;

    fn set_item(
        &self,
        key: &str,
        value: String,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;

    fn remove_item(&self, key: &str) -> impl Future<Output = Result<(), StorageError>> + Send;

    fn items(&self) -> impl Future<Output = Result<Vec<StoredItem>, StorageError>> + Send;
}

pub async fn read_json<S, T>(storage: &S, key: &str) -> Result<T, StorageError>
where
    S: LocalStorage,
    T: DeserializeOwned,
{
    let raw = storage
        .get_item(key)
        .await?
        .ok_or_else(|| StorageError::NotFound {
            key: key.to_string(),
        })?;

    serde_json::from_str(&raw).map_err(|source| StorageError::Corrupt {
        key: key.to_string(),
        source,
    })
}

/// Like [`read_json`] but an absent key yields `T::default()`. A present but
/// unparsable value is still an error.
pub async fn read_json_or_default<S, T>(storage: &S, key: &str) -> Result<T, StorageError>
where
    S: LocalStorage,
    T: DeserializeOwned + Default,
{
    match read_json(storage, key).await {
        Err(StorageError::NotFound { .. }) => Ok(T::default()),
        other => other,
    }
}

pub async fn write_json<S, T>(storage: &S, key: &str, value: &T) -> Result<(), StorageError>
where
    S: LocalStorage,
    T: Serialize + ?Sized,
{
    let serialized = serde_json::to_string(value).map_err(|source| StorageError::Corrupt {
        key: key.to_string(),
        source,
    })?;
    storage.set_item(key, serialized).await
}
