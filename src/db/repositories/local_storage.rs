use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};
use serde::Serialize;

use crate::db::{
    helpers::{format_datetime, parse_datetime},
    Database,
};

/// One key as seen by the storage inspector.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredItem {
    pub key: String,
    pub size_bytes: usize,
    pub updated_at: DateTime<Utc>,
}

fn row_to_item(row: &Row) -> Result<StoredItem> {
    let value: String = row.get("value")?;
    let updated_at: String = row.get("updated_at")?;

    Ok(StoredItem {
        key: row.get("key")?,
        size_bytes: value.len(),
        updated_at: parse_datetime(&updated_at, "updated_at")?,
    })
}

impl Database {
    pub async fn get_item(&self, key: &str) -> Result<Option<String>> {
        let key = key.to_string();
        self.execute(move |conn| {
            conn.query_row(
                "SELECT value FROM local_storage WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .with_context(|| format!("failed to read key {key}"))
        })
        .await
    }

    /// Insert or replace a single key. One statement, so the write is atomic
    /// for that key only.
    pub async fn set_item(&self, key: &str, value: String) -> Result<()> {
        let key = key.to_string();
        self.execute(move |conn| {
            let now = Utc::now();
            conn.execute(
                "INSERT INTO local_storage (key, value, updated_at)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, value, format_datetime(&now)],
            )
            .with_context(|| format!("failed to write key {key}"))?;
            Ok(())
        })
        .await
    }

    pub async fn remove_item(&self, key: &str) -> Result<()> {
        let key = key.to_string();
        self.execute(move |conn| {
            conn.execute("DELETE FROM local_storage WHERE key = ?1", params![key])
                .with_context(|| format!("failed to remove key {key}"))?;
            Ok(())
        })
        .await
    }

    pub async fn list_items(&self) -> Result<Vec<StoredItem>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(
                "SELECT key, value, updated_at
                 FROM local_storage
                 ORDER BY key ASC",
            )?;

            let mut rows = stmt.query([])?;
            let mut items = Vec::new();
            while let Some(row) = rows.next()? {
                items.push(row_to_item(row)?);
            }

            Ok(items)
        })
        .await
    }
}
