//! [`SqliteStore`] — the SQLite implementation of [`KvStore`].

use std::path::Path;

use dashkv_core::{Query, StoreError, store::KvStore};
use rusqlite::OptionalExtension as _;

use crate::{Error, Result, schema::SCHEMA};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A key-value store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run one statement and return the number of rows it changed.
  async fn execute(
    &self,
    sql: &'static str,
    key: String,
    value: Option<String>,
  ) -> Result<usize> {
    let changed = self
      .conn
      .call(move |conn| {
        let n = match value {
          Some(v) => conn.execute(sql, rusqlite::params![key, v])?,
          None => conn.execute(sql, rusqlite::params![key])?,
        };
        Ok(n)
      })
      .await?;
    Ok(changed)
  }
}

// ─── KvStore impl ────────────────────────────────────────────────────────────

impl KvStore for SqliteStore {
  async fn put_if_absent(
    &self,
    key: &str,
    value: String,
  ) -> Result<(), StoreError> {
    let changed = self
      .execute(
        "INSERT INTO kv (key, value) VALUES (?1, ?2) ON CONFLICT (key) DO NOTHING",
        key.to_owned(),
        Some(value),
      )
      .await?;

    if changed == 0 {
      return Err(StoreError::Conflict(key.to_owned()));
    }
    tracing::trace!(key, "inserted");
    Ok(())
  }

  async fn put(&self, key: &str, value: String) -> Result<(), StoreError> {
    self
      .execute(
        "INSERT INTO kv (key, value) VALUES (?1, ?2)
         ON CONFLICT (key) DO UPDATE SET value = excluded.value",
        key.to_owned(),
        Some(value),
      )
      .await?;
    tracing::trace!(key, "upserted");
    Ok(())
  }

  async fn delete(&self, key: &str) -> Result<(), StoreError> {
    let changed = self
      .execute("DELETE FROM kv WHERE key = ?1", key.to_owned(), None)
      .await?;

    if changed == 0 {
      return Err(StoreError::NotFound(key.to_owned()));
    }
    tracing::trace!(key, "deleted");
    Ok(())
  }

  async fn get(&self, key: &str) -> Result<String, StoreError> {
    let key_str = key.to_owned();

    let value: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT value FROM kv WHERE key = ?1",
            rusqlite::params![key_str],
            |row| row.get(0),
          )
          .optional()?)
      })
      .await
      .map_err(Error::from)?;

    value.ok_or_else(|| StoreError::NotFound(key.to_owned()))
  }

  async fn query(&self, query: &Query) -> Result<Vec<String>, StoreError> {
    let prefix = query.key_prefix();

    let values: Vec<String> = self
      .conn
      .call(move |conn| {
        // Compare the leading slice instead of LIKE so that '_' and '%' in
        // names are matched literally.
        let mut stmt = conn.prepare(
          "SELECT value FROM kv
           WHERE substr(key, 1, length(?1)) = ?1
           ORDER BY key",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![prefix], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(Error::from)?;

    Ok(values)
  }
}
