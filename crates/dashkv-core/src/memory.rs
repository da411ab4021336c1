//! In-process key-value store, used by tests and for throwaway sessions.

use std::{
  collections::{BTreeMap, btree_map::Entry},
  sync::{PoisonError, RwLock},
};

use crate::{Query, StoreError, store::KvStore};

/// A [`KvStore`] over a sorted map behind a lock.
///
/// The lock is held for one map operation at a time, which is enough to make
/// every call atomic per key.
#[derive(Debug, Default)]
pub struct MemoryStore {
  data: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  /// Number of stored keys. A poisoned lock still reports the map it guards.
  pub fn len(&self) -> usize {
    self
      .data
      .read()
      .unwrap_or_else(PoisonError::into_inner)
      .len()
  }

  pub fn is_empty(&self) -> bool { self.len() == 0 }
}

fn poisoned() -> StoreError { StoreError::fault("memory store lock poisoned") }

impl KvStore for MemoryStore {
  async fn put_if_absent(
    &self,
    key: &str,
    value: String,
  ) -> Result<(), StoreError> {
    let mut data = self.data.write().map_err(|_| poisoned())?;
    match data.entry(key.to_owned()) {
      Entry::Occupied(_) => Err(StoreError::Conflict(key.to_owned())),
      Entry::Vacant(slot) => {
        slot.insert(value);
        Ok(())
      }
    }
  }

  async fn put(&self, key: &str, value: String) -> Result<(), StoreError> {
    let mut data = self.data.write().map_err(|_| poisoned())?;
    data.insert(key.to_owned(), value);
    Ok(())
  }

  async fn delete(&self, key: &str) -> Result<(), StoreError> {
    let mut data = self.data.write().map_err(|_| poisoned())?;
    data
      .remove(key)
      .map(|_| ())
      .ok_or_else(|| StoreError::NotFound(key.to_owned()))
  }

  async fn get(&self, key: &str) -> Result<String, StoreError> {
    let data = self.data.read().map_err(|_| poisoned())?;
    data
      .get(key)
      .cloned()
      .ok_or_else(|| StoreError::NotFound(key.to_owned()))
  }

  async fn query(&self, query: &Query) -> Result<Vec<String>, StoreError> {
    let prefix = query.key_prefix();
    let data = self.data.read().map_err(|_| poisoned())?;
    Ok(
      data
        .range(prefix.clone()..)
        .take_while(|(k, _)| k.starts_with(&prefix))
        .map(|(_, v)| v.clone())
        .collect(),
    )
  }
}
