//! The persistence component: typed CRUD for one entity kind over a shared,
//! kind-agnostic [`KvStore`].

use std::{marker::PhantomData, sync::Arc};

use dashkv_core::{
  Entity, Kind, Query, StoreError,
  entity::{key, key_of},
  store::KvStore,
};

/// Data access for entities of type `E`.
///
/// The kind and the decode target are fixed by `E`, so one `Dao` can never
/// read another kind's keys. Holds nothing but a handle to the store.
pub struct Dao<E, S> {
  client:  Arc<S>,
  kind:    Kind,
  _entity: PhantomData<fn() -> E>,
}

impl<E, S> Clone for Dao<E, S> {
  fn clone(&self) -> Self {
    Self {
      client:  Arc::clone(&self.client),
      kind:    self.kind,
      _entity: PhantomData,
    }
  }
}

impl<E: Entity, S: KvStore> Dao<E, S> {
  pub fn new(client: Arc<S>) -> Self {
    Self {
      client,
      kind: E::KIND,
      _entity: PhantomData,
    }
  }

  pub fn kind(&self) -> Kind { self.kind }

  /// Write `entity` only if no entity of the same name exists.
  ///
  /// [`StoreError::Conflict`] is passed through untouched.
  pub async fn create(&self, entity: &E) -> Result<(), StoreError> {
    let value = serde_json::to_string(entity)?;
    self.client.put_if_absent(&key_of(entity), value).await
  }

  /// Write `entity`, replacing whatever is stored under its name.
  pub async fn update(&self, entity: &E) -> Result<(), StoreError> {
    let value = serde_json::to_string(entity)?;
    self.client.put(&key_of(entity), value).await
  }

  pub async fn delete(&self, name: &str) -> Result<(), StoreError> {
    self.client.delete(&key(self.kind, name)).await
  }

  pub async fn get(&self, name: &str) -> Result<E, StoreError> {
    let raw = self.client.get(&key(self.kind, name)).await?;
    Ok(serde_json::from_str(&raw)?)
  }

  /// Decode every entity matching `query`.
  pub async fn list(&self, query: &Query) -> Result<Vec<E>, StoreError> {
    self
      .client
      .query(query)
      .await?
      .iter()
      .map(|raw| serde_json::from_str(raw).map_err(StoreError::from))
      .collect()
  }
}
