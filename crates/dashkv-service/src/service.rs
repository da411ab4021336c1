//! The service component: business rules on top of [`Dao`].
//!
//! | Operation | Store calls | Failure mapping |
//! |-----------|-------------|-----------------|
//! | `create`  | put-if-absent | conflict → `Conflict`, other → `Internal` |
//! | `update`  | get, put      | foreign kind tag → `TypeMismatch`, name mismatch → `BadRequest`, missing → `NotFound`, other → `Internal` |
//! | `delete`  | delete        | missing → `NotFound`, other → `Internal` |
//! | `get`     | get           | missing → `NotFound`, other → `Internal` |
//! | `list`    | query         | other → `Internal` |
//!
//! Nothing here retries. `update` reads then writes with no version check,
//! so two concurrent updates of one entity resolve as last writer wins.

use chrono::Utc;
use dashkv_core::{
  Entity, Kind, Query, StoreError, entity::check_kind, store::KvStore,
};
use serde_json::Value;
use tracing::{debug, error};

use crate::{Dao, Parameters, Result, ServiceError};

/// Business rules for entities of type `E`, backed by store `S`.
pub struct Service<E, S> {
  dao: Dao<E, S>,
}

impl<E, S> Clone for Service<E, S> {
  fn clone(&self) -> Self {
    Self {
      dao: self.dao.clone(),
    }
  }
}

impl<E: Entity, S: KvStore> Service<E, S> {
  pub fn new(dao: Dao<E, S>) -> Self { Self { dao } }

  /// Narrow an untyped JSON payload to `E`.
  ///
  /// The payload's `kind` field must name `E`'s kind exactly; anything else
  /// is a [`ServiceError::TypeMismatch`] naming what was received. A payload
  /// of the right kind that does not decode is a bad request.
  pub fn decode(value: Value) -> Result<E> {
    let expected: &'static str = E::KIND.into();
    let received = match value.get("kind") {
      Some(Value::String(s)) => s.clone(),
      Some(other) => other.to_string(),
      None => "<no kind>".to_owned(),
    };
    if received != expected {
      return Err(ServiceError::TypeMismatch {
        expected: E::KIND,
        received,
      });
    }
    serde_json::from_value(value).map_err(|e| {
      ServiceError::BadRequest(format!("invalid {} document: {e}", E::KIND))
    })
  }

  // ── Create ────────────────────────────────────────────────────────────────

  /// [`Service::create`] for an untyped payload.
  pub async fn create_value(&self, value: Value) -> Result<E> {
    self.create(Self::decode(value)?).await
  }

  /// Stamp both timestamps and store `entity` under a fresh name.
  pub async fn create(&self, mut entity: E) -> Result<E> {
    check_kind(&entity)?;
    entity.validate()?;
    entity.metadata_mut().create_now();

    let name = entity.metadata().name.clone();
    match self.dao.create(&entity).await {
      Ok(()) => Ok(entity),
      Err(StoreError::Conflict(_)) => {
        debug!(kind = %E::KIND, %name, "unable to create, it already exists");
        Err(ServiceError::Conflict(describe(E::KIND, &name)))
      }
      Err(e) => Err(internal(E::KIND, "create", &name, e)),
    }
  }

  // ── Update ────────────────────────────────────────────────────────────────

  /// [`Service::update`] for an untyped payload.
  pub async fn update_value(
    &self,
    value: Value,
    params: &Parameters,
  ) -> Result<E> {
    self.update(Self::decode(value)?, params).await
  }

  /// Replace the stored entity named `params.name` with `entity`.
  ///
  /// `createdAt` is always taken from the stored version, whatever `entity`
  /// carries; `updatedAt` is set to now.
  pub async fn update(&self, mut entity: E, params: &Parameters) -> Result<E> {
    check_kind(&entity)?;
    let name = entity.metadata().name.clone();
    if name != params.name {
      debug!(
        kind = %E::KIND,
        body_name = %name,
        path_name = %params.name,
        "name in body and path do not match"
      );
      return Err(ServiceError::BadRequest(format!(
        "metadata.name {name:?} and the name in the request path {:?} do not match",
        params.name
      )));
    }
    entity.validate()?;

    let old = match self.dao.get(&name).await {
      Ok(old) => old,
      Err(StoreError::NotFound(_)) => {
        debug!(kind = %E::KIND, %name, "unable to update, not found");
        return Err(ServiceError::NotFound(describe(E::KIND, &name)));
      }
      Err(e) => {
        let op = "find the previous version of";
        return Err(internal(E::KIND, op, &name, e));
      }
    };

    let metadata = entity.metadata_mut();
    metadata.created_at = old.metadata().created_at;
    metadata.updated_at = Utc::now();

    match self.dao.update(&entity).await {
      Ok(()) => Ok(entity),
      Err(e) => Err(internal(E::KIND, "update", &name, e)),
    }
  }

  // ── Delete / Get / List ───────────────────────────────────────────────────

  pub async fn delete(&self, params: &Parameters) -> Result<()> {
    match self.dao.delete(&params.name).await {
      Ok(()) => Ok(()),
      Err(StoreError::NotFound(_)) => {
        debug!(kind = %E::KIND, name = %params.name, "unable to delete, not found");
        Err(ServiceError::NotFound(describe(E::KIND, &params.name)))
      }
      Err(e) => Err(internal(E::KIND, "delete", &params.name, e)),
    }
  }

  pub async fn get(&self, params: &Parameters) -> Result<E> {
    match self.dao.get(&params.name).await {
      Ok(entity) => Ok(entity),
      Err(StoreError::NotFound(_)) => {
        debug!(kind = %E::KIND, name = %params.name, "unable to get, not found");
        Err(ServiceError::NotFound(describe(E::KIND, &params.name)))
      }
      Err(e) => Err(internal(E::KIND, "get", &params.name, e)),
    }
  }

  /// Every stored entity matching `query`, which must select this service's
  /// kind.
  pub async fn list(&self, query: &Query) -> Result<Vec<E>> {
    if query.kind() != E::KIND {
      return Err(ServiceError::BadRequest(format!(
        "cannot list {} with a {} query",
        E::KIND,
        query.kind()
      )));
    }
    self
      .dao
      .list(query)
      .await
      .map_err(|e| internal(E::KIND, "list", "*", e))
  }
}

fn describe(kind: Kind, name: &str) -> String { format!("{kind} {name:?}") }

/// Log the store failure with its cause and hand back the opaque error.
fn internal(kind: Kind, op: &str, name: &str, e: StoreError) -> ServiceError {
  error!(
    error = %e,
    %kind,
    %name,
    "unable to {op} the entity, something is wrong with the store"
  );
  ServiceError::Internal
}
