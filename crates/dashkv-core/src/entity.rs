//! The [`Entity`] trait implemented by every persisted domain object.

use serde::{Serialize, de::DeserializeOwned};

use crate::{Error, Kind, Metadata, Result};

/// A typed domain object stored under `(KIND, metadata.name)`.
///
/// Implementors provide every method themselves; there are no defaults to
/// fall back on.
pub trait Entity:
  Serialize + DeserializeOwned + Clone + Send + Sync + 'static
{
  /// The kind tag every value of this type carries.
  const KIND: Kind;

  /// The kind tag this value carries, which may disagree with `KIND` when
  /// the value was built or decoded carelessly.
  fn kind(&self) -> Kind;

  fn metadata(&self) -> &Metadata;

  fn metadata_mut(&mut self) -> &mut Metadata;

  /// Entity-specific checks run by the service before any write.
  fn validate(&self) -> Result<()>;
}

/// Fail with [`Error::KindMismatch`] unless `entity` is tagged `E::KIND`.
pub fn check_kind<E: Entity>(entity: &E) -> Result<()> {
  if entity.kind() != E::KIND {
    return Err(Error::KindMismatch {
      expected: E::KIND,
      received: entity.kind(),
    });
  }
  Ok(())
}

/// Store key for an entity of `kind` named `name`: `/{plural}/{name}`.
pub fn key(kind: Kind, name: &str) -> String {
  format!("/{}/{}", kind.plural(), name)
}

/// Store key for `entity`.
pub fn key_of<E: Entity>(entity: &E) -> String {
  key(E::KIND, &entity.metadata().name)
}
