//! Error types for `dashkv-core`.

use thiserror::Error;

use crate::kind::Kind;

/// A validation failure on an entity.
#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid name {name:?}: {reason}")]
  InvalidName { name: String, reason: &'static str },

  #[error("entity kind {received} does not match expected kind {expected}")]
  KindMismatch { expected: Kind, received: Kind },

  #[error("invalid {kind}: {reason}")]
  InvalidEntity { kind: Kind, reason: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The outcome of a failed [`KvStore`](crate::store::KvStore) call.
///
/// Backends classify their own failures into one of these tags so callers can
/// match on them exhaustively.
#[derive(Debug, Error)]
pub enum StoreError {
  /// `put_if_absent` found the key already occupied.
  #[error("key {0} already exists")]
  Conflict(String),

  /// `get` or `delete` targeted an absent key.
  #[error("key {0} not found")]
  NotFound(String),

  /// Anything else: I/O, encoding, a broken connection.
  #[error("store fault: {0}")]
  Fault(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
  pub fn fault(e: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
    Self::Fault(e.into())
  }
}

impl From<serde_json::Error> for StoreError {
  fn from(e: serde_json::Error) -> Self { Self::Fault(Box::new(e)) }
}
