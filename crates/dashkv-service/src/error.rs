//! The service-layer error taxonomy.

use dashkv_core::Kind;
use thiserror::Error;

/// Everything a service call can fail with. Store errors are classified into
/// one of these exactly once, inside the service; callers never see a raw
/// store error.
#[derive(Debug, Error)]
pub enum ServiceError {
  /// The payload is not the entity type this service handles.
  #[error("wrong entity format, expected {expected}, received {received:?}")]
  TypeMismatch { expected: Kind, received: String },

  /// A create targeted a name that is already taken.
  #[error("{0} already exists")]
  Conflict(String),

  #[error("{0} not found")]
  NotFound(String),

  /// Caller-correctable input problem.
  #[error("bad request: {0}")]
  BadRequest(String),

  /// An unexpected store failure. The cause is logged, never returned.
  #[error("internal server error")]
  Internal,
}

pub type Result<T, E = ServiceError> = std::result::Result<T, E>;

impl From<dashkv_core::Error> for ServiceError {
  fn from(e: dashkv_core::Error) -> Self {
    match e {
      dashkv_core::Error::KindMismatch { expected, received } => {
        ServiceError::TypeMismatch {
          expected,
          received: received.to_string(),
        }
      }
      other => ServiceError::BadRequest(other.to_string()),
    }
  }
}
