//! Parameters derived from the request path.

use serde::Deserialize;

/// Identifies the target entity of an update, get or delete.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Parameters {
  pub name: String,
}

impl Parameters {
  pub fn new(name: impl Into<String>) -> Self { Self { name: name.into() } }
}
