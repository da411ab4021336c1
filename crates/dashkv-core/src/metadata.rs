//! The identity-and-timestamp record embedded in every entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Longest name accepted for any entity.
pub const MAX_NAME_LEN: usize = 75;

/// Name plus creation and modification timestamps.
///
/// `name` is the entity's key within its kind and never changes. Timestamps
/// are owned by the service layer: whatever a caller puts in them is
/// overwritten on create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
  pub name:       String,
  #[serde(default)]
  pub created_at: DateTime<Utc>,
  #[serde(default)]
  pub updated_at: DateTime<Utc>,
}

impl Metadata {
  /// Metadata carrying only a name; both timestamps sit at the Unix epoch
  /// until the entity is created.
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name:       name.into(),
      created_at: DateTime::<Utc>::default(),
      updated_at: DateTime::<Utc>::default(),
    }
  }

  /// Stamp both timestamps with the same current UTC instant.
  pub fn create_now(&mut self) {
    let now = Utc::now();
    self.created_at = now;
    self.updated_at = now;
  }

  /// Check the name: non-empty, at most [`MAX_NAME_LEN`] characters, ASCII
  /// alphanumerics plus `_`, `-` and `.`.
  pub fn validate(&self) -> Result<()> { validate_name(&self.name) }
}

pub fn validate_name(name: &str) -> Result<()> {
  let invalid = |reason| {
    Err(Error::InvalidName {
      name: name.to_owned(),
      reason,
    })
  };

  if name.is_empty() {
    return invalid("name cannot be empty");
  }
  if name.len() > MAX_NAME_LEN {
    return invalid("name cannot be longer than 75 characters");
  }
  if !name
    .chars()
    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
  {
    return invalid("name may only contain letters, digits, '_', '-' and '.'");
  }
  Ok(())
}
