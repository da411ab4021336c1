//! [`Query`] — the filter descriptor handed to [`KvStore::query`].
//!
//! [`KvStore::query`]: crate::store::KvStore::query

use crate::Kind;

/// Selects entities of one kind, optionally narrowed to names starting with a
/// prefix. Fields are private: the persistence layer forwards a query without
/// looking inside; only store backends render it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
  kind:        Kind,
  name_prefix: Option<String>,
}

impl Query {
  /// Match every entity of `kind`.
  pub fn new(kind: Kind) -> Self {
    Self {
      kind,
      name_prefix: None,
    }
  }

  pub fn with_name_prefix(mut self, prefix: impl Into<String>) -> Self {
    self.name_prefix = Some(prefix.into());
    self
  }

  pub fn kind(&self) -> Kind { self.kind }

  /// Every matching key starts with this string.
  pub fn key_prefix(&self) -> String {
    format!(
      "/{}/{}",
      self.kind.plural(),
      self.name_prefix.as_deref().unwrap_or_default()
    )
  }
}
