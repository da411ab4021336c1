//! Global access-control roles.
//!
//! A role is a named list of permissions; each permission grants a set of
//! actions over a set of entity kinds.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Entity, Error, Kind, Metadata, Result};

// ─── Permissions ─────────────────────────────────────────────────────────────

/// An operation a permission allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
  Read,
  Create,
  Update,
  Delete,
  /// Every action.
  #[serde(rename = "*")]
  All,
}

/// What a permission applies to: one entity kind, or `*` for all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Scope {
  All,
  Kind(Kind),
}

impl fmt::Display for Scope {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::All => f.write_str("*"),
      Self::Kind(kind) => write!(f, "{kind}"),
    }
  }
}

impl TryFrom<String> for Scope {
  type Error = String;

  fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
    if s == "*" {
      return Ok(Self::All);
    }
    Kind::from_str(&s)
      .map(Self::Kind)
      .map_err(|_| format!("unknown scope {s:?}"))
  }
}

impl From<Scope> for String {
  fn from(scope: Scope) -> Self { scope.to_string() }
}

/// A grant of `actions` over `scopes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
  pub actions: Vec<Action>,
  pub scopes:  Vec<Scope>,
}

// ─── GlobalRole ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSpec {
  #[serde(default)]
  pub permissions: Vec<Permission>,
}

/// A role that applies across every project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalRole {
  pub kind:     Kind,
  pub metadata: Metadata,
  #[serde(default)]
  pub spec:     RoleSpec,
}

impl GlobalRole {
  pub fn new(name: impl Into<String>, permissions: Vec<Permission>) -> Self {
    Self {
      kind:     Kind::GlobalRole,
      metadata: Metadata::new(name),
      spec:     RoleSpec { permissions },
    }
  }
}

impl Entity for GlobalRole {
  const KIND: Kind = Kind::GlobalRole;

  fn kind(&self) -> Kind { self.kind }

  fn metadata(&self) -> &Metadata { &self.metadata }

  fn metadata_mut(&mut self) -> &mut Metadata { &mut self.metadata }

  fn validate(&self) -> Result<()> {
    self.metadata.validate()?;
    for (i, permission) in self.spec.permissions.iter().enumerate() {
      if permission.actions.is_empty() {
        return Err(Error::InvalidEntity {
          kind:   Self::KIND,
          reason: format!("permission {i} has no actions"),
        });
      }
      if permission.scopes.is_empty() {
        return Err(Error::InvalidEntity {
          kind:   Self::KIND,
          reason: format!("permission {i} has no scopes"),
        });
      }
    }
    Ok(())
  }
}
