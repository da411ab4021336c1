//! Projects — the top-level grouping for dashboards.

use serde::{Deserialize, Serialize};

use crate::{Entity, Kind, Metadata, Result};

/// Human-facing labels, independent of the immutable name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Display {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name:        Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSpec {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub display: Option<Display>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
  pub kind:     Kind,
  pub metadata: Metadata,
  #[serde(default)]
  pub spec:     ProjectSpec,
}

impl Project {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      kind:     Kind::Project,
      metadata: Metadata::new(name),
      spec:     ProjectSpec::default(),
    }
  }
}

impl Entity for Project {
  const KIND: Kind = Kind::Project;

  fn kind(&self) -> Kind { self.kind }

  fn metadata(&self) -> &Metadata { &self.metadata }

  fn metadata_mut(&mut self) -> &mut Metadata { &mut self.metadata }

  fn validate(&self) -> Result<()> {
    self.metadata.validate()
  }
}
