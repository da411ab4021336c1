//! Subcommands and their mapping onto the service layer.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Subcommand;
use dashkv_core::{Entity, Kind, Query, store::KvStore};
use dashkv_service::{Parameters, Service, Services};
use serde_json::Value;

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
  /// Create an entity from a JSON document.
  Create {
    /// `globalrole` or `project`.
    kind: Kind,
    /// Document to read; stdin when omitted.
    file: Option<PathBuf>,
  },
  /// Replace an existing entity with a JSON document.
  Update {
    kind: Kind,
    name: String,
    file: Option<PathBuf>,
  },
  /// Print one entity.
  Get { kind: Kind, name: String },
  /// Remove one entity.
  Delete { kind: Kind, name: String },
  /// Print every entity of a kind.
  List {
    kind:   Kind,
    /// Only names starting with this prefix.
    #[arg(long)]
    prefix: Option<String>,
  },
}

impl Command {
  pub fn kind(&self) -> Kind {
    match self {
      Self::Create { kind, .. }
      | Self::Update { kind, .. }
      | Self::Get { kind, .. }
      | Self::Delete { kind, .. }
      | Self::List { kind, .. } => *kind,
    }
  }
}

/// Run `command` against the service for its kind. Returns the JSON to print,
/// if any.
pub async fn run<S: KvStore>(
  services: &Services<S>,
  command: Command,
) -> Result<Option<Value>> {
  match command.kind() {
    Kind::GlobalRole => execute(&services.global_roles, command).await,
    Kind::Project => execute(&services.projects, command).await,
  }
}

async fn execute<E: Entity, S: KvStore>(
  service: &Service<E, S>,
  command: Command,
) -> Result<Option<Value>> {
  let output = match command {
    Command::Create { file, .. } => {
      let entity = service.create_value(read_body(file.as_deref())?).await?;
      tracing::info!(kind = %E::KIND, name = %entity.metadata().name, "created");
      serde_json::to_value(entity)?
    }
    Command::Update { name, file, .. } => {
      let params = Parameters::new(name);
      let entity = service
        .update_value(read_body(file.as_deref())?, &params)
        .await?;
      tracing::info!(kind = %E::KIND, name = %params.name, "updated");
      serde_json::to_value(entity)?
    }
    Command::Get { name, .. } => {
      serde_json::to_value(service.get(&Parameters::new(name)).await?)?
    }
    Command::Delete { name, .. } => {
      service.delete(&Parameters::new(name.as_str())).await?;
      tracing::info!(kind = %E::KIND, %name, "deleted");
      return Ok(None);
    }
    Command::List { prefix, .. } => {
      let query = match prefix {
        Some(p) => Query::new(E::KIND).with_name_prefix(p),
        None => Query::new(E::KIND),
      };
      serde_json::to_value(service.list(&query).await?)?
    }
  };
  Ok(Some(output))
}

/// Parse a JSON document from `path`, or from stdin when `None`.
fn read_body(path: Option<&Path>) -> Result<Value> {
  let raw = match path {
    Some(p) => std::fs::read_to_string(p)
      .with_context(|| format!("reading {}", p.display()))?,
    None => std::io::read_to_string(std::io::stdin()).context("reading stdin")?,
  };
  serde_json::from_str(&raw).context("parsing JSON document")
}
