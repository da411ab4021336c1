//! `dashkv` — manage roles and projects in a dashkv store.
//!
//! # Usage
//!
//! ```text
//! dashkv create project project.json
//! dashkv update project p1 < project.json
//! dashkv get globalrole admin
//! dashkv list project --prefix team-
//! dashkv --store /var/lib/dashkv/store.db delete project p1
//! ```
//!
//! Settings come from `dashkv.toml` (or `--config`), then `DASHKV_*`
//! environment variables, then flags.

mod commands;

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use commands::Command;
use dashkv_service::Services;
use dashkv_store_sqlite::SqliteStore;
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "dashkv", version, about = "Manage dashkv roles and projects")]
struct Args {
  /// Path to a TOML config file.
  #[arg(short, long, value_name = "FILE", default_value = "dashkv.toml")]
  config: PathBuf,

  /// SQLite database file; overrides `store_path` from the config.
  #[arg(long, value_name = "PATH")]
  store: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

// ─── Config ───────────────────────────────────────────────────────────────────

/// Settings read from the config file and `DASHKV_*` environment variables.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
struct CliConfig {
  #[serde(default = "default_store_path")]
  store_path: PathBuf,
  /// Default log level when `RUST_LOG` is unset.
  #[serde(default = "default_log_level")]
  log_level:  String,
}

fn default_store_path() -> PathBuf { PathBuf::from("dashkv.db") }

fn default_log_level() -> String { "info".to_string() }

fn load_config(path: &std::path::Path) -> Result<CliConfig> {
  config::Config::builder()
    .add_source(config::File::from(path).required(false))
    .add_source(config::Environment::with_prefix("DASHKV"))
    .build()
    .context("failed to read config file")?
    .try_deserialize()
    .context("failed to deserialise config")
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();
  let cfg = load_config(&args.config)?;

  // Logs go to stderr; stdout carries the JSON output.
  let level: LevelFilter = cfg.log_level.parse().unwrap_or(LevelFilter::INFO);
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy(),
    )
    .init();

  let store_path = args.store.unwrap_or(cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;
  let services = Services::new(Arc::new(store));

  if let Some(output) = commands::run(&services, args.command).await? {
    println!("{}", serde_json::to_string_pretty(&output)?);
  }
  Ok(())
}
