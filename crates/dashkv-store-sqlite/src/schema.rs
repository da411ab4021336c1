//! SQL schema for the dashkv SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per entity. Keys look like '/projects/<name>'; values are the
-- entity encoded as JSON.
CREATE TABLE IF NOT EXISTS kv (
    key    TEXT PRIMARY KEY NOT NULL,
    value  TEXT NOT NULL
) WITHOUT ROWID;

PRAGMA user_version = 1;
";
