//! SQLite backend for the dashkv key-value store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. A single table holds every key; the
//! primary-key constraint supplies the atomic create-if-absent.

mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
