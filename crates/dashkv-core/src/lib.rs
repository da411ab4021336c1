//! Core types and trait definitions for dashkv.
//!
//! This crate holds the entity model and the kind-agnostic [`store::KvStore`]
//! abstraction. It is free of database and CLI dependencies; every other crate
//! depends on it.

// Native `async fn` in traits; the store trait spells out its `Send` bounds.
#![allow(async_fn_in_trait)]

pub mod entity;
pub mod error;
pub mod kind;
pub mod memory;
pub mod metadata;
pub mod project;
pub mod query;
pub mod role;
pub mod store;

pub use entity::Entity;
pub use error::{Error, Result, StoreError};
pub use kind::Kind;
pub use metadata::Metadata;
pub use query::Query;
