//! The [`KvStore`] trait.
//!
//! Implemented by storage backends (`dashkv-store-sqlite`, the in-process
//! [`MemoryStore`](crate::memory::MemoryStore)). The store knows nothing about
//! entity kinds or types: it moves encoded values in and out under string
//! keys. Typing happens one layer up, in the persistence component.

use std::future::Future;

use crate::{Query, StoreError};

/// A strongly-consistent key-value store with atomic per-key operations.
///
/// Values are JSON text. Every method is a single round-trip; no method
/// retries. All futures are `Send` so one store can be shared across tasks.
pub trait KvStore: Send + Sync {
  /// Write `value` under `key` only if the key is absent.
  ///
  /// Fails with [`StoreError::Conflict`] if the key already exists.
  fn put_if_absent<'a>(
    &'a self,
    key: &'a str,
    value: String,
  ) -> impl Future<Output = Result<(), StoreError>> + Send + 'a;

  /// Write `value` under `key`, replacing anything already there.
  fn put<'a>(
    &'a self,
    key: &'a str,
    value: String,
  ) -> impl Future<Output = Result<(), StoreError>> + Send + 'a;

  /// Remove `key`. Fails with [`StoreError::NotFound`] if it is absent.
  fn delete<'a>(
    &'a self,
    key: &'a str,
  ) -> impl Future<Output = Result<(), StoreError>> + Send + 'a;

  /// Fetch the value under `key`. Fails with [`StoreError::NotFound`] if it
  /// is absent.
  fn get<'a>(
    &'a self,
    key: &'a str,
  ) -> impl Future<Output = Result<String, StoreError>> + Send + 'a;

  /// Every value whose key matches `query`, ordered by key. No match is an
  /// empty vector, not an error.
  fn query<'a>(
    &'a self,
    query: &'a Query,
  ) -> impl Future<Output = Result<Vec<String>, StoreError>> + Send + 'a;
}
