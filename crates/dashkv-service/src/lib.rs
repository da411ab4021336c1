//! Persistence and service layers for dashkv entities.
//!
//! [`Dao`] gives typed CRUD over any [`KvStore`]; [`Service`] adds the
//! business rules (timestamp ownership, conflict detection, name/path
//! consistency) and maps store failures onto [`ServiceError`]. Transport is
//! the caller's concern.
//!
//! ```rust,ignore
//! let services = Services::new(Arc::new(store));
//! let project = services.projects.create(Project::new("p1")).await?;
//! ```

pub mod error;
pub mod params;
pub mod persistence;
pub mod service;

use std::sync::Arc;

use dashkv_core::{project::Project, role::GlobalRole, store::KvStore};

pub use error::{Result, ServiceError};
pub use params::Parameters;
pub use persistence::Dao;
pub use service::Service;

/// One service per entity kind, all sharing the same store handle.
pub struct Services<S> {
  pub global_roles: Service<GlobalRole, S>,
  pub projects:     Service<Project, S>,
}

impl<S: KvStore> Services<S> {
  pub fn new(store: Arc<S>) -> Self {
    Self {
      global_roles: Service::new(Dao::new(Arc::clone(&store))),
      projects:     Service::new(Dao::new(store)),
    }
  }
}

impl<S> Clone for Services<S> {
  fn clone(&self) -> Self {
    Self {
      global_roles: self.global_roles.clone(),
      projects:     self.projects.clone(),
    }
  }
}

#[cfg(test)]
mod tests;
