//! Service-level tests against the in-memory store, a fault-injecting wrapper
//! around it, and SQLite.

use std::{
  sync::{
    Arc,
    atomic::{AtomicBool, AtomicUsize, Ordering},
  },
  time::Duration,
};

use chrono::{DateTime, TimeZone, Utc};
use dashkv_core::{
  Entity, Kind, Query, StoreError,
  memory::MemoryStore,
  project::{Display, Project},
  role::{Action, GlobalRole, Permission, Scope},
  store::KvStore,
};
use dashkv_store_sqlite::SqliteStore;
use serde_json::json;

use crate::{Dao, Parameters, Service, ServiceError, Services};

// ─── Test store ──────────────────────────────────────────────────────────────

/// Wraps a [`MemoryStore`], counting calls and optionally failing them.
#[derive(Default)]
struct TestStore {
  inner:       MemoryStore,
  calls:       AtomicUsize,
  fail_reads:  AtomicBool,
  fail_writes: AtomicBool,
}

impl TestStore {
  fn calls(&self) -> usize { self.calls.load(Ordering::SeqCst) }

  fn check(&self, flag: &AtomicBool) -> Result<(), StoreError> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    if flag.load(Ordering::SeqCst) {
      return Err(StoreError::fault("injected failure"));
    }
    Ok(())
  }
}

impl KvStore for TestStore {
  async fn put_if_absent(
    &self,
    key: &str,
    value: String,
  ) -> Result<(), StoreError> {
    self.check(&self.fail_writes)?;
    self.inner.put_if_absent(key, value).await
  }

  async fn put(&self, key: &str, value: String) -> Result<(), StoreError> {
    self.check(&self.fail_writes)?;
    self.inner.put(key, value).await
  }

  async fn delete(&self, key: &str) -> Result<(), StoreError> {
    self.check(&self.fail_writes)?;
    self.inner.delete(key).await
  }

  async fn get(&self, key: &str) -> Result<String, StoreError> {
    self.check(&self.fail_reads)?;
    self.inner.get(key).await
  }

  async fn query(&self, query: &Query) -> Result<Vec<String>, StoreError> {
    self.check(&self.fail_reads)?;
    self.inner.query(query).await
  }
}

fn setup() -> (Arc<TestStore>, Services<TestStore>) {
  let store = Arc::new(TestStore::default());
  (Arc::clone(&store), Services::new(store))
}

fn long_ago() -> DateTime<Utc> {
  Utc.with_ymd_and_hms(2001, 1, 1, 0, 0, 0).unwrap()
}

async fn tick() { tokio::time::sleep(Duration::from_millis(5)).await }

fn admin() -> GlobalRole {
  GlobalRole::new("admin", vec![Permission {
    actions: vec![Action::All],
    scopes:  vec![Scope::All],
  }])
}

// ─── Create ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_stamps_equal_timestamps() {
  let (_, s) = setup();
  let before = Utc::now();

  let p = s.projects.create(Project::new("p1")).await.unwrap();
  assert_eq!(p.metadata.created_at, p.metadata.updated_at);
  assert!(p.metadata.created_at >= before);

  let stored = s.projects.get(&Parameters::new("p1")).await.unwrap();
  assert_eq!(stored, p);
}

#[tokio::test]
async fn create_ignores_caller_timestamps() {
  let (_, s) = setup();
  let mut p = Project::new("p1");
  p.metadata.created_at = long_ago();
  p.metadata.updated_at = long_ago();

  let created = s.projects.create(p).await.unwrap();
  assert!(created.metadata.created_at > long_ago());
}

#[tokio::test]
async fn second_create_conflicts_and_leaves_store_unchanged() {
  let (_, s) = setup();
  let first = s.projects.create(Project::new("p1")).await.unwrap();

  let mut other = Project::new("p1");
  other.spec.display = Some(Display {
    name:        Some("Other".into()),
    description: None,
  });
  let err = s.projects.create(other).await.unwrap_err();
  assert!(matches!(err, ServiceError::Conflict(_)), "{err:?}");

  let stored = s.projects.get(&Parameters::new("p1")).await.unwrap();
  assert_eq!(stored, first);
}

#[tokio::test]
async fn invalid_name_is_rejected_before_the_store() {
  let (store, s) = setup();
  let err = s.projects.create(Project::new("not valid")).await.unwrap_err();
  assert!(matches!(err, ServiceError::BadRequest(_)), "{err:?}");
  assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn invalid_role_is_rejected_before_the_store() {
  let (store, s) = setup();
  let role = GlobalRole::new("empty", vec![Permission {
    actions: vec![],
    scopes:  vec![Scope::All],
  }]);
  let err = s.global_roles.create(role).await.unwrap_err();
  assert!(matches!(err, ServiceError::BadRequest(_)), "{err:?}");
  assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn create_store_fault_is_internal() {
  let (store, s) = setup();
  store.fail_writes.store(true, Ordering::SeqCst);
  let err = s.projects.create(Project::new("p1")).await.unwrap_err();
  assert!(matches!(err, ServiceError::Internal));
  assert_eq!(err.to_string(), "internal server error");
}

#[tokio::test]
async fn concurrent_creates_yield_one_winner() {
  let (_, s) = setup();
  let handles: Vec<_> = (0..8)
    .map(|_| {
      let s = s.clone();
      tokio::spawn(async move { s.projects.create(Project::new("race")).await })
    })
    .collect();

  let mut ok = 0;
  let mut conflicts = 0;
  for h in handles {
    match h.await.unwrap() {
      Ok(_) => ok += 1,
      Err(ServiceError::Conflict(_)) => conflicts += 1,
      Err(e) => panic!("unexpected error: {e:?}"),
    }
  }
  assert_eq!((ok, conflicts), (1, 7));
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_preserves_created_at_and_advances_updated_at() {
  let (_, s) = setup();
  let created = s.projects.create(Project::new("p1")).await.unwrap();
  let mut previous = created.metadata.updated_at;

  for _ in 0..3 {
    tick().await;
    let mut next = created.clone();
    next.metadata.created_at = long_ago();
    let updated = s
      .projects
      .update(next, &Parameters::new("p1"))
      .await
      .unwrap();
    assert_eq!(updated.metadata.created_at, created.metadata.created_at);
    assert!(updated.metadata.updated_at > previous);
    previous = updated.metadata.updated_at;

    let stored = s.projects.get(&Parameters::new("p1")).await.unwrap();
    assert_eq!(stored.metadata.created_at, created.metadata.created_at);
    assert_eq!(stored.metadata.updated_at, previous);
  }
}

#[tokio::test]
async fn update_replaces_spec() {
  let (_, s) = setup();
  s.global_roles.create(admin()).await.unwrap();

  let reader = GlobalRole::new("admin", vec![Permission {
    actions: vec![Action::Read],
    scopes:  vec![Scope::Kind(Kind::Project)],
  }]);
  s.global_roles
    .update(reader.clone(), &Parameters::new("admin"))
    .await
    .unwrap();

  let stored = s.global_roles.get(&Parameters::new("admin")).await.unwrap();
  assert_eq!(stored.spec, reader.spec);
}

#[tokio::test]
async fn update_of_missing_entity_is_not_found() {
  let (store, s) = setup();
  let err = s
    .projects
    .update(Project::new("ghost"), &Parameters::new("ghost"))
    .await
    .unwrap_err();
  assert!(matches!(err, ServiceError::NotFound(_)), "{err:?}");
  assert!(store.inner.is_empty());
}

#[tokio::test]
async fn update_name_mismatch_is_bad_request_without_store_calls() {
  let (store, s) = setup();
  s.projects.create(Project::new("p1")).await.unwrap();
  let calls = store.calls();

  let err = s
    .projects
    .update(Project::new("p2"), &Parameters::new("p1"))
    .await
    .unwrap_err();
  assert!(matches!(err, ServiceError::BadRequest(_)), "{err:?}");
  assert_eq!(store.calls(), calls);
}

#[tokio::test]
async fn update_read_fault_is_internal() {
  let (store, s) = setup();
  s.projects.create(Project::new("p1")).await.unwrap();
  store.fail_reads.store(true, Ordering::SeqCst);

  let err = s
    .projects
    .update(Project::new("p1"), &Parameters::new("p1"))
    .await
    .unwrap_err();
  assert!(matches!(err, ServiceError::Internal));
}

#[tokio::test]
async fn update_write_fault_is_internal() {
  let (store, s) = setup();
  let created = s.projects.create(Project::new("p1")).await.unwrap();
  store.fail_writes.store(true, Ordering::SeqCst);

  let err = s
    .projects
    .update(Project::new("p1"), &Parameters::new("p1"))
    .await
    .unwrap_err();
  assert!(matches!(err, ServiceError::Internal));

  store.fail_writes.store(false, Ordering::SeqCst);
  let stored = s.projects.get(&Parameters::new("p1")).await.unwrap();
  assert_eq!(stored, created);
}

// ─── Untyped payloads ────────────────────────────────────────────────────────

#[tokio::test]
async fn wrong_kind_payload_is_type_mismatch() {
  let (store, s) = setup();
  let payload = json!({ "kind": "Project", "metadata": { "name": "p1" } });

  let err = s.global_roles.create_value(payload.clone()).await.unwrap_err();
  assert!(
    matches!(&err, ServiceError::TypeMismatch { expected: Kind::GlobalRole, received } if received == "Project"),
    "{err:?}"
  );

  // Same answer once something with that name exists.
  s.projects.create_value(payload.clone()).await.unwrap();
  let calls = store.calls();
  let err = s
    .global_roles
    .update_value(payload, &Parameters::new("p1"))
    .await
    .unwrap_err();
  assert!(matches!(err, ServiceError::TypeMismatch { .. }), "{err:?}");
  assert_eq!(store.calls(), calls);
}

#[tokio::test]
async fn payload_without_kind_is_type_mismatch() {
  let (_, s) = setup();
  let err = s
    .projects
    .create_value(json!({ "metadata": { "name": "p1" } }))
    .await
    .unwrap_err();
  assert!(matches!(err, ServiceError::TypeMismatch { .. }), "{err:?}");
}

#[tokio::test]
async fn malformed_payload_of_right_kind_is_bad_request() {
  let (_, s) = setup();
  let err = s
    .projects
    .create_value(json!({ "kind": "Project", "metadata": 42 }))
    .await
    .unwrap_err();
  assert!(matches!(err, ServiceError::BadRequest(_)), "{err:?}");
}

#[tokio::test]
async fn typed_entity_with_foreign_kind_tag_is_type_mismatch() {
  let (store, s) = setup();
  let mut p = Project::new("p1");
  p.kind = Kind::GlobalRole;
  let err = s.projects.create(p).await.unwrap_err();
  assert!(matches!(err, ServiceError::TypeMismatch { .. }), "{err:?}");
  assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn typed_update_checks_kind_before_name() {
  let (store, s) = setup();
  s.projects.create(Project::new("p1")).await.unwrap();
  let calls = store.calls();

  let mut p = Project::new("p2");
  p.kind = Kind::GlobalRole;
  let err = s
    .projects
    .update(p, &Parameters::new("p1"))
    .await
    .unwrap_err();
  assert!(
    matches!(&err, ServiceError::TypeMismatch { expected: Kind::Project, received } if received == "GlobalRole"),
    "{err:?}"
  );
  assert_eq!(store.calls(), calls);
}

// ─── Delete / Get / List ─────────────────────────────────────────────────────

#[tokio::test]
async fn delete_then_get_is_not_found() {
  let (_, s) = setup();
  s.projects.create(Project::new("p1")).await.unwrap();
  s.projects.delete(&Parameters::new("p1")).await.unwrap();

  let err = s.projects.get(&Parameters::new("p1")).await.unwrap_err();
  assert!(matches!(err, ServiceError::NotFound(_)));
  let err = s.projects.delete(&Parameters::new("p1")).await.unwrap_err();
  assert!(matches!(err, ServiceError::NotFound(_)));

  // The name is free again.
  s.projects.create(Project::new("p1")).await.unwrap();
}

#[tokio::test]
async fn list_returns_every_entity_with_latest_metadata() {
  let (_, s) = setup();
  for name in ["a", "b", "c"] {
    s.projects.create(Project::new(name)).await.unwrap();
  }
  tick().await;
  let b = s
    .projects
    .update(Project::new("b"), &Parameters::new("b"))
    .await
    .unwrap();
  s.global_roles.create(admin()).await.unwrap();

  let mut listed = s.projects.list(&Query::new(Kind::Project)).await.unwrap();
  listed.sort_by(|x, y| x.metadata.name.cmp(&y.metadata.name));
  let names: Vec<_> = listed.iter().map(|p| p.metadata.name.as_str()).collect();
  assert_eq!(names, ["a", "b", "c"]);
  assert_eq!(listed[1], b);
}

#[tokio::test]
async fn list_of_empty_kind_is_empty() {
  let (_, s) = setup();
  s.projects.create(Project::new("p1")).await.unwrap();
  let roles = s
    .global_roles
    .list(&Query::new(Kind::GlobalRole))
    .await
    .unwrap();
  assert!(roles.is_empty());
}

#[tokio::test]
async fn list_with_foreign_query_is_bad_request() {
  let (store, s) = setup();
  let err = s
    .global_roles
    .list(&Query::new(Kind::Project))
    .await
    .unwrap_err();
  assert!(matches!(err, ServiceError::BadRequest(_)));
  assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn list_fault_is_internal() {
  let (store, s) = setup();
  store.fail_reads.store(true, Ordering::SeqCst);
  let err = s.projects.list(&Query::new(Kind::Project)).await.unwrap_err();
  assert!(matches!(err, ServiceError::Internal));
}

#[tokio::test]
async fn kinds_do_not_share_names() {
  let (_, s) = setup();
  s.projects.create(Project::new("admin")).await.unwrap();
  s.global_roles.create(admin()).await.unwrap();
  assert_eq!(
    s.projects.get(&Parameters::new("admin")).await.unwrap().kind,
    Kind::Project
  );
}

// ─── Persistence ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn dao_passes_store_errors_through() {
  let dao: Dao<Project, MemoryStore> = Dao::new(Arc::new(MemoryStore::new()));
  assert_eq!(dao.kind(), Project::KIND);

  let p = Project::new("p1");
  dao.create(&p).await.unwrap();
  assert!(matches!(dao.create(&p).await, Err(StoreError::Conflict(_))));
  assert!(matches!(dao.get("nope").await, Err(StoreError::NotFound(_))));
  assert!(matches!(dao.delete("nope").await, Err(StoreError::NotFound(_))));
}

#[tokio::test]
async fn dao_decode_failure_is_a_fault() {
  let store = Arc::new(MemoryStore::new());
  store.put("/projects/junk", "not json".into()).await.unwrap();
  let dao: Dao<Project, MemoryStore> = Dao::new(store);
  assert!(matches!(dao.get("junk").await, Err(StoreError::Fault(_))));
}

// ─── SQLite end to end ───────────────────────────────────────────────────────

#[tokio::test]
async fn lifecycle_against_sqlite() {
  let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
  let projects: Service<Project, SqliteStore> = Service::new(Dao::new(store));

  let created = projects
    .create_value(json!({ "kind": "Project", "metadata": { "name": "p1" } }))
    .await
    .unwrap();
  assert_eq!(created.metadata.created_at, created.metadata.updated_at);

  tick().await;
  let updated = projects
    .update_value(
      json!({
        "kind": "Project",
        "metadata": { "name": "p1", "createdAt": "2001-01-01T00:00:00Z" },
        "spec": { "display": { "name": "First" } }
      }),
      &Parameters::new("p1"),
    )
    .await
    .unwrap();
  assert_eq!(updated.metadata.created_at, created.metadata.created_at);
  assert!(updated.metadata.updated_at > created.metadata.updated_at);

  let err = projects
    .update(Project::new("p2"), &Parameters::new("p1"))
    .await
    .unwrap_err();
  assert!(matches!(err, ServiceError::BadRequest(_)));

  let err = projects.create(Project::new("p1")).await.unwrap_err();
  assert!(matches!(err, ServiceError::Conflict(_)));

  projects.delete(&Parameters::new("p1")).await.unwrap();
  let listed = projects.list(&Query::new(Kind::Project)).await.unwrap();
  assert!(listed.is_empty());
}
