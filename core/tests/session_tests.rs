// tests/session_tests.rs
mod common;

use common::*;
use pcforge::build::session::MAX_BUILD_NAME_CHARS;
use pcforge::store::resolve_refs;
use pcforge::{
  BuildError, BuildSession, BuildStore, Category, CompatibilityStatus, Component, ComponentRef, Requester, Role,
};
use serial_test::serial;

fn signed_in_with_parts() -> BuildSession {
  let mut session = BuildSession::for_user(7);
  session.select(cpu(1, "AM5", 8, 3.6, 105).into());
  session.select(motherboard(2, "AM5").into());
  session.select(psu(3, 650).into());
  session
}

fn catalog_for(session: &BuildSession) -> MemoryStore {
  let parts = session.parts().clone();
  let components: Vec<Component> = [Category::Cpu, Category::Motherboard, Category::Psu, Category::Gpu]
    .into_iter()
    .filter_map(|c| parts.get(c))
    .collect();
  MemoryStore::with_components(components)
}

#[test]
fn every_mutation_recomputes_the_summary() {
  setup_tracing();
  let mut session = BuildSession::new();
  assert_eq!(session.summary().compatibility.status, CompatibilityStatus::Pending);

  session.select(cpu(1, "AM5", 8, 3.6, 105).into());
  assert_eq!(session.summary().total_price_cents, 30_000);
  assert_eq!(session.summary().scores.gaming, 12);

  session.select(motherboard(2, "LGA1700").into());
  assert_eq!(session.summary().compatibility.status, CompatibilityStatus::Incompatible);

  let removed = session.remove(Category::Motherboard);
  assert!(matches!(removed, Some(Component::Motherboard(_))));
  assert_eq!(session.summary().compatibility.status, CompatibilityStatus::Compatible);
}

#[test]
fn select_replaces_and_returns_previous_component() {
  let mut session = BuildSession::new();
  assert!(session.select(cpu(1, "AM5", 8, 3.6, 105).into()).is_none());

  let previous = session.select(cpu(9, "AM5", 16, 4.5, 170).into());
  assert_eq!(previous.map(|c| c.id()), Some(1));
  assert_eq!(session.parts().len(), 1);
  assert_eq!(session.parts().cpu.as_ref().map(|c| c.header.id), Some(9));
}

#[test]
fn clear_resets_to_pending() {
  let mut session = signed_in_with_parts();
  session.clear();

  let summary = session.summary();
  assert_eq!(summary.total_price_cents, 0);
  assert_eq!(summary.scores.gaming, 0);
  assert_eq!(summary.compatibility.status, CompatibilityStatus::Pending);
  assert_eq!(session.user(), Some(7));
}

#[tokio::test]
#[serial]
async fn save_without_user_requires_auth_and_leaves_session_untouched() {
  setup_tracing();
  let mut session = signed_in_with_parts();
  session.sign_out();
  let store = MemoryStore::new();
  let before = session.clone();

  let result = session.save(&store, "Gaming rig", None).await;

  assert!(matches!(result, Err(BuildError::AuthRequired(_))));
  assert_eq!(session.parts(), before.parts());
  assert_eq!(session.summary(), before.summary());
  assert_eq!(store.build_count(), 0);
}

#[tokio::test]
#[serial]
async fn save_rejects_blank_or_long_names_and_empty_builds() {
  setup_tracing();
  let store = MemoryStore::new();
  let session = signed_in_with_parts();

  let blank = session.save(&store, "   ", None).await;
  assert!(matches!(blank, Err(BuildError::ValidationFailure(_))));

  let long_name = "x".repeat(MAX_BUILD_NAME_CHARS + 1);
  let too_long = session.save(&store, &long_name, None).await;
  assert!(matches!(too_long, Err(BuildError::ValidationFailure(_))));

  let empty = BuildSession::for_user(7);
  let nothing = empty.save(&store, "Empty", None).await;
  assert!(matches!(nothing, Err(BuildError::ValidationFailure(_))));

  assert_eq!(store.build_count(), 0);
}

#[tokio::test]
#[serial]
async fn save_submits_one_record_with_every_reference() {
  setup_tracing();
  let session = signed_in_with_parts();
  let store = catalog_for(&session);

  let build_id = session
    .save(&store, "  Workstation  ", Some("  quiet  "))
    .await
    .expect("save succeeds");

  let stored = store.stored(build_id).expect("build was stored");
  assert_eq!(stored.user_id, 7);
  assert_eq!(stored.name, "Workstation");
  assert_eq!(stored.description.as_deref(), Some("quiet"));
  assert_eq!(stored.total_price_cents, 30_000 + 15_000 + 9_000);
  assert_eq!(
    stored.components,
    vec![
      ComponentRef { category: Category::Cpu, component_id: 1 },
      ComponentRef { category: Category::Motherboard, component_id: 2 },
      ComponentRef { category: Category::Psu, component_id: 3 },
    ]
  );
}

#[tokio::test]
#[serial]
async fn failing_store_surfaces_error_and_keeps_session() {
  setup_tracing();
  let session = signed_in_with_parts();
  let store = catalog_for(&session);
  store.fail_writes(true);
  let before = session.clone();

  let result = session.save(&store, "Doomed", None).await;

  assert!(matches!(result, Err(BuildError::PersistenceFailure(_))));
  assert_eq!(store.build_count(), 0);
  assert_eq!(session.parts(), before.parts());
  assert_eq!(session.summary(), before.summary());
}

#[tokio::test]
#[serial]
async fn failure_midway_through_references_leaves_no_build() {
  setup_tracing();
  let session = signed_in_with_parts();
  let store = catalog_for(&session);
  store.fail_at_ref(Some(2));
  let before = session.clone();

  let result = session.save(&store, "Half written", None).await;

  assert!(matches!(result, Err(BuildError::PersistenceFailure(_))));
  assert_eq!(store.build_count(), 0);
  assert!(store.list_builds(7).await.unwrap().is_empty());
  assert_eq!(session.parts(), before.parts());

  store.fail_at_ref(None);
  let id = session.save(&store, "Second try", None).await.unwrap();
  assert_eq!(store.stored(id).unwrap().components.len(), 3);
}

#[tokio::test]
#[serial]
async fn unreachable_store_is_reported_as_upstream_failure() {
  setup_tracing();
  let session = signed_in_with_parts();
  let store = MemoryStore::new();
  store.set_unreachable(true);

  let result = session.save(&store, "Offline", None).await;
  assert!(matches!(result, Err(BuildError::UpstreamUnavailable(_))));
}

#[tokio::test]
#[serial]
async fn listed_builds_come_back_newest_first() {
  setup_tracing();
  let session = signed_in_with_parts();
  let store = catalog_for(&session);

  let first = session.save(&store, "First", None).await.expect("first save");
  let second = session.save(&store, "Second", None).await.expect("second save");

  let builds = store.list_builds(7).await.expect("list builds");
  assert_eq!(builds.iter().map(|b| b.id).collect::<Vec<_>>(), vec![second, first]);
  assert!(store.list_builds(8).await.expect("other user").is_empty());
}

#[tokio::test]
#[serial]
async fn deleted_component_is_reported_missing_on_load() {
  setup_tracing();
  let session = signed_in_with_parts();
  let store = catalog_for(&session);
  session.save(&store, "Soon partial", None).await.expect("save");

  store.remove_component(Category::Motherboard, 2);
  let saved = store.list_builds(7).await.expect("list builds").remove(0);

  assert_eq!(saved.components.len(), 2);
  assert_eq!(
    saved.missing,
    vec![ComponentRef { category: Category::Motherboard, component_id: 2 }]
  );
  // the stored total is what was paid at save time
  assert_eq!(saved.total_price_cents, 54_000);

  let mut reloaded = BuildSession::for_user(7);
  reloaded.load(&saved);
  assert!(reloaded.parts().motherboard.is_none());
  assert_eq!(reloaded.summary().total_price_cents, 39_000);
}

#[tokio::test]
#[serial]
async fn resolve_refs_propagates_non_missing_errors() {
  setup_tracing();
  let store = MemoryStore::new();
  store.set_unreachable(true);
  let refs = [ComponentRef { category: Category::Cpu, component_id: 1 }];

  let result = resolve_refs(&store, &refs).await;
  assert!(matches!(result, Err(BuildError::UpstreamUnavailable(_))));
}

#[tokio::test]
#[serial]
async fn only_owner_or_admin_may_delete() {
  setup_tracing();
  let session = signed_in_with_parts();
  let store = catalog_for(&session);
  let build_id = session.save(&store, "Mine", None).await.expect("save");

  let stranger = Requester { user_id: 8, role: Role::User };
  let result = store.delete_build(build_id, stranger).await;
  assert!(matches!(result, Err(BuildError::NotFound(_))));
  assert_eq!(store.build_count(), 1);

  let admin = Requester { user_id: 1, role: Role::Admin };
  store.delete_build(build_id, admin).await.expect("admin delete");
  assert_eq!(store.build_count(), 0);
}
