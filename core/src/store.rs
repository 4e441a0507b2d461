// pcforge/src/store.rs

//! Contracts for the collaborators that hold the catalog and saved builds.
//!
//! Implementations live outside this crate (the server's Postgres adapters,
//! test fakes). Both traits are object safe so callers can hold them as
//! `Arc<dyn ...>`.

use crate::build::{BuildParts, ComponentRef};
use crate::catalog::{Category, Component, ComponentId};
use crate::error::{BuildError, BuildResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

pub type UserId = i64;
pub type BuildId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  User,
  Admin,
}

impl Role {
  pub fn as_str(self) -> &'static str {
    match self {
      Role::User => "user",
      Role::Admin => "admin",
    }
  }

  /// Unknown labels fall back to the unprivileged role.
  pub fn from_label(label: &str) -> Role {
    if label == "admin" {
      Role::Admin
    } else {
      Role::User
    }
  }
}

/// Who is asking, for operations whose outcome depends on ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requester {
  pub user_id: UserId,
  pub role: Role,
}

impl Requester {
  pub fn may_touch(&self, owner: UserId) -> bool {
    self.role == Role::Admin || self.user_id == owner
  }
}

/// A build about to be written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBuild {
  pub user_id: UserId,
  pub name: String,
  pub description: Option<String>,
  pub total_price_cents: i64,
  pub components: Vec<ComponentRef>,
}

/// A stored build with its references resolved against the catalog.
///
/// References whose component has since been deleted are listed in
/// `missing` and are absent from `components`. `total_price_cents` is the
/// value recorded at save time and is not recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedBuild {
  pub id: BuildId,
  pub user_id: UserId,
  pub name: String,
  pub description: Option<String>,
  pub total_price_cents: i64,
  pub created_at: DateTime<Utc>,
  pub components: Vec<Component>,
  pub missing: Vec<ComponentRef>,
}

impl SavedBuild {
  pub fn parts(&self) -> BuildParts {
    BuildParts::from_components(self.components.iter().cloned())
  }
}

#[async_trait]
pub trait CatalogSource: Send + Sync {
  async fn list_components(&self, category: Category) -> BuildResult<Vec<Component>>;

  /// `BuildError::NotFound` when the id does not exist in `category`.
  async fn get_component(&self, category: Category, id: ComponentId) -> BuildResult<Component>;
}

#[async_trait]
pub trait BuildStore: Send + Sync {
  /// Writes the header and every reference atomically; returns the new id.
  async fn create_build(&self, build: NewBuild) -> BuildResult<BuildId>;

  /// The user's builds, newest first.
  async fn list_builds(&self, user_id: UserId) -> BuildResult<Vec<SavedBuild>>;

  /// Removes a build the requester owns (admins may remove any).
  /// A build the requester may not touch is reported as `NotFound`.
  async fn delete_build(&self, build_id: BuildId, requester: Requester) -> BuildResult<()>;
}

/// Looks every reference up in `catalog`, splitting the result into found
/// components and dangling references. Errors other than `NotFound` abort.
#[instrument(name = "store::resolve_refs", skip(catalog, refs), fields(ref_count = refs.len()))]
pub async fn resolve_refs<C>(catalog: &C, refs: &[ComponentRef]) -> BuildResult<(Vec<Component>, Vec<ComponentRef>)>
where
  C: CatalogSource + ?Sized,
{
  let mut found = Vec::with_capacity(refs.len());
  let mut missing = Vec::new();
  for r in refs {
    match catalog.get_component(r.category, r.component_id).await {
      Ok(component) => found.push(component),
      Err(BuildError::NotFound(_)) => {
        debug!(category = %r.category, component_id = r.component_id, "Referenced component no longer exists.");
        missing.push(*r);
      }
      Err(other) => return Err(other),
    }
  }
  Ok((found, missing))
}
