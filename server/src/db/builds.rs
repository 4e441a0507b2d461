// pcforge_server/src/db/builds.rs

use super::{build_failure, PgCatalog};
use crate::models::{BuildComponentRow, BuildRow, OwnedBuildRow};
use async_trait::async_trait;
use pcforge::store::resolve_refs;
use pcforge::{
  BuildError, BuildId, BuildResult, BuildStore, Category, ComponentRef, NewBuild, Requester, Role, SavedBuild, UserId,
};
use sqlx::PgPool;
use std::collections::HashMap;
use tracing::{info, instrument, warn};

#[derive(Clone)]
pub struct PgBuildStore {
  pool: PgPool,
  catalog: PgCatalog,
}

impl PgBuildStore {
  pub fn new(pool: PgPool, catalog: PgCatalog) -> Self {
    Self { pool, catalog }
  }

  /// Every build with its owner, newest first. Components are not resolved.
  #[instrument(name = "PgBuildStore::list_all_with_owner", skip(self), err(Display))]
  pub async fn list_all_with_owner(&self) -> BuildResult<Vec<OwnedBuildRow>> {
    sqlx::query_as::<_, OwnedBuildRow>(
      "SELECT b.id, b.user_id, b.name, b.description, b.total_price_cents, b.created_at, \
              u.name AS user_name, u.email AS user_email \
       FROM builds b JOIN users u ON b.user_id = u.id \
       ORDER BY b.created_at DESC, b.id DESC",
    )
    .fetch_all(&self.pool)
    .await
    .map_err(|e| build_failure("list all builds", e))
  }

  async fn refs_by_build(&self, build_ids: &[BuildId]) -> BuildResult<HashMap<BuildId, Vec<ComponentRef>>> {
    let rows = sqlx::query_as::<_, BuildComponentRow>(
      "SELECT build_id, category, component_id FROM build_components WHERE build_id = ANY($1) ORDER BY id",
    )
    .bind(build_ids)
    .fetch_all(&self.pool)
    .await
    .map_err(|e| build_failure("list build components", e))?;

    let mut grouped: HashMap<BuildId, Vec<ComponentRef>> = HashMap::new();
    for row in rows {
      match Category::parse(&row.category) {
        Some(category) => grouped.entry(row.build_id).or_default().push(ComponentRef {
          category,
          component_id: row.component_id,
        }),
        None => warn!(build_id = row.build_id, category = %row.category, "Ignoring reference with unknown category."),
      }
    }
    Ok(grouped)
  }
}

#[async_trait]
impl BuildStore for PgBuildStore {
  #[instrument(
    name = "PgBuildStore::create_build",
    skip(self, build),
    fields(user_id = build.user_id, component_count = build.components.len()),
    err(Display)
  )]
  async fn create_build(&self, build: NewBuild) -> BuildResult<BuildId> {
    let mut tx = self
      .pool
      .begin()
      .await
      .map_err(|e| build_failure("begin build transaction", e))?;

    let build_id: BuildId = sqlx::query_scalar(
      "INSERT INTO builds (user_id, name, description, total_price_cents) VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(build.user_id)
    .bind(&build.name)
    .bind(&build.description)
    .bind(build.total_price_cents)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| build_failure("insert build", e))?;

    for r in &build.components {
      sqlx::query("INSERT INTO build_components (build_id, category, component_id) VALUES ($1, $2, $3)")
        .bind(build_id)
        .bind(r.category.key())
        .bind(r.component_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| build_failure("insert build component", e))?;
    }

    // Dropping `tx` on any early return above rolls the header back.
    tx.commit().await.map_err(|e| build_failure("commit build", e))?;
    info!(build_id, "Build persisted.");
    Ok(build_id)
  }

  #[instrument(name = "PgBuildStore::list_builds", skip(self), err(Display))]
  async fn list_builds(&self, user_id: UserId) -> BuildResult<Vec<SavedBuild>> {
    let headers = sqlx::query_as::<_, BuildRow>(
      "SELECT id, user_id, name, description, total_price_cents, created_at \
       FROM builds WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
    )
    .bind(user_id)
    .fetch_all(&self.pool)
    .await
    .map_err(|e| build_failure("list builds", e))?;

    let ids: Vec<BuildId> = headers.iter().map(|h| h.id).collect();
    let mut refs = self.refs_by_build(&ids).await?;

    let mut saved = Vec::with_capacity(headers.len());
    for header in headers {
      let build_refs = refs.remove(&header.id).unwrap_or_default();
      let (components, missing) = resolve_refs(&self.catalog, &build_refs).await?;
      if !missing.is_empty() {
        warn!(build_id = header.id, missing = missing.len(), "Build references deleted components.");
      }
      saved.push(SavedBuild {
        id: header.id,
        user_id: header.user_id,
        name: header.name,
        description: header.description,
        total_price_cents: header.total_price_cents,
        created_at: header.created_at,
        components,
        missing,
      });
    }
    Ok(saved)
  }

  #[instrument(name = "PgBuildStore::delete_build", skip(self), err(Display))]
  async fn delete_build(&self, build_id: BuildId, requester: Requester) -> BuildResult<()> {
    let result = sqlx::query("DELETE FROM builds WHERE id = $1 AND (user_id = $2 OR $3)")
      .bind(build_id)
      .bind(requester.user_id)
      .bind(requester.role == Role::Admin)
      .execute(&self.pool)
      .await
      .map_err(|e| build_failure("delete build", e))?;
    if result.rows_affected() == 0 {
      return Err(BuildError::not_found(format!("build {} not found", build_id)));
    }
    info!("Build deleted.");
    Ok(())
  }
}
