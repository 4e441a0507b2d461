// pcforge_server/src/models/build.rs

use chrono::{DateTime, Utc};
use pcforge::{BuildId, ComponentId, UserId};
use serde::Serialize;
use sqlx::FromRow;

/// A `builds` row without its components.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct BuildRow {
  pub id: BuildId,
  pub user_id: UserId,
  pub name: String,
  pub description: Option<String>,
  pub total_price_cents: i64,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct BuildComponentRow {
  pub build_id: BuildId,
  /// Category key, e.g. `cpu`.
  pub category: String,
  pub component_id: ComponentId,
}

/// Admin listing row: a build header joined with its owner.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OwnedBuildRow {
  pub id: BuildId,
  pub user_id: UserId,
  pub name: String,
  pub description: Option<String>,
  pub total_price_cents: i64,
  pub created_at: DateTime<Utc>,
  pub user_name: String,
  pub user_email: String,
}
