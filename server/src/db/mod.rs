// pcforge_server/src/db/mod.rs

//! Postgres adapters: the catalog and build store contracts from `pcforge`,
//! plus the user and session tables the HTTP layer needs.

pub mod builds;
pub mod catalog;
pub mod sessions;
pub mod users;

pub use builds::PgBuildStore;
pub use catalog::PgCatalog;

use crate::config::AppConfig;
use crate::errors::is_unavailable;
use pcforge::BuildError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{error, instrument};

#[instrument(name = "db::connect", skip(config), fields(max_connections = config.db_max_connections))]
pub async fn connect(config: &AppConfig) -> Result<PgPool, sqlx::Error> {
  PgPoolOptions::new()
    .max_connections(config.db_max_connections)
    .acquire_timeout(config.db_acquire_timeout)
    .connect(&config.database_url)
    .await
}

/// Translates a database failure into the core taxonomy for the store traits.
pub(crate) fn build_failure(context: &str, err: sqlx::Error) -> BuildError {
  error!(error = %err, context, "Database operation failed.");
  if is_unavailable(&err) {
    BuildError::UpstreamUnavailable(format!("{}: database unavailable", context))
  } else if matches!(err, sqlx::Error::RowNotFound) {
    BuildError::not_found(context.to_string())
  } else {
    BuildError::PersistenceFailure(format!("{}: {}", context, err))
  }
}
