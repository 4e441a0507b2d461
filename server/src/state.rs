// pcforge_server/src/state.rs
use crate::config::AppConfig;
use crate::db::{PgBuildStore, PgCatalog};
use crate::errors::AppError;
use pcforge::Flows;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub db_pool: PgPool,
  pub flows: Arc<Flows<AppError>>,
  pub config: Arc<AppConfig>,
  pub catalog: PgCatalog,
  pub builds: PgBuildStore,
}

impl AppState {
  pub fn new(db_pool: PgPool, flows: Arc<Flows<AppError>>, config: Arc<AppConfig>) -> Self {
    let catalog = PgCatalog::new(db_pool.clone());
    let builds = PgBuildStore::new(db_pool.clone(), catalog.clone());
    Self {
      db_pool,
      flows,
      config,
      catalog,
      builds,
    }
  }
}
