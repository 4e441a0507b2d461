// pcforge_server/src/main.rs

mod config;
mod db;
mod errors;
mod models;
mod pipelines;
mod services;
mod state;
mod web;

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::state::AppState;

use actix_web::{web as actix_data, App, HttpServer};
use pcforge::Flows;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(60 * 60);

fn startup_error(context: &str, err: impl std::fmt::Display) -> std::io::Error {
  tracing::error!(error = %err, "{}", context);
  std::io::Error::new(std::io::ErrorKind::Other, format!("{}: {}", context, err))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_span_events(FmtSpan::CLOSE)
    .init();

  tracing::info!("Starting PC builder server...");

  let app_config = Arc::new(AppConfig::from_env().map_err(|e| startup_error("Failed to load configuration", e))?);

  let db_pool = db::connect(&app_config)
    .await
    .map_err(|e| startup_error("Failed to connect to the database", e))?;
  tracing::info!("Connected to the database.");

  if let Some(email) = &app_config.bootstrap_admin_email {
    match db::users::promote_to_admin(&db_pool, email).await {
      Ok(true) => tracing::info!(%email, "Bootstrap admin promoted."),
      Ok(false) => tracing::warn!(%email, "Bootstrap admin account does not exist yet."),
      Err(e) => tracing::warn!(error = %e, "Could not promote bootstrap admin."),
    }
  }
  if let Some(origin) = &app_config.cors_allowed_origin {
    tracing::info!(%origin, "CORS is expected to be handled by the fronting proxy.");
  }

  let purge_pool = db_pool.clone();
  tokio::spawn(async move {
    let mut ticker = tokio::time::interval(SESSION_PURGE_INTERVAL);
    loop {
      ticker.tick().await;
      if let Err(e) = db::sessions::purge_expired(&purge_pool).await {
        tracing::warn!(error = %e, "Could not purge expired sessions.");
      }
    }
  });

  let flows = Arc::new(Flows::<AppError>::new());
  let app_state = AppState::new(db_pool, flows.clone(), app_config.clone());
  pipelines::register_all_pipelines(&flows, &app_state);

  let server_address = app_config.bind_address();
  tracing::info!("Binding server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(web::configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
