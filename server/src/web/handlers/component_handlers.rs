// pcforge_server/src/web/handlers/component_handlers.rs

use super::parse_category;
use crate::errors::AppError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use pcforge::{CatalogSource, ComponentId};
use tracing::{debug, instrument};

#[instrument(name = "handler::list_components", skip(app_state))]
pub async fn list_components_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let category = parse_category(&path)?;
  let components = app_state.catalog.list_components(category).await?;
  debug!(%category, count = components.len(), "Listed catalog category.");
  Ok(HttpResponse::Ok().json(components))
}

#[instrument(name = "handler::get_component", skip(app_state))]
pub async fn get_component_handler(
  app_state: web::Data<AppState>,
  path: web::Path<(String, ComponentId)>,
) -> Result<HttpResponse, AppError> {
  let (raw_category, id) = path.into_inner();
  let category = parse_category(&raw_category)?;
  let component = app_state.catalog.get_component(category, id).await?;
  Ok(HttpResponse::Ok().json(component))
}

/// `GET /compatibility/{category}/{id}/{target}`: entries of `target` that
/// share a socket with the given CPU or motherboard.
#[instrument(name = "handler::compatible_components", skip(app_state))]
pub async fn compatible_components_handler(
  app_state: web::Data<AppState>,
  path: web::Path<(String, ComponentId, String)>,
) -> Result<HttpResponse, AppError> {
  let (raw_category, id, raw_target) = path.into_inner();
  let category = parse_category(&raw_category)?;
  let target = parse_category(&raw_target)?;
  let partners = app_state.catalog.socket_partners(category, id, target).await?;
  Ok(HttpResponse::Ok().json(partners))
}
