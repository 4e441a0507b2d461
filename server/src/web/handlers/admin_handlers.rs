// pcforge_server/src/web/handlers/admin_handlers.rs

use super::parse_category;
use crate::db;
use crate::db::catalog::decode_body;
use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AdminUser;
use actix_web::{web, HttpResponse};
use pcforge::{BuildId, BuildStore, ComponentId, UserId};
use serde_json::Value;
use tracing::{info, instrument};

#[instrument(name = "handler::admin_list_users", skip(app_state, admin), fields(admin_id = admin.user.id))]
pub async fn list_users_handler(admin: AdminUser, app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let users = db::users::list(&app_state.db_pool).await?;
  Ok(HttpResponse::Ok().json(users))
}

#[instrument(name = "handler::admin_delete_user", skip(app_state, admin), fields(admin_id = admin.user.id))]
pub async fn delete_user_handler(
  admin: AdminUser,
  app_state: web::Data<AppState>,
  path: web::Path<UserId>,
) -> Result<HttpResponse, AppError> {
  let user_id = path.into_inner();
  if user_id == admin.user.id {
    return Err(AppError::Validation("Admins cannot delete their own account.".to_string()));
  }
  db::users::delete(&app_state.db_pool, user_id).await?;
  info!(user_id, "User removed by admin.");
  Ok(HttpResponse::NoContent().finish())
}

#[instrument(name = "handler::admin_list_builds", skip(app_state, admin), fields(admin_id = admin.user.id))]
pub async fn list_all_builds_handler(admin: AdminUser, app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let builds = app_state.builds.list_all_with_owner().await?;
  Ok(HttpResponse::Ok().json(builds))
}

#[instrument(name = "handler::admin_delete_build", skip(app_state, admin), fields(admin_id = admin.user.id))]
pub async fn delete_any_build_handler(
  admin: AdminUser,
  app_state: web::Data<AppState>,
  path: web::Path<BuildId>,
) -> Result<HttpResponse, AppError> {
  app_state.builds.delete_build(path.into_inner(), admin.user.requester()).await?;
  Ok(HttpResponse::NoContent().finish())
}

#[instrument(name = "handler::admin_create_component", skip(app_state, admin, body), fields(admin_id = admin.user.id))]
pub async fn create_component_handler(
  admin: AdminUser,
  app_state: web::Data<AppState>,
  path: web::Path<String>,
  body: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
  let category = parse_category(&path)?;
  let component = decode_body(category, body.into_inner())?;
  let created = app_state.catalog.create_component(category, &component).await?;
  Ok(HttpResponse::Created().json(created))
}

#[instrument(name = "handler::admin_update_component", skip(app_state, admin, body), fields(admin_id = admin.user.id))]
pub async fn update_component_handler(
  admin: AdminUser,
  app_state: web::Data<AppState>,
  path: web::Path<(String, ComponentId)>,
  body: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
  let (raw_category, id) = path.into_inner();
  let category = parse_category(&raw_category)?;
  let component = decode_body(category, body.into_inner())?;
  let updated = app_state.catalog.update_component(category, id, &component).await?;
  Ok(HttpResponse::Ok().json(updated))
}

#[instrument(name = "handler::admin_delete_component", skip(app_state, admin), fields(admin_id = admin.user.id))]
pub async fn delete_component_handler(
  admin: AdminUser,
  app_state: web::Data<AppState>,
  path: web::Path<(String, ComponentId)>,
) -> Result<HttpResponse, AppError> {
  let (raw_category, id) = path.into_inner();
  let category = parse_category(&raw_category)?;
  app_state.catalog.delete_component(category, id).await?;
  Ok(HttpResponse::NoContent().finish())
}
