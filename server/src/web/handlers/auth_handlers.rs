// pcforge_server/src/web/handlers/auth_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::db;
use crate::db::users::ProfileChanges;
use crate::errors::AppError;
use crate::pipelines::common_steps::{normalize_email, validate_email, validate_new_password};
use crate::pipelines::contexts::{LoginCtxData, RegisterCtxData};
use crate::services::auth_service;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;
use pcforge::{ContextData, PipelineResult};

#[derive(Deserialize, Debug)]
pub struct RegisterRequestPayload {
  pub name: String,
  pub email: String,
  pub password: String,
}

#[derive(Deserialize, Debug)]
pub struct LoginRequestPayload {
  pub email: String,
  pub password: String,
}

#[derive(Deserialize, Debug, Default)]
pub struct UpdateProfilePayload {
  pub name: Option<String>,
  pub email: Option<String>,
  pub password: Option<String>,
}

#[instrument(name = "handler::register", skip(app_state, req_payload), fields(req_email = %req_payload.email))]
pub async fn register_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<RegisterRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let payload = req_payload.into_inner();
  let ctx_data = ContextData::new(RegisterCtxData::new(
    app_state.get_ref().clone(),
    payload.name,
    payload.email,
    payload.password,
  ));

  match app_state.flows.run(ctx_data.clone()).await? {
    PipelineResult::Completed => {
      let guard = ctx_data.read();
      let (user, token) = match (&guard.created_user, &guard.token) {
        (Some(user), Some(token)) => (user, token),
        _ => return Err(AppError::Internal("Registration completed without a user or token.".to_string())),
      };
      info!(user_id = user.id, "Registration succeeded.");
      Ok(HttpResponse::Created().json(json!({
        "user": user,
        "token": token.token,
        "expires_at": token.expires_at,
      })))
    }
    PipelineResult::Stopped => {
      warn!("Registration pipeline was stopped by a handler.");
      Err(AppError::Internal("Registration was halted by an internal step.".to_string()))
    }
  }
}

#[instrument(name = "handler::login", skip(app_state, req_payload), fields(req_email = %req_payload.email))]
pub async fn login_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<LoginRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let payload = req_payload.into_inner();
  let ctx_data = ContextData::new(LoginCtxData::new(app_state.get_ref().clone(), payload.email, payload.password));

  match app_state.flows.run(ctx_data.clone()).await? {
    PipelineResult::Completed => {
      let guard = ctx_data.read();
      let (user, token) = match (&guard.user, &guard.token) {
        (Some(user), Some(token)) => (user, token),
        _ => return Err(AppError::Internal("Login completed without a user or token.".to_string())),
      };
      info!(user_id = user.id, "Login succeeded.");
      Ok(HttpResponse::Ok().json(json!({
        "user": user,
        "token": token.token,
        "expires_at": token.expires_at,
      })))
    }
    PipelineResult::Stopped => {
      warn!("Login pipeline was stopped by a handler.");
      Err(AppError::InvalidCredential("Authentication was unexpectedly halted.".to_string()))
    }
  }
}

#[instrument(name = "handler::me", skip(auth), fields(user_id = auth.user.id))]
pub async fn me_handler(auth: AuthenticatedUser) -> Result<HttpResponse, AppError> {
  Ok(HttpResponse::Ok().json(json!({ "user": auth.user })))
}

/// Turns a profile request into column changes; blank fields count as absent.
pub(crate) fn profile_changes(payload: UpdateProfilePayload) -> Result<ProfileChanges, AppError> {
  let name = payload.name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
  let email = payload.email.map(|e| normalize_email(&e)).filter(|e| !e.is_empty());
  if let Some(email) = &email {
    validate_email(email)?;
  }
  let password_hash = match payload.password.filter(|p| !p.is_empty()) {
    Some(password) => {
      validate_new_password(&password)?;
      Some(auth_service::hash_password(&password)?)
    }
    None => None,
  };
  if name.is_none() && email.is_none() && password_hash.is_none() {
    return Err(AppError::Validation("Nothing to update.".to_string()));
  }
  Ok(ProfileChanges {
    name,
    email,
    password_hash,
  })
}

#[instrument(name = "handler::update_profile", skip(app_state, auth, req_payload), fields(user_id = auth.user.id))]
pub async fn update_profile_handler(
  auth: AuthenticatedUser,
  app_state: web::Data<AppState>,
  req_payload: web::Json<UpdateProfilePayload>,
) -> Result<HttpResponse, AppError> {
  let changes = profile_changes(req_payload.into_inner())?;
  let user = db::users::update_profile(&app_state.db_pool, auth.user.id, changes).await?;
  info!("Profile updated.");
  Ok(HttpResponse::Ok().json(json!({ "user": user })))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn profile_changes_normalize_and_hash() {
    let changes = profile_changes(UpdateProfilePayload {
      name: Some("  Ada ".into()),
      email: Some(" Ada@Example.com".into()),
      password: Some("long enough".into()),
    })
    .unwrap();
    assert_eq!(changes.name.as_deref(), Some("Ada"));
    assert_eq!(changes.email.as_deref(), Some("ada@example.com"));
    let hash = changes.password_hash.unwrap();
    assert!(auth_service::verify_password(&hash, "long enough").unwrap());
  }

  #[test]
  fn empty_profile_update_is_rejected() {
    let err = profile_changes(UpdateProfilePayload {
      name: Some("   ".into()),
      ..Default::default()
    })
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
  }

  #[test]
  fn profile_update_checks_email_and_password() {
    let bad_email = UpdateProfilePayload {
      email: Some("nobody".into()),
      ..Default::default()
    };
    assert!(matches!(profile_changes(bad_email), Err(AppError::Validation(_))));
    let short_password = UpdateProfilePayload {
      password: Some("short".into()),
      ..Default::default()
    };
    assert!(matches!(profile_changes(short_password), Err(AppError::Validation(_))));
  }
}
