// pcforge_server/src/pipelines/login_pipeline.rs

use crate::db;
use crate::errors::AppError;
use crate::pipelines::common_steps::{issue_session_token, normalize_email};
use crate::pipelines::contexts::LoginCtxData;
use crate::services::auth_service;
use crate::state::AppState;
use pcforge::{ContextData, Flows, Pipeline, PipelineControl};
use tracing::{event, info, warn, Level};

const BAD_LOGIN: &str = "Invalid email or password.";

pub fn register_login_pipeline(flows: &Flows<AppError>, _app_state: &AppState) {
  let mut pipeline = Pipeline::<LoginCtxData, AppError>::new(&[
    ("validate_login_input", false, None),
    ("fetch_user_by_email", false, None),
    ("verify_user_password", false, None),
    ("issue_session_token", false, None),
  ]);

  pipeline.on_root("validate_login_input", |ctx_data: ContextData<LoginCtxData>| {
    Box::pin(async move {
      let mut guard = ctx_data.write();
      guard.email = normalize_email(&guard.email);
      if guard.email.is_empty() || guard.password.is_empty() {
        return Err(AppError::Validation("Email and password are required.".to_string()));
      }
      Ok(PipelineControl::Continue)
    })
  });

  pipeline.on_root("fetch_user_by_email", |ctx_data: ContextData<LoginCtxData>| {
    Box::pin(async move {
      let (email, pool) = {
        let guard = ctx_data.read();
        (guard.email.clone(), guard.app_state.db_pool.clone())
      };

      event!(Level::DEBUG, %email, "Looking up user for login.");
      match db::users::find_by_email(&pool, &email).await? {
        Some(user) => {
          ctx_data.write().user = Some(user);
          Ok(PipelineControl::Continue)
        }
        None => {
          warn!(%email, "Login for unknown email.");
          Err(AppError::InvalidCredential(BAD_LOGIN.to_string()))
        }
      }
    })
  });

  pipeline.on_root("verify_user_password", |ctx_data: ContextData<LoginCtxData>| {
    Box::pin(async move {
      let guard = ctx_data.read();
      let user = guard
        .user
        .as_ref()
        .ok_or_else(|| AppError::Internal("Password check ran without a user.".to_string()))?;

      if !auth_service::verify_password(&user.password_hash, &guard.password)? {
        warn!(user_id = user.id, "Login with a wrong password.");
        return Err(AppError::InvalidCredential(BAD_LOGIN.to_string()));
      }
      info!(user_id = user.id, "Password verified.");
      Ok(PipelineControl::Continue)
    })
  });

  pipeline.on_root("issue_session_token", issue_session_token::<LoginCtxData>);

  flows.register_pipeline(pipeline);
}
