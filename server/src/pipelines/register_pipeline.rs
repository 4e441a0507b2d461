// pcforge_server/src/pipelines/register_pipeline.rs

use crate::db;
use crate::errors::AppError;
use crate::pipelines::common_steps::{issue_session_token, normalize_email, validate_email, validate_new_password};
use crate::pipelines::contexts::RegisterCtxData;
use crate::services::auth_service;
use crate::state::AppState;
use pcforge::{ContextData, Flows, Pipeline, PipelineControl};
use tracing::{event, info, warn, Level};

pub fn register_registration_pipeline(flows: &Flows<AppError>, _app_state: &AppState) {
  let mut pipeline = Pipeline::<RegisterCtxData, AppError>::new(&[
    ("validate_registration_input", false, None),
    ("check_email_available", false, None),
    ("create_user", false, None),
    ("issue_session_token", false, None),
  ]);

  pipeline.on_root("validate_registration_input", |ctx_data: ContextData<RegisterCtxData>| {
    Box::pin(async move {
      let mut guard = ctx_data.write();
      guard.name = guard.name.trim().to_string();
      guard.email = normalize_email(&guard.email);

      event!(Level::DEBUG, email = %guard.email, "Validating registration input.");
      if guard.name.is_empty() {
        return Err(AppError::Validation("Name is required.".to_string()));
      }
      validate_email(&guard.email)?;
      validate_new_password(&guard.password)?;
      Ok(PipelineControl::Continue)
    })
  });

  pipeline.on_root("check_email_available", |ctx_data: ContextData<RegisterCtxData>| {
    Box::pin(async move {
      let (email, pool) = {
        let guard = ctx_data.read();
        (guard.email.clone(), guard.app_state.db_pool.clone())
      };

      if db::users::find_by_email(&pool, &email).await?.is_some() {
        warn!(%email, "Registration with an email that is already taken.");
        return Err(AppError::Conflict("User with this email already exists".to_string()));
      }
      Ok(PipelineControl::Continue)
    })
  });

  // The unique index still guards against a concurrent registration racing
  // past the check above; `db::users::insert` maps that to Conflict too.
  pipeline.on_root("create_user", |ctx_data: ContextData<RegisterCtxData>| {
    Box::pin(async move {
      let (name, email, password, pool) = {
        let guard = ctx_data.read();
        (
          guard.name.clone(),
          guard.email.clone(),
          guard.password.clone(),
          guard.app_state.db_pool.clone(),
        )
      };

      let password_hash = auth_service::hash_password(&password)?;
      let user = db::users::insert(&pool, &name, &email, &password_hash).await?;
      info!(user_id = user.id, "Registered new user.");
      ctx_data.write().created_user = Some(user);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  pipeline.on_root("issue_session_token", issue_session_token::<RegisterCtxData>);

  flows.register_pipeline(pipeline);
}
