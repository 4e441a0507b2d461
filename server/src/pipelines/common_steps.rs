// pcforge_server/src/pipelines/common_steps.rs

use crate::errors::{AppError, Result as AppResult};
use crate::pipelines::contexts::TokenRecipient;
use crate::services::{auth_service, token_service};
use pcforge::{ContextData, PipelineControl};
use tracing::{info, instrument};

/// Issues a session token for the context's user and stores it back.
#[instrument(name = "common_step::issue_session_token", skip(ctx_data), err(Display))]
pub async fn issue_session_token<T>(ctx_data: ContextData<T>) -> AppResult<PipelineControl>
where
  T: TokenRecipient + Send + Sync + 'static,
{
  let (user_id, pool, ttl) = {
    let guard = ctx_data.read();
    let state = guard.app_state();
    (guard.token_subject(), state.db_pool.clone(), state.config.session_ttl)
  };
  let user_id =
    user_id.ok_or_else(|| AppError::Internal("No user available to issue a session token for.".to_string()))?;

  let issued = token_service::issue(&pool, user_id, ttl).await?;
  info!(user_id, expires_at = %issued.expires_at, "Session token issued.");
  ctx_data.write().store_token(issued);
  Ok(PipelineControl::Continue)
}

/// Trims and lowercases an email address.
pub fn normalize_email(raw: &str) -> String {
  raw.trim().to_lowercase()
}

/// A loose shape check: one `@` with something on both sides.
pub fn validate_email(email: &str) -> AppResult<()> {
  match email.split_once('@') {
    Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => Ok(()),
    _ => Err(AppError::Validation("A valid email address is required.".to_string())),
  }
}

pub fn validate_new_password(password: &str) -> AppResult<()> {
  if password.chars().count() < auth_service::MIN_PASSWORD_CHARS {
    return Err(AppError::Validation(format!(
      "Password must be at least {} characters long.",
      auth_service::MIN_PASSWORD_CHARS
    )));
  }
  Ok(())
}
