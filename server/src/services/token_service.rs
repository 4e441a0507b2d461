// pcforge_server/src/services/token_service.rs

//! Opaque bearer tokens backed by the `sessions` table.

use crate::db;
use crate::errors::{AppError, Result};
use crate::models::User;
use chrono::{DateTime, Utc};
use pcforge::UserId;
use serde::Serialize;
use sqlx::PgPool;
use tracing::{debug, instrument};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
  pub token: String,
  pub expires_at: DateTime<Utc>,
}

#[instrument(name = "token_service::issue", skip(pool), err(Display))]
pub async fn issue(pool: &PgPool, user_id: UserId, ttl: chrono::Duration) -> Result<IssuedToken> {
  let expires_at = expiry_from(Utc::now(), ttl)?;
  let token = Uuid::new_v4().simple().to_string();
  db::sessions::insert(pool, &token, user_id, expires_at).await?;
  debug!(%expires_at, "Session token issued.");
  Ok(IssuedToken { token, expires_at })
}

/// `now + ttl`, or a configuration error when that is not a representable time.
pub fn expiry_from(now: DateTime<Utc>, ttl: chrono::Duration) -> Result<DateTime<Utc>> {
  now
    .checked_add_signed(ttl)
    .ok_or_else(|| AppError::Config(format!("Session lifetime of {} is out of range.", ttl)))
}

/// The user a live token belongs to.
#[instrument(name = "token_service::authenticate", skip_all, err(Display))]
pub async fn authenticate(pool: &PgPool, token: &str) -> Result<User> {
  db::sessions::find_user(pool, token)
    .await?
    .ok_or_else(|| AppError::InvalidCredential("Session token is invalid or expired.".to_string()))
}

/// Extracts the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: &str) -> Option<&str> {
  let (scheme, token) = header.trim().split_once(' ')?;
  if !scheme.eq_ignore_ascii_case("bearer") {
    return None;
  }
  let token = token.trim();
  (!token.is_empty()).then_some(token)
}
