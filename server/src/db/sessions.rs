// pcforge_server/src/db/sessions.rs

use crate::errors::Result;
use crate::models::User;
use chrono::{DateTime, Utc};
use pcforge::UserId;
use sqlx::PgPool;
use tracing::{debug, instrument};

#[instrument(name = "db::sessions::insert", skip(pool, token), err(Display))]
pub async fn insert(pool: &PgPool, token: &str, user_id: UserId, expires_at: DateTime<Utc>) -> Result<()> {
  sqlx::query("INSERT INTO sessions (token, user_id, expires_at) VALUES ($1, $2, $3)")
    .bind(token)
    .bind(user_id)
    .bind(expires_at)
    .execute(pool)
    .await?;
  Ok(())
}

/// The owner of an unexpired session.
#[instrument(name = "db::sessions::find_user", skip_all, err(Display))]
pub async fn find_user(pool: &PgPool, token: &str) -> Result<Option<User>> {
  Ok(
    sqlx::query_as::<_, User>(
      "SELECT u.id, u.name, u.email, u.password_hash, u.role, u.created_at \
       FROM sessions s JOIN users u ON s.user_id = u.id \
       WHERE s.token = $1 AND s.expires_at > now()",
    )
    .bind(token)
    .fetch_optional(pool)
    .await?,
  )
}

#[instrument(name = "db::sessions::purge_expired", skip(pool), err(Display))]
pub async fn purge_expired(pool: &PgPool) -> Result<u64> {
  let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= now()").execute(pool).await?;
  debug!(purged = result.rows_affected(), "Expired sessions purged.");
  Ok(result.rows_affected())
}
