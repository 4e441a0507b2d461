// pcforge_server/src/db/users.rs

use crate::errors::{is_unique_violation, AppError, Result};
use crate::models::User;
use pcforge::UserId;
use sqlx::PgPool;
use tracing::{info, instrument};

const USER_COLUMNS: &str = "id, name, email, password_hash, role, created_at";

fn email_conflict(err: sqlx::Error) -> AppError {
  if is_unique_violation(&err) {
    AppError::Conflict("User with this email already exists".to_string())
  } else {
    AppError::Sqlx(err)
  }
}

#[instrument(name = "db::users::find_by_email", skip(pool), err(Display))]
pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>> {
  let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
  Ok(sqlx::query_as::<_, User>(&sql).bind(email).fetch_optional(pool).await?)
}

#[instrument(name = "db::users::insert", skip(pool, password_hash), err(Display))]
pub async fn insert(pool: &PgPool, name: &str, email: &str, password_hash: &str) -> Result<User> {
  let sql = format!("INSERT INTO users (name, email, password_hash) VALUES ($1, $2, $3) RETURNING {USER_COLUMNS}");
  let user = sqlx::query_as::<_, User>(&sql)
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .fetch_one(pool)
    .await
    .map_err(email_conflict)?;
  info!(user_id = user.id, "User created.");
  Ok(user)
}

/// Fields to change on a profile; `None` keeps the stored value.
#[derive(Debug, Default)]
pub struct ProfileChanges {
  pub name: Option<String>,
  pub email: Option<String>,
  pub password_hash: Option<String>,
}

#[instrument(name = "db::users::update_profile", skip(pool, changes), err(Display))]
pub async fn update_profile(pool: &PgPool, user_id: UserId, changes: ProfileChanges) -> Result<User> {
  let sql = format!(
    "UPDATE users SET name = COALESCE($2, name), email = COALESCE($3, email), \
     password_hash = COALESCE($4, password_hash) WHERE id = $1 RETURNING {USER_COLUMNS}"
  );
  sqlx::query_as::<_, User>(&sql)
    .bind(user_id)
    .bind(changes.name)
    .bind(changes.email)
    .bind(changes.password_hash)
    .fetch_optional(pool)
    .await
    .map_err(email_conflict)?
    .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))
}

#[instrument(name = "db::users::list", skip(pool), err(Display))]
pub async fn list(pool: &PgPool) -> Result<Vec<User>> {
  let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at, id");
  Ok(sqlx::query_as::<_, User>(&sql).fetch_all(pool).await?)
}

/// Removes the user; their builds and sessions cascade.
#[instrument(name = "db::users::delete", skip(pool), err(Display))]
pub async fn delete(pool: &PgPool, user_id: UserId) -> Result<()> {
  let result = sqlx::query("DELETE FROM users WHERE id = $1").bind(user_id).execute(pool).await?;
  if result.rows_affected() == 0 {
    return Err(AppError::NotFound(format!("User {} not found", user_id)));
  }
  info!("User deleted.");
  Ok(())
}

/// Returns whether an account with `email` existed and is now an admin.
#[instrument(name = "db::users::promote_to_admin", skip(pool), err(Display))]
pub async fn promote_to_admin(pool: &PgPool, email: &str) -> Result<bool> {
  let result = sqlx::query("UPDATE users SET role = 'admin' WHERE email = $1")
    .bind(email)
    .execute(pool)
    .await?;
  Ok(result.rows_affected() > 0)
}
