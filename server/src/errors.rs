// pcforge_server/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use pcforge::{BuildError, FlowError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  /// No credential was presented.
  #[error("Authentication Required: {0}")]
  AuthRequired(String),

  /// A credential was presented but is unknown, expired or wrong.
  #[error("Invalid Credential: {0}")]
  InvalidCredential(String),

  #[error("Forbidden: {0}")]
  Forbidden(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Conflict: {0}")]
  Conflict(String),

  #[error("Persistence Failure: {0}")]
  Persistence(String),

  #[error("Upstream Unavailable: {0}")]
  Upstream(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Workflow Error: {source}")]
  Workflow {
    #[from]
    source: FlowError,
  },

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl From<BuildError> for AppError {
  fn from(err: BuildError) -> Self {
    match err {
      BuildError::ValidationFailure(m) => AppError::Validation(m),
      BuildError::AuthRequired(m) => AppError::AuthRequired(m),
      BuildError::NotFound(m) => AppError::NotFound(m),
      BuildError::PersistenceFailure(m) => AppError::Persistence(m),
      BuildError::UpstreamUnavailable(m) => AppError::Upstream(m),
    }
  }
}

impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    match err.downcast::<sqlx::Error>() {
      Ok(sqlx_err) => AppError::Sqlx(sqlx_err),
      Err(other) => match other.downcast::<BuildError>() {
        Ok(build_err) => build_err.into(),
        Err(other) => AppError::Internal(other.to_string()),
      },
    }
  }
}

/// Pool exhaustion and broken connections mean the database did not answer.
pub fn is_unavailable(err: &sqlx::Error) -> bool {
  matches!(
    err,
    sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) | sqlx::Error::WorkerCrashed
  )
}

/// Postgres `unique_violation`.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
  match err {
    sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some("23505"),
    _ => false,
  }
}

impl AppError {
  fn public_message(&self) -> String {
    match self {
      AppError::Validation(m)
      | AppError::AuthRequired(m)
      | AppError::InvalidCredential(m)
      | AppError::Forbidden(m)
      | AppError::NotFound(m)
      | AppError::Conflict(m) => m.clone(),
      AppError::Upstream(_) => "Service temporarily unavailable".to_string(),
      AppError::Sqlx(e) if is_unavailable(e) => "Service temporarily unavailable".to_string(),
      AppError::Persistence(_) | AppError::Sqlx(_) => "Database operation failed".to_string(),
      AppError::Workflow { source } => match source {
        FlowError::HandlerError { source } => match source.downcast_ref::<BuildError>() {
          Some(build_err) => build_err.to_string(),
          None => "Workflow processing error".to_string(),
        },
        _ => "Workflow processing error".to_string(),
      },
      AppError::Config(_) | AppError::Internal(_) => "An internal error occurred".to_string(),
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation(_) => StatusCode::BAD_REQUEST,
      AppError::AuthRequired(_) | AppError::InvalidCredential(_) => StatusCode::UNAUTHORIZED,
      AppError::Forbidden(_) => StatusCode::FORBIDDEN,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::Conflict(_) => StatusCode::CONFLICT,
      AppError::Upstream(_) => StatusCode::SERVICE_UNAVAILABLE,
      AppError::Sqlx(e) if is_unavailable(e) => StatusCode::SERVICE_UNAVAILABLE,
      AppError::Sqlx(sqlx::Error::RowNotFound) => StatusCode::NOT_FOUND,
      AppError::Persistence(_)
      | AppError::Sqlx(_)
      | AppError::Workflow { .. }
      | AppError::Config(_)
      | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    tracing::error!(application_error = %self, status = self.status_code().as_u16(), "Responding with error");
    HttpResponse::build(self.status_code()).json(json!({ "error": self.public_message() }))
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
