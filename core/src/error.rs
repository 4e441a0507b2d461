// pcforge/src/error.rs
use thiserror::Error;

/// Failures of the operations around the build engine (saving, loading,
/// catalog lookups). The engine itself never produces one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
  /// A submission field is missing or malformed.
  #[error("Validation failed: {0}")]
  ValidationFailure(String),

  /// A personal or mutating operation was attempted without a signed-in user
  /// or with a credential that did not check out.
  #[error("Authentication required: {0}")]
  AuthRequired(String),

  #[error("Not found: {0}")]
  NotFound(String),

  /// A transactional write did not complete. Nothing was left behind.
  #[error("Persistence failed: {0}")]
  PersistenceFailure(String),

  /// A collaborator did not answer.
  #[error("Upstream unavailable: {0}")]
  UpstreamUnavailable(String),
}

impl BuildError {
  pub fn validation(message: impl Into<String>) -> Self {
    BuildError::ValidationFailure(message.into())
  }

  pub fn not_found(message: impl Into<String>) -> Self {
    BuildError::NotFound(message.into())
  }
}

pub type BuildResult<T, E = BuildError> = std::result::Result<T, E>;
