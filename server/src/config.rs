// pcforge_server/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Ten years.
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 365 * 10;

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,
  pub db_max_connections: u32,
  pub db_acquire_timeout: Duration,
  pub session_ttl: chrono::Duration,

  /// Informational only; CORS itself is left to the reverse proxy.
  pub cors_allowed_origin: Option<String>,

  /// Promoted to admin at startup when the account exists.
  pub bootstrap_admin_email: Option<String>,
}

fn parse_var<T>(name: &str, raw: Option<String>, default: T) -> Result<T>
where
  T: FromStr,
  T::Err: std::fmt::Display,
{
  match raw {
    None => Ok(default),
    Some(value) => value
      .trim()
      .parse::<T>()
      .map_err(|e| AppError::Config(format!("Invalid {}: {}", name, e))),
  }
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok();
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds the config from any variable source; `from_env` passes the process environment.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    let server_host = non_empty("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
    let server_port = parse_var("SERVER_PORT", non_empty("SERVER_PORT"), 3001u16)?;
    let database_url = non_empty("DATABASE_URL")
      .ok_or_else(|| AppError::Config("Missing environment variable 'DATABASE_URL'".to_string()))?;

    let db_max_connections = parse_var("DB_MAX_CONNECTIONS", non_empty("DB_MAX_CONNECTIONS"), 10u32)?;
    if db_max_connections == 0 {
      return Err(AppError::Config("DB_MAX_CONNECTIONS must be at least 1".to_string()));
    }
    let acquire_secs = parse_var("DB_ACQUIRE_TIMEOUT_SECS", non_empty("DB_ACQUIRE_TIMEOUT_SECS"), 5u64)?;
    let ttl_hours = parse_var("SESSION_TTL_HOURS", non_empty("SESSION_TTL_HOURS"), 24i64)?;
    if ttl_hours <= 0 || ttl_hours > MAX_SESSION_TTL_HOURS {
      return Err(AppError::Config(format!(
        "SESSION_TTL_HOURS must be between 1 and {}",
        MAX_SESSION_TTL_HOURS
      )));
    }
    let session_ttl = chrono::Duration::try_hours(ttl_hours)
      .ok_or_else(|| AppError::Config(format!("SESSION_TTL_HOURS out of range: {}", ttl_hours)))?;

    let config = Self {
      server_host,
      server_port,
      database_url,
      db_max_connections,
      db_acquire_timeout: Duration::from_secs(acquire_secs),
      session_ttl,
      cors_allowed_origin: non_empty("CORS_ALLOWED_ORIGIN"),
      bootstrap_admin_email: non_empty("BOOTSTRAP_ADMIN_EMAIL").map(|e| e.trim().to_lowercase()),
    };

    // DATABASE_URL carries credentials and is never logged.
    tracing::info!(
      host = %config.server_host,
      port = config.server_port,
      db_max_connections = config.db_max_connections,
      session_ttl_hours = ttl_hours,
      "Application configuration loaded."
    );
    Ok(config)
  }

  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;

  fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    move |name| map.get(name).cloned()
  }

  #[test]
  fn defaults_apply_when_only_database_url_is_set() {
    let config = AppConfig::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://localhost/pc")])).unwrap();
    assert_eq!(config.bind_address(), "127.0.0.1:3001");
    assert_eq!(config.db_max_connections, 10);
    assert_eq!(config.db_acquire_timeout, Duration::from_secs(5));
    assert_eq!(config.session_ttl, chrono::Duration::hours(24));
    assert!(config.bootstrap_admin_email.is_none());
  }

  #[test]
  fn missing_database_url_is_a_config_error() {
    let err = AppConfig::from_lookup(lookup_from(&[])).unwrap_err();
    assert!(matches!(err, AppError::Config(msg) if msg.contains("DATABASE_URL")));
  }

  #[test]
  fn bad_numbers_are_rejected() {
    let err = AppConfig::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://x"), ("SERVER_PORT", "http")]))
      .unwrap_err();
    assert!(matches!(err, AppError::Config(msg) if msg.contains("SERVER_PORT")));

    let err = AppConfig::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://x"), ("SESSION_TTL_HOURS", "0")]))
      .unwrap_err();
    assert!(matches!(err, AppError::Config(_)));
  }

  #[test]
  fn session_ttl_has_an_upper_bound() {
    let err = AppConfig::from_lookup(lookup_from(&[
      ("DATABASE_URL", "postgres://x"),
      ("SESSION_TTL_HOURS", "10000000000"),
    ]))
    .unwrap_err();
    assert!(matches!(err, AppError::Config(msg) if msg.contains("SESSION_TTL_HOURS")));

    let longest = MAX_SESSION_TTL_HOURS.to_string();
    let config =
      AppConfig::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://x"), ("SESSION_TTL_HOURS", longest.as_str())])).unwrap();
    assert_eq!(config.session_ttl, chrono::Duration::hours(MAX_SESSION_TTL_HOURS));
  }

  #[test]
  fn bootstrap_admin_email_is_normalized() {
    let config = AppConfig::from_lookup(lookup_from(&[
      ("DATABASE_URL", "postgres://x"),
      ("BOOTSTRAP_ADMIN_EMAIL", "  Admin@Example.com "),
    ]))
    .unwrap();
    assert_eq!(config.bootstrap_admin_email.as_deref(), Some("admin@example.com"));
  }
}
