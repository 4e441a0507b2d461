// pcforge_server/src/web/extractors.rs

//! Bearer-token extractors for authenticated and admin routes.

use crate::errors::AppError;
use crate::models::User;
use crate::services::token_service::{self, bearer_token};
use crate::state::AppState;
use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use tracing::{debug, warn};

/// The signed-in user behind the request's bearer token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
  pub user: User,
}

/// An [`AuthenticatedUser`] whose role is admin.
#[derive(Debug, Clone)]
pub struct AdminUser {
  pub user: User,
}

/// The raw token, or `AuthRequired` when no credential was sent at all.
fn presented_token(req: &HttpRequest) -> Result<String, AppError> {
  let header = match req.headers().get(AUTHORIZATION) {
    Some(value) => value,
    None => return Err(AppError::AuthRequired("Sign in required.".to_string())),
  };
  header
    .to_str()
    .ok()
    .and_then(bearer_token)
    .map(str::to_string)
    .ok_or_else(|| AppError::InvalidCredential("Malformed Authorization header.".to_string()))
}

impl FromRequest for AuthenticatedUser {
  type Error = AppError;
  type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let token = presented_token(req);
    let state = req.app_data::<web::Data<AppState>>().cloned();

    Box::pin(async move {
      let token = token?;
      let state = state.ok_or_else(|| AppError::Internal("Application state is not configured.".to_string()))?;
      let user = token_service::authenticate(&state.db_pool, &token).await?;
      debug!(user_id = user.id, "Request authenticated.");
      Ok(AuthenticatedUser { user })
    })
  }
}

impl FromRequest for AdminUser {
  type Error = AppError;
  type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
    let authenticated = AuthenticatedUser::from_request(req, payload);
    Box::pin(async move {
      let AuthenticatedUser { user } = authenticated.await?;
      if !user.is_admin() {
        warn!(user_id = user.id, "Non-admin on an admin route.");
        return Err(AppError::Forbidden("Admin access required.".to_string()));
      }
      Ok(AdminUser { user })
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::test::TestRequest;

  #[test]
  fn missing_header_requires_auth() {
    let req = TestRequest::default().to_http_request();
    assert!(matches!(presented_token(&req), Err(AppError::AuthRequired(_))));
  }

  #[test]
  fn wrong_scheme_is_an_invalid_credential() {
    let req = TestRequest::default()
      .insert_header((AUTHORIZATION, "Basic YWRhOnB3"))
      .to_http_request();
    assert!(matches!(presented_token(&req), Err(AppError::InvalidCredential(_))));
  }

  #[test]
  fn bearer_token_is_extracted() {
    let req = TestRequest::default()
      .insert_header((AUTHORIZATION, "Bearer 0f1e2d3c"))
      .to_http_request();
    assert_eq!(presented_token(&req).unwrap(), "0f1e2d3c");
  }

  #[actix_web::test]
  async fn extractor_without_header_fails_before_touching_state() {
    let req = TestRequest::default().to_http_request();
    let result = AuthenticatedUser::extract(&req).await;
    assert!(matches!(result, Err(AppError::AuthRequired(_))));
  }
}
