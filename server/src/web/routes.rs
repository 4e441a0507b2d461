// pcforge_server/src/web/routes.rs

use crate::errors::AppError;
use crate::web::handlers::{admin_handlers, auth_handlers, build_handlers, component_handlers};
use actix_web::error::JsonPayloadError;
use actix_web::{web, HttpRequest};

async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// Body decoding failures answer with the same `{"error"}` shape as every other error.
fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
  AppError::Validation(format!("Invalid JSON body: {}", err)).into()
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.app_data(web::JsonConfig::default().error_handler(json_error));
  cfg.service(
    web::scope("/api")
      .route("/health", web::get().to(health_check_handler))
      .service(
        web::scope("/auth")
          .route("/register", web::post().to(auth_handlers::register_handler))
          .route("/login", web::post().to(auth_handlers::login_handler))
          .route("/me", web::get().to(auth_handlers::me_handler)),
      )
      .service(web::scope("/users").route("/profile", web::put().to(auth_handlers::update_profile_handler)))
      .service(
        web::scope("/components")
          .route("/{category}", web::get().to(component_handlers::list_components_handler))
          .route("/{category}/{id}", web::get().to(component_handlers::get_component_handler)),
      )
      .route(
        "/compatibility/{category}/{id}/{target}",
        web::get().to(component_handlers::compatible_components_handler),
      )
      .service(
        web::scope("/builds")
          .route("/evaluate", web::post().to(build_handlers::evaluate_build_handler))
          .route("", web::post().to(build_handlers::save_build_handler))
          .route("", web::get().to(build_handlers::list_builds_handler))
          .route("/{id}", web::delete().to(build_handlers::delete_build_handler)),
      )
      .service(
        web::scope("/admin")
          .route("/users", web::get().to(admin_handlers::list_users_handler))
          .route("/users/{id}", web::delete().to(admin_handlers::delete_user_handler))
          .route("/builds", web::get().to(admin_handlers::list_all_builds_handler))
          .route("/builds/{id}", web::delete().to(admin_handlers::delete_any_build_handler))
          .route("/components/{category}", web::post().to(admin_handlers::create_component_handler))
          .route("/components/{category}/{id}", web::put().to(admin_handlers::update_component_handler))
          .route("/components/{category}/{id}", web::delete().to(admin_handlers::delete_component_handler)),
      ),
  );
}

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::{http::StatusCode, test, App};

  #[actix_web::test]
  async fn health_check_answers_without_state() {
    let app = test::init_service(App::new().configure(configure_app_routes)).await;
    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "ok");
  }

  #[::core::prelude::v1::test]
  fn json_body_errors_are_validation_failures() {
    let req = test::TestRequest::default().to_http_request();
    let err = json_error(JsonPayloadError::ContentType, &req);
    assert_eq!(err.as_response_error().status_code(), StatusCode::BAD_REQUEST);
  }

  #[actix_web::test]
  async fn protected_route_without_token_is_unauthorized() {
    let app = test::init_service(App::new().configure(configure_app_routes)).await;
    let req = test::TestRequest::get().uri("/api/builds").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }

  #[actix_web::test]
  async fn admin_route_without_token_is_unauthorized() {
    let app = test::init_service(App::new().configure(configure_app_routes)).await;
    let req = test::TestRequest::get().uri("/api/admin/users").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }
}
