// pcforge_server/src/web/handlers/build_handlers.rs

use crate::errors::AppError;
use crate::pipelines::contexts::SaveBuildCtxData;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;
use actix_web::{web, HttpResponse};
use pcforge::store::resolve_refs;
use pcforge::{evaluate, BuildId, BuildParts, BuildStore, ComponentRef, ContextData, PipelineResult};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};

#[derive(Deserialize, Debug)]
pub struct EvaluateRequestPayload {
  pub components: Vec<ComponentRef>,
}

#[derive(Deserialize, Debug)]
pub struct SaveBuildRequestPayload {
  pub name: String,
  #[serde(default)]
  pub description: Option<String>,
  pub components: Vec<ComponentRef>,
  #[serde(default)]
  pub total_price_cents: Option<i64>,
}

/// Runs the engine over catalog references. References that no longer
/// resolve are reported under `missing` and left out of the summary.
#[instrument(name = "handler::evaluate_build", skip(app_state, req_payload), fields(ref_count = req_payload.components.len()))]
pub async fn evaluate_build_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<EvaluateRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let (components, missing) = resolve_refs(&app_state.catalog, &req_payload.components).await?;
  let summary = evaluate(&BuildParts::from_components(components));
  Ok(HttpResponse::Ok().json(json!({ "summary": summary, "missing": missing })))
}

#[instrument(
  name = "handler::save_build",
  skip(app_state, auth, req_payload),
  fields(user_id = auth.user.id, ref_count = req_payload.components.len())
)]
pub async fn save_build_handler(
  auth: AuthenticatedUser,
  app_state: web::Data<AppState>,
  req_payload: web::Json<SaveBuildRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let payload = req_payload.into_inner();
  let ctx_data = ContextData::new(SaveBuildCtxData::new(
    app_state.get_ref().clone(),
    auth.user.id,
    payload.name,
    payload.description,
    payload.components,
    payload.total_price_cents,
  ));

  match app_state.flows.run(ctx_data.clone()).await? {
    PipelineResult::Completed => {
      let guard = ctx_data.read();
      let build_id = guard
        .build_id
        .ok_or_else(|| AppError::Internal("Save completed without a build id.".to_string()))?;
      info!(build_id, "Build saved.");
      Ok(HttpResponse::Created().json(json!({
        "id": build_id,
        "total_price_cents": guard.total_price_cents,
      })))
    }
    PipelineResult::Stopped => {
      warn!("Save-build pipeline was stopped by a handler.");
      Err(AppError::Internal("Saving was halted by an internal step.".to_string()))
    }
  }
}

#[instrument(name = "handler::list_builds", skip(app_state, auth), fields(user_id = auth.user.id))]
pub async fn list_builds_handler(
  auth: AuthenticatedUser,
  app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
  let builds = app_state.builds.list_builds(auth.user.id).await?;
  Ok(HttpResponse::Ok().json(builds))
}

#[instrument(name = "handler::delete_build", skip(app_state, auth), fields(user_id = auth.user.id))]
pub async fn delete_build_handler(
  auth: AuthenticatedUser,
  app_state: web::Data<AppState>,
  path: web::Path<BuildId>,
) -> Result<HttpResponse, AppError> {
  app_state.builds.delete_build(path.into_inner(), auth.user.requester()).await?;
  Ok(HttpResponse::NoContent().finish())
}
