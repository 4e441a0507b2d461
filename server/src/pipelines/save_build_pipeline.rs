// pcforge_server/src/pipelines/save_build_pipeline.rs

//! Saving a build: check the request, look every reference up in the
//! catalog, price it from catalog prices, then persist it through a
//! `BuildSession` so the same checks apply as for an interactive save.

use crate::errors::{AppError, Result as AppResult};
use crate::pipelines::contexts::SaveBuildCtxData;
use crate::state::AppState;
use pcforge::build::session::MAX_BUILD_NAME_CHARS;
use pcforge::{
  total_price_cents, BuildParts, BuildSession, CatalogSource, Component, ComponentRef, ContextData, Flows, Pipeline,
  PipelineControl,
};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Name rules, at least one reference, and at most one per category.
pub fn check_build_request(name: &str, refs: &[ComponentRef]) -> AppResult<()> {
  let name = name.trim();
  if name.is_empty() {
    return Err(AppError::Validation("Build name must not be empty.".to_string()));
  }
  if name.chars().count() > MAX_BUILD_NAME_CHARS {
    return Err(AppError::Validation(format!(
      "Build name must be at most {} characters.",
      MAX_BUILD_NAME_CHARS
    )));
  }
  if refs.is_empty() {
    return Err(AppError::Validation("Select at least one component before saving.".to_string()));
  }

  let mut seen = HashSet::new();
  for r in refs {
    if !seen.insert(r.category) {
      return Err(AppError::Validation(format!("More than one {} selected.", r.category)));
    }
  }
  Ok(())
}

/// The total from catalog prices. A differing client total is only logged.
pub fn catalog_total(components: &[Component], client_total_cents: Option<i64>) -> i64 {
  let total = total_price_cents(&BuildParts::from_components(components.iter().cloned()));
  if let Some(client_total) = client_total_cents {
    if client_total != total {
      warn!(client_total, catalog_total = total, "Client total differs from catalog prices; using catalog.");
    }
  }
  total
}

pub fn register_save_build_pipeline(flows: &Flows<AppError>, _app_state: &AppState) {
  let mut pipeline = Pipeline::<SaveBuildCtxData, AppError>::new(&[
    ("validate_build_request", false, None),
    ("resolve_build_components", false, None),
    ("price_build", false, None),
    ("persist_build", false, None),
  ]);

  pipeline.on_root("validate_build_request", |ctx_data: ContextData<SaveBuildCtxData>| {
    Box::pin(async move {
      let guard = ctx_data.read();
      check_build_request(&guard.name, &guard.refs)?;
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  pipeline.on_root("resolve_build_components", |ctx_data: ContextData<SaveBuildCtxData>| {
    Box::pin(async move {
      let (refs, catalog) = {
        let guard = ctx_data.read();
        (guard.refs.clone(), guard.app_state.catalog.clone())
      };

      let mut components = Vec::with_capacity(refs.len());
      for r in &refs {
        // Any missing reference fails the save with NotFound.
        components.push(catalog.get_component(r.category, r.component_id).await?);
      }
      debug!(count = components.len(), "Build components resolved.");
      ctx_data.write().components = components;
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  pipeline.on_root("price_build", |ctx_data: ContextData<SaveBuildCtxData>| {
    Box::pin(async move {
      let mut guard = ctx_data.write();
      guard.total_price_cents = catalog_total(&guard.components, guard.client_total_cents);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  pipeline.on_root("persist_build", |ctx_data: ContextData<SaveBuildCtxData>| {
    Box::pin(async move {
      let (session, store, name, description) = {
        let guard = ctx_data.read();
        let mut session = BuildSession::for_user(guard.user_id);
        for component in guard.components.iter().cloned() {
          session.select(component);
        }
        (
          session,
          guard.app_state.builds.clone(),
          guard.name.clone(),
          guard.description.clone(),
        )
      };

      let build_id = session.save(&store, &name, description.as_deref()).await?;
      info!(build_id, total_price_cents = session.summary().total_price_cents, "Build saved.");
      ctx_data.write().build_id = Some(build_id);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  flows.register_pipeline(pipeline);
}
