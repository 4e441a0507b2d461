// pcforge_server/src/pipelines/mod.rs

//! The service's step pipelines and their registration.

use crate::errors::AppError;
use crate::state::AppState;
use pcforge::Flows;

pub mod common_steps;
pub mod contexts;

pub mod login_pipeline;
pub mod register_pipeline;
pub mod save_build_pipeline;

/// Registers every pipeline with `flows`. Called once at startup.
pub fn register_all_pipelines(flows: &Flows<AppError>, app_state: &AppState) {
  register_pipeline::register_registration_pipeline(flows, app_state);
  login_pipeline::register_login_pipeline(flows, app_state);
  save_build_pipeline::register_save_build_pipeline(flows, app_state);
  tracing::info!("Service pipelines registered.");
}
