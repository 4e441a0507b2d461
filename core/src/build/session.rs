// pcforge/src/build/session.rs

//! The interactive build being assembled by one client.
//!
//! A `BuildSession` owns its [`BuildParts`] and keeps a [`BuildSummary`] in
//! step with them: every mutation recomputes the summary before returning.
//! Saving hands a snapshot to a [`BuildStore`]; a failed save leaves the
//! session exactly as it was.

use super::{evaluate, BuildParts, BuildSummary};
use crate::catalog::{Category, Component};
use crate::error::{BuildError, BuildResult};
use crate::store::{BuildId, BuildStore, NewBuild, SavedBuild, UserId};
use tracing::{debug, info, instrument, warn};

/// Longest accepted build name, in characters.
pub const MAX_BUILD_NAME_CHARS: usize = 255;

#[derive(Debug, Clone, Default)]
pub struct BuildSession {
  parts: BuildParts,
  summary: BuildSummary,
  user: Option<UserId>,
}

impl BuildSession {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn for_user(user_id: UserId) -> Self {
    Self {
      user: Some(user_id),
      ..Self::default()
    }
  }

  pub fn sign_in(&mut self, user_id: UserId) {
    self.user = Some(user_id);
  }

  pub fn sign_out(&mut self) {
    self.user = None;
  }

  pub fn user(&self) -> Option<UserId> {
    self.user
  }

  pub fn parts(&self) -> &BuildParts {
    &self.parts
  }

  pub fn summary(&self) -> &BuildSummary {
    &self.summary
  }

  /// Puts `component` in its category's slot and returns the one it replaced.
  pub fn select(&mut self, component: Component) -> Option<Component> {
    debug!(category = %component.category(), component_id = component.id(), "Selecting component.");
    let previous = self.parts.place(component);
    self.recompute();
    previous
  }

  pub fn remove(&mut self, category: Category) -> Option<Component> {
    let removed = self.parts.take(category);
    if removed.is_some() {
      debug!(%category, "Removed component.");
    }
    self.recompute();
    removed
  }

  pub fn clear(&mut self) {
    self.parts = BuildParts::default();
    self.recompute();
  }

  /// Replaces every slot with the components of a saved build.
  /// References listed as missing stay empty.
  pub fn load(&mut self, saved: &SavedBuild) {
    if !saved.missing.is_empty() {
      warn!(
        build_id = saved.id,
        missing = saved.missing.len(),
        "Loading a build whose catalog entries were partly deleted."
      );
    }
    self.parts = saved.parts();
    self.recompute();
  }

  /// The record `save` would submit, after the same checks.
  pub fn prepare_save(&self, name: &str, description: Option<&str>) -> BuildResult<NewBuild> {
    let user_id = self
      .user
      .ok_or_else(|| BuildError::AuthRequired("Sign in to save a build.".to_string()))?;

    let name = name.trim();
    if name.is_empty() {
      return Err(BuildError::validation("Build name must not be empty."));
    }
    if name.chars().count() > MAX_BUILD_NAME_CHARS {
      return Err(BuildError::validation(format!(
        "Build name must be at most {} characters.",
        MAX_BUILD_NAME_CHARS
      )));
    }
    if self.parts.is_empty() {
      return Err(BuildError::validation("Select at least one component before saving."));
    }

    let description = description.map(str::trim).filter(|d| !d.is_empty()).map(str::to_string);

    Ok(NewBuild {
      user_id,
      name: name.to_string(),
      description,
      total_price_cents: self.summary.total_price_cents,
      components: self.parts.refs(),
    })
  }

  /// Submits the current selection as one atomic unit.
  #[instrument(name = "BuildSession::save", skip(self, store, description), fields(user_id = ?self.user), err(Display))]
  pub async fn save<S>(&self, store: &S, name: &str, description: Option<&str>) -> BuildResult<BuildId>
  where
    S: BuildStore + ?Sized,
  {
    let new_build = self.prepare_save(name, description)?;
    let component_count = new_build.components.len();
    let build_id = store.create_build(new_build).await?;
    info!(build_id, component_count, "Build saved.");
    Ok(build_id)
  }

  fn recompute(&mut self) {
    self.summary = evaluate(&self.parts);
  }
}
