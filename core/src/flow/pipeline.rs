// pcforge/src/flow/pipeline.rs

//! `Pipeline<TData, Err>`: step definitions, handler registration and the
//! sequential runner.

use super::context_data::ContextData;
use super::control::{PipelineControl, PipelineResult};
use super::error::FlowError;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tracing::{event, info_span, instrument, Instrument, Level};

/// A boxed async step handler.
pub type Handler<TData, Err> = Box<
  dyn Fn(ContextData<TData>) -> Pin<Box<dyn Future<Output = Result<PipelineControl, Err>> + Send>> + Send + Sync,
>;

/// Evaluated before a step runs; `true` skips the step.
pub type SkipCondition<TData> = Arc<dyn Fn(&TData) -> bool + Send + Sync + 'static>;

#[derive(Clone)]
pub struct StepDef<TData: 'static + Send + Sync> {
  pub name: String,
  /// An optional step with no handlers is passed over instead of failing.
  pub optional: bool,
  pub skip_if: Option<SkipCondition<TData>>,
}

impl<TData: 'static + Send + Sync> fmt::Debug for StepDef<TData> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("StepDef")
      .field("name", &self.name)
      .field("optional", &self.optional)
      .field("skip_if_present", &self.skip_if.is_some())
      .finish()
  }
}

#[derive(Debug, Clone, Copy)]
enum Phase {
  Before,
  On,
  After,
}

impl Phase {
  fn label(self) -> &'static str {
    match self {
      Phase::Before => "before",
      Phase::On => "on",
      Phase::After => "after",
    }
  }
}

pub struct Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  steps: Vec<StepDef<TData>>,
  before: HashMap<String, Vec<Handler<TData, Err>>>,
  on: HashMap<String, Vec<Handler<TData, Err>>>,
  after: HashMap<String, Vec<Handler<TData, Err>>>,
}

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  /// `(name, optional, skip_if)` per step, in execution order.
  pub fn new(step_defs: &[(&str, bool, Option<SkipCondition<TData>>)]) -> Self {
    let steps = step_defs
      .iter()
      .map(|(name, optional, skip_if)| StepDef {
        name: (*name).to_string(),
        optional: *optional,
        skip_if: skip_if.clone(),
      })
      .collect();

    Self {
      steps,
      before: HashMap::new(),
      on: HashMap::new(),
      after: HashMap::new(),
    }
  }

  pub fn step_names(&self) -> Vec<&str> {
    self.steps.iter().map(|s| s.name.as_str()).collect()
  }

  /// Panics on an unknown step name: that is a wiring mistake made at startup.
  fn ensure_step_exists(&self, step_name: &str) {
    if !self.steps.iter().any(|s| s.name == step_name) {
      panic!("Pipeline setup error: step '{}' is not defined.", step_name);
    }
  }

  pub fn set_skip_condition(&mut self, step_name: &str, skip_if: Option<SkipCondition<TData>>) {
    self.ensure_step_exists(step_name);
    if let Some(step) = self.steps.iter_mut().find(|s| s.name == step_name) {
      step.skip_if = skip_if;
    }
  }

  fn boxed<F, UserErr>(handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static) -> Handler<TData, Err>
  where
    F: Future<Output = Result<PipelineControl, UserErr>> + Send + 'static,
    UserErr: Into<Err> + Send + Sync + 'static,
  {
    Box::new(move |ctx_data| {
      let fut = handler_fn(ctx_data);
      Box::pin(async move { fut.await.map_err(Into::into) })
    })
  }

  pub fn before_root<F, UserErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<PipelineControl, UserErr>> + Send + 'static,
    UserErr: Into<Err> + Send + Sync + 'static,
  {
    self.ensure_step_exists(step_name);
    let handler = Self::boxed(handler_fn);
    self.before.entry(step_name.to_string()).or_default().push(handler);
  }

  pub fn on_root<F, UserErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<PipelineControl, UserErr>> + Send + 'static,
    UserErr: Into<Err> + Send + Sync + 'static,
  {
    self.ensure_step_exists(step_name);
    let handler = Self::boxed(handler_fn);
    self.on.entry(step_name.to_string()).or_default().push(handler);
  }

  pub fn after_root<F, UserErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<PipelineControl, UserErr>> + Send + 'static,
    UserErr: Into<Err> + Send + Sync + 'static,
  {
    self.ensure_step_exists(step_name);
    let handler = Self::boxed(handler_fn);
    self.after.entry(step_name.to_string()).or_default().push(handler);
  }

  fn handlers(&self, phase: Phase, step_name: &str) -> &[Handler<TData, Err>] {
    let map = match phase {
      Phase::Before => &self.before,
      Phase::On => &self.on,
      Phase::After => &self.after,
    };
    map.get(step_name).map(Vec::as_slice).unwrap_or(&[])
  }

  /// Runs one phase; `Some(Stopped)` when a handler halted the pipeline.
  async fn run_phase(
    &self,
    phase: Phase,
    step_name: &str,
    ctx_data: &ContextData<TData>,
  ) -> Result<Option<PipelineResult>, Err> {
    for (handler_idx, handler_fn) in self.handlers(phase, step_name).iter().enumerate() {
      let span = info_span!("step_handler", step = step_name, phase = phase.label(), handler_index = handler_idx);
      match handler_fn(ctx_data.clone()).instrument(span).await {
        Ok(PipelineControl::Continue) => {}
        Ok(PipelineControl::Stop) => {
          event!(Level::INFO, step = step_name, phase = phase.label(), "Pipeline stopped by handler.");
          return Ok(Some(PipelineResult::Stopped));
        }
        Err(e) => {
          event!(Level::WARN, step = step_name, phase = phase.label(), error = %e, "Handler failed.");
          return Err(e);
        }
      }
    }
    Ok(None)
  }

  /// Executes every step in order against `ctx_data`.
  #[instrument(
    name = "Pipeline::run",
    skip_all,
    fields(context_type = %std::any::type_name::<TData>(), num_steps = self.steps.len()),
    err(Display)
  )]
  pub async fn run(&self, ctx_data: ContextData<TData>) -> Result<PipelineResult, Err> {
    for step_def in &self.steps {
      let step_name = step_def.name.as_str();

      if let Some(skip_if) = &step_def.skip_if {
        let skip = {
          let guard = ctx_data.read();
          skip_if(&*guard)
        };
        if skip {
          event!(Level::DEBUG, step = step_name, "Step skipped by condition.");
          continue;
        }
      }

      let has_handlers = [Phase::Before, Phase::On, Phase::After]
        .iter()
        .any(|&phase| !self.handlers(phase, step_name).is_empty());
      if !has_handlers {
        if step_def.optional {
          event!(Level::DEBUG, step = step_name, "Optional step has no handlers, passing over.");
          continue;
        }
        return Err(Err::from(FlowError::HandlerMissing {
          step_name: step_def.name.clone(),
        }));
      }

      for phase in [Phase::Before, Phase::On, Phase::After] {
        if let Some(stopped) = self.run_phase(phase, step_name, &ctx_data).await? {
          return Ok(stopped);
        }
      }
      event!(Level::DEBUG, step = step_name, "Step finished.");
    }

    Ok(PipelineResult::Completed)
  }
}
