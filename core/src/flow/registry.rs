// pcforge/src/flow/registry.rs

//! `Flows<E>`: one registered pipeline per context type, dispatched by `TypeId`.

use super::context_data::ContextData;
use super::control::PipelineResult;
use super::error::FlowError;
use super::pipeline::Pipeline;

use async_trait::async_trait;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{event, instrument, Level};

#[async_trait]
trait ErasedRunner<AppErr>: Send + Sync
where
  AppErr: std::error::Error + Send + Sync + 'static,
{
  /// `ctx_obj` must hold the `ContextData<TData>` of the wrapped pipeline.
  async fn run_erased(&self, ctx_obj: Box<dyn Any + Send>) -> Result<PipelineResult, AppErr>;
}

struct TypedRunner<TData, StepErr, AppErr>
where
  TData: 'static + Send + Sync,
  StepErr: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  pipeline: Pipeline<TData, StepErr>,
  _app_err: PhantomData<fn() -> AppErr>,
}

#[async_trait]
impl<TData, StepErr, AppErr> ErasedRunner<AppErr> for TypedRunner<TData, StepErr, AppErr>
where
  TData: 'static + Send + Sync,
  StepErr: std::error::Error + From<FlowError> + Send + Sync + 'static,
  AppErr: std::error::Error + From<StepErr> + From<FlowError> + Send + Sync + 'static,
{
  async fn run_erased(&self, ctx_obj: Box<dyn Any + Send>) -> Result<PipelineResult, AppErr> {
    let ctx_data = match ctx_obj.downcast::<ContextData<TData>>() {
      Ok(boxed) => *boxed,
      Err(_) => {
        let expected_type = std::any::type_name::<ContextData<TData>>();
        event!(Level::ERROR, expected_type, "Context object type mismatch.");
        return Err(AppErr::from(FlowError::TypeMismatch {
          expected_type: expected_type.to_string(),
        }));
      }
    };
    self.pipeline.run(ctx_data).await.map_err(AppErr::from)
  }
}

/// Registry of pipelines keyed by their context type.
///
/// `AppErr` is what `run` hands back; step errors and the registry's own
/// failures both convert into it.
pub struct Flows<AppErr = FlowError>
where
  AppErr: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  runners: RwLock<HashMap<TypeId, Arc<dyn ErasedRunner<AppErr>>>>,
}

impl<AppErr> Default for Flows<AppErr>
where
  AppErr: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  fn default() -> Self {
    Self::new()
  }
}

impl<AppErr> Flows<AppErr>
where
  AppErr: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  pub fn new() -> Self {
    Self {
      runners: RwLock::new(HashMap::new()),
    }
  }

  /// Registers `pipeline` for contexts of type `TData`, replacing any
  /// pipeline already registered for that type.
  pub fn register_pipeline<TData, StepErr>(&self, pipeline: Pipeline<TData, StepErr>)
  where
    TData: 'static + Send + Sync,
    StepErr: std::error::Error + From<FlowError> + Send + Sync + 'static,
    AppErr: From<StepErr>,
  {
    event!(
      Level::DEBUG,
      context_type = %std::any::type_name::<TData>(),
      steps = ?pipeline.step_names(),
      "Registering pipeline."
    );
    let runner: Arc<dyn ErasedRunner<AppErr>> = Arc::new(TypedRunner::<TData, StepErr, AppErr> {
      pipeline,
      _app_err: PhantomData,
    });
    self.runners.write().insert(TypeId::of::<TData>(), runner);
  }

  pub fn is_registered<TData: 'static>(&self) -> bool {
    self.runners.read().contains_key(&TypeId::of::<TData>())
  }

  /// Runs the pipeline registered for `TData` against `ctx_data`.
  #[instrument(
    name = "Flows::run",
    skip_all,
    fields(context_type = %std::any::type_name::<TData>()),
    err(Display)
  )]
  pub async fn run<TData>(&self, ctx_data: ContextData<TData>) -> Result<PipelineResult, AppErr>
  where
    TData: 'static + Send + Sync,
  {
    let runner = self.runners.read().get(&TypeId::of::<TData>()).cloned();
    let runner = runner.ok_or_else(|| {
      AppErr::from(FlowError::PipelineNotRegistered {
        context_type: std::any::type_name::<TData>().to_string(),
      })
    })?;

    runner.run_erased(Box::new(ctx_data)).await
  }
}
