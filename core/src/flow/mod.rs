// pcforge/src/flow/mod.rs

//! Named step pipelines for multi-step service workflows.
//!
//! A [`Pipeline<TData, Err>`] is an ordered list of named steps. Each step
//! may carry `before`, `on` and `after` handlers; every handler receives a
//! clone of the shared [`ContextData<TData>`] and answers
//! [`PipelineControl::Continue`] or [`PipelineControl::Stop`]. The
//! [`Flows`] registry stores one pipeline per context type and dispatches
//! runs to it.
//!
//! Typical use:
//! 1. Define a context struct for the workflow.
//! 2. Build a `Pipeline` with its step list and register handlers with
//!    `on_root` (plus `before_root`/`after_root` where needed).
//! 3. Register the pipeline with a `Flows` instance at startup.
//! 4. Per request, wrap a fresh context in `ContextData::new` and call
//!    `flows.run(ctx.clone())`, then read the results back out of `ctx`.

pub mod context_data;
pub mod control;
pub mod error;
pub mod pipeline;
pub mod registry;

pub use context_data::ContextData;
pub use control::{PipelineControl, PipelineResult};
pub use error::{FlowError, FlowResult};
pub use pipeline::{Handler, Pipeline, SkipCondition, StepDef};
pub use registry::Flows;
