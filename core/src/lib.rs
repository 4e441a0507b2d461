// src/lib.rs

//! pcforge: the domain core of a custom PC builder.
//!
//! The crate provides:
//!  - A typed catalog of fourteen component categories.
//!  - A pure engine that turns a partial selection into a price total, a
//!    compatibility verdict and three performance scores.
//!  - The interactive [`BuildSession`], which keeps the verdict in step with
//!    every selection change and saves through a [`store::BuildStore`].
//!  - The persistence contracts ([`store::BuildStore`], [`store::CatalogSource`])
//!    that the server's database adapters implement.
//!  - A small named-step pipeline engine ([`flow`]) used by the server for
//!    multi-step request workflows.

pub mod build;
pub mod catalog;
pub mod error;
pub mod flow;
pub mod store;

// --- Re-exports for the Public API ---

pub use crate::build::{
  evaluate, total_price_cents, BuildParts, BuildSession, BuildSummary, Compatibility, CompatibilityStatus,
  ComponentRef, PerformanceScores,
};
pub use crate::catalog::{Category, Component, ComponentHeader, ComponentId};
pub use crate::error::{BuildError, BuildResult};
pub use crate::flow::{ContextData, FlowError, FlowResult, Flows, Handler, Pipeline, PipelineControl, PipelineResult};
pub use crate::store::{BuildId, BuildStore, CatalogSource, NewBuild, Requester, Role, SavedBuild, UserId};
