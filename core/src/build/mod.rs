// pcforge/src/build/mod.rs

//! The build engine: compatibility verdict, performance scores and total price
//! for a partial build, plus the client-side [`BuildSession`].
//!
//! [`evaluate`] is a pure function of its input. It never fails; absent or
//! malformed numeric attributes fall back to fixed defaults instead.

pub mod compatibility;
pub mod parts;
pub mod scoring;
pub mod session;

pub use compatibility::{Compatibility, CompatibilityStatus, PSU_HEADROOM_WATTS};
pub use parts::{BuildParts, ComponentRef};
pub use scoring::PerformanceScores;
pub use session::BuildSession;

use serde::{Deserialize, Serialize};

/// Snapshot derived from a [`BuildParts`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildSummary {
  pub total_price_cents: i64,
  pub compatibility: Compatibility,
  pub scores: PerformanceScores,
}

/// Sum of every selected component's price, saturating at `i64::MAX`.
pub fn total_price_cents(parts: &BuildParts) -> i64 {
  parts
    .occupied()
    .fold(0i64, |total, (_, header)| total.saturating_add(header.price_cents))
}

pub fn evaluate(parts: &BuildParts) -> BuildSummary {
  BuildSummary {
    total_price_cents: total_price_cents(parts),
    compatibility: compatibility::check(parts),
    scores: scoring::score(parts),
  }
}

/// `value` unless it is zero, negative or not finite; `default` otherwise.
pub(crate) fn positive_or(value: f64, default: f64) -> f64 {
  if value.is_finite() && value > 0.0 {
    value
  } else {
    default
  }
}
