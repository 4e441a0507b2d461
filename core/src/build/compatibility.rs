// pcforge/src/build/compatibility.rs

//! Compatibility rules over a partial build.
//!
//! Each rule runs independently and every violation is collected, in rule
//! order. A build with no components at all is reported as
//! [`CompatibilityStatus::Pending`], never as compatible.

use super::parts::BuildParts;
use super::positive_or;
use serde::{Deserialize, Serialize};

/// Extra wattage a PSU must cover on top of CPU and GPU TDP.
pub const PSU_HEADROOM_WATTS: i64 = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompatibilityStatus {
  /// Nothing selected yet, so nothing was checked.
  Pending,
  Compatible,
  Incompatible,
}

/// Verdict plus human-readable issues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Compatibility {
  pub status: CompatibilityStatus,
  /// `true` only for [`CompatibilityStatus::Compatible`].
  pub compatible: bool,
  pub issues: Vec<String>,
}

impl Compatibility {
  pub fn pending() -> Self {
    Self {
      status: CompatibilityStatus::Pending,
      compatible: false,
      issues: Vec::new(),
    }
  }

  pub fn is_compatible(&self) -> bool {
    self.status == CompatibilityStatus::Compatible
  }
}

impl Default for Compatibility {
  fn default() -> Self {
    Self::pending()
  }
}

/// Wattage the PSU should deliver: CPU TDP + GPU TDP + headroom.
/// An absent or unset TDP counts as zero.
pub fn required_wattage(parts: &BuildParts) -> i64 {
  let cpu_tdp = parts.cpu.as_ref().map_or(0.0, |cpu| positive_or(cpu.tdp as f64, 0.0));
  let gpu_tdp = parts.gpu.as_ref().map_or(0.0, |gpu| positive_or(gpu.tdp as f64, 0.0));
  cpu_tdp as i64 + gpu_tdp as i64 + PSU_HEADROOM_WATTS
}

fn socket_issue(parts: &BuildParts) -> Option<String> {
  let (cpu, board) = (parts.cpu.as_ref()?, parts.motherboard.as_ref()?);
  if cpu.socket == board.socket {
    return None;
  }
  Some(format!(
    "CPU socket {} is not compatible with motherboard socket {}",
    cpu.socket, board.socket
  ))
}

fn wattage_issue(parts: &BuildParts) -> Option<String> {
  let psu = parts.psu.as_ref()?;
  if parts.cpu.is_none() && parts.gpu.is_none() {
    return None;
  }
  let required = required_wattage(parts);
  if i64::from(psu.power) >= required {
    return None;
  }
  Some(format!(
    "PSU wattage ({}W) may be insufficient for this build (recommended: {}W)",
    psu.power, required
  ))
}

/// Runs every rule over `parts`.
pub fn check(parts: &BuildParts) -> Compatibility {
  if parts.is_empty() {
    return Compatibility::pending();
  }

  let issues: Vec<String> = [socket_issue(parts), wattage_issue(parts)]
    .into_iter()
    .flatten()
    .collect();

  let status = if issues.is_empty() {
    CompatibilityStatus::Compatible
  } else {
    CompatibilityStatus::Incompatible
  };
  Compatibility {
    status,
    compatible: status == CompatibilityStatus::Compatible,
    issues,
  }
}
