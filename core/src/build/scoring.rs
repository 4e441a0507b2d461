// pcforge/src/build/scoring.rs

//! Heuristic performance scores.
//!
//! Three weighted-sum accumulators (gaming, productivity, content) fed by the
//! CPU, GPU and RAM only. Each final value is rounded, then clamped to 0..=100.

use super::parts::BuildParts;
use super::positive_or;
use serde::{Deserialize, Serialize};

pub const MAX_SCORE: u8 = 100;

/// Per-axis weights of one category's raw score.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Weights {
  gaming: f64,
  productivity: f64,
  content: f64,
}

const CPU_WEIGHTS: Weights = Weights {
  gaming: 0.4,
  productivity: 0.6,
  content: 0.5,
};
const GPU_WEIGHTS: Weights = Weights {
  gaming: 0.6,
  productivity: 0.3,
  content: 0.5,
};
const RAM_WEIGHTS: Weights = Weights {
  gaming: 0.1,
  productivity: 0.2,
  content: 0.2,
};

const DEFAULT_CPU_CORES: f64 = 4.0;
const DEFAULT_CPU_BASE_CLOCK_GHZ: f64 = 2.5;
const DEFAULT_GPU_MEMORY_GB: f64 = 4.0;
const DEFAULT_GPU_TDP_WATTS: f64 = 150.0;
const DEFAULT_RAM_CAPACITY_GB: f64 = 8.0;
const DEFAULT_RAM_SPEED_MHZ: f64 = 3200.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceScores {
  pub gaming: u8,
  pub productivity: u8,
  pub content: u8,
}

#[derive(Debug, Default)]
struct Accumulator {
  gaming: f64,
  productivity: f64,
  content: f64,
}

impl Accumulator {
  fn add(&mut self, raw: f64, weights: Weights) {
    self.gaming += raw * weights.gaming;
    self.productivity += raw * weights.productivity;
    self.content += raw * weights.content;
  }

  fn finish(self) -> PerformanceScores {
    PerformanceScores {
      gaming: clamp_score(self.gaming),
      productivity: clamp_score(self.productivity),
      content: clamp_score(self.content),
    }
  }
}

fn clamp_score(raw: f64) -> u8 {
  // Halves round up, matching the raw sums the scores were tuned against.
  let rounded = (raw + 0.5).floor();
  rounded.clamp(0.0, f64::from(MAX_SCORE)) as u8
}

/// `cores × base clock`, the CPU's raw contribution.
pub fn cpu_raw(parts: &BuildParts) -> Option<f64> {
  parts.cpu.as_ref().map(|cpu| {
    positive_or(f64::from(cpu.cores), DEFAULT_CPU_CORES) * positive_or(cpu.base_clock, DEFAULT_CPU_BASE_CLOCK_GHZ)
  })
}

/// `memory × tdp / 30`, the GPU's raw contribution.
pub fn gpu_raw(parts: &BuildParts) -> Option<f64> {
  parts.gpu.as_ref().map(|gpu| {
    positive_or(f64::from(gpu.memory_size), DEFAULT_GPU_MEMORY_GB) * positive_or(f64::from(gpu.tdp), DEFAULT_GPU_TDP_WATTS)
      / 30.0
  })
}

/// `capacity × speed / 1000`, the memory kit's raw contribution.
pub fn ram_raw(parts: &BuildParts) -> Option<f64> {
  parts.ram.as_ref().map(|ram| {
    positive_or(f64::from(ram.capacity), DEFAULT_RAM_CAPACITY_GB) * positive_or(f64::from(ram.speed), DEFAULT_RAM_SPEED_MHZ)
      / 1000.0
  })
}

pub fn score(parts: &BuildParts) -> PerformanceScores {
  let mut acc = Accumulator::default();
  if let Some(raw) = cpu_raw(parts) {
    acc.add(raw, CPU_WEIGHTS);
  }
  if let Some(raw) = gpu_raw(parts) {
    acc.add(raw, GPU_WEIGHTS);
  }
  if let Some(raw) = ram_raw(parts) {
    acc.add(raw, RAM_WEIGHTS);
  }
  acc.finish()
}
