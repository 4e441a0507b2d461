// pcforge/src/catalog/mod.rs

//! Catalog vocabulary: the fixed set of component categories and the typed
//! record each category carries.

pub mod component;

pub use component::{
  Case, Component, ComponentHeader, ComponentId, Cooler, Cpu, Gpu, Headset, Keyboard, Monitor, Motherboard, Mouse,
  Psu, Ram, Speaker, Storage, Webcam,
};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the fourteen component kinds a build can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
  Cpu,
  Gpu,
  Motherboard,
  Ram,
  Storage,
  Psu,
  Case,
  Cooler,
  Monitor,
  Keyboard,
  Mouse,
  Headset,
  Speaker,
  Webcam,
}

impl Category {
  /// Every category, in the order a build summary lists them.
  pub const ALL: [Category; 14] = [
    Category::Cpu,
    Category::Gpu,
    Category::Motherboard,
    Category::Ram,
    Category::Storage,
    Category::Psu,
    Category::Case,
    Category::Cooler,
    Category::Monitor,
    Category::Keyboard,
    Category::Mouse,
    Category::Headset,
    Category::Speaker,
    Category::Webcam,
  ];

  /// Singular label stored in build references (`"cpu"`, `"mouse"`).
  pub fn key(self) -> &'static str {
    match self {
      Category::Cpu => "cpu",
      Category::Gpu => "gpu",
      Category::Motherboard => "motherboard",
      Category::Ram => "ram",
      Category::Storage => "storage",
      Category::Psu => "psu",
      Category::Case => "case",
      Category::Cooler => "cooler",
      Category::Monitor => "monitor",
      Category::Keyboard => "keyboard",
      Category::Mouse => "mouse",
      Category::Headset => "headset",
      Category::Speaker => "speaker",
      Category::Webcam => "webcam",
    }
  }

  /// Catalog table (and route segment) for the category.
  pub fn table(self) -> &'static str {
    match self {
      Category::Cpu => "cpus",
      Category::Gpu => "gpus",
      Category::Motherboard => "motherboards",
      Category::Ram => "ram",
      Category::Storage => "storage",
      Category::Psu => "psu",
      Category::Case => "cases",
      Category::Cooler => "coolers",
      Category::Monitor => "monitors",
      Category::Keyboard => "keyboards",
      Category::Mouse => "mice",
      Category::Headset => "headsets",
      Category::Speaker => "speakers",
      Category::Webcam => "webcams",
    }
  }

  /// Resolves either the key or the table name. Matching is exact.
  pub fn parse(label: &str) -> Option<Category> {
    Category::ALL
      .iter()
      .copied()
      .find(|c| c.key() == label || c.table() == label)
  }
}

impl fmt::Display for Category {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.key())
  }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown component category: '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
  type Err = UnknownCategory;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Category::parse(s).ok_or_else(|| UnknownCategory(s.to_string()))
  }
}
