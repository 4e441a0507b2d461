// pcforge/src/catalog/component.rs

//! Typed component records, one per category, and the `Component` tagged
//! variant that carries any of them.
//!
//! Every record flattens a [`ComponentHeader`] (id, name, price, image) and
//! adds its category attributes. Records deserialize permissively: an absent
//! attribute takes its type's zero value, which the build engine then treats
//! as "unset".

use super::Category;
use serde::{Deserialize, Serialize};

pub type ComponentId = i64;

/// Fields shared by every catalog row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentHeader {
  pub id: ComponentId,
  pub name: String,
  /// Price in minor currency units.
  pub price_cents: i64,
  pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cpu {
  #[serde(flatten)]
  pub header: ComponentHeader,
  pub socket: String,
  pub cores: i32,
  pub threads: i32,
  /// GHz
  pub base_clock: f64,
  pub boost_clock: Option<f64>,
  /// Watts
  pub tdp: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Gpu {
  #[serde(flatten)]
  pub header: ComponentHeader,
  /// GB
  pub memory_size: i32,
  pub memory_type: String,
  /// MHz
  pub core_clock: i32,
  pub boost_clock: Option<i32>,
  pub tdp: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Motherboard {
  #[serde(flatten)]
  pub header: ComponentHeader,
  pub socket: String,
  pub chipset: String,
  pub form_factor: String,
  pub ram_slots: i32,
  /// GB
  pub max_ram: i32,
  pub has_integrated_wifi: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ram {
  #[serde(flatten)]
  pub header: ComponentHeader,
  /// GB
  pub capacity: i32,
  pub memory_type: String,
  /// MHz
  pub speed: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Storage {
  #[serde(flatten)]
  pub header: ComponentHeader,
  pub storage_type: String,
  /// GB
  pub capacity: i32,
  pub interface: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Psu {
  #[serde(flatten)]
  pub header: ComponentHeader,
  /// Watts
  pub power: i32,
  pub efficiency_rating: String,
  pub modular: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Case {
  #[serde(flatten)]
  pub header: ComponentHeader,
  pub form_factor: String,
  /// mm
  pub max_gpu_length: i32,
  /// mm
  pub max_cooler_height: i32,
  pub has_rgb: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cooler {
  #[serde(flatten)]
  pub header: ComponentHeader,
  pub cooler_type: String,
  pub socket: String,
  pub tdp_supported: i32,
  /// mm
  pub fan_size: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Monitor {
  #[serde(flatten)]
  pub header: ComponentHeader,
  /// Inches
  pub screen_size: f64,
  pub resolution: String,
  /// Hz
  pub refresh_rate: i32,
  pub panel_type: String,
  /// ms
  pub response_time: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Keyboard {
  #[serde(flatten)]
  pub header: ComponentHeader,
  pub keyboard_type: String,
  pub switch_type: Option<String>,
  pub layout: String,
  pub backlight: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Mouse {
  #[serde(flatten)]
  pub header: ComponentHeader,
  pub dpi: i32,
  pub buttons: i32,
  pub wireless: bool,
  pub rgb: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Headset {
  #[serde(flatten)]
  pub header: ComponentHeader,
  pub headset_type: String,
  pub microphone: bool,
  pub surround_sound: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Speaker {
  #[serde(flatten)]
  pub header: ComponentHeader,
  pub speaker_type: String,
  pub total_watts: i32,
  pub bluetooth: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Webcam {
  #[serde(flatten)]
  pub header: ComponentHeader,
  pub resolution: String,
  pub fps: i32,
  pub microphone: bool,
  pub autofocus: bool,
}

/// A catalog entry of any category.
///
/// Serialized with an inline `"category"` tag holding the category key, so a
/// CPU travels as `{"category": "cpu", "id": 1, "name": ..., "socket": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "lowercase")]
pub enum Component {
  Cpu(Cpu),
  Gpu(Gpu),
  Motherboard(Motherboard),
  Ram(Ram),
  Storage(Storage),
  Psu(Psu),
  Case(Case),
  Cooler(Cooler),
  Monitor(Monitor),
  Keyboard(Keyboard),
  Mouse(Mouse),
  Headset(Headset),
  Speaker(Speaker),
  Webcam(Webcam),
}

// Expands `$body` once per variant with `$rec` bound to the inner record.
macro_rules! each_record {
  ($value:expr, $rec:ident => $body:expr) => {
    match $value {
      Component::Cpu($rec) => $body,
      Component::Gpu($rec) => $body,
      Component::Motherboard($rec) => $body,
      Component::Ram($rec) => $body,
      Component::Storage($rec) => $body,
      Component::Psu($rec) => $body,
      Component::Case($rec) => $body,
      Component::Cooler($rec) => $body,
      Component::Monitor($rec) => $body,
      Component::Keyboard($rec) => $body,
      Component::Mouse($rec) => $body,
      Component::Headset($rec) => $body,
      Component::Speaker($rec) => $body,
      Component::Webcam($rec) => $body,
    }
  };
}

impl Component {
  pub fn category(&self) -> Category {
    match self {
      Component::Cpu(_) => Category::Cpu,
      Component::Gpu(_) => Category::Gpu,
      Component::Motherboard(_) => Category::Motherboard,
      Component::Ram(_) => Category::Ram,
      Component::Storage(_) => Category::Storage,
      Component::Psu(_) => Category::Psu,
      Component::Case(_) => Category::Case,
      Component::Cooler(_) => Category::Cooler,
      Component::Monitor(_) => Category::Monitor,
      Component::Keyboard(_) => Category::Keyboard,
      Component::Mouse(_) => Category::Mouse,
      Component::Headset(_) => Category::Headset,
      Component::Speaker(_) => Category::Speaker,
      Component::Webcam(_) => Category::Webcam,
    }
  }

  pub fn header(&self) -> &ComponentHeader {
    each_record!(self, rec => &rec.header)
  }

  pub fn header_mut(&mut self) -> &mut ComponentHeader {
    each_record!(self, rec => &mut rec.header)
  }

  pub fn id(&self) -> ComponentId {
    self.header().id
  }

  pub fn name(&self) -> &str {
    &self.header().name
  }

  pub fn price_cents(&self) -> i64 {
    self.header().price_cents
  }

  /// The socket label of a CPU or motherboard.
  pub fn socket(&self) -> Option<&str> {
    match self {
      Component::Cpu(cpu) => Some(&cpu.socket),
      Component::Motherboard(board) => Some(&board.socket),
      _ => None,
    }
  }

  /// Checks the fields an admin must supply when creating or editing an entry.
  ///
  /// Returns every problem found, not just the first.
  pub fn validate(&self) -> Result<(), Vec<String>> {
    let mut problems = Vec::new();
    let header = self.header();
    if header.name.trim().is_empty() {
      problems.push("name must not be empty".to_string());
    }
    if header.price_cents < 0 {
      problems.push("price_cents must not be negative".to_string());
    }
    match self {
      Component::Cpu(cpu) if cpu.socket.trim().is_empty() => {
        problems.push("socket must not be empty".to_string());
      }
      Component::Motherboard(board) if board.socket.trim().is_empty() => {
        problems.push("socket must not be empty".to_string());
      }
      Component::Psu(psu) if psu.power <= 0 => {
        problems.push("power must be positive".to_string());
      }
      _ => {}
    }
    if problems.is_empty() {
      Ok(())
    } else {
      Err(problems)
    }
  }
}

macro_rules! impl_from_record {
  ($($record:ident),* $(,)?) => {
    $(
      impl From<$record> for Component {
        fn from(rec: $record) -> Self {
          Component::$record(rec)
        }
      }
    )*
  };
}

impl_from_record!(
  Cpu, Gpu, Motherboard, Ram, Storage, Psu, Case, Cooler, Monitor, Keyboard, Mouse, Headset, Speaker, Webcam
);
