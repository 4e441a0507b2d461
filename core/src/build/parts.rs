// pcforge/src/build/parts.rs

//! `BuildParts`: a fixed record holding at most one component per category.

use crate::catalog::{
  Case, Category, Component, ComponentHeader, ComponentId, Cooler, Cpu, Gpu, Headset, Keyboard, Monitor, Motherboard, Mouse, Psu,
  Ram, Speaker, Storage, Webcam,
};
use serde::{Deserialize, Serialize};

/// A (category, component id) pair as stored with a saved build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComponentRef {
  pub category: Category,
  pub component_id: ComponentId,
}

/// One optional slot per category.
///
/// The slot type matches the category, so a GPU can never sit in the CPU
/// slot; placing a [`Component`] always routes it by its own category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildParts {
  pub cpu: Option<Cpu>,
  pub gpu: Option<Gpu>,
  pub motherboard: Option<Motherboard>,
  pub ram: Option<Ram>,
  pub storage: Option<Storage>,
  pub psu: Option<Psu>,
  pub case: Option<Case>,
  pub cooler: Option<Cooler>,
  pub monitor: Option<Monitor>,
  pub keyboard: Option<Keyboard>,
  pub mouse: Option<Mouse>,
  pub headset: Option<Headset>,
  pub speaker: Option<Speaker>,
  pub webcam: Option<Webcam>,
}

impl BuildParts {
  pub fn new() -> Self {
    Self::default()
  }

  /// Stores `component` in its category's slot, returning what was there.
  pub fn place(&mut self, component: Component) -> Option<Component> {
    match component {
      Component::Cpu(c) => self.cpu.replace(c).map(Component::Cpu),
      Component::Gpu(c) => self.gpu.replace(c).map(Component::Gpu),
      Component::Motherboard(c) => self.motherboard.replace(c).map(Component::Motherboard),
      Component::Ram(c) => self.ram.replace(c).map(Component::Ram),
      Component::Storage(c) => self.storage.replace(c).map(Component::Storage),
      Component::Psu(c) => self.psu.replace(c).map(Component::Psu),
      Component::Case(c) => self.case.replace(c).map(Component::Case),
      Component::Cooler(c) => self.cooler.replace(c).map(Component::Cooler),
      Component::Monitor(c) => self.monitor.replace(c).map(Component::Monitor),
      Component::Keyboard(c) => self.keyboard.replace(c).map(Component::Keyboard),
      Component::Mouse(c) => self.mouse.replace(c).map(Component::Mouse),
      Component::Headset(c) => self.headset.replace(c).map(Component::Headset),
      Component::Speaker(c) => self.speaker.replace(c).map(Component::Speaker),
      Component::Webcam(c) => self.webcam.replace(c).map(Component::Webcam),
    }
  }

  /// Empties one slot, returning its previous occupant.
  pub fn take(&mut self, category: Category) -> Option<Component> {
    match category {
      Category::Cpu => self.cpu.take().map(Component::Cpu),
      Category::Gpu => self.gpu.take().map(Component::Gpu),
      Category::Motherboard => self.motherboard.take().map(Component::Motherboard),
      Category::Ram => self.ram.take().map(Component::Ram),
      Category::Storage => self.storage.take().map(Component::Storage),
      Category::Psu => self.psu.take().map(Component::Psu),
      Category::Case => self.case.take().map(Component::Case),
      Category::Cooler => self.cooler.take().map(Component::Cooler),
      Category::Monitor => self.monitor.take().map(Component::Monitor),
      Category::Keyboard => self.keyboard.take().map(Component::Keyboard),
      Category::Mouse => self.mouse.take().map(Component::Mouse),
      Category::Headset => self.headset.take().map(Component::Headset),
      Category::Speaker => self.speaker.take().map(Component::Speaker),
      Category::Webcam => self.webcam.take().map(Component::Webcam),
    }
  }

  /// A copy of the component in `category`'s slot.
  pub fn get(&self, category: Category) -> Option<Component> {
    match category {
      Category::Cpu => self.cpu.clone().map(Component::Cpu),
      Category::Gpu => self.gpu.clone().map(Component::Gpu),
      Category::Motherboard => self.motherboard.clone().map(Component::Motherboard),
      Category::Ram => self.ram.clone().map(Component::Ram),
      Category::Storage => self.storage.clone().map(Component::Storage),
      Category::Psu => self.psu.clone().map(Component::Psu),
      Category::Case => self.case.clone().map(Component::Case),
      Category::Cooler => self.cooler.clone().map(Component::Cooler),
      Category::Monitor => self.monitor.clone().map(Component::Monitor),
      Category::Keyboard => self.keyboard.clone().map(Component::Keyboard),
      Category::Mouse => self.mouse.clone().map(Component::Mouse),
      Category::Headset => self.headset.clone().map(Component::Headset),
      Category::Speaker => self.speaker.clone().map(Component::Speaker),
      Category::Webcam => self.webcam.clone().map(Component::Webcam),
    }
  }

  /// Header of the component in `category`'s slot.
  pub fn header(&self, category: Category) -> Option<&ComponentHeader> {
    match category {
      Category::Cpu => self.cpu.as_ref().map(|r| &r.header),
      Category::Gpu => self.gpu.as_ref().map(|r| &r.header),
      Category::Motherboard => self.motherboard.as_ref().map(|r| &r.header),
      Category::Ram => self.ram.as_ref().map(|r| &r.header),
      Category::Storage => self.storage.as_ref().map(|r| &r.header),
      Category::Psu => self.psu.as_ref().map(|r| &r.header),
      Category::Case => self.case.as_ref().map(|r| &r.header),
      Category::Cooler => self.cooler.as_ref().map(|r| &r.header),
      Category::Monitor => self.monitor.as_ref().map(|r| &r.header),
      Category::Keyboard => self.keyboard.as_ref().map(|r| &r.header),
      Category::Mouse => self.mouse.as_ref().map(|r| &r.header),
      Category::Headset => self.headset.as_ref().map(|r| &r.header),
      Category::Speaker => self.speaker.as_ref().map(|r| &r.header),
      Category::Webcam => self.webcam.as_ref().map(|r| &r.header),
    }
  }

  /// Every occupied slot, in [`Category::ALL`] order.
  pub fn occupied(&self) -> impl Iterator<Item = (Category, &ComponentHeader)> + '_ {
    Category::ALL
      .iter()
      .filter_map(move |&category| self.header(category).map(|h| (category, h)))
  }

  /// References to every selected component, as persisted with a build.
  pub fn refs(&self) -> Vec<ComponentRef> {
    self
      .occupied()
      .map(|(category, header)| ComponentRef {
        category,
        component_id: header.id,
      })
      .collect()
  }

  pub fn len(&self) -> usize {
    self.occupied().count()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Builds a record from loose components; a later entry for the same
  /// category replaces an earlier one.
  pub fn from_components(components: impl IntoIterator<Item = Component>) -> Self {
    let mut parts = Self::new();
    for component in components {
      parts.place(component);
    }
    parts
  }
}
