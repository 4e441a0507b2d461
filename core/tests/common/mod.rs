// tests/common/mod.rs
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use parking_lot::Mutex;
use pcforge::catalog::{Case, Cpu, Gpu, Keyboard, Motherboard, Psu, Ram};
use pcforge::store::resolve_refs;
use pcforge::{
  BuildError, BuildId, BuildResult, BuildStore, CatalogSource, Category, Component, ComponentHeader, ComponentId,
  ContextData, FlowError, NewBuild, PipelineControl, Requester, SavedBuild, UserId,
};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::Level;

// --- Catalog fixtures ---

pub fn header(id: ComponentId, name: &str, price_cents: i64) -> ComponentHeader {
  ComponentHeader {
    id,
    name: name.to_string(),
    price_cents,
    image_url: None,
  }
}

pub fn cpu(id: ComponentId, socket: &str, cores: i32, base_clock: f64, tdp: i32) -> Cpu {
  Cpu {
    header: header(id, &format!("CPU {}", id), 30_000),
    socket: socket.to_string(),
    cores,
    threads: cores * 2,
    base_clock,
    boost_clock: None,
    tdp,
  }
}

pub fn gpu(id: ComponentId, memory_size: i32, tdp: i32) -> Gpu {
  Gpu {
    header: header(id, &format!("GPU {}", id), 50_000),
    memory_size,
    memory_type: "GDDR6".to_string(),
    core_clock: 1800,
    boost_clock: Some(2100),
    tdp,
  }
}

pub fn motherboard(id: ComponentId, socket: &str) -> Motherboard {
  Motherboard {
    header: header(id, &format!("Board {}", id), 15_000),
    socket: socket.to_string(),
    chipset: "B650".to_string(),
    form_factor: "ATX".to_string(),
    ram_slots: 4,
    max_ram: 128,
    has_integrated_wifi: true,
  }
}

pub fn psu(id: ComponentId, power: i32) -> Psu {
  Psu {
    header: header(id, &format!("PSU {}", id), 9_000),
    power,
    efficiency_rating: "80+ Gold".to_string(),
    modular: true,
  }
}

pub fn ram(id: ComponentId, capacity: i32, speed: i32) -> Ram {
  Ram {
    header: header(id, &format!("RAM {}", id), 8_000),
    capacity,
    memory_type: "DDR5".to_string(),
    speed,
  }
}

pub fn case(id: ComponentId) -> Case {
  Case {
    header: header(id, &format!("Case {}", id), 7_500),
    form_factor: "ATX".to_string(),
    max_gpu_length: 360,
    max_cooler_height: 165,
    has_rgb: false,
  }
}

pub fn keyboard(id: ComponentId) -> Keyboard {
  Keyboard {
    header: header(id, &format!("Keyboard {}", id), 4_999),
    keyboard_type: "mechanical".to_string(),
    switch_type: Some("brown".to_string()),
    layout: "ANSI".to_string(),
    backlight: true,
  }
}

// --- In-memory collaborators ---

#[derive(Debug, Clone)]
struct StoredBuild {
  id: BuildId,
  build: NewBuild,
  created_at: chrono::DateTime<Utc>,
}

/// Catalog plus build store kept in memory. Writes can be made to fail.
#[derive(Debug, Default)]
pub struct MemoryStore {
  catalog: Mutex<BTreeMap<(Category, ComponentId), Component>>,
  builds: Mutex<Vec<StoredBuild>>,
  next_build_id: Mutex<BuildId>,
  fail_writes: AtomicBool,
  /// Fails `create_build` while writing the reference at this index.
  fail_at_ref: Mutex<Option<usize>>,
  unreachable: AtomicBool,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_components(components: impl IntoIterator<Item = Component>) -> Self {
    let store = Self::new();
    for component in components {
      store.insert(component);
    }
    store
  }

  pub fn insert(&self, component: Component) {
    self.catalog.lock().insert((component.category(), component.id()), component);
  }

  pub fn remove_component(&self, category: Category, id: ComponentId) {
    self.catalog.lock().remove(&(category, id));
  }

  pub fn fail_writes(&self, fail: bool) {
    self.fail_writes.store(fail, Ordering::SeqCst);
  }

  pub fn fail_at_ref(&self, index: Option<usize>) {
    *self.fail_at_ref.lock() = index;
  }

  pub fn set_unreachable(&self, unreachable: bool) {
    self.unreachable.store(unreachable, Ordering::SeqCst);
  }

  pub fn build_count(&self) -> usize {
    self.builds.lock().len()
  }

  pub fn stored(&self, id: BuildId) -> Option<NewBuild> {
    self.builds.lock().iter().find(|b| b.id == id).map(|b| b.build.clone())
  }

  fn check_reachable(&self) -> BuildResult<()> {
    if self.unreachable.load(Ordering::SeqCst) {
      return Err(BuildError::UpstreamUnavailable("memory store offline".to_string()));
    }
    Ok(())
  }
}

#[async_trait]
impl CatalogSource for MemoryStore {
  async fn list_components(&self, category: Category) -> BuildResult<Vec<Component>> {
    self.check_reachable()?;
    Ok(
      self
        .catalog
        .lock()
        .iter()
        .filter(|((c, _), _)| *c == category)
        .map(|(_, component)| component.clone())
        .collect(),
    )
  }

  async fn get_component(&self, category: Category, id: ComponentId) -> BuildResult<Component> {
    self.check_reachable()?;
    self
      .catalog
      .lock()
      .get(&(category, id))
      .cloned()
      .ok_or_else(|| BuildError::not_found(format!("{} {}", category, id)))
  }
}

#[async_trait]
impl BuildStore for MemoryStore {
  async fn create_build(&self, build: NewBuild) -> BuildResult<BuildId> {
    self.check_reachable()?;
    if self.fail_writes.load(Ordering::SeqCst) {
      return Err(BuildError::PersistenceFailure("write rejected".to_string()));
    }

    // Header and references are staged and only become visible on commit.
    let id = {
      let mut next = self.next_build_id.lock();
      *next += 1;
      *next
    };
    let fail_at = *self.fail_at_ref.lock();
    let mut staged_refs = Vec::with_capacity(build.components.len());
    for (index, component_ref) in build.components.iter().enumerate() {
      if fail_at == Some(index) {
        return Err(BuildError::PersistenceFailure(format!("reference {} rejected", index)));
      }
      staged_refs.push(*component_ref);
    }

    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().unwrap_or_else(Utc::now);
    let created_at = base + Duration::seconds(id);
    let build = NewBuild {
      components: staged_refs,
      ..build
    };
    self.builds.lock().push(StoredBuild { id, build, created_at });
    Ok(id)
  }

  async fn list_builds(&self, user_id: UserId) -> BuildResult<Vec<SavedBuild>> {
    self.check_reachable()?;
    let mut mine: Vec<StoredBuild> = self
      .builds
      .lock()
      .iter()
      .filter(|b| b.build.user_id == user_id)
      .cloned()
      .collect();
    mine.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let mut saved = Vec::with_capacity(mine.len());
    for stored in mine {
      let (components, missing) = resolve_refs(self, &stored.build.components).await?;
      saved.push(SavedBuild {
        id: stored.id,
        user_id: stored.build.user_id,
        name: stored.build.name,
        description: stored.build.description,
        total_price_cents: stored.build.total_price_cents,
        created_at: stored.created_at,
        components,
        missing,
      });
    }
    Ok(saved)
  }

  async fn delete_build(&self, build_id: BuildId, requester: Requester) -> BuildResult<()> {
    self.check_reachable()?;
    let mut builds = self.builds.lock();
    let position = builds
      .iter()
      .position(|b| b.id == build_id && requester.may_touch(b.build.user_id))
      .ok_or_else(|| BuildError::not_found(format!("build {}", build_id)))?;
    builds.remove(position);
    Ok(())
  }
}

// --- Flow test context ---

#[derive(Clone, Debug, Default)]
pub struct TestContext {
  pub counter: i32,
  pub message: String,
  pub steps_executed: Vec<String>,
  pub should_stop_at: Option<String>,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TestError {
  #[error("Flow error: {0}")]
  Flow(String),

  #[error("Test handler failed: {0}")]
  Handler(String),
}

impl From<FlowError> for TestError {
  fn from(fe: FlowError) -> Self {
    TestError::Flow(fe.to_string())
  }
}

pub fn create_simple_handler(
  step_name: &'static str,
  message_to_append: &'static str,
) -> pcforge::Handler<TestContext, TestError> {
  Box::new(move |ctx: ContextData<TestContext>| {
    Box::pin(async move {
      let mut guard = ctx.write();
      guard.counter += 1;
      guard.message.push_str(message_to_append);
      guard.steps_executed.push(step_name.to_string());
      tracing::debug!(target: "test_handlers", step = step_name, counter = guard.counter, "executed");
      if guard.should_stop_at.as_deref() == Some(step_name) {
        return Ok(PipelineControl::Stop);
      }
      Ok(PipelineControl::Continue)
    })
  })
}

pub fn create_failing_handler(
  step_name: &'static str,
  error_message: &'static str,
) -> pcforge::Handler<TestContext, TestError> {
  Box::new(move |ctx: ContextData<TestContext>| {
    Box::pin(async move {
      ctx.write().steps_executed.push(step_name.to_string());
      Err(TestError::Handler(error_message.to_string()))
    })
  })
}

// --- Tracing ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
