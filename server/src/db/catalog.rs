// pcforge_server/src/db/catalog.rs

//! Catalog tables, one per category.
//!
//! Rows are read as `to_jsonb(row)` and decoded into the tagged
//! [`Component`] enum, so column names equal record field names. Writes go
//! through `jsonb_populate_record` restricted to the category's column list;
//! table and column names only ever come from the static lists below.
//!
//! A row that does not decode is treated as absent on every read path: it is
//! left out of listings and looked up as `NotFound`.

use super::build_failure;
use async_trait::async_trait;
use pcforge::{BuildError, BuildResult, CatalogSource, Category, Component, ComponentId};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::{debug, info, instrument, warn};

/// Writable columns per category. `id` is assigned by the database.
pub fn columns(category: Category) -> &'static [&'static str] {
  match category {
    Category::Cpu => &["name", "price_cents", "image_url", "socket", "cores", "threads", "base_clock", "boost_clock", "tdp"],
    Category::Gpu => &["name", "price_cents", "image_url", "memory_size", "memory_type", "core_clock", "boost_clock", "tdp"],
    Category::Motherboard => &[
      "name",
      "price_cents",
      "image_url",
      "socket",
      "chipset",
      "form_factor",
      "ram_slots",
      "max_ram",
      "has_integrated_wifi",
    ],
    Category::Ram => &["name", "price_cents", "image_url", "capacity", "memory_type", "speed"],
    Category::Storage => &["name", "price_cents", "image_url", "storage_type", "capacity", "interface"],
    Category::Psu => &["name", "price_cents", "image_url", "power", "efficiency_rating", "modular"],
    Category::Case => &["name", "price_cents", "image_url", "form_factor", "max_gpu_length", "max_cooler_height", "has_rgb"],
    Category::Cooler => &["name", "price_cents", "image_url", "cooler_type", "socket", "tdp_supported", "fan_size"],
    Category::Monitor => &[
      "name",
      "price_cents",
      "image_url",
      "screen_size",
      "resolution",
      "refresh_rate",
      "panel_type",
      "response_time",
    ],
    Category::Keyboard => &["name", "price_cents", "image_url", "keyboard_type", "switch_type", "layout", "backlight"],
    Category::Mouse => &["name", "price_cents", "image_url", "dpi", "buttons", "wireless", "rgb"],
    Category::Headset => &["name", "price_cents", "image_url", "headset_type", "microphone", "surround_sound"],
    Category::Speaker => &["name", "price_cents", "image_url", "speaker_type", "total_watts", "bluetooth"],
    Category::Webcam => &["name", "price_cents", "image_url", "resolution", "fps", "microphone", "autofocus"],
  }
}

/// Decodes a `to_jsonb(row)` document as a component of `category`.
pub fn decode_row(category: Category, mut doc: Value) -> BuildResult<Component> {
  let object = doc
    .as_object_mut()
    .ok_or_else(|| BuildError::PersistenceFailure(format!("{} row is not an object", category)))?;
  object.insert("category".to_string(), Value::String(category.key().to_string()));
  serde_json::from_value(doc).map_err(|e| BuildError::PersistenceFailure(format!("undecodable {} row: {}", category, e)))
}

/// A decoded row, or `None` (logged) when the row does not decode.
fn readable(category: Category, doc: Value) -> Option<Component> {
  match decode_row(category, doc) {
    Ok(component) => Some(component),
    Err(e) => {
      warn!(%category, error = %e, "Ignoring catalog row that does not decode.");
      None
    }
  }
}

/// Decodes an admin request body under the route's category. The body may
/// omit `category`; when present it must name the same category.
pub fn decode_body(category: Category, mut doc: Value) -> BuildResult<Component> {
  let object = doc
    .as_object_mut()
    .ok_or_else(|| BuildError::validation("Component body must be a JSON object."))?;
  if let Some(named) = object.get("category") {
    if named.as_str().and_then(Category::parse) != Some(category) {
      return Err(BuildError::validation(format!(
        "body describes {} but the route names {}",
        named, category
      )));
    }
  }
  object.insert("category".to_string(), Value::String(category.key().to_string()));
  serde_json::from_value(doc).map_err(|e| BuildError::validation(format!("invalid {} body: {}", category, e)))
}

/// The JSON object handed to `jsonb_populate_record` for a write.
fn write_payload(component: &Component) -> BuildResult<Value> {
  let mut doc = serde_json::to_value(component)
    .map_err(|e| BuildError::validation(format!("unserializable {}: {}", component.category(), e)))?;
  if let Some(object) = doc.as_object_mut() {
    object.remove("category");
    object.remove("id");
  }
  Ok(doc)
}

fn validated(category: Category, component: &Component) -> BuildResult<()> {
  if component.category() != category {
    return Err(BuildError::validation(format!(
      "body describes a {} but the route names {}",
      component.category(),
      category
    )));
  }
  component
    .validate()
    .map_err(|problems| BuildError::validation(problems.join("; ")))
}

#[derive(Clone)]
pub struct PgCatalog {
  pool: PgPool,
}

impl PgCatalog {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  #[instrument(name = "PgCatalog::create_component", skip(self, component), fields(%category), err(Display))]
  pub async fn create_component(&self, category: Category, component: &Component) -> BuildResult<Component> {
    validated(category, component)?;
    let table = category.table();
    let cols = columns(category).join(", ");
    let sql = format!(
      "INSERT INTO {table} ({cols}) SELECT {cols} FROM jsonb_populate_record(NULL::{table}, $1) RETURNING id"
    );
    let id: ComponentId = sqlx::query_scalar(&sql)
      .bind(Json(write_payload(component)?))
      .fetch_one(&self.pool)
      .await
      .map_err(|e| build_failure(&format!("insert {}", category), e))?;
    info!(component_id = id, "Catalog entry created.");
    self.get_component(category, id).await
  }

  #[instrument(name = "PgCatalog::update_component", skip(self, component), fields(%category, component_id = id), err(Display))]
  pub async fn update_component(&self, category: Category, id: ComponentId, component: &Component) -> BuildResult<Component> {
    validated(category, component)?;
    let table = category.table();
    let cols = columns(category).join(", ");
    let sql = format!(
      "UPDATE {table} SET ({cols}) = (SELECT {cols} FROM jsonb_populate_record(NULL::{table}, $1)) WHERE id = $2"
    );
    let result = sqlx::query(&sql)
      .bind(Json(write_payload(component)?))
      .bind(id)
      .execute(&self.pool)
      .await
      .map_err(|e| build_failure(&format!("update {} {}", category, id), e))?;
    if result.rows_affected() == 0 {
      return Err(BuildError::not_found(format!("{} {} not found", category, id)));
    }
    info!("Catalog entry updated.");
    self.get_component(category, id).await
  }

  /// Saved builds that reference the entry keep the reference; it reads back as missing.
  #[instrument(name = "PgCatalog::delete_component", skip(self), err(Display))]
  pub async fn delete_component(&self, category: Category, id: ComponentId) -> BuildResult<()> {
    let sql = format!("DELETE FROM {} WHERE id = $1", category.table());
    let result = sqlx::query(&sql)
      .bind(id)
      .execute(&self.pool)
      .await
      .map_err(|e| build_failure(&format!("delete {} {}", category, id), e))?;
    if result.rows_affected() == 0 {
      return Err(BuildError::not_found(format!("{} {} not found", category, id)));
    }
    info!(%category, component_id = id, "Catalog entry deleted.");
    Ok(())
  }

  /// Entries of `target` whose socket equals that of `(category, id)`.
  /// Only the CPU and motherboard pairing is defined.
  #[instrument(name = "PgCatalog::socket_partners", skip(self), err(Display))]
  pub async fn socket_partners(&self, category: Category, id: ComponentId, target: Category) -> BuildResult<Vec<Component>> {
    let paired = matches!(
      (category, target),
      (Category::Cpu, Category::Motherboard) | (Category::Motherboard, Category::Cpu)
    );
    if !paired {
      return Err(BuildError::validation(format!(
        "compatibility lookups pair cpus with motherboards, not {} with {}",
        category, target
      )));
    }
    let source = self.get_component(category, id).await?;
    let socket = source.socket().unwrap_or_default().to_string();
    let candidates = self.list_components(target).await?;
    Ok(candidates.into_iter().filter(|c| c.socket() == Some(socket.as_str())).collect())
  }
}

#[async_trait]
impl CatalogSource for PgCatalog {
  #[instrument(name = "PgCatalog::list_components", skip(self), err(Display))]
  async fn list_components(&self, category: Category) -> BuildResult<Vec<Component>> {
    let sql = format!("SELECT to_jsonb(t) FROM {} t ORDER BY t.id", category.table());
    let docs: Vec<Json<Value>> = sqlx::query_scalar(&sql)
      .fetch_all(&self.pool)
      .await
      .map_err(|e| build_failure(&format!("list {}", category), e))?;
    debug!(count = docs.len(), "Catalog rows fetched.");

    Ok(docs.into_iter().filter_map(|Json(doc)| readable(category, doc)).collect())
  }

  #[instrument(name = "PgCatalog::get_component", skip(self), err(Display))]
  async fn get_component(&self, category: Category, id: ComponentId) -> BuildResult<Component> {
    let sql = format!("SELECT to_jsonb(t) FROM {} t WHERE t.id = $1", category.table());
    let doc: Option<Json<Value>> = sqlx::query_scalar(&sql)
      .bind(id)
      .fetch_optional(&self.pool)
      .await
      .map_err(|e| build_failure(&format!("get {} {}", category, id), e))?;
    doc
      .and_then(|Json(doc)| readable(category, doc))
      .ok_or_else(|| BuildError::not_found(format!("{} {} not found", category, id)))
  }
}
