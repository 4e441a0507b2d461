// pcforge_server/src/web/handlers/mod.rs

pub mod admin_handlers;
pub mod auth_handlers;
pub mod build_handlers;
pub mod component_handlers;

use crate::errors::AppError;
use pcforge::Category;

/// A `{category}` path segment, given as key (`cpu`) or table name (`cpus`).
pub(crate) fn parse_category(raw: &str) -> Result<Category, AppError> {
  Category::parse(raw).ok_or_else(|| AppError::Validation(format!("Unknown component category: '{}'", raw)))
}
