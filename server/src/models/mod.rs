// pcforge_server/src/models/mod.rs

//! Row types for the `users`, `builds` and `build_components` tables.
//! Catalog rows decode straight into `pcforge::Component`.

pub mod build;
pub mod user;

pub use build::{BuildComponentRow, BuildRow, OwnedBuildRow};
pub use user::User;
