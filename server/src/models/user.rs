// pcforge_server/src/models/user.rs

use chrono::{DateTime, Utc};
use pcforge::{Requester, Role, UserId};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
  pub id: UserId,
  pub name: String,
  pub email: String,
  #[serde(skip_serializing)] // Never send password hash to client
  pub password_hash: String,
  pub role: String,
  pub created_at: DateTime<Utc>,
}

impl User {
  pub fn role(&self) -> Role {
    Role::from_label(&self.role)
  }

  pub fn is_admin(&self) -> bool {
    self.role() == Role::Admin
  }

  pub fn requester(&self) -> Requester {
    Requester {
      user_id: self.id,
      role: self.role(),
    }
  }
}
