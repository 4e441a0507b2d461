// pcforge_server/src/pipelines/contexts.rs

//! Context data for the service pipelines. Handlers receive these wrapped
//! in `pcforge::ContextData`.

use crate::models::User;
use crate::services::token_service::IssuedToken;
use crate::state::AppState;
use pcforge::{BuildId, Component, ComponentRef, UserId};

#[derive(Clone)]
pub struct RegisterCtxData {
  pub app_state: AppState,
  pub name: String,
  pub email: String,
  pub password: String,
  pub created_user: Option<User>,
  pub token: Option<IssuedToken>,
}

impl RegisterCtxData {
  pub fn new(app_state: AppState, name: String, email: String, password: String) -> Self {
    Self {
      app_state,
      name,
      email,
      password,
      created_user: None,
      token: None,
    }
  }
}

#[derive(Clone)]
pub struct LoginCtxData {
  pub app_state: AppState,
  pub email: String,
  pub password: String,
  pub user: Option<User>,
  pub token: Option<IssuedToken>,
}

impl LoginCtxData {
  pub fn new(app_state: AppState, email: String, password: String) -> Self {
    Self {
      app_state,
      email,
      password,
      user: None,
      token: None,
    }
  }
}

#[derive(Clone)]
pub struct SaveBuildCtxData {
  pub app_state: AppState,
  pub user_id: UserId,
  pub name: String,
  pub description: Option<String>,
  pub refs: Vec<ComponentRef>,
  /// The total the client displayed, if it sent one.
  pub client_total_cents: Option<i64>,

  pub components: Vec<Component>,
  pub total_price_cents: i64,
  pub build_id: Option<BuildId>,
}

impl SaveBuildCtxData {
  pub fn new(
    app_state: AppState,
    user_id: UserId,
    name: String,
    description: Option<String>,
    refs: Vec<ComponentRef>,
    client_total_cents: Option<i64>,
  ) -> Self {
    Self {
      app_state,
      user_id,
      name,
      description,
      refs,
      client_total_cents,
      components: Vec::new(),
      total_price_cents: 0,
      build_id: None,
    }
  }
}

/// A context whose pipeline ends by handing the user a session token.
pub trait TokenRecipient {
  fn app_state(&self) -> &AppState;
  fn token_subject(&self) -> Option<UserId>;
  fn store_token(&mut self, token: IssuedToken);
}

impl TokenRecipient for RegisterCtxData {
  fn app_state(&self) -> &AppState {
    &self.app_state
  }

  fn token_subject(&self) -> Option<UserId> {
    self.created_user.as_ref().map(|u| u.id)
  }

  fn store_token(&mut self, token: IssuedToken) {
    self.token = Some(token);
  }
}

impl TokenRecipient for LoginCtxData {
  fn app_state(&self) -> &AppState {
    &self.app_state
  }

  fn token_subject(&self) -> Option<UserId> {
    self.user.as_ref().map(|u| u.id)
  }

  fn store_token(&mut self, token: IssuedToken) {
    self.token = Some(token);
  }
}
