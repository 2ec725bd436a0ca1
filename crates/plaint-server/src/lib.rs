//! HTTP server assembly for Plaint.
//!
//! Wires the JSON API from `plaint-api` behind HTTP Basic authentication and
//! request tracing, on top of the SQLite store and the signed-redirect
//! payment gateway.

pub mod auth;
pub mod error;
pub mod gateway;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, middleware};
use plaint_api::ApiState;
use plaint_core::{complaint::FeeSchedule, store::ComplaintStore};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::{Account, AuthConfig, require_actor};
use gateway::GatewayConfig;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `plaint.toml` and
/// `PLAINT_*` environment variables.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  #[serde(default)]
  pub fees:       FeeSchedule,
  pub gateway:    GatewayConfig,
  #[serde(default)]
  pub accounts:   Vec<Account>,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through the router.
pub struct AppState<S> {
  pub api:  Arc<ApiState<S>>,
  pub auth: Arc<AuthConfig>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self { api: Arc::clone(&self.api), auth: Arc::clone(&self.auth) }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the application [`Router`]: the API under `/api`, every route
/// authenticated.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: ComplaintStore + 'static,
{
  Router::new()
    .nest("/api", plaint_api::api_router(state.api))
    .layer(middleware::from_fn_with_state(state.auth, require_actor))
    .layer(TraceLayer::new_for_http())
}
