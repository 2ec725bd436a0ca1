//! JSON REST API for Plaint.
//!
//! Exposes an axum [`Router`] backed by an [`Engine`] over any
//! [`plaint_core::store::ComplaintStore`]. Every handler reads the acting
//! [`Actor`](plaint_core::actor::Actor) from a request extension, so
//! authentication is the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", plaint_api::api_router(Arc::new(ApiState { engine, gateway })))
//! ```

pub mod complaints;
pub mod error;
pub mod payments;
pub mod responses;
pub mod stats;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, patch, post},
};
use plaint_core::{Engine, payment::PaymentGateway, store::ComplaintStore};

pub use error::ApiError;

/// Shared handler state.
pub struct ApiState<S> {
  pub engine:  Engine<S>,
  pub gateway: Arc<dyn PaymentGateway>,
}

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: Arc<ApiState<S>>) -> Router<()>
where
  S: ComplaintStore + 'static,
{
  Router::new()
    // Complaints
    .route("/complaints", get(complaints::list::<S>))
    .route("/complaints/individual", post(complaints::create_individual::<S>))
    .route("/complaints/institutional", post(complaints::create_institutional::<S>))
    .route("/complaints/{id}", get(complaints::get_one::<S>))
    .route("/complaints/{id}/status", post(complaints::transition::<S>))
    // Payment
    .route("/complaints/{id}/payment", post(payments::begin::<S>))
    .route("/complaints/{id}/payment/callback", post(payments::callback::<S>))
    // Responses
    .route(
      "/complaints/{id}/responses",
      get(responses::list::<S>).post(responses::append::<S>),
    )
    .route("/responses/{id}", patch(responses::update::<S>))
    // Statistics
    .route("/stats", get(stats::handler::<S>))
    .with_state(state)
}
