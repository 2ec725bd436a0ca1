//! Handler for `GET /stats`.

use std::sync::Arc;

use axum::{
  Extension, Json,
  extract::{Query, State},
};
use plaint_core::{
  actor::Actor,
  stats::{Statistics, StatsScope},
  store::ComplaintStore,
};
use serde::Deserialize;

use crate::{ApiState, error::ApiError};

#[derive(Debug, Default, Deserialize)]
pub struct StatsParams {
  #[serde(default)]
  pub scope: StatsScope,
}

/// `GET /stats[?scope=own|system]`: `system` is admin only.
pub async fn handler<S>(
  State(state): State<Arc<ApiState<S>>>,
  Extension(actor): Extension<Actor>,
  Query(params): Query<StatsParams>,
) -> Result<Json<Statistics>, ApiError>
where
  S: ComplaintStore,
{
  Ok(Json(state.engine.statistics(&actor, params.scope).await?))
}
