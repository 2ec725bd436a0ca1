//! Handlers for the response ledger.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `GET`   | `/complaints/{id}/responses` | Newest first, with `totalResponses` |
//! | `POST`  | `/complaints/{id}/responses` | Admin only. Body: [`AppendBody`]; returns 201 |
//! | `PATCH` | `/responses/{id}` | Admin only. Body: [`ResponseUpdate`]; never changes status |

use std::sync::Arc;

use axum::{
  Extension, Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use plaint_core::{
  actor::Actor,
  response::{NewResponse, Response, ResponseUpdate, Timeline},
  store::{ComplaintStore, PageRequest},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

/// `GET /complaints/{id}/responses[?limit=..][&offset=..]`
pub async fn list<S>(
  State(state): State<Arc<ApiState<S>>>,
  Extension(actor): Extension<Actor>,
  Path(complaint_id): Path<Uuid>,
  Query(page): Query<PageRequest>,
) -> Result<Json<Timeline>, ApiError>
where
  S: ComplaintStore,
{
  Ok(Json(state.engine.list_responses(&actor, complaint_id, page).await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendBody {
  #[serde(flatten)]
  pub response:         NewResponse,
  /// Complaint version the admin was looking at.
  pub expected_version: Option<u64>,
}

/// `POST /complaints/{id}/responses`: returns 201 + the new entry and the
/// updated complaint.
pub async fn append<S>(
  State(state): State<Arc<ApiState<S>>>,
  Extension(actor): Extension<Actor>,
  Path(complaint_id): Path<Uuid>,
  Json(body): Json<AppendBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ComplaintStore,
{
  let receipt = state
    .engine
    .append_response(&actor, complaint_id, body.response, body.expected_version)
    .await?;
  Ok((StatusCode::CREATED, Json(receipt)))
}

/// `PATCH /responses/{id}`
pub async fn update<S>(
  State(state): State<Arc<ApiState<S>>>,
  Extension(actor): Extension<Actor>,
  Path(response_id): Path<Uuid>,
  Json(update): Json<ResponseUpdate>,
) -> Result<Json<Response>, ApiError>
where
  S: ComplaintStore,
{
  Ok(Json(state.engine.update_response(&actor, response_id, update).await?))
}
