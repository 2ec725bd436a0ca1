//! Handlers for `/complaints` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/complaints` | Own complaints for citizens, all for admins; `?scope=own\|all` overrides, `?owner=` picks one filer |
//! | `POST` | `/complaints/individual` | Body: [`FilingBody`] of an individual; returns 201 |
//! | `POST` | `/complaints/institutional` | Body: [`FilingBody`] of an institution; returns 201 |
//! | `GET`  | `/complaints/{id}` | Complaint plus one page of its timeline |
//! | `POST` | `/complaints/{id}/status` | Admin only. Body: [`TransitionBody`] |

use std::sync::Arc;

use axum::{
  Extension, Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{DateTime, Utc};
use plaint_core::{
  actor::Actor,
  complaint::{
    Attachment, ComplainantType, Complainant, Complaint, ComplaintDetails, ComplaintStatus,
    IndividualComplainant, InstitutionalComplainant, NewComplaint, Opponent,
  },
  engine::ComplaintDetail,
  store::{ComplaintPage, ComplaintQuery, ComplaintStore, PageRequest},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListScope {
  Own,
  All,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
  pub scope:            Option<ListScope>,
  /// List one filer's complaints. Citizens may only name themselves.
  pub owner:            Option<Uuid>,
  /// Free text over file number, complainant and opponent names.
  #[serde(alias = "search")]
  pub text:             Option<String>,
  #[serde(rename = "type")]
  pub complainant_type: Option<ComplainantType>,
  pub status:           Option<ComplaintStatus>,
  pub created_after:    Option<DateTime<Utc>>,
  pub created_before:   Option<DateTime<Utc>>,
  pub limit:            Option<usize>,
  pub offset:           Option<usize>,
}

/// `GET /complaints[?scope=..][&owner=..][&text=..][&type=..][&status=..][&createdAfter=..][&createdBefore=..][&limit=..][&offset=..]`
pub async fn list<S>(
  State(state): State<Arc<ApiState<S>>>,
  Extension(actor): Extension<Actor>,
  Query(params): Query<ListParams>,
) -> Result<Json<ComplaintPage>, ApiError>
where
  S: ComplaintStore,
{
  let default_scope = match (actor.is_admin(), params.owner) {
    (true, None) => ListScope::All,
    _ => ListScope::Own,
  };
  let scope = params.scope.unwrap_or(default_scope);
  if scope == ListScope::All && params.owner.is_some() {
    return Err(ApiError::BadRequest("`owner` cannot be combined with `scope=all`".into()));
  }
  let query = ComplaintQuery {
    text:             params.text,
    complainant_type: params.complainant_type,
    status:           params.status,
    created_after:    params.created_after,
    created_before:   params.created_before,
    owner:            None,
    limit:            params.limit,
    offset:           params.offset,
  };

  let page = match scope {
    ListScope::All => state.engine.list_all(&actor, query).await?,
    ListScope::Own => {
      let owner = params.owner.unwrap_or(actor.user_id);
      state.engine.list_for_user(&actor, owner, query).await?
    }
  };
  Ok(Json(page))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by the two filing endpoints; the route picks the
/// complainant variant.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilingBody<C> {
  pub complainant:       C,
  pub opponent:          Opponent,
  pub complaint_details: ComplaintDetails,
  #[serde(default)]
  pub attachments:       Vec<Attachment>,
}

impl<C> FilingBody<C> {
  fn into_new(self, wrap: impl FnOnce(C) -> Complainant) -> NewComplaint {
    NewComplaint {
      complainant:       wrap(self.complainant),
      opponent:          self.opponent,
      complaint_details: self.complaint_details,
      attachments:       self.attachments,
    }
  }
}

/// `POST /complaints/individual`: returns 201 + the filed [`Complaint`].
pub async fn create_individual<S>(
  State(state): State<Arc<ApiState<S>>>,
  Extension(actor): Extension<Actor>,
  Json(body): Json<FilingBody<IndividualComplainant>>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ComplaintStore,
{
  let complaint = state
    .engine
    .create(&actor, body.into_new(Complainant::Individual))
    .await?;
  Ok((StatusCode::CREATED, Json(complaint)))
}

/// `POST /complaints/institutional`: returns 201 + the filed [`Complaint`].
pub async fn create_institutional<S>(
  State(state): State<Arc<ApiState<S>>>,
  Extension(actor): Extension<Actor>,
  Json(body): Json<FilingBody<InstitutionalComplainant>>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ComplaintStore,
{
  let complaint = state
    .engine
    .create(&actor, body.into_new(Complainant::Institutional))
    .await?;
  Ok((StatusCode::CREATED, Json(complaint)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /complaints/{id}[?limit=..][&offset=..]`: paging applies to the
/// timeline.
pub async fn get_one<S>(
  State(state): State<Arc<ApiState<S>>>,
  Extension(actor): Extension<Actor>,
  Path(id): Path<Uuid>,
  Query(page): Query<PageRequest>,
) -> Result<Json<ComplaintDetail>, ApiError>
where
  S: ComplaintStore,
{
  Ok(Json(state.engine.detail(&actor, id, page).await?))
}

// ─── Transition ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionBody {
  pub status:           ComplaintStatus,
  pub expected_version: Option<u64>,
}

/// `POST /complaints/{id}/status`: body: `{"status":"IN_REVIEW","expectedVersion":3}`.
pub async fn transition<S>(
  State(state): State<Arc<ApiState<S>>>,
  Extension(actor): Extension<Actor>,
  Path(id): Path<Uuid>,
  Json(body): Json<TransitionBody>,
) -> Result<Json<Complaint>, ApiError>
where
  S: ComplaintStore,
{
  let complaint = state
    .engine
    .apply_transition(&actor, id, body.status, body.expected_version)
    .await?;
  Ok(Json(complaint))
}
