//! Handlers for the filing-fee payment flow.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/complaints/{id}/payment` | Filer only; returns the gateway redirect |
//! | `POST` | `/complaints/{id}/payment/callback` | Body: [`CallbackBody`]; verified before it is applied |

use std::sync::Arc;

use axum::{
  Extension, Json,
  extract::{Path, State},
};
use plaint_core::{
  actor::Actor,
  complaint::{Complaint, PaymentStatus},
  payment::{Checkout, PaymentCallback},
  store::ComplaintStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

/// `POST /complaints/{id}/payment`
pub async fn begin<S>(
  State(state): State<Arc<ApiState<S>>>,
  Extension(actor): Extension<Actor>,
  Path(id): Path<Uuid>,
) -> Result<Json<Checkout>, ApiError>
where
  S: ComplaintStore,
{
  let checkout = state
    .engine
    .begin_payment(&actor, id, state.gateway.as_ref())
    .await?;
  Ok(Json(checkout))
}

/// Completion notice as relayed by the gateway redirect.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackBody {
  pub status:          PaymentStatus,
  pub transaction_ref: Option<String>,
  pub signature:       String,
}

/// `POST /complaints/{id}/payment/callback`
pub async fn callback<S>(
  State(state): State<Arc<ApiState<S>>>,
  Extension(actor): Extension<Actor>,
  Path(id): Path<Uuid>,
  Json(body): Json<CallbackBody>,
) -> Result<Json<Complaint>, ApiError>
where
  S: ComplaintStore,
{
  let callback = PaymentCallback {
    complaint_id:    id,
    status:          body.status,
    transaction_ref: body.transaction_ref,
    signature:       body.signature,
  };
  let complaint = state
    .engine
    .complete_payment(&actor, callback, state.gateway.as_ref())
    .await?;
  Ok(Json(complaint))
}
