//! Administrative responses: the per-complaint timeline.
//!
//! Responses are appended by admins and may be edited in place, but never
//! deleted. A response records the status it asserted at the time; editing it
//! later never changes the complaint.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

use crate::{
  Error, Result,
  complaint::{ComplaintStatus, require},
};

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseType {
  #[default]
  General,
  HearingNotice,
  InvestigationUpdate,
  FinalDecision,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
  pub id:                   Uuid,
  /// Back-reference only; the ledger never owns a complaint.
  pub complaint_id:         Uuid,
  pub response_type:        ResponseType,
  pub message:              String,
  pub action_taken:         String,
  /// The complaint status this response asserted when it was appended.
  pub status:               ComplaintStatus,
  pub next_hearing_date:    Option<NaiveDate>,
  pub hearing_venue:        Option<String>,
  pub remarks:              Option<String>,
  pub responded_by_user_id: Uuid,
  pub created_at:           DateTime<Utc>,
  pub updated_at:           DateTime<Utc>,
}

impl Response {
  fn validate(&self) -> Result<()> {
    require("message", &self.message)?;
    if self.response_type == ResponseType::HearingNotice && self.next_hearing_date.is_none() {
      return Err(Error::Validation(
        "a HEARING_NOTICE needs nextHearingDate".into(),
      ));
    }
    Ok(())
  }

  /// Apply an edit and re-validate the result. `updated_at` is bumped only if
  /// the edit succeeds.
  pub fn apply_update(&mut self, update: ResponseUpdate, now: DateTime<Utc>) -> Result<()> {
    let mut edited = self.clone();
    if let Some(v) = update.response_type {
      edited.response_type = v;
    }
    if let Some(v) = update.message {
      edited.message = v;
    }
    if let Some(v) = update.action_taken {
      edited.action_taken = v;
    }
    if let Some(v) = update.next_hearing_date {
      edited.next_hearing_date = Some(v);
    }
    if let Some(v) = update.hearing_venue {
      edited.hearing_venue = Some(v);
    }
    if let Some(v) = update.remarks {
      edited.remarks = Some(v);
    }
    edited.validate()?;
    edited.updated_at = now;
    *self = edited;
    Ok(())
  }
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Input to [`crate::Engine::append_response`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewResponse {
  #[serde(default)]
  pub response_type:     ResponseType,
  pub message:           String,
  #[serde(default)]
  pub action_taken:      String,
  /// Status to assert on the complaint; equal to the current status for a
  /// purely informational entry.
  pub status:            ComplaintStatus,
  pub next_hearing_date: Option<NaiveDate>,
  pub hearing_venue:     Option<String>,
  pub remarks:           Option<String>,
}

impl NewResponse {
  pub fn new(response_type: ResponseType, message: impl Into<String>, status: ComplaintStatus) -> Self {
    Self {
      response_type,
      message: message.into(),
      action_taken: String::new(),
      status,
      next_hearing_date: None,
      hearing_venue: None,
      remarks: None,
    }
  }

  /// Materialise into a [`Response`], validating the result.
  pub fn into_response(
    self,
    complaint_id: Uuid,
    responded_by_user_id: Uuid,
    now: DateTime<Utc>,
  ) -> Result<Response> {
    let response = Response {
      id: Uuid::new_v4(),
      complaint_id,
      response_type: self.response_type,
      message: self.message,
      action_taken: self.action_taken,
      status: self.status,
      next_hearing_date: self.next_hearing_date,
      hearing_venue: self.hearing_venue,
      remarks: self.remarks,
      responded_by_user_id,
      created_at: now,
      updated_at: now,
    };
    response.validate()?;
    Ok(response)
  }
}

/// Editable fields of a response. The asserted `status` is deliberately
/// absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResponseUpdate {
  pub response_type:     Option<ResponseType>,
  pub message:           Option<String>,
  pub action_taken:      Option<String>,
  pub next_hearing_date: Option<NaiveDate>,
  pub hearing_venue:     Option<String>,
  pub remarks:           Option<String>,
}

// ─── Timeline ────────────────────────────────────────────────────────────────

/// One page of a complaint's responses, newest first, with the total count so
/// the UI can number entries `total_responses - index`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
  pub total_responses: u64,
  pub responses:       Vec<Response>,
}
