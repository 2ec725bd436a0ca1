//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (microseconds, `Z`)
//! so that text order equals time order. Enums use their canonical string
//! form. Nested records are stored as compact JSON. UUIDs are stored as
//! hyphenated lowercase strings.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use plaint_core::{
  complaint::{Complaint, Payment},
  response::Response,
  stats::ComplaintSummary,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| Error::DateParse(e.to_string()))
}

/// Parse an enum stored by its `Display` form.
pub fn decode_enum<T: FromStr>(column: &'static str, s: &str) -> Result<T> {
  s.parse().map_err(|_| Error::Decode { column, value: s.to_owned() })
}

pub fn decode_u64(column: &'static str, v: i64) -> Result<u64> {
  u64::try_from(v).map_err(|_| Error::Decode { column, value: v.to_string() })
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching the field order of [`RawComplaint`].
pub const COMPLAINT_COLUMNS: &str = "
  complaint_id, file_number, complainant_type, complainant_json,
  opponent_json, details_json, attachments_json, status,
  payment_status, payment_amount, payment_ref, paid_at,
  owner_user_id, version, created_at, updated_at";

/// Raw values read directly from a `complaints` row.
pub struct RawComplaint {
  pub complaint_id:     String,
  pub file_number:      String,
  pub complainant_type: String,
  pub complainant_json: String,
  pub opponent_json:    String,
  pub details_json:     String,
  pub attachments_json: String,
  pub status:           String,
  pub payment_status:   String,
  pub payment_amount:   i64,
  pub payment_ref:      Option<String>,
  pub paid_at:          Option<String>,
  pub owner_user_id:    String,
  pub version:          i64,
  pub created_at:       String,
  pub updated_at:       String,
}

impl RawComplaint {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      complaint_id:     row.get(0)?,
      file_number:      row.get(1)?,
      complainant_type: row.get(2)?,
      complainant_json: row.get(3)?,
      opponent_json:    row.get(4)?,
      details_json:     row.get(5)?,
      attachments_json: row.get(6)?,
      status:           row.get(7)?,
      payment_status:   row.get(8)?,
      payment_amount:   row.get(9)?,
      payment_ref:      row.get(10)?,
      paid_at:          row.get(11)?,
      owner_user_id:    row.get(12)?,
      version:          row.get(13)?,
      created_at:       row.get(14)?,
      updated_at:       row.get(15)?,
    })
  }

  pub fn into_complaint(self) -> Result<Complaint> {
    Ok(Complaint {
      id:                decode_uuid(&self.complaint_id)?,
      file_number:       self.file_number,
      complainant_type:  decode_enum("complainant_type", &self.complainant_type)?,
      complainant:       serde_json::from_str(&self.complainant_json)?,
      opponent:          serde_json::from_str(&self.opponent_json)?,
      complaint_details: serde_json::from_str(&self.details_json)?,
      attachments:       serde_json::from_str(&self.attachments_json)?,
      status:            decode_enum("status", &self.status)?,
      payment:           Payment {
        status:          decode_enum("payment_status", &self.payment_status)?,
        amount:          self.payment_amount,
        transaction_ref: self.payment_ref,
        paid_at:         self.paid_at.as_deref().map(decode_dt).transpose()?,
      },
      owner_user_id:     decode_uuid(&self.owner_user_id)?,
      version:           decode_u64("version", self.version)?,
      created_at:        decode_dt(&self.created_at)?,
      updated_at:        decode_dt(&self.updated_at)?,
    })
  }
}

/// Column list matching the field order of [`RawResponse`].
pub const RESPONSE_COLUMNS: &str = "
  response_id, complaint_id, response_type, message, action_taken, status,
  next_hearing_date, hearing_venue, remarks, responded_by,
  created_at, updated_at";

/// Raw values read directly from a `responses` row.
pub struct RawResponse {
  pub response_id:       String,
  pub complaint_id:      String,
  pub response_type:     String,
  pub message:           String,
  pub action_taken:      String,
  pub status:            String,
  pub next_hearing_date: Option<String>,
  pub hearing_venue:     Option<String>,
  pub remarks:           Option<String>,
  pub responded_by:      String,
  pub created_at:        String,
  pub updated_at:        String,
}

impl RawResponse {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      response_id:       row.get(0)?,
      complaint_id:      row.get(1)?,
      response_type:     row.get(2)?,
      message:           row.get(3)?,
      action_taken:      row.get(4)?,
      status:            row.get(5)?,
      next_hearing_date: row.get(6)?,
      hearing_venue:     row.get(7)?,
      remarks:           row.get(8)?,
      responded_by:      row.get(9)?,
      created_at:        row.get(10)?,
      updated_at:        row.get(11)?,
    })
  }

  pub fn into_response(self) -> Result<Response> {
    Ok(Response {
      id:                   decode_uuid(&self.response_id)?,
      complaint_id:         decode_uuid(&self.complaint_id)?,
      response_type:        decode_enum("response_type", &self.response_type)?,
      message:              self.message,
      action_taken:         self.action_taken,
      status:               decode_enum("status", &self.status)?,
      next_hearing_date:    self.next_hearing_date.as_deref().map(decode_date).transpose()?,
      hearing_venue:        self.hearing_venue,
      remarks:              self.remarks,
      responded_by_user_id: decode_uuid(&self.responded_by)?,
      created_at:           decode_dt(&self.created_at)?,
      updated_at:           decode_dt(&self.updated_at)?,
    })
  }
}

/// Owned parameter values for inserting or rewriting a `responses` row.
pub struct ResponseParams {
  pub response_id:       String,
  pub complaint_id:      String,
  pub response_type:     String,
  pub message:           String,
  pub action_taken:      String,
  pub status:            String,
  pub next_hearing_date: Option<String>,
  pub hearing_venue:     Option<String>,
  pub remarks:           Option<String>,
  pub responded_by:      String,
  pub created_at:        String,
  pub updated_at:        String,
}

impl From<&Response> for ResponseParams {
  fn from(r: &Response) -> Self {
    Self {
      response_id:       encode_uuid(r.id),
      complaint_id:      encode_uuid(r.complaint_id),
      response_type:     r.response_type.to_string(),
      message:           r.message.clone(),
      action_taken:      r.action_taken.clone(),
      status:            r.status.to_string(),
      next_hearing_date: r.next_hearing_date.map(encode_date),
      hearing_venue:     r.hearing_venue.clone(),
      remarks:           r.remarks.clone(),
      responded_by:      encode_uuid(r.responded_by_user_id),
      created_at:        encode_dt(r.created_at),
      updated_at:        encode_dt(r.updated_at),
    }
  }
}

/// Owned parameter values for the mutable columns of a `complaints` row.
pub struct ComplaintStateParams {
  pub complaint_id:   String,
  pub status:         String,
  pub payment_status: String,
  pub payment_ref:    Option<String>,
  pub paid_at:        Option<String>,
  pub version:        i64,
  pub updated_at:     String,
}

impl ComplaintStateParams {
  pub fn new(c: &Complaint) -> Result<Self> {
    Ok(Self {
      complaint_id:   encode_uuid(c.id),
      status:         c.status.to_string(),
      payment_status: c.payment.status.to_string(),
      payment_ref:    c.payment.transaction_ref.clone(),
      paid_at:        c.payment.paid_at.map(encode_dt),
      version:        encode_version(c.version)?,
      updated_at:     encode_dt(c.updated_at),
    })
  }
}

pub fn encode_version(v: u64) -> Result<i64> {
  i64::try_from(v).map_err(|_| Error::Decode { column: "version", value: v.to_string() })
}

/// Raw values for a [`ComplaintSummary`].
pub struct RawSummary {
  pub complainant_type: String,
  pub status:           String,
  pub created_at:       String,
}

impl RawSummary {
  pub fn into_summary(self) -> Result<ComplaintSummary> {
    Ok(ComplaintSummary {
      complainant_type: decode_enum("complainant_type", &self.complainant_type)?,
      status:           decode_enum("status", &self.status)?,
      created_at:       decode_dt(&self.created_at)?,
    })
  }
}
