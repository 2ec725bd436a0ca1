//! Complaint records, the aggregate root of the portal.
//!
//! A complaint is filed once by a citizen. Its complainant, opponent, details
//! and attachments are fixed at creation; only `status` and `payment` move
//! afterwards, and only through the [`Engine`](crate::Engine).

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Enumerations ────────────────────────────────────────────────────────────

/// Discriminator between the two complaint variants.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ComplainantType {
  Individual,
  Institutional,
}

/// Lifecycle status of a complaint. See [`crate::lifecycle`] for the legal
/// moves between these.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplaintStatus {
  Pending,
  InReview,
  HearingScheduled,
  InProgress,
  Resolved,
  Rejected,
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
  Pending,
  Paid,
  Failed,
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AttachmentKind {
  Image,
  Pdf,
}

// ─── Complainant payloads ────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactInfo {
  pub permanent_address: Option<String>,
  pub occupation:        Option<String>,
  pub telephone:         Option<String>,
  pub mobile:            Option<String>,
  pub email:             Option<String>,
}

/// A citizen filing on their own behalf.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IndividualComplainant {
  pub name:                  String,
  pub father_or_spouse_name: Option<String>,
  pub mother_name:           Option<String>,
  pub nid_or_passport:       Option<String>,
  pub trade_license_no:      Option<String>,
  pub tin_number:            Option<String>,
  pub contact_info:          ContactInfo,
}

/// The person acting for an institution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Representative {
  pub name:        String,
  pub designation: Option<String>,
}

/// An institution filing through a representative.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InstitutionalComplainant {
  pub institution_name:    String,
  pub institution_address: Option<String>,
  pub contact_address:     Option<String>,
  pub representative:      Representative,
  pub trade_license_no:    Option<String>,
  pub tin_number:          Option<String>,
  pub telephone:           Option<String>,
  pub mobile:              Option<String>,
  pub email:               Option<String>,
}

/// The filing party, tagged by variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Complainant {
  Individual(IndividualComplainant),
  Institutional(InstitutionalComplainant),
}

impl Complainant {
  pub fn complainant_type(&self) -> ComplainantType {
    match self {
      Self::Individual(_) => ComplainantType::Individual,
      Self::Institutional(_) => ComplainantType::Institutional,
    }
  }

  /// The name shown in listings and matched by free-text search.
  pub fn display_name(&self) -> &str {
    match self {
      Self::Individual(c) => &c.name,
      Self::Institutional(c) => &c.institution_name,
    }
  }

  fn validate(&self) -> Result<()> {
    match self {
      Self::Individual(c) => {
        require("complainant.name", &c.name)?;
        let info = &c.contact_info;
        if ![&info.mobile, &info.email, &info.telephone]
          .into_iter()
          .any(|v| present(v.as_deref()))
        {
          return Err(Error::Validation(
            "complainant.contactInfo needs a mobile, email, or telephone".into(),
          ));
        }
      }
      Self::Institutional(c) => {
        require("complainant.institutionName", &c.institution_name)?;
        require("complainant.representative.name", &c.representative.name)?;
      }
    }
    Ok(())
  }
}

// ─── Opponent, details, attachments ──────────────────────────────────────────

/// The accused party.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Opponent {
  pub name_or_institution: String,
  pub contact_address:     String,
  pub telephone:           Option<String>,
  pub mobile:              Option<String>,
  pub email:               Option<String>,
  pub occupation:          Option<String>,
  pub trade_license_no:    Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComplaintDetails {
  pub description:     String,
  /// Statute the complaint invokes, if any.
  pub law_section:     Option<String>,
  pub expected_remedy: Option<String>,
}

/// Descriptor of a file already uploaded to attachment storage. Raw bytes
/// never pass through the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
  pub file_name: String,
  pub file_url:  String,
  pub file_type: AttachmentKind,
}

// ─── Payment ─────────────────────────────────────────────────────────────────

/// The filing-fee sub-record. Its state is orthogonal to the complaint
/// status, but gates substantive processing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
  pub status:          PaymentStatus,
  /// Fee in minor currency units.
  pub amount:          i64,
  pub transaction_ref: Option<String>,
  pub paid_at:         Option<DateTime<Utc>>,
}

impl Payment {
  pub fn pending(amount: i64) -> Self {
    Self {
      status: PaymentStatus::Pending,
      amount,
      transaction_ref: None,
      paid_at: None,
    }
  }

  pub fn is_paid(&self) -> bool { self.status == PaymentStatus::Paid }
}

/// Filing fee per complainant type, in minor currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeSchedule {
  pub individual:    i64,
  pub institutional: i64,
}

impl Default for FeeSchedule {
  fn default() -> Self { Self { individual: 500, institutional: 1000 } }
}

impl FeeSchedule {
  pub fn fee_for(&self, kind: ComplainantType) -> i64 {
    match kind {
      ComplainantType::Individual => self.individual,
      ComplainantType::Institutional => self.institutional,
    }
  }
}

// ─── Complaint ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
  pub id:                Uuid,
  /// Human-facing identifier, e.g. `COM-2026-000042`.
  pub file_number:       String,
  pub complainant_type:  ComplainantType,
  pub complainant:       Complainant,
  pub opponent:          Opponent,
  pub complaint_details: ComplaintDetails,
  pub attachments:       Vec<Attachment>,
  pub status:            ComplaintStatus,
  pub payment:           Payment,
  pub owner_user_id:     Uuid,
  /// Optimistic-concurrency counter; incremented on every committed mutation.
  pub version:           u64,
  pub created_at:        DateTime<Utc>,
  pub updated_at:        DateTime<Utc>,
}

impl Complaint {
  /// Build a freshly filed complaint: `PENDING` with a `PENDING` payment.
  ///
  /// Called by store backends once they have allocated `file_number`.
  pub fn filed(
    id: Uuid,
    file_number: String,
    owner_user_id: Uuid,
    input: NewComplaint,
    fee: i64,
    now: DateTime<Utc>,
  ) -> Self {
    Self {
      id,
      file_number,
      complainant_type: input.complainant.complainant_type(),
      complainant: input.complainant,
      opponent: input.opponent,
      complaint_details: input.complaint_details,
      attachments: input.attachments,
      status: ComplaintStatus::Pending,
      payment: Payment::pending(fee),
      owner_user_id,
      version: 0,
      created_at: now,
      updated_at: now,
    }
  }

  /// Record a committed mutation.
  pub fn touch(&mut self, now: DateTime<Utc>) {
    self.version += 1;
    self.updated_at = now;
  }
}

/// Format the file number for the `seq`-th complaint in the store.
pub fn format_file_number(filed_at: DateTime<Utc>, seq: u64) -> String {
  format!("COM-{}-{seq:06}", filed_at.year())
}

// ─── NewComplaint ────────────────────────────────────────────────────────────

/// Input to [`crate::Engine::create`]. The variant is carried by
/// `complainant`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComplaint {
  pub complainant:       Complainant,
  pub opponent:          Opponent,
  pub complaint_details: ComplaintDetails,
  #[serde(default)]
  pub attachments:       Vec<Attachment>,
}

impl NewComplaint {
  /// Boundary validation; the engine never sees an incomplete record.
  pub fn validate(&self) -> Result<()> {
    self.complainant.validate()?;
    require("opponent.nameOrInstitution", &self.opponent.name_or_institution)?;
    require("opponent.contactAddress", &self.opponent.contact_address)?;
    require("complaintDetails.description", &self.complaint_details.description)?;
    for (i, a) in self.attachments.iter().enumerate() {
      require(&format!("attachments[{i}].fileName"), &a.file_name)?;
      require(&format!("attachments[{i}].fileUrl"), &a.file_url)?;
    }
    Ok(())
  }
}

fn present(value: Option<&str>) -> bool {
  value.is_some_and(|v| !v.trim().is_empty())
}

pub(crate) fn require(field: &str, value: &str) -> Result<()> {
  if value.trim().is_empty() {
    return Err(Error::Validation(format!("{field} is required")));
  }
  Ok(())
}
