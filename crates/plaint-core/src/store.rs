//! The `ComplaintStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `plaint-store-sqlite`).
//! It exposes persistence primitives only; every rule about who may do what
//! and which moves are legal lives in the [`Engine`](crate::Engine).

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  complaint::{ComplainantType, Complaint, ComplaintStatus, NewComplaint},
  response::{Response, Timeline},
  stats::{ComplaintSummary, TypeCounts},
};

pub const DEFAULT_PAGE_SIZE: usize = 50;
pub const MAX_PAGE_SIZE: usize = 200;

// ─── Query types ─────────────────────────────────────────────────────────────

/// Filters for complaint listings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComplaintQuery {
  /// Free text matched against file number, complainant name or institution,
  /// and opponent name.
  pub text:             Option<String>,
  pub complainant_type: Option<ComplainantType>,
  pub status:           Option<ComplaintStatus>,
  pub created_after:    Option<DateTime<Utc>>,
  pub created_before:   Option<DateTime<Utc>>,
  /// Restrict to one filer. Set by the engine for citizens.
  pub owner:            Option<Uuid>,
  pub limit:            Option<usize>,
  pub offset:           Option<usize>,
}

impl ComplaintQuery {
  /// Effective `(limit, offset)` after defaults and the size cap.
  pub fn page(&self) -> (usize, usize) {
    PageRequest { limit: self.limit, offset: self.offset }.resolve()
  }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PageRequest {
  pub limit:  Option<usize>,
  pub offset: Option<usize>,
}

impl PageRequest {
  pub fn resolve(self) -> (usize, usize) {
    let limit = self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    (limit, self.offset.unwrap_or(0))
  }
}

/// One page of a complaint listing, most recent first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintPage {
  /// Size of the whole filtered set, not just this page.
  pub total:   u64,
  /// Per-variant counts over the whole filtered set.
  pub by_type: TypeCounts,
  pub items:   Vec<Complaint>,
}

/// Result of a versioned write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
  Committed,
  /// The stored version no longer matched; nothing was written.
  VersionMismatch,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a complaint store backend.
///
/// A complaint and its responses form one consistency boundary. Writes that
/// change a complaint are compare-and-swap on [`Complaint::version`]; a
/// response append shares that transaction so both persist or neither does.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait ComplaintStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Complaints ────────────────────────────────────────────────────────

  /// Persist a new complaint, allocating its id and a unique file number.
  /// Built with [`Complaint::filed`].
  fn insert_complaint(
    &self,
    input: NewComplaint,
    owner_user_id: Uuid,
    fee: i64,
  ) -> impl Future<Output = Result<Complaint, Self::Error>> + Send + '_;

  /// Retrieve a complaint by id. Returns `None` if not found.
  fn get_complaint(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Complaint>, Self::Error>> + Send + '_;

  /// Filtered listing, ordered by `created_at` descending with ties broken by
  /// file number descending.
  fn list_complaints<'a>(
    &'a self,
    query: &'a ComplaintQuery,
  ) -> impl Future<Output = Result<ComplaintPage, Self::Error>> + Send + 'a;

  /// Overwrite the mutable state of `complaint` (status, payment, version,
  /// `updated_at`) if the stored version still equals `expected_version`.
  fn commit_complaint(
    &self,
    complaint: Complaint,
    expected_version: u64,
  ) -> impl Future<Output = Result<CommitOutcome, Self::Error>> + Send + '_;

  /// As [`commit_complaint`](Self::commit_complaint), and insert `response`
  /// in the same transaction.
  fn commit_response(
    &self,
    complaint: Complaint,
    expected_version: u64,
    response: Response,
  ) -> impl Future<Output = Result<CommitOutcome, Self::Error>> + Send + '_;

  // ── Responses ─────────────────────────────────────────────────────────

  fn get_response(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Response>, Self::Error>> + Send + '_;

  /// Replace the editable fields of an existing response. Returns `false` if
  /// no such response exists.
  fn update_response(
    &self,
    response: Response,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Responses for a complaint, newest first, with the total count.
  fn list_responses(
    &self,
    complaint_id: Uuid,
    limit: usize,
    offset: usize,
  ) -> impl Future<Output = Result<Timeline, Self::Error>> + Send + '_;

  // ── Projections ───────────────────────────────────────────────────────

  /// Type, status and filing date of every complaint, optionally for one
  /// owner.
  fn complaint_summaries(
    &self,
    owner: Option<Uuid>,
  ) -> impl Future<Output = Result<Vec<ComplaintSummary>, Self::Error>> + Send + '_;

  /// Number of responses across complaints, optionally for one owner.
  fn count_responses(
    &self,
    owner: Option<Uuid>,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;
}
