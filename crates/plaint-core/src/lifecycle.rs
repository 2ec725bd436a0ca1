//! The complaint state machine and the payment sub-machine.
//!
//! ```text
//! PENDING ──► IN_REVIEW ──► HEARING_SCHEDULED ──► IN_PROGRESS ──► RESOLVED
//!    │            │  │              │                  │
//!    │            │  └──────────────┼──► IN_PROGRESS   └──────────► REJECTED
//!    └────────────┴─────────────────┴──────────────────────────────► REJECTED
//! ```
//!
//! Moves never go backwards. `RESOLVED` and `REJECTED` are terminal. Moving to
//! `HEARING_SCHEDULED`, `IN_PROGRESS` or `RESOLVED` requires a `PAID` payment.
//!
//! The functions here mutate a [`Complaint`] in memory and report whether
//! anything changed; committing (version bump, persistence) is the engine's
//! job.

use chrono::{DateTime, Utc};

use crate::{
  Error, Result,
  complaint::{Complaint, ComplaintStatus, PaymentStatus},
};

// ─── Complaint status ────────────────────────────────────────────────────────

impl ComplaintStatus {
  /// The transition table: every status reachable in one step.
  pub fn allowed_targets(self) -> &'static [ComplaintStatus] {
    use ComplaintStatus::*;
    match self {
      Pending => &[InReview, Rejected],
      InReview => &[HearingScheduled, InProgress, Resolved, Rejected],
      HearingScheduled => &[InProgress, Resolved, Rejected],
      InProgress => &[Resolved, Rejected],
      Resolved | Rejected => &[],
    }
  }

  pub fn can_transition_to(self, to: ComplaintStatus) -> bool {
    self.allowed_targets().contains(&to)
  }

  pub fn is_terminal(self) -> bool { matches!(self, Self::Resolved | Self::Rejected) }

  /// Position in the progress order
  /// `PENDING < IN_REVIEW < {HEARING_SCHEDULED, IN_PROGRESS} < {RESOLVED, REJECTED}`.
  pub fn rank(self) -> u8 {
    match self {
      Self::Pending => 0,
      Self::InReview => 1,
      Self::HearingScheduled | Self::InProgress => 2,
      Self::Resolved | Self::Rejected => 3,
    }
  }

  /// Whether entering this status is blocked until the fee is paid.
  pub fn requires_payment(self) -> bool {
    matches!(self, Self::HearingScheduled | Self::InProgress | Self::Resolved)
  }

  /// Counted as "processing" in statistics.
  pub fn is_processing(self) -> bool {
    matches!(self, Self::InReview | Self::HearingScheduled | Self::InProgress)
  }
}

/// Move `complaint` to `to`.
///
/// Returns `Ok(false)` without touching anything when `to` is already the
/// current status. Errors, in order of precedence: [`Error::TerminalState`],
/// [`Error::PaymentRequired`], [`Error::IllegalTransition`].
pub fn apply_transition(
  complaint: &mut Complaint,
  to: ComplaintStatus,
  now: DateTime<Utc>,
) -> Result<bool> {
  let from = complaint.status;
  if from == to {
    return Ok(false);
  }
  if from.is_terminal() {
    return Err(Error::TerminalState { status: from });
  }
  if to.requires_payment() && !complaint.payment.is_paid() {
    return Err(Error::PaymentRequired {
      target:  to,
      payment: complaint.payment.status,
    });
  }
  if !from.can_transition_to(to) {
    return Err(Error::IllegalTransition { from, to });
  }
  complaint.status = to;
  complaint.updated_at = now;
  Ok(true)
}

/// Reject any status change on a closed complaint; re-asserting the terminal
/// status itself is allowed (annotations on a closed file).
pub fn ensure_open_for(complaint: &Complaint, asserted: ComplaintStatus) -> Result<()> {
  if complaint.status.is_terminal() && asserted != complaint.status {
    return Err(Error::TerminalState { status: complaint.status });
  }
  Ok(())
}

// ─── Payment status ──────────────────────────────────────────────────────────

impl PaymentStatus {
  /// `PENDING → {PAID, FAILED}`, `FAILED → PENDING`; `PAID` is absorbing.
  pub fn can_transition_to(self, to: PaymentStatus) -> bool {
    use PaymentStatus::*;
    matches!((self, to), (Pending, Paid) | (Pending, Failed) | (Failed, Pending))
  }
}

/// Move the payment sub-record to `to`.
///
/// Re-applying the current status is a no-op (`Ok(false)`), which makes
/// duplicate gateway callbacks harmless. A `transaction_ref`, when given, is
/// recorded on any successful move.
pub fn apply_payment(
  complaint: &mut Complaint,
  to: PaymentStatus,
  transaction_ref: Option<String>,
  now: DateTime<Utc>,
) -> Result<bool> {
  let from = complaint.payment.status;
  if from == to {
    return Ok(false);
  }
  if !from.can_transition_to(to) {
    return Err(Error::IllegalPaymentTransition { from, to });
  }
  let payment = &mut complaint.payment;
  payment.status = to;
  if transaction_ref.is_some() {
    payment.transaction_ref = transaction_ref;
  }
  payment.paid_at = (to == PaymentStatus::Paid).then_some(now);
  complaint.updated_at = now;
  Ok(true)
}
