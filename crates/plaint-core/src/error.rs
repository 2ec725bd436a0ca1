//! Error types for `plaint-core`.

use thiserror::Error;
use uuid::Uuid;

use crate::complaint::{ComplaintStatus, PaymentStatus};

#[derive(Debug, Error)]
pub enum Error {
  /// Malformed or incomplete input; recoverable by correcting the input.
  #[error("validation failed: {0}")]
  Validation(String),

  /// The actor's role or ownership does not permit the operation.
  #[error("not authorized: {0}")]
  Authorization(String),

  #[error("complaint not found: {0}")]
  ComplaintNotFound(Uuid),

  #[error("response not found: {0}")]
  ResponseNotFound(Uuid),

  #[error("illegal status transition from {from} to {to}")]
  IllegalTransition {
    from: ComplaintStatus,
    to:   ComplaintStatus,
  },

  #[error("illegal payment transition from {from} to {to}")]
  IllegalPaymentTransition {
    from: PaymentStatus,
    to:   PaymentStatus,
  },

  /// The fee gate: the target status needs a cleared payment.
  #[error("payment required before moving to {target} (payment is {payment})")]
  PaymentRequired {
    target:  ComplaintStatus,
    payment: PaymentStatus,
  },

  #[error("complaint is closed with status {status}")]
  TerminalState { status: ComplaintStatus },

  /// Lost a concurrent-write race on the complaint aggregate.
  #[error("complaint {0} was modified concurrently")]
  Conflict(Uuid),

  #[error("payment gateway error: {0}")]
  Gateway(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Stable, machine-readable name of the error category.
  pub fn kind(&self) -> &'static str {
    match self {
      Self::Validation(_) => "validation",
      Self::Authorization(_) => "authorization",
      Self::ComplaintNotFound(_) | Self::ResponseNotFound(_) => "not_found",
      Self::IllegalTransition { .. } | Self::IllegalPaymentTransition { .. } => {
        "illegal_transition"
      }
      Self::PaymentRequired { .. } => "payment_required",
      Self::TerminalState { .. } => "terminal_state",
      Self::Conflict(_) => "conflict",
      Self::Gateway(_) => "gateway",
      Self::Store(_) => "store",
    }
  }

  pub(crate) fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
