//! The payment-gateway seam.
//!
//! The engine never talks to a gateway on its own initiative. It asks for a
//! checkout URL when a citizen starts paying, and it trusts a completion
//! callback only after the gateway implementation has verified it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Result,
  complaint::{ComplainantType, Complaint, PaymentStatus},
};

/// What the gateway needs to start a checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
  pub complaint_id:   Uuid,
  pub complaint_type: ComplainantType,
  pub file_number:    String,
  pub amount:         i64,
}

impl From<&Complaint> for CheckoutRequest {
  fn from(c: &Complaint) -> Self {
    Self {
      complaint_id:   c.id,
      complaint_type: c.complainant_type,
      file_number:    c.file_number.clone(),
      amount:         c.payment.amount,
    }
  }
}

/// A completion notice relayed from the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentCallback {
  pub complaint_id:    Uuid,
  pub status:          PaymentStatus,
  pub transaction_ref: Option<String>,
  /// Gateway-specific proof that the notice is genuine.
  pub signature:       String,
}

/// Result of [`crate::Engine::begin_payment`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkout {
  pub redirect_url: String,
  pub complaint:    Complaint,
}

pub trait PaymentGateway: Send + Sync {
  /// URL the citizen is redirected to in order to pay.
  fn checkout_url(&self, request: &CheckoutRequest) -> Result<String>;

  /// Whether `callback` really came from the gateway.
  fn verify_callback(&self, callback: &PaymentCallback) -> bool;
}
