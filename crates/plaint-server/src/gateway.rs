//! A redirect-style payment gateway with SHA-256 signed completion notices.
//!
//! The checkout URL carries the complaint id, its variant, the file number
//! and the fee as query parameters. The gateway reports back by sending the
//! citizen to the callback route with a `signature` equal to the lowercase
//! hex digest of `complaint_id:status:transaction_ref:secret`.

use plaint_core::{
  Error, Result,
  complaint::PaymentStatus,
  payment::{CheckoutRequest, PaymentCallback, PaymentGateway},
};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
  /// Checkout page the citizen is redirected to.
  pub base_url: String,
  /// Shared secret used to sign completion notices.
  pub secret:   String,
}

pub struct SignedRedirectGateway {
  config: GatewayConfig,
}

impl SignedRedirectGateway {
  pub fn new(config: GatewayConfig) -> Self { Self { config } }

  /// Signature the gateway is expected to attach to a completion notice.
  pub fn sign(
    &self,
    complaint_id: Uuid,
    status: PaymentStatus,
    transaction_ref: Option<&str>,
  ) -> String {
    let mut hasher = Sha256::new();
    hasher.update(complaint_id.hyphenated().to_string());
    hasher.update(b":");
    hasher.update(status.to_string());
    hasher.update(b":");
    hasher.update(transaction_ref.unwrap_or_default());
    hasher.update(b":");
    hasher.update(&self.config.secret);
    hex::encode(hasher.finalize())
  }
}

impl PaymentGateway for SignedRedirectGateway {
  fn checkout_url(&self, request: &CheckoutRequest) -> Result<String> {
    let base = self.config.base_url.trim();
    if base.is_empty() {
      return Err(Error::Gateway("no checkout base_url configured".into()));
    }
    let sep = if base.contains('?') { '&' } else { '?' };
    Ok(format!(
      "{base}{sep}complaint_id={}&complaint_type={}&file_number={}&amount={}",
      request.complaint_id, request.complaint_type, request.file_number, request.amount,
    ))
  }

  fn verify_callback(&self, callback: &PaymentCallback) -> bool {
    let expected = self.sign(
      callback.complaint_id,
      callback.status,
      callback.transaction_ref.as_deref(),
    );
    expected.eq_ignore_ascii_case(callback.signature.trim())
  }
}
