//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use plaint_core::Error;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Engine(#[from] Error),

  #[error("bad request: {0}")]
  BadRequest(String),
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Engine(e) => match e {
        Error::Validation(_) => StatusCode::BAD_REQUEST,
        Error::Authorization(_) => StatusCode::FORBIDDEN,
        Error::ComplaintNotFound(_) | Error::ResponseNotFound(_) => StatusCode::NOT_FOUND,
        Error::PaymentRequired { .. } => StatusCode::PAYMENT_REQUIRED,
        Error::IllegalTransition { .. }
        | Error::IllegalPaymentTransition { .. }
        | Error::TerminalState { .. }
        | Error::Conflict(_) => StatusCode::CONFLICT,
        Error::Gateway(_) => StatusCode::BAD_GATEWAY,
        Error::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
      },
    }
  }

  fn kind(&self) -> &'static str {
    match self {
      ApiError::BadRequest(_) => "bad_request",
      ApiError::Engine(e) => e.kind(),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
    }
    let body = json!({ "error": self.to_string(), "kind": self.kind() });
    (status, Json(body)).into_response()
  }
}
