//! Request-level error taxonomy and its HTTP mapping.
//!
//! Two kinds reach the wire: bad input (400, message surfaced verbatim) and
//! anything that went wrong past validation (500, collapsed to a generic
//! message). The full upstream detail is logged server-side only.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::{error, warn};

use crate::protocol::ErrorOut;

#[derive(Debug, Error)]
pub enum ApiError {
  /// Caller sent something unusable. The message goes back verbatim.
  #[error("{0}")]
  InvalidRequest(String),
  /// Upstream call or response decoding failed. `public` is all the caller
  /// sees; `detail` stays in the server log.
  #[error("{public}: {detail}")]
  Upstream { public: &'static str, detail: String },
}

impl ApiError {
  pub fn extraction(err: impl std::fmt::Display) -> Self {
    ApiError::Upstream { public: "Failed to extract problem details", detail: err.to_string() }
  }

  pub fn generation(err: impl std::fmt::Display) -> Self {
    ApiError::Upstream { public: "Failed to generate solution", detail: err.to_string() }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::InvalidRequest(message) => {
        warn!(target: "snapsolve", %message, "rejecting invalid request");
        (StatusCode::BAD_REQUEST, Json(ErrorOut { error: message })).into_response()
      }
      ApiError::Upstream { public, detail } => {
        error!(target: "snapsolve", %detail, "upstream completion call failed");
        (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorOut { error: public.to_string() }))
          .into_response()
      }
    }
  }
}
