use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use supportdesk_shared::ContractError;
use thiserror::Error;

/// Request-level failures. Each maps to one status and a `{ "error": ... }`
/// body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Contract(#[from] ContractError),

    #[error("invalid request body: {0}")]
    BadBody(String),

    #[error("widget not found")]
    NotFound,

    #[error("widget is not active")]
    Inactive,

    #[error("reply service unavailable: {0}")]
    Upstream(String),
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Contract(_) | Self::BadBody(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Inactive => StatusCode::FORBIDDEN,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, %status, "request rejected");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
