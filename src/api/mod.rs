//! HTTP boundary: error translation shared by the endpoint modules.

use crate::core::error::ChatError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::error;
use serde::Serialize;

pub mod chat;

/// User-facing detail returned with a 429, regardless of what the upstream
/// quota error actually said.
pub const HIGH_TRAFFIC_DETAIL: &str =
    "Our AI is currently experiencing high traffic. Please try again in a moment.";

#[derive(Serialize, Debug)]
pub struct ErrorBody {
    pub detail: String,
}

/// Wrapper translating core failures into status codes at the routing
/// boundary. Nothing is swallowed; server faults keep their message in the
/// body, quota errors get the fixed high-traffic detail.
#[derive(Debug)]
pub struct ApiError(pub ChatError);

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self.0 {
            ChatError::InvalidMode(_) => {
                (StatusCode::BAD_REQUEST, "Invalid mode specified.".to_owned())
            }
            ChatError::QuotaExceeded(msg) => {
                error!("upstream quota exhausted: {msg}");
                (StatusCode::TOO_MANY_REQUESTS, HIGH_TRAFFIC_DETAIL.to_owned())
            }
            ChatError::Upstream(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error generating response: {msg}"),
            ),
            ChatError::Store(e) => {
                error!("store failure: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        };

        (status, Json(ErrorBody { detail })).into_response()
    }
}
