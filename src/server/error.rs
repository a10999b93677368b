use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use tracing::error;

use crate::error::Error;

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// Error returned by handlers, rendered as `{"error": "..."}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    /// The cause is logged; the client only sees a generic message.
    pub fn internal(cause: &dyn std::fmt::Display) -> Self {
        error!(error = %cause, "Request failed");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        match e {
            Error::InvalidPeriod(_) => ApiError::bad_request(e.to_string()),
            Error::InvalidRange { .. } => {
                ApiError::bad_request("Start date cannot be after end date")
            }
            _ => ApiError::internal(&e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_errors_are_not_leaked() {
        let err = ApiError::from(Error::UpstreamUnavailable { status: 502 });
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, INTERNAL_ERROR_MESSAGE);
    }

    #[test]
    fn test_validation_errors_are_bad_requests() {
        let err = ApiError::from(Error::InvalidPeriod("year".into()));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Invalid period. Allowed values: day, week, month");

        let err = ApiError::from(Error::InvalidRange {
            start: "2022-02-01".into(),
            end: "2022-01-01".into(),
        });
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
}
