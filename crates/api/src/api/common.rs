// Common DTOs for public API
//
// These types are shared across multiple API endpoints.

use axum::http::StatusCode;
use axum::Json;
use memorylane_core::TimelineError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Standard error response for API endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message describing what went wrong.
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }

    /// Convert to axum response tuple
    pub fn into_response(self, status: StatusCode) -> (StatusCode, Json<Self>) {
        (status, Json(self))
    }
}

/// Plain acknowledgement body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Event deleted")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Error half of every handler result
pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Map a service error onto a status code.
///
/// Validation messages go back to the client verbatim; backend details are
/// logged and replaced by a generic message.
pub fn api_error(operation: &str, err: TimelineError) -> ApiError {
    match err {
        TimelineError::Validation(e) => {
            tracing::debug!(operation, error = %e, "Rejected request");
            ErrorResponse::new(e.to_string()).into_response(StatusCode::BAD_REQUEST)
        }
        other => {
            tracing::error!(operation, error = %other, "Request failed");
            ErrorResponse::new(format!("Failed to {}", operation))
                .into_response(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memorylane_core::ValidationError;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let (status, Json(body)) = api_error("add event", ValidationError::MissingTitle.into());
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "title is required");
    }

    #[test]
    fn test_backend_errors_are_generic() {
        let (status, Json(body)) =
            api_error("add event", TimelineError::storage("connection refused"));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "Failed to add event");
        assert!(!body.error.contains("connection refused"));
    }
}
