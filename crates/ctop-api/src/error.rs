//! API error types and JSON error response formatting.
//!
//! ApiError gives every endpoint the same JSON error body and maps internal
//! errors to HTTP status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use ctop_action::{ActionError, ActionErrorBody};
use ctop_recommend::{CatalogError, RecommendError};
use serde::{Deserialize, Serialize};

/// JSON error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable error code (e.g., "bad_request", "not_found").
    pub error: String,
    /// Human-readable error message.
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// API error type that maps to HTTP status codes and JSON responses.
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request - missing or invalid parameters.
    BadRequest(String),
    /// 422 Unprocessable Entity - input parsed but failed validation.
    UnprocessableEntity {
        message: String,
        details: Option<serde_json::Value>,
    },
    /// 500 Internal Server Error.
    Internal(String),
    /// An action call failed; answered in the action-server error format.
    Action {
        action_name: String,
        source: ActionError,
    },
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::UnprocessableEntity { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Action { source, .. } => match source {
                ActionError::UnknownAction(_) => StatusCode::NOT_FOUND,
                ActionError::Rejected { .. } | ActionError::Recommend(_) => {
                    StatusCode::BAD_REQUEST
                }
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (error_code, message, details) = match self {
            ApiError::BadRequest(msg) => ("bad_request", msg, None),
            ApiError::UnprocessableEntity { message, details } => {
                ("unprocessable_entity", message, details)
            }
            ApiError::Internal(msg) => ("internal_error", msg, None),
            ApiError::Action {
                action_name,
                source,
            } => {
                let body = ActionErrorBody {
                    error: source.to_string(),
                    action_name,
                };
                return (status, Json(body)).into_response();
            }
        };

        let body = ErrorBody {
            error: error_code.to_string(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<RecommendError> for ApiError {
    fn from(err: RecommendError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        let indices = err.malformed_indices();
        let details = (!indices.is_empty())
            .then(|| serde_json::json!({ "malformed_indices": indices }));
        ApiError::UnprocessableEntity {
            message: err.to_string(),
            details,
        }
    }
}

impl ApiError {
    pub fn action(action_name: impl Into<String>, source: ActionError) -> Self {
        ApiError::Action {
            action_name: action_name.into(),
            source,
        }
    }
}
