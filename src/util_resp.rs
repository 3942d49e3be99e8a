use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

pub type JsonResult<T> = Result<Json<T>, ApiError>;

pub fn bad_request(msg: impl Into<String>) -> ApiError {
    ApiError::Validation(msg.into())
}

pub fn err_not_found() -> ApiError {
    ApiError::NotFound
}

/// Every failure an operation can report to its caller. All failures are
/// synchronous; nothing in here triggers a retry.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed or inconsistent input. Reported with the offending detail.
    Validation(String),
    /// Unknown tournament, evaluator, manager, or round.
    NotFound,
    /// A pick already exists for the target group. Non-fatal: idempotent
    /// callers treat this as "already done".
    DuplicateSubmission,
    /// The store is unavailable or rejected a write.
    Persistence(String),
}

impl From<diesel::result::Error> for ApiError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => ApiError::NotFound,
            other => ApiError::Persistence(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound => {
                (StatusCode::NOT_FOUND, "not found".to_string())
            }
            ApiError::DuplicateSubmission => (
                StatusCode::CONFLICT,
                "a pick has already been submitted for this group".to_string(),
            ),
            ApiError::Persistence(msg) => {
                tracing::error!(error = %msg, "persistence failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "storage failure".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
