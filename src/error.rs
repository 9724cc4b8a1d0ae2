// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::auth::JwtError;
use crate::bulk::BulkError;
use crate::catalog::CategoryError;
use crate::database::StoreError;

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest {
        message: String,
        details: Option<Value>,
    },

    // 401 Unauthorized
    Unauthorized(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict
    Conflict(String),

    // 500 Internal Server Error
    InternalServerError {
        error: String,
        message: Option<String>,
    },
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::InternalServerError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest { message, .. } => message,
            ApiError::Unauthorized(msg) => msg,
            ApiError::Forbidden(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::Conflict(msg) => msg,
            ApiError::InternalServerError { error, .. } => error,
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        match self {
            ApiError::BadRequest {
                message,
                details: Some(details),
            } => json!({ "error": message, "details": details }),
            ApiError::InternalServerError {
                error,
                message: Some(message),
            } => json!({ "error": error, "message": message }),
            _ => json!({ "error": self.message() }),
        }
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_request_with_details(message: impl Into<String>, details: Value) -> Self {
        ApiError::BadRequest {
            message: message.into(),
            details: Some(details),
        }
    }

    pub fn unauthorized() -> Self {
        ApiError::Unauthorized("Unauthorized".to_string())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn internal_server_error(error: impl Into<String>) -> Self {
        ApiError::InternalServerError {
            error: error.into(),
            message: None,
        }
    }

    pub fn internal_with_message(error: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::InternalServerError {
            error: error.into(),
            message: Some(message.into()),
        }
    }
}

// Convert other error types to ApiError
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { collection, id } => {
                ApiError::not_found(format!("{} {} not found", collection, id))
            }
            StoreError::AlreadyExists { collection, id } => {
                ApiError::conflict(format!("{} {} already exists", collection, id))
            }
            StoreError::Sqlx(sqlx_err) => {
                // Log the real error but return generic message
                tracing::error!("SQLx error: {}", sqlx_err);
                ApiError::internal_server_error("Database error occurred")
            }
            other => {
                tracing::error!("Store error: {}", other);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
        }
    }
}

impl From<BulkError> for ApiError {
    fn from(err: BulkError) -> Self {
        match err {
            BulkError::Validation(msg) => ApiError::bad_request(msg),
            BulkError::Forbidden(msg) => ApiError::forbidden(msg),
            BulkError::NotFound { .. } => ApiError::not_found(err.to_string()),
            BulkError::Constraint(ref violations) => {
                let message = err.to_string();
                if violations.len() > 1 {
                    ApiError::bad_request_with_details(message, json!(violations))
                } else {
                    ApiError::bad_request(message)
                }
            }
            BulkError::UnknownAction(_) => {
                ApiError::internal_with_message("Bulk operation failed", err.to_string())
            }
            BulkError::Storage(store_err) => {
                tracing::error!("Bulk commit failed: {}", store_err);
                ApiError::internal_server_error("Bulk operation failed")
            }
        }
    }
}

impl From<CategoryError> for ApiError {
    fn from(err: CategoryError) -> Self {
        match err {
            CategoryError::NotFound(_) => ApiError::not_found(err.to_string()),
            CategoryError::AlreadyExists(_) => ApiError::conflict(err.to_string()),
            CategoryError::Store(store_err) => store_err.into(),
            CategoryError::Cycle { ref path, .. } => {
                let details = json!({ "path": path });
                ApiError::bad_request_with_details(err.to_string(), details)
            }
            _ => ApiError::bad_request(err.to_string()),
        }
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::InvalidToken(_) => ApiError::unauthorized(),
            other => {
                tracing::error!("JWT error: {}", other);
                ApiError::internal_server_error("Failed to process token")
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bulk::Violation;

    #[test]
    fn single_guard_failure_is_a_plain_400() {
        let err: ApiError = BulkError::Constraint(vec![Violation::new(
            "cat1",
            "Category cat1 has subcategories",
        )])
        .into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_json(), json!({ "error": "Category cat1 has subcategories" }));
    }

    #[test]
    fn multiple_guard_failures_carry_details() {
        let err: ApiError = BulkError::Constraint(vec![
            Violation::new("s1", "Shop s1 has products"),
            Violation::new("s1", "Shop s1 has auctions"),
        ])
        .into();
        let body = err.to_json();
        assert_eq!(body["error"], "Shop s1 has products; Shop s1 has auctions");
        assert_eq!(body["details"][1]["error"], "Shop s1 has auctions");
    }

    #[test]
    fn unknown_action_is_a_500_with_message() {
        let err: ApiError = BulkError::UnknownAction("explode".into()).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.to_json(),
            json!({ "error": "Bulk operation failed", "message": "Unknown action: explode" })
        );
    }

    #[test]
    fn forbidden_and_unauthorized_bodies() {
        let err: ApiError = BulkError::Forbidden("Admin access required".into()).into();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(err.to_json(), json!({ "error": "Admin access required" }));

        let err: ApiError = JwtError::InvalidToken("bad".into()).into();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.to_json(), json!({ "error": "Unauthorized" }));
    }

    #[test]
    fn storage_details_are_not_leaked() {
        let err: ApiError = BulkError::Storage(StoreError::InvalidDocument("secret table".into())).into();
        assert_eq!(err.to_json(), json!({ "error": "Bulk operation failed" }));
    }
}
