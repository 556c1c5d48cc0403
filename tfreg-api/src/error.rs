//! API error handling.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tfreg_core::error::RegistryError;

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    code: String,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(status: StatusCode, message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            code: code.into(),
        }
    }

    /// Bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message, "BAD_REQUEST")
    }

    /// Forbidden error, for callers lacking the required role.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message, "UNAUTHORIZED")
    }

    /// Internal server error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message, "INTERNAL_ERROR")
    }

    /// Validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message, "VALIDATION_ERROR")
    }

    /// HTTP status of this error.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Machine-readable error code.
    pub fn code(&self) -> &str {
        &self.code
    }
}

/// Error response body.
#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code,
                message: self.message,
            },
        };

        (self.status, Json(body)).into_response()
    }
}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        if err.is_access_error() {
            ApiError::forbidden(err.to_string())
        } else if err.is_validation_error() {
            ApiError::validation(err.to_string())
        } else {
            tracing::error!(error = %err, "Internal error");
            ApiError::internal("An internal error occurred")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tfreg_core::types::{Address, Role};

    #[test]
    fn test_registry_error_mapping() {
        let forbidden = ApiError::from(RegistryError::NotRegistrar(Address::zero()));
        assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

        let forbidden = ApiError::from(RegistryError::Unauthorized {
            account: Address::zero(),
            role: Role::Admin,
        });
        assert_eq!(forbidden.code(), "UNAUTHORIZED");

        let invalid = ApiError::from(RegistryError::InvalidAddress("0x12".into()));
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);

        let storage = ApiError::from(RegistryError::StorageError("disk full".into()));
        assert_eq!(storage.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
