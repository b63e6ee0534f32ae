//! Error types for web handlers.
//!
//! Bridges the domain error taxonomy to HTTP responses via Axum's
//! `IntoResponse`. User-correctable failures map to 400 with an instructive
//! message telling the user which step to redo; configuration and signing
//! faults map to 500.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dauproof_core::StampError;
use serde::Serialize;
use tracing::error;

/// Application error type for web handlers.
#[derive(Debug)]
pub struct AppError {
    /// HTTP status code.
    status: StatusCode,
    /// Stable machine-readable code for client error handling.
    code: String,
    /// User-facing message.
    message: String,
}

impl AppError {
    /// Create a new application error.
    #[must_use]
    pub const fn new(status: StatusCode, code: String, message: String) -> Self {
        Self {
            status,
            code,
            message,
        }
    }

    /// Create a 400 Bad Request error.
    #[must_use]
    pub fn bad_request(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, code.into(), message.into())
    }

    /// Create a 400 for a missing or malformed request field.
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::bad_request("INVALID_INPUT", message)
    }

    /// Create a 404 Not Found error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            "NOT_FOUND".to_string(),
            message.into(),
        )
    }
}

/// JSON error body: `{"error": {"code", "message"}}`.
#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<StampError> for AppError {
    fn from(err: StampError) -> Self {
        let status = if err.is_user_error() {
            StatusCode::BAD_REQUEST
        } else {
            error!(error = %err, "issuance pipeline fault");
            StatusCode::INTERNAL_SERVER_ERROR
        };

        // Instructive messages: every failure requires a new user action,
        // never an automatic retry.
        let message = match &err {
            StampError::TicketNotFound => {
                "Unknown or expired code. Rescan the code on screen.".to_string()
            }
            StampError::TicketAlreadyUsed => {
                "This code has already been scanned. Rescan the current code.".to_string()
            }
            StampError::TicketExpired => {
                "Code expired (older than 30s). Rescan the code on screen.".to_string()
            }
            StampError::NotVerified => {
                "Verify your email address first, then scan again.".to_string()
            }
            StampError::VoucherExpired => {
                "The voucher window has passed. Rescan the code on screen.".to_string()
            }
            other => other.to_string(),
        };

        Self::new(status, err.code().to_string(), message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_errors_map_to_400() {
        let err: AppError = StampError::TicketAlreadyUsed.into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.code, "ALREADY_USED");
    }

    #[test]
    fn test_system_faults_map_to_500() {
        let err: AppError = StampError::SigningKeyUnavailable.into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code, "SIGNING_KEY_UNAVAILABLE");
    }
}
