//! Email verification endpoints.

use crate::error::AppError;
use crate::state::AppState;
use crate::WebResult;
use axum::{extract::State, Json};
use dauproof_core::identity::normalize_email;
use serde::{Deserialize, Serialize};

/// `POST /api/send-code` request body.
#[derive(Deserialize)]
pub struct SendCodeRequest {
    /// Address to challenge; must end in the configured domain.
    pub email: Option<String>,
}

/// `POST /api/send-code` response body.
#[derive(Serialize)]
pub struct SendCodeResponse {
    /// Always true on success; delivery is best-effort.
    pub ok: bool,
}

/// Request a 6-digit verification code.
///
/// Returns success as soon as the code is stored; delivery failures are
/// logged, never surfaced.
///
/// # Errors
///
/// 400 `INVALID_DOMAIN` for addresses outside the allowed domain, 400
/// `INVALID_INPUT` when the email is missing.
pub async fn send_code(
    State(state): State<AppState>,
    Json(request): Json<SendCodeRequest>,
) -> WebResult<Json<SendCodeResponse>> {
    let Some(email) = request.email else {
        return Err(AppError::invalid_input("email is required"));
    };

    state.service.identity().request_code(&email)?;
    Ok(Json(SendCodeResponse { ok: true }))
}

/// `POST /api/verify-code` request body.
#[derive(Deserialize)]
pub struct VerifyCodeRequest {
    /// Address the code was sent to.
    pub email: Option<String>,
    /// The 6-digit code, compared exactly.
    pub code: Option<String>,
}

/// `POST /api/verify-code` response body.
#[derive(Serialize)]
pub struct VerifyCodeResponse {
    /// True when the code checked out.
    pub ok: bool,
    /// Normalized email now holding a verified-session marker.
    pub email: String,
}

/// Check a verification code and mark the email verified.
///
/// # Errors
///
/// 400 `INVALID_CODE` for a wrong or expired code, 400 `INVALID_INPUT`
/// when a field is missing.
pub async fn verify_code(
    State(state): State<AppState>,
    Json(request): Json<VerifyCodeRequest>,
) -> WebResult<Json<VerifyCodeResponse>> {
    let (Some(email), Some(code)) = (request.email, request.code) else {
        return Err(AppError::invalid_input("email and code are required"));
    };

    let identity = state.service.identity();
    if !identity.verify_code(&email, &code) {
        return Err(dauproof_core::StampError::InvalidCode.into());
    }

    identity.mark_verified(&email);
    Ok(Json(VerifyCodeResponse {
        ok: true,
        email: normalize_email(&email),
    }))
}
