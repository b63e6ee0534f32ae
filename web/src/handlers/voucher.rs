//! Voucher issuance endpoint.

use crate::error::AppError;
use crate::state::AppState;
use crate::WebResult;
use alloy::primitives::Address;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

/// `POST /api/issue-voucher` request body.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueVoucherRequest {
    /// Id of the scanned ticket; consumed by this call.
    pub ticket_id: Option<String>,
    /// Participant wallet address, 0x-prefixed hex.
    pub participant: Option<String>,
    /// Email holding a live verified-session marker.
    pub email: Option<String>,
}

/// `POST /api/issue-voucher` response body.
///
/// Carries everything needed to submit
/// `recordParticipation(campaignId, expiry, nonce, signature)`: the
/// contract expects `nonceHash` (keccak-256 of the raw nonce), not the raw
/// string, and it is exactly the value that was signed.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueVoucherResponse {
    /// Participant the voucher is bound to (checksummed).
    pub participant: String,
    /// Campaign the voucher is valid for.
    pub campaign_id: u64,
    /// Voucher validity deadline, unix seconds.
    pub expiry: u64,
    /// Raw ticket nonce.
    pub nonce: String,
    /// keccak-256 of the raw nonce, 0x-prefixed.
    pub nonce_hash: String,
    /// 65-byte EIP-712 signature, 0x-prefixed hex.
    pub signature: String,
}

/// Run the full issuance gate sequence: claim the ticket, require a
/// verified email, require the voucher window to be open, sign.
///
/// # Errors
///
/// 400 with the first failing gate's code (`NOT_FOUND`, `ALREADY_USED`,
/// `EXPIRED`, `NOT_VERIFIED`, `VOUCHER_EXPIRED`, `INVALID_INPUT`); 500
/// `SIGNING_KEY_UNAVAILABLE` when no signing key is configured.
pub async fn issue_voucher(
    State(state): State<AppState>,
    Json(request): Json<IssueVoucherRequest>,
) -> WebResult<Json<IssueVoucherResponse>> {
    let (Some(ticket_id), Some(participant), Some(email)) =
        (request.ticket_id, request.participant, request.email)
    else {
        return Err(AppError::invalid_input(
            "ticketId, participant and email are required",
        ));
    };

    let participant: Address = participant
        .parse()
        .map_err(|_| AppError::invalid_input("participant is not a valid address"))?;

    let voucher = state.service.issue_voucher(&ticket_id, participant, &email)?;
    Ok(Json(IssueVoucherResponse {
        participant: voucher.participant.to_string(),
        campaign_id: voucher.campaign_id,
        expiry: voucher.expiry,
        nonce: voucher.nonce,
        nonce_hash: voucher.nonce_hash.to_string(),
        signature: voucher.signature,
    }))
}
