//! Ticket creation and claim endpoints.

use crate::error::AppError;
use crate::state::AppState;
use crate::WebResult;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

/// `POST /api/create-ticket` request body.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketRequest {
    /// Campaign the ticket authorizes.
    pub campaign_id: Option<u64>,
    /// Voucher validity deadline, unix seconds.
    pub expiry: Option<u64>,
    /// Opaque nonce string.
    pub nonce: Option<String>,
}

/// `POST /api/create-ticket` response body.
#[derive(Serialize)]
pub struct CreateTicketResponse {
    /// Fresh unguessable ticket id.
    pub id: String,
}

/// Mint a single-use scan ticket.
///
/// # Errors
///
/// 400 `INVALID_INPUT` when any field is missing.
pub async fn create_ticket(
    State(state): State<AppState>,
    Json(request): Json<CreateTicketRequest>,
) -> WebResult<Json<CreateTicketResponse>> {
    let (Some(campaign_id), Some(expiry), Some(nonce)) =
        (request.campaign_id, request.expiry, request.nonce)
    else {
        return Err(AppError::invalid_input(
            "campaignId, expiry and nonce are required",
        ));
    };

    let id = state.service.tickets().create(campaign_id, expiry, nonce);
    Ok(Json(CreateTicketResponse { id }))
}

/// `POST /api/claim-ticket` request body.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimTicketRequest {
    /// Id of the ticket to consume.
    pub ticket_id: Option<String>,
}

/// `POST /api/claim-ticket` response body: the claimed payload.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimTicketResponse {
    /// Campaign carried by the ticket.
    pub campaign_id: u64,
    /// Voucher validity deadline, unix seconds.
    pub expiry: u64,
    /// Raw nonce string.
    pub nonce: String,
}

/// Consume a ticket, exactly once.
///
/// # Errors
///
/// 400 with `NOT_FOUND`, `ALREADY_USED` or `EXPIRED` and an instructive
/// message; 400 `INVALID_INPUT` when the id is missing.
pub async fn claim_ticket(
    State(state): State<AppState>,
    Json(request): Json<ClaimTicketRequest>,
) -> WebResult<Json<ClaimTicketResponse>> {
    let Some(ticket_id) = request.ticket_id else {
        return Err(AppError::invalid_input("ticketId is required"));
    };

    let claimed = state.service.tickets().claim(&ticket_id)?;
    Ok(Json(ClaimTicketResponse {
        campaign_id: claimed.campaign_id,
        expiry: claimed.expiry,
        nonce: claimed.nonce,
    }))
}
