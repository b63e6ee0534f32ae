//! Display endpoint: the ticket currently rotating on screen.

use crate::error::AppError;
use crate::state::AppState;
use crate::WebResult;
use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// `GET /api/current-ticket` response body.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentTicketResponse {
    /// Ticket id to encode in the scan URL.
    pub id: String,
    /// Campaign the ticket authorizes.
    pub campaign_id: u64,
    /// Voucher validity deadline, unix seconds.
    pub expiry: u64,
    /// When the display loop minted this ticket.
    pub created_at: DateTime<Utc>,
}

/// The ticket the display loop most recently minted.
///
/// # Errors
///
/// 404 until the display loop has produced its first ticket.
pub async fn current_ticket(
    State(state): State<AppState>,
) -> WebResult<Json<CurrentTicketResponse>> {
    let displayed = state.displayed.borrow().clone();
    let Some(ticket) = displayed else {
        return Err(AppError::not_found("no ticket on display yet"));
    };

    Ok(Json(CurrentTicketResponse {
        id: ticket.id,
        campaign_id: ticket.campaign_id,
        expiry: ticket.expiry,
        created_at: ticket.created_at,
    }))
}
