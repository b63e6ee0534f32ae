//! Router configuration.

use crate::handlers::{display, health, identity, tickets, voucher};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build the complete Axum router.
///
/// All protocol routes live under `/api`; `/health` is unprefixed for
/// probes.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/create-ticket", post(tickets::create_ticket))
        .route("/claim-ticket", post(tickets::claim_ticket))
        .route("/send-code", post(identity::send_code))
        .route("/verify-code", post(identity::verify_code))
        .route("/issue-voucher", post(voucher::issue_voucher))
        .route("/current-ticket", get(display::current_ticket));

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
