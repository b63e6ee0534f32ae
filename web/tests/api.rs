//! HTTP contract tests for the /api routes.

use alloy::primitives::Address;
use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::Utc;
use dauproof_core::providers::{ConsoleEmailProvider, EmailDispatcher};
use dauproof_core::{IdentityGate, IssuanceService, SystemClock, TicketStore, VoucherSigner};
use dauproof_web::{build_router, AppState, DisplayedTicket};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::watch;

// First default anvil/hardhat development key; never holds real funds.
const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
const PARTICIPANT: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

fn test_state(
    signer: Option<VoucherSigner>,
    displayed: watch::Receiver<Option<DisplayedTicket>>,
) -> AppState {
    let clock = Arc::new(SystemClock);
    let tickets = TicketStore::new(clock.clone());
    let identity = IdentityGate::new(
        "@dauphine.eu".to_string(),
        Arc::new(EmailDispatcher::Console(ConsoleEmailProvider::new())),
        clock.clone(),
    );
    let service = Arc::new(IssuanceService::new(tickets, identity, signer, clock));
    AppState::new(service, displayed)
}

fn test_server() -> (TestServer, AppState) {
    let signer = VoucherSigner::new(TEST_KEY, 11_155_111, Address::ZERO).unwrap();
    let (_tx, rx) = watch::channel(None);
    let state = test_state(Some(signer), rx);
    let server = TestServer::new(build_router(state.clone())).unwrap();
    (server, state)
}

fn error_code(body: &Value) -> &str {
    body["error"]["code"].as_str().unwrap_or_default()
}

async fn create_ticket(server: &TestServer, expiry: u64) -> String {
    let response = server
        .post("/api/create-ticket")
        .json(&json!({"campaignId": 1, "expiry": expiry, "nonce": "0xabc123"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    response.json::<Value>()["id"]
        .as_str()
        .unwrap()
        .to_string()
}

/// Walk the email verification flow over HTTP, reading the code out of the
/// gate's operational accessor (console provider never delivers anywhere).
async fn verify_email(server: &TestServer, state: &AppState, email: &str) {
    let response = server.post("/api/send-code").json(&json!({"email": email})).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["ok"], json!(true));

    let code = state.service.identity().pending_code(email).unwrap();
    let response = server
        .post("/api/verify-code")
        .json(&json!({"email": email, "code": code}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["email"], json!(email));
}

fn expiry_in(secs: i64) -> u64 {
    u64::try_from(Utc::now().timestamp() + secs).unwrap()
}

#[tokio::test]
async fn test_health() {
    let (server, _state) = test_server();
    let response = server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["status"], json!("ok"));
}

#[tokio::test]
async fn test_create_ticket_requires_all_fields() {
    let (server, _state) = test_server();
    let response = server
        .post("/api/create-ticket")
        .json(&json!({"campaignId": 1}))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&response.json()), "INVALID_INPUT");
}

#[tokio::test]
async fn test_claim_returns_payload_once() {
    let (server, _state) = test_server();
    let expiry = expiry_in(3600);
    let id = create_ticket(&server, expiry).await;

    let response = server
        .post("/api/claim-ticket")
        .json(&json!({"ticketId": id}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["campaignId"], json!(1));
    assert_eq!(body["expiry"], json!(expiry));
    assert_eq!(body["nonce"], json!("0xabc123"));

    let response = server
        .post("/api/claim-ticket")
        .json(&json!({"ticketId": id}))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&response.json()), "ALREADY_USED");
}

#[tokio::test]
async fn test_claim_unknown_ticket() {
    let (server, _state) = test_server();
    let response = server
        .post("/api/claim-ticket")
        .json(&json!({"ticketId": "nonexistent"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&response.json()), "NOT_FOUND");
}

#[tokio::test]
async fn test_send_code_rejects_foreign_domain() {
    let (server, state) = test_server();
    let response = server
        .post("/api/send-code")
        .json(&json!({"email": "bob@gmail.com"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&response.json()), "INVALID_DOMAIN");
    assert!(state.service.identity().pending_code("bob@gmail.com").is_none());
}

#[tokio::test]
async fn test_verify_code_rejects_wrong_code() {
    let (server, _state) = test_server();
    let response = server
        .post("/api/send-code")
        .json(&json!({"email": "alice@dauphine.eu"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = server
        .post("/api/verify-code")
        .json(&json!({"email": "alice@dauphine.eu", "code": "000000"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&response.json()), "INVALID_CODE");
}

#[tokio::test]
async fn test_issue_voucher_end_to_end_then_replay() {
    let (server, state) = test_server();
    let expiry = expiry_in(3600);
    let id = create_ticket(&server, expiry).await;
    verify_email(&server, &state, "alice@dauphine.eu").await;

    let request = json!({
        "ticketId": id,
        "participant": PARTICIPANT,
        "email": "alice@dauphine.eu",
    });
    let response = server.post("/api/issue-voucher").json(&request).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["participant"], json!(PARTICIPANT));
    assert_eq!(body["campaignId"], json!(1));
    assert_eq!(body["expiry"], json!(expiry));
    assert_eq!(body["nonce"], json!("0xabc123"));
    let signature = body["signature"].as_str().unwrap();
    assert!(signature.starts_with("0x"));
    assert_eq!(signature.len(), 132);
    let nonce_hash = body["nonceHash"].as_str().unwrap();
    assert!(nonce_hash.starts_with("0x"));
    assert_eq!(nonce_hash.len(), 66);

    // Replay with the same ticket id: consumed.
    let response = server.post("/api/issue-voucher").json(&request).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&response.json()), "ALREADY_USED");
}

#[tokio::test]
async fn test_issue_voucher_requires_verified_email() {
    let (server, _state) = test_server();
    let id = create_ticket(&server, expiry_in(3600)).await;

    let response = server
        .post("/api/issue-voucher")
        .json(&json!({
            "ticketId": id,
            "participant": PARTICIPANT,
            "email": "alice@dauphine.eu",
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&response.json()), "NOT_VERIFIED");
}

#[tokio::test]
async fn test_issue_voucher_rejects_bad_address() {
    let (server, state) = test_server();
    let id = create_ticket(&server, expiry_in(3600)).await;
    verify_email(&server, &state, "alice@dauphine.eu").await;

    let response = server
        .post("/api/issue-voucher")
        .json(&json!({
            "ticketId": id,
            "participant": "not-an-address",
            "email": "alice@dauphine.eu",
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&response.json()), "INVALID_INPUT");
}

#[tokio::test]
async fn test_issue_voucher_without_key_is_500() {
    let (_tx, rx) = watch::channel(None);
    let state = test_state(None, rx);
    let server = TestServer::new(build_router(state.clone())).unwrap();

    let id = create_ticket(&server, expiry_in(3600)).await;
    verify_email(&server, &state, "alice@dauphine.eu").await;

    let response = server
        .post("/api/issue-voucher")
        .json(&json!({
            "ticketId": id,
            "participant": PARTICIPANT,
            "email": "alice@dauphine.eu",
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error_code(&response.json()), "SIGNING_KEY_UNAVAILABLE");
}

#[tokio::test]
async fn test_current_ticket_404_before_first_rotation() {
    let (server, _state) = test_server();
    let response = server.get("/api/current-ticket").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_current_ticket_reflects_display_loop() {
    let displayed = DisplayedTicket {
        id: "abcdefghij0123456789".to_string(),
        campaign_id: 1,
        expiry: expiry_in(3600),
        created_at: Utc::now(),
    };
    let (_tx, rx) = watch::channel(Some(displayed.clone()));
    let state = test_state(None, rx);
    let server = TestServer::new(build_router(state)).unwrap();

    let response = server.get("/api/current-ticket").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["id"], json!(displayed.id));
    assert_eq!(body["campaignId"], json!(1));
}
