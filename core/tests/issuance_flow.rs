//! Integration tests for the full issuance pipeline.
//!
//! Wires the real ticket store, identity gate, and signer together with
//! mock collaborators (clock, email) and walks the protocol end to end.

use alloy::primitives::Address;
use chrono::Duration;
use dauproof_core::mocks::{MockClock, MockEmailProvider};
use dauproof_core::{Clock, IdentityGate, IssuanceService, StampError, TicketStore, VoucherSigner};
use std::sync::Arc;

// First default anvil/hardhat development key; never holds real funds.
const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
const PARTICIPANT: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
const EMAIL: &str = "alice@dauphine.eu";

struct Harness {
    clock: MockClock,
    service: IssuanceService<MockEmailProvider>,
}

fn harness_with_signer(signer: Option<VoucherSigner>) -> Harness {
    let clock = MockClock::new();
    let shared: Arc<MockClock> = Arc::new(clock.clone());
    let tickets = TicketStore::new(shared.clone());
    let identity = IdentityGate::new(
        "@dauphine.eu".to_string(),
        Arc::new(MockEmailProvider::new()),
        shared.clone(),
    );
    let service = IssuanceService::new(tickets, identity, signer, shared);
    Harness { clock, service }
}

fn harness() -> Harness {
    let signer = VoucherSigner::new(TEST_KEY, 11_155_111, Address::ZERO).unwrap();
    harness_with_signer(Some(signer))
}

fn participant() -> Address {
    PARTICIPANT.parse().unwrap()
}

/// Verify an email through the real code flow rather than poking state.
fn verify_email(h: &Harness, email: &str) {
    h.service.identity().request_code(email).unwrap();
    let code = h.service.identity().pending_code(email).unwrap();
    assert!(h.service.identity().verify_code(email, &code));
    h.service.identity().mark_verified(email);
}

fn expiry_in(h: &Harness, secs: i64) -> u64 {
    u64::try_from(h.clock.now().timestamp() + secs).unwrap()
}

#[tokio::test]
async fn test_end_to_end_happy_path_then_replay_fails() {
    let h = harness();
    let expiry = expiry_in(&h, 3600);
    let id = h
        .service
        .tickets()
        .create(1, expiry, "0xabc123".to_string());

    // Claimed within 5s of creation.
    h.clock.advance(Duration::seconds(5));

    verify_email(&h, EMAIL);
    assert!(h.service.identity().is_verified(EMAIL));

    let voucher = h.service.issue_voucher(&id, participant(), EMAIL).unwrap();
    assert_eq!(voucher.campaign_id, 1);
    assert_eq!(voucher.expiry, expiry);
    assert_eq!(voucher.nonce, "0xabc123");
    assert!(voucher.signature.starts_with("0x"));
    assert_eq!(voucher.signature.len(), 132);

    // Same ticket id a second time: consumed, never re-issuable.
    assert_eq!(
        h.service.issue_voucher(&id, participant(), EMAIL),
        Err(StampError::TicketAlreadyUsed)
    );
}

#[tokio::test]
async fn test_issuance_refused_without_verified_email() {
    let h = harness();
    let expiry = expiry_in(&h, 3600);
    let id = h.service.tickets().create(1, expiry, "n".to_string());

    // The claim itself succeeds, so the ticket is consumed even though
    // issuance is refused.
    assert_eq!(
        h.service.issue_voucher(&id, participant(), EMAIL),
        Err(StampError::NotVerified)
    );
    assert_eq!(
        h.service.tickets().claim(&id),
        Err(StampError::TicketAlreadyUsed)
    );
}

#[tokio::test]
async fn test_issuance_propagates_ticket_errors_verbatim() {
    let h = harness();
    verify_email(&h, EMAIL);

    assert_eq!(
        h.service.issue_voucher("nonexistent", participant(), EMAIL),
        Err(StampError::TicketNotFound)
    );

    let expiry = expiry_in(&h, 3600);
    let stale = h.service.tickets().create(1, expiry, "n".to_string());
    h.clock.advance(Duration::seconds(31));
    assert_eq!(
        h.service.issue_voucher(&stale, participant(), EMAIL),
        Err(StampError::TicketExpired)
    );
}

#[tokio::test]
async fn test_issuance_refused_past_voucher_expiry() {
    let h = harness();
    verify_email(&h, EMAIL);

    // Voucher window already passed even though the scan window has not.
    let expiry = u64::try_from(h.clock.now().timestamp() - 1).unwrap();
    let id = h.service.tickets().create(1, expiry, "n".to_string());

    assert_eq!(
        h.service.issue_voucher(&id, participant(), EMAIL),
        Err(StampError::VoucherExpired)
    );
}

#[tokio::test]
async fn test_issuance_without_signing_key_is_config_fault() {
    let h = harness_with_signer(None);
    verify_email(&h, EMAIL);
    let expiry = expiry_in(&h, 3600);
    let id = h.service.tickets().create(1, expiry, "n".to_string());

    assert_eq!(
        h.service.issue_voucher(&id, participant(), EMAIL),
        Err(StampError::SigningKeyUnavailable)
    );
}

#[tokio::test]
async fn test_verified_session_expires_after_two_hours() {
    let h = harness();
    verify_email(&h, EMAIL);

    h.clock.advance(Duration::hours(2) + Duration::seconds(1));
    let expiry = expiry_in(&h, 3600);
    let id = h.service.tickets().create(1, expiry, "n".to_string());

    assert_eq!(
        h.service.issue_voucher(&id, participant(), EMAIL),
        Err(StampError::NotVerified)
    );
}

#[tokio::test]
async fn test_concurrent_issuance_yields_exactly_one_voucher() {
    let h = harness();
    verify_email(&h, EMAIL);
    let expiry = expiry_in(&h, 3600);
    let id = h.service.tickets().create(1, expiry, "n".to_string());

    let mut handles = Vec::new();
    for _ in 0..16 {
        let service = h.service.clone();
        let id = id.clone();
        handles.push(tokio::spawn(async move {
            service.issue_voucher(&id, PARTICIPANT.parse().unwrap(), EMAIL)
        }));
    }

    let mut vouchers = 0;
    let mut already_used = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => vouchers += 1,
            Err(StampError::TicketAlreadyUsed) => already_used += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!(vouchers, 1);
    assert_eq!(already_used, 15);
}

#[tokio::test]
async fn test_swept_ticket_is_not_found() {
    let h = harness();
    verify_email(&h, EMAIL);
    let expiry = expiry_in(&h, 7200);
    let id = h.service.tickets().create(1, expiry, "n".to_string());

    h.clock.advance(Duration::seconds(121));
    assert_eq!(h.service.tickets().sweep_expired(), 1);

    assert_eq!(
        h.service.issue_voucher(&id, participant(), EMAIL),
        Err(StampError::TicketNotFound)
    );
}
