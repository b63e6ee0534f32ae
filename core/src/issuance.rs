//! Issuance orchestrator.
//!
//! The only place authorization logic lives. Each call reconstructs the
//! per-ticket state machine from store state, which is sufficient because a
//! ticket can only ever be claimed once:
//!
//! ```text
//! CREATED ── claim ok ──► CLAIMED_PENDING_IDENTITY ── verified ──► VOUCHER_ISSUED
//!    │                          │
//!    └─► REJECTED(NotFound/AlreadyUsed/Expired)
//!                               └─► REJECTED(NotVerified / VoucherExpired)
//! ```
//!
//! There is no path back from issued or rejected: the ticket is consumed by
//! step one regardless of what happens afterwards, and a voucher lost
//! between signing and delivery cannot be re-issued. Single-use by design.

use crate::clock::Clock;
use crate::error::{Result, StampError};
use crate::identity::IdentityGate;
use crate::providers::EmailProvider;
use crate::signer::{hash_nonce, VoucherSigner};
use crate::tickets::TicketStore;
use alloy::primitives::{Address, B256, U256};
use std::sync::Arc;
use tracing::info;

/// Everything a participant needs to submit
/// `recordParticipation(campaignId, expiry, nonce, signature)` on-chain.
///
/// `nonce_hash` is the keccak-256 digest of the raw ticket nonce; the
/// contract expects the digest, not the raw string, and it must match the
/// value that was signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedVoucher {
    /// Participant the voucher is bound to.
    pub participant: Address,
    /// Campaign the voucher is valid for.
    pub campaign_id: u64,
    /// Voucher validity deadline, unix seconds.
    pub expiry: u64,
    /// Raw ticket nonce, for audit trails.
    pub nonce: String,
    /// keccak-256 of the raw nonce; the `bytes32` the contract receives.
    pub nonce_hash: B256,
    /// 65-byte EIP-712 signature, 0x-prefixed hex.
    pub signature: String,
}

/// Sequences ticket consumption → identity check → voucher signature.
pub struct IssuanceService<E> {
    tickets: TicketStore,
    identity: IdentityGate<E>,
    signer: Option<VoucherSigner>,
    clock: Arc<dyn Clock>,
}

impl<E> Clone for IssuanceService<E> {
    fn clone(&self) -> Self {
        Self {
            tickets: self.tickets.clone(),
            identity: self.identity.clone(),
            signer: self.signer.clone(),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<E> IssuanceService<E>
where
    E: EmailProvider + 'static,
{
    /// Wire the orchestrator to its collaborators.
    ///
    /// `signer` is `None` when no signing key is configured; ticket and
    /// identity routes keep working, and only issuance fails with
    /// [`StampError::SigningKeyUnavailable`].
    #[must_use]
    pub fn new(
        tickets: TicketStore,
        identity: IdentityGate<E>,
        signer: Option<VoucherSigner>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            tickets,
            identity,
            signer,
            clock,
        }
    }

    /// The ticket store this service consumes from.
    #[must_use]
    pub const fn tickets(&self) -> &TicketStore {
        &self.tickets
    }

    /// The identity gate this service checks against.
    #[must_use]
    pub const fn identity(&self) -> &IdentityGate<E> {
        &self.identity
    }

    /// Issue a voucher for a claimed ticket, verified email, and
    /// participant address.
    ///
    /// Each step is a hard gate with no partial credit:
    ///
    /// 1. claim the ticket; its errors propagate verbatim;
    /// 2. the email must hold a live verified marker, else
    ///    [`StampError::NotVerified`];
    /// 3. current time must not exceed the ticket's own expiry (the
    ///    voucher's coarser on-chain window), else
    ///    [`StampError::VoucherExpired`];
    /// 4. sign with the claimed `{campaignId, expiry, keccak256(nonce)}`.
    ///
    /// The only side effect is the ticket being marked used in step 1; a
    /// failure in any later step still consumes the ticket.
    ///
    /// # Errors
    ///
    /// As the gates above, plus [`StampError::SigningKeyUnavailable`] when
    /// no signing key is configured.
    pub fn issue_voucher(
        &self,
        ticket_id: &str,
        participant: Address,
        email: &str,
    ) -> Result<IssuedVoucher> {
        let claimed = self.tickets.claim(ticket_id)?;

        if !self.identity.is_verified(email) {
            return Err(StampError::NotVerified);
        }

        let now_secs = self.clock.now().timestamp();
        if now_secs > i64::try_from(claimed.expiry).unwrap_or(i64::MAX) {
            return Err(StampError::VoucherExpired);
        }

        let signer = self
            .signer
            .as_ref()
            .ok_or(StampError::SigningKeyUnavailable)?;

        let nonce_hash = hash_nonce(&claimed.nonce);
        let signature = signer.sign(
            participant,
            U256::from(claimed.campaign_id),
            U256::from(claimed.expiry),
            nonce_hash,
        )?;

        info!(
            ticket_id = %ticket_id,
            participant = %participant,
            campaign_id = claimed.campaign_id,
            "voucher issued"
        );

        Ok(IssuedVoucher {
            participant,
            campaign_id: claimed.campaign_id,
            expiry: claimed.expiry,
            nonce: claimed.nonce,
            nonce_hash,
            signature,
        })
    }
}
