//! # DauProof Core
//!
//! Domain logic for the DauProof proof-of-presence voucher service.
//!
//! The service lets an event organizer prove that a specific person was
//! present at a specific moment: a display loop rotates a single-use,
//! time-boxed ticket every 30 seconds; scanning it claims the ticket
//! (exactly once), an email-code identity gate proves control of an
//! institution address, and only then does the service sign an EIP-712
//! voucher the participant can redeem on-chain.
//!
//! ## Components
//!
//! - [`tickets::TicketStore`]: rotating pool of single-use scan tokens with
//!   atomic claim semantics
//! - [`identity::IdentityGate`]: 6-digit email code challenge binding an
//!   address to a verified-status window
//! - [`signer::VoucherSigner`]: stateless EIP-712 signer over
//!   `{participant, campaignId, expiry, nonce}`
//! - [`issuance::IssuanceService`]: sequences claim → identity check →
//!   signature, the only place authorization lives
//!
//! All state is in-memory and intentionally ephemeral: there is no
//! persistence tier, and correctness rests entirely on the ticket store's
//! internal synchronization.

pub mod clock;
pub mod config;
pub mod constants;
pub mod error;
pub mod identity;
pub mod issuance;
pub mod providers;
pub mod signer;
pub mod tickets;

#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;

pub use clock::{Clock, SystemClock};
pub use error::{Result, StampError};
pub use identity::IdentityGate;
pub use issuance::{IssuanceService, IssuedVoucher};
pub use signer::VoucherSigner;
pub use tickets::{ClaimedTicket, Ticket, TicketStore};
