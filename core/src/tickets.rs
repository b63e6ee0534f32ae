//! Rotating pool of single-use scan tickets.
//!
//! The display loop creates a fresh ticket every 30 seconds; an
//! unpredictable number of concurrent scanners race to claim it. Claiming
//! is an atomic check-and-set under the store's mutex: at most one caller
//! ever observes success for a given id, and everyone else gets
//! [`StampError::TicketAlreadyUsed`] even if they arrive within
//! nanoseconds of each other.

use crate::clock::{Clock, SystemClock};
use crate::constants::{SCAN_WINDOW_SECS, TICKET_ID_ALPHABET, TICKET_ID_LEN, TICKET_RETENTION_SECS};
use crate::error::{Result, StampError};
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// A single rotating scan token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    /// Campaign this ticket authorizes participation in.
    pub campaign_id: u64,
    /// Voucher validity deadline, unix seconds. This is the voucher's own
    /// on-chain window (typically ~1 hour), not the 30-second scan window.
    pub expiry: u64,
    /// Opaque nonce string; hashed to 32 bytes only at signing time.
    pub nonce: String,
    /// Creation instant; the scan window and retention are measured from it.
    pub created_at: DateTime<Utc>,
    /// Single-use flag. Transitions false → true exactly once, never back.
    pub used: bool,
}

/// The payload a successful claim hands to the issuance pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimedTicket {
    /// Campaign id carried by the ticket.
    pub campaign_id: u64,
    /// Voucher expiry carried by the ticket, unix seconds.
    pub expiry: u64,
    /// Raw nonce string carried by the ticket.
    pub nonce: String,
}

/// In-memory keyed store of rotating, single-use, time-boxed tickets.
///
/// Cloning shares the underlying map. All mutation goes through these
/// methods; nothing outside the store may touch ticket entries.
#[derive(Clone)]
pub struct TicketStore {
    tickets: Arc<Mutex<HashMap<String, Ticket>>>,
    clock: Arc<dyn Clock>,
}

impl Default for TicketStore {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl std::fmt::Debug for TicketStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TicketStore")
            .field("tickets", &self.len())
            .finish_non_exhaustive()
    }
}

impl TicketStore {
    /// Create an empty store using the given clock.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            tickets: Arc::new(Mutex::new(HashMap::new())),
            clock,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Ticket>> {
        self.tickets.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create a ticket and return its fresh, unguessable id.
    ///
    /// The id is independent of the campaign id and nonce: 20 symbols from
    /// a 36-symbol alphabet, so guessing within the scan window is
    /// infeasible.
    pub fn create(&self, campaign_id: u64, expiry: u64, nonce: String) -> String {
        let id = random_ticket_id();
        let ticket = Ticket {
            campaign_id,
            expiry,
            nonce,
            created_at: self.clock.now(),
            used: false,
        };
        self.lock().insert(id.clone(), ticket);
        debug!(ticket_id = %id, campaign_id, "ticket created");
        id
    }

    /// Claim a ticket, atomically marking it used.
    ///
    /// Error priority: unknown or swept ids yield
    /// [`StampError::TicketNotFound`], a prior claim yields
    /// [`StampError::TicketAlreadyUsed`], and a ticket older than the scan
    /// window yields [`StampError::TicketExpired`]. The check-and-set runs
    /// entirely under the store's mutex, so no two callers can both read
    /// `used == false`.
    ///
    /// # Errors
    ///
    /// Returns the first failing gate as described above.
    pub fn claim(&self, ticket_id: &str) -> Result<ClaimedTicket> {
        let now = self.clock.now();
        let mut tickets = self.lock();

        let Some(ticket) = tickets.get_mut(ticket_id) else {
            return Err(StampError::TicketNotFound);
        };
        if ticket.used {
            return Err(StampError::TicketAlreadyUsed);
        }
        if now - ticket.created_at > Duration::seconds(SCAN_WINDOW_SECS) {
            return Err(StampError::TicketExpired);
        }

        ticket.used = true;
        Ok(ClaimedTicket {
            campaign_id: ticket.campaign_id,
            expiry: ticket.expiry,
            nonce: ticket.nonce.clone(),
        })
    }

    /// Remove every ticket older than the retention window, used or not.
    ///
    /// Returns the number of tickets removed. This bounds memory and is
    /// purely cleanup; the claim path never relies on it.
    pub fn sweep_expired(&self) -> usize {
        let now = self.clock.now();
        let mut tickets = self.lock();
        let before = tickets.len();
        tickets.retain(|_, t| now - t.created_at <= Duration::seconds(TICKET_RETENTION_SECS));
        before - tickets.len()
    }

    /// Number of tickets currently retained.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

/// Generate a fresh ticket id: 20 lowercase-alphanumeric symbols.
fn random_ticket_id() -> String {
    let mut rng = rand::thread_rng();
    (0..TICKET_ID_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..TICKET_ID_ALPHABET.len());
            TICKET_ID_ALPHABET[idx] as char
        })
        .collect()
}
