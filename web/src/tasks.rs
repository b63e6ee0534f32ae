//! Background tasks: the display loop and the ticket sweep.
//!
//! Both are explicit spawned tasks owned by [`BackgroundTasks`] and
//! cancelled on shutdown. The sweep bounds memory only; the claim path's
//! own scan-window check stays authoritative.

use chrono::{DateTime, Utc};
use dauproof_core::config::DisplayConfig;
use dauproof_core::constants::{DISPLAY_INTERVAL_SECS, SWEEP_INTERVAL_SECS};
use dauproof_core::TicketStore;
use rand::RngCore;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// The ticket currently exposed for rendering as a scannable code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayedTicket {
    /// Ticket id; the QR target is `{origin}/claim?t={id}`.
    pub id: String,
    /// Campaign the ticket authorizes.
    pub campaign_id: u64,
    /// Voucher validity deadline, unix seconds.
    pub expiry: u64,
    /// When the ticket was minted.
    pub created_at: DateTime<Utc>,
}

/// Owner of the spawned background tasks.
pub struct BackgroundTasks {
    display: JoinHandle<()>,
    sweep: JoinHandle<()>,
}

impl BackgroundTasks {
    /// Spawn the display loop and sweep task against a ticket store.
    ///
    /// Returns the task owner and the watch receiver carrying the ticket
    /// currently on display (`None` until the first tick fires).
    #[must_use]
    pub fn spawn(
        store: TicketStore,
        config: DisplayConfig,
    ) -> (Self, watch::Receiver<Option<DisplayedTicket>>) {
        let (tx, rx) = watch::channel(None);
        let display = tokio::spawn(display_loop(store.clone(), config, tx));
        let sweep = tokio::spawn(sweep_loop(store));
        (Self { display, sweep }, rx)
    }

    /// Cancel both tasks. Called on shutdown.
    pub fn shutdown(self) {
        self.display.abort();
        self.sweep.abort();
        info!("background tasks stopped");
    }
}

/// Mint a fresh ticket every 30 seconds and publish it for rendering.
async fn display_loop(
    store: TicketStore,
    config: DisplayConfig,
    tx: watch::Sender<Option<DisplayedTicket>>,
) {
    let mut interval = tokio::time::interval(Duration::from_secs(DISPLAY_INTERVAL_SECS));
    loop {
        interval.tick().await;

        let created_at = Utc::now();
        let expiry = u64::try_from(created_at.timestamp()).unwrap_or(0)
            + config.voucher_validity_secs;
        let nonce = random_nonce();
        let id = store.create(config.campaign_id, expiry, nonce);

        debug!(ticket_id = %id, campaign_id = config.campaign_id, "display ticket rotated");
        tx.send_replace(Some(DisplayedTicket {
            id,
            campaign_id: config.campaign_id,
            expiry,
            created_at,
        }));
    }
}

/// Remove tickets past retention every 60 seconds.
async fn sweep_loop(store: TicketStore) {
    let mut interval = tokio::time::interval(Duration::from_secs(SWEEP_INTERVAL_SECS));
    loop {
        interval.tick().await;
        let removed = store.sweep_expired();
        if removed > 0 {
            debug!(removed, remaining = store.len(), "ticket sweep");
        }
    }
}

/// Fresh random nonce string: 16 bytes, 0x-prefixed hex.
fn random_nonce() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    format!("0x{}", alloy::hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_nonce_shape() {
        let nonce = random_nonce();
        assert!(nonce.starts_with("0x"));
        assert_eq!(nonce.len(), 34);
        assert_ne!(nonce, random_nonce());
    }

    #[tokio::test(start_paused = true)]
    async fn test_display_loop_publishes_and_rotates() {
        let store = TicketStore::default();
        let config = DisplayConfig {
            campaign_id: 7,
            voucher_validity_secs: 3600,
        };
        let (tasks, mut rx) = BackgroundTasks::spawn(store.clone(), config);

        // First tick fires immediately.
        rx.changed().await.unwrap();
        let first = rx.borrow().clone().unwrap();
        assert_eq!(first.campaign_id, 7);
        assert!(store.claim(&first.id).is_ok());

        // Next rotation mints a different ticket.
        rx.changed().await.unwrap();
        let second = rx.borrow().clone().unwrap();
        assert_ne!(first.id, second.id);

        tasks.shutdown();
    }
}
