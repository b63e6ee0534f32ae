//! Protocol constants.
//!
//! The four timers below are the whole temporal contract of the protocol.
//! Each is evaluated by comparing stored timestamps to the current time at
//! the moment of use; nothing is actively cancelled.

use chrono::Duration;

/// How long a displayed ticket stays claimable after creation.
pub const SCAN_WINDOW_SECS: i64 = 30;

/// How long tickets are retained before the sweep removes them, used or not.
///
/// Cleanup only. The claim path's own [`SCAN_WINDOW_SECS`] check is
/// authoritative; the sweep just bounds memory.
pub const TICKET_RETENTION_SECS: i64 = 120;

/// Interval between background sweeps of the ticket store.
pub const SWEEP_INTERVAL_SECS: u64 = 60;

/// Interval at which the display loop mints a fresh ticket.
pub const DISPLAY_INTERVAL_SECS: u64 = 30;

/// How long a 6-digit verification code stays valid.
#[must_use]
pub fn code_ttl() -> Duration {
    Duration::minutes(15)
}

/// How long a verified-session marker stays valid.
#[must_use]
pub fn verified_ttl() -> Duration {
    Duration::hours(2)
}

/// Length of a ticket id.
///
/// 20 symbols from a 36-symbol alphabet is a shade over 103 bits of
/// entropy, which makes brute-force guessing within the 30-second scan
/// window infeasible.
pub const TICKET_ID_LEN: usize = 20;

/// Alphabet ticket ids are drawn from.
pub const TICKET_ID_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// EIP-712 domain name, fixed by the verifying contract's constructor.
pub const EIP712_DOMAIN_NAME: &str = "Stamp";

/// EIP-712 domain version, fixed by the verifying contract's constructor.
pub const EIP712_DOMAIN_VERSION: &str = "1";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_relationships() {
        // Retention must outlive the scan window or claims could hit
        // swept-but-valid tickets.
        assert!(TICKET_RETENTION_SECS > SCAN_WINDOW_SECS);
        assert!(code_ttl() < verified_ttl());
    }

    #[test]
    fn test_ticket_id_entropy() {
        // log2(36) * 20 ≈ 103.4 bits
        let bits = (TICKET_ID_ALPHABET.len() as f64).log2() * TICKET_ID_LEN as f64;
        assert!(bits >= 100.0);
    }
}
