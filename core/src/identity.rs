//! Identity gate: email code challenge/response.
//!
//! Proves control of an institution-restricted email address without a full
//! account system. A code request overwrites any prior pending code for the
//! same address (there is no accumulation, and outstanding codes are thereby
//! invalidated); a successful check records a verified-session marker that
//! the issuance pipeline reads for two hours.
//!
//! There is deliberately no attempt cap on [`IdentityGate::verify_code`];
//! the brute-force exposure of a 6-digit code inside its 15-minute window
//! is a documented gap, not an accidental one.

use crate::clock::Clock;
use crate::constants::{code_ttl, verified_ttl};
use crate::error::{Result, StampError};
use crate::providers::EmailProvider;
use chrono::{DateTime, Utc};
use rand::Rng;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{info, warn};

/// A pending verification code for one email address.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CodeEntry {
    code: String,
    expires_at: DateTime<Utc>,
}

/// Short-lived numeric-code challenge binding an email address to a
/// verified-status window.
///
/// Keys are normalized emails (trimmed, lowercased). Both maps tolerate
/// last-writer-wins races; only the ticket store needs stronger ordering.
pub struct IdentityGate<E> {
    codes: Arc<Mutex<HashMap<String, CodeEntry>>>,
    verified: Arc<Mutex<HashMap<String, DateTime<Utc>>>>,
    allowed_domain: String,
    provider: Arc<E>,
    clock: Arc<dyn Clock>,
}

impl<E> Clone for IdentityGate<E> {
    fn clone(&self) -> Self {
        Self {
            codes: Arc::clone(&self.codes),
            verified: Arc::clone(&self.verified),
            allowed_domain: self.allowed_domain.clone(),
            provider: Arc::clone(&self.provider),
            clock: Arc::clone(&self.clock),
        }
    }
}

/// Normalize an email for use as a map key.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl<E> IdentityGate<E>
where
    E: EmailProvider + 'static,
{
    /// Create a gate restricted to addresses ending in `allowed_domain`.
    #[must_use]
    pub fn new(allowed_domain: String, provider: Arc<E>, clock: Arc<dyn Clock>) -> Self {
        Self {
            codes: Arc::new(Mutex::new(HashMap::new())),
            verified: Arc::new(Mutex::new(HashMap::new())),
            allowed_domain,
            provider,
            clock,
        }
    }

    fn codes(&self) -> MutexGuard<'_, HashMap<String, CodeEntry>> {
        self.codes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn verified(&self) -> MutexGuard<'_, HashMap<String, DateTime<Utc>>> {
        self.verified.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Generate, store, and dispatch a 6-digit verification code.
    ///
    /// Storage happens before dispatch and dispatch is fire-and-forget: a
    /// delivery failure is logged and never fails the request, since the
    /// code is also observable in the logs for operational debugging.
    ///
    /// # Errors
    ///
    /// Returns [`StampError::InvalidDomain`] for addresses outside the
    /// allowed domain; nothing is stored in that case.
    pub fn request_code(&self, email: &str) -> Result<()> {
        let normalized = normalize_email(email);
        if !normalized.ends_with(&self.allowed_domain) {
            return Err(StampError::InvalidDomain {
                required: self.allowed_domain.clone(),
            });
        }

        let code = random_six_digit_code();
        let expires_at = self.clock.now() + code_ttl();
        self.codes().insert(
            normalized.clone(),
            CodeEntry {
                code: code.clone(),
                expires_at,
            },
        );
        info!(email = %normalized, code = %code, "verification code issued");

        let provider = Arc::clone(&self.provider);
        tokio::spawn(async move {
            if let Err(e) = provider
                .send_verification_code(&normalized, &code, expires_at)
                .await
            {
                // Best-effort by design: the stored code is still valid.
                warn!(email = %normalized, error = %e, "verification code delivery failed");
            }
        });

        Ok(())
    }

    /// Check a code against the pending entry for this email.
    ///
    /// True iff an entry exists, is not expired, and the code matches
    /// exactly. The entry is read, not deleted; the 15-minute TTL governs
    /// staleness. Comparison is constant-time.
    #[must_use]
    pub fn verify_code(&self, email: &str, code: &str) -> bool {
        let normalized = normalize_email(email);
        let codes = self.codes();
        let Some(entry) = codes.get(&normalized) else {
            return false;
        };

        let matches = constant_time_eq::constant_time_eq(code.as_bytes(), entry.code.as_bytes());
        let expired = self.clock.now() > entry.expires_at;
        matches && !expired
    }

    /// Record a verified-session marker for this email.
    pub fn mark_verified(&self, email: &str) {
        let normalized = normalize_email(email);
        let now = self.clock.now();
        self.verified().insert(normalized, now);
    }

    /// Whether this email holds a live verified-session marker.
    ///
    /// Markers expire two hours after [`Self::mark_verified`]; expiry is
    /// checked on read, not actively purged.
    #[must_use]
    pub fn is_verified(&self, email: &str) -> bool {
        let normalized = normalize_email(email);
        let verified = self.verified();
        let Some(verified_at) = verified.get(&normalized) else {
            return false;
        };
        self.clock.now() - *verified_at <= verified_ttl()
    }

    /// The pending code for an email, if any.
    ///
    /// Operational accessor; the original service logs issued codes for the
    /// same reason. Also used by tests.
    #[must_use]
    pub fn pending_code(&self, email: &str) -> Option<String> {
        self.codes()
            .get(&normalize_email(email))
            .map(|e| e.code.clone())
    }
}

/// Generate a uniformly random 6-digit code, "100000" through "999999".
fn random_six_digit_code() -> String {
    rand::thread_rng().gen_range(100_000..=999_999).to_string()
}
