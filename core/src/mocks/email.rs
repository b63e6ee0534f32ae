//! Mock email provider for testing.

use crate::error::{Result, StampError};
use crate::providers::EmailProvider;
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex, PoisonError};

/// A verification-code email captured by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentCode {
    /// Recipient address.
    pub to: String,
    /// The 6-digit code.
    pub code: String,
    /// Code expiry carried in the email body.
    pub expires_at: DateTime<Utc>,
}

/// Mock email provider.
///
/// Records sent codes instead of delivering them; can be configured to fail
/// every send to exercise the best-effort dispatch path.
#[derive(Debug, Clone, Default)]
pub struct MockEmailProvider {
    sent: Arc<Mutex<Vec<SentCode>>>,
    fail: bool,
}

impl MockEmailProvider {
    /// Create a mock that records every send.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock whose every send fails.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            fail: true,
        }
    }

    /// All codes sent so far.
    #[must_use]
    pub fn sent(&self) -> Vec<SentCode> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl EmailProvider for MockEmailProvider {
    async fn send_verification_code(
        &self,
        to: &str,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        if self.fail {
            return Err(StampError::Email("mock delivery failure".to_string()));
        }
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(SentCode {
                to: to.to_string(),
                code: code.to_string(),
                expires_at,
            });
        Ok(())
    }
}
