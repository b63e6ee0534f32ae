//! Console email provider for development and testing.

use crate::error::Result;
use crate::providers::EmailProvider;
use chrono::{DateTime, Utc};
use tracing::info;

/// Console email provider.
///
/// Logs verification codes instead of sending them. Used when no SMTP
/// configuration is present, so the code-request flow keeps working in
/// development and the code stays observable for operational debugging.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleEmailProvider;

impl ConsoleEmailProvider {
    /// Create a new console email provider.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl EmailProvider for ConsoleEmailProvider {
    async fn send_verification_code(
        &self,
        to: &str,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        let expires_minutes = (expires_at - Utc::now()).num_minutes();
        info!(
            to = %to,
            code = %code,
            expires_in_minutes = %expires_minutes,
            "verification code email (console mode)"
        );
        Ok(())
    }
}
