//! Email provider trait.

use crate::error::Result;
use crate::providers::{ConsoleEmailProvider, SmtpEmailProvider};
use chrono::{DateTime, Utc};

/// Email delivery collaborator.
///
/// This trait abstracts over delivery services (SMTP relays, API-based
/// senders). Delivery is best-effort: the identity gate stores the code
/// first and discards the send result except for logging, so a provider
/// failure never fails a code request.
pub trait EmailProvider: Send + Sync {
    /// Send a 6-digit verification code.
    ///
    /// # Arguments
    ///
    /// - `to`: Recipient email address (already normalized)
    /// - `code`: The 6-digit code
    /// - `expires_at`: Code expiration timestamp
    ///
    /// # Errors
    ///
    /// Returns error if the provider rejects the message or the network
    /// request fails.
    fn send_verification_code(
        &self,
        to: &str,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Runtime-selected email provider.
///
/// The composition root picks SMTP when credentials are configured and
/// falls back to console logging otherwise, without making every consumer
/// generic over the choice.
#[derive(Clone)]
pub enum EmailDispatcher {
    /// Real SMTP delivery.
    Smtp(SmtpEmailProvider),
    /// Development fallback that logs instead of sending.
    Console(ConsoleEmailProvider),
}

impl EmailProvider for EmailDispatcher {
    async fn send_verification_code(
        &self,
        to: &str,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        match self {
            Self::Smtp(provider) => provider.send_verification_code(to, code, expires_at).await,
            Self::Console(provider) => provider.send_verification_code(to, code, expires_at).await,
        }
    }
}
