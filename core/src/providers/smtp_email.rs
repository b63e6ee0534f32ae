//! SMTP email provider implementation using Lettre.

use crate::error::{Result, StampError};
use crate::providers::EmailProvider;
use chrono::{DateTime, Utc};
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

/// SMTP email provider using Lettre.
///
/// Sends real verification-code emails via an SMTP relay, suitable for
/// production use.
#[derive(Clone)]
pub struct SmtpEmailProvider {
    /// SMTP server address.
    smtp_server: String,

    /// SMTP server port.
    smtp_port: u16,

    /// SMTP credentials.
    credentials: Credentials,

    /// Sender email address.
    from_email: String,

    /// Sender display name.
    from_name: String,
}

impl SmtpEmailProvider {
    /// Create a new SMTP email provider.
    ///
    /// # Arguments
    ///
    /// - `smtp_server`: SMTP server address (e.g., "smtp.gmail.com")
    /// - `smtp_port`: SMTP server port (usually 587 for TLS)
    /// - `smtp_username` / `smtp_password`: SMTP authentication
    /// - `from_email`: Sender email address
    /// - `from_name`: Sender display name
    #[must_use]
    pub fn new(
        smtp_server: String,
        smtp_port: u16,
        smtp_username: String,
        smtp_password: String,
        from_email: String,
        from_name: String,
    ) -> Self {
        let credentials = Credentials::new(smtp_username, smtp_password);

        Self {
            smtp_server,
            smtp_port,
            credentials,
            from_email,
            from_name,
        }
    }

    /// Build SMTP transport for sending emails.
    ///
    /// Creates a new transport per email to avoid connection pooling issues.
    fn build_transport(&self) -> Result<SmtpTransport> {
        let transport = SmtpTransport::relay(&self.smtp_server)
            .map_err(|e| StampError::Email(format!("SMTP relay error: {e}")))?
            .port(self.smtp_port)
            .credentials(self.credentials.clone())
            .build();
        Ok(transport)
    }

    /// Build the "From" header.
    fn from_header(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_email)
    }
}

impl EmailProvider for SmtpEmailProvider {
    async fn send_verification_code(
        &self,
        to: &str,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        let expires_minutes = (expires_at - Utc::now()).num_minutes();
        let html = format!(
            r#"<div style="font-family:system-ui;max-width:400px;margin:0 auto;padding:24px">
  <h2 style="color:#0F1B2D">DauProof</h2>
  <div style="font-size:36px;font-weight:900;letter-spacing:4px;color:#0891B2;background:#F0F9FF;border-radius:12px;padding:16px;text-align:center;margin:16px 0">{code}</div>
  <p style="color:#94A3B8;font-size:12px">Expires in {expires_minutes} minutes.</p>
</div>"#
        );

        let message = Message::builder()
            .from(
                self.from_header()
                    .parse()
                    .map_err(|e| StampError::Email(format!("Invalid from address: {e}")))?,
            )
            .to(to
                .parse()
                .map_err(|e| StampError::Email(format!("Invalid recipient: {e}")))?)
            .subject(format!("DauProof — Code: {code}"))
            .header(ContentType::TEXT_HTML)
            .body(html)
            .map_err(|e| StampError::Email(format!("Failed to build message: {e}")))?;

        let transport = self.build_transport()?;
        transport
            .send(&message)
            .map_err(|e| StampError::Email(format!("SMTP send failed: {e}")))?;

        Ok(())
    }
}
