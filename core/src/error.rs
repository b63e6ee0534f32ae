//! Error types for the voucher issuance pipeline.

use thiserror::Error;

/// Result type alias for issuance operations.
pub type Result<T> = std::result::Result<T, StampError>;

/// Error taxonomy for the ticket, identity, and voucher pipeline.
///
/// Every failure is detected synchronously and returned to the immediate
/// caller; nothing is retried automatically. A consumed ticket is
/// cryptographically meaningless to retry, so each failure requires a new
/// user action (rescan, re-request a code, correct the input).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StampError {
    // ═══════════════════════════════════════════════════════════
    // Ticket lifecycle
    // ═══════════════════════════════════════════════════════════
    /// Ticket id is unknown or already garbage-collected.
    #[error("Ticket not found")]
    TicketNotFound,

    /// Ticket has already been claimed.
    #[error("Ticket has already been used")]
    TicketAlreadyUsed,

    /// Ticket is older than the scan window.
    #[error("Ticket has expired")]
    TicketExpired,

    // ═══════════════════════════════════════════════════════════
    // Identity gate
    // ═══════════════════════════════════════════════════════════
    /// Email address is outside the allowed domain.
    #[error("Email address must end in {required}")]
    InvalidDomain {
        /// Required domain suffix.
        required: String,
    },

    /// Verification code is wrong or expired.
    #[error("Invalid or expired verification code")]
    InvalidCode,

    // ═══════════════════════════════════════════════════════════
    // Issuance gates
    // ═══════════════════════════════════════════════════════════
    /// Email has no live verified-session marker.
    #[error("Email address has not been verified")]
    NotVerified,

    /// The voucher's own on-chain validity window has passed.
    #[error("Voucher validity window has passed")]
    VoucherExpired,

    // ═══════════════════════════════════════════════════════════
    // Input validation
    // ═══════════════════════════════════════════════════════════
    /// Missing or malformed request field.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // ═══════════════════════════════════════════════════════════
    // System faults
    // ═══════════════════════════════════════════════════════════
    /// Signing key is not configured or unusable.
    #[error("Signing key is not available")]
    SigningKeyUnavailable,

    /// Signature computation failed.
    #[error("Signing failed: {0}")]
    Signing(String),

    /// Email delivery failed (logged, never surfaced to code requests).
    #[error("Email delivery failed: {0}")]
    Email(String),
}

impl StampError {
    /// Returns `true` if this error is correctable by the user.
    ///
    /// User errors map to 400-class responses at the HTTP boundary;
    /// everything else is a 500-class configuration or system fault.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::TicketNotFound
                | Self::TicketAlreadyUsed
                | Self::TicketExpired
                | Self::InvalidDomain { .. }
                | Self::InvalidCode
                | Self::NotVerified
                | Self::VoucherExpired
                | Self::InvalidInput(_)
        )
    }

    /// Stable machine-readable code for the HTTP error body.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::TicketNotFound => "NOT_FOUND",
            Self::TicketAlreadyUsed => "ALREADY_USED",
            Self::TicketExpired => "EXPIRED",
            Self::InvalidDomain { .. } => "INVALID_DOMAIN",
            Self::InvalidCode => "INVALID_CODE",
            Self::NotVerified => "NOT_VERIFIED",
            Self::VoucherExpired => "VOUCHER_EXPIRED",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::SigningKeyUnavailable => "SIGNING_KEY_UNAVAILABLE",
            Self::Signing(_) => "SIGNING_FAILED",
            Self::Email(_) => "EMAIL_DELIVERY_FAILED",
        }
    }
}
