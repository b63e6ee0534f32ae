//! Service configuration.
//!
//! Loaded from environment variables with defaults suitable for local
//! development. The signing key and SMTP credentials are optional: without
//! a key the service still serves ticket and identity routes (issuance
//! fails with `SigningKeyUnavailable`), and without SMTP the console email
//! provider is used.

use std::env;
use std::str::FromStr;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server configuration.
    pub server: ServerConfig,
    /// Chain and signing configuration.
    pub chain: ChainConfig,
    /// Identity gate configuration.
    pub identity: IdentityConfig,
    /// Display loop configuration.
    pub display: DisplayConfig,
    /// SMTP configuration; `None` selects the console email provider.
    pub smtp: Option<SmtpConfig>,
}

/// HTTP server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address to bind, e.g. `0.0.0.0:8080`.
    pub bind_addr: String,
}

/// Chain and signing configuration.
#[derive(Debug, Clone)]
pub struct ChainConfig {
    /// EIP-712 domain chain id. Default: 11155111 (Sepolia).
    pub chain_id: u64,
    /// Verifying contract address, 0x-prefixed hex.
    pub verifying_contract: String,
    /// Issuing service's signing key, 0x-prefixed hex. Optional.
    pub signer_private_key: Option<String>,
}

/// Identity gate configuration.
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    /// Required email domain suffix, e.g. `@dauphine.eu`.
    pub allowed_domain: String,
}

/// Display loop configuration.
#[derive(Debug, Clone)]
pub struct DisplayConfig {
    /// Campaign the displayed tickets authorize.
    pub campaign_id: u64,
    /// Voucher validity attached to each minted ticket, in seconds.
    pub voucher_validity_secs: u64,
}

/// SMTP configuration.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    /// SMTP server address.
    pub server: String,
    /// SMTP server port.
    pub port: u16,
    /// SMTP authentication username.
    pub username: String,
    /// SMTP authentication password.
    pub password: String,
    /// Sender email address.
    pub from_email: String,
    /// Sender display name.
    pub from_name: String,
}

impl Config {
    /// Load configuration from environment variables with defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let smtp = match (
            env::var("SMTP_SERVER").ok(),
            env::var("SMTP_USERNAME").ok(),
            env::var("SMTP_PASSWORD").ok(),
        ) {
            (Some(server), Some(username), Some(password)) => Some(SmtpConfig {
                server,
                port: env_parse_or("SMTP_PORT", 587),
                username,
                password,
                from_email: env_or("FROM_EMAIL", "onboarding@dauproof.dev"),
                from_name: env_or("FROM_NAME", "DauProof"),
            }),
            _ => None,
        };

        Self {
            server: ServerConfig {
                bind_addr: env_or("BIND_ADDR", "0.0.0.0:8080"),
            },
            chain: ChainConfig {
                chain_id: env_parse_or("CHAIN_ID", 11_155_111),
                verifying_contract: env_or(
                    "VERIFYING_CONTRACT",
                    "0x0000000000000000000000000000000000000000",
                ),
                signer_private_key: env::var("SIGNER_PRIVATE_KEY").ok(),
            },
            identity: IdentityConfig {
                allowed_domain: env_or("ALLOWED_EMAIL_DOMAIN", "@dauphine.eu"),
            },
            display: DisplayConfig {
                campaign_id: env_parse_or("CAMPAIGN_ID", 1),
                voucher_validity_secs: env_parse_or("VOUCHER_VALIDITY_SECS", 3600),
            },
            smtp,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse_or<T: FromStr + Copy>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
