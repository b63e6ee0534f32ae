//! Axum HTTP boundary for the DauProof voucher service.
//!
//! The HTTP layer is a thin imperative shell: handlers parse JSON, call
//! into [`dauproof_core`], and map domain errors to status codes. All
//! protocol state lives in the core stores owned by the composition root;
//! the two background tasks (display loop, ticket sweep) are explicit
//! spawned tasks cancelled on shutdown.
//!
//! # Routes
//!
//! | Route | Purpose |
//! |---|---|
//! | `POST /api/create-ticket` | mint a scan ticket |
//! | `POST /api/claim-ticket` | consume a ticket (single-use) |
//! | `POST /api/send-code` | request an email verification code |
//! | `POST /api/verify-code` | check a code, mark the email verified |
//! | `POST /api/issue-voucher` | claim + verify + sign, in one gate sequence |
//! | `GET /api/current-ticket` | ticket currently on display |
//! | `GET /health` | liveness |

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod tasks;

pub use error::AppError;
pub use routes::build_router;
pub use state::AppState;
pub use tasks::{BackgroundTasks, DisplayedTicket};

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
