//! Application state for Axum handlers.

use crate::tasks::DisplayedTicket;
use dauproof_core::providers::EmailDispatcher;
use dauproof_core::IssuanceService;
use std::sync::Arc;
use tokio::sync::watch;

/// Application state shared across all HTTP handlers.
///
/// Created once at process start by the composition root and cloned
/// (cheaply, via `Arc` and channel handles) per request. Nothing here is
/// persistent: tearing the process down discards all ticket and identity
/// state by design.
#[derive(Clone)]
pub struct AppState {
    /// Issuance orchestrator, owning the ticket store and identity gate.
    pub service: Arc<IssuanceService<EmailDispatcher>>,

    /// The ticket currently on display, published by the display loop.
    pub displayed: watch::Receiver<Option<DisplayedTicket>>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(
        service: Arc<IssuanceService<EmailDispatcher>>,
        displayed: watch::Receiver<Option<DisplayedTicket>>,
    ) -> Self {
        Self { service, displayed }
    }
}
