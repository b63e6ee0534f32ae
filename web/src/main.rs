//! DauProof HTTP server.
//!
//! Composition root: constructs the stores, gate, signer, and background
//! tasks once at process start, then serves until interrupted. All
//! ticket/session state is intentionally ephemeral; stopping the process
//! discards it.

use dauproof_core::config::Config;
use dauproof_core::providers::{ConsoleEmailProvider, EmailDispatcher, SmtpEmailProvider};
use dauproof_core::{IdentityGate, IssuanceService, SystemClock, TicketStore, VoucherSigner};
use dauproof_web::{build_router, AppState, BackgroundTasks};
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dauproof_web=info,dauproof_core=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting DauProof voucher server");

    let config = Config::from_env();
    info!(
        bind_addr = %config.server.bind_addr,
        chain_id = config.chain.chain_id,
        verifying_contract = %config.chain.verifying_contract,
        allowed_domain = %config.identity.allowed_domain,
        campaign_id = config.display.campaign_id,
        "Configuration loaded"
    );

    // Signing is optional at boot: without a key the ticket and identity
    // routes still work and only issuance fails.
    let signer = build_signer(&config);
    if signer.is_none() {
        warn!("no usable signing key configured; voucher issuance will fail");
    }

    let email = match &config.smtp {
        Some(smtp) => {
            info!(server = %smtp.server, "using SMTP email provider");
            EmailDispatcher::Smtp(SmtpEmailProvider::new(
                smtp.server.clone(),
                smtp.port,
                smtp.username.clone(),
                smtp.password.clone(),
                smtp.from_email.clone(),
                smtp.from_name.clone(),
            ))
        }
        None => {
            info!("no SMTP configuration; verification codes go to the log");
            EmailDispatcher::Console(ConsoleEmailProvider::new())
        }
    };

    let clock = Arc::new(SystemClock);
    let tickets = TicketStore::new(clock.clone());
    let identity = IdentityGate::new(
        config.identity.allowed_domain.clone(),
        Arc::new(email),
        clock.clone(),
    );
    let service = Arc::new(IssuanceService::new(
        tickets.clone(),
        identity,
        signer,
        clock,
    ));

    let (tasks, displayed) = BackgroundTasks::spawn(tickets, config.display.clone());
    let app = build_router(AppState::new(service, displayed));

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr).await?;
    info!(addr = %config.server.bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tasks.shutdown();
    info!("shutdown complete");
    Ok(())
}

/// Build the voucher signer from configuration, if a usable key is present.
fn build_signer(config: &Config) -> Option<VoucherSigner> {
    let key = config.chain.signer_private_key.as_deref()?;
    let contract = match config.chain.verifying_contract.parse() {
        Ok(address) => address,
        Err(e) => {
            warn!(error = %e, "VERIFYING_CONTRACT does not parse; issuance disabled");
            return None;
        }
    };
    match VoucherSigner::new(key, config.chain.chain_id, contract) {
        Ok(signer) => {
            info!(signer_address = %signer.address(), "voucher signer ready");
            Some(signer)
        }
        Err(e) => {
            warn!(error = %e, "SIGNER_PRIVATE_KEY does not parse; issuance disabled");
            None
        }
    }
}

/// Resolve on ctrl-c or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
