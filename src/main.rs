// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact Relay Service
//!
//! Accepts contact form submissions on `POST /api/contact`, screens them for
//! spam and forwards the rest to a transactional email provider.
//!
//! ## Configuration
//!
//! Configuration is loaded from environment variables:
//!
//! - `BIND_ADDR`: Server bind address (default: 0.0.0.0:8080)
//! - `RESEND_API_KEY`: Email provider API key (required for delivery)
//! - `CONTACT_TO` / `CONTACT_CC`: Comma-separated recipients
//! - `CONTACT_FROM`: Sender display address
//! - `RATE_LIMIT_MAX`: Submissions per client per window (default: 3)
//! - `RATE_LIMIT_WINDOW_SECS`: Window length (default: 3600)
//! - `MIN_FORM_TIME_MS`: Minimum fill time (default: 3000)
//! - `SPAM_KEYWORDS`: Comma-separated keyword list replacing the built-in one

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use contact_relay::{
    config::Config,
    delivery::{DeliveryGateway, ResendGateway},
    handlers::{router, AppState},
    metrics::Metrics,
    policy::{spawn_sweeper, SubmissionPolicy},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Load configuration
    let config = Config::from_env();
    config.validate()?;
    info!(
        bind_addr = %config.bind_addr,
        max_submissions = config.rate_limit.max_submissions,
        window_secs = config.rate_limit.window_secs,
        min_form_time_ms = config.spam.min_form_time_ms,
        keywords = config.spam.keywords.len(),
        "Starting contact relay"
    );

    let gateway: Option<Arc<dyn DeliveryGateway>> = match ResendGateway::from_config(&config.delivery)? {
        Some(gateway) => Some(Arc::new(gateway)),
        None => {
            warn!("RESEND_API_KEY not set; submissions will fail with 500");
            None
        }
    };
    if gateway.is_some() && config.delivery.to.is_empty() {
        warn!("CONTACT_TO is empty; the email provider will reject deliveries");
    }

    // Create application state
    let policy = Arc::new(SubmissionPolicy::new(&config, gateway, Metrics::new()?));
    let sweeper = spawn_sweeper(policy.clone(), config.rate_limit.sweep_interval());

    let state = Arc::new(AppState {
        policy,
        config: config.clone(),
    });
    let app = router(state);

    // Start server
    let addr: SocketAddr = config.bind_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sweeper.abort();
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
