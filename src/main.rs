use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use school_chat_relay::{config::Config, routes, state::AppState, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();

    let cfg = Config::from_env();
    telemetry::init(&cfg);
    info!(version = env!("CARGO_PKG_VERSION"), model = %cfg.model, "school-chat-relay starting");

    let state = Arc::new(AppState::from_config(&cfg).context("building upstream client")?);
    for relay in [&state.http_function, &state.cloud_function] {
        if relay.api_key.is_none() {
            warn!(binding = relay.binding.name(), "no Gemini key configured; replies will carry a setup hint");
        }
    }

    let app = routes::create_router(&cfg.static_dir).with_state(state);

    let addr: SocketAddr = cfg
        .bind_address
        .parse()
        .with_context(|| format!("invalid RELAY_BIND address '{}'", cfg.bind_address))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "relay listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("school-chat-relay stopped");
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to install Ctrl-C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
