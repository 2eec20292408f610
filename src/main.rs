mod args;
mod config;

use tal::api::{self, AppState};
use tal::{Ledger, Result};

use std::sync::Arc;

use anyhow::Context;

use clap::Parser;

use tokio::net::TcpListener;
use tokio::signal;

#[tokio::main]
async fn main() -> Result {
    let args = args::Args::parse();

    config::configure_app(&args)?;

    log::debug!("Application configured with {args:?}. Binding listener...");

    let addr = args.socket_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Couldn't bind to {addr}"))?;

    let state = Arc::new(AppState::new(Ledger::new()));
    let app = api::build_router(state);

    log::info!("Server running on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    log::info!("Server stopped");

    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            log::error!("Couldn't listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                log::error!("Couldn't listen for SIGTERM: {e}");
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

    log::info!("Shutdown signal received, finishing in-flight requests");
}
