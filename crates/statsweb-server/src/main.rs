//! statsweb server
//!
//! Small demo web server that reports a StatsD metric for every request:
//! - `/help`      usage
//! - `/debug`     request dump
//! - `/count`     hit counter
//! - `/lissajous` animated 801x801 Lissajous GIF
//!
//! Usage: `statsweb-server [config.yaml]` (defaults to `statsweb.yaml`, and to
//! built-in defaults when that file does not exist).

use std::net::SocketAddr;

use tracing_subscriber::{fmt, EnvFilter};

use statsweb_core::error::Result;
use statsweb_server::{app_state::AppState, config, router};

const DEFAULT_CONFIG: &str = "statsweb.yaml";

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG.to_string());
    let cfg = config::load_or_default(&path).inspect_err(|e| {
        tracing::error!(error = %e, path = %path, "config load failed");
    })?;
    let listen = cfg.server.listen_addr()?;

    let state = AppState::start(cfg).await.inspect_err(|e| {
        tracing::error!(error = %e, "startup failed");
    })?;
    let app = router::build_router(state.clone());

    let listener = tokio::net::TcpListener::bind(listen).await?;
    tracing::info!(%listen, "statsweb starting");
    tracing::info!("point your browser to http://{listen}/help for more info");

    let served = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await;

    state.shutdown().await;
    served?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
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
    tracing::info!("signal received, starting graceful shutdown");
}
