mod config;

use std::net::SocketAddr;

use tracing::{info, warn};

use bastion_api::session::{MemorySessions, TokenSessions};
use bastion_api::{AppState, AppStateInner};
use bastion_db::Database;

use crate::config::{Config, SessionBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bastion=debug,bastion_api=debug,bastion_db=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    let db = Database::open(&config.db_path)?;
    let ttl = chrono::Duration::hours(config.session_ttl_hours);
    let state: AppState = match config.session_backend {
        SessionBackend::Token => {
            AppStateInner::new(db, TokenSessions::new(config.session_secret.as_bytes(), ttl))
        }
        SessionBackend::Memory => AppStateInner::new(db, MemorySessions::new(ttl)),
    };
    info!("Sessions: {:?} backend, {}h lifetime", config.session_backend, config.session_ttl_hours);

    let app = bastion_api::router(state.clone());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Bastion console listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The router's clones are gone once serve returns; this is the last handle.
    drop(state);
    info!("Database closed, bye");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
                }
            }
            Err(e) => {
                warn!("SIGTERM handler unavailable ({}), waiting for Ctrl+C only", e);
                ctrl_c.await.ok();
                info!("Received Ctrl+C, shutting down...");
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
