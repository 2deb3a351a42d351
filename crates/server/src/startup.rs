use std::sync::Arc;

use configs::AppConfig;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use service::{SeaOrmSubscriptionRepository, SubscriptionRepository};

use crate::errors::StartupError;
use crate::routes::{self, AppState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!(event = "shutdown_signal", "received Ctrl+C, draining connections"),
        Err(e) => error!(error = %e, "failed to listen for Ctrl+C"),
    }
}

/// Connect storage, apply migrations and serve HTTP until Ctrl+C.
pub async fn run(cfg: AppConfig) -> Result<(), StartupError> {
    let db = models::db::connect_with_retry(&cfg.database)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;
    models::db::migrate(&db)
        .await
        .map_err(|e| StartupError::Database(format!("migration failed: {e}")))?;
    info!(event = "migrated", "database schema up to date");

    let repo: Arc<dyn SubscriptionRepository> = Arc::new(SeaOrmSubscriptionRepository::new(db));
    let app = routes::build_router(AppState::new(repo), build_cors());

    let host = cfg.server.host.as_str();
    let port = cfg.server.port;
    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    let addr = listener.local_addr()?;
    info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!(event = "stopped", "server stopped");
    Ok(())
}
