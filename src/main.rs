use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use storefront_api::config::{init_tracing, load_config};
use storefront_api::db::{establish_connection_from_app_config, run_migrations};
use storefront_api::{app_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config().context("Failed to load configuration")?;
    init_tracing(config.log_level(), config.log_json);

    info!(
        environment = %config.environment,
        "Starting storefront API"
    );

    let db = establish_connection_from_app_config(&config)
        .await
        .context("Failed to connect to the database")?;
    let db = Arc::new(db);

    if config.auto_migrate {
        run_migrations(&db).await.context("Migrations failed")?;
    }

    if let Err(e) = tokio::fs::create_dir_all(&config.upload_dir).await {
        warn!(dir = %config.upload_dir, error = %e, "Could not create upload directory");
    }

    let state = AppState::new(db, config.clone());
    state
        .users
        .seed_default_admin(&config)
        .await
        .context("Failed to seed default admin")?;

    let app = app_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => warn!(error = %e, "Failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
