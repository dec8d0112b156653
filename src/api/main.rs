use anyhow::Context;
use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;

use safereport_api::config::Settings;
use safereport_api::middleware::create_cors_layer;
use safereport_api::routes::{self, AppState};

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG controls the log level (default: info)
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    let settings = Settings::from_env();
    info!(
        service = %settings.app_name,
        version = %settings.app_version,
        "Application starting..."
    );

    let app_state = AppState::from_settings(settings.clone())
        .await
        .context("failed to initialize storage")?;

    let cors = create_cors_layer(&settings.cors_origins);
    let app = Router::new()
        .route("/", get(root))
        .route("/health", get(health_redirect))
        .nest("/api/v1", routes::create_api_router())
        .with_state(app_state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        );

    let addr = SocketAddr::from((settings.host, settings.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on {}", addr);
    info!("Health check available at http://{}/api/v1/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// GET / - Service identity.
async fn root() -> Json<Value> {
    Json(json!({
        "name": "SafeReport",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
    }))
}

/// GET /health - Liveness without the /api/v1 prefix, for load balancers.
async fn health_redirect() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Resolve on SIGINT or SIGTERM (Docker stop) for graceful shutdown.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(s) => s,
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
                return;
            }
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => info!("SIGINT received, shutting down"),
            _ = sigterm.recv() => info!("SIGTERM received, shutting down"),
        }
    }

    #[cfg(not(unix))]
    {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received");
        }
    }
}
