use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::Request,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::{decompression::RequestDecompressionLayer, trace::TraceLayer};
use tracing::{info, info_span, warn};
use uuid::Uuid;

use super::{
    services::{download_file, health, index, inspect_json, inspect_page},
    state::AppState,
};
use crate::config::Config;
use crate::engine::{ExtractionEngine, YtDlp};
use crate::staging::StagingDir;

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Build the application router
///
/// Exposed separately from [`run`] so tests can drive it with `oneshot`.
pub fn router(state: AppState) -> Router {
    let body_limit = usize::try_from(state.config.server.max_form_bytes.as_u64())
        .unwrap_or(usize::MAX);

    Router::new()
        .route("/", get(index).post(inspect_page))
        .route("/download_file", post(download_file))
        .route("/api/inspect", post(inspect_json))
        .route("/health", get(health))
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(RequestDecompressionLayer::new())
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
            info_span!(
                "request",
                request_id = %Uuid::now_v7(),
                method = %request.method(),
                path = %request.uri().path(),
            )
        }))
}

pub async fn run(config: Config, address: Option<SocketAddr>) -> Result<(), AnyError> {
    let address = address.unwrap_or(config.server.bind_addr);

    // Created once at startup, never removed
    let staging = StagingDir::new(config.server.staging_dir.clone());
    staging.prepare().map_err(|e| {
        format!(
            "Failed to create staging directory {}: {}",
            staging.path().display(),
            e
        )
    })?;

    let engine = YtDlp::from_config(&config.engine);
    match engine.version().await {
        Ok(version) => info!(binary = engine.binary(), %version, "Extraction engine found"),
        Err(e) => warn!(binary = engine.binary(), error = %e, "Extraction engine not usable"),
    }

    let state = AppState::new(config, Arc::new(engine));
    let app = router(state);

    let listener = TcpListener::bind(address).await?;
    info!(%address, "vidgrab listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
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

    info!("Shutdown signal received");
}
