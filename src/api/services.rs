use axum::{
    Form, Json,
    body::Body,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{Html, IntoResponse},
};
use std::collections::HashMap;
use tokio_util::io::ReaderStream;
use tracing::info;

use super::{
    error::ApiError,
    models::{DownloadForm, HealthResponse, InspectForm},
    pages,
    state::AppState,
    utils,
};
use crate::error::GrabError;
use crate::inspector::VideoSummary;

/// Search page (GET /)
pub async fn index() -> Html<String> {
    Html(pages::render_index())
}

/// Inspect a pasted link and render its formats (POST /)
pub async fn inspect_page(
    State(state): State<AppState>,
    Form(form): Form<InspectForm>,
) -> Result<Html<String>, ApiError> {
    let summary = inspect(&state, &form.url).await?;
    Ok(Html(pages::render_summary(&summary)))
}

/// Same as the page flow, as JSON (POST /api/inspect)
pub async fn inspect_json(
    State(state): State<AppState>,
    Json(form): Json<InspectForm>,
) -> Result<Json<VideoSummary>, ApiError> {
    let summary = inspect(&state, &form.url).await?;
    Ok(Json(summary))
}

async fn inspect(state: &AppState, url: &str) -> Result<VideoSummary, ApiError> {
    let url = utils::require_field(url, "url")?;

    match state.inspector.inspect(url).await {
        Ok(summary) => {
            state.metrics.inspection_ok();
            Ok(summary)
        }
        Err(err) => {
            state.metrics.inspection_failed();
            Err(err.into())
        }
    }
}

/// Retrieve the chosen format and stream it as an attachment (POST /download_file)
///
/// The staged file stays on disk after the response is sent.
pub async fn download_file(
    State(state): State<AppState>,
    Form(form): Form<DownloadForm>,
) -> Result<impl IntoResponse, ApiError> {
    let url = utils::require_field(&form.url, "url")?;
    let format_id = utils::require_field(&form.format_id, "format_id")?;

    let staged = match state.dispatcher.download(url, format_id).await {
        Ok(staged) => staged,
        Err(err) => {
            state.metrics.download_failed();
            return Err(err.into());
        }
    };

    let open_result = async {
        let file = tokio::fs::File::open(&staged.path).await?;
        let length = file.metadata().await?.len();
        Ok::<_, std::io::Error>((file, length))
    }
    .await;

    let (file, length) = match open_result {
        Ok(opened) => opened,
        Err(e) => {
            state.metrics.download_failed();
            return Err(GrabError::RetrievalFailed(format!(
                "cannot read staged file {}: {e}",
                staged.path.display()
            ))
            .into());
        }
    };

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(utils::content_type_for(&staged.path).as_ref())
            .map_err(|e| ApiError::Internal(e.to_string()))?,
    );
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(length));
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&utils::content_disposition(&staged.filename))
            .map_err(|e| ApiError::Internal(e.to_string()))?,
    );

    state.metrics.download_ok();
    info!(filename = %staged.filename, bytes = length, "Streaming staged file");

    Ok((headers, Body::from_stream(ReaderStream::new(file))))
}

/// Health check endpoint (GET /health)
///
/// Reports the staging directory and whether the engine answers `--version`.
/// Returns 503 Service Unavailable if any component is unhealthy.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let mut components = HashMap::new();

    components.insert("api".to_string(), "healthy".to_string());

    let staging = if state.dispatcher.staging().is_ready().await {
        "healthy".to_string()
    } else {
        "unhealthy".to_string()
    };
    components.insert("staging".to_string(), staging);

    let engine = match state.engine.version().await {
        Ok(_) => "healthy".to_string(),
        Err(e) => {
            tracing::warn!(engine = state.engine.name(), error = %e, "Engine health check failed");
            "unhealthy".to_string()
        }
    };
    components.insert("engine".to_string(), engine);

    let all_healthy = components.values().all(|status| status == "healthy");
    let (overall_status, status_code) = if all_healthy {
        ("healthy", StatusCode::OK)
    } else {
        ("unhealthy", StatusCode::SERVICE_UNAVAILABLE)
    };

    let response = HealthResponse {
        status: overall_status.to_string(),
        components,
        version: env!("CARGO_PKG_VERSION").to_string(),
        metrics: state.metrics.snapshot(),
    };

    (status_code, Json(response))
}
