use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;
use tower::ServiceExt; // for `oneshot`

use vidgrab::api::error::{DOWNLOAD_FAILED_MESSAGE, INSPECTION_FAILED_MESSAGE};
use vidgrab::api::state::AppState;
use vidgrab::config::Config;
use vidgrab::engine::{EngineError, ExtractionEngine, VideoMetadata};
use vidgrab::inspector::VideoSummary;

const VIDEO_URL: &str = "https://video.example.com/watch?v=abc";

/// In-process engine that knows exactly one video
///
/// Metadata comes from a fixed JSON document; retrieval writes
/// `<title>.<ext>` for the two format ids that document offers.
struct ScriptedEngine {
    healthy: bool,
    media_calls: AtomicUsize,
}

impl ScriptedEngine {
    fn new() -> Self {
        Self {
            healthy: true,
            media_calls: AtomicUsize::new(0),
        }
    }

    fn metadata() -> serde_json::Value {
        json!({
            "id": "abc",
            "title": "Sunset <Timelapse>",
            "thumbnail": "https://i.example.com/abc.jpg",
            "duration_string": "2:05",
            "formats": [
                {"format_id": "sb0", "ext": "mhtml", "resolution": "48x27"},
                {"format_id": "160", "ext": "mp4", "resolution": "256x144",
                 "acodec": "none", "filesize": 1048576},
                {"format_id": "139", "ext": "m4a", "resolution": "audio only",
                 "acodec": "mp4a.40.5", "filesize": 500000},
                {"format_id": "18", "ext": "mp4", "resolution": "640x360",
                 "acodec": "mp4a.40.2"},
                {"format_id": "22", "ext": "mp4", "resolution": "1280x720",
                 "acodec": "mp4a.40.2", "filesize_approx": 10485760}
            ]
        })
    }
}

fn unavailable(stderr: &str) -> EngineError {
    EngineError::Exited {
        code: Some(1),
        stderr: stderr.to_string(),
    }
}

#[async_trait]
impl ExtractionEngine for ScriptedEngine {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn version(&self) -> Result<String, EngineError> {
        if self.healthy {
            Ok("2025.01.01".to_string())
        } else {
            Err(EngineError::MissingOutput)
        }
    }

    async fn fetch_metadata(&self, url: &str) -> Result<VideoMetadata, EngineError> {
        if url != VIDEO_URL {
            return Err(unavailable("ERROR: Unsupported URL"));
        }
        Ok(serde_json::from_value(Self::metadata())?)
    }

    async fn fetch_media(
        &self,
        url: &str,
        format_selector: &str,
        destination: &Path,
    ) -> Result<PathBuf, EngineError> {
        self.media_calls.fetch_add(1, Ordering::SeqCst);

        if url != VIDEO_URL {
            return Err(unavailable("ERROR: Unsupported URL"));
        }
        if !["160", "22"].contains(&format_selector) {
            return Err(unavailable("ERROR: Requested format is not available"));
        }

        let path = destination.join("Sunset <Timelapse>.mp4");
        tokio::fs::write(&path, format!("media-{format_selector}"))
            .await
            .map_err(|source| EngineError::Spawn {
                binary: "scripted".to_string(),
                source,
            })?;
        Ok(path)
    }
}

struct TestApp {
    router: Router,
    engine: Arc<ScriptedEngine>,
    staging: TempDir,
}

fn create_test_config(staging_dir: &Path) -> Config {
    let config_toml = format!(
        r#"
[server]
bind_addr = "127.0.0.1:0"
staging_dir = "{}"
max_form_bytes = "16KB"
        "#,
        staging_dir.display()
    );

    toml::from_str(&config_toml).expect("Failed to parse test config")
}

fn build_test_app_with(engine: ScriptedEngine) -> TestApp {
    let staging = TempDir::new().expect("Failed to create temp dir");
    let engine = Arc::new(engine);

    let config = create_test_config(staging.path());
    let state = AppState::new(config, engine.clone());

    TestApp {
        router: vidgrab::api::router(state),
        engine,
        staging,
    }
}

fn build_test_app() -> TestApp {
    build_test_app_with(ScriptedEngine::new())
}

fn form_request(uri: &str, fields: &[(&str, &str)]) -> Request<Body> {
    let body = fields
        .iter()
        .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&");

    Request::builder()
        .uri(uri)
        .method("POST")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_index_page() {
    let app = build_test_app();

    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = app.router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains(r#"<form method="post" action="/">"#));
}

#[tokio::test]
async fn test_inspect_renders_filtered_formats() {
    let app = build_test_app();

    let response = app
        .router
        .oneshot(form_request("/", &[("url", VIDEO_URL)]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;

    assert!(html.contains("Sunset &lt;Timelapse&gt;"));
    assert!(html.contains("https://i.example.com/abc.jpg"));
    assert!(html.contains("Duration: 2:05"));
    assert!(html.contains("10.0 MB (has audio)"));
    assert!(html.contains("1.0 MB (silent)"));

    // Best format first; sizeless and non-video containers are not offered
    let pos_22 = html.find(r#"value="22""#).unwrap();
    let pos_160 = html.find(r#"value="160""#).unwrap();
    assert!(pos_22 < pos_160);
    assert!(!html.contains(r#"value="18""#));
    assert!(!html.contains(r#"value="139""#));
    assert!(!html.contains(r#"value="sb0""#));

    // Nothing is retrieved while inspecting
    assert_eq!(app.engine.media_calls.load(Ordering::SeqCst), 0);
    assert_eq!(std::fs::read_dir(app.staging.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_inspect_failure_shows_fixed_message() {
    let app = build_test_app();

    let response = app
        .router
        .oneshot(form_request("/", &[("url", "https://nowhere.invalid/x")]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/plain; charset=utf-8"
    );
    assert_eq!(body_string(response).await, INSPECTION_FAILED_MESSAGE);
}

#[tokio::test]
async fn test_inspect_missing_url() {
    let app = build_test_app();

    let response = app.router.oneshot(form_request("/", &[])).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_string(response).await, "Error: missing url");
}

#[tokio::test]
async fn test_inspect_json() {
    let app = build_test_app();

    let request = Request::builder()
        .uri("/api/inspect")
        .method("POST")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "url": VIDEO_URL }).to_string()))
        .unwrap();

    let response = app.router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let summary: VideoSummary = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(summary.title.as_deref(), Some("Sunset <Timelapse>"));
    assert_eq!(summary.duration.as_deref(), Some("2:05"));
    assert_eq!(summary.original_url, VIDEO_URL);

    let ids: Vec<_> = summary.formats.iter().map(|f| f.format_id.as_str()).collect();
    assert_eq!(ids, vec!["22", "160"]);
    assert_eq!(summary.formats[0].resolution, "1280x720");
    assert_eq!(summary.formats[0].ext, "mp4");
}

#[tokio::test]
async fn test_download_streams_attachment() {
    let app = build_test_app();

    let response = app
        .router
        .oneshot(form_request(
            "/download_file",
            &[("url", VIDEO_URL), ("format_id", "22")],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let headers = response.headers().clone();
    assert_eq!(headers[header::CONTENT_TYPE], "video/mp4");
    assert_eq!(headers[header::CONTENT_LENGTH], "8");

    let disposition = headers[header::CONTENT_DISPOSITION].to_str().unwrap();
    assert!(disposition.starts_with("attachment;"));
    assert!(disposition.contains("filename*=UTF-8''Sunset%20%3CTimelapse%3E.mp4"));

    assert_eq!(body_string(response).await, "media-22");

    // Staged file is kept after serving
    assert!(app.staging.path().join("Sunset <Timelapse>.mp4").exists());
}

#[tokio::test]
async fn test_download_unknown_format_uses_generic_failure() {
    let app = build_test_app();

    let response = app
        .router
        .oneshot(form_request(
            "/download_file",
            &[("url", VIDEO_URL), ("format_id", "does-not-exist")],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = body_string(response).await;
    assert_eq!(body, DOWNLOAD_FAILED_MESSAGE);
    assert!(body.starts_with("Error Downloading:"));
    assert!(!body.contains("Requested format"));
}

#[tokio::test]
async fn test_download_missing_format_id() {
    let app = build_test_app();

    let response = app
        .router
        .oneshot(form_request("/download_file", &[("url", VIDEO_URL)]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_string(response).await, "Error: missing format_id");
    assert_eq!(app.engine.media_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_oversized_form_is_rejected() {
    let app = build_test_app();

    let long_url = format!("{VIDEO_URL}&pad={}", "x".repeat(32 * 1024));
    let response = app
        .router
        .oneshot(form_request("/", &[("url", &long_url)]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = build_test_app();

    // One failed inspection shows up in the counters
    let failed = form_request("/", &[("url", "https://nowhere.invalid/x")]);
    ServiceExt::<Request<Body>>::oneshot(app.router.clone(), failed)
        .await
        .unwrap();

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = app.router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let health: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(health["status"], "healthy");
    assert_eq!(health["components"]["engine"], "healthy");
    assert_eq!(health["components"]["staging"], "healthy");
    assert_eq!(health["metrics"]["inspections_failed"], 1);
    assert!(health.get("version").is_some());
}

#[tokio::test]
async fn test_health_reports_broken_engine() {
    let mut engine = ScriptedEngine::new();
    engine.healthy = false;
    let app = build_test_app_with(engine);

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = app.router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
