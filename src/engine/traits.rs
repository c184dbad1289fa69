use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::types::VideoMetadata;

/// Engine errors
///
/// Kept detailed for logs; the service boundary collapses them into
/// [`crate::error::GrabError`].
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start {binary}: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },
    #[error("engine exited with {}: {stderr}", describe_exit(.code))]
    Exited { code: Option<i32>, stderr: String },
    #[error("engine returned invalid metadata: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("engine did not report an output file")]
    MissingOutput,
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("code {code}"),
        None => "signal".to_string(),
    }
}

/// External media extractor
///
/// The trait is async because both operations wait on network I/O done by
/// the engine.
#[async_trait]
pub trait ExtractionEngine: Send + Sync {
    /// Name of the engine (for logging)
    fn name(&self) -> &'static str;

    /// Engine version string, if it can be determined
    async fn version(&self) -> Result<String, EngineError>;

    /// Describe `url` and list its formats; must not retrieve media bytes
    async fn fetch_metadata(&self, url: &str) -> Result<VideoMetadata, EngineError>;

    /// Retrieve the format chosen by `format_selector` into `destination`
    /// and return the path of the written file
    async fn fetch_media(
        &self,
        url: &str,
        format_selector: &str,
        destination: &Path,
    ) -> Result<PathBuf, EngineError>;
}
