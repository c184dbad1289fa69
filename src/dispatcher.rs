//! Download Dispatcher
//!
//! Asks the engine to retrieve one format into the staging directory and
//! hands back the written file.

use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use crate::engine::ExtractionEngine;
use crate::error::GrabError;
use crate::staging::StagingDir;

/// Media file written by the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    pub path: PathBuf,
    /// Name advertised to the client
    pub filename: String,
}

impl StagedFile {
    fn from_path(path: PathBuf) -> Self {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "download.bin".to_string());

        Self { path, filename }
    }
}

pub struct DownloadDispatcher {
    engine: Arc<dyn ExtractionEngine>,
    staging: StagingDir,
}

impl DownloadDispatcher {
    pub fn new(engine: Arc<dyn ExtractionEngine>, staging: StagingDir) -> Self {
        Self { engine, staging }
    }

    pub fn staging(&self) -> &StagingDir {
        &self.staging
    }

    /// Retrieve `format_id` of `url` into the staging directory
    ///
    /// `format_id` is passed to the engine as-is; an unknown id fails the same
    /// way as any other engine error.
    pub async fn download(&self, url: &str, format_id: &str) -> Result<StagedFile, GrabError> {
        let path = self
            .engine
            .fetch_media(url, format_id, self.staging.path())
            .await
            .map_err(|e| {
                warn!(engine = self.engine.name(), url, format_id, error = %e, "Retrieval failed");
                GrabError::RetrievalFailed(e.to_string())
            })?;

        let staged = StagedFile::from_path(path);
        info!(url, format_id, path = %staged.path.display(), "Media staged");
        Ok(staged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{EngineError, VideoMetadata};
    use async_trait::async_trait;
    use std::path::Path;
    use tempfile::TempDir;

    /// Writes `<destination>/Clip.<format_id>` for format "22" only
    struct OneFormatEngine;

    #[async_trait]
    impl ExtractionEngine for OneFormatEngine {
        fn name(&self) -> &'static str {
            "one-format"
        }

        async fn version(&self) -> Result<String, EngineError> {
            Ok("test".to_string())
        }

        async fn fetch_metadata(&self, _url: &str) -> Result<VideoMetadata, EngineError> {
            Ok(VideoMetadata::default())
        }

        async fn fetch_media(
            &self,
            _url: &str,
            format_selector: &str,
            destination: &Path,
        ) -> Result<PathBuf, EngineError> {
            if format_selector != "22" {
                return Err(EngineError::Exited {
                    code: Some(1),
                    stderr: "ERROR: Requested format is not available".to_string(),
                });
            }

            let path = destination.join("Clip.mp4");
            std::fs::write(&path, b"media").map_err(|source| EngineError::Spawn {
                binary: "one-format".to_string(),
                source,
            })?;
            Ok(path)
        }
    }

    #[tokio::test]
    async fn download_returns_staged_file() {
        let temp_dir = TempDir::new().unwrap();
        let dispatcher =
            DownloadDispatcher::new(Arc::new(OneFormatEngine), StagingDir::new(temp_dir.path()));

        let staged = dispatcher.download("https://example.com/v", "22").await.unwrap();
        assert_eq!(staged.filename, "Clip.mp4");
        assert_eq!(staged.path, temp_dir.path().join("Clip.mp4"));
        assert!(staged.path.exists());
    }

    #[tokio::test]
    async fn unknown_format_is_a_retrieval_failure() {
        let temp_dir = TempDir::new().unwrap();
        let dispatcher =
            DownloadDispatcher::new(Arc::new(OneFormatEngine), StagingDir::new(temp_dir.path()));

        let err = dispatcher
            .download("https://example.com/v", "does-not-exist")
            .await
            .unwrap_err();
        assert!(matches!(err, GrabError::RetrievalFailed(_)));
    }

    #[tokio::test]
    async fn same_title_overwrites_previous_file() {
        let temp_dir = TempDir::new().unwrap();
        let dispatcher =
            DownloadDispatcher::new(Arc::new(OneFormatEngine), StagingDir::new(temp_dir.path()));

        dispatcher.download("https://example.com/a", "22").await.unwrap();
        dispatcher.download("https://example.com/b", "22").await.unwrap();

        let entries = std::fs::read_dir(temp_dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn staged_file_name_falls_back() {
        let staged = StagedFile::from_path(PathBuf::from("/"));
        assert_eq!(staged.filename, "download.bin");
    }
}
