//! `yt-dlp` driven as a child process

use async_trait::async_trait;
use bon::Builder;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use tokio::process::Command;
use tracing::debug;

use super::traits::{EngineError, ExtractionEngine};
use super::types::VideoMetadata;
use crate::config::EngineConfig;
use crate::staging::StagingDir;

const DEFAULT_BINARY: &str = "yt-dlp";

/// `yt-dlp` engine
///
/// Built once at startup from [`EngineConfig`] and shared by all requests.
#[derive(Debug, Clone, Builder)]
pub struct YtDlp {
    #[builder(into, default = DEFAULT_BINARY.to_string())]
    binary: String,
    cookies_path: Option<PathBuf>,
    #[builder(into)]
    proxy: Option<String>,
    #[builder(default)]
    extra_args: Vec<String>,
}

impl YtDlp {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::builder()
            .binary(config.binary.clone())
            .maybe_cookies_path(config.cookies_path.clone())
            .maybe_proxy(config.proxy.clone())
            .extra_args(config.extra_args.clone())
            .build()
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Options shared by both modes, taken from configuration
    fn common_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        if let Some(path) = &self.cookies_path {
            args.push("--cookies".to_string());
            args.push(path.display().to_string());
        }

        if let Some(proxy) = &self.proxy {
            args.push("--proxy".to_string());
            args.push(proxy.clone());
        }

        args.extend(self.extra_args.iter().cloned());
        args
    }

    fn metadata_args(&self, url: &str) -> Vec<String> {
        let mut args = vec![
            "--dump-single-json".to_string(),
            "--quiet".to_string(),
            "--no-warnings".to_string(),
        ];
        args.extend(self.common_args());
        args.push("--".to_string());
        args.push(url.to_string());
        args
    }

    fn media_args(&self, url: &str, format_selector: &str, destination: &Path) -> Vec<String> {
        let template = StagingDir::new(destination).output_template();

        let mut args = vec![
            "--format".to_string(),
            format_selector.to_string(),
            "--output".to_string(),
            template.display().to_string(),
            // --print implies --simulate; the final path is printed after muxing
            "--print".to_string(),
            "after_move:filepath".to_string(),
            "--no-simulate".to_string(),
            "--quiet".to_string(),
            "--no-warnings".to_string(),
        ];
        args.extend(self.common_args());
        args.push("--".to_string());
        args.push(url.to_string());
        args
    }

    async fn run(&self, args: Vec<String>) -> Result<Output, EngineError> {
        debug!(binary = %self.binary, ?args, "Running engine");

        let output = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| EngineError::Spawn {
                binary: self.binary.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(EngineError::Exited {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(output)
    }
}

impl Default for YtDlp {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Last non-empty line of the engine's stdout
fn last_printed_line(stdout: &[u8]) -> Option<String> {
    String::from_utf8_lossy(stdout)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .next_back()
        .map(ToString::to_string)
}

#[async_trait]
impl ExtractionEngine for YtDlp {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    async fn version(&self) -> Result<String, EngineError> {
        let output = self.run(vec!["--version".to_string()]).await?;
        last_printed_line(&output.stdout).ok_or(EngineError::MissingOutput)
    }

    async fn fetch_metadata(&self, url: &str) -> Result<VideoMetadata, EngineError> {
        let output = self.run(self.metadata_args(url)).await?;
        let metadata: VideoMetadata = serde_json::from_slice(&output.stdout)?;

        debug!(url, formats = metadata.formats.len(), "Metadata fetched");
        Ok(metadata)
    }

    async fn fetch_media(
        &self,
        url: &str,
        format_selector: &str,
        destination: &Path,
    ) -> Result<PathBuf, EngineError> {
        let output = self
            .run(self.media_args(url, format_selector, destination))
            .await?;

        last_printed_line(&output.stdout)
            .map(PathBuf::from)
            .ok_or(EngineError::MissingOutput)
    }
}
