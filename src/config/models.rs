use crate::humanize::ByteSize;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub engine: EngineConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    /// Where retrieved media is written before being sent to the client
    #[serde(default = "default_staging_dir")]
    pub staging_dir: PathBuf,
    /// Upper bound for form and JSON request bodies
    #[serde(default = "default_max_form_bytes")]
    pub max_form_bytes: ByteSize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            staging_dir: default_staging_dir(),
            max_form_bytes: default_max_form_bytes(),
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

fn default_staging_dir() -> PathBuf {
    PathBuf::from("downloads")
}

fn default_max_form_bytes() -> ByteSize {
    ByteSize(64 * 1024) // 64 KB
}

/// Extraction engine configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Path or name of the yt-dlp executable
    #[serde(default = "default_binary")]
    pub binary: String,
    /// Netscape-format cookies file passed via `--cookies`
    pub cookies_path: Option<PathBuf>,
    /// Proxy URL passed via `--proxy`
    pub proxy: Option<String>,
    /// Additional arguments appended to every invocation
    #[serde(default)]
    pub extra_args: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            cookies_path: None,
            proxy: None,
            extra_args: Vec::new(),
        }
    }
}

fn default_binary() -> String {
    "yt-dlp".to_string()
}
