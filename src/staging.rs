//! Local staging directory for retrieved media
//!
//! Files written here are never removed by the service.

use std::io;
use std::path::{Path, PathBuf};

/// File name template handed to the engine; titles are not disambiguated
pub const OUTPUT_TEMPLATE: &str = "%(title)s.%(ext)s";

#[derive(Debug, Clone)]
pub struct StagingDir {
    root: PathBuf,
}

impl StagingDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the directory (and parents) if it does not exist yet
    pub fn prepare(&self) -> io::Result<()> {
        std::fs::create_dir_all(&self.root)?;
        tracing::info!(path = %self.root.display(), "Staging directory ready");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// `<root>/%(title)s.%(ext)s`, expanded by the engine
    pub fn output_template(&self) -> PathBuf {
        self.root.join(OUTPUT_TEMPLATE)
    }

    pub async fn is_ready(&self) -> bool {
        tokio::fs::metadata(&self.root)
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false)
    }
}
