//! Service configuration
//!
//! Settings are merged from struct defaults, an optional TOML file
//! (`config/vidgrab.toml`, or the path in `VIDGRAB_CONFIG`) and environment
//! variables named `VIDGRAB__<SECTION>__<KEY>`, e.g.
//! `VIDGRAB__ENGINE__PROXY=socks5://127.0.0.1:1080`. The merged result is
//! validated before it is handed to the server.
//!
//! ```no_run
//! use vidgrab::config::Config;
//!
//! let config = Config::load().expect("invalid configuration");
//! println!("staging into {}", config.server.staging_dir.display());
//! ```

mod models;
mod sources;
mod validation;

pub use crate::humanize::ByteSize;
pub use models::{Config, EngineConfig, ServerConfig};
pub use validation::ValidationError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl Config {
    /// Merge every source and validate the result
    pub fn load() -> Result<Self, ConfigError> {
        let config = sources::load()?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Like [`Config::load`] but reads the given file
    pub fn load_from_path(path: std::path::PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_from_sources(path)?;
        validation::validate(&config)?;
        Ok(config)
    }
}
