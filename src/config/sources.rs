use super::models::Config;
use config::{ConfigError, Environment, File};
use std::env;
use std::path::PathBuf;

const CONFIG_ENV_VAR: &str = "VIDGRAB_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/vidgrab.toml";
const ENV_PREFIX: &str = "VIDGRAB";
const ENV_SEPARATOR: &str = "__";

/// Resolve the config file path: `VIDGRAB_CONFIG` if set, else the default
fn config_path() -> PathBuf {
    env::var_os(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Build the layered configuration.
///
/// Later layers win: struct defaults, the TOML file, `.env`, then the
/// process environment (`VIDGRAB__ENGINE__BINARY` -> `engine.binary`).
pub fn load() -> Result<Config, ConfigError> {
    // A missing .env is normal outside development
    if let Err(err) = dotenvy::dotenv() {
        tracing::debug!(error = %err, "No .env file loaded");
    }

    load_from_sources(config_path())
}

/// Same layering as [`load`] with an explicit file path and no `.env` lookup
pub fn load_from_sources(config_path: PathBuf) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();

    if config_path.is_file() {
        tracing::info!(path = %config_path.display(), "Reading configuration file");
        builder = builder.add_source(File::from(config_path).required(true));
    } else {
        tracing::warn!(
            path = %config_path.display(),
            "No configuration file, falling back to defaults and environment"
        );
    }

    let env_layer = Environment::with_prefix(ENV_PREFIX)
        .separator(ENV_SEPARATOR)
        .try_parsing(true);

    builder.add_source(env_layer).build()?.try_deserialize()
}
