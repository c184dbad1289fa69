use super::models::Config;
use thiserror::Error;

/// Options the service sets itself, plus the ones that turn a metadata call
/// into a download
const RESERVED_ENGINE_ARGS: &[&str] = &[
    "-o",
    "--output",
    "-f",
    "--format",
    "--print",
    "-P",
    "--paths",
    "-j",
    "-J",
    "--dump-single-json",
    "--no-simulate",
    "--no-skip-download",
];

/// Whether `arg` sets a reserved option in any spelling yt-dlp accepts:
/// `--name`, `--name=value`, `-x` or `-xvalue`
fn is_reserved(arg: &str) -> bool {
    if arg.starts_with("--") {
        let name = arg.split_once('=').map_or(arg, |(name, _)| name);
        return RESERVED_ENGINE_ARGS.contains(&name);
    }

    RESERVED_ENGINE_ARGS
        .iter()
        .filter(|flag| !flag.starts_with("--"))
        .any(|flag| arg.starts_with(flag))
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("engine.binary must not be empty")]
    EmptyEngineBinary,

    #[error("server.staging_dir must not be empty")]
    EmptyStagingDir,

    #[error("server.max_form_bytes must be positive")]
    InvalidMaxFormBytes,

    #[error("Invalid engine proxy '{proxy}', expected a URL with a scheme")]
    InvalidProxy { proxy: String },

    #[error("engine.extra_args must not override '{arg}'")]
    ReservedEngineArg { arg: String },
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_server(config)?;
    validate_engine(config)?;
    Ok(())
}

fn validate_server(config: &Config) -> Result<(), ValidationError> {
    if config.server.staging_dir.as_os_str().is_empty() {
        return Err(ValidationError::EmptyStagingDir);
    }

    if config.server.max_form_bytes.as_u64() == 0 {
        return Err(ValidationError::InvalidMaxFormBytes);
    }

    Ok(())
}

fn validate_engine(config: &Config) -> Result<(), ValidationError> {
    let engine = &config.engine;

    if engine.binary.trim().is_empty() {
        return Err(ValidationError::EmptyEngineBinary);
    }

    if let Some(proxy) = &engine.proxy {
        if !proxy.contains("://") {
            return Err(ValidationError::InvalidProxy {
                proxy: proxy.clone(),
            });
        }
    }

    if let Some(arg) = engine.extra_args.iter().find(|arg| is_reserved(arg)) {
        return Err(ValidationError::ReservedEngineArg { arg: arg.clone() });
    }

    Ok(())
}
