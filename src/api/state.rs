use std::sync::Arc;

use crate::config::Config;
use crate::dispatcher::DownloadDispatcher;
use crate::engine::ExtractionEngine;
use crate::inspector::FormatInspector;
use crate::observability::Metrics;
use crate::staging::StagingDir;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub engine: Arc<dyn ExtractionEngine>,
    pub inspector: Arc<FormatInspector>,
    pub dispatcher: Arc<DownloadDispatcher>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    /// Wire both services to one engine and the configured staging directory
    pub fn new(config: Config, engine: Arc<dyn ExtractionEngine>) -> Self {
        let staging = StagingDir::new(config.server.staging_dir.clone());

        Self {
            inspector: Arc::new(FormatInspector::new(engine.clone())),
            dispatcher: Arc::new(DownloadDispatcher::new(engine.clone(), staging)),
            engine,
            config: Arc::new(config),
            metrics: Arc::new(Metrics::new()),
        }
    }
}
