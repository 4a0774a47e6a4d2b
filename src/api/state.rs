use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::logs::{FileLogStore, LogService, LogStore};
use crate::observability::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub logs: Arc<LogService>,
    pub metrics: Arc<Metrics>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn LogStore>) -> Self {
        let logs = LogService::with_default_limit(store, config.logs.default_limit);
        Self {
            config: Arc::new(config),
            logs: Arc::new(logs),
            metrics: Arc::new(Metrics::new()),
            started_at: Instant::now(),
        }
    }

    /// State backed by the JSON file named in `config.logs.file_path`
    pub fn from_config(config: Config) -> Self {
        let store = FileLogStore::open(&config.logs.file_path);
        Self::new(config, Arc::new(store))
    }
}
