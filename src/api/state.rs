use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::config::AppConfig;
use crate::relay::Relay;

/// Shared application state passed to all handlers via Axum's State extractor.
#[derive(Debug)]
pub struct AppState {
    pub config: AppConfig,
    pub relay: Relay,
    pub start_time: std::time::Instant,
    pub started_at: DateTime<Utc>,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(config: AppConfig) -> SharedState {
        Arc::new(AppState {
            config,
            relay: Relay::new(),
            start_time: std::time::Instant::now(),
            started_at: Utc::now(),
        })
    }
}
