//! Application State
//!
//! Shared state across all handlers. Nothing here is per-session: every
//! turn carries its own state in the request.

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;

use intake_agent::IntakeEngine;
use intake_config::Settings;
use intake_persistence::{InMemoryRecordStore, RecordStore};

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub engine: Arc<IntakeEngine>,
    /// Record store shared with the engine (ScyllaDB or in-memory)
    pub store: Arc<dyn RecordStore>,
    /// Present when the Prometheus recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create application state with an in-memory record store
    pub fn new(config: Settings) -> Self {
        Self::with_store(config, Arc::new(InMemoryRecordStore::new()))
    }

    /// Create application state with a custom record store (e.g., ScyllaDB)
    pub fn with_store(config: Settings, store: Arc<dyn RecordStore>) -> Self {
        let engine = IntakeEngine::new(&config.dialog, store.clone());
        Self {
            config: Arc::new(config),
            engine: Arc::new(engine),
            store,
            metrics: None,
        }
    }

    /// Attach the Prometheus handle rendered at `/metrics`
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
